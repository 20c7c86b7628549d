pub mod breadcrumb_service;
pub mod favorite_service;
pub mod file_service;
pub mod path_service;
pub mod search_service;
pub mod view_service;
