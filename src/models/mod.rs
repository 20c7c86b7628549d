pub mod breadcrumb;
pub mod favorite;
pub mod file_entry;
pub mod listing;
