pub mod browse_commands;
pub mod favorite_commands;
