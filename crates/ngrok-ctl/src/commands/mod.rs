//! CLI command implementations

mod any;
mod config;
mod get;
mod list;
mod root;
mod stop;

pub use any::any_command;
pub use config::{config_init, config_show};
pub use get::get_command;
pub use list::list_command;
pub use root::root_command;
pub use stop::stop_command;
