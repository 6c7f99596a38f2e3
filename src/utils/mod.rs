pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use parameter_error_handler::{json_config, path_config, query_config};
pub use sql::escape_like_pattern;
