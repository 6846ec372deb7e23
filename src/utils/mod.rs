pub mod environment;
pub mod paths;

pub use environment::{AppPaths, HOME_ENV_VAR, get_app_home};
pub use paths::{encode_segment, format_path_with_tilde, validate_file_size};
