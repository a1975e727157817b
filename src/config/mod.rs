//! Reading and writing the `.better-env` manifest

pub mod discovery;
pub mod initializer;
pub mod parser;
pub mod validator;

pub use discovery::{find_config_file, find_config_file_within, load_declarations};
pub use initializer::{ConfigInitializer, InitError, InitOptions};
pub use parser::{parse_file, parse_line, parse_reader, parse_str, ConfigParseError, DeclarationList};
pub use validator::{ConfigValidator, ValidationResult, ValidationRule, ValidationSeverity};

/// Fixed name of the manifest inside a project directory.
pub const CONFIG_FILE_NAME: &str = ".better-env";
