pub mod settings;

pub use settings::{ConfigError, JwtSettings, Settings};
