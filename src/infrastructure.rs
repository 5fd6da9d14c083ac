//! Infrastructure layer: configuration, logging, the HTTP backend client and
//! the console presenter.

pub mod config;
pub mod console_presenter;
pub mod http_client;
pub mod logging;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use console_presenter::ConsolePresenter;
pub use http_client::{HttpCatalogApi, HttpClientConfig};
pub use logging::{get_log_directory, init_logging_with_config};
