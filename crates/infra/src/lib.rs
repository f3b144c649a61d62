//! Infrastructure layer: storage adapters, configuration, retry policy and
//! the application services built on top of them.

pub mod config;
pub mod error;
pub mod retry;
pub mod services;
pub mod store;


pub use config::{AppConfig, BootstrapAccount, ConfigError};
pub use error::{ServiceError, ServiceResult, Transient};
pub use retry::RetryPolicy;
