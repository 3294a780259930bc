//! Run settings and the model server registry.

mod load;
mod types;

pub use types::{
    AppConfig, GradingConfig, LoggingConfig, ServerConfig, DEFAULT_SAMPLE_LIMIT,
    DEFAULT_TIMEOUT_SECS,
};
