//! CropWise client
//!
//! The backend access layer (`ports` + `infrastructure`), the session that
//! holds the bearer token (`state`), the use-case services UI code calls
//! (`application`), and the `cropwise` command line front end (`cli`).

pub mod application;
pub mod cli;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;

pub use application::{CropwiseApi, ServiceError};
pub use config::{ClientConfig, ConfigError};
pub use infrastructure::ApiAdapter;
pub use ports::outbound::ApiError;
pub use state::Session;
