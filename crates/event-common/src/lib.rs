//! # event-common
//!
//! Shared utilities including configuration, error handling, authentication,
//! the ticket codec, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod ticket;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, validate_password_strength, verify_password, Claims, JwtService,
    PasswordService, TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    NotificationConfig, ServerConfig, SmtpConfig, StorageConfig, TicketConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
pub use ticket::{IssuedTicket, TicketClaims, TicketCodec, TicketError};
