//! Credential handling and DSN parsing.
//!
//! # Security Guarantees
//! - Credentials are stored in `Zeroizing` containers for automatic memory clearing
//! - Passwords are masked in `Debug`, `Display` and error output
//!
//! # Module Structure
//! - `credentials`: Secure credential container with automatic memory zeroing
//! - `dsn`: `user[:password]@tcp(host[:port])/database` parsing

mod credentials;
mod dsn;

// Re-export public types
pub use credentials::Credentials;
pub use dsn::{DEFAULT_MYSQL_PORT, Dsn};
