//! MySQL driver-style DSN parsing.
//!
//! Accepts the `user[:password]@tcp(host[:port])/database[?params]` form.
//! Query parameters are accepted and ignored.

use super::credentials::Credentials;
use crate::error::KeyscoutError;
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Port used when the DSN does not name one.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Pre-compiled DSN pattern, initialized on first use.
fn dsn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<user>[^:@]+)(?::(?P<password>[^@]*))?@tcp\((?P<host>[^)]*)\)/(?P<database>[^?]+)(?:\?.*)?$",
        )
        .expect("Invalid DSN pattern")
    })
}

/// Parsed connection descriptor.
///
/// Produced once from the DSN and consumed to open the connection. The
/// password lives inside [`Credentials`] and is zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Dsn {
    /// User name and password
    pub credentials: Credentials,
    /// Host name or IP literal (IPv6 without brackets)
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Database selected after connecting
    pub database: String,
}

impl Dsn {
    /// Parses a DSN string.
    ///
    /// # Errors
    /// Returns [`KeyscoutError::MalformedDsn`] when the string does not match
    /// the `user[:password]@tcp(host[:port])/database` shape, the host is
    /// empty, or the port is not a valid non-zero TCP port.
    ///
    /// # Example
    /// ```rust
    /// use keyscout_core::security::Dsn;
    ///
    /// let dsn = Dsn::parse("root:secret@tcp(127.0.0.1:3306)/myapp")?;
    /// assert_eq!(dsn.user(), "root");
    /// assert_eq!(dsn.password(), "secret");
    /// assert_eq!(dsn.host, "127.0.0.1");
    /// assert_eq!(dsn.port, 3306);
    /// assert_eq!(dsn.database, "myapp");
    /// # Ok::<(), keyscout_core::KeyscoutError>(())
    /// ```
    pub fn parse(input: &str) -> crate::Result<Self> {
        let input = input.trim();
        let captures = dsn_pattern().captures(input).ok_or_else(|| {
            KeyscoutError::malformed(
                "unsupported MYSQL_DSN format, expected user[:password]@tcp(host[:port])/database",
            )
        })?;

        let user = captures["user"].to_string();
        let password = captures
            .name("password")
            .map(|m| m.as_str().to_string());
        let (host, port) = split_host_port(&captures["host"])?;

        Ok(Self {
            credentials: Credentials::new(user, password),
            host,
            port,
            database: captures["database"].to_string(),
        })
    }

    /// User name from the DSN.
    pub fn user(&self) -> &str {
        self.credentials.username()
    }

    /// Password from the DSN, empty when none was given.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Renders the DSN with the password masked, for logs and messages.
    ///
    /// ```rust
    /// use keyscout_core::security::Dsn;
    ///
    /// let dsn = Dsn::parse("app:hunter2@tcp(db:3307)/billing?parseTime=true")?;
    /// assert_eq!(dsn.to_safe_string(), "app:****@tcp(db:3307)/billing");
    /// # Ok::<(), keyscout_core::KeyscoutError>(())
    /// ```
    pub fn to_safe_string(&self) -> String {
        let secret = if self.credentials.has_password() {
            ":****"
        } else {
            ""
        };
        format!(
            "{}{}@tcp({})/{}",
            self.user(),
            secret,
            self.address(),
            self.database
        )
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Dsn {
    type Err = KeyscoutError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Debug for Dsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dsn")
            .field("credentials", &self.credentials)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

impl std::fmt::Display for Dsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_safe_string())
    }
}

/// Splits the `tcp(...)` address into host and port.
fn split_host_port(address: &str) -> crate::Result<(String, u16)> {
    let (host, port) = if let Some(rest) = address.strip_prefix('[') {
        // [v6] or [v6]:port
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| KeyscoutError::malformed("unterminated IPv6 address in tcp(...)"))?;
        match after {
            "" => (host, None),
            _ => match after.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => {
                    return Err(KeyscoutError::malformed(
                        "unexpected characters after IPv6 address in tcp(...)",
                    ));
                }
            },
        }
    } else {
        match address.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (address, None),
        }
    };

    if host.is_empty() {
        return Err(KeyscoutError::malformed("missing host in tcp(...)"));
    }

    let port = match port {
        None => DEFAULT_MYSQL_PORT,
        Some(raw) => match raw.parse::<u16>() {
            Ok(0) => {
                return Err(KeyscoutError::malformed(
                    "invalid port 0: must be greater than 0",
                ));
            }
            Ok(port) => port,
            Err(_) => {
                return Err(KeyscoutError::malformed(format!(
                    "invalid port {:?}: not a number in 1-65535",
                    raw
                )));
            }
        },
    };

    Ok((host.to_string(), port))
}
