//! MySQL credential-table inspector.
//!
//! Reads a `user[:password]@tcp(host[:port])/database` DSN from `MYSQL_DSN`
//! (or `--dsn`), lists databases and tables, and prints the columns of every
//! table whose name hints at API channels, providers or keys.
//!
//! # Exit Status
//! - `0` inspection completed
//! - `1` missing or malformed DSN, or any connection/query failure
//! - `2` built without a database driver

use clap::{Args, Parser, error::ErrorKind};
use keyscout_core::{Dsn, KeyscoutError, Result, error::EXIT_FAILURE, init_logging, report};
use std::ffi::{OsStr, OsString};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "keyscout")]
#[command(about = "Lists MySQL databases and tables and flags likely credential tables")]
#[command(version)]
#[command(long_about = "
keyscout - read-only MySQL schema diagnostic

Connects with a DSN of the form user[:password]@tcp(host[:port])/database,
lists every visible database and the tables of the selected one, and prints
column names and types for tables whose names contain one of:
api, center, channel, provider, key, credential.

EXAMPLES:
  MYSQL_DSN='root:secret@tcp(127.0.0.1:3306)/myapp' keyscout
  keyscout --dsn 'root@tcp(db)/myapp' -v

--dsn takes precedence over MYSQL_DSN when both are set.
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// MySQL DSN
    #[arg(
        long,
        env = "MYSQL_DSN",
        hide_env_values = true,
        help = "user[:password]@tcp(host[:port])/database (password is masked in logs)"
    )]
    pub dsn: Option<OsString>,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

/// Turns the raw flag/environment value into a parsed DSN.
fn resolve_dsn(raw: Option<&OsStr>) -> Result<Dsn> {
    let raw = raw
        .map(|value| {
            value
                .to_str()
                .ok_or_else(|| KeyscoutError::malformed("MYSQL_DSN is not valid UTF-8"))
        })
        .transpose()?;

    match raw.map(str::trim) {
        None | Some("") => Err(KeyscoutError::MissingDsn),
        Some(value) => Dsn::parse(value),
    }
}

/// Formats an error followed by its source chain.
fn describe(error: &KeyscoutError) -> String {
    use std::error::Error as _;

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

async fn inspect(cli: &Cli) -> Result<()> {
    let dsn = resolve_dsn(cli.dsn.as_deref())?;
    info!("Inspecting {}", dsn);

    let inspection = keyscout_core::run(&dsn).await?;
    debug!(
        "Inspection finished: {} databases, {} tables, {} suspect tables",
        inspection.databases.len(),
        inspection.tables.len(),
        inspection.suspects.len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render(&inspection, &mut out)?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE),
            };
        }
    };

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", describe(&e));
        return ExitCode::from(e.exit_code());
    }

    match inspect(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", describe(&e));
            if let KeyscoutError::DriverUnavailable { driver } = &e {
                eprintln!("install: cargo install keyscout --features {}", driver);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dsn_missing() {
        assert!(matches!(resolve_dsn(None), Err(KeyscoutError::MissingDsn)));
        assert!(matches!(
            resolve_dsn(Some(OsStr::new("   "))),
            Err(KeyscoutError::MissingDsn)
        ));
    }

    #[test]
    fn test_resolve_dsn_malformed() {
        let error = resolve_dsn(Some(OsStr::new("localhost:3306"))).unwrap_err();
        assert!(matches!(error, KeyscoutError::MalformedDsn { .. }));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_resolve_dsn_trims_value() {
        let dsn = resolve_dsn(Some(OsStr::new(" root@tcp(db)/myapp "))).unwrap();
        assert_eq!(dsn.database, "myapp");
        assert_eq!(dsn.port, 3306);
    }

    #[test]
    fn test_dsn_read_from_environment() {
        temp_env::with_var(
            "MYSQL_DSN",
            Some("root:secret@tcp(127.0.0.1:3306)/myapp"),
            || {
                let cli = Cli::try_parse_from(["keyscout"]).unwrap();
                assert_eq!(
                    cli.dsn.as_deref(),
                    Some(OsStr::new("root:secret@tcp(127.0.0.1:3306)/myapp"))
                );
            },
        );
    }

    #[test]
    fn test_dsn_flag_overrides_environment() {
        temp_env::with_var("MYSQL_DSN", Some("env@tcp(a)/one"), || {
            let cli = Cli::try_parse_from(["keyscout", "--dsn", "flag@tcp(b)/two"]).unwrap();
            assert_eq!(cli.dsn.as_deref(), Some(OsStr::new("flag@tcp(b)/two")));
        });
    }

    #[test]
    fn test_dsn_absent() {
        temp_env::with_var_unset("MYSQL_DSN", || {
            let cli = Cli::try_parse_from(["keyscout", "-vv"]).unwrap();
            assert!(cli.dsn.is_none());
            assert_eq!(cli.global.verbose, 2);
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_dsn_rejects_non_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"root:\xff@tcp(db)/app");
        let error = resolve_dsn(Some(raw)).unwrap_err();
        assert!(matches!(error, KeyscoutError::MalformedDsn { .. }));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_unknown_flag_is_a_usage_error() {
        let error = Cli::try_parse_from(["keyscout", "--bogus"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_describe_includes_source_chain() {
        let error = KeyscoutError::connection_failed(
            "connect to db:3306",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
        );
        assert_eq!(
            describe(&error),
            "Database connection failed: connect to db:3306: connection refused"
        );
    }
}
