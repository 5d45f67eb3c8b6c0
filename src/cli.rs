//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Command-line client for an electricity billing and monitoring backend.
#[derive(Debug, Parser)]
#[command(name = "wattline", version = wattline::build_info::cli_version_text())]
pub struct Args {
    /// Path to config file (default: ./wattline.toml or ~/.config/wattline/wattline.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override backend base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store session credentials.
    Login {
        /// Account mail address; prompted for when omitted.
        #[arg(long = "mail")]
        mail: Option<String>,
    },
    /// Sign out and clear stored credentials.
    Logout,
    /// Show the current account profile.
    Whoami,
    /// List bills for the account.
    Bills {
        /// Filter by bill month (YYYY-MM).
        #[arg(long = "month")]
        month: Option<String>,
        /// Filter by bill status.
        #[arg(long = "status")]
        status: Option<String>,
        /// Result page to fetch.
        #[arg(long = "page")]
        page: Option<u64>,
    },
    /// List meters visible to the account.
    Meters,
    /// List notifications.
    Notifications {
        /// Only unread entries.
        #[arg(long = "unread")]
        unread: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Args, Command};
    use clap::Parser;

    #[test]
    fn login_parses_optional_mail() {
        let args = Args::parse_from(["wattline", "login", "--mail", "a@b.cn"]);
        match args.command {
            Command::Login { mail } => assert_eq!(mail.as_deref(), Some("a@b.cn")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn base_url_override_applies_to_any_command() {
        let args = Args::parse_from(["wattline", "--base-url", "http://test", "whoami"]);
        assert_eq!(args.base_url.as_deref(), Some("http://test"));
        assert!(matches!(args.command, Command::Whoami));
    }

    #[test]
    fn bills_filters_parse() {
        let args = Args::parse_from(["wattline", "bills", "--month", "2026-08", "--page", "2"]);
        match args.command {
            Command::Bills { month, status, page } => {
                assert_eq!(month.as_deref(), Some("2026-08"));
                assert!(status.is_none());
                assert_eq!(page, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
