use clap::{Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Consent - inspect and change the stored cookie consent
#[derive(Debug, Parser)]
#[command(
    name = "consent",
    about = "Consent - inspect and change the stored cookie consent",
    version = VERSION,
    after_help = "\
EXAMPLES:
    consent status                          # Show the stored consent
    consent page-load                       # Run handlers for the stored consent
    consent accept --analytics              # Consent to analytics only
    consent accept --form menu.html         # Read choices from submitted markup
    consent accept-all                      # Consent to everything
    consent reset                           # Withdraw consent
    consent track sku-1 --sdk-loaded        # Record a product view with the CRM
"
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cookie database, overrides the configured path
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored consent and menu state
    Status,
    /// Simulate a page load
    PageLoad,
    /// Consent to the selected categories
    Accept {
        #[arg(long)]
        marketing: bool,
        #[arg(long)]
        analytics: bool,
        /// Page markup holding the consent checkboxes
        #[arg(long, value_name = "HTML", conflicts_with_all = ["marketing", "analytics"])]
        form: Option<PathBuf>,
    },
    /// Consent to every category
    AcceptAll,
    /// Clear the stored consent
    Reset,
    /// Track a product view with the CRM, if marketing consent allows it
    ///
    /// Views are queued until the page reports the CRM script has loaded.
    Track {
        #[arg(value_name = "PRODUCT_ID")]
        product_id: String,
        /// The CRM script finished loading; start the client first
        #[arg(long)]
        sdk_loaded: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from<I, T>(itr: I) -> Cli
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString>,
    {
        let iter = std::iter::once(std::ffi::OsString::from("consent"))
            .chain(itr.into_iter().map(Into::into));
        Cli::parse_from(iter)
    }

    #[test]
    fn parses_status() {
        let cli = parse_from(["status"]);
        assert!(matches!(cli.command, Command::Status));
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_accept_flags() {
        let cli = parse_from(["accept", "--analytics", "--db", "/tmp/c.db"]);
        match cli.command {
            Command::Accept {
                marketing,
                analytics,
                form,
            } => {
                assert!(!marketing);
                assert!(analytics);
                assert!(form.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/c.db")));
    }

    #[test]
    fn form_conflicts_with_flags() {
        let result = Cli::try_parse_from(["consent", "accept", "--form", "a.html", "--marketing"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_track() {
        let cli = parse_from(["track", "sku-1", "--sdk-loaded"]);
        match cli.command {
            Command::Track {
                product_id,
                sdk_loaded,
            } => {
                assert_eq!(product_id, "sku-1");
                assert!(sdk_loaded);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verifies_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
