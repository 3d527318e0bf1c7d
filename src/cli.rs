use clap::{Parser, Subcommand};
use shelver_config::Overrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelver", version, about = "Shelves books arriving in an inbox into a categorised library")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON, by extension).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch for arrivals.
    #[arg(long, global = true, value_name = "PATH")]
    pub inbox: Option<PathBuf>,

    /// Root of the categorised library.
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Seconds to leave an arrival alone before shelving it.
    #[arg(long, global = true, value_name = "SECS")]
    pub delay: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}
impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides { inbox: self.inbox.clone(), library: self.library.clone(), delay_secs: self.delay }
    }
}

#[derive(Subcommand, Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    /// Shelve what is already in the inbox, then watch for new arrivals.
    #[default]
    Watch,
    /// Shelve what is already in the inbox and exit.
    Once,
    /// Print the metadata, category and destination for one file without
    /// moving it.
    Inspect {
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_is_default() {
        let cli = Cli::try_parse_from(["shelver"]).unwrap();
        assert_eq!(cli.command.clone().unwrap_or_default(), Command::Watch);
        assert!(cli.overrides().inbox.is_none());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from(["shelver", "once", "--inbox", "/srv/inbox", "--delay", "5"]).unwrap();
        assert_eq!(cli.command, Some(Command::Once));
        let overrides = cli.overrides();
        assert_eq!(overrides.inbox.as_deref(), Some(Path::new("/srv/inbox")));
        assert_eq!(overrides.delay_secs, Some(5));
        assert!(overrides.library.is_none());
    }

    #[test]
    fn test_inspect_requires_file() {
        assert!(Cli::try_parse_from(["shelver", "inspect"]).is_err());
        let cli = Cli::try_parse_from(["shelver", "-c", "shelver.toml", "inspect", "book.epub"]).unwrap();
        assert_eq!(cli.command, Some(Command::Inspect { file: PathBuf::from("book.epub") }));
        assert_eq!(cli.config.as_deref(), Some(Path::new("shelver.toml")));
    }
}
