use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobboard-bot")]
#[command(author, version, about = "Telegram job board bot", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server and the push worker
    Run {
        /// Override the configured HTTP port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply database migrations and exit
    Migrate,

    /// Add an entry to one of the attribute catalogs
    AddAttribute {
        /// Catalog: sector, type or education
        kind: String,

        /// Display name of the new entry
        name: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_port() {
        let cli = Cli::try_parse_from(["jobboard-bot", "--config", "bot.toml", "run", "--port", "9000"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bot.toml")));
        assert!(matches!(cli.command, Some(Commands::Run { port: Some(9000) })));
    }

    #[test]
    fn test_parse_add_attribute() {
        let cli = Cli::try_parse_from(["jobboard-bot", "add-attribute", "sector", "Information Technology"]).unwrap();
        match cli.command {
            Some(Commands::AddAttribute { kind, name }) => {
                assert_eq!(kind, "sector");
                assert_eq!(name, "Information Technology");
            }
            _ => panic!("expected add-attribute"),
        }
    }

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::try_parse_from(["jobboard-bot"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }
}
