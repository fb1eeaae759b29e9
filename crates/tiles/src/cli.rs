//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drive the tiles app over OSC
#[derive(Parser, Debug)]
#[command(name = "tiles")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// IPv4 address of the tiles app (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port the tiles app receives on (overrides the config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Local port to bind (0 = ephemeral; defaults to the receiving port)
    #[arg(long)]
    pub local_port: Option<u16>,

    /// Template variable, e.g. `--var custom:speaker=Alice` (repeatable)
    #[arg(long = "var", value_name = "NAMESPACE:NAME=VALUE")]
    pub vars: Vec<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a single action given as JSON, e.g. '{"action":"startPMI"}'
    Send {
        /// Action JSON
        action: String,
    },
    /// Read JSON actions from stdin, one per line, until EOF or Ctrl-C
    Run,
    /// Print the action catalog
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send() {
        let args = Args::try_parse_from([
            "tiles",
            "--host",
            "10.1.1.2",
            "--var",
            "custom:a=1",
            "--var",
            "custom:b=2",
            "send",
            r#"{"action":"startIM"}"#,
        ])
        .unwrap();

        assert_eq!(args.host.as_deref(), Some("10.1.1.2"));
        assert_eq!(args.vars.len(), 2);
        assert!(matches!(args.command, Commands::Send { .. }));
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Args::try_parse_from(["tiles"]).is_err());
    }
}
