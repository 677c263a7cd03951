//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use dynvar_domain::OnUnresolved;

/// Render an agent's templated fields for one conversation session.
///
/// Without `--tool`, renders the system prompt and first message. With one or
/// more `--tool` flags, renders those tools' parameters instead.
#[derive(Parser, Debug)]
#[command(name = "dynvar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Session config file (.json, .yaml or .yml)
    #[arg(short, long, value_name = "PATH", env = "DYNVAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the unresolved placeholder policy from the config file
    #[arg(long, value_name = "fail|passthrough")]
    pub on_unresolved: Option<OnUnresolved>,

    /// Render the parameters of this tool (repeatable)
    #[arg(short, long = "tool", value_name = "NAME")]
    pub tools: Vec<String>,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    pub json: bool,

    /// List the system variables and exit
    #[arg(long)]
    pub list_system: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from([
            "dynvar",
            "--config",
            "session.yaml",
            "--on-unresolved",
            "Passthrough",
            "-t",
            "lookup",
            "--tool",
            "notify",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("session.yaml")));
        assert_eq!(cli.on_unresolved, Some(OnUnresolved::Passthrough));
        assert_eq!(cli.tools, ["lookup", "notify"]);
        assert!(cli.json);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = Cli::try_parse_from(["dynvar", "--on-unresolved", "ignore"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
