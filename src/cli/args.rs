//! Command-line argument parsing for the chatmod binary.

use std::path::PathBuf;

pub const USAGE: &str = "\
Usage:
  chatmod [--config <path>] replay <script.json>
  chatmod [--config <path>] --print-config
  chatmod --version";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Print the resolved settings as JSON
    PrintConfig,
    /// Feed a recorded input script through the click disambiguator
    Replay(PathBuf),
    /// Show usage
    Help,
    /// Arguments could not be understood
    Invalid(String),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Settings file given with `--config`
    pub config: Option<PathBuf>,
    pub command: CliCommand,
}

/// Parse command-line arguments.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use chatmod::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatmod".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliArgs
where
    I: Iterator<Item = String>,
{
    let mut config = None;
    let mut command = None;
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let parsed = match arg.as_str() {
            "--version" | "-V" => CliCommand::Version,
            "--help" | "-h" => CliCommand::Help,
            "--print-config" => CliCommand::PrintConfig,
            "--config" | "-c" => match args.next() {
                Some(path) => {
                    config = Some(PathBuf::from(path));
                    continue;
                }
                None => CliCommand::Invalid("--config needs a path".to_string()),
            },
            "replay" => match args.next() {
                Some(path) => CliCommand::Replay(PathBuf::from(path)),
                None => CliCommand::Invalid("replay needs a script path".to_string()),
            },
            other => CliCommand::Invalid(format!("unexpected argument: {}", other)),
        };

        if matches!(parsed, CliCommand::Invalid(_)) {
            command = Some(parsed);
            break;
        }
        if command.is_some() {
            command = Some(CliCommand::Invalid("more than one command given".to_string()));
            break;
        }
        command = Some(parsed);
    }

    CliArgs {
        config,
        command: command.unwrap_or(CliCommand::Help),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let args: Vec<String> = std::iter::once("chatmod")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]).command, CliCommand::Version);
        assert_eq!(parse(&["-V"]).command, CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args_is_help() {
        assert_eq!(parse(&[]).command, CliCommand::Help);
    }

    #[test]
    fn test_parse_replay_with_config() {
        let args = parse(&["--config", "/tmp/s.json", "replay", "script.json"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(
            args.command,
            CliCommand::Replay(PathBuf::from("script.json"))
        );
    }

    #[test]
    fn test_parse_config_after_command() {
        let args = parse(&["--print-config", "-c", "a.json"]);
        assert_eq!(args.command, CliCommand::PrintConfig);
        assert_eq!(args.config, Some(PathBuf::from("a.json")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(&["replay"]).command, CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--config"]).command, CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--bogus"]).command, CliCommand::Invalid(_)));
        assert!(matches!(
            parse(&["--version", "--print-config"]).command,
            CliCommand::Invalid(_)
        ));
    }
}
