//! Pictor CLI - generate images from prompts and look up their attribution.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AboutCommand, AttributionCommand, ConfigCommand, GenerateCommand, SessionCommand};

/// Pictor CLI - turn prompts into pictures.
///
/// Type a prompt to get a set of generated images, or paste an image URL to
/// inspect an existing picture. Any image can be checked against the
/// attribution service for likely artist matches.
///
/// Configuration is stored in ~/.pictor/ and supports multiple contexts,
/// similar to kubectl's context management. PICTOR_API_KEY (or
/// OPENAI_API_KEY), PICTOR_BASE_URL, PICTOR_ATTRIBUTION_URL and
/// PICTOR_APP_NAME override the selected context.
#[derive(Parser)]
#[command(name = "pictor")]
#[command(about = "Prompt-to-image CLI with artist attribution")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.pictor/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON, `-` for stdin)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Generate images from a prompt, or pass an image URL through
    Generate(GenerateCommand),
    /// Look up artist attribution for an image URL
    Attribution(AttributionCommand),
    /// Interactive search session
    Session(SessionCommand),
    /// Show information about the application
    About(AboutCommand),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Generate(cmd) => cmd.run(&cli).await,
        Commands::Attribution(cmd) => cmd.run(&cli).await,
        Commands::Session(cmd) => cmd.run(&cli).await,
        Commands::About(cmd) => cmd.run(&cli).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "pictor", "--json", "generate", "--n", "2", "a", "cat", "astronaut",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Generate(cmd) => {
                assert_eq!(cmd.input(), "a cat astronaut");
                assert_eq!(cmd.count, Some(2));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_generate_flags_after_words() {
        let cli = Cli::try_parse_from([
            "pictor", "generate", "a", "cat", "--n", "2", "--size", "256x256", "--json", "-v",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate(cmd) => {
                assert_eq!(cmd.input(), "a cat");
                assert_eq!(cmd.count, Some(2));
                assert_eq!(cmd.size.as_deref(), Some("256x256"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_generate_literal_dash_words() {
        let cli = Cli::try_parse_from(["pictor", "generate", "--", "a", "-v", "sign"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Generate(cmd) => assert_eq!(cmd.input(), "a -v sign"),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pictor",
            "attribution",
            "https://example.com/x.png",
            "-c",
            "work",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.context.as_deref(), Some("work"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_attribution_requires_url() {
        assert!(Cli::try_parse_from(["pictor", "attribution"]).is_err());
    }
}
