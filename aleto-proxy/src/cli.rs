use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "aleto-proxy", version, about = "Prediction relay for the Aleto plugin")]
pub struct CliArgs {
    /// Path to configuration file (.toml, .yaml or .json)
    #[arg(short = 'c', long = "config-path", env = "ALETO_CONFIG_PATH")]
    pub config_path: Option<String>,
}
