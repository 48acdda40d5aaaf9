use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skingate")]
#[command(version)]
#[command(about = "Unlock and consent gating for the SkinInsight Pro clinic app", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the active screen for a set of inputs
    Resolve(ResolveArgs),
    /// Check a consent record against the validity window
    Consent(ConsentArgs),
    /// Replay a TOML event script through the gate
    Simulate {
        /// Script file
        script: PathBuf,
    },
    /// Drive the gate interactively from stdin
    Console,
    /// Show or change the saved biometric unlock preference
    Biometrics {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
    },
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Stored session still being restored
    #[arg(long)]
    pub loading: bool,
    #[arg(long)]
    pub authenticated: bool,
    #[arg(long)]
    pub guest: bool,
    /// Biometric unlock turned on in settings
    #[arg(long)]
    pub biometric_enabled: bool,
    /// Device has no usable biometric sensor
    #[arg(long)]
    pub no_hardware: bool,
    /// Biometric challenge already passed this session
    #[arg(long)]
    pub biometric_passed: bool,
    #[arg(long)]
    pub consented: bool,
    #[arg(long)]
    pub needs_profile: bool,
    #[arg(long)]
    pub needs_company_setup: bool,
    #[arg(long)]
    pub session_expired: bool,
}

#[derive(Args, Debug)]
pub struct ConsentArgs {
    /// ISO-8601 signature timestamp
    #[arg(long)]
    pub signed_at: Option<String>,
    #[arg(long)]
    pub signature: Option<String>,
    /// Evaluate at this ISO-8601 time instead of now
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
