/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{Cli, Commands, ConsentArgs, OutputFormat, ResolveArgs};
pub use commands::{check_consent, handle_command, resolve, show_version, ConsentCheck, Resolution};
