use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::{
    app::{init_config, Config, Preferences},
    consent::{ConsentRecord, ConsentStatus},
    constants::{SESSION_EXPIRED_MESSAGE, SESSION_EXPIRED_TITLE},
    gate::{resolve_screen, GateInputs, Screen, SessionFlags},
    runtime::{Console, Simulation, SimulationScript},
};

use super::{Cli, Commands, ConsentArgs, OutputFormat, ResolveArgs};

/// Handle CLI subcommands
pub async fn handle_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Resolve(args) => {
            println!("{}", render_resolution(&resolve(args), cli.output_format)?);
        }
        Commands::Consent(args) => {
            println!("{}", render_consent(&check_consent(args)?, cli.output_format)?);
        }
        Commands::Simulate { script } => {
            let script = SimulationScript::from_file(script)
                .with_context(|| format!("Failed to load script {}", script.display()))?;
            let report = Simulation::run(&script).await;
            println!("{}", report.format(cli.output_format));
        }
        Commands::Console => {
            let prefs = Preferences::load().unwrap_or_default();
            let (console, views) = Console::new(config, &prefs);
            console.run(views).await?;
        }
        Commands::Biometrics { enable, disable } => {
            let mut prefs = Preferences::load()?;
            if *enable || *disable {
                prefs.set_biometric_enabled(*enable);
                prefs.save()?;
            }
            let enabled = prefs.biometric_enabled_or(config.biometric.enabled_by_default);
            println!(
                "Biometric unlock: {}",
                if enabled { "enabled".green() } else { "disabled".yellow() }
            );
        }
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration ready at: {}", path.display());
        }
        Commands::Version => show_version(),
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("SkinGate v{}", env!("CARGO_PKG_VERSION"));
    println!("   Unlock, consent and session-timeout gating for SkinInsight Pro");
}

#[derive(Debug, Serialize)]
pub struct Resolution {
    pub inputs: GateInputs,
    pub screen: Screen,
    pub session_expired: bool,
}

/// Resolve the screen for a hand-specified snapshot, as a launch trigger would
pub fn resolve(args: &ResolveArgs) -> Resolution {
    let mut flags = SessionFlags::default();
    flags.recompute_biometric_requirement(args.biometric_enabled, !args.no_hardware, args.guest);
    if args.biometric_passed {
        flags.mark_passed();
    }

    let inputs = GateInputs {
        is_loading: args.loading,
        is_authenticated: args.authenticated,
        requires_biometric_auth: flags.requires_biometric_auth(),
        biometric_auth_passed: flags.biometric_auth_passed(),
        has_user_consented: args.consented,
        needs_profile_completion: args.needs_profile,
        needs_company_setup: args.needs_company_setup,
    };

    Resolution {
        screen: resolve_screen(&inputs),
        inputs,
        session_expired: args.session_expired,
    }
}

fn render_resolution(resolution: &Resolution, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(resolution)?,
        OutputFormat::Text => {
            let mut output = format!("Screen: {}", resolution.screen.to_string().cyan());
            if resolution.session_expired {
                output.push_str(&format!(
                    "\n{}: {}",
                    SESSION_EXPIRED_TITLE.red(),
                    SESSION_EXPIRED_MESSAGE
                ));
            }
            output
        }
        OutputFormat::Markdown => format!(
            "**Screen:** {}{}",
            resolution.screen,
            if resolution.session_expired { " _(session expired overlay)_" } else { "" }
        ),
    })
}

#[derive(Debug, Serialize)]
pub struct ConsentCheck {
    pub status: ConsentStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub evaluated_at: DateTime<Utc>,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("'{}' is not an ISO-8601 timestamp", raw))?
        .with_timezone(&Utc))
}

pub fn check_consent(args: &ConsentArgs) -> Result<ConsentCheck> {
    let evaluated_at = match &args.now {
        Some(raw) => parse_instant(raw)?,
        None => Utc::now(),
    };
    let record = ConsentRecord {
        consent_date: args.signed_at.clone(),
        consent_signature: args.signature.clone(),
    };

    Ok(ConsentCheck {
        status: record.status_at(evaluated_at),
        expires_at: record.expiration_date(),
        evaluated_at,
    })
}

fn render_consent(check: &ConsentCheck, format: OutputFormat) -> Result<String> {
    let expiry = check
        .expires_at
        .map(|date| date.to_rfc3339())
        .unwrap_or_else(|| "n/a".to_string());

    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(check)?,
        OutputFormat::Text => {
            let status = match check.status {
                ConsentStatus::Valid => check.status.display_text().green(),
                ConsentStatus::Expired => check.status.display_text().yellow(),
                ConsentStatus::Missing => check.status.display_text().red(),
            };
            format!("{}\nExpires: {}", status, expiry)
        }
        OutputFormat::Markdown => {
            format!("**{}**  \nExpires: `{}`", check.status.display_text(), expiry)
        }
    })
}
