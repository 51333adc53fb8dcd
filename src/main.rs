use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use telemed::models::RADIUS_PRESETS_KM;
use telemed::voice::{Stage, StdinCapture};
use telemed::{
    AnalysisReport, CancelToken, ProviderLocator, Specialization, SymptomMatcher, TelemedConfig,
    TelemedError, VoiceAnalysis, logging,
};
use tracing::warn;

#[derive(Parser)]
#[command(name = "telemed", version, about = "Symptom checker and nearby doctor search")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest conditions for a symptom description
    Analyze {
        /// Symptom description
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Describe symptoms on stdin as if dictated, then analyze them
    Listen {
        #[arg(long)]
        json: bool,
    },
    /// Home remedies for a condition
    Remedies { condition: String },
    /// Search for doctors near a location
    Doctors {
        #[arg(short, long)]
        location: String,
        #[arg(short, long)]
        specialization: Option<String>,
        /// Search radius in kilometers
        #[arg(short, long)]
        radius: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// List known specializations and radius presets
    Specializations,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", describe(&e));
        // exit here so a stdin read still parked on a blocking thread
        // does not hold the runtime open
        std::process::exit(1);
    }
}

/// User-facing text for a failed command
fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<TelemedError>() {
        Some(e) => e.user_message(),
        None => format!("{error:#}"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = TelemedConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    match cli.command {
        Command::Analyze { symptoms, json } => {
            let matcher = SymptomMatcher::from_config(&config.analysis)?;
            let report = matcher.analyze(&symptoms.join(" "));
            print_report(&report, json)?;
        }
        Command::Listen { json } => {
            let matcher = Arc::new(SymptomMatcher::from_config(&config.analysis)?);
            let workflow = VoiceAnalysis::new(Arc::new(StdinCapture), matcher, &config.voice)
                .with_observer(Arc::new(|stage: Stage| eprintln!("{}", stage.message())));

            let cancel = CancelToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            match workflow.run(&cancel).await {
                Ok(outcome) => {
                    eprintln!("Heard: {}", outcome.transcript.text);
                    print_report(&outcome.report, json)?;
                }
                Err(e) => bail!("{e}"),
            }
        }
        Command::Remedies { condition } => {
            let matcher = SymptomMatcher::from_config(&config.analysis)?;
            for remedy in matcher.remedies_for(&condition) {
                println!("- {remedy}");
            }
        }
        Command::Doctors {
            location,
            specialization,
            radius,
            json,
        } => {
            if location.trim().is_empty() {
                return Err(TelemedError::validation("Please enter a location").into());
            }
            let specialization =
                specialization.unwrap_or_else(|| config.defaults.specialization.clone());
            if specialization.parse::<Specialization>().is_err() {
                warn!(
                    specialization = %specialization,
                    "Unknown specialization, see `telemed specializations`"
                );
            }
            let radius = radius.unwrap_or(f64::from(config.defaults.search_radius_km));

            let locator = ProviderLocator::from_config(&config)
                .with_context(|| "Failed to set up doctor search")?;
            let providers = locator
                .search_nearby(&location, &specialization, radius)
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&providers)?);
            } else if providers.is_empty() {
                println!("No doctors found in your area");
            } else {
                for provider in &providers {
                    println!("{provider}");
                }
            }
        }
        Command::Specializations => {
            for spec in Specialization::ALL {
                println!("{spec}");
            }
            let presets: Vec<String> = RADIUS_PRESETS_KM.iter().map(|r| format!("{r}")).collect();
            println!("\nRadius presets (km): {}", presets.join(", "));
        }
    }

    Ok(())
}

fn print_report(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No matching conditions found. If symptoms persist, consult a doctor.");
        return Ok(());
    }

    println!("Analysis Results:\n");
    for suggestion in &report.suggestions {
        println!("{suggestion}");
    }
    Ok(())
}
