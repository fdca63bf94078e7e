use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use contexta_scaffold::{generate_all, load_services, FileOutcome, DEFAULT_INPUT, OUTPUT_DIR};

#[derive(Parser)]
#[command(name = "contexta-scaffold")]
#[command(about = "Create layered folder stubs for each microservice in a JSON file")]
struct Cli {
    /// JSON array of services, or an object with a `microservices` array
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let services = match load_services(&cli.input) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let out_dir = match std::env::current_dir().context("resolving current directory") {
        Ok(cwd) => cwd.join(OUTPUT_DIR),
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match generate_all(&out_dir, &services) {
        Ok(outcomes) => {
            let created = outcomes
                .iter()
                .filter(|o| matches!(o, FileOutcome::Created(_)))
                .count();
            tracing::info!(
                services = services.len(),
                created,
                skipped = outcomes.len() - created,
                "done"
            );
            println!("Done. Created services in {}", out_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
