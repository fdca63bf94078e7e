//! `contexta`: turn use-case text into a DDD domain model and render it.

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use contexta_core::settings;
use contexta_suggest::{generate, DomainDescriptionRequest, GeminiTransport, PromptVariant};

use output::Format;

#[derive(Parser)]
#[command(name = "contexta")]
#[command(about = "Generate bounded contexts, aggregates and context maps from use cases")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send use cases to Gemini and render the returned model
    Generate {
        /// Use-case text; read from --input or stdin when omitted
        text: Option<String>,
        /// Read use cases from a file
        #[arg(long, short, conflicts_with = "text")]
        input: Option<PathBuf>,
        /// Ask only for the core model (no context map or components)
        #[arg(long)]
        core: bool,
        /// Save the generated model as JSON
        #[arg(long)]
        save: Option<PathBuf>,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render a previously saved model
    Render {
        model_file: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Print the response schema sent to the model
    Schema {
        /// Print a standard JSON Schema of the domain model instead
        #[arg(long)]
        json_schema: bool,
    },

    /// Show or change AI settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct RenderArgs {
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Write one SVG per diagram into this directory
    #[arg(long)]
    svg_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print settings with the API key masked
    Show,
    /// Update settings; omitted fields keep their current value
    Set {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate {
            text,
            input,
            core,
            save,
            render,
        } => run_generate(text, input.as_deref(), core, save.as_deref(), &render).await,
        Command::Render { model_file, render } => run_render(&model_file, &render),
        Command::Schema { json_schema } => run_schema(json_schema),
        Command::Config { action } => run_config(action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn read_use_cases(text: Option<String>, input: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = input {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading use cases from {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading use cases from stdin")?;
    Ok(buf)
}

async fn run_generate(
    text: Option<String>,
    input: Option<&Path>,
    core: bool,
    save: Option<&Path>,
    render: &RenderArgs,
) -> Result<()> {
    let use_cases = read_use_cases(text, input)?;
    let request = DomainDescriptionRequest::new(use_cases)?;

    let settings = settings::load_settings();
    if !settings::ai_configured(&settings) {
        bail!(
            "no API key configured; set {} or run `contexta config set --api-key <KEY>`",
            settings::ENV_API_KEY
        );
    }
    tracing::debug!(url = %settings.redacted_url(), "using Gemini endpoint");

    let variant = if core {
        PromptVariant::Core
    } else {
        PromptVariant::Extended
    };
    let transport = GeminiTransport::new(settings)?;
    let model = generate(&transport, &request, variant).await?;

    if let Some(path) = save {
        contexta_core::write_model_file(path, &model)?;
        tracing::info!(path = %path.display(), "model saved");
    }
    output::emit(&model, render.format, render.svg_dir.as_deref())
}

fn run_render(model_file: &Path, render: &RenderArgs) -> Result<()> {
    let model = contexta_core::read_model_file(model_file)?;
    output::emit(&model, render.format, render.svg_dir.as_deref())
}

fn run_schema(json_schema: bool) -> Result<()> {
    let text = if json_schema {
        serde_json::to_string_pretty(&contexta_core::schema::domain_model_json_schema())?
    } else {
        serde_json::to_string_pretty(contexta_core::schema::response_schema())?
    };
    println!("{text}");
    Ok(())
}

/// Settings as shown to the user; the key itself never leaves the file.
fn masked(settings: &contexta_core::AiSettings) -> serde_json::Value {
    serde_json::json!({
        "model": settings.model,
        "endpoint": settings.endpoint,
        "hasKey": !settings.api_key.is_empty(),
        "configured": settings::ai_configured(settings),
    })
}

fn apply_changes(
    mut current: contexta_core::AiSettings,
    api_key: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
) -> contexta_core::AiSettings {
    // An empty key keeps the stored one
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        current.api_key = key;
    }
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        current.model = model;
    }
    if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
        current.endpoint = endpoint.trim_end_matches('/').to_string();
    }
    current
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let effective = settings::load_settings();
            let mut shown = masked(&effective);
            shown["path"] = settings::settings_path().display().to_string().into();
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        ConfigAction::Set {
            api_key,
            model,
            endpoint,
        } => {
            let updated = apply_changes(settings::read_settings(), api_key, model, endpoint);
            settings::write_settings(&updated)?;
            tracing::info!(path = %settings::settings_path().display(), "settings saved");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contexta_core::AiSettings;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn text_argument_conflicts_with_input_file() {
        let parsed = Cli::try_parse_from(["contexta", "generate", "Register users", "--input", "x.txt"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn use_cases_come_from_text_then_file() {
        assert_eq!(read_use_cases(Some("inline".into()), None).unwrap(), "inline");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.txt");
        std::fs::write(&path, "Customers place orders").unwrap();
        assert_eq!(read_use_cases(None, Some(&path)).unwrap(), "Customers place orders");
        assert!(read_use_cases(None, Some(&dir.path().join("missing.txt"))).is_err());
    }

    #[test]
    fn masked_settings_hide_the_key() {
        let settings = AiSettings {
            api_key: "secret".into(),
            ..AiSettings::default()
        };
        let shown = masked(&settings);
        assert_eq!(shown["hasKey"], true);
        assert!(!shown.to_string().contains("secret"));
    }

    #[test]
    fn empty_key_keeps_the_stored_one() {
        let current = AiSettings {
            api_key: "stored".into(),
            ..AiSettings::default()
        };
        let updated = apply_changes(
            current,
            Some(String::new()),
            Some("gemini-pro".into()),
            Some("http://localhost:8080/v1beta/".into()),
        );
        assert_eq!(updated.api_key, "stored");
        assert_eq!(updated.model, "gemini-pro");
        assert_eq!(updated.endpoint, "http://localhost:8080/v1beta");
    }
}
