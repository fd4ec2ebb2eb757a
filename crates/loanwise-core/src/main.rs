use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use loanwise_eligibility::{EligibilityPredictor, ModelProvider, RawApplication};

mod cli;
mod config;
mod form;
mod report;

use cli::{Args, Command};
use config::{FileConfig, Settings};

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let log_env = std::env::var(config::LOG_ENV).ok();

    let file_config = match FileConfig::discover(
        args.config.as_deref(),
        Path::new(config::DEFAULT_CONFIG_FILE),
    ) {
        Ok(file_config) => file_config,
        Err(error) => {
            // No file settings to honour; log with env or default filter.
            let fallback = Settings::resolve(None, log_env, FileConfig::default());
            init_tracing(&fallback.log_filter);
            tracing::error!(error = %format!("{error:#}"), "configuration rejected");
            return Err(error);
        }
    };
    let settings = Settings::resolve(args.model.clone(), log_env, file_config);
    init_tracing(&settings.log_filter);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        model_path = %settings.model_path.display(),
        "Loanwise starting"
    );

    let provider = ModelProvider::load_or_unavailable(&settings.model_path);
    let predictor = EligibilityPredictor::new(provider);

    match args.selected_command() {
        Command::Form => run_form(&predictor),
        Command::Predict {
            application,
            show_features,
        } => predict_file(&predictor, application, show_features),
        Command::Info => show_info(&predictor),
    }
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_form(predictor: &EligibilityPredictor) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut form = form::Form::new(stdin.lock(), io::stdout().lock());
    let submitted = form.run(predictor)?;
    tracing::info!(submitted, "form session finished");
    Ok(ExitCode::SUCCESS)
}

fn predict_file(
    predictor: &EligibilityPredictor,
    path: PathBuf,
    show_features: bool,
) -> Result<ExitCode> {
    eprintln!("{}", report::startup_banner(predictor.provider()));

    let raw = read_application(&path)?;
    tracing::info!(path = ?path, "predicting application file");

    let mut stdout = io::stdout().lock();
    match predictor.predict_raw(&raw) {
        Ok(prediction) => {
            if show_features {
                report::write_features(&mut stdout, &prediction.features)?;
            }
            writeln!(stdout, "{}", report::verdict_message(prediction.verdict))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::warn!(error = %error, "no verdict for application file");
            writeln!(stdout, "{}", report::error_message(&error))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn show_info(predictor: &EligibilityPredictor) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    report::write_info(&mut stdout, predictor.provider())?;
    if predictor.provider().is_available() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn read_application(path: &Path) -> Result<RawApplication> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read application {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => toml::from_str(&source)
            .with_context(|| format!("invalid application file {}", path.display())),
        Some("json") => serde_json::from_str(&source)
            .with_context(|| format!("invalid application file {}", path.display())),
        _ => bail!(
            "unsupported application file {}; expected a .toml or .json extension",
            path.display()
        ),
    }
}
