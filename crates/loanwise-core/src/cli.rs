use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loanwise", version, about = "Loan eligibility prediction from applicant details")]
pub struct Args {
    /// Trained model artifact: ONNX, or a `.json` parameter file.
    #[arg(long, global = true, env = "LOANWISE_MODEL_PATH")]
    pub model: Option<PathBuf>,
    /// TOML configuration file; `loanwise.toml` is picked up when present.
    #[arg(long, global = true, env = "LOANWISE_CONFIG")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Fill in an application interactively.
    Form,
    /// Predict eligibility for an application stored as TOML or JSON.
    Predict {
        application: PathBuf,
        #[arg(long, default_value_t = false)]
        show_features: bool,
    },
    /// Show model status and the feature layout.
    Info,
}

impl Args {
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Form)
    }
}
