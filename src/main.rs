mod api;
mod commands;
mod config;
mod credentials;
mod editor;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::config::Config;
use crate::credentials::CredentialStore;

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(about = "Terminal workbench for versioned system prompts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the access token locally
    Login {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage prompts
    Prompts {
        #[command(subcommand)]
        command: PromptsCommand,
    },
    /// Print a prompt's version history
    Versions { prompt_id: i64 },
    /// Manage a prompt's test cases
    Tests {
        #[command(subcommand)]
        command: TestsCommand,
    },
    /// Append a new version from a file or stdin
    Save {
        prompt_id: i64,
        /// Read the prompt text from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run test cases against the current version or a draft file
    Run {
        prompt_id: i64,
        /// Run this draft file instead of the current version
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Open the interactive editor (the default when no command is given)
    Tui {
        /// Open this prompt directly instead of the prompt list
        #[arg(long)]
        prompt: Option<i64>,
    },
}

#[derive(Subcommand)]
enum PromptsCommand {
    /// List all prompts
    List,
    /// Create a prompt
    Create { name: String },
    /// Rename a prompt
    Rename { prompt_id: i64, new_name: String },
    /// Delete a prompt and all its versions
    Delete {
        prompt_id: i64,
        /// Skip the confirmation question
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TestsCommand {
    /// List a prompt's test cases
    List { prompt_id: i64 },
    /// Add a test case
    Add { prompt_id: i64, message: String },
    /// Delete a test case
    Rm { test_case_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui { prompt: None });

    let config = Config::from_env();
    let store = CredentialStore::new(&config.data_dir);

    init_tracing(&config, matches!(command, Command::Tui { .. }))?;

    // An explicit env token wins over the stored credential.
    let token = config.token_override.clone().or_else(|| store.load());
    let api = ApiClient::new(&config.api_url, token)?;

    match command {
        Command::Login { username, password } => {
            commands::login(&api, &store, &username, password).await
        }
        Command::Register {
            username,
            email,
            full_name,
            password,
        } => commands::register(&api, &store, username, full_name, email, password).await,
        Command::Logout => commands::logout(&store),
        Command::Whoami => commands::whoami(&api).await,
        Command::Prompts { command } => match command {
            PromptsCommand::List => commands::list_prompts(&api).await,
            PromptsCommand::Create { name } => commands::create_prompt(&api, &name).await,
            PromptsCommand::Rename {
                prompt_id,
                new_name,
            } => commands::rename_prompt(&api, prompt_id, &new_name).await,
            PromptsCommand::Delete { prompt_id, yes } => {
                commands::delete_prompt(&api, prompt_id, yes).await
            }
        },
        Command::Versions { prompt_id } => commands::list_versions(&api, prompt_id).await,
        Command::Tests { command } => match command {
            TestsCommand::List { prompt_id } => commands::list_test_cases(&api, prompt_id).await,
            TestsCommand::Add { prompt_id, message } => {
                commands::add_test_case(&api, prompt_id, &message).await
            }
            TestsCommand::Rm { test_case_id } => commands::remove_test_case(&api, test_case_id).await,
        },
        Command::Save { prompt_id, file } => {
            commands::save_version(&api, prompt_id, file.as_deref()).await
        }
        Command::Run { prompt_id, file } => commands::run(&api, prompt_id, file.as_deref()).await,
        Command::Tui { prompt } => tui::run(Arc::new(api), prompt).await,
    }
}

/// CLI commands log to stderr; the TUI owns the terminal, so its logs go to
/// a file in the data directory instead.
fn init_tracing(config: &Config, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("promptdeck=info"));

    if tui {
        std::fs::create_dir_all(&config.data_dir)?;
        let log = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.data_dir.join("promptdeck.log"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(log))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
