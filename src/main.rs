use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;

use candidash::api::{ApiClient, TokenStore};
use candidash::app::App;
use candidash::config::Config;
use candidash::logging;
use candidash::wizard::session::session_key;
use candidash::wizard::storage::{FileStorage, WizardStorage};

#[derive(Parser)]
#[command(name = "candidash")]
#[command(about = "Terminal dashboard for tracking job applications")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the API token
    Login {
        /// Account email
        email: String,
    },

    /// Remove the stored API token
    Logout,

    /// Show the account the stored token belongs to
    Whoami,

    /// Delete the locally stored wizard draft
    ResetWizard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // No subcommand = TUI mode, which logs to file instead of stderr
    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Login { email }) => {
            cmd_login(&config, &email).await?;
        }
        Some(Commands::Logout) => {
            cmd_logout(&config)?;
        }
        Some(Commands::Whoami) => {
            cmd_whoami(&config).await?;
        }
        Some(Commands::ResetWizard) => {
            cmd_reset_wizard(&config).await?;
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

/// Builds a client with the configured token, falling back to the one
/// stored by `candidash login`.
fn build_client(config: &Config) -> Result<ApiClient> {
    let mut client = ApiClient::new(config.api.base_url.as_str(), config.request_timeout())?;
    if let Some(token) = &config.api.token {
        client = client.with_token(token.as_str());
    } else if let Some(token) = TokenStore::new(&config.data_dir()).load()? {
        client = client.with_token(token.access_token);
    }
    Ok(client)
}

async fn run_tui(config: Config, log_file_path: Option<std::path::PathBuf>) -> Result<()> {
    let client = build_client(&config)?;
    if !client.has_token() {
        eprintln!("Not logged in. Run `candidash login <email>` first.");
        std::process::exit(1);
    }

    let user = match client.me().await {
        Ok(user) => user,
        Err(e) if e.is_auth_error() => {
            eprintln!("The stored token was rejected ({e}).");
            eprintln!("Run `candidash login <email>` to sign in again.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Could not reach the server at {}: {e}", config.api.base_url);
            std::process::exit(1);
        }
    };

    let mut app = App::new(config, client, user);
    let result = app.run().await;

    // Point at the session log on exit if anything was written
    if let Some(log_path) = log_file_path {
        if log_path.exists() {
            if let Ok(metadata) = log_path.metadata() {
                if metadata.len() > 0 {
                    eprintln!("Session log: {}", log_path.display());
                }
            }
        }
    }

    result
}

async fn cmd_login(config: &Config, email: &str) -> Result<()> {
    // CANDIDASH_PASSWORD supports scripted logins; otherwise prompt.
    let password = match std::env::var("CANDIDASH_PASSWORD") {
        Ok(password) => password,
        Err(_) => {
            print!("Password for {email}: ");
            std::io::stdout().flush()?;
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let client = ApiClient::new(config.api.base_url.as_str(), config.request_timeout())?;
    let token = match client.login(email, &password).await {
        Ok(token) => token,
        Err(e) if e.is_auth_error() => {
            eprintln!("Login failed: {e}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    TokenStore::new(&config.data_dir()).save(&token)?;
    let user = client.with_token(token.access_token).me().await?;
    println!("Logged in as {}", user.email);

    Ok(())
}

fn cmd_logout(config: &Config) -> Result<()> {
    TokenStore::new(&config.data_dir()).clear()?;
    println!("Logged out");
    Ok(())
}

async fn cmd_whoami(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    if !client.has_token() {
        println!("Not logged in");
        return Ok(());
    }

    match client.me().await {
        Ok(user) => {
            println!("{}", user.email);
            if let Some(name) = user.display_name() {
                println!("{name}");
            }
            println!("Account #{}", user.id);
        }
        Err(e) if e.is_auth_error() => {
            println!("Stored token rejected: {e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn cmd_reset_wizard(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    if !client.has_token() {
        eprintln!("Not logged in. Run `candidash login <email>` first.");
        std::process::exit(1);
    }

    // The draft key is per account, so the server tells us whose to drop
    let user = client.me().await?;
    let mut storage = FileStorage::new(config.wizard_store_dir());
    storage.remove(&session_key(user.id))?;
    println!("Wizard draft cleared for {}", user.email);

    Ok(())
}
