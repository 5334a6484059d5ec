mod api;
mod config;
mod forms;
mod logging;
mod ports;
mod services;
mod session;
mod table;
mod tui;
mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{api::AdminClient, config::Config, logging::setup_logging, ports::AdminApi};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "AUDIO_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level (default: off)
    #[arg(long, default_value = "off", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "AUDIO_ADMIN_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Admin email
        #[arg(short, long, env = "AUDIO_ADMIN_EMAIL")]
        email: String,

        /// Admin password
        #[arg(short, long, env = "AUDIO_ADMIN_PASSWORD")]
        password: String,
    },
    /// Remove the stored session token
    Logout,
    /// Print the signed-in admin profile
    Profile,
    /// Run the interactive management console
    Console,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        Config::from_file(&path)
    } else {
        Config::load()
    }
    .wrap_err("Failed to load audio-admin config")
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Audio admin starting");

    match args.command {
        Commands::Login { email, password } => {
            let config = load_config(args.config)?;
            let client = AdminClient::new(config.api_base_url()?);
            log::debug!("Logging in as {}", email);
            // login failure surfaces the server-provided message verbatim
            // and stores nothing
            let response = client.login(&email, &password).await?;
            session::store_token(&config, &response.token)?;
            println!("Logged in as {}", email);
            log::info!("Login succeeded");
        }
        Commands::Logout => {
            let config = load_config(args.config)?;
            session::clear(&config)?;
            println!("Logged out");
        }
        Commands::Profile => {
            let config = load_config(args.config)?;
            let session = session::resolve(&config).await?;
            println!("{} <{}>", session.profile.name, session.profile.email);
        }
        Commands::Console => {
            let config = load_config(args.config)?;
            let session = session::resolve(&config).await?;
            log::debug!("Starting console for {}", session.profile.name);
            let api: Arc<dyn AdminApi> = Arc::new(session.client);
            tui::run(api, session.profile).await?;
            log::info!("Console exited");
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
                log::info!("Default config created successfully");
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}
