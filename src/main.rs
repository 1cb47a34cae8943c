//! StudyBuddy - terminal front end for the study assistant
//!
#![doc = "StudyBuddy - terminal front end for the study assistant"]
#![doc = "Main entry point for the StudyBuddy application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studybuddy::cli::{Cli, Commands};
use studybuddy::commands;
use studybuddy::config::Config;
use studybuddy::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let mut app = App::open(&config)?;
    let working_dir = std::env::current_dir()?;

    // Execute command
    match cli.command {
        Commands::Chat { resume } => {
            if let Some(position) = resume {
                tracing::debug!("Resuming chat {}", position);
            }
            commands::chat::run_chat(&mut app, resume).await
        }
        Commands::Send { message, chat } => {
            commands::send::run_send(&mut app, &message, chat).await
        }
        Commands::List { search, folder } => {
            commands::history::handle_list(&app, search.as_deref(), folder.as_deref())
        }
        Commands::Show { index } => commands::history::handle_show(&app, index),
        Commands::Rename { index, title } => {
            commands::history::handle_rename(&mut app, index, &title)
        }
        Commands::Delete { index } => commands::history::handle_delete(&mut app, index),
        Commands::Folder { command } => commands::folders::handle_folder(&mut app, command),
        Commands::Export { chat, output } => {
            commands::history::handle_export(&app, chat, output.as_deref(), &working_dir)
        }
        Commands::Import { path } => commands::history::handle_import(&mut app, &path),
        Commands::Clear { yes } => commands::history::handle_clear(&mut app, yes),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "studybuddy=debug"
    } else {
        "studybuddy=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
