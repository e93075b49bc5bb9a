//! Waitlist admin CLI
//!
//! Command-line admin panel for the waitlist site

mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::auth::AuthCommands;
use commands::users::UserCommands;
use commands::waitlist::WaitlistCommands;
use waitlist_client::ClientError;

#[derive(Parser)]
#[command(name = "waitlist-admin", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address (overrides the config file)
    #[arg(short, long, env = "WAITLIST_SERVER")]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Browse registered users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Public waitlist
    Waitlist {
        #[command(subcommand)]
        command: WaitlistCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ClientError>() {
            Some(client_error) => output::print_notice(&client_error.notice()),
            None => output::print_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = config::Config::load()
        .unwrap_or_default()
        .with_overrides(cli.server, cli.output, cli.log_level);

    let _log_guard = logging::LoggingConfig {
        level: config.log_level.clone(),
        log_dir: config.log_dir.clone(),
    }
    .init()?;

    let ctx = commands::Context::new(&config)?;

    match cli.command {
        Commands::Auth { command } => commands::auth::handle_auth_command(command, &ctx).await?,
        Commands::Users { command } => commands::users::handle_user_command(command, &ctx).await?,
        Commands::Waitlist { command } => {
            commands::waitlist::handle_waitlist_command(command, &ctx).await?
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
