//! Authentication commands

use super::Context;
use crate::output;
use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use waitlist_client::SessionGate;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in to the admin panel
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password (will be prompted if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out (clear the stored session)
    Logout,

    /// Show the locally stored session without contacting the server
    Status,

    /// Ask the server who the stored session belongs to
    Whoami,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    authenticated: bool,
    username: Option<&'a str>,
    role: Option<&'a str>,
}

pub async fn handle_auth_command(command: AuthCommands, ctx: &Context) -> Result<()> {
    match command {
        AuthCommands::Login { username, password } => {
            let password = if let Some(pwd) = password {
                pwd
            } else {
                use dialoguer::Password;
                Password::new()
                    .with_prompt("Password")
                    .interact()?
            };

            let credential = ctx.session.login(&username, &password).await?;

            output::print_success(&format!("Signed in as {}", credential.admin.display_name()));
            println!("  Username: {}", credential.admin.username);
            println!("  Role: {}", credential.admin.role);
            if let Some(email) = &credential.admin.email {
                println!("  Email: {}", email);
            }
        }

        AuthCommands::Logout => {
            ctx.session.logout();
            output::print_success("Signed out");
        }

        AuthCommands::Status => {
            let gate = ctx.session.gate();
            let report = match &gate {
                SessionGate::Authenticated(c) => StatusReport {
                    authenticated: true,
                    username: Some(&c.admin.username),
                    role: Some(&c.admin.role),
                },
                SessionGate::LoginRequired => StatusReport {
                    authenticated: false,
                    username: None,
                    role: None,
                },
            };

            if ctx.format != output::OutputFormat::Table {
                return output::print_single(&report, ctx.format);
            }

            match gate {
                SessionGate::Authenticated(credential) => {
                    println!("Signed in as: {} ({})", credential.admin.username, credential.admin.role);
                    println!("Token: {}", credential.token_hint());
                    output::print_info("Validity is checked on the next server call; use 'auth whoami' to check now");
                }
                SessionGate::LoginRequired => {
                    println!("Not signed in");
                    println!("Use 'waitlist-admin auth login' to sign in");
                }
            }
        }

        AuthCommands::Whoami => {
            ctx.require_session()?;
            let identity = ctx.session.verify_session().await?;

            if ctx.format != output::OutputFormat::Table {
                return output::print_single(&identity, ctx.format);
            }

            println!("{} ({})", identity.display_name(), identity.role);
            println!("  ID: {}", identity.id);
            println!("  Username: {}", identity.username);
            if let Some(email) = &identity.email {
                println!("  Email: {}", email);
            }
            if !identity.permissions.is_empty() {
                println!("  Permissions: {}", identity.permissions.join(", "));
            }
        }
    }

    Ok(())
}
