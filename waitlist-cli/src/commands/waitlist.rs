use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use waitlist_client::WaitlistClient;

#[derive(Subcommand)]
pub enum WaitlistCommands {
    /// Add an email to the public waitlist
    Join {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

pub async fn handle_waitlist_command(command: WaitlistCommands, ctx: &Context) -> Result<()> {
    match command {
        WaitlistCommands::Join { email, name } => {
            let client = WaitlistClient::new(ctx.session.transport());
            let entry = client.join(&email, name).await?;

            if ctx.format != OutputFormat::Table {
                return output::print_single(&entry, ctx.format);
            }
            output::print_success(&format!("'{}' added to the waitlist (ID: {})", entry.email, entry.id));
        }
    }
    Ok(())
}
