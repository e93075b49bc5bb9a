//! Administered users: listing, counters and the interactive pager

use super::Context;
use crate::output::{self, format_relative, truncate, OutputFormat};
use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::future::Future;
use tabled::Tabled;
use waitlist_client::{AdminUser, AggregateCount, ClientError, PageWindow, UserPager};

#[derive(Subcommand)]
pub enum UserCommands {
    /// List one page of users
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Only show users on this page whose email or name contains the text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show user counters
    Count,
    /// Browse users page by page
    Browse,
}

#[derive(Tabled, Serialize)]
struct UserRow {
    #[tabled(rename = "#")]
    number: u64,
    email: String,
    name: String,
    registered: String,
    #[tabled(rename = "last login")]
    last_login: String,
}

impl UserRow {
    fn from_user(number: u64, user: &AdminUser) -> Self {
        let now = Utc::now();
        Self {
            number,
            email: truncate(&user.email, 40),
            name: if user.display_name.is_empty() {
                "-".to_string()
            } else {
                truncate(&user.display_name, 30)
            },
            registered: user.created_at.format("%Y-%m-%d").to_string(),
            last_login: user
                .last_login
                .map(|t| format_relative(t, now))
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Machine-readable listing
#[derive(Serialize)]
struct Listing<'a> {
    page: u32,
    page_size: usize,
    total_users: u64,
    is_last_page: bool,
    users_last_24h: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    users: &'a [AdminUser],
}

pub async fn handle_user_command(command: UserCommands, ctx: &Context) -> Result<()> {
    ctx.require_session()?;
    let pager = UserPager::new(ctx.session.clone());

    match command {
        UserCommands::List { page, filter } => {
            let window = with_spinner(format!("Loading page {}...", page), pager.load_page(page)).await?;
            let aggregate = pager.load_aggregate_count().await;

            let users = match filter.as_deref() {
                Some(query) => pager.filter_locally(query).await,
                None => window.items.clone(),
            };

            if ctx.format != OutputFormat::Table {
                let listing = Listing {
                    page: window.page_number,
                    page_size: window.page_size,
                    total_users: window.total_count,
                    is_last_page: window.is_last_page,
                    users_last_24h: aggregate.recent_count,
                    filter: filter.as_deref(),
                    users: &users,
                };
                return output::print_single(&listing, ctx.format);
            }

            render_page(&window, &users, filter.as_deref(), aggregate);
        }

        UserCommands::Count => {
            let aggregate = pager.load_aggregate_count().await;
            if ctx.format != OutputFormat::Table {
                return output::print_single(&aggregate, ctx.format);
            }
            println!("Total users: {}", aggregate.total_count);
            println!("Last 24 hours: {}", aggregate.recent_count);
        }

        UserCommands::Browse => browse(&pager).await?,
    }

    Ok(())
}

async fn with_spinner<F, T>(message: String, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn render_page(window: &PageWindow, users: &[AdminUser], filter: Option<&str>, aggregate: AggregateCount) {
    let first = window.first_item_number();
    let rows: Vec<UserRow> = window
        .items
        .iter()
        .enumerate()
        .filter(|(_, u)| users.contains(u))
        .map(|(i, u)| UserRow::from_user(first + i as u64, u))
        .collect();

    output::print_table(rows);

    println!(
        "Page {} of {} • {} users total • {} in the last 24 hours",
        window.page_number,
        window.page_count(),
        window.total_count,
        aggregate.recent_count
    );

    if let Some(query) = filter {
        output::print_info(&format!(
            "Filter '{}' applies to this page only: {} of {} shown",
            query,
            users.len(),
            window.items.len()
        ));
    }
}

#[derive(Clone, Copy)]
enum BrowseAction {
    Next,
    Previous,
    Jump,
    Filter,
    Refresh,
    Quit,
}

const ACTIONS: [(BrowseAction, &str); 6] = [
    (BrowseAction::Next, "Next page"),
    (BrowseAction::Previous, "Previous page"),
    (BrowseAction::Jump, "Go to page..."),
    (BrowseAction::Filter, "Filter this page..."),
    (BrowseAction::Refresh, "Refresh"),
    (BrowseAction::Quit, "Quit"),
];

/// Interactive loop. Fetch errors leave the last page on screen; an expired
/// session ends the loop.
async fn browse(pager: &UserPager) -> Result<()> {
    use dialoguer::{Input, Select};

    let mut filter: Option<String> = None;
    let mut outcome = with_spinner("Loading page 1...".to_string(), pager.load_page(1)).await;

    loop {
        if let Err(e) = outcome {
            if e.requires_login() {
                return Err(e.into());
            }
            output::print_notice(&e.notice());
        }

        let aggregate = pager.load_aggregate_count().await;
        let window = pager.window().await;
        let users = pager.filter_locally(filter.as_deref().unwrap_or("")).await;
        render_page(&window, &users, filter.as_deref(), aggregate);

        let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        outcome = match ACTIONS.get(choice).map(|(a, _)| *a).unwrap_or(BrowseAction::Quit) {
            BrowseAction::Next => {
                if window.is_last_page {
                    output::print_info("Already on the last page");
                }
                with_spinner("Loading next page...".to_string(), pager.next_page()).await
            }
            BrowseAction::Previous => {
                with_spinner("Loading previous page...".to_string(), pager.previous_page()).await
            }
            BrowseAction::Jump => {
                let page: u32 = Input::new()
                    .with_prompt(format!("Page (1-{})", window.page_count()))
                    .interact_text()?;
                with_spinner(format!("Loading page {}...", page), pager.load_page(page)).await
            }
            BrowseAction::Filter => {
                let query: String = Input::new()
                    .with_prompt("Filter (empty to clear)")
                    .allow_empty(true)
                    .interact_text()?;
                filter = Some(query.trim().to_string()).filter(|q| !q.is_empty());
                Ok(window)
            }
            BrowseAction::Refresh => {
                with_spinner("Refreshing...".to_string(), pager.load_page(window.page_number)).await
            }
            BrowseAction::Quit => return Ok(()),
        };
    }
}
