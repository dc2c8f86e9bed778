//! `daylog commits` - the daily commit report.

use anyhow::Result;
use chrono::Local;
use daylog_core::{match_tickets, Settings};
use daylog_integrations::ActivityService;
use tabled::{Table, Tabled};

use super::{print_skipped, truncate_str};

#[derive(Tabled)]
struct CommitRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Tickets")]
    tickets: String,
}

pub async fn run(date: Option<String>, refresh: bool) -> Result<()> {
    let settings = Settings::load()?;
    let date = date.unwrap_or_else(|| Local::now().format("%d.%m.%Y").to_string());

    let service = ActivityService::new(settings);
    let report = service.fetch_commits_for_date(&date, refresh).await?;
    log::debug!("fetched {} commits for {date}", report.commits.len());

    if report.commits.is_empty() {
        println!("No commits found for {date}");
        print_skipped(&report.skipped);
        return Ok(());
    }

    let mappings = &service.settings().mappings;
    let rows: Vec<CommitRow> = report
        .commits
        .iter()
        .map(|commit| CommitRow {
            time: commit
                .author_date
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string(),
            source: commit.source.to_string(),
            message: truncate_str(&commit.message, 60),
            tickets: match_tickets(&commit.message, mappings).join(", "),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("\n{} commits on {date}", report.commits.len());
    print_skipped(&report.skipped);
    Ok(())
}
