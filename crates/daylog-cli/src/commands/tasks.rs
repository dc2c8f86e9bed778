//! `daylog tasks` - open work items assigned to you.

use anyhow::Result;
use daylog_core::Settings;
use daylog_integrations::ActivityService;
use tabled::{Table, Tabled};

use super::{print_skipped, truncate_str};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Type")]
    item_type: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Project")]
    project: String,
}

pub async fn run(refresh: bool) -> Result<()> {
    let settings = Settings::load()?;
    let service = ActivityService::new(settings);
    let report = service.fetch_work_items(refresh).await?;
    log::debug!("fetched {} work items", report.items.len());

    if report.items.is_empty() {
        println!("No open work items assigned to you");
        print_skipped(&report.skipped);
        return Ok(());
    }

    let rows: Vec<TaskRow> = report
        .items
        .iter()
        .map(|item| TaskRow {
            id: item.id,
            item_type: item.item_type.clone(),
            state: item.state.clone(),
            title: truncate_str(&item.title, 50),
            project: item.project.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("\n{} open work items", report.items.len());
    print_skipped(&report.skipped);
    Ok(())
}
