//! `daylog map` - maintain the keyword-to-ticket mapping table.

use anyhow::Result;
use daylog_core::{mapper, Settings};

pub fn add(slug: &str, ticket: &str) -> Result<()> {
    let mut settings = Settings::load()?;
    if mapper::add_mapping(&mut settings.mappings, slug, ticket) {
        settings.save()?;
        println!("Mapped '{}' -> {}", slug.trim().to_lowercase(), ticket.trim());
    } else {
        println!("Nothing added: mapping already exists or slug/ticket is empty");
    }
    Ok(())
}

pub fn remove(slug: &str, ticket: Option<&str>) -> Result<()> {
    let mut settings = Settings::load()?;
    if mapper::remove_mapping(&mut settings.mappings, slug, ticket) {
        settings.save()?;
        match ticket {
            Some(ticket) => println!("Removed {ticket} from '{}'", slug.trim().to_lowercase()),
            None => println!("Removed '{}'", slug.trim().to_lowercase()),
        }
    } else {
        println!("No such mapping: {}", slug.trim().to_lowercase());
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let settings = Settings::load()?;
    if settings.mappings.is_empty() {
        println!("No mappings yet");
        println!("\nAdd one with: daylog map add <keyword> <ticket>");
        return Ok(());
    }

    println!("Keyword mappings:\n");
    for (slug, tickets) in &settings.mappings {
        println!("  {slug} -> {}", tickets.join(", "));
    }
    Ok(())
}
