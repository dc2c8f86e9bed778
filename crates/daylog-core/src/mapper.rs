//! Keyword-to-ticket mapping.
//!
//! Users maintain a small table of lowercase keywords (slugs), each mapped
//! to one or more ticket identifiers. Commit messages are matched against
//! the table to auto-tag them with the tickets they likely belong to.

use std::collections::BTreeMap;

/// Slug -> ordered ticket list. Ticket insertion order is preserved per
/// slug and duplicates within one slug are rejected by [`add_mapping`].
pub type MappingTable = BTreeMap<String, Vec<String>>;

/// Tickets whose slug appears (case-insensitively) in `message`.
///
/// The result is the union over all matching slugs, in slug order, with
/// the first occurrence of a ticket winning when several slugs map to it.
#[must_use]
pub fn match_tickets(message: &str, mappings: &MappingTable) -> Vec<String> {
    let message = message.to_lowercase();
    let mut tickets: Vec<String> = Vec::new();
    for (slug, mapped) in mappings {
        if !message.contains(&slug.to_lowercase()) {
            continue;
        }
        for ticket in mapped {
            if !tickets.contains(ticket) {
                tickets.push(ticket.clone());
            }
        }
    }
    tickets
}

/// Add one slug -> ticket entry. Slugs are stored trimmed and lowercased.
///
/// Returns `false` when either part is empty or the mapping already exists.
pub fn add_mapping(mappings: &mut MappingTable, slug: &str, ticket: &str) -> bool {
    let slug = slug.trim().to_lowercase();
    let ticket = ticket.trim();
    if slug.is_empty() || ticket.is_empty() {
        return false;
    }
    let entry = mappings.entry(slug).or_default();
    if entry.iter().any(|t| t == ticket) {
        return false;
    }
    entry.push(ticket.to_string());
    true
}

/// Remove one ticket from a slug, or the whole slug when `ticket` is `None`.
/// A slug left with no tickets is dropped from the table.
///
/// Returns `false` when nothing matched.
pub fn remove_mapping(mappings: &mut MappingTable, slug: &str, ticket: Option<&str>) -> bool {
    let slug = slug.trim().to_lowercase();
    let Some(wanted) = ticket else {
        return mappings.remove(&slug).is_some();
    };
    let Some(entry) = mappings.get_mut(&slug) else {
        return false;
    };
    let before = entry.len();
    entry.retain(|t| t != wanted);
    let removed = entry.len() != before;
    if entry.is_empty() {
        mappings.remove(&slug);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> MappingTable {
        entries
            .iter()
            .map(|(slug, tickets)| {
                (
                    (*slug).to_string(),
                    tickets.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn matches_all_slugs_in_slug_order() {
        let mappings = table(&[("checkout", &["TCK-1", "TCK-2"]), ("login", &["TCK-3"])]);
        let tickets = match_tickets("Fix checkout and login bug", &mappings);
        assert_eq!(tickets, vec!["TCK-1", "TCK-2", "TCK-3"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mappings = table(&[("checkout", &["TCK-1"])]);
        assert_eq!(
            match_tickets("Rework CHECKOUT flow", &mappings),
            vec!["TCK-1"]
        );
    }

    #[test]
    fn shared_tickets_are_deduplicated_first_occurrence_wins() {
        let mappings = table(&[("cart", &["TCK-9", "TCK-1"]), ("checkout", &["TCK-1"])]);
        let tickets = match_tickets("cart and checkout", &mappings);
        assert_eq!(tickets, vec!["TCK-9", "TCK-1"]);
    }

    #[test]
    fn no_match_yields_empty() {
        let mappings = table(&[("checkout", &["TCK-1"])]);
        assert!(match_tickets("Bump dependencies", &mappings).is_empty());
    }

    #[test]
    fn add_lowercases_and_rejects_duplicates() {
        let mut mappings = MappingTable::new();
        assert!(add_mapping(&mut mappings, " Checkout ", "TCK-1"));
        assert!(!add_mapping(&mut mappings, "checkout", "TCK-1"));
        assert!(add_mapping(&mut mappings, "checkout", "TCK-2"));
        assert_eq!(mappings["checkout"], vec!["TCK-1", "TCK-2"]);
    }

    #[test]
    fn add_rejects_empty_parts() {
        let mut mappings = MappingTable::new();
        assert!(!add_mapping(&mut mappings, "  ", "TCK-1"));
        assert!(!add_mapping(&mut mappings, "checkout", ""));
        assert!(mappings.is_empty());
    }

    #[test]
    fn remove_single_ticket_drops_empty_slug() {
        let mut mappings = table(&[("checkout", &["TCK-1"])]);
        assert!(remove_mapping(&mut mappings, "checkout", Some("TCK-1")));
        assert!(mappings.is_empty());
    }

    #[test]
    fn remove_whole_slug() {
        let mut mappings = table(&[("checkout", &["TCK-1", "TCK-2"])]);
        assert!(remove_mapping(&mut mappings, "checkout", None));
        assert!(!remove_mapping(&mut mappings, "checkout", None));
    }
}
