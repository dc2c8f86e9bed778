pub mod commits;
pub mod config;
pub mod map;
pub mod tasks;

/// Safely truncate a string to a maximum number of characters (not bytes).
/// This avoids panics when slicing multi-byte UTF-8 characters.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print the sub-resources a query silently skipped, if any. Results shown
/// above are still valid, just possibly incomplete.
pub(crate) fn print_skipped(skipped: &[String]) {
    if skipped.is_empty() {
        return;
    }
    println!("\nWarning: {} source(s) skipped:", skipped.len());
    for reason in skipped {
        println!("  - {reason}");
    }
}
