//! `daylog config` - settings management.

use anyhow::Result;
use daylog_core::Settings;

pub fn set(key: &str, value: &str) -> Result<()> {
    let mut settings = Settings::load()?;

    if key == "commits_source" {
        settings.commits_source = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        settings.save()?;
        println!("Set {key} = {value}");
        return Ok(());
    }

    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() != 2 {
        anyhow::bail!("Invalid key format. Use: <section>.<key> (e.g. github.token)");
    }

    match (parts[0], parts[1]) {
        ("github", "token") => settings.github.token = value.to_string(),
        ("github", "username") => settings.github.username = value.to_string(),
        ("github", "organization") => settings.github.organization = value.to_string(),
        ("github", "api_base") => settings.github.api_base = Some(value.to_string()),
        ("devops", "token") => settings.devops.token = value.to_string(),
        ("devops", "organization") => settings.devops.organization = value.to_string(),
        ("devops", "api_base") => settings.devops.api_base = Some(value.to_string()),
        _ => anyhow::bail!(
            "Unknown key: {key}. Valid keys: commits_source, github.token, github.username, \
             github.organization, github.api_base, devops.token, devops.organization, \
             devops.api_base"
        ),
    }

    settings.save()?;
    println!("Set {key}");
    Ok(())
}

pub fn list() -> Result<()> {
    let settings = Settings::load()?;

    println!("commits_source = {}", settings.commits_source.as_str());

    println!("\n[github]");
    println!("  token = {}", mask(&settings.github.token));
    println!("  username = {}", or_unset(&settings.github.username));
    println!("  organization = {}", or_unset(&settings.github.organization));
    if let Some(base) = &settings.github.api_base {
        println!("  api_base = {base}");
    }

    println!("\n[devops]");
    println!("  token = {}", mask(&settings.devops.token));
    println!("  organization = {}", or_unset(&settings.devops.organization));
    if let Some(base) = &settings.devops.api_base {
        println!("  api_base = {base}");
    }

    println!("\n{} keyword mapping(s)", settings.mappings.len());
    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", Settings::config_path()?.display());
    Ok(())
}

fn mask(token: &str) -> String {
    if token.is_empty() {
        "(unset)".to_string()
    } else {
        format!("{}***", token.chars().take(8).collect::<String>())
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_everything_past_the_prefix() {
        assert_eq!(mask(""), "(unset)");
        assert_eq!(mask("ghp_secrettoken"), "ghp_secr***");
        assert_eq!(mask("abc"), "abc***");
    }
}
