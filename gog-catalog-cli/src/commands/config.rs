use gog_catalog_scraper::{ConfigSource, Settings};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

fn mask_value(s: &str) -> String {
    match s.char_indices().nth(4) {
        Some((end, _)) => format!("{}****", &s[..end]),
        None => "****".to_string(),
    }
}

/// Show current settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = gog_catalog_scraper::config_path();
    let sources = gog_catalog_scraper::settings_sources();
    let settings = Settings::load()?;

    log::info!(
        "{}",
        "gog-catalog Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let fields: [(&str, &ConfigSource, Option<String>); 5] = [
        ("store_url", &sources.store_url, Some(settings.store_url.clone())),
        ("host_url", &sources.host_url, Some(settings.host_url.clone())),
        (
            "api_token",
            &sources.api_token,
            settings.api_token.as_deref().map(mask_value),
        ),
        (
            "max_workers",
            &sources.max_workers,
            Some(settings.max_workers.to_string()),
        ),
        (
            "throttle_ms",
            &sources.throttle_ms,
            Some(settings.throttle_ms.to_string()),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = gog_catalog_scraper::config_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}

/// Write the effective settings to the config file.
pub(crate) fn run_config_init() -> Result<(), CliError> {
    let settings = Settings::load()?;
    let path = gog_catalog_scraper::save_to_file(&settings)?;
    log::info!(
        "{} Settings saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("abcdef123456"), "abcd****");
        assert_eq!(mask_value("abc"), "****");
        assert_eq!(mask_value("ébcdéf"), "ébcd****");
    }
}
