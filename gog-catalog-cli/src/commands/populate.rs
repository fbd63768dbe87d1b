use std::path::Path;

use gog_catalog_core::{EntityStore, MediaUploader};
use gog_catalog_scraper::{
    GogClient, ListingParams, LogEntry, PopulateError, PopulateEvent, PopulateLog,
    PopulateOptions, Populator, Settings, Storefront,
};
use gog_catalog_store::{HostClient, MemoryStore};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::cli_types::PopulateArgs;
use crate::error::CliError;
use crate::events::run_with_events;

/// Merge CLI flags into the listing parameters.
fn listing_params(args: &PopulateArgs) -> Result<ListingParams, CliError> {
    let mut params = ListingParams::new();
    if let Some(sort) = &args.sort {
        params.set("sort", sort.as_str());
    }
    if let Some(page) = args.page {
        params.set("page", page.to_string());
    }
    for raw in &args.params {
        params.set_raw(raw).map_err(CliError::config)?;
    }
    Ok(params)
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("/-\\|"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn switch_to_bar(pb: &ProgressBar, total: usize) {
    pb.set_length(total as u64);
    pb.set_position(0);
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
            .tick_chars("/-\\|"),
    );
}

/// Run the populator and render its events.
async fn execute<S, U, F>(
    store: &S,
    uploader: &U,
    storefront: &F,
    params: &ListingParams,
    options: PopulateOptions,
    quiet: bool,
) -> Result<PopulateLog, PopulateError>
where
    S: EntityStore,
    U: MediaUploader,
    F: Storefront,
{
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<PopulateEvent>();
    let populator = Populator::new(store, uploader, storefront, options);
    let pb = progress_bar(quiet);

    let result = run_with_events(populator.run(params, event_tx), event_rx, |e| match e {
        PopulateEvent::FetchingListing => pb.set_message("Fetching listing..."),
        PopulateEvent::ListingFetched { total } => {
            pb.set_message(format!("{} products in listing", total));
            switch_to_bar(&pb, total);
        }
        PopulateEvent::MaterializingReferences => {
            pb.set_message("Creating developers, publishers, categories, platforms...")
        }
        PopulateEvent::ReferencesReady { created, existing } => {
            pb.set_message(format!("References: {} new, {} existing", created, existing))
        }
        PopulateEvent::ProductStarted { ref title, .. } => pb.set_message(title.clone()),
        PopulateEvent::UploadingMedia { ref title, .. } => {
            pb.set_message(format!("Uploading images for {}", title))
        }
        PopulateEvent::ProductSkipped { .. }
        | PopulateEvent::ProductCreated { .. }
        | PopulateEvent::ProductFailed { .. } => pb.inc(1),
        PopulateEvent::Done => pb.set_message("Done"),
    })
    .await;

    pb.finish_and_clear();
    result
}

fn print_summary(log: &PopulateLog) {
    let summary = log.summary();

    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} references: {} created, {} existing",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.references_created,
        summary.references_existing,
    );
    log::info!(
        "  {} {} games created, {} images uploaded",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.games_created(),
        summary.images_uploaded,
    );
    if summary.skipped > 0 {
        log::info!(
            "  {} {} already present",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            summary.skipped,
        );
    }
    if summary.detail_missing > 0 {
        log::warn!(
            "  {} {} created without descriptions",
            "~".if_supports_color(Stdout, |t| t.yellow()),
            summary.detail_missing,
        );
    }
    if summary.failed > 0 {
        log::warn!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
    }

    for entry in log.entries() {
        match entry {
            LogEntry::DetailMissing { title, reason, .. } => {
                log::warn!("  ~ {}: no details ({})", title, reason);
            }
            LogEntry::Failed { title, message } => {
                log::warn!("  \u{2718} {}: {}", title, message);
            }
            LogEntry::Created { title, warnings, .. } if !warnings.is_empty() => {
                log::warn!("  ~ {}:", title);
                for w in warnings {
                    log::warn!("      {}", w);
                }
            }
            _ => {}
        }
    }
}

fn write_log(log: &PopulateLog, path: &Path) {
    match log.write_to_file(path) {
        Ok(()) => log::info!(
            "  Run log written to {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        Err(e) => log::warn!("Warning: could not write run log: {}", e),
    }
}

/// Level for the end-of-run acknowledgment; `--quiet` only lets warnings through.
fn acknowledgment_level(quiet: bool) -> log::Level {
    if quiet { log::Level::Warn } else { log::Level::Info }
}

/// Run the populate command.
pub(crate) fn run_populate(args: PopulateArgs, quiet: bool) -> Result<(), CliError> {
    let settings = Settings::load()?.with_overrides(args.host.clone(), args.workers, args.throttle_ms);
    let params = listing_params(&args)?;
    let options = PopulateOptions::from_settings(&settings);
    let storefront = GogClient::new(&settings.store_url)?;

    let target = if args.dry_run {
        "memory store (dry run)"
    } else {
        settings.host_url.as_str()
    };
    log::info!(
        "Populating {} from {}",
        target.if_supports_color(Stdout, |t| t.cyan()),
        storefront.base_url().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "{}",
        format!(
            "Workers: {}, throttle: {} ms",
            options.max_workers, settings.throttle_ms
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;

    let result = rt.block_on(async {
        if args.dry_run {
            let store = MemoryStore::new();
            execute(&store, &store, &storefront, &params, options, quiet).await
        } else {
            let host = HostClient::new(&settings.host_url, settings.api_token.clone())?;
            execute(&host, &host, &storefront, &params, options, quiet).await
        }
    });

    // Acknowledged whether or not the run succeeded, and under --quiet too.
    log::log!(
        acknowledgment_level(quiet),
        "{}",
        "Finished populating!".if_supports_color(Stdout, |t| t.bold()),
    );

    let log = result?;
    print_summary(&log);
    if let Some(path) = &args.log_file {
        write_log(&log, path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PopulateArgs {
        PopulateArgs {
            sort: None,
            page: None,
            params: vec![],
            workers: None,
            throttle_ms: None,
            host: None,
            dry_run: false,
            log_file: None,
        }
    }

    #[test]
    fn test_listing_params_from_flags() {
        let args = PopulateArgs {
            sort: Some("date".to_string()),
            page: Some(2),
            params: vec!["price=discounted".to_string()],
            ..args()
        };
        let params = listing_params(&args).unwrap();
        assert_eq!(params.get("sort"), Some("date"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("price"), Some("discounted"));
    }

    #[test]
    fn test_listing_params_defaults() {
        let params = listing_params(&args()).unwrap();
        assert_eq!(params.get("sort"), Some("popularity"));
        assert_eq!(params.get("page"), Some("1"));
    }

    #[test]
    fn test_bad_param_is_config_error() {
        let args = PopulateArgs {
            params: vec!["oops".to_string()],
            ..args()
        };
        assert!(matches!(listing_params(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_acknowledgment_passes_the_quiet_filter() {
        assert!(acknowledgment_level(true) <= log::LevelFilter::Warn);
        assert!(acknowledgment_level(false) <= log::LevelFilter::Info);
    }
}
