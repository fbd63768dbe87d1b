use chrono::Utc;
use futures::stream::{self, StreamExt};
use gog_catalog_core::{
    Collection, EntityKind, EntityStore, GameDetails, MediaUploader, NewEntity, NewGame,
    ProductSummary, game_slug,
};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::client::Storefront;
use crate::config::Settings;
use crate::detail::fetch_details;
use crate::error::PopulateError;
use crate::log::{LogEntry, PopulateLog};
use crate::media::upload_game_media;
use crate::params::ListingParams;
use crate::resolve::{Relations, Resolver};
use crate::throttle::Throttle;

/// Options for a populate run.
#[derive(Debug, Clone)]
pub struct PopulateOptions {
    /// Products processed concurrently.
    pub max_workers: usize,
    /// Minimum spacing between products that go on to be created.
    pub throttle: Duration,
}

impl Default for PopulateOptions {
    fn default() -> Self {
        Self {
            max_workers: crate::config::DEFAULT_MAX_WORKERS,
            throttle: Duration::from_millis(crate::config::DEFAULT_THROTTLE_MS),
        }
    }
}

impl PopulateOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_workers: settings.max_workers.max(1),
            throttle: Duration::from_millis(settings.throttle_ms),
        }
    }
}

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum PopulateEvent {
    /// Requesting the listing page.
    FetchingListing,
    /// Listing received.
    ListingFetched { total: usize },
    /// Creating missing developers, publishers, categories and platforms.
    MaterializingReferences,
    /// Reference records are in place.
    ReferencesReady { created: usize, existing: usize },
    /// A worker picked up the product.
    ProductStarted { index: usize, title: String },
    /// A game with the product's title already exists.
    ProductSkipped { index: usize, title: String },
    /// Game created; images are being uploaded.
    UploadingMedia { index: usize, title: String },
    /// Game created and media handled.
    ProductCreated {
        index: usize,
        title: String,
        detail_missing: bool,
    },
    /// Product could not be created (non-fatal).
    ProductFailed {
        index: usize,
        title: String,
        reason: String,
    },
    /// All products processed.
    Done,
}

/// Drives one populate run against injected store, uploader and storefront.
pub struct Populator<'a, S, U, F> {
    store: &'a S,
    uploader: &'a U,
    storefront: &'a F,
    options: PopulateOptions,
}

impl<'a, S, U, F> Populator<'a, S, U, F>
where
    S: EntityStore,
    U: MediaUploader,
    F: Storefront,
{
    pub fn new(store: &'a S, uploader: &'a U, storefront: &'a F, options: PopulateOptions) -> Self {
        Self {
            store,
            uploader,
            storefront,
            options,
        }
    }

    /// Fetch the listing, materialize references, then create every product.
    ///
    /// Listing and reference failures abort the run. Per-product failures are
    /// recorded in the returned log.
    pub async fn run(
        &self,
        params: &ListingParams,
        events: mpsc::UnboundedSender<PopulateEvent>,
    ) -> Result<PopulateLog, PopulateError> {
        let _ = events.send(PopulateEvent::FetchingListing);
        let products = self.storefront.listing(params).await?;
        let total = products.len();
        log::info!("Listing returned {} products", total);
        let _ = events.send(PopulateEvent::ListingFetched { total });

        let resolver = Resolver::new(self.store);
        let _ = events.send(PopulateEvent::MaterializingReferences);
        let references = resolver.materialize(&products).await?;
        log::info!(
            "References ready: {} created, {} existing",
            references.total_created(),
            references.total_existing()
        );
        let _ = events.send(PopulateEvent::ReferencesReady {
            created: references.total_created(),
            existing: references.total_existing(),
        });

        let throttle = Throttle::new(self.options.throttle);
        let max_workers = self.options.max_workers.max(1);

        let entries: Vec<LogEntry> = stream::iter(products.iter().enumerate())
            .map(|(index, product)| {
                let events = events.clone();
                let resolver = &resolver;
                let throttle = &throttle;
                async move {
                    let _ = events.send(PopulateEvent::ProductStarted {
                        index,
                        title: product.title.clone(),
                    });

                    match self
                        .process_product(resolver, throttle, index, product, &events)
                        .await {
                        Ok(entry) => entry,
                        Err(e) => {
                            log::warn!("Failed to create '{}': {}", product.title, e);
                            let _ = events.send(PopulateEvent::ProductFailed {
                                index,
                                title: product.title.clone(),
                                reason: e.to_string(),
                            });
                            LogEntry::Failed {
                                title: product.title.clone(),
                                message: e.to_string(),
                            }
                        }
                    }
                }
            })
            .buffer_unordered(max_workers)
            .collect()
            .await;

        let mut log = PopulateLog::new();
        log.set_references(references);
        for entry in entries {
            log.add(entry);
        }

        let _ = events.send(PopulateEvent::Done);
        Ok(log)
    }

    /// Skip existing games; otherwise wait for admission, then resolve
    /// references, fetch details, create the game and upload its media.
    async fn process_product(
        &self,
        resolver: &Resolver<'a, S>,
        throttle: &Throttle,
        index: usize,
        product: &ProductSummary,
        events: &mpsc::UnboundedSender<PopulateEvent>,
    ) -> Result<LogEntry, PopulateError> {
        let games = Collection::new(self.store, EntityKind::Game);

        if games.find_by_name(&product.title).await?.is_some() {
            log::info!("Skipping '{}': already exists", product.title);
            let _ = events.send(PopulateEvent::ProductSkipped {
                index,
                title: product.title.clone(),
            });
            return Ok(LogEntry::Skipped {
                title: product.title.clone(),
            });
        }

        throttle.admit().await;

        let relations = resolver.relations(product).await?;
        for (kind, name) in &relations.missing {
            log::warn!(
                "No {} named '{}' for '{}'; leaving it out",
                kind.display_name(),
                name,
                product.title
            );
        }

        let details = match fetch_details(self.storefront, &product.slug).await {
            Ok(details) => Ok(details),
            Err(e) => {
                log::warn!("No details for '{}': {}", product.title, e);
                Err(e.to_string())
            }
        };

        let game = build_game(product, &relations, details.as_ref().ok());
        let record = games.create(&NewEntity::Game(game)).await?;
        log::info!("Created game '{}' ({})", record.name, record.slug);

        let _ = events.send(PopulateEvent::UploadingMedia {
            index,
            title: product.title.clone(),
        });
        let media = upload_game_media(self.storefront, self.uploader, product, &record).await;

        let _ = events.send(PopulateEvent::ProductCreated {
            index,
            title: product.title.clone(),
            detail_missing: details.is_err(),
        });

        Ok(match details {
            Ok(_) => LogEntry::Created {
                title: product.title.clone(),
                slug: record.slug,
                images_uploaded: media.uploaded,
                warnings: media.warnings,
            },
            Err(reason) => LogEntry::DetailMissing {
                title: product.title.clone(),
                slug: record.slug,
                reason,
                images_uploaded: media.uploaded,
                warnings: media.warnings,
            },
        })
    }
}

/// Assemble the game payload from a listing product, its resolved relations
/// and, when available, its detail-page descriptions.
pub fn build_game(
    product: &ProductSummary,
    relations: &Relations,
    details: Option<&GameDetails>,
) -> NewGame {
    NewGame {
        name: product.title.clone(),
        slug: game_slug(&product.slug),
        price: product.price.value(),
        release_date: product.release_date(),
        rating: details.map(|d| d.rating.clone()),
        short_description: details.map(|d| d.short_description.clone()),
        description: details.map(|d| d.description.clone()),
        categories: relations.categories.clone(),
        platforms: relations.platforms.clone(),
        developers: relations.developers.clone(),
        publisher: relations.publisher,
        published_at: Utc::now(),
    }
}
