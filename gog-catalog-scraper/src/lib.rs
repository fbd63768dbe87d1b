pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod log;
pub mod media;
pub mod params;
pub mod populate;
pub mod resolve;
pub mod throttle;

pub use client::{DEFAULT_STORE_URL, GogClient, Storefront};
pub use config::{
    ConfigFile, ConfigSource, DEFAULT_HOST_URL, Settings, SettingsSources, config_path,
    save_to_file, settings_sources,
};
pub use detail::{fetch_details, parse_details};
pub use error::PopulateError;
pub use crate::log::{LogEntry, LogSummary, PopulateLog};
pub use media::{MediaOutcome, upload_game_media, upload_image};
pub use params::ListingParams;
pub use populate::{PopulateEvent, PopulateOptions, Populator, build_game};
pub use resolve::{ReferenceNames, ReferenceStats, Relations, Resolution, Resolver};
pub use throttle::Throttle;
