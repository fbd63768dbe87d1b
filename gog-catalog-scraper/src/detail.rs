use gog_catalog_core::GameDetails;
use scraper::{Html, Selector};

use crate::client::Storefront;
use crate::error::PopulateError;

/// CSS selector of the long description on a product page.
pub const DESCRIPTION_SELECTOR: &str = ".description";

/// Rating assigned to every scraped game (Brazilian advisory "free for all").
pub const DEFAULT_RATING: &str = "BR0";

/// Length, in characters, of the short description.
pub const SHORT_DESCRIPTION_LEN: usize = 160;

/// Fetch a product's detail page and extract its descriptions.
pub async fn fetch_details<F: Storefront>(
    storefront: &F,
    slug: &str,
) -> Result<GameDetails, PopulateError> {
    let html = storefront.detail_page(slug).await?;
    parse_details(&html)
}

/// Extract descriptions from detail-page HTML.
///
/// The short description is the first 160 characters of the description's
/// text content; the long description is its inner HTML, untouched.
pub fn parse_details(html: &str) -> Result<GameDetails, PopulateError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(DESCRIPTION_SELECTOR).map_err(|e| PopulateError::Html(e.to_string()))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or_else(|| PopulateError::MissingElement(DESCRIPTION_SELECTOR.to_string()))?;

    let text: String = element.text().collect();

    Ok(GameDetails {
        rating: DEFAULT_RATING.to_string(),
        short_description: text.chars().take(SHORT_DESCRIPTION_LEN).collect(),
        description: element.inner_html(),
    })
}
