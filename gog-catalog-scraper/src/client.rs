use std::future::Future;

use gog_catalog_core::{ListingResponse, ProductSummary};
use tokio::time::Duration;

use crate::error::PopulateError;
use crate::params::ListingParams;

pub const DEFAULT_STORE_URL: &str = "https://www.gog.com";

/// Read-only view of the storefront: listing API, detail pages, image CDN.
pub trait Storefront: Send + Sync {
    /// Fetch one page of the filtered listing.
    fn listing(
        &self,
        params: &ListingParams,
    ) -> impl Future<Output = Result<Vec<ProductSummary>, PopulateError>> + Send;

    /// Fetch the HTML of a product's detail page.
    fn detail_page(&self, slug: &str) -> impl Future<Output = Result<String, PopulateError>> + Send;

    /// Download a binary (image) by absolute URL.
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, PopulateError>> + Send;
}

/// HTTP client for the GOG storefront.
pub struct GogClient {
    http: reqwest::Client,
    base_url: String,
}

impl GogClient {
    pub fn new(base_url: &str) -> Result<Self, PopulateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn listing_url(&self) -> String {
        format!("{}/games/ajax/filtered", self.base_url)
    }

    fn detail_url(&self, slug: &str) -> String {
        format!("{}/game/{}", self.base_url, slug)
    }

    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<reqwest::Response, PopulateError> {
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PopulateError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }
}

impl Storefront for GogClient {
    async fn listing(&self, params: &ListingParams) -> Result<Vec<ProductSummary>, PopulateError> {
        let url = self.listing_url();
        let text = self.get(&url, &params.query_pairs()).await?.text().await?;

        let listing: ListingResponse = serde_json::from_str(&text)?;
        let products = listing.into_products();
        log::debug!("Listing {} returned {} products", url, products.len());
        Ok(products)
    }

    async fn detail_page(&self, slug: &str) -> Result<String, PopulateError> {
        let url = self.detail_url(slug);
        Ok(self.get(&url, &[]).await?.text().await?)
    }

    /// Image CDN downloads are not throttled; only product admission is.
    async fn download(&self, url: &str) -> Result<Vec<u8>, PopulateError> {
        let bytes = self.get(url, &[]).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = GogClient::new("https://www.gog.com/").unwrap();
        assert_eq!(client.base_url(), "https://www.gog.com");
        assert_eq!(
            client.listing_url(),
            "https://www.gog.com/games/ajax/filtered"
        );
        assert_eq!(
            client.detail_url("the_witcher"),
            "https://www.gog.com/game/the_witcher"
        );
    }
}
