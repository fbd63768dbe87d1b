use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

/// Listing response from `games/ajax/filtered`.
///
/// The storefront returns `{ products: [...] }`; some proxies wrap the same
/// page as `{ data: { products: [...] } }`. Both shapes are accepted.
#[derive(Debug)]
pub enum ListingResponse {
    Wrapped { data: ListingPage },
    Bare(ListingPage),
}

impl ListingResponse {
    pub fn into_products(self) -> Vec<ProductSummary> {
        match self {
            Self::Wrapped { data } => data.products,
            Self::Bare(page) => page.products,
        }
    }
}

impl<'de> Deserialize<'de> for ListingResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        let wrapped = value.get("products").is_none() && value.get("data").is_some();
        let page = if wrapped {
            value
                .get_mut("data")
                .map(serde_json::Value::take)
                .unwrap_or_default()
        } else {
            value
        };
        let page =
            ListingPage::deserialize(page).map_err(<D::Error as serde::de::Error>::custom)?;
        Ok(if wrapped {
            Self::Wrapped { data: page }
        } else {
            Self::Bare(page)
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListingPage {
    pub products: Vec<ProductSummary>,
}

/// One product summary from the storefront listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Price,
    /// Release date as epoch seconds. The storefront sends a number or a string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub global_release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_operating_systems: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub developer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publisher: String,
    /// Protocol-relative image URL fragment (`//images.gog.com/...`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gallery: Vec<String>,
}

impl ProductSummary {
    /// Release date as an ISO-8601 UTC timestamp, if present and parseable.
    pub fn release_date(&self) -> Option<String> {
        self.global_release_date.as_deref().and_then(release_date_iso)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Price {
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
}

impl Price {
    /// Numeric price; missing or malformed amounts count as free.
    pub fn value(&self) -> f64 {
        self.amount
            .as_deref()
            .and_then(|a| a.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

/// Convert storefront epoch seconds to an ISO-8601 timestamp with millisecond
/// precision, e.g. `"1600000000"` becomes `"2020-09-13T12:26:40.000Z"`.
///
/// Returns `None` for empty, non-numeric, or out-of-range input.
pub fn release_date_iso(epoch_seconds: &str) -> Option<String> {
    let secs: i64 = epoch_seconds.trim().parse().ok()?;
    let ts = DateTime::<Utc>::from_timestamp_millis(secs.checked_mul(1000)?)?;
    Some(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Descriptions extracted from a product's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    pub rating: String,
    pub short_description: String,
    pub description: String,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_date_iso() {
        assert_eq!(
            release_date_iso("1600000000").as_deref(),
            Some("2020-09-13T12:26:40.000Z")
        );
        assert_eq!(release_date_iso("0").as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(release_date_iso(""), None);
        assert_eq!(release_date_iso("soon"), None);
    }

    #[test]
    fn test_listing_bare_and_wrapped() {
        let bare = r#"{"products":[{"title":"Foo Game","slug":"foo_game"}],"totalPages":3}"#;
        let wrapped = r#"{"data":{"products":[{"title":"Foo Game","slug":"foo_game"}]}}"#;

        let bare: ListingResponse = serde_json::from_str(bare).unwrap();
        let wrapped: ListingResponse = serde_json::from_str(wrapped).unwrap();

        assert_eq!(bare.into_products()[0].title, "Foo Game");
        assert_eq!(wrapped.into_products()[0].slug, "foo_game");
    }

    #[test]
    fn test_product_summary_fields() {
        let json = r#"{
            "title": "Foo Game",
            "slug": "foo_game",
            "price": {"amount": "9.99"},
            "globalReleaseDate": 1600000000,
            "genres": ["Action", "Adventure"],
            "supportedOperatingSystems": ["windows", "linux"],
            "developer": "Foo Studio",
            "publisher": "Foo Publishing",
            "image": "//images.gog.com/abc",
            "gallery": ["//images.gog.com/g1"]
        }"#;
        let product: ProductSummary = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.value(), 9.99);
        assert_eq!(product.global_release_date.as_deref(), Some("1600000000"));
        assert_eq!(product.release_date().as_deref(), Some("2020-09-13T12:26:40.000Z"));
        assert_eq!(product.supported_operating_systems, vec!["windows", "linux"]);
        assert_eq!(product.gallery.len(), 1);
    }

    #[test]
    fn test_product_summary_defaults() {
        let product: ProductSummary =
            serde_json::from_str(r#"{"title":"Bare","slug":"bare","price":{"amount":null}}"#)
                .unwrap();
        assert_eq!(product.price.value(), 0.0);
        assert!(product.genres.is_empty());
        assert_eq!(product.release_date(), None);
    }

    #[test]
    fn test_listing_tolerates_null_fields() {
        let json = r#"{"products":[
            {"title":"A","slug":"a","genres":null,"supportedOperatingSystems":null},
            {"title":"B","slug":"b","developer":null,"publisher":null,"price":null},
            {"title":"C","slug":"c","image":null,"gallery":null,"genres":["Action"]}
        ]}"#;
        let products = serde_json::from_str::<ListingResponse>(json)
            .unwrap()
            .into_products();

        assert_eq!(products.len(), 3);
        assert!(products[0].genres.is_empty());
        assert!(products[0].supported_operating_systems.is_empty());
        assert_eq!(products[1].developer, "");
        assert_eq!(products[1].publisher, "");
        assert_eq!(products[1].price.value(), 0.0);
        assert_eq!(products[2].image, "");
        assert!(products[2].gallery.is_empty());
        assert_eq!(products[2].genres, vec!["Action"]);
    }

    #[test]
    fn test_listing_requires_products() {
        let err = serde_json::from_str::<ListingResponse>(r#"{"error":"rate limited"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("products"), "{}", err);

        let err = serde_json::from_str::<ListingResponse>(r#"{"data":{"message":"nope"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("products"), "{}", err);
    }

    #[test]
    fn test_listing_error_names_the_problem() {
        let err = serde_json::from_str::<ListingResponse>(
            r#"{"products":[{"title":null,"slug":"a"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("null"), "{}", err);
        assert!(!err.to_string().contains("untagged"), "{}", err);
    }
}
