/// Query parameters for the storefront's filtered listing.
///
/// Starts from `sort=popularity&page=1`; callers override or add raw filter
/// keys with [`ListingParams::set`]. `mediaType` is always `game`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingParams {
    pairs: Vec<(String, String)>,
}

const MEDIA_TYPE_KEY: &str = "mediaType";

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            pairs: vec![
                ("sort".to_string(), "popularity".to_string()),
                ("page".to_string(), "1".to_string()),
            ],
        }
    }
}

impl ListingParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an existing value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if key == MEDIA_TYPE_KEY {
            log::warn!("Ignoring '{}={}': media type is fixed to game", key, value);
            return self;
        }
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Parse `key=value` and set it.
    pub fn set_raw(&mut self, raw: &str) -> Result<&mut Self, String> {
        match raw.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok(self.set(k.trim(), v.trim())),
            _ => Err(format!("expected key=value, got '{}'", raw)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == MEDIA_TYPE_KEY {
            return Some("game");
        }
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Pairs in request order, `mediaType=game` first.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        std::iter::once((MEDIA_TYPE_KEY.to_string(), "game".to_string()))
            .chain(self.pairs.iter().cloned())
            .collect()
    }
}
