/// Suffix the storefront image CDN needs to serve the 1680x655 crop.
pub const IMAGE_SUFFIX: &str = "_bg_crop_1680x655.jpg";

/// Maximum number of gallery images attached to a single game.
pub const GALLERY_LIMIT: usize = 5;

/// Which media field of a game an upload attaches to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageField {
    #[default]
    Cover,
    Gallery,
}

impl ImageField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Gallery => "gallery",
        }
    }
}

impl std::fmt::Display for ImageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full download URL for a protocol-relative image fragment.
pub fn image_url(fragment: &str) -> String {
    format!("https:{}{}", fragment, IMAGE_SUFFIX)
}

/// A binary file to attach to a record field in the host store.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Host id of the record the file attaches to.
    pub ref_id: u64,
    /// Content type UID of that record (`api::game.game`).
    pub ref_uid: String,
    pub field: ImageField,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("//images.gog.com/abc123"),
            "https://images.gog.com/abc123_bg_crop_1680x655.jpg"
        );
    }

    #[test]
    fn test_default_field_is_cover() {
        assert_eq!(ImageField::default(), ImageField::Cover);
        assert_eq!(ImageField::Gallery.to_string(), "gallery");
    }
}
