use gog_catalog_core::{
    EntityKind, EntityRecord, GALLERY_LIMIT, ImageField, ImageUpload, MediaUploader, ProductSummary,
    image_url,
};

use crate::client::Storefront;
use crate::error::PopulateError;

/// Result of attaching a product's images to its game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaOutcome {
    pub uploaded: usize,
    pub warnings: Vec<String>,
}

/// Download one storefront image and attach it to `game`'s `field`.
pub async fn upload_image<F, U>(
    storefront: &F,
    uploader: &U,
    fragment: &str,
    game: &EntityRecord,
    field: ImageField,
) -> Result<(), PopulateError>
where
    F: Storefront,
    U: MediaUploader,
{
    let url = image_url(fragment);
    let bytes = storefront.download(&url).await?;

    let filename = format!("{}.jpg", game.slug);
    log::info!("Uploading {} image: {}", field, filename);

    uploader
        .upload(ImageUpload {
            ref_id: game.id,
            ref_uid: EntityKind::Game.uid(),
            field,
            filename,
            bytes,
        })
        .await?;
    Ok(())
}

/// Upload the cover, then up to [`GALLERY_LIMIT`] gallery images one after
/// another. Failures are logged and collected; they never abort the product.
pub async fn upload_game_media<F, U>(
    storefront: &F,
    uploader: &U,
    product: &ProductSummary,
    game: &EntityRecord,
) -> MediaOutcome
where
    F: Storefront,
    U: MediaUploader,
{
    let mut outcome = MediaOutcome::default();

    let cover = (!product.image.trim().is_empty()).then_some(product.image.as_str());
    let gallery = product
        .gallery
        .iter()
        .take(GALLERY_LIMIT)
        .map(|fragment| (ImageField::Gallery, fragment.as_str()));

    for (field, fragment) in cover.map(|c| (ImageField::Cover, c)).into_iter().chain(gallery) {
        match upload_image(storefront, uploader, fragment, game, field).await {
            Ok(()) => outcome.uploaded += 1,
            Err(e) => {
                log::warn!("Failed to upload {} image for '{}': {}", field, game.name, e);
                outcome.warnings.push(format!("{} image {}: {}", field, fragment, e));
            }
        }
    }

    outcome
}
