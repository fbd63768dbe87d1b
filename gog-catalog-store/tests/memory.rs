use gog_catalog_core::*;
use gog_catalog_store::*;

fn reference(name: &str) -> NewEntity {
    NewEntity::Reference(NewReference::new(name))
}

fn upload(ref_id: u64, field: ImageField) -> ImageUpload {
    ImageUpload {
        ref_id,
        ref_uid: EntityKind::Game.uid(),
        field,
        filename: "foo-game.jpg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

#[tokio::test]
async fn create_then_find_by_exact_name() {
    let store = MemoryStore::new();
    let created = store
        .create(EntityKind::Developer, &reference("Foo Studio"))
        .await
        .unwrap();
    assert_eq!(created.slug, "foo-studio");

    let found = store
        .find_by_name(EntityKind::Developer, "Foo Studio")
        .await
        .unwrap();
    assert_eq!(found, Some(created));

    let missing = store
        .find_by_name(EntityKind::Developer, "Foo studio")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn ids_are_unique_across_kinds() {
    let store = MemoryStore::new();
    let a = store
        .create(EntityKind::Category, &reference("Action"))
        .await
        .unwrap();
    let b = store
        .create(EntityKind::Platform, &reference("Windows"))
        .await
        .unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.count(EntityKind::Category), 1);
    assert_eq!(store.count(EntityKind::Platform), 1);
    assert_eq!(store.count(EntityKind::Game), 0);
}

#[tokio::test]
async fn find_reports_pagination() {
    let store = MemoryStore::new();
    for _ in 0..3 {
        store
            .create(EntityKind::Publisher, &reference("Dup"))
            .await
            .unwrap();
    }
    let found = store
        .find(EntityKind::Publisher, &EntityFilter::name("Dup"))
        .await
        .unwrap();
    assert_eq!(found.results.len(), 3);
    assert_eq!(found.pagination.total, 3);
    assert_eq!(found.pagination.page_count, 1);
    assert_eq!(store.find_calls(), 1);
}

#[tokio::test]
async fn payload_is_kept_for_inspection() {
    let store = MemoryStore::new();
    let record = store
        .create(EntityKind::Platform, &reference("Mac OS X"))
        .await
        .unwrap();
    let payload = store.payload(EntityKind::Platform, record.id).unwrap();
    assert_eq!(payload.slug(), "mac-os-x");
}

#[tokio::test]
async fn uploads_are_recorded_per_field() {
    let store = MemoryStore::new();
    store.upload(upload(1, ImageField::Cover)).await.unwrap();
    store.upload(upload(1, ImageField::Gallery)).await.unwrap();
    store.upload(upload(1, ImageField::Gallery)).await.unwrap();

    assert_eq!(store.uploads_for(1, ImageField::Cover), 1);
    assert_eq!(store.uploads_for(1, ImageField::Gallery), 2);
    assert_eq!(store.uploads()[0].ref_uid, "api::game.game");
    assert_eq!(store.uploads()[0].size, 3);
}

#[tokio::test]
async fn rejecting_store_fails_uploads() {
    let store = MemoryStore::rejecting_uploads();
    let err = store.upload(upload(1, ImageField::Cover)).await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 500, .. }));
    assert!(store.uploads().is_empty());
}
