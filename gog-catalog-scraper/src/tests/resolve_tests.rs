use gog_catalog_core::EntityStore;
use gog_catalog_store::MemoryStore;

use super::*;

fn product(title: &str, developer: &str, publisher: &str, genres: &[&str], oses: &[&str]) -> ProductSummary {
    ProductSummary {
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "_"),
        price: Default::default(),
        global_release_date: None,
        genres: genres.iter().map(|s| s.to_string()).collect(),
        supported_operating_systems: oses.iter().map(|s| s.to_string()).collect(),
        developer: developer.to_string(),
        publisher: publisher.to_string(),
        image: String::new(),
        gallery: Vec::new(),
    }
}

#[test]
fn collect_dedupes_names_across_products() {
    let products = vec![
        product("A", "Studio", "Pub", &["Action", "RPG"], &["windows"]),
        product("B", "Studio", "Other Pub", &["RPG"], &["windows", "linux"]),
        product("C", "", "Pub", &[], &[]),
    ];
    let names = ReferenceNames::collect(&products);
    assert_eq!(names.developers.len(), 1);
    assert_eq!(names.publishers.len(), 2);
    assert_eq!(names.categories.len(), 2);
    assert_eq!(names.platforms.len(), 2);
}

#[tokio::test]
async fn resolve_is_idempotent() {
    let store = MemoryStore::new();
    let resolver = Resolver::new(&store);

    let (first, how) = resolver.resolve(EntityKind::Developer, "CD PROJEKT RED").await.unwrap();
    assert_eq!(how, Resolution::Created);
    assert_eq!(first.slug, "cd-projekt-red");

    let (second, how) = resolver.resolve(EntityKind::Developer, "CD PROJEKT RED").await.unwrap();
    assert_eq!(how, Resolution::Existing);
    assert_eq!(first, second);
    assert_eq!(store.count(EntityKind::Developer), 1);
}

#[tokio::test]
async fn concurrent_resolutions_of_one_name_create_once() {
    let store = MemoryStore::new();
    let resolver = Resolver::new(&store);

    let (a, b, c) = tokio::join!(
        resolver.resolve(EntityKind::Category, "Strategy"),
        resolver.resolve(EntityKind::Category, "Strategy"),
        resolver.resolve(EntityKind::Category, "Strategy"),
    );
    let ids = [a.unwrap().0.id, b.unwrap().0.id, c.unwrap().0.id];
    assert!(ids.iter().all(|&id| id == ids[0]));
    assert_eq!(store.count(EntityKind::Category), 1);
}

#[tokio::test]
async fn materialize_creates_one_record_per_distinct_name() {
    let store = MemoryStore::new();
    let resolver = Resolver::new(&store);
    let products = vec![
        product("A", "Studio", "Pub", &["Action", "RPG"], &["windows"]),
        product("B", "Studio", "Pub", &["RPG"], &["windows", "linux"]),
    ];

    let stats = resolver.materialize(&products).await.unwrap();
    assert_eq!(stats.total_created(), 6);
    assert_eq!(stats.total_existing(), 0);
    assert_eq!(store.count(EntityKind::Developer), 1);
    assert_eq!(store.count(EntityKind::Publisher), 1);
    assert_eq!(store.count(EntityKind::Category), 2);
    assert_eq!(store.count(EntityKind::Platform), 2);

    let again = resolver.materialize(&products).await.unwrap();
    assert_eq!(again.total_created(), 0);
    assert_eq!(again.total_existing(), 6);
    assert_eq!(store.count(EntityKind::Category), 2);
}

#[tokio::test]
async fn relations_requery_and_report_missing() {
    let store = MemoryStore::new();
    let resolver = Resolver::new(&store);
    resolver.resolve(EntityKind::Category, "Action").await.unwrap();
    resolver.resolve(EntityKind::Developer, "Studio").await.unwrap();

    let before = store.find_calls();
    let p = product("A", "Studio", "Unknown Pub", &["Action", "Puzzle"], &[]);
    let relations = resolver.relations(&p).await.unwrap();

    assert_eq!(relations.categories.len(), 1);
    assert_eq!(relations.developers.len(), 1);
    assert_eq!(relations.publisher, None);
    assert_eq!(
        relations.missing,
        vec![
            (EntityKind::Category, "Puzzle".to_string()),
            (EntityKind::Publisher, "Unknown Pub".to_string()),
        ]
    );
    assert_eq!(store.find_calls() - before, 4);
    assert!(store.find_by_name(EntityKind::Category, "Puzzle").await.unwrap().is_none());
}
