use std::collections::{BTreeSet, HashMap};

use gog_catalog_core::{
    Collection, EntityKind, EntityRecord, EntityStore, NewEntity, NewReference, ProductSummary,
};
use tokio::sync::Mutex;

use crate::error::PopulateError;

/// How a name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Existing,
    Created,
}

/// Counts from materializing the references of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceStats {
    pub created: HashMap<EntityKind, usize>,
    pub existing: HashMap<EntityKind, usize>,
}

impl ReferenceStats {
    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }

    pub fn total_existing(&self) -> usize {
        self.existing.values().sum()
    }

    fn record(&mut self, kind: EntityKind, resolution: Resolution) {
        let bucket = match resolution {
            Resolution::Created => &mut self.created,
            Resolution::Existing => &mut self.existing,
        };
        *bucket.entry(kind).or_default() += 1;
    }
}

/// Distinct reference names referenced by a listing, per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceNames {
    pub developers: BTreeSet<String>,
    pub publishers: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub platforms: BTreeSet<String>,
}

impl ReferenceNames {
    /// Collect distinct names across all products. Blank names are skipped.
    pub fn collect(products: &[ProductSummary]) -> Self {
        fn add(set: &mut BTreeSet<String>, name: &str) {
            if !name.trim().is_empty() {
                set.insert(name.to_string());
            }
        }

        let mut names = Self::default();
        for product in products {
            add(&mut names.developers, &product.developer);
            add(&mut names.publishers, &product.publisher);
            for genre in &product.genres {
                add(&mut names.categories, genre);
            }
            for os in &product.supported_operating_systems {
                add(&mut names.platforms, os);
            }
        }
        names
    }
}

/// Record ids a game's relations point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    pub categories: Vec<u64>,
    pub platforms: Vec<u64>,
    pub developers: Vec<u64>,
    pub publisher: Option<u64>,
    /// Names that had no record in the store.
    pub missing: Vec<(EntityKind, String)>,
}

/// Find-by-name-else-create over the host store.
///
/// Creation is serialized per entity kind: a resolution holds the kind's
/// lock across its find and create, so two resolutions of the same name in
/// this process never both create. Other processes writing to the same host
/// are not covered.
pub struct Resolver<'a, S: EntityStore> {
    store: &'a S,
    locks: HashMap<EntityKind, Mutex<()>>,
}

impl<'a, S: EntityStore> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        let locks = EntityKind::all()
            .iter()
            .map(|&kind| (kind, Mutex::new(())))
            .collect();
        Self { store, locks }
    }

    fn collection(&self, kind: EntityKind) -> Collection<'a, S> {
        Collection::new(self.store, kind)
    }

    /// Look up a record by exact name without creating it.
    pub async fn find(&self, kind: EntityKind, name: &str) -> Result<Option<EntityRecord>, PopulateError> {
        Ok(self.collection(kind).find_by_name(name).await?)
    }

    /// Return the record named `name`, creating it if absent.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> Result<(EntityRecord, Resolution), PopulateError> {
        let _guard = match self.locks.get(&kind) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let collection = self.collection(kind);
        if let Some(existing) = collection.find_by_name(name).await? {
            return Ok((existing, Resolution::Existing));
        }

        let created = collection
            .create(&NewEntity::Reference(NewReference::new(name)))
            .await?;
        log::debug!("Created {} '{}' ({})", kind, created.name, created.slug);
        Ok((created, Resolution::Created))
    }

    /// Resolve every distinct reference name in `products` exactly once.
    /// The four reference kinds run concurrently.
    pub async fn materialize(&self, products: &[ProductSummary]) -> Result<ReferenceStats, PopulateError> {
        let names = ReferenceNames::collect(products);

        let (developers, publishers, categories, platforms) = tokio::try_join!(
            self.resolve_all(EntityKind::Developer, &names.developers),
            self.resolve_all(EntityKind::Publisher, &names.publishers),
            self.resolve_all(EntityKind::Category, &names.categories),
            self.resolve_all(EntityKind::Platform, &names.platforms),
        )?;

        let mut stats = ReferenceStats::default();
        for (kind, resolutions) in [
            (EntityKind::Developer, developers),
            (EntityKind::Publisher, publishers),
            (EntityKind::Category, categories),
            (EntityKind::Platform, platforms),
        ] {
            for resolution in resolutions {
                stats.record(kind, resolution);
            }
        }
        Ok(stats)
    }

    async fn resolve_all(
        &self,
        kind: EntityKind,
        names: &BTreeSet<String>,
    ) -> Result<Vec<Resolution>, PopulateError> {
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let (_, resolution) = self.resolve(kind, name).await?;
            out.push(resolution);
        }
        Ok(out)
    }

    /// Look up a product's relation targets by name. Every lookup queries the
    /// store again; names without a record are reported in `missing`.
    pub async fn relations(&self, product: &ProductSummary) -> Result<Relations, PopulateError> {
        let mut relations = Relations::default();

        for genre in &product.genres {
            if let Some(id) = self.lookup(EntityKind::Category, genre, &mut relations).await? {
                relations.categories.push(id);
            }
        }
        for os in &product.supported_operating_systems {
            if let Some(id) = self.lookup(EntityKind::Platform, os, &mut relations).await? {
                relations.platforms.push(id);
            }
        }
        if let Some(id) = self
            .lookup(EntityKind::Developer, &product.developer, &mut relations)
            .await?
        {
            relations.developers.push(id);
        }
        relations.publisher = self
            .lookup(EntityKind::Publisher, &product.publisher, &mut relations)
            .await?;

        Ok(relations)
    }

    async fn lookup(
        &self,
        kind: EntityKind,
        name: &str,
        relations: &mut Relations,
    ) -> Result<Option<u64>, PopulateError> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        let found = self.find(kind, name).await?;
        if found.is_none() {
            relations.missing.push((kind, name.to_string()));
        }
        Ok(found.map(|r| r.id))
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
