//! Create-or-lookup resolution of raw entity names to library ids.
//!
//! Extracted text carries author/series/genre names as plain strings; before
//! a book row can be written they must become foreign-key ids. The resolver
//! diffs names against a [`LibraryBackend`] and creates whatever is missing.
//! Matching is case-sensitive exact, and a single entity's failure never
//! aborts the others.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AnalyzedBook, BookRecord};

pub mod mock;

pub use mock::MockBackend;

/// Library-assigned id for an author, series, or genre row.
pub type EntityId = i64;

/// The kinds of entities a book references by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Author,
    Series,
    Genre,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Author => write!(f, "author"),
            EntityKind::Series => write!(f, "series"),
            EntityKind::Genre => write!(f, "genre"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("rejected name: {0}")]
    Rejected(String),
}

/// Storage boundary for entity rows.
///
/// `create` is idempotent by name: creating a name that already exists must
/// return the existing id rather than fail.
pub trait LibraryBackend {
    fn lookup(&self, kind: EntityKind, name: &str) -> Option<EntityId>;
    fn create(&mut self, kind: EntityKind, name: &str) -> Result<EntityId, BackendError>;
}

/// A create attempt that failed for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveFailure {
    pub kind: EntityKind,
    pub name: String,
    pub error: BackendError,
}

/// Name → id maps produced by a resolution pass, plus what was created and
/// what failed. Maps are ordered for stable display and JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub authors: BTreeMap<String, EntityId>,
    pub series: BTreeMap<String, EntityId>,
    pub genres: BTreeMap<String, EntityId>,
    pub created: Vec<(EntityKind, String)>,
    pub errors: Vec<ResolveFailure>,
}

impl Resolution {
    fn map_for(&mut self, kind: EntityKind) -> &mut BTreeMap<String, EntityId> {
        match kind {
            EntityKind::Author => &mut self.authors,
            EntityKind::Series => &mut self.series,
            EntityKind::Genre => &mut self.genres,
        }
    }
}

/// Resolves raw names through a backend, creating missing entities.
pub struct EntityResolver<B> {
    backend: B,
}

impl<B: LibraryBackend> EntityResolver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the resolver, handing back the backend (e.g. to persist the
    /// updated catalog).
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Resolve one book's worth of names. Empty names are skipped.
    pub fn resolve(
        &mut self,
        author: &str,
        series: Option<&str>,
        genres: &[String],
    ) -> Resolution {
        let mut resolution = Resolution::default();
        self.resolve_one(EntityKind::Author, author, &mut resolution);
        if let Some(series) = series {
            self.resolve_one(EntityKind::Series, series, &mut resolution);
        }
        for genre in genres {
            self.resolve_one(EntityKind::Genre, genre, &mut resolution);
        }
        resolution
    }

    /// Resolve the names an [`AnalyzedBook`] carries.
    pub fn resolve_analyzed(&mut self, book: &AnalyzedBook) -> Resolution {
        self.resolve(&book.author, book.series.as_deref(), &book.genres)
    }

    /// Resolve the names a [`BookRecord`] carries.
    pub fn resolve_record(&mut self, record: &BookRecord) -> Resolution {
        let series = if record.series.is_empty() {
            None
        } else {
            Some(record.series.as_str())
        };
        self.resolve(&record.author, series, &record.genres)
    }

    fn resolve_one(&mut self, kind: EntityKind, name: &str, resolution: &mut Resolution) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(id) = self.backend.lookup(kind, name) {
            tracing::debug!(%kind, name, id, "resolved existing entity");
            resolution.map_for(kind).insert(name.to_string(), id);
            return;
        }
        match self.backend.create(kind, name) {
            Ok(id) => {
                tracing::info!(%kind, name, id, "created entity");
                resolution.map_for(kind).insert(name.to_string(), id);
                resolution.created.push((kind, name.to_string()));
            }
            Err(error) => {
                tracing::warn!(%kind, name, %error, "entity creation failed");
                resolution.errors.push(ResolveFailure {
                    kind,
                    name: name.to_string(),
                    error,
                });
            }
        }
    }
}

/// In-memory backend over the known option lists.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    authors: BTreeMap<String, EntityId>,
    series: BTreeMap<String, EntityId>,
    genres: BTreeMap<String, EntityId>,
    next_id: EntityId,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            authors: BTreeMap::new(),
            series: BTreeMap::new(),
            genres: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Seed an entity with a known id (e.g. loaded from a catalog file).
    pub fn insert(&mut self, kind: EntityKind, id: EntityId, name: impl Into<String>) {
        self.map_for(kind).insert(name.into(), id);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Author => self.authors.len(),
            EntityKind::Series => self.series.len(),
            EntityKind::Genre => self.genres.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.series.is_empty() && self.genres.is_empty()
    }

    fn map_for(&mut self, kind: EntityKind) -> &mut BTreeMap<String, EntityId> {
        match kind {
            EntityKind::Author => &mut self.authors,
            EntityKind::Series => &mut self.series,
            EntityKind::Genre => &mut self.genres,
        }
    }

    fn map_ref(&self, kind: EntityKind) -> &BTreeMap<String, EntityId> {
        match kind {
            EntityKind::Author => &self.authors,
            EntityKind::Series => &self.series,
            EntityKind::Genre => &self.genres,
        }
    }
}

impl LibraryBackend for InMemoryBackend {
    fn lookup(&self, kind: EntityKind, name: &str) -> Option<EntityId> {
        self.map_ref(kind).get(name).copied()
    }

    fn create(&mut self, kind: EntityKind, name: &str) -> Result<EntityId, BackendError> {
        if let Some(id) = self.lookup(kind, name) {
            return Ok(id);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.map_for(kind).insert(name.to_string(), id);
        Ok(id)
    }
}

/// On-disk JSON catalog of known entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub authors: Vec<CatalogEntry>,
    #[serde(default)]
    pub series: Vec<CatalogEntry>,
    #[serde(default)]
    pub genres: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntityId,
    pub name: String,
}

impl Catalog {
    /// Build a seeded in-memory backend from the catalog.
    pub fn into_backend(self) -> InMemoryBackend {
        let mut backend = InMemoryBackend::new();
        for entry in self.authors {
            backend.insert(EntityKind::Author, entry.id, entry.name);
        }
        for entry in self.series {
            backend.insert(EntityKind::Series, entry.id, entry.name);
        }
        for entry in self.genres {
            backend.insert(EntityKind::Genre, entry.id, entry.name);
        }
        backend
    }
}

impl From<&InMemoryBackend> for Catalog {
    fn from(backend: &InMemoryBackend) -> Self {
        let entries = |map: &BTreeMap<String, EntityId>| {
            let mut v: Vec<CatalogEntry> = map
                .iter()
                .map(|(name, &id)| CatalogEntry {
                    id,
                    name: name.clone(),
                })
                .collect();
            v.sort_by_key(|e| e.id);
            v
        };
        Catalog {
            authors: entries(&backend.authors),
            series: entries(&backend.series),
            genres: entries(&backend.genres),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_backend() -> InMemoryBackend {
        let mut backend = InMemoryBackend::new();
        backend.insert(EntityKind::Author, 10, "Frank Herbert");
        backend.insert(EntityKind::Genre, 20, "Science Fiction");
        backend
    }

    #[test]
    fn existing_names_resolve_without_creation() {
        let mut resolver = EntityResolver::new(seeded_backend());
        let resolution = resolver.resolve(
            "Frank Herbert",
            None,
            &["Science Fiction".to_string()],
        );
        assert_eq!(resolution.authors["Frank Herbert"], 10);
        assert_eq!(resolution.genres["Science Fiction"], 20);
        assert!(resolution.created.is_empty());
        assert!(resolution.errors.is_empty());
    }

    #[test]
    fn missing_names_are_created() {
        let mut resolver = EntityResolver::new(seeded_backend());
        let resolution = resolver.resolve(
            "Ursula K. Le Guin",
            Some("Earthsea Cycle"),
            &["Fantasy".to_string()],
        );
        assert_eq!(resolution.created.len(), 3);
        assert!(resolution.authors.contains_key("Ursula K. Le Guin"));
        assert!(resolution.series.contains_key("Earthsea Cycle"));
        assert!(resolution.genres.contains_key("Fantasy"));
        // Created entities are immediately visible in the backend.
        assert_eq!(
            resolver.backend().lookup(EntityKind::Genre, "Fantasy"),
            resolution.genres.get("Fantasy").copied()
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut resolver = EntityResolver::new(seeded_backend());
        let resolution = resolver.resolve("frank herbert", None, &[]);
        // "frank herbert" != "Frank Herbert": a new row is created.
        assert_eq!(resolution.created.len(), 1);
        assert_ne!(resolution.authors["frank herbert"], 10);
    }

    #[test]
    fn empty_names_are_skipped() {
        let mut resolver = EntityResolver::new(InMemoryBackend::new());
        let resolution = resolver.resolve("", Some("  "), &["".to_string()]);
        assert!(resolution.authors.is_empty());
        assert!(resolution.series.is_empty());
        assert!(resolution.genres.is_empty());
        assert!(resolution.created.is_empty());
    }

    #[test]
    fn one_failure_does_not_abort_the_rest() {
        let mut mock = MockBackend::new();
        mock.queue_create(Err(BackendError::Unavailable("author table locked".into())));
        let mut resolver = EntityResolver::new(mock);
        let resolution = resolver.resolve(
            "New Author",
            Some("New Series"),
            &["New Genre".to_string()],
        );
        assert_eq!(resolution.errors.len(), 1);
        assert_eq!(resolution.errors[0].kind, EntityKind::Author);
        // Series and genre still went through.
        assert!(resolution.series.contains_key("New Series"));
        assert!(resolution.genres.contains_key("New Genre"));
        assert_eq!(resolver.backend().create_calls(), 3);
    }

    #[test]
    fn record_resolution_skips_empty_series() {
        let mut resolver = EntityResolver::new(InMemoryBackend::new());
        let record = BookRecord {
            author: "Frank Herbert".to_string(),
            genres: vec!["Science Fiction".to_string()],
            ..Default::default()
        };
        let resolution = resolver.resolve_record(&record);
        assert!(resolution.series.is_empty());
        assert_eq!(resolution.created.len(), 2);
    }

    #[test]
    fn in_memory_create_is_idempotent_by_name() {
        let mut backend = InMemoryBackend::new();
        let a = backend.create(EntityKind::Genre, "Fantasy").unwrap();
        let b = backend.create(EntityKind::Genre, "Fantasy").unwrap();
        assert_eq!(a, b);
        assert_eq!(backend.len(EntityKind::Genre), 1);
    }

    #[test]
    fn catalog_round_trip() {
        let mut backend = InMemoryBackend::new();
        backend.insert(EntityKind::Author, 3, "Frank Herbert");
        backend.insert(EntityKind::Series, 7, "Dune Chronicles");
        let catalog = Catalog::from(&backend);
        assert_eq!(catalog.authors[0].name, "Frank Herbert");

        let rebuilt = catalog.into_backend();
        assert_eq!(rebuilt.lookup(EntityKind::Series, "Dune Chronicles"), Some(7));
        // New ids continue past the highest seeded id.
        let mut rebuilt = rebuilt;
        let id = rebuilt.create(EntityKind::Genre, "Fantasy").unwrap();
        assert!(id > 7);
    }
}
