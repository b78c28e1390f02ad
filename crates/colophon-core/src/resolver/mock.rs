//! Mock backend for testing resolution flows.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use super::{BackendError, EntityId, EntityKind, LibraryBackend};

/// A scriptable [`LibraryBackend`] for tests.
///
/// Supports:
/// - Pre-seeded known names (per kind).
/// - A queue of create results (one per call); when the queue is empty,
///   creates succeed with sequential ids unless `fail_creates_with` was set.
/// - Call counting via [`create_calls`](MockBackend::create_calls) and
///   [`lookup_calls`](MockBackend::lookup_calls).
#[derive(Debug, Default)]
pub struct MockBackend {
    known: HashMap<(EntityKind, String), EntityId>,
    script: VecDeque<Result<EntityId, BackendError>>,
    fallback_error: Option<BackendError>,
    next_id: EntityId,
    create_calls: usize,
    lookup_calls: Cell<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_id: 1000,
            ..Default::default()
        }
    }

    /// Seed a name the backend already knows.
    pub fn with_known(mut self, kind: EntityKind, name: &str, id: EntityId) -> Self {
        self.known.insert((kind, name.to_string()), id);
        self
    }

    /// Queue the result of the next create call. Queued results are consumed
    /// in order; once exhausted, creates fall back to default behavior.
    pub fn queue_create(&mut self, result: Result<EntityId, BackendError>) {
        self.script.push_back(result);
    }

    /// Make every unscripted create fail with `error`.
    pub fn fail_creates_with(mut self, error: BackendError) -> Self {
        self.fallback_error = Some(error);
        self
    }

    /// How many times `create()` has been called.
    pub fn create_calls(&self) -> usize {
        self.create_calls
    }

    /// How many times `lookup()` has been called.
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.get()
    }
}

impl LibraryBackend for MockBackend {
    fn lookup(&self, kind: EntityKind, name: &str) -> Option<EntityId> {
        self.lookup_calls.set(self.lookup_calls.get() + 1);
        self.known.get(&(kind, name.to_string())).copied()
    }

    fn create(&mut self, kind: EntityKind, name: &str) -> Result<EntityId, BackendError> {
        self.create_calls += 1;
        if let Some(scripted) = self.script.pop_front() {
            if let Ok(id) = scripted {
                self.known.insert((kind, name.to_string()), id);
            }
            return scripted;
        }
        if let Some(error) = &self.fallback_error {
            return Err(error.clone());
        }
        let id = self.next_id;
        self.next_id += 1;
        self.known.insert((kind, name.to_string()), id);
        Ok(id)
    }
}
