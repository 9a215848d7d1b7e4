//! Test-only `PoiSource` doubles used by unit and behaviour tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{PoiQuery, PoiSource, PoiSourceError, RawElement};

/// In-memory `PoiSource` that records how it was called.
///
/// By default every query receives the same elements. Routes keyed by a
/// filter string (`key=value`) let one stub answer target and competitor
/// lookups differently.
#[derive(Debug, Default)]
pub struct StubPoiSource {
    elements: Vec<RawElement>,
    routes: HashMap<String, Vec<RawElement>>,
    failure: Option<PoiSourceError>,
    calls: AtomicUsize,
    last_query: Mutex<Option<PoiQuery>>,
}

impl StubPoiSource {
    /// Stub answering every query with `elements`.
    #[must_use]
    pub fn with_elements(elements: Vec<RawElement>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// Stub failing every query with `error`.
    #[must_use]
    pub fn failing(error: PoiSourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Answer queries whose first filter renders as `filter` with `elements`.
    #[must_use]
    pub fn with_route(mut self, filter: &str, elements: Vec<RawElement>) -> Self {
        self.routes.insert(filter.to_owned(), elements);
        self
    }

    /// Number of queries received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent query, if any.
    pub fn last_query(&self) -> Option<PoiQuery> {
        self.last_query
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }
}

#[async_trait]
impl PoiSource for StubPoiSource {
    async fn fetch_elements(&self, query: &PoiQuery) -> Result<Vec<RawElement>, PoiSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.last_query.lock() {
            Ok(mut guard) => *guard = Some(query.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(query.clone()),
        }

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let routed = query
            .filters
            .first()
            .and_then(|filter| self.routes.get(&filter.to_string()));
        Ok(routed.unwrap_or(&self.elements).clone())
    }
}
