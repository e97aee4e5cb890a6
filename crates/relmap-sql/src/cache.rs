use crate::QuerySignature;

use relmap_core::Result;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Structural-signature to SQL-text cache.
///
/// Shared by the query, count, and merge builders. Read-mostly: lookups take
/// the read lock, generation happens with no lock held, and the publish is
/// first-writer-wins (a race that generates the same SQL twice is fine, the
/// first insert sticks). Injected alongside the mapping registry so tests
/// can clear and inspect it.
#[derive(Debug, Default)]
pub struct SqlCache {
    inner: RwLock<HashMap<QuerySignature, Arc<str>>>,
}

impl SqlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, signature: &QuerySignature) -> Option<Arc<str>> {
        self.inner.read().unwrap().get(signature).cloned()
    }

    /// Returns the cached SQL for a signature, generating and publishing it
    /// on first use.
    pub fn get_or_build(
        &self,
        signature: QuerySignature,
        build: impl FnOnce() -> Result<String>,
    ) -> Result<Arc<str>> {
        if let Some(sql) = self.get(&signature) {
            return Ok(sql);
        }

        let sql: Arc<str> = Arc::from(build()?);
        tracing::trace!(?signature, "sql cache miss");

        let mut inner = self.inner.write().unwrap();
        Ok(inner.entry(signature).or_insert(sql).clone())
    }

    pub fn clear(&self) {
        self.inner.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
