use super::{Mapper, MapperConfig};

use relmap_core::driver::{Executor, SchemaIntrospector};
use relmap_core::{Error, Result};

use std::sync::Arc;

/// Assembles a [`Mapper`] from its collaborators and configuration.
#[derive(Default)]
pub struct Builder {
    executor: Option<Arc<dyn Executor>>,
    introspector: Option<Arc<dyn SchemaIntrospector>>,
    config: MapperConfig,
}

impl Builder {
    /// Sets the statement execution facility.
    pub fn executor(mut self, executor: impl Executor) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Sets the catalog introspection facility.
    pub fn introspector(mut self, introspector: impl SchemaIntrospector) -> Self {
        self.introspector = Some(Arc::new(introspector));
        self
    }

    /// Sets one object as both the execution and introspection facility,
    /// which is how database drivers are wired in.
    pub fn driver<D>(mut self, driver: D) -> Self
    where
        D: Executor + SchemaIntrospector + Clone,
    {
        self.executor = Some(Arc::new(driver.clone()));
        self.introspector = Some(Arc::new(driver));
        self
    }

    /// Scopes table introspection to a schema and qualifies generated SQL
    /// with it.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.config.schema = Some(schema.into());
        self
    }

    /// Names the audit timestamp properties maintained on insert and update.
    pub fn audit_properties(
        mut self,
        created_on: impl Into<String>,
        updated_on: impl Into<String>,
    ) -> Self {
        self.config.created_on_property = Some(created_on.into());
        self.config.updated_on_property = Some(updated_on.into());
        self
    }

    /// Names the optimistic lock version property.
    pub fn version_property(mut self, property: impl Into<String>) -> Self {
        self.config.version_property = Some(property.into());
        self
    }

    pub fn build(self) -> Result<Mapper> {
        let executor = self
            .executor
            .ok_or_else(|| Error::invalid_argument("an executor must be configured"))?;
        let introspector = self
            .introspector
            .ok_or_else(|| Error::invalid_argument("a schema introspector must be configured"))?;
        Ok(Mapper::new(executor, introspector, self.config))
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
