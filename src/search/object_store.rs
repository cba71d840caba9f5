//! In-memory [`ObjectService`] backed by a JSON snapshot.
//!
//! The snapshot is a JSON object mapping id to model. A `null` model stands
//! for an object the store knows about but cannot load:
//!
//! ```json
//! { "mine": { "name": "My Items", "type": "folder" }, "broken": null }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::error::SearchError;
use super::resolve::{DomainObject, ObjectService};

#[derive(Debug, Clone, Default)]
pub struct JsonObjectStore {
    objects: HashMap<String, Arc<DomainObject>>,
}

impl JsonObjectStore {
    pub fn new(objects: impl IntoIterator<Item = DomainObject>) -> Self {
        Self {
            objects: objects
                .into_iter()
                .map(|object| (object.id().to_string(), Arc::new(object)))
                .collect(),
        }
    }

    pub fn from_models(models: HashMap<String, Value>) -> Self {
        Self::new(models.into_iter().map(|(id, model)| {
            if model.is_null() {
                DomainObject::without_model(id)
            } else {
                DomainObject::new(id, model)
            }
        }))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading object snapshot {}", path.display()))?;
        let models: HashMap<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("parsing object snapshot {}", path.display()))?;
        Ok(Self::from_models(models))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectService for JsonObjectStore {
    async fn get_objects(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Arc<DomainObject>>, SearchError> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.objects
                    .get(id)
                    .map(|object| (id.clone(), Arc::clone(object)))
            })
            .collect())
    }
}
