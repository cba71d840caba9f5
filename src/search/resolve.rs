//! Joining ranked ids with domain objects from the object service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::decode::ScoredId;
use super::error::SearchError;

/// A domain object as handed out by the object service.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainObject {
    id: String,
    model: Option<Value>,
}

impl DomainObject {
    pub fn new(id: impl Into<String>, model: Value) -> Self {
        Self {
            id: id.into(),
            model: Some(model),
        }
    }

    /// An object the service knows about but cannot produce a model for.
    pub fn without_model(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> Option<&Value> {
        self.model.as_ref()
    }

    /// Display name from the model, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.model.as_ref()?.get("name")?.as_str()
    }
}

/// Batched identity lookup against the external object store.
#[async_trait]
pub trait ObjectService: Send + Sync {
    /// Ids the service does not know are simply absent from the map.
    async fn get_objects(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Arc<DomainObject>>, SearchError>;
}

/// Caller-supplied type-validity predicate over an object model.
///
/// Must be pure: no mutation, same answer for the same model.
pub trait TypeFilter: Send + Sync {
    fn accepts(&self, model: &Value) -> bool;
}

impl<F> TypeFilter for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn accepts(&self, model: &Value) -> bool {
        self(model)
    }
}

/// Accepts models whose `"type"` is in the set. An empty set accepts all.
#[derive(Debug, Clone, Default)]
pub struct AcceptTypes {
    types: HashSet<String>,
}

impl AcceptTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn any() -> Self {
        Self::default()
    }
}

impl TypeFilter for AcceptTypes {
    fn accepts(&self, model: &Value) -> bool {
        if self.types.is_empty() {
            return true;
        }
        model
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|ty| self.types.contains(ty))
    }
}

/// A hit joined with its domain object.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub id: String,
    pub object: Arc<DomainObject>,
    pub score: f64,
}

pub struct ResultResolver<'a> {
    objects: &'a dyn ObjectService,
}

impl<'a> ResultResolver<'a> {
    pub fn new(objects: &'a dyn ObjectService) -> Self {
        Self { objects }
    }

    /// One batched lookup, then an order-preserving filter.
    pub async fn resolve<T>(
        &self,
        hits: Vec<ScoredId>,
        valid_type: &T,
    ) -> Result<Vec<ResolvedMatch>, SearchError>
    where
        T: TypeFilter + ?Sized,
    {
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
        let objects = self.objects.get_objects(&ids).await?;
        let returned = hits.len();
        let resolved = filter_matches(hits, &objects, valid_type);

        tracing::debug!(
            returned = returned,
            resolved = resolved.len(),
            skipped = returned - resolved.len(),
            "search_resolved"
        );
        Ok(resolved)
    }
}

/// Keeps hits whose object exists, has a model, and passes `valid_type`,
/// in their original order.
pub fn filter_matches<T>(
    hits: Vec<ScoredId>,
    objects: &HashMap<String, Arc<DomainObject>>,
    valid_type: &T,
) -> Vec<ResolvedMatch>
where
    T: TypeFilter + ?Sized,
{
    hits.into_iter()
        .filter_map(|hit| {
            let Some(object) = objects.get(&hit.id) else {
                tracing::debug!(id = %hit.id, "search hit has no object; skipping");
                return None;
            };
            let model = object.model()?;
            if !valid_type.accepts(model) {
                return None;
            }
            Some(ResolvedMatch {
                object: Arc::clone(object),
                id: hit.id,
                score: hit.score,
            })
        })
        .collect()
}
