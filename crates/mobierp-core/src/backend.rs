// ── Backend seam ──
//
// Controllers talk to the REST boundary through this trait, never through
// a process-wide client. `ApiClient` is the production implementation;
// tests hand in fakes.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use mobierp_api::{ApiClient, ListQuery};

use crate::confirm::Confirmer;
use crate::error::CoreError;
use crate::model::EntityId;
use crate::notify::Notifier;

/// Collection and record operations over raw JSON.
pub trait Backend: Send + Sync {
    fn list<'a>(
        &'a self,
        resource: &'a str,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, Result<Vec<Value>, CoreError>>;

    fn get<'a>(
        &'a self,
        resource: &'a str,
        id: &'a EntityId,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, Result<Value, CoreError>>;

    fn create<'a>(
        &'a self,
        resource: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, CoreError>>;

    fn update<'a>(
        &'a self,
        resource: &'a str,
        id: &'a EntityId,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, CoreError>>;

    fn delete<'a>(
        &'a self,
        resource: &'a str,
        id: &'a EntityId,
    ) -> BoxFuture<'a, Result<(), CoreError>>;
}

impl Backend for ApiClient {
    fn list<'a>(
        &'a self,
        resource: &'a str,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, Result<Vec<Value>, CoreError>> {
        Box::pin(async move { Ok(ApiClient::list(self, resource, query).await?) })
    }

    fn get<'a>(
        &'a self,
        resource: &'a str,
        id: &'a EntityId,
        query: &'a ListQuery,
    ) -> BoxFuture<'a, Result<Value, CoreError>> {
        Box::pin(async move { Ok(ApiClient::get(self, resource, id, query).await?) })
    }

    fn create<'a>(
        &'a self,
        resource: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, CoreError>> {
        Box::pin(async move { Ok(ApiClient::create(self, resource, body).await?) })
    }

    fn update<'a>(
        &'a self,
        resource: &'a str,
        id: &'a EntityId,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<Value, CoreError>> {
        Box::pin(async move { Ok(ApiClient::update(self, resource, id, body).await?) })
    }

    fn delete<'a>(
        &'a self,
        resource: &'a str,
        id: &'a EntityId,
    ) -> BoxFuture<'a, Result<(), CoreError>> {
        Box::pin(async move { Ok(ApiClient::delete(self, resource, id).await?) })
    }
}

// ── ScreenContext ────────────────────────────────────────────────

/// Collaborators injected into every screen controller.
///
/// Cheap to clone; each screen gets its own copy at construction.
#[derive(Clone)]
pub struct ScreenContext {
    pub backend: Arc<dyn Backend>,
    pub confirmer: Arc<dyn Confirmer>,
    pub notifier: Arc<dyn Notifier>,
}

impl ScreenContext {
    pub fn new(
        backend: Arc<dyn Backend>,
        confirmer: Arc<dyn Confirmer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            confirmer,
            notifier,
        }
    }
}

impl std::fmt::Debug for ScreenContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenContext").finish_non_exhaustive()
    }
}
