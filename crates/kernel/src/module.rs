use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Core trait implemented by every Bookshelf entity module
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also the URL segment its routes are
    /// mounted under (`/{name}`)
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context, called during
    /// application startup
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return an OpenAPI specification fragment for this module as JSON;
    /// fragments are merged into the aggregated document
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }
}
