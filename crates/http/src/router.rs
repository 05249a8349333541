//! Router builder for the Bookshelf HTTP server

use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use bookshelf_kernel::ModuleRegistry;

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/{module_name}`. The catalog routes
    /// live at the top level (`/books`, `/authors`, ...), not under an API
    /// prefix.
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let path = format!("/{}", module_name);
        self.router = self.router.nest(&path, module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Aggregate OpenAPI fragments from all modules, mount Swagger UI, and
    /// serve the merged document as plain JSON.
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let mut spec = serde_json::json!({
            "openapi": "3.0.0",
            "info": {
                "title": "Bookshelf API",
                "version": "1.0.0",
                "description": "Bookstore catalog REST API"
            },
            "paths": {},
            "components": {
                "schemas": {}
            }
        });

        spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
            "type": "object",
            "properties": {
                "error": {
                    "type": "object",
                    "properties": {
                        "code": {"type": "string"},
                        "message": {"type": "string"},
                        "details": {"type": "array", "items": {}},
                        "trace_id": {"type": "string"},
                        "timestamp": {"type": "string"}
                    },
                    "required": ["code", "message", "trace_id", "timestamp"]
                }
            },
            "required": ["error"]
        });

        spec["paths"]["/healthz"] = serde_json::json!({
            "get": {
                "summary": "Health check",
                "responses": {
                    "200": {"description": "OK"}
                }
            }
        });

        for module in registry.modules() {
            let Some(fragment) = module.openapi() else {
                continue;
            };

            if let Some(paths) = fragment.get("paths").and_then(|p| p.as_object()) {
                for (path, item) in paths {
                    // Module fragments are written relative to the mount point.
                    let mounted = if path == "/" {
                        format!("/{}", module.name())
                    } else {
                        format!("/{}{}", module.name(), path)
                    };
                    spec["paths"][mounted] = item.clone();
                }
            }

            if let Some(schemas) = fragment
                .pointer("/components/schemas")
                .and_then(|s| s.as_object())
            {
                for (name, schema) in schemas {
                    spec["components"]["schemas"][name] = schema.clone();
                }
            }
        }

        let openapi: utoipa::openapi::OpenApi =
            serde_json::from_value(spec.clone()).unwrap_or_else(|_| {
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Bookshelf API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi),
        );

        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
