//! HTTP transport for command-tree exports.
//!
//! A thin, synchronous layer over the export engine: each request re-runs
//! the walk against the context's command tree and serializes the result.
//! Routing and response assembly live in [`handle_request`], which takes no
//! socket and is tested directly; [`serve`] is the `tiny_http` loop around
//! it. The command tree is passed in explicitly via [`ServeContext`]; the
//! transport holds no ambient globals.
//!
//! Routes:
//!
//! - `GET /healthcheck`: liveness probe.
//! - `GET /commands`: the full export snapshot as JSON.
//! - `GET /root`: only the immediate children of the root.
//! - `GET /`: the bundled single-page UI.

use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use cmdtree_core::Command;
use cmdtree_export::{AccessorRegistry, ExportOutcome, export_snapshot};

static INDEX_PAGE: &str = include_str!("../assets/index.html");

/// Listen address configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Everything a request handler needs, passed explicitly.
pub struct ServeContext {
    application_name: String,
    root: Command,
    registry: AccessorRegistry,
}

impl ServeContext {
    /// Builds a context with the standard accessor registry.
    pub fn new(application_name: &str, root: Command) -> Self {
        Self::with_registry(application_name, root, AccessorRegistry::standard())
    }

    /// Builds a context with a caller-provided registry (e.g. one extended
    /// with custom option kinds).
    pub fn with_registry(application_name: &str, root: Command, registry: AccessorRegistry) -> Self {
        Self {
            application_name: application_name.to_string(),
            root,
            registry,
        }
    }

    fn export(&self) -> Result<ExportOutcome, cmdtree_export::AggregateError> {
        let generated_at = chrono::Utc::now().to_rfc3339();
        export_snapshot(
            &self.application_name,
            &generated_at,
            &self.root,
            &self.registry,
        )
    }
}

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Could not bind the listen address.
    #[error("failed to bind {addr}: {detail}")]
    Bind { addr: String, detail: String },
}

/// One response, independent of the underlying HTTP library.
#[derive(Debug)]
pub struct ApiResponse {
    pub status_code: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn json(status_code: u16, payload: &impl Serialize) -> Self {
        match serde_json::to_vec(payload) {
            Ok(body) => Self {
                status_code,
                content_type: "application/json".to_string(),
                body,
            },
            Err(err) => Self::text(500, "text/plain", &format!("serialization failed: {err}\n")),
        }
    }

    fn text(status_code: u16, content_type: &str, body: &str) -> Self {
        Self {
            status_code,
            content_type: content_type.to_string(),
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Routes one GET request. Never panics; unknown paths get a JSON 404.
pub fn handle_request(path: &str, ctx: &ServeContext) -> ApiResponse {
    match path {
        "/healthcheck" => ApiResponse::json(200, &serde_json::json!({ "status": "green" })),
        "/commands" => match ctx.export() {
            Ok(outcome) => {
                for failure in &outcome.pruned {
                    tracing::warn!(path = %failure.path, error = %failure.error, "Subtree missing from export");
                }
                ApiResponse::json(200, &outcome.snapshot)
            }
            Err(err) => export_failure(&err),
        },
        "/root" => match ctx.export() {
            Ok(outcome) => ApiResponse::json(200, &outcome.snapshot.root.commands),
            Err(err) => export_failure(&err),
        },
        "/" | "/index.html" => ApiResponse::text(200, "text/html; charset=utf-8", INDEX_PAGE),
        _ => ApiResponse::json(
            404,
            &serde_json::json!({
                "error": { "message": format!("unknown endpoint '{path}'") }
            }),
        ),
    }
}

fn export_failure(err: &cmdtree_export::AggregateError) -> ApiResponse {
    ApiResponse::json(
        500,
        &serde_json::json!({
            "error": { "message": err.to_string(), "detail": err.detail() }
        }),
    )
}

/// Runs the blocking HTTP loop until the process exits.
pub fn serve(config: &ServeConfig, ctx: &ServeContext) -> Result<(), ServeError> {
    let addr = format!("{}:{}", config.host, config.port);
    let server = tiny_http::Server::http(&addr).map_err(|e| ServeError::Bind {
        addr: addr.clone(),
        detail: e.to_string(),
    })?;

    tracing::info!(addr = %addr, "Listening");

    for req in server.incoming_requests() {
        if *req.method() != tiny_http::Method::Get {
            let _ = req.respond(tiny_http::Response::empty(405));
            continue;
        }

        let start = Instant::now();
        let path = req.url().split('?').next().unwrap_or("/").to_string();
        let response = handle_request(&path, ctx);

        tracing::info!(
            method = %req.method(),
            path = %path,
            status = response.status_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Handled request"
        );

        let mut tiny = tiny_http::Response::from_data(response.body)
            .with_status_code(response.status_code);
        if let Ok(header) = tiny_http::Header::from_bytes(
            &b"Content-Type"[..],
            response.content_type.as_bytes(),
        ) {
            tiny = tiny.with_header(header);
        }
        let _ = req.respond(tiny);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use cmdtree_core::Flag;
    use serde_json::Value;

    use super::*;

    fn test_context() -> ServeContext {
        let tree = Command::new("mycli")
            .with_flag(Flag::bool("verbose", false, "Verbose output"))
            .with_child(Command::new("serve").with_flag(Flag::int("port", 8080, "Listen port")))
            .with_child(Command::new("version").with_short("Print the version"));
        ServeContext::new("mycli", tree)
    }

    fn json_body(resp: &ApiResponse) -> Value {
        serde_json::from_slice(&resp.body).expect("json body")
    }

    #[test]
    fn test_healthcheck_ok() {
        let resp = handle_request("/healthcheck", &test_context());
        assert_eq!(resp.status_code, 200);
        assert_eq!(json_body(&resp)["status"], "green");
    }

    #[test]
    fn test_commands_returns_full_snapshot() {
        let resp = handle_request("/commands", &test_context());
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.content_type, "application/json");
        let v = json_body(&resp);
        assert_eq!(v["application_name"], "mycli");
        assert_eq!(v["root"]["options"][0]["name"], "verbose");
        assert_eq!(v["root"]["commands"][0]["name"], "serve");
    }

    #[test]
    fn test_root_returns_children_only() {
        let resp = handle_request("/root", &test_context());
        assert_eq!(resp.status_code, 200);
        let v = json_body(&resp);
        let names: Vec<&str> = v
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["serve", "version"]);
    }

    #[test]
    fn test_unknown_endpoint_404() {
        let resp = handle_request("/nope", &test_context());
        assert_eq!(resp.status_code, 404);
        assert!(
            json_body(&resp)["error"]["message"]
                .as_str()
                .unwrap()
                .contains("/nope")
        );
    }

    #[test]
    fn test_index_served_as_html() {
        let resp = handle_request("/", &test_context());
        assert_eq!(resp.status_code, 200);
        assert!(resp.content_type.starts_with("text/html"));
    }

    #[test]
    fn test_export_failure_becomes_500() {
        let tree = Command::new("mycli").with_flag(Flag::bool("verbose", false, ""));
        let ctx = ServeContext::with_registry("mycli", tree, AccessorRegistry::empty());
        let resp = handle_request("/commands", &ctx);
        assert_eq!(resp.status_code, 500);
        let v = json_body(&resp);
        assert!(v["error"]["detail"].as_str().unwrap().contains("verbose"));
    }
}
