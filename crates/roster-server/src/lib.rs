//! HTTP composition root for Roster.
//!
//! Mounts the JSON API under `/api` and its XML twin under `/xml/api`, both
//! sharing one store handle, behind permissive CORS and request tracing.

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{Json, Router, routing::get};
use roster_core::store::StudentStore;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:      String,
  pub port:      u16,
  /// JSON Lines file holding the student table.
  pub data_path: PathBuf,
}

impl ServerConfig {
  pub const DEFAULT_HOST: &'static str = "127.0.0.1";
  pub const DEFAULT_PORT: u16 = 8000;
  pub const DEFAULT_DATA_PATH: &'static str = "data/students.jsonl";

  /// Layer defaults, then the optional file at `path`, then the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", Self::DEFAULT_HOST)?
      .set_default("port", i64::from(Self::DEFAULT_PORT))?
      .set_default("data_path", Self::DEFAULT_DATA_PATH)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSTER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Service metadata returned from `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
  pub message: String,
  pub version: String,
  pub api:     String,
  pub xml_api: String,
}

async fn root() -> Json<ServiceInfo> {
  Json(ServiceInfo {
    message: "Roster student records API".to_owned(),
    version: env!("CARGO_PKG_VERSION").to_owned(),
    api:     "/api".to_owned(),
    xml_api: "/xml/api".to_owned(),
  })
}

/// Build the full application router around `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: StudentStore + 'static,
{
  Router::new()
    .route("/", get(root))
    .nest("/api", roster_api::api_router(Arc::clone(&store)))
    .nest("/xml/api", roster_api::xml_router(store))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use roster_store_file::FileStore;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  async fn make_app() -> (TempDir, Router) {
    let dir   = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("students.jsonl")).await.unwrap();
    (dir, app(Arc::new(store)))
  }

  async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  #[tokio::test]
  async fn root_describes_the_service() {
    let (_dir, app) = make_app().await;
    let resp = app
      .oneshot(Request::get("/").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let info: ServiceInfo = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(info.api, "/api");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
  }

  #[tokio::test]
  async fn json_and_xml_share_one_store() {
    let (_dir, app) = make_app().await;
    let body = r#"{"code":"SV001","family_name":"Hồ","given_name":"Nam","math_score":9}"#;
    let resp = app
      .clone()
      .oneshot(
        Request::post("/api/students")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(body))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
      .oneshot(Request::get("/xml/api/students/code/SV001").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = body_string(resp).await;
    assert!(xml.contains("<given_name>Nam</given_name>"), "{xml}");
    assert!(xml.contains("<average_score>9.0</average_score>"), "{xml}");
  }

  #[tokio::test]
  async fn cors_preflight_is_allowed() {
    let (_dir, app) = make_app().await;
    let resp = app
      .oneshot(
        Request::builder()
          .method("OPTIONS")
          .uri("/api/students")
          .header(header::ORIGIN, "http://localhost:3000")
          .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
  }

  #[test]
  fn config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("missing.toml")).unwrap();
    assert_eq!(cfg.port, ServerConfig::DEFAULT_PORT);
    assert_eq!(cfg.data_path, PathBuf::from(ServerConfig::DEFAULT_DATA_PATH));
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir  = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 9100\ndata_path = \"/srv/roster/students.jsonl\"\n").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.host, ServerConfig::DEFAULT_HOST);
    assert_eq!(cfg.address(), "127.0.0.1:9100");
  }
}
