//! Async HTTP client wrapping the Roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, StatusCode, Url};
use roster_core::student::{NewStudent, Statistics, Student, StudentId, StudentPatch};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Connection settings for the Roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Roster JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  /// `{base_url}/api/{segments...}`, each segment percent-encoded.
  fn url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .with_context(|| format!("invalid server url {:?}", self.config.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("server url {:?} cannot be a base", self.config.base_url))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /api/students?skip=..&limit=..`
  pub async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Student>> {
    let resp = self
      .client
      .get(self.url(&["students"])?)
      .query(&[("skip", skip), ("limit", limit)])
      .send()
      .await
      .context("GET /students failed")?;
    decode(resp, "GET /students").await
  }

  /// `GET /api/students?search=..`
  pub async fn search(&self, keyword: &str) -> Result<Vec<Student>> {
    let resp = self
      .client
      .get(self.url(&["students"])?)
      .query(&[("search", keyword)])
      .send()
      .await
      .context("GET /students?search failed")?;
    decode(resp, "GET /students?search").await
  }

  /// `GET /api/students/{id}`; `None` on 404.
  pub async fn get(&self, id: StudentId) -> Result<Option<Student>> {
    let resp = self
      .client
      .get(self.url(&["students", &id.to_string()])?)
      .send()
      .await
      .context("GET /students/{id} failed")?;
    decode_optional(resp, "GET /students/{id}").await
  }

  /// `GET /api/students/code/{code}`; `None` on 404.
  pub async fn get_by_code(&self, code: &str) -> Result<Option<Student>> {
    let resp = self
      .client
      .get(self.url(&["students", "code", code])?)
      .send()
      .await
      .context("GET /students/code/{code} failed")?;
    decode_optional(resp, "GET /students/code/{code}").await
  }

  /// `GET /api/statistics`
  pub async fn statistics(&self) -> Result<Statistics> {
    let resp = self
      .client
      .get(self.url(&["statistics"])?)
      .send()
      .await
      .context("GET /statistics failed")?;
    decode(resp, "GET /statistics").await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// `POST /api/students`
  pub async fn create(&self, input: &NewStudent) -> Result<Student> {
    let resp = self
      .client
      .post(self.url(&["students"])?)
      .json(input)
      .send()
      .await
      .context("POST /students failed")?;
    decode(resp, "POST /students").await
  }

  /// `POST /api/students/batch`; returns the raw outcome document.
  pub async fn create_many(&self, inputs: &[NewStudent]) -> Result<Value> {
    let resp = self
      .client
      .post(self.url(&["students", "batch"])?)
      .json(inputs)
      .send()
      .await
      .context("POST /students/batch failed")?;
    decode(resp, "POST /students/batch").await
  }

  /// `PUT /api/students/{id}`; `None` on 404.
  pub async fn update(&self, id: StudentId, patch: &StudentPatch) -> Result<Option<Student>> {
    let resp = self
      .client
      .put(self.url(&["students", &id.to_string()])?)
      .json(patch)
      .send()
      .await
      .context("PUT /students/{id} failed")?;
    decode_optional(resp, "PUT /students/{id}").await
  }

  /// `DELETE /api/students/{id}`; `false` on 404.
  pub async fn delete(&self, id: StudentId) -> Result<bool> {
    let resp = self
      .client
      .delete(self.url(&["students", &id.to_string()])?)
      .send()
      .await
      .context("DELETE /students/{id} failed")?;
    Ok(decode_optional::<Value>(resp, "DELETE /students/{id}").await?.is_some())
  }
}

async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  if !resp.status().is_success() {
    return Err(failure(resp, what).await);
  }
  resp.json().await.with_context(|| format!("deserialising {what} reply"))
}

async fn decode_optional<T: DeserializeOwned>(resp: Response, what: &str) -> Result<Option<T>> {
  if resp.status() == StatusCode::NOT_FOUND {
    return Ok(None);
  }
  decode(resp, what).await.map(Some)
}

/// Turn an error reply into an error carrying the server's message.
async fn failure(resp: Response, what: &str) -> anyhow::Error {
  let status = resp.status();
  let message = resp
    .json::<Value>()
    .await
    .ok()
    .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or_default();
  anyhow!("{what} → {status}: {message}")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig { base_url: base_url.to_owned() }).unwrap()
  }

  #[test]
  fn url_joins_base_and_api_prefix() {
    let c = client("http://localhost:8000/");
    assert_eq!(
      c.url(&["students", "7"]).unwrap().as_str(),
      "http://localhost:8000/api/students/7"
    );
    let c = client("http://example.com/roster");
    assert_eq!(
      c.url(&["statistics"]).unwrap().as_str(),
      "http://example.com/roster/api/statistics"
    );
  }

  #[test]
  fn code_segment_is_percent_encoded() {
    let c = client("http://localhost:8000");
    assert_eq!(
      c.url(&["students", "code", "K/12?a#b"]).unwrap().as_str(),
      "http://localhost:8000/api/students/code/K%2F12%3Fa%23b"
    );
  }

  #[test]
  fn rejects_unusable_base_url() {
    assert!(client("not a url").url(&["students"]).is_err());
    assert!(client("mailto:ops@example.com").url(&["students"]).is_err());
  }
}
