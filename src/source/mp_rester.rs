// src/source/mp_rester.rs

use crate::error::{Result, SweepError};
use crate::io::pmg_json;
use crate::model::Structure;
use crate::source::StructureSource;
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;

pub const API_KEY_VARS: [&str; 2] = ["MP_API_KEY", "PMG_MAPI_KEY"];
const USER_AGENT: &str = concat!("efield-sweep/", env!("CARGO_PKG_VERSION"));
const BODY_EXCERPT: usize = 200;
const BASE_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// First non-empty key among `MP_API_KEY` and `PMG_MAPI_KEY`
pub fn api_key_from_env() -> Result<String> {
  API_KEY_VARS
    .iter()
    .filter_map(|var| std::env::var(var).ok())
    .map(|key| key.trim().to_string())
    .find(|key| !key.is_empty())
    .ok_or(SweepError::MissingApiKey)
}

/// 0.5 s doubling per attempt, capped at `MAX_BACKOFF`
fn backoff(attempt: u32) -> Duration {
  let factor = 2u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
  Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor)).min(MAX_BACKOFF)
}

/// Minimal HTTP surface, so tests can swap in canned responses
pub trait HttpClient: Sync {
  /// Returns (status, body)
  fn get_text(&self, url: &Url, api_key: &str) -> Result<(u16, String)>;
}

impl HttpClient for Client {
  fn get_text(&self, url: &Url, api_key: &str) -> Result<(u16, String)> {
    let response = self.get(url.clone()).header("X-API-KEY", api_key).send()?;
    let status = response.status().as_u16();
    Ok((status, response.text()?))
  }
}

/// Materials Project REST client
pub struct MpRester<C: HttpClient = Client> {
  client: C,
  endpoint: String,
  api_key: String,
  max_retries: u32,
}

impl MpRester<Client> {
  pub fn new(endpoint: &str, api_key: String, timeout: Duration, max_retries: u32) -> Result<Self> {
    let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
    Ok(Self::with_client(client, endpoint, api_key, max_retries))
  }
}

impl<C: HttpClient> MpRester<C> {
  pub fn with_client(client: C, endpoint: &str, api_key: String, max_retries: u32) -> Self {
    Self {
      client,
      endpoint: endpoint.trim_end_matches('/').to_string(),
      api_key,
      max_retries,
    }
  }

  pub fn structure_url(&self, material_id: &str) -> Result<Url> {
    let base = format!("{}/materials/core/", self.endpoint);
    Url::parse_with_params(
      &base,
      &[("material_ids", material_id), ("_fields", "material_id,structure")],
    )
    .map_err(|e| SweepError::Config(format!("bad endpoint {}: {}", self.endpoint, e)))
  }

  fn get_with_retry(&self, url: &Url) -> Result<String> {
    let mut attempt = 0;
    loop {
      let (status, body) = self.client.get_text(url, &self.api_key)?;
      if (200..300).contains(&status) {
        return Ok(body);
      }
      let retryable = status == 429 || status >= 500;
      if !retryable || attempt >= self.max_retries {
        return Err(SweepError::Http {
          status,
          url: url.to_string(),
          body: body.chars().take(BODY_EXCERPT).collect(),
        });
      }
      attempt += 1;
      let wait = backoff(attempt);
      log::warn!("HTTP {} from Materials Project, retry {} in {:?}", status, attempt, wait);
      std::thread::sleep(wait);
    }
  }
}

impl<C: HttpClient> StructureSource for MpRester<C> {
  fn fetch(&self, material_id: &str) -> Result<Structure> {
    let url = self.structure_url(material_id)?;
    log::debug!("GET {}", url);
    let body = self.get_with_retry(&url)?;
    pmg_json::parse_structure(&body, material_id)
  }
}
