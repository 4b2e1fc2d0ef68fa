//! Airtable REST backend
//!
//! Uses ureq (sync HTTP). One store instance is bound to one base; blogs
//! that keep their posts in a different base get their own instance via
//! [`AirtableStore::with_base`].

use super::{EntityStore, Fields, Filter, Record, RecordId, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_ROOT: &str = "https://api.airtable.com/v0";
const API_KEY_ENV: &str = "AIRTABLE_API_KEY";
const BASE_ID_ENV: &str = "AIRTABLE_BASE_ID";

#[derive(Clone)]
pub struct AirtableStore {
    api_key: String,
    base_id: String,
    api_root: String,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are mapped to StoreError below
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .new_agent()
}

impl AirtableStore {
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            api_root: API_ROOT.to_string(),
            agent: make_agent(),
        }
    }

    /// Build from `AIRTABLE_API_KEY` / `AIRTABLE_BASE_ID`
    pub fn from_env() -> StoreResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| StoreError::MissingCredentials(API_KEY_ENV.to_string()))?;
        let base_id = std::env::var(BASE_ID_ENV)
            .map_err(|_| StoreError::MissingCredentials(BASE_ID_ENV.to_string()))?;
        Ok(Self::new(api_key, base_id))
    }

    /// Same credentials, different base
    pub fn with_base(&self, base_id: impl Into<String>) -> Self {
        Self {
            api_key: self.api_key.clone(),
            base_id: base_id.into(),
            api_root: self.api_root.clone(),
            agent: self.agent.clone(),
        }
    }

    /// Point at a different API root (self-hosted proxies, tests)
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_root,
            self.base_id,
            encode_path_segment(table)
        )
    }

    fn record_url(&self, table: &str, id: &RecordId) -> String {
        format!("{}/{}", self.table_url(table), encode_path_segment(&id.0))
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Map a non-success response to a StoreError
    fn check(
        response: ureq::http::Response<ureq::Body>,
        table: &str,
        id: Option<&RecordId>,
    ) -> StoreResult<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();
        if status == 404 {
            if let Some(id) = id {
                return Err(StoreError::NotFound {
                    table: table.to_string(),
                    id: id.0.clone(),
                });
            }
        }
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(StoreError::Api { status, message });
        }
        Ok(response)
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
    ) -> StoreResult<T> {
        response
            .into_body()
            .read_json()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

fn transport(e: ureq::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

/// Percent-encode a table name or record id for use in a URL path
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Serialize)]
struct WriteRequest<'a> {
    fields: &'a Fields,
    typecast: bool,
}

#[derive(Deserialize)]
struct WriteResponse {
    id: RecordId,
}

impl EntityStore for AirtableStore {
    fn get(&self, table: &str, id: &RecordId) -> StoreResult<Record> {
        let response = self
            .agent
            .get(&self.record_url(table, id))
            .header("Authorization", &self.auth())
            .call()
            .map_err(transport)?;
        Self::read_json(Self::check(response, table, Some(id))?)
    }

    fn list(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Record>> {
        let formula = filter.to_formula();
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut req = self
                .agent
                .get(&self.table_url(table))
                .header("Authorization", &self.auth());
            if let Some(ref formula) = formula {
                req = req.query("filterByFormula", formula);
            }
            if let Some(ref offset) = offset {
                req = req.query("offset", offset);
            }

            let response = req.call().map_err(transport)?;
            let page: ListResponse = Self::read_json(Self::check(response, table, None)?)?;
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!("Listed {} records from {}", records.len(), table);
        Ok(records)
    }

    fn create(&self, table: &str, fields: Fields) -> StoreResult<RecordId> {
        let body = WriteRequest {
            fields: &fields,
            typecast: true,
        };
        let response = self
            .agent
            .post(&self.table_url(table))
            .header("Authorization", &self.auth())
            .header("Content-Type", "application/json")
            .send_json(&body)
            .map_err(transport)?;
        let created: WriteResponse = Self::read_json(Self::check(response, table, None)?)?;
        debug!("Created {} in {}", created.id, table);
        Ok(created.id)
    }

    fn update(&self, table: &str, id: &RecordId, fields: Fields) -> StoreResult<()> {
        let body = WriteRequest {
            fields: &fields,
            typecast: true,
        };
        let response = self
            .agent
            .patch(&self.record_url(table, id))
            .header("Authorization", &self.auth())
            .header("Content-Type", "application/json")
            .send_json(&body)
            .map_err(transport)?;
        Self::check(response, table, Some(id))?;
        Ok(())
    }

    fn delete(&self, table: &str, id: &RecordId) -> StoreResult<()> {
        let response = self
            .agent
            .delete(&self.record_url(table, id))
            .header("Authorization", &self.auth())
            .call()
            .map_err(transport)?;
        Self::check(response, table, Some(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_encoded() {
        let store = AirtableStore::new("key", "appBase");
        assert_eq!(
            store.table_url("Blog Posts"),
            "https://api.airtable.com/v0/appBase/Blog%20Posts"
        );
        assert_eq!(
            store.record_url("Posts", &RecordId::from("rec123")),
            "https://api.airtable.com/v0/appBase/Posts/rec123"
        );
    }

    #[test]
    fn test_with_base_keeps_credentials() {
        let store = AirtableStore::new("key", "appOne").with_api_root("http://localhost:9/");
        let other = store.with_base("appTwo");
        assert_eq!(other.base_id(), "appTwo");
        assert_eq!(other.auth(), "Bearer key");
        assert_eq!(other.table_url("Posts"), "http://localhost:9/appTwo/Posts");
    }

    #[test]
    fn test_list_response_parses_records() {
        let body = r#"{"records":[{"id":"rec1","createdTime":"2024-01-01T00:00:00.000Z","fields":{"Name":"A"}}],"offset":"itr1"}"#;
        let page: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].text("Name"), "A");
        assert_eq!(page.offset.as_deref(), Some("itr1"));
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let store = AirtableStore::new("key", "appBase").with_api_root("http://127.0.0.1:1");
        let err = store.list("Posts", &Filter::All).unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
