use std::env;
use std::fmt::{self, Display};
use std::time::Duration;

use log::{debug, info};
use serde_json::{json, Value};

use crate::model::{ConnectionRecord, ConnectionSet};

/// Pinned Notion API version header value.
pub const NOTION_VERSION: &str = "2022-06-28";

const DEFAULT_BASE_URL: &str = "https://api.notion.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A central error enum for remote-source errors.
#[derive(Debug)]
pub enum RemoteError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(String),
}

/// Convert from reqwest::Error (connect failures, timeouts, TLS errors).
impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> RemoteError {
        RemoteError::Http(err)
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Http(e) => write!(f, "HTTP error: {}", e),
            RemoteError::Status(code) => write!(f, "server returned {}", code),
            RemoteError::Decode(msg) => write!(f, "bad response body: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Settings for the hosted database, passed in explicitly so business logic
/// never reads ambient process state.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub database_id: String,
    pub token: String,
    pub base_url: String,
}

impl RemoteConfig {
    /// Read `NOTION_DATABASE_ID` / `NOTION_TOKEN`. Absent variables degrade
    /// to empty strings; the request then fails lookup or authentication and
    /// surfaces as an HTTP status error.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("NOTION_DATABASE_ID").ok(),
            env::var("NOTION_TOKEN").ok(),
        )
    }

    fn from_vars(database_id: Option<String>, token: Option<String>) -> Self {
        Self {
            database_id: database_id.unwrap_or_default(),
            token: token.unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Blocking client for the Notion database query endpoint.
pub struct NotionClient {
    config: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl NotionClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("sshman/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    /// One query, sorted by Type descending then Project ascending, mapped
    /// into a fresh `ConnectionSet`. Nothing is persisted here; on any error
    /// the caller's existing state is untouched.
    pub fn fetch_and_transform(&self) -> Result<ConnectionSet, RemoteError> {
        let url = format!(
            "{}/v1/databases/{}/query",
            self.config.base_url, self.config.database_id
        );
        let query = json!({
            "sorts": [
                { "property": "Type", "direction": "descending" },
                { "property": "Project", "direction": "ascending" },
            ]
        });

        info!("Querying {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body: Value = response
            .json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(build_set(&body))
    }
}

/// Map a query response into a `ConnectionSet`.
///
/// Field extraction never fails: indexing a `Value` at a missing level
/// yields `Null`, which falls back to an empty string. Duplicate
/// `"{project}@{type}"` keys collapse, last record wins.
pub fn build_set(body: &Value) -> ConnectionSet {
    let mut set = ConnectionSet::new();
    let results = body["results"].as_array().map_or(&[][..], Vec::as_slice);

    for page in results {
        let properties = &page["properties"];
        let record = ConnectionRecord {
            project: text_content(&properties["Project"]["title"][0]),
            ssh_command: text_content(&properties["SSH"]["rich_text"][0]),
            conn_type: properties["Type"]["select"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase(),
            password: text_content(&properties["password"]["rich_text"][0]),
        };
        debug!("Fetched record '{}'", record.key());
        set.insert(record);
    }
    set
}

fn text_content(node: &Value) -> String {
    node["text"]["content"].as_str().unwrap_or_default().to_string()
}
