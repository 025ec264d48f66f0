// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Blocking client for the PromptQL Service: GraphQL control-plane calls
//! authenticated with a personal access token, and the REST natural-language
//! query endpoint authenticated with an API key.

mod api_keys;
mod error;
mod models;
mod projects;
mod prompts;
mod query;
mod threads;
mod users;

pub use api_keys::{ApiKeys, GenerateOptions};
pub use error::{Error, ErrorKind, Result};
pub use models::{
    EventData, GeneratedApiKey, MessageResult, PlaygroundConfig, Project, ProjectLookup,
    PromptQlConfig, PromptQlUser, RuntimeApiKey, SamplePrompt, SendMessageResult,
    StartThreadResult, Thread, ThreadEvent, ThreadFeedback, TokenResponse,
};
pub use projects::{LookupOptions, Projects};
pub use prompts::Prompts;
pub use query::{ExecuteOptions, Query};
pub use threads::{SendMessageOptions, StartOptions, Threads};
pub use users::Users;

use error::error_for_status;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://data.promptql.pro.hasura.io";
pub const DEFAULT_API_URL: &str = "https://api.promptql.pro.hasura.io";
pub const DEFAULT_AUTH_URL: &str = "https://auth.pro.hasura.io";
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://data.pro.hasura.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PAT_REQUIRED: &str = "A Personal Access Token (pat) is required for this operation";
const API_KEY_REQUIRED: &str = "An API key is required for this operation";
const TOKEN_PAT_REQUIRED: &str = "A Personal Access Token (pat) is required to obtain a DDN token";

/// Construction options. Empty URLs fall back to the production endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub pat: String,
    pub api_key: String,
    pub base_url: String,
    pub api_url: String,
    pub auth_url: String,
    pub control_plane_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            pat: String::new(),
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_url: DEFAULT_API_URL.to_owned(),
            auth_url: DEFAULT_AUTH_URL.to_owned(),
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("pat", &redacted(&self.pat))
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("control_plane_url", &self.control_plane_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Pat,
    Bearer,
}

#[derive(Clone)]
pub struct Client {
    pat: String,
    api_key: String,
    base_url: String,
    api_url: String,
    auth_url: String,
    control_plane_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("pat", &redacted(&self.pat))
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("control_plane_url", &self.control_plane_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(options: ClientOptions) -> Result<Self> {
        if options.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_owned()));
        }
        let base_url = endpoint("base_url", &options.base_url, DEFAULT_BASE_URL)?;
        let api_url = endpoint("api_url", &options.api_url, DEFAULT_API_URL)?;
        let auth_url = endpoint("auth_url", &options.auth_url, DEFAULT_AUTH_URL)?;
        let control_plane_url = endpoint(
            "control_plane_url",
            &options.control_plane_url,
            DEFAULT_CONTROL_PLANE_URL,
        )?;

        let http = HttpClient::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|error| Error::Config(format!("build HTTP client: {error}")))?;

        Ok(Self {
            pat: options.pat,
            api_key: options.api_key,
            base_url,
            api_url,
            auth_url,
            control_plane_url,
            timeout: options.timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    pub fn control_plane_url(&self) -> &str {
        &self.control_plane_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    pub fn prompts(&self) -> Prompts<'_> {
        Prompts::new(self)
    }

    pub fn api_keys(&self) -> ApiKeys<'_> {
        ApiKeys::new(self)
    }

    pub fn threads(&self) -> Threads<'_> {
        Threads::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// Exchanges the PAT for a short-lived DDN bearer token scoped to a
    /// project.
    pub fn get_ddn_token(&self, project_id: &str) -> Result<TokenResponse> {
        if self.pat.is_empty() {
            return Err(Error::missing_credential(TOKEN_PAT_REQUIRED));
        }
        let url = format!("{}/ddn/promptql/token", self.auth_url);
        debug!(url = %url, project_id, "requesting DDN token");
        let request = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("pat {}", self.pat))
            .header(CONTENT_TYPE, "application/json")
            .header("x-hasura-project-id", project_id);
        let body = self.send(request, &url)?;
        serde_json::from_str(&body).map_err(|error| Error::decode("token response", error))
    }

    pub(crate) fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Map<String, Value>,
        field: &str,
    ) -> Result<T> {
        let url = format!("{}/graphql", self.base_url);
        let data = self.graphql_data(&url, query, variables)?;
        decode_field(data, field)
    }

    pub(crate) fn graphql_control_plane<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Map<String, Value>,
        field: &str,
    ) -> Result<T> {
        let url = format!("{}/v1/graphql", self.control_plane_url);
        let data = self.graphql_data(&url, query, variables)?;
        decode_field(data, field)
    }

    pub(crate) fn post_api(&self, path: &str, body: &Value, auth: Auth) -> Result<Value> {
        let authorization = self.authorization(auth)?;
        let url = format!("{}{path}", self.api_url);
        debug!(url = %url, "posting to query API");
        let request = self
            .http
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .json(body);
        let body = self.send(request, &url)?;
        serde_json::from_str(&body).map_err(|error| Error::decode("query response", error))
    }

    fn graphql_data(
        &self,
        url: &str,
        query: &str,
        variables: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let authorization = self.authorization(Auth::Pat)?;
        let mut payload = Map::new();
        payload.insert("query".to_owned(), Value::String(query.to_owned()));
        if !variables.is_empty() {
            payload.insert("variables".to_owned(), Value::Object(variables));
        }

        debug!(url, operation = operation_name(query), "graphql request");
        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .json(&payload);
        let body = self.send(request, url)?;

        let envelope: GraphqlEnvelope = serde_json::from_str(&body)
            .map_err(|error| Error::decode("graphql response", error))?;
        if let Some(first) = envelope.errors.into_iter().next() {
            warn!(url, message = %first.message, "graphql returned errors");
            return Err(Error::Api {
                status: None,
                message: first.message,
            });
        }
        match envelope.data {
            Some(Value::Object(data)) => Ok(data),
            Some(Value::Null) | None => Ok(Map::new()),
            Some(other) => Err(Error::decode(
                "graphql response",
                format!("expected data object, got {other}"),
            )),
        }
    }

    fn authorization(&self, auth: Auth) -> Result<String> {
        match auth {
            Auth::Pat if self.pat.is_empty() => Err(Error::missing_credential(PAT_REQUIRED)),
            Auth::Pat => Ok(format!("pat {}", self.pat)),
            Auth::Bearer if self.api_key.is_empty() => {
                Err(Error::missing_credential(API_KEY_REQUIRED))
            }
            Auth::Bearer => Ok(format!("Bearer {}", self.api_key)),
        }
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<String> {
        let response = request
            .send()
            .map_err(|error| Error::transport(url, error))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|error| Error::transport(url, error))?;
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "service returned error status");
            return Err(error_for_status(status, &body));
        }
        Ok(body)
    }
}

#[derive(Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
}

fn decode_field<T: DeserializeOwned>(mut data: Map<String, Value>, field: &str) -> Result<T> {
    let value = data
        .remove(field)
        .ok_or_else(|| Error::decode(field, "field not found in response"))?;
    serde_json::from_value(value).map_err(|error| Error::decode(field, error))
}

fn endpoint(name: &str, raw: &str, fallback: &str) -> Result<String> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { fallback } else { raw };
    let parsed =
        Url::parse(raw).map_err(|error| Error::Config(format!("{name} {raw:?}: {error}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "{name} {raw:?}: scheme must be http or https"
        )));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn operation_name(query: &str) -> &str {
    query
        .split_whitespace()
        .nth(1)
        .and_then(|token| token.split(['(', '{']).next())
        .unwrap_or("anonymous")
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

pub(crate) fn variables<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// Inserts `value` under `key` unless it is empty, matching the Service's
/// treatment of omitted optional arguments.
pub(crate) fn insert_non_empty(variables: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        variables.insert(key.to_owned(), Value::String(value.to_owned()));
    }
}

pub(crate) fn timezone_or_utc(timezone: &str) -> &str {
    if timezone.is_empty() { "UTC" } else { timezone }
}
