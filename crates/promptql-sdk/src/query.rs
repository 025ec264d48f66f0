// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Auth, Client, Result, timezone_or_utc};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

const DEFAULT_VERSION: &str = "v1";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecuteOptions {
    /// Prior conversation, in the Service's interaction shape
    /// (`{"role": "user", "user_message": {"text": ...}}`).
    pub interactions: Vec<Value>,
    pub ddn_url: String,
    /// Forwarded to the DDN endpoint verbatim; left out when `None`.
    pub ddn_headers: Option<BTreeMap<String, String>>,
    pub timezone: String,
    pub stream: bool,
    pub version: String,
}

impl ExecuteOptions {
    fn body(&self) -> Value {
        let mut ddn = Map::new();
        ddn.insert("url".to_owned(), Value::from(self.ddn_url.as_str()));
        if let Some(headers) = &self.ddn_headers {
            let headers = headers
                .iter()
                .map(|(name, value)| (name.clone(), Value::from(value.as_str())))
                .collect();
            ddn.insert("headers".to_owned(), Value::Object(headers));
        }
        let version = if self.version.is_empty() {
            DEFAULT_VERSION
        } else {
            self.version.as_str()
        };
        json!({
            "version": version,
            "stream": self.stream,
            "timezone": timezone_or_utc(&self.timezone),
            "interactions": self.interactions,
            "ddn": ddn,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    client: &'a Client,
}

impl<'a> Query<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Posts a natural-language query and returns the raw response payload.
    pub fn execute(&self, options: &ExecuteOptions) -> Result<Value> {
        self.client.post_api("/query", &options.body(), Auth::Bearer)
    }

    /// Single-question convenience over [`Query::execute`].
    pub fn ask(
        &self,
        question: &str,
        ddn_url: &str,
        ddn_headers: Option<BTreeMap<String, String>>,
        timezone: &str,
    ) -> Result<Value> {
        self.execute(&ExecuteOptions {
            interactions: vec![user_interaction(question)],
            ddn_url: ddn_url.to_owned(),
            ddn_headers,
            timezone: timezone.to_owned(),
            ..ExecuteOptions::default()
        })
    }
}

fn user_interaction(question: &str) -> Value {
    json!({
        "role": "user",
        "user_message": { "text": question },
    })
}
