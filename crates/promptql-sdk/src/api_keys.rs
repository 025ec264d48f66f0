// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::projects::project_variables;
use crate::{Client, GeneratedApiKey, MessageResult, Result, RuntimeApiKey, variables};
use serde_json::Value;

const LIST: &str = r#"
query ListRuntimeApiKeys($projectId: String!) {
  getRuntimeApiKeys(projectId: $projectId) {
    id
    name
    projectId
    apiKeyMasked
    isActive
    createdAt
    createdBy
    lastUsedAt
    promptqlTimeout
    sqlTimeout
  }
}"#;

const GENERATE: &str = r#"
mutation GenerateRuntimeApiKey($projectId: String!, $name: String!, $promptqlTimeout: Int, $sqlTimeout: Int) {
  generateRuntimeApiKey(projectId: $projectId, name: $name, promptqlTimeout: $promptqlTimeout, sqlTimeout: $sqlTimeout) {
    id
    name
    projectId
    apiKey
    apiKeyMasked
    isActive
    createdAt
    createdBy
    promptqlTimeout
    sqlTimeout
  }
}"#;

const REMOVE: &str = r#"
mutation RemoveRuntimeApiKey($projectId: String!, $apiKeyId: Int!) {
  removeRuntimeApiKey(projectId: $projectId, apiKeyId: $apiKeyId) {
    message
  }
}"#;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub project_id: String,
    pub name: String,
    /// Seconds; `None` leaves the Service default in place.
    pub promptql_timeout: Option<i64>,
    pub sql_timeout: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ApiKeys<'a> {
    client: &'a Client,
}

impl<'a> ApiKeys<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<RuntimeApiKey>> {
        self.client
            .graphql(LIST, project_variables(project_id), "getRuntimeApiKeys")
    }

    pub fn generate(&self, options: &GenerateOptions) -> Result<GeneratedApiKey> {
        let mut variables = variables([
            ("projectId", Value::from(options.project_id.as_str())),
            ("name", Value::from(options.name.as_str())),
        ]);
        if let Some(timeout) = options.promptql_timeout {
            variables.insert("promptqlTimeout".to_owned(), Value::from(timeout));
        }
        if let Some(timeout) = options.sql_timeout {
            variables.insert("sqlTimeout".to_owned(), Value::from(timeout));
        }
        self.client
            .graphql(GENERATE, variables, "generateRuntimeApiKey")
    }

    pub fn remove(&self, project_id: &str, api_key_id: i64) -> Result<MessageResult> {
        let variables = variables([
            ("projectId", Value::from(project_id)),
            ("apiKeyId", Value::from(api_key_id)),
        ]);
        self.client.graphql(REMOVE, variables, "removeRuntimeApiKey")
    }
}
