// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Schema-loose payload attached to thread events. The Service evolves its
/// shape, so it is kept as raw JSON and walked by key.
pub type EventData = Map<String, Value>;

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub token: String,
    #[serde(default, deserialize_with = "nullable")]
    pub expiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptQlConfig {
    #[serde(default)]
    pub prompt_ql_enabled: bool,
    #[serde(default)]
    pub playground_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_public_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_flags: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "nullable")]
    pub llm_api_key: String,
    #[serde(default, deserialize_with = "nullable")]
    pub llm_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_token_usage_limit: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub readme: String,
    #[serde(default, deserialize_with = "nullable")]
    pub system_instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_token_usage_limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePrompt {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub display_text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub full_prompt: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_by: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_by: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeApiKey {
    #[serde(default, deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub api_key_masked: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_by: String,
    #[serde(default, deserialize_with = "nullable")]
    pub last_used_at: String,
    #[serde(
        default,
        rename = "promptqlTimeout",
        skip_serializing_if = "Option::is_none"
    )]
    pub promptql_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_timeout: Option<i64>,
}

/// A freshly generated key. `api_key` is only ever returned by the generate
/// mutation; listings carry the masked form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedApiKey {
    #[serde(flatten)]
    pub key: RuntimeApiKey,
    #[serde(default, deserialize_with = "nullable")]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "nullable")]
    pub build_fqdn: String,
    #[serde(default, deserialize_with = "nullable")]
    pub ddn_project_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLookup {
    #[serde(default, deserialize_with = "nullable")]
    pub build_fqdn: String,
    #[serde(default, deserialize_with = "nullable")]
    pub console_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub ddn_project_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThreadEvent {
    #[serde(default)]
    pub thread_event_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub event_data: EventData,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thread {
    #[serde(default, deserialize_with = "nullable")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub build_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartThreadResult {
    #[serde(default, deserialize_with = "nullable")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub thread_events: Vec<ThreadEvent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SendMessageResult {
    #[serde(default)]
    pub thread_event_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub event_data: EventData,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThreadFeedback {
    #[serde(default, deserialize_with = "nullable")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub promptql_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub details: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptQlUser {
    #[serde(default, deserialize_with = "nullable")]
    pub promptql_user_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub control_plane_user_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageResult {
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
}
