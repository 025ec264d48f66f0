// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Pulls display text out of the Service's schema-loose payloads.

use crate::Role;
use serde_json::{Map, Value};

/// Text of a thread event: the assistant or user message text, else a
/// top-level `message` or `text` string. Empty when nothing matches.
pub fn event_content(data: &Map<String, Value>) -> &str {
    nested_text(data, "assistant_message")
        .or_else(|| nested_text(data, "user_message"))
        .or_else(|| string_field(data, "message"))
        .or_else(|| string_field(data, "text"))
        .unwrap_or_default()
}

pub fn event_role(data: &Map<String, Value>) -> Role {
    let is_user = data.contains_key("user_message")
        || data.get("role").and_then(Value::as_str) == Some("user");
    if is_user { Role::User } else { Role::Assistant }
}

/// Text of a send-message result. Unlike thread events this never looks at
/// `user_message`; the result only ever describes the reply.
pub fn reply_content(data: &Map<String, Value>) -> &str {
    nested_text(data, "assistant_message")
        .or_else(|| string_field(data, "message"))
        .or_else(|| string_field(data, "text"))
        .unwrap_or_default()
}

/// Text of a direct query response: the latest assistant interaction with
/// text, else a top-level `message` or `text`, else the compact JSON.
pub fn query_content(payload: &Value) -> String {
    let Some(object) = payload.as_object() else {
        return payload.to_string();
    };
    if let Some(interactions) = object.get("interactions").and_then(Value::as_array) {
        let latest = interactions
            .iter()
            .rev()
            .filter_map(Value::as_object)
            .filter(|entry| entry.get("role").and_then(Value::as_str) == Some("assistant"))
            .find_map(|entry| nested_text(entry, "assistant_message"));
        if let Some(text) = latest {
            return text.to_owned();
        }
    }
    string_field(object, "message")
        .or_else(|| string_field(object, "text"))
        .map_or_else(|| payload.to_string(), str::to_owned)
}

fn nested_text<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key)?.as_object()?.get("text")?.as_str()
}

fn string_field<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key)?.as_str()
}
