// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Forbidden,
    NotFound,
    Validation,
    RateLimit,
    Server,
    Api,
    Transport,
    Decode,
    Config,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed: {message}")]
    Authentication {
        status: Option<u16>,
        message: String,
    },
    #[error("forbidden: {message}")]
    Forbidden { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error("rate limited: {message}")]
    RateLimit { message: String },
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
    #[error("request failed: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
    #[error("cannot reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("decode {context}: {detail}")]
    Decode { context: String, detail: String },
    #[error("invalid client options: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Server { .. } => ErrorKind::Server,
            Self::Api { .. } => ErrorKind::Api,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// The message reported by the Service, without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message, .. }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Validation { message }
            | Self::RateLimit { message }
            | Self::Server { message, .. }
            | Self::Api { message, .. } => message.clone(),
            Self::Transport { source, .. } => source.to_string(),
            Self::Decode { detail, .. } => detail.clone(),
            Self::Config(message) => message.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => *status,
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Validation { .. } => Some(422),
            Self::RateLimit { .. } => Some(429),
            Self::Server { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } | Self::Config(_) => None,
        }
    }

    pub(crate) fn missing_credential(message: &str) -> Self {
        Self::Authentication {
            status: None,
            message: message.to_owned(),
        }
    }

    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_owned(),
            source,
        }
    }

    pub(crate) fn decode(context: impl Into<String>, detail: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            detail: detail.to_string(),
        }
    }
}

pub(crate) fn error_for_status(status: StatusCode, body: &str) -> Error {
    let message = error_message_from_body(body);
    let code = status.as_u16();
    match code {
        401 => Error::Authentication {
            status: Some(code),
            message,
        },
        403 => Error::Forbidden { message },
        404 => Error::NotFound { message },
        422 => Error::Validation { message },
        429 => Error::RateLimit { message },
        500..=599 => Error::Server {
            status: code,
            message,
        },
        _ => Error::Api {
            status: Some(code),
            message,
        },
    }
}

fn error_message_from_body(body: &str) -> String {
    if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = parsed.get("message") {
            return message.clone();
        }
        if let Some(Value::String(message)) = parsed.get("error") {
            return message.clone();
        }
    }
    body.to_owned()
}
