// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Projects,
    Threads,
    Chat,
}

impl Screen {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Setup => "PromptQL TUI Setup",
            Self::Projects => "PromptQL Projects",
            Self::Threads => "Threads",
            Self::Chat => "Chat",
        }
    }
}

/// Terminal-independent keystroke. The terminal layer translates raw events
/// into these before they reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::User => "You: ",
            Self::Assistant => "PromptQL: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Persisted credentials. Only `pat` gates the non-setup screens.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub pat: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ddn_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timezone: String,
}

impl Credentials {
    pub fn has_pat(&self) -> bool {
        !self.pat.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = |value: &str| if value.is_empty() { "" } else { "***" };
        f.debug_struct("Credentials")
            .field("pat", &secret(&self.pat))
            .field("api_key", &secret(&self.api_key))
            .field("project_id", &self.project_id)
            .field("ddn_url", &self.ddn_url)
            .field("timezone", &self.timezone)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Pat,
    ApiKey,
    DdnUrl,
    Timezone,
}

impl SetupField {
    pub const ALL: [Self; 4] = [Self::Pat, Self::ApiKey, Self::DdnUrl, Self::Timezone];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pat => "PAT (Personal Access Token)",
            Self::ApiKey => "API Key",
            Self::DdnUrl => "DDN URL",
            Self::Timezone => "Timezone",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Pat => "your-personal-access-token",
            Self::ApiKey => "your-api-key (optional, for direct query)",
            Self::DdnUrl => "https://your-project.ddn.hasura.app/graphql",
            Self::Timezone => "UTC",
        }
    }

    pub const fn char_limit(self) -> usize {
        match self {
            Self::Pat | Self::ApiKey => 256,
            Self::DdnUrl => 512,
            Self::Timezone => 64,
        }
    }

    pub const fn masked(self) -> bool {
        matches!(self, Self::Pat)
    }

    const fn index(self) -> usize {
        match self {
            Self::Pat => 0,
            Self::ApiKey => 1,
            Self::DdnUrl => 2,
            Self::Timezone => 3,
        }
    }

    fn rotate(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len) as usize;
        Self::ALL[next]
    }
}

/// Editable copy of the credential fields shown on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    values: [String; 4],
    pub focus: SetupField,
}

impl SetupForm {
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            values: [
                credentials.pat.clone(),
                credentials.api_key.clone(),
                credentials.ddn_url.clone(),
                credentials.timezone.clone(),
            ],
            focus: SetupField::Pat,
        }
    }

    pub fn value(&self, field: SetupField) -> &str {
        &self.values[field.index()]
    }

    /// What the screen shows for a field: the value, masked for secrets.
    pub fn display_value(&self, field: SetupField) -> String {
        let value = self.value(field);
        if field.masked() {
            "*".repeat(value.chars().count())
        } else {
            value.to_owned()
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.rotate(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.rotate(-1);
    }

    pub fn push(&mut self, ch: char) {
        let field = self.focus;
        let value = &mut self.values[field.index()];
        if value.chars().count() < field.char_limit() {
            value.push(ch);
        }
    }

    pub fn pop(&mut self) {
        self.values[self.focus.index()].pop();
    }
}
