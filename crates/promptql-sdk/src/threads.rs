// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    Client, Result, SendMessageResult, StartThreadResult, Thread, ThreadEvent, ThreadFeedback,
    insert_non_empty, timezone_or_utc, variables,
};
use serde_json::Value;

const START: &str = r#"
mutation StartThread($projectId: String!, $message: String!, $buildFqdn: String!, $timezone: String!, $visibility: String) {
  startThread(projectId: $projectId, message: $message, buildFqdn: $buildFqdn, timezone: $timezone, visibility: $visibility) {
    thread_id
    title
    created_at
    updated_at
    thread_events {
      thread_event_id
      thread_id
      event_data
      created_at
      user_id
    }
  }
}"#;

const SEND_MESSAGE: &str = r#"
mutation SendMessage($threadId: String!, $message: String!, $buildFqdn: String!, $timezone: String!) {
  sendMessage(threadId: $threadId, message: $message, buildFqdn: $buildFqdn, timezone: $timezone) {
    thread_event_id
    event_data
    created_at
  }
}"#;

const GET: &str = r#"
query GetThread($threadId: String!) {
  getThread(threadId: $threadId) {
    thread_id
    title
    created_at
    updated_at
    project_id
    build_id
    user_id
    visibility
  }
}"#;

const LIST: &str = r#"
query ListThreads($projectId: String!, $userId: String!) {
  getThreads(projectId: $projectId, userId: $userId) {
    thread_id
    title
    created_at
    updated_at
    project_id
    build_id
    user_id
    visibility
  }
}"#;

const GET_EVENTS: &str = r#"
query GetThreadEvents($threadId: String!) {
  getThreadEvents(threadId: $threadId) {
    thread_event_id
    thread_id
    event_data
    created_at
    user_id
  }
}"#;

const SUBMIT_FEEDBACK: &str = r#"
mutation SubmitFeedback($threadId: String!, $messageId: String!, $feedback: Int!, $details: String) {
  submitThreadFeedback(threadId: $threadId, messageId: $messageId, feedback: $feedback, details: $details) {
    thread_id
    message_id
    promptql_user_id
    feedback
    details
    created_at
  }
}"#;

/// Options for opening a thread. An empty timezone is sent as `UTC`; an
/// empty visibility is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    pub project_id: String,
    pub message: String,
    pub build_fqdn: String,
    pub timezone: String,
    pub visibility: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendMessageOptions {
    pub thread_id: String,
    pub message: String,
    pub build_fqdn: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Threads<'a> {
    client: &'a Client,
}

impl<'a> Threads<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn start(&self, options: &StartOptions) -> Result<StartThreadResult> {
        let mut variables = variables([
            ("projectId", Value::from(options.project_id.as_str())),
            ("message", Value::from(options.message.as_str())),
            ("buildFqdn", Value::from(options.build_fqdn.as_str())),
            ("timezone", Value::from(timezone_or_utc(&options.timezone))),
        ]);
        insert_non_empty(&mut variables, "visibility", &options.visibility);
        self.client.graphql(START, variables, "startThread")
    }

    pub fn send_message(&self, options: &SendMessageOptions) -> Result<SendMessageResult> {
        let variables = variables([
            ("threadId", Value::from(options.thread_id.as_str())),
            ("message", Value::from(options.message.as_str())),
            ("buildFqdn", Value::from(options.build_fqdn.as_str())),
            ("timezone", Value::from(timezone_or_utc(&options.timezone))),
        ]);
        self.client.graphql(SEND_MESSAGE, variables, "sendMessage")
    }

    pub fn get(&self, thread_id: &str) -> Result<Thread> {
        let variables = variables([("threadId", Value::from(thread_id))]);
        self.client.graphql(GET, variables, "getThread")
    }

    pub fn list(&self, project_id: &str, user_id: &str) -> Result<Vec<Thread>> {
        let variables = variables([
            ("projectId", Value::from(project_id)),
            ("userId", Value::from(user_id)),
        ]);
        self.client.graphql(LIST, variables, "getThreads")
    }

    pub fn get_events(&self, thread_id: &str) -> Result<Vec<ThreadEvent>> {
        let variables = variables([("threadId", Value::from(thread_id))]);
        self.client.graphql(GET_EVENTS, variables, "getThreadEvents")
    }

    pub fn submit_feedback(
        &self,
        thread_id: &str,
        message_id: &str,
        feedback: i64,
        details: &str,
    ) -> Result<ThreadFeedback> {
        let mut variables = variables([
            ("threadId", Value::from(thread_id)),
            ("messageId", Value::from(message_id)),
            ("feedback", Value::from(feedback)),
        ]);
        insert_non_empty(&mut variables, "details", details);
        self.client
            .graphql(SUBMIT_FEEDBACK, variables, "submitThreadFeedback")
    }
}
