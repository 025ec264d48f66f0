// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).with_context(|| format!("parse body of {}", self.url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }

    /// A 200 response wrapping `data` in a GraphQL envelope.
    pub fn graphql(data: Value) -> Self {
        Self::json(200, &json!({ "data": data }))
    }
}

/// Local HTTP server that answers with the given responses in order, one per
/// request, and records what it received. The server stops after the last
/// response or after five idle seconds.
pub struct MockServer {
    url: String,
    handle: JoinHandle<Result<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn start(responses: Vec<CannedResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let url = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || serve(&server, responses));
        Ok(Self { url, handle })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Waits for the server thread and returns the recorded requests.
    pub fn finish(self) -> Result<Vec<RecordedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?
    }
}

fn serve(server: &Server, responses: Vec<CannedResponse>) -> Result<Vec<RecordedRequest>> {
    let mut recorded = Vec::new();
    for canned in responses {
        let Some(mut request) = server
            .recv_timeout(RECV_TIMEOUT)
            .context("receive mock request")?
        else {
            break;
        };

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .context("read mock request body")?;
        recorded.push(RecordedRequest {
            method: request.method().as_str().to_owned(),
            url: request.url().to_owned(),
            headers: request
                .headers()
                .iter()
                .map(|header| {
                    (
                        header.field.as_str().as_str().to_owned(),
                        header.value.as_str().to_owned(),
                    )
                })
                .collect(),
            body,
        });

        let content_type = Header::from_bytes("Content-Type", "application/json")
            .map_err(|()| anyhow!("invalid content type header"))?;
        let response = Response::from_string(canned.body)
            .with_status_code(canned.status)
            .with_header(content_type);
        request.respond(response).context("send mock response")?;
    }
    Ok(recorded)
}

pub fn user_projects() -> Value {
    json!([
        {
            "buildFqdn": "alpha.ddn.hasura.app",
            "ddnProjectId": "ddn-alpha",
            "name": "alpha",
            "projectId": "pql-alpha",
        },
        {
            "buildFqdn": null,
            "ddnProjectId": "ddn-beta",
            "name": "beta",
            "projectId": "pql-beta",
        },
    ])
}

pub fn project_lookup() -> Value {
    json!({
        "buildFqdn": "alpha-build.ddn.hasura.app",
        "consoleUrl": "https://console.hasura.io/project/alpha",
        "ddnProjectId": "ddn-alpha",
        "name": "alpha",
        "projectId": "pql-alpha-resolved",
    })
}

pub fn threads() -> Value {
    json!([
        {
            "thread_id": "t-1",
            "title": "Revenue by region",
            "created_at": "2026-03-01T09:00:00Z",
            "updated_at": "2026-03-02T10:15:30.123456Z",
            "project_id": "pql-alpha",
            "build_id": "b-1",
            "user_id": "u-1",
            "visibility": "private",
        },
        {
            "thread_id": "t-2",
            "title": "",
            "created_at": "2026-03-03T11:00:00Z",
            "updated_at": "2026-03-03T11:05:00Z",
            "project_id": "pql-alpha",
            "build_id": "b-1",
            "user_id": "u-1",
            "visibility": "private",
        },
    ])
}

/// A user turn followed by an assistant turn, the way the Service records a
/// single exchange.
pub fn thread_events() -> Value {
    json!([
        {
            "thread_event_id": 1,
            "thread_id": "t-1",
            "event_data": { "user_message": { "text": "hi" } },
            "created_at": "2026-03-02T10:15:00Z",
            "user_id": "u-1",
        },
        {
            "thread_event_id": 2,
            "thread_id": "t-1",
            "event_data": { "assistant_message": { "text": "hello" } },
            "created_at": "2026-03-02T10:15:30Z",
            "user_id": "u-1",
        },
    ])
}

pub fn start_thread_result() -> Value {
    json!({
        "thread_id": "t-new",
        "title": "New conversation",
        "created_at": "2026-03-04T08:00:00Z",
        "updated_at": "2026-03-04T08:00:00Z",
        "thread_events": [
            {
                "thread_event_id": 10,
                "thread_id": "t-new",
                "event_data": { "assistant_message": { "text": "Here are the totals." } },
                "created_at": "2026-03-04T08:00:01Z",
                "user_id": "u-1",
            },
        ],
    })
}

pub fn send_message_result() -> Value {
    json!({
        "thread_event_id": 11,
        "event_data": { "assistant_message": { "text": "Follow-up answer." } },
        "created_at": "2026-03-04T08:01:00Z",
    })
}

pub fn query_result() -> Value {
    json!({
        "thread_id": "q-1",
        "interactions": [
            {
                "role": "user",
                "user_message": { "text": "how many orders?" },
            },
            {
                "role": "assistant",
                "assistant_message": { "text": "There are 42 orders." },
            },
        ],
    })
}
