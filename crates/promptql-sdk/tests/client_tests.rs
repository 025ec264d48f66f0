// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use promptql_sdk::{
    Client, ClientOptions, ErrorKind, GenerateOptions, LookupOptions, SendMessageOptions,
    StartOptions,
};
use promptql_testkit::{CannedResponse, MockServer};
use serde_json::json;
use std::time::Duration;

fn client_for(server: &MockServer, pat: &str, api_key: &str) -> Result<Client> {
    Ok(Client::new(ClientOptions {
        pat: pat.to_owned(),
        api_key: api_key.to_owned(),
        base_url: server.url().to_owned(),
        api_url: server.url().to_owned(),
        auth_url: server.url().to_owned(),
        control_plane_url: server.url().to_owned(),
        timeout: Duration::from_secs(2),
        ..ClientOptions::default()
    })?)
}

#[test]
fn list_user_projects_posts_graphql_with_pat() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::graphql(json!({
        "getUserProjects": promptql_testkit::user_projects(),
    }))])?;
    let client = client_for(&server, "test-pat", "")?;

    let projects = client.projects().list_user_projects()?;
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "alpha");
    assert_eq!(projects[0].build_fqdn, "alpha.ddn.hasura.app");
    assert_eq!(projects[1].build_fqdn, "");

    let recorded = server.finish()?;
    assert_eq!(recorded.len(), 1);
    let request = &recorded[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/graphql");
    assert_eq!(request.header("Authorization"), Some("pat test-pat"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    let body = request.json()?;
    assert!(body["query"].as_str().unwrap_or_default().contains("getUserProjects"));
    assert!(body.get("variables").is_none());
    Ok(())
}

#[test]
fn list_ddn_projects_uses_control_plane_endpoint() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::graphql(json!({
        "ddn_projects": [
            {"id": "proj-1", "name": "Project Alpha", "ddn_builds": [{"fqdn": "alpha.ddn.hasura.app"}]},
            {"id": "proj-2", "name": "Project Beta", "ddn_builds": []},
        ],
    }))])?;
    let client = client_for(&server, "test-pat", "")?;

    let projects = client.projects().list_ddn_projects()?;
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].build_fqdn, "alpha.ddn.hasura.app");
    assert_eq!(projects[1].project_id, "proj-2");
    assert_eq!(projects[1].build_fqdn, "");

    let recorded = server.finish()?;
    assert_eq!(recorded[0].url, "/v1/graphql");
    Ok(())
}

#[test]
fn lookup_sends_only_non_empty_identifiers() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::graphql(json!({
        "lookupProject": promptql_testkit::project_lookup(),
    }))])?;
    let client = client_for(&server, "test-pat", "")?;

    let found = client.projects().lookup(&LookupOptions {
        project_name: "alpha".to_owned(),
        fqdn: "alpha.ddn.hasura.app".to_owned(),
        ..LookupOptions::default()
    })?;
    assert_eq!(found.project_id, "pql-alpha-resolved");
    assert_eq!(found.build_fqdn, "alpha-build.ddn.hasura.app");

    let body = server.finish()?[0].json()?;
    assert_eq!(
        body["variables"],
        json!({"projectName": "alpha", "fqdn": "alpha.ddn.hasura.app"})
    );
    Ok(())
}

#[test]
fn start_thread_defaults_timezone_and_omits_visibility() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::graphql(json!({
        "startThread": promptql_testkit::start_thread_result(),
    }))])?;
    let client = client_for(&server, "test-pat", "")?;

    let started = client.threads().start(&StartOptions {
        project_id: "pql-alpha".to_owned(),
        message: "totals?".to_owned(),
        build_fqdn: "alpha.ddn.hasura.app".to_owned(),
        ..StartOptions::default()
    })?;
    assert_eq!(started.thread_id, "t-new");
    assert_eq!(started.thread_events.len(), 1);
    assert_eq!(
        started.thread_events[0].event_data["assistant_message"]["text"],
        json!("Here are the totals.")
    );

    let body = server.finish()?[0].json()?;
    assert_eq!(body["variables"]["timezone"], json!("UTC"));
    assert!(body["variables"].get("visibility").is_none());
    Ok(())
}

#[test]
fn send_message_and_events_decode() -> Result<()> {
    let server = MockServer::start(vec![
        CannedResponse::graphql(json!({
            "sendMessage": promptql_testkit::send_message_result(),
        })),
        CannedResponse::graphql(json!({
            "getThreadEvents": promptql_testkit::thread_events(),
        })),
    ])?;
    let client = client_for(&server, "test-pat", "")?;

    let sent = client.threads().send_message(&SendMessageOptions {
        thread_id: "t-1".to_owned(),
        message: "and last year?".to_owned(),
        build_fqdn: "alpha.ddn.hasura.app".to_owned(),
        timezone: "America/New_York".to_owned(),
    })?;
    assert_eq!(sent.thread_event_id, 11);

    let events = client.threads().get_events("t-1")?;
    assert_eq!(events.len(), 2);
    assert!(events[0].event_data.contains_key("user_message"));

    let recorded = server.finish()?;
    let body = recorded[0].json()?;
    assert_eq!(body["variables"]["threadId"], json!("t-1"));
    assert_eq!(body["variables"]["timezone"], json!("America/New_York"));
    assert_eq!(recorded[1].json()?["variables"], json!({"threadId": "t-1"}));
    Ok(())
}

#[test]
fn graphql_errors_surface_even_on_success_status() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::json(
        200,
        &json!({"data": null, "errors": [{"message": "project not found"}, {"message": "second"}]}),
    )])?;
    let client = client_for(&server, "test-pat", "")?;

    let error = client
        .threads()
        .list("pql-alpha", "u-1")
        .expect_err("graphql error");
    assert_eq!(error.kind(), ErrorKind::Api);
    assert_eq!(error.message(), "project not found");
    server.finish()?;
    Ok(())
}

#[test]
fn missing_data_field_is_a_decode_error() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::graphql(json!({"other": []}))])?;
    let client = client_for(&server, "test-pat", "")?;

    let error = client.users().list().expect_err("missing field");
    assert_eq!(error.kind(), ErrorKind::Decode);
    assert!(error.to_string().contains("getPromptQLUsers"));
    server.finish()?;
    Ok(())
}

#[test]
fn malformed_json_is_a_decode_error() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::raw(200, "not json")])?;
    let client = client_for(&server, "test-pat", "")?;

    let error = client.prompts().list("pql-alpha").expect_err("bad body");
    assert_eq!(error.kind(), ErrorKind::Decode);
    server.finish()?;
    Ok(())
}

#[test]
fn http_status_maps_to_typed_error() -> Result<()> {
    let server = MockServer::start(vec![
        CannedResponse::json(401, &json!({"message": "x"})),
        CannedResponse::json(429, &json!({"error": "slow down"})),
        CannedResponse::raw(503, "maintenance"),
    ])?;
    let client = client_for(&server, "test-pat", "")?;

    let error = client.projects().get_config("p").expect_err("401");
    assert_eq!(error.kind(), ErrorKind::Authentication);
    assert_eq!(error.message(), "x");
    assert_eq!(error.status(), Some(401));

    let error = client.projects().enable("p").expect_err("429");
    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert_eq!(error.message(), "slow down");

    let error = client.projects().disable("p").expect_err("503");
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.status(), Some(503));
    assert_eq!(error.message(), "maintenance");

    assert_eq!(server.finish()?.len(), 3);
    Ok(())
}

#[test]
fn missing_credentials_fail_without_a_request() -> Result<()> {
    let server = MockServer::start(Vec::new())?;
    let client = client_for(&server, "", "")?;

    let error = client.threads().get("t-1").expect_err("no pat");
    assert_eq!(error.kind(), ErrorKind::Authentication);
    assert_eq!(
        error.message(),
        "A Personal Access Token (pat) is required for this operation"
    );

    let error = client
        .query()
        .ask("q", "https://ddn.example.com", None, "")
        .expect_err("no api key");
    assert_eq!(error.kind(), ErrorKind::Authentication);
    assert_eq!(error.message(), "An API key is required for this operation");

    let error = client.get_ddn_token("p").expect_err("no pat for token");
    assert_eq!(error.kind(), ErrorKind::Authentication);

    assert!(server.finish()?.is_empty());
    Ok(())
}

#[test]
fn query_posts_bearer_request_to_api() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::json(
        200,
        &promptql_testkit::query_result(),
    )])?;
    let client = client_for(&server, "", "api-key-1")?;

    let payload = client
        .query()
        .ask("how many orders?", "https://ddn.example.com/graphql", None, "")?;
    assert_eq!(payload["thread_id"], json!("q-1"));

    let recorded = server.finish()?;
    let request = &recorded[0];
    assert_eq!(request.url, "/query");
    assert_eq!(request.header("Authorization"), Some("Bearer api-key-1"));
    let body = request.json()?;
    assert_eq!(body["version"], json!("v1"));
    assert_eq!(body["stream"], json!(false));
    assert_eq!(body["timezone"], json!("UTC"));
    assert_eq!(body["ddn"]["url"], json!("https://ddn.example.com/graphql"));
    assert_eq!(
        body["interactions"],
        json!([{"role": "user", "user_message": {"text": "how many orders?"}}])
    );
    Ok(())
}

#[test]
fn token_exchange_sends_project_header() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::json(
        200,
        &json!({"token": "ddn-token", "expiry": "2026-03-04T09:00:00Z"}),
    )])?;
    let client = client_for(&server, "test-pat", "")?;

    let token = client.get_ddn_token("pql-alpha")?;
    assert_eq!(token.token, "ddn-token");
    assert_eq!(token.status, None);

    let recorded = server.finish()?;
    let request = &recorded[0];
    assert_eq!(request.url, "/ddn/promptql/token");
    assert_eq!(request.header("Authorization"), Some("pat test-pat"));
    assert_eq!(request.header("x-hasura-project-id"), Some("pql-alpha"));
    Ok(())
}

#[test]
fn generate_api_key_passes_optional_timeouts() -> Result<()> {
    let server = MockServer::start(vec![CannedResponse::graphql(json!({
        "generateRuntimeApiKey": {
            "id": 5,
            "name": "ci",
            "projectId": "pql-alpha",
            "apiKey": "plain-secret",
            "apiKeyMasked": "pl****",
            "isActive": true,
            "sqlTimeout": 30,
        },
    }))])?;
    let client = client_for(&server, "test-pat", "")?;

    let generated = client.api_keys().generate(&GenerateOptions {
        project_id: "pql-alpha".to_owned(),
        name: "ci".to_owned(),
        sql_timeout: Some(30),
        ..GenerateOptions::default()
    })?;
    assert_eq!(generated.api_key, "plain-secret");
    assert_eq!(generated.key.is_active, Some(true));
    assert_eq!(generated.key.promptql_timeout, None);

    let body = server.finish()?[0].json()?;
    assert_eq!(
        body["variables"],
        json!({"projectId": "pql-alpha", "name": "ci", "sqlTimeout": 30})
    );
    Ok(())
}

#[test]
fn unreachable_service_is_a_transport_error() -> Result<()> {
    let client = Client::new(ClientOptions {
        pat: "test-pat".to_owned(),
        base_url: "http://127.0.0.1:1".to_owned(),
        timeout: Duration::from_millis(200),
        ..ClientOptions::default()
    })?;
    let error = client
        .projects()
        .list_user_projects()
        .expect_err("connection refused");
    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(error.to_string().contains("127.0.0.1:1"));
    Ok(())
}

fn query_text(body: &serde_json::Value) -> &str {
    body["query"].as_str().unwrap_or_default()
}

#[test]
fn prompt_crud_round_trips_through_graphql() -> Result<()> {
    let prompt = json!({
        "id": "sp-1",
        "displayText": "Top customers",
        "fullPrompt": "Who are the top 10 customers by revenue?",
        "projectId": "pql-alpha",
        "createdBy": "u-1",
        "createdAt": "2026-03-01T09:00:00Z",
        "updatedBy": null,
        "updatedAt": null,
    });
    let server = MockServer::start(vec![
        CannedResponse::graphql(json!({"getSamplePrompts": [prompt.clone()]})),
        CannedResponse::graphql(json!({"createSamplePrompt": prompt.clone()})),
        CannedResponse::graphql(json!({"updateSamplePrompt": prompt})),
        CannedResponse::graphql(json!({"deleteSamplePrompt": {"message": "deleted"}})),
    ])?;
    let client = client_for(&server, "test-pat", "")?;
    let prompts = client.prompts();

    let listed = prompts.list("pql-alpha")?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].display_text, "Top customers");
    assert_eq!(listed[0].updated_by, "");

    let created = prompts.create("pql-alpha", "Top customers", "Who are the top 10?")?;
    assert_eq!(created.id, "sp-1");
    let updated = prompts.update("pql-alpha", "sp-1", "Top", "Who?")?;
    assert_eq!(updated.full_prompt, "Who are the top 10 customers by revenue?");
    assert_eq!(prompts.delete("pql-alpha", "sp-1")?.message, "deleted");

    let recorded = server.finish()?;
    let bodies = recorded
        .iter()
        .map(|request| request.json())
        .collect::<Result<Vec<_>>>()?;
    assert!(query_text(&bodies[0]).contains("getSamplePrompts(projectId: $projectId)"));
    assert_eq!(bodies[0]["variables"], json!({"projectId": "pql-alpha"}));
    assert!(query_text(&bodies[1]).contains("createSamplePrompt("));
    assert_eq!(
        bodies[1]["variables"],
        json!({
            "projectId": "pql-alpha",
            "displayText": "Top customers",
            "fullPrompt": "Who are the top 10?",
        })
    );
    assert!(query_text(&bodies[2]).contains("updateSamplePrompt("));
    assert_eq!(bodies[2]["variables"]["promptId"], json!("sp-1"));
    assert_eq!(bodies[2]["variables"]["displayText"], json!("Top"));
    assert!(query_text(&bodies[3]).contains("deleteSamplePrompt("));
    assert_eq!(
        bodies[3]["variables"],
        json!({"projectId": "pql-alpha", "promptId": "sp-1"})
    );
    Ok(())
}

#[test]
fn users_are_fetched_by_control_plane_id_and_listed() -> Result<()> {
    let user = json!({
        "promptql_user_id": "pu-1",
        "control_plane_user_id": "cp-1",
        "email": "ada@example.com",
        "display_name": "Ada",
        "is_active": true,
        "project_id": "pql-alpha",
    });
    let server = MockServer::start(vec![
        CannedResponse::graphql(json!({"getPromptQLUser": user.clone()})),
        CannedResponse::graphql(json!({"getPromptQLUsers": [user, {"promptql_user_id": "pu-2", "email": null}]})),
    ])?;
    let client = client_for(&server, "test-pat", "")?;

    let current = client.users().get_current("cp-1")?;
    assert_eq!(current.promptql_user_id, "pu-1");
    assert_eq!(current.display_name, "Ada");
    assert_eq!(current.is_active, Some(true));

    let users = client.users().list()?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].email, "");
    assert_eq!(users[1].is_active, None);

    let recorded = server.finish()?;
    let first = recorded[0].json()?;
    assert!(query_text(&first).contains("getPromptQLUser(controlPlaneUserId:"));
    assert_eq!(first["variables"], json!({"controlPlaneUserId": "cp-1"}));
    let second = recorded[1].json()?;
    assert!(query_text(&second).contains("getPromptQLUsers"));
    assert!(second.get("variables").is_none());
    Ok(())
}

#[test]
fn api_keys_list_and_remove() -> Result<()> {
    let server = MockServer::start(vec![
        CannedResponse::graphql(json!({
            "getRuntimeApiKeys": [{
                "id": 5,
                "name": "ci",
                "projectId": "pql-alpha",
                "apiKeyMasked": "pl****",
                "isActive": true,
                "lastUsedAt": null,
                "promptqlTimeout": 300,
            }],
        })),
        CannedResponse::graphql(json!({"removeRuntimeApiKey": {"message": "removed"}})),
    ])?;
    let client = client_for(&server, "test-pat", "")?;

    let keys = client.api_keys().list("pql-alpha")?;
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].id, 5);
    assert_eq!(keys[0].api_key_masked, "pl****");
    assert_eq!(keys[0].promptql_timeout, Some(300));
    assert_eq!(keys[0].last_used_at, "");

    assert_eq!(client.api_keys().remove("pql-alpha", 5)?.message, "removed");

    let recorded = server.finish()?;
    let list = recorded[0].json()?;
    assert!(query_text(&list).contains("getRuntimeApiKeys(projectId: $projectId)"));
    assert_eq!(list["variables"], json!({"projectId": "pql-alpha"}));
    let remove = recorded[1].json()?;
    assert!(query_text(&remove).contains("removeRuntimeApiKey("));
    assert_eq!(
        remove["variables"],
        json!({"projectId": "pql-alpha", "apiKeyId": 5})
    );
    Ok(())
}

#[test]
fn project_settings_and_toggles() -> Result<()> {
    let server = MockServer::start(vec![
        CannedResponse::graphql(json!({
            "getPromptQlConfig": {"promptQlEnabled": true, "playgroundEnabled": false},
        })),
        CannedResponse::graphql(json!({
            "getPlaygroundConfig": {
                "allowPublicAccess": false,
                "featureFlags": {"charts": true},
                "llmProvider": "anthropic",
                "readme": null,
                "systemInstructions": "Be brief.",
                "userTokenUsageLimit": 1000,
            },
        })),
        CannedResponse::graphql(json!({"enablePromptQl": {"message": "enabled"}})),
        CannedResponse::graphql(json!({"disablePromptQl": {"message": "disabled"}})),
    ])?;
    let client = client_for(&server, "test-pat", "")?;
    let projects = client.projects();

    let config = projects.get_config("pql-alpha")?;
    assert!(config.prompt_ql_enabled);
    assert!(!config.playground_enabled);

    let playground = projects.get_playground_config("pql-alpha")?;
    assert_eq!(playground.allow_public_access, Some(false));
    assert_eq!(playground.llm_provider, "anthropic");
    assert_eq!(playground.readme, "");
    assert_eq!(playground.system_instructions, "Be brief.");
    assert_eq!(playground.user_token_usage_limit, Some(1000));
    assert_eq!(playground.project_token_usage_limit, None);

    assert_eq!(projects.enable("pql-alpha")?.message, "enabled");
    assert_eq!(projects.disable("pql-alpha")?.message, "disabled");

    let recorded = server.finish()?;
    let fields = [
        "getPromptQlConfig(projectId: $projectId)",
        "getPlaygroundConfig(projectId: $projectId)",
        "enablePromptQl(projectId: $projectId)",
        "disablePromptQl(projectId: $projectId)",
    ];
    for (request, field) in recorded.iter().zip(fields) {
        assert_eq!(request.url, "/graphql");
        let body = request.json()?;
        assert!(query_text(&body).contains(field), "{field}");
        assert_eq!(body["variables"], json!({"projectId": "pql-alpha"}));
    }
    Ok(())
}

#[test]
fn thread_lookup_and_feedback() -> Result<()> {
    let server = MockServer::start(vec![
        CannedResponse::graphql(json!({"getThread": promptql_testkit::threads()[0].clone()})),
        CannedResponse::graphql(json!({
            "submitThreadFeedback": {
                "thread_id": "t-1",
                "message_id": "m-2",
                "promptql_user_id": "pu-1",
                "feedback": 1,
                "details": null,
                "created_at": "2026-03-02T10:20:00Z",
            },
        })),
        CannedResponse::graphql(json!({
            "submitThreadFeedback": {"thread_id": "t-1", "message_id": "m-3", "feedback": -1, "details": "wrong table"},
        })),
    ])?;
    let client = client_for(&server, "test-pat", "")?;

    let thread = client.threads().get("t-1")?;
    assert_eq!(thread.title, "Revenue by region");
    assert_eq!(thread.visibility, "private");

    let feedback = client.threads().submit_feedback("t-1", "m-2", 1, "")?;
    assert_eq!(feedback.feedback, Some(1));
    assert_eq!(feedback.details, "");
    let feedback = client
        .threads()
        .submit_feedback("t-1", "m-3", -1, "wrong table")?;
    assert_eq!(feedback.details, "wrong table");

    let recorded = server.finish()?;
    let get = recorded[0].json()?;
    assert!(query_text(&get).contains("getThread(threadId: $threadId)"));
    assert_eq!(get["variables"], json!({"threadId": "t-1"}));
    let plain = recorded[1].json()?;
    assert!(query_text(&plain).contains("submitThreadFeedback("));
    assert_eq!(
        plain["variables"],
        json!({"threadId": "t-1", "messageId": "m-2", "feedback": 1})
    );
    assert_eq!(
        recorded[2].json()?["variables"]["details"],
        json!("wrong table")
    );
    Ok(())
}
