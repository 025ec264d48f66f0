// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::projects::project_variables;
use crate::{Client, MessageResult, Result, SamplePrompt, variables};
use serde_json::Value;

const PROMPT_FIELDS: &str = "id displayText fullPrompt projectId createdBy createdAt updatedBy updatedAt";

#[derive(Debug, Clone, Copy)]
pub struct Prompts<'a> {
    client: &'a Client,
}

impl<'a> Prompts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, project_id: &str) -> Result<Vec<SamplePrompt>> {
        let query = format!(
            "query ListSamplePrompts($projectId: String!) {{\n  getSamplePrompts(projectId: $projectId) {{ {PROMPT_FIELDS} }}\n}}"
        );
        self.client
            .graphql(&query, project_variables(project_id), "getSamplePrompts")
    }

    pub fn create(
        &self,
        project_id: &str,
        display_text: &str,
        full_prompt: &str,
    ) -> Result<SamplePrompt> {
        let query = format!(
            "mutation CreateSamplePrompt($projectId: String!, $displayText: String!, $fullPrompt: String!) {{\n  createSamplePrompt(projectId: $projectId, displayText: $displayText, fullPrompt: $fullPrompt) {{ {PROMPT_FIELDS} }}\n}}"
        );
        let variables = variables([
            ("projectId", Value::from(project_id)),
            ("displayText", Value::from(display_text)),
            ("fullPrompt", Value::from(full_prompt)),
        ]);
        self.client.graphql(&query, variables, "createSamplePrompt")
    }

    pub fn update(
        &self,
        project_id: &str,
        prompt_id: &str,
        display_text: &str,
        full_prompt: &str,
    ) -> Result<SamplePrompt> {
        let query = format!(
            "mutation UpdateSamplePrompt($projectId: String!, $promptId: String!, $displayText: String!, $fullPrompt: String!) {{\n  updateSamplePrompt(projectId: $projectId, promptId: $promptId, displayText: $displayText, fullPrompt: $fullPrompt) {{ {PROMPT_FIELDS} }}\n}}"
        );
        let variables = variables([
            ("projectId", Value::from(project_id)),
            ("promptId", Value::from(prompt_id)),
            ("displayText", Value::from(display_text)),
            ("fullPrompt", Value::from(full_prompt)),
        ]);
        self.client.graphql(&query, variables, "updateSamplePrompt")
    }

    pub fn delete(&self, project_id: &str, prompt_id: &str) -> Result<MessageResult> {
        let query = "mutation DeleteSamplePrompt($projectId: String!, $promptId: String!) {\n  deleteSamplePrompt(projectId: $projectId, promptId: $promptId) { message }\n}";
        let variables = variables([
            ("projectId", Value::from(project_id)),
            ("promptId", Value::from(prompt_id)),
        ]);
        self.client.graphql(query, variables, "deleteSamplePrompt")
    }
}
