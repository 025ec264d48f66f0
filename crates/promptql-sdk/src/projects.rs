// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    Client, MessageResult, PlaygroundConfig, Project, ProjectLookup, PromptQlConfig, Result,
    insert_non_empty, variables,
};
use serde::Deserialize;
use serde_json::{Map, Value};

const LIST_USER_PROJECTS: &str = r#"
query ListUserProjects {
  getUserProjects {
    buildFqdn
    ddnProjectId
    name
    projectId
  }
}"#;

const LIST_DDN_PROJECTS: &str = r#"
query ListDdnProjects {
  ddn_projects {
    id
    name
    ddn_builds {
      fqdn
    }
  }
}"#;

const GET_CONFIG: &str = r#"
query GetPromptQLConfig($projectId: String!) {
  getPromptQlConfig(projectId: $projectId) {
    promptQlEnabled
    playgroundEnabled
  }
}"#;

const GET_PLAYGROUND_CONFIG: &str = r#"
query GetPlaygroundConfig($projectId: String!) {
  getPlaygroundConfig(projectId: $projectId) {
    allowPublicAccess
    featureFlags
    llmApiKey
    llmProvider
    projectTokenUsageLimit
    readme
    systemInstructions
    userTokenUsageLimit
  }
}"#;

const LOOKUP_PROJECT: &str = r#"
query LookupProject($projectId: String, $projectName: String, $fqdn: String) {
  lookupProject(projectId: $projectId, projectName: $projectName, fqdn: $fqdn) {
    buildFqdn
    consoleUrl
    ddnProjectId
    name
    projectId
  }
}"#;

const ENABLE: &str = r#"
mutation EnablePromptQL($projectId: String!) {
  enablePromptQl(projectId: $projectId) {
    message
  }
}"#;

const DISABLE: &str = r#"
mutation DisablePromptQL($projectId: String!) {
  disablePromptQl(projectId: $projectId) {
    message
  }
}"#;

/// Any combination of identifiers; empty fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub project_id: String,
    pub project_name: String,
    pub fqdn: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Projects<'a> {
    client: &'a Client,
}

impl<'a> Projects<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list_user_projects(&self) -> Result<Vec<Project>> {
        self.client
            .graphql(LIST_USER_PROJECTS, Map::new(), "getUserProjects")
    }

    /// Lists projects from the DDN control plane. Each project maps to a
    /// `Project` whose build FQDN is the first build's, if any.
    pub fn list_ddn_projects(&self) -> Result<Vec<Project>> {
        let projects: Vec<DdnProject> =
            self.client
                .graphql_control_plane(LIST_DDN_PROJECTS, Map::new(), "ddn_projects")?;
        Ok(projects.into_iter().map(DdnProject::into_project).collect())
    }

    pub fn get_config(&self, project_id: &str) -> Result<PromptQlConfig> {
        self.client
            .graphql(GET_CONFIG, project_variables(project_id), "getPromptQlConfig")
    }

    pub fn get_playground_config(&self, project_id: &str) -> Result<PlaygroundConfig> {
        self.client.graphql(
            GET_PLAYGROUND_CONFIG,
            project_variables(project_id),
            "getPlaygroundConfig",
        )
    }

    pub fn lookup(&self, options: &LookupOptions) -> Result<ProjectLookup> {
        let mut variables = Map::new();
        insert_non_empty(&mut variables, "projectId", &options.project_id);
        insert_non_empty(&mut variables, "projectName", &options.project_name);
        insert_non_empty(&mut variables, "fqdn", &options.fqdn);
        self.client.graphql(LOOKUP_PROJECT, variables, "lookupProject")
    }

    pub fn enable(&self, project_id: &str) -> Result<MessageResult> {
        self.client
            .graphql(ENABLE, project_variables(project_id), "enablePromptQl")
    }

    pub fn disable(&self, project_id: &str) -> Result<MessageResult> {
        self.client
            .graphql(DISABLE, project_variables(project_id), "disablePromptQl")
    }
}

pub(crate) fn project_variables(project_id: &str) -> Map<String, Value> {
    variables([("projectId", Value::from(project_id))])
}

#[derive(Deserialize)]
struct DdnProject {
    id: String,
    name: String,
    #[serde(default)]
    ddn_builds: Option<Vec<DdnBuild>>,
}

#[derive(Deserialize)]
struct DdnBuild {
    #[serde(default)]
    fqdn: Option<String>,
}

impl DdnProject {
    fn into_project(self) -> Project {
        let build_fqdn = self
            .ddn_builds
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|build| build.fqdn)
            .unwrap_or_default();
        Project {
            build_fqdn,
            ddn_project_id: self.id.clone(),
            name: self.name,
            project_id: self.id,
        }
    }
}
