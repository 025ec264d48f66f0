// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Client, PromptQlUser, Result, variables};
use serde_json::{Map, Value};

const GET_CURRENT: &str = r#"
query GetPromptQLUser($controlPlaneUserId: String!) {
  getPromptQLUser(controlPlaneUserId: $controlPlaneUserId) {
    promptql_user_id
    control_plane_user_id
    email
    display_name
    is_active
    project_id
  }
}"#;

const LIST: &str = r#"
query ListPromptQLUsers {
  getPromptQLUsers {
    promptql_user_id
    control_plane_user_id
    email
    display_name
    is_active
    project_id
  }
}"#;

#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a Client,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get_current(&self, control_plane_user_id: &str) -> Result<PromptQlUser> {
        let variables = variables([("controlPlaneUserId", Value::from(control_plane_user_id))]);
        self.client.graphql(GET_CURRENT, variables, "getPromptQLUser")
    }

    pub fn list(&self) -> Result<Vec<PromptQlUser>> {
        self.client.graphql(LIST, Map::new(), "getPromptQLUsers")
    }
}
