// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::CredentialStore;
use anyhow::{Context, Result, anyhow};
use promptql_app::{Command, Msg};
use promptql_sdk::{Client, LookupOptions, SendMessageOptions, StartOptions};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, warn};

const NO_CLIENT: &str = "no service client configured; add a PAT in setup";

/// Runs model commands against the Service. Credential saves happen on the
/// calling thread; everything remote gets its own worker.
pub struct ServiceRuntime {
    store: CredentialStore,
}

impl ServiceRuntime {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }
}

impl promptql_tui::AppRuntime for ServiceRuntime {
    fn dispatch(
        &mut self,
        command: Command,
        client: Option<Client>,
        inbox: Sender<Msg>,
    ) -> Result<()> {
        match command {
            Command::None | Command::Quit => Ok(()),
            Command::SaveCredentials(credentials) => {
                let msg = match self.store.save(&credentials) {
                    Ok(()) => Msg::ConfigSaved,
                    Err(error) => Msg::ErrorResult(format!("{error:#}")),
                };
                post(&inbox, msg)
            }
            command => {
                let Some(client) = client else {
                    return post(&inbox, Msg::ErrorResult(NO_CLIENT.to_owned()));
                };
                thread::Builder::new()
                    .name("promptql-worker".to_owned())
                    .spawn(move || {
                        let msg = execute(&client, command);
                        // The loop is gone once the session has quit.
                        let _ = inbox.send(msg);
                    })
                    .context("spawn request worker")?;
                Ok(())
            }
        }
    }
}

fn post(inbox: &Sender<Msg>, msg: Msg) -> Result<()> {
    inbox.send(msg).map_err(|_| anyhow!("session inbox closed"))
}

/// Performs one remote command and converts the outcome into the message
/// the model expects.
pub fn execute(client: &Client, command: Command) -> Msg {
    debug!(?command, "request start");
    let result = match command {
        Command::LoadProjects => client
            .projects()
            .list_user_projects()
            .map(Msg::ProjectsLoaded),
        Command::LookupProject {
            session,
            name,
            fqdn,
        } => client
            .projects()
            .lookup(&LookupOptions {
                project_name: name,
                fqdn,
                ..LookupOptions::default()
            })
            .map(|lookup| Msg::LookupResult { session, lookup }),
        Command::LoadThreads { project_id } => client
            .threads()
            .list(&project_id, "")
            .map(Msg::ThreadsLoaded),
        Command::LoadEvents { session, thread_id } => client
            .threads()
            .get_events(&thread_id)
            .map(|events| Msg::EventsLoaded { session, events }),
        Command::StartThread {
            session,
            project_id,
            build_fqdn,
            timezone,
            message,
        } => client
            .threads()
            .start(&StartOptions {
                project_id,
                message,
                build_fqdn,
                timezone,
                ..StartOptions::default()
            })
            .map(|started| Msg::ThreadStarted { session, started }),
        Command::SendMessage {
            session,
            thread_id,
            build_fqdn,
            timezone,
            message,
        } => client
            .threads()
            .send_message(&SendMessageOptions {
                thread_id,
                message,
                build_fqdn,
                timezone,
            })
            .map(|sent| Msg::MessageSent { session, sent }),
        Command::ExecuteQuery {
            session,
            question,
            ddn_url,
            timezone,
        } => client
            .query()
            .ask(&question, &ddn_url, None, &timezone)
            .map(|payload| Msg::QueryResult { session, payload }),
        Command::None | Command::Quit | Command::SaveCredentials(_) => {
            return Msg::ErrorResult("command does not run on a worker".to_owned());
        }
    };
    result.unwrap_or_else(|error| {
        warn!(kind = ?error.kind(), status = ?error.status(), "request failed");
        Msg::ErrorResult(error.to_string())
    })
}
