// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use promptql_sdk::{
    Client, ClientOptions, Project, ProjectLookup, SendMessageResult, StartThreadResult, Thread,
    ThreadEvent,
};
use serde_json::Value;
use tracing::debug;

use crate::extract::{event_content, event_role, query_content, reply_content};
use crate::{ChatMessage, Credentials, Key, Screen, SetupField, SetupForm, TextArea};

pub const PAT_REQUIRED: &str = "PAT is required";
pub const NO_PROJECT_SELECTED: &str = "no project selected";
pub const NO_ROUTE: &str = "no project selected or API key + DDN URL configured";
const DEFAULT_TIMEZONE: &str = "UTC";

/// Everything that can change the model. Results of remote work arrive as
/// the variants after `Tick`. Lookup and chat results echo the `session` of
/// the command that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Key(Key),
    Resize { width: u16, height: u16 },
    Tick,
    ErrorResult(String),
    ConfigSaved,
    ProjectsLoaded(Vec<Project>),
    LookupResult {
        session: u64,
        lookup: ProjectLookup,
    },
    ThreadsLoaded(Vec<Thread>),
    EventsLoaded {
        session: u64,
        events: Vec<ThreadEvent>,
    },
    ThreadStarted {
        session: u64,
        started: StartThreadResult,
    },
    MessageSent {
        session: u64,
        sent: SendMessageResult,
    },
    QueryResult {
        session: u64,
        payload: Value,
    },
}

/// Work requested by a transition. Remote variants carry every input they
/// need so the worker running them never reads the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    SaveCredentials(Credentials),
    LoadProjects,
    LookupProject {
        session: u64,
        name: String,
        fqdn: String,
    },
    LoadThreads {
        project_id: String,
    },
    LoadEvents {
        session: u64,
        thread_id: String,
    },
    StartThread {
        session: u64,
        project_id: String,
        build_fqdn: String,
        timezone: String,
        message: String,
    },
    SendMessage {
        session: u64,
        thread_id: String,
        build_fqdn: String,
        timezone: String,
        message: String,
    },
    ExecuteQuery {
        session: u64,
        question: String,
        ddn_url: String,
        timezone: String,
    },
}

/// A row of the threads list. Row 0 is the synthetic "New Thread" entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadRow {
    NewThread,
    Existing(usize),
}

impl ThreadRow {
    pub fn from_cursor(cursor: usize, thread_count: usize) -> Option<Self> {
        match cursor {
            0 => Some(Self::NewThread),
            n if n <= thread_count => Some(Self::Existing(n - 1)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    pub screen: Screen,
    pub width: u16,
    pub height: u16,
    pub loading: bool,
    pub error: Option<String>,
    pub credentials: Credentials,
    pub setup: SetupForm,
    pub projects: Vec<Project>,
    pub project_cursor: usize,
    pub selected_project: Option<Project>,
    pub build_fqdn: String,
    pub threads: Vec<Thread>,
    pub thread_cursor: usize,
    pub active_thread: Option<Thread>,
    pub thread_id: String,
    pub messages: Vec<ChatMessage>,
    pub chat_input: TextArea,
    pub spinner_frame: usize,
    /// Bumped whenever the user leaves or opens a chat or starts a lookup.
    /// Results tagged with an older value are dropped.
    session: u64,
    client: Option<Client>,
    pending_client: Option<Client>,
    endpoints: ClientOptions,
}

impl Model {
    /// Builds the startup model. Credentials with a PAT bind a client and
    /// open the projects screen; anything else opens setup.
    pub fn new(credentials: Credentials, endpoints: ClientOptions) -> Result<Self> {
        let mut model = Self {
            screen: Screen::Setup,
            width: 80,
            height: 24,
            loading: false,
            error: None,
            setup: SetupForm::from_credentials(&credentials),
            credentials,
            projects: Vec::new(),
            project_cursor: 0,
            selected_project: None,
            build_fqdn: String::new(),
            threads: Vec::new(),
            thread_cursor: 0,
            active_thread: None,
            thread_id: String::new(),
            messages: Vec::new(),
            chat_input: TextArea::default(),
            spinner_frame: 0,
            session: 0,
            client: None,
            pending_client: None,
            endpoints,
        };
        if model.credentials.has_pat() {
            model.client = Some(model.build_client()?);
            model.screen = Screen::Projects;
            model.loading = true;
        }
        Ok(model)
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn thread_row(&self) -> Option<ThreadRow> {
        ThreadRow::from_cursor(self.thread_cursor, self.threads.len())
    }

    pub fn init(&self) -> Command {
        if self.screen == Screen::Projects && self.loading {
            Command::LoadProjects
        } else {
            Command::None
        }
    }

    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.chat_input.set_width(width.saturating_sub(4));
                Command::None
            }
            Msg::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                Command::None
            }
            Msg::ErrorResult(message) => {
                self.loading = false;
                self.error = Some(message);
                Command::None
            }
            Msg::ConfigSaved => self.on_config_saved(),
            Msg::ProjectsLoaded(projects) => {
                self.projects = projects;
                self.project_cursor = self
                    .project_cursor
                    .min(self.projects.len().saturating_sub(1));
                if self.screen == Screen::Projects {
                    self.loading = false;
                    self.error = None;
                }
                Command::None
            }
            Msg::LookupResult { session, lookup } => {
                if session != self.session {
                    return Command::None;
                }
                self.on_lookup(lookup)
            }
            Msg::ThreadsLoaded(threads) => {
                self.threads = threads;
                self.thread_cursor = self.thread_cursor.min(self.threads.len());
                if self.screen == Screen::Threads {
                    self.loading = false;
                    self.error = None;
                }
                Command::None
            }
            Msg::EventsLoaded { session, events } if session == self.session => {
                self.on_events_loaded(events)
            }
            Msg::ThreadStarted { session, started } if session == self.session => {
                self.on_thread_started(started)
            }
            Msg::MessageSent { session, sent } if session == self.session => {
                let content = reply_content(&sent.event_data).to_owned();
                self.on_reply(content)
            }
            Msg::QueryResult { session, payload } if session == self.session => {
                self.on_reply(query_content(&payload))
            }
            Msg::EventsLoaded { .. }
            | Msg::ThreadStarted { .. }
            | Msg::MessageSent { .. }
            | Msg::QueryResult { .. } => {
                debug!("dropped result from an earlier session");
                Command::None
            }
        }
    }

    fn next_session(&mut self) -> u64 {
        self.session = self.session.wrapping_add(1);
        self.session
    }

    fn handle_key(&mut self, key: Key) -> Command {
        match key {
            Key::Ctrl('c') => return Command::Quit,
            Key::Esc => {
                self.back();
                return Command::None;
            }
            _ => {}
        }
        if self.loading {
            return Command::None;
        }
        match self.screen {
            Screen::Setup => self.setup_key(key),
            Screen::Projects => self.projects_key(key),
            Screen::Threads => self.threads_key(key),
            Screen::Chat => self.chat_key(key),
        }
    }

    fn back(&mut self) {
        let previous = match self.screen {
            Screen::Setup => return,
            Screen::Projects => {
                self.enter_setup();
                return;
            }
            Screen::Threads => Screen::Projects,
            Screen::Chat => Screen::Threads,
        };
        self.error = None;
        self.loading = false;
        self.next_session();
        self.enter(previous);
    }

    fn enter(&mut self, screen: Screen) {
        if self.screen != screen {
            debug!(from = ?self.screen, to = ?screen, "screen change");
        }
        self.screen = screen;
    }

    fn enter_setup(&mut self) {
        self.client = None;
        self.pending_client = None;
        self.selected_project = None;
        self.build_fqdn.clear();
        self.next_session();
        self.error = None;
        self.loading = false;
        self.setup.focus = SetupField::Pat;
        self.enter(Screen::Setup);
    }

    fn build_client(&self) -> Result<Client> {
        Client::new(ClientOptions {
            pat: self.credentials.pat.clone(),
            api_key: self.credentials.api_key.clone(),
            ..self.endpoints.clone()
        })
        .context("create service client")
    }

    fn setup_key(&mut self, key: Key) -> Command {
        match key {
            Key::Tab | Key::Down => self.setup.focus_next(),
            Key::BackTab | Key::Up => self.setup.focus_prev(),
            Key::Enter => return self.save_setup(),
            Key::Char(ch) => self.setup.push(ch),
            Key::Backspace => self.setup.pop(),
            _ => {}
        }
        Command::None
    }

    fn save_setup(&mut self) -> Command {
        let pat = self.setup.value(SetupField::Pat);
        if pat.is_empty() {
            self.error = Some(PAT_REQUIRED.to_owned());
            return Command::None;
        }

        self.credentials.pat = pat.to_owned();
        self.credentials.api_key = self.setup.value(SetupField::ApiKey).to_owned();
        self.credentials.ddn_url = self.setup.value(SetupField::DdnUrl).to_owned();
        let timezone = self.setup.value(SetupField::Timezone);
        self.credentials.timezone = if timezone.is_empty() {
            DEFAULT_TIMEZONE.to_owned()
        } else {
            timezone.to_owned()
        };

        match self.build_client() {
            Ok(client) => self.pending_client = Some(client),
            Err(error) => {
                self.error = Some(format!("{error:#}"));
                return Command::None;
            }
        }
        Command::SaveCredentials(self.credentials.clone())
    }

    fn on_config_saved(&mut self) -> Command {
        if self.screen != Screen::Setup {
            return Command::None;
        }
        let Some(client) = self.pending_client.take() else {
            return Command::None;
        };
        self.client = Some(client);
        self.error = None;
        self.loading = true;
        self.enter(Screen::Projects);
        Command::LoadProjects
    }

    fn projects_key(&mut self, key: Key) -> Command {
        match key {
            Key::Char('j') | Key::Down => {
                if self.project_cursor + 1 < self.projects.len() {
                    self.project_cursor += 1;
                }
            }
            Key::Char('k') | Key::Up => {
                self.project_cursor = self.project_cursor.saturating_sub(1);
            }
            Key::Enter => {
                let Some(project) = self.projects.get(self.project_cursor).cloned() else {
                    return Command::None;
                };
                let command = Command::LookupProject {
                    session: self.next_session(),
                    name: project.name.clone(),
                    fqdn: project.build_fqdn.clone(),
                };
                self.selected_project = Some(project);
                self.loading = true;
                self.error = None;
                return command;
            }
            Key::Char('r') => {
                self.loading = true;
                self.error = None;
                return Command::LoadProjects;
            }
            Key::Char('s') => self.enter_setup(),
            _ => {}
        }
        Command::None
    }

    fn on_lookup(&mut self, lookup: ProjectLookup) -> Command {
        if let Some(project) = self.selected_project.as_mut() {
            project.project_id = lookup.project_id.clone();
            project.build_fqdn = lookup.build_fqdn.clone();
        }
        self.build_fqdn = lookup.build_fqdn;
        self.credentials.project_id = lookup.project_id;

        if self.screen != Screen::Projects {
            return Command::None;
        }
        let Some(project) = &self.selected_project else {
            return Command::None;
        };
        let command = Command::LoadThreads {
            project_id: project.project_id.clone(),
        };
        self.threads.clear();
        self.thread_cursor = 0;
        self.loading = true;
        self.error = None;
        self.enter(Screen::Threads);
        command
    }

    fn threads_key(&mut self, key: Key) -> Command {
        match key {
            Key::Char('j') | Key::Down => {
                if self.thread_cursor < self.threads.len() {
                    self.thread_cursor += 1;
                }
            }
            Key::Char('k') | Key::Up => {
                self.thread_cursor = self.thread_cursor.saturating_sub(1);
            }
            Key::Enter => match self.thread_row() {
                Some(ThreadRow::NewThread) => self.open_new_thread(),
                Some(ThreadRow::Existing(index)) => {
                    if let Some(thread) = self.threads.get(index).cloned() {
                        return self.resume_thread(thread);
                    }
                }
                None => {}
            },
            Key::Char('n') => self.open_new_thread(),
            Key::Char('r') => {
                let Some(project) = &self.selected_project else {
                    self.error = Some(NO_PROJECT_SELECTED.to_owned());
                    return Command::None;
                };
                let command = Command::LoadThreads {
                    project_id: project.project_id.clone(),
                };
                self.loading = true;
                self.error = None;
                return command;
            }
            _ => {}
        }
        Command::None
    }

    fn open_new_thread(&mut self) {
        self.next_session();
        self.thread_id.clear();
        self.active_thread = None;
        self.messages.clear();
        self.enter(Screen::Chat);
    }

    fn resume_thread(&mut self, thread: Thread) -> Command {
        let command = Command::LoadEvents {
            session: self.next_session(),
            thread_id: thread.thread_id.clone(),
        };
        self.thread_id = thread.thread_id.clone();
        self.active_thread = Some(thread);
        self.messages.clear();
        self.loading = true;
        self.error = None;
        self.enter(Screen::Chat);
        command
    }

    fn chat_key(&mut self, key: Key) -> Command {
        if key == Key::Ctrl('s') {
            return self.send();
        }
        self.chat_input.handle_key(key);
        Command::None
    }

    fn send(&mut self) -> Command {
        let text = self.chat_input.value().trim().to_owned();
        if text.is_empty() {
            return Command::None;
        }

        self.messages.push(ChatMessage::user(text.clone()));
        self.chat_input.clear();
        self.loading = true;
        self.error = None;

        let timezone = self.credentials.timezone.clone();
        let session = self.session;
        if self.client.is_some()
            && let Some(project) = &self.selected_project
        {
            if self.thread_id.is_empty() {
                return Command::StartThread {
                    session,
                    project_id: project.project_id.clone(),
                    build_fqdn: self.build_fqdn.clone(),
                    timezone,
                    message: text,
                };
            }
            return Command::SendMessage {
                session,
                thread_id: self.thread_id.clone(),
                build_fqdn: self.build_fqdn.clone(),
                timezone,
                message: text,
            };
        }
        if !self.credentials.api_key.is_empty() && !self.credentials.ddn_url.is_empty() {
            return Command::ExecuteQuery {
                session,
                question: text,
                ddn_url: self.credentials.ddn_url.clone(),
                timezone,
            };
        }

        self.error = Some(NO_ROUTE.to_owned());
        self.loading = false;
        Command::None
    }

    fn on_thread_started(&mut self, started: StartThreadResult) -> Command {
        if self.screen != Screen::Chat {
            return Command::None;
        }
        self.loading = false;
        self.error = None;
        self.thread_id = started.thread_id.clone();
        self.active_thread = Some(Thread {
            thread_id: started.thread_id,
            title: started.title,
            created_at: started.created_at,
            updated_at: started.updated_at,
            project_id: self
                .selected_project
                .as_ref()
                .map(|project| project.project_id.clone())
                .unwrap_or_default(),
            ..Thread::default()
        });
        for event in &started.thread_events {
            let content = event_content(&event.event_data);
            if !content.is_empty() {
                self.messages.push(ChatMessage::assistant(content));
            }
        }
        Command::None
    }

    fn on_events_loaded(&mut self, events: Vec<ThreadEvent>) -> Command {
        if self.screen != Screen::Chat {
            return Command::None;
        }
        self.loading = false;
        self.error = None;
        for event in &events {
            if !event.thread_id.is_empty() && event.thread_id != self.thread_id {
                continue;
            }
            let content = event_content(&event.event_data);
            if content.is_empty() {
                continue;
            }
            self.messages.push(ChatMessage {
                role: event_role(&event.event_data),
                content: content.to_owned(),
            });
        }
        Command::None
    }

    fn on_reply(&mut self, content: String) -> Command {
        if self.screen != Screen::Chat {
            return Command::None;
        }
        self.loading = false;
        self.error = None;
        if !content.is_empty() {
            self.messages.push(ChatMessage::assistant(content));
        }
        Command::None
    }
}
