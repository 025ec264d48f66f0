// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod view;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use promptql_app::{Command, Key, Model, Msg};
use promptql_sdk::Client;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::widgets::{Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, info};

pub use view::{render_text, view};

const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Executes the commands the model asks for. Remote work must not block:
/// implementations hand it to a worker that later posts exactly one message
/// to `inbox`.
pub trait AppRuntime {
    fn dispatch(
        &mut self,
        command: Command,
        client: Option<Client>,
        inbox: Sender<Msg>,
    ) -> Result<()>;
}

pub fn run_app<R: AppRuntime>(model: &mut Model, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, terminal::EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(error).context("enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .context("create terminal")
        .and_then(|mut terminal| event_loop(&mut terminal, model, runtime));

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop<B: Backend, R: AppRuntime>(
    terminal: &mut Terminal<B>,
    model: &mut Model,
    runtime: &mut R,
) -> Result<()> {
    let (inbox, outbox) = mpsc::channel();
    let size = terminal.size().context("read terminal size")?;
    info!(width = size.width, height = size.height, "session started");

    let mut quit = step(
        model,
        runtime,
        &inbox,
        Msg::Resize {
            width: size.width,
            height: size.height,
        },
    );
    let initial = model.init();
    quit |= execute_command(model, runtime, &inbox, initial);

    while !quit {
        quit = drain_inbox(model, runtime, &inbox, &outbox);
        if quit {
            break;
        }

        terminal
            .draw(|frame| {
                let paragraph =
                    Paragraph::new(render_text(model)).wrap(Wrap { trim: false });
                frame.render_widget(paragraph, frame.area());
            })
            .context("draw frame")?;

        let msg = if event::poll(POLL_INTERVAL).context("poll event")? {
            match event::read().context("read event")? {
                Event::Key(key) => translate_key(key).map(Msg::Key),
                Event::Resize(width, height) => Some(Msg::Resize { width, height }),
                _ => None,
            }
        } else {
            Some(Msg::Tick)
        };
        if let Some(msg) = msg {
            quit = step(model, runtime, &inbox, msg);
        }
    }

    info!("session ended");
    Ok(())
}

fn drain_inbox<R: AppRuntime>(
    model: &mut Model,
    runtime: &mut R,
    inbox: &Sender<Msg>,
    outbox: &Receiver<Msg>,
) -> bool {
    while let Ok(msg) = outbox.try_recv() {
        if step(model, runtime, inbox, msg) {
            return true;
        }
    }
    false
}

/// Applies one message and runs the resulting command. Returns `true` when
/// the session should end.
pub fn step<R: AppRuntime>(
    model: &mut Model,
    runtime: &mut R,
    inbox: &Sender<Msg>,
    msg: Msg,
) -> bool {
    let command = model.update(msg);
    execute_command(model, runtime, inbox, command)
}

fn execute_command<R: AppRuntime>(
    model: &mut Model,
    runtime: &mut R,
    inbox: &Sender<Msg>,
    command: Command,
) -> bool {
    match command {
        Command::None => false,
        Command::Quit => true,
        command => {
            debug!(?command, "dispatch");
            let client = model.client().cloned();
            if let Err(error) = runtime.dispatch(command, client, inbox.clone()) {
                model.update(Msg::ErrorResult(format!("{error:#}")));
            }
            false
        }
    }
}

/// Maps a terminal key event onto the model's keys. Releases and keys the
/// model has no use for map to `None`.
pub fn translate_key(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char(ch) => Some(Key::Ctrl(ch.to_ascii_lowercase())),
            _ => None,
        };
    }
    let key = match key.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(key)
}
