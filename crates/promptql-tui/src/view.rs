// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Pure rendering of the session model. Nothing here performs I/O; the
//! event loop hands the resulting [`Text`] to a paragraph widget.

use promptql_app::{Model, Role, Screen, SetupField, TextArea, ThreadRow};
use promptql_app::text_area::CHAT_PLACEHOLDER;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

const PRIMARY: Color = Color::Rgb(0x7C, 0x3A, 0xED);
const SECONDARY: Color = Color::Rgb(0x06, 0xB6, 0xD4);
const MUTED: Color = Color::Rgb(0x6B, 0x72, 0x80);
const ERROR: Color = Color::Rgb(0xEF, 0x44, 0x44);
const USER: Color = Color::Rgb(0xA7, 0x8B, 0xFA);
const FOREGROUND: Color = Color::Rgb(0xF9, 0xFA, 0xFB);

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub const SETUP_HINTS: &str = "tab/shift+tab: navigate  |  enter: save & continue  |  ctrl+c: quit";
pub const PROJECTS_HINTS: &str = "↑/↓: navigate  |  enter: select  |  s: setup  |  ctrl+c: quit";
pub const PROJECTS_ERROR_HINTS: &str = "r: retry  |  s: setup  |  ctrl+c: quit";
pub const PROJECTS_EMPTY_HINTS: &str = "s: setup  |  ctrl+c: quit";
pub const THREADS_HINTS: &str =
    "↑/↓: navigate  |  enter: select  |  n: new thread  |  esc: back  |  ctrl+c: quit";
pub const THREADS_ERROR_HINTS: &str = "r: retry  |  esc: back  |  n: new thread  |  ctrl+c: quit";
pub const CHAT_HINTS: &str = "ctrl+s: send  |  esc: back to threads  |  ctrl+c: quit";

fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

fn subtitle_style() -> Style {
    Style::default().fg(SECONDARY).add_modifier(Modifier::ITALIC)
}

fn help_style() -> Style {
    Style::default().fg(MUTED)
}

fn error_style() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

fn prompt_style() -> Style {
    Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD)
}

fn item_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(FOREGROUND)
    }
}

/// Renders the current screen as styled text.
pub fn render_text(model: &Model) -> Text<'static> {
    let lines = match model.screen {
        Screen::Setup => setup_lines(model),
        Screen::Projects => projects_lines(model),
        Screen::Threads => threads_lines(model),
        Screen::Chat => chat_lines(model),
    };
    Text::from(lines)
}

/// The rendered screen without styling, one terminal line per text line.
pub fn view(model: &Model) -> String {
    render_text(model)
        .lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Half-open window `[offset, end)` of a list that keeps `cursor` visible
/// in a terminal `height` rows tall.
pub fn visible_window(cursor: usize, len: usize, height: u16) -> (usize, usize) {
    let max_visible = usize::from(height).saturating_sub(6).max(3).min(len);
    let offset = (cursor + 1).saturating_sub(max_visible);
    let end = (offset + max_visible).min(len);
    (end.saturating_sub(max_visible), end)
}

/// Formats a Service timestamp as `YYYY-MM-DD HH:MM:SS`. Values that do not
/// parse as RFC 3339 are cut to their first 19 characters.
pub fn format_timestamp(raw: &str) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|parsed| parsed.format(&format).ok())
        .unwrap_or_else(|| raw.chars().take(19).collect())
}

fn title_line(title: &str, subtitle: Option<&str>) -> Line<'static> {
    let mut spans = vec![Span::styled(title.to_owned(), title_style())];
    if let Some(subtitle) = subtitle.filter(|value| !value.is_empty()) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(subtitle.to_owned(), subtitle_style()));
    }
    Line::from(spans)
}

fn hint_line(hints: &str) -> Line<'static> {
    Line::styled(hints.to_owned(), help_style())
}

fn error_line(message: &str) -> Line<'static> {
    Line::styled(format!("Error: {message}"), error_style())
}

fn spinner_line(model: &Model, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            spinner_glyph(model.spinner_frame).to_owned(),
            Style::default().fg(PRIMARY),
        ),
        Span::raw(format!(" {label}")),
    ])
}

fn more_below(remaining: usize) -> Line<'static> {
    Line::styled(format!("  ... {remaining} more below"), help_style())
}

fn setup_lines(model: &Model) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(Screen::Setup.title(), None), Line::default()];
    for field in SetupField::ALL {
        if field == model.setup.focus {
            lines.push(Line::styled(format!("> {}", field.label()), prompt_style()));
        } else {
            lines.push(Line::styled(format!("  {}", field.label()), help_style()));
        }
        let shown = model.setup.display_value(field);
        if shown.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(field.placeholder().to_owned(), help_style()),
            ]));
        } else {
            lines.push(Line::raw(format!("  {shown}")));
        }
        lines.push(Line::default());
    }
    if let Some(error) = &model.error {
        lines.push(error_line(error));
        lines.push(Line::default());
    }
    lines.push(hint_line(SETUP_HINTS));
    lines
}

fn projects_lines(model: &Model) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(Screen::Projects.title(), None)];
    if model.loading {
        lines.push(spinner_line(model, "Loading projects..."));
        return lines;
    }
    if let Some(error) = &model.error {
        lines.extend([error_line(error), Line::default(), hint_line(PROJECTS_ERROR_HINTS)]);
        return lines;
    }
    if model.projects.is_empty() {
        lines.extend([
            Line::styled("No projects found.", help_style()),
            Line::default(),
            hint_line(PROJECTS_EMPTY_HINTS),
        ]);
        return lines;
    }

    lines.push(Line::styled(
        format!("{} projects found", model.projects.len()),
        subtitle_style(),
    ));
    lines.push(Line::default());

    let (offset, end) = visible_window(model.project_cursor, model.projects.len(), model.height);
    for (index, project) in model.projects[offset..end].iter().enumerate() {
        let selected = offset + index == model.project_cursor;
        let marker = if selected { "> " } else { "  " };
        let mut spans = vec![Span::styled(
            format!("{marker}{}", project.name),
            item_style(selected),
        )];
        if !project.build_fqdn.is_empty() {
            spans.push(Span::styled(
                format!("  ({})", project.build_fqdn),
                help_style(),
            ));
        }
        lines.push(Line::from(spans));
    }
    if end < model.projects.len() {
        lines.push(more_below(model.projects.len() - end));
    }

    lines.push(Line::default());
    lines.push(hint_line(PROJECTS_HINTS));
    lines
}

fn threads_lines(model: &Model) -> Vec<Line<'static>> {
    let project_name = model
        .selected_project
        .as_ref()
        .map(|project| project.name.as_str());
    let mut lines = vec![title_line(Screen::Threads.title(), project_name)];
    if model.loading {
        lines.push(spinner_line(model, "Loading threads..."));
        return lines;
    }
    if let Some(error) = &model.error {
        lines.extend([error_line(error), Line::default(), hint_line(THREADS_ERROR_HINTS)]);
        return lines;
    }

    lines.push(Line::styled(
        "Select a thread or start a new one",
        subtitle_style(),
    ));
    lines.push(Line::default());

    let rows = model.threads.len() + 1;
    let (offset, end) = visible_window(model.thread_cursor, rows, model.height);
    for cursor in offset..end {
        let selected = cursor == model.thread_cursor;
        let marker = if selected { "> " } else { "  " };
        match ThreadRow::from_cursor(cursor, model.threads.len()) {
            Some(ThreadRow::NewThread) => {
                lines.push(Line::styled(
                    format!("{marker}+ New Thread"),
                    item_style(selected),
                ));
            }
            Some(ThreadRow::Existing(index)) => {
                let thread = &model.threads[index];
                let title = if thread.title.is_empty() {
                    &thread.thread_id
                } else {
                    &thread.title
                };
                let mut spans = vec![Span::styled(format!("{marker}{title}"), item_style(selected))];
                if !thread.updated_at.is_empty() {
                    spans.push(Span::styled(
                        format!("  ({})", format_timestamp(&thread.updated_at)),
                        help_style(),
                    ));
                }
                lines.push(Line::from(spans));
            }
            None => {}
        }
    }
    if end < rows {
        lines.push(more_below(rows - end));
    }

    lines.push(Line::default());
    lines.push(hint_line(THREADS_HINTS));
    lines
}

fn chat_lines(model: &Model) -> Vec<Line<'static>> {
    let subtitle = model
        .active_thread
        .as_ref()
        .map(|thread| thread.title.as_str())
        .filter(|title| !title.is_empty())
        .unwrap_or("New Thread");
    let mut lines = vec![title_line(Screen::Chat.title(), Some(subtitle)), Line::default()];
    if model.loading && model.messages.is_empty() {
        lines.push(spinner_line(model, "Loading..."));
        return lines;
    }

    let mut history = Vec::new();
    for message in &model.messages {
        let prefix = match message.role {
            Role::User => Span::styled(
                message.role.prefix(),
                Style::default().fg(USER).add_modifier(Modifier::BOLD),
            ),
            Role::Assistant => {
                Span::styled(message.role.prefix(), Style::default().fg(FOREGROUND))
            }
        };
        let mut content = message.content.split('\n');
        let first = content.next().unwrap_or_default();
        history.push(Line::from(vec![prefix, Span::raw(first.to_owned())]));
        history.extend(content.map(|rest| Line::raw(rest.to_owned())));
        history.push(Line::default());
    }
    let keep = usize::from(model.height).saturating_sub(12).max(5);
    let skip = history.len().saturating_sub(keep);
    lines.extend(history.into_iter().skip(skip));

    if model.loading {
        lines.push(spinner_line(model, "Thinking..."));
    }
    if let Some(error) = &model.error {
        lines.push(error_line(error));
    }

    lines.push(Line::default());
    lines.push(Line::styled("Message: ", prompt_style()));
    lines.extend(input_lines(&model.chat_input));
    lines.push(hint_line(CHAT_HINTS));
    lines
}

fn input_lines(input: &TextArea) -> Vec<Line<'static>> {
    if input.is_empty() {
        return vec![Line::from(vec![
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
            Span::styled(CHAT_PLACEHOLDER, help_style()),
        ])];
    }
    let (row, col) = input.cursor();
    input
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index != row {
                return Line::raw(line.clone());
            }
            let before: String = line.chars().take(col).collect();
            let mut rest = line.chars().skip(col);
            let under = rest.next().map_or_else(|| " ".to_owned(), String::from);
            let after: String = rest.collect();
            Line::from(vec![
                Span::raw(before),
                Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw(after),
            ])
        })
        .collect()
}
