// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Key;

pub const CHAT_CHAR_LIMIT: usize = 4096;
pub const CHAT_PLACEHOLDER: &str = "Ask PromptQL a question...";

/// Multi-line input buffer for the chat screen. The cursor is tracked in
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    col: usize,
    width: u16,
    char_limit: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new(CHAT_CHAR_LIMIT)
    }
}

impl TextArea {
    pub fn new(char_limit: usize) -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            width: 1,
            char_limit,
        }
    }

    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width.max(1);
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.row = 0;
        self.col = 0;
    }

    /// Applies an editing key. Returns `false` for keys the input does not
    /// handle.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Char(ch) => self.insert_char(ch),
            Key::Enter => self.insert_newline(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Up => self.move_vertical(-1),
            Key::Down => self.move_vertical(1),
            Key::Home => self.col = 0,
            Key::End => self.col = self.line_len(self.row),
            Key::Tab | Key::BackTab | Key::Esc | Key::Ctrl(_) => return false,
        }
        true
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.total_chars() >= self.char_limit {
            return;
        }
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, ch);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        if self.total_chars() >= self.char_limit {
            return;
        }
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let tail = line.split_off(at);
        self.lines.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.col < self.line_len(self.row) {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let target = self.row as isize + delta;
        if target < 0 || target >= self.lines.len() as isize {
            return;
        }
        self.row = target as usize;
        self.col = self.col.min(self.line_len(self.row));
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }

    fn total_chars(&self) -> usize {
        let newlines = self.lines.len() - 1;
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .sum::<usize>()
            + newlines
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(index, _)| index)
}
