// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain column-aligned tables for text output.

use std::io::Write;

use crate::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Muted,
    Status,
}

pub struct Column {
    name: &'static str,
    style: Style,
    max: Option<usize>,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self { name, style: Style::Plain, max: None }
    }

    pub fn muted(name: &'static str) -> Self {
        Self { name, style: Style::Muted, max: None }
    }

    pub fn status(name: &'static str) -> Self {
        Self { name, style: Style::Status, max: None }
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        let cells = cells
            .into_iter()
            .zip(&self.columns)
            .map(|(cell, col)| truncate(cell, col.max))
            .collect();
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain([col.name.len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self, out: &mut dyn Write) {
        let widths = self.widths();
        let last = self.columns.len().saturating_sub(1);

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| pad(&color::header(col.name), col.name.len(), widths[i], i == last))
            .collect();
        let _ = writeln!(out, "{}", header.join("  "));

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let painted = match self.columns[i].style {
                        Style::Plain => cell.clone(),
                        Style::Muted => color::muted(cell),
                        Style::Status => color::status(cell),
                    };
                    pad(&painted, cell.chars().count(), widths[i], i == last)
                })
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        }
    }
}

fn truncate(cell: String, max: Option<usize>) -> String {
    match max {
        Some(max) if cell.chars().count() > max => cell.chars().take(max).collect(),
        _ => cell,
    }
}

/// Pad by visible width so ANSI codes do not skew alignment.
fn pad(painted: &str, visible: usize, width: usize, last: bool) -> String {
    if last {
        return painted.to_string();
    }
    format!("{}{}", painted, " ".repeat(width.saturating_sub(visible)))
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
