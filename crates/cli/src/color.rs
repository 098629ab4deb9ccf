// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// Healthy / completed
    pub const GOOD: u8 = 108;
    /// Running / pending
    pub const BUSY: u8 = 179;
    /// Failed / unreachable
    pub const BAD: u8 = 167;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{code}m{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

/// Color a status word (backup, restore, health, or workflow stage).
pub fn status(text: &str) -> String {
    let code = match text {
        "completed" | "active" | "succeeded" | "ready_to_submit" => codes::GOOD,
        "creating" | "restoring" | "pending" | "in_progress" | "submitted" | "needs_auth"
        | "version_selection" => codes::BUSY,
        "failed" | "partially_failed" | "inactive" => codes::BAD,
        _ => codes::MUTED,
    };
    paint(code, text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
