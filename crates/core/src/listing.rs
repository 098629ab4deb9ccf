// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Positional parsers for engine tool output.
//!
//! One record per line, fields separated by runs of whitespace. The last
//! field of each record is free text and takes the rest of the line.
//!
//! ```text
//! containers:  0 id   1 name  2 image  3.. status      (docker ps -a --format '{{.ID}} {{.Names}} {{.Image}} {{.Status}}')
//! images:      0 repo 1 tag   2 id     3.. size        (docker images --format '{{.Repository}} {{.Tag}} {{.ID}} {{.Size}}')
//! ```
//!
//! A missing field, or a JSON field that is not a string, becomes the empty
//! string. Parsing never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse container state used for status colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerState {
    Running,
    Exited,
    Paused,
    Stopped,
}

crate::simple_display! {
    ContainerState {
        Running => "running",
        Exited => "exited",
        Paused => "paused",
        Stopped => "stopped",
    }
}

/// Classify a raw status token. Order matters: `"Up 3 hours (Paused)"` is running.
pub fn classify_status(status: &str) -> ContainerState {
    let status = status.trim().to_ascii_lowercase();
    if status.starts_with("up") {
        ContainerState::Running
    } else if status.starts_with("exited") {
        ContainerState::Exited
    } else if status.contains("paused") {
        ContainerState::Paused
    } else {
        ContainerState::Stopped
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub state: ContainerState,
}

impl ContainerEntry {
    fn new(id: String, name: String, image: String, status: String) -> Self {
        let state = classify_status(&status);
        Self { id, name, image, status, state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub repository: String,
    pub tag: String,
    pub id: String,
    pub size: String,
}

/// Split a line into `fixed` leading fields plus the remainder.
///
/// Missing fields come back empty.
fn positional(line: &str, fixed: usize) -> (Vec<String>, String) {
    let mut rest = line.trim_start();
    let mut fields = Vec::with_capacity(fixed);
    for _ in 0..fixed {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        fields.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }
    (fields, rest.trim_end().to_string())
}

fn take(fields: &mut [String], index: usize) -> String {
    fields.get_mut(index).map(std::mem::take).unwrap_or_default()
}

/// Parse `docker ps`-style lines. Blank lines are skipped.
pub fn parse_container_lines(text: &str) -> Vec<ContainerEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (mut f, status) = positional(line, 3);
            ContainerEntry::new(take(&mut f, 0), take(&mut f, 1), take(&mut f, 2), status)
        })
        .collect()
}

/// Parse `docker images`-style lines. Blank lines are skipped.
pub fn parse_image_lines(text: &str) -> Vec<ImageEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (mut f, size) = positional(line, 3);
            ImageEntry {
                repository: take(&mut f, 0),
                tag: take(&mut f, 1),
                id: take(&mut f, 2),
                size,
            }
        })
        .collect()
}

fn string_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse a container listing from whatever the runner returned: raw text,
/// a JSON array of objects, an array of lines, or an object with `containers`.
pub fn parse_containers(value: &Value) -> Vec<ContainerEntry> {
    match value {
        Value::String(text) => parse_container_lines(text),
        Value::Array(items) => items
            .iter()
            .flat_map(|item| match item {
                Value::Object(obj) => vec![ContainerEntry::new(
                    string_field(obj, &["id", "ID", "Id"]),
                    string_field(obj, &["name", "Names", "Name"]),
                    string_field(obj, &["image", "Image"]),
                    string_field(obj, &["status", "Status"]),
                )],
                Value::String(line) => parse_container_lines(line),
                _ => Vec::new(),
            })
            .collect(),
        Value::Object(obj) => obj.get("containers").map(parse_containers).unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
