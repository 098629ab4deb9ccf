// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote agent health derivation.
//!
//! The status probe on an engine host answers in several shapes depending on
//! the agent version and how the runner wraps it. The shape is resolved once
//! into a [`ProbeResponse`] at the boundary; everything after that works on a
//! normalized [`ProbeResult`].
//!
//! Health is derived with a fixed decision order because "installed" and
//! "running" are independent axes collapsed into one enum:
//!
//! ```text
//! 1. version == "not installed"                    → uninstalled
//! 2. service == running  AND daemon == normal      → active
//! 3. service == stopped  OR  daemon == abnormal    → inactive
//! 4. anything else                                 → unknown
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version string the probe reports when the agent is absent.
pub const NOT_INSTALLED: &str = "not installed";

/// Derived state of the remote container-engine agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Active,
    Inactive,
    Uninstalled,
    /// Probe answered but the combination is indeterminate.
    Unknown,
}

impl RuntimeHealth {
    /// Only an active agent can enumerate containers or backups.
    pub fn allows_listing(self) -> bool {
        matches!(self, RuntimeHealth::Active)
    }
}

crate::simple_display! {
    RuntimeHealth {
        Active => "active",
        Inactive => "inactive",
        Uninstalled => "uninstalled",
        Unknown => "unknown",
    }
}

/// Container engine flavour reported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Docker,
    Podman,
}

impl EngineKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Some(EngineKind::Docker),
            "podman" => Some(EngineKind::Podman),
            _ => None,
        }
    }
}

crate::simple_display! {
    EngineKind {
        Docker => "docker",
        Podman => "podman",
    }
}

/// Normalized probe fields. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineKind>,
}

impl ProbeResult {
    fn is_empty(&self) -> bool {
        self.version.is_none()
            && self.service_status.is_none()
            && self.daemon_status.is_none()
            && self.engine.is_none()
    }

    fn set(&mut self, key: &str, value: &str) {
        match ProbeField::from_key(key) {
            Some(ProbeField::Version) => self.version = Some(value.trim().to_string()),
            Some(ProbeField::Service) => self.service_status = Some(value.trim().to_string()),
            Some(ProbeField::Daemon) => self.daemon_status = Some(value.trim().to_string()),
            Some(ProbeField::Engine) => self.engine = EngineKind::parse(value),
            None => {}
        }
    }
}

enum ProbeField {
    Version,
    Service,
    Daemon,
    Engine,
}

impl ProbeField {
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "version" | "agent_version" | "agentversion" => Some(ProbeField::Version),
            "service_status" | "servicestatus" | "service" => Some(ProbeField::Service),
            "daemon_status" | "daemonstatus" | "daemon" => Some(ProbeField::Daemon),
            "engine" | "runtime" => Some(ProbeField::Engine),
            _ => None,
        }
    }
}

/// Known shapes of a status probe reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResponse {
    /// Flat object with probe keys (snake_case or camelCase).
    Structured(ProbeResult),
    /// Object whose `data` or `result` member holds the structured reply.
    Wrapped(ProbeResult),
    /// Line-oriented `key: value` text.
    Text(ProbeResult),
    /// Nothing recognizable; derives `unknown`.
    Unrecognized(Value),
}

impl ProbeResponse {
    /// Resolve the shape of a JSON reply.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(result) = structured(&map) {
                    return ProbeResponse::Structured(result);
                }
                for key in ["data", "result"] {
                    match map.get(key) {
                        Some(Value::Object(inner)) => {
                            if let Some(result) = structured(inner) {
                                return ProbeResponse::Wrapped(result);
                            }
                        }
                        Some(Value::String(text)) => {
                            if let ProbeResponse::Text(result) = Self::from_text(text) {
                                return ProbeResponse::Wrapped(result);
                            }
                        }
                        _ => {}
                    }
                }
                ProbeResponse::Unrecognized(Value::Object(map))
            }
            Value::String(text) => Self::from_text(&text),
            other => ProbeResponse::Unrecognized(other),
        }
    }

    /// Resolve the shape of raw probe output (JSON first, then `key: value` lines).
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                return Self::from_value(value);
            }
        }

        let mut result = ProbeResult::default();
        for line in trimmed.lines() {
            let Some((key, value)) = line.split_once(':').or_else(|| line.split_once('=')) else {
                continue;
            };
            result.set(key, value);
        }

        if result.is_empty() {
            ProbeResponse::Unrecognized(Value::String(raw.to_string()))
        } else {
            ProbeResponse::Text(result)
        }
    }

    /// Normalized fields; unrecognized replies yield an all-empty result.
    pub fn into_result(self) -> ProbeResult {
        match self {
            ProbeResponse::Structured(r) | ProbeResponse::Wrapped(r) | ProbeResponse::Text(r) => r,
            ProbeResponse::Unrecognized(_) => ProbeResult::default(),
        }
    }
}

fn structured(map: &Map<String, Value>) -> Option<ProbeResult> {
    let mut result = ProbeResult::default();
    for (key, value) in map {
        // Non-string values fall back to absent
        if let Value::String(s) = value {
            result.set(key, s);
        }
    }
    (!result.is_empty()).then_some(result)
}

/// Classify the agent from a normalized probe. Pure and total.
pub fn derive_health(probe: &ProbeResult) -> RuntimeHealth {
    let version = probe.version.as_deref().map(str::trim);
    if version.is_some_and(|v| v.eq_ignore_ascii_case(NOT_INSTALLED)) {
        return RuntimeHealth::Uninstalled;
    }

    let service = normalized(probe.service_status.as_deref());
    let daemon = normalized(probe.daemon_status.as_deref());

    match (service.as_deref(), daemon.as_deref()) {
        (Some("running"), Some("normal")) => RuntimeHealth::Active,
        (Some("stopped"), _) | (_, Some("abnormal")) => RuntimeHealth::Inactive,
        _ => RuntimeHealth::Unknown,
    }
}

fn normalized(field: Option<&str>) -> Option<String> {
    field.map(|s| s.trim().to_ascii_lowercase())
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
