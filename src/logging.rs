//! Structured logging for the poster view-state engine.
//!
//! Design goals:
//! 1. Multi-level granularity (TRACE → FATAL)
//! 2. Domain categories for filtering (one per state slice)
//! 3. One JSON object per line, ordered by a process-wide sequence number
//! 4. Nothing persisted: records go to stderr only

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::RwLock;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Fatal,
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Dataset,   // Load-time validation of the static inputs
    Chart,     // Pointer resolution, hover state
    Flip,      // Card flip registry
    Animation, // Reveal sets, phases, timers
    Resource,  // Logo loads and placeholder substitution
    Accordion, // Write-up disclosure
    Switch,    // Edge-routing toggle
    Runtime,   // Mount, unmount, driver lifecycle
    Render,    // Render tree derivation
    Audit,     // State hashes for replay
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Dataset => "dataset",
            Domain::Chart => "chart",
            Domain::Flip => "flip",
            Domain::Animation => "animation",
            Domain::Resource => "resource",
            Domain::Accordion => "accordion",
            Domain::Switch => "switch",
            Domain::Runtime => "runtime",
            Domain::Render => "render",
            Domain::Audit => "audit",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match ENABLED_DOMAINS.read() {
            Ok(guard) => match guard.as_ref() {
                None => true,
                Some(list) => list.iter().any(|d| d == self.as_str()),
            },
            Err(_) => true,
        }
    }
}

// =============================================================================
// Filter + sequence state
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static ENABLED_DOMAINS: RwLock<Option<Vec<String>>> = RwLock::new(None);

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

/// Set the minimum level that reaches the sink.
pub fn set_min_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::SeqCst);
}

pub fn min_level() -> Level {
    Level::from_u8(MIN_LEVEL.load(Ordering::SeqCst))
}

/// Restrict output to the named domains. `None` (or a list containing "all")
/// enables every domain.
pub fn set_domains(domains: Option<Vec<String>>) {
    let domains = domains.filter(|list| !list.iter().any(|d| d == "all"));
    if let Ok(mut guard) = ENABLED_DOMAINS.write() {
        *guard = domains;
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < min_level() || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["card", "group", "set", "timer_id", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn build_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) -> Value {
    let (mut top, data) = split_fields(fields);

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry)
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let line = build_record(level, component, event, fields).to_string();
    eprintln!("{}", line);
}

// =============================================================================
// Domain helpers
// =============================================================================

/// Record the hash produced by a reducer step for replay comparison.
pub fn log_audit(event_kind: &str, seq: u64, state_hash: u64) {
    log(
        Level::Trace,
        Domain::Audit,
        "audit",
        obj(&[
            ("event_kind", v_str(event_kind)),
            ("state_seq", json!(seq)),
            ("state_hash", v_str(&format!("{:016x}", state_hash))),
        ]),
    );
}

pub fn log_phase_change(group: &str, from: &str, to: &str, at_ms: u64) {
    log(
        Level::Debug,
        Domain::Animation,
        "phase",
        obj(&[
            ("group", v_str(group)),
            ("from", v_str(from)),
            ("to", v_str(to)),
            ("at_ms", json!(at_ms)),
        ]),
    );
}

// =============================================================================
// Field helpers
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_level_roundtrip_u8() {
        for lvl in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Fatal] {
            assert_eq!(Level::from_u8(lvl as u8), lvl);
        }
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_record_lifts_identity_fields() {
        let rec = build_record(
            Level::Info,
            "flip",
            "toggle",
            obj(&[("card", v_str("OpenAI")), ("flipped", json!(true)), ("msg", v_str("hi"))]),
        );
        assert_eq!(rec["card"], "OpenAI");
        assert_eq!(rec["msg"], "hi");
        assert_eq!(rec["lvl"], "INFO");
        assert_eq!(rec["data"]["flipped"], true);
        assert!(rec["data"].get("card").is_none());
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }
}
