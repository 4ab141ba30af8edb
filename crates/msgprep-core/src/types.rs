//! Core types for msgprep-core.
//!
//! This module defines the vocabulary shared by every pipeline stage: the
//! console [`Level`] a record was logged at, the derived display [`Severity`],
//! source locations and stack frames, the kind-specific payloads carried by
//! counter, timer and trace records, and the grip [`Literal`]s a producer uses
//! for values that have no JSON representation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// The console-API method a record was produced by.
///
/// Every record has exactly one level; it doubles as the prepared message's
/// `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    Trace,
    Assert,
    Dir,
    Dirxml,
    Table,
    Clear,
    Group,
    GroupCollapsed,
    GroupEnd,
    Count,
    CountReset,
    Time,
    TimeLog,
    TimeEnd,
}

static LEVELS: phf::Map<&'static str, Level> = phf::phf_map! {
    "log" => Level::Log,
    "info" => Level::Info,
    "warn" => Level::Warn,
    "error" => Level::Error,
    "debug" => Level::Debug,
    "trace" => Level::Trace,
    "assert" => Level::Assert,
    "dir" => Level::Dir,
    "dirxml" => Level::Dirxml,
    "table" => Level::Table,
    "clear" => Level::Clear,
    "group" => Level::Group,
    "groupCollapsed" => Level::GroupCollapsed,
    "groupEnd" => Level::GroupEnd,
    "count" => Level::Count,
    "countReset" => Level::CountReset,
    "time" => Level::Time,
    "timeLog" => Level::TimeLog,
    "timeEnd" => Level::TimeEnd,
};

impl Level {
    /// Look up a level by its wire name (`"log"`, `"groupCollapsed"`, …).
    /// Wire names are case-sensitive.
    pub fn from_wire(name: &str) -> Option<Level> {
        LEVELS.get(name).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
            Level::Trace => "trace",
            Level::Assert => "assert",
            Level::Dir => "dir",
            Level::Dirxml => "dirxml",
            Level::Table => "table",
            Level::Clear => "clear",
            Level::Group => "group",
            Level::GroupCollapsed => "groupCollapsed",
            Level::GroupEnd => "groupEnd",
            Level::Count => "count",
            Level::CountReset => "countReset",
            Level::Time => "time",
            Level::TimeLog => "timeLog",
            Level::TimeEnd => "timeEnd",
        }
    }

    /// Whether printf-style directives in the first argument are expanded
    /// for this level. `dir`, `dirxml` and `table` show their arguments as-is;
    /// counter and timer levels render from their payload instead.
    pub fn expands_directives(self) -> bool {
        matches!(
            self,
            Level::Log
                | Level::Info
                | Level::Warn
                | Level::Error
                | Level::Debug
                | Level::Trace
                | Level::Assert
                | Level::Group
                | Level::GroupCollapsed
        )
    }

    /// Severity a message of this level is displayed with, before payload
    /// errors are taken into account.
    pub fn severity(self) -> Severity {
        match self {
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warn,
            Level::Error | Level::Assert => Severity::Error,
            Level::Debug => Severity::Debug,
            _ => Severity::Log,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display severity of a prepared message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Debug => write!(f, "debug"),
            Severity::Log => write!(f, "log"),
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Locations and frames
// ---------------------------------------------------------------------------

/// Where the console call was made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub filename: String,
    pub line_number: u32,
    pub column_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// One frame of a captured stack, innermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub function_name: String,
    #[serde(default)]
    pub line_number: u32,
    #[serde(default)]
    pub column_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Kind payloads
// ---------------------------------------------------------------------------

/// Counter state reported by the producer for `count` / `countReset`.
///
/// The producer owns counter state; the pipeline never recomputes `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPayload {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Timer state reported by the producer for `time` / `timeLog` / `timeEnd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerPayload {
    pub name: String,
    /// Elapsed milliseconds since the matching `time` call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Captured stack of a `trace` (and optionally `assert` / `error`) record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TracePayload {
    pub frames: Vec<StackFrame>,
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Values the producer encodes as a typed grip because JSON cannot carry
/// them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Literal {
    #[serde(rename = "undefined")]
    Undefined,
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "NaN")]
    NaN,
    #[serde(rename = "Infinity")]
    Infinity,
    #[serde(rename = "-Infinity")]
    NegativeInfinity,
    #[serde(rename = "-0")]
    NegativeZero,
    #[serde(rename = "BigInt")]
    BigInt { text: String },
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Undefined => write!(f, "undefined"),
            Literal::Null => write!(f, "null"),
            Literal::NaN => write!(f, "NaN"),
            Literal::Infinity => write!(f, "Infinity"),
            Literal::NegativeInfinity => write!(f, "-Infinity"),
            Literal::NegativeZero => write!(f, "-0"),
            Literal::BigInt { text } => write!(f, "{text}n"),
        }
    }
}

/// Render a number the way the console shows it: integral values without a
/// fractional part, everything else in shortest round-trip form. Magnitudes
/// from `1e21` up and below `1e-6` switch to exponent form (`1e+21`, `1e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n != 0.0 && !(1e-6..1e21).contains(&n.abs()) {
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
