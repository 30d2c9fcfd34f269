//! Execution hints embedded in statement text.
//!
//! Hints live in `/** ... */` comment blocks as `name('value')` calls:
//!
//! ```sql
//! /** mode('streaming') fetch_max(10) fetch_timeout_ms(5000) test_query('true') */
//! SELECT * FROM clicks
//! ```
//!
//! Unknown hint names and values that fail to parse are ignored.

use regex::Regex;
use std::sync::OnceLock;

use crate::gateway::RuntimeMode;

/// Execution mode requested by a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Run once over bounded input (`batch`).
    OneShot,
    /// Run continuously over unbounded input (`streaming`).
    Continuous,
}

impl QueryMode {
    /// Parses the hint value, accepting `batch` and `streaming`.
    pub fn parse(s: &str) -> Option<Self> {
        RuntimeMode::parse(s).map(Self::from)
    }

    /// Returns the session runtime mode that executes statements in this mode.
    pub fn runtime_mode(&self) -> RuntimeMode {
        match self {
            Self::OneShot => RuntimeMode::Batch,
            Self::Continuous => RuntimeMode::Streaming,
        }
    }
}

impl From<RuntimeMode> for QueryMode {
    fn from(mode: RuntimeMode) -> Self {
        match mode {
            RuntimeMode::Batch => Self::OneShot,
            RuntimeMode::Streaming => Self::Continuous,
        }
    }
}

/// Per-statement directives derived from the statement text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryHints {
    /// Requested execution mode; `None` runs one-shot.
    pub mode: Option<QueryMode>,
    /// Maximum number of rows to buffer.
    pub fetch_max: Option<u64>,
    /// Wall-clock budget for retrieval, measured from submission.
    pub fetch_timeout_ms: Option<u64>,
    /// Marks the statement as a self-test probe.
    pub test_query: bool,
}

impl QueryHints {
    /// Derives hints from statement text.
    pub fn parse(sql: &str) -> Self {
        let mut hints = Self::default();

        for block in block_regex().captures_iter(sql) {
            for call in call_regex().captures_iter(&block[1]) {
                let value = unquote(&call[2]);
                match call[1].to_lowercase().as_str() {
                    "mode" => {
                        if let Some(mode) = QueryMode::parse(value) {
                            hints.mode = Some(mode);
                        }
                    }
                    "fetch_max" => {
                        if let Ok(n) = value.parse() {
                            hints.fetch_max = Some(n);
                        }
                    }
                    "fetch_timeout_ms" => {
                        if let Ok(n) = value.parse() {
                            hints.fetch_timeout_ms = Some(n);
                        }
                    }
                    "test_query" => {
                        if let Ok(b) = value.to_lowercase().parse() {
                            hints.test_query = b;
                        }
                    }
                    _ => {}
                }
            }
        }

        hints
    }

    /// Returns true when the statement runs in continuous mode.
    pub fn is_continuous(&self) -> bool {
        self.mode == Some(QueryMode::Continuous)
    }

    /// Returns the session runtime mode the statement must run under.
    pub fn runtime_mode(&self) -> RuntimeMode {
        self.mode
            .map(|mode| mode.runtime_mode())
            .unwrap_or(RuntimeMode::Batch)
    }
}

fn block_regex() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| Regex::new(r"(?s)/\*\*(.*?)\*/").expect("valid hint block pattern"))
}

fn call_regex() -> &'static Regex {
    static CALL: OnceLock<Regex> = OnceLock::new();
    CALL.get_or_init(|| {
        Regex::new(r"(\w+)\s*\(\s*([^)]*?)\s*\)").expect("valid hint call pattern")
    })
}

fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    ['\'', '"']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed)
}
