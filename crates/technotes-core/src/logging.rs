//! Structured logging schema for technotes.
//!
//! All crates log with the same field names so log aggregation tools can
//! query across subsystems.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | `"api"`, `"notes"` or `"database"` |
//! | `component` | part of a subsystem, e.g. `"service"`, `"pool"`, `"notes_repo"` |
//! | `op` | `"list"`, `"create"`, `"update"`, `"delete"`, ... |
//! | `note_id` | note UUID being operated on |
//! | `user_id` | owning user UUID |
//! | `duration_ms` | wall-clock duration |
//! | `result_count` | number of records returned |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store failure surfaced to a client as 500 |
//! | WARN  | Recoverable issue, default applied |
//! | INFO  | Lifecycle events, completed mutations |
//! | DEBUG | Decision points (lookups, conflicts, list sizes) |

use std::str::FromStr;

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "technotes_api=debug,technotes_core=debug,tower_http=debug";

/// Output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}
