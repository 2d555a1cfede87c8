//! Named sync commands shared by the CLI, the HTTP endpoint and the
//! scheduler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::retreats::sync_retreats;
use crate::source::CatalogSource;
use crate::stats::{SyncStats, SyncSummary};
use crate::store::CatalogStore;
use crate::talks::sync_talks;
use crate::teachers::sync_teachers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncCommand {
    /// Teacher list only.
    Teachers,
    /// Talk listing with teacher, center and retreat resolution.
    Talks,
    /// Teachers, then talks. A failed teacher sync does not prevent the
    /// talk sync.
    All,
    /// Feed metadata for retreats already stored.
    Retreats,
}

impl SyncCommand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teachers => "teachers",
            Self::Talks => "talks",
            Self::All => "all",
            Self::Retreats => "retreats",
        }
    }
}

impl fmt::Display for SyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teachers" => Ok(Self::Teachers),
            "talks" => Ok(Self::Talks),
            "all" => Ok(Self::All),
            "retreats" => Ok(Self::Retreats),
            other => Err(format!(
                "unknown sync command '{other}' (expected teachers, talks, all or retreats)"
            )),
        }
    }
}

/// Outcome of one sub-command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SyncSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<SyncStats, SyncError>> for CommandResult {
    fn from(result: Result<SyncStats, SyncError>) -> Self {
        match result {
            Ok(stats) => Self {
                success: true,
                stats: Some(stats.summary()),
                error: None,
            },
            Err(err) => Self {
                success: false,
                stats: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Outcome of a [`SyncCommand`]: overall success plus one result per
/// sub-command that ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub command: SyncCommand,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teachers: Option<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talks: Option<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retreats: Option<CommandResult>,
}

/// Runs `command`. Sub-command failures are captured in the report rather
/// than returned, so `All` always attempts both halves.
///
/// `options.skip_processing` only affects the talk sync.
pub async fn run_sync_command(
    command: SyncCommand,
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    options: &SyncOptions,
) -> SyncReport {
    tracing::info!(%command, "running sync command");

    let teachers = if matches!(command, SyncCommand::Teachers | SyncCommand::All) {
        Some(CommandResult::from(sync_teachers(source, store, options).await))
    } else {
        None
    };

    let talks = if matches!(command, SyncCommand::Talks | SyncCommand::All) {
        Some(CommandResult::from(sync_talks(source, store, options).await))
    } else {
        None
    };

    let retreats = if command == SyncCommand::Retreats {
        Some(CommandResult::from(sync_retreats(source, store, options).await))
    } else {
        None
    };

    let success = [&teachers, &talks, &retreats]
        .into_iter()
        .flatten()
        .all(|result| result.success);

    SyncReport {
        command,
        success,
        teachers,
        talks,
        retreats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!("teachers".parse::<SyncCommand>(), Ok(SyncCommand::Teachers));
        assert_eq!("Talks".parse::<SyncCommand>(), Ok(SyncCommand::Talks));
        assert_eq!(" ALL ".parse::<SyncCommand>(), Ok(SyncCommand::All));
        assert_eq!("retreats".parse::<SyncCommand>(), Ok(SyncCommand::Retreats));
        assert!("full".parse::<SyncCommand>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for command in [
            SyncCommand::Teachers,
            SyncCommand::Talks,
            SyncCommand::All,
            SyncCommand::Retreats,
        ] {
            assert_eq!(command.to_string().parse::<SyncCommand>(), Ok(command));
        }
    }

    #[test]
    fn failed_result_carries_error_message() {
        let err = SyncError::PageFetch {
            listing: "talks",
            page: 3,
            source: dharma_scraper::ScraperError::UnexpectedStatus {
                status: 502,
                url: "https://dharmaseed.org/talks/?page=3".to_owned(),
            },
        };
        let result = CommandResult::from(Err(err));
        assert!(!result.success);
        assert!(result.stats.is_none());
        let message = result.error.expect("error message");
        assert!(message.contains("talks page 3"), "got: {message}");
    }

    #[test]
    fn serializes_command_in_lowercase() {
        let report = SyncReport {
            command: SyncCommand::Teachers,
            success: true,
            teachers: None,
            talks: None,
            retreats: None,
        };
        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["command"], "teachers");
        assert!(json.get("talks").is_none());
    }
}
