//! Generation event types for JSON output.
//!
//! These events are emitted one JSON object per line when the CLI runs with
//! `--message-format json`.
//!
//! # Event Types
//!
//! - `descriptor-written`: a directory produced a build file
//! - `subtree-failed`: a subtree stopped because one of its directories failed
//! - `subtree-cancelled`: a subtree stopped because another one failed first
//! - `generate-finished`: the run completed (success or failure)

use std::path::PathBuf;

use serde::Serialize;

use crate::core::Target;

/// An event emitted during generation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum GenerateEvent {
    /// A directory's descriptor was handed to the writer.
    #[serde(rename = "descriptor-written")]
    DescriptorWritten {
        /// Directory the descriptor describes
        directory: PathBuf,
        /// Build file written, if the writer persisted one
        #[serde(skip_serializing_if = "Option::is_none")]
        build_file: Option<PathBuf>,
        /// Targets with their resolved dependencies
        targets: Vec<Target>,
    },

    /// A subtree worker stopped on an error.
    #[serde(rename = "subtree-failed")]
    SubtreeFailed {
        /// Subtree root
        subtree: PathBuf,
        /// Error message, including its causes
        message: String,
    },

    /// A subtree worker was cancelled.
    #[serde(rename = "subtree-cancelled")]
    SubtreeCancelled {
        /// Subtree root
        subtree: PathBuf,
    },

    /// Generation completed.
    #[serde(rename = "generate-finished")]
    GenerateFinished {
        /// Whether every subtree completed
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Number of descriptors written
        descriptors: u64,
    },
}

impl GenerateEvent {
    /// Create a descriptor written event.
    pub fn written(
        directory: impl Into<PathBuf>,
        build_file: Option<PathBuf>,
        targets: Vec<Target>,
    ) -> Self {
        GenerateEvent::DescriptorWritten {
            directory: directory.into(),
            build_file,
            targets,
        }
    }

    /// Create a subtree failed event.
    pub fn failed(subtree: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GenerateEvent::SubtreeFailed {
            subtree: subtree.into(),
            message: message.into(),
        }
    }

    /// Create a generate finished event.
    pub fn finished(success: bool, duration_ms: u64, descriptors: u64) -> Self {
        GenerateEvent::GenerateFinished {
            success,
            duration_ms,
            descriptors,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
