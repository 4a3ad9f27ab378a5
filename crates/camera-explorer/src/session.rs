//! Reconstruction session state machine.
//!
//! Tracks the external point-cloud reconstruction for one source image:
//!
//! ```text
//! idle --submit--> processing --complete--> completed
//!                      |  ^                     |
//!                    fail |---- submit ---------+
//!                      v  |
//!                    error
//! ```
//!
//! There is no cancellation. Every `submit` bumps a monotonically increasing
//! token; replies carrying an older token are dropped.

use std::fmt;

use explorer_structures::PointCloudAsset;
use serde::{Deserialize, Serialize};

/// Session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionStatus {
    /// Nothing submitted.
    #[default]
    Idle,
    /// Waiting on the reconstruction service.
    Processing,
    /// Asset ready.
    Completed,
    /// The last submission failed.
    Error,
}

impl ReconstructionStatus {
    /// Get string representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            ReconstructionStatus::Idle => "idle",
            ReconstructionStatus::Processing => "processing",
            ReconstructionStatus::Completed => "completed",
            ReconstructionStatus::Error => "error",
        }
    }
}

impl fmt::Display for ReconstructionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionToken(u64);

impl SubmissionToken {
    /// Returns the raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to the photo being reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceImageRef(pub String);

impl SourceImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The single reconstruction session of an explorer view.
#[derive(Debug, Clone, Default)]
pub struct ReconstructionSession {
    status: ReconstructionStatus,
    source_image: Option<SourceImageRef>,
    asset: Option<PointCloudAsset>,
    error_message: Option<String>,
    last_token: u64,
    current: Option<SubmissionToken>,
}

impl ReconstructionSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts processing a new source image, superseding any in-flight one.
    pub fn submit(&mut self, source_image: SourceImageRef) -> SubmissionToken {
        if self.status == ReconstructionStatus::Processing {
            if let Some(previous) = self.current {
                log::info!("reconstruction {previous} superseded");
            }
        }
        self.last_token += 1;
        let token = SubmissionToken(self.last_token);
        log::info!("reconstruction {token} submitted for {source_image}");

        self.status = ReconstructionStatus::Processing;
        self.source_image = Some(source_image);
        self.asset = None;
        self.error_message = None;
        self.current = Some(token);
        token
    }

    /// Returns whether the token belongs to the in-flight submission.
    pub fn is_current(&self, token: SubmissionToken) -> bool {
        self.status == ReconstructionStatus::Processing && self.current == Some(token)
    }

    /// Records a finished reconstruction.
    ///
    /// Returns `false` (and changes nothing) when the token is stale.
    pub fn complete(&mut self, token: SubmissionToken, asset: PointCloudAsset) -> bool {
        if !self.is_current(token) {
            log::warn!("dropping stale reconstruction result {token}");
            return false;
        }
        log::info!("reconstruction {token} completed: {}", asset.asset_ref);
        self.status = ReconstructionStatus::Completed;
        self.asset = Some(asset);
        self.error_message = None;
        true
    }

    /// Records a failed reconstruction.
    ///
    /// Returns `false` (and changes nothing) when the token is stale.
    pub fn fail(&mut self, token: SubmissionToken, message: impl Into<String>) -> bool {
        if !self.is_current(token) {
            log::warn!("dropping stale reconstruction failure {token}");
            return false;
        }
        let message = message.into();
        log::info!("reconstruction {token} failed: {message}");
        self.status = ReconstructionStatus::Error;
        self.asset = None;
        self.error_message = Some(message);
        true
    }

    /// Returns to idle. Outstanding replies become stale.
    pub fn reset(&mut self) {
        self.status = ReconstructionStatus::Idle;
        self.source_image = None;
        self.asset = None;
        self.error_message = None;
        self.current = None;
    }

    pub fn status(&self) -> ReconstructionStatus {
        self.status
    }

    pub fn source_image(&self) -> Option<&SourceImageRef> {
        self.source_image.as_ref()
    }

    pub fn asset(&self) -> Option<&PointCloudAsset> {
        self.asset.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Token of the latest submission, if one is outstanding or finished.
    pub fn current_token(&self) -> Option<SubmissionToken> {
        self.current
    }
}
