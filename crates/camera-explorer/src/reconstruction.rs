//! Seam to the external reconstruction service.
//!
//! Reconstruction takes seconds to minutes and happens outside the explorer.
//! The explorer hands the service a [`ReconstructionReply`] and keeps going;
//! the service (or whatever thread/task it spawns) sends the outcome through
//! it, and the explorer drains replies on its next frame tick.

use std::sync::mpsc::{self, Receiver, Sender};

use explorer_structures::PointCloudAsset;

use crate::session::{SourceImageRef, SubmissionToken};

/// What a reconstruction request produced.
pub type ReconstructionOutcome = std::result::Result<PointCloudAsset, String>;

/// Turns a photo into a point-cloud asset.
pub trait ReconstructionService {
    /// Starts reconstructing `source`. Must not block; deliver the result
    /// through `reply` whenever it is ready.
    fn request(&mut self, source: &SourceImageRef, reply: ReconstructionReply);
}

/// One-shot handle for delivering a reconstruction outcome.
#[derive(Debug)]
pub struct ReconstructionReply {
    token: SubmissionToken,
    sender: Sender<(SubmissionToken, ReconstructionOutcome)>,
}

impl ReconstructionReply {
    /// Token of the submission this reply answers.
    pub fn token(&self) -> SubmissionToken {
        self.token
    }

    /// Delivers a finished asset.
    pub fn complete(self, asset: PointCloudAsset) {
        self.send(Ok(asset));
    }

    /// Delivers a failure with a human-readable message.
    pub fn fail(self, message: impl Into<String>) {
        self.send(Err(message.into()));
    }

    /// Delivers an outcome.
    pub fn send(self, outcome: ReconstructionOutcome) {
        if self.sender.send((self.token, outcome)).is_err() {
            log::debug!("explorer gone, dropping reconstruction reply {}", self.token);
        }
    }
}

/// Receiving end owned by the explorer.
#[derive(Debug)]
pub(crate) struct ReplyQueue {
    sender: Sender<(SubmissionToken, ReconstructionOutcome)>,
    receiver: Receiver<(SubmissionToken, ReconstructionOutcome)>,
}

impl ReplyQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub(crate) fn reply_for(&self, token: SubmissionToken) -> ReconstructionReply {
        ReconstructionReply {
            token,
            sender: self.sender.clone(),
        }
    }

    /// Takes every reply that has arrived so far, without blocking.
    pub(crate) fn drain(&self) -> Vec<(SubmissionToken, ReconstructionOutcome)> {
        self.receiver.try_iter().collect()
    }
}

/// Service that parks every request until the caller resolves it.
///
/// Useful for hosts that run the network call themselves, and in tests.
#[derive(Debug, Default)]
pub struct ManualReconstruction {
    pending: Vec<(SourceImageRef, ReconstructionReply)>,
}

impl ManualReconstruction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unanswered requests.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns the oldest unanswered request.
    pub fn take_oldest(&mut self) -> Option<(SourceImageRef, ReconstructionReply)> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Removes and returns the newest unanswered request.
    pub fn take_newest(&mut self) -> Option<(SourceImageRef, ReconstructionReply)> {
        self.pending.pop()
    }
}

impl ReconstructionService for ManualReconstruction {
    fn request(&mut self, source: &SourceImageRef, reply: ReconstructionReply) {
        self.pending.push((source.clone(), reply));
    }
}
