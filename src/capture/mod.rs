// src/capture/mod.rs
// Speech capture adapter: a small state machine over the recognition session,
// independent of how the underlying events are dispatched.

pub mod bridge;

pub use bridge::{Capability, RecognitionBridge, WebviewBridge};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when no recognition capability exists; fixed text, not recoverable
/// within the session.
pub const UNAVAILABLE_MESSAGE: &str = "Speech recognition is not available on this device.";

/// Prefix for errors reported by the underlying recognition session.
pub const SESSION_ERROR_PREFIX: &str = "Error occurred during recording: ";

/// Generic message for unexpected failures while starting a session.
pub const START_ERROR_MESSAGE: &str = "Error starting recording";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
    Error,
}

/// One event from the recognition session. Interim results are provisional
/// and replace each other; final results are never revised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum CaptureEvent {
    Started,
    ResultInterim(String),
    ResultFinal(String),
    Errored(String),
    Ended,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("speech recognition capability is unavailable")]
    Unavailable,

    #[error("recognition bridge error: {0}")]
    Bridge(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptView {
    pub interim: String,
    pub committed: String,
}

/// Per-question capture state. `committed` accumulates final results only;
/// `interim` holds the latest provisional fragment and never reaches the
/// stored answer.
#[derive(Debug, Default)]
pub struct CaptureAdapter {
    state: CaptureState,
    interim: String,
    committed: String,
    error: Option<String>,
}

impl CaptureAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn transcript(&self) -> TranscriptView {
        TranscriptView {
            interim: self.interim.clone(),
            committed: self.committed.clone(),
        }
    }

    pub fn apply(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Started => {
                self.state = CaptureState::Listening;
                self.error = None;
                self.interim.clear();
                self.committed.clear();
                tracing::info!("recognition session started");
            }
            CaptureEvent::ResultFinal(text) => {
                if !self.is_listening() {
                    tracing::debug!("dropping late final result while {:?}", self.state);
                    return;
                }
                if !self.committed.is_empty() {
                    self.committed.push(' ');
                }
                self.committed.push_str(text.trim());
            }
            CaptureEvent::ResultInterim(text) => {
                if !self.is_listening() {
                    tracing::debug!("dropping late interim result while {:?}", self.state);
                    return;
                }
                self.interim = text;
            }
            CaptureEvent::Errored(reason) => {
                tracing::error!("recognition session error: {}", reason);
                self.error = Some(format!("{}{}", SESSION_ERROR_PREFIX, reason));
                self.state = CaptureState::Error;
            }
            CaptureEvent::Ended => {
                if self.is_listening() {
                    self.state = CaptureState::Idle;
                    tracing::info!("recognition session ended");
                }
            }
        }
    }

    /// Explicit stop. The committed buffer is kept for the pending advance.
    pub fn mark_stopped(&mut self) {
        if self.state == CaptureState::Listening {
            self.state = CaptureState::Idle;
        }
    }

    pub fn mark_unavailable(&mut self) {
        self.state = CaptureState::Error;
        self.error = Some(UNAVAILABLE_MESSAGE.to_string());
    }

    pub fn mark_start_failed(&mut self) {
        self.state = CaptureState::Error;
        self.error = Some(START_ERROR_MESSAGE.to_string());
    }

    /// Called when the survey moves on: both buffers reset, the next question
    /// starts from a clean transcript.
    pub fn clear_for_next_question(&mut self) {
        self.interim.clear();
        self.committed.clear();
    }
}
