// src/capture/bridge.rs
// Capability provider for the recognition session. Production forwards
// start/stop to the webview, which owns the platform speech API; tests use
// a stub so the adapter and flow never need a real session.

use super::CaptureError;
use cpal::traits::HostTrait;
use tauri::Emitter;

pub const START_SESSION_EVENT: &str = "recognition:start";
pub const STOP_SESSION_EVENT: &str = "recognition:stop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable,
}

pub trait RecognitionBridge: Send + Sync {
    fn capability(&self) -> Capability;

    fn start_session(&self) -> Result<(), CaptureError>;

    fn stop_session(&self) -> Result<(), CaptureError>;
}

/// Bridge to the webview-hosted recognition session. Availability is probed
/// from the default input device; the webview reports its own capability
/// separately at mount.
pub struct WebviewBridge {
    app: tauri::AppHandle,
}

impl WebviewBridge {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl RecognitionBridge for WebviewBridge {
    fn capability(&self) -> Capability {
        let host = cpal::default_host();
        if host.default_input_device().is_some() {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }

    fn start_session(&self) -> Result<(), CaptureError> {
        self.app
            .emit(START_SESSION_EVENT, ())
            .map_err(|e| CaptureError::Bridge(e.to_string()))
    }

    fn stop_session(&self) -> Result<(), CaptureError> {
        self.app
            .emit(STOP_SESSION_EVENT, ())
            .map_err(|e| CaptureError::Bridge(e.to_string()))
    }
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory bridge recording start/stop calls.
    pub struct StubBridge {
        capability: Capability,
        pub started: AtomicUsize,
        pub stopped: AtomicUsize,
    }

    impl StubBridge {
        pub fn new(capability: Capability) -> Self {
            Self {
                capability,
                started: AtomicUsize::new(0),
                stopped: AtomicUsize::new(0),
            }
        }
    }

    impl RecognitionBridge for StubBridge {
        fn capability(&self) -> Capability {
            self.capability
        }

        fn start_session(&self) -> Result<(), CaptureError> {
            self.started.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn stop_session(&self) -> Result<(), CaptureError> {
            self.stopped.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }
}
