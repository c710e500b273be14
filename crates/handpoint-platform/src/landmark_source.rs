//! JSON-lines landmark source.
//!
//! Any tracker can feed the engine by writing one JSON object per line:
//!
//! ```text
//! {"type":"frame","hand":"right","landmarks":[{"x":0.5,"y":0.5,"z":0.0}, ...]}
//! {"type":"hand_lost"}
//! {"type":"set_mode","mode":"desk"}
//! {"type":"set_backend","enabled":true}
//! ```
//!
//! Lines are read on a dedicated thread and delivered over a bounded channel.

use crate::{PlatformError, PlatformResult};
use crossbeam_channel::{bounded, Receiver};
use handpoint_core::{GestureMode, HandLabel, Landmark, LandmarkFrame};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wire format of one line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SourceMessage {
    Frame {
        #[serde(default)]
        hand: HandLabel,
        landmarks: Vec<Landmark>,
    },
    HandLost,
    SetMode {
        mode: GestureMode,
    },
    SetBackend {
        enabled: bool,
    },
}

/// Validated message delivered to the engine loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Frame { frame: LandmarkFrame, hand: HandLabel },
    HandLost,
    SetMode(GestureMode),
    SetBackend(bool),
}

/// Configuration for the source reader.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    /// Sleep this long after each frame (for replaying recorded files).
    pub frame_interval: Option<Duration>,
}

/// Handle to the reader thread.
pub struct SourceHandle {
    event_rx: Receiver<SourceEvent>,
    running: Arc<AtomicBool>,
    /// A blocking read on stdin cannot be interrupted, so the thread is not joined.
    #[allow(dead_code)]
    thread: Option<JoinHandle<()>>,
}

impl SourceHandle {
    /// Channel of parsed events. Disconnects at end of input.
    pub fn receiver(&self) -> &Receiver<SourceEvent> {
        &self.event_rx
    }

    /// Ask the reader to stop after the current line.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open a file, or stdin when `path` is `None`. Failing to open the input is
/// a fatal start-up error.
pub fn open_input(path: Option<&Path>) -> PlatformResult<Box<dyn BufRead + Send>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                PlatformError::Source(format!("cannot open {}: {e}", path.display()))
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> PlatformResult<Option<SourceEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let message: SourceMessage =
        serde_json::from_str(line).map_err(|e| PlatformError::Source(e.to_string()))?;

    let event = match message {
        SourceMessage::Frame { hand, landmarks } => {
            let frame = LandmarkFrame::try_from(landmarks)
                .map_err(|e| PlatformError::Source(e.to_string()))?;
            SourceEvent::Frame { frame, hand }
        }
        SourceMessage::HandLost => SourceEvent::HandLost,
        SourceMessage::SetMode { mode } => SourceEvent::SetMode(mode),
        SourceMessage::SetBackend { enabled } => SourceEvent::SetBackend(enabled),
    };
    Ok(Some(event))
}

/// Start reading `reader` on a background thread.
pub fn start_json_source<R>(reader: R, config: SourceConfig) -> SourceHandle
where
    R: BufRead + Send + 'static,
{
    let (event_tx, event_rx) = bounded(64);
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    let thread = thread::spawn(move || {
        info!("Landmark source thread started");
        let mut line_no = 0usize;

        for line in reader.lines() {
            if !running_clone.load(Ordering::SeqCst) {
                break;
            }
            line_no += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Landmark source read failed");
                    break;
                }
            };

            let event = match parse_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    warn!(line = line_no, error = %e, "Skipping malformed source line");
                    continue;
                }
            };

            let is_frame = matches!(event, SourceEvent::Frame { .. });
            if event_tx.send(event).is_err() {
                debug!("Landmark receiver dropped");
                break;
            }
            if is_frame {
                if let Some(interval) = config.frame_interval {
                    thread::sleep(interval);
                }
            }
        }

        running_clone.store(false, Ordering::SeqCst);
        info!(lines = line_no, "Landmark source thread exiting");
    });

    SourceHandle {
        event_rx,
        running,
        thread: Some(thread),
    }
}
