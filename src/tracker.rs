//! Hand landmark sources.
//!
//! The landmark model itself lives outside this crate. A [`HandTracker`]
//! takes a frame and answers with at most one hand in normalized
//! coordinates, which keeps the pipeline testable with synthetic hands.
//!
//! [`SubprocessTracker`] talks to a helper process (for example a small
//! MediaPipe script) over stdin/stdout:
//! - the helper prints `READY` once it has loaded its model;
//! - per frame we send `width`, `height`, `channels` as u32 LE, then RGB bytes;
//! - the helper answers one JSON line:
//!   `{"hands":[{"score":0.9,"landmarks":[{"x":0.1,"y":0.2},...]}],"error":null}`.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::landmarks::{LANDMARK_COUNT, RawHand};
use crate::types::{FrameBuffer, unpack};

/// Anything that can find a hand in a frame.
pub trait HandTracker: Send {
    /// `Ok(None)` when no (usable) hand is in view.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<RawHand>, Error>;
}

/// Never sees a hand. Used when no helper is configured.
pub struct NoHands;

impl HandTracker for NoHands {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<Option<RawHand>, Error> {
        Ok(None)
    }
}

/// Plays back a fixed sequence of detections, then reports no hand.
#[derive(Default)]
pub struct ScriptedTracker {
    queue: VecDeque<Option<RawHand>>,
}

impl ScriptedTracker {
    pub fn new(detections: impl IntoIterator<Item = Option<RawHand>>) -> Self {
        Self { queue: detections.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl HandTracker for ScriptedTracker {
    fn detect(&mut self, _frame: &FrameBuffer) -> Result<Option<RawHand>, Error> {
        Ok(self.queue.pop_front().flatten())
    }
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

fn full_score() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Pick the first confident hand out of one helper response line.
/// Malformed lines and helper-reported errors count as "no hand".
fn parse_detection(line: &str, min_confidence: f32) -> Option<RawHand> {
    let result: DetectionJson = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!("Tracker sent unreadable line ({e}): {}", line.trim());
            return None;
        }
    };
    if let Some(err) = result.error {
        warn!("Tracker reported: {err}");
        return None;
    }
    let hand = result.hands.into_iter().find(|h| h.score >= min_confidence)?;
    if hand.landmarks.len() != LANDMARK_COUNT {
        debug!("Expected {LANDMARK_COUNT} landmarks, got {}", hand.landmarks.len());
    }
    Some(RawHand {
        points: hand.landmarks.iter().map(|lm| (lm.x, lm.y)).collect(),
        score: hand.score,
    })
}

/// Take the child's pipes and wait for its `READY` line.
fn handshake(process: &mut Child) -> Result<(ChildStdin, BufReader<ChildStdout>), Error> {
    let stdin = process.stdin.take().ok_or_else(|| Error::Tracker("no stdin".into()))?;
    let stdout = process.stdout.take().ok_or_else(|| Error::Tracker("no stdout".into()))?;
    let mut stdout = BufReader::new(stdout);

    let mut ready = String::new();
    stdout
        .read_line(&mut ready)
        .map_err(|e| Error::Tracker(format!("waiting for READY: {e}")))?;
    if ready.trim() != "READY" {
        return Err(Error::Tracker(format!("helper did not signal READY, got {:?}", ready.trim())));
    }
    Ok((stdin, stdout))
}

/// Landmark helper running as a child process.
pub struct SubprocessTracker {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
    scratch: Vec<u8>, // reused RGB byte buffer
}

impl SubprocessTracker {
    /// Start `command[0]` with the remaining items as arguments and wait for `READY`.
    pub fn spawn(command: &[String], min_confidence: f32) -> Result<Self, Error> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::Tracker("empty tracker command".into()))?;

        info!("Starting hand tracker: {}", command.join(" "));
        let mut process = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Tracker(format!("spawn {program}: {e}")))?;

        let (stdin, stdout) = match handshake(&mut process) {
            Ok(pipes) => pipes,
            Err(e) => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(e);
            }
        };
        info!("Hand tracker ready");

        Ok(Self {
            process,
            stdin,
            stdout,
            min_confidence: min_confidence.clamp(0.0, 1.0),
            scratch: Vec::new(),
        })
    }

    fn send_frame(&mut self, frame: &FrameBuffer) -> std::io::Result<()> {
        self.scratch.clear();
        self.scratch.reserve(frame.pixels.len() * 3);
        for &px in &frame.pixels {
            let (r, g, b) = unpack(px);
            self.scratch.extend_from_slice(&[r, g, b]);
        }
        self.stdin.write_all(&(frame.width as u32).to_le_bytes())?;
        self.stdin.write_all(&(frame.height as u32).to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&self.scratch)?;
        self.stdin.flush()
    }
}

impl HandTracker for SubprocessTracker {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<RawHand>, Error> {
        self.send_frame(frame)
            .map_err(|e| Error::Tracker(format!("send frame: {e}")))?;

        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| Error::Tracker(format!("read response: {e}")))?;
        if n == 0 {
            return Err(Error::Tracker("helper closed its output".into()));
        }
        Ok(parse_detection(&line, self.min_confidence))
    }
}

impl Drop for SubprocessTracker {
    fn drop(&mut self) {
        // Kill the helper when the tracker goes away
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
