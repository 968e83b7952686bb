//! Background frame loop: camera -> tracker -> studio -> channel.
//!
//! Start and stop are idempotent. Every run gets its own `active` flag,
//! checked once per tick, so a worker winding down on its own never sees the
//! flag of the run that replaced it. A failed frame grab skips that tick
//! instead of ending the stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::camera::FrameSource;
use crate::error::Error;
use crate::studio::{FrameOutput, Studio};
use crate::tracker::HandTracker;

/// Opens the frame source on the loop's own thread.
pub type SourceFactory = Box<dyn FnOnce() -> Result<Box<dyn FrameSource>, Error> + Send>;

/// One started loop: its private flag and its thread.
struct Run {
    active: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl Run {
    fn join(self) {
        if self.worker.join().is_err() {
            error!("Stream worker panicked");
        }
    }
}

pub struct Streamer {
    run: Mutex<Option<Run>>,
    frame_interval: Duration,
}

impl Streamer {
    pub fn new(target_fps: u32) -> Self {
        let fps = target_fps.max(1);
        Self {
            run: Mutex::new(None),
            frame_interval: Duration::from_secs_f64(1.0 / fps as f64),
        }
    }

    pub fn is_active(&self) -> bool {
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        run.as_ref().is_some_and(|r| r.active.load(Ordering::SeqCst))
    }

    /// Start the loop. Returns false (and does nothing) if it is already running.
    pub fn start(
        &self,
        studio: Arc<Studio>,
        open_source: SourceFactory,
        mut tracker: Box<dyn HandTracker>,
        out: Sender<FrameOutput>,
    ) -> bool {
        let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        if run.as_ref().is_some_and(|r| r.active.load(Ordering::SeqCst)) {
            return false;
        }
        // reap a worker that ended on its own (source failed to open, receiver gone)
        if let Some(old) = run.take() {
            old.join();
        }

        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);
        let interval = self.frame_interval;
        let worker = thread::spawn(move || {
            let mut source = match open_source() {
                Ok(s) => s,
                Err(e) => {
                    error!("Frame source unavailable: {e}");
                    flag.store(false, Ordering::SeqCst);
                    return;
                }
            };
            info!("Stream started");
            let clock = Instant::now();
            while flag.load(Ordering::SeqCst) {
                let tick = Instant::now();
                match run_tick(&studio, source.as_mut(), tracker.as_mut(), clock) {
                    Ok(output) => {
                        if out.send(output).is_err() {
                            info!("Frame receiver gone; stopping stream");
                            flag.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                    Err(e) => warn!("Frame skipped: {e}"),
                }
                // target the configured frame rate
                if let Some(rest) = interval.checked_sub(tick.elapsed()) {
                    thread::sleep(rest);
                }
            }
            info!("Stream stopped");
        });

        *run = Some(Run { active, worker });
        true
    }

    /// Stop the loop and wait for it. Returns false if it was not running.
    pub fn stop(&self) -> bool {
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner).take();
        match run {
            Some(run) => {
                let was_running = run.active.swap(false, Ordering::SeqCst);
                run.join();
                was_running
            }
            None => false,
        }
    }
}

impl Drop for Streamer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One iteration: grab, detect, process. A tracker failure degrades to "no hand".
fn run_tick(
    studio: &Studio,
    source: &mut dyn FrameSource,
    tracker: &mut dyn HandTracker,
    clock: Instant,
) -> Result<FrameOutput, Error> {
    let frame = source.next_frame()?;
    let hand = tracker.detect(&frame).unwrap_or_else(|e| {
        warn!("{e}");
        None
    });
    studio.process(&frame, hand.as_ref(), clock.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SessionState;
    use crate::tracker::NoHands;
    use crate::types::{BLACK, FrameBuffer};
    use std::sync::mpsc;

    struct Flaky {
        n: u32,
    }

    impl FrameSource for Flaky {
        fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
            self.n += 1;
            if self.n % 2 == 0 {
                Err(Error::CameraFrame("dropped".into()))
            } else {
                Ok(FrameBuffer::filled(64, 48, BLACK))
            }
        }

        fn resolution(&self) -> (u32, u32) {
            (64, 48)
        }
    }

    fn flaky() -> SourceFactory {
        Box::new(|| Ok(Box::new(Flaky { n: 0 }) as Box<dyn FrameSource>))
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let studio = Arc::new(Studio::new(64, 48, SessionState::default()));
        let streamer = Streamer::new(200);
        let (tx, rx) = mpsc::channel();

        assert!(!streamer.stop());
        assert!(streamer.start(Arc::clone(&studio), flaky(), Box::new(NoHands), tx.clone()));
        assert!(!streamer.start(Arc::clone(&studio), flaky(), Box::new(NoHands), tx));
        assert!(streamer.is_active());

        // failed grabs are skipped, good ones keep coming
        for _ in 0..3 {
            let out = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(out.status.gesture, "Ready");
        }

        assert!(streamer.stop());
        assert!(!streamer.stop());
        assert!(!streamer.is_active());
    }

    #[test]
    fn source_that_fails_to_open_ends_quietly() {
        let studio = Arc::new(Studio::new(64, 48, SessionState::default()));
        let streamer = Streamer::new(30);
        let (tx, rx) = mpsc::channel();
        let broken: SourceFactory = Box::new(|| Err(Error::CameraInit("no device".into())));
        assert!(streamer.start(studio, broken, Box::new(NoHands), tx));
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
        assert!(!streamer.is_active());
    }

    #[test]
    fn restarts_after_the_receiver_is_dropped() {
        let studio = Arc::new(Studio::new(64, 48, SessionState::default()));
        let streamer = Streamer::new(10);
        let (tx, rx) = mpsc::channel();
        assert!(streamer.start(Arc::clone(&studio), flaky(), Box::new(NoHands), tx));
        drop(rx);

        let deadline = Instant::now() + Duration::from_secs(5);
        while streamer.is_active() {
            assert!(Instant::now() < deadline, "worker never noticed the dropped receiver");
            thread::sleep(Duration::from_millis(5));
        }

        let (tx, rx) = mpsc::channel();
        assert!(streamer.start(Arc::clone(&studio), flaky(), Box::new(NoHands), tx));
        let out = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(out.status.gesture, "Ready");
        assert!(streamer.is_active());
        assert!(streamer.stop());
    }
}
