// What you SEE:
// • Live camera is the base image; your strokes float on top of it.
// • ☝ index only: draw.  ✌ index+middle: hover.  ✋ open palm: erase.
// • 🤏 thumb+index: brush size from the pinch.  ✊ fist: next color.
// • Touch a swatch (top-left) with the index finger to pick that color.
// • Keys: C clears, 1-6 pick a color, +/- brush size, ESC/Q quits.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use air_canvas::args::Args;
use air_canvas::camera::{CameraCapture, FrameSource};
use air_canvas::config::AppConfig;
use air_canvas::draw::Drawer;
use air_canvas::palette;
use air_canvas::stream::{SourceFactory, Streamer};
use air_canvas::studio::Studio;
use air_canvas::tracker::{HandTracker, NoHands, SubprocessTracker};
use air_canvas::types::{BLACK, FrameBuffer};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = AppConfig::load(&args.config)?;
    args.apply(&mut cfg);

    if args.write_default_config {
        cfg.save(&args.config)?;
        println!("Wrote {}", args.config.display());
        return Ok(());
    }

    /* --- Hand tracker ---
       Visual: without one the feed still shows, but gestures never fire. */
    let tracker: Box<dyn HandTracker> = match &cfg.tracker.command {
        Some(cmd) => Box::new(
            SubprocessTracker::spawn(cmd, cfg.tracker.min_confidence).context("starting hand tracker")?,
        ),
        None => {
            warn!("No tracker command configured; running without hand tracking");
            Box::new(NoHands)
        }
    };

    /* --- Session + window ---
       Visual: window opens black until the first composited frame arrives. */
    let (w, h) = (cfg.camera.width as usize, cfg.camera.height as usize);
    let studio = Arc::new(Studio::new(w, h, cfg.initial_session()));
    let mut drawer = Drawer::new("Air Canvas", w, h)?;
    drawer.present(&FrameBuffer::filled(w, h, BLACK))?;

    /* --- Stream loop on its own thread ---
       The camera is opened inside the loop's thread. */
    let cam_cfg = cfg.camera.clone();
    let open_camera: SourceFactory = Box::new(move || {
        let cam = CameraCapture::new(cam_cfg.index, cam_cfg.width, cam_cfg.height, cam_cfg.mirror)?;
        Ok(Box::new(cam) as Box<dyn FrameSource>)
    });
    let streamer = Streamer::new(cfg.stream.target_fps);
    let (tx, rx) = mpsc::channel();
    streamer.start(Arc::clone(&studio), open_camera, tracker, tx);

    info!("Gestures: Index=Draw, Index+Middle=Hover, Palm=Erase, Pinch=Size, Fist=Next Color");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        // Keyboard is the external control surface: same lock as the frame loop.
        if drawer.c_pressed_once() {
            studio.clear_canvas();
        }
        if let Some(i) = drawer.digit_pressed_once() {
            studio.set_color(palette::name(i))?;
        }
        let delta = drawer.brush_delta();
        if delta != 0 {
            let size = studio.status().brush_size as i32 + delta;
            studio.set_brush_size(size.max(0) as u32);
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(output) => drawer.present(&output.frame)?,
            Err(mpsc::RecvTimeoutError::Timeout) => drawer.poll(),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!("Stream ended");
                break;
            }
        }
    }

    streamer.stop();
    let status = studio.status();
    info!("Bye: color={} size={}", status.color, status.brush_size);
    Ok(())
}
