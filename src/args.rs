use clap::Parser;
use std::path::PathBuf;

use crate::config::{AppConfig, DEFAULT_PATH};

#[derive(Parser, Debug)]
#[command(author, version, about = "Draw in the air with hand gestures over a live camera feed", long_about = None)]
pub struct Args {
    /// Config file (JSON)
    #[arg(long, default_value = DEFAULT_PATH)]
    pub config: PathBuf,

    /// Camera index (overrides the config)
    #[arg(short, long)]
    pub cam_index: Option<u32>,

    /// Show the raw camera orientation instead of a mirror view
    #[arg(long)]
    pub no_mirror: bool,

    /// Landmark helper command, e.g. --tracker python3 hand_detect.py
    #[arg(long, num_args = 1.., value_name = "CMD")]
    pub tracker: Option<Vec<String>>,

    /// Starting color (palette name)
    #[arg(long)]
    pub color: Option<String>,

    /// Write the effective config to --config and exit
    #[arg(long)]
    pub write_default_config: bool,
}

impl Args {
    /// Fold command line overrides into a loaded config.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(i) = self.cam_index {
            cfg.camera.index = i;
        }
        if self.no_mirror {
            cfg.camera.mirror = false;
        }
        if let Some(cmd) = &self.tracker {
            cfg.tracker.command = Some(cmd.clone());
        }
        if let Some(c) = &self.color {
            cfg.brush.initial_color = c.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply() {
        let args = Args::parse_from([
            "air-canvas", "--cam-index", "1", "--no-mirror", "--color", "Green", "--tracker", "python3", "hands.py",
        ]);
        let mut cfg = AppConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.camera.index, 1);
        assert!(!cfg.camera.mirror);
        assert_eq!(cfg.brush.initial_color, "Green");
        assert_eq!(cfg.tracker.command, Some(vec!["python3".to_string(), "hands.py".to_string()]));
    }

    #[test]
    fn defaults_leave_config_alone() {
        let args = Args::parse_from(["air-canvas"]);
        let mut cfg = AppConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(args.config, PathBuf::from(DEFAULT_PATH));
    }
}
