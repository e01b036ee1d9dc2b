// Command line configuration for the window host and the headless snapshot mode.

use crate::error::Error;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug, Clone)]
#[command(name = "particle-text", version, about = "Interactive particle text effect")]
pub struct Config {
    /// Text rendered into the particle field. Repeat to cycle through several with T.
    #[arg(long = "text", value_name = "TEXT", default_value = "MARKUPX")]
    pub texts: Vec<String>,

    /// Initial canvas width in pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: usize,

    /// Initial canvas height in pixels.
    #[arg(long, default_value_t = 720)]
    pub height: usize,

    /// Target refresh rate of the window.
    #[arg(long, default_value_t = 60)]
    pub fps: usize,

    /// Behave like a touch device: hold the left button to push particles.
    #[arg(long, default_value_t = false)]
    pub touch: bool,

    /// Seed for a reproducible particle field.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show FPS and particle count (toggle with H).
    #[arg(long, default_value_t = false)]
    pub hud: bool,

    /// Render off-screen and write the last frame to this PNG.
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Frames to simulate before writing the snapshot.
    #[arg(long, default_value_t = 1)]
    pub frames: usize,

    /// Interaction point for the snapshot.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub pointer: Option<Point>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let coord = |v: &str| v.trim().parse::<f32>().map_err(|e| format!("bad coordinate `{v}`: {e}"));
    Ok(Point { x: coord(x)?, y: coord(y)? })
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::config(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(Error::config("--fps must be positive"));
        }
        if self.snapshot.is_some() && self.frames == 0 {
            return Err(Error::config("--frames must be positive for a snapshot"));
        }
        if self.pointer.is_some() && self.snapshot.is_none() {
            return Err(Error::config("--pointer only applies together with --snapshot"));
        }
        Ok(())
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
