// What you SEE now:
// • The hero text drawn as thousands of tiny white particles on black.
// • Move the mouse over it: particles near the cursor scatter in warm orange
//   and drift back once the cursor moves on or leaves the window.
// • With --touch, hold the left button instead (finger down = push).
// • Resize the window: the text is re-laid out and the field reseeded.
// • T cycles through the --text values (each switch reseeds the field).
// • H toggles the HUD. ESC quits.
// • --snapshot out.png renders off-screen instead of opening a window.

mod config;
mod draw;
mod engine;
mod error;
mod pointer;
mod raster;
mod seed;
mod sim;
mod snapshot;
mod types;

use clap::Parser;
use config::Config;
use draw::{draw_text_5x7, Drawer};
use engine::ParticleField;
use error::Error;
use pointer::InputEvent;
use rand::{rngs::StdRng, SeedableRng};
use sim::FrameStats;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use types::FrameBuffer;

fn main() -> Result<(), Error> {
    let config = Config::parse();
    tracing_subscriber::fmt().with_max_level(config.log_level()).init();
    config.validate()?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match &config.snapshot {
        Some(path) => run_snapshot(&config, path, rng),
        None => run_window(&config, rng),
    }
}

/// Simulate `--frames` frames off-screen and save the last one.
fn run_snapshot(config: &Config, path: &Path, rng: StdRng) -> Result<(), Error> {
    let mut screen = FrameBuffer::new(config.width, config.height);
    let mut field = ParticleField::mount(&config.texts[0], config.width, config.height, config.touch, rng);

    if let Some(p) = config.pointer {
        if config.touch {
            field.handle_input(InputEvent::TouchStart);
            field.handle_input(InputEvent::TouchMove { x: p.x, y: p.y });
        } else {
            field.handle_input(InputEvent::PointerMove { x: p.x, y: p.y });
        }
    }

    let mut stats = FrameStats::default();
    for _ in 0..config.frames {
        stats = field.frame(&mut screen);
    }
    if config.hud {
        draw_hud(&mut screen, "SNAPSHOT", field.particle_count());
    }

    snapshot::save_png(&screen, path)?;
    info!(
        path = %path.display(),
        frames = config.frames,
        particles = field.particle_count(),
        recycled = stats.recycled,
        removed = stats.removed,
        "snapshot written"
    );
    field.unmount();
    Ok(())
}

fn run_window(config: &Config, rng: StdRng) -> Result<(), Error> {
    /* --- Window setup ---
       Visual: a black window opens; the OS may pick a different client size. */
    let mut drawer = Drawer::new("particle-text", config.width, config.height, config.fps, config.touch)?;
    let (w, h) = drawer.size();

    /* --- Canvas + engine ---
       Visual: `screen` is what you see; the field paints into it every frame. */
    let mut screen = FrameBuffer::new(w, h);
    let mut text_index = 0;
    let mut field = ParticleField::mount(&config.texts[text_index], w, h, config.touch, rng);
    debug!(scale = field.scale(), "text scale");

    /* --- HUD / FPS --- */
    let mut show_hud = config.hud;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Follow window resizes (full reseed inside the engine). */
        let (w, h) = drawer.size();
        if (w, h) != field.size() {
            screen.resize(w, h);
            field.resize(w, h);
        }
        if w == 0 || h == 0 {
            drawer.idle();
            continue;
        }

        /* 2) Inputs: mouse/touch only touch the interaction state. */
        for event in drawer.poll_input() {
            field.handle_input(event);
        }
        if drawer.h_pressed_once() {
            show_hud = !show_hud;
        }
        if drawer.t_pressed_once() {
            text_index = (text_index + 1) % config.texts.len();
            field.set_text(&config.texts[text_index]);
        }

        /* 3) Simulate + repaint. */
        let stats = field.frame(&mut screen);
        if show_hud {
            draw_hud(&mut screen, &hud_fps_text, field.particle_count());
        }

        /* 4) Present; this also waits for the next frame slot. */
        drawer.present(&screen)?;

        /* 5) FPS counter, once per second. */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!(
                fps,
                particles = field.particle_count(),
                target = field.target_count(),
                drawn = stats.drawn,
                recycled = stats.recycled,
                removed = stats.removed,
                added = stats.added,
                "frame stats"
            );
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    /* --- Teardown: no more frames are scheduled; dropping the window detaches input. */
    field.unmount();
    Ok(())
}

fn draw_hud(screen: &mut FrameBuffer, status: &str, particles: usize) {
    let hud = format!("{} | PARTICLES: {}", status, particles);
    draw_text_5x7(screen, 8, 8, &hud, 0x00_FF_FF_FF);
}
