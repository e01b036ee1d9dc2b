// Particle seeder: drops particles onto random ink pixels of the text mask.
// Visual: decides where the dots sit and what colors they flash when scattered.

use crate::types::{pack_rgb, OpacityMask, Particle};
use rand::Rng;

/// Random pixel draws before giving up on one particle.
pub const MAX_SEED_ATTEMPTS: usize = 100;

/// Particle count at the reference resolution.
pub const BASE_PARTICLE_COUNT: f64 = 6000.0;
pub const REFERENCE_AREA: f64 = 1920.0 * 1080.0;

pub const REST_COLOR: u32 = 0x00FF_FFFF;

/// Desired particle count for a canvas; grows with sqrt(area) so the field
/// looks equally dense on small and large windows.
pub fn target_count(width: usize, height: usize) -> usize {
    let area = width as f64 * height as f64;
    (BASE_PARTICLE_COUNT * (area / REFERENCE_AREA).sqrt()).floor() as usize
}

/// Try to create one particle on an ink pixel; `None` when the mask looks exhausted.
pub fn seed_particle<R: Rng>(mask: &OpacityMask, rng: &mut R) -> Option<Particle> {
    if mask.ink_pixels() == 0 {
        return None;
    }

    for _ in 0..MAX_SEED_ATTEMPTS {
        let x = rng.gen_range(0..mask.width);
        let y = rng.gen_range(0..mask.height);
        if !mask.is_ink(x, y) {
            continue;
        }

        // Warm orange band for the scattered look.
        let hue = rng.gen_range(20.0..40.0);
        return Some(Particle {
            x: x as f32,
            y: y as f32,
            base_x: x as f32,
            base_y: y as f32,
            size: rng.gen_range(0.5..2.0),
            rest_color: REST_COLOR,
            scattered_color: hsl_to_rgb(hue, 1.0, 0.55),
            life: rng.gen_range(50..=150),
        });
    }
    None
}

/// Make `target - len` seeding attempts, appending every particle produced.
/// Failed attempts are skipped. Returns how many particles were added.
pub fn fill<R: Rng>(
    particles: &mut Vec<Particle>,
    mask: &OpacityMask,
    target: usize,
    rng: &mut R,
) -> usize {
    let before = particles.len();
    let deficit = target.saturating_sub(before);
    if deficit == 0 || mask.ink_pixels() == 0 {
        return 0;
    }
    particles.reserve(deficit);
    for _ in 0..deficit {
        if let Some(p) = seed_particle(mask, rng) {
            particles.push(p);
        }
    }
    particles.len() - before
}

/// HSL (hue in degrees, saturation and lightness in [0,1]) to 0x00RRGGBB.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> u32 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    pack_rgb(to_u8(r), to_u8(g), to_u8(b))
}
