// Frame simulator: one pass per displayed frame over every particle.
// Visual: dots scatter away from the pointer in orange, drift back in white,
// and quietly respawn elsewhere on the text as they age out.

use crate::draw::fill_rect;
use crate::pointer::{InteractionState, PointerTracker};
use crate::seed::{fill, seed_particle, target_count};
use crate::types::{FrameBuffer, OpacityMask, Particle};
use rand::Rng;

/// Distance (px) within which particles get pushed away.
pub const INTERACTION_RADIUS: f32 = 200.0;
/// Displacement (px) of a particle sitting right under the pointer.
pub const REPEL_FORCE: f32 = 60.0;
/// Fraction of the remaining offset closed each frame while relaxing.
pub const RELAX_RATE: f32 = 0.1;
pub const BACKGROUND: u32 = 0x0000_0000;

/// What happened during one frame; used for logging and the HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub recycled: usize,
    pub removed: usize,
    pub added: usize,
}

#[derive(Default)]
pub struct FrameSimulator {
    particles: Vec<Particle>,
    target: usize,
}

impl FrameSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw every particle away and seed a fresh field for `mask`.
    pub fn reset<R: Rng>(&mut self, mask: &OpacityMask, rng: &mut R) -> usize {
        self.particles.clear();
        self.target = target_count(mask.width, mask.height);
        fill(&mut self.particles, mask, self.target, rng)
    }

    pub fn clear(&mut self) {
        self.particles = Vec::new();
        self.target = 0;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Advance and repaint one frame.
    pub fn step<R: Rng>(
        &mut self,
        pointer: &PointerTracker,
        mask: &OpacityMask,
        rng: &mut R,
        fb: &mut FrameBuffer,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        fb.fill(BACKGROUND);

        let point = *pointer.state();
        let repels = pointer.repels();

        // Two cursors: `read` visits every particle once, `write` keeps survivors packed.
        let mut write = 0;
        for read in 0..self.particles.len() {
            let mut p = self.particles[read];
            let color = apply_interaction(&mut p, &point, repels);
            fill_rect(fb, p.x, p.y, p.size, p.size, color);
            stats.drawn += 1;

            p.life = p.life.saturating_sub(1);
            if p.life == 0 {
                // Respawn in the same slot first; drop only if the mask gives nothing.
                match seed_particle(mask, rng) {
                    Some(fresh) => {
                        p = fresh;
                        stats.recycled += 1;
                    }
                    None => {
                        stats.removed += 1;
                        continue;
                    }
                }
            }
            self.particles[write] = p;
            write += 1;
        }
        self.particles.truncate(write);

        stats.added = fill(&mut self.particles, mask, self.target, rng);
        stats
    }

    #[cfg(test)]
    pub(crate) fn from_parts(particles: Vec<Particle>, target: usize) -> Self {
        Self { particles, target }
    }
}

/// Move `p` for this frame and return the color it should be drawn with.
pub fn apply_interaction(p: &mut Particle, point: &InteractionState, repels: bool) -> u32 {
    let dx = point.x - p.x;
    let dy = point.y - p.y;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance < INTERACTION_RADIUS && repels {
        let force = (INTERACTION_RADIUS - distance) / INTERACTION_RADIUS;
        let angle = dy.atan2(dx);
        p.x = p.base_x - angle.cos() * force * REPEL_FORCE;
        p.y = p.base_y - angle.sin() * force * REPEL_FORCE;
        p.scattered_color
    } else {
        p.x += (p.base_x - p.x) * RELAX_RATE;
        p.y += (p.base_y - p.y) * RELAX_RATE;
        p.rest_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::InputEvent;
    use crate::raster::rasterize;
    use crate::seed::REST_COLOR;
    use rand::{rngs::StdRng, SeedableRng};

    const ORANGE: u32 = 0x00FF_8C1A;

    fn particle_at(x: f32, y: f32, life: u32) -> Particle {
        Particle {
            x,
            y,
            base_x: x,
            base_y: y,
            size: 1.0,
            rest_color: REST_COLOR,
            scattered_color: ORANGE,
            life,
        }
    }

    #[test]
    fn repulsion_pushes_directly_away_from_the_pointer() {
        let mut p = particle_at(300.0, 200.0, 100);
        let point = InteractionState { x: 330.0, y: 240.0, touching: false };
        // Pointer is 50px away along (3,4)/5.
        let color = apply_interaction(&mut p, &point, true);
        assert_eq!(color, ORANGE);

        let expected = (INTERACTION_RADIUS - 50.0) / INTERACTION_RADIUS * REPEL_FORCE;
        let (ox, oy) = (p.base_x - p.x, p.base_y - p.y);
        assert!(((ox * ox + oy * oy).sqrt() - expected).abs() < 1e-3);
        // base - position points at the pointer, so the particle moved away from it.
        assert!((ox / expected - 0.6).abs() < 1e-4);
        assert!((oy / expected - 0.8).abs() < 1e-4);
    }

    #[test]
    fn repulsion_is_relative_to_rest_not_current_position() {
        let mut p = particle_at(100.0, 100.0, 100);
        let point = InteractionState { x: 150.0, y: 100.0, touching: false };
        apply_interaction(&mut p, &point, true);
        let first = p.x;
        // Now further away, so the push is weaker but still measured from base.
        apply_interaction(&mut p, &point, true);
        let d = 150.0 - first;
        let expected = 100.0 - (INTERACTION_RADIUS - d) / INTERACTION_RADIUS * REPEL_FORCE;
        assert!((p.x - expected).abs() < 1e-3);
    }

    #[test]
    fn outside_radius_or_disabled_relaxes_by_ten_percent() {
        let mut p = particle_at(500.0, 500.0, 100);
        p.x = 600.0;
        p.y = 400.0;
        let far = InteractionState::default();

        let mut offset = 100.0f32;
        for _ in 0..20 {
            assert_eq!(apply_interaction(&mut p, &far, true), REST_COLOR);
            offset *= 1.0 - RELAX_RATE;
            assert!((p.x - 500.0 - offset).abs() < 1e-2);
            assert!((500.0 - p.y - offset).abs() < 1e-2);
        }

        // Inside the radius but repulsion disabled (touch device, no finger).
        let near = InteractionState { x: p.x + 5.0, y: p.y, touching: false };
        assert_eq!(apply_interaction(&mut p, &near, false), REST_COLOR);
    }

    #[test]
    fn expiring_particles_are_replaced_on_ink() {
        let mask = rasterize(640, 360, "MARKUPX").mask.unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seeds = Vec::new();
        fill(&mut seeds, &mask, 32, &mut rng);
        for p in &mut seeds {
            p.life = 1;
        }
        let seeded = seeds.len();
        assert!(seeded > 0);
        let mut sim = FrameSimulator::from_parts(seeds, 0);
        let mut fb = FrameBuffer::new(640, 360);
        let pointer = PointerTracker::new(false);

        let stats = sim.step(&pointer, &mask, &mut rng, &mut fb);
        assert_eq!(stats.recycled + stats.removed, seeded);
        for p in sim.particles() {
            assert!(p.life >= 50);
            assert!(mask.is_ink(p.base_x as usize, p.base_y as usize));
        }
    }

    #[test]
    fn exhausted_mask_removes_without_skipping() {
        let mask = OpacityMask::new(50, 50, vec![0; 2500]);
        let particles = vec![
            particle_at(1.0, 1.0, 1),
            particle_at(2.0, 2.0, 5),
            particle_at(3.0, 3.0, 1),
            particle_at(4.0, 4.0, 1),
            particle_at(5.0, 5.0, 9),
        ];
        let mut sim = FrameSimulator::from_parts(particles, 5);
        let mut fb = FrameBuffer::new(50, 50);
        let mut rng = StdRng::seed_from_u64(0);

        let stats = sim.step(&PointerTracker::new(false), &mask, &mut rng, &mut fb);
        assert_eq!(stats, FrameStats { drawn: 5, recycled: 0, removed: 3, added: 0 });
        let lives: Vec<u32> = sim.particles().iter().map(|p| p.life).collect();
        assert_eq!(lives, vec![4, 8]);
        assert_eq!(sim.particles()[0].base_x, 2.0);
        assert_eq!(sim.particles()[1].base_x, 5.0);
    }

    #[test]
    fn top_up_converges_to_target_density() {
        let (w, h) = (200, 100);
        let mask = OpacityMask::new(w, h, vec![255; w * h]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut sim = FrameSimulator::new();
        sim.reset(&mask, &mut rng);
        let target = target_count(w, h);
        assert_eq!(sim.target(), target);

        let mut fb = FrameBuffer::new(w, h);
        let pointer = PointerTracker::new(false);
        for _ in 0..200 {
            sim.step(&pointer, &mask, &mut rng, &mut fb);
            assert_eq!(sim.particles().len(), target);
            assert!(sim.particles().iter().all(|p| p.life > 0));
        }
    }

    #[test]
    fn frame_repaints_background_and_particles() {
        let mask = OpacityMask::new(20, 20, vec![0; 400]);
        let mut sim = FrameSimulator::from_parts(vec![particle_at(10.0, 10.0, 50)], 1);
        sim.particles[0].size = 2.0;
        let mut fb = FrameBuffer::new(20, 20);
        fb.fill(0x0012_3456);
        let mut rng = StdRng::seed_from_u64(2);

        // Pointer right on top: particle is displaced 60px out of the canvas.
        let mut pointer = PointerTracker::new(false);
        pointer.handle(InputEvent::PointerMove { x: 10.0, y: 10.0 });
        sim.step(&pointer, &mask, &mut rng, &mut fb);
        assert!(fb.pixels.iter().all(|&px| px == BACKGROUND));

        // Pointer gone: particle eases back from x=-50 and is drawn once home.
        pointer.handle(InputEvent::PointerLeave);
        pointer.handle(InputEvent::PointerMove { x: 1000.0, y: 1000.0 });
        for _ in 0..45 {
            sim.step(&pointer, &mask, &mut rng, &mut fb);
        }
        assert_eq!(fb.pixels[10 * 20 + 10], REST_COLOR);
    }
}
