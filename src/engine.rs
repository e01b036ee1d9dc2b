// The particle field engine: owns the mask, the particles, the pointer and the RNG.
// The host calls `frame` once per display refresh and forwards input in between.

use crate::pointer::{InputEvent, PointerTracker};
use crate::raster::{rasterize, Raster};
use crate::sim::{FrameSimulator, FrameStats};
use crate::types::{FrameBuffer, Particle};
use rand::Rng;
use tracing::{debug, info, warn};

pub struct ParticleField<R: Rng> {
    text: String,
    width: usize,
    height: usize,
    raster: Raster,
    sim: FrameSimulator,
    pointer: PointerTracker,
    rng: R,
    mounted: bool,
}

impl<R: Rng> ParticleField<R> {
    /// Rasterize `text` for a `width` x `height` canvas and seed the initial field.
    pub fn mount(text: &str, width: usize, height: usize, touch_capable: bool, rng: R) -> Self {
        let mut field = Self {
            text: text.to_owned(),
            width,
            height,
            raster: Raster { mask: None, scale: 0.0 },
            sim: FrameSimulator::new(),
            pointer: PointerTracker::new(touch_capable),
            rng,
            mounted: true,
        };
        field.rebuild();
        info!(text, width, height, touch_capable, particles = field.particle_count(), "particle field mounted");
        field
    }

    /// New canvas size: fresh mask, fresh particles. Nothing migrates.
    pub fn resize(&mut self, width: usize, height: usize) {
        if !self.mounted || (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.rebuild();
        info!(width, height, particles = self.particle_count(), "canvas resized; field reseeded");
    }

    /// Swap the rendered text; same full reset as a resize.
    pub fn set_text(&mut self, text: &str) {
        if !self.mounted || text == self.text {
            return;
        }
        self.text = text.to_owned();
        self.rebuild();
        info!(text, particles = self.particle_count(), "text changed; field reseeded");
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if self.mounted {
            self.pointer.handle(event);
        }
    }

    /// Run one simulation step and repaint `fb`.
    /// No-op (empty stats) when unmounted or when there is no surface to draw on.
    pub fn frame(&mut self, fb: &mut FrameBuffer) -> FrameStats {
        if !self.mounted {
            return FrameStats::default();
        }
        let Some(mask) = self.raster.mask.as_ref() else {
            return FrameStats::default();
        };
        if (fb.width, fb.height) != (mask.width, mask.height) {
            warn!(
                canvas = ?(fb.width, fb.height),
                field = ?(mask.width, mask.height),
                "framebuffer size differs from field; skipping frame"
            );
            return FrameStats::default();
        }
        self.sim.step(&self.pointer, mask, &mut self.rng, fb)
    }

    /// Stop for good: later frames and input are ignored, memory is released.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.sim.clear();
        self.raster = Raster { mask: None, scale: 0.0 };
        info!("particle field unmounted");
    }

    pub fn particles(&self) -> &[Particle] {
        self.sim.particles()
    }

    pub fn particle_count(&self) -> usize {
        self.particles().len()
    }

    pub fn target_count(&self) -> usize {
        self.sim.target()
    }

    /// Font size / 100 of the current mask; 0 without a surface.
    pub fn scale(&self) -> f32 {
        self.raster.scale
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn rebuild(&mut self) {
        self.raster = rasterize(self.width, self.height, &self.text);
        match self.raster.mask.as_ref() {
            Some(mask) => {
                let seeded = self.sim.reset(mask, &mut self.rng);
                debug!(seeded, target = self.sim.target(), scale = self.raster.scale, "field seeded");
            }
            None => self.sim.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::target_count;
    use rand::{rngs::StdRng, SeedableRng};

    fn field(w: usize, h: usize) -> ParticleField<StdRng> {
        ParticleField::mount("MARKUPX", w, h, false, StdRng::seed_from_u64(42))
    }

    /// Mask hits are random, so some of the `target` attempts can miss.
    fn assert_near_target(count: usize, target: usize) {
        assert!(count <= target);
        assert!(count * 10 >= target * 7, "{count} particles for target {target}");
    }

    #[test]
    fn mount_seeds_toward_target_density() {
        let f = field(1280, 720);
        assert_eq!(f.target_count(), target_count(1280, 720));
        assert_near_target(f.particle_count(), f.target_count());
        assert!((f.scale() - 1.6).abs() < 1e-6);
    }

    #[test]
    fn frames_converge_to_target_and_keep_lives_positive() {
        let mut f = field(640, 360);
        let mut fb = FrameBuffer::new(640, 360);
        for _ in 0..30 {
            f.frame(&mut fb);
            assert!(f.particles().iter().all(|p| p.life > 0));
        }
        assert_near_target(f.particle_count(), f.target_count());
        assert!(f.particle_count() * 100 >= f.target_count() * 95);
    }

    #[test]
    fn resize_discards_every_particle() {
        let mut f = field(1280, 720);
        let before: Vec<_> = f.particles().to_vec();

        f.resize(600, 400);
        assert_eq!(f.size(), (600, 400));
        assert_eq!(f.target_count(), target_count(600, 400));
        assert_near_target(f.particle_count(), f.target_count());
        assert!((f.scale() - 0.8).abs() < 1e-6);

        let mask = rasterize(600, 400, "MARKUPX").mask.unwrap();
        for p in f.particles() {
            assert!(mask.is_ink(p.base_x as usize, p.base_y as usize));
        }
        // The old field sat on a differently placed mask; nothing carried over wholesale.
        assert_ne!(f.particles(), &before[..f.particle_count().min(before.len())]);
    }

    #[test]
    fn text_change_reseeds_on_new_glyphs() {
        let mut f = field(800, 400);
        f.set_text("HI");
        let mask = rasterize(800, 400, "HI").mask.unwrap();
        assert!(f.particle_count() > 0);
        for p in f.particles() {
            assert!(mask.is_ink(p.base_x as usize, p.base_y as usize));
        }
    }

    #[test]
    fn zero_sized_surface_degrades_to_no_op() {
        let mut f = field(0, 0);
        assert_eq!(f.particle_count(), 0);
        assert_eq!(f.scale(), 0.0);
        let mut fb = FrameBuffer::new(0, 0);
        assert_eq!(f.frame(&mut fb), FrameStats::default());

        // Surface shows up later through a resize.
        f.resize(320, 200);
        assert!(f.particle_count() > 0);
    }

    #[test]
    fn pointer_scatters_particles_under_it() {
        let mut f = field(640, 360);
        let mut fb = FrameBuffer::new(640, 360);
        let (cx, cy) = (320.0, 180.0);
        f.handle_input(InputEvent::PointerMove { x: cx, y: cy });
        f.frame(&mut fb);

        let near = f
            .particles()
            .iter()
            .filter(|p| {
                let d = ((p.base_x - cx).powi(2) + (p.base_y - cy).powi(2)).sqrt();
                d < 150.0 && p.life < 150
            })
            .count();
        assert!(near > 0);
        // Every survivor near the pointer now sits further from it than its rest spot.
        for p in f.particles() {
            let rest = ((p.base_x - cx).powi(2) + (p.base_y - cy).powi(2)).sqrt();
            let now = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();
            if rest < 150.0 && (p.x, p.y) != (p.base_x, p.base_y) {
                assert!(now > rest);
            }
        }
    }

    #[test]
    fn unmount_stops_frames_and_input() {
        let mut f = field(320, 200);
        let mut fb = FrameBuffer::new(320, 200);
        f.unmount();
        f.unmount();
        assert_eq!(f.particle_count(), 0);

        fb.fill(0x0012_3456);
        assert_eq!(f.frame(&mut fb), FrameStats::default());
        assert!(fb.pixels.iter().all(|&p| p == 0x0012_3456));

        f.resize(640, 360);
        assert_eq!(f.particle_count(), 0);
    }
}
