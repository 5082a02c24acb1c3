// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A perspective star field flying toward the viewer.
//!
//! Each star lives in a box `[0, w) × [0, h) × (0, max_depth]` and moves
//! toward the camera by its own speed every frame. A star that reaches the
//! camera respawns at the far plane with fresh lateral position, size and
//! speed. Projection divides by depth around the viewport centre, so near
//! stars spread outward and grow.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// One star in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Lateral position, `[0, width)`.
    pub x: f64,
    /// Lateral position, `[0, height)`.
    pub y: f64,
    /// Depth, `(0, max_depth]` once advanced.
    pub z: f64,
    /// Base radius before perspective.
    pub size: f64,
    /// Depth units travelled per frame.
    pub speed: f64,
}

/// Star field tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarFieldConfig {
    /// Number of stars.
    pub count: usize,
    /// Far plane.
    pub max_depth: f64,
    /// Perspective numerator: `scale = projection_scale / z`.
    pub projection_scale: f64,
    /// Smallest base size.
    pub min_size: f64,
    /// Size spread above `min_size`.
    pub size_range: f64,
    /// Slowest speed.
    pub min_speed: f64,
    /// Speed spread above `min_speed`.
    pub speed_range: f64,
    /// Stars faster than this draw a motion trail.
    pub streak_speed: f64,
    /// Projected points this far outside the viewport are still drawn.
    pub cull_margin: f64,
    /// RNG seed.
    pub seed: u64,
}

impl StarFieldConfig {
    /// Density used with a GPU point renderer.
    #[must_use]
    pub const fn accelerated() -> Self {
        Self {
            count: 1200,
            max_depth: 1000.0,
            projection_scale: 200.0,
            min_size: 0.5,
            size_range: 2.0,
            min_speed: 1.0,
            speed_range: 5.0,
            streak_speed: 3.0,
            cull_margin: 20.0,
            seed: 0x5EED_57A5,
        }
    }

    /// Lighter density for the CPU drawing path.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            count: 800,
            ..Self::accelerated()
        }
    }

    /// Same config with a different star count.
    #[must_use]
    pub const fn with_count(self, count: usize) -> Self {
        Self { count, ..self }
    }

    /// Same config with a different RNG seed.
    #[must_use]
    pub const fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Largest base size a star can spawn with.
    #[must_use]
    pub fn max_size(&self) -> f64 {
        self.min_size + self.size_range
    }
}

/// A star projected to viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedStar {
    /// Centre on screen.
    pub center: Point,
    /// Core radius on screen.
    pub radius: f64,
    /// Depth fade, 0 at the far plane and 1 up close.
    pub opacity: f64,
    /// Size-derived intensity in `[0.3, 1.0]` for the default size range.
    pub brightness: f64,
    /// Where the motion trail starts, for fast stars.
    pub trail_from: Option<Point>,
}

/// The simulated star population.
#[derive(Clone, Debug)]
pub struct StarField {
    config: StarFieldConfig,
    bounds: Size,
    stars: Vec<Star>,
    rng: SmallRng,
}

impl StarField {
    /// Spawns `config.count` stars in a box the size of `bounds`.
    #[must_use]
    pub fn new(config: StarFieldConfig, bounds: Size) -> Self {
        let mut field = Self {
            config,
            bounds,
            stars: Vec::with_capacity(config.count),
            rng: SmallRng::seed_from_u64(config.seed),
        };
        for _ in 0..config.count {
            let star = field.spawn();
            field.stars.push(star);
        }
        field
    }

    fn spawn(&mut self) -> Star {
        let c = &self.config;
        Star {
            x: self.rng.random::<f64>() * self.bounds.width,
            y: self.rng.random::<f64>() * self.bounds.height,
            z: self.rng.random::<f64>() * c.max_depth,
            size: self.rng.random::<f64>() * c.size_range + c.min_size,
            speed: self.rng.random::<f64>() * c.speed_range + c.min_speed,
        }
    }

    /// Moves every star one frame toward the camera. Returns how many
    /// respawned at the far plane.
    pub fn advance(&mut self) -> usize {
        let mut respawned = 0;
        for i in 0..self.stars.len() {
            let z = self.stars[i].z - self.stars[i].speed;
            if z <= 0.0 {
                let mut fresh = self.spawn();
                fresh.z = self.config.max_depth;
                self.stars[i] = fresh;
                respawned += 1;
            } else {
                self.stars[i].z = z;
            }
        }
        respawned
    }

    /// Adopts new viewport bounds and redistributes every star across them.
    ///
    /// The population size is unchanged.
    pub fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
        for i in 0..self.stars.len() {
            self.stars[i] = self.spawn();
        }
    }

    /// Projects a star, or returns `None` if it falls outside the viewport
    /// plus the cull margin. An empty viewport projects nothing.
    #[must_use]
    pub fn project(&self, star: &Star) -> Option<ProjectedStar> {
        let Size { width, height } = self.bounds;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let c = &self.config;
        let center = self.project_at(star, star.z);
        let m = c.cull_margin;
        if center.x < -m || center.x > width + m || center.y < -m || center.y > height + m {
            return None;
        }
        let scale = c.projection_scale / star.z.max(1.0);
        let trail_from =
            (star.speed > c.streak_speed).then(|| self.project_at(star, star.z + star.speed * 2.0));
        Some(ProjectedStar {
            center,
            radius: star.size * scale,
            opacity: ((c.max_depth - star.z) / c.max_depth).min(1.0),
            brightness: 0.3 + (star.size / 3.0) * 0.7,
            trail_from,
        })
    }

    fn project_at(&self, star: &Star, z: f64) -> Point {
        let scale = self.config.projection_scale / z.max(1.0);
        let half = Point::new(self.bounds.width * 0.5, self.bounds.height * 0.5);
        Point::new(
            half.x + (star.x - half.x) * scale,
            half.y + (star.y - half.y) * scale,
        )
    }

    /// Iterates projected stars that are on screen.
    pub fn visible(&self) -> impl Iterator<Item = ProjectedStar> + '_ {
        self.stars.iter().filter_map(|s| self.project(s))
    }

    /// The star population.
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Number of stars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Whether the field has no stars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Current lateral bounds.
    #[must_use]
    pub const fn bounds(&self) -> Size {
        self.bounds
    }

    /// The configuration this field was built with.
    #[must_use]
    pub const fn config(&self) -> &StarFieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(count: usize) -> StarField {
        StarField::new(
            StarFieldConfig::accelerated().with_count(count),
            Size::new(800.0, 600.0),
        )
    }

    #[test]
    fn same_seed_spawns_the_same_field() {
        let config = StarFieldConfig::fallback().with_count(50).with_seed(7);
        let a = StarField::new(config, Size::new(800.0, 600.0));
        let b = StarField::new(config, Size::new(800.0, 600.0));
        assert_eq!(a.stars(), b.stars());
        assert_eq!(a.config().count, 50);
        assert_eq!(a.config().max_depth, 1000.0);
    }

    #[test]
    fn spawn_ranges() {
        let f = field(500);
        assert_eq!(f.len(), 500);
        for s in f.stars() {
            assert!((0.0..=800.0).contains(&s.x), "x {}", s.x);
            assert!((0.0..=600.0).contains(&s.y), "y {}", s.y);
            assert!((0.0..=1000.0).contains(&s.z), "z {}", s.z);
            assert!((0.5..=2.5).contains(&s.size), "size {}", s.size);
            assert!((1.0..=6.0).contains(&s.speed), "speed {}", s.speed);
        }
    }

    #[test]
    fn depth_stays_in_range_while_advancing() {
        let mut f = field(300);
        let mut respawns = 0;
        for _ in 0..2000 {
            respawns += f.advance();
            for s in f.stars() {
                assert!(s.z > 0.0 && s.z <= 1000.0, "z {}", s.z);
            }
        }
        assert!(respawns > 0, "stars must eventually reach the camera");
        assert_eq!(f.len(), 300);
    }

    #[test]
    fn respawned_star_starts_at_far_plane() {
        let mut f = field(1);
        f.stars[0] = Star {
            x: 10.0,
            y: 10.0,
            z: 0.5,
            size: 1.0,
            speed: 2.0,
        };
        assert_eq!(f.advance(), 1);
        assert_eq!(f.stars()[0].z, 1000.0);
    }

    #[test]
    fn centre_star_projects_to_centre() {
        let f = field(0);
        let star = Star {
            x: 400.0,
            y: 300.0,
            z: 200.0,
            size: 1.5,
            speed: 1.0,
        };
        let p = f.project(&star).unwrap();
        assert_eq!(p.center, Point::new(400.0, 300.0));
        assert_eq!(p.radius, 1.5);
        assert!((p.opacity - 0.8).abs() < 1e-12);
        assert!((p.brightness - 0.65).abs() < 1e-12);
        assert_eq!(p.trail_from, None);
    }

    #[test]
    fn fast_stars_have_trails_behind_them() {
        let f = field(0);
        let star = Star {
            x: 500.0,
            y: 300.0,
            z: 400.0,
            size: 1.0,
            speed: 5.0,
        };
        let p = f.project(&star).unwrap();
        let from = p.trail_from.unwrap();
        // Trail starts deeper, so closer to the centre.
        assert!(from.x < p.center.x && from.x > 400.0, "{from:?} vs {:?}", p.center);
    }

    #[test]
    fn off_screen_stars_are_culled() {
        let f = field(0);
        let near_edge = Star {
            x: 0.0,
            y: 300.0,
            z: 50.0,
            size: 1.0,
            speed: 1.0,
        };
        assert!(f.project(&near_edge).is_none());
    }

    #[test]
    fn empty_bounds_draw_nothing() {
        let mut f = field(100);
        f.resize(Size::ZERO);
        assert_eq!(f.len(), 100);
        assert_eq!(f.visible().count(), 0);
    }

    #[test]
    fn resize_redistributes_across_new_bounds() {
        let mut f = field(200);
        f.resize(Size::new(100.0, 50.0));
        assert!(f.stars().iter().all(|s| s.x <= 100.0 && s.y <= 50.0), "stars outside new bounds");
    }
}
