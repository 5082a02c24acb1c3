// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for resolution, motion and the star field.

use std::collections::HashSet;

use kurbo::{Point, Rect, Size, Vec2};
use proptest::prelude::*;
use tessera_core::catalog;
use tessera_core::content::ItemId;
use tessera_core::distortion::DistortionConfig;
use tessera_core::layout::{ContentRef, LayoutUnit, Placement};
use tessera_core::motion::{MotionController, PanState};
use tessera_core::starfield::{StarField, StarFieldConfig};
use tessera_core::visibility::resolve;

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Units whose items may overhang the unit edge by less than one unit.
fn unit_strategy() -> impl Strategy<Value = LayoutUnit> {
    (100_i32..2000, 100_i32..2000, 1_usize..6).prop_flat_map(|(w, h, n)| {
        let item = ((1 - w)..w, (1 - h)..h).prop_flat_map(move |(x, y)| {
            (Just(x), Just(y), 1..(2 * w - x), 1..(2 * h - y))
        });
        proptest::collection::vec(item, n).prop_map(move |items| {
            let placements = items
                .into_iter()
                .enumerate()
                .map(|(i, (x, y, iw, ih))| Placement {
                    id: ItemId::new(&i.to_string()),
                    local: Point::new(f64::from(x), f64::from(y)),
                    size: Size::new(f64::from(iw), f64::from(ih)),
                    content: ContentRef(i),
                })
                .collect();
            LayoutUnit::new(Size::new(f64::from(w), f64::from(h)), placements).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn every_intersecting_instance_is_resolved(
        unit in unit_strategy(),
        ox in -50_000_i32..50_000,
        oy in -50_000_i32..50_000,
        vw in 1_u32..4000,
        vh in 1_u32..4000,
    ) {
        let offset = Vec2::new(f64::from(ox), f64::from(oy));
        let viewport = Size::new(f64::from(vw), f64::from(vh));
        let view = Rect::from_origin_size(Point::ZERO, viewport);
        let tiles = resolve(offset, viewport, &unit);
        let keys: HashSet<String> = tiles.iter().map(|t| t.key.to_string()).collect();
        prop_assert_eq!(keys.len(), tiles.len());

        let (w, h) = (unit.size().width, unit.size().height);
        let c0 = (-offset.x / w).floor() as i64 - 3;
        let c1 = ((-offset.x + viewport.width) / w).floor() as i64 + 3;
        let r0 = (-offset.y / h).floor() as i64 - 3;
        let r1 = ((-offset.y + viewport.height) / h).floor() as i64 + 3;
        for col in c0..=c1 {
            for row in r0..=r1 {
                for p in unit.placements() {
                    let origin = p.local + Vec2::new(col as f64 * w, row as f64 * h) + offset;
                    if overlaps(Rect::from_origin_size(origin, p.size), view) {
                        let key = format!("{}-{col}-{row}", p.id);
                        prop_assert!(keys.contains(&key), "missing {}", key);
                    }
                }
            }
        }
    }

    #[test]
    fn catalog_resolution_is_deterministic(ox in -10_000.0_f64..10_000.0, oy in -10_000.0_f64..10_000.0) {
        let unit = LayoutUnit::from_items(catalog::WORK_UNIT, &catalog::default_items()).unwrap();
        let viewport = Size::new(1440.0, 900.0);
        let a = resolve(Vec2::new(ox, oy), viewport, &unit);
        let b = resolve(Vec2::new(ox, oy), viewport, &unit);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn velocity_magnitude_never_grows(dx in -500.0_f64..500.0, dy in -500.0_f64..500.0) {
        let motion = MotionController::default();
        let mut pan = PanState::default();
        let _ = motion.apply_input_delta(&mut pan, Vec2::new(dx, dy));
        let mut prev = pan.velocity;
        for _ in 0..400 {
            motion.tick(&mut pan);
            prop_assert!(pan.velocity.x.abs() <= prev.x.abs());
            prop_assert!(pan.velocity.y.abs() <= prev.y.abs());
            prop_assert!(pan.velocity.x == 0.0 || pan.velocity.x.abs() >= 0.01);
            prop_assert!(pan.velocity.y == 0.0 || pan.velocity.y.abs() >= 0.01);
            prev = pan.velocity;
        }
        prop_assert!(pan.is_at_rest());
    }

    #[test]
    fn velocity_follows_the_decay_law(v0 in -500.0_f64..500.0) {
        let motion = MotionController::default();
        let mut pan = PanState::default();
        let _ = motion.apply_input_delta(&mut pan, Vec2::new(v0, 0.0));
        for n in 1..=400 {
            motion.tick(&mut pan);
            let closed = v0 * 0.96_f64.powi(n);
            let v = pan.velocity.x;
            if v == 0.0 {
                prop_assert!(closed.abs() < 0.01 + 1e-9, "snapped at n = {} while v(n) = {}", n, closed);
                break;
            }
            prop_assert!(
                (v - closed).abs() <= 1e-9 * v0.abs(),
                "v({}) = {} but v0 * 0.96^n = {}", n, v, closed
            );
        }
        prop_assert_eq!(pan.velocity.x, 0.0);
    }

    #[test]
    fn distortion_is_bounded(t in 0.0_f64..1.0e9) {
        let d = DistortionConfig::drift().at(t);
        let eps = 1e-12;
        prop_assert!((0.005 - eps..=0.015 + eps).contains(&d.freq_x));
        prop_assert!((0.04 - eps..=0.06 + eps).contains(&d.freq_y));
    }

    #[test]
    fn star_depth_stays_bounded(seed in any::<u64>(), frames in 1_usize..600) {
        let config = StarFieldConfig { count: 64, seed, ..StarFieldConfig::fallback() };
        let mut field = StarField::new(config, Size::new(640.0, 480.0));
        for _ in 0..frames {
            field.advance();
        }
        prop_assert_eq!(field.len(), 64);
        for s in field.stars() {
            prop_assert!(s.z > 0.0 && s.z <= config.max_depth);
            prop_assert!(s.x >= 0.0 && s.x <= 640.0);
        }
    }
}
