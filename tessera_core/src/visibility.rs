// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility resolution over the tiled plane.
//!
//! Unit `(col, row)` occupies `[col·W, (col+1)·W) × [row·H, (row+1)·H)` in
//! world space, shifted by the pan offset. [`resolve`] finds the columns and
//! rows the viewport overlaps, widens that range by one unit on every side,
//! and emits one [`TileInstance`] per placement per unit in range.
//!
//! Because every placement lies inside its unit, the one-unit buffer covers
//! any instance whose bounds intersect the viewport. The buffer also keeps
//! tiles just off-screen materialized so they do not pop in during a pan.

use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;

use kurbo::{Point, Rect, Size, Vec2};

use crate::content::ItemId;
use crate::layout::{ContentRef, LayoutUnit};

/// The buffered range of unit columns and rows to materialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridRange {
    /// First column, inclusive.
    pub start_col: i64,
    /// Last column, inclusive.
    pub end_col: i64,
    /// First row, inclusive.
    pub start_row: i64,
    /// Last row, inclusive.
    pub end_row: i64,
}

/// Largest unit index magnitude: beyond 2^53 adjacent indices are no longer
/// distinct `f64` values anyway.
const INDEX_LIMIT: f64 = 9_007_199_254_740_992.0;

#[expect(
    clippy::cast_possible_truncation,
    reason = "clamped to ±2^53, which i64 holds exactly"
)]
fn floor_index(v: f64) -> i64 {
    libm::floor(v).clamp(-INDEX_LIMIT, INDEX_LIMIT) as i64
}

impl GridRange {
    /// Computes the buffered range for a viewport.
    ///
    /// Returns `None` when the viewport has no area, the unit is degenerate,
    /// or the offset is not finite.
    #[must_use]
    pub fn compute(offset: Vec2, viewport: Size, unit: Size) -> Option<Self> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 || !offset.is_finite() {
            return None;
        }
        if unit.width <= 0.0 || unit.height <= 0.0 {
            return None;
        }
        // The end bound already reaches one unit past the last overlapped
        // unit; the buffer then adds one more on each side.
        let start_col = floor_index(-offset.x / unit.width);
        let end_col = floor_index((-offset.x + viewport.width) / unit.width).saturating_add(1);
        let start_row = floor_index(-offset.y / unit.height);
        let end_row = floor_index((-offset.y + viewport.height) / unit.height).saturating_add(1);
        Some(Self {
            start_col: start_col.saturating_sub(1),
            end_col: end_col.saturating_add(1),
            start_row: start_row.saturating_sub(1),
            end_row: end_row.saturating_add(1),
        })
    }

    /// Columns in range.
    #[must_use]
    pub fn columns(&self) -> RangeInclusive<i64> {
        self.start_col..=self.end_col
    }

    /// Rows in range.
    #[must_use]
    pub fn rows(&self) -> RangeInclusive<i64> {
        self.start_row..=self.end_row
    }

    /// Number of units in range.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        let cols = self.end_col.abs_diff(self.start_col) + 1;
        let rows = self.end_row.abs_diff(self.start_row) + 1;
        cols * rows
    }
}

/// Stable identity of one instance of an item in one unit.
///
/// Formats as `itemId-col-row`, which is what hosts key their elements by.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceKey {
    /// Source item.
    pub item: ItemId,
    /// Unit column.
    pub col: i64,
    /// Unit row.
    pub row: i64,
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.item, self.col, self.row)
    }
}

impl fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceKey({self})")
    }
}

/// One placement materialized in one unit, in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TileInstance {
    /// Stable identity across frames.
    pub key: InstanceKey,
    /// Top-left corner after the pan offset is applied.
    pub origin: Point,
    /// Extent.
    pub size: Size,
    /// Handle to the content record.
    pub content: ContentRef,
}

impl TileInstance {
    /// Bounds in viewport coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// Resolves the tile instances to render for a pan offset and viewport.
#[must_use]
pub fn resolve(offset: Vec2, viewport: Size, unit: &LayoutUnit) -> Vec<TileInstance> {
    let mut out = Vec::new();
    resolve_into(offset, viewport, unit, &mut out);
    out
}

/// Like [`resolve`], reusing `out`'s allocation. Returns the range used.
///
/// `out` is cleared first. Instances are ordered by column, then row, then
/// placement order.
pub fn resolve_into(
    offset: Vec2,
    viewport: Size,
    unit: &LayoutUnit,
    out: &mut Vec<TileInstance>,
) -> Option<GridRange> {
    out.clear();
    let range = GridRange::compute(offset, viewport, unit.size())?;
    let (w, h) = (unit.size().width, unit.size().height);
    for col in range.columns() {
        for row in range.rows() {
            let base = Vec2::new(col as f64 * w, row as f64 * h) + offset;
            out.extend(unit.placements().iter().map(|p| TileInstance {
                key: InstanceKey {
                    item: p.id.clone(),
                    col,
                    row,
                },
                origin: p.local + base,
                size: p.size,
                content: p.content,
            }));
        }
    }
    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Placement;
    use alloc::string::ToString;
    use alloc::vec;

    fn single_item_unit() -> LayoutUnit {
        LayoutUnit::new(
            Size::new(500.0, 400.0),
            vec![Placement {
                id: ItemId::new("7"),
                local: Point::new(0.0, 0.0),
                size: Size::new(100.0, 100.0),
                content: ContentRef(0),
            }],
        )
        .unwrap()
    }

    #[test]
    fn origin_offset_range() {
        let r = GridRange::compute(Vec2::ZERO, Size::new(1000.0, 800.0), Size::new(500.0, 400.0))
            .unwrap();
        assert_eq!(r.columns(), -1..=4);
        assert_eq!(r.rows(), -1..=4);
        assert_eq!(r.unit_count(), 36);
    }

    #[test]
    fn empty_viewport_resolves_nothing() {
        let unit = single_item_unit();
        assert!(resolve(Vec2::ZERO, Size::ZERO, &unit).is_empty());
        assert!(resolve(Vec2::ZERO, Size::new(100.0, 0.0), &unit).is_empty());
    }

    #[test]
    fn non_finite_offset_resolves_nothing() {
        let unit = single_item_unit();
        assert!(resolve(Vec2::new(f64::NAN, 0.0), Size::new(10.0, 10.0), &unit).is_empty());
    }

    #[test]
    fn instance_positions_follow_offset() {
        let unit = single_item_unit();
        let tiles = resolve(Vec2::new(-250.0, 30.0), Size::new(100.0, 100.0), &unit);
        let t = tiles
            .iter()
            .find(|t| t.key.col == 1 && t.key.row == 0)
            .unwrap();
        assert_eq!(t.origin, Point::new(250.0, 30.0));
        assert_eq!(t.key.to_string(), "7-1-0");
    }

    #[test]
    fn far_offsets_resolve_without_overflow() {
        let unit = single_item_unit();
        let viewport = Size::new(1280.0, 720.0);
        let offsets = [
            Vec2::new(-1e30, 0.0),
            Vec2::new(1e30, -1e300),
            Vec2::new(-f64::MAX, f64::MAX),
        ];
        for offset in offsets {
            let range = GridRange::compute(offset, viewport, unit.size()).unwrap();
            assert!(range.start_col <= range.end_col, "{range:?}");
            assert!(range.start_row <= range.end_row, "{range:?}");
            let tiles = resolve(offset, viewport, &unit);
            assert_eq!(tiles.len() as u64, range.unit_count());
        }
    }

    #[test]
    fn negative_units_format_with_sign() {
        let key = InstanceKey {
            item: ItemId::new("3"),
            col: -1,
            row: -2,
        };
        assert_eq!(key.to_string(), "3--1--2");
    }

    #[test]
    fn resolve_into_reuses_buffer() {
        let unit = single_item_unit();
        let mut out = Vec::new();
        let a = resolve_into(Vec2::ZERO, Size::new(10.0, 10.0), &unit, &mut out).unwrap();
        let first = out.len();
        assert_eq!(first as u64, a.unit_count());
        resolve_into(Vec2::ZERO, Size::new(10.0, 10.0), &unit, &mut out);
        assert_eq!(out.len(), first, "buffer is cleared before refill");
    }
}
