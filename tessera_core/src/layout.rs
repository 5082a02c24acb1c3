// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout units: the rectangle that tiles the infinite plane.
//!
//! A [`LayoutUnit`] is immutable once built. Placements may overhang the
//! unit edge, and may overlap each other, as long as no edge reaches a full
//! unit past the unit bounds. The visibility resolver's one-unit buffer on
//! each side covers exactly that much overhang.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::content::{ContentItem, ItemId};

/// Opaque handle back to the record a placement was built from.
///
/// It indexes the collaborator's ordered item list; the core never
/// dereferences it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentRef(pub usize);

/// One item's position within a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Item identifier, unique within the unit.
    pub id: ItemId,
    /// Top-left corner relative to the unit origin.
    pub local: Point,
    /// Extent of the item.
    pub size: Size,
    /// Handle to the content record.
    pub content: ContentRef,
}

impl Placement {
    /// The placement's bounds in unit-local coordinates.
    #[must_use]
    pub fn local_rect(&self) -> Rect {
        Rect::from_origin_size(self.local, self.size)
    }
}

/// Reasons a layout unit cannot be built.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Unit width or height is not a positive finite number.
    #[error("layout unit size must be positive and finite, got {0:?}")]
    InvalidUnitSize(Size),
    /// Two placements share an id.
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
    /// A placement has a non-positive or non-finite size, or a non-finite
    /// position.
    #[error("item {0} has invalid geometry")]
    InvalidItemGeometry(ItemId),
    /// A placement reaches a full unit or more past the unit bounds.
    #[error("item {id} at {rect:?} overhangs the unit by a full unit or more")]
    ItemOverhang {
        /// Offending item.
        id: ItemId,
        /// Its local bounds.
        rect: Rect,
    },
}

/// The rectangle that repeats across the plane.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutUnit {
    size: Size,
    placements: Vec<Placement>,
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl LayoutUnit {
    /// Validates and builds a unit.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the unit size is not positive, an id
    /// repeats, or a placement is malformed or overhangs by a full unit.
    pub fn new(size: Size, placements: Vec<Placement>) -> Result<Self, LayoutError> {
        if !positive(size.width) || !positive(size.height) {
            return Err(LayoutError::InvalidUnitSize(size));
        }
        let mut seen = BTreeSet::new();
        for p in &placements {
            if !seen.insert(p.id.clone()) {
                return Err(LayoutError::DuplicateId(p.id.clone()));
            }
            if !positive(p.size.width)
                || !positive(p.size.height)
                || !p.local.x.is_finite()
                || !p.local.y.is_finite()
            {
                return Err(LayoutError::InvalidItemGeometry(p.id.clone()));
            }
            let rect = p.local_rect();
            if rect.x0 <= -size.width
                || rect.y0 <= -size.height
                || rect.x1 >= 2.0 * size.width
                || rect.y1 >= 2.0 * size.height
            {
                return Err(LayoutError::ItemOverhang {
                    id: p.id.clone(),
                    rect,
                });
            }
        }
        Ok(Self { size, placements })
    }

    /// Builds a unit that places `items` at their own local positions.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_items(size: Size, items: &[ContentItem]) -> Result<Self, LayoutError> {
        let placements = items
            .iter()
            .enumerate()
            .map(|(n, item)| Placement {
                id: item.id.clone(),
                local: item.local,
                size: item.size,
                content: ContentRef(n),
            })
            .collect();
        Self::new(size, placements)
    }

    /// Builds a unit that arranges `items` on a regular grid, ignoring their
    /// own positions and sizes.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_grid(spec: &GridSpec, items: &[ContentItem]) -> Result<Self, LayoutError> {
        let columns = spec.columns.max(1);
        let pitch_x = spec.cell.width + spec.gap;
        let pitch_y = spec.cell.height + spec.gap;
        let placements = items
            .iter()
            .enumerate()
            .map(|(n, item)| {
                let col = (n % columns) as f64;
                let row = (n / columns) as f64;
                Placement {
                    id: item.id.clone(),
                    local: Point::new(col * pitch_x, row * pitch_y),
                    size: spec.cell,
                    content: ContentRef(n),
                }
            })
            .collect();
        Self::new(spec.unit_size(items.len()), placements)
    }

    /// Unit extent.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Placements in insertion order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }
}

/// A regular grid arrangement used by the contact screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Size of every cell.
    pub cell: Size,
    /// Gap after each cell, horizontally and vertically.
    pub gap: f64,
    /// Cells per row.
    pub columns: usize,
    /// Lower bound on the unit height.
    pub min_height: f64,
}

impl GridSpec {
    /// Two columns of 760 × 506 cards with a 24px gutter.
    #[must_use]
    pub const fn contact() -> Self {
        Self {
            cell: Size::new(760.0, 506.0),
            gap: 24.0,
            columns: 2,
            min_height: 1200.0,
        }
    }

    /// Unit size needed to hold `count` cells.
    #[must_use]
    pub fn unit_size(&self, count: usize) -> Size {
        let columns = self.columns.max(1);
        let rows = count.div_ceil(columns) as f64;
        let pitch_y = self.cell.height + self.gap;
        Size::new(
            (self.cell.width + self.gap) * columns as f64,
            self.min_height.max(rows * pitch_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use alloc::vec;

    fn placement(id: &str, x: f64, y: f64, w: f64, h: f64) -> Placement {
        Placement {
            id: ItemId::new(id),
            local: Point::new(x, y),
            size: Size::new(w, h),
            content: ContentRef(0),
        }
    }

    #[test]
    fn rejects_non_positive_unit() {
        let err = LayoutUnit::new(Size::new(0.0, 100.0), vec![]).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidUnitSize(_)));
        assert!(LayoutUnit::new(Size::new(10.0, f64::NAN), vec![]).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = LayoutUnit::new(
            Size::new(100.0, 100.0),
            vec![
                placement("x", 0.0, 0.0, 10.0, 10.0),
                placement("x", 20.0, 20.0, 10.0, 10.0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateId(ItemId::new("x")));
    }

    #[test]
    fn accepts_overhang_below_one_unit() {
        let unit = LayoutUnit::new(
            Size::new(100.0, 100.0),
            vec![
                placement("right", 95.0, 0.0, 10.0, 10.0),
                placement("left", -99.0, 0.0, 10.0, 10.0),
                placement("tall", 0.0, 50.0, 10.0, 149.0),
            ],
        )
        .unwrap();
        assert_eq!(unit.placements().len(), 3);
    }

    #[test]
    fn rejects_overhang_of_a_full_unit() {
        for p in [
            placement("x", 95.0, 0.0, 105.0, 10.0),
            placement("x", -100.0, 0.0, 10.0, 10.0),
            placement("x", 0.0, 150.0, 10.0, 60.0),
        ] {
            let err = LayoutUnit::new(Size::new(100.0, 100.0), vec![p]).unwrap_err();
            assert!(matches!(err, LayoutError::ItemOverhang { .. }), "{err:?}");
        }
    }

    #[test]
    fn rejects_degenerate_items() {
        let err = LayoutUnit::new(
            Size::new(100.0, 100.0),
            vec![placement("x", 0.0, 0.0, 0.0, 10.0)],
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidItemGeometry(_)));
    }

    #[test]
    fn item_flush_with_edge_is_accepted() {
        let unit = LayoutUnit::new(
            Size::new(100.0, 100.0),
            vec![placement("x", 90.0, 90.0, 10.0, 10.0)],
        )
        .unwrap();
        assert_eq!(unit.placements().len(), 1);
    }

    #[test]
    fn catalog_builds_a_valid_work_unit() {
        let unit = LayoutUnit::from_items(catalog::WORK_UNIT, &catalog::default_items()).unwrap();
        assert_eq!(unit.size(), Size::new(1728.0, 1600.0));
        assert_eq!(unit.placements()[4].content, ContentRef(4));
    }

    #[test]
    fn contact_grid_wraps_every_two_cells() {
        let items = catalog::default_items();
        let unit = LayoutUnit::from_grid(&GridSpec::contact(), &items).unwrap();
        assert_eq!(unit.size(), Size::new(1568.0, 1590.0));
        let p = unit.placements();
        assert_eq!(p[1].local, Point::new(784.0, 0.0));
        assert_eq!(p[2].local, Point::new(0.0, 530.0));
        assert_eq!(p[4].size, Size::new(760.0, 506.0));
    }

    #[test]
    fn contact_grid_respects_min_height() {
        assert_eq!(GridSpec::contact().unit_size(2).height, 1200.0);
        assert_eq!(GridSpec::contact().unit_size(0), Size::new(1568.0, 1200.0));
    }
}
