// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in portfolio: five scattered tiles in a 1728 × 1600 unit.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::content::{Category, ContentItem, ItemId, ItemStore, MediaKind, MediaRef, TileKind};

/// Size of the work layout unit.
pub const WORK_UNIT: Size = Size::new(1728.0, 1600.0);

struct Entry {
    id: &'static str,
    title: &'static str,
    category: Category,
    description: &'static str,
    kind: TileKind,
    x: f64,
    y: f64,
}

const ENTRIES: [Entry; 5] = [
    Entry {
        id: "1",
        title: "Finance Dash",
        category: Category::WebApp,
        description: "Real-time crypto trading terminal.",
        kind: TileKind::Desktop,
        x: 50.0,
        y: 50.0,
    },
    Entry {
        id: "2",
        title: "FitTrack",
        category: Category::MobileApp,
        description: "Daily activity & macro logger.",
        kind: TileKind::Desktop,
        x: 850.0,
        y: 150.0,
    },
    Entry {
        id: "3",
        title: "Social Connect",
        category: Category::MobileApp,
        description: "Voice-first messaging platform.",
        kind: TileKind::LargeSquare,
        x: 150.0,
        y: 550.0,
    },
    Entry {
        id: "4",
        title: "Core UI",
        category: Category::DesignSystem,
        description: "Atomic lib.",
        kind: TileKind::Desktop,
        x: 700.0,
        y: 650.0,
    },
    Entry {
        id: "5",
        title: "E-Shop Pro",
        category: Category::WebApp,
        description: "Modern headless commerce storefront.",
        kind: TileKind::Desktop,
        x: 400.0,
        y: 1100.0,
    },
];

/// The default portfolio items.
#[must_use]
pub fn default_items() -> Vec<ContentItem> {
    ENTRIES
        .iter()
        .enumerate()
        .map(|(n, entry)| {
            let size = entry.kind.size();
            ContentItem {
                id: ItemId::new(entry.id),
                title: entry.title.to_string(),
                category: entry.category,
                description: entry.description.to_string(),
                media: MediaRef {
                    kind: MediaKind::Image,
                    source: format!(
                        "https://picsum.photos/{}/{}?random={}",
                        size.width,
                        size.height,
                        n + 1
                    ),
                },
                link: Some("#".to_string()),
                tile_kind: entry.kind,
                local: Point::new(entry.x, entry.y),
                size,
            }
        })
        .collect()
}

/// A store seeded with [`default_items`].
#[must_use]
pub fn default_store() -> ItemStore {
    ItemStore::new(default_items())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fit_inside_the_unit() {
        for item in default_items() {
            assert!(item.local.x >= 0.0 && item.local.y >= 0.0, "{:?}", item.id);
            assert!(item.local.x + item.size.width <= WORK_UNIT.width, "{:?}", item.id);
            assert!(item.local.y + item.size.height <= WORK_UNIT.height, "{:?}", item.id);
        }
    }

    #[test]
    fn one_large_square_among_five() {
        let items = default_items();
        assert_eq!(items.len(), 5);
        let squares = items
            .iter()
            .filter(|i| i.tile_kind == TileKind::LargeSquare)
            .count();
        assert_eq!(squares, 1);
        assert_eq!(items[2].media.source, "https://picsum.photos/360/360?random=3");
    }
}
