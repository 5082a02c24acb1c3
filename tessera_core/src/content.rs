// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content records placed on the canvas.
//!
//! A [`ContentItem`] is what the tile presenter paints; its local position
//! and size within the layout unit are what the visibility resolver sees.
//! [`ItemStore`] is the in-memory collection the screens build their layout
//! units from.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};

/// Stable identifier of a content item.
///
/// Cheap to clone: every visible tile instance carries one.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(Arc<str>);

impl ItemId {
    /// Creates an identifier from any string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({:?})", &*self.0)
    }
}

/// Project category shown on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Native or hybrid mobile application.
    MobileApp,
    /// Browser application.
    WebApp,
    /// Data dashboard.
    Dashboard,
    /// Component library or design system.
    DesignSystem,
}

impl Category {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MobileApp => "Mobile App",
            Self::WebApp => "Web App",
            Self::Dashboard => "Dashboard",
            Self::DesignSystem => "Design System",
        }
    }
}

/// How a tile's media source should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still image URL or data URI.
    Image,
    /// Looping muted video URL or data URI.
    Video,
    /// Lottie animation JSON.
    Lottie,
}

/// Media attached to a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRef {
    /// Rendering strategy for `source`.
    pub kind: MediaKind,
    /// URL, data URI, or inline animation document.
    pub source: String,
}

/// Tile shape presets. Changing an item's kind snaps its size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Tall phone frame.
    Mobile,
    /// Wide desktop frame.
    Desktop,
    /// Small square.
    Square,
    /// Large square.
    LargeSquare,
}

impl TileKind {
    /// The preset size for this shape.
    #[must_use]
    pub const fn size(self) -> Size {
        match self {
            Self::Mobile => Size::new(288.0, 600.0),
            Self::Desktop => Size::new(600.0, 360.0),
            Self::Square => Size::new(288.0, 288.0),
            Self::LargeSquare => Size::new(360.0, 360.0),
        }
    }
}

/// A content record placed within the work layout unit.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentItem {
    /// Stable identifier; also the prefix of every instance key.
    pub id: ItemId,
    /// Tile heading.
    pub title: String,
    /// Tile category badge.
    pub category: Category,
    /// One-line description.
    pub description: String,
    /// Media shown in the tile body.
    pub media: MediaRef,
    /// Optional destination; linked tiles render as anchors.
    pub link: Option<String>,
    /// Shape preset.
    pub tile_kind: TileKind,
    /// Top-left corner within the layout unit.
    pub local: Point,
    /// Tile extent.
    pub size: Size,
}

/// A partial update to a [`ContentItem`].
///
/// `None` fields are left alone. Setting `tile_kind` also snaps `size` to the
/// preset unless `size` is given explicitly in the same patch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemPatch {
    /// New heading.
    pub title: Option<String>,
    /// New category.
    pub category: Option<Category>,
    /// New description.
    pub description: Option<String>,
    /// New media.
    pub media: Option<MediaRef>,
    /// New link; `Some(None)` clears it.
    pub link: Option<Option<String>>,
    /// New shape preset.
    pub tile_kind: Option<TileKind>,
    /// New local position.
    pub local: Option<Point>,
    /// New size.
    pub size: Option<Size>,
}

impl ItemPatch {
    fn apply(self, item: &mut ContentItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(media) = self.media {
            item.media = media;
        }
        if let Some(link) = self.link {
            item.link = link;
        }
        if let Some(kind) = self.tile_kind {
            item.tile_kind = kind;
            item.size = kind.size();
        }
        if let Some(local) = self.local {
            item.local = local;
        }
        if let Some(size) = self.size {
            item.size = size;
        }
    }
}

/// Ordered in-memory collection of content items.
///
/// The revision counter bumps on every successful mutation so screens can
/// tell when their layout unit is stale.
#[derive(Clone, Debug, Default)]
pub struct ItemStore {
    items: Vec<ContentItem>,
    revision: u64,
}

impl ItemStore {
    /// Creates a store holding `items` in order.
    #[must_use]
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items, revision: 0 }
    }

    /// All items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    /// Applies `patch` to the item with `id`. Returns `false` if no such
    /// item exists.
    pub fn update(&mut self, id: &str, patch: ItemPatch) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id.as_str() == id) else {
            return false;
        };
        patch.apply(item);
        self.revision += 1;
        true
    }

    /// Mutation counter.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
