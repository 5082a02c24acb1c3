// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile cards: media on top, title and category underneath.

use tessera_backend_web::TilePainter;
use tessera_core::content::{ContentItem, MediaKind, MediaRef};
use tessera_core::visibility::TileInstance;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, HtmlElement};

const CARD_STYLE: &str = "display: flex; flex-direction: column; overflow: hidden; \
     border-radius: 16px; background: rgba(20, 16, 40, 0.85); color: #e8e6ff; \
     text-decoration: none; box-shadow: 0 12px 40px rgba(0, 0, 0, 0.45); \
     font-family: system-ui, sans-serif";

const MEDIA_STYLE: &str =
    "flex: 1; min-height: 0; width: 100%; object-fit: cover; display: block";

/// Paints cards from a snapshot of the store taken when the view was built.
pub(crate) struct CardPainter {
    items: Vec<ContentItem>,
}

impl CardPainter {
    pub(crate) fn new(items: &[ContentItem]) -> Self {
        Self {
            items: items.to_vec(),
        }
    }
}

fn text(doc: &Document, tag: &str, content: &str, style: &str) -> Result<Element, JsValue> {
    let el = doc.create_element(tag)?;
    el.set_text_content(Some(content));
    el.set_attribute("style", style)?;
    Ok(el)
}

fn media_element(doc: &Document, media: &MediaRef) -> Result<Element, JsValue> {
    let el = match media.kind {
        MediaKind::Image => {
            let img = doc.create_element("img")?;
            img.set_attribute("src", &media.source)?;
            img.set_attribute("loading", "lazy")?;
            img.set_attribute("alt", "")?;
            img
        }
        MediaKind::Video => {
            let video = doc.create_element("video")?;
            video.set_attribute("src", &media.source)?;
            for flag in ["autoplay", "muted", "loop", "playsinline"] {
                video.set_attribute(flag, "")?;
            }
            video
        }
        // Picked up by whatever Lottie player the page loads.
        MediaKind::Lottie => {
            let holder = doc.create_element("div")?;
            holder.set_attribute("data-lottie", &media.source)?;
            holder
        }
    };
    el.set_attribute("style", MEDIA_STYLE)?;
    Ok(el)
}

impl TilePainter for CardPainter {
    fn create(&mut self, doc: &Document, tile: &TileInstance) -> Result<HtmlElement, JsValue> {
        let item = self
            .items
            .get(tile.content.0)
            .ok_or_else(|| JsValue::from_str("tile refers to a missing item"))?;

        let root = match &item.link {
            Some(href) => {
                let a = doc.create_element("a")?;
                a.set_attribute("href", href)?;
                a.set_attribute("target", "_blank")?;
                a.set_attribute("rel", "noopener noreferrer")?;
                a
            }
            None => doc.create_element("div")?,
        };
        root.set_attribute("style", CARD_STYLE)?;
        root.set_attribute("data-key", &tile.key.to_string())?;

        root.append_child(media_element(doc, &item.media)?.as_ref())?;

        let caption = doc.create_element("div")?;
        caption.set_attribute("style", "padding: 12px 16px")?;
        caption.append_child(text(
            doc,
            "span",
            item.category.label(),
            "font-size: 11px; letter-spacing: 0.08em; text-transform: uppercase; opacity: 0.6",
        )?.as_ref())?;
        caption.append_child(text(
            doc,
            "h3",
            &item.title,
            "margin: 4px 0; font-size: 18px",
        )?.as_ref())?;
        caption.append_child(text(
            doc,
            "p",
            &item.description,
            "margin: 0; font-size: 13px; opacity: 0.75",
        )?.as_ref())?;
        root.append_child(&caption)?;

        Ok(root.unchecked_into())
    }
}
