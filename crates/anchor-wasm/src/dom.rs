//! The live page as a `TextSurface`.
//!
//! The text container is found by selector, inside the shadow root of a
//! host element when the page mounts the reader as a custom element. Each
//! level below it is selected by class among *all* descendants of the
//! level above, so layout wrappers between levels are transparent.
//! Rectangles come from `getBoundingClientRect()` on every call, shifted
//! by the page scroll into document coordinates.

use anchor_core::surface::WORD_DEPTH;
use anchor_core::{Point, PointerEvent, Rect, TextSurface, UnitId};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent, TouchEvent, Window};

// ─── Selectors ───────────────────────────────────────────────────────────

/// CSS selectors locating the container and each level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    /// Element whose open shadow root holds the container. When absent,
    /// missing, or without a shadow root, the document itself is searched.
    pub host: Option<String>,
    pub container: String,
    pub page: String,
    pub paragraph: String,
    pub sentence: String,
    pub word: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            host: Some("body > read-along".into()),
            container: "[data-cy=text-container]".into(),
            page: ".page".into(),
            paragraph: ".page__col__text".into(),
            sentence: ".sentence".into(),
            word: ".sentence__word".into(),
        }
    }
}

impl DomConfig {
    /// Selector for the units `depth` levels below the container
    /// (1 = page … 4 = word).
    pub fn level_selector(&self, depth: usize) -> Option<&str> {
        match depth {
            1 => Some(&self.page),
            2 => Some(&self.paragraph),
            3 => Some(&self.sentence),
            WORD_DEPTH => Some(&self.word),
            _ => None,
        }
    }
}

// ─── Surface ─────────────────────────────────────────────────────────────

/// An element together with its level below the container.
#[derive(Debug, Clone)]
pub struct DomNode {
    element: Element,
    depth: usize,
}

pub struct DomSurface<'a> {
    config: &'a DomConfig,
    root: Option<Element>,
    scroll: Point,
}

impl<'a> DomSurface<'a> {
    pub fn new(config: &'a DomConfig, root: Option<Element>, scroll: Point) -> Self {
        Self {
            config,
            root,
            scroll,
        }
    }

    /// Look the container up in the current page.
    pub fn resolve(config: &'a DomConfig) -> Self {
        let window = web_sys::window();
        let root = window
            .as_ref()
            .and_then(Window::document)
            .and_then(|doc| find_container(&doc, config));
        if root.is_none() {
            log::debug!("text container `{}` not found", config.container);
        }
        Self::new(config, root, scroll_of(window.as_ref()))
    }
}

fn find_container(doc: &Document, config: &DomConfig) -> Option<Element> {
    let shadow = config
        .host
        .as_deref()
        .and_then(|host| doc.query_selector(host).ok().flatten())
        .and_then(|host| host.shadow_root());
    match shadow {
        Some(shadow) => shadow.query_selector(&config.container).ok().flatten(),
        None => doc.query_selector(&config.container).ok().flatten(),
    }
}

impl TextSurface for DomSurface<'_> {
    type Unit = DomNode;

    fn root(&self) -> Option<DomNode> {
        self.root.clone().map(|element| DomNode { element, depth: 0 })
    }

    fn children(&self, unit: &DomNode) -> Vec<DomNode> {
        let depth = unit.depth + 1;
        let Some(selector) = self.config.level_selector(depth) else {
            return Vec::new();
        };
        let Ok(list) = unit.element.query_selector_all(selector) else {
            log::warn!("invalid selector `{selector}`");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| DomNode { element, depth })
            .collect()
    }

    fn bounds(&self, unit: &DomNode) -> Option<Rect> {
        let r = unit.element.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()).translate(self.scroll.x, self.scroll.y))
    }

    fn unit_id(&self, unit: &DomNode) -> Option<UnitId> {
        let id = unit.element.id();
        (!id.is_empty()).then(|| UnitId::intern(&id))
    }

    fn text(&self, unit: &DomNode) -> String {
        unit.element.text_content().unwrap_or_default()
    }
}

pub fn scroll_of(window: Option<&Window>) -> Point {
    window.map_or(Point::ORIGIN, |w| {
        Point::new(w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0))
    })
}

/// Normalize a DOM mouse or touch event.
pub fn pointer_event(event: &web_sys::Event) -> PointerEvent {
    let scroll = scroll_of(web_sys::window().as_ref());
    if let Some(touch) = event
        .dyn_ref::<TouchEvent>()
        .and_then(|t| t.target_touches().item(0))
    {
        let mut ev = PointerEvent::touch(f64::from(touch.page_x()), f64::from(touch.page_y()));
        ev.scroll = scroll;
        return ev;
    }
    match event.dyn_ref::<MouseEvent>() {
        Some(mouse) => PointerEvent {
            page: Some(Point::new(f64::from(mouse.page_x()), f64::from(mouse.page_y()))),
            client: Some(Point::new(
                f64::from(mouse.client_x()),
                f64::from(mouse.client_y()),
            )),
            scroll,
            ..Default::default()
        },
        None => PointerEvent {
            scroll,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_read_along_markup() {
        let config = DomConfig::default();
        assert_eq!(config.host.as_deref(), Some("body > read-along"));
        assert_eq!(config.container, "[data-cy=text-container]");
        let levels: Vec<_> = (0..=WORD_DEPTH + 1).map(|d| config.level_selector(d)).collect();
        assert_eq!(
            levels,
            vec![
                None,
                Some(".page"),
                Some(".page__col__text"),
                Some(".sentence"),
                Some(".sentence__word"),
                None,
            ]
        );
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: DomConfig =
            serde_json::from_str(r##"{"host":null,"container":"#text","word":"span.w"}"##).unwrap();
        assert_eq!(config.host, None);
        assert_eq!(config.container, "#text");
        assert_eq!(config.level_selector(4), Some("span.w"));
        assert_eq!(config.level_selector(1), Some(".page"));
    }
}
