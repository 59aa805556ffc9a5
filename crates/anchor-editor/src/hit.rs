//! Hit testing: pointer → word lookup.
//!
//! Descends the hierarchy one level at a time (container → page →
//! paragraph → sentence → word), entering the first child whose current
//! rectangle strictly contains the point. Siblings are assumed not to
//! overlap, so the first match is the only match. A level with no
//! containing child ends the search; there is no backtracking.

use anchor_core::surface::WORD_DEPTH;
use anchor_core::{Point, PointerEvent, TextSurface, WordId, contains_point, pointer_position};

/// Find the word under a pointer event. Returns `None` on a miss.
pub fn locate<S: TextSurface>(surface: &S, event: &PointerEvent) -> Option<WordId> {
    locate_point(surface, pointer_position(event))
}

/// Find the word containing a document-space point.
pub fn locate_point<S: TextSurface>(surface: &S, point: Point) -> Option<WordId> {
    let unit = locate_unit(surface, point)?;
    surface.unit_id(&unit)
}

/// Like `locate_point`, but returns the surface's handle to the word.
pub fn locate_unit<S: TextSurface>(surface: &S, point: Point) -> Option<S::Unit> {
    let root = surface.root()?;
    if !is_hit(surface, &root, point) {
        return None;
    }

    let mut current = root;
    for depth in 1..=WORD_DEPTH {
        current = match surface
            .children(&current)
            .into_iter()
            .find(|child| is_hit(surface, child, point))
        {
            Some(child) => child,
            None => {
                log::trace!("hit miss at depth {depth} for ({}, {})", point.x, point.y);
                return None;
            }
        };
    }
    Some(current)
}

/// A unit the host has not laid out (no rectangle) can never be hit.
fn is_hit<S: TextSurface>(surface: &S, unit: &S::Unit, point: Point) -> bool {
    surface
        .bounds(unit)
        .is_some_and(|rect| contains_point(&rect, point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_core::{Level, Rect, TextDocument, TextUnit, UnitId};

    /// One page, two paragraphs, one sentence each:
    ///
    /// ```text
    /// page      (0,0)-(800,600)
    ///  para a   (10,10)-(790,100)
    ///   sent    (10,10)-(790,40)   words h_w1 h_w2 h_w3(empty)
    ///  para b   (10,200)-(790,300)
    ///   sent    (10,200)-(790,240) word h_w4
    /// ```
    fn layout() -> TextDocument {
        let mut doc = TextDocument::new();
        doc.graph[doc.root].bounds = Some(Rect::new(0.0, 0.0, 800.0, 600.0));

        let page = add(&mut doc, None, "h_page", Level::Page, Rect::new(0.0, 0.0, 800.0, 600.0));
        let pa = add(&mut doc, Some(page), "h_pa", Level::Paragraph, Rect::new(10.0, 10.0, 790.0, 100.0));
        let sa = add(&mut doc, Some(pa), "h_sa", Level::Sentence, Rect::new(10.0, 10.0, 790.0, 40.0));
        add(&mut doc, Some(sa), "h_w1", Level::Word, Rect::new(10.0, 10.0, 60.0, 40.0));
        add(&mut doc, Some(sa), "h_w2", Level::Word, Rect::new(70.0, 10.0, 120.0, 40.0));
        add(&mut doc, Some(sa), "h_w3", Level::Word, Rect::new(130.0, 10.0, 140.0, 40.0));
        let pb = add(&mut doc, Some(page), "h_pb", Level::Paragraph, Rect::new(10.0, 200.0, 790.0, 300.0));
        let sb = add(&mut doc, Some(pb), "h_sb", Level::Sentence, Rect::new(10.0, 200.0, 790.0, 240.0));
        add(&mut doc, Some(sb), "h_w4", Level::Word, Rect::new(10.0, 200.0, 90.0, 240.0));
        doc
    }

    fn add(
        doc: &mut TextDocument,
        parent: Option<anchor_core::NodeIndex>,
        id: &str,
        level: Level,
        rect: Rect,
    ) -> anchor_core::NodeIndex {
        let mut unit = TextUnit::new(UnitId::intern(id), level);
        unit.bounds = Some(rect);
        let parent = parent.unwrap_or(doc.root);
        doc.add_unit(parent, unit).unwrap()
    }

    fn hit(doc: &TextDocument, x: f64, y: f64) -> Option<String> {
        locate(doc, &PointerEvent::mouse(x, y)).map(|id| id.as_str().to_string())
    }

    #[test]
    fn hits_word_inside_nested_levels() {
        let doc = layout();
        assert_eq!(hit(&doc, 30.0, 25.0).as_deref(), Some("h_w1"));
        assert_eq!(hit(&doc, 100.0, 25.0).as_deref(), Some("h_w2"));
        assert_eq!(hit(&doc, 50.0, 220.0).as_deref(), Some("h_w4"));
    }

    #[test]
    fn empty_word_is_matchable() {
        let doc = layout();
        assert_eq!(doc.get_by_id(UnitId::intern("h_w3")).unwrap().text, "");
        assert_eq!(hit(&doc, 135.0, 25.0).as_deref(), Some("h_w3"));
    }

    #[test]
    fn gap_between_words_misses() {
        let doc = layout();
        // Inside the sentence, between h_w1 and h_w2.
        assert_eq!(hit(&doc, 65.0, 25.0).as_deref(), None);
    }

    #[test]
    fn outside_root_misses() {
        let doc = layout();
        assert_eq!(hit(&doc, 900.0, 25.0).as_deref(), None);
        assert_eq!(hit(&doc, -1.0, -1.0).as_deref(), None);
    }

    #[test]
    fn edges_are_misses() {
        let doc = layout();
        assert_eq!(hit(&doc, 10.0, 25.0).as_deref(), None);
        assert_eq!(hit(&doc, 60.0, 25.0).as_deref(), None);
        assert_eq!(hit(&doc, 30.0, 40.0).as_deref(), None);
    }

    #[test]
    fn no_backtracking_into_later_sibling() {
        let mut doc = layout();
        // Stretch paragraph a so it also covers h_w4's area. The descent
        // enters paragraph a first, finds no sentence there, and gives up.
        doc.set_bounds(UnitId::intern("h_pa"), Rect::new(10.0, 10.0, 790.0, 250.0))
            .unwrap();
        assert_eq!(hit(&doc, 50.0, 220.0).as_deref(), None);
    }

    #[test]
    fn unlaid_out_units_are_skipped() {
        let mut doc = layout();
        doc.clear_bounds();
        assert_eq!(hit(&doc, 30.0, 25.0).as_deref(), None);
    }

    #[test]
    fn client_coordinates_are_scrolled() {
        let doc = layout();
        let ev = PointerEvent::mouse_client(50.0, 20.0, Point::new(0.0, 200.0));
        assert_eq!(locate(&doc, &ev), Some(UnitId::intern("h_w4")));
    }

    #[test]
    fn touch_events_are_located() {
        let doc = layout();
        assert_eq!(
            locate(&doc, &PointerEvent::touch(100.0, 25.0)),
            Some(UnitId::intern("h_w2"))
        );
    }
}
