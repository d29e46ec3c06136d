//! DocumentView: maps a live node tree into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The layout model is deliberately small: block elements stack
//! vertically, inline elements and text flow left to right, and a handful
//! of markup attributes (`fg`, `bg`, `bold`) tint the subtree they sit
//! on. Vector-namespace elements have no terminal analogue and are
//! skipped.

use tuidom_core::{LiveElement, LiveNode, NodeHandle};
use tuidom_types::Namespace;

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Tags laid out inline; everything else is a block.
const INLINE_TAGS: &[&str] = &[
    "span", "a", "b", "strong", "em", "code", "small", "label", "button", "input",
];

/// Tags rendered bold even without a `bold` attribute.
const BOLD_TAGS: &[&str] = &["h1", "h2", "b", "strong", "button"];

fn is_inline(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
}

#[derive(Debug, Clone, Copy)]
struct Pen {
    x: u16,
    y: u16,
}

impl Pen {
    fn newline(&mut self) {
        self.x = 0;
        self.y += 1;
    }
}

/// Paints a live tree into framebuffers. Holds the base style applied at
/// the root of every paint.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView {
    base: CellStyle,
}

impl Default for DocumentView {
    fn default() -> Self {
        Self {
            base: CellStyle::default(),
        }
    }
}

impl DocumentView {
    pub fn new(base: CellStyle) -> Self {
        Self { base }
    }

    /// Render the tree under `root` into an existing framebuffer.
    ///
    /// The framebuffer is cleared first; content past the right or bottom
    /// edge is clipped. Callers reuse one framebuffer across frames and
    /// resize it only when the terminal size changes.
    pub fn paint(&self, root: &NodeHandle, fb: &mut FrameBuffer) {
        fb.clear(self.base.into_cell(' '));
        let mut pen = Pen { x: 0, y: 0 };
        self.paint_node(root, self.base, fb, &mut pen);
    }

    fn paint_node(&self, node: &NodeHandle, style: CellStyle, fb: &mut FrameBuffer, pen: &mut Pen) {
        match &*node.borrow() {
            LiveNode::Text(t) => {
                pen.x = fb.put_str(pen.x, pen.y, &t.data, style);
            }
            LiveNode::Element(el) => self.paint_element(el, style, fb, pen),
        }
    }

    fn paint_element(
        &self,
        el: &LiveElement,
        inherited: CellStyle,
        fb: &mut FrameBuffer,
        pen: &mut Pen,
    ) {
        if el.namespace == Namespace::Vector {
            return;
        }
        if el.tag == "br" {
            pen.newline();
            return;
        }

        let style = styled(el, inherited);
        let block = !is_inline(&el.tag);
        if block && pen.x > 0 {
            pen.newline();
        }

        match el.tag.as_str() {
            "li" => {
                pen.x = fb.put_str(pen.x, pen.y, "- ", style);
            }
            "input" => {
                self.paint_input(el, style, fb, pen);
            }
            "button" => {
                pen.x = fb.put_str(pen.x, pen.y, "[ ", style);
            }
            _ => {}
        }

        for child in el.children() {
            self.paint_node(child, style, fb, pen);
        }

        if el.tag == "button" {
            pen.x = fb.put_str(pen.x, pen.y, " ]", style);
        }
        if block && pen.x > 0 {
            pen.newline();
        }
    }

    fn paint_input(&self, el: &LiveElement, style: CellStyle, fb: &mut FrameBuffer, pen: &mut Pen) {
        if el.attribute("type") == Some("checkbox") {
            let mark = if el.property("checked") { "[x]" } else { "[ ]" };
            pen.x = fb.put_str(pen.x, pen.y, mark, style);
        } else {
            let value = el.attribute("value").unwrap_or("");
            pen.x = fb.put_str(pen.x, pen.y, value, style);
            pen.x = fb.put_str(pen.x, pen.y, "_", style);
        }
    }
}

fn styled(el: &LiveElement, mut style: CellStyle) -> CellStyle {
    if let Some(fg) = el.attribute("fg").and_then(Rgb::parse) {
        style.fg = fg;
    }
    if let Some(bg) = el.attribute("bg").and_then(Rgb::parse) {
        style.bg = bg;
    }
    if el.attribute("bold").is_some() || BOLD_TAGS.contains(&el.tag.as_str()) {
        style.bold = true;
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuidom_core::Document;

    fn fb(w: u16, h: u16) -> FrameBuffer {
        FrameBuffer::new(w, h)
    }

    #[test]
    fn blocks_stack_and_inline_text_flows() {
        let doc = Document::new();
        let root = doc.create_element("div");
        let title = doc.create_element("h1");
        doc.append_child(&title, doc.create_text("Lobby"));
        let line = doc.create_element("p");
        doc.append_child(&line, doc.create_text("players: "));
        let name = doc.create_element("span");
        doc.append_child(&name, doc.create_text("ada"));
        doc.append_child(&line, name);
        doc.append_child(&root, title);
        doc.append_child(&root, line);

        let mut fb = fb(20, 4);
        DocumentView::default().paint(&root, &mut fb);
        assert_eq!(fb.row_text(0), "Lobby");
        assert_eq!(fb.row_text(1), "players: ada");
    }

    #[test]
    fn color_attributes_tint_the_subtree() {
        let doc = Document::new();
        let root = doc.create_element("div");
        doc.set_attribute(&root, "fg", "red");
        doc.append_child(&root, doc.create_text("hot"));

        let mut fb = fb(5, 1);
        DocumentView::default().paint(&root, &mut fb);
        let cell = fb.get(0, 0).unwrap();
        assert_eq!(cell.ch, 'h');
        assert_eq!(cell.style.fg, Rgb::parse("red").unwrap());
    }

    #[test]
    fn headings_render_bold() {
        let doc = Document::new();
        let h = doc.create_element("h1");
        doc.append_child(&h, doc.create_text("T"));

        let mut fb = fb(3, 1);
        DocumentView::default().paint(&h, &mut fb);
        assert!(fb.get(0, 0).unwrap().style.bold);
    }

    #[test]
    fn list_items_get_a_marker() {
        let doc = Document::new();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        doc.append_child(&li, doc.create_text("one"));
        doc.append_child(&ul, li);

        let mut fb = fb(10, 2);
        DocumentView::default().paint(&ul, &mut fb);
        assert_eq!(fb.row_text(0), "- one");
    }

    #[test]
    fn checkbox_reflects_the_checked_property() {
        let doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(&input, "type", "checkbox");
        doc.set_property(&input, "checked", true);

        let mut fb = fb(5, 1);
        DocumentView::default().paint(&input, &mut fb);
        assert_eq!(fb.row_text(0), "[x]");
    }

    #[test]
    fn vector_elements_are_skipped() {
        let doc = Document::new();
        let root = doc.create_element("div");
        let svg = doc.create_element("svg");
        doc.append_child(&svg, doc.create_text("ignored"));
        doc.append_child(&root, svg);
        doc.append_child(&root, doc.create_text("shown"));

        let mut fb = fb(10, 2);
        DocumentView::default().paint(&root, &mut fb);
        assert_eq!(fb.row_text(0), "shown");
    }
}
