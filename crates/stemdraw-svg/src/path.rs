//! Builder for SVG path data strings.

use crate::{fmt_coord, SvgElement};

/// Accumulates path commands and produces a `<path>` element.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    d: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, cmd: String) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push_str(&cmd);
    }

    /// Absolute move-to.
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.push(format!("M {} {}", fmt_coord(x), fmt_coord(y)));
        self
    }

    /// Absolute line-to.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.push(format!("L {} {}", fmt_coord(x), fmt_coord(y)));
        self
    }

    /// Quadratic bezier through a control point.
    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.push(format!(
            "Q {} {} {} {}",
            fmt_coord(cx),
            fmt_coord(cy),
            fmt_coord(x),
            fmt_coord(y)
        ));
        self
    }

    /// Close the current subpath.
    pub fn close(mut self) -> Self {
        self.push("Z".to_string());
        self
    }

    /// The accumulated path data.
    pub fn data(&self) -> &str {
        &self.d
    }

    /// Build the `<path>` element.
    pub fn build(self) -> SvgElement {
        SvgElement::new("path").attr("d", self.d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_path_data() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .quad_to(15.0, 5.0, 10.0, 10.0)
            .close();
        assert_eq!(path.data(), "M 0 0 L 10 0 Q 15 5 10 10 Z");
    }

    #[test]
    fn builds_path_element() {
        let mut out = String::new();
        let el = PathBuilder::new().move_to(1.0, 2.0).line_to(3.0, 4.0).build();
        // Render through the element writer
        let doc_el = crate::group().child(el);
        doc_el_write(&doc_el, &mut out);
        assert!(out.contains("<path d=\"M 1 2 L 3 4\"/>"));
    }

    fn doc_el_write(el: &SvgElement, out: &mut String) {
        let mut doc = crate::SvgDocument::new(10.0, 10.0);
        doc.add(el.clone());
        out.push_str(&doc.render());
    }
}
