//! # Stemdraw SVG
//!
//! A small SVG document builder. Domain modules assemble diagrams from
//! [`SvgElement`]s and serialize them through [`SvgDocument::render`];
//! there is no external SVG dependency, the output is plain XML text.

use std::fmt::Write as _;

mod path;

pub use path::PathBuilder;

/// Escape a string for use in XML text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a string for use in an XML attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a coordinate without trailing noise: `12` rather than `12.000`.
pub fn fmt_coord(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// One SVG element: tag, attributes, children and optional text content.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<SvgElement>,
    text: Option<String>,
    raw: Option<String>,
}

impl SvgElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
            raw: None,
        }
    }

    /// Set an attribute, builder style. Values are escaped on render.
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.push((key.into(), value.to_string()));
        self
    }

    /// Set the text content. Replaces any existing content.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    /// Embed pre-rendered SVG markup verbatim, without escaping.
    ///
    /// Used to inline primitive library fragments. The caller is
    /// responsible for the fragment being well-formed.
    pub fn raw(mut self, markup: impl Into<String>) -> Self {
        self.raw = Some(markup.into());
        self
    }

    /// Append a child element.
    pub fn child(mut self, child: SvgElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn children(mut self, children: impl IntoIterator<Item = SvgElement>) -> Self {
        self.children.extend(children);
        self
    }

    fn write_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        let _ = write!(out, "{}<{}", pad, self.tag);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, escape_attr(value));
        }
        if self.children.is_empty() && self.text.is_none() && self.raw.is_none() {
            out.push_str("/>\n");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        if let Some(raw) = &self.raw {
            out.push_str(raw);
        }
        if !self.children.is_empty() {
            out.push('\n');
            for child in &self.children {
                child.write_into(out, indent + 1);
            }
            out.push_str(&pad);
        }
        let _ = write!(out, "</{}>\n", self.tag);
    }
}

// Shape constructors used throughout the domain modules.

/// `<line>` between two points.
pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> SvgElement {
    SvgElement::new("line")
        .attr("x1", fmt_coord(x1))
        .attr("y1", fmt_coord(y1))
        .attr("x2", fmt_coord(x2))
        .attr("y2", fmt_coord(y2))
}

/// `<circle>` centered at (cx, cy).
pub fn circle(cx: f64, cy: f64, r: f64) -> SvgElement {
    SvgElement::new("circle")
        .attr("cx", fmt_coord(cx))
        .attr("cy", fmt_coord(cy))
        .attr("r", fmt_coord(r))
}

/// `<rect>` with its top-left corner at (x, y).
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> SvgElement {
    SvgElement::new("rect")
        .attr("x", fmt_coord(x))
        .attr("y", fmt_coord(y))
        .attr("width", fmt_coord(width))
        .attr("height", fmt_coord(height))
}

/// `<text>` anchored at (x, y).
pub fn text(x: f64, y: f64, content: impl Into<String>) -> SvgElement {
    SvgElement::new("text")
        .attr("x", fmt_coord(x))
        .attr("y", fmt_coord(y))
        .text(content)
}

/// `<g>` group element.
pub fn group() -> SvgElement {
    SvgElement::new("g")
}

/// A complete SVG document with a fixed viewBox.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    elements: Vec<SvgElement>,
    defs: Vec<SvgElement>,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
        }
    }

    /// Add a `<defs>` entry (markers, gradients).
    pub fn add_def(&mut self, def: SvgElement) {
        self.defs.push(def);
    }

    pub fn add(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// A standard arrowhead marker usable via `marker-end="url(#arrow)"`.
    pub fn arrow_marker() -> SvgElement {
        SvgElement::new("marker")
            .attr("id", "arrow")
            .attr("viewBox", "0 0 10 10")
            .attr("refX", "9")
            .attr("refY", "5")
            .attr("markerWidth", "7")
            .attr("markerHeight", "7")
            .attr("orient", "auto-start-reverse")
            .child(
                SvgElement::new("path")
                    .attr("d", "M 0 0 L 10 5 L 0 10 z")
                    .attr("fill", "context-stroke"),
            )
    }

    /// Serialize to SVG text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = fmt_coord(self.width),
            h = fmt_coord(self.height),
        );
        if !self.defs.is_empty() {
            out.push_str("  <defs>\n");
            for def in &self.defs {
                def.write_into(&mut out, 2);
            }
            out.push_str("  </defs>\n");
        }
        for element in &self.elements {
            element.write_into(&mut out, 1);
        }
        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_empty_document() {
        let doc = SvgDocument::new(100.0, 50.0);
        let svg = doc.render();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn renders_nested_elements() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.add(group().child(circle(5.0, 5.0, 2.0).attr("fill", "none")));
        let svg = doc.render();
        assert!(svg.contains("<g>"));
        assert!(svg.contains("<circle cx=\"5\" cy=\"5\" r=\"2\" fill=\"none\"/>"));
    }

    #[test]
    fn escapes_text_and_attributes() {
        let el = text(0.0, 0.0, "R < 100 & R > 10").attr("data-label", "a\"b");
        let mut out = String::new();
        el.write_into(&mut out, 0);
        assert!(out.contains("R &lt; 100 &amp; R &gt; 10"));
        assert!(out.contains("data-label=\"a&quot;b\""));
    }

    #[test]
    fn coordinates_drop_integral_decimals() {
        assert_eq!(fmt_coord(12.0), "12");
        assert_eq!(fmt_coord(12.345), "12.35");
        assert_eq!(fmt_coord(-3.0), "-3");
    }

    #[test]
    fn raw_markup_is_not_escaped() {
        let el = group()
            .attr("transform", "translate(10,20)")
            .raw("<line x1=\"0\" y1=\"0\" x2=\"5\" y2=\"0\"/>");
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.add(el);
        let svg = doc.render();
        assert!(svg.contains("<g transform=\"translate(10,20)\"><line x1=\"0\""));
    }

    #[test]
    fn defs_render_before_content() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.add_def(SvgDocument::arrow_marker());
        doc.add(line(0.0, 0.0, 5.0, 5.0).attr("marker-end", "url(#arrow)"));
        let svg = doc.render();
        let defs_at = svg.find("<defs>").unwrap();
        let line_at = svg.find("<line").unwrap();
        assert!(defs_at < line_at);
        assert!(svg.contains("id=\"arrow\""));
    }
}
