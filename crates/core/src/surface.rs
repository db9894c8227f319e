//! Drawing surfaces.
//!
//! A [`Surface`] is the host's vector canvas: it accepts elements with
//! attribute maps, nested groups, and definitions (clip paths). Painting a
//! frame is the only side-effecting step of a render; everything before it
//! is pure data. [`SvgDocument`] is the retained in-memory implementation
//! that serializes to SVG text.

use std::path::Path;

use crate::error::SceneError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// A vector element: a tag, ordered attributes, and child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing an existing value with the same name.
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value.to_string());
        self
    }

    pub fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// All descendants (including self) with the given tag, in document order.
    pub fn find_all<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        if self.tag == tag {
            out.push(self);
        }
        for c in &self.children {
            c.find_all(tag, out);
        }
    }

    fn write_to(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&format!("{pad}<{}", self.tag));
        for (k, v) in &self.attrs {
            out.push_str(&format!(" {k}=\"{}\"", escape(v)));
        }
        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        for c in &self.children {
            c.write_to(out, indent + 1);
        }
        out.push_str(&format!("{pad}</{}>\n", self.tag));
    }
}

fn escape(value: &str) -> String {
    let mut s = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            c => s.push(c),
        }
    }
    s
}

/// The drawing surface a scene is painted onto.
pub trait Surface {
    /// Sets an attribute on the document root (viewBox, debug tags, ...).
    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Adds a definition (clip path, gradient) referenced by id.
    fn define(&mut self, element: Element);

    /// Opens a group; subsequent elements are appended inside it.
    fn open_group(&mut self, group: Element);

    /// Closes the innermost open group.
    fn close_group(&mut self) -> Result<(), SceneError>;

    /// Appends an element to the innermost open group.
    fn append(&mut self, element: Element);
}

/// Retained SVG document built through the [`Surface`] interface.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    defs: Vec<Element>,
    /// `stack[0]` is the `<svg>` root; the rest are open groups.
    stack: Vec<Element>,
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgDocument {
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            stack: vec![Element::new("svg").attr("xmlns", SVG_NS)],
        }
    }

    /// The root element. Groups still open are not yet attached to it.
    pub fn root(&self) -> &Element {
        &self.stack[0]
    }

    pub fn defs(&self) -> &[Element] {
        &self.defs
    }

    /// Serializes the document. Fails if a group is still open.
    pub fn to_svg_string(&self) -> Result<String, SceneError> {
        if self.stack.len() != 1 {
            return Err(SceneError::UnbalancedGroup(format!(
                "{} group(s) still open",
                self.stack.len() - 1
            )));
        }
        let mut root = self.stack[0].clone();
        if !self.defs.is_empty() {
            let mut defs = Element::new("defs");
            defs.children = self.defs.clone();
            root.children.insert(0, defs);
        }
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        root.write_to(&mut out, 0);
        Ok(out)
    }

    /// Serializes and writes the document to `path`.
    pub fn write(&self, path: &Path) -> Result<(), SceneError> {
        let text = self.to_svg_string()?;
        std::fs::write(path, text).map_err(|e| SceneError::Io(format!("{}: {e}", path.display())))
    }
}

impl Surface for SvgDocument {
    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.stack[0].set_attr(name, value.to_string());
    }

    fn define(&mut self, element: Element) {
        self.defs.push(element);
    }

    fn open_group(&mut self, group: Element) {
        self.stack.push(group);
    }

    fn close_group(&mut self) -> Result<(), SceneError> {
        if self.stack.len() < 2 {
            return Err(SceneError::UnbalancedGroup(
                "close_group without a matching open_group".into(),
            ));
        }
        let group = self.stack.pop().ok_or_else(|| {
            SceneError::UnbalancedGroup("group stack unexpectedly empty".into())
        })?;
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(group);
        }
        Ok(())
    }

    fn append(&mut self, element: Element) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(element);
        }
    }
}
