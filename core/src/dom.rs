//! In-memory page model.
//!
//! # Design
//! A `Document` is a tree of `Element` and text nodes rooted at `body`.
//! Lookups go through a small CSS subset (`tag`, `#id`, `.class`, compounds
//! of those, and descendant combinators). Mutable lookups first resolve a
//! child-index path with a shared borrow, then walk that path mutably.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("invalid selector {selector:?}: unexpected {found:?}")]
    Unexpected { selector: String, found: char },

    #[error("invalid selector {selector:?}: missing name after {marker:?}")]
    MissingName { selector: String, marker: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn prepend_child(&mut self, child: Element) {
        self.children.insert(0, Node::Element(child));
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Replace all children with a single text node. The text is never
    /// interpreted as markup.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value, true));
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(&escape(t, false)),
                Node::Element(e) => e.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    /// Remove every descendant element matching `predicate`, at any depth.
    pub fn remove_where<F: Fn(&Element) -> bool>(&mut self, predicate: &F) -> usize {
        let before = self.children.len();
        self.children
            .retain(|n| !matches!(n, Node::Element(e) if predicate(e)));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            if let Node::Element(e) = child {
                removed += e.remove_where(predicate);
            }
        }
        removed
    }

    fn element_at(&self, index: usize) -> Option<&Element> {
        match self.children.get(index) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        }
    }

    fn element_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        match self.children.get_mut(index) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        }
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// The page, rooted at its `body` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn with_body(body: Element) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    /// First element in document order matching `selector`, body included.
    pub fn query_selector(&self, selector: &str) -> Result<Option<&Element>, SelectorError> {
        let selector: Selector = selector.parse()?;
        let Some(path) = self.find_path(&selector) else {
            return Ok(None);
        };
        let mut current = &self.body;
        for i in path {
            match current.element_at(i) {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn query_selector_mut(&mut self, selector: &str) -> Result<Option<&mut Element>, SelectorError> {
        let selector: Selector = selector.parse()?;
        let Some(path) = self.find_path(&selector) else {
            return Ok(None);
        };
        let mut current = &mut self.body;
        for i in path {
            match current.element_at_mut(i) {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn remove_where<F: Fn(&Element) -> bool>(&mut self, predicate: F) -> usize {
        self.body.remove_where(&predicate)
    }

    pub fn to_html(&self) -> String {
        self.body.to_html()
    }

    fn find_path(&self, selector: &Selector) -> Option<Vec<usize>> {
        let mut ancestors = Vec::new();
        let mut path = Vec::new();
        if search(&self.body, selector, &mut ancestors, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

fn search<'a>(
    el: &'a Element,
    selector: &Selector,
    ancestors: &mut Vec<&'a Element>,
    path: &mut Vec<usize>,
) -> bool {
    if selector.matches(el, ancestors) {
        return true;
    }
    ancestors.push(el);
    for (i, child) in el.children.iter().enumerate() {
        if let Node::Element(child) = child {
            path.push(i);
            if search(child, selector, ancestors, path) {
                return true;
            }
            path.pop();
        }
    }
    ancestors.pop();
    false
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != el.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| el.has_class(c))
    }
}

/// Descendant chain of compound selectors, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    fn matches(&self, el: &Element, ancestors: &[&Element]) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(el) {
            return false;
        }
        // Nearest-ancestor-first greedy matching is exact for descendant
        // combinators.
        let mut remaining = rest.iter().rev().peekable();
        for ancestor in ancestors.iter().rev() {
            match remaining.peek() {
                Some(part) if part.matches(ancestor) => {
                    remaining.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        remaining.peek().is_none()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(|part| parse_compound(s, part))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(selector: &str, part: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    let first = chars.peek().copied();
    match first {
        Some('*') => {
            chars.next();
        }
        Some(c) if is_name_char(c) => {
            let mut tag = String::new();
            while let Some(&c) = chars.peek().filter(|c| is_name_char(**c)) {
                tag.push(c.to_ascii_lowercase());
                chars.next();
            }
            compound.tag = Some(tag);
        }
        _ => {}
    }

    while let Some(marker) = chars.next() {
        if marker != '#' && marker != '.' {
            return Err(SelectorError::Unexpected {
                selector: selector.to_string(),
                found: marker,
            });
        }
        let mut name = String::new();
        while let Some(&c) = chars.peek().filter(|c| is_name_char(**c)) {
            name.push(c);
            chars.next();
        }
        if name.is_empty() {
            return Err(SelectorError::MissingName {
                selector: selector.to_string(),
                marker,
            });
        }
        if marker == '#' {
            compound.id = Some(name);
        } else {
            compound.classes.push(name);
        }
    }

    Ok(compound)
}
