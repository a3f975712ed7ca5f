//! In-memory page document.
//!
//! `Page` stands in for the browser document: an element tree with classes, attributes,
//! inline style and text or rich-text content. Pages are loaded from and written back to
//! JSON snapshots (`ElementSnapshot`).

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::ir::RichText;

/// Errors raised while loading or writing page snapshots.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read page snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse page snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Operations the translator needs from a document.
///
/// Implemented by [`Page`]; a browser binding would implement it over the live DOM.
pub trait Document {
    /// Handle to one element.
    type Node: Copy + Eq + std::fmt::Debug;

    /// The root element (`<html>`), which carries the `lang` attribute.
    fn document_element(&self) -> Self::Node;

    /// Elements carrying `name`, in document order.
    fn elements_with_attribute(&self, name: &str) -> Vec<Self::Node>;

    /// Elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    fn text_content(&self, node: Self::Node) -> String;

    /// Replaces the element's content with literal text.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Replaces the element's content with structured inline markup.
    fn set_rich_text(&mut self, node: Self::Node, markup: RichText);

    fn toggle_class(&mut self, node: Self::Node, class: &str, on: bool);
}

/// Handle to an element of a [`Page`].
///
/// Nodes are numbered in document (pre-)order of the snapshot they were loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Own content of an element, besides its child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Rich(RichText),
}

/// Serialized form of an element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// One element stored in the page arena.
#[derive(Debug, Clone, Default)]
struct Element {
    /// Lowercase tag name.
    tag: String,
    /// Class list.
    classes: BTreeSet<String>,
    /// Attributes, including `id`.
    attributes: BTreeMap<String, String>,
    /// Inline style properties.
    style: BTreeMap<String, String>,
    /// Own text or markup.
    content: Content,
    /// The `hidden` flag.
    hidden: bool,
    /// Parent element (none for the root).
    parent: Option<NodeId>,
    /// Child elements in order.
    children: Vec<NodeId>,
}

/// In-memory page document.
#[derive(Debug, Clone)]
pub struct Page {
    /// Element arena; detached elements stay allocated but unreachable from the root.
    elements: Vec<Element>,
    /// The `<body>` element, or the root when the snapshot has none.
    body: NodeId,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Empty `<html><body></body></html>` page.
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(&ElementSnapshot::new("html").child(ElementSnapshot::new("body")))
    }

    /// Builds a page whose root element is `root`.
    #[must_use]
    pub fn from_snapshot(root: &ElementSnapshot) -> Self {
        let mut page = Self { elements: Vec::new(), body: NodeId(0) };
        page.insert_subtree(root, None);
        let body = page
            .descendants(page.root())
            .into_iter()
            .find(|&node| page.tag(node) == "body")
            .unwrap_or_else(|| page.root());
        page.body = body;
        page
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let snapshot: ElementSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(&snapshot))
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        tracing::debug!("Loading page snapshot from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the reachable tree back into a snapshot.
    #[must_use]
    pub fn to_snapshot(&self) -> ElementSnapshot {
        self.snapshot_of(self.root())
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    fn insert_subtree(&mut self, snapshot: &ElementSnapshot, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.elements.len());
        let mut attributes = snapshot.attributes.clone();
        if let Some(element_id) = &snapshot.id {
            attributes.insert("id".to_string(), element_id.clone());
        }
        let content = match (&snapshot.html, &snapshot.text) {
            (Some(html), _) => Content::Rich(RichText::parse(html)),
            (None, Some(text)) => Content::Text(text.clone()),
            (None, None) => Content::Empty,
        };

        self.elements.push(Element {
            tag: snapshot.tag.to_ascii_lowercase(),
            classes: snapshot.classes.iter().cloned().collect(),
            attributes,
            style: snapshot.style.clone(),
            content,
            hidden: snapshot.hidden,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent
            && let Some(element) = self.elements.get_mut(parent.0)
        {
            element.children.push(id);
        }

        for child in &snapshot.children {
            self.insert_subtree(child, Some(id));
        }
        id
    }

    fn snapshot_of(&self, node: NodeId) -> ElementSnapshot {
        let Some(element) = self.get(node) else {
            return ElementSnapshot::default();
        };
        let mut attributes = element.attributes.clone();
        let id = attributes.remove("id");
        let (text, html) = match &element.content {
            Content::Empty => (None, None),
            Content::Text(text) => (Some(text.clone()), None),
            Content::Rich(rich) => (None, Some(rich.to_html())),
        };

        ElementSnapshot {
            tag: element.tag.clone(),
            id,
            classes: element.classes.iter().cloned().collect(),
            attributes,
            style: element.style.clone(),
            text,
            html,
            hidden: element.hidden,
            children: element.children.iter().map(|&child| self.snapshot_of(child)).collect(),
        }
    }

    fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0)
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(node)
            .map(|element| element.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(element) = self.get(current) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every reachable element in document order, root included.
    #[must_use]
    pub fn all(&self) -> Vec<NodeId> {
        let mut out = vec![self.root()];
        out.extend(self.descendants(self.root()));
        out
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|element| element.children.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|element| element.parent)
    }

    /// Every element carrying `class`, in document order.
    #[must_use]
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.all().into_iter().filter(|&node| self.has_class(node, class)).collect()
    }

    /// Descendants of `scope` carrying `class`.
    #[must_use]
    pub fn with_class_in(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|&node| self.has_class(node, class)).collect()
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.all().into_iter().find(|&node| self.attr(node, "id") == Some(id))
    }

    /// Elements carrying attribute `name`, in document order.
    #[must_use]
    pub fn with_attr(&self, name: &str) -> Vec<NodeId> {
        self.all().into_iter().filter(|&node| self.attr(node, name).is_some()).collect()
    }

    #[must_use]
    pub fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.all().into_iter().find(|&node| self.has_class(node, class))
    }

    #[must_use]
    pub fn first_with_class_in(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|&node| self.has_class(node, class))
    }

    /// Nearest inclusive ancestor of `node` carrying `class`.
    #[must_use]
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Whether `node` is `ancestor` or lies inside it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        self.get(node).map_or("", |element| element.tag.as_str())
    }

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).and_then(|element| element.attributes.get(name)).map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.get_mut(node) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// `data-*` attribute lookup (`data(node, "speed")` reads `data-speed`).
    #[must_use]
    pub fn data(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attr(node, &format!("data-{name}"))
    }

    pub fn set_data(&mut self, node: NodeId, name: &str, value: &str) {
        self.set_attr(node, &format!("data-{name}"), value);
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node).is_some_and(|element| element.classes.contains(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes.remove(class);
        }
    }

    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.get(node).and_then(|element| element.style.get(property)).map(String::as_str)
    }

    /// Sets an inline style property; an empty value clears it.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.get_mut(node) {
            if value.is_empty() {
                element.style.remove(property);
            } else {
                element.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|element| element.hidden)
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(element) = self.get_mut(node) {
            element.hidden = hidden;
        }
    }

    #[must_use]
    pub fn content(&self, node: NodeId) -> Option<&Content> {
        self.get(node).map(|element| &element.content)
    }

    /// Replaces all content of `node`, detaching its child elements.
    fn replace_content(&mut self, node: NodeId, content: Content) {
        let detached = self.get_mut(node).map(|element| {
            element.content = content;
            std::mem::take(&mut element.children)
        });
        for child in detached.unwrap_or_default() {
            if let Some(element) = self.get_mut(child) {
                element.parent = None;
            }
        }
    }

    /// Concatenated text of `node` and its descendants.
    #[must_use]
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.get(node) else {
            return;
        };
        match &element.content {
            Content::Empty => {}
            Content::Text(text) => out.push_str(text),
            Content::Rich(rich) => out.push_str(&rich.plain_text()),
        }
        for &child in &element.children {
            self.collect_text(child, out);
        }
    }
}

impl Document for Page {
    type Node = NodeId;

    fn document_element(&self) -> NodeId {
        self.root()
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.with_attr(name)
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.with_class(class)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.by_id(id)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attr(node, name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.set_attr(node, name, value);
    }

    fn text_content(&self, node: NodeId) -> String {
        self.text(node)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.replace_content(node, Content::Text(text.to_string()));
    }

    fn set_rich_text(&mut self, node: NodeId, markup: RichText) {
        self.replace_content(node, Content::Rich(markup));
    }

    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        self.set_class(node, class, on);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn sample() -> Page {
        Page::from_snapshot(
            &ElementSnapshot::new("html").attr("lang", "pt").child(
                ElementSnapshot::new("body")
                    .child(
                        ElementSnapshot::new("section")
                            .class("about-content")
                            .child(ElementSnapshot::new("h2").class("reveal").text("SOBRE MIM"))
                            .child(
                                ElementSnapshot::new("p")
                                    .class("reveal")
                                    .html("toda <em>boa</em> história"),
                            ),
                    )
                    .child(ElementSnapshot::new("a").id("cv-link").attr("href", "#")),
            ),
        )
    }

    #[googletest::test]
    fn test_nodes_are_numbered_in_document_order() {
        let page = sample();

        expect_that!(page.tag(NodeId::new(0)), eq("html"));
        expect_that!(page.tag(NodeId::new(1)), eq("body"));
        expect_that!(page.tag(NodeId::new(2)), eq("section"));
        expect_that!(page.tag(NodeId::new(3)), eq("h2"));
        expect_that!(page.tag(NodeId::new(5)), eq("a"));
        expect_that!(page.body(), eq(NodeId::new(1)));
    }

    #[googletest::test]
    fn test_queries() {
        let page = sample();
        let section = NodeId::new(2);

        expect_that!(page.with_class_in(section, "reveal"), elements_are![
            eq(&NodeId::new(3)),
            eq(&NodeId::new(4))
        ]);
        expect_that!(page.element_by_id("cv-link"), some(eq(NodeId::new(5))));
        expect_that!(page.closest_with_class(NodeId::new(4), "about-content"), some(eq(section)));
        expect_that!(page.contains(section, NodeId::new(3)), eq(true));
        expect_that!(page.contains(section, NodeId::new(5)), eq(false));
        expect_that!(page.elements_with_attribute("href"), elements_are![eq(&NodeId::new(5))]);
    }

    #[googletest::test]
    fn test_text_content_flattens_markup_and_children() {
        let page = sample();

        expect_that!(page.text(NodeId::new(4)), eq("toda boa história"));
        expect_that!(page.text(NodeId::new(2)), eq("SOBRE MIMtoda boa história"));
    }

    #[googletest::test]
    fn test_set_text_detaches_children() {
        let mut page = sample();
        let section = NodeId::new(2);

        page.set_text(section, "replaced");

        expect_that!(page.children(section), is_empty());
        expect_that!(page.text(section), eq("replaced"));
        expect_that!(page.elements_with_class("reveal"), is_empty());
        expect_that!(page.parent(NodeId::new(3)), none());
    }

    #[googletest::test]
    fn test_style_empty_value_clears_property() {
        let mut page = sample();
        let body = page.body();

        page.set_style(body, "overflow", "hidden");
        expect_that!(page.style(body, "overflow"), some(eq("hidden")));

        page.set_style(body, "overflow", "");
        expect_that!(page.style(body, "overflow"), none());
    }

    #[googletest::test]
    fn test_snapshot_json_round_trip_keeps_structure() {
        let page = sample();

        let json = page.to_json_pretty().unwrap();
        let reloaded = Page::from_json(&json).unwrap();

        assert_eq!(reloaded.to_snapshot(), page.to_snapshot());
        expect_that!(json, contains_substring("\"html\": \"toda <em>boa</em> história\""));
        expect_that!(json, contains_substring("\"id\": \"cv-link\""));
    }

    #[googletest::test]
    fn test_page_without_body_uses_root() {
        let page = Page::from_snapshot(&ElementSnapshot::new("html"));

        expect_that!(page.body(), eq(page.root()));
    }

    #[googletest::test]
    fn test_invalid_json_is_an_error() {
        let result = Page::from_json("{not json");

        assert_that!(result, err(anything()));
    }
}
