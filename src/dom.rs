//! A small in-memory page model.
//!
//! The handlers in this crate never touch HTML strings directly. They mutate
//! [`Element`] trees owned by a [`Document`], and the web layer serialises the
//! document when a page is requested. Clicks are addressed by child-index
//! paths relative to the container that delegates them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use askama::filters::{Escaper, Html};

/// Marks the results container when a search matched nothing.
pub const NOT_FOUND_CLASS: &str = "notFound";
/// Marks the results container when the last search could not be fetched.
pub const FETCH_ERROR_CLASS: &str = "fetchError";
/// Makes the recipe overlay visible.
pub const SHOW_RECIPE_CLASS: &str = "showRecipe";
/// The "Get Recipe" affordance inside a card.
pub const RECIPE_BUTTON_CLASS: &str = "recipe-btn";
/// One result card; carries `data-id`.
pub const MEAL_ITEM_CLASS: &str = "meal-item";
pub const DETAILS_CONTENT_CLASS: &str = "meal-details-content";
/// `data-*` key stamped on the results container each time it is rendered.
pub const GENERATION_KEY: &str = "generation";

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "meta", "link"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(BTreeSet<String>);

impl ClassList {
    pub fn add(&mut self, class: &str) {
        self.0.insert(class.to_string());
    }

    pub fn remove(&mut self, class: &str) {
        self.0.remove(class);
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for class in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(class)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    class_list: ClassList,
    attributes: Vec<(String, String)>,
    dataset: BTreeMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            class_list: ClassList::default(),
            attributes: Vec::new(),
            dataset: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class_list.add(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.dataset.insert(key.to_string(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn class_list(&self) -> &ClassList {
        &self.class_list
    }

    pub fn class_list_mut(&mut self) -> &mut ClassList {
        &mut self.class_list
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn set_data(&mut self, key: &str, value: impl Into<String>) {
        self.dataset.insert(key.to_string(), value.into());
    }

    pub fn dataset(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    /// Child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Equivalent of assigning `innerHTML`: everything previously inside is gone.
    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Resolves a path of child indices. The empty path is `self`; a path that
    /// runs through or ends on a text node resolves to nothing.
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            current = match current.children.get(index)? {
                Node::Element(element) => element,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }

    /// Nearest element carrying `class`, starting at the target itself and
    /// walking up towards (and including) `self`.
    pub fn closest(&self, path: &[usize], class: &str) -> Option<&Element> {
        self.element_at(path)?;
        (0..=path.len())
            .rev()
            .filter_map(|depth| self.element_at(&path[..depth]))
            .find(|element| element.class_list.contains(class))
    }

    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.class_list.contains(class) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find_by_class(class))
    }

    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.class_list.contains(class) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) => element.find_by_class_mut(class),
            Node::Text(_) => None,
        })
    }

    /// Visits every descendant element with its path relative to `self`.
    pub fn for_each_descendant_mut(&mut self, visit: &mut impl FnMut(&[usize], &mut Element)) {
        let mut path = Vec::new();
        self.walk_mut(&mut path, visit);
    }

    fn walk_mut(&mut self, path: &mut Vec<usize>, visit: &mut impl FnMut(&[usize], &mut Element)) {
        for (index, node) in self.children.iter_mut().enumerate() {
            if let Node::Element(element) = node {
                path.push(index);
                visit(path.as_slice(), element);
                element.walk_mut(path, visit);
                path.pop();
            }
        }
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            // Writing into a String cannot fail.
            let _ = write_node(&mut out, node);
        }
        out
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if let Some(id) = &self.id {
            write!(f, " id=\"{}\"", Escaped(id))?;
        }
        if !self.class_list.is_empty() {
            write!(f, " class=\"{}\"", Escaped(&self.class_list.to_string()))?;
        }
        for (key, value) in &self.dataset {
            write!(f, " data-{}=\"{}\"", key, Escaped(value))?;
        }
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, Escaped(value))?;
        }
        f.write_str(">")?;
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return Ok(());
        }
        for node in &self.children {
            write_node(f, node)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

fn write_node(out: &mut impl fmt::Write, node: &Node) -> fmt::Result {
    match node {
        Node::Text(text) => write!(out, "{}", Escaped(text)),
        Node::Element(element) => write!(out, "{element}"),
    }
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Html.write_escaped_str(f, self.0)
    }
}

/// A click delivered to a delegating container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    target: Vec<usize>,
    generation: Option<u64>,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(target: Vec<usize>) -> Self {
        Self {
            target,
            generation: None,
            default_prevented: false,
        }
    }

    /// Ties the click to the container render it was aimed at. A click whose
    /// generation no longer matches the container's stamp refers to cards
    /// that are gone.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Parses a `/`-separated index path such as `2/1/1`.
    pub fn parse(target: &str) -> Option<Self> {
        let path = target
            .split('/')
            .map(|segment| segment.trim().parse::<usize>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(path))
    }

    pub fn target(&self) -> &[usize] {
        &self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Formats a path the way [`ClickEvent::parse`] reads it.
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Hidden,
    Visible,
}

/// The page surface shared by all handlers.
#[derive(Debug, Clone)]
pub struct Document {
    pub search_input: String,
    pub meal_list: Element,
    pub meal_details: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let meal_details = Element::new("div")
            .with_class("meal-details")
            .with_child(
                Element::new("a")
                    .with_id("recipe-close-btn")
                    .with_class("recipe-close-btn")
                    .with_attr("href", "/close")
                    .with_text("\u{2715}"),
            )
            .with_child(Element::new("div").with_class(DETAILS_CONTENT_CLASS));

        Self {
            search_input: String::new(),
            meal_list: Element::new("div").with_id("meal"),
            meal_details,
        }
    }

    pub fn modal_state(&self) -> ModalState {
        if self.meal_details.class_list().contains(SHOW_RECIPE_CLASS) {
            ModalState::Visible
        } else {
            ModalState::Hidden
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Element {
        Element::new("div")
            .with_class(MEAL_ITEM_CLASS)
            .with_data("id", id)
            .with_child(Element::new("div").with_child(Element::new("img").with_attr("src", "x.jpg")))
            .with_child(
                Element::new("div")
                    .with_child(Element::new("h3").with_text("Soup"))
                    .with_child(Element::new("a").with_class(RECIPE_BUTTON_CLASS).with_text("Get Recipe")),
            )
    }

    #[test]
    fn class_list_add_remove_are_idempotent() {
        let mut classes = ClassList::default();
        classes.add("a");
        classes.add("a");
        assert_eq!(classes.to_string(), "a");
        classes.remove("a");
        classes.remove("a");
        assert!(classes.is_empty());
    }

    #[test]
    fn element_at_and_closest_follow_paths() {
        let list = Element::new("div").with_child(card("1")).with_child(card("2"));
        let button = list.element_at(&[1, 1, 1]).unwrap();
        assert!(button.class_list().contains(RECIPE_BUTTON_CLASS));
        let item = list.closest(&[1, 1, 1], MEAL_ITEM_CLASS).unwrap();
        assert_eq!(item.dataset("id"), Some("2"));

        // text node and out-of-range paths resolve to nothing
        assert!(list.element_at(&[1, 1, 0, 0]).is_none());
        assert!(list.element_at(&[5]).is_none());
        assert!(list.closest(&[5, 0], MEAL_ITEM_CLASS).is_none());
    }

    #[test]
    fn serialises_with_escaping_and_void_tags() {
        let el = Element::new("div")
            .with_class("meal-item")
            .with_data("id", "7")
            .with_child(Element::new("img").with_attr("src", "a\"b.jpg"))
            .with_text("Fish & <Chips>");
        assert_eq!(
            el.to_string(),
            "<div class=\"meal-item\" data-id=\"7\"><img src=\"a&#34;b.jpg\">Fish &#38; &#60;Chips&#62;</div>"
        );
        assert_eq!(el.text_content(), "Fish & <Chips>");
    }

    #[test]
    fn replace_children_drops_previous_content() {
        let mut list = Element::new("div").with_child(card("1"));
        list.replace_children(vec![Node::Text("gone".into())]);
        assert_eq!(list.inner_html(), "gone");
        assert_eq!(list.child_elements().count(), 0);
    }

    #[test]
    fn click_paths_parse_and_format() {
        let event = ClickEvent::parse("3/1/1").unwrap();
        assert_eq!(event.target(), &[3, 1, 1]);
        assert_eq!(format_path(event.target()), "3/1/1");
        assert!(!event.default_prevented());
        assert!(ClickEvent::parse("3/x").is_none());
        assert!(ClickEvent::parse("").is_none());
        assert_eq!(event.generation(), None);
        assert_eq!(ClickEvent::new(vec![0]).with_generation(4).generation(), Some(4));
    }

    #[test]
    fn new_document_starts_hidden() {
        let doc = Document::new();
        assert_eq!(doc.modal_state(), ModalState::Hidden);
        assert!(doc.meal_details.find_by_class(DETAILS_CONTENT_CLASS).is_some());
    }
}
