//! Render Tree
//!
//! Pages describe their output as a tree of nodes instead of mutating a
//! surface directly. Adapters in [`super::html`] and [`super::text`] apply a
//! tree to a concrete surface.

use crate::chart::Figure;

/// One node of a rendered view
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// A chart mount point and the figure drawn into it
    Chart { id: String, figure: Box<Figure> },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn chart(id: impl Into<String>, figure: Figure) -> Self {
        Node::Chart {
            id: id.into(),
            figure: Box::new(figure),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
        Node::Chart { .. } => {}
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Markup element with attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder method: append to the `class` attribute
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        match self.attrs.iter_mut().find(|(name, _)| name == "class") {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(&class);
            }
            None => self.attrs.push(("class".to_string(), class)),
        }
        self
    }

    /// Builder method: set an attribute, replacing any previous value
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Builder method: append a text child
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            collect_text(child, &mut out);
        }
        out
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

/// Ordered top-level nodes of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    nodes: Vec<Node>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    pub fn extend<I, N>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All elements carrying `class`, in document order
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        for node in &self.nodes {
            find_in(node, class, &mut found);
        }
        found
    }

    /// Chart mount points in document order
    pub fn charts(&self) -> Vec<(&str, &Figure)> {
        let mut found = Vec::new();
        for node in &self.nodes {
            charts_in(node, &mut found);
        }
        found
    }

    pub fn text_content(&self) -> String {
        self.nodes.iter().map(Node::text_content).collect()
    }
}

impl From<Node> for View {
    fn from(node: Node) -> Self {
        Self { nodes: vec![node] }
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        Node::from(element).into()
    }
}

fn find_in<'a>(node: &'a Node, class: &str, found: &mut Vec<&'a Element>) {
    if let Node::Element(element) = node {
        if element.has_class(class) {
            found.push(element);
        }
        for child in &element.children {
            find_in(child, class, found);
        }
    }
}

fn charts_in<'a>(node: &'a Node, found: &mut Vec<(&'a str, &'a Figure)>) {
    match node {
        Node::Chart { id, figure } => found.push((id.as_str(), figure.as_ref())),
        Node::Element(element) => {
            for child in &element.children {
                charts_in(child, found);
            }
        }
        Node::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_accumulates() {
        let el = Element::new("div").class("kpi-delta").class("negative");
        assert!(el.has_class("kpi-delta"));
        assert!(el.has_class("negative"));
        assert!(!el.has_class("positive"));
        assert_eq!(el.attribute("class"), Some("kpi-delta negative"));
    }

    #[test]
    fn test_attr_replaces() {
        let el = Element::new("a").attr("href", "#one").attr("href", "#two");
        assert_eq!(el.attributes().len(), 1);
        assert_eq!(el.attribute("href"), Some("#two"));
    }

    #[test]
    fn test_find_and_text() {
        let mut view = View::new();
        view.push(
            Element::new("div")
                .class("kpi-row")
                .child(Element::new("div").class("kpi-value").text("1,000"))
                .child(Element::new("div").class("kpi-value").text("500")),
        );

        let values: Vec<String> = view
            .find_by_class("kpi-value")
            .iter()
            .map(|el| el.text_content())
            .collect();

        assert_eq!(values, vec!["1,000", "500"]);
        assert_eq!(view.text_content(), "1,000500");
    }
}
