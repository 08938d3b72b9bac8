//! Lossless element tree over the token stream.
//!
//! Each node keeps the exact source bytes it was built from, so
//! [`Document::to_markup`] on an unmodified parse returns the input
//! unchanged. Only text leaves that are explicitly rewritten change bytes.

use super::lexer::{TokenKind, lex};

/// HTML elements that never have content, with or without `/>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

cached_regex!(tag_name_regex, r"^</?([A-Za-z][A-Za-z0-9:_.\-]*)");
cached_regex!(
    attribute_regex,
    r#"([A-Za-z_:][A-Za-z0-9_:.\-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+)))?"#
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    CData,
}

/// A text leaf. `raw` holds the source bytes: entity-encoded for plain text,
/// wrapper included for CDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub raw: String,
    pub kind: TextKind,
}

impl Text {
    /// The character data this leaf renders as.
    pub fn decoded(&self) -> String {
        match self.kind {
            TextKind::Plain => html_escape::decode_html_entities(&self.raw).into_owned(),
            TextKind::CData => self
                .raw
                .strip_prefix("<![CDATA[")
                .map(|body| body.strip_suffix("]]>").unwrap_or(body))
                .unwrap_or(&self.raw)
                .to_string(),
        }
    }

    /// Replaces the leaf's character data, re-encoding it for its kind.
    pub fn set_decoded(&mut self, text: &str) {
        self.raw = match self.kind {
            TextKind::Plain => html_escape::encode_text(text).into_owned(),
            TextKind::CData => format!("<![CDATA[{text}]]>"),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name, namespace prefix included (`ac:structured-macro`).
    pub name: String,
    /// Attribute names lower-cased, values entity-decoded.
    pub attrs: Vec<(String, String)>,
    /// Source text of the opening tag.
    pub open: String,
    /// Source text of the closing tag; empty for leaves and implicitly closed elements.
    pub close: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Text),
    /// Comments, declarations and unmatched closing tags, kept verbatim.
    Raw(String),
}

impl Node {
    pub fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_to(out),
            Node::Text(text) => out.push_str(&text.raw),
            Node::Raw(raw) => out.push_str(raw),
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Flattened character data of this node and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Node::Text(text) => out.push_str(&text.decoded()),
            Node::Raw(_) => {}
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Visits text leaves in document order.
    pub fn text_leaves_mut<'a>(&'a mut self, out: &mut Vec<&'a mut Text>) {
        match self {
            Node::Element(el) => el
                .children
                .iter_mut()
                .for_each(|c| c.text_leaves_mut(out)),
            Node::Text(text) => out.push(text),
            Node::Raw(_) => {}
        }
    }
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.open);
        self.children.iter().for_each(|c| c.write_to(out));
        out.push_str(&self.close);
    }

    /// The element including its own tags.
    pub fn outer_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.write_to(&mut out));
        out
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.collect_text(&mut out));
        out
    }

    /// Child elements, skipping text and raw nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_element().map(|el| (i, el)))
    }

    /// Child-index path to the first descendant element named `name`, in
    /// document order.
    pub fn find(&self, name: &str) -> Option<Vec<usize>> {
        self.find_by(&|el| el.name == name)
    }

    /// Like [`Element::find`], with an arbitrary predicate.
    pub fn find_by(&self, pred: &dyn Fn(&Element) -> bool) -> Option<Vec<usize>> {
        for (i, child) in self.child_elements() {
            if pred(child) {
                return Some(vec![i]);
            }
            if let Some(mut rest) = child.find_by(pred) {
                rest.insert(0, i);
                return Some(rest);
            }
        }
        None
    }

    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let node = self.children.get(*first)?;
        match (rest.is_empty(), node) {
            (true, _) => Some(node),
            (false, Node::Element(el)) => el.descendant(rest),
            (false, _) => None,
        }
    }

    /// Replaces the children with `nodes`. A self-closing element gains an
    /// explicit closing tag so the new content has somewhere to live.
    pub fn replace_children(&mut self, nodes: Vec<Node>) {
        if self.close.is_empty() && !nodes.is_empty() {
            if let Some(open) = self.open.strip_suffix("/>") {
                self.open = format!("{}>", open.trim_end());
            }
            self.close = format!("</{}>", self.name);
        }
        self.children = nodes;
    }

    fn from_open_tag(text: &str) -> Option<Element> {
        let name = tag_name_regex().captures(text)?.get(1)?;
        let rest = &text[name.end()..];
        let attrs = attribute_regex()
            .captures_iter(rest)
            .map(|caps| {
                let key = caps.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map_or("", |m| m.as_str());
                (key, html_escape::decode_html_entities(value).into_owned())
            })
            .collect();
        Some(Element {
            name: name.as_str().to_ascii_lowercase(),
            attrs,
            open: text.to_string(),
            close: String::new(),
            children: Vec::new(),
        })
    }

    fn is_leaf_tag(&self) -> bool {
        self.open.ends_with("/>") || VOID_ELEMENTS.contains(&self.name.as_str())
    }
}

/// A parsed markup document: the top-level node sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Parses markup into a tree. Never fails; malformed input degrades to
    /// text and raw nodes.
    pub fn parse(input: &str) -> Document {
        Document {
            children: parse_nodes(input),
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.write_to(&mut out));
        out
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let node = self.children.get(*first)?;
        match (rest.is_empty(), node) {
            (true, _) => Some(node),
            (false, Node::Element(el)) => el.descendant(rest),
            (false, _) => None,
        }
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for index in rest {
            node = match node {
                Node::Element(el) => el.children.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

/// Parses a markup fragment into a node list.
pub fn parse_nodes(input: &str) -> Vec<Node> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    fn push(stack: &mut [Element], root: &mut Vec<Node>, node: Node) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root.push(node),
        }
    }

    for token in lex(input) {
        match token.kind {
            TokenKind::OpenTag => match Element::from_open_tag(token.text) {
                Some(el) if el.is_leaf_tag() => push(&mut stack, &mut root, Node::Element(el)),
                Some(el) => stack.push(el),
                None => push(&mut stack, &mut root, Node::Raw(token.text.to_string())),
            },
            TokenKind::CloseTag => {
                let name = tag_name_regex()
                    .captures(token.text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_ascii_lowercase());
                let open_at = name
                    .as_deref()
                    .and_then(|name| stack.iter().rposition(|el| el.name == name));
                match open_at {
                    Some(at) => {
                        // Elements opened after the match close implicitly.
                        while stack.len() > at + 1 {
                            if let Some(inner) = stack.pop() {
                                push(&mut stack, &mut root, Node::Element(inner));
                            }
                        }
                        if let Some(mut el) = stack.pop() {
                            el.close = token.text.to_string();
                            push(&mut stack, &mut root, Node::Element(el));
                        }
                    }
                    None => push(&mut stack, &mut root, Node::Raw(token.text.to_string())),
                }
            }
            TokenKind::Text => push(
                &mut stack,
                &mut root,
                Node::Text(Text {
                    raw: token.text.to_string(),
                    kind: TextKind::Plain,
                }),
            ),
            TokenKind::CData => push(
                &mut stack,
                &mut root,
                Node::Text(Text {
                    raw: token.text.to_string(),
                    kind: TextKind::CData,
                }),
            ),
            TokenKind::Other => push(&mut stack, &mut root, Node::Raw(token.text.to_string())),
        }
    }

    while let Some(el) = stack.pop() {
        push(&mut stack, &mut root, Node::Element(el));
    }

    root
}
