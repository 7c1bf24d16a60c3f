use std::fmt::Write as _;

use wombat_common::warning::warn_once;
use wombat_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::Token;

/// Void elements: they never have children and are attached as soon as
/// their start tag is seen.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that belong in `<head>` when the document omits it.
pub const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// A recoverable anomaly noticed while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index into the token stream where the anomaly was seen.
    pub token_index: usize,
}

/// Builds a [`DomTree`] from tokens using a stack of unfinished elements.
///
/// An element is allocated when its start tag is seen and attached to its
/// parent only when it is popped. Text and void elements attach right away.
/// The bottom of the stack is always the `html` element, which ends up as
/// [`NodeId::ROOT`].
pub struct HTMLParser {
    tokens: Vec<Token>,
    token_index: usize,
    /// The stack of unfinished elements, outermost first.
    stack: Vec<NodeId>,
    tree: DomTree,
    issues: Vec<ParseIssue>,
    /// Whether `</html>` has already closed the document once.
    html_closed: bool,
}

impl HTMLParser {
    /// Create a parser over a token stream.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            token_index: 0,
            stack: Vec::new(),
            tree: DomTree::new(),
            issues: Vec::new(),
            html_closed: false,
        }
    }

    /// Get all parse issues encountered so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            self.process_token(token);
        }
        self.finish();
        (self.tree, self.issues)
    }

    fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::Text(text) => self.add_text(text),
            Token::StartTag { name, attributes } => self.add_start_tag(&name, attributes),
            Token::EndTag { name } => self.add_end_tag(&name),
            Token::Declaration(_) => {}
        }
    }

    fn add_text(&mut self, text: String) {
        if text.chars().all(char::is_whitespace) {
            return;
        }
        self.implicit_tags(None);
        let node = self.tree.alloc(NodeType::Text(text));
        self.attach_to_current(node);
    }

    fn add_start_tag(&mut self, name: &str, attributes: AttributesMap) {
        self.implicit_tags(Some(name));

        if SELF_CLOSING_TAGS.contains(&name) {
            let node = self.tree.alloc(NodeType::Element(ElementData {
                tag_name: name.to_string(),
                attrs: attributes,
            }));
            self.attach_to_current(node);
            return;
        }

        let reopen = if name == "p" {
            self.close_open_paragraph()
        } else {
            Vec::new()
        };

        self.open_element(ElementData {
            tag_name: name.to_string(),
            attrs: attributes,
        });

        // Re-open the inline elements the paragraph cut short, outermost first.
        for data in reopen.into_iter().rev() {
            self.open_element(data);
        }
    }

    fn add_end_tag(&mut self, name: &str) {
        let marker = format!("/{name}");
        self.implicit_tags(Some(&marker));

        if self.stack.len() <= 1 {
            // The first `</html>` is the document's own closing tag.
            if name == "html" && !self.html_closed {
                self.html_closed = true;
            } else {
                self.parse_warning(&format!("ignored end tag </{name}>, only <html> is open"));
            }
            return;
        }

        if let Some(&current) = self.stack.last()
            && let Some(open) = self.tree.as_element(current)
            && open.tag_name != name
        {
            let message = format!("end tag </{name}> closed <{}>", open.tag_name);
            self.parse_warning(&message);
        }
        self.close_current();
    }

    /// A new `<p>` closes the outermost open paragraph.
    ///
    /// Everything opened inside that paragraph is closed too; copies of
    /// those elements (same tag, same attributes) are returned innermost
    /// first so the caller can re-open them inside the new paragraph.
    fn close_open_paragraph(&mut self) -> Vec<ElementData> {
        let Some(index) = self
            .stack
            .iter()
            .position(|&id| self.tree.is_element(id, "p"))
        else {
            return Vec::new();
        };
        // The html element never closes, even if something named it `p`.
        if index == 0 {
            return Vec::new();
        }

        let mut reopen = Vec::new();
        while self.stack.len() > index + 1 {
            if let Some(&top) = self.stack.last()
                && let Some(data) = self.tree.as_element(top)
            {
                reopen.push(data.clone());
            }
            self.close_current();
        }
        self.close_current();

        if !reopen.is_empty() {
            self.parse_warning("paragraph closed with inline elements still open");
        }
        reopen
    }

    /// Insert the `html`, `head` and `body` elements a document left out,
    /// and close `head` once body content shows up.
    ///
    /// `tag` is the incoming start tag name, `/name` for an end tag, or
    /// `None` for text.
    fn implicit_tags(&mut self, tag: Option<&str>) {
        loop {
            let open: Vec<&str> = self
                .stack
                .iter()
                .filter_map(|&id| self.tree.as_element(id))
                .map(|data| data.tag_name.as_str())
                .collect();
            let is_head_tag = tag.is_some_and(|t| HEAD_TAGS.contains(&t));

            if open.is_empty() && tag != Some("html") {
                self.open_element(ElementData::new("html"));
            } else if open == ["html"] && !matches!(tag, Some("head" | "body" | "/html")) {
                let section = if is_head_tag { "head" } else { "body" };
                self.open_element(ElementData::new(section));
            } else if open == ["html", "head"] && tag != Some("/head") && !is_head_tag {
                self.close_current();
            } else {
                break;
            }
        }
    }

    fn open_element(&mut self, data: ElementData) {
        let node = self.tree.alloc(NodeType::Element(data));
        self.stack.push(node);
    }

    /// Pop the current element and attach it to the one below it.
    fn close_current(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(node) = self.stack.pop() {
            self.attach_to_current(node);
        }
    }

    fn attach_to_current(&mut self, node: NodeId) {
        if let Some(&parent) = self.stack.last() {
            self.tree.append_child(parent, node);
        }
    }

    /// Close everything still open; an empty document still gets
    /// `html > body`.
    fn finish(&mut self) {
        if self.stack.is_empty() {
            self.implicit_tags(None);
        }
        while self.stack.len() > 1 {
            self.close_current();
        }
    }
}

/// Render a subtree as indented text, two spaces per level.
///
/// Elements print as `<tag k="v">` with attributes sorted by name, text as a
/// quoted string.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
            attrs.sort();
            let _ = write!(out, "{prefix}<{}", data.tag_name);
            for (k, v) in attrs {
                let _ = write!(out, " {k}=\"{v}\"");
            }
            out.push_str(">\n");
        }
        NodeType::Text(text) => {
            let _ = writeln!(out, "{prefix}{text:?}");
        }
    }
    for &child in tree.children(id) {
        write_node(tree, child, indent + 1, out);
    }
}

/// Print a DOM tree for debugging, starting at `indent` levels deep.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_node(tree, id, indent, &mut out);
    print!("{out}");
}
