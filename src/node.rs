use serde::Serialize;

/// Inline style applied by a `[i]`, `[b]` or `[u]` span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Italic,
    Bold,
    Underline,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Italic, Style::Bold, Style::Underline];

    /// The marker letter used inside the brackets.
    pub fn marker(self) -> char {
        match self {
            Style::Italic => 'i',
            Style::Bold => 'b',
            Style::Underline => 'u',
        }
    }

    pub fn opener(self) -> &'static str {
        match self {
            Style::Italic => "[i]",
            Style::Bold => "[b]",
            Style::Underline => "[u]",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            Style::Italic => "[/i]",
            Style::Bold => "[/b]",
            Style::Underline => "[/u]",
        }
    }

    /// CSS declaration equivalent to this style.
    pub fn css(self) -> &'static str {
        match self {
            Style::Italic => "font-style: italic",
            Style::Bold => "font-weight: bold",
            Style::Underline => "text-decoration: underline",
        }
    }
}

/// A single list item. Nested lists live among its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub children: Vec<Node>,
}

/// An unordered list opened by `depth` leading stars
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub depth: usize,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            items: Vec::new(),
        }
    }
}

/// Output units of the markup pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    TextRun {
        content: String,
    },
    Paragraph {
        children: Vec<Node>,
    },
    List(List),
    StyleSpan {
        style: Style,
        children: Vec<Node>,
    },
    Link {
        url: String,
        display_text: String,
    },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::TextRun {
            content: content.into(),
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        let url = url.into();
        Node::Link {
            display_text: url.clone(),
            url,
        }
    }

    /// Appends the visible text of this node to `out`.
    pub fn push_plain_text(&self, out: &mut String) {
        match self {
            Node::TextRun { content } => out.push_str(content),
            Node::Paragraph { children } | Node::StyleSpan { children, .. } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
            Node::List(list) => {
                for item in &list.items {
                    for child in &item.children {
                        child.push_plain_text(out);
                    }
                }
            }
            Node::Link { display_text, .. } => out.push_str(display_text),
        }
    }
}

/// Root of a parsed text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Flattens the tree to its visible text, one line per top-level node.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let mut line = String::new();
            child.push_plain_text(&mut line);
            lines.push(line);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_markers() {
        for style in Style::ALL {
            assert_eq!(style.opener(), format!("[{}]", style.marker()));
            assert_eq!(style.closer(), format!("[/{}]", style.marker()));
        }
    }

    #[test]
    fn link_display_matches_url() {
        assert_eq!(
            Node::link("http://x.com"),
            Node::Link {
                url: "http://x.com".to_string(),
                display_text: "http://x.com".to_string(),
            }
        );
    }

    #[test]
    fn plain_text_flattens_spans_and_links() {
        let doc = Document {
            children: vec![
                Node::Paragraph {
                    children: vec![
                        Node::text("a "),
                        Node::StyleSpan {
                            style: Style::Bold,
                            children: vec![Node::text("b")],
                        },
                        Node::link("http://c"),
                    ],
                },
                Node::Paragraph {
                    children: vec![Node::text("d")],
                },
            ],
        };
        assert_eq!(doc.plain_text(), "a bhttp://c\nd");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&Node::text("x")).unwrap();
        assert_eq!(json, r#"{"type":"text_run","content":"x"}"#);
    }
}
