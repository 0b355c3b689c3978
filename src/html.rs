use crate::config::Config;
use crate::node::{Document, List, Node, Style};
use crate::strings::{escape_attribute, escape_html};

/// Convert a document to HTML. All text from the input is escaped.
pub fn document_to_html(document: &Document, config: &Config) -> String {
    let mut out = String::new();

    if config.html.root_class.is_empty() {
        out.push_str("<div>");
    } else {
        out.push_str("<div class=\"");
        out.push_str(&escape_attribute(&config.html.root_class));
        out.push_str("\">");
    }
    block_break(config, &mut out);

    nodes_to_html(&document.children, config, &mut out);

    out.push_str("</div>");
    block_break(config, &mut out);
    out
}

fn block_break(config: &Config, out: &mut String) {
    if config.html.newlines {
        out.push('\n');
    }
}

fn nodes_to_html(nodes: &[Node], config: &Config, out: &mut String) {
    for node in nodes {
        node_to_html(node, config, out);
    }
}

fn node_to_html(node: &Node, config: &Config, out: &mut String) {
    match node {
        Node::TextRun { content } => {
            out.push_str(&escape_html(content));
        }
        Node::Paragraph { children } => {
            out.push_str("<p>");
            nodes_to_html(children, config, out);
            out.push_str("</p>");
            block_break(config, out);
        }
        Node::List(list) => {
            list_to_html(list, config, out);
        }
        Node::StyleSpan { style, children } => {
            if config.html.semantic_tags {
                let tag = style_tag(*style);
                out.push('<');
                out.push_str(tag);
                out.push('>');
                nodes_to_html(children, config, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            } else {
                out.push_str("<span style=\"");
                out.push_str(style.css());
                out.push_str("\">");
                nodes_to_html(children, config, out);
                out.push_str("</span>");
            }
        }
        Node::Link { url, display_text } => {
            out.push_str("<a href=\"");
            out.push_str(&escape_attribute(url));
            out.push('"');
            if let Some(target) = &config.links.target {
                out.push_str(" target=\"");
                out.push_str(&escape_attribute(target));
                out.push('"');
            }
            if config.links.nofollow {
                out.push_str(" rel=\"nofollow\"");
            }
            out.push('>');
            out.push_str(&escape_html(display_text));
            out.push_str("</a>");
        }
    }
}

fn list_to_html(list: &List, config: &Config, out: &mut String) {
    out.push_str("<ul>");
    block_break(config, out);
    for item in &list.items {
        out.push_str("<li>");
        nodes_to_html(&item.children, config, out);
        out.push_str("</li>");
        block_break(config, out);
    }
    out.push_str("</ul>");
    block_break(config, out);
}

fn style_tag(style: Style) -> &'static str {
    match style {
        Style::Italic => "i",
        Style::Bold => "b",
        Style::Underline => "u",
    }
}
