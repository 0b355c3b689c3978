pub mod config;
pub mod cookie;
mod html;
pub mod listeners;
pub mod logging;
mod node;
mod parser;
pub mod popup;
pub mod strings;

pub use config::Config;
pub use html::document_to_html;
pub use node::{Document, List, ListItem, Node, Style};
pub use parser::{LinkStage, ListParagraphStage, Pipeline, Stage, StyleStage};

/// Parse plain text into a document tree.
pub fn parse(plain_text: &str) -> Document {
    parser::parse(plain_text)
}

/// Convert plain text to HTML using default config.
pub fn text_to_html(plain_text: &str) -> String {
    text_to_html_with_config(plain_text, &Config::compiled_default())
}

/// Convert plain text to HTML with custom config.
pub fn text_to_html_with_config(plain_text: &str, config: &Config) -> String {
    let document = parse(plain_text);
    html::document_to_html(&document, config)
}
