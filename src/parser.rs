use std::fmt;
use std::sync::LazyLock;

use crate::node::{Document, List, ListItem, Node, Style};

/// Substring that starts a link.
const LINK_PREFIX: &str = "http:";

static DEFAULT_PIPELINE: LazyLock<Pipeline> = LazyLock::new(Pipeline::standard);

/// Parse plain text into a document using the standard pipeline
pub fn parse(plain_text: &str) -> Document {
    DEFAULT_PIPELINE.parse(plain_text)
}

/// One parser in the pipeline.
///
/// A stage consumes the construct it recognizes and hands everything else to
/// [`Pipeline::pass_down`] with its own `position`, which forwards the text to
/// the next stage or, past the last one, appends it as literal text.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, text: &str, parent: &mut Vec<Node>, pipeline: &Pipeline, position: usize);
}

/// Ordered chain of stages. Earlier stages take precedence over later ones.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Lists and paragraphs, then inline styles, then links.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ListParagraphStage),
            Box::new(StyleStage),
            Box::new(LinkStage),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run the whole chain over `plain_text`.
    pub fn parse(&self, plain_text: &str) -> Document {
        log::debug!(
            "parsing {} bytes through {} stages",
            plain_text.len(),
            self.stages.len()
        );
        let mut children = Vec::new();
        match self.stages.first() {
            Some(stage) => stage.parse(plain_text, &mut children, self, 0),
            None => push_text(plain_text, &mut children),
        }
        Document { children }
    }

    /// Hand `text` to the stage after `position`, or append it verbatim once
    /// the end of the chain is reached.
    pub fn pass_down(&self, text: &str, parent: &mut Vec<Node>, position: usize) {
        match self.stages.get(position + 1) {
            Some(stage) => stage.parse(text, parent, self, position + 1),
            None => push_text(text, parent),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

fn push_text(text: &str, parent: &mut Vec<Node>) {
    if !text.is_empty() {
        parent.push(Node::text(text));
    }
}

/// Splits text into lines; leading `*` runs open nested lists, other
/// non-blank lines become paragraphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParagraphStage;

impl Stage for ListParagraphStage {
    fn name(&self) -> &'static str {
        "list-paragraph"
    }

    fn parse(&self, text: &str, parent: &mut Vec<Node>, pipeline: &Pipeline, position: usize) {
        // Open lists, outermost first. A list is attached to its parent once closed.
        let mut open: Vec<List> = Vec::new();

        for line in text.split('\n') {
            // Control characters and spaces only; other Unicode whitespace is content.
            let line = line.trim_matches(|c: char| c <= ' ');
            let content = line.trim_start_matches('*');
            let depth = line.len() - content.len();

            while open.len() > depth {
                close_list(&mut open, parent);
            }
            while open.len() < depth {
                if let Some(top) = open.last_mut() {
                    if top.items.is_empty() {
                        top.items.push(ListItem::default());
                    }
                }
                open.push(List::new(open.len() + 1));
            }

            if let Some(list) = open.last_mut() {
                log::trace!("list item at depth {depth}");
                let mut item = ListItem::default();
                pipeline.pass_down(content, &mut item.children, position);
                list.items.push(item);
            } else if !content.is_empty() {
                let mut children = Vec::new();
                pipeline.pass_down(content, &mut children, position);
                parent.push(Node::Paragraph { children });
            }
        }

        while !open.is_empty() {
            close_list(&mut open, parent);
        }
    }
}

/// Pops the innermost open list into the trailing item of the list enclosing
/// it, or into `root` when it is a top-level list.
fn close_list(open: &mut Vec<List>, root: &mut Vec<Node>) {
    let Some(list) = open.pop() else {
        return;
    };
    match open.last_mut().and_then(|outer| outer.items.last_mut()) {
        Some(item) => item.children.push(Node::List(list)),
        None => root.push(Node::List(list)),
    }
}

/// Turns `[i]`, `[b]` and `[u]` spans into style nodes. Span contents are
/// parsed by this stage again so styles can nest.
///
/// A span's contents hold no closer of its own kind, so a nested span must be
/// of another kind and nesting never goes deeper than the three styles.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleStage;

impl Stage for StyleStage {
    fn name(&self) -> &'static str {
        "style"
    }

    fn parse(&self, text: &str, parent: &mut Vec<Node>, pipeline: &Pipeline, position: usize) {
        let mut scan = MarkerScan::new(text);
        let mut offset = 0;

        loop {
            let Some((style, start)) = scan.leftmost_opener(offset) else {
                pipeline.pass_down(&text[offset..], parent, position);
                return;
            };
            let body_start = start + style.opener().len();

            // Any closer after the opener qualifies, whatever its kind.
            if !scan.any_closer(body_start) {
                pipeline.pass_down(&text[offset..], parent, position);
                return;
            }

            match scan.closer(style, body_start) {
                Some(end) => {
                    log::trace!("{style:?} span at {start}..{end}");
                    pipeline.pass_down(&text[offset..start], parent, position);

                    let mut children = Vec::new();
                    self.parse(&text[body_start..end], &mut children, pipeline, position);
                    parent.push(Node::StyleSpan { style, children });

                    offset = end + style.closer().len();
                }
                None => {
                    // Unterminated opener stays literal; later spans still count.
                    log::trace!("unterminated {style:?} opener at {start}");
                    pipeline.pass_down(&text[offset..body_start], parent, position);
                    offset = body_start;
                }
            }
        }
    }
}

/// Next position of every style marker at or after a forward-moving offset.
///
/// Each marker kind is searched again only once the offset has passed its
/// last known position, so a whole line is scanned a bounded number of times.
struct MarkerScan<'a> {
    text: &'a str,
    openers: [Option<usize>; 3],
    closers: [Option<usize>; 3],
}

impl<'a> MarkerScan<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            openers: Style::ALL.map(|style| text.find(style.opener())),
            closers: Style::ALL.map(|style| text.find(style.closer())),
        }
    }

    fn leftmost_opener(&mut self, from: usize) -> Option<(Style, usize)> {
        let mut leftmost: Option<(Style, usize)> = None;
        for style in Style::ALL {
            let slot = &mut self.openers[style as usize];
            if let Some(index) = next_from(self.text, style.opener(), slot, from) {
                if leftmost.is_none_or(|(_, best)| index < best) {
                    leftmost = Some((style, index));
                }
            }
        }
        leftmost
    }

    fn closer(&mut self, style: Style, from: usize) -> Option<usize> {
        next_from(
            self.text,
            style.closer(),
            &mut self.closers[style as usize],
            from,
        )
    }

    fn any_closer(&mut self, from: usize) -> bool {
        let mut found = false;
        for style in Style::ALL {
            found |= self.closer(style, from).is_some();
        }
        found
    }
}

/// Refreshes `cached` to the first `marker` at or after `from`.
fn next_from(text: &str, marker: &str, cached: &mut Option<usize>, from: usize) -> Option<usize> {
    if let Some(index) = *cached {
        if index < from {
            *cached = text[from..].find(marker).map(|offset| from + offset);
        }
    }
    *cached
}

/// Turns every `http:` run up to the next space into a link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkStage;

impl Stage for LinkStage {
    fn name(&self) -> &'static str {
        "link"
    }

    fn parse(&self, text: &str, parent: &mut Vec<Node>, pipeline: &Pipeline, position: usize) {
        let mut rest = text;
        let mut after_link = false;

        while let Some(start) = rest.find(LINK_PREFIX) {
            let gap = &rest[..start];
            // Whitespace separating two links is dropped.
            if !(after_link && gap.trim().is_empty()) {
                pipeline.pass_down(gap, parent, position);
            }

            let end = rest[start..]
                .find(' ')
                .map_or(rest.len(), |offset| start + offset);
            let url = &rest[start..end];
            log::trace!("link {url}");
            parent.push(Node::link(url));

            rest = &rest[end..];
            after_link = true;
        }

        pipeline.pass_down(rest, parent, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::text(s)
    }

    fn span(style: Style, children: Vec<Node>) -> Node {
        Node::StyleSpan { style, children }
    }

    fn paragraph(children: Vec<Node>) -> Node {
        Node::Paragraph { children }
    }

    fn item(children: Vec<Node>) -> ListItem {
        ListItem { children }
    }

    fn list(depth: usize, items: Vec<ListItem>) -> Node {
        Node::List(List { depth, items })
    }

    #[test]
    fn empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n  ").is_empty());
    }

    #[test]
    fn plain_paragraph_is_trimmed() {
        assert_eq!(
            parse("  hello world  ").children,
            vec![paragraph(vec![text("hello world")])]
        );
    }

    #[test]
    fn each_line_is_a_paragraph() {
        assert_eq!(
            parse("one\n\ntwo").children,
            vec![paragraph(vec![text("one")]), paragraph(vec![text("two")])]
        );
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            parse("*a\n**b\n*c").children,
            vec![list(
                1,
                vec![
                    item(vec![text("a"), list(2, vec![item(vec![text("b")])])]),
                    item(vec![text("c")]),
                ]
            )]
        );
    }

    #[test]
    fn deep_first_line_creates_empty_items() {
        assert_eq!(
            parse("***x").children,
            vec![list(
                1,
                vec![item(vec![list(
                    2,
                    vec![item(vec![list(3, vec![item(vec![text("x")])])])]
                )])]
            )]
        );
    }

    #[test]
    fn stars_only_line_is_empty_item() {
        assert_eq!(
            parse("**").children,
            vec![list(1, vec![item(vec![list(2, vec![item(vec![])])])])]
        );
    }

    #[test]
    fn paragraph_closes_lists() {
        assert_eq!(
            parse("*a\ntext\n*b").children,
            vec![
                list(1, vec![item(vec![text("a")])]),
                paragraph(vec![text("text")]),
                list(1, vec![item(vec![text("b")])]),
            ]
        );
    }

    #[test]
    fn blank_line_closes_lists() {
        assert_eq!(
            parse("*a\n\n*b").children,
            vec![
                list(1, vec![item(vec![text("a")])]),
                list(1, vec![item(vec![text("b")])]),
            ]
        );
    }

    #[test]
    fn non_breaking_space_is_content() {
        assert_eq!(
            parse("\u{a0}x\u{a0}\t").children,
            vec![paragraph(vec![text("\u{a0}x\u{a0}")])]
        );
        assert_eq!(
            parse("\u{a0}*x").children,
            vec![paragraph(vec![text("\u{a0}*x")])]
        );
    }

    #[test]
    fn list_item_content_is_not_retrimmed() {
        assert_eq!(
            parse("* spaced").children,
            vec![list(1, vec![item(vec![text(" spaced")])])]
        );
    }

    #[test]
    fn style_span() {
        assert_eq!(
            parse("x[b]y[/b]z").children,
            vec![paragraph(vec![
                text("x"),
                span(Style::Bold, vec![text("y")]),
                text("z"),
            ])]
        );
    }

    #[test]
    fn nested_styles() {
        assert_eq!(
            parse("[b]a[i]b[/i]c[/b]").children,
            vec![paragraph(vec![span(
                Style::Bold,
                vec![text("a"), span(Style::Italic, vec![text("b")]), text("c")]
            )])]
        );
    }

    #[test]
    fn consecutive_styles() {
        assert_eq!(
            parse("[u]a[/u] and [i]b[/i]").children,
            vec![paragraph(vec![
                span(Style::Underline, vec![text("a")]),
                text(" and "),
                span(Style::Italic, vec![text("b")]),
            ])]
        );
    }

    #[test]
    fn mismatched_closer_is_part_of_span() {
        // Detection accepts any closer kind; the span runs to the matching one.
        assert_eq!(
            parse("[i]a[/b]b[/i]").children,
            vec![paragraph(vec![span(Style::Italic, vec![text("a[/b]b")])])]
        );
    }

    #[test]
    fn opener_without_any_closer_is_literal() {
        assert_eq!(
            parse("[b]bold forever").children,
            vec![paragraph(vec![text("[b]bold forever")])]
        );
    }

    #[test]
    fn unterminated_opener_before_valid_span() {
        assert_eq!(
            parse("[i]x[b]y[/b]").children,
            vec![paragraph(vec![
                text("[i]"),
                text("x"),
                span(Style::Bold, vec![text("y")]),
            ])]
        );
    }

    #[test]
    fn spans_after_unterminated_openers() {
        assert_eq!(
            parse("[u][u]a[b]b[/b][u]c[/u]").children,
            vec![paragraph(vec![span(
                Style::Underline,
                vec![
                    text("[u]"),
                    text("a"),
                    span(Style::Bold, vec![text("b")]),
                    text("[u]c"),
                ]
            )])]
        );
        assert_eq!(
            parse("[i][i]a[u]b[/u]").children,
            vec![paragraph(vec![
                text("[i]"),
                text("[i]"),
                text("a"),
                span(Style::Underline, vec![text("b")]),
            ])]
        );
    }

    #[test]
    fn three_styles_nest() {
        assert_eq!(
            parse("[b][i][u]x[/u][/i][/b]").children,
            vec![paragraph(vec![span(
                Style::Bold,
                vec![span(
                    Style::Italic,
                    vec![span(Style::Underline, vec![text("x")])]
                )]
            )])]
        );
    }

    #[test]
    fn link_with_surrounding_text() {
        assert_eq!(
            parse("see http://x.com now").children,
            vec![paragraph(vec![
                text("see "),
                Node::link("http://x.com"),
                text(" now"),
            ])]
        );
    }

    #[test]
    fn adjacent_links() {
        assert_eq!(
            parse("http://a http://b").children,
            vec![paragraph(vec![Node::link("http://a"), Node::link("http://b")])]
        );
    }

    #[test]
    fn https_is_not_a_link() {
        assert_eq!(
            parse("https://x.com").children,
            vec![paragraph(vec![text("https://x.com")])]
        );
    }

    #[test]
    fn bare_prefix_is_a_link() {
        assert_eq!(
            parse("go http:").children,
            vec![paragraph(vec![text("go "), Node::link("http:")])]
        );
    }

    #[test]
    fn link_inside_style_inside_list() {
        assert_eq!(
            parse("*[b]http://x[/b]").children,
            vec![list(
                1,
                vec![item(vec![span(Style::Bold, vec![Node::link("http://x")])])]
            )]
        );
    }

    #[test]
    fn styles_are_not_parsed_in_link_text() {
        assert_eq!(
            parse("http://x/[b]").children,
            vec![paragraph(vec![Node::link("http://x/[b]")])]
        );
    }

    #[test]
    fn custom_pipeline_without_stages_is_literal() {
        let pipeline = Pipeline::new(Vec::new());
        assert_eq!(
            pipeline.parse("*[b]x[/b]").children,
            vec![text("*[b]x[/b]")]
        );
    }

    #[test]
    fn custom_pipeline_without_styles() {
        let pipeline = Pipeline::new(vec![Box::new(ListParagraphStage), Box::new(LinkStage)]);
        assert_eq!(
            pipeline.parse("[b]http://x[/b]").children,
            vec![paragraph(vec![text("[b]"), Node::link("http://x[/b]")])]
        );
    }

    #[test]
    fn standard_stage_order() {
        assert_eq!(
            Pipeline::default().stage_names(),
            vec!["list-paragraph", "style", "link"]
        );
    }
}
