//! One-pass extraction of every Markdown-derived fact.
//!
//! A single walk over the pulldown event stream fills one
//! [`MarkdownIndex`]; each Markdown scope then reads its array. Inline
//! text is accumulated into runs that end at block boundaries, so one
//! heading, list-item paragraph, table cell or quote line becomes one
//! element.

use std::mem;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use super::helpers::{self, Container, TagStack, TaskMode};

/// Everything the Markdown scopes can ask about one document.
#[derive(Debug, Default, Clone)]
pub struct MarkdownIndex {
    /// Heading text, all levels.
    pub headings: Vec<String>,
    /// Heading text grouped by level (index 0 = h1).
    pub headings_by_level: [Vec<String>; 6],
    /// Fence info strings (languages).
    pub code_infos: Vec<String>,
    /// Code block bodies.
    pub code_bodies: Vec<String>,
    /// Fence info joined with the body, per block.
    pub code_blocks: Vec<String>,
    /// Non-empty code block lines.
    pub code_lines: Vec<String>,
    /// Raw HTML blocks.
    pub html_blocks: Vec<String>,
    /// Block quote text, one element per outermost quote.
    pub blockquotes: Vec<String>,
    /// All table cell text.
    pub table_cells: Vec<String>,
    /// Header-row cell text.
    pub head_cells: Vec<String>,
    /// Body-row cell text.
    pub body_cells: Vec<String>,
    /// Ordered-list item text.
    pub ordered_items: Vec<String>,
    /// Unordered-list item text.
    pub unordered_items: Vec<String>,
    /// Task text, any state.
    pub tasks: Vec<String>,
    /// Completed task text.
    pub tasks_done: Vec<String>,
    /// Incomplete task text.
    pub tasks_todo: Vec<String>,
    /// `==highlighted==` spans from prose text, space-joined; code and
    /// HTML blocks do not contribute.
    pub highlights: Vec<String>,
    /// Image URL and alt text, per image.
    pub images: Vec<String>,
    /// Inline code spans.
    pub inline_code: Vec<String>,
    /// Link URL and text, per link.
    pub links: Vec<String>,
    /// Strong-emphasis spans.
    pub strongs: Vec<String>,
    /// Emphasis spans.
    pub emphases: Vec<String>,
    /// Strikethrough spans.
    pub strikethroughs: Vec<String>,
}

impl MarkdownIndex {
    /// Parses `text` and extracts every scope's array.
    pub fn parse(text: &str) -> Self {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let mut collector = Collector::default();
        for event in Parser::new_ext(text, options) {
            collector.event(event);
        }
        collector.finish()
    }
}

/// An inline span being accumulated (strong, emphasis, link, ...).
#[derive(Debug)]
struct InlineSpan {
    /// What kind of span.
    container: Container,
    /// Destination URL for links and images, empty otherwise.
    url: String,
    /// Collected inner text.
    text: String,
}

/// Walk state for one document.
#[derive(Debug, Default)]
struct Collector {
    /// The index being filled.
    index: MarkdownIndex,
    /// Currently open containers.
    stack: TagStack,
    /// The current inline text run.
    run: String,
    /// Level of the innermost open heading.
    heading: Option<u8>,
    /// Info string and body of the open code block.
    code: Option<(String, String)>,
    /// Body of the open HTML block.
    html: Option<String>,
    /// Text of the outermost open block quote.
    quote: Option<String>,
    /// Block quote nesting depth.
    quote_depth: usize,
    /// Open inline spans, innermost last.
    inline_spans: Vec<InlineSpan>,
    /// Per open list item: is its first text run still pending?
    item_first_run: Vec<bool>,
    /// `==..==` spans collected from prose runs, joined at the end.
    highlight_parts: Vec<String>,
}

impl Collector {
    /// Feeds one event into the walk.
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if !code.is_empty() {
                    self.index.inline_code.push(code.to_string());
                }
                self.text(&code);
            }
            Event::Html(html) => match self.html.as_mut() {
                Some(buffer) => buffer.push_str(&html),
                None => {
                    let trimmed = html.trim();
                    if !trimmed.is_empty() {
                        self.index.html_blocks.push(trimmed.to_string());
                    }
                }
            },
            Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak | Event::HardBreak => self.text("\n"),
            Event::Rule => self.flush_run(),
            _ => {}
        }
    }

    /// Handles a container opening.
    fn start(&mut self, tag: Tag<'_>) {
        let container = match tag {
            Tag::Paragraph => {
                self.flush_run();
                Container::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush_run();
                self.heading = Some(heading_level(level));
                Container::Heading
            }
            Tag::BlockQuote(_) => {
                self.flush_run();
                self.quote_depth += 1;
                if self.quote_depth == 1 {
                    self.quote = Some(String::new());
                }
                Container::BlockQuote
            }
            Tag::CodeBlock(kind) => {
                self.flush_run();
                let info = match kind {
                    pulldown_cmark::CodeBlockKind::Fenced(info) => info.trim().to_string(),
                    pulldown_cmark::CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((info, String::new()));
                Container::CodeBlock
            }
            Tag::HtmlBlock => {
                self.flush_run();
                self.html = Some(String::new());
                Container::HtmlBlock
            }
            Tag::List(start) => {
                self.flush_run();
                // A nested list ends the surrounding item's leading text.
                if let Some(first) = self.item_first_run.last_mut() {
                    *first = false;
                }
                if start.is_some() {
                    Container::OrderedList
                } else {
                    Container::UnorderedList
                }
            }
            Tag::Item => {
                self.flush_run();
                self.item_first_run.push(true);
                Container::Item
            }
            Tag::Table(_) => {
                self.flush_run();
                Container::Table
            }
            Tag::TableHead => {
                self.flush_run();
                Container::TableHead
            }
            Tag::TableRow => {
                self.flush_run();
                Container::TableRow
            }
            Tag::TableCell => {
                self.flush_run();
                Container::TableCell
            }
            Tag::Emphasis => self.open_span(Container::Emphasis, String::new()),
            Tag::Strong => self.open_span(Container::Strong, String::new()),
            Tag::Strikethrough => self.open_span(Container::Strikethrough, String::new()),
            Tag::Link { dest_url, .. } => self.open_span(Container::Link, dest_url.to_string()),
            Tag::Image { dest_url, .. } => self.open_span(Container::Image, dest_url.to_string()),
            _ => {
                self.flush_run();
                Container::Other
            }
        };
        self.stack.push(container);
    }

    /// Opens an inline span.
    fn open_span(&mut self, container: Container, url: String) -> Container {
        self.inline_spans.push(InlineSpan {
            container,
            url,
            text: String::new(),
        });
        container
    }

    /// Handles a container closing. Events nest properly, so the
    /// innermost open container is the one that closes.
    fn end(&mut self) {
        if self.stack.top().is_some_and(Container::is_block) {
            self.flush_run();
        }
        let Some(closed) = self.stack.pop() else {
            return;
        };
        match closed {
            Container::Heading => self.heading = None,
            Container::CodeBlock => {
                if let Some((info, body)) = self.code.take() {
                    self.close_code_block(&info, &body);
                }
            }
            Container::HtmlBlock => {
                if let Some(buffer) = self.html.take() {
                    let trimmed = buffer.trim();
                    if !trimmed.is_empty() {
                        self.index.html_blocks.push(trimmed.to_string());
                    }
                }
            }
            Container::BlockQuote => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    if let Some(buffer) = self.quote.take() {
                        if !buffer.is_empty() {
                            self.index.blockquotes.push(buffer);
                        }
                    }
                }
            }
            Container::Item => {
                self.item_first_run.pop();
            }
            Container::Emphasis
            | Container::Strong
            | Container::Strikethrough
            | Container::Link
            | Container::Image => self.close_span(),
            _ => {}
        }
    }

    /// Finalizes a closed code block.
    fn close_code_block(&mut self, info: &str, body: &str) {
        if !info.is_empty() {
            self.index.code_infos.push(info.to_string());
        }
        if !body.trim().is_empty() {
            self.index.code_bodies.push(body.to_string());
        }
        let block = helpers::info_and_content(info, body);
        if !block.trim().is_empty() {
            self.index.code_blocks.push(block);
        }
        self.index.code_lines.extend(helpers::content_lines(body));
    }

    /// Finalizes the innermost inline span.
    fn close_span(&mut self) {
        let Some(span) = self.inline_spans.pop() else {
            return;
        };
        let entry = helpers::attr_and_content(&span.url, span.text.trim());
        if entry.is_empty() {
            return;
        }
        match span.container {
            Container::Emphasis => self.index.emphases.push(entry),
            Container::Strong => self.index.strongs.push(entry),
            Container::Strikethrough => self.index.strikethroughs.push(entry),
            Container::Link => self.index.links.push(entry),
            Container::Image => self.index.images.push(entry),
            _ => {}
        }
    }

    /// Appends inline text to the current run and all open spans.
    fn text(&mut self, text: &str) {
        if let Some((_, body)) = self.code.as_mut() {
            body.push_str(text);
            return;
        }
        if let Some(buffer) = self.html.as_mut() {
            buffer.push_str(text);
            return;
        }
        self.run.push_str(text);
        for span in self.inline_spans.iter_mut() {
            span.text.push_str(text);
        }
    }

    /// Ends the current inline run and attributes it to every open
    /// collection target.
    fn flush_run(&mut self) {
        let run = mem::take(&mut self.run);
        let text = run.trim();
        if text.is_empty() {
            return;
        }
        self.highlight_parts
            .extend(helpers::highlight_spans(text));
        if let Some(level) = self.heading {
            self.index.headings.push(text.to_string());
            self.index.headings_by_level[usize::from(level) - 1].push(text.to_string());
        }
        if let Some(buffer) = self.quote.as_mut() {
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(text);
        }
        if self.stack.within(Container::TableCell) {
            self.index.table_cells.push(text.to_string());
            if self.stack.within(Container::TableHead) {
                self.index.head_cells.push(text.to_string());
            } else {
                self.index.body_cells.push(text.to_string());
            }
        }
        if self.stack.within(Container::OrderedList) {
            self.index.ordered_items.push(text.to_string());
        }
        if self.stack.within(Container::UnorderedList) {
            self.index.unordered_items.push(text.to_string());
        }
        let task_position = self
            .stack
            .within_path(&[Container::UnorderedList, Container::Item])
            || self.stack.within_path(&[
                Container::UnorderedList,
                Container::Item,
                Container::Paragraph,
            ]);
        if let Some(first) = self.item_first_run.last_mut() {
            if mem::take(first) && task_position {
                self.collect_task(text);
            }
        }
    }

    /// Records a leading item run that parses as a task box.
    fn collect_task(&mut self, text: &str) {
        if let Some(task) = helpers::task_text(TaskMode::Any, text) {
            self.index.tasks.push(task.to_string());
        }
        if let Some(task) = helpers::task_text(TaskMode::Done, text) {
            self.index.tasks_done.push(task.to_string());
        }
        if let Some(task) = helpers::task_text(TaskMode::Todo, text) {
            self.index.tasks_todo.push(task.to_string());
        }
    }

    /// Flushes any trailing run and returns the finished index.
    fn finish(mut self) -> MarkdownIndex {
        self.flush_run();
        if !self.highlight_parts.is_empty() {
            self.index.highlights = vec![self.highlight_parts.join(" ")];
        }
        self.index
    }
}

/// Converts a pulldown heading level to 1-6.
fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_are_grouped_by_level() {
        let index = MarkdownIndex::parse("# Intro\n\ntext\n\n## Setup\n\nmore\n\n# Close\n");
        assert_eq!(index.headings, vec!["Intro", "Setup", "Close"]);
        assert_eq!(index.headings_by_level[0], vec!["Intro", "Close"]);
        assert_eq!(index.headings_by_level[1], vec!["Setup"]);
        assert!(index.headings_by_level[2].is_empty());
    }

    #[test]
    fn heading_text_includes_inline_code() {
        let index = MarkdownIndex::parse("# Using `mdf` today\n");
        assert_eq!(index.headings, vec!["Using mdf today"]);
        assert_eq!(index.inline_code, vec!["mdf"]);
    }

    #[test]
    fn fenced_code_blocks_record_info_body_and_lines() {
        let index = MarkdownIndex::parse("```python\nprint(1)\nprint(2)\n```\n");
        assert_eq!(index.code_infos, vec!["python"]);
        assert_eq!(index.code_bodies, vec!["print(1)\nprint(2)\n"]);
        assert_eq!(index.code_blocks, vec!["python print(1)\nprint(2)\n"]);
        assert_eq!(index.code_lines, vec!["print(1)", "print(2)"]);
    }

    #[test]
    fn indented_code_has_no_info() {
        let index = MarkdownIndex::parse("para\n\n    indented code\n");
        assert!(index.code_infos.is_empty());
        assert_eq!(index.code_bodies.len(), 1);
        assert!(index.code_bodies[0].contains("indented code"));
    }

    #[test]
    fn blockquotes_collect_their_text() {
        let index = MarkdownIndex::parse("> quoted line\n> second line\n\nplain\n");
        assert_eq!(index.blockquotes.len(), 1);
        assert!(index.blockquotes[0].contains("quoted line"));
        assert!(index.blockquotes[0].contains("second line"));
    }

    #[test]
    fn tables_split_head_and_body_cells() {
        let index =
            MarkdownIndex::parse("| Name | Age |\n| --- | --- |\n| Ada | 36 |\n| Alan | 41 |\n");
        assert_eq!(index.head_cells, vec!["Name", "Age"]);
        assert_eq!(index.body_cells, vec!["Ada", "36", "Alan", "41"]);
        assert_eq!(index.table_cells.len(), 6);
    }

    #[test]
    fn list_items_are_split_by_kind() {
        let index = MarkdownIndex::parse("1. first\n2. second\n\n- alpha\n- beta\n");
        assert_eq!(index.ordered_items, vec!["first", "second"]);
        assert_eq!(index.unordered_items, vec!["alpha", "beta"]);
    }

    #[test]
    fn nested_list_text_belongs_to_both_lists() {
        let index = MarkdownIndex::parse("1. outer\n   - inner\n");
        assert!(index.ordered_items.contains(&"outer".to_string()));
        assert!(index.ordered_items.contains(&"inner".to_string()));
        assert_eq!(index.unordered_items, vec!["inner"]);
    }

    #[test]
    fn tasks_split_by_state() {
        let index = MarkdownIndex::parse("- [x] done thing\n- [ ] todo thing\n- plain item\n");
        assert_eq!(index.tasks, vec!["done thing", "todo thing"]);
        assert_eq!(index.tasks_done, vec!["done thing"]);
        assert_eq!(index.tasks_todo, vec!["todo thing"]);
        assert_eq!(
            index.unordered_items,
            vec!["[x] done thing", "[ ] todo thing", "plain item"]
        );
    }

    #[test]
    fn ordered_list_boxes_are_not_tasks() {
        let index = MarkdownIndex::parse("1. [x] looks ticked\n");
        assert!(index.tasks.is_empty());
        assert!(index.tasks_done.is_empty());
    }

    #[test]
    fn inline_spans_are_collected() {
        let index = MarkdownIndex::parse(
            "some **bold** and *soft* and ~~gone~~ with [docs](https://example.com) here\n",
        );
        assert_eq!(index.strongs, vec!["bold"]);
        assert_eq!(index.emphases, vec!["soft"]);
        assert_eq!(index.strikethroughs, vec!["gone"]);
        assert_eq!(index.links, vec!["https://example.com docs"]);
    }

    #[test]
    fn images_record_url_and_alt() {
        let index = MarkdownIndex::parse("![a chart](chart.png)\n");
        assert_eq!(index.images, vec!["chart.png a chart"]);
    }

    #[test]
    fn highlights_join_prose_spans() {
        let index = MarkdownIndex::parse("a ==big== and ==bold== claim\n\nalso ==loud==\n");
        assert_eq!(index.highlights, vec!["big bold loud"]);
        assert!(MarkdownIndex::parse("plain\n").highlights.is_empty());
    }

    #[test]
    fn highlights_ignore_code_and_html_blocks() {
        let index = MarkdownIndex::parse("```\n==fake==\n```\n\n<div>\n==fake==\n</div>\n");
        assert!(index.highlights.is_empty());
        // The fence body keeps the raw text for the code scopes.
        assert_eq!(index.code_bodies, vec!["==fake==\n"]);
    }

    #[test]
    fn html_blocks_are_kept_raw() {
        let index = MarkdownIndex::parse("<div class=\"note\">\nhi\n</div>\n");
        assert_eq!(index.html_blocks.len(), 1);
        assert!(index.html_blocks[0].contains("class=\"note\""));
    }

    #[test]
    fn code_inside_quote_stays_out_of_the_quote() {
        let index = MarkdownIndex::parse("> intro\n>\n> ```sh\n> ls\n> ```\n");
        assert_eq!(index.blockquotes, vec!["intro"]);
        assert_eq!(index.code_infos, vec!["sh"]);
    }

    #[test]
    fn empty_document_has_empty_index() {
        let index = MarkdownIndex::parse("");
        assert!(index.headings.is_empty());
        assert!(index.tasks.is_empty());
        assert!(index.table_cells.is_empty());
    }
}
