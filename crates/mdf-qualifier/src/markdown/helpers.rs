//! Filter and transform helpers for walking a Markdown event stream.
//!
//! The filters track which containers are open during a preorder walk;
//! the transformers turn collected text into the strings a scope
//! compares against.

use once_cell::sync::Lazy;
use regex::Regex;

/// A task box at the start of a list item: state and text.
static TASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(x|X| )\]\s+(.+)").unwrap());

/// A `==highlighted==` span.
static HIGHLIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"==(.+?)==").unwrap());

/// Structural category of an open container. Payload-free so stack
/// membership checks stay cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    /// A paragraph.
    Paragraph,
    /// A heading of any level (the level is tracked by the collector).
    Heading,
    /// A block quote.
    BlockQuote,
    /// A fenced or indented code block.
    CodeBlock,
    /// A raw HTML block.
    HtmlBlock,
    /// An ordered list.
    OrderedList,
    /// An unordered list.
    UnorderedList,
    /// A list item.
    Item,
    /// A table.
    Table,
    /// A table header section.
    TableHead,
    /// A table body row.
    TableRow,
    /// A table cell.
    TableCell,
    /// Emphasis (`*x*`).
    Emphasis,
    /// Strong emphasis (`**x**`).
    Strong,
    /// Strikethrough (`~~x~~`).
    Strikethrough,
    /// A link.
    Link,
    /// An image.
    Image,
    /// Anything else.
    Other,
}

impl Container {
    /// Whether the container is block-level; closing a block container
    /// ends the current inline run.
    pub(crate) fn is_block(self) -> bool {
        !matches!(
            self,
            Self::Emphasis | Self::Strong | Self::Strikethrough | Self::Link | Self::Image
        )
    }
}

/// The currently open containers, innermost last.
#[derive(Debug, Default)]
pub(crate) struct TagStack {
    /// Open containers in nesting order.
    open: Vec<Container>,
}

impl TagStack {
    /// Opens a container.
    pub(crate) fn push(&mut self, container: Container) {
        self.open.push(container);
    }

    /// Closes the innermost container.
    pub(crate) fn pop(&mut self) -> Option<Container> {
        self.open.pop()
    }

    /// The innermost open container.
    pub(crate) fn top(&self) -> Option<Container> {
        self.open.last().copied()
    }

    /// True while at least one `container` is open.
    pub(crate) fn within(&self, container: Container) -> bool {
        self.open.contains(&container)
    }

    /// True while the innermost containers are exactly `path`, in
    /// nesting order. Distinguishes a task position
    /// (`UnorderedList > Item`) from an ordered-list item.
    pub(crate) fn within_path(&self, path: &[Container]) -> bool {
        self.open.ends_with(path)
    }
}

/// Which task states a scope accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskMode {
    /// Any task box.
    Any,
    /// Completed tasks only (`[x]`).
    Done,
    /// Incomplete tasks only (`[ ]`).
    Todo,
}

/// Parses a task box and returns the task text when the state matches
/// `mode`.
pub(crate) fn task_text(mode: TaskMode, content: &str) -> Option<&str> {
    let captures = TASK.captures(content)?;
    let done = captures.get(1)?.as_str() != " ";
    let wanted = match mode {
        TaskMode::Any => true,
        TaskMode::Done => done,
        TaskMode::Todo => !done,
    };
    if !wanted {
        return None;
    }
    captures.get(2).map(|text| text.as_str())
}

/// Splits content into its non-empty lines.
pub(crate) fn content_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a fence info string and the fence body.
pub(crate) fn info_and_content(info: &str, content: &str) -> String {
    if info.is_empty() {
        content.to_string()
    } else {
        format!("{info} {content}")
    }
}

/// Joins an attribute value (a URL) and the wrapped text.
pub(crate) fn attr_and_content(attr: &str, content: &str) -> String {
    match (attr.is_empty(), content.is_empty()) {
        (true, _) => content.to_string(),
        (false, true) => attr.to_string(),
        (false, false) => format!("{attr} {content}"),
    }
}

/// The `==..==` spans of `content`, space-joined; empty when none.
pub(crate) fn highlight_spans(content: &str) -> Vec<String> {
    captures_joined(&HIGHLIGHT, content)
}

/// The space-joined first capture group of every match of `pattern` in
/// `content`; empty when nothing matches.
pub(crate) fn captures_joined(pattern: &Regex, content: &str) -> Vec<String> {
    let joined = pattern
        .captures_iter(content)
        .filter_map(|captures| captures.get(1))
        .map(|group| group.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        vec![]
    } else {
        vec![joined]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_text_matches_states() {
        assert_eq!(task_text(TaskMode::Any, "[x] ship it"), Some("ship it"));
        assert_eq!(task_text(TaskMode::Done, "[X] ship it"), Some("ship it"));
        assert_eq!(task_text(TaskMode::Done, "[ ] later"), None);
        assert_eq!(task_text(TaskMode::Todo, "[ ] later"), Some("later"));
        assert_eq!(task_text(TaskMode::Todo, "[x] done"), None);
        assert_eq!(task_text(TaskMode::Any, "not a task"), None);
    }

    #[test]
    fn within_path_is_innermost_order() {
        let mut stack = TagStack::default();
        stack.push(Container::UnorderedList);
        stack.push(Container::Item);
        stack.push(Container::Paragraph);
        assert!(stack.within_path(&[Container::Item, Container::Paragraph]));
        assert!(!stack.within_path(&[Container::OrderedList, Container::Item]));
        assert!(stack.within(Container::UnorderedList));
    }

    #[test]
    fn captures_joined_collects_first_groups() {
        let pattern = Regex::new(r"==(.+?)==").unwrap();
        assert_eq!(
            captures_joined(&pattern, "a ==b== c ==d=="),
            vec!["b d".to_string()]
        );
        assert!(captures_joined(&pattern, "plain").is_empty());
    }

    #[test]
    fn highlight_spans_joins_marked_text() {
        assert_eq!(
            highlight_spans("a ==big== and ==bold== claim"),
            vec!["big bold".to_string()]
        );
        assert!(highlight_spans("plain").is_empty());
    }

    #[test]
    fn content_lines_drops_blank_lines() {
        assert_eq!(
            content_lines("print(1)\n\nprint(2)\n"),
            vec!["print(1)".to_string(), "print(2)".to_string()]
        );
    }
}
