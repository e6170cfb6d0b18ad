//! The Markdown-derived scopes.
//!
//! Each scope reads one array off the memoized [`MarkdownIndex`] for
//! the file, so a query touching several Markdown scopes parses the
//! document once. All of these produce lists and keep the default
//! matchers, whose list arms compare element-wise.

use super::{cache::parsed, index::MarkdownIndex};
use crate::{registry::QualifierSpec, value::QueryValue};

/// Builds a spec whose query picks one array off the parsed index.
fn md(scope: &str, name: &str, pick: fn(&MarkdownIndex) -> Vec<String>) -> QualifierSpec {
    QualifierSpec::new(scope, name, move |record| {
        QueryValue::List(pick(&parsed(&record.text())))
    })
}

/// The scopes that read the parsed Markdown document.
pub(crate) fn scopes() -> Vec<QualifierSpec> {
    let mut specs = vec![
        md("blockcode", "code blocks (info and body)", |index| {
            index.code_blocks.clone()
        }),
        md("blockcodelang", "code fence languages", |index| {
            index.code_infos.clone()
        }),
        md("blockcodebody", "code block bodies", |index| {
            index.code_bodies.clone()
        }),
        md("blockcodeline", "code block lines", |index| {
            index.code_lines.clone()
        }),
        md("blockhtml", "raw HTML blocks", |index| {
            index.html_blocks.clone()
        }),
        md("blockquote", "block quotes", |index| {
            index.blockquotes.clone()
        }),
        md("table", "table cells", |index| index.table_cells.clone()),
        md("thead", "table header cells", |index| {
            index.head_cells.clone()
        }),
        md("tbody", "table body cells", |index| index.body_cells.clone()),
        md("ol", "ordered list items", |index| {
            index.ordered_items.clone()
        }),
        md("ul", "unordered list items", |index| {
            index.unordered_items.clone()
        }),
        md("task", "tasks in any state", |index| index.tasks.clone()),
        md("taskdone", "completed tasks", |index| {
            index.tasks_done.clone()
        }),
        md("tasktodo", "incomplete tasks", |index| {
            index.tasks_todo.clone()
        }),
        md("head", "headings of any level", |index| {
            index.headings.clone()
        }),
        md("image", "images (URL and alt text)", |index| {
            index.images.clone()
        }),
        md("code", "inline code spans", |index| {
            index.inline_code.clone()
        }),
        md("link", "links (URL and text)", |index| index.links.clone()),
        md("strong", "strong emphasis spans", |index| {
            index.strongs.clone()
        }),
        md("em", "emphasis spans", |index| index.emphases.clone()),
        md("del", "strikethrough spans", |index| {
            index.strikethroughs.clone()
        }),
        md("highlight", "highlighted spans", |index| {
            index.highlights.clone()
        }),
    ];
    for level in 1..=6u8 {
        specs.push(QualifierSpec::new(
            format!("h{level}"),
            format!("level {level} headings"),
            move |record| {
                QueryValue::List(
                    parsed(&record.text()).headings_by_level[usize::from(level) - 1].clone(),
                )
            },
        ));
    }
    specs
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::SystemTime};

    use crate::{
        record::{FileRecord, FileStats},
        registry::Registry,
        value::QueryValue,
    };

    fn record(data: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from("doc.md"),
            file: "doc.md".into(),
            stats: FileStats {
                size: data.len() as u64,
                modified: SystemTime::UNIX_EPOCH,
            },
            data: data.as_bytes().to_vec(),
        }
    }

    fn query(scope: &str, data: &str) -> QueryValue {
        Registry::with_defaults()
            .get(scope)
            .unwrap()
            .query(&record(data))
    }

    #[test]
    fn heading_levels_are_separate_scopes() {
        let doc = "# Intro\n\ntext\n\n## Setup\n\nmore\n";
        assert_eq!(
            query("h1", doc),
            QueryValue::List(vec!["Intro".to_string()])
        );
        assert_eq!(
            query("h2", doc),
            QueryValue::List(vec!["Setup".to_string()])
        );
        assert_eq!(query("h3", doc), QueryValue::List(vec![]));
        assert_eq!(
            query("head", doc),
            QueryValue::List(vec!["Intro".to_string(), "Setup".to_string()])
        );
    }

    #[test]
    fn code_scopes_read_the_fence() {
        let doc = "```python\nprint(1)\n```\n";
        assert_eq!(
            query("blockcodelang", doc),
            QueryValue::List(vec!["python".to_string()])
        );
        assert_eq!(
            query("blockcodebody", doc),
            QueryValue::List(vec!["print(1)\n".to_string()])
        );
        assert_eq!(
            query("blockcodeline", doc),
            QueryValue::List(vec!["print(1)".to_string()])
        );
    }

    #[test]
    fn task_scopes_split_by_state() {
        let doc = "- [x] done\n- [ ] todo\n";
        assert_eq!(query("task", doc), QueryValue::List(vec!["done".into(), "todo".into()]));
        assert_eq!(query("taskdone", doc), QueryValue::List(vec!["done".into()]));
        assert_eq!(query("tasktodo", doc), QueryValue::List(vec!["todo".into()]));
    }

    #[test]
    fn highlight_scope_joins_captures() {
        assert_eq!(
            query("highlight", "a ==big== and ==bold== claim\n"),
            QueryValue::List(vec!["big bold".to_string()])
        );
        assert_eq!(query("highlight", "plain\n"), QueryValue::List(vec![]));
    }

    #[test]
    fn highlight_scope_skips_fenced_code() {
        assert_eq!(
            query("highlight", "```\n==fake==\n```\n"),
            QueryValue::List(vec![])
        );
    }
}
