//! Built-in scopes over the raw file record.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    cast,
    registry::QualifierSpec,
    validate,
    value::QueryValue,
};

/// Matches any Han-script character.
static HAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}").unwrap());

/// Matches a Markdown image or an HTML `<img>` with a `src`.
static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"!\[.*?\]\(.*\)|<img.*?src=".*?""#).unwrap());

/// The scopes that read the file record directly.
pub(crate) fn scopes() -> Vec<QualifierSpec> {
    vec![
        QualifierSpec::new("default", "content and path", |record| {
            QueryValue::Str(format!("{}\n{}", record.text(), record.path.display()))
        }),
        QualifierSpec::new("path", "file path", |record| {
            QueryValue::Str(record.path.display().to_string())
        })
        .meta(),
        QualifierSpec::new("file", "file name", |record| {
            QueryValue::Str(record.file.clone())
        })
        .meta(),
        QualifierSpec::new("ext", "file extension", |record| {
            QueryValue::Str(record.ext())
        })
        .meta(),
        QualifierSpec::new("content", "file content", |record| {
            QueryValue::Str(record.text().into_owned())
        }),
        QualifierSpec::new("time", "modification day", |record| {
            QueryValue::Day(cast::local_midnight_millis(record.stats.modified))
        })
        .meta()
        .with_validate(validate::date)
        .with_cast(cast::date),
        QualifierSpec::new("size", "size in bytes", |record| {
            QueryValue::Num(record.stats.size as f64)
        })
        .meta()
        .with_validate(validate::size)
        .with_cast(cast::size),
        QualifierSpec::new("linenum", "line count", |record| {
            QueryValue::Num(record.text().split('\n').count() as f64)
        })
        .with_validate(validate::number)
        .with_cast(cast::number),
        QualifierSpec::new("charnum", "character count", |record| {
            QueryValue::Num(record.text().chars().count() as f64)
        })
        .with_validate(validate::number)
        .with_cast(cast::number),
        QualifierSpec::new("chinesenum", "Han character count", |record| {
            QueryValue::Num(HAN.find_iter(&record.text()).count() as f64)
        })
        .with_validate(validate::number)
        .with_cast(cast::number),
        QualifierSpec::new("crlf", "uses CRLF line endings", |record| {
            QueryValue::Bool(record.data.windows(2).any(|pair| pair == b"\r\n"))
        })
        .with_validate(validate::boolean)
        .with_cast(cast::boolean),
        QualifierSpec::new("hasimage", "contains an image", |record| {
            QueryValue::Bool(IMAGE.is_match(&record.text()))
        })
        .with_validate(validate::boolean)
        .with_cast(cast::boolean),
        QualifierSpec::new("haschinese", "contains Han characters", |record| {
            QueryValue::Bool(HAN.is_match(&record.text()))
        })
        .with_validate(validate::boolean)
        .with_cast(cast::boolean),
        QualifierSpec::new("line", "individual lines", |record| {
            QueryValue::List(
                record
                    .text()
                    .split('\n')
                    .map(|line| line.trim().to_string())
                    .collect(),
            )
        }),
    ]
}
