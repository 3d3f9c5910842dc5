//! Line-level rules: what a stripped line is and how entries split.

use crate::core::{Record, Section, SectionKind};
use crate::error::{ParseError, ParseResult};

/// A stripped input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty after stripping; ends the current section
    Blank,
    /// `//` comment
    Comment,
    /// Header or data
    Content(&'a str),
}

/// Strip surrounding whitespace and classify the line
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        Line::Blank
    } else if line.starts_with("//") {
        Line::Comment
    } else {
        Line::Content(line)
    }
}

/// Split `key<separator>value` on the first separator.
///
/// Stripping can eat the trailing space of a separator when the value is
/// empty (`Tags:` under a `": "` section); that form yields an empty value.
pub fn split_key_value<'a>(line: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    if let Some(pair) = line.split_once(separator) {
        return Some(pair);
    }
    let stripped = separator.trim_end();
    if stripped.is_empty() || stripped == separator {
        return None;
    }
    line.strip_suffix(stripped).map(|key| (key, ""))
}

/// Add one data line to the section being read.
///
/// A key-value section paired with a record kind has no separator to split
/// on and is reported as a malformed line.
pub(crate) fn push_entry(
    kind: SectionKind,
    section: &mut Section,
    line: &str,
    line_no: usize,
) -> ParseResult<()> {
    let malformed = |separator| ParseError::MalformedLine {
        line: line_no,
        section: kind,
        separator,
        content: line.to_string(),
    };

    match section {
        Section::Records(records) => {
            records.push(Record::from_line(line));
            Ok(())
        }
        Section::KeyValue(entries) => {
            let separator = kind.separator().ok_or_else(|| malformed(","))?;
            let (key, value) =
                split_key_value(line, separator).ok_or_else(|| malformed(separator))?;
            entries.set(key, value);
            Ok(())
        }
    }
}
