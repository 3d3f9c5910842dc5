//! Beatmap text parser.
//!
//! A single pass over the lines after the version marker. Blank lines close
//! the current section; the next content line must be a header.

pub mod line;

use crate::core::{Document, Section, SectionKind};
use crate::error::{ParseError, ParseResult};
use line::Line;

enum State {
    AwaitingHeader,
    InSection(SectionKind, Section),
}

/// Parse beatmap text into a [`Document`]
pub fn parse(text: &str) -> ParseResult<Document> {
    let mut document = Document::new();
    let mut state = State::AwaitingHeader;

    // the first line is the format version marker
    for (index, raw) in text.lines().enumerate().skip(1) {
        let line_no = index + 1;

        let content = match line::classify(raw) {
            Line::Comment => continue,
            Line::Blank => {
                close_section(&mut document, &mut state);
                continue;
            }
            Line::Content(content) => content,
        };

        if let State::InSection(kind, section) = &mut state {
            line::push_entry(*kind, section, content, line_no)?;
        } else {
            let kind = read_header(&document, content, line_no)?;
            state = State::InSection(kind, Section::empty_for(kind));
        }
    }

    close_section(&mut document, &mut state);
    Ok(document)
}

fn close_section(document: &mut Document, state: &mut State) {
    if let State::InSection(kind, section) = std::mem::replace(state, State::AwaitingHeader) {
        document.insert(kind, section);
    }
}

fn read_header(document: &Document, content: &str, line_no: usize) -> ParseResult<SectionKind> {
    let is_bracketed = content.starts_with('[') && content.ends_with(']');
    if !is_bracketed && document.is_empty() {
        return Err(ParseError::DataBeforeHeader {
            line: line_no,
            content: content.to_string(),
        });
    }

    let kind = SectionKind::from_header(content).ok_or_else(|| ParseError::UnknownSection {
        line: line_no,
        header: content.to_string(),
    })?;

    if document.contains(kind) {
        return Err(ParseError::DuplicateSection {
            line: line_no,
            section: kind,
        });
    }

    Ok(kind)
}
