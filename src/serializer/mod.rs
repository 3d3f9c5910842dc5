//! Beatmap text writer.
//!
//! Sections always come out in [`SectionKind::CANONICAL`] order whatever
//! order they were parsed in. Missing sections are written as bare headers.

use crate::core::{Document, Section, SectionKind};
use std::io::{self, Write};

/// Version marker written on the first line
pub const FORMAT_VERSION_LINE: &str = "osu file format v14";

/// Render a document as beatmap text
pub fn serialize(document: &Document) -> String {
    let mut out = String::new();
    out.push_str(FORMAT_VERSION_LINE);
    out.push('\n');

    for kind in SectionKind::CANONICAL {
        out.push('\n');
        out.push_str(&kind.header());
        out.push('\n');

        match document.get(kind) {
            Some(Section::KeyValue(entries)) => {
                let separator = kind.separator().unwrap_or(":");
                for (key, value) in entries.iter() {
                    out.push_str(key);
                    out.push_str(separator);
                    out.push_str(value);
                    out.push('\n');
                }
            }
            Some(Section::Records(records)) => {
                let lines: Vec<String> = records.iter().map(|r| r.to_line()).collect();
                out.push_str(&lines.join("\n"));
                // the last hit object line has no terminator
                if kind != SectionKind::HitObjects && !lines.is_empty() {
                    out.push('\n');
                }
            }
            None => {}
        }

        if kind == SectionKind::TimingPoints {
            out.push('\n');
        }
    }

    out
}

/// Write the rendered document to `writer`
pub fn write_document<W: Write>(document: &Document, writer: &mut W) -> io::Result<()> {
    writer.write_all(serialize(document).as_bytes())?;
    writer.flush()
}
