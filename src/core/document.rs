use std::fmt;

/// Storage shape of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// `key<sep>value` lines
    KeyValue,
    /// Comma-separated records
    Records,
}

/// Recognized beatmap sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `[General]`
    General,
    /// `[Editor]`
    Editor,
    /// `[Metadata]`
    Metadata,
    /// `[Difficulty]`
    Difficulty,
    /// `[Events]`
    Events,
    /// `[TimingPoints]`
    TimingPoints,
    /// `[Colours]`
    Colours,
    /// `[HitObjects]`
    HitObjects,
}

impl SectionKind {
    /// Output order used by the serializer
    pub const CANONICAL: [SectionKind; 8] = [
        SectionKind::General,
        SectionKind::Editor,
        SectionKind::Metadata,
        SectionKind::Difficulty,
        SectionKind::Events,
        SectionKind::TimingPoints,
        SectionKind::Colours,
        SectionKind::HitObjects,
    ];

    /// Look up a section from its bracketed header line
    pub fn from_header(header: &str) -> Option<Self> {
        let name = header.strip_prefix('[')?.strip_suffix(']')?;
        Self::CANONICAL.into_iter().find(|kind| kind.name() == name)
    }

    /// Section name without brackets
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::General => "General",
            SectionKind::Editor => "Editor",
            SectionKind::Metadata => "Metadata",
            SectionKind::Difficulty => "Difficulty",
            SectionKind::Events => "Events",
            SectionKind::TimingPoints => "TimingPoints",
            SectionKind::Colours => "Colours",
            SectionKind::HitObjects => "HitObjects",
        }
    }

    /// Bracketed header line
    pub fn header(&self) -> String {
        format!("[{}]", self.name())
    }

    /// How this section stores its lines
    pub fn shape(&self) -> SectionShape {
        match self {
            SectionKind::Events | SectionKind::TimingPoints | SectionKind::HitObjects => {
                SectionShape::Records
            }
            _ => SectionShape::KeyValue,
        }
    }

    /// Key-value separator, `None` for record sections
    pub fn separator(&self) -> Option<&'static str> {
        match self {
            SectionKind::General | SectionKind::Editor => Some(": "),
            SectionKind::Metadata | SectionKind::Difficulty => Some(":"),
            SectionKind::Colours => Some(" : "),
            SectionKind::Events | SectionKind::TimingPoints | SectionKind::HitObjects => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered key-value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueSection {
    entries: Vec<(String, String)>,
}

impl KeyValueSection {
    /// Create an empty section
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value; a replaced key keeps its position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the section has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One comma-split line of a record section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Split a raw line on commas (no escaping)
    pub fn from_line(line: &str) -> Self {
        Record {
            fields: line.split(',').map(str::to_string).collect(),
        }
    }

    /// Field at `index`
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Replace the field at `index`, returning false if it does not exist
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                *field = value.into();
                true
            }
            None => false,
        }
    }

    /// All fields in order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields rejoined with commas
    pub fn to_line(&self) -> String {
        self.fields.join(",")
    }
}

/// Section contents, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Key-value section (General, Editor, Metadata, Difficulty, Colours)
    KeyValue(KeyValueSection),
    /// Record section (Events, TimingPoints, HitObjects)
    Records(Vec<Record>),
}

impl Section {
    /// Empty section of the shape `kind` requires
    pub fn empty_for(kind: SectionKind) -> Self {
        match kind.shape() {
            SectionShape::KeyValue => Section::KeyValue(KeyValueSection::new()),
            SectionShape::Records => Section::Records(Vec::new()),
        }
    }

    /// Number of entries or records
    pub fn len(&self) -> usize {
        match self {
            Section::KeyValue(kv) => kv.len(),
            Section::Records(records) => records.len(),
        }
    }

    /// Check if the section is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed beatmap: sections in the order they were read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: Vec<(SectionKind, Section)>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section, replacing any existing one of the same kind in place
    pub fn insert(&mut self, kind: SectionKind, section: Section) {
        match self.sections.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = section,
            None => self.sections.push((kind, section)),
        }
    }

    /// Whether a section of this kind exists
    pub fn contains(&self, kind: SectionKind) -> bool {
        self.get(kind).is_some()
    }

    /// Section of the given kind
    pub fn get(&self, kind: SectionKind) -> Option<&Section> {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| s)
    }

    /// Mutable section of the given kind
    pub fn get_mut(&mut self, kind: SectionKind) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| s)
    }

    /// Key-value section of the given kind, if present with that shape
    pub fn key_value(&self, kind: SectionKind) -> Option<&KeyValueSection> {
        match self.get(kind)? {
            Section::KeyValue(kv) => Some(kv),
            Section::Records(_) => None,
        }
    }

    /// Mutable key-value section of the given kind
    pub fn key_value_mut(&mut self, kind: SectionKind) -> Option<&mut KeyValueSection> {
        match self.get_mut(kind)? {
            Section::KeyValue(kv) => Some(kv),
            Section::Records(_) => None,
        }
    }

    /// Records of the given kind, if present with that shape
    pub fn records(&self, kind: SectionKind) -> Option<&[Record]> {
        match self.get(kind)? {
            Section::Records(records) => Some(records),
            Section::KeyValue(_) => None,
        }
    }

    /// Mutable records of the given kind
    pub fn records_mut(&mut self, kind: SectionKind) -> Option<&mut Vec<Record>> {
        match self.get_mut(kind)? {
            Section::Records(records) => Some(records),
            Section::KeyValue(_) => None,
        }
    }

    /// Sections in parse order
    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, &Section)> {
        self.sections.iter().map(|(k, s)| (*k, s))
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
