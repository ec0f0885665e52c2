use rust_decimal::Decimal;
use serde::Serialize;

/// A fully parsed `.foi` document.
///
/// The header holds everything before the first section marker. The body
/// holds the top-level entries that follow: normally the `INPUT DATA`
/// section and the closing banner line.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Document {
    pub header: Header,
    pub body: Vec<Entry>,
    pub line_ending: LineEnding,
    pub final_newline: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Name of the section that wraps all calculation input.
pub const INPUT_DATA: &str = "INPUT DATA";

impl Document {
    /// Iterates the top-level sections of the body.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.body.iter().filter_map(Entry::as_section)
    }

    /// The `[INPUT DATA]` block, if the document has one.
    pub fn input_data(&self) -> Option<&Section> {
        self.sections().find(|s| s.name == INPUT_DATA)
    }

    pub fn input_data_mut(&mut self) -> Option<&mut Section> {
        self.body.iter_mut().find_map(|entry| match entry {
            Entry::Section(s) if s.name == INPUT_DATA => Some(s),
            _ => None,
        })
    }

    /// Finds the first section with the given name, searching depth first.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections().find_map(|s| s.find(name))
    }

    pub fn find_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.body.iter_mut().find_map(|entry| match entry {
            Entry::Section(s) => s.find_mut(name),
            _ => None,
        })
    }
}

// --- Header ---

/// Header labels recognized by the header micro-grammar.
pub const HEADER_FIELDS: [&str; 5] = ["COMPANY", "DATE", "TIME", "FILENAME", "CREATED BY"];

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Header {
    pub lines: Vec<HeaderLine>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum HeaderLine {
    /// `COMPANY    : Deltares`. `separator` is the exact text between name and value.
    Field {
        name: String,
        separator: String,
        value: String,
    },
    Text(String),
    Blank,
}

impl Header {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            HeaderLine::Field { name: n, value, .. } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn company(&self) -> Option<&str> {
        self.field("COMPANY")
    }

    pub fn date(&self) -> Option<&str> {
        self.field("DATE")
    }

    pub fn time(&self) -> Option<&str> {
        self.field("TIME")
    }

    pub fn filename(&self) -> Option<&str> {
        self.field("FILENAME")
    }

    pub fn created_by(&self) -> Option<&str> {
        self.field("CREATED BY")
    }
}

// --- Sections and entries ---

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Direct child section with the given name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter().filter_map(Entry::as_section)
    }

    /// This section or any descendant with the given name, depth first.
    pub fn find(&self, name: &str) -> Option<&Section> {
        if self.name == name {
            return Some(self);
        }
        self.entries.iter().find_map(|entry| match entry {
            Entry::Section(s) => s.find(name),
            Entry::CountedList(list) => list.items.iter().find_map(|item| match item {
                Entry::Section(s) => s.find(name),
                _ => None,
            }),
            _ => None,
        })
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Section> {
        if self.name == name {
            return Some(self);
        }
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Section(s) => s.find_mut(name),
            Entry::CountedList(list) => list.items.iter_mut().find_map(|item| match item {
                Entry::Section(s) => s.find_mut(name),
                _ => None,
            }),
            _ => None,
        })
    }

    pub fn key_values(&self) -> impl Iterator<Item = &KeyValue> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::KeyValue(kv) => Some(kv),
            _ => None,
        })
    }

    /// First key-value entry whose label matches exactly.
    pub fn key_value(&self, label: &str) -> Option<&KeyValue> {
        self.key_values().find(|kv| kv.label == label)
    }

    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Setting(s) if s.key == key => Some(s),
            _ => None,
        })
    }

    pub fn counted_list(&self) -> Option<&CountedList> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::CountedList(list) => Some(list),
            _ => None,
        })
    }

    pub fn table(&self) -> Option<&Table> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Raw lines of a free-text section such as `[RUN IDENTIFICATION]`.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum Entry {
    KeyValue(KeyValue),
    Setting(Setting),
    CountedList(CountedList),
    Table(Table),
    Section(Section),
    Text(String),
    Blank,
}

impl Entry {
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Entry::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_key_value(&self) -> Option<&KeyValue> {
        match self {
            Entry::KeyValue(kv) => Some(kv),
            _ => None,
        }
    }
}

/// `<token> : <label>` or `<token> : <label> = <token2>`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct KeyValue {
    pub layout: KeyValueLayout,
    pub value: Scalar,
    pub label: String,
    pub flag_or_value: Option<Scalar>,
}

/// Whitespace captured around the parts of a key-value line.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct KeyValueLayout {
    pub indent: String,
    pub colon: String,
    pub equals: String,
    pub trailing: String,
}

impl Default for KeyValueLayout {
    fn default() -> Self {
        Self {
            indent: String::new(),
            colon: " : ".to_string(),
            equals: " = ".to_string(),
            trailing: String::new(),
        }
    }
}

impl KeyValue {
    pub fn new(value: Scalar, label: impl Into<String>) -> Self {
        Self {
            layout: KeyValueLayout::default(),
            value,
            label: label.into(),
            flag_or_value: None,
        }
    }

    pub fn with_flag_or_value(mut self, secondary: Scalar) -> Self {
        self.flag_or_value = Some(secondary);
        self
    }

    /// The primary token as it appears in the file, without padding.
    pub fn raw_token(&self) -> String {
        self.value.render_bare()
    }

    /// Boolean reading of the primary token: explicit booleans and `0`/`1` integers.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value.value {
            ScalarValue::Boolean(b) => Some(b),
            ScalarValue::Integer(0) => Some(false),
            ScalarValue::Integer(1) => Some(true),
            _ => None,
        }
    }
}

/// `Name=Value`, as found in the version blocks.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Setting {
    pub key: String,
    pub separator: String,
    pub value: Scalar,
}

/// `N = number of items` followed by exactly N records.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct CountedList {
    pub count: usize,
    pub layout: ListLayout,
    pub items: Vec<Entry>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ListLayout {
    pub indent: String,
    pub separator: String,
    pub label: String,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            indent: String::new(),
            separator: " = ".to_string(),
            label: "number of items".to_string(),
        }
    }
}

impl CountedList {
    pub fn new(items: Vec<Entry>) -> Self {
        Self {
            count: items.len(),
            layout: ListLayout::default(),
            items,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    /// Whitespace around each name in `[COLUMN INDICATION]`, by position.
    /// Missing entries mean a bare name.
    pub column_layouts: Vec<ColumnLayout>,
    pub rows: Vec<Row>,
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct ColumnLayout {
    pub leading: String,
    pub trailing: String,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            column_layouts: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Values of one column across all rows.
    pub fn column(&self, name: &str) -> impl Iterator<Item = &Scalar> + '_ {
        let name = name.to_string();
        self.rows.iter().filter_map(move |row| row.get(&name))
    }
}

/// One data row; field order follows the table's column order.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct Row {
    pub fields: Vec<(String, Scalar)>,
    pub layout: RowLayout,
}

/// Whitespace of a row that cell widths cannot express.
///
/// A cell preceded only by spaces keeps them in its scalar's width and has
/// an empty separator here. Any other run (tabs, mixed whitespace) is kept
/// verbatim and the scalar's width covers the token alone.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct RowLayout {
    pub separators: Vec<String>,
    pub trailing: String,
}

impl Row {
    pub fn new(fields: Vec<(String, Scalar)>) -> Self {
        Self {
            fields,
            layout: RowLayout::default(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// --- Scalars ---

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Scalar {
    pub value: ScalarValue,
    pub format: Option<Format>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum ScalarValue {
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Text(String),
}

/// Textual layout of a scalar: right-aligned in `width` columns, with
/// `precision` decimal places for decimals.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize)]
pub struct Format {
    pub width: usize,
    pub precision: Option<usize>,
}

impl Format {
    pub fn new(width: usize, precision: Option<usize>) -> Self {
        Self { width, precision }
    }
}

impl Scalar {
    pub fn new(value: ScalarValue, format: Option<Format>) -> Self {
        Self { value, format }
    }

    pub fn integer(n: i64) -> Self {
        Self::new(ScalarValue::Integer(n), None)
    }

    pub fn decimal(d: Decimal) -> Self {
        Self::new(ScalarValue::Decimal(d), None)
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(ScalarValue::Boolean(b), None)
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(ScalarValue::Text(s.into()), None)
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Integer and decimal scalars cannot be written without a `Format`.
    pub fn needs_format(&self) -> bool {
        matches!(
            self.value,
            ScalarValue::Integer(_) | ScalarValue::Decimal(_)
        )
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            ScalarValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self.value {
            ScalarValue::Decimal(d) => Some(d),
            ScalarValue::Integer(n) => Some(Decimal::from(n)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            ScalarValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The token without width padding, using the captured precision if any.
    pub fn render_bare(&self) -> String {
        let precision = self.format.and_then(|f| f.precision);
        render_value(&self.value, precision)
    }

    /// The token right-aligned in `format.width`. Falls back to `fallback`
    /// for scalars without their own format.
    pub(crate) fn render(&self, fallback: Option<Format>) -> Option<String> {
        let format = match (self.format, fallback) {
            (Some(f), _) => f,
            (None, Some(f)) if self.needs_format() => f,
            (None, _) if !self.needs_format() => Format::default(),
            _ => return None,
        };
        let token = render_value(&self.value, format.precision);
        Some(format!("{:>width$}", token, width = format.width))
    }
}

fn render_value(value: &ScalarValue, precision: Option<usize>) -> String {
    match value {
        ScalarValue::Integer(n) => n.to_string(),
        ScalarValue::Decimal(d) => match precision {
            Some(p) => format!("{:.*}", p, d),
            None => d.to_string(),
        },
        ScalarValue::Boolean(b) => (if *b { "1" } else { "0" }).to_string(),
        ScalarValue::Text(s) => s.clone(),
    }
}
