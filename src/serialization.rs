use crate::ast::{Document, Entry, HeaderLine, Scalar, ScalarValue, Section, Table};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A layout-free view of a document, for export to JSON or YAML.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Null,
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

pub(crate) fn document_to_value(document: &Document) -> Value {
    let mut header = Fields::default();
    for line in &document.header.lines {
        if let HeaderLine::Field { name, value, .. } = line {
            header.insert(name.clone(), Value::String(value.clone()));
        }
    }

    let mut fields = Fields::default();
    fields.insert("header".to_string(), header.into_value());
    for section in document.sections() {
        fields.insert(section.name.clone(), section_to_value(section));
    }
    fields.into_value()
}

/// Object fields where a repeated key collects all of its values, in
/// document order, into an array.
#[derive(Default)]
struct Fields {
    map: BTreeMap<String, Value>,
    repeated: BTreeSet<String>,
}

impl Fields {
    fn insert(&mut self, key: String, value: Value) {
        if self.repeated.contains(&key) {
            if let Some(Value::Array(values)) = self.map.get_mut(&key) {
                values.push(value);
            }
            return;
        }
        match self.map.remove(&key) {
            Some(first) => {
                self.map.insert(key.clone(), Value::Array(vec![first, value]));
                self.repeated.insert(key);
            }
            None => {
                self.map.insert(key, value);
            }
        }
    }

    fn into_value(self) -> Value {
        Value::Object(self.map)
    }
}

fn section_to_value(section: &Section) -> Value {
    let mut fields = Fields::default();
    let mut text = Vec::new();
    for entry in &section.entries {
        match entry {
            Entry::Text(line) => text.push(Value::String(line.clone())),
            Entry::Blank => {}
            other => {
                if let Some((key, value)) = entry_to_pair(other) {
                    fields.insert(key, value);
                }
            }
        }
    }
    if !text.is_empty() {
        fields.insert("text".to_string(), Value::Array(text));
    }
    fields.into_value()
}

fn entry_to_pair(entry: &Entry) -> Option<(String, Value)> {
    match entry {
        Entry::KeyValue(kv) => Some((kv.label.clone(), scalar_to_value(&kv.value))),
        Entry::Setting(setting) => Some((setting.key.clone(), scalar_to_value(&setting.value))),
        Entry::CountedList(list) => {
            let items = list.items.iter().map(item_to_value).collect();
            Some(("items".to_string(), Value::Array(items)))
        }
        Entry::Table(table) => Some(("rows".to_string(), table_to_value(table))),
        Entry::Section(section) => Some((section.name.clone(), section_to_value(section))),
        Entry::Text(_) | Entry::Blank => None,
    }
}

fn item_to_value(item: &Entry) -> Value {
    match item {
        Entry::Section(section) => section_to_value(section),
        other => match entry_to_pair(other) {
            Some((key, value)) => Value::Object(BTreeMap::from([(key, value)])),
            None => Value::Null,
        },
    }
}

fn table_to_value(table: &Table) -> Value {
    Value::Array(
        table
            .rows
            .iter()
            .map(|row| {
                Value::Object(
                    row.fields
                        .iter()
                        .map(|(column, scalar)| (column.clone(), scalar_to_value(scalar)))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn scalar_to_value(scalar: &Scalar) -> Value {
    match &scalar.value {
        ScalarValue::Integer(n) => Value::Integer(*n),
        ScalarValue::Decimal(d) => d.to_f64().map_or(Value::Null, Value::Number),
        ScalarValue::Boolean(b) => Value::Boolean(*b),
        ScalarValue::Text(s) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use serde_json::json;

    #[test]
    fn test_repeated_keys_are_collected() {
        let source = "[DE BEER]\n1 = number of items\n   5 : A\n       1.00 : Factor\n\
                      2 = number of items\n   6 : B\n   7 : C\n       2.00 : Factor\n\
                      [END OF DE BEER]\n";
        let document = parse(source).unwrap();
        let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
        assert_eq!(
            json["DE BEER"],
            json!({
                "items": [ [ { "A": 5 } ], [ { "B": 6 }, { "C": 7 } ] ],
                "Factor": [1.0, 2.0],
            })
        );
    }

    #[test]
    fn test_repeated_sections_are_collected() {
        let source = "[LAYER]\n   1 : Soil type\n[END OF LAYER]\n[LAYER]\n   2 : Soil type\n[END OF LAYER]\n";
        let document = parse(source).unwrap();
        let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
        assert_eq!(
            json["LAYER"],
            json!([ { "Soil type": 1 }, { "Soil type": 2 } ])
        );
    }
}
