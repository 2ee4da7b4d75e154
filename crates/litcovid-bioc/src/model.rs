//! BioC document model and its JSON shape.
//!
//! Optional fields are omitted from JSON rather than written as `null` or
//! empty containers: a document is `{"id"?, "passages"?}` and a passage is
//! `{"infons"?, "offset"?, "text"?}`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One `<document>`: an identifier and its passages.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passages: Vec<Passage>,
}

impl Document {
    /// True when the JSON encoding would be `{}`
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.passages.is_empty()
    }
}

/// One `<passage>` within a document.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default, skip_serializing_if = "Infons::is_empty")]
    pub infons: Infons,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Passage {
    /// A passage with no infons, offset or text is dropped by the parser
    pub fn is_empty(&self) -> bool {
        self.infons.is_empty() && self.offset.is_none() && self.text.is_none()
    }

    /// Value of the `section_type` infon
    pub fn section_type(&self) -> Option<&str> {
        self.infons.get("section_type")
    }
}

/// Passage offset: an integer when the source text parses as one, else the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    Int(i64),
    Text(String),
}

impl Offset {
    /// Parse `<offset>` content. Surrounding whitespace and a leading sign
    /// are accepted for the integer form.
    pub fn parse(raw: String) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(raw),
        }
    }
}

/// Infon key/value pairs in first-seen order.
///
/// A repeated key keeps its original position and takes the later value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Infons(Vec<(String, String)>);

impl Infons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Infons {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut infons = Self::new();
        for (k, v) in iter {
            infons.insert(k.into(), v.into());
        }
        infons
    }
}

impl Serialize for Infons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Infons {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InfonsVisitor;

        impl<'de> Visitor<'de> for InfonsVisitor {
            type Value = Infons;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string infons")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut infons = Infons::new();
                while let Some((k, v)) = map.next_entry::<String, String>()? {
                    infons.insert(k, v);
                }
                Ok(infons)
            }
        }

        deserializer.deserialize_map(InfonsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_parse_int() {
        assert_eq!(Offset::parse("123".into()), Offset::Int(123));
        assert_eq!(Offset::parse(" 7\n".into()), Offset::Int(7));
        assert_eq!(Offset::parse("-4".into()), Offset::Int(-4));
    }

    #[test]
    fn offset_beyond_i64_stays_text() {
        let raw = "99999999999999999999";
        assert_eq!(Offset::parse(raw.into()), Offset::Text(raw.into()));

        let p = Passage {
            offset: Some(Offset::parse(raw.into())),
            ..Default::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"offset":"99999999999999999999"}"#);
        assert_eq!(serde_json::from_str::<Passage>(&json).unwrap(), p);
    }

    #[test]
    fn offset_parse_text_keeps_raw() {
        assert_eq!(Offset::parse("n/a".into()), Offset::Text("n/a".into()));
        assert_eq!(Offset::parse(" 1.5 ".into()), Offset::Text(" 1.5 ".into()));
    }

    #[test]
    fn infons_repeated_key_keeps_position() {
        let mut infons = Infons::new();
        infons.insert("type".into(), "title".into());
        infons.insert("section_type".into(), "TITLE".into());
        infons.insert("type".into(), "front".into());

        let pairs: Vec<_> = infons.iter().collect();
        assert_eq!(pairs, vec![("type", "front"), ("section_type", "TITLE")]);
    }

    #[test]
    fn empty_fields_are_omitted() {
        let doc = Document {
            id: None,
            passages: vec![Passage {
                text: Some("Hello".into()),
                ..Default::default()
            }],
        };
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"passages":[{"text":"Hello"}]}"#
        );
        assert_eq!(serde_json::to_string(&Document::default()).unwrap(), "{}");
    }

    #[test]
    fn offset_serializes_as_number_or_string() {
        let p = Passage {
            offset: Some(Offset::Int(12)),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"offset":12}"#);

        let p = Passage {
            offset: Some(Offset::Text("n/a".into())),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"offset":"n/a"}"#);
    }

    #[test]
    fn infons_serialize_in_insertion_order() {
        let p = Passage {
            infons: [("z", "1"), ("a", "2")].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"infons":{"z":"1","a":"2"}}"#
        );
    }

    #[test]
    fn deserialize_converted_document() {
        let json = r#"{"id":"100","passages":[{"infons":{"section_type":"TITLE"},"offset":0,"text":"Hi"},{"offset":"x"}]}"#;
        let doc: Document = serde_json::from_str(json).unwrap();

        assert_eq!(doc.id.as_deref(), Some("100"));
        assert_eq!(doc.passages.len(), 2);
        assert_eq!(doc.passages[0].section_type(), Some("TITLE"));
        assert_eq!(doc.passages[0].offset, Some(Offset::Int(0)));
        assert_eq!(doc.passages[1].offset, Some(Offset::Text("x".into())));
        assert!(doc.passages[1].infons.is_empty());
    }
}
