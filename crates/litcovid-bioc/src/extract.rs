//! Per-article records exported from BioC documents
//!
//! - data: `PMID/Title Abstract`
//! - refs: `PMID/ref1/ref2/...`

use std::collections::BTreeSet;

use crate::model::{Document, Passage};

const PMID_INFON: &str = "article-id_pmid";
const REF_PMID_INFON: &str = "pub-id_pmid";

/// Title and abstract of one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub pmid: String,
    pub title: String,
    pub abstract_text: String,
}

/// References cited by one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefsRecord {
    pub pmid: String,
    /// Sorted, de-duplicated cited PMIDs
    pub refs: Vec<String>,
}

fn is_title(p: &Passage) -> bool {
    p.section_type() == Some("TITLE") || p.infons.get("type") == Some("title")
}

fn is_abstract(p: &Passage) -> bool {
    p.section_type() == Some("ABSTRACT") || p.infons.get("type") == Some("abstract")
}

fn is_reference(p: &Passage) -> bool {
    p.section_type() == Some("REF")
}

/// PMID of a document: first non-empty `article-id_pmid` infon in passage order
pub fn pmid(doc: &Document) -> Option<&str> {
    doc.passages
        .iter()
        .filter_map(|p| p.infons.get(PMID_INFON))
        .find(|s| !s.is_empty())
}

/// Build the data record. `None` when the document has no PMID.
///
/// The title is the text of the last title passage; abstract passages are
/// joined with a single space.
pub fn article_record(doc: &Document) -> Option<ArticleRecord> {
    let pmid = pmid(doc)?;

    let mut title = "";
    let mut abstract_parts = Vec::new();
    for p in &doc.passages {
        let text = p.text.as_deref().unwrap_or("");
        if is_title(p) {
            title = text;
        }
        if is_abstract(p) {
            abstract_parts.push(text);
        }
    }

    Some(ArticleRecord {
        pmid: pmid.to_string(),
        title: title.to_string(),
        abstract_text: abstract_parts.join(" "),
    })
}

/// Build the refs record. `None` without PMID or without any cited PMID.
pub fn refs_record(doc: &Document) -> Option<RefsRecord> {
    let pmid = pmid(doc)?;

    let refs: BTreeSet<&str> = doc
        .passages
        .iter()
        .filter(|p| is_reference(p))
        .filter_map(|p| p.infons.get(REF_PMID_INFON))
        .filter(|r| !r.is_empty())
        .collect();
    if refs.is_empty() {
        return None;
    }

    Some(RefsRecord {
        pmid: pmid.to_string(),
        refs: refs.into_iter().map(str::to_string).collect(),
    })
}

/// Replace line breaks so a field stays on one output line
fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

impl ArticleRecord {
    /// `PMID/Title Abstract`, without trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{}/{} {}",
            self.pmid,
            single_line(&self.title),
            single_line(&self.abstract_text)
        )
    }
}

impl RefsRecord {
    /// `PMID/ref1/ref2/...`, without trailing newline
    pub fn to_line(&self) -> String {
        format!("{}/{}", self.pmid, self.refs.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Infons;

    fn passage(infons: &[(&str, &str)], text: Option<&str>) -> Passage {
        Passage {
            infons: infons.iter().copied().collect::<Infons>(),
            offset: None,
            text: text.map(str::to_string),
        }
    }

    fn article() -> Document {
        Document {
            id: Some("32000001".into()),
            passages: vec![
                passage(
                    &[("article-id_pmid", "32000001"), ("section_type", "TITLE")],
                    Some("Covid\ntitle"),
                ),
                passage(&[("section_type", "ABSTRACT")], Some("First.")),
                passage(&[("type", "abstract")], Some("Second.")),
                passage(&[("section_type", "REF"), ("pub-id_pmid", "300")], None),
                passage(&[("section_type", "REF"), ("pub-id_pmid", "100")], None),
                passage(&[("section_type", "REF"), ("pub-id_pmid", "300")], None),
                passage(&[("section_type", "REF")], Some("Unindexed ref")),
                passage(&[("section_type", "INTRO"), ("pub-id_pmid", "999")], None),
            ],
        }
    }

    #[test]
    fn data_record_fields() {
        let rec = article_record(&article()).unwrap();
        assert_eq!(rec.pmid, "32000001");
        assert_eq!(rec.title, "Covid\ntitle");
        assert_eq!(rec.abstract_text, "First. Second.");
        assert_eq!(rec.to_line(), "32000001/Covid title First. Second.");
    }

    #[test]
    fn refs_record_sorted_and_deduped() {
        let rec = refs_record(&article()).unwrap();
        assert_eq!(rec.refs, vec!["100", "300"]);
        assert_eq!(rec.to_line(), "32000001/100/300");
    }

    #[test]
    fn no_pmid_no_record() {
        let doc = Document {
            id: Some("legal-notice".into()),
            passages: vec![passage(&[("section_type", "TITLE")], Some("Notice"))],
        };
        assert!(article_record(&doc).is_none());
        assert!(refs_record(&doc).is_none());
    }

    #[test]
    fn no_refs_no_refs_record() {
        let doc = Document {
            id: None,
            passages: vec![passage(&[("article-id_pmid", "5")], Some("x"))],
        };
        assert!(refs_record(&doc).is_none());
        assert_eq!(article_record(&doc).unwrap().to_line(), "5/ ");
    }

    #[test]
    fn pmid_skips_empty_values() {
        let doc = Document {
            id: None,
            passages: vec![
                passage(&[("article-id_pmid", "")], None),
                passage(&[("article-id_pmid", "77")], None),
            ],
        };
        assert_eq!(pmid(&doc), Some("77"));
    }

    #[test]
    fn last_title_wins() {
        let doc = Document {
            id: None,
            passages: vec![
                passage(&[("article-id_pmid", "1"), ("type", "title")], Some("Old")),
                passage(&[("section_type", "TITLE")], Some("New")),
            ],
        };
        assert_eq!(article_record(&doc).unwrap().title, "New");
    }
}
