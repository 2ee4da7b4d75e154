//! BioC XML parser using quick-xml
//!
//! Pull parser over `<document>` elements. Each call to `next()` reads
//! events up to the matching `</document>` and returns the assembled
//! [`Document`]; nothing from earlier documents is retained, so memory is
//! bounded by the largest single document rather than the file size.
//!
//! Recognised shape (other elements are skipped):
//!
//! ```text
//! document -> id?, passage*
//! passage  -> infon*, offset?, text?
//! infon    -> <infon key="K">V</infon>
//! ```

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::model::{Document, Infons, Offset, Passage};

/// Streaming iterator of documents from a BioC XML source.
///
/// Fused after the first error or end of input.
pub struct BiocReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Open elements outside any `<document>`
    depth: usize,
    /// The root element has been closed; only misc content may follow
    root_closed: bool,
    documents: usize,
    done: bool,
}

impl<R: BufRead> BiocReader<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        config.trim_text(false);
        config.expand_empty_elements = true;

        Self {
            reader,
            buf: Vec::with_capacity(4096),
            depth: 0,
            root_closed: false,
            documents: 0,
            done: false,
        }
    }

    /// Documents returned so far
    pub fn documents_parsed(&self) -> usize {
        self.documents
    }

    fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            self.buf.clear();
            match next_event(&mut self.reader, &mut self.buf)? {
                Event::Start(e) => {
                    if self.depth == 0 && self.root_closed {
                        return Err(Error::xml(
                            self.reader.buffer_position() as u64,
                            "junk after document element",
                        ));
                    }
                    if e.name().as_ref() == b"document" {
                        let doc = parse_document(&mut self.reader)?;
                        self.documents += 1;
                        if self.depth == 0 {
                            self.root_closed = true;
                        }
                        return Ok(Some(doc));
                    }
                    self.depth += 1;
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        self.root_closed = true;
                    }
                }
                Event::Text(e) if self.depth == 0 && !e.iter().all(u8::is_ascii_whitespace) => {
                    return Err(Error::xml(
                        self.reader.buffer_position() as u64,
                        "text outside the root element",
                    ));
                }
                Event::Eof if self.depth > 0 => {
                    return Err(unexpected_eof(&self.reader, "document root"));
                }
                Event::Eof if !self.root_closed => {
                    return Err(Error::xml(
                        self.reader.buffer_position() as u64,
                        "no root element",
                    ));
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for BiocReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_document() {
            Ok(Some(doc)) => Some(Ok(doc)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse a whole BioC string. Convenience for tests and small inputs.
pub fn parse_bioc_str(xml: &str) -> Result<Vec<Document>> {
    BiocReader::new(xml.as_bytes()).collect()
}

fn next_event<'b, R: BufRead>(reader: &mut Reader<R>, buf: &'b mut Vec<u8>) -> Result<Event<'b>> {
    reader
        .read_event_into(buf)
        .map_err(|e| Error::xml(reader.error_position() as u64, e))
}

fn unexpected_eof<R>(reader: &Reader<R>, inside: &str) -> Error {
    Error::xml(
        reader.buffer_position() as u64,
        format!("unexpected end of input inside {inside}"),
    )
}

/// Parse children of `<document>` up to its end tag.
fn parse_document<R: BufRead>(reader: &mut Reader<R>) -> Result<Document> {
    let mut doc = Document::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"id" => doc.id = non_empty(read_text_content(reader, "<id>")?),
                b"passage" => {
                    let passage = parse_passage(reader)?;
                    if !passage.is_empty() {
                        doc.passages.push(passage);
                    }
                }
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(reader, "<document>")),
            _ => {}
        }
    }

    Ok(doc)
}

fn parse_passage<R: BufRead>(reader: &mut Reader<R>) -> Result<Passage> {
    let mut infons = Infons::new();
    let mut offset = None;
    let mut text = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"infon" => {
                    let key = match e.try_get_attribute("key") {
                        Ok(Some(attr)) => attr
                            .decode_and_unescape_value(reader.decoder())
                            .map_err(|err| Error::xml(reader.buffer_position() as u64, err))?
                            .into_owned(),
                        Ok(None) => String::new(),
                        Err(err) => return Err(Error::xml(reader.buffer_position() as u64, err)),
                    };
                    let value = read_text_content(reader, "<infon>")?;
                    if !key.is_empty() {
                        infons.insert(key, value);
                    }
                }
                b"offset" => {
                    offset = non_empty(read_text_content(reader, "<offset>")?).map(Offset::parse)
                }
                b"text" => text = non_empty(read_text_content(reader, "<text>")?),
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(reader, "<passage>")),
            _ => {}
        }
    }

    Ok(Passage {
        infons,
        offset,
        text,
    })
}

/// Skip the current element and all its children
fn skip_element<R: BufRead>(reader: &mut Reader<R>) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    while depth > 0 {
        buf.clear();
        match next_event(reader, &mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(unexpected_eof(reader, "skipped element")),
            _ => {}
        }
    }

    Ok(())
}

/// Read the text content of the current element verbatim, including text
/// of nested tags and CDATA sections.
fn read_text_content<R: BufRead>(reader: &mut Reader<R>, inside: &str) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1;

    loop {
        buf.clear();
        match next_event(reader, &mut buf)? {
            Event::Text(e) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| Error::xml(reader.buffer_position() as u64, err))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let decoded = reader
                    .decoder()
                    .decode(&raw)
                    .map_err(|err| Error::xml(reader.buffer_position() as u64, err))?;
                text.push_str(&decoded);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof(reader, inside)),
            _ => {}
        }
    }

    Ok(text)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Vec<Document> {
        parse_bioc_str(xml).unwrap()
    }

    #[test]
    fn parse_title_and_abstract() {
        let xml = r#"<root><document><id>100</id>
  <passage><infon key="section_type">TITLE</infon><text>Hello</text></passage>
  <passage><infon key="section_type">ABSTRACT</infon><text>World</text></passage>
</document></root>"#;

        let docs = parse(xml);
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.id.as_deref(), Some("100"));
        assert_eq!(doc.passages.len(), 2);
        assert_eq!(doc.passages[0].section_type(), Some("TITLE"));
        assert_eq!(doc.passages[0].text.as_deref(), Some("Hello"));
        assert_eq!(doc.passages[1].section_type(), Some("ABSTRACT"));
        assert_eq!(doc.passages[1].text.as_deref(), Some("World"));
        assert!(doc.passages[0].offset.is_none());
    }

    #[test]
    fn parse_bioc_collection() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE collection SYSTEM "BioC.dtd">
<collection>
  <source>PubTator</source>
  <date>2024-01-01</date>
  <key>BioC.key</key>
  <document>
    <id>32000001</id>
    <infon key="license">CC BY</infon>
    <passage>
      <infon key="type">front</infon>
      <infon key="article-id_pmid">32000001</infon>
      <offset>0</offset>
      <text>A title</text>
      <annotation id="1"><infon key="type">Disease</infon><text>title</text></annotation>
    </passage>
  </document>
  <document>
    <id>32000002</id>
  </document>
</collection>"#;

        let docs = parse(xml);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id.as_deref(), Some("32000001"));
        assert_eq!(docs[0].passages.len(), 1);

        let p = &docs[0].passages[0];
        assert_eq!(p.infons.len(), 2);
        assert_eq!(p.infons.get("article-id_pmid"), Some("32000001"));
        assert_eq!(p.offset, Some(Offset::Int(0)));
        assert_eq!(p.text.as_deref(), Some("A title"));

        assert_eq!(docs[1].id.as_deref(), Some("32000002"));
        assert!(docs[1].passages.is_empty());
    }

    #[test]
    fn preserves_document_order() {
        let xml = "<root>\
            <document><id>3</id></document>\
            <document><id>1</id></document>\
            <document><id>2</id></document>\
        </root>";
        let ids: Vec<_> = parse(xml).into_iter().map(|d| d.id.unwrap()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn offset_typing() {
        let xml = "<root><document>\
            <passage><offset>123</offset></passage>\
            <passage><offset>n/a</offset></passage>\
        </document></root>";
        let docs = parse(xml);
        assert_eq!(docs[0].passages[0].offset, Some(Offset::Int(123)));
        assert_eq!(docs[0].passages[1].offset, Some(Offset::Text("n/a".into())));
    }

    #[test]
    fn empty_passages_are_dropped() {
        let xml = "<root><document><id>9</id>\
            <passage></passage>\
            <passage/>\
            <passage><text></text><offset></offset></passage>\
            <passage><infon>no key</infon></passage>\
        </document></root>";
        let docs = parse(xml);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].passages.is_empty());
    }

    #[test]
    fn whitespace_text_counts_as_present() {
        let xml = "<root><document><passage><text>  </text></passage></document></root>";
        let docs = parse(xml);
        assert_eq!(docs[0].passages.len(), 1);
        assert_eq!(docs[0].passages[0].text.as_deref(), Some("  "));
    }

    #[test]
    fn infon_without_text_has_empty_value() {
        let xml = r#"<root><document><passage><infon key="license"/></passage></document></root>"#;
        let docs = parse(xml);
        assert_eq!(docs[0].passages[0].infons.get("license"), Some(""));
    }

    #[test]
    fn text_keeps_newlines_and_entities() {
        let xml = "<root><document><passage><text>line one\nline &amp; two</text></passage></document></root>";
        let docs = parse(xml);
        assert_eq!(
            docs[0].passages[0].text.as_deref(),
            Some("line one\nline & two")
        );
    }

    #[test]
    fn text_reads_cdata_and_nested_tags() {
        let xml = "<root><document><passage><text>a<![CDATA[<b>]]><i>c</i></text></passage></document></root>";
        let docs = parse(xml);
        assert_eq!(docs[0].passages[0].text.as_deref(), Some("a<b>c"));
    }

    #[test]
    fn non_ascii_passes_through() {
        let xml = "<root><document><id>é</id><passage><text>SARS‑CoV‑2 β</text></passage></document></root>";
        let docs = parse(xml);
        assert_eq!(docs[0].id.as_deref(), Some("é"));
        assert_eq!(docs[0].passages[0].text.as_deref(), Some("SARS‑CoV‑2 β"));
    }

    #[test]
    fn empty_document_is_still_returned() {
        let docs = parse("<root><document></document><document><id></id></document></root>");
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(Document::is_empty));
    }

    #[test]
    fn empty_root() {
        assert!(parse("<collection></collection>").is_empty());
        assert!(parse("<?xml version=\"1.0\"?>\n<collection/>\n").is_empty());
    }

    #[test]
    fn document_as_root() {
        let docs = parse("<document><id>5</id></document>\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id.as_deref(), Some("5"));
    }

    #[test]
    fn input_without_root_is_an_error() {
        for input in ["", "  \n", "this is not xml at all", r#"[{"id":"1"}]"#, "<!-- only a comment -->"] {
            let err = parse_bioc_str(input).unwrap_err();
            assert!(matches!(err, Error::Xml { .. }), "{input:?} gave {err:?}");
        }
    }

    #[test]
    fn second_root_is_an_error() {
        let mut reader = BiocReader::new("<a/><b><document><id>2</id></document></b>".as_bytes());
        let err = reader.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("junk after document element"), "got {err}");
        assert!(reader.next().is_none());
        assert_eq!(reader.documents_parsed(), 0);
    }

    #[test]
    fn text_after_root_is_an_error() {
        let mut reader = BiocReader::new("<root><document><id>1</id></document></root>trailing".as_bytes());
        assert_eq!(reader.next().unwrap().unwrap().id.as_deref(), Some("1"));
        assert!(matches!(reader.next(), Some(Err(Error::Xml { .. }))));
    }

    #[test]
    fn declared_latin1_is_decoded() {
        let mut xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<collection><document><passage>".to_vec();
        xml.extend_from_slice(b"<infon key=\"caf\xe9\">cr\xe8me</infon><text>na\xefve</text>");
        xml.extend_from_slice(b"</passage></document></collection>");

        let docs: Vec<Document> = BiocReader::new(xml.as_slice()).collect::<Result<_>>().unwrap();
        let p = &docs[0].passages[0];
        assert_eq!(p.infons.get("café"), Some("crème"));
        assert_eq!(p.text.as_deref(), Some("naïve"));
    }

    #[test]
    fn unclosed_document_is_an_error() {
        let err = parse_bioc_str("<root><document><id>1</id>").unwrap_err();
        assert!(matches!(err, Error::Xml { .. }), "got {err:?}");
    }

    #[test]
    fn unclosed_root_is_an_error() {
        let err = parse_bioc_str("<root><document><id>1</id></document>").unwrap_err();
        assert!(matches!(err, Error::Xml { .. }), "got {err:?}");
    }

    #[test]
    fn mismatched_tag_is_an_error() {
        let err = parse_bioc_str("<root><document><id>1</passage></document></root>").unwrap_err();
        assert!(matches!(err, Error::Xml { .. }), "got {err:?}");
    }

    #[test]
    fn iterator_yields_documents_before_error_then_stops() {
        let xml = "<root><document><id>1</id></document><document><id>2</oops></document></root>";
        let mut reader = BiocReader::new(xml.as_bytes());

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.id.as_deref(), Some("1"));
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
        assert_eq!(reader.documents_parsed(), 1);
    }
}
