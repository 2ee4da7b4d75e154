//! Streaming reader for a converted JSON array.
//!
//! Elements are deserialized one at a time through a `SeqAccess` visitor
//! and handed to a callback, so the array is never held in memory.

use std::fmt;
use std::io::Read;

use serde::de::{self, Deserializer as _, SeqAccess, Visitor};

use crate::error::{Error, Result};
use crate::model::Document;

/// Call `f` for every document of a top-level JSON array, in order.
///
/// Returns the number of documents visited. An error from `f` stops the
/// read and is returned unchanged.
pub fn for_each_document<R, F>(reader: R, mut f: F) -> Result<usize>
where
    R: Read,
    F: FnMut(Document) -> Result<()>,
{
    let mut de = serde_json::Deserializer::from_reader(reader);
    let mut failure = None;

    let outcome = (&mut de).deserialize_seq(ArrayVisitor {
        f: &mut f,
        failure: &mut failure,
    });
    if let Some(e) = failure {
        return Err(e);
    }
    let count = outcome?;
    de.end()?;
    Ok(count)
}

struct ArrayVisitor<'a, F> {
    f: &'a mut F,
    failure: &'a mut Option<Error>,
}

impl<'de, F> Visitor<'de> for ArrayVisitor<'_, F>
where
    F: FnMut(Document) -> Result<()>,
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON array of BioC documents")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<usize, A::Error> {
        let mut count = 0;
        while let Some(doc) = seq.next_element::<Document>()? {
            count += 1;
            if let Err(e) = (self.f)(doc) {
                *self.failure = Some(e);
                return Err(<A::Error as de::Error>::custom("stopped by consumer"));
            }
        }
        Ok(count)
    }
}
