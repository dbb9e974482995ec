//! Core merge implementation over in-memory PDF streams.

use lopdf::{Document, Object, ObjectId};

use crate::error::MergeError;

/// One merge input: the original filename and the raw PDF bytes.
#[derive(Debug, Clone)]
pub struct SourcePdf {
    /// Original filename, used in error reporting.
    pub name: String,
    /// Raw PDF content.
    pub bytes: Vec<u8>,
}

impl SourcePdf {
    /// Create a merge input from a name and its content.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// The serialized result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergedPdf {
    /// Serialized PDF bytes.
    pub bytes: Vec<u8>,
    /// Total pages in the merged document.
    pub page_count: usize,
    /// Number of inputs merged.
    pub files_merged: usize,
}

/// Stateless merger for ordered PDF byte-streams.
pub struct Merger;

impl Merger {
    /// Merge the inputs into a single [`Document`].
    ///
    /// Every page of every input appears in the output, in input order.
    /// Incoming object ids are renumbered past the running maximum before
    /// their objects are folded into the base document, then the page
    /// references are spliced into the base page tree.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::NoInputs`] for an empty sequence, or
    /// [`MergeError::UnreadableInput`] naming the first input that fails
    /// to parse (or has no pages). On error no output exists anywhere.
    pub fn merge(inputs: &[SourcePdf]) -> Result<Document, MergeError> {
        if inputs.is_empty() {
            return Err(MergeError::NoInputs);
        }

        let mut documents = Vec::with_capacity(inputs.len());
        for (idx, input) in inputs.iter().enumerate() {
            documents.push(load_input(input, idx + 1)?);
        }

        let mut merged = documents.remove(0);
        let mut max_id = merged.max_id;

        for mut doc in documents {
            // Renumber to avoid object id collisions with the base.
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            merged.objects.extend(doc.objects);
            append_pages_to_tree(&mut merged, &page_ids)?;
        }

        merged.renumber_objects();
        merged.compress();

        Ok(merged)
    }

    /// Merge the inputs and serialize the result to bytes.
    ///
    /// # Errors
    ///
    /// Propagates [`Merger::merge`] errors, plus
    /// [`MergeError::Serialize`] if the merged document cannot be
    /// written out.
    pub fn merge_to_bytes(inputs: &[SourcePdf]) -> Result<MergedPdf, MergeError> {
        let mut merged = Self::merge(inputs)?;
        let page_count = merged.get_pages().len();

        let mut bytes = Vec::new();
        merged
            .save_to(&mut bytes)
            .map_err(|e| MergeError::Serialize {
                reason: e.to_string(),
            })?;

        Ok(MergedPdf {
            bytes,
            page_count,
            files_merged: inputs.len(),
        })
    }
}

fn load_input(input: &SourcePdf, position: usize) -> Result<Document, MergeError> {
    let doc = Document::load_mem(&input.bytes)
        .map_err(|e| MergeError::unreadable(&input.name, position, e.to_string()))?;

    if doc.get_pages().is_empty() {
        return Err(MergeError::unreadable(
            &input.name,
            position,
            "PDF has no pages",
        ));
    }

    Ok(doc)
}

/// Splice page references into the base document's Pages dictionary and
/// patch its Count.
fn append_pages_to_tree(merged: &mut Document, page_ids: &[ObjectId]) -> Result<(), MergeError> {
    let pages_id = merged
        .catalog_mut()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| MergeError::page_tree(format!("missing Pages reference: {e}")))?;

    let pages_dict = merged
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| MergeError::page_tree(format!("Pages object is not a dictionary: {e}")))?;

    let kids = pages_dict
        .get_mut(b"Kids")
        .and_then(Object::as_array_mut)
        .map_err(|e| MergeError::page_tree(format!("missing Kids array: {e}")))?;

    for &page_id in page_ids {
        kids.push(Object::Reference(page_id));
    }

    let current_count = pages_dict
        .get(b"Count")
        .and_then(Object::as_i64)
        .unwrap_or(0);
    pages_dict.set(
        "Count",
        Object::Integer(current_count + page_ids.len() as i64),
    );

    Ok(())
}
