//! Batch grouping for classification calls.
//!
//! Batches are borrowed views over the extracted documents; nothing is
//! cloned when grouping. Input order is preserved within and across
//! batches, which keeps result positions aligned with the prompt.

use crate::models::Document;

/// A group of documents classified in one API call.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 1-based batch number within the run.
    pub number: usize,
    pub documents: &'a [Document],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Split documents into batches of at most `batch_size`, preserving order.
///
/// The final batch may be smaller. A zero `batch_size` is rejected by
/// config validation before a run starts.
pub fn batches(documents: &[Document], batch_size: usize) -> impl Iterator<Item = Batch<'_>> {
    documents
        .chunks(batch_size)
        .enumerate()
        .map(|(i, chunk)| Batch {
            number: i + 1,
            documents: chunk,
        })
}

/// Number of batches a run of `total` documents will need.
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(batch_size)
}
