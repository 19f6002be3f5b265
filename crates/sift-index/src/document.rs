//! Input documents.

use crate::IndexError;

/// A document to be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// External document identifier.
    pub docno: String,
    /// Raw document text. Tokens are separated by whitespace.
    pub text: String,
}

impl Document {
    /// Creates a document.
    pub fn new(docno: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            docno: docno.into(),
            text: text.into(),
        }
    }

    /// Builds documents from parallel identifier and text lists.
    ///
    /// Fails if the lists differ in length.
    pub fn batch<D, T>(docnos: &[D], texts: &[T]) -> Result<Vec<Self>, IndexError>
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        if docnos.len() != texts.len() {
            return Err(IndexError::BatchLengthMismatch {
                docnos: docnos.len(),
                texts: texts.len(),
            });
        }
        Ok(docnos
            .iter()
            .zip(texts)
            .map(|(docno, text)| Self::new(docno.as_ref(), text.as_ref()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_pairs_lists_in_order() {
        let documents = Document::batch(&["d1", "d2"], &["zebra", ""]).unwrap();
        assert_eq!(documents, vec![Document::new("d1", "zebra"), Document::new("d2", "")]);
    }

    #[test]
    fn batch_rejects_unequal_lists() {
        assert_eq!(
            Document::batch(&["d1", "d2", "d3"], &["zebra", "crossing"]),
            Err(IndexError::BatchLengthMismatch { docnos: 3, texts: 2 })
        );
        assert!(Document::batch(&["d1"], &["zebra", "crossing"]).is_err());
    }
}
