//! Integration tests for sift-index.
//!
//! Tests the indexing contract every variant must honour, and the hand-off of
//! lexicon statistics to compiled queries.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::sync::Arc;

use sift_config::DEFAULT_FLUSH_EVERY;
use sift_index::{Document, Index, IndexError, Indexer, IndexerKind};
use sift_matching::{EntryStatistics, MatchingQueryTerms, Operator, TermPropertiesBuilder};
use sift_terms::TermPipeline;

/// Indexes parallel identifier and text lists with `kind`.
fn make_index(kind: IndexerKind, docnos: &[&str], texts: &[&str]) -> Result<Index, IndexError> {
    make_index_flushed(kind, docnos, texts, DEFAULT_FLUSH_EVERY)
}

/// Indexes with `kind`, flushing single-pass runs every `flush` documents.
fn make_index_flushed(
    kind: IndexerKind,
    docnos: &[&str],
    texts: &[&str],
    flush: usize,
) -> Result<Index, IndexError> {
    Indexer::new(kind, Arc::new(TermPipeline::default()))
        .flush_every(flush)
        .index(&Document::batch(docnos, texts)?)
}

#[test]
fn test_trailing_empty_document_is_counted() {
    for kind in IndexerKind::ALL {
        let index = make_index(
            kind,
            &["doc1", "doc2", "doc3"],
            &["test document", "another test document", ""],
        )
        .unwrap();
        assert_eq!(index.collection_statistics().documents, 3, "{kind}");
        assert_eq!(index.document_count(), 3, "{kind}");
        assert_eq!(index.docno(2), Some("doc3"), "{kind}");
    }
}

#[test]
fn test_trailing_empty_document_alone_in_a_run() {
    let kinds = [IndexerKind::BasicSinglePass, IndexerKind::BlockSinglePass];
    for kind in kinds {
        for flush in [1, 2] {
            let index = make_index_flushed(
                kind,
                &["doc1", "doc2", "doc3"],
                &["test document", "another test document", ""],
                flush,
            )
            .unwrap();
            assert_eq!(index.collection_statistics().documents, 3, "{kind} flush {flush}");
            assert_eq!(index.document_count(), 3, "{kind} flush {flush}");
            assert_eq!(index.docno(2), Some("doc3"), "{kind} flush {flush}");
            assert_eq!(index.document_length(2), Some(0), "{kind} flush {flush}");
            assert_eq!(index.collection_statistics().tokens, 5, "{kind} flush {flush}");
        }
    }
}

#[test]
fn test_mismatched_batch_is_rejected() {
    for kind in IndexerKind::ALL {
        let result = make_index(kind, &["doc1", "doc2"], &["test document"]);
        assert_eq!(
            result.unwrap_err(),
            IndexError::BatchLengthMismatch { docnos: 2, texts: 1 },
            "{kind}"
        );
    }
}

#[test]
fn test_docno_too_long_is_fatal() {
    let docno = "ConsumerCourt_DCDRC_17555130220114129133OP-05-576";
    for kind in IndexerKind::ALL {
        let err = make_index(kind, &[docno], &["test document"]).unwrap_err();
        match err {
            IndexError::DocnoTooLong { docno: bad, max, .. } => {
                assert_eq!(bad, docno, "{kind}");
                assert_eq!(max, 20, "{kind}");
            }
            other => panic!("{kind}: unexpected error {other}"),
        }
    }
}

#[test]
fn test_docno_too_long_anywhere_in_batch() {
    for kind in IndexerKind::ALL {
        let result = make_index(
            kind,
            &["doc1", "ConsumerCourt_DCDRC_17555130220114129133OP-05-576", "doc3"],
            &["test document", "another test document", "more"],
        );
        assert!(matches!(result, Err(IndexError::DocnoTooLong { .. })), "{kind}");
    }
}

#[test]
fn test_lexicon_statistics() {
    let index = make_index(
        IndexerKind::Basic,
        &["doc1", "doc2", "doc3"],
        &["test document", "another test document", ""],
    )
    .unwrap();
    let stats = index.collection_statistics();
    assert_eq!(stats.tokens, 5);
    assert_eq!(stats.unique_terms, 3);
    assert_eq!(stats.pointers, 5);

    let test = index.lexicon_entry("test").unwrap();
    assert_eq!((test.document_frequency, test.frequency), (2, 2));
    assert_eq!(index.lexicon_entry("another").unwrap().document_frequency, 1);
}

#[test]
fn test_attach_statistics_to_query_terms() {
    let index = make_index(
        IndexerKind::Block,
        &["doc1", "doc2"],
        &["zebras crossing", "zebra"],
    )
    .unwrap();

    let mut terms = MatchingQueryTerms::new();
    terms.add(TermPropertiesBuilder::of(Operator::term("zebra")).build());
    terms.add(TermPropertiesBuilder::of(Operator::term("unicorn")).build());
    assert!(terms.statistics("zebra").is_none());

    assert_eq!(index.attach_statistics(&mut terms), 1);
    let zebra: EntryStatistics = *terms.statistics("zebra").unwrap();
    assert_eq!((zebra.document_frequency, zebra.frequency), (2, 2));
    assert_eq!(Some(&zebra), index.lexicon_entry("zebra"));
    assert!(terms.statistics("unicorn").is_none());
}
