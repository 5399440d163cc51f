pub mod benchmark;
pub mod chunk;
pub mod context;
pub mod index;
pub mod indices;
pub mod matcher;
pub mod normalize;
pub mod segment;

use serde::Serialize;

use self::{
    context::{assemble, ContextRecord, SentenceAnnotator},
    index::{build_index, DuplicatePolicy, IndexedDocument},
    indices::{LineIndex, SentenceIndex},
    matcher::{find_matches, MatchState},
    normalize::{NormalizationMode, Normalizer},
    segment::segment,
};

/// A logical sentence reconstructed from one or more raw lines. Never moves once
/// segmentation has produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentence {
    pub position: SentenceIndex,
    /// Whitespace-normalized but otherwise as extracted.
    pub text: String,
    pub first_line: LineIndex,
}

/// Validated knobs of one comparison run. `chunk_size` must be at least 1; build it
/// through `Config::validate` to get that checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComparisonParams {
    pub chunk_size: usize,
    pub min_sentence_words: usize,
    pub context_radius: usize,
    pub normalization: NormalizationMode,
    pub collapse_spaced_dashes: bool,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ComparisonParams {
    fn default() -> ComparisonParams {
        ComparisonParams {
            chunk_size: 5,
            min_sentence_words: 3,
            context_radius: 2,
            normalization: NormalizationMode::Strict,
            collapse_spaced_dashes: false,
            duplicate_policy: DuplicatePolicy::KeepFirst,
        }
    }
}

impl ComparisonParams {
    /// The one normalizer every stage of a run shares.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.normalization, self.collapse_spaced_dashes)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub matches: usize,
    pub sentences: [usize; 2],
    /// Distinct normalized chunks per document.
    pub chunks: [usize; 2],
    pub skipped_inconsistent: usize,
}

impl Summary {
    /// Whether the run found nothing. A valid outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub records: Vec<ContextRecord>,
    pub summary: Summary,
}

pub fn index_document<S: AsRef<str>>(lines: &[S], params: &ComparisonParams, normalizer: &Normalizer) -> IndexedDocument {
    let sentences = segment(lines, params.min_sentence_words);
    build_index(sentences, params.chunk_size, normalizer, params.duplicate_policy)
}

/// Like `compare_with_annotator` without annotations, and with the same panics.
pub fn compare<S: AsRef<str> + Sync>(documents: [&[S]; 2], params: &ComparisonParams) -> Comparison {
    compare_with_annotator(documents, params, None)
}

/// Runs the whole pipeline over two documents given as raw lines.
///
/// Both documents are segmented and indexed in parallel; matching starts once both
/// indices are complete and runs sequentially.
///
/// # Panics
///
/// Panics if `params.chunk_size` is 0.
pub fn compare_with_annotator<S: AsRef<str> + Sync>(
    documents: [&[S]; 2],
    params: &ComparisonParams,
    annotator: Option<&dyn SentenceAnnotator>,
) -> Comparison {
    let normalizer = params.normalizer();
    let (old, new) = rayon::join(
        || index_document(documents[0], params, &normalizer),
        || index_document(documents[1], params, &normalizer),
    );
    let indexed = [&old, &new];

    log::info!(
        "comparing {} distinct chunks from {} sentences with {} distinct chunks from {} sentences",
        old.index.len(),
        old.sentences.len(),
        new.index.len(),
        new.sentences.len()
    );

    let mut state = MatchState::default();
    let matches = find_matches(indexed, &normalizer, &mut state);

    let sentence_lists = indexed.map(|document| &document.sentences[..]);
    let records: Vec<ContextRecord> = matches
        .iter()
        .map(|found| assemble(found, sentence_lists, params.context_radius, annotator))
        .collect();

    let summary = Summary {
        matches: records.len(),
        sentences: indexed.map(|document| document.sentences.len()),
        chunks: indexed.map(|document| document.index.len()),
        skipped_inconsistent: state.skipped_inconsistent,
    };
    log::info!("{} unique matches found", summary.matches);

    Comparison { records, summary }
}
