use std::collections::HashSet;

use super::{index::IndexedDocument, indices::SentenceIndex, normalize::Normalizer};

/// A confirmed correspondence between one sentence of each document, anchored by a
/// chunk present in both indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// 1-based, in discovery order.
    pub sequence: usize,
    /// The shared normalized chunk.
    pub chunk: String,
    pub original_chunks: [String; 2],
    pub sentences: [SentenceIndex; 2],
}

/// Bookkeeping of one comparison run. Owned by the caller so a run can be started
/// from a pre-seeded state and inspected afterwards.
#[derive(Clone, Debug, Default)]
pub struct MatchState {
    pub reported_chunks: HashSet<String>,
    pub consumed_sentences: [HashSet<SentenceIndex>; 2],
    pub matches_found: usize,
    /// Candidates dropped because their original texts stopped agreeing after
    /// re-normalization.
    pub skipped_inconsistent: usize,
}

impl MatchState {
    fn is_consumed(&self, sentences: [SentenceIndex; 2]) -> bool {
        (0..2).any(|side| self.consumed_sentences[side].contains(&sentences[side]))
    }
}

/// Walks the chunk keys of the first document in sorted order and reports every key
/// that the second document shares, as long as neither sentence has been used by an
/// earlier match and the key itself hasn't been reported.
///
/// The order of the keys decides which chunk anchors a sentence that shares several
/// chunks, and since the keys are sorted the result is reproducible.
pub fn find_matches(documents: [&IndexedDocument; 2], normalizer: &Normalizer, state: &mut MatchState) -> Vec<Match> {
    let mut result = vec![];

    for key in documents[0].index.sorted_keys() {
        if state.reported_chunks.contains(key) {
            continue;
        }
        let (Some(old_entry), Some(new_entry)) = (documents[0].index.get(key), documents[1].index.get(key)) else {
            continue;
        };

        let renormalized = [&old_entry.original, &new_entry.original].map(|original| normalizer.normalize(original));
        if renormalized[0] != renormalized[1] {
            log::warn!(
                "chunk {key:?} no longer agrees after re-normalization ({:?} vs {:?}), skipping",
                renormalized[0],
                renormalized[1]
            );
            state.skipped_inconsistent += 1;
            continue;
        }

        let sentences = [old_entry.sentence, new_entry.sentence];
        if state.is_consumed(sentences) {
            log::trace!("chunk {key:?} lands in an already matched sentence");
            continue;
        }

        state.matches_found += 1;
        state.reported_chunks.insert(key.clone());
        for side in 0..2 {
            state.consumed_sentences[side].insert(sentences[side]);
        }
        log::debug!(
            "match {} on {key:?}: sentence {} ↔ sentence {}",
            state.matches_found,
            sentences[0].raw(),
            sentences[1].raw()
        );

        result.push(Match {
            sequence: state.matches_found,
            chunk: key.clone(),
            original_chunks: [old_entry.original.clone(), new_entry.original.clone()],
            sentences,
        });
    }

    result
}
