use std::collections::{hash_map::Entry, HashMap};

use super::{chunk::chunks, indices::SentenceIndex, normalize::Normalizer, Sentence};

/// Which occurrence of a normalized chunk a document's index keeps when the chunk
/// repeats inside that document (boilerplate phrases, repeated headings).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    KeepFirst,
    KeepLast,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkEntry {
    pub sentence: SentenceIndex,
    pub original: String,
}

/// Normalized chunk → the sentence that produced it and its display text.
#[derive(Debug, Default)]
pub struct ChunkIndex {
    entries: HashMap<String, ChunkEntry>,
    // Computed once when the index is frozen; matching never iterates `entries`.
    sorted_keys: Vec<String>,
}

impl ChunkIndex {
    pub fn get(&self, normalized: &str) -> Option<&ChunkEntry> {
        self.entries.get(normalized)
    }

    pub fn sorted_keys(&self) -> &[String] {
        &self.sorted_keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One document, segmented and fingerprinted.
#[derive(Debug, Default)]
pub struct IndexedDocument {
    pub sentences: Vec<Sentence>,
    pub index: ChunkIndex,
}

pub fn build_index(
    sentences: Vec<Sentence>,
    chunk_size: usize,
    normalizer: &Normalizer,
    duplicate_policy: DuplicatePolicy,
) -> IndexedDocument {
    let mut entries: HashMap<String, ChunkEntry> = HashMap::new();
    let mut generated = 0;
    for sentence in &sentences {
        for chunk in chunks(&sentence.text, chunk_size, normalizer) {
            generated += 1;
            let entry = ChunkEntry {
                sentence: sentence.position,
                original: chunk.original,
            };
            match (entries.entry(chunk.normalized), duplicate_policy) {
                (Entry::Vacant(vacant), _) => {
                    vacant.insert(entry);
                }
                (Entry::Occupied(mut occupied), DuplicatePolicy::KeepLast) => {
                    occupied.insert(entry);
                }
                (Entry::Occupied(_), DuplicatePolicy::KeepFirst) => {}
            }
        }
    }

    let mut sorted_keys: Vec<String> = entries.keys().cloned().collect();
    sorted_keys.sort_unstable();

    log::debug!(
        "indexed {} sentences: {} chunks, {} distinct",
        sentences.len(),
        generated,
        sorted_keys.len()
    );

    IndexedDocument {
        sentences,
        index: ChunkIndex { entries, sorted_keys },
    }
}
