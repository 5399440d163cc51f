use super::normalize::Normalizer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub original: String,
    pub normalized: String,
}

/// Slides a window of `size` words over `sentence`, left to right.
///
/// Each window is normalized as a whole, so prefix stripping only ever applies at
/// the start of a chunk. A sentence with fewer than `size` words yields nothing.
/// Windows that normalize to an empty string are skipped.
pub fn chunks<'a>(sentence: &'a str, size: usize, normalizer: &'a Normalizer) -> impl Iterator<Item = Chunk> + 'a {
    assert!(size > 0, "chunk size must be positive");
    let words: Vec<&str> = sentence.split_whitespace().collect();
    let window_count = (words.len() + 1).saturating_sub(size);
    (0..window_count).filter_map(move |start| {
        let original = words[start..start + size].join(" ");
        let normalized = normalizer.normalize(&original);
        if normalized.is_empty() {
            None
        } else {
            Some(Chunk { original, normalized })
        }
    })
}
