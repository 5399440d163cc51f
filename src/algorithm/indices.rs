use std::ops::Range;

pub trait UsizeConvertible {
    fn from_usize(val: usize) -> Self;
    fn to_usize(&self) -> usize;
}

macro_rules! extend_index_type {
    (
        $type:ident
    ) => {
        impl UsizeConvertible for $type {
            fn from_usize(val: usize) -> Self {
                Self::new(val)
            }

            fn to_usize(&self) -> usize {
                self.raw()
            }
        }

        #[allow(dead_code)]
        impl $type {
            pub fn saturating_sub(&self, other: usize) -> Self {
                Self::new(self.raw().saturating_sub(other))
            }
        }
    };
}

index_vec::define_index_type! {
    /// Position of a sentence inside its document's sentence sequence.
    pub struct SentenceIndex = usize;
}
extend_index_type!(SentenceIndex);

index_vec::define_index_type! {
    /// Zero-based raw line of a document, as delivered by the line provider.
    pub struct LineIndex = usize;
}
extend_index_type!(LineIndex);

pub fn range_iter<Index: UsizeConvertible>(range: Range<Index>) -> impl Iterator<Item = Index> {
    (range.start.to_usize()..range.end.to_usize()).map(Index::from_usize)
}

/// Maps byte offsets of the joined document text back to the raw line they came from.
pub(super) struct LineConverter {
    // Byte offset (in the joined text) at which each raw line starts.
    line_starts: Vec<usize>,
}

impl LineConverter {
    pub fn new(line_starts: Vec<usize>) -> Self {
        LineConverter { line_starts }
    }

    pub fn offset_to_line(&self, offset: usize) -> LineIndex {
        match self.line_starts.binary_search(&offset) {
            Ok(mut line) => {
                // Lines that were empty share their start with the following line.
                while line + 1 < self.line_starts.len() && self.line_starts[line + 1] == offset {
                    line += 1;
                }
                LineIndex::new(line)
            }
            Err(0) => LineIndex::new(0),
            Err(insert_at) => LineIndex::new(insert_at - 1),
        }
    }
}
