use serde::Serialize;

use super::{
    indices::{range_iter, SentenceIndex},
    matcher::Match,
    Sentence,
};

/// Attaches an opaque, caller-computed note (e.g. the background color of the
/// sentence in the rendered source) to sentences shown in a context record.
pub trait SentenceAnnotator {
    fn annotate(&self, side: usize, sentence: &Sentence) -> Option<String>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextSentence {
    pub position: usize,
    /// Distance from the matched sentence; negative before it, zero for the match itself.
    pub offset: isize,
    pub line: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextSide {
    pub before: Vec<ContextSentence>,
    pub matched: ContextSentence,
    pub after: Vec<ContextSentence>,
}

impl ContextSide {
    /// All sentences of the window in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &ContextSentence> {
        self.before.iter().chain(std::iter::once(&self.matched)).chain(self.after.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextRecord {
    pub sequence: usize,
    /// The matched chunk as it appears in the first document.
    pub chunk_text: String,
    pub original_chunks: [String; 2],
    pub sides: [ContextSide; 2],
}

fn context_sentence(
    side: usize,
    sentence: &Sentence,
    matched: SentenceIndex,
    annotator: Option<&dyn SentenceAnnotator>,
) -> ContextSentence {
    let position = sentence.position.raw();
    ContextSentence {
        position,
        offset: position as isize - matched.raw() as isize,
        line: sentence.first_line.raw(),
        text: sentence.text.clone(),
        annotation: annotator.and_then(|annotator| annotator.annotate(side, sentence)),
    }
}

/// Builds the output record for `found`: the matched sentence of each document and up
/// to `radius` neighbors on either side, clipped at the document bounds.
pub fn assemble(
    found: &Match,
    sentences: [&[Sentence]; 2],
    radius: usize,
    annotator: Option<&dyn SentenceAnnotator>,
) -> ContextRecord {
    let sides = [0, 1].map(|side| {
        let document = sentences[side];
        let matched = found.sentences[side];
        let end = SentenceIndex::new(usize::min(document.len(), matched.raw() + radius + 1));
        let window = |range: std::ops::Range<SentenceIndex>| -> Vec<ContextSentence> {
            range_iter(range)
                .map(|position| context_sentence(side, &document[position.raw()], matched, annotator))
                .collect()
        };
        ContextSide {
            before: window(matched.saturating_sub(radius)..matched),
            matched: context_sentence(side, &document[matched.raw()], matched, annotator),
            after: window(matched + 1..end),
        }
    });

    ContextRecord {
        sequence: found.sequence,
        chunk_text: found.original_chunks[0].clone(),
        original_chunks: found.original_chunks.clone(),
        sides,
    }
}
