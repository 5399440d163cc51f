use super::{
    indices::{LineConverter, SentenceIndex},
    Sentence,
};

/// Glyphs that always open a new candidate unit. ASCII `*` and `-` are left out
/// because running text uses them inside sentences.
const BULLET_GLYPHS: &[char] = &['•', '‣', '◦', '⁃', '∙', '●', '○', '♦'];

const SENTENCE_END: &[char] = &['.', '!', '?'];

fn ends_sentence(text: &str) -> bool {
    text.ends_with(SENTENCE_END)
}

/// Joins the raw lines with single spaces, collapsing any whitespace inside them.
/// Returns the joined text and the byte offset at which every raw line starts.
fn join_lines<S: AsRef<str>>(lines: &[S]) -> (String, Vec<usize>) {
    let mut joined = String::new();
    let mut line_starts = Vec::with_capacity(lines.len());
    for line in lines {
        let mut words = line.as_ref().split_whitespace().peekable();
        if words.peek().is_some() && !joined.is_empty() {
            joined.push(' ');
        }
        line_starts.push(joined.len());
        for (i, word) in words.enumerate() {
            if i > 0 {
                joined.push(' ');
            }
            joined.push_str(word);
        }
    }
    (joined, line_starts)
}

/// Splits whitespace-normalized text into candidate units: before every bullet glyph,
/// and between a sentence-ending mark and a following uppercase letter.
fn candidate_units(text: &str) -> Vec<(usize, &str)> {
    let mut bounds = vec![0];
    let mut previous: [Option<char>; 2] = [None, None];
    for (i, c) in text.char_indices() {
        let bullet = BULLET_GLYPHS.contains(&c);
        let after_sentence_end =
            c.is_uppercase() && previous[1] == Some(' ') && previous[0].map_or(false, |p| SENTENCE_END.contains(&p));
        if i > 0 && (bullet || after_sentence_end) {
            bounds.push(i);
        }
        previous = [previous[1], Some(c)];
    }
    bounds.push(text.len());

    let mut units = vec![];
    for window in bounds.windows(2) {
        let raw = &text[window[0]..window[1]];
        let trimmed = raw.trim_start();
        let start = window[0] + (raw.len() - trimmed.len());
        let trimmed = trimmed.trim_end();
        if !trimmed.is_empty() {
            units.push((start, trimmed));
        }
    }
    units
}

/// Reconstructs logical sentences from hard-wrapped lines.
///
/// Units that don't end with `.`, `!` or `?` are glued to the unit that follows them,
/// which undoes line breaks inserted by layout-preserving extraction. The trailing
/// unit is emitted even without a closing mark. Sentences with fewer than
/// `min_sentence_words` words are dropped before positions are assigned, so positions
/// stay dense.
pub fn segment<S: AsRef<str>>(lines: &[S], min_sentence_words: usize) -> Vec<Sentence> {
    let (text, line_starts) = join_lines(lines);
    let line_converter = LineConverter::new(line_starts);

    let mut sentences = vec![];
    let mut push = |start: usize, sentence_text: String| {
        if sentence_text.split_whitespace().count() < min_sentence_words {
            log::trace!("dropping short sentence {sentence_text:?}");
            return;
        }
        sentences.push(Sentence {
            position: SentenceIndex::new(sentences.len()),
            text: sentence_text,
            first_line: line_converter.offset_to_line(start),
        });
    };

    let mut current: Option<(usize, String)> = None;
    for (start, unit) in candidate_units(&text) {
        current = match current {
            Some((current_start, mut current_text)) if !ends_sentence(&current_text) => {
                current_text.push(' ');
                current_text.push_str(unit);
                Some((current_start, current_text))
            }
            Some((current_start, current_text)) => {
                push(current_start, current_text);
                Some((start, unit.to_owned()))
            }
            None => Some((start, unit.to_owned())),
        };
    }
    if let Some((current_start, current_text)) = current {
        push(current_start, current_text);
    }

    sentences
}

#[cfg(test)]
mod test {
    use super::{candidate_units, join_lines, segment};
    use crate::algorithm::indices::{LineIndex, SentenceIndex};

    fn texts(lines: &[&str], min_sentence_words: usize) -> Vec<String> {
        segment(lines, min_sentence_words).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn join_collapses_whitespace() {
        let (text, starts) = join_lines(&["  Eins   zwei ", "", "drei\tvier"]);
        assert_eq!(text, "Eins zwei drei vier");
        assert_eq!(starts, vec![0, 9, 10]);
    }

    #[test]
    fn units_split_at_sentence_end_before_uppercase() {
        let units: Vec<_> = candidate_units("Eins. Zwei! Drei? vier. 5. Fünf")
            .into_iter()
            .map(|(_, unit)| unit)
            .collect();
        assert_eq!(units, vec!["Eins.", "Zwei!", "Drei? vier. 5.", "Fünf"]);
    }

    #[test]
    fn units_split_before_bullets() {
        let units: Vec<_> = candidate_units("Liste: • eins. • zwei").into_iter().collect();
        assert_eq!(units, vec![(0, "Liste:"), (7, "• eins."), (17, "• zwei")]);
    }

    #[test]
    fn wrapped_lines_are_rejoined() {
        let lines = [
            "Die Sitzung beginnt um neun",
            "Uhr morgens. Danach folgt die",
            "Aussprache.",
        ];
        assert_eq!(
            texts(&lines, 0),
            vec!["Die Sitzung beginnt um neun Uhr morgens.", "Danach folgt die Aussprache."]
        );
    }

    #[test]
    fn bullet_items_without_closing_mark_are_glued_to_the_next_unit() {
        let lines = ["Punkte:", "• erster Punkt", "• zweiter Punkt.", "• dritter Punkt."];
        assert_eq!(
            texts(&lines, 0),
            vec!["Punkte: • erster Punkt • zweiter Punkt.", "• dritter Punkt."]
        );
    }

    #[test]
    fn bullet_glued_to_previous_word_opens_a_unit() {
        assert_eq!(texts(&["Ende.•Anfang hier"], 0), vec!["Ende.", "•Anfang hier"]);
    }

    #[test]
    fn trailing_unit_without_mark_is_kept() {
        assert_eq!(texts(&["Erster Satz. Zweiter ohne Punkt"], 0), vec!["Erster Satz.", "Zweiter ohne Punkt"]);
    }

    #[test]
    fn empty_documents() {
        assert!(segment::<&str>(&[], 0).is_empty());
        assert!(segment(&["", "   ", "\t"], 0).is_empty());
    }

    #[test]
    fn short_sentences_are_filtered_and_positions_stay_dense() {
        let lines = ["Seite 3", "Die Sitzung beginnt heute. Ende. Danach folgt die Aussprache."];
        let sentences = segment(&lines, 3);
        let found: Vec<_> = sentences.iter().map(|s| (s.position, s.text.as_str())).collect();
        assert_eq!(
            found,
            vec![
                (SentenceIndex::new(0), "Seite 3 Die Sitzung beginnt heute."),
                (SentenceIndex::new(1), "Danach folgt die Aussprache."),
            ]
        );
    }

    #[test]
    fn first_line_is_tracked() {
        let lines = ["Kopfzeile", "", "Erster Satz steht hier.", "Zweiter Satz", "geht weiter. Dritter."];
        let sentences = segment(&lines, 0);
        let found: Vec<_> = sentences.iter().map(|s| s.first_line).collect();
        assert_eq!(found, vec![LineIndex::new(0), LineIndex::new(3), LineIndex::new(4)]);
    }

    #[test]
    fn input_is_not_consumed() {
        let lines = vec!["Ein Satz hier.".to_owned()];
        let first = segment(&lines[..], 0);
        let second = segment(&lines[..], 0);
        assert_eq!(first, second);
        assert_eq!(lines, vec!["Ein Satz hier.".to_owned()]);
    }
}
