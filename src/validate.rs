use super::algorithm::{context::ContextSide, Comparison};
use std::collections::{HashMap, HashSet};

pub fn validate(comparison: &Comparison, sentence_counts: [usize; 2]) -> Vec<String> {
    let mut errors = vec![];

    fn side_str(sequence: usize, side: usize) -> String {
        let side_name = ["First", "Second"][side];
        format!("{side_name} side of match {sequence}")
    }

    // Sequence numbers count up from 1 without gaps.
    for (index, record) in comparison.records.iter().enumerate() {
        if record.sequence != index + 1 {
            errors.push(format!("Record #{index} has sequence number {}", record.sequence));
        }
    }

    if comparison.summary.matches != comparison.records.len() {
        errors.push(format!(
            "Summary reports {} matches but there are {} records",
            comparison.summary.matches,
            comparison.records.len()
        ));
    }
    if comparison.summary.sentences != sentence_counts {
        errors.push(format!(
            "Summary reports {:?} sentences but the documents have {:?}",
            comparison.summary.sentences, sentence_counts
        ));
    }

    // A chunk anchors at most one match.
    let mut chunks: HashMap<&str, usize> = HashMap::new();
    for record in &comparison.records {
        if let Some(first) = chunks.insert(&record.chunk_text, record.sequence) {
            errors.push(format!(
                "Chunk {:?} is reported by matches {first} and {}",
                record.chunk_text, record.sequence
            ));
        }
    }

    // A sentence takes part in at most one match per side.
    for side in 0..2 {
        let mut used = HashSet::new();
        for record in &comparison.records {
            if !used.insert(record.sides[side].matched.position) {
                errors.push(format!(
                    "{} reuses sentence {}",
                    side_str(record.sequence, side),
                    record.sides[side].matched.position
                ));
            }
        }
    }

    // Context windows are contiguous, in document order and inside the document.
    for record in &comparison.records {
        for side in 0..2 {
            let ContextSide { before, matched, after } = &record.sides[side];
            let expected_start = matched.position - before.len().min(matched.position);
            let window = before.iter().chain(std::iter::once(matched)).chain(after.iter());
            for (expected, sentence) in (expected_start..).zip(window) {
                if sentence.position != expected {
                    errors.push(format!(
                        "{} has sentence {} where {expected} was expected",
                        side_str(record.sequence, side),
                        sentence.position
                    ));
                }
                if sentence.position >= sentence_counts[side] {
                    errors.push(format!(
                        "{} refers to sentence {} of a document with {} sentences",
                        side_str(record.sequence, side),
                        sentence.position,
                        sentence_counts[side]
                    ));
                }
                if sentence.offset != sentence.position as isize - matched.position as isize {
                    errors.push(format!(
                        "{} has sentence {} at offset {}",
                        side_str(record.sequence, side),
                        sentence.position,
                        sentence.offset
                    ));
                }
            }
            if before.len() > matched.position {
                errors.push(format!("{} has context before the document start", side_str(record.sequence, side)));
            }
        }
    }

    errors
}

pub fn print_errors(errors: &[String]) {
    if !errors.is_empty() {
        log::error!("Comparison validation errors:");
        for error in errors {
            log::error!("  {error}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::validate;
    use crate::algorithm::{compare, Comparison, ComparisonParams};

    fn comparison() -> Comparison {
        let old = [
            "Der Vorsitzende eröffnet die Sitzung pünktlich.",
            "Der Haushaltsplan wird ohne Änderungen angenommen.",
            "Die Aussprache über den Antrag wird vertagt.",
        ];
        let new = [
            "Die Aussprache über den Antrag wird vertagt.",
            "Der Vorsitzende eröffnet die Sitzung pünktlich.",
        ];
        compare([&old[..], &new[..]], &ComparisonParams::default())
    }

    #[test]
    fn valid_comparison() {
        let comparison = comparison();
        assert_eq!(comparison.records.len(), 2);
        assert_eq!(validate(&comparison, [3, 2]), Vec::<String>::new());
        assert_eq!(validate(&Comparison::default(), [0, 0]), Vec::<String>::new());
    }

    #[test]
    fn sequence_and_summary() {
        let mut comparison = comparison();
        comparison.records[1].sequence = 5;
        comparison.summary.matches = 3;
        let errors = validate(&comparison, [3, 2]);
        assert_eq!(
            errors,
            vec![
                "Record #1 has sequence number 5".to_owned(),
                "Summary reports 3 matches but there are 2 records".to_owned(),
            ]
        );
        assert_eq!(validate(&Comparison::default(), [1, 0]).len(), 1);
    }

    #[test]
    fn reused_sentence() {
        let mut comparison = comparison();
        let matched = comparison.records[0].sides[1].matched.clone();
        comparison.records[1].sides[1].matched = matched;
        let errors = validate(&comparison, [3, 2]);
        assert!(errors.iter().any(|error| error.contains("reuses sentence")), "{errors:?}");
    }

    #[test]
    fn repeated_chunk() {
        let mut comparison = comparison();
        comparison.records[1].chunk_text = comparison.records[0].chunk_text.clone();
        let errors = validate(&comparison, [3, 2]);
        assert!(errors.iter().any(|error| error.contains("is reported by matches 1 and 2")), "{errors:?}");
    }

    #[test]
    fn window_out_of_bounds() {
        let comparison = comparison();
        let errors = validate(&comparison, [2, 2]);
        assert!(!errors.is_empty());
        assert!(errors.iter().any(|error| error.contains("of a document with 2 sentences")), "{errors:?}");
    }

    #[test]
    fn window_out_of_order() {
        let mut comparison = comparison();
        comparison.records[1].sides[0].after.reverse();
        let errors = validate(&comparison, [3, 2]);
        assert!(errors.iter().any(|error| error.contains("was expected")), "{errors:?}");
    }
}
