use std::time::{Duration, Instant};

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{compare, ComparisonParams, Summary};

const SYLLABLES: &[&str] = &[
    "ver", "an", "schlag", "tra", "ge", "mein", "rat", "ord", "nung", "wirt", "schaft", "lich", "be", "zug", "rech",
    "ter", "sam", "fahr", "stand", "land", "kreis", "amt", "vor", "ent", "wurf", "halt", "stel", "lung", "mit", "glied",
];

const LINE_WIDTH: usize = 60;

/// Two documents made of random sentences, `planted` of which occur in both.
pub struct SyntheticPair {
    pub documents: [Vec<String>; 2],
    pub planted: usize,
}

fn random_word(rng: &mut ChaCha8Rng) -> String {
    let syllables = rng.gen_range(1..4);
    (0..syllables).filter_map(|_| SYLLABLES.choose(rng).copied()).collect()
}

fn random_sentence(rng: &mut ChaCha8Rng) -> String {
    let word_count = rng.gen_range(6..16);
    let mut words: Vec<String> = (0..word_count).map(|_| random_word(rng)).collect();
    let mut first = words[0].chars();
    if let Some(initial) = first.next() {
        words[0] = initial.to_uppercase().chain(first).collect();
    }
    words.join(" ") + "."
}

/// Hard-wraps running text the way layout-preserving extraction does.
fn wrap(sentences: &[String]) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();
    for word in sentences.iter().flat_map(|sentence| sentence.split(' ')) {
        if !line.is_empty() && line.len() + 1 + word.len() > LINE_WIDTH {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn synthetic_pair(seed: u64, sentences: usize, planted: usize) -> SyntheticPair {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let shared: Vec<String> = (0..planted).map(|_| random_sentence(&mut rng)).collect();

    let documents = [0, 1].map(|_| {
        let mut document: Vec<String> = (0..sentences).map(|_| random_sentence(&mut rng)).collect();
        for sentence in &shared {
            let at = rng.gen_range(0..=document.len());
            document.insert(at, sentence.clone());
        }
        wrap(&document)
    });

    SyntheticPair { documents, planted }
}

pub struct BenchmarkResult {
    pub elapsed: Duration,
    pub summary: Summary,
}

pub fn run_comparison(documents: [&[String]; 2], params: &ComparisonParams) -> BenchmarkResult {
    let start = Instant::now();
    let comparison = compare(documents, params);
    BenchmarkResult {
        elapsed: start.elapsed(),
        summary: comparison.summary,
    }
}

#[cfg(test)]
mod test {
    use super::{run_comparison, synthetic_pair};
    use crate::algorithm::ComparisonParams;

    #[test]
    fn same_seed_same_pair() {
        let first = synthetic_pair(7, 20, 3);
        let second = synthetic_pair(7, 20, 3);
        assert_eq!(first.documents, second.documents);
        assert_ne!(first.documents, synthetic_pair(8, 20, 3).documents);
    }

    #[test]
    fn planted_sentences_are_found() {
        let pair = synthetic_pair(42, 30, 4);
        let documents = [0, 1].map(|side| &pair.documents[side][..]);
        let result = run_comparison(documents, &ComparisonParams::default());
        assert!(result.summary.matches >= pair.planted);
        assert!(pair.documents.iter().flatten().all(|line| line.len() <= 60));
    }
}
