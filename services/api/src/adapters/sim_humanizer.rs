//! services/api/src/adapters/sim_humanizer.rs
//!
//! The simulated humanizer. This adapter is the authoritative implementation
//! of the `HumanizerService` port: it permutes sentences, appends a canned
//! style suffix, and fabricates every score. Nothing here looks at the text
//! to produce a score.

use async_trait::async_trait;
use rand::Rng;
use text_forge_core::domain::{AiDetection, HumanizationOptions, HumanizeOutcome, PlagiarismScore};
use text_forge_core::ports::{HumanizerService, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `HumanizerService` by shuffling sentences.
#[derive(Clone, Default)]
pub struct SimulatedHumanizer;

impl SimulatedHumanizer {
    /// Creates a new `SimulatedHumanizer`.
    pub fn new() -> Self {
        Self
    }
}

//=========================================================================================
// Rewrite Logic
//=========================================================================================

/// Splits text into sentences at `.`/`!`/`?` boundaries followed by
/// whitespace, keeping the punctuation with its sentence. "e.g. 3.14" style
/// abbreviations still split; that matches the original behavior.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            if matches!(chars.peek(), Some(next) if next.is_whitespace()) {
                while matches!(chars.peek(), Some(next) if next.is_whitespace()) {
                    chars.next();
                }
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Applies the simulated rewrite: random pairwise sentence swaps (a
/// permutation, never a drop) plus the style's closing sentence.
pub(crate) fn rewrite<R: Rng>(text: &str, options: &HumanizationOptions, rng: &mut R) -> String {
    let mut sentences = split_sentences(text);

    if options.reorder_sentences && sentences.len() > 2 {
        let swaps = options.level.strength().min(sentences.len() / 2);
        for _ in 0..swaps {
            let a = rng.gen_range(0..sentences.len());
            let b = rng.gen_range(0..sentences.len());
            sentences.swap(a, b);
        }
    }

    let mut result = sentences.join(" ");
    result.push_str("\n\n");
    result.push_str(options.style.suffix());
    result
}

//=========================================================================================
// Score Fabrication
//=========================================================================================

// The ranges are fixed by the product copy: "uniqueness" always lands in the
// 90s and every detector reads single digits or barely more.

pub(crate) fn sample_plagiarism<R: Rng>(rng: &mut R) -> PlagiarismScore {
    PlagiarismScore {
        uniqueness: rng.gen_range(90..=99),
        similarity: rng.gen_range(0..=9),
    }
}

pub(crate) fn sample_detection<R: Rng>(rng: &mut R) -> AiDetection {
    AiDetection {
        gpt_detector: rng.gen_range(1..=10),
        zero_gpt: rng.gen_range(1..=12),
        content_detective: rng.gen_range(1..=8),
    }
}

//=========================================================================================
// `HumanizerService` Trait Implementation
//=========================================================================================

#[async_trait]
impl HumanizerService for SimulatedHumanizer {
    async fn humanize(
        &self,
        text: &str,
        options: &HumanizationOptions,
    ) -> PortResult<HumanizeOutcome> {
        let mut rng = rand::thread_rng();
        let humanized_text = rewrite(text, options, &mut rng);

        Ok(HumanizeOutcome {
            humanized_text,
            plagiarism_score: sample_plagiarism(&mut rng),
            ai_detection: sample_detection(&mut rng),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_forge_core::domain::{HumanizeLevel, HumanizeStyle};

    fn options(level: HumanizeLevel, style: HumanizeStyle, reorder: bool) -> HumanizationOptions {
        HumanizationOptions {
            level,
            style,
            fix_grammar: true,
            reorder_sentences: reorder,
            add_synonyms: false,
            ..HumanizationOptions::default()
        }
    }

    #[test]
    fn split_keeps_punctuation_with_each_sentence() {
        let sentences = split_sentences("First one. Second one! Third one?");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third one?"]
        );
    }

    #[test]
    fn split_keeps_unterminated_tail() {
        let sentences = split_sentences("Done. And a trailing fragment");
        assert_eq!(sentences, vec!["Done.", "And a trailing fragment"]);
    }

    #[test]
    fn split_does_not_break_inside_tokens() {
        // No whitespace after the dot, so "3.14" stays intact.
        let sentences = split_sentences("Pi is 3.14 roughly. Yes.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Pi is 3.14 roughly.");
    }

    #[test]
    fn reorder_permutes_but_never_drops() {
        let text = "Sentence A. Sentence B. Sentence C. Sentence D. Sentence E.";
        let original = split_sentences(text);
        let mut rng = rand::thread_rng();

        for _ in 0..50 {
            let opts = options(HumanizeLevel::Strong, HumanizeStyle::Standard, true);
            let out = rewrite(text, &opts, &mut rng);
            let body = out.split("\n\n").next().unwrap();
            let mut shuffled = split_sentences(body);
            shuffled.sort();
            let mut expected = original.clone();
            expected.sort();
            assert_eq!(shuffled, expected);
        }
    }

    #[test]
    fn academic_example_matches_expected_shape() {
        let text = "Sentence A. Sentence B. Sentence C.";
        let opts = options(HumanizeLevel::Light, HumanizeStyle::Academic, true);
        let mut rng = rand::thread_rng();
        let out = rewrite(text, &opts, &mut rng);

        for sentence in ["Sentence A.", "Sentence B.", "Sentence C."] {
            assert!(out.contains(sentence), "missing {:?} in {:?}", sentence, out);
        }
        assert!(out.ends_with(
            "This analysis provides a comprehensive examination of the topic through an academic lens."
        ));
    }

    #[test]
    fn two_sentences_are_never_reordered() {
        let text = "Alpha first. Beta second.";
        let opts = options(HumanizeLevel::Strong, HumanizeStyle::Casual, true);
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let out = rewrite(text, &opts, &mut rng);
            assert!(out.starts_with("Alpha first. Beta second."));
        }
    }

    #[test]
    fn scores_stay_in_their_fixed_ranges() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let p = sample_plagiarism(&mut rng);
            assert!((90..=99).contains(&p.uniqueness));
            assert!(p.similarity <= 9);

            let d = sample_detection(&mut rng);
            assert!((1..=10).contains(&d.gpt_detector));
            assert!((1..=12).contains(&d.zero_gpt));
            assert!((1..=8).contains(&d.content_detective));
        }
    }
}
