use mmgrade_core::choice_letter;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration for [`AnswerExtractor`].
///
/// The defaults reproduce the common benchmark layout: transcripts split
/// on `"Assistant:"`, answers drawn from A–E, reasoning kept only past
/// ten words.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Literal marker separating the user prompt from the model reply.
    pub marker: String,
    /// Highest letter in the valid answer range (inclusive, from 'A').
    pub last_letter: char,
    /// Enable the standalone-letter pattern.
    pub bare_letter: bool,
    /// Enable the `X)` enumerated-choice pattern.
    pub paren_letter: bool,
    /// Enable the choice-text substring fallback.
    pub choice_text: bool,
    /// Reasoning spans with this many words or fewer are discarded.
    pub reasoning_min_words: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            marker: "Assistant:".to_string(),
            last_letter: 'E',
            bare_letter: true,
            paren_letter: true,
            choice_text: true,
            reasoning_min_words: 10,
        }
    }
}

/// What one transcript yielded: an answer letter, reasoning text, both,
/// or neither. An empty extraction is a normal outcome for malformed or
/// evasive transcripts, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub letter: Option<char>,
    pub reasoning: Option<String>,
}

/// Recovers the multiple-choice answer a free-form transcript implies.
///
/// Patterns are tried in order against the text after the marker, first
/// hit wins:
///
/// 1. first standalone letter in range (`\b([A-E])\b`)
/// 2. first letter followed by a closing parenthesis (`\b([A-E])\)`)
/// 3. case-insensitive substring match of each choice's full text
///
/// A letter found by the first two patterns also anchors reasoning
/// recovery: the text before the last occurrence of that letter is kept
/// when it runs longer than the configured word count.
pub struct AnswerExtractor {
    marker: String,
    bare: Option<Regex>,
    paren: Option<Regex>,
    choice_text: bool,
    reasoning_min_words: usize,
}

impl AnswerExtractor {
    pub fn new(opts: &ExtractOptions) -> anyhow::Result<Self> {
        if !opts.last_letter.is_ascii_uppercase() {
            anyhow::bail!(
                "last letter must be an uppercase ASCII letter, got `{}`",
                opts.last_letter
            );
        }
        let bare = opts
            .bare_letter
            .then(|| Regex::new(&format!(r"\b([A-{}])\b", opts.last_letter)))
            .transpose()?;
        let paren = opts
            .paren_letter
            .then(|| Regex::new(&format!(r"\b([A-{}])\)", opts.last_letter)))
            .transpose()?;
        Ok(Self {
            marker: opts.marker.clone(),
            bare,
            paren,
            choice_text: opts.choice_text,
            reasoning_min_words: opts.reasoning_min_words,
        })
    }

    /// Extract from a raw transcript string.
    ///
    /// Transcripts without the marker yield the empty extraction. With
    /// multiple markers, the text after the first one is the reply.
    pub fn extract(&self, transcript: &str, choices: Option<&[String]>) -> Extraction {
        let Some((_, reply)) = transcript.split_once(&self.marker) else {
            return Extraction::default();
        };

        for pattern in [self.bare.as_ref(), self.paren.as_ref()].into_iter().flatten() {
            let letter = pattern
                .captures(reply)
                .and_then(|caps| caps.get(1))
                .and_then(|group| group.as_str().chars().next());
            if let Some(letter) = letter {
                return Extraction {
                    letter: Some(letter),
                    reasoning: self.recover_reasoning(reply, letter),
                };
            }
        }

        if self.choice_text {
            if let Some(choices) = choices {
                let haystack = reply.to_lowercase();
                for (index, choice) in choices.iter().enumerate() {
                    if !choice.is_empty() && haystack.contains(&choice.to_lowercase()) {
                        return Extraction {
                            letter: choice_letter(index),
                            reasoning: None,
                        };
                    }
                }
            }
        }

        Extraction::default()
    }

    /// Extract from a table cell. Non-string cells short-circuit to the
    /// empty extraction.
    pub fn extract_cell(&self, cell: &serde_json::Value, choices: Option<&[String]>) -> Extraction {
        match cell.as_str() {
            Some(text) => self.extract(text, choices),
            None => Extraction::default(),
        }
    }

    /// Candidate reasoning is everything before the last occurrence of the
    /// matched letter in the reply; spans at or under the word threshold
    /// are discarded as noise.
    fn recover_reasoning(&self, reply: &str, letter: char) -> Option<String> {
        let cut = reply.rfind(letter)?;
        let span = reply[..cut].trim();
        if span.split_whitespace().count() > self.reasoning_min_words {
            Some(span.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extractor(opts: ExtractOptions) -> AnswerExtractor {
        AnswerExtractor::new(&opts).unwrap()
    }

    fn default_extractor() -> AnswerExtractor {
        extractor(ExtractOptions::default())
    }

    #[test]
    fn bare_letter_after_marker() {
        let ex = default_extractor();
        let got = ex.extract("User: pick one. Assistant: B", None);
        assert_eq!(got.letter, Some('B'));
        assert_eq!(got.reasoning, None);
    }

    #[test]
    fn letters_inside_words_ignored() {
        let ex = default_extractor();
        let got = ex.extract("User: q. Assistant: Because bananas.", None);
        assert_eq!(got.letter, None);
    }

    #[test]
    fn missing_marker_yields_empty() {
        let ex = default_extractor();
        assert_eq!(ex.extract("just some text with a B in it", None), Extraction::default());
    }

    #[test]
    fn first_marker_wins_with_duplicates() {
        let ex = default_extractor();
        let got = ex.extract("User: q Assistant: A Assistant: B", None);
        assert_eq!(got.letter, Some('A'));
    }

    #[test]
    fn non_string_cell_yields_empty() {
        let ex = default_extractor();
        assert_eq!(ex.extract_cell(&json!(42), None), Extraction::default());
        assert_eq!(ex.extract_cell(&json!(null), None), Extraction::default());
        assert_eq!(
            ex.extract_cell(&json!("User: q Assistant: C"), None).letter,
            Some('C')
        );
    }

    #[test]
    fn paren_pattern_when_bare_disabled() {
        let ex = extractor(ExtractOptions {
            bare_letter: false,
            ..ExtractOptions::default()
        });
        let got = ex.extract("User: q. Assistant: The answer is (B).", None);
        assert_eq!(got.letter, Some('B'));
    }

    #[test]
    fn paren_example_with_choices() {
        // worked example: enumerated choice marker plus a choice list
        let ex = default_extractor();
        let choices = vec!["cat".to_string(), "bird".to_string(), "fish".to_string()];
        let got = ex.extract(
            "User: pick one. Assistant: The answer is (B) because birds fly.",
            Some(&choices),
        );
        assert_eq!(got.letter, Some('B'));
    }

    #[test]
    fn choice_text_fallback_is_case_insensitive() {
        let ex = default_extractor();
        let choices = vec!["oak tree".to_string(), "maple tree".to_string()];
        let got = ex.extract(
            "User: which tree? Assistant: it looks like the Maple Tree to me",
            Some(&choices),
        );
        assert_eq!(got.letter, Some('B'));
        assert_eq!(got.reasoning, None);
    }

    #[test]
    fn choice_text_first_hit_wins() {
        let ex = default_extractor();
        let choices = vec!["tree".to_string(), "oak tree".to_string()];
        let got = ex.extract("User: q Assistant: an oak tree maybe", Some(&choices));
        assert_eq!(got.letter, Some('A'));
    }

    #[test]
    fn empty_choice_never_matches() {
        let ex = default_extractor();
        let choices = vec![String::new(), "whale".to_string()];
        let got = ex.extract("User: q Assistant: the whale one", Some(&choices));
        assert_eq!(got.letter, Some('B'));
    }

    #[test]
    fn no_patterns_no_choices_yields_empty() {
        let ex = default_extractor();
        let got = ex.extract("User: q Assistant: no idea, sorry", None);
        assert_eq!(got, Extraction::default());
    }

    #[test]
    fn letter_range_is_configurable() {
        let wide = default_extractor();
        assert_eq!(wide.extract("User: q Assistant: E", None).letter, Some('E'));

        let narrow = extractor(ExtractOptions {
            last_letter: 'D',
            ..ExtractOptions::default()
        });
        assert_eq!(narrow.extract("User: q Assistant: E", None).letter, None);
        assert_eq!(narrow.extract("User: q Assistant: D", None).letter, Some('D'));
    }

    #[test]
    fn invalid_last_letter_rejected() {
        assert!(AnswerExtractor::new(&ExtractOptions {
            last_letter: 'e',
            ..ExtractOptions::default()
        })
        .is_err());
    }

    #[test]
    fn reasoning_before_final_letter_restatement() {
        let ex = default_extractor();
        let got = ex.extract(
            "User: q. Assistant: Birds have feathers and nearly all of them can fly, \
             while the other options cannot, so the answer must be C",
            None,
        );
        assert_eq!(got.letter, Some('C'));
        let reasoning = got.reasoning.expect("span before final letter exceeds threshold");
        assert!(reasoning.starts_with("Birds have feathers"));
        assert!(!reasoning.contains('C'));
    }

    #[test]
    fn short_reasoning_discarded() {
        let ex = default_extractor();
        let got = ex.extract("User: q. Assistant: I think it is C", None);
        assert_eq!(got.letter, Some('C'));
        assert_eq!(got.reasoning, None);
    }

    #[test]
    fn ten_word_span_is_still_too_short() {
        let ex = default_extractor();
        // exactly ten words before the letter: at the threshold, not past it
        let got = ex.extract(
            "User: q. Assistant: one two three four five six seven eight nine ten C",
            None,
        );
        assert_eq!(got.letter, Some('C'));
        assert_eq!(got.reasoning, None);

        let got = ex.extract(
            "User: q. Assistant: one two three four five six seven eight nine ten eleven C",
            None,
        );
        assert_eq!(got.reasoning.as_deref(), Some("one two three four five six seven eight nine ten eleven"));
    }

    #[test]
    fn reasoning_counts_words_before_last_occurrence() {
        let ex = default_extractor();
        // the letter appears early and again at the end; the span reaches
        // to the last occurrence
        let got = ex.extract(
            "User: q. Assistant: B seems plausible given what the image shows about wing \
             shape and feather color, final answer B",
            None,
        );
        assert_eq!(got.letter, Some('B'));
        let reasoning = got.reasoning.expect("long span before the final B");
        assert!(reasoning.ends_with("final answer"));
    }
}
