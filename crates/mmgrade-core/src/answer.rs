use serde::{Deserialize, Serialize};

/// Letter assigned to a choice position: 0 → 'A', 1 → 'B', ...
///
/// Positions past 'Z' have no letter.
pub fn choice_letter(index: usize) -> Option<char> {
    if index < 26 {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Indexing convention of a ground-truth answer column.
///
/// Benchmark exports disagree on whether the stored answer index counts
/// choices from 0 or from 1, so the convention is carried explicitly
/// through every comparison instead of being baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerIndexing {
    /// 'A' compares equal to 0.
    ZeroBased,
    /// 'A' compares equal to 1.
    OneBased,
}

impl AnswerIndexing {
    pub fn offset(self) -> i64 {
        match self {
            AnswerIndexing::ZeroBased => 0,
            AnswerIndexing::OneBased => 1,
        }
    }

    /// Index an answer letter under this convention.
    pub fn letter_index(self, letter: char) -> i64 {
        letter as i64 - 'A' as i64 + self.offset()
    }

    /// Letter for a stored ground-truth index under this convention.
    /// Returns `None` when the index falls outside A–Z.
    pub fn index_letter(self, index: i64) -> Option<char> {
        let position = index - self.offset();
        if (0..26).contains(&position) {
            Some((b'A' + position as u8) as char)
        } else {
            None
        }
    }
}

impl std::str::FromStr for AnswerIndexing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" | "0" => Ok(AnswerIndexing::ZeroBased),
            "one" | "1" => Ok(AnswerIndexing::OneBased),
            other => Err(format!("unknown indexing `{other}` (expected `zero` or `one`)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_letter_maps_positions() {
        assert_eq!(choice_letter(0), Some('A'));
        assert_eq!(choice_letter(4), Some('E'));
        assert_eq!(choice_letter(25), Some('Z'));
        assert_eq!(choice_letter(26), None);
    }

    #[test]
    fn letter_index_zero_based() {
        assert_eq!(AnswerIndexing::ZeroBased.letter_index('A'), 0);
        assert_eq!(AnswerIndexing::ZeroBased.letter_index('C'), 2);
    }

    #[test]
    fn letter_index_one_based() {
        assert_eq!(AnswerIndexing::OneBased.letter_index('A'), 1);
        assert_eq!(AnswerIndexing::OneBased.letter_index('E'), 5);
    }

    #[test]
    fn index_letter_inverts_letter_index() {
        for convention in [AnswerIndexing::ZeroBased, AnswerIndexing::OneBased] {
            for letter in ['A', 'B', 'E', 'Z'] {
                assert_eq!(convention.index_letter(convention.letter_index(letter)), Some(letter));
            }
        }
    }

    #[test]
    fn index_letter_out_of_range() {
        assert_eq!(AnswerIndexing::ZeroBased.index_letter(-1), None);
        assert_eq!(AnswerIndexing::OneBased.index_letter(0), None);
        assert_eq!(AnswerIndexing::ZeroBased.index_letter(26), None);
    }

    #[test]
    fn indexing_parses_from_str() {
        assert_eq!("zero".parse(), Ok(AnswerIndexing::ZeroBased));
        assert_eq!("one".parse(), Ok(AnswerIndexing::OneBased));
        assert!("two".parse::<AnswerIndexing>().is_err());
    }
}
