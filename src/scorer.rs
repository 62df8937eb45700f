//! Word scoring rules

use crate::board::Board;
use crate::dictionary::Dictionary;

/// Words shorter than this never score
pub const MIN_WORD_LEN: usize = 3;

/// Score a word played in a match
///
/// `already_played` is true when either player has recorded this word in the
/// match. Rules are applied in order: repeats and short words score 0, words
/// that are not on the board or not in the dictionary score -1, everything
/// else scores by length.
pub fn score_word(word: &str, already_played: bool, board: &Board, dictionary: &Dictionary) -> i32 {
    let len = word.chars().count();
    if already_played || len < MIN_WORD_LEN {
        return 0;
    }
    if !board.can_be_formed(word) || !dictionary.contains(word) {
        return -1;
    }
    points_for_length(len)
}

/// Points awarded for a valid word of `len` characters
pub fn points_for_length(len: usize) -> i32 {
    match len {
        0..=2 => 0,
        3 | 4 => 1,
        5 => 2,
        6 => 3,
        7 => 5,
        _ => 11,
    }
}
