//! Boggle board
//!
//! A 4x4 grid of letters rolled from the 16 classic dice. A `Q` face stands
//! for the pair `QU` when tracing words.

use rand::seq::SliceRandom;
use rand::Rng;

/// Board edge length
pub const SIZE: usize = 4;

/// Number of cells on the board
pub const CELLS: usize = SIZE * SIZE;

/// The 16 classic Boggle dice, six faces each
const DICE: [&str; CELLS] = [
    "LRYTTE", "VTHRWE", "EGHWNE", "SEOTIS", "ANAEEG", "IDSYTT", "OATTOW", "MTOICU",
    "AFPKFS", "XLDERI", "HCPOAS", "ENSIEU", "YLDEVR", "ZNRNHL", "NMIQHU", "OBBAOJ",
];

/// A rolled board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Uppercase letters, row-major
    cells: [char; CELLS],
}

impl Board {
    /// Roll a new random board
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let mut dice = DICE;
        dice.shuffle(&mut rng);

        let mut cells = ['A'; CELLS];
        for (cell, die) in cells.iter_mut().zip(dice.iter()) {
            let faces = die.as_bytes();
            *cell = faces[rng.gen_range(0..faces.len())] as char;
        }
        Self { cells }
    }

    /// Build a board from exactly 16 letters, row-major
    ///
    /// Returns None if the input has the wrong length or contains
    /// non-alphabetic characters.
    pub fn from_letters(letters: &str) -> Option<Self> {
        let chars: Vec<char> = letters.chars().collect();
        if chars.len() != CELLS || !chars.iter().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let mut cells = ['A'; CELLS];
        for (cell, c) in cells.iter_mut().zip(chars) {
            *cell = c.to_ascii_uppercase();
        }
        Some(Self { cells })
    }

    /// Render the layout as 16 uppercase letters
    pub fn render(&self) -> String {
        self.cells.iter().collect()
    }

    /// Whether `word` can be traced through adjacent, distinct cells
    ///
    /// Case-insensitive. A `Q` cell consumes `QU` from the word; a `Q` in the
    /// word not followed by `U` can never be formed.
    pub fn can_be_formed(&self, word: &str) -> bool {
        let word: Vec<char> = word.trim().to_ascii_uppercase().chars().collect();
        if word.is_empty() {
            return false;
        }
        let mut visited = [false; CELLS];
        (0..CELLS).any(|start| self.trace(&word, start, &mut visited))
    }

    fn trace(&self, word: &[char], cell: usize, visited: &mut [bool; CELLS]) -> bool {
        let Some(rest) = self.consume(word, cell) else {
            return false;
        };
        if rest.is_empty() {
            return true;
        }

        visited[cell] = true;
        let found = neighbors(cell)
            .into_iter()
            .flatten()
            .any(|n| !visited[n] && self.trace(rest, n, visited));
        visited[cell] = false;
        found
    }

    /// Match the head of `word` against `cell`, returning the remainder
    fn consume<'a>(&self, word: &'a [char], cell: usize) -> Option<&'a [char]> {
        let letter = self.cells[cell];
        match word {
            ['Q', 'U', rest @ ..] if letter == 'Q' => Some(rest),
            ['Q', ..] => None,
            [first, rest @ ..] if *first == letter => Some(rest),
            _ => None,
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Up to eight neighbours of a cell
fn neighbors(cell: usize) -> [Option<usize>; 8] {
    let row = (cell / SIZE) as isize;
    let col = (cell % SIZE) as isize;
    let mut out = [None; 8];
    let mut i = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (r, c) = (row + dr, col + dc);
            if (0..SIZE as isize).contains(&r) && (0..SIZE as isize).contains(&c) {
                out[i] = Some(r as usize * SIZE + c as usize);
            }
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // A B C D
    // E F G H
    // I J K L
    // M N O Q
    fn board() -> Board {
        Board::from_letters("ABCDEFGHIJKLMNOQ").unwrap()
    }

    #[test]
    fn test_random_board_shape() {
        let board = Board::random();
        let rendered = board.render();
        assert_eq!(rendered.chars().count(), CELLS);
        assert!(rendered.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_from_letters_validates() {
        assert!(Board::from_letters("short").is_none());
        assert!(Board::from_letters("ABCDEFGHIJKLMNO1").is_none());
        assert_eq!(
            Board::from_letters("abcdefghijklmnop").unwrap().render(),
            "ABCDEFGHIJKLMNOP"
        );
    }

    #[test]
    fn test_adjacent_path() {
        let board = board();
        assert!(board.can_be_formed("abf"));
        assert!(board.can_be_formed("FAB"));
        assert!(board.can_be_formed("jin"));
    }

    #[test]
    fn test_diagonal_path() {
        let board = board();
        assert!(board.can_be_formed("afk"));
        assert!(board.can_be_formed("dgj"));
    }

    #[test]
    fn test_non_adjacent_rejected() {
        let board = board();
        assert!(!board.can_be_formed("ac"));
        assert!(!board.can_be_formed("am"));
    }

    #[test]
    fn test_cell_reuse_rejected() {
        let board = board();
        assert!(!board.can_be_formed("aba"));
    }

    #[test]
    fn test_backtracks_past_dead_branch() {
        // B A B D
        // E F G C
        let board = Board::from_letters("BABDEFGCIJKLMNOP").unwrap();
        assert!(board.can_be_formed("abc"));
        assert!(!board.can_be_formed("abcb"));
    }

    #[test]
    fn test_path_through_every_cell() {
        assert!(board().can_be_formed("abcdhgfeijklquonm"));
    }

    #[test]
    fn test_missing_letter_rejected() {
        assert!(!board().can_be_formed("xyz"));
        assert!(!board().can_be_formed(""));
    }

    #[test]
    fn test_q_means_qu() {
        let board = board();
        assert!(board.can_be_formed("kqu"));
        assert!(board.can_be_formed("oqu"));
        assert!(!board.can_be_formed("kq"));
        assert!(!board.can_be_formed("oq"));
    }
}
