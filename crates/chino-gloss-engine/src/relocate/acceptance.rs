use crate::cloze::{Cloze, first_chars, last_chars};

/// Decides whether an old annotation plausibly still exists in a new line.
pub trait AcceptanceRule {
    fn accepts(&self, new_line: &str, cloze: &Cloze) -> bool;
}

/// The cloze text must still touch one of its old neighbouring characters:
/// the new line contains `last char of left + cloze` or `cloze + first char
/// of right`. An empty side reduces to the bare cloze text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryAdjacency;

impl AcceptanceRule for BoundaryAdjacency {
    fn accepts(&self, new_line: &str, cloze: &Cloze) -> bool {
        let with_left = format!("{}{}", last_chars(&cloze.left, 1), cloze.cloze);
        let with_right = format!("{}{}", cloze.cloze, first_chars(&cloze.right, 1));
        new_line.contains(&with_left) || new_line.contains(&with_right)
    }
}

impl<F> AcceptanceRule for F
where
    F: Fn(&str, &Cloze) -> bool,
{
    fn accepts(&self, new_line: &str, cloze: &Cloze) -> bool {
        self(new_line, cloze)
    }
}
