use std::fmt::Display;

use crate::error::{Error, Result};

pub mod io;

/// A residue expected at a position of the query.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SignaturePosition {
    /// One-based position in query coordinates.
    pub position: usize,
    /// Upper case residue letter.
    pub expected_residue: u8,
}

/// An ordered list of signature positions that is scored as a unit.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SignatureGroup {
    positions: Vec<SignaturePosition>,
}

/// All signature groups of one scoring run, in the order supplied by the caller.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SignatureGroups {
    groups: Vec<SignatureGroup>,
}

impl SignaturePosition {
    pub fn new(position: usize, expected_residue: u8) -> Self {
        Self {
            position,
            expected_residue: expected_residue.to_ascii_uppercase(),
        }
    }

    /// Creates a signature position from arbitrary position text.
    ///
    /// Only the digits of `position` are kept, so `"'42'"` becomes 42.
    /// Text without digits becomes position 0, which lies before any alignment.
    pub fn from_position_text(position: &str, expected_residue: u8) -> Result<Self> {
        let position = position_from_digits(position).ok_or_else(|| {
            Error::Configuration(format!("signature position {position:?} is too large"))
        })?;
        Ok(Self::new(position, expected_residue))
    }
}

/// Concatenates all ASCII digits of `text` and interprets them as a position.
///
/// Returns 0 if `text` contains no digits, and `None` if the number does not fit into a `usize`.
pub fn position_from_digits(text: &str) -> Option<usize> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        Some(0)
    } else {
        digits.parse().ok()
    }
}

impl SignatureGroup {
    pub fn new(positions: Vec<SignaturePosition>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[SignaturePosition] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl SignatureGroups {
    pub fn new(groups: Vec<SignatureGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[SignatureGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<SignatureGroup> for SignatureGroups {
    fn from_iter<T: IntoIterator<Item = SignatureGroup>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromIterator<SignaturePosition> for SignatureGroup {
    fn from_iter<T: IntoIterator<Item = SignaturePosition>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Display for SignaturePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", char::from(self.expected_residue), self.position)
    }
}

impl Display for SignatureGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (index, position) in self.positions.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{position}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::{SignaturePosition, position_from_digits};
    use crate::error::Error;

    #[test]
    fn test_position_from_digits() {
        assert_eq!(position_from_digits("42"), Some(42));
        assert_eq!(position_from_digits("'42'"), Some(42));
        assert_eq!(position_from_digits(" \"1a2\" "), Some(12));
        assert_eq!(position_from_digits("''"), Some(0));
        assert_eq!(position_from_digits(""), Some(0));
        assert_eq!(
            position_from_digits("18446744073709551615"),
            Some(usize::MAX)
        );
        assert_eq!(position_from_digits("99999999999999999999999"), None);
    }

    #[test]
    fn test_position_text_too_large() {
        assert!(matches!(
            SignaturePosition::from_position_text("'99999999999999999999999'", b'C'),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_expected_residue_is_upper_case() {
        let position = SignaturePosition::from_position_text("'7'", b'c').unwrap();
        assert_eq!(position.position, 7);
        assert_eq!(position.expected_residue, b'C');
        assert_eq!(position.to_string(), "C7");
    }
}
