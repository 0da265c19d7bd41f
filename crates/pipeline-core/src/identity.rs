//! Single-symbol instruction identities.
//!
//! An instruction is named by one letter of the alphabet `a..=y`. Identities
//! are case-insensitive (`'B'` and `'b'` are the same instruction) and double
//! as the direct-mapped slot key into the dependency graph's node storage.

use std::fmt;

use crate::GraphError;

/// First symbol of the instruction alphabet.
pub const ALPHABET_START: char = 'a';

/// Last symbol of the instruction alphabet.
pub const ALPHABET_END: char = 'y';

/// Number of distinct instruction identities.
pub const ALPHABET_LEN: usize = 25;

/// Case-folded instruction identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char", into = "char"))]
pub struct InstructionId(u8);

impl InstructionId {
    /// Builds an identity from a symbol, folding upper case to lower case.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownIdentity`] when the folded symbol falls
    /// outside `a..=y`.
    pub fn new(symbol: char) -> Result<Self, GraphError> {
        let folded = symbol.to_ascii_lowercase();
        if !(ALPHABET_START..=ALPHABET_END).contains(&folded) {
            return Err(GraphError::UnknownIdentity(symbol));
        }
        u8::try_from(folded)
            .map(Self)
            .map_err(|_| GraphError::UnknownIdentity(symbol))
    }

    /// Returns the identity stored in dense slot `index`, if any.
    #[must_use]
    pub fn from_slot_index(index: usize) -> Option<Self> {
        if index >= ALPHABET_LEN {
            return None;
        }
        u8::try_from(index).ok().map(|offset| Self(b'a' + offset))
    }

    /// Lower-case symbol for this identity.
    #[must_use]
    pub const fn symbol(self) -> char {
        self.0 as char
    }

    /// Dense slot index: the folded symbol minus the alphabet's first symbol.
    #[must_use]
    pub fn slot_index(self) -> usize {
        usize::from(self.0 - b'a')
    }

    /// Identity one symbol earlier in program order (`b` -> `a`).
    #[must_use]
    pub const fn predecessor(self) -> Option<Self> {
        if self.0 > b'a' {
            Some(Self(self.0 - 1))
        } else {
            None
        }
    }

    /// Signed symbol distance from `earlier` to `self`.
    ///
    /// Used as the informational edge weight between a dependent instruction
    /// and the instruction it depends on.
    #[must_use]
    pub fn distance_from(self, earlier: Self) -> i32 {
        i32::from(self.0) - i32::from(earlier.0)
    }
}

impl TryFrom<char> for InstructionId {
    type Error = GraphError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Self::new(symbol)
    }
}

impl From<InstructionId> for char {
    fn from(id: InstructionId) -> Self {
        id.symbol()
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
