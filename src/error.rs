use core::fmt;

/// Menu construction errors. All of them are mistakes in the menu setup,
/// there is nothing to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    ///an enumeration needs at least one candidate
    NoChoices,
    ///the initially selected candidate does not exist
    SelectionOutOfRange { index: usize, len: usize },
    ///min > max, zero step or initial value outside of [min, max]
    InvalidRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoChoices => f.write_str("enumeration has no candidates"),
            Error::SelectionOutOfRange { index, len } => write!(
                f,
                "selected candidate {} is out of range (0..{})",
                index, len
            ),
            Error::InvalidRange => f.write_str("invalid value range"),
        }
    }
}
