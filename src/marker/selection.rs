use std::ops::Range;

use crate::error::{MarkerError, Result};

/// A selection in character offsets. `anchor` is where it started, `focus`
/// is where the caret sits; either may come first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    pub const fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub const fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            focus: offset,
        }
    }

    pub fn lo(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn hi(&self) -> usize {
        self.anchor.max(self.focus)
    }

    pub fn range(&self) -> Range<usize> {
        self.lo()..self.hi()
    }

    pub fn len(&self) -> usize {
        self.hi() - self.lo()
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// Same direction as `self`, spanning `lo..hi`.
    pub fn with_range(&self, lo: usize, hi: usize) -> Self {
        if self.is_backward() {
            Self::new(hi, lo)
        } else {
            Self::new(lo, hi)
        }
    }

    /// Fails when either end lies past `len`.
    pub fn validate(&self, len: usize) -> Result<Range<usize>> {
        if self.hi() > len {
            return Err(MarkerError::InvalidSelection {
                anchor: self.anchor,
                focus: self.focus,
                len,
            });
        }
        Ok(self.range())
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_selection_normalizes() {
        let selection = Selection::new(7, 3);
        assert_eq!(selection.range(), 3..7);
        assert!(selection.is_backward());
        assert_eq!(selection.with_range(1, 4), Selection::new(4, 1));
    }

    #[test]
    fn validate_rejects_out_of_bounds() {
        assert_eq!(Selection::new(2, 5).validate(5), Ok(2..5));
        assert_eq!(
            Selection::new(2, 6).validate(5),
            Err(MarkerError::InvalidSelection {
                anchor: 2,
                focus: 6,
                len: 5
            })
        );
    }
}
