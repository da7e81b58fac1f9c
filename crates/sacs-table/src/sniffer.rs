//! Header-row sniffing for exports with a variable preamble.

use tracing::warn;

use crate::RawTable;

/// A token that must appear in at least one cell of a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Lowercased cell contains the (lowercase) needle.
    Contains(&'static str),
    /// Trimmed cell equals the needle, ASCII case-insensitive.
    EqualsIgnoreCase(&'static str),
    /// Trimmed cell equals the needle exactly.
    Exact(&'static str),
}

impl Marker {
    pub fn matches(&self, cell: &str) -> bool {
        match *self {
            Marker::Contains(needle) => cell.to_lowercase().contains(needle),
            Marker::EqualsIgnoreCase(needle) => cell.trim().eq_ignore_ascii_case(needle),
            Marker::Exact(needle) => cell.trim() == needle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    Found(usize),
    Fallback(usize),
}

impl HeaderMatch {
    pub fn index(self) -> usize {
        match self {
            HeaderMatch::Found(i) | HeaderMatch::Fallback(i) => i,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, HeaderMatch::Fallback(_))
    }
}

/// Scans the first `window` rows for one where every marker hits some cell.
///
/// When nothing matches, `fallback` is returned instead of an error. A wrong
/// fallback surfaces later as a missing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProbe {
    pub window: usize,
    pub markers: &'static [Marker],
    pub fallback: usize,
}

impl HeaderProbe {
    pub const fn new(window: usize, markers: &'static [Marker], fallback: usize) -> Self {
        Self {
            window,
            markers,
            fallback,
        }
    }

    pub fn matches_row(&self, cells: &[String]) -> bool {
        self.markers
            .iter()
            .all(|marker| cells.iter().any(|cell| marker.matches(cell)))
    }

    pub fn locate(&self, table: &RawTable) -> HeaderMatch {
        let found = table
            .rows
            .iter()
            .take(self.window)
            .position(|cells| self.matches_row(cells));

        match found {
            Some(i) => HeaderMatch::Found(i),
            None => {
                warn!(
                    fallback = self.fallback,
                    window = self.window,
                    "no header row matched {:?}; assuming row {}",
                    self.markers,
                    self.fallback
                );
                HeaderMatch::Fallback(self.fallback)
            }
        }
    }
}
