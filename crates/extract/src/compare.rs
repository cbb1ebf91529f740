//! Reading Order

use crate::models::Metadata;
use std::cmp::Ordering;

impl Ord for Metadata {
    /// Compare two pages by reading order: volume, then chapter, then page.
    ///
    /// `scanner` and `name` are ignored, so two pages at the same position
    /// compare [`Equal`](Ordering::Equal) even when they differ otherwise.
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}
impl PartialOrd for Metadata {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
