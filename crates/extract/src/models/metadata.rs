/// Position of a single page within a series, as derived from its filename.
///
/// Ordering (see the [`Ord`] implementation) only looks at `volume`,
/// `chapter` and `page`; `scanner` and `name` are carried along for naming
/// the output archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Credit/group identifier, empty when the filename carries none
    pub scanner: String,
    pub volume: u64,
    pub chapter: u64,
    pub page: u64,
    /// Series name (or whatever the format captured as `name`)
    pub name: String,
}
impl Metadata {
    /// The `(volume, chapter, page)` triple that defines reading order.
    #[inline]
    #[must_use]
    pub fn position(&self) -> (u64, u64, u64) {
        (self.volume, self.chapter, self.page)
    }
}
