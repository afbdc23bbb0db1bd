use crate::domain::model::DistanceRange;

/// Result of matching a distance against a venue's ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome<'a> {
    Selected(&'a DistanceRange),
    /// Nothing matched and no cutoff was hit.
    Unavailable,
    /// A cutoff range starting at `from` was hit.
    Blocked { from: u64 },
}

/// Walks `ranges` in order; the first structural match wins, so an early
/// cutoff pre-empts any later range that overlaps it.
pub fn select_range(ranges: &[DistanceRange], distance: u64) -> RangeOutcome<'_> {
    for range in ranges {
        if range.is_cutoff() {
            if distance >= range.min {
                return RangeOutcome::Blocked { from: range.min };
            }
        } else if range.contains(distance) {
            return RangeOutcome::Selected(range);
        }
    }
    RangeOutcome::Unavailable
}
