use std::collections::BTreeMap;

/// Hands out user-visible integer ids for one entity class.
///
/// Allocation returns the smallest id at or above `floor` that is not held by
/// a live entity, so ids freed by deletion are reused immediately. The floor
/// is 0 for interactive editing and is raised past the largest id after an
/// import, which stops reuse of the ids below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAllocator {
    floor: u32,
}

impl IdAllocator {
    /// Creates an allocator with a floor of 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current floor.
    #[must_use]
    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// Resets the floor to 0.
    pub fn reset(&mut self) {
        self.floor = 0;
    }

    /// Raises the floor to `max_id + 1`, or resets it when nothing was imported.
    pub fn advance_past(&mut self, max_id: Option<u32>) {
        self.floor = max_id.map_or(0, |id| id.saturating_add(1));
    }

    /// Returns the next id to assign given the ids currently in use.
    ///
    /// Searches upward from the floor first. Once every id up to `u32::MAX`
    /// is taken it falls back to the lowest free id below the floor, and
    /// returns `None` only when the whole `u32` range is in use.
    #[must_use]
    pub fn next_available<V>(&self, in_use: &BTreeMap<u32, V>) -> Option<u32> {
        let above = in_use.range(self.floor..).map(|(&id, _)| id);
        first_gap(above, self.floor).or_else(|| {
            let below = in_use.range(..self.floor).map(|(&id, _)| id);
            first_gap(below, 0).filter(|&id| id < self.floor)
        })
    }
}

/// Smallest integer `>= start` missing from the ascending sequence `ids`, or
/// `None` if the sequence runs through `u32::MAX`.
fn first_gap(ids: impl Iterator<Item = u32>, start: u32) -> Option<u32> {
    let mut candidate = start;
    for id in ids {
        match id.cmp(&candidate) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => candidate = candidate.checked_add(1)?,
            std::cmp::Ordering::Greater => break,
        }
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(ids: &[u32]) -> BTreeMap<u32, ()> {
        ids.iter().map(|&id| (id, ())).collect()
    }

    #[test]
    fn empty_set_starts_at_zero() {
        assert_eq!(IdAllocator::new().next_available(&taken(&[])), Some(0));
    }

    #[test]
    fn fills_lowest_gap() {
        let alloc = IdAllocator::new();
        assert_eq!(alloc.next_available(&taken(&[0, 2, 3])), Some(1));
        assert_eq!(alloc.next_available(&taken(&[1, 2])), Some(0));
        assert_eq!(alloc.next_available(&taken(&[0, 1, 2])), Some(3));
    }

    #[test]
    fn floor_skips_lower_gaps() {
        let mut alloc = IdAllocator::new();
        alloc.advance_past(Some(4));
        assert_eq!(alloc.floor(), 5);
        assert_eq!(alloc.next_available(&taken(&[0, 4])), Some(5));
        assert_eq!(alloc.next_available(&taken(&[0, 5, 6, 8])), Some(7));
    }

    #[test]
    fn reset_restores_gap_reuse() {
        let mut alloc = IdAllocator::new();
        alloc.advance_past(Some(9));
        alloc.reset();
        assert_eq!(alloc.next_available(&taken(&[0, 2])), Some(1));
        alloc.advance_past(None);
        assert_eq!(alloc.floor(), 0);
    }

    #[test]
    fn max_id_falls_back_below_floor() {
        let mut alloc = IdAllocator::new();
        alloc.advance_past(Some(u32::MAX));
        assert_eq!(alloc.floor(), u32::MAX);
        assert_eq!(alloc.next_available(&taken(&[])), Some(u32::MAX));
        assert_eq!(alloc.next_available(&taken(&[0, 1, u32::MAX])), Some(2));
    }

    #[test]
    fn exhausted_range_yields_none() {
        let top = [u32::MAX - 1, u32::MAX];
        assert_eq!(first_gap(top.into_iter(), top[0]), None);

        let mut alloc = IdAllocator::new();
        alloc.advance_past(Some(u32::MAX - 2));
        let in_use = taken(&[0, 1, u32::MAX - 1, u32::MAX]);
        assert_eq!(alloc.next_available(&in_use), Some(2));
    }
}
