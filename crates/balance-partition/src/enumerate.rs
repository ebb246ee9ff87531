use balance_core::Count;
use serde::{Deserialize, Serialize};

/// Number of coins taken from each input part for the left and right pans.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PanSelection {
    /// Coins per part on the left pan.
    pub left: Vec<Count>,
    /// Coins per part on the right pan.
    pub right: Vec<Count>,
}

impl PanSelection {
    /// Coins on each pan.
    pub fn pan_size(&self) -> u32 {
        self.left.iter().map(|&count| count as u32).sum()
    }

    /// Same selection with the pans exchanged.
    pub fn mirrored(&self) -> Self {
        Self {
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }

    /// True when swapping the pans leaves the selection unchanged.
    pub fn is_symmetric(&self) -> bool {
        self.left == self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    SelectRight,
    Emitting,
    Done,
}

/// Yields every weighing of a partition exactly once up to mirroring.
///
/// Selections satisfy `left[i] + right[i] <= parts[i]`, equal non-zero pan
/// sizes and `right <= left` lexicographically. Pan size ascends; for a fixed
/// pan size the left selection descends lexicographically and, for each left
/// selection, the right selection descends from the largest admissible one.
///
/// When a left selection admits no right selection, no lexicographically
/// smaller left selection of the same pan size admits one either, so the
/// enumerator moves straight to the next pan size.
#[derive(Debug, Clone)]
pub struct WeighingEnumerator<'a> {
    parts: &'a [Count],
    coins: u32,
    pan: Count,
    left: Vec<Count>,
    right: Vec<Count>,
    residual: Vec<Count>,
    phase: Phase,
}

impl<'a> WeighingEnumerator<'a> {
    /// Starts an enumeration over the given part sizes.
    pub fn new(parts: &'a [Count]) -> Self {
        Self {
            parts,
            coins: parts.iter().map(|&size| size as u32).sum(),
            pan: 0,
            left: vec![0; parts.len()],
            right: vec![0; parts.len()],
            residual: parts.to_vec(),
            phase: Phase::Start,
        }
    }

    fn current(&self) -> PanSelection {
        PanSelection {
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Moves to the lexicographically largest left selection of `pan` coins.
    fn start_pan(&mut self, pan: u32) -> bool {
        if pan == 0 || 2 * pan > self.coins {
            return false;
        }
        self.pan = pan as Count;
        refill(&mut self.left, self.parts, pan);
        true
    }

    fn refresh_residual(&mut self) {
        for (slot, (&size, &left)) in self.residual.iter_mut().zip(self.parts.iter().zip(&self.left)) {
            *slot = size - left;
        }
    }

    /// Picks the largest right selection that respects capacity and stays
    /// lexicographically at or below the left selection.
    fn select_right(&mut self) -> bool {
        self.refresh_residual();
        let n = self.parts.len();
        let left = &self.left;
        let residual = &self.residual;

        let mut free_after = vec![0u32; n + 1];
        let mut tight_after = vec![0u32; n + 1];
        for i in (0..n).rev() {
            free_after[i] = free_after[i + 1] + residual[i] as u32;
            let mut best = 0;
            if left[i] <= residual[i] {
                best = left[i] as u32 + tight_after[i + 1];
            }
            if left[i] > 0 {
                let below = (left[i] - 1).min(residual[i]) as u32;
                best = best.max(below + free_after[i + 1]);
            }
            tight_after[i] = best;
        }

        let mut remaining = self.pan as u32;
        let mut tight = true;
        for i in 0..n {
            let wanted = left[i] as u32;
            if !tight {
                let take = remaining.min(residual[i] as u32);
                self.right[i] = take as Count;
                remaining -= take;
                continue;
            }
            if left[i] <= residual[i] && tight_after[i + 1] >= remaining - wanted {
                self.right[i] = left[i];
                remaining -= wanted;
                continue;
            }
            if wanted == 0 {
                return false;
            }
            let take = (wanted - 1).min(residual[i] as u32).min(remaining);
            if free_after[i + 1] < remaining - take {
                return false;
            }
            self.right[i] = take as Count;
            remaining -= take;
            tight = false;
        }
        debug_assert_eq!(remaining, 0);
        true
    }
}

impl Iterator for WeighingEnumerator<'_> {
    type Item = PanSelection;

    fn next(&mut self) -> Option<PanSelection> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Start => {
                    self.phase = if self.start_pan(1) {
                        Phase::SelectRight
                    } else {
                        Phase::Done
                    };
                }
                Phase::SelectRight => {
                    if self.select_right() {
                        self.phase = Phase::Emitting;
                        return Some(self.current());
                    }
                    // Smaller left selections of this pan size cannot succeed.
                    let next = self.pan as u32 + 1;
                    if !self.start_pan(next) {
                        self.phase = Phase::Done;
                    }
                }
                Phase::Emitting => {
                    if step_down(&mut self.right, &self.residual) {
                        return Some(self.current());
                    }
                    if step_down(&mut self.left, self.parts) {
                        self.phase = Phase::SelectRight;
                        continue;
                    }
                    let next = self.pan as u32 + 1;
                    self.phase = if self.start_pan(next) {
                        Phase::SelectRight
                    } else {
                        Phase::Done
                    };
                }
            }
        }
    }
}

/// Greedily places `count` coins from the front, as many per slot as capacity allows.
fn refill(selection: &mut [Count], capacity: &[Count], mut count: u32) {
    for (slot, &cap) in selection.iter_mut().zip(capacity) {
        let take = count.min(cap as u32);
        *slot = take as Count;
        count -= take;
    }
    assert_eq!(count, 0, "selection does not fit the available capacity");
}

/// Replaces `selection` by the next lexicographically smaller vector with the
/// same total and the same per-slot capacity. Returns false when none exists.
fn step_down(selection: &mut [Count], capacity: &[Count]) -> bool {
    let mut carried = 0u32;
    let mut spare_after = false;
    for i in (0..selection.len()).rev() {
        if spare_after && selection[i] > 0 {
            selection[i] -= 1;
            refill(&mut selection[i + 1..], &capacity[i + 1..], carried + 1);
            return true;
        }
        if selection[i] < capacity[i] {
            spare_after = true;
        }
        carried += selection[i] as u32;
    }
    false
}
