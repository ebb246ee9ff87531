use balance_core::Count;

/// Walks every way of dividing one input part's heavy count over the output
/// parts the weighing cut it into.
///
/// Each variant stores the output column indexes and their capacities;
/// `reset` loads the first split of a total and `advance` steps to the next.
#[derive(Debug, Clone)]
pub(crate) enum Splitter {
    Whole {
        slot: usize,
        value: Count,
    },
    Pair {
        slots: [usize; 2],
        caps: [Count; 2],
        total: Count,
        first: Count,
    },
    Triple {
        slots: [usize; 3],
        caps: [Count; 3],
        total: Count,
        first: Count,
        second: Count,
    },
}

impl Splitter {
    /// Builds the splitter for an input part cut into the given output columns.
    pub(crate) fn new(slots: &[usize], sizes: &[Count]) -> Self {
        match *slots {
            [slot] => Splitter::Whole { slot, value: 0 },
            [a, b] => Splitter::Pair {
                slots: [a, b],
                caps: [sizes[a], sizes[b]],
                total: 0,
                first: 0,
            },
            [a, b, c] => Splitter::Triple {
                slots: [a, b, c],
                caps: [sizes[a], sizes[b], sizes[c]],
                total: 0,
                first: 0,
                second: 0,
            },
            _ => panic!("a weighing cuts a part into 1..=3 pieces, got {}", slots.len()),
        }
    }

    /// Loads the first split of `total`; false when the capacities cannot hold it.
    pub(crate) fn reset(&mut self, new_total: Count) -> bool {
        match self {
            Splitter::Whole { value, .. } => {
                *value = new_total;
                true
            }
            Splitter::Pair {
                caps, total, first, ..
            } => {
                *total = new_total;
                *first = new_total.min(caps[0]);
                new_total - *first <= caps[1]
            }
            Splitter::Triple {
                caps,
                total,
                first,
                second,
                ..
            } => {
                *total = new_total;
                *first = new_total.min(caps[0]);
                *second = (new_total - *first).min(caps[1]);
                new_total - *first - *second <= caps[2]
            }
        }
    }

    /// Steps to the next split; false once every split has been visited.
    pub(crate) fn advance(&mut self) -> bool {
        match self {
            Splitter::Whole { .. } => false,
            Splitter::Pair {
                caps, total, first, ..
            } => {
                if *first > total.saturating_sub(caps[1]) {
                    *first -= 1;
                    true
                } else {
                    false
                }
            }
            Splitter::Triple {
                caps,
                total,
                first,
                second,
                ..
            } => {
                let rest = *total - *first;
                if *second > rest.saturating_sub(caps[2]) {
                    *second -= 1;
                    return true;
                }
                if *first > total.saturating_sub(caps[1] + caps[2]) {
                    *first -= 1;
                    *second = (*total - *first).min(caps[1]);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Writes the current split into its output columns.
    pub(crate) fn write(&self, row: &mut [Count]) {
        match self {
            Splitter::Whole { slot, value } => row[*slot] = *value,
            Splitter::Pair {
                slots,
                total,
                first,
                ..
            } => {
                row[slots[0]] = *first;
                row[slots[1]] = *total - *first;
            }
            Splitter::Triple {
                slots,
                total,
                first,
                second,
                ..
            } => {
                row[slots[0]] = *first;
                row[slots[1]] = *second;
                row[slots[2]] = *total - *first - *second;
            }
        }
    }
}
