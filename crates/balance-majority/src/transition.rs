//! Outcome computation for a weighing applied to a set of distributions.

use balance_core::{Count, Outcome, OutcomeArray, Placement};
use balance_partition::Weighing;

use crate::split::Splitter;
use crate::state::Distribution;

/// Splits every distribution over the weighing's output partition and buckets
/// the results by the outcome they would produce.
///
/// `in_sizes` is the partition the rows are expressed over and `out_sizes` the
/// partition the weighing refines it into. Buckets come back sorted and free
/// of duplicates; an empty bucket is an impossible outcome.
pub fn apply_weighing_to_distributions(
    in_sizes: &[Count],
    rows: &[Distribution],
    weighing: &Weighing,
    out_sizes: &[Count],
) -> OutcomeArray<Vec<Distribution>> {
    let provenance = weighing.provenance();
    assert_eq!(provenance.len(), out_sizes.len(), "descriptor does not match its partition");
    assert!(out_sizes.len() >= in_sizes.len());

    let mut buckets: OutcomeArray<Vec<Distribution>> = Default::default();
    if out_sizes.len() == in_sizes.len() {
        // Nothing is cut, so the columns must already line up.
        for (column, entry) in provenance.iter().enumerate() {
            assert_eq!(entry.part as usize, column, "unrefined weighing reorders parts");
        }
        for row in rows {
            let outcome = score(row, weighing);
            buckets[outcome.index()].push(row.clone());
        }
    } else {
        let mut slots: Vec<Vec<usize>> = vec![Vec::new(); in_sizes.len()];
        for (column, entry) in provenance.iter().enumerate() {
            slots[entry.part as usize].push(column);
        }
        let mut splitters: Vec<Splitter> = slots
            .iter()
            .map(|columns| Splitter::new(columns, out_sizes))
            .collect();
        let mut refined = vec![0; out_sizes.len()];
        for row in rows {
            if !splitters
                .iter_mut()
                .zip(row)
                .all(|(splitter, &count)| splitter.reset(count))
            {
                continue;
            }
            loop {
                for splitter in &splitters {
                    splitter.write(&mut refined);
                }
                let outcome = score(&refined, weighing);
                buckets[outcome.index()].push(refined.clone());
                if !advance_odometer(&mut splitters, row) {
                    break;
                }
            }
        }
    }

    for bucket in &mut buckets {
        bucket.sort_unstable();
        bucket.dedup();
    }
    buckets
}

/// Steps the last splitter that still has a split left, rewinding the ones after it.
fn advance_odometer(splitters: &mut [Splitter], row: &[Count]) -> bool {
    for position in (0..splitters.len()).rev() {
        if splitters[position].advance() {
            for (splitter, &count) in splitters[position + 1..].iter_mut().zip(&row[position + 1..]) {
                splitter.reset(count);
            }
            return true;
        }
    }
    false
}

fn score(row: &[Count], weighing: &Weighing) -> Outcome {
    let mut left = 0u32;
    let mut right = 0u32;
    for (&count, entry) in row.iter().zip(weighing.provenance()) {
        match entry.placement {
            Placement::Left => left += count as u32,
            Placement::Right => right += count as u32,
            Placement::Aside => {}
        }
    }
    Outcome::from_pan_counts(left, right)
}
