// Ranking and byte budgeting for the digest.
//
// The trim bounds the digest only; the archive always receives every
// classified item from the run.

use litscout_common::ClassifiedItem;

use crate::digest::digest_line;

/// Order items Primary-first (insertion order preserved within a tier) and
/// cut the list where rendered digest lines would exceed `byte_budget`.
pub fn rank_and_trim(mut items: Vec<ClassifiedItem>, byte_budget: usize) -> Vec<ClassifiedItem> {
    items.sort_by(|a, b| b.tier.cmp(&a.tier));

    let mut used = 0usize;
    let mut kept = Vec::new();
    for item in items {
        let cost = digest_line(&item).len() + 1;
        if used + cost > byte_budget {
            break;
        }
        used += cost;
        kept.push(item);
    }
    kept
}
