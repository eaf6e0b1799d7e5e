//! Collapses version rows into the current version of each subscription.
//!
//! The current version is the row with the latest `start_date`, which is not
//! necessarily the most recently inserted one. Rows with equal `start_date`
//! are ordered by `row_id`, higher wins.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::models::SortOrder;
use super::models::Subscription;
use super::models::SubscriptionId;

/// Pick the current row of every subscription present in `rows`.
///
/// # Returns
/// Exactly one row per distinct `subscription_id`, ordered by `subscription_id`.
/// The result does not depend on the order of the input.
pub fn resolve(rows: impl IntoIterator<Item = Subscription>) -> Vec<Subscription> {
    let mut current: BTreeMap<SubscriptionId, Subscription> = BTreeMap::new();

    for row in rows {
        match current.entry(row.subscription_id) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if supersedes(&row, slot.get()) {
                    slot.insert(row);
                }
            }
        }
    }

    current.into_values().collect()
}

/// Current row of a single subscription, `None` when there are no rows.
pub fn resolve_one(rows: impl IntoIterator<Item = Subscription>) -> Option<Subscription> {
    rows.into_iter().reduce(|best, row| {
        if supersedes(&row, &best) {
            row
        } else {
            best
        }
    })
}

/// Whether `candidate` replaces `incumbent` as the current version.
pub fn supersedes(candidate: &Subscription, incumbent: &Subscription) -> bool {
    (candidate.start_date, candidate.row_id) > (incumbent.start_date, incumbent.row_id)
}

/// Sort resolved subscriptions in place. Equal keys keep their relative order.
pub fn sort(subscriptions: &mut [Subscription], order: SortOrder) {
    subscriptions.sort_by(|a, b| compare(a, b, order));
}

fn compare(a: &Subscription, b: &Subscription, order: SortOrder) -> Ordering {
    match order {
        SortOrder::StartDateAsc => a.start_date.cmp(&b.start_date),
        SortOrder::StartDateDesc => b.start_date.cmp(&a.start_date),
        SortOrder::PriceAsc => a.price.value().total_cmp(&b.price.value()),
        SortOrder::PriceDesc => b.price.value().total_cmp(&a.price.value()),
    }
}
