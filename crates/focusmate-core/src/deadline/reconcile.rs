//! Display-order reconciliation for a user's deadline list.
//!
//! Incomplete items must carry the dense rank set `{1..N}` and completed
//! items the `-1` sentinel. Nothing in the schema enforces this — explicit
//! reorders write caller positions verbatim and completion toggles punch
//! `-1` holes — so every list read runs this pass and persists the deltas.
//!
//! The pass is a stable re-rank, not a resort: relative order within each
//! partition is taken from the input sequence, which callers produce in
//! ascending `(display_order, id)`.

use crate::model::DONE_ORDER;

/// The ordering-relevant slice of one deadline row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRow {
    pub id: i64,
    pub display_order: i64,
    pub is_done: bool,
}

/// One corrective write: set `display_order` of item `id` to `new_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFix {
    pub id: i64,
    pub new_order: i64,
}

/// Compute the minimal set of `display_order` writes that restores the
/// dense-rank invariant over `rows`.
///
/// `rows` must already be in read order (ascending `display_order`, ties
/// broken by id). Incomplete items are assigned ranks `1..=N` in that
/// order; every completed item is assigned [`DONE_ORDER`]. Only rows whose
/// stored value differs from the assignment are emitted, so running the
/// pass twice without an intervening mutation yields an empty fix list.
#[must_use]
pub fn reconcile(rows: &[OrderRow]) -> Vec<OrderFix> {
    let mut fixes = Vec::new();
    let mut next_rank = 1_i64;

    for row in rows {
        let want = if row.is_done {
            DONE_ORDER
        } else {
            let rank = next_rank;
            next_rank += 1;
            rank
        };

        if row.display_order != want {
            fixes.push(OrderFix {
                id: row.id,
                new_order: want,
            });
        }
    }

    fixes
}

/// Apply a fix list to an in-memory row set, returning the corrected rows
/// in final list order: incomplete items ascending by rank, then completed
/// items.
///
/// Callers that just persisted the fixes use this to answer the read
/// without a second round-trip to storage.
#[must_use]
pub fn apply_order<T, FOrder, FDone>(
    mut rows: Vec<T>,
    fixes: &[OrderFix],
    id_of: impl Fn(&T) -> i64,
    mut set_order: FOrder,
    is_done: FDone,
) -> Vec<T>
where
    FOrder: FnMut(&mut T, i64),
    FDone: Fn(&T) -> bool,
{
    for row in &mut rows {
        if let Some(fix) = fixes.iter().find(|fix| fix.id == id_of(row)) {
            set_order(row, fix.new_order);
        }
    }

    // Input order is already the partition order, so a stable partition
    // (incomplete first) is the final list order.
    let (done, mut ranked): (Vec<T>, Vec<T>) = rows.into_iter().partition(|row| is_done(row));
    ranked.extend(done);
    ranked
}
