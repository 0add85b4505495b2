//! Primary address selection
//!
//! Policy, in order:
//!
//! 1. A previous primary that is in `remained` is kept, even when newer
//!    addresses appeared.
//! 2. Otherwise the first (lexicographically smallest) address of `remained`
//!    is chosen, then of `appeared`.
//! 3. With no candidate the primary is cleared.
//!
//! `changed` reports address-set movement, not whether the primary moved.

use crate::diff::AddressDiff;
use serde::Serialize;

/// How the primary address was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// Previous primary is still present and was kept
    Kept,
    /// Re-selected from addresses present in both runs
    FromRemained,
    /// Re-selected from newly appeared addresses
    FromAppeared,
    /// No eligible address; primary cleared
    Cleared,
}

/// Result of primary selection for one protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimarySelection {
    /// Whether any address appeared or disappeared
    pub changed: bool,
    /// The selected primary address
    pub primary: Option<String>,
    pub outcome: SelectionOutcome,
}

/// Decide the primary address for one protocol
///
/// `diff` must already be scope-filtered; a previous primary outside the
/// filter is treated as stale.
pub fn select_primary(diff: &AddressDiff, previous_primary: Option<&str>) -> PrimarySelection {
    let changed = diff.is_changed();

    if let Some(previous) = previous_primary
        && diff.is_stable(previous)
    {
        return PrimarySelection {
            changed,
            primary: Some(previous.to_string()),
            outcome: SelectionOutcome::Kept,
        };
    }

    let (primary, outcome) = if let Some(candidate) = diff.remained.first() {
        (Some(candidate.clone()), SelectionOutcome::FromRemained)
    } else if let Some(candidate) = diff.appeared.first() {
        (Some(candidate.clone()), SelectionOutcome::FromAppeared)
    } else {
        (None, SelectionOutcome::Cleared)
    };

    PrimarySelection {
        changed,
        primary,
        outcome,
    }
}
