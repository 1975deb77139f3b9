//! # Period Summary
//!
//! Totals over a filtered slice of a running-balance stream.
//!
//! ## The One Invariant That Matters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Filtering changes which ROWS are shown.                                │
//! │  It NEVER changes the customer's true balance.                          │
//! │                                                                         │
//! │  total_debit / total_credit  ──► sums over the FILTERED subset          │
//! │  closing_balance             ──► last entry of the FULL stream, always  │
//! │                                                                         │
//! │  A "payments only" statement view shows only payment credits, but the   │
//! │  closing balance still reflects every sale. Getting this wrong means    │
//! │  showing the shop owner a wrong amount owed.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ledger::{BalanceSide, EntryKind, RunningBalanceEntry};
use crate::money::Money;

// =============================================================================
// Entry Filter
// =============================================================================

/// Which entries a statement view shows.
///
/// The default filter matches everything. Date bounds are inclusive; an
/// entry with an unknown date (an undated `Opening`) only matches when no
/// date bound is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    /// Restrict to these kinds; `None` means all kinds.
    #[serde(default)]
    pub kinds: Option<Vec<EntryKind>>,

    /// Inclusive lower date bound.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub from: Option<DateTime<Utc>>,

    /// Inclusive upper date bound.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub to: Option<DateTime<Utc>>,
}

impl EntryFilter {
    /// A filter that matches every entry (the identity view).
    pub fn all() -> Self {
        EntryFilter::default()
    }

    /// A filter restricted to a single entry kind.
    pub fn only(kind: EntryKind) -> Self {
        EntryFilter {
            kinds: Some(vec![kind]),
            ..EntryFilter::default()
        }
    }

    /// Whether the given annotated entry is visible under this filter.
    pub fn matches(&self, entry: &RunningBalanceEntry) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&entry.entry.kind) {
                return false;
            }
        }

        match entry.entry.occurred_at {
            Some(at) => {
                if let Some(from) = self.from {
                    if at < from {
                        return false;
                    }
                }
                if let Some(to) = self.to {
                    if at > to {
                        return false;
                    }
                }
                true
            }
            // Undated entries only appear in unbounded views.
            None => self.from.is_none() && self.to.is_none(),
        }
    }
}

// =============================================================================
// Period Summary
// =============================================================================

/// Statement totals for a (possibly filtered) view of one customer's stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// Sum of debits over the filtered subset.
    pub total_debit: Money,

    /// Sum of credits over the filtered subset.
    pub total_credit: Money,

    /// The true balance: the running balance of the LAST entry of the full,
    /// unfiltered stream. Zero for an empty stream. Never recomputed from
    /// the filtered totals.
    pub closing_balance: Money,

    /// How many entries the filtered view contains.
    pub entry_count: usize,
}

impl PeriodSummary {
    /// Which side the closing balance sits on.
    #[inline]
    pub fn closing_side(&self) -> BalanceSide {
        BalanceSide::of(self.closing_balance)
    }
}

/// Reduces an annotated stream to statement totals under a filter.
///
/// `total_debit`/`total_credit`/`entry_count` cover only the entries the
/// filter admits; `closing_balance` always comes from the last entry of the
/// full stream.
pub fn summarize(entries: &[RunningBalanceEntry], filter: &EntryFilter) -> PeriodSummary {
    let mut total_debit = Money::zero();
    let mut total_credit = Money::zero();
    let mut entry_count = 0usize;

    for entry in entries.iter().filter(|e| filter.matches(e)) {
        total_debit += entry.entry.debit;
        total_credit += entry.entry.credit;
        entry_count += 1;
    }

    let closing_balance = entries
        .last()
        .map(|e| e.running_balance)
        .unwrap_or_else(Money::zero);

    PeriodSummary {
        total_debit,
        total_credit,
        closing_balance,
        entry_count,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{running_balances, LedgerEntry};

    fn stream() -> Vec<RunningBalanceEntry> {
        // Opening Dr 500, sale Dr 1200, payment Cr 800, sale Dr 300.
        let t = |s: &str| s.parse::<DateTime<Utc>>().ok();
        let entries = vec![
            LedgerEntry::new("1", EntryKind::Opening, None, Money::from_cents(50_000), Money::zero(), ""),
            LedgerEntry::new("2", EntryKind::Sale, t("2024-02-01T00:00:00Z"), Money::from_cents(120_000), Money::zero(), ""),
            LedgerEntry::new("3", EntryKind::Payment, t("2024-02-15T00:00:00Z"), Money::zero(), Money::from_cents(80_000), ""),
            LedgerEntry::new("4", EntryKind::Sale, t("2024-03-01T00:00:00Z"), Money::from_cents(30_000), Money::zero(), ""),
        ];
        running_balances(&entries).unwrap()
    }

    #[test]
    fn test_identity_view_totals() {
        let summary = summarize(&stream(), &EntryFilter::all());
        assert_eq!(summary.total_debit.cents(), 200_000);
        assert_eq!(summary.total_credit.cents(), 80_000);
        assert_eq!(summary.closing_balance.cents(), 120_000);
        assert_eq!(summary.entry_count, 4);
        assert_eq!(summary.closing_side(), BalanceSide::Dr);
    }

    #[test]
    fn test_payments_only_view_keeps_true_closing_balance() {
        // "payments only" shows payment credits, but the closing balance
        // still reflects the sales.
        let summary = summarize(&stream(), &EntryFilter::only(EntryKind::Payment));
        assert_eq!(summary.total_debit.cents(), 0);
        assert_eq!(summary.total_credit.cents(), 80_000);
        assert_eq!(summary.entry_count, 1);
        assert_eq!(summary.closing_balance.cents(), 120_000);
    }

    #[test]
    fn test_closing_balance_independent_of_any_filter() {
        let entries = stream();
        let identity = summarize(&entries, &EntryFilter::all());

        let filters = vec![
            EntryFilter::only(EntryKind::Sale),
            EntryFilter::only(EntryKind::Opening),
            EntryFilter {
                kinds: None,
                from: "2024-02-10T00:00:00Z".parse().ok(),
                to: None,
            },
            EntryFilter {
                // Matches nothing at all.
                kinds: Some(vec![]),
                from: None,
                to: None,
            },
        ];
        for filter in filters {
            let filtered = summarize(&entries, &filter);
            assert_eq!(filtered.closing_balance, identity.closing_balance);
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = EntryFilter {
            kinds: None,
            from: "2024-02-01T00:00:00Z".parse().ok(),
            to: "2024-02-15T00:00:00Z".parse().ok(),
        };
        let summary = summarize(&stream(), &filter);
        // The sale on Feb 1 and the payment on Feb 15 both fall inside;
        // the undated opening and the March sale do not.
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.total_debit.cents(), 120_000);
        assert_eq!(summary.total_credit.cents(), 80_000);
    }

    #[test]
    fn test_undated_entries_match_only_unbounded_views() {
        let unbounded = summarize(&stream(), &EntryFilter::only(EntryKind::Opening));
        assert_eq!(unbounded.entry_count, 1);

        let bounded = EntryFilter {
            kinds: Some(vec![EntryKind::Opening]),
            from: "2000-01-01T00:00:00Z".parse().ok(),
            to: None,
        };
        assert_eq!(summarize(&stream(), &bounded).entry_count, 0);
    }

    #[test]
    fn test_empty_stream_summarizes_to_zero() {
        let summary = summarize(&[], &EntryFilter::all());
        assert!(summary.total_debit.is_zero());
        assert!(summary.total_credit.is_zero());
        assert!(summary.closing_balance.is_zero());
        assert_eq!(summary.entry_count, 0);
        // Zero is Dr by convention.
        assert_eq!(summary.closing_side(), BalanceSide::Dr);
    }
}
