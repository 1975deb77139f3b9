//! # Ledger Module
//!
//! The per-customer transaction stream and the running-balance fold.
//!
//! ## Balance Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Customer, One Stream                             │
//! │                                                                         │
//! │  Opening (Dr 500) ──► Sale (Dr 1200) ──► Payment (Cr 800)               │
//! │        │                    │                   │                       │
//! │        ▼                    ▼                   ▼                       │
//! │  balance = 500        balance = 1700      balance = 900                 │
//! │                                                                         │
//! │  balance[i] = balance[i-1] + debit[i] - credit[i],  balance[-1] = 0     │
//! │                                                                         │
//! │  Positive balance → "Dr" (customer owes the store)                      │
//! │  Negative balance → "Cr" (store owes the customer, e.g. overpayment)    │
//! │  Zero             → "Dr" by convention                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Entries are processed in the exact order the store returns them
//! (chronological by construction upstream). The fold NEVER re-sorts; a
//! re-sort here would disagree with what the storage layer persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use ts_rs::TS;

use crate::error::{LedgerError, LedgerResult};
use crate::money::Money;

// =============================================================================
// Entry Kind
// =============================================================================

/// The kind of event a ledger entry records.
///
/// A real enum, deliberately: every `match` over entry kinds is exhaustive,
/// so adding a fourth kind later fails to compile until every consumer
/// handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// The synthetic first entry carrying the customer's starting balance.
    Opening,
    /// A sale on credit: debit, the customer owes more.
    Sale,
    /// A payment received: credit, the customer owes less.
    Payment,
}

impl EntryKind {
    /// Prefix used when deriving a human-readable transaction reference.
    pub const fn reference_prefix(&self) -> &'static str {
        match self {
            EntryKind::Opening => "OPN",
            EntryKind::Sale => "SAL",
            EntryKind::Payment => "PAY",
        }
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// One event affecting a customer's balance.
///
/// ## Invariant
/// Exactly one of `debit`/`credit` is nonzero — an entry that is
/// simultaneously a debit and a credit is invalid. The single exception:
/// an `Opening` entry may be all-zero (a customer starting at zero).
///
/// Entries are immutable once created, except that a `Sale` entry's debit is
/// recomputed (not reversed) when the underlying sale is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Opaque identifier, unique within the customer's stream.
    pub id: String,

    /// What kind of event this is.
    pub kind: EntryKind,

    /// When the event occurred. `None` on an `Opening` entry whose date is
    /// unknown; the renderer shows a blank, never a literal epoch date.
    #[ts(as = "Option<String>")]
    pub occurred_at: Option<DateTime<Utc>>,

    /// Non-negative amount increasing what the customer owes.
    pub debit: Money,

    /// Non-negative amount decreasing what the customer owes.
    pub credit: Money,

    /// Free text, may be empty.
    pub description: String,

    /// Human-readable transaction number, e.g. "SAL-42".
    pub reference: String,
}

impl LedgerEntry {
    /// Creates an entry, deriving the reference from kind + id.
    pub fn new(
        id: impl Into<String>,
        kind: EntryKind,
        occurred_at: Option<DateTime<Utc>>,
        debit: Money,
        credit: Money,
        description: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let reference = format!("{}-{}", kind.reference_prefix(), id);
        LedgerEntry {
            id,
            kind,
            occurred_at,
            debit,
            credit,
            description: description.into(),
            reference,
        }
    }

    /// Checks the debit/credit invariant, failing fast on violation.
    ///
    /// A malformed entry is fatal for the whole stream: treating it as zero
    /// would silently shift every balance after it.
    pub fn validate(&self) -> LedgerResult<()> {
        let malformed = |reason: &str| {
            warn!(entry_id = %self.id, reason, "malformed ledger entry");
            Err(LedgerError::MalformedLedgerEntry {
                entry_id: self.id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.debit.is_negative() || self.credit.is_negative() {
            return malformed("negative debit or credit amount");
        }
        if !self.debit.is_zero() && !self.credit.is_zero() {
            return malformed("both debit and credit are nonzero");
        }
        if self.debit.is_zero() && self.credit.is_zero() && self.kind != EntryKind::Opening {
            return malformed("both debit and credit are zero");
        }
        Ok(())
    }

    /// The signed effect of this entry on the balance (debit − credit).
    #[inline]
    pub fn signed_amount(&self) -> Money {
        self.debit - self.credit
    }
}

// =============================================================================
// Balance Side (Dr / Cr)
// =============================================================================

/// Which side of the khata a balance sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSide {
    /// Customer owes the store (balance >= 0; zero is Dr by convention).
    Dr,
    /// Store owes the customer (balance < 0).
    Cr,
}

impl BalanceSide {
    /// Classifies a signed balance. Non-negative → Dr, strictly negative → Cr.
    #[inline]
    pub fn of(balance: Money) -> Self {
        if balance.is_negative() {
            BalanceSide::Cr
        } else {
            BalanceSide::Dr
        }
    }
}

impl fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceSide::Dr => write!(f, "Dr"),
            BalanceSide::Cr => write!(f, "Cr"),
        }
    }
}

/// Formats a signed balance the way statements print it: `abs` + side label,
/// e.g. `900.00 Dr` or `200.00 Cr`.
pub fn format_balance(balance: Money) -> String {
    format!("{} {}", balance.abs(), BalanceSide::of(balance))
}

// =============================================================================
// Running Balance
// =============================================================================

/// A ledger entry annotated with the balance after applying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RunningBalanceEntry {
    /// The underlying entry, unchanged.
    #[serde(flatten)]
    pub entry: LedgerEntry,

    /// Signed balance after this entry. Positive = Dr, negative = Cr.
    pub running_balance: Money,
}

impl RunningBalanceEntry {
    /// Which side of the khata the balance sits on after this entry.
    #[inline]
    pub fn side(&self) -> BalanceSide {
        BalanceSide::of(self.running_balance)
    }
}

/// Folds an ordered entry stream into running balances.
///
/// Single left-to-right pass: `balance += debit − credit`. No look-ahead, no
/// reordering. Every entry is validated before it is applied; the first
/// malformed entry aborts the whole fold.
///
/// An empty stream produces an empty output (implicit closing balance 0).
///
/// ## Example
/// ```rust
/// use khata_core::ledger::{running_balances, EntryKind, LedgerEntry};
/// use khata_core::money::Money;
///
/// let entries = vec![
///     LedgerEntry::new("1", EntryKind::Opening, None, Money::from_cents(50_000), Money::zero(), ""),
///     LedgerEntry::new("2", EntryKind::Sale, None, Money::from_cents(120_000), Money::zero(), ""),
///     LedgerEntry::new("3", EntryKind::Payment, None, Money::zero(), Money::from_cents(80_000), ""),
/// ];
/// let annotated = running_balances(&entries).unwrap();
/// assert_eq!(annotated[2].running_balance.cents(), 90_000); // 900.00 Dr
/// ```
pub fn running_balances(entries: &[LedgerEntry]) -> LedgerResult<Vec<RunningBalanceEntry>> {
    let mut balance = Money::zero();
    let mut annotated = Vec::with_capacity(entries.len());

    for entry in entries {
        entry.validate()?;
        balance += entry.signed_amount();
        annotated.push(RunningBalanceEntry {
            entry: entry.clone(),
            running_balance: balance,
        });
    }

    Ok(annotated)
}

// =============================================================================
// Unit Tests
// =============================================================================
