//! # khata-core: Ledger & Sale Reconciliation Engine
//!
//! This crate is the **heart** of Khata. It contains the computational core
//! of a retail point-of-sale and customer-ledger application — the one
//! subsystem that silently corrupts financial data when implemented
//! carelessly — as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Khata Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Frontend / statement & invoice renderer            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         Transport + storage layers (out of scope here)          │   │
//! │  │   ledger store · catalog store · sale-edit endpoint             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ khata-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  ledger   │  │  cascade  │  │   sale    │  │  summary  │   │   │
//! │  │   │ balances  │  │ discounts │  │  guard    │  │ statement │   │   │
//! │  │   │  Dr / Cr  │  │  totals   │  │  drafts   │  │  totals   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ledger`] - the per-customer transaction stream and running-balance fold
//! - [`cascade`] - the two-level discount cascade (line, then order)
//! - [`sale`] - stored sales, proposed updates, the reconciliation guard
//! - [`summary`] - filtered statement totals with an unfiltered closing balance
//! - [`money`] - integer-cents Money type (no floating point!)
//! - [`error`] - domain error types
//! - [`validation`] - shared input validators
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output; every call gets its own
//!    immutable input slice, safe to invoke concurrently
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here;
//!    the catalog enters through the [`sale::CatalogLookup`] seam
//! 3. **Integer money**: all monetary values are minor units in an i64
//! 4. **Explicit errors**: financial data gets auditable rejection, never
//!    best-effort correction; nothing is clamped or defaulted silently
//!
//! ## Example Usage
//!
//! ```rust
//! use khata_core::ledger::{running_balances, format_balance, EntryKind, LedgerEntry};
//! use khata_core::money::Money;
//!
//! // Opening Dr 500, sale Dr 1200, payment Cr 800.
//! let entries = vec![
//!     LedgerEntry::new("1", EntryKind::Opening, None, Money::from_cents(50_000), Money::zero(), "b/f"),
//!     LedgerEntry::new("2", EntryKind::Sale, None, Money::from_cents(120_000), Money::zero(), ""),
//!     LedgerEntry::new("3", EntryKind::Payment, None, Money::zero(), Money::from_cents(80_000), ""),
//! ];
//!
//! let annotated = running_balances(&entries).unwrap();
//! assert_eq!(format_balance(annotated[2].running_balance), "900.00 Dr");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cascade;
pub mod error;
pub mod ledger;
pub mod money;
pub mod sale;
pub mod summary;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use khata_core::Money` instead of
// `use khata_core::money::Money`

pub use cascade::{price_cart, verify_declared_total, CartLine, CascadeOutcome, CascadeTotals, LineDiscount, OrderDiscount, PricedLine};
pub use error::{LedgerError, LedgerResult, SaleError, SaleResult};
pub use ledger::{format_balance, running_balances, BalanceSide, EntryKind, LedgerEntry, RunningBalanceEntry};
pub use money::Money;
pub use sale::{new_sale_draft, reconcile_update, CatalogLookup, CustomerRef, CustomerType, DraftItem, NormalizedLine, NormalizedSale, ProposedLine, SaleStatus, SaleUpdate, StoredSale};
pub use summary::{summarize, EntryFilter, PeriodSummary};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Configurable per-tenant in future versions.
pub const MAX_LINE_QUANTITY: i64 = 1000;

/// Maximum discount percentage, in basis points (10000 = 100%).
/// A discount request above this is rejected, never clamped.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Tolerance for the declared-total check: the externally supplied total
/// must match the computed gross total within one minor unit (0.01).
pub const TOTAL_MISMATCH_TOLERANCE: Money = Money::from_cents(1);
