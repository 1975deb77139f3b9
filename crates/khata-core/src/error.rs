//! # Error Types
//!
//! Domain-specific error types for khata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  khata-core errors (this file)                                          │
//! │  ├── LedgerError  - transaction-stream integrity failures               │
//! │  └── SaleError    - sale pricing / update rejections                    │
//! │                                                                         │
//! │  Flow: SaleError/LedgerError → transport layer → specific message       │
//! │        shown to the cashier ("Customer type is locked"), never a        │
//! │        generic failure.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entry id, product id, amounts)
//! 3. Errors are enum variants, never String
//! 4. This is financial data: predictable, auditable rejection always beats
//!    best-effort correction. Nothing is clamped or defaulted silently.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Ledger Error
// =============================================================================

/// Transaction-stream integrity errors.
///
/// Fatal to processing that customer's stream; a malformed entry must never
/// be skipped or treated as zero, because every entry after it would then
/// carry a wrong running balance.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entry with an invalid debit/credit combination.
    ///
    /// ## When This Occurs
    /// - Both debit and credit nonzero on the same entry
    /// - Both zero on a `Sale` or `Payment` entry
    /// - A negative debit or credit amount
    #[error("malformed ledger entry {entry_id}: {reason}")]
    MalformedLedgerEntry { entry_id: String, reason: String },
}

// =============================================================================
// Sale Error
// =============================================================================

/// Sale pricing and sale-update rejections.
///
/// Every variant maps 1:1 to a user-facing message with the offending field;
/// the whole update is rejected, nothing is partially applied.
#[derive(Debug, Error)]
pub enum SaleError {
    /// A percentage discount above 100% was requested.
    #[error("discount of {bps} bps on {target} exceeds 100%")]
    DiscountOutOfRange { target: String, bps: u32 },

    /// An amount discount larger than the amount it discounts.
    ///
    /// Rejected rather than silently capped so the cashier can correct the
    /// input.
    #[error("discount {discount} on {target} exceeds base amount {base}")]
    DiscountExceedsBase {
        target: String,
        discount: Money,
        base: Money,
    },

    /// The update tries to flip a sale between retail and wholesale.
    ///
    /// ## User Workflow
    /// ```text
    /// Edit Sale #42 (wholesale)
    ///      │
    ///      ▼
    /// Payload says customer_type = retail
    ///      │
    ///      ▼
    /// CustomerTypeLocked
    ///      │
    ///      ▼
    /// UI shows: "Customer type is locked"
    /// ```
    /// Attaching a *different wholesale customer* to a wholesale sale is
    /// fine; changing the sale's type is not.
    #[error("sale {sale_id} customer type is locked to {locked}")]
    CustomerTypeLocked { sale_id: String, locked: String },

    /// A retail sale cannot carry a customer reference.
    #[error("retail sale {sale_id} cannot be attached to customer {customer_id}")]
    IncompatibleCustomerForRetail {
        sale_id: String,
        customer_id: String,
    },

    /// The replacement customer on a wholesale sale is not wholesale.
    #[error("customer {customer_id} is {actual}, expected wholesale")]
    CustomerTypeMismatch {
        customer_id: String,
        actual: String,
    },

    /// The update would leave the sale with zero lines.
    /// Deleting a sale is a distinct operation from editing it empty.
    #[error("sale {sale_id} would have no items; delete the sale instead")]
    EmptyCart { sale_id: String },

    /// Quantity is non-positive or above the per-line bound.
    #[error("invalid quantity {quantity} for product {product_id}: must be 1..={max}")]
    InvalidQuantity {
        product_id: String,
        quantity: i64,
        max: i64,
    },

    /// A line carries a negative unit price.
    ///
    /// Unit prices come from the catalog or frozen history and are
    /// non-negative there; a negative price reaching the cascade is bad
    /// input, and pricing it would produce a negative gross and a negative
    /// "discount".
    #[error("invalid unit price {unit_price} for product {product_id}: must be non-negative")]
    InvalidUnitPrice {
        product_id: String,
        unit_price: Money,
    },

    /// The caller's assumed base version of the sale is stale.
    /// Not an input error: refetch and retry.
    #[error("sale {sale_id} version mismatch: expected {expected}, stored {stored}")]
    StaleVersion {
        sale_id: String,
        expected: i64,
        stored: i64,
    },

    /// The externally declared total disagrees with the computed gross
    /// total beyond tolerance. The sale is rejected, never silently
    /// corrected.
    #[error("declared total {declared} does not match computed total {computed}")]
    TotalMismatch { declared: Money, computed: Money },

    /// A newly added line has no catalog price for the sale's customer type.
    #[error("no catalog price for product {product_id}")]
    PriceUnavailable { product_id: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience alias for ledger-stream operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Convenience alias for sale pricing/update operations.
pub type SaleResult<T> = Result<T, SaleError>;

// =============================================================================
// Unit Tests
// =============================================================================
