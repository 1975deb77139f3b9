//! # Sale Module
//!
//! Stored sales, proposed updates, and the reconciliation guard that stands
//! between them.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Edit Reconciliation                             │
//! │                                                                         │
//! │  Transport layer          THIS MODULE                 cascade           │
//! │  ───────────────          ───────────                 ───────           │
//! │                                                                         │
//! │  SaleUpdate ────────────► reconcile_update()                            │
//! │                             │  1. version check (StaleVersion)          │
//! │                             │  2. customer-type lock                    │
//! │                             │  3. customer compatibility                │
//! │                             │  4. price resolution:                     │
//! │                             │       retained line → HISTORICAL price    │
//! │                             │       new line      → catalog price       │
//! │                             │  5. non-empty cart                        │
//! │                             │  6. quantity sanity                       │
//! │                             ▼                                           │
//! │                         NormalizedSale ─────────────► price_cart()      │
//! │                                                                         │
//! │  Pure validation/normalization: NO side effects, nothing partially      │
//! │  applied. On rejection the transport layer surfaces the specific        │
//! │  error kind ("Customer type is locked"), never a generic failure.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Price-Freezing Rule
//! Re-opening an old sale for correction must never silently re-price it at
//! today's rates. A retained line keeps the unit price stored at creation
//! time even if the catalog has moved since; only genuinely new lines are
//! priced from the current catalog. The guard still records the current
//! catalog price and a drift flag per line for diagnostics — it just never
//! lets that price into the money path of a pre-existing line.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::cascade::{CartLine, LineDiscount, OrderDiscount};
use crate::error::{SaleError, SaleResult};
use crate::money::Money;
use crate::validation::{validate_non_empty_lines, validate_quantity};

// =============================================================================
// Customer & Status Types
// =============================================================================

/// Whether a sale is priced at retail or wholesale rates.
/// Immutable after the sale is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// Walk-in sale; never attached to a customer account.
    Retail,
    /// Credit sale to a wholesale customer tracked in the khata.
    Wholesale,
}

impl CustomerType {
    /// Lowercase label used in error messages and logs.
    pub const fn label(&self) -> &'static str {
        match self {
            CustomerType::Retail => "retail",
            CustomerType::Wholesale => "wholesale",
        }
    }
}

/// The status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale is in progress (items being added).
    #[default]
    Draft,
    /// Sale has been paid and finalized.
    Completed,
    /// Sale was cancelled/refunded.
    Voided,
}

/// A candidate customer attached to a sale or an update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: String,
    pub customer_type: CustomerType,
}

// =============================================================================
// Catalog Seam
// =============================================================================

/// The engine's only view of the product catalog.
///
/// Supplies the *current* unit price for a product at a given customer type.
/// Consumed exactly twice: when creating a sale, and when pricing a line
/// that is newly added during an edit. Never used to reprice existing lines.
pub trait CatalogLookup {
    fn current_price(&self, product_id: &str, customer_type: CustomerType) -> Option<Money>;
}

// =============================================================================
// Stored Sale & Update Payload
// =============================================================================

/// A sale as the storage layer holds it.
///
/// `lines` carry the historical unit prices frozen at creation time — the
/// snapshot the price-freezing rule protects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoredSale {
    pub id: String,

    /// Attached customer; `None` for retail walk-ins.
    pub customer: Option<CustomerRef>,

    /// Locked at creation. Every update payload must agree.
    pub customer_type: CustomerType,

    /// Lines with historical unit prices.
    pub lines: Vec<CartLine>,

    #[serde(default)]
    pub order_discount: OrderDiscount,

    pub status: SaleStatus,

    /// Optimistic-concurrency token, bumped on every accepted update.
    pub version: i64,
}

impl StoredSale {
    /// Finds the stored line for a product, if the sale already has one.
    fn line_for(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }
}

/// One line of a proposed update. Carries no price: prices are resolved by
/// the guard from history (retained lines) or the catalog (new lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProposedLine {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub discount: LineDiscount,
}

/// A proposed update to an existing sale, as supplied by the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleUpdate {
    /// Must equal the stored sale's type; the guard rejects any flip.
    pub customer_type: CustomerType,

    /// Candidate customer. Swapping one wholesale customer for another is
    /// allowed; attaching any customer to a retail sale is not.
    pub customer: Option<CustomerRef>,

    pub lines: Vec<ProposedLine>,

    #[serde(default)]
    pub order_discount: OrderDiscount,

    pub status: SaleStatus,

    /// The version the caller based this edit on. `None` skips the
    /// optimistic check (callers that serialize edits themselves).
    pub expected_version: Option<i64>,
}

// =============================================================================
// Normalized Output
// =============================================================================

/// A line approved by the guard, with its resolved price and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLine {
    /// The line as the cascade will price it. For a retained line
    /// `unit_price` is the historical price; for a new line it is the
    /// current catalog price captured at this moment.
    #[serde(flatten)]
    pub line: CartLine,

    /// Current catalog price, for display/diagnostics only.
    /// `None` when the catalog no longer knows the product.
    pub catalog_price: Option<Money>,

    /// True when the catalog price differs from the price in `line`.
    /// Lets the UI show "price has changed since this sale" without ever
    /// repricing the line.
    pub price_changed: bool,

    /// True when this line did not exist on the stored sale.
    pub newly_added: bool,
}

/// An approved, normalized sale draft, ready for the discount cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSale {
    pub id: String,
    pub customer: Option<CustomerRef>,
    pub customer_type: CustomerType,
    pub lines: Vec<NormalizedLine>,
    pub order_discount: OrderDiscount,
    pub status: SaleStatus,

    /// `stored.version + 1`; the storage layer persists this on commit.
    pub version: i64,
}

impl NormalizedSale {
    /// The plain cart lines for `cascade::price_cart`.
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.lines.iter().map(|l| l.line.clone()).collect()
    }
}

// =============================================================================
// Reconciliation Guard
// =============================================================================

/// Validates a proposed update against the stored sale and returns either a
/// normalized draft for the cascade or the first applicable rejection.
///
/// Pure function, no side effects: on `Err` nothing has been applied
/// anywhere. Checks run in a fixed order:
///
/// 1. optimistic version (`StaleVersion`)
/// 2. customer-type lock (`CustomerTypeLocked`)
/// 3. customer compatibility (`IncompatibleCustomerForRetail`,
///    `CustomerTypeMismatch`)
/// 4. per-line price resolution (`PriceUnavailable` for unpriceable new
///    lines; retained lines keep their historical price)
/// 5. non-empty cart (`EmptyCart`)
/// 6. quantity sanity (`InvalidQuantity`)
pub fn reconcile_update(
    stored: &StoredSale,
    update: &SaleUpdate,
    catalog: &impl CatalogLookup,
) -> SaleResult<NormalizedSale> {
    // 1. Optimistic concurrency: the caller's base state must be current.
    if let Some(expected) = update.expected_version {
        if expected != stored.version {
            debug!(sale_id = %stored.id, expected, stored_version = stored.version,
                "rejecting stale sale update");
            return Err(SaleError::StaleVersion {
                sale_id: stored.id.clone(),
                expected,
                stored: stored.version,
            });
        }
    }

    // 2. Customer type is locked at creation, no matter what else changed.
    if update.customer_type != stored.customer_type {
        debug!(sale_id = %stored.id, locked = stored.customer_type.label(),
            proposed = update.customer_type.label(), "rejecting customer-type flip");
        return Err(SaleError::CustomerTypeLocked {
            sale_id: stored.id.clone(),
            locked: stored.customer_type.label().to_string(),
        });
    }

    // 3. Customer reference compatibility.
    check_customer_compat(&stored.id, stored.customer_type, update.customer.as_ref())?;

    // 4. Resolve prices: history for retained lines, catalog for new ones.
    let mut lines = Vec::with_capacity(update.lines.len());
    for proposed in &update.lines {
        lines.push(resolve_line(stored, proposed, catalog)?);
    }

    // 5. Editing a sale empty is not deleting it.
    validate_non_empty_lines(&stored.id, lines.len())?;

    // 6. Quantity sanity, after the cart shape is known to be valid.
    for line in &lines {
        validate_quantity(&line.line.product_id, line.line.quantity)?;
    }

    Ok(NormalizedSale {
        id: stored.id.clone(),
        customer: update.customer.clone(),
        customer_type: stored.customer_type,
        lines,
        order_discount: update.order_discount,
        status: update.status,
        version: stored.version + 1,
    })
}

/// Retail sales carry no customer; wholesale sales only wholesale customers.
fn check_customer_compat(
    sale_id: &str,
    sale_type: CustomerType,
    candidate: Option<&CustomerRef>,
) -> SaleResult<()> {
    match sale_type {
        CustomerType::Retail => {
            if let Some(customer) = candidate {
                return Err(SaleError::IncompatibleCustomerForRetail {
                    sale_id: sale_id.to_string(),
                    customer_id: customer.id.clone(),
                });
            }
        }
        CustomerType::Wholesale => {
            if let Some(customer) = candidate {
                if customer.customer_type != CustomerType::Wholesale {
                    return Err(SaleError::CustomerTypeMismatch {
                        customer_id: customer.id.clone(),
                        actual: customer.customer_type.label().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Resolves one proposed line to a priced, normalized line.
fn resolve_line(
    stored: &StoredSale,
    proposed: &ProposedLine,
    catalog: &impl CatalogLookup,
) -> SaleResult<NormalizedLine> {
    let catalog_price = catalog.current_price(&proposed.product_id, stored.customer_type);

    match stored.line_for(&proposed.product_id) {
        // Retained line: the historical price is the money path, the catalog
        // price is diagnostics only.
        Some(existing) => {
            let historical = existing.unit_price;
            Ok(NormalizedLine {
                line: CartLine {
                    product_id: proposed.product_id.clone(),
                    unit_price: historical,
                    quantity: proposed.quantity,
                    discount: proposed.discount,
                },
                catalog_price,
                price_changed: catalog_price.map_or(false, |current| current != historical),
                newly_added: false,
            })
        }
        // New line: priced from the current catalog at the sale's type.
        None => {
            let current = catalog_price.ok_or_else(|| SaleError::PriceUnavailable {
                product_id: proposed.product_id.clone(),
            })?;
            Ok(NormalizedLine {
                line: CartLine {
                    product_id: proposed.product_id.clone(),
                    unit_price: current,
                    quantity: proposed.quantity,
                    discount: proposed.discount,
                },
                catalog_price: Some(current),
                price_changed: false,
                newly_added: true,
            })
        }
    }
}

// =============================================================================
// Sale Creation
// =============================================================================

/// One requested item when creating a sale. Prices come from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub discount: LineDiscount,
}

/// Builds a new sale draft, pricing every line from the catalog at the
/// customer-type-appropriate current price.
///
/// This is the only path (besides new lines on an edit) where catalog prices
/// enter monetary computation; from here on the prices are frozen history.
pub fn new_sale_draft(
    customer: Option<CustomerRef>,
    customer_type: CustomerType,
    items: &[DraftItem],
    order_discount: OrderDiscount,
    catalog: &impl CatalogLookup,
) -> SaleResult<StoredSale> {
    let sale_id = Uuid::new_v4().to_string();

    check_customer_compat(&sale_id, customer_type, customer.as_ref())?;
    validate_non_empty_lines(&sale_id, items.len())?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        validate_quantity(&item.product_id, item.quantity)?;
        let unit_price = catalog
            .current_price(&item.product_id, customer_type)
            .ok_or_else(|| SaleError::PriceUnavailable {
                product_id: item.product_id.clone(),
            })?;
        lines.push(CartLine {
            product_id: item.product_id.clone(),
            unit_price,
            quantity: item.quantity,
            discount: item.discount,
        });
    }

    Ok(StoredSale {
        id: sale_id,
        customer,
        customer_type,
        lines,
        order_discount,
        status: SaleStatus::Draft,
        version: 0,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
