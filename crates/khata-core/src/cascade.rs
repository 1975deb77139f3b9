//! # Discount Cascade
//!
//! Deterministic two-level pricing for a sale: per line item first, then
//! once over the order.
//!
//! ## Cascade Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Discount Cascade                                   │
//! │                                                                         │
//! │  per line:   gross = unit_price × quantity                              │
//! │              net   = gross − item_discount(gross)                       │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  items_subtotal = Σ net          ◄── order discount applies HERE,       │
//! │                        │             on post-item-discount money,       │
//! │                        ▼             never on gross                     │
//! │  final_total = max(0, items_subtotal − order_discount)                  │
//! │                                                                         │
//! │  gross_total = Σ gross           ◄── exposed by name: the external      │
//! │                                      declared-total check consumes it   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Defaulting, Once
//! A missing discount means `None` — that default lives here (in the serde
//! defaults of [`LineDiscount`]/[`OrderDiscount`]) and nowhere else. Call
//! sites never re-invent "no discount".
//!
//! ## No Silent Fixups
//! Over-limit discounts are rejected with a specific error, never capped.
//! The one clamp that does exist — the final total flooring at zero when an
//! order-level amount discount nominally exceeds the subtotal — still
//! reports the raw discount amount for display and audit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{SaleError, SaleResult};
use crate::money::Money;
use crate::validation::{validate_quantity, validate_unit_price};
use crate::MAX_DISCOUNT_BPS;

// =============================================================================
// Discount Types
// =============================================================================

/// A discount on a single cart line, applied before the order discount.
///
/// Percentages are basis points (1000 = 10%), the rate convention used
/// across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LineDiscount {
    /// No discount. Also the serde default for a missing field.
    #[default]
    None,
    /// Percentage of the line's gross amount, in basis points.
    Percentage(u32),
    /// Fixed amount off the line's gross amount.
    Amount(Money),
}

/// A discount applied once to the sum of all post-item-discount line totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OrderDiscount {
    /// No order-level discount. Also the serde default for a missing field.
    #[default]
    None,
    /// Percentage of the items subtotal, in basis points.
    Percentage(u32),
    /// Fixed amount off the items subtotal. May nominally exceed the
    /// subtotal; the final total floors at zero while the raw amount is
    /// still reported.
    Amount(Money),
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product line within a sale, priced and ready for the cascade.
///
/// `unit_price` is whatever the sale path resolved it to: the current
/// customer-type price when the sale is being created, the frozen historical
/// price when an existing sale is being edited. The cascade itself never
/// looks at a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product this line sells.
    pub product_id: String,

    /// Price per unit. Must be non-negative; the cascade rejects a negative
    /// price rather than pricing a negative gross.
    pub unit_price: Money,

    /// Units sold. Positive, bounded by `MAX_LINE_QUANTITY`.
    pub quantity: i64,

    /// Item-level discount. Missing input normalizes to `None` here.
    #[serde(default)]
    pub discount: LineDiscount,
}

impl CartLine {
    /// `unit_price × quantity`, before any discount.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cascade Output
// =============================================================================

/// A cart line annotated with its computed amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    #[serde(flatten)]
    pub line: CartLine,

    /// `unit_price × quantity`.
    pub gross_amount: Money,

    /// The item discount, resolved to money. `0 ≤ discount ≤ gross`.
    pub discount_amount: Money,

    /// `gross_amount − discount_amount`.
    pub net_amount: Money,
}

/// Order-level totals produced by the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CascadeTotals {
    /// Σ gross over all lines. This is the left-hand side of the external
    /// declared-total check (`verify_declared_total`), exposed by name.
    pub gross_total: Money,

    /// Σ net over all lines; the base for the order-level discount.
    pub items_subtotal: Money,

    /// The raw order discount. Reported even when it nominally exceeds the
    /// subtotal, so statements can show what was granted.
    pub order_discount_amount: Money,

    /// `max(0, items_subtotal − order_discount_amount)`.
    pub final_total: Money,
}

/// Full result of pricing a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOutcome {
    pub lines: Vec<PricedLine>,
    pub totals: CascadeTotals,
}

// =============================================================================
// Cascade
// =============================================================================

/// Resolves one line's discount to money, rejecting over-limit requests.
fn line_discount_amount(line: &CartLine, gross: Money) -> SaleResult<Money> {
    match line.discount {
        LineDiscount::None => Ok(Money::zero()),
        LineDiscount::Percentage(bps) => {
            if bps > MAX_DISCOUNT_BPS {
                return Err(SaleError::DiscountOutOfRange {
                    target: line.product_id.clone(),
                    bps,
                });
            }
            Ok(gross.percent_of(bps))
        }
        LineDiscount::Amount(amount) => {
            if amount.is_negative() || amount > gross {
                return Err(SaleError::DiscountExceedsBase {
                    target: line.product_id.clone(),
                    discount: amount,
                    base: gross,
                });
            }
            Ok(amount)
        }
    }
}

/// Resolves the order-level discount to money.
fn order_discount_amount(discount: &OrderDiscount, items_subtotal: Money) -> SaleResult<Money> {
    match *discount {
        OrderDiscount::None => Ok(Money::zero()),
        OrderDiscount::Percentage(bps) => {
            if bps > MAX_DISCOUNT_BPS {
                return Err(SaleError::DiscountOutOfRange {
                    target: "order".to_string(),
                    bps,
                });
            }
            Ok(items_subtotal.percent_of(bps))
        }
        // An amount may exceed the subtotal; the final total floors at zero
        // and the raw amount is reported. Negative is still nonsense.
        OrderDiscount::Amount(amount) => {
            if amount.is_negative() {
                return Err(SaleError::DiscountExceedsBase {
                    target: "order".to_string(),
                    discount: amount,
                    base: items_subtotal,
                });
            }
            Ok(amount)
        }
    }
}

/// Prices a cart: per-line discount and net, items subtotal, order-level
/// discount, final total.
///
/// Pure and stateless — the same lines and order discount always produce
/// identical totals. All validation happens before any output is built;
/// the first invalid line rejects the whole cart.
///
/// ## Example
/// ```rust
/// use khata_core::cascade::{price_cart, CartLine, LineDiscount, OrderDiscount};
/// use khata_core::money::Money;
///
/// let lines = vec![
///     CartLine {
///         product_id: "tea".into(),
///         unit_price: Money::from_cents(10_000), // 100.00
///         quantity: 2,
///         discount: LineDiscount::Percentage(1000), // 10%
///     },
///     CartLine {
///         product_id: "rice".into(),
///         unit_price: Money::from_cents(30_000), // 300.00
///         quantity: 1,
///         discount: LineDiscount::None,
///     },
/// ];
/// let outcome = price_cart(&lines, &OrderDiscount::Amount(Money::from_cents(3_000))).unwrap();
/// assert_eq!(outcome.totals.items_subtotal.cents(), 48_000); // 480.00
/// assert_eq!(outcome.totals.final_total.cents(), 45_000);    // 450.00
/// ```
pub fn price_cart(lines: &[CartLine], order_discount: &OrderDiscount) -> SaleResult<CascadeOutcome> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut gross_total = Money::zero();
    let mut items_subtotal = Money::zero();

    for line in lines {
        validate_quantity(&line.product_id, line.quantity)?;
        validate_unit_price(&line.product_id, line.unit_price)?;

        let gross = line.gross();
        let discount = line_discount_amount(line, gross)?;
        let net = gross - discount;

        gross_total += gross;
        items_subtotal += net;
        priced.push(PricedLine {
            line: line.clone(),
            gross_amount: gross,
            discount_amount: discount,
            net_amount: net,
        });
    }

    let order_amount = order_discount_amount(order_discount, items_subtotal)?;
    let totals = CascadeTotals {
        gross_total,
        items_subtotal,
        order_discount_amount: order_amount,
        final_total: items_subtotal.sub_floor_zero(order_amount),
    };

    Ok(CascadeOutcome {
        lines: priced,
        totals,
    })
}

/// The external validation hook: the sum of `price × quantity` over all
/// lines must match the externally declared total within `tolerance`.
///
/// Mismatch means `TotalMismatch` — the sale is rejected, never silently
/// corrected to either side's number.
pub fn verify_declared_total(
    computed_gross: Money,
    declared: Money,
    tolerance: Money,
) -> SaleResult<()> {
    if (computed_gross - declared).abs() > tolerance {
        return Err(SaleError::TotalMismatch {
            declared,
            computed: computed_gross,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TOTAL_MISMATCH_TOLERANCE;

    fn line(product_id: &str, unit_cents: i64, qty: i64, discount: LineDiscount) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            unit_price: Money::from_cents(unit_cents),
            quantity: qty,
            discount,
        }
    }

    #[test]
    fn test_two_line_cascade_from_the_counter() {
        // 2 × 100.00 with 10% off → net 180.00; 1 × 300.00 plain → 300.00;
        // subtotal 480.00; order discount 30.00 → 450.00.
        let lines = vec![
            line("a", 10_000, 2, LineDiscount::Percentage(1000)),
            line("b", 30_000, 1, LineDiscount::None),
        ];
        let outcome =
            price_cart(&lines, &OrderDiscount::Amount(Money::from_cents(3_000))).unwrap();

        assert_eq!(outcome.lines[0].gross_amount.cents(), 20_000);
        assert_eq!(outcome.lines[0].discount_amount.cents(), 2_000);
        assert_eq!(outcome.lines[0].net_amount.cents(), 18_000);
        assert_eq!(outcome.lines[1].net_amount.cents(), 30_000);

        assert_eq!(outcome.totals.gross_total.cents(), 50_000);
        assert_eq!(outcome.totals.items_subtotal.cents(), 48_000);
        assert_eq!(outcome.totals.order_discount_amount.cents(), 3_000);
        assert_eq!(outcome.totals.final_total.cents(), 45_000);
    }

    #[test]
    fn test_order_percentage_applies_to_net_not_gross() {
        // One line: gross 200.00, 50% item discount → net 100.00.
        // 10% order discount must be 10.00 (of net), not 20.00 (of gross).
        let lines = vec![line("a", 10_000, 2, LineDiscount::Percentage(5000))];
        let outcome = price_cart(&lines, &OrderDiscount::Percentage(1000)).unwrap();
        assert_eq!(outcome.totals.order_discount_amount.cents(), 1_000);
        assert_eq!(outcome.totals.final_total.cents(), 9_000);
    }

    #[test]
    fn test_percentage_over_100_rejected_before_totals() {
        // 150% item discount → DiscountOutOfRange, whole cart rejected.
        let lines = vec![
            line("a", 10_000, 1, LineDiscount::Percentage(15_000)),
            line("b", 30_000, 1, LineDiscount::None),
        ];
        let err = price_cart(&lines, &OrderDiscount::None).unwrap_err();
        assert!(matches!(
            err,
            SaleError::DiscountOutOfRange { ref target, bps: 15_000 } if target == "a"
        ));
    }

    #[test]
    fn test_order_percentage_over_100_rejected() {
        let lines = vec![line("a", 10_000, 1, LineDiscount::None)];
        let err = price_cart(&lines, &OrderDiscount::Percentage(10_001)).unwrap_err();
        assert!(matches!(err, SaleError::DiscountOutOfRange { .. }));
    }

    #[test]
    fn test_amount_discount_exceeding_gross_rejected_not_capped() {
        let lines = vec![line("a", 10_000, 1, LineDiscount::Amount(Money::from_cents(10_001)))];
        let err = price_cart(&lines, &OrderDiscount::None).unwrap_err();
        assert!(matches!(err, SaleError::DiscountExceedsBase { .. }));
    }

    #[test]
    fn test_amount_discount_equal_to_gross_allowed() {
        // A fully discounted line is legal (free item), net 0.
        let lines = vec![line("a", 10_000, 1, LineDiscount::Amount(Money::from_cents(10_000)))];
        let outcome = price_cart(&lines, &OrderDiscount::None).unwrap();
        assert_eq!(outcome.lines[0].net_amount.cents(), 0);
    }

    #[test]
    fn test_negative_amount_discount_rejected() {
        let lines = vec![line("a", 10_000, 1, LineDiscount::Amount(Money::from_cents(-500)))];
        assert!(price_cart(&lines, &OrderDiscount::None).is_err());
    }

    #[test]
    fn test_negative_order_amount_discount_rejected() {
        let lines = vec![line("a", 10_000, 1, LineDiscount::None)];
        let err = price_cart(&lines, &OrderDiscount::Amount(Money::from_cents(-500))).unwrap_err();
        assert!(matches!(err, SaleError::DiscountExceedsBase { .. }));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        // A negative gross would turn a percentage discount negative,
        // breaking 0 ≤ discount ≤ gross. Rejected up front instead.
        let lines = vec![line("a", -10_000, 1, LineDiscount::Percentage(1000))];
        let err = price_cart(&lines, &OrderDiscount::None).unwrap_err();
        assert!(matches!(
            err,
            SaleError::InvalidUnitPrice { ref product_id, .. } if product_id == "a"
        ));
    }

    #[test]
    fn test_valid_discount_bounded_by_gross() {
        // 0 ≤ discount ≤ gross for every accepted percentage.
        for bps in [0u32, 1, 825, 5000, 9999, 10_000] {
            let lines = vec![line("a", 33_333, 3, LineDiscount::Percentage(bps))];
            let outcome = price_cart(&lines, &OrderDiscount::None).unwrap();
            let priced = &outcome.lines[0];
            assert!(!priced.discount_amount.is_negative());
            assert!(priced.discount_amount <= priced.gross_amount);
        }
    }

    #[test]
    fn test_over_subtotal_order_amount_reports_raw_and_floors_total() {
        let lines = vec![line("a", 10_000, 1, LineDiscount::None)];
        let outcome =
            price_cart(&lines, &OrderDiscount::Amount(Money::from_cents(15_000))).unwrap();
        // Raw amount preserved for audit; charged total floors at zero.
        assert_eq!(outcome.totals.order_discount_amount.cents(), 15_000);
        assert_eq!(outcome.totals.final_total.cents(), 0);
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let lines = vec![line("a", 10_000, 0, LineDiscount::None)];
        assert!(matches!(
            price_cart(&lines, &OrderDiscount::None).unwrap_err(),
            SaleError::InvalidQuantity { .. }
        ));

        let lines = vec![line("a", 10_000, 1001, LineDiscount::None)];
        assert!(matches!(
            price_cart(&lines, &OrderDiscount::None).unwrap_err(),
            SaleError::InvalidQuantity { .. }
        ));
    }

    #[test]
    fn test_cascade_is_idempotent() {
        let lines = vec![
            line("a", 9_999, 3, LineDiscount::Percentage(825)),
            line("b", 1_250, 7, LineDiscount::Amount(Money::from_cents(500))),
        ];
        let discount = OrderDiscount::Percentage(500);
        let first = price_cart(&lines, &discount).unwrap();
        let second = price_cart(&lines, &discount).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        // The cascade itself accepts an empty slice; rejecting empty sales
        // is the reconciliation guard's job.
        let outcome = price_cart(&[], &OrderDiscount::None).unwrap();
        assert!(outcome.totals.final_total.is_zero());
        assert!(outcome.totals.gross_total.is_zero());
    }

    #[test]
    fn test_declared_total_check() {
        let computed = Money::from_cents(50_000);

        assert!(verify_declared_total(computed, Money::from_cents(50_000), TOTAL_MISMATCH_TOLERANCE).is_ok());
        // Off by exactly the tolerance: still accepted.
        assert!(verify_declared_total(computed, Money::from_cents(50_001), TOTAL_MISMATCH_TOLERANCE).is_ok());
        // Beyond tolerance: rejected, not corrected.
        let err = verify_declared_total(computed, Money::from_cents(50_002), TOTAL_MISMATCH_TOLERANCE)
            .unwrap_err();
        assert!(matches!(err, SaleError::TotalMismatch { .. }));
    }

    #[test]
    fn test_missing_discount_fields_default_to_none() {
        // The single, centralized defaulting point: deserializing a line
        // with no discount field yields LineDiscount::None.
        let json = r#"{ "productId": "a", "unitPrice": 10000, "quantity": 2 }"#;
        let parsed: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.discount, LineDiscount::None);
    }
}
