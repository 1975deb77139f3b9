//! # Validation Module
//!
//! Shared input validators for cart lines and sale updates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                      │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS CRATE                                                    │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Business rule validation — the authoritative layer                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage constraints (out of scope here)                       │
//! │                                                                         │
//! │  Defense in depth: every rejection is a typed SaleError with the        │
//! │  offending field, never a generic failure.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{SaleError, SaleResult};
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_LINE_QUANTITY` (catches "typed 1000 instead of 10")
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_quantity;
///
/// assert!(validate_quantity("tea", 5).is_ok());
/// assert!(validate_quantity("tea", 0).is_err());
/// assert!(validate_quantity("tea", 5000).is_err());
/// ```
pub fn validate_quantity(product_id: &str, quantity: i64) -> SaleResult<()> {
    if quantity <= 0 || quantity > MAX_LINE_QUANTITY {
        return Err(SaleError::InvalidQuantity {
            product_id: product_id.to_string(),
            quantity,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a line's unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_unit_price;
/// use khata_core::money::Money;
///
/// assert!(validate_unit_price("tea", Money::from_cents(10_000)).is_ok());
/// assert!(validate_unit_price("tea", Money::zero()).is_ok());
/// assert!(validate_unit_price("tea", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(product_id: &str, unit_price: Money) -> SaleResult<()> {
    if unit_price.is_negative() {
        return Err(SaleError::InvalidUnitPrice {
            product_id: product_id.to_string(),
            unit_price,
        });
    }
    Ok(())
}

/// Validates that a sale keeps at least one line.
///
/// Editing a sale down to zero items is rejected; deleting the sale is a
/// distinct operation.
pub fn validate_non_empty_lines(sale_id: &str, line_count: usize) -> SaleResult<()> {
    if line_count == 0 {
        return Err(SaleError::EmptyCart {
            sale_id: sale_id.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Checks whether an entity id is a well-formed UUID.
///
/// Ids are opaque to the engine; this helper exists for callers whose
/// storage layer requires UUID keys.
pub fn is_well_formed_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id.trim()).is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("p", 1).is_ok());
        assert!(validate_quantity("p", 100).is_ok());
        assert!(validate_quantity("p", 1000).is_ok());

        assert!(validate_quantity("p", 0).is_err());
        assert!(validate_quantity("p", -1).is_err());
        assert!(validate_quantity("p", 1001).is_err());
    }

    #[test]
    fn test_validate_quantity_error_carries_context() {
        let err = validate_quantity("tea-500g", 0).unwrap_err();
        assert!(matches!(
            err,
            SaleError::InvalidQuantity { ref product_id, quantity: 0, max: 1000 }
                if product_id == "tea-500g"
        ));
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price("p", Money::from_cents(1099)).is_ok());
        assert!(validate_unit_price("p", Money::zero()).is_ok());

        let err = validate_unit_price("tea-500g", Money::from_cents(-100)).unwrap_err();
        assert!(matches!(
            err,
            SaleError::InvalidUnitPrice { ref product_id, .. } if product_id == "tea-500g"
        ));
    }

    #[test]
    fn test_validate_non_empty_lines() {
        assert!(validate_non_empty_lines("s-1", 3).is_ok());
        assert!(matches!(
            validate_non_empty_lines("s-1", 0).unwrap_err(),
            SaleError::EmptyCart { ref sale_id } if sale_id == "s-1"
        ));
    }

    #[test]
    fn test_is_well_formed_id() {
        assert!(is_well_formed_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_well_formed_id(""));
        assert!(!is_well_formed_id("not-a-uuid"));
    }
}
