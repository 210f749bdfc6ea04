//! # Validation Module
//!
//! Input validation for the back-office forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Front-end forms (TypeScript)                              │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: HTTP handler (Rust)                                       │
//! │  ├── Type validation (deserialization)                              │
//! │  └── THIS MODULE: Business rule validation                          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL constraints                                           │
//! │  └── UNIQUE constraints (company code, category name)               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, 200)
}

/// Validates a company display name.
pub fn validate_company_name(name: &str) -> ValidationResult<()> {
    validate_name("company name", name, 100)
}

/// Validates a company code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_company_code;
///
/// assert!(validate_company_code("vargo").is_ok());
/// assert!(validate_company_code("").is_err());
/// assert!(validate_company_code("has space").is_err());
/// ```
pub fn validate_company_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "company code".to_string(),
        });
    }

    if code.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "company code".to_string(),
            max: 20,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "company code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("category name", name, 100)
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name("customer", name, 200)
}

/// Validates an employee reference on the sales/restock forms.
pub fn validate_employee_id(id: &str) -> ValidationResult<()> {
    validate_name("employee", id, 100)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed for giveaways
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (a fully pending sale)
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a minimum-stock threshold.
pub fn validate_min_stock(min_stock: i64) -> ValidationResult<()> {
    if min_stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "min stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a restock quantity mapping (identifier → additional units).
///
/// ## Rules
/// - Every quantity must be non-negative (zero entries are no-ops)
/// - No single quantity may exceed MAX_LINE_QUANTITY
/// - At least one quantity must be positive
pub fn validate_restock_quantities(quantities: &HashMap<String, i64>) -> ValidationResult<()> {
    for (identifier, &qty) in quantities {
        if qty < 0 {
            return Err(ValidationError::OutOfRange {
                field: format!("restock quantity for {identifier}"),
                min: 0,
                max: MAX_LINE_QUANTITY,
            });
        }
        if qty > MAX_LINE_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: format!("restock quantity for {identifier}"),
                min: 0,
                max: MAX_LINE_QUANTITY,
            });
        }
    }

    if !quantities.values().any(|&q| q > 0) {
        return Err(ValidationError::MustBePositive {
            field: "restock quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates an initial variant breakdown for a new product.
///
/// ## Rules
/// - At most MAX_VARIANTS entries
/// - Identifiers non-empty and unique
/// - Quantities non-negative
pub fn validate_variants(variants: &[crate::Variant]) -> ValidationResult<()> {
    if variants.len() > crate::MAX_VARIANTS {
        return Err(ValidationError::OutOfRange {
            field: "variants".to_string(),
            min: 0,
            max: crate::MAX_VARIANTS as i64,
        });
    }

    let mut seen = std::collections::HashSet::new();
    for v in variants {
        if v.identifier.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "variant identifier".to_string(),
            });
        }
        if !seen.insert(v.identifier.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "variant identifier".to_string(),
                value: v.identifier.clone(),
            });
        }
        if v.quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: format!("stock for {}", v.identifier),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates an entity id (UUID v4 string).
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_id;
///
/// assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_id("not-a-uuid").is_err());
/// ```
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Manchester United Jersey").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_company_code() {
        assert!(validate_company_code("vargo").is_ok());
        assert!(validate_company_code("sportcheck").is_ok());
        assert!(validate_company_code("shop_2").is_ok());

        assert!(validate_company_code("").is_err());
        assert!(validate_company_code("has space").is_err());
        assert!(validate_company_code(&"a".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(120_000).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_restock_quantities() {
        let mut quantities = HashMap::new();
        quantities.insert("S".to_string(), 10);
        quantities.insert("M".to_string(), 0);
        assert!(validate_restock_quantities(&quantities).is_ok());

        quantities.insert("L".to_string(), -1);
        assert!(validate_restock_quantities(&quantities).is_err());

        let all_zero: HashMap<String, i64> =
            [("S".to_string(), 0)].into_iter().collect();
        assert!(validate_restock_quantities(&all_zero).is_err());
    }

    #[test]
    fn test_validate_variants() {
        let ok = vec![Variant::new("S", 0), Variant::new("M", 5)];
        assert!(validate_variants(&ok).is_ok());

        let dup = vec![Variant::new("S", 0), Variant::new("S", 5)];
        assert!(validate_variants(&dup).is_err());

        let negative = vec![Variant::new("S", -1)];
        assert!(validate_variants(&negative).is_err());

        let unnamed = vec![Variant::new(" ", 1)];
        assert!(validate_variants(&unnamed).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("not-a-uuid").is_err());
    }
}
