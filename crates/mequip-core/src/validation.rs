//! # Validation Module
//!
//! Request-validation rules for quotation inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React form)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - Business rule validation                       │
//! │  ├── Runs BEFORE any row is written                                    │
//! │  └── A failure here means zero mutation happened                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE numero                                                     │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::types::{LineItemKind, NewLineItem, NewQuotation};
use crate::{MAX_ITEM_QUANTITY, MAX_QUOTATION_ITEMS, MAX_UNIT_PRICE_CENTS};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_cantidad(cantidad: i64) -> ValidationResult<()> {
    if cantidad <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    if cantidad > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "cantidad".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in centimos.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed (bundled/courtesy items)
/// - Must not exceed MAX_UNIT_PRICE_CENTS, which keeps the derived
///   `cantidad × precio_unitario` subtotal inside i64 for any valid cantidad
pub fn validate_precio_unitario(cents: i64) -> ValidationResult<()> {
    if cents < 0 || cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "precio_unitario".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a line-item display name.
pub fn validate_nombre(nombre: &str) -> ValidationResult<()> {
    let nombre = nombre.trim();

    if nombre.is_empty() {
        return Err(ValidationError::Required {
            field: "nombre".to_string(),
        });
    }

    if nombre.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates the quotation date pair: `fecha_vencimiento > fecha_cotizacion`.
///
/// Enforced only here, at request-validation time, never at the row level.
pub fn validate_fechas(fecha_cotizacion: NaiveDate, fecha_vencimiento: NaiveDate) -> ValidationResult<()> {
    if fecha_vencimiento <= fecha_cotizacion {
        return Err(ValidationError::MustFollow {
            field: "fecha_vencimiento".to_string(),
            other: "fecha_cotizacion".to_string(),
        });
    }

    Ok(())
}

/// Validates an exchange rate in thousandths. Must be positive.
pub fn validate_tipo_cambio(millis: u32) -> ValidationResult<()> {
    if millis == 0 {
        return Err(ValidationError::MustBePositive {
            field: "tipo_cambio".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Line Item Validation
// =============================================================================

/// Validates one new line item, including tipo/reference coherence.
///
/// ## Reference Rules
/// - `producto`  → `producto_id` required, `producto_temporal_id` null
/// - `temporal`  → `producto_temporal_id` required, `producto_id` null
/// - `adicional` → both references null
pub fn validate_line_item(item: &NewLineItem) -> ValidationResult<()> {
    validate_nombre(&item.nombre)?;
    validate_cantidad(item.cantidad)?;
    validate_precio_unitario(item.precio_unitario.cents())?;

    match item.tipo {
        LineItemKind::Producto => {
            if item.producto_id.is_none() {
                return Err(ValidationError::Required {
                    field: "producto_id".to_string(),
                });
            }
            if item.producto_temporal_id.is_some() {
                return Err(ValidationError::Forbidden {
                    field: "producto_temporal_id".to_string(),
                    reason: "tipo is producto".to_string(),
                });
            }
        }
        LineItemKind::Temporal => {
            if item.producto_temporal_id.is_none() {
                return Err(ValidationError::Required {
                    field: "producto_temporal_id".to_string(),
                });
            }
            if item.producto_id.is_some() {
                return Err(ValidationError::Forbidden {
                    field: "producto_id".to_string(),
                    reason: "tipo is temporal".to_string(),
                });
            }
        }
        LineItemKind::Adicional => {
            if item.producto_id.is_some() || item.producto_temporal_id.is_some() {
                return Err(ValidationError::Forbidden {
                    field: "producto_id".to_string(),
                    reason: "tipo is adicional".to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Validates a batch of new line items (as used by create and update).
pub fn validate_line_items(items: &[NewLineItem]) -> ValidationResult<()> {
    if items.len() > MAX_QUOTATION_ITEMS {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_QUOTATION_ITEMS,
        });
    }

    for item in items {
        validate_line_item(item)?;
    }

    Ok(())
}

// =============================================================================
// Quotation Validation
// =============================================================================

/// Validates a full creation request.
///
/// `today` stands in for an omitted `fecha_cotizacion`, matching what the
/// create path will store.
pub fn validate_new_quotation(input: &NewQuotation, today: NaiveDate) -> ValidationResult<()> {
    let fecha_cotizacion = input.fecha_cotizacion.unwrap_or(today);
    validate_fechas(fecha_cotizacion, input.fecha_vencimiento)?;
    validate_tipo_cambio(input.tipo_cambio.millis())?;
    validate_line_items(&input.items)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ClientRef, Currency, ExchangeRate, QuotationStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn producto_item() -> NewLineItem {
        NewLineItem {
            tipo: LineItemKind::Producto,
            producto_id: Some(9),
            producto_temporal_id: None,
            nombre: "Microscopio binocular".to_string(),
            descripcion: None,
            cantidad: 1,
            precio_unitario: Money::from_cents(250_000),
        }
    }

    #[test]
    fn test_validate_cantidad() {
        assert!(validate_cantidad(1).is_ok());
        assert!(validate_cantidad(999).is_ok());
        assert!(validate_cantidad(0).is_err());
        assert!(validate_cantidad(-1).is_err());
        assert!(validate_cantidad(1000).is_err());
    }

    #[test]
    fn test_validate_precio_unitario() {
        assert!(validate_precio_unitario(0).is_ok());
        assert!(validate_precio_unitario(450_000).is_ok());
        assert!(validate_precio_unitario(MAX_UNIT_PRICE_CENTS).is_ok());
        assert!(validate_precio_unitario(-1).is_err());
        assert!(validate_precio_unitario(MAX_UNIT_PRICE_CENTS + 1).is_err());
        assert!(validate_precio_unitario(i64::MAX).is_err());
    }

    #[test]
    fn test_extreme_price_rejected_before_subtotal_derivation() {
        // An i64::MAX price with cantidad 2 would overflow the subtotal
        // multiplication; the price cap rejects it up front.
        let mut item = producto_item();
        item.precio_unitario = Money::from_cents(i64::MAX);
        item.cantidad = 2;
        assert!(validate_line_item(&item).is_err());
    }

    #[test]
    fn test_largest_valid_subtotal_stays_exact() {
        let subtotal =
            Money::from_cents(MAX_UNIT_PRICE_CENTS).multiply_quantity(MAX_ITEM_QUANTITY);
        assert_eq!(subtotal.cents(), MAX_UNIT_PRICE_CENTS * MAX_ITEM_QUANTITY);
        assert!(!subtotal.is_negative());
    }

    #[test]
    fn test_validate_nombre() {
        assert!(validate_nombre("Balanza analitica").is_ok());
        assert!(validate_nombre("").is_err());
        assert!(validate_nombre("   ").is_err());
        assert!(validate_nombre(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_fechas() {
        let cot = date(2025, 6, 1);
        assert!(validate_fechas(cot, date(2025, 6, 15)).is_ok());
        assert!(validate_fechas(cot, cot).is_err());
        assert!(validate_fechas(cot, date(2025, 5, 1)).is_err());
    }

    #[test]
    fn test_reference_coherence_producto() {
        let mut item = producto_item();
        assert!(validate_line_item(&item).is_ok());

        item.producto_id = None;
        assert!(validate_line_item(&item).is_err());

        item.producto_id = Some(9);
        item.producto_temporal_id = Some(4);
        assert!(validate_line_item(&item).is_err());
    }

    #[test]
    fn test_reference_coherence_temporal() {
        let item = NewLineItem {
            tipo: LineItemKind::Temporal,
            producto_id: None,
            producto_temporal_id: Some(4),
            nombre: "Equipo a pedido".to_string(),
            descripcion: None,
            cantidad: 1,
            precio_unitario: Money::from_cents(80_000),
        };
        assert!(validate_line_item(&item).is_ok());
    }

    #[test]
    fn test_reference_coherence_adicional() {
        let mut item = NewLineItem {
            tipo: LineItemKind::Adicional,
            producto_id: None,
            producto_temporal_id: None,
            nombre: "Instalacion".to_string(),
            descripcion: None,
            cantidad: 1,
            precio_unitario: Money::from_cents(150_000),
        };
        assert!(validate_line_item(&item).is_ok());

        item.producto_id = Some(1);
        assert!(validate_line_item(&item).is_err());
    }

    #[test]
    fn test_validate_new_quotation_uses_today_when_fecha_omitted() {
        let input = NewQuotation {
            cliente: ClientRef::Particular(1),
            usuario_id: 1,
            miempresa_id: None,
            moneda: Currency::Soles,
            tipo_cambio: ExchangeRate::identity(),
            fecha_cotizacion: None,
            fecha_vencimiento: date(2025, 6, 15),
            estado: QuotationStatus::Pendiente,
            notas: None,
            items: vec![producto_item()],
        };

        assert!(validate_new_quotation(&input, date(2025, 6, 1)).is_ok());
        // Expiry on/before "today" is rejected.
        assert!(validate_new_quotation(&input, date(2025, 6, 15)).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_exchange_rate() {
        let input = NewQuotation {
            cliente: ClientRef::Empresa(2),
            usuario_id: 1,
            miempresa_id: Some(1),
            moneda: Currency::Dolares,
            tipo_cambio: ExchangeRate::from_millis(0),
            fecha_cotizacion: Some(date(2025, 6, 1)),
            fecha_vencimiento: date(2025, 6, 30),
            estado: QuotationStatus::Pendiente,
            notas: None,
            items: vec![],
        };

        assert!(validate_new_quotation(&input, date(2025, 6, 1)).is_err());
    }

    #[test]
    fn test_too_many_items() {
        let items: Vec<NewLineItem> = (0..=MAX_QUOTATION_ITEMS).map(|_| producto_item()).collect();
        assert!(validate_line_items(&items).is_err());
    }
}
