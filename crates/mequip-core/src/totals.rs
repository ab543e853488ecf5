//! # Quotation Totals
//!
//! Keeps the three derived monetary fields on a quotation consistent with
//! its current set of line items.
//!
//! ## Recomputation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Totals Recomputation                                 │
//! │                                                                         │
//! │  line items                                                             │
//! │  ┌──────────────────────────┐                                          │
//! │  │ producto   2 × 4500.00   │──┐                                       │
//! │  │ temporal   1 ×  800.00   │──┼──► total_monto_productos              │
//! │  │ adicional  1 × 1500.00   │──┼──► total_adicionales_monto            │
//! │  └──────────────────────────┘  │                                       │
//! │                                ▼                                        │
//! │                    total = productos + adicionales                      │
//! │                                                                         │
//! │  Invoked: (a) after bulk-insert on create                              │
//! │           (b) after delete+reinsert of a group on update               │
//! │           (c) on demand via the explicit recalculate operation         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure arithmetic over already-validated inputs: no error conditions, no
//! side effects. The caller persists the result.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::LineItem;

// =============================================================================
// Totals
// =============================================================================

/// The three derived monetary fields of a quotation.
///
/// Invariant: `total == total_monto_productos + total_adicionales_monto`,
/// exactly (integer centimos, no rounding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationTotals {
    /// Sum over line items with tipo ∈ {producto, temporal}.
    pub total_monto_productos: Money,
    /// Sum over line items with tipo = adicional.
    pub total_adicionales_monto: Money,
    /// Grand total.
    pub total: Money,
}

impl QuotationTotals {
    /// All-zero totals (a quotation with no line items).
    pub const fn zero() -> Self {
        QuotationTotals {
            total_monto_productos: Money::zero(),
            total_adicionales_monto: Money::zero(),
            total: Money::zero(),
        }
    }
}

/// Recomputes the aggregate totals from the current line items.
///
/// Each line item's own `subtotal` is enforced at the line-item save path
/// (`cantidad × precio_unitario`); this routine sums what is stored and does
/// not re-derive per-row subtotals.
///
/// ## Example
/// ```rust
/// use mequip_core::money::Money;
/// use mequip_core::totals::recompute;
///
/// let totals = recompute(&[]);
/// assert!(totals.total.is_zero());
/// ```
pub fn recompute(items: &[LineItem]) -> QuotationTotals {
    let total_monto_productos: Money = items
        .iter()
        .filter(|li| li.tipo.is_product_group())
        .map(|li| li.subtotal)
        .sum();

    let total_adicionales_monto: Money = items
        .iter()
        .filter(|li| !li.tipo.is_product_group())
        .map(|li| li.subtotal)
        .sum();

    QuotationTotals {
        total_monto_productos,
        total_adicionales_monto,
        total: total_monto_productos + total_adicionales_monto,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
