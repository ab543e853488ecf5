//! # Domain Types
//!
//! Core domain types for the quotation engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Quotation     │   │    LineItem     │   │  CompanyConfig  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  cotizacion_id  │   │  codigo         │       │
//! │  │  numero         │   │  tipo           │   │  contador       │       │
//! │  │  cliente        │   │  cantidad       │   │  anio           │       │
//! │  │  total fields   │   │  subtotal       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ QuotationStatus │   │  LineItemKind   │   │    ClientRef    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Pendiente      │   │  Producto       │   │  Particular(id) │       │
//! │  │  Enviada        │   │  Temporal       │   │  Empresa(id)    │       │
//! │  │  Aprobada       │   │  Adicional      │   └─────────────────┘       │
//! │  │  Rechazada      │   └─────────────────┘                             │
//! │  │  Negociacion    │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted entity has a surrogate numeric `id` (SQLite rowid) plus,
//! for quotations, the business identifier `numero` which is unique and
//! immutable once assigned.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::EXPIRY_WARNING_DAYS;

// =============================================================================
// Currency & Exchange Rate
// =============================================================================

/// The currency a quotation is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Peruvian soles (S/).
    Soles,
    /// US dollars (US$).
    Dolares,
}

impl Currency {
    /// Symbol used when rendering the quotation document.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Soles => "S/",
            Currency::Dolares => "US$",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Soles
    }
}

/// Exchange rate in thousandths (fixed point, no floats).
///
/// ## Why Thousandths?
/// `tipo_cambio` is display/reference data on the quotation. It is never
/// multiplied into the stored totals, but it still must round-trip exactly
/// through the database, so it gets the same fixed-point treatment as money.
///
/// 3750 = 3.750 soles per dollar. Default is 1000 (= 1.000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(u32);

impl ExchangeRate {
    /// Creates an exchange rate from thousandths.
    #[inline]
    pub const fn from_millis(millis: u32) -> Self {
        ExchangeRate(millis)
    }

    /// Returns the rate in thousandths.
    #[inline]
    pub const fn millis(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a float (for display only).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Identity rate (1.000).
    #[inline]
    pub const fn identity() -> Self {
        ExchangeRate(1000)
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        ExchangeRate::identity()
    }
}

// =============================================================================
// Client Reference
// =============================================================================

/// Discriminator for the polymorphic client reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    /// A private individual.
    Particular,
    /// A company client.
    Empresa,
}

/// A reference to the client a quotation is issued to.
///
/// Persisted as the (`cliente_id`, `cliente_tipo`) column pair; it is a
/// tagged reference resolved at read time by the caller, not a foreign key.
/// Modeled as a sum type so the discriminator and the id can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "cliente_tipo", content = "cliente_id", rename_all = "lowercase")]
pub enum ClientRef {
    /// A private individual, identified by their client id.
    Particular(i64),
    /// A company client, identified by its company id.
    Empresa(i64),
}

impl ClientRef {
    /// Rebuilds the reference from its persisted column pair.
    pub const fn from_parts(kind: ClientKind, id: i64) -> Self {
        match kind {
            ClientKind::Particular => ClientRef::Particular(id),
            ClientKind::Empresa => ClientRef::Empresa(id),
        }
    }

    /// The discriminator half of the column pair.
    pub const fn kind(&self) -> ClientKind {
        match self {
            ClientRef::Particular(_) => ClientKind::Particular,
            ClientRef::Empresa(_) => ClientKind::Empresa,
        }
    }

    /// The id half of the column pair.
    pub const fn id(&self) -> i64 {
        match self {
            ClientRef::Particular(id) | ClientRef::Empresa(id) => *id,
        }
    }
}

// =============================================================================
// Quotation Status
// =============================================================================

/// The status of a quotation.
///
/// ## Transitions
/// There is no enforced transition graph: staff may move a quotation to any
/// state at any time (manual override is a supported workflow). The enum
/// still closes the value set so a typo can never reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    /// Created, not yet sent to the client.
    Pendiente,
    /// Sent to the client, awaiting response.
    Enviada,
    /// Accepted by the client.
    Aprobada,
    /// Rejected by the client.
    Rechazada,
    /// Under negotiation.
    Negociacion,
}

impl QuotationStatus {
    /// Whether the quotation is still "in play" for the expiry notifier.
    ///
    /// Aprobada/Rechazada are terminal in practice (though not in code) and
    /// never produce expiry alerts.
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            QuotationStatus::Pendiente | QuotationStatus::Enviada | QuotationStatus::Negociacion
        )
    }
}

impl Default for QuotationStatus {
    fn default() -> Self {
        QuotationStatus::Pendiente
    }
}

// =============================================================================
// Line Item Kind
// =============================================================================

/// The kind of a quotation line item.
///
/// Determines which optional reference is meaningful:
/// - `Producto`  → `producto_id` (catalog product)
/// - `Temporal`  → `producto_temporal_id` (ad-hoc product)
/// - `Adicional` → neither (additional service, e.g. shipping or install)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    /// A catalog product.
    Producto,
    /// A temporary/ad-hoc product not in the catalog.
    Temporal,
    /// An additional service.
    Adicional,
}

impl LineItemKind {
    /// Whether this kind belongs to the products group of the totals.
    ///
    /// Producto and Temporal sum into `total_monto_productos`;
    /// Adicional sums into `total_adicionales_monto`.
    pub const fn is_product_group(&self) -> bool {
        matches!(self, LineItemKind::Producto | LineItemKind::Temporal)
    }
}

// =============================================================================
// Company Config (issuing-company sequence owner)
// =============================================================================

/// Configuration record for one of the seller's own legal entities.
///
/// Owns the quotation-numbering sequence: `contador_cotizacion` is read,
/// incremented, and persisted only by the sequence allocator, atomically,
/// at quotation-creation time. No other writer may touch it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompanyConfig {
    pub id: i64,

    /// Display name of the legal entity.
    pub nombre: String,

    /// Number prefix (e.g. "EIIL"). Falls back to `COT` when unset.
    pub codigo_cotizacion: Option<String>,

    /// Running sequence counter. Exclusively owned by the allocator.
    pub contador_cotizacion: i64,

    /// Optional fixed year override for the number's year segment.
    pub anio_cotizacion: Option<i32>,
}

// =============================================================================
// Quotation (aggregate root)
// =============================================================================

/// A priced proposal document issued to a client.
///
/// ## Derived Fields
/// `total_monto_productos`, `total_adicionales_monto` and `total` are always
/// re-derivable from the line items; they are never a source of truth. The
/// invariant `total == total_monto_productos + total_adicionales_monto`
/// holds after every write (see [`crate::totals`]).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quotation {
    pub id: i64,

    /// Business number, unique and immutable once assigned.
    /// `EIIL-00000123-2025` (primary) or `COT-2025-008` (fallback).
    pub numero: String,

    #[ts(as = "String")]
    pub fecha_cotizacion: NaiveDate,

    /// Must be after `fecha_cotizacion` (enforced at request validation).
    #[ts(as = "String")]
    pub fecha_vencimiento: NaiveDate,

    /// Polymorphic client reference, resolved at read time by the caller.
    pub cliente: ClientRef,

    /// Staff user who created the quotation.
    pub usuario_id: i64,

    /// Issuing-company config record; owns the sequence counter.
    /// `None` puts number allocation on the fallback path.
    pub miempresa_id: Option<i64>,

    pub moneda: Currency,

    pub tipo_cambio: ExchangeRate,

    /// Sum of subtotals of line items with tipo ∈ {producto, temporal}.
    pub total_monto_productos: Money,

    /// Sum of subtotals of line items with tipo = adicional.
    pub total_adicionales_monto: Money,

    /// Grand total; always the exact sum of the two fields above.
    pub total: Money,

    pub estado: QuotationStatus,

    pub notas: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced row within a quotation, owned exclusively by it.
///
/// `subtotal` is always recomputed as `cantidad × precio_unitario` when the
/// row is written. Client-supplied subtotals are never trusted (see
/// [`NewLineItem`], which has no subtotal field at all).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: i64,

    /// Owning quotation. Rows are deleted when the parent is deleted.
    pub cotizacion_id: i64,

    /// Catalog product reference; meaningful only when tipo = producto.
    pub producto_id: Option<i64>,

    /// Ad-hoc product reference; meaningful only when tipo = temporal.
    pub producto_temporal_id: Option<i64>,

    pub tipo: LineItemKind,

    /// Name as it appears on the quotation document.
    pub nombre: String,

    pub descripcion: Option<String>,

    /// Positive quantity.
    pub cantidad: i64,

    /// Unit price, ≥ 0.
    pub precio_unitario: Money,

    /// Always `cantidad × precio_unitario`, recomputed on every save.
    pub subtotal: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Creation / Update Inputs
// =============================================================================

/// Input for one new line item.
///
/// Deliberately has NO subtotal field: the subtotal is derived server-side
/// from `cantidad` and `precio_unitario`, never accepted from the caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLineItem {
    pub tipo: LineItemKind,
    #[serde(default)]
    pub producto_id: Option<i64>,
    #[serde(default)]
    pub producto_temporal_id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub cantidad: i64,
    pub precio_unitario: Money,
}

impl NewLineItem {
    /// Derives the subtotal for this input (`cantidad × precio_unitario`).
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.precio_unitario.multiply_quantity(self.cantidad)
    }
}

/// Input for creating a quotation.
///
/// `numero` is absent on purpose: it is minted by the sequence allocator at
/// insert time and can never be chosen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewQuotation {
    pub cliente: ClientRef,
    pub usuario_id: i64,
    #[serde(default)]
    pub miempresa_id: Option<i64>,
    #[serde(default)]
    pub moneda: Currency,
    #[serde(default)]
    pub tipo_cambio: ExchangeRate,
    /// Defaults to today when omitted.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub fecha_cotizacion: Option<NaiveDate>,
    #[ts(as = "String")]
    pub fecha_vencimiento: NaiveDate,
    #[serde(default)]
    pub estado: QuotationStatus,
    #[serde(default)]
    pub notas: Option<String>,
    pub items: Vec<NewLineItem>,
}

/// A quotation together with its line items, as returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationWithItems {
    pub quotation: Quotation,
    pub items: Vec<LineItem>,
}

// =============================================================================
// Expiry Urgency
// =============================================================================

/// Urgency level derived by the expiration notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryUrgency {
    /// Expiry is near (within the warning window).
    Warning,
    /// Expiry date has been reached or passed.
    Danger,
}

/// Derives the expiry urgency of a quotation.
///
/// Pure derivation from `fecha_vencimiento` vs `today` plus the current
/// estado. Never mutates the estado itself; Aprobada and Rechazada
/// quotations produce no alerts.
pub fn expiry_urgency(
    estado: QuotationStatus,
    fecha_vencimiento: NaiveDate,
    today: NaiveDate,
) -> Option<ExpiryUrgency> {
    if !estado.is_open() {
        return None;
    }

    if fecha_vencimiento <= today {
        Some(ExpiryUrgency::Danger)
    } else if (fecha_vencimiento - today).num_days() <= EXPIRY_WARNING_DAYS {
        Some(ExpiryUrgency::Warning)
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
