//! # mequip-core: Pure Business Logic for the MegaEquipamiento Quotation Engine
//!
//! This crate is the **heart** of the quotation engine. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Quotation Engine Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  CRM Frontend (React)                           │   │
//! │  │    Quotation Form ──► Line Item Editor ──► PDF Export          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (out of scope)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mequip-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ numbering │  │  totals   │  │   │
//! │  │   │ Quotation │  │   Money   │  │  numero   │  │ recompute │  │   │
//! │  │   │ LineItem  │  │  centimos │  │  formats  │  │  3 fields │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   mequip-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Quotation, LineItem, CompanyConfig, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`numbering`] - Quotation number formats and fallback parsing
//! - [`totals`] - Derived totals recomputation from line items
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centimos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod numbering;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mequip_core::Money` instead of
// `use mequip_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use totals::QuotationTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix used when the issuing company has no `codigo_cotizacion`, and for
/// the whole number in fallback mode (`COT-2025-008`).
pub const FALLBACK_PREFIX: &str = "COT";

/// Maximum line items allowed on a single quotation
///
/// ## Business Reason
/// Prevents runaway quotations and keeps the generated PDF readable.
pub const MAX_QUOTATION_ITEMS: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price, in centimos (10 million soles/dolares)
///
/// ## Business Reason
/// The priciest catalog equipment sits orders of magnitude below this.
/// It also bounds `cantidad × precio_unitario`: with MAX_ITEM_QUANTITY the
/// largest possible subtotal stays far inside i64, so the multiplication
/// can never overflow.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Days before `fecha_vencimiento` at which the expiry notifier starts
/// flagging an open quotation as `Warning`.
pub const EXPIRY_WARNING_DAYS: i64 = 7;
