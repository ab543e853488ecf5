//! # Quotation Numbering
//!
//! The pure half of the sequence allocator: number formatting, year
//! resolution and fallback-sequence parsing. The transactional half (the
//! atomic counter increment and the latest-number lookup) lives in
//! `mequip-db`, which feeds its results into these functions.
//!
//! ## Number Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRIMARY (company config present)                                       │
//! │                                                                         │
//! │     EIIL - 00000123 - 2025                                             │
//! │     ────   ────────   ────                                             │
//! │     prefix  8-digit    year (fixed override, or quotation date,        │
//! │            sequence          or today)                                 │
//! │                                                                         │
//! │  FALLBACK (no company config resolvable)                               │
//! │                                                                         │
//! │     COT - 2025 - 008                                                   │
//! │     ───   ────   ───                                                   │
//! │     fixed year   3-digit sequence, continued from the latest           │
//! │                  existing COT-{year}-* number                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};

use crate::FALLBACK_PREFIX;

// =============================================================================
// Year Resolution
// =============================================================================

/// Resolves the year segment of a quotation number.
///
/// ## Precedence
/// 1. `fixed` - the company's `anio_cotizacion` override, when set
/// 2. the quotation's `fecha_cotizacion`, when present
/// 3. `today`
///
/// A fixed year wins regardless of the quotation date; some entities keep
/// issuing under the prior fiscal year at the turn of January.
pub fn resolve_year(fixed: Option<i32>, quotation_date: Option<NaiveDate>, today: NaiveDate) -> i32 {
    fixed.unwrap_or_else(|| quotation_date.unwrap_or(today).year())
}

// =============================================================================
// Primary Format
// =============================================================================

/// Formats a primary-path quotation number: `{prefix}-{sequence:08}-{year}`.
///
/// `codigo` is the company's `codigo_cotizacion`; a company with no code
/// configured still numbers on the primary path, just under the `COT`
/// prefix.
///
/// ## Example
/// ```rust
/// use mequip_core::numbering::primary_numero;
///
/// assert_eq!(primary_numero(Some("EIIL"), 123, 2025), "EIIL-00000123-2025");
/// assert_eq!(primary_numero(None, 1, 2025), "COT-00000001-2025");
/// ```
pub fn primary_numero(codigo: Option<&str>, sequence: i64, year: i32) -> String {
    let prefix = codigo.unwrap_or(FALLBACK_PREFIX);
    format!("{}-{:08}-{}", prefix, sequence, year)
}

// =============================================================================
// Fallback Format
// =============================================================================

/// Formats a fallback-path quotation number: `COT-{year}-{sequence:03}`.
pub fn fallback_numero(year: i32, sequence: i64) -> String {
    format!("{}-{}-{:03}", FALLBACK_PREFIX, year, sequence)
}

/// Extracts the trailing sequence from an existing fallback number.
///
/// Accepts only numbers of the shape `COT-{year}-{digits}` for the given
/// year; anything else yields `None` and the caller restarts at 1.
///
/// ## Example
/// ```rust
/// use mequip_core::numbering::parse_fallback_sequence;
///
/// assert_eq!(parse_fallback_sequence("COT-2025-007", 2025), Some(7));
/// assert_eq!(parse_fallback_sequence("EIIL-00000123-2025", 2025), None);
/// ```
pub fn parse_fallback_sequence(numero: &str, year: i32) -> Option<i64> {
    let rest = numero.strip_prefix(&format!("{}-{}-", FALLBACK_PREFIX, year))?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Computes the next fallback number from the latest existing one.
///
/// `last_existing` is the most recent `COT-{year}-*` number on record
/// (descending lexicographic order), or `None` when the year has no
/// quotations yet.
///
/// ## Ordering Caveat
/// Lexicographic descending order is only numerically correct while the
/// sequence stays at its 3-digit width; `COT-2025-1000` would sort before
/// `COT-2025-999`. Kept as-is for fidelity with the observed behavior; the
/// fallback path only runs when no company config exists at all, which in
/// practice means a handful of numbers.
pub fn next_fallback_numero(last_existing: Option<&str>, year: i32) -> String {
    let next = last_existing
        .and_then(|numero| parse_fallback_sequence(numero, year))
        .map_or(1, |seq| seq + 1);
    fallback_numero(year, next)
}

// =============================================================================
// Unit Tests
// =============================================================================
