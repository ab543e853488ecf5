//! # Repository Module
//!
//! Database repository implementations for the quotation engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP controller                                                       │
//! │       │                                                                 │
//! │       │  db.quotations().create_quotation(input)                       │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  QuotationRepository                                                   │
//! │  ├── create_quotation(&self, input)                                    │
//! │  ├── update_line_items(&self, id, items)                               │
//! │  ├── recalculate_totals(&self, id)                                     │
//! │  └── get_with_items(&self, id)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database per test)                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`QuotationRepository`] - Quotation and line-item operations
//! - [`CompanyRepository`] - Issuing-company config and the number sequence
//!
//! [`QuotationRepository`]: quotation::QuotationRepository
//! [`CompanyRepository`]: company::CompanyRepository

pub mod company;
pub mod quotation;
