//! # mequip-db: Database Layer for the Quotation Engine
//!
//! This crate provides database access for the MegaEquipamiento quotation
//! engine. It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Quotation Data Flow                                │
//! │                                                                         │
//! │  HTTP controller (create quotation)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mequip-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │(quotation.rs / │    │  (embedded)  │ │   │
//! │  │   │               │    │  company.rs)   │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ QuotationRepo  │    │ 001_init.sql │ │   │
//! │  │   │ Management    │    │ CompanyRepo    │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                        SQLite Database                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (quotation, company)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mequip_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/mequip.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let created = db.quotations().create_quotation(input).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::company::{CompanyRepository, NewCompanyConfig};
pub use repository::quotation::QuotationRepository;
