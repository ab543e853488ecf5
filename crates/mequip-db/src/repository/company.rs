//! # Company Repository
//!
//! CRUD for the issuing-company config records plus the transactional half
//! of the quotation-number allocator.
//!
//! ## Sequence Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Number Allocation Paths                              │
//! │                                                                         │
//! │  allocate_numero(conn, miempresa_id, fecha, today)                     │
//! │       │                                                                 │
//! │       ├── miempresa_id resolves to a config row?                       │
//! │       │        │                                                        │
//! │       │   YES: │  UPDATE ... contador = contador + 1 ... RETURNING     │
//! │       │        │  (single statement, no read-modify-write gap)         │
//! │       │        ▼                                                        │
//! │       │   EIIL-00000123-2025                                           │
//! │       │                                                                 │
//! │       └── NO: latest COT-{year}-* number, sequence + 1                 │
//! │                ▼                                                        │
//! │           COT-2025-008                                                 │
//! │                                                                         │
//! │  Runs inside the quotation-creation transaction: if any later step     │
//! │  fails, the counter bump rolls back with everything else.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use mequip_core::numbering::{next_fallback_numero, primary_numero, resolve_year};
use mequip_core::{CompanyConfig, FALLBACK_PREFIX};

use crate::error::{DbError, DbResult};

// =============================================================================
// Input Types
// =============================================================================

/// Input for registering a new issuing-company config record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompanyConfig {
    pub nombre: String,

    /// Number prefix (e.g. "EIIL"). `None` numbers under `COT`.
    #[serde(default)]
    pub codigo_cotizacion: Option<String>,

    /// Optional fixed year override for issued numbers.
    #[serde(default)]
    pub anio_cotizacion: Option<i32>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for issuing-company config records.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Inserts a new company config. The sequence counter starts at 0; the
    /// first allocated number is therefore sequence 1.
    pub async fn insert(&self, input: NewCompanyConfig) -> DbResult<CompanyConfig> {
        let now = Utc::now();

        let config = sqlx::query_as::<_, CompanyConfig>(
            r#"
            INSERT INTO nuestras_empresas
                (nombre, codigo_cotizacion, contador_cotizacion, anio_cotizacion,
                 created_at, updated_at)
            VALUES (?1, ?2, 0, ?3, ?4, ?4)
            RETURNING id, nombre, codigo_cotizacion, contador_cotizacion, anio_cotizacion
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.codigo_cotizacion)
        .bind(input.anio_cotizacion)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = config.id, nombre = %config.nombre, "Company config created");
        Ok(config)
    }

    /// Fetches a company config by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<CompanyConfig> {
        sqlx::query_as::<_, CompanyConfig>(
            r#"
            SELECT id, nombre, codigo_cotizacion, contador_cotizacion, anio_cotizacion
            FROM nuestras_empresas
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Company config", id.to_string()))
    }
}

// =============================================================================
// Transactional Allocation (crate-internal)
// =============================================================================

/// Bumps the company's sequence counter and returns the updated row.
///
/// Single `UPDATE ... RETURNING` statement: there is no window between
/// reading the counter and writing it back, so two concurrent creations can
/// never mint the same sequence. `None` means the id resolved to no row.
pub(crate) async fn increment_counter(
    conn: &mut SqliteConnection,
    id: i64,
) -> DbResult<Option<CompanyConfig>> {
    let config = sqlx::query_as::<_, CompanyConfig>(
        r#"
        UPDATE nuestras_empresas
        SET contador_cotizacion = contador_cotizacion + 1,
            updated_at = ?2
        WHERE id = ?1
        RETURNING id, nombre, codigo_cotizacion, contador_cotizacion, anio_cotizacion
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;

    Ok(config)
}

/// Fetches the latest existing fallback number for the given year.
///
/// Descending lexicographic order on `numero`, which is numerically correct
/// at the 3-digit sequence width the fallback path uses.
pub(crate) async fn latest_fallback_numero(
    conn: &mut SqliteConnection,
    year: i32,
) -> DbResult<Option<String>> {
    let numero: Option<String> = sqlx::query_scalar(
        r#"
        SELECT numero
        FROM cotizaciones
        WHERE numero LIKE ?1
        ORDER BY numero DESC
        LIMIT 1
        "#,
    )
    .bind(format!("{}-{}-%", FALLBACK_PREFIX, year))
    .fetch_optional(conn)
    .await?;

    Ok(numero)
}

/// Allocates the business number for a quotation being created.
///
/// ## Paths
/// - A resolvable `miempresa_id` takes the primary path: atomic counter
///   bump, `{prefix}-{seq:08}-{year}`.
/// - No `miempresa_id`, or an id with no config row behind it, takes the
///   fallback path: `COT-{year}-{seq:03}` continued from the latest
///   existing fallback number of that year.
///
/// Returns the number plus the `miempresa_id` that actually resolved: the
/// caller stores that value, so a dangling id falls back to NULL instead of
/// tripping the foreign key on `cotizaciones`.
///
/// Must be called inside the creation transaction so a failed insert rolls
/// the counter bump back.
pub(crate) async fn allocate_numero(
    conn: &mut SqliteConnection,
    miempresa_id: Option<i64>,
    fecha_cotizacion: NaiveDate,
    today: NaiveDate,
) -> DbResult<(String, Option<i64>)> {
    if let Some(id) = miempresa_id {
        if let Some(config) = increment_counter(conn, id).await? {
            let year = resolve_year(config.anio_cotizacion, Some(fecha_cotizacion), today);
            let numero = primary_numero(
                config.codigo_cotizacion.as_deref(),
                config.contador_cotizacion,
                year,
            );
            debug!(numero = %numero, miempresa_id = id, "Allocated primary numero");
            return Ok((numero, Some(id)));
        }
        debug!(miempresa_id = id, "Company config not found, using fallback numbering");
    }

    let year = resolve_year(None, Some(fecha_cotizacion), today);
    let latest = latest_fallback_numero(conn, year).await?;
    let numero = next_fallback_numero(latest.as_deref(), year);
    debug!(numero = %numero, "Allocated fallback numero");
    Ok((numero, None))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn eiil() -> NewCompanyConfig {
        NewCompanyConfig {
            nombre: "Equipos e Instrumentos Industriales Lima".to_string(),
            codigo_cotizacion: Some("EIIL".to_string()),
            anio_cotizacion: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let created = db.companies().insert(eiil()).await.unwrap();

        assert_eq!(created.contador_cotizacion, 0);
        assert_eq!(created.codigo_cotizacion.as_deref(), Some("EIIL"));

        let fetched = db.companies().get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.nombre, created.nombre);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;
        let err = db.companies().get_by_id(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_increment_counter_is_sequential() {
        let db = test_db().await;
        let company = db.companies().insert(eiil()).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let first = increment_counter(&mut conn, company.id).await.unwrap().unwrap();
        let second = increment_counter(&mut conn, company.id).await.unwrap().unwrap();

        assert_eq!(first.contador_cotizacion, 1);
        assert_eq!(second.contador_cotizacion, 2);
    }

    #[tokio::test]
    async fn test_increment_counter_missing_company() {
        let db = test_db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let result = increment_counter(&mut conn, 42).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_allocate_primary_numero() {
        let db = test_db().await;
        let company = db.companies().insert(eiil()).await.unwrap();

        let fecha = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let (numero, resolved) = allocate_numero(&mut conn, Some(company.id), fecha, fecha)
            .await
            .unwrap();
        assert_eq!(numero, "EIIL-00000001-2025");
        assert_eq!(resolved, Some(company.id));

        let (numero, _) = allocate_numero(&mut conn, Some(company.id), fecha, fecha)
            .await
            .unwrap();
        assert_eq!(numero, "EIIL-00000002-2025");
    }

    #[tokio::test]
    async fn test_allocate_primary_with_fixed_year() {
        let db = test_db().await;
        let company = db
            .companies()
            .insert(NewCompanyConfig {
                nombre: "Mega".to_string(),
                codigo_cotizacion: Some("MEGA".to_string()),
                anio_cotizacion: Some(2024),
            })
            .await
            .unwrap();

        // Quotation dated 2025, but the fixed year override wins.
        let fecha = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let (numero, _) = allocate_numero(&mut conn, Some(company.id), fecha, fecha)
            .await
            .unwrap();
        assert_eq!(numero, "MEGA-00000001-2024");
    }

    #[tokio::test]
    async fn test_allocate_fallback_without_company() {
        let db = test_db().await;
        let fecha = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let (numero, resolved) = allocate_numero(&mut conn, None, fecha, fecha).await.unwrap();
        assert_eq!(numero, "COT-2025-001");
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_allocate_fallback_for_unresolvable_company() {
        let db = test_db().await;
        let fecha = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        // miempresa_id points nowhere: falls back instead of failing, and
        // the stored reference becomes NULL.
        let (numero, resolved) = allocate_numero(&mut conn, Some(777), fecha, fecha)
            .await
            .unwrap();
        assert_eq!(numero, "COT-2025-001");
        assert_eq!(resolved, None);
    }
}
