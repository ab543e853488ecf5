//! # Quotation Repository
//!
//! Quotation and line-item persistence, including number allocation and
//! totals recomputation.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quotation Creation                                   │
//! │                                                                         │
//! │  create_quotation(input)                                               │
//! │       │                                                                 │
//! │       ├── 1. Validate (zero mutation on failure)                       │
//! │       ├── 2. BEGIN TRANSACTION                                         │
//! │       ├── 3. Allocate numero (counter bump or fallback)                │
//! │       ├── 4. INSERT cotizaciones (totals start at zero)                │
//! │       ├── 5. INSERT each detalle row (subtotal derived server-side)    │
//! │       ├── 6. Recompute + write the three totals                        │
//! │       └── 7. COMMIT (or roll everything back, counter included)        │
//! │                                                                         │
//! │  The totals columns are never trusted as input: every line-item write  │
//! │  ends with a full recomputation from the rows (step 6).                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use mequip_core::totals::{recompute, QuotationTotals};
use mequip_core::validation::{validate_line_items, validate_new_quotation};
use mequip_core::{
    expiry_urgency, ClientKind, ClientRef, Currency, ExchangeRate, ExpiryUrgency, LineItem,
    LineItemKind, Money, NewLineItem, NewQuotation, Quotation, QuotationStatus, QuotationWithItems,
};

use crate::error::{DbError, DbResult};
use crate::repository::company;

// =============================================================================
// Row Types
// =============================================================================

/// Raw `cotizaciones` row. Money lands as integer centimos and the client
/// reference as its column pair; [`From`] rebuilds the domain types.
#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: i64,
    numero: String,
    fecha_cotizacion: NaiveDate,
    fecha_vencimiento: NaiveDate,
    cliente_id: i64,
    cliente_tipo: ClientKind,
    usuario_id: i64,
    miempresa_id: Option<i64>,
    moneda: Currency,
    tipo_cambio: i64,
    total_monto_productos: i64,
    total_adicionales_monto: i64,
    total: i64,
    estado: QuotationStatus,
    notas: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuotationRow> for Quotation {
    fn from(row: QuotationRow) -> Self {
        Quotation {
            id: row.id,
            numero: row.numero,
            fecha_cotizacion: row.fecha_cotizacion,
            fecha_vencimiento: row.fecha_vencimiento,
            cliente: ClientRef::from_parts(row.cliente_tipo, row.cliente_id),
            usuario_id: row.usuario_id,
            miempresa_id: row.miempresa_id,
            moneda: row.moneda,
            tipo_cambio: ExchangeRate::from_millis(row.tipo_cambio as u32),
            total_monto_productos: Money::from_cents(row.total_monto_productos),
            total_adicionales_monto: Money::from_cents(row.total_adicionales_monto),
            total: Money::from_cents(row.total),
            estado: row.estado,
            notas: row.notas,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Raw `detalle_cotizaciones` row.
#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: i64,
    cotizacion_id: i64,
    producto_id: Option<i64>,
    producto_temporal_id: Option<i64>,
    tipo: LineItemKind,
    nombre: String,
    descripcion: Option<String>,
    cantidad: i64,
    precio_unitario: i64,
    subtotal: i64,
    created_at: DateTime<Utc>,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        LineItem {
            id: row.id,
            cotizacion_id: row.cotizacion_id,
            producto_id: row.producto_id,
            producto_temporal_id: row.producto_temporal_id,
            tipo: row.tipo,
            nombre: row.nombre,
            descripcion: row.descripcion,
            cantidad: row.cantidad,
            precio_unitario: Money::from_cents(row.precio_unitario),
            subtotal: Money::from_cents(row.subtotal),
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for quotations and their line items.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
}

impl QuotationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        QuotationRepository { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Creates a quotation with its line items in one transaction.
    ///
    /// ## Steps
    /// 1. Validate the full request (no row is touched on failure)
    /// 2. Allocate the business number (counter bump rolls back with the tx)
    /// 3. Insert the quotation and every line item
    /// 4. Recompute and persist the three totals
    pub async fn create_quotation(&self, input: NewQuotation) -> DbResult<QuotationWithItems> {
        let today = Utc::now().date_naive();
        validate_new_quotation(&input, today)?;

        let mut tx = self.pool.begin().await?;

        let fecha_cotizacion = input.fecha_cotizacion.unwrap_or(today);
        let (numero, miempresa_id) =
            company::allocate_numero(&mut tx, input.miempresa_id, fecha_cotizacion, today).await?;

        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO cotizaciones
                (numero, fecha_cotizacion, fecha_vencimiento,
                 cliente_id, cliente_tipo, usuario_id, miempresa_id,
                 moneda, tipo_cambio,
                 total_monto_productos, total_adicionales_monto, total,
                 estado, notas, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 0, 0, ?10, ?11, ?12, ?12)
            RETURNING id
            "#,
        )
        .bind(&numero)
        .bind(fecha_cotizacion)
        .bind(input.fecha_vencimiento)
        .bind(input.cliente.id())
        .bind(input.cliente.kind())
        .bind(input.usuario_id)
        .bind(miempresa_id)
        .bind(input.moneda)
        .bind(input.tipo_cambio.millis() as i64)
        .bind(input.estado)
        .bind(&input.notas)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            insert_line_item(&mut tx, id, item, now).await?;
        }

        let totals = write_totals(&mut tx, id, now).await?;
        let quotation = fetch_quotation(&mut tx, id).await?;
        let items = fetch_items(&mut tx, id).await?;

        tx.commit().await?;

        info!(
            id,
            numero = %quotation.numero,
            total = %totals.total,
            item_count = items.len(),
            "Quotation created"
        );

        Ok(QuotationWithItems { quotation, items })
    }

    // =========================================================================
    // Line-Item Update
    // =========================================================================

    /// Replaces the line items of the groups present in the input.
    ///
    /// ## Group Semantics
    /// The two totals groups are replaced independently:
    /// - input contains producto/temporal items → all existing
    ///   producto/temporal rows are replaced
    /// - input contains adicional items → all existing adicional rows are
    ///   replaced
    ///
    /// A group absent from the input keeps its existing rows untouched.
    /// Either way the totals are recomputed from the final row set.
    pub async fn update_line_items(
        &self,
        id: i64,
        items: Vec<NewLineItem>,
    ) -> DbResult<QuotationWithItems> {
        validate_line_items(&items)?;

        let mut tx = self.pool.begin().await?;

        // Existence check up front so the caller gets NotFound, not an
        // empty replace.
        fetch_quotation(&mut tx, id).await?;

        let replaces_products = items.iter().any(|i| i.tipo.is_product_group());
        let replaces_adicionales = items.iter().any(|i| !i.tipo.is_product_group());

        if replaces_products {
            sqlx::query(
                "DELETE FROM detalle_cotizaciones
                 WHERE cotizacion_id = ?1 AND tipo IN ('producto', 'temporal')",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        if replaces_adicionales {
            sqlx::query(
                "DELETE FROM detalle_cotizaciones
                 WHERE cotizacion_id = ?1 AND tipo = 'adicional'",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let now = Utc::now();
        for item in &items {
            insert_line_item(&mut tx, id, item, now).await?;
        }

        let totals = write_totals(&mut tx, id, now).await?;
        let quotation = fetch_quotation(&mut tx, id).await?;
        let final_items = fetch_items(&mut tx, id).await?;

        tx.commit().await?;

        debug!(
            id,
            replaces_products,
            replaces_adicionales,
            total = %totals.total,
            "Line items updated"
        );

        Ok(QuotationWithItems {
            quotation,
            items: final_items,
        })
    }

    /// Recomputes the three totals from the stored line items and persists
    /// them. Idempotent; the repair path for totals drift.
    pub async fn recalculate_totals(&self, id: i64) -> DbResult<Quotation> {
        let mut tx = self.pool.begin().await?;

        fetch_quotation(&mut tx, id).await?;
        let totals = write_totals(&mut tx, id, Utc::now()).await?;
        let quotation = fetch_quotation(&mut tx, id).await?;

        tx.commit().await?;

        debug!(id, total = %totals.total, "Totals recalculated");
        Ok(quotation)
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Fetches a quotation by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Quotation> {
        let mut conn = self.pool.acquire().await?;
        fetch_quotation(&mut conn, id).await
    }

    /// Fetches the line items of a quotation, in insertion order.
    pub async fn get_items(&self, id: i64) -> DbResult<Vec<LineItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, id).await
    }

    /// Fetches a quotation together with its line items.
    pub async fn get_with_items(&self, id: i64) -> DbResult<QuotationWithItems> {
        let mut conn = self.pool.acquire().await?;
        let quotation = fetch_quotation(&mut conn, id).await?;
        let items = fetch_items(&mut conn, id).await?;
        Ok(QuotationWithItems { quotation, items })
    }

    /// Lists open quotations whose expiry is near or past, with urgency.
    ///
    /// `today` is a parameter so the notifier (and the tests) control the
    /// clock. Aprobada/Rechazada quotations never appear.
    pub async fn list_expiring(
        &self,
        today: NaiveDate,
    ) -> DbResult<Vec<(Quotation, ExpiryUrgency)>> {
        let rows = sqlx::query_as::<_, QuotationRow>(
            r#"
            SELECT id, numero, fecha_cotizacion, fecha_vencimiento,
                   cliente_id, cliente_tipo, usuario_id, miempresa_id,
                   moneda, tipo_cambio,
                   total_monto_productos, total_adicionales_monto, total,
                   estado, notas, created_at, updated_at
            FROM cotizaciones
            WHERE estado IN ('pendiente', 'enviada', 'negociacion')
            ORDER BY fecha_vencimiento ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Quotation::from)
            .filter_map(|q| {
                expiry_urgency(q.estado, q.fecha_vencimiento, today).map(|u| (q, u))
            })
            .collect())
    }

    // =========================================================================
    // Status / Delete
    // =========================================================================

    /// Updates the quotation's estado.
    ///
    /// No transition graph is enforced: staff may move a quotation to any
    /// state, including out of a terminal one.
    pub async fn update_status(&self, id: i64, estado: QuotationStatus) -> DbResult<Quotation> {
        let result = sqlx::query(
            "UPDATE cotizaciones SET estado = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(estado)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id.to_string()));
        }

        debug!(id, estado = ?estado, "Quotation status updated");
        self.get_by_id(id).await
    }

    /// Deletes a quotation. Its line items go with it (cascade).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM cotizaciones WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id.to_string()));
        }

        info!(id, "Quotation deleted");
        Ok(())
    }
}

// =============================================================================
// Transactional Helpers
// =============================================================================

/// Inserts one line item row. The subtotal is derived here, never taken
/// from the caller.
async fn insert_line_item(
    conn: &mut SqliteConnection,
    cotizacion_id: i64,
    item: &NewLineItem,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO detalle_cotizaciones
            (cotizacion_id, producto_id, producto_temporal_id, tipo,
             nombre, descripcion, cantidad, precio_unitario, subtotal, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(cotizacion_id)
    .bind(item.producto_id)
    .bind(item.producto_temporal_id)
    .bind(item.tipo)
    .bind(&item.nombre)
    .bind(&item.descripcion)
    .bind(item.cantidad)
    .bind(item.precio_unitario.cents())
    .bind(item.subtotal().cents())
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}

async fn fetch_quotation(conn: &mut SqliteConnection, id: i64) -> DbResult<Quotation> {
    sqlx::query_as::<_, QuotationRow>(
        r#"
        SELECT id, numero, fecha_cotizacion, fecha_vencimiento,
               cliente_id, cliente_tipo, usuario_id, miempresa_id,
               moneda, tipo_cambio,
               total_monto_productos, total_adicionales_monto, total,
               estado, notas, created_at, updated_at
        FROM cotizaciones
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .map(Quotation::from)
    .ok_or_else(|| DbError::not_found("Quotation", id.to_string()))
}

async fn fetch_items(conn: &mut SqliteConnection, cotizacion_id: i64) -> DbResult<Vec<LineItem>> {
    let rows = sqlx::query_as::<_, LineItemRow>(
        r#"
        SELECT id, cotizacion_id, producto_id, producto_temporal_id, tipo,
               nombre, descripcion, cantidad, precio_unitario, subtotal, created_at
        FROM detalle_cotizaciones
        WHERE cotizacion_id = ?1
        ORDER BY id ASC
        "#,
    )
    .bind(cotizacion_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(LineItem::from).collect())
}

/// Recomputes the totals from the stored line items and writes them back.
async fn write_totals(
    conn: &mut SqliteConnection,
    id: i64,
    now: DateTime<Utc>,
) -> DbResult<QuotationTotals> {
    let items = fetch_items(conn, id).await?;
    let totals = recompute(&items);

    sqlx::query(
        r#"
        UPDATE cotizaciones
        SET total_monto_productos = ?2,
            total_adicionales_monto = ?3,
            total = ?4,
            updated_at = ?5
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(totals.total_monto_productos.cents())
    .bind(totals.total_adicionales_monto.cents())
    .bind(totals.total.cents())
    .bind(now)
    .execute(conn)
    .await?;

    Ok(totals)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::company::NewCompanyConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_company(db: &Database) -> i64 {
        db.companies()
            .insert(NewCompanyConfig {
                nombre: "Equipos e Instrumentos Industriales Lima".to_string(),
                codigo_cotizacion: Some("EIIL".to_string()),
                anio_cotizacion: None,
            })
            .await
            .unwrap()
            .id
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn centrifuga() -> NewLineItem {
        NewLineItem {
            tipo: LineItemKind::Producto,
            producto_id: Some(9),
            producto_temporal_id: None,
            nombre: "Centrifuga de laboratorio".to_string(),
            descripcion: Some("Modelo CL-420, 4000 rpm".to_string()),
            cantidad: 2,
            precio_unitario: Money::from_cents(450_000),
        }
    }

    fn instalacion() -> NewLineItem {
        NewLineItem {
            tipo: LineItemKind::Adicional,
            producto_id: None,
            producto_temporal_id: None,
            nombre: "Instalacion y capacitacion".to_string(),
            descripcion: None,
            cantidad: 1,
            precio_unitario: Money::from_cents(150_000),
        }
    }

    fn new_quotation(miempresa_id: Option<i64>, items: Vec<NewLineItem>) -> NewQuotation {
        NewQuotation {
            cliente: ClientRef::Empresa(15),
            usuario_id: 3,
            miempresa_id,
            moneda: Currency::Soles,
            tipo_cambio: ExchangeRate::identity(),
            fecha_cotizacion: Some(date(2025, 6, 1)),
            fecha_vencimiento: date(2025, 6, 15),
            estado: QuotationStatus::Pendiente,
            notas: None,
            items,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_primary_numero() {
        let db = test_db().await;
        let company_id = seed_company(&db).await;

        let created = db
            .quotations()
            .create_quotation(new_quotation(Some(company_id), vec![centrifuga()]))
            .await
            .unwrap();

        assert_eq!(created.quotation.numero, "EIIL-00000001-2025");
        assert_eq!(created.quotation.miempresa_id, Some(company_id));

        // Counter persisted: the next quotation continues the sequence.
        let second = db
            .quotations()
            .create_quotation(new_quotation(Some(company_id), vec![centrifuga()]))
            .await
            .unwrap();
        assert_eq!(second.quotation.numero, "EIIL-00000002-2025");
    }

    #[tokio::test]
    async fn test_create_fallback_numbering_continues() {
        let db = test_db().await;

        let first = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga()]))
            .await
            .unwrap();
        assert_eq!(first.quotation.numero, "COT-2025-001");

        let second = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga()]))
            .await
            .unwrap();
        assert_eq!(second.quotation.numero, "COT-2025-002");
    }

    #[tokio::test]
    async fn test_create_computes_grouped_totals() {
        let db = test_db().await;

        // 2 × 4500.00 producto + 1500.00 adicional
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga(), instalacion()]))
            .await
            .unwrap();

        let q = &created.quotation;
        assert_eq!(q.total_monto_productos.cents(), 900_000);
        assert_eq!(q.total_adicionales_monto.cents(), 150_000);
        assert_eq!(q.total.cents(), 1_050_000);
        assert_eq!(created.items.len(), 2);

        // Subtotals were derived, never taken from the caller.
        assert_eq!(created.items[0].subtotal.cents(), 900_000);
    }

    #[tokio::test]
    async fn test_temporal_items_count_as_products() {
        let db = test_db().await;

        let temporal = NewLineItem {
            tipo: LineItemKind::Temporal,
            producto_id: None,
            producto_temporal_id: Some(4),
            nombre: "Equipo a pedido".to_string(),
            descripcion: None,
            cantidad: 1,
            precio_unitario: Money::from_cents(80_000),
        };

        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga(), temporal]))
            .await
            .unwrap();

        assert_eq!(created.quotation.total_monto_productos.cents(), 980_000);
        assert_eq!(created.quotation.total_adicionales_monto.cents(), 0);
        assert_eq!(created.quotation.total.cents(), 980_000);
    }

    #[tokio::test]
    async fn test_create_validation_failure_leaves_counter_untouched() {
        let db = test_db().await;
        let company_id = seed_company(&db).await;

        let mut input = new_quotation(Some(company_id), vec![centrifuga()]);
        input.fecha_vencimiento = date(2025, 5, 1); // before fecha_cotizacion

        let err = db.quotations().create_quotation(input).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let company = db.companies().get_by_id(company_id).await.unwrap();
        assert_eq!(company.contador_cotizacion, 0);
    }

    #[tokio::test]
    async fn test_insert_failure_rolls_back_counter_bump() {
        let db = test_db().await;
        let company_id = seed_company(&db).await;

        // Occupy the exact number the allocator will mint next, so the
        // quotation insert trips the UNIQUE constraint after the counter
        // bump already happened inside the transaction.
        sqlx::query(
            r#"
            INSERT INTO cotizaciones
                (numero, fecha_cotizacion, fecha_vencimiento,
                 cliente_id, cliente_tipo, usuario_id,
                 created_at, updated_at)
            VALUES ('EIIL-00000001-2025', '2025-05-01', '2025-05-20',
                    1, 'particular', 1,
                    '2025-05-01T00:00:00Z', '2025-05-01T00:00:00Z')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db
            .quotations()
            .create_quotation(new_quotation(Some(company_id), vec![centrifuga()]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The bump rolled back with the failed transaction.
        let company = db.companies().get_by_id(company_id).await.unwrap();
        assert_eq!(company.contador_cotizacion, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_only_groups_present() {
        let db = test_db().await;
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga(), instalacion()]))
            .await
            .unwrap();

        // Replace only the adicionales: a pricier shipping line.
        let envio = NewLineItem {
            tipo: LineItemKind::Adicional,
            producto_id: None,
            producto_temporal_id: None,
            nombre: "Envio especializado".to_string(),
            descripcion: None,
            cantidad: 1,
            precio_unitario: Money::from_cents(200_000),
        };

        let updated = db
            .quotations()
            .update_line_items(created.quotation.id, vec![envio])
            .await
            .unwrap();

        // Product rows untouched, adicional row replaced, totals recomputed.
        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.quotation.total_monto_productos.cents(), 900_000);
        assert_eq!(updated.quotation.total_adicionales_monto.cents(), 200_000);
        assert_eq!(updated.quotation.total.cents(), 1_100_000);
    }

    #[tokio::test]
    async fn test_update_replaces_both_groups() {
        let db = test_db().await;
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga(), instalacion()]))
            .await
            .unwrap();

        let mut cheaper = centrifuga();
        cheaper.cantidad = 1;

        let updated = db
            .quotations()
            .update_line_items(created.quotation.id, vec![cheaper, instalacion()])
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.quotation.total_monto_productos.cents(), 450_000);
        assert_eq!(updated.quotation.total.cents(), 600_000);
    }

    #[tokio::test]
    async fn test_update_missing_quotation_is_not_found() {
        let db = test_db().await;
        let err = db
            .quotations()
            .update_line_items(999, vec![centrifuga()])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_recalculate_totals_is_idempotent() {
        let db = test_db().await;
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga(), instalacion()]))
            .await
            .unwrap();

        let once = db
            .quotations()
            .recalculate_totals(created.quotation.id)
            .await
            .unwrap();
        let twice = db
            .quotations()
            .recalculate_totals(created.quotation.id)
            .await
            .unwrap();

        assert_eq!(once.total, created.quotation.total);
        assert_eq!(twice.total, once.total);
        assert_eq!(
            twice.total,
            twice.total_monto_productos + twice.total_adicionales_monto
        );
    }

    #[tokio::test]
    async fn test_get_with_items_round_trips() {
        let db = test_db().await;
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga()]))
            .await
            .unwrap();

        let fetched = db
            .quotations()
            .get_with_items(created.quotation.id)
            .await
            .unwrap();

        assert_eq!(fetched.quotation.numero, created.quotation.numero);
        assert_eq!(fetched.quotation.cliente, ClientRef::Empresa(15));
        assert_eq!(fetched.quotation.moneda, Currency::Soles);
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].nombre, "Centrifuga de laboratorio");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;
        let err = db.quotations().get_by_id(404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = test_db().await;
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga()]))
            .await
            .unwrap();

        let updated = db
            .quotations()
            .update_status(created.quotation.id, QuotationStatus::Enviada)
            .await
            .unwrap();
        assert_eq!(updated.estado, QuotationStatus::Enviada);

        // Any state is reachable, including leaving a terminal one.
        let reopened = db
            .quotations()
            .update_status(created.quotation.id, QuotationStatus::Negociacion)
            .await
            .unwrap();
        assert_eq!(reopened.estado, QuotationStatus::Negociacion);
    }

    #[tokio::test]
    async fn test_delete_cascades_line_items() {
        let db = test_db().await;
        let created = db
            .quotations()
            .create_quotation(new_quotation(None, vec![centrifuga(), instalacion()]))
            .await
            .unwrap();
        let id = created.quotation.id;

        db.quotations().delete(id).await.unwrap();

        let err = db.quotations().get_by_id(id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM detalle_cotizaciones WHERE cotizacion_id = ?1")
                .bind(id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_list_expiring_flags_urgency() {
        let db = test_db().await;

        let mut soon = new_quotation(None, vec![centrifuga()]);
        soon.fecha_vencimiento = date(2025, 6, 10);
        let soon = db.quotations().create_quotation(soon).await.unwrap();

        let mut far = new_quotation(None, vec![centrifuga()]);
        far.fecha_vencimiento = date(2025, 9, 30);
        db.quotations().create_quotation(far).await.unwrap();

        // Within the warning window.
        let expiring = db.quotations().list_expiring(date(2025, 6, 5)).await.unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].0.id, soon.quotation.id);
        assert_eq!(expiring[0].1, ExpiryUrgency::Warning);

        // Past due.
        let expiring = db.quotations().list_expiring(date(2025, 6, 20)).await.unwrap();
        assert_eq!(expiring[0].1, ExpiryUrgency::Danger);

        // Approved quotations never alert.
        db.quotations()
            .update_status(soon.quotation.id, QuotationStatus::Aprobada)
            .await
            .unwrap();
        let expiring = db.quotations().list_expiring(date(2025, 6, 20)).await.unwrap();
        assert!(expiring.iter().all(|(q, _)| q.id != soon.quotation.id));
    }
}
