//! # Seed Data Generator
//!
//! Populates the database with demo quotation data for development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./mequip_dev.db)
//! cargo run -p mequip-db --bin seed
//!
//! # Specify database path
//! cargo run -p mequip-db --bin seed -- --db ./data/mequip.db
//! ```
//!
//! ## Generated Data
//! - One issuing-company config (EIIL) owning the number sequence
//! - A batch of quotations across the primary and fallback numbering paths,
//!   mixed statuses, with producto/temporal/adicional line items

use std::env;

use chrono::{Duration, Utc};
use mequip_core::{
    ClientRef, Currency, ExchangeRate, LineItemKind, Money, NewLineItem, NewQuotation,
    QuotationStatus,
};
use mequip_db::{Database, DbConfig, NewCompanyConfig};

/// Demo catalog: (producto_id, name, unit price in centimos).
const PRODUCTS: &[(i64, &str, i64)] = &[
    (101, "Centrifuga de laboratorio CL-420", 450_000),
    (102, "Microscopio binocular MB-200", 250_000),
    (103, "Balanza analitica 0.1mg", 380_000),
    (104, "Autoclave vertical 50L", 920_000),
    (105, "Agitador magnetico con calefaccion", 85_000),
    (106, "Espectrofotometro UV-Vis", 1_250_000),
];

/// Demo add-on services: (name, price in centimos).
const SERVICES: &[(&str, i64)] = &[
    ("Instalacion y capacitacion", 150_000),
    ("Envio especializado", 80_000),
    ("Mantenimiento preventivo (1 año)", 200_000),
];

const STATUSES: &[QuotationStatus] = &[
    QuotationStatus::Pendiente,
    QuotationStatus::Enviada,
    QuotationStatus::Negociacion,
    QuotationStatus::Aprobada,
    QuotationStatus::Rechazada,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./mequip_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MegaEquipamiento Quotation Seed Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mequip_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 MegaEquipamiento Quotation Seed Generator");
    println!("============================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Skip if already seeded.
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nuestras_empresas")
        .fetch_one(db.pool())
        .await?;
    if existing > 0 {
        println!("⚠ Database already has {} company configs", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let company = db
        .companies()
        .insert(NewCompanyConfig {
            nombre: "Equipos e Instrumentos Industriales Lima".to_string(),
            codigo_cotizacion: Some("EIIL".to_string()),
            anio_cotizacion: None,
        })
        .await?;
    println!("✓ Company config created: {} (EIIL)", company.nombre);

    println!();
    println!("Generating quotations...");

    let today = Utc::now().date_naive();
    let mut generated = 0;

    for seed in 0..12usize {
        let (producto_id, nombre, precio) = PRODUCTS[seed % PRODUCTS.len()];
        let cantidad = 1 + (seed % 3) as i64;

        let mut items = vec![NewLineItem {
            tipo: LineItemKind::Producto,
            producto_id: Some(producto_id),
            producto_temporal_id: None,
            nombre: nombre.to_string(),
            descripcion: None,
            cantidad,
            precio_unitario: Money::from_cents(precio),
        }];

        // Every other quotation carries an add-on service.
        if seed % 2 == 0 {
            let (servicio, precio) = SERVICES[seed % SERVICES.len()];
            items.push(NewLineItem {
                tipo: LineItemKind::Adicional,
                producto_id: None,
                producto_temporal_id: None,
                nombre: servicio.to_string(),
                descripcion: None,
                cantidad: 1,
                precio_unitario: Money::from_cents(precio),
            });
        }

        // A couple of quotations exercise the fallback numbering path.
        let miempresa_id = if seed % 5 == 4 { None } else { Some(company.id) };

        let cliente = if seed % 3 == 0 {
            ClientRef::Particular(10 + seed as i64)
        } else {
            ClientRef::Empresa(40 + seed as i64)
        };

        let input = NewQuotation {
            cliente,
            usuario_id: 1 + (seed % 3) as i64,
            miempresa_id,
            moneda: if seed % 4 == 3 {
                Currency::Dolares
            } else {
                Currency::Soles
            },
            tipo_cambio: if seed % 4 == 3 {
                ExchangeRate::from_millis(3_750)
            } else {
                ExchangeRate::identity()
            },
            fecha_cotizacion: Some(today - Duration::days(seed as i64 * 3)),
            // Staggered expiries so the notifier has something to flag.
            fecha_vencimiento: today + Duration::days(3 + seed as i64 * 4),
            estado: STATUSES[seed % STATUSES.len()],
            notas: None,
            items,
        };

        let created = db.quotations().create_quotation(input).await?;
        println!(
            "  {} — total S/ {}",
            created.quotation.numero, created.quotation.total
        );
        generated += 1;
    }

    println!();
    println!("✓ Generated {} quotations", generated);

    let expiring = db.quotations().list_expiring(today).await?;
    println!("  Expiring soon: {}", expiring.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
