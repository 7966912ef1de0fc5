use dotenvy::dotenv;
use hr_records::{
    config::{
        database::{create_connection, create_tables},
        load_default_settings,
    },
    core::{
        DatabaseStore, RecordStore,
        columns::default_visible_columns,
        report::{format_currency, generate_roster_summary},
        schema::RecordKind,
    },
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; DATABASE_URL may also be set externally
    dotenv().ok();

    // 3. Settings from ./config.toml, defaults when absent
    let settings = load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Open the database and make sure the key-value table exists
    let db = create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))?;

    let store = RecordStore::with_keys(DatabaseStore::new(db), settings.storage);

    // 5. Summarize what is stored
    let summary = generate_roster_summary(&store).await?;
    info!(
        "Employees: {} total, {} active, {} on leave, {} terminated",
        summary.stats.total, summary.stats.active, summary.stats.on_leave, summary.stats.terminated
    );
    info!(
        "Payrolls: {} records, gross {}, net {}",
        summary.payroll_count,
        format_currency(summary.total_gross_salary),
        format_currency(summary.total_net_salary)
    );
    if summary.orphaned_payrolls > 0 {
        warn!(
            "{} payroll record(s) belong to employees that no longer exist",
            summary.orphaned_payrolls
        );
    }

    for kind in [RecordKind::Employee, RecordKind::Payroll] {
        let columns = store.load_visible_columns(kind).await?;
        if columns == default_visible_columns(kind.schema(), kind) {
            info!("{:?} columns: {} (default)", kind, columns.join(", "));
        } else {
            info!("{:?} columns: {}", kind, columns.join(", "));
        }
    }
    info!(
        "Next employee id: {} ({} rows per page)",
        store.next_employee_id().await?,
        settings.table.rows_per_page
    );

    Ok(())
}
