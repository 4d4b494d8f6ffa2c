use catalogo_core::ServiceError;
use catalogo_sql::SQLStore;
use tracing::debug;

/// DDL applied at startup. Every statement is idempotent.
///
/// `AUTOINCREMENT` keeps ids of deleted rows from being handed out again.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS marca (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        marca VARCHAR(20) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS modelo (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        modelo VARCHAR(50) NOT NULL,
        color TEXT,
        potencia INTEGER,
        plazas INTEGER,
        precio REAL,
        numero_serie TEXT,
        marca_id INTEGER REFERENCES marca(id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_modelo_marca ON modelo(marca_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for ddl in SCHEMA {
        sql.exec(ddl, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    debug!("catalogo schema ready");
    Ok(())
}
