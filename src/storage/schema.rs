//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the endpoint cache.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawlable origins
CREATE TABLE IF NOT EXISTS hosts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    is_searchable INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Paths reachable under a host, with their title recorded once
CREATE TABLE IF NOT EXISTS endpoints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    host_id INTEGER NOT NULL REFERENCES hosts(id),
    name TEXT NOT NULL,
    title TEXT NOT NULL,
    UNIQUE(host_id, name)
);

CREATE INDEX IF NOT EXISTS idx_endpoints_host ON endpoints(host_id);

-- Distinct search terms
CREATE TABLE IF NOT EXISTS phrases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- "Endpoint body contained phrase" confirmations
CREATE TABLE IF NOT EXISTS endpoint_phrases (
    endpoint_id INTEGER NOT NULL REFERENCES endpoints(id),
    phrase_id INTEGER NOT NULL REFERENCES phrases(id),
    UNIQUE(endpoint_id, phrase_id)
);

CREATE INDEX IF NOT EXISTS idx_endpoint_phrases_phrase ON endpoint_phrases(phrase_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
