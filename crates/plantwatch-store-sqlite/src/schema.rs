//! SQL schema for the Plantwatch SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per generator per filing snapshot. Older snapshots are history;
-- reads only ever use the newest report_date.
CREATE TABLE IF NOT EXISTS generators (
    report_date             TEXT    NOT NULL,   -- YYYY-MM-DD
    facility_id             INTEGER NOT NULL,
    generator_id            TEXT    NOT NULL,
    facility_name           TEXT    NOT NULL,
    state                   TEXT    NOT NULL,
    capacity_mw             REAL,
    fuel_type               TEXT    NOT NULL,
    operational_status      TEXT    NOT NULL,
    planned_retirement_date TEXT,               -- YYYY-MM-DD or NULL
    actual_retirement_date  TEXT,               -- YYYY-MM-DD or NULL
    PRIMARY KEY (report_date, facility_id, generator_id)
);

CREATE TABLE IF NOT EXISTS facilities (
    facility_id INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    state       TEXT NOT NULL,
    county      TEXT,
    city        TEXT,
    latitude    REAL,
    longitude   REAL
);

-- The primary key is the research identity; rowid keeps first-seen order.
CREATE TABLE IF NOT EXISTS research_units (
    facility_slug           TEXT NOT NULL,
    unit_name               TEXT NOT NULL,
    facility_name           TEXT NOT NULL,
    status                  TEXT NOT NULL,
    fuel_type               TEXT NOT NULL,
    capacity_mw             REAL,
    planned_retirement_year INTEGER,
    actual_retirement_year  INTEGER,
    state                   TEXT NOT NULL,
    county                  TEXT,
    owner                   TEXT,
    UNIQUE (facility_slug, unit_name)
);

CREATE INDEX IF NOT EXISTS generators_report_idx ON generators(report_date);
CREATE INDEX IF NOT EXISTS research_state_idx    ON research_units(state);

PRAGMA user_version = 1;
";
