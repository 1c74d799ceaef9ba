//! SQLite-backed store for daily city temperatures and job settings.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;
use crate::models::DailyTemperature;
use crate::utils::constants::API_KEY_SETTING;

pub struct TemperatureStore {
    conn: Connection,
}

impl TemperatureStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS temperatures (
                day TEXT NOT NULL,
                city TEXT NOT NULL,
                temperature REAL,
                minimum REAL,
                maximum REAL,
                PRIMARY KEY (day, city)
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert or replace the reading for (day, city). Missing values are stored as NULL.
    pub fn insert_temperature(&self, reading: &DailyTemperature) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO temperatures (day, city, temperature, minimum, maximum)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                reading.day.format("%Y-%m-%d").to_string(),
                reading.city,
                reading.average,
                reading.minimum,
                reading.maximum,
            ],
        )?;
        Ok(())
    }

    /// All stored readings for a city, oldest first.
    pub fn temperatures_for_city(&self, city: &str) -> Result<Vec<DailyTemperature>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, city, temperature, minimum, maximum FROM temperatures WHERE city = ?1 ORDER BY day",
        )?;

        let rows = stmt.query_map(params![city], |row| {
            let day: String = row.get(0)?;
            Ok((
                day,
                row.get::<_, String>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<f64>>(4)?,
            ))
        })?;

        let mut readings = Vec::new();
        for row in rows {
            let (day, city, average, minimum, maximum) = row?;
            let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d")?;
            readings.push(DailyTemperature::new(day, city).with_readings(average, minimum, maximum));
        }
        Ok(readings)
    }

    pub fn setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// The weather API key kept alongside the data, if any.
    pub fn api_key(&self) -> Result<Option<String>> {
        self.setting(API_KEY_SETTING)
    }
}
