//! Declarative table definitions
//!
//! Each table is described once in code as a list of column definitions.
//! On startup the declared tables are created if they are missing; nothing
//! else is reconciled against the live schema.
//!
//! # Usage
//!
//! ```rust,ignore
//! pub struct SongsTable;
//!
//! impl TableSchema for SongsTable {
//!     fn table_name() -> &'static str { "songs" }
//!
//!     fn expected_columns() -> Vec<ColumnDefinition> {
//!         vec![
//!             ColumnDefinition::new("id", "INTEGER").primary_key().autoincrement(),
//!             ColumnDefinition::new("title", "TEXT").not_null(),
//!         ]
//!     }
//! }
//!
//! SchemaBuilder::create_table::<SongsTable>(&pool).await?;
//! ```

use crate::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Column definition with SQL constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// SQL type (e.g., "TEXT", "INTEGER")
    pub sql_type: String,
    /// NOT NULL constraint
    pub not_null: bool,
    /// PRIMARY KEY constraint
    pub primary_key: bool,
    /// AUTOINCREMENT (only meaningful on an INTEGER PRIMARY KEY)
    pub autoincrement: bool,
    /// Foreign key target as (table, column)
    pub references: Option<(String, String)>,
}

impl ColumnDefinition {
    /// Create new column definition
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            primary_key: false,
            autoincrement: false,
            references: None,
        }
    }

    /// Mark column as PRIMARY KEY
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark column as AUTOINCREMENT
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Mark column as NOT NULL
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Add a foreign key to `table(column)`
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some((table.into(), column.into()));
        self
    }

    /// Render the column as it appears inside CREATE TABLE
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
            if self.autoincrement {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some((table, column)) = &self.references {
            sql.push_str(&format!(" REFERENCES {}({})", table, column));
        }
        sql
    }
}

/// Defines the expected schema for a database table
pub trait TableSchema {
    /// Table name in database
    fn table_name() -> &'static str;

    /// Column definitions in creation order
    fn expected_columns() -> Vec<ColumnDefinition>;

    /// Full `CREATE TABLE IF NOT EXISTS` statement for this table
    fn create_statement() -> String {
        let columns: Vec<String> = Self::expected_columns()
            .iter()
            .map(ColumnDefinition::to_sql)
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            Self::table_name(),
            columns.join(",\n    ")
        )
    }
}

/// Creates declared tables in a live database
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Create the table if it does not exist yet (idempotent)
    pub async fn create_table<T: TableSchema>(pool: &SqlitePool) -> Result<()> {
        let table_name = T::table_name();
        let existed = Self::table_exists(pool, table_name).await?;

        let sql = T::create_statement();
        debug!("{}", sql);
        sqlx::query(&sql).execute(pool).await?;

        if existed {
            debug!("Table '{}' already present", table_name);
        } else {
            info!("Created table '{}'", table_name);
        }

        Ok(())
    }

    /// Check if table exists
    pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type='table' AND name = ?
            )
            "#
        )
        .bind(table_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
