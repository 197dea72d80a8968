use sea_orm::DatabaseConnection;

mod accounts;
mod transactions;
mod transfers;

pub use accounts::AccountSummary;

/// Default transfer ceiling: 1,000,000 currency units in minor units.
pub const DEFAULT_MAX_TRANSFER_MINOR: i64 = 100_000_000;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger-backed banking engine.
///
/// Holds only the database handle; account balances live in the store and
/// every money-moving sequence runs inside one of its transactions.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    max_transfer_minor: i64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    pub(crate) fn max_transfer_minor(&self) -> i64 {
        self.max_transfer_minor
    }
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    max_transfer_minor: i64,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            max_transfer_minor: DEFAULT_MAX_TRANSFER_MINOR,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the configured transfer ceiling (minor units).
    pub fn max_transfer_minor(mut self, max: i64) -> EngineBuilder {
        self.max_transfer_minor = max;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            max_transfer_minor: self.max_transfer_minor,
        }
    }
}
