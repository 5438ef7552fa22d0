//! Durable question/answer history.

mod errors;
mod record;
mod sqlite;
mod store;

pub use errors::HistoryError;
pub use record::HistoryRecord;
pub use sqlite::SqliteHistoryStore;
pub use store::HistoryStore;
