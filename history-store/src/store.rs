use crate::errors::HistoryError;
use crate::record::HistoryRecord;

/// Append-only question/answer log.
///
/// Methods are blocking. Records are never updated in place; `clear_all`
/// is the only removal.
pub trait HistoryStore: Send + Sync {
    /// Persists one exchange and returns its id.
    fn append(&self, question: &str, answer: &str) -> Result<i64, HistoryError>;

    /// Every record, newest first.
    fn list_all(&self) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Deletes every record and returns how many were removed.
    fn clear_all(&self) -> Result<usize, HistoryError>;
}
