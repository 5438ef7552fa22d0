use serde::Serialize;

/// One persisted question/answer exchange.
///
/// `id` is monotonically increasing; it orders the log and is never
/// serialized to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    #[serde(skip_serializing)]
    pub id: i64,
    pub question: String,
    pub answer: String,
}
