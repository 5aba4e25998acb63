use repricer_core::{DocumentRef, TableSnapshot, UpdateInstruction};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document {0:?} not found")]
    DocumentNotFound(String),
    #[error("store answered http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("store request failed: {0}")]
    Network(String),
    #[error("unexpected store response: {0}")]
    Decode(String),
    #[error("invalid store endpoint: {0}")]
    Endpoint(String),
}

/// The spreadsheet service holding the listings table.
///
/// Callers treat every error as non-fatal: it is logged and the run goes on
/// (or, for a failed snapshot, ends without writing anything).
#[async_trait::async_trait]
pub trait TableStore: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError>;

    async fn open_document(&self, name: &str) -> Result<DocumentRef, StoreError>;

    async fn snapshot(&self, document: &DocumentRef) -> Result<TableSnapshot, StoreError>;

    /// Writes all cells in one request. Values are interpreted as if typed
    /// by a user, so the store may coerce `"12,50"` into a number.
    async fn batch_update(
        &self,
        document: &DocumentRef,
        updates: &[UpdateInstruction],
    ) -> Result<(), StoreError>;
}
