use std::sync::{Arc, Mutex, Once};

use pretty_assertions::assert_eq;
use repricer_core::{CellAddress, DocumentRef, TableSnapshot, UpdateInstruction};
use repricer_engine::{BatchAccumulator, FlushOutcome, StoreError, TableStore};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[derive(Default)]
struct WriteLog {
    writes: Mutex<Vec<Vec<UpdateInstruction>>>,
}

impl WriteLog {
    fn writes(&self) -> Vec<Vec<UpdateInstruction>> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TableStore for WriteLog {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError> {
        Ok(Vec::new())
    }

    async fn open_document(&self, name: &str) -> Result<DocumentRef, StoreError> {
        Err(StoreError::DocumentNotFound(name.to_string()))
    }

    async fn snapshot(&self, _document: &DocumentRef) -> Result<TableSnapshot, StoreError> {
        Ok(TableSnapshot::default())
    }

    async fn batch_update(
        &self,
        _document: &DocumentRef,
        updates: &[UpdateInstruction],
    ) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(updates.to_vec());
        Ok(())
    }
}

fn document() -> DocumentRef {
    DocumentRef {
        id: "sheet-1".to_string(),
        name: "Prices".to_string(),
    }
}

fn cell(address: &str, value: &str) -> UpdateInstruction {
    UpdateInstruction::new(CellAddress::from(address), value)
}

#[tokio::test]
async fn malformed_entries_are_dropped_and_the_rest_written() {
    init_logging();
    let store = Arc::new(WriteLog::default());
    let mut batch = BatchAccumulator::new(store.clone(), document(), 4);

    batch.add(cell("J2", "1,50"));
    batch.add(cell("", "9"));
    batch.add(cell("K2", ""));
    batch.add(cell("J3", "2,00"));

    let outcome = batch.maybe_flush().await;

    assert_eq!(outcome, FlushOutcome::Written { cells: 3, dropped: 1 });
    assert_eq!(
        store.writes(),
        vec![vec![cell("J2", "1,50"), cell("K2", ""), cell("J3", "2,00")]]
    );
}

#[tokio::test]
async fn all_malformed_batch_never_reaches_the_store() {
    init_logging();
    let store = Arc::new(WriteLog::default());
    let mut batch = BatchAccumulator::new(store.clone(), document(), 40);

    batch.add(cell("", "1"));
    batch.add(cell("   ", "2"));

    let outcome = batch.flush_remaining().await;

    assert_eq!(outcome, FlushOutcome::Written { cells: 0, dropped: 2 });
    assert!(store.writes().is_empty());
    assert_eq!(batch.flush_remaining().await, FlushOutcome::Idle);
}

#[tokio::test]
async fn partial_buffer_waits_for_the_threshold() {
    init_logging();
    let store = Arc::new(WriteLog::default());
    let mut batch = BatchAccumulator::new(store.clone(), document(), 4);

    batch.add(cell("J2", "1,00"));
    batch.add(cell("K2", "3"));

    assert_eq!(batch.maybe_flush().await, FlushOutcome::Idle);
    assert!(store.writes().is_empty());
    assert_eq!(batch.discard(), 2);
    assert_eq!(batch.flush_remaining().await, FlushOutcome::Idle);
}
