use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::{engine_info, engine_warn};
use repricer_core::{
    DocumentBindings, DocumentRef, JobLifecycle, JobState, OperatorId, StateError, StopOutcome,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::job::{JobContext, ParsingJob};
use crate::store::StoreError;
use crate::RunReport;

#[derive(Default)]
struct Shared {
    lifecycle: JobLifecycle,
    cancel: Option<CancellationToken>,
    bindings: DocumentBindings,
}

/// Owns the single background parsing job and the operators' document
/// selections. Command handlers share one instance; every method returns
/// without waiting on the job.
#[derive(Clone)]
pub struct JobManager {
    shared: Arc<Mutex<Shared>>,
    ctx: JobContext,
    runtime: Handle,
}

impl JobManager {
    pub fn new(ctx: JobContext, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            ctx,
            runtime,
        }
    }

    pub fn query_status(&self) -> JobState {
        lock(&self.shared).lifecycle.state()
    }

    /// Spawns a run over the operator's selected document.
    ///
    /// Rejections leave the state untouched. The returned handle resolves to
    /// the run report; dropping it does not stop the job.
    pub fn request_start(&self, operator: &OperatorId) -> Result<JoinHandle<RunReport>, StateError> {
        let mut shared = lock(&self.shared);
        shared.lifecycle.check_can_begin()?;
        let document = shared
            .bindings
            .get(operator)
            .cloned()
            .ok_or(StateError::NoDocumentSelected)?;
        shared.lifecycle.begin()?;

        let cancel = CancellationToken::new();
        shared.cancel = Some(cancel.clone());
        drop(shared);

        engine_info!("Operator {} started parsing {}", operator, document.name);
        let job = ParsingJob::new(self.ctx.clone(), document, cancel);
        let guard = FinishGuard(self.shared.clone());
        Ok(self.runtime.spawn(async move {
            let report = job.run().await;
            drop(guard);
            report
        }))
    }

    pub fn request_stop(&self) -> StopOutcome {
        let mut shared = lock(&self.shared);
        let outcome = shared.lifecycle.cancel();
        if outcome == StopOutcome::Signalled {
            if let Some(cancel) = shared.cancel.as_ref() {
                cancel.cancel();
            }
            engine_info!("Stop requested; parsing halts before the next listing");
        }
        outcome
    }

    /// Resolves `name` in the store and binds it to the operator.
    pub async fn select_document(
        &self,
        operator: &OperatorId,
        name: &str,
    ) -> Result<DocumentRef, StoreError> {
        let document = self.ctx.store.open_document(name).await.map_err(|err| {
            engine_warn!("Could not open document {:?}: {}", name, err);
            err
        })?;
        lock(&self.shared)
            .bindings
            .bind(operator.clone(), document.clone());
        engine_info!("Operator {} selected {}", operator, document.name);
        Ok(document)
    }

    pub fn current_document(&self, operator: &OperatorId) -> Option<DocumentRef> {
        lock(&self.shared).bindings.get(operator).cloned()
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentRef>, StoreError> {
        self.ctx.store.list_documents().await
    }
}

/// Returns the manager to `Idle` when the job task ends, including by panic.
struct FinishGuard(Arc<Mutex<Shared>>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        let mut shared = lock(&self.0);
        shared.lifecycle.finish();
        shared.cancel = None;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
