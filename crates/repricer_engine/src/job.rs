use std::sync::Arc;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use repricer_core::{instructions_for, DocumentRef, ListingUrl, ScrapedListing};
use tokio_util::sync::CancellationToken;

use crate::batch::{BatchAccumulator, FlushOutcome};
use crate::decode::decode_page;
use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::store::TableStore;
use crate::{ExtractionError, JobEvent, RunReport};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: JobEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<JobEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<JobEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }
}

/// Collaborators shared by every run.
#[derive(Clone)]
pub struct JobContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn Extractor>,
    pub store: Arc<dyn TableStore>,
    pub sink: Arc<dyn ProgressSink>,
    pub batch_threshold: usize,
}

/// One pass over the listings of a document.
///
/// URLs come from the document's own URL column, read together with the
/// snapshot used for row matching. They are processed strictly in order
/// with no delay between pages. Every per-URL failure is logged and skipped.
pub struct ParsingJob {
    ctx: JobContext,
    document: DocumentRef,
    cancel: CancellationToken,
    urls: Option<Vec<String>>,
}

impl ParsingJob {
    pub fn new(ctx: JobContext, document: DocumentRef, cancel: CancellationToken) -> Self {
        Self {
            ctx,
            document,
            cancel,
            urls: None,
        }
    }

    /// Processes `urls` instead of the document's URL column.
    pub fn with_urls(mut self, urls: Vec<String>) -> Self {
        self.urls = Some(urls);
        self
    }

    pub async fn run(mut self) -> RunReport {
        let mut report = RunReport::default();

        let snapshot = match self.ctx.store.snapshot(&self.document).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                engine_error!("Could not read {}: {}", self.document.name, err);
                report.snapshot_failed = true;
                self.ctx.sink.emit(JobEvent::Finished(report.clone()));
                return report;
            }
        };
        let urls = self
            .urls
            .take()
            .unwrap_or_else(|| snapshot.listing_urls());
        engine_info!(
            "Parsing {} listings from {} ({} rows)",
            urls.len(),
            self.document.name,
            snapshot.len()
        );
        self.ctx.sink.emit(JobEvent::Started {
            document: self.document.name.clone(),
            urls: urls.len(),
        });

        let mut batch = BatchAccumulator::new(
            self.ctx.store.clone(),
            self.document.clone(),
            self.ctx.batch_threshold,
        );

        for (index, raw) in urls.iter().enumerate() {
            // Checked between pages only; an in-flight fetch runs to completion.
            if self.cancel.is_cancelled() {
                let lost = batch.discard();
                engine_info!(
                    "Parsing stopped before listing {}; {} buffered cells discarded",
                    index + 1,
                    lost
                );
                report.cancelled = true;
                report.cells_dropped += lost;
                break;
            }
            report.urls_seen += 1;

            let url = match ListingUrl::parse(raw) {
                Ok(url) => url,
                Err(err) => {
                    engine_debug!("Skipping listing {}: {}", index + 1, err);
                    report.invalid_urls += 1;
                    continue;
                }
            };

            let listing = match self.scrape(&url).await {
                Ok(listing) => listing,
                Err(err) => {
                    engine_warn!("Skipping {}: {}", url, err);
                    report.extraction_failures += 1;
                    continue;
                }
            };
            engine_debug!(
                "{} price={} quantity={} ({})",
                url,
                listing.price,
                listing.quantity,
                index + 1
            );

            let row = snapshot.locate(url.as_str());
            self.ctx.sink.emit(JobEvent::UrlProcessed {
                index,
                url: url.to_string(),
                row: row.map(|row| row.get()),
            });
            let Some(row) = row else {
                engine_warn!("No row for {} in {}", url, self.document.name);
                report.rows_not_found += 1;
                continue;
            };

            for instruction in instructions_for(row, &listing) {
                batch.add(instruction);
            }
            report.rows_matched += 1;

            let outcome = batch.maybe_flush().await;
            self.record(outcome, &batch, &mut report);
        }

        if !report.cancelled {
            let outcome = batch.flush_remaining().await;
            self.record(outcome, &batch, &mut report);
        }

        engine_info!("Parsing of {} finished: {}", self.document.name, report);
        self.ctx.sink.emit(JobEvent::Finished(report.clone()));
        report
    }

    async fn scrape(&self, url: &ListingUrl) -> Result<ScrapedListing, ExtractionError> {
        let output = self.ctx.fetcher.fetch(url.as_str()).await?;
        if output.metadata.final_url != url.as_str() {
            engine_debug!("{} redirected to {}", url, output.metadata.final_url);
        }
        let html = decode_page(&output.bytes, output.metadata.content_type.as_deref())?;
        Ok(self.ctx.extractor.extract(&html))
    }

    fn record(&self, outcome: FlushOutcome, batch: &BatchAccumulator, report: &mut RunReport) {
        match outcome {
            FlushOutcome::Idle => {}
            FlushOutcome::Written { cells, dropped } => {
                report.batches_flushed += 1;
                report.cells_written += cells;
                report.cells_dropped += dropped;
                self.ctx.sink.emit(JobEvent::BatchFlushed { cells });
            }
            FlushOutcome::Failed { cells, dropped } => {
                report.batches_failed += 1;
                report.cells_dropped += cells + dropped;
                self.ctx.sink.emit(JobEvent::BatchFailed {
                    cells,
                    message: batch.last_error().unwrap_or_default().to_string(),
                });
            }
        }
    }
}
