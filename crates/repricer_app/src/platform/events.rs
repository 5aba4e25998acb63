use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};
use repricer_engine::JobEvent;

/// Drains job events on a dedicated thread and prints the ones an operator
/// cares about. The thread ends when every sender is dropped.
pub fn spawn_event_printer(events: mpsc::Receiver<JobEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in events {
            log_event(&event);
            if let Some(line) = describe(&event) {
                println!("{line}");
            }
        }
    })
}

fn log_event(event: &JobEvent) {
    match event {
        JobEvent::Started { document, urls } => {
            engine_info!("Run started on {} with {} urls", document, urls);
        }
        JobEvent::UrlProcessed { index, url, row } => {
            engine_debug!("#{} {} -> row {:?}", index, url, row);
        }
        JobEvent::BatchFlushed { cells } => engine_debug!("Flushed {} cells", cells),
        JobEvent::BatchFailed { cells, message } => {
            engine_warn!("Dropped {} cells: {}", cells, message);
        }
        JobEvent::Finished(report) => engine_info!("Run finished: {}", report),
    }
}

/// Operator-facing line for an event, if it deserves one.
pub fn describe(event: &JobEvent) -> Option<String> {
    match event {
        JobEvent::Started { document, urls } => {
            Some(format!("Parsing '{document}': {urls} listings queued."))
        }
        JobEvent::UrlProcessed { .. } | JobEvent::BatchFlushed { .. } => None,
        JobEvent::BatchFailed { cells, message } => Some(format!(
            "Writing {cells} cells to the spreadsheet failed: {message}"
        )),
        JobEvent::Finished(report) if report.snapshot_failed => {
            Some("Parsing aborted: the spreadsheet could not be read.".to_string())
        }
        JobEvent::Finished(report) if report.cancelled => {
            Some(format!("Parsing stopped ({report})."))
        }
        JobEvent::Finished(report) => Some(format!("Parsing finished ({report}).")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use repricer_engine::{JobEvent, RunReport};

    use super::{describe, spawn_event_printer};

    #[test]
    fn per_url_progress_stays_quiet() {
        let event = JobEvent::UrlProcessed {
            index: 3,
            url: "https://x/3".to_string(),
            row: Some(4),
        };
        assert_eq!(describe(&event), None);
        assert_eq!(describe(&JobEvent::BatchFlushed { cells: 80 }), None);
    }

    #[test]
    fn finished_runs_are_told_apart() {
        let aborted = RunReport {
            snapshot_failed: true,
            ..RunReport::default()
        };
        assert_eq!(
            describe(&JobEvent::Finished(aborted)).unwrap(),
            "Parsing aborted: the spreadsheet could not be read."
        );

        let stopped = RunReport {
            cancelled: true,
            urls_seen: 2,
            ..RunReport::default()
        };
        assert!(describe(&JobEvent::Finished(stopped))
            .unwrap()
            .starts_with("Parsing stopped (2 urls"));

        let done = describe(&JobEvent::Finished(RunReport::default())).unwrap();
        assert!(done.starts_with("Parsing finished"), "{done}");
    }

    #[test]
    fn failed_batches_are_reported() {
        let line = describe(&JobEvent::BatchFailed {
            cells: 6,
            message: "HTTP 500".to_string(),
        })
        .unwrap();
        assert_eq!(line, "Writing 6 cells to the spreadsheet failed: HTTP 500");
    }

    #[test]
    fn printer_thread_ends_with_the_channel() {
        let (tx, rx) = mpsc::channel();
        let printer = spawn_event_printer(rx);
        tx.send(JobEvent::BatchFlushed { cells: 2 }).unwrap();
        drop(tx);
        printer.join().unwrap();
    }
}
