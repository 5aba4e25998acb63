use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use engine_logging::engine_info;
use repricer_core::OperatorId;
use repricer_engine::{
    ChannelProgressSink, JobContext, JobEvent, JobManager, ListingExtractor, PageSchema,
    ReqwestFetcher, SheetsStore,
};

use super::commands::{parse_command, Command};
use super::config::{AppConfig, DEFAULT_CONFIG_PATH};
use super::dispatch::Dispatcher;
use super::events::spawn_event_printer;
use super::logging;

pub fn run_app() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&config_path)?;
    logging::initialize(&config.log);
    engine_info!("repricer starting with config {}", config_path.display());

    let access_token = env::var(&config.store.access_token_env).with_context(|| {
        format!(
            "reading the access token from ${}",
            config.store.access_token_env
        )
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting the async runtime")?;

    let store = SheetsStore::new(config.sheets_settings(access_token))
        .context("configuring the spreadsheet store")?;
    let extractor =
        ListingExtractor::new(&PageSchema::default()).context("compiling page selectors")?;
    let fetcher =
        ReqwestFetcher::new(config.fetch_settings()).context("configuring the page fetcher")?;
    let (event_tx, event_rx) = mpsc::channel::<JobEvent>();

    let ctx = JobContext {
        fetcher: Arc::new(fetcher),
        extractor: Arc::new(extractor),
        store: Arc::new(store),
        sink: Arc::new(ChannelProgressSink::new(event_tx)),
        batch_threshold: config.batch_threshold,
    };
    let manager = JobManager::new(ctx, runtime.handle().clone());
    let printer = spawn_event_printer(event_rx);

    let mut dispatcher = Dispatcher::new(
        manager,
        runtime.handle().clone(),
        OperatorId::new(config.operator.clone()),
    );

    println!("Repricer ready. Type /help for commands.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading console input")?;
        let Some(command) = parse_command(&line) else {
            continue;
        };
        let quit = command == Command::Quit;
        println!("{}", dispatcher.handle(command));
        io::stdout().flush().ok();
        if quit {
            break;
        }
    }

    dispatcher.shutdown();
    // Dropping the runtime aborts the job task, which releases the last
    // event sender and lets the printer thread finish.
    drop(dispatcher);
    drop(runtime);
    let _ = printer.join();
    engine_info!("repricer exiting");
    Ok(())
}
