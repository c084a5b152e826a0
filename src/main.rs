// wingtable entry point.
// Runs the terminal widget previewer, or with --bridge serves shell method calls on stdin.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use tokio::runtime::Runtime;

use wingtable::app::App;
use wingtable::bridge::{Bridge, HostPower, HttpDownloader, serve_lines};
use wingtable::config::Config;
use wingtable::store::{FileStore, KeyLayout, KeyValueStore};
use wingtable::widget::{WidgetHost, WidgetKind};
use wingtable::{Result, logging};

/// How long to wait for in-flight downloads once input closes.
const DOWNLOAD_DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    let config = Config::from_env()?;
    let _guard = logging::init(&config.log_dir)?;

    tracing::info!(
        prefs = %config.prefs_path.display(),
        widget_prefs = %config.widget_prefs_path.display(),
        "starting wingtable"
    );

    let schedule_store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.prefs_path.clone()));
    let widget_store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::new(config.widget_prefs_path.clone()));
    let mut host = WidgetHost::new(
        schedule_store,
        widget_store,
        KeyLayout::new(config.key_prefix.clone()),
        config.system_dark,
    );
    for kind in WidgetKind::ALL {
        host.add(kind);
    }

    if std::env::args().skip(1).any(|arg| arg == "--bridge") {
        run_bridge(host, &config)
    } else {
        run_preview(host, &config)
    }
}

fn run_bridge(mut host: WidgetHost, config: &Config) -> Result<()> {
    let runtime = Runtime::new()?;
    let downloader = Arc::new(HttpDownloader::new(
        config.download_dir.clone(),
        runtime.handle().clone(),
    )?);

    host.refresh_all(Local::now().date_naive());
    let mut bridge = Bridge::new(
        Box::new(downloader.clone()),
        Box::new(HostPower),
        Box::new(host),
    );

    let stdin = io::stdin();
    serve_lines(stdin.lock(), io::stdout().lock(), &mut bridge)?;

    let started = Instant::now();
    while downloader.pending_count() > 0 && started.elapsed() < DOWNLOAD_DRAIN_TIMEOUT {
        std::thread::sleep(Duration::from_millis(100));
    }
    if downloader.pending_count() > 0 {
        tracing::warn!(pending = downloader.pending_count(), "abandoning unfinished downloads");
    }
    Ok(())
}

fn run_preview(host: WidgetHost, config: &Config) -> Result<()> {
    let mut app = App::new(host, Local::now().date_naive(), config.system_dark);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result?;
    Ok(())
}
