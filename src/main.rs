use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::watch;

use gaze::app::App;
use gaze::config::{self, Config, SourceMode, load_config, load_config_from_path};
use gaze::controller::event::IntentSender;
use gaze::controller::{EngineSettings, SyncController};
use gaze::engine::{HostService, ViewModel};
use gaze::event::{Event, EventHandler};
use gaze::logging;
use gaze::remote::{HttpHost, LocalHost, LocalPushChannel, PushChannel, WsPushChannel};
use gaze::ui::{self, theme::Theme};

#[derive(Parser)]
#[command(
    name = "gaze",
    about = "Live CPU/RAM dashboard with an actionable process list"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the metrics service (e.g. http://localhost:8080)
    #[arg(long)]
    url: Option<String>,

    /// Sample this machine directly instead of a remote service
    #[arg(long, default_value_t = false)]
    local: bool,

    /// Process list poll interval in milliseconds
    #[arg(long)]
    poll_interval: Option<u64>,

    /// CPU percentage above which the alert fires
    #[arg(long)]
    threshold: Option<f64>,

    /// Number of samples kept for the history chart
    #[arg(long)]
    window: Option<usize>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init_tracing(&config.logging)?;

    let (host, push) = build_sources(&config)?;
    let mut controller = SyncController::new(EngineSettings::from_config(&config), host);
    let views = controller.subscribe();
    let intents = controller.intents();
    controller.start(push);
    let engine = tokio::spawn(controller.run());

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, views, intents.clone()).await;

    ratatui::restore();

    intents.quit();
    if tokio::time::timeout(Duration::from_secs(2), engine).await.is_err() {
        tracing::warn!("controller did not stop in time");
    }

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    views: watch::Receiver<ViewModel>,
    intents: IntentSender,
) -> Result<()> {
    let theme = Theme::default();
    let mut app = App::new(intents, views.borrow().clone());
    let mut events = EventHandler::new(views);

    terminal.draw(|frame| ui::draw(frame, &app, &theme))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != crossterm::event::KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::View(view) => app.on_view(view),
            Event::Resize => {}
        }
        terminal.draw(|frame| ui::draw(frame, &app, &theme))?;
    }

    Ok(())
}

fn build_sources(config: &Config) -> Result<(Arc<dyn HostService>, Box<dyn PushChannel>)> {
    match config.remote.mode {
        SourceMode::Remote => {
            let host = HttpHost::new(&config.remote)
                .map_err(|e| eyre!("failed to build HTTP client: {e}"))?;
            let push = WsPushChannel::new(config.remote.stream_url());
            Ok((Arc::new(host), Box::new(push)))
        }
        SourceMode::Local => {
            let host = LocalHost::new(config.local.max_processes);
            let push =
                LocalPushChannel::new(Duration::from_millis(config.local.sample_interval_ms));
            Ok((Arc::new(host), Box::new(push)))
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref url) = cli.url {
        config.remote.base_url = url.clone();
    }
    if cli.local {
        config.remote.mode = SourceMode::Local;
    }
    if let Some(ms) = cli.poll_interval {
        config.general.poll_interval_ms = ms;
    }
    if let Some(threshold) = cli.threshold {
        config.alert.cpu_threshold = threshold;
    }
    if let Some(window) = cli.window {
        config.general.window_size = window;
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = Some(path.clone());
    }

    config
}
