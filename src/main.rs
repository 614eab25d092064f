mod action;
mod aggregator;
mod app;
mod auth;
mod cli;
mod config;
mod error;
mod event;
mod forge;
mod github;
mod issues;
mod logging;
mod paging;
mod retry;
mod runner;
mod scoring;
mod tui;
mod types;
mod ui;
mod view;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::App;
use crate::cli::Cli;
use crate::config::{Config, Settings};
use crate::event::Event;
use crate::github::GitHub;
use crate::runner::CommandRunner;
use crate::tui::EventHandler;
use crate::view::ViewModel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let log_path = logging::init();

    let mut config = Config::load();
    config.apply_cli(&cli);

    if cli.save_config {
        let path = config.save()?;
        println!("Saved configuration to {}", path.display());
        return Ok(());
    }

    // Fail before touching the terminal
    let token = auth::resolve_token(&config)?;
    let settings = Arc::new(Settings::new(config, token));
    let github = GitHub::new(settings.token.clone())?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(github, settings, log_path).await;

    tui::restore()?;

    result
}

async fn run(
    github: GitHub,
    settings: Arc<Settings>,
    log_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(Arc::clone(&settings), log_path);
    let runner = CommandRunner::new(Arc::new(github), settings, action_tx.clone());

    let tick_rate = Duration::from_millis(120);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render | Event::Resize => {
                        let view = ViewModel::from_app(&app);
                        terminal.draw(|frame| ui::render(frame, &view))?;
                    }
                    Event::Tick => app.tick(),
                    Event::Key(_) => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                if let Some(command) = app.update(action) {
                    runner.dispatch(command);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
