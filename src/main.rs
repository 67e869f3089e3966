use anyhow::Context;
use lifeline::config::loader::{ConfigLoader, config_exists, default_config_path};
use lifeline::console::{self, Command, Outcome};
use lifeline::models::AppState;
use lifeline::observability;
use lifeline::services::EmergencyApp;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config)?;
    observability::init_tracing(&config.logging)?;

    info!("Starting {} ({})...", config.app_name, config.environment);
    if !config_exists() {
        info!("No {} found, using defaults", default_config_path().display());
    }

    let (mut app, mut events) = EmergencyApp::new(config, AppState::sample());
    info!("Application state created");

    let (line_tx, mut lines) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{}", console::render(&app));
    println!("type 'help' for commands");

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if let Err(e) = app.dispatch(event) {
                    warn!("event rejected: {}", e);
                }
                if let Err(e) = app.drain(&mut events) {
                    warn!("event rejected: {}", e);
                }
                println!("{}", console::render(&app));
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("stdin closed");
                    break;
                };
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(console::CommandError::Empty) => continue,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match console::execute(&mut app, command) {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Continue(message)) => {
                        if let Some(message) = message {
                            println!("{}", message);
                        }
                    }
                    Err(e) => println!("error: {:#}", e),
                }
                if let Err(e) = app.drain(&mut events) {
                    warn!("event rejected: {}", e);
                }
                println!("{}", console::render(&app));
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
