//! Tendertale terminal player entry point.
//!
//! Every input line typed while a scene plays counts as a click on the
//! dialogue. Once the scene has settled, lines are read as commands.

use std::future::Future;
use std::sync::Arc;

use tendertale_core::clock::TokioDelay;
use tendertale_core::presentation::SilentAudio;
use tendertale_playback::application::engine::ScenePlayer;
use tendertale_playback::application::game::GameController;
use tendertale_player::command::{HELP, PlayerCommand};
use tendertale_player::config::{PlayerConfig, PlayerError};
use tendertale_player::http_backend::HttpSceneBackend;
use tendertale_player::terminal::{TerminalMessages, TerminalSurface};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Runs `operation` to completion, turning each input line into a click.
/// Returns `None` if input ends first.
async fn drive<F: Future>(
    surface: &TerminalSurface,
    lines: &mut mpsc::Receiver<String>,
    operation: F,
) -> Option<F::Output> {
    tokio::pin!(operation);
    loop {
        tokio::select! {
            biased;
            output = &mut operation => return Some(output),
            line = lines.recv() => {
                if line.is_none() {
                    return None;
                }
                let listeners = surface.click();
                debug!(listeners, "click");
            }
        }
    }
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> Result<(), PlayerError> {
    // Logs go to stderr so they never interleave with the story on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = PlayerConfig::from_env()?;
    info!(api_url = %config.api_url, user_id = %config.user_id, "starting player");

    let surface = Arc::new(TerminalSurface::stdout(config.fade_duration));
    let messages = Arc::new(TerminalMessages::stderr());
    let audio = Arc::new(SilentAudio);
    let player = ScenePlayer::new(
        surface.clone(),
        Arc::new(TokioDelay),
        audio.clone(),
        messages.clone(),
        config.playback.clone(),
    );
    let controller = GameController::new(
        Arc::new(HttpSceneBackend::new(config.api_url.clone())),
        player,
        messages,
        audio,
        config.user_id.clone(),
    )
    .with_start_scene(config.start_scene.clone());

    println!("{HELP}");
    let mut lines = spawn_input_reader();
    if drive(&surface, &mut lines, controller.start_game()).await.is_none() {
        return Ok(());
    }

    while let Some(line) = lines.recv().await {
        let finished = match PlayerCommand::parse(&line) {
            PlayerCommand::Choose(index) => {
                drive(&surface, &mut lines, controller.choose(index)).await
            }
            PlayerCommand::Back => drive(&surface, &mut lines, controller.go_back()).await,
            PlayerCommand::NewGame => drive(&surface, &mut lines, controller.new_game()).await,
            PlayerCommand::Load => drive(&surface, &mut lines, controller.load_game()).await,
            PlayerCommand::Delete => drive(&surface, &mut lines, controller.delete_game()).await,
            PlayerCommand::Save => {
                controller.save_game().await;
                Some(None)
            }
            PlayerCommand::Music => {
                let playing = controller.toggle_music();
                println!("music {}", if playing { "on" } else { "off" });
                Some(None)
            }
            PlayerCommand::Mute => {
                let muted = controller.toggle_mute();
                println!("audio {}", if muted { "muted" } else { "unmuted" });
                Some(None)
            }
            PlayerCommand::Continue => Some(None),
            PlayerCommand::Help => {
                println!("{HELP}");
                Some(None)
            }
            PlayerCommand::Quit => break,
        };
        if finished.is_none() {
            break;
        }
    }

    info!("player exiting");
    Ok(())
}
