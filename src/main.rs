//! Space Defender entry point
//!
//! Runs one headless session on a 480x800 field with a simple autopilot at
//! the controls, then prints the leaderboard. Frames are logged as JSON at
//! trace level (`RUST_LOG=space_defender=trace`).

use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use space_defender::feedback::{Feedback, LogSink};
use space_defender::input::InputState;
use space_defender::persistence::{self, JsonFileStore};
use space_defender::presentation::{Frame, Presenter};
use space_defender::consts::PROJECTILE_OFFSET_X;
use space_defender::sim::EntityKind;
use space_defender::{Collaborators, Game, GameError, SessionEvent, Settings};

const FIELD_WIDTH: f32 = 480.0;
const FIELD_HEIGHT: f32 = 800.0;
/// Give up on the session after this long
const SESSION_CAP: Duration = Duration::from_secs(120);

/// Steers the gun under the lowest enemy and fires when lined up
struct Autopilot {
    input: Arc<InputState>,
}

impl Presenter for Autopilot {
    fn present(&mut self, frame: &Frame) {
        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(frame) {
                Ok(json) => log::trace!("frame {}", json),
                Err(e) => log::warn!("Failed to encode frame: {}", e),
            }
        }

        let player = frame.sprites.iter().find(|s| s.kind == EntityKind::Player);
        let target = frame
            .sprites
            .iter()
            .filter(|s| s.kind == EntityKind::Enemy && s.pos.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        match (player, target) {
            (Some(player), Some(target)) => {
                let dx = target.pos.x - (player.pos.x + PROJECTILE_OFFSET_X);
                if dx.abs() < target.size.x / 2.0 {
                    self.input.set_direction(false, false);
                    self.input.request_fire();
                } else {
                    // Pointer on the side the ship should move towards
                    let x = if dx < 0.0 { 0.0 } else { FIELD_WIDTH };
                    self.input.pointer_down(x);
                }
            }
            _ => self.input.pointer_up(),
        }
    }
}

fn main() -> Result<(), GameError> {
    env_logger::init();
    log::info!("Space Defender (headless) starting...");

    let settings = Settings::load(&Settings::default_path());
    let store_path = settings
        .high_score_path
        .clone()
        .unwrap_or_else(JsonFileStore::default_path);
    let file_store = JsonFileStore::new(store_path);
    log::info!("High scores kept in {:?}", file_store.path());
    let store = persistence::shared(file_store);
    let feedback = Feedback::new(&settings)
        .with_sound(LogSink)
        .with_haptics(LogSink);

    let mut game = Game::new(
        settings,
        Collaborators::new(store).with_feedback(feedback),
    );
    let autopilot = Autopilot {
        input: game.input(),
    };
    game.set_presenter(autopilot)?;

    game.set_field(FIELD_WIDTH, FIELD_HEIGHT)?;
    game.start()?;

    let deadline = Instant::now() + SESSION_CAP;
    let outcome = loop {
        let left = deadline.saturating_duration_since(Instant::now());
        match game.events().recv_timeout(left) {
            Ok(SessionEvent::LevelUp { level }) => println!("Level {}", level),
            Ok(SessionEvent::GameOver { score, rank }) => break Some((score, rank)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break None,
        }
    };

    match outcome {
        Some((score, Some(rank))) => {
            println!("Game over: {} points, new high score #{}", score, rank)
        }
        Some((score, None)) => println!("Game over: {} points", score),
        None => {
            game.pause()?;
            let score = game.snapshot().map(|f| f.score).unwrap_or_default();
            println!("Time's up: {} points (not recorded)", score);
        }
    }

    println!("\nHigh scores:");
    for (i, score) in game.high_scores().scores().iter().enumerate() {
        println!("{:>2}. {}", i + 1, score);
    }
    Ok(())
}
