//! Star Portal entry point
//!
//! Native builds have no window: this runs the simulation headless with a
//! scripted player and logs HUD changes and cues.
//!
//! Usage: `star-portal [level.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use star_portal::audio::{AudioManager, LogBackend};
#[cfg(not(target_arch = "wasm32"))]
use star_portal::driver::LogHud;
#[cfg(not(target_arch = "wasm32"))]
use star_portal::sim::{GamePhase, GameState};
#[cfg(not(target_arch = "wasm32"))]
use star_portal::{Game, LevelData, Settings, Tuning};

/// Simulated display refresh
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after this many simulated seconds
#[cfg(not(target_arch = "wasm32"))]
const RUN_SECONDS: f64 = 120.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Portal (native) starting...");

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => match LevelData::load(&path) {
            Ok(level) => level,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => LevelData::default(),
    };
    let settings = args
        .next()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let state = GameState::with_level(level, Tuning::default(), 0x5eed);
    let audio = AudioManager::from_settings(LogBackend, &settings);
    let mut game = Game::new(state, settings, audio, LogHud);

    game.press_start();
    let mut frame = 0u64;
    let mut now = 0.0;
    while game.elapsed() < RUN_SECONDS {
        // Run right, hop every half second, dip into pipes now and then
        game.input.right = frame % 120 < 100;
        game.input.jump = frame % 30 == 0;
        game.input.down = frame % 200 == 0;

        game.frame(now);
        now += FRAME_MS;
        frame += 1;

        match game.state.phase {
            GamePhase::Won => break,
            GamePhase::Title => game.press_start(),
            _ => {}
        }
    }

    let state = &game.state;
    log::info!(
        "Finished after {:.1}s in phase {}: {} coins, {} hearts, boss hp {}/{}",
        game.elapsed(),
        state.phase.as_str(),
        state.coin_count,
        state.hearts,
        state.boss.hp,
        state.boss.max_hp
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Game::frame` directly
}
