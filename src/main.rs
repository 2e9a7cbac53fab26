//! Depth Clash headless runner
//!
//! Plays the configured levels with a scripted autopilot on a fixed-step
//! clock, logs gameplay events and prints a JSON summary.
//!
//! Usage: `depth-clash [settings.json]`

use depth_clash::Settings;
use depth_clash::consts::*;
use depth_clash::persistence::{JsonFileStore, MemoryStore, ProgressStore, UserId};
use depth_clash::platform::Key;
use depth_clash::session::{Session, UserProfile};
use depth_clash::sim::{GameEvent, GamePhase, GameState};

/// Local player id used by the runner
const LOCAL_USER: UserId = 1;
/// Simulated display rate; the sim still steps at 60 Hz
const FRAME_DT: f32 = 1.0 / 50.0;

fn main() {
    env_logger::init();
    log::info!("Depth Clash (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(std::path::Path::new(&path)),
        None => Settings::default(),
    };

    match &settings.save_path {
        Some(path) => match JsonFileStore::open(path) {
            Ok(mut store) => {
                if let Err(e) = store.register_user(LOCAL_USER) {
                    log::warn!("could not register local user: {}", e);
                }
                run(&settings, store);
            }
            Err(e) => {
                log::warn!("save file unusable ({}), keeping progress in memory", e);
                run(&settings, memory_store());
            }
        },
        None => run(&settings, memory_store()),
    }
}

fn memory_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.register_user(LOCAL_USER);
    store
}

fn run<S: ProgressStore>(settings: &Settings, store: S) {
    let profile = match store.user_stats(LOCAL_USER) {
        Ok(stats) => UserProfile::user(LOCAL_USER, stats.current_level.max(1), stats.total_score),
        Err(e) => {
            log::warn!("no stats for local user ({}), starting fresh", e);
            UserProfile::user(LOCAL_USER, 1, 0)
        }
    };
    let mut session = Session::new(settings, settings.load_levels(), store, profile);

    let mut accumulator = 0.0f32;
    let mut ticks = 0u64;
    let mut levels_completed = 0u32;
    let mut game_overs = 0u32;

    while ticks < settings.run_ticks {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let pressed = autopilot(session.state());
            let input = settings.bindings.sample(&pressed);
            for event in session.step(&input) {
                match &event {
                    GameEvent::LevelCompleted { .. } => levels_completed += 1,
                    GameEvent::GameOver { .. } => game_overs += 1,
                    _ => {}
                }
                log_event(&event);
            }
            if session.state().phase == GamePhase::GameOver {
                for event in session.acknowledge_game_over() {
                    log_event(&event);
                }
            }
            accumulator -= SIM_DT;
            substeps += 1;
            ticks += 1;
        }
    }

    let state = session.state();
    let summary = serde_json::json!({
        "ticks": ticks,
        "level": state.level,
        "lives": state.player.lives,
        "levels_completed": levels_completed,
        "game_overs": game_overs,
        "counters": state.counters,
        "achievements": state.achievements.unlocked().collect::<Vec<_>>(),
        "last_score": session.last_score(),
        "stats": session.user_stats(),
    });
    let (_store, profile) = session.into_parts();
    log::info!("final profile: level {}, {} points", profile.current_level, profile.total_score);

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("could not encode summary: {}", e),
    }
}

/// Chase the nearest enemy on the player's layer, or the exit once it opens
fn autopilot(state: &GameState) -> Vec<Key> {
    let player = &state.player.body;
    let x = player.bounds.center_x();

    let nearest = |same_layer: bool| {
        state
            .enemies
            .iter()
            .filter(|e| !same_layer || e.body.layer == player.layer)
            .map(|e| e.body.bounds.center_x())
            .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
    };
    // Off-layer enemies are reached through the pipes at the screen edges
    let target = match state.exit_portal {
        Some(portal) => Some(portal.bounds.center_x()),
        None => nearest(true).or_else(|| {
            nearest(false).map(|_| if x < SCREEN_WIDTH / 2.0 { 0.0 } else { SCREEN_WIDTH })
        }),
    };

    let mut pressed = Vec::new();
    match target {
        Some(tx) if tx < x - PLAYER_SPEED => pressed.push(Key::Left),
        Some(tx) if tx > x + PLAYER_SPEED => pressed.push(Key::Right),
        _ => {}
    }
    if state.player.on_ground && state.time_ticks % 40 == 0 {
        pressed.push(Key::Space);
    }
    if state.player.held_shell.is_some() && state.time_ticks % 90 == 0 {
        pressed.push(Key::E);
    }
    pressed
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LevelStarted { level } => log::info!("level {} started", level),
        GameEvent::LevelCompleted { level, counters } => {
            log::info!("level {} completed, {} kills, {} portals", level, counters.total_kills(), counters.portals_used)
        }
        GameEvent::GameCompleted => log::info!("game completed"),
        GameEvent::GameOver { level } => log::info!("game over on level {}", level),
        GameEvent::AchievementUnlocked(a) => log::info!("achievement: {} - {}", a.title(), a.description()),
        other => log::debug!("{:?}", other),
    }
}
