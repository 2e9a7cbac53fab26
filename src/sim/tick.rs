//! Fixed timestep simulation tick
//!
//! Phase order per tick: input, actor movement, interactions, achievement
//! thresholds, bookkeeping. Later phases see every actor at its
//! post-movement position.

use super::achievements;
use super::body::ActorEvent;
use super::enemy::EnemyContext;
use super::interact;
use super::state::{ActorRef, GameEvent, GamePhase, GameState};

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Throw the carried shell
    pub throw: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Setup => {
            let level = state.level;
            state.setup_level(level);
        }
        GamePhase::Running => {}
        // Frozen until the session reports, or the player acknowledges
        GamePhase::Completing | GamePhase::GameOver => return,
    }

    state.time_ticks += 1;
    state.counters.elapsed_ticks += 1;

    state.player.apply_input(input);
    if input.throw {
        throw_held_shell(state);
    }

    let fell_out = move_actors(state);

    interact::resolve(state, fell_out);

    if state.phase == GamePhase::Running {
        achievements::check_running(
            &state.counters,
            state.prior_total_score,
            &mut state.achievements,
            &mut state.events,
        );
    }

    state.normalize_order();
}

fn throw_held_shell(state: &mut GameState) {
    let facing = state.player.facing;
    let Some(shell) = state.held_shell_mut() else {
        return;
    };
    shell.throw(facing);
    let id = shell.id;
    state.player.held_shell = None;
    state.events.push(GameEvent::ShellThrown { id });
}

/// Tick every actor once. Returns whether the player fell out of the world.
fn move_actors(state: &mut GameState) -> bool {
    let mut scratch = Vec::new();
    let mut routed: Vec<(ActorRef, ActorEvent)> = Vec::new();

    state.player.tick(&state.world, &mut scratch);
    let mut fell_out = false;
    for event in scratch.drain(..) {
        match event {
            ActorEvent::FellOutOfWorld => fell_out = true,
            other => routed.push((ActorRef::Player, other)),
        }
    }

    let ctx = EnemyContext {
        world: &state.world,
        player_layer: state.player.body.layer,
        player_center_x: state.player.body.bounds.center_x(),
    };
    for enemy in &mut state.enemies {
        enemy.tick(&ctx, &mut state.rng, &mut scratch);
        routed.extend(scratch.drain(..).map(|e| (ActorRef::Enemy(enemy.id), e)));
    }

    // New shots move on the tick they are fired
    for (actor, event) in routed.drain(..) {
        route(state, actor, event);
    }

    let held = state.player.held_shell;
    for shell in &mut state.shells {
        if held == Some(shell.id) {
            shell.follow(&state.player);
        }
        shell.tick(&state.world, &mut scratch);
        routed.extend(scratch.drain(..).map(|e| (ActorRef::Shell(shell.id), e)));
    }

    for projectile in &mut state.projectiles {
        projectile.tick(&state.world, &mut scratch);
        routed.extend(scratch.drain(..).map(|e| (ActorRef::Projectile(projectile.id), e)));
    }

    for (actor, event) in routed {
        route(state, actor, event);
    }

    fell_out
}

fn route(state: &mut GameState, actor: ActorRef, event: ActorEvent) {
    match event {
        ActorEvent::Teleported { pipe, from, to, patrol } => {
            if actor == ActorRef::Player {
                state.counters.portals_used += 1;
            }
            state.events.push(GameEvent::Teleported {
                actor,
                pipe,
                from,
                to,
                patrol,
            });
        }
        ActorEvent::Fired(projectile) => {
            state.spawn_projectile(projectile);
        }
        ActorEvent::FellOutOfWorld => {}
    }
}

/// Leave a completed level: set up the next one, or wrap to level 1 after the last
///
/// Returns true when this completed the whole game.
pub fn advance_level(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Completing {
        return false;
    }
    let next = state.level + 1;
    let game_complete = next > state.max_level;
    if game_complete {
        log::info!("all {} levels complete, restarting at level 1", state.max_level);
        state.events.push(GameEvent::GameCompleted);
    }
    state.setup_level(if game_complete { 1 } else { next });
    game_complete
}

/// Accept a game over: restart at level 1 with full lives
///
/// Returns false if the game was not over.
pub fn acknowledge_game_over(state: &mut GameState) -> bool {
    if state.phase != GamePhase::GameOver {
        return false;
    }
    log::info!("game over acknowledged");
    state.setup_level(1);
    true
}
