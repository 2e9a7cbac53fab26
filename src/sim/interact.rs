//! Cross-actor interaction rules
//!
//! Runs once per tick after every actor has moved. Pairs only interact on a
//! shared layer, except ghost shots and the exit portal which ignore layers.
//! The player takes at most one hit per tick.

use super::achievements;
use super::enemy::EnemyKind;
use super::state::{ExitPortal, GameEvent, GamePhase, GameState, KillCause};
use crate::consts::*;

/// Resolve all interactions for this tick
///
/// `fell_out` reports that the player dropped below the world during movement.
pub fn resolve(state: &mut GameState, fell_out: bool) {
    let damaged = if fell_out {
        damage_player(state);
        true
    } else {
        player_vs_enemies(state)
    };
    if state.phase == GamePhase::GameOver {
        return;
    }

    pickup_shells(state);
    thrown_shells_vs_enemies(state);

    if !damaged {
        projectiles_vs_player(state);
        if state.phase == GamePhase::GameOver {
            return;
        }
    }

    exit_portal(state);
}

/// Stomps and contact damage. Returns whether the player was hurt.
fn player_vs_enemies(state: &mut GameState) -> bool {
    let layer = state.player.body.layer;
    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if !enemy.body.alive
            || enemy.body.layer != layer
            || !state.player.body.bounds.overlaps(&enemy.body.bounds)
        {
            continue;
        }

        let from_above = state.player.is_falling()
            && state.player.body.bounds.center_y() < enemy.body.bounds.center_y();
        match (from_above, enemy.kind) {
            (true, EnemyKind::Turtle) => stomp(state, i),
            // Bouncing off a ghost does nothing either way
            (true, EnemyKind::Ghost) => {}
            (true, EnemyKind::SpikeTurtle) | (false, _) => {
                damage_player(state);
                return true;
            }
        }
    }
    false
}

fn stomp(state: &mut GameState, index: usize) {
    let enemy = &mut state.enemies[index];
    enemy.body.alive = false;
    let (id, kind, layer) = (enemy.id, enemy.kind, enemy.body.layer);
    let feet = enemy.body.bounds.anchor_point(super::aabb::Anchor::BottomCenter);

    state.player.body.vel.y = STOMP_BOUNCE;
    state.counters.record_kill(kind);
    state.counters.score += STOMP_POINTS;
    log::debug!("stomped {} {}", kind.as_str(), id);
    state.events.push(GameEvent::EnemyKilled {
        id,
        kind,
        cause: KillCause::Stomp,
    });
    state.spawn_shell(feet, layer);
}

fn pickup_shells(state: &mut GameState) {
    if state.player.held_shell.is_some() {
        return;
    }
    let player = &state.player.body;
    let found = state.shells.iter_mut().find(|s| {
        s.body.alive
            && !s.is_thrown()
            && s.body.layer == player.layer
            && s.body.bounds.overlaps(&player.bounds)
    });
    if let Some(shell) = found {
        shell.pick_up();
        let id = shell.id;
        state.player.held_shell = Some(id);
        state.events.push(GameEvent::ShellPickedUp { id });
    }
}

fn thrown_shells_vs_enemies(state: &mut GameState) {
    for s in 0..state.shells.len() {
        let shell = &state.shells[s];
        if !shell.body.alive || !shell.is_thrown() {
            continue;
        }
        let hit = state.enemies.iter().position(|e| {
            e.body.alive
                && e.body.layer == shell.body.layer
                && e.body.bounds.overlaps(&shell.body.bounds)
        });
        let Some(e) = hit else {
            continue;
        };

        state.shells[s].body.alive = false;
        let enemy = &mut state.enemies[e];
        enemy.body.alive = false;
        let (id, kind, layer) = (enemy.id, enemy.kind, enemy.body.layer);
        let feet = enemy.body.bounds.anchor_point(super::aabb::Anchor::BottomCenter);

        state.counters.record_kill(kind);
        log::debug!("shell {} knocked out {} {}", state.shells[s].id, kind.as_str(), id);
        state.events.push(GameEvent::EnemyKilled {
            id,
            kind,
            cause: KillCause::Shell,
        });
        if kind == EnemyKind::SpikeTurtle {
            state.spawn_shell(feet, layer);
        }
    }
}

fn projectiles_vs_player(state: &mut GameState) {
    let player = &state.player.body;
    let hit = state.projectiles.iter_mut().find(|p| {
        p.body.alive && p.hits_layer(player.layer) && p.body.bounds.overlaps(&player.bounds)
    });
    if let Some(projectile) = hit {
        projectile.body.alive = false;
        log::debug!("player hit by {:?} projectile {}", projectile.kind, projectile.id);
        damage_player(state);
    }
}

/// Open the exit once the level is clear; complete on contact
fn exit_portal(state: &mut GameState) {
    if state.exit_portal.is_none() && state.remaining_enemies() == 0 {
        log::info!("level {} cleared, exit portal open", state.level);
        state.exit_portal = Some(ExitPortal::new());
        state.events.push(GameEvent::ExitPortalOpened);
    }

    let reached = state
        .exit_portal
        .is_some_and(|portal| portal.bounds.overlaps(&state.player.body.bounds));
    if reached {
        complete_level(state);
    }
}

/// Lose a life; game over at zero
pub fn damage_player(state: &mut GameState) {
    let lives_left = state.player.take_damage();
    log::debug!("player damaged, {} lives left", lives_left);
    state.events.push(GameEvent::PlayerDamaged { lives_left });
    if lives_left == 0 {
        log::info!("game over on level {}", state.level);
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { level: state.level });
    }
}

/// Freeze the level for reporting and grant completion achievements
pub fn complete_level(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }
    log::info!(
        "level {} complete in {}s ({} kills)",
        state.level,
        state.counters.elapsed_secs(),
        state.counters.total_kills()
    );
    state.phase = GamePhase::Completing;
    achievements::check_completion(
        state.level,
        state.max_level,
        &state.counters,
        &mut state.achievements,
        &mut state.events,
    );
    state.events.push(GameEvent::LevelCompleted {
        level: state.level,
        counters: state.counters.clone(),
    });
}
