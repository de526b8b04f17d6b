//! Variable timestep simulation tick
//!
//! Advances the game by a real-time delta. All motion is `speed * dt`; the
//! sub-step order below matters (collisions before enemy motion, player
//! death checks before the level-clear check).

use glam::Vec2;
use rand::Rng;

use super::geometry::intersects;
use super::state::{Bullet, Enemy, GameEvent, GamePhase, GameState, GridLayout, Owner, Particle};
use crate::consts::*;

/// Control state for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left held
    pub left: bool,
    /// Move-right held
    pub right: bool,
    /// Fire edge (one shot per press)
    pub fire: bool,
    /// Touch drag target x, while a finger is down
    pub touch_x: Option<f32>,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Ready => {
            state.ready_time += dt;
            return;
        }
        GamePhase::GameOver | GamePhase::NameEntry => {
            // Frozen; only let the last explosion play out
            state.game_time += dt;
            update_particles(state, dt);
            return;
        }
        GamePhase::Playing => {}
    }

    state.game_time += dt;

    // Player movement
    let player = &mut state.player;
    if input.left {
        player.pos.x -= player.speed * dt;
    }
    if input.right {
        player.pos.x += player.speed * dt;
    }
    if let Some(touch_x) = input.touch_x {
        player.approach(touch_x, dt);
    }
    player.clamp(state.viewport);

    if input.fire {
        fire_player_bullet(state);
    }

    for bullet in &mut state.bullets {
        bullet.pos.y += bullet.vel_y * dt;
    }
    state.bullets.retain(|b| b.pos.y >= 0.0);

    resolve_bullet_collisions(state);

    move_enemies(state, dt);

    state.enemy_fire_timer += dt;
    if state.enemy_fire_timer >= state.difficulty.fire_interval {
        fire_enemy_bullet(state);
    }

    for bullet in &mut state.enemy_bullets {
        bullet.pos.y += bullet.vel_y * dt;
    }
    let height = state.viewport.height;
    state.enemy_bullets.retain(|b| b.pos.y < height);

    // Enemy bullets vs player
    let player_rect = state.player.rect();
    if let Some(i) = state
        .enemy_bullets
        .iter()
        .position(|b| intersects(&b.rect(), &player_rect))
    {
        state.enemy_bullets.remove(i);
        let origin = Vec2::new(player_rect.center().x, player_rect.y);
        spawn_explosion(state, origin, CYAN);
        state.trigger_game_over();
    }

    update_particles(state, dt);

    if state.phase.is_over() {
        return;
    }

    // Enemies reaching the player
    if state
        .enemies
        .iter()
        .any(|e| e.alive && intersects(&e.rect(), &player_rect))
    {
        let origin = state.player.pos;
        spawn_explosion(state, origin, CYAN);
        state.trigger_game_over();
        return;
    }

    if state.grid_cleared() {
        start_next_level(state);
    }
}

/// Spawn a player bullet from the ship's nose
pub fn fire_player_bullet(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let size = state.tuning.player_bullet_size;
    let player = &state.player;
    state.bullets.push(Bullet {
        pos: Vec2::new(player.pos.x + (player.size.x - size.x) / 2.0, player.pos.y),
        size,
        vel_y: -state.tuning.player_bullet_speed,
        owner: Owner::Player,
    });
    state.events.push(GameEvent::PlayerFired);
}

/// A random living enemy fires from its bottom edge
fn fire_enemy_bullet(state: &mut GameState) {
    let alive: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive)
        .map(|(i, _)| i)
        .collect();
    if alive.is_empty() {
        return;
    }

    let shooter = &state.enemies[alive[state.rng.random_range(0..alive.len())]];
    let size = state.tuning.enemy_bullet_size;
    let pos = Vec2::new(
        shooter.pos.x + (shooter.size.x - size.x) / 2.0,
        shooter.pos.y + shooter.size.y,
    );
    state.enemy_bullets.push(Bullet {
        pos,
        size,
        vel_y: state.tuning.enemy_bullet_speed,
        owner: Owner::Enemy,
    });
    state.enemy_fire_timer = 0.0;
}

/// Player bullets against enemies first, then page targets.
/// Each bullet scores at most one hit.
fn resolve_bullet_collisions(state: &mut GameState) {
    for i in (0..state.bullets.len()).rev() {
        let rect = state.bullets[i].rect();

        if let Some(e) = state
            .enemies
            .iter()
            .position(|e| e.alive && intersects(&rect, &e.rect()))
        {
            let enemy = &mut state.enemies[e];
            enemy.alive = false;
            let center = enemy.rect().center();
            state.score += state.tuning.enemy_points;
            spawn_explosion(state, center, GREEN);
            state.events.push(GameEvent::EnemyDestroyed);
            state.bullets.remove(i);
            continue;
        }

        if let Some(t) = state
            .targets
            .iter()
            .position(|t| t.alive && intersects(&rect, &t.rect))
        {
            let target = &mut state.targets[t];
            target.alive = false;
            let (handle, target_rect) = (target.handle, target.rect);
            state.score += state.tuning.target_points;
            spawn_explosion(state, target_rect.center(), WHITE);
            state.events.push(GameEvent::TargetDestroyed { handle });
            state.bullets.remove(i);
        }
    }
}

/// Sweep living enemies sideways; the whole grid turns and drops at an edge
fn move_enemies(state: &mut GameState, dt: f32) {
    let step = state.difficulty.enemy_speed * dt * state.enemy_direction;
    let margin = state.tuning.edge_margin;
    let width = state.viewport.width;
    let direction = state.enemy_direction;

    let mut hit_edge = false;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.x += step;
        let rect = enemy.rect();
        if (direction > 0.0 && rect.right() > width - margin) || (direction < 0.0 && rect.x < margin)
        {
            hit_edge = true;
        }
    }

    if hit_edge {
        state.enemy_direction = -direction;
        let drop = state.tuning.enemy_drop;
        for enemy in &mut state.enemies {
            enemy.pos.y += drop;
        }
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    for p in &mut state.particles {
        p.life -= dt;
        p.pos += p.vel * dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Burst of debris flying out in random directions
pub fn spawn_explosion(state: &mut GameState, origin: Vec2, color: &'static str) {
    for _ in 0..EXPLOSION_PARTICLES {
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let speed = state.rng.random::<f32>() * PARTICLE_MAX_SPEED;
        state.particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: PARTICLE_LIFE,
            color,
            size: state.rng.random::<f32>() * 3.0 + 1.0,
        });
    }
}

/// Replace the grid with a fresh, fully alive batch laid out for the viewport
pub fn generate_enemies(state: &mut GameState) {
    let layout = GridLayout::for_viewport(state.viewport);
    let image_size = state.mosaic_size();
    let tile = Vec2::splat(layout.tile);

    state.grid = layout;
    state.enemies.clear();
    for row in 0..layout.rows {
        for col in 0..layout.cols {
            state.enemies.push(Enemy {
                pos: layout.origin
                    + Vec2::new(
                        col as f32 * (layout.tile + layout.padding),
                        row as f32 * (layout.tile + layout.padding),
                    ),
                size: tile,
                alive: true,
                row,
                col,
                sample: layout.sample(image_size, row, col),
            });
        }
    }
}

/// Level cleared: harder grid, clean slate, bonus for the level just finished
pub fn start_next_level(state: &mut GameState) {
    let cleared = state.level;
    state.level += 1;
    state.level_start_time = state.game_time;

    state.bullets.clear();
    state.enemy_bullets.clear();
    state.enemy_fire_timer = 0.0;

    state.apply_level_difficulty();
    generate_enemies(state);

    state.score += state.tuning.level_bonus * cleared as u64;
    state.events.push(GameEvent::LevelCleared { level: state.level });

    log::info!(
        "Level {} cleared, now level {} (speed {:.0}, fire every {:.2}s)",
        cleared,
        state.level,
        state.difficulty.enemy_speed,
        state.difficulty.fire_interval
    );
}
