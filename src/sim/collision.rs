//! Collision detection and combat resolution
//!
//! Arrow hits are tested against the segment the arrow covered during its
//! last step, so fast arrows can't tunnel through an enemy between frames.
//! Every removal is marked first and compacted once at the end of the pass.

use glam::Vec2;

use super::state::{EntityId, GameEvent, GameState};

/// Result of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// (arrow, enemy) pairs removed together
    pub kills: Vec<(EntityId, EntityId)>,
    /// Enemies that reached the player
    pub contacts: Vec<EntityId>,
    /// Whether a contact used up the last life
    pub game_over: bool,
}

/// Distance along the swept segment `prev..pos` at which a circle of
/// `radius` around `center` is first entered. `Some(0.0)` if the arrow
/// starts inside it, `None` if the segment misses it.
pub fn swept_hit(prev: Vec2, pos: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let to_center = center - prev;
    let radius_sq = radius * radius;
    if to_center.length_squared() <= radius_sq {
        return Some(0.0);
    }

    let seg = pos - prev;
    let len = seg.length();
    if len <= f32::EPSILON {
        return None;
    }
    let dir = seg / len;
    let along = to_center.dot(dir);
    let off_axis_sq = to_center.length_squared() - along * along;
    if off_axis_sq > radius_sq {
        return None;
    }

    let entry = along - (radius_sq - off_axis_sq).sqrt();
    (0.0..=len).contains(&entry).then_some(entry)
}

/// Check if an enemy is touching the player
pub fn enemy_player_contact(enemy_pos: Vec2, player_pos: Vec2, contact_radius: f32) -> bool {
    enemy_pos.distance(player_pos) <= contact_radius
}

/// Resolve arrow-enemy hits, then enemy-player contacts.
///
/// Each arrow takes at most one enemy (the first along its path) and each
/// enemy is taken at most once. A no-op outside the playing phase.
pub fn handle_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !state.is_playing() {
        return report;
    }
    state.normalize_order();

    resolve_arrow_hits(state, &mut report);
    resolve_player_contacts(state, &mut report);

    report
}

fn resolve_arrow_hits(state: &mut GameState, report: &mut CollisionReport) {
    let hit_radius = state.settings.arrow_hit_radius;
    let mut dead_enemies: Vec<EntityId> = Vec::new();

    for arrow in &state.arrows {
        let target = state
            .enemies
            .iter()
            .filter(|e| !dead_enemies.contains(&e.id))
            .filter_map(|e| {
                swept_hit(arrow.prev, arrow.pos, e.pos, hit_radius)
                    .map(|entry| (entry, e.pos.distance_squared(arrow.prev), e))
            })
            // Earliest entry, then closest to where the arrow started.
            // Enemies are in id order, so min_by keeps the lower id on full ties.
            .min_by(|(ea, da, _), (eb, db, _)| ea.total_cmp(eb).then(da.total_cmp(db)));

        if let Some((_, _, enemy)) = target {
            dead_enemies.push(enemy.id);
            report.kills.push((arrow.id, enemy.id));
            state.events.push(GameEvent::EnemyKilled {
                enemy: enemy.id,
                arrow: arrow.id,
                pos: enemy.pos,
            });
            log::debug!("Arrow {} killed enemy {}", arrow.id, enemy.id);
        }
    }

    if report.kills.is_empty() {
        return;
    }

    // Compact both collections in the same pass
    let spent: Vec<EntityId> = report.kills.iter().map(|&(arrow, _)| arrow).collect();
    state.arrows.retain(|a| !spent.contains(&a.id));
    state.enemies.retain(|e| !dead_enemies.contains(&e.id));
    state.score += report.kills.len() as u64;
}

fn resolve_player_contacts(state: &mut GameState, report: &mut CollisionReport) {
    let player_pos = state.player.pos;
    let contact_radius = state.settings.contact_radius;

    let touching: Vec<EntityId> = state
        .enemies
        .iter()
        .filter(|e| enemy_player_contact(e.pos, player_pos, contact_radius))
        .map(|e| e.id)
        .collect();

    for id in touching {
        report.contacts.push(id);
        state.events.push(GameEvent::PlayerHit {
            enemy: id,
            lives_left: state.lives.saturating_sub(1),
        });
        let ended = state.lose_life();
        log::debug!("Enemy {} reached the archer, {} lives left", id, state.lives);
        if ended {
            report.game_over = true;
            break;
        }
    }

    if !report.contacts.is_empty() {
        let contacts = &report.contacts;
        state.enemies.retain(|e| !contacts.contains(&e.id));
    }
}
