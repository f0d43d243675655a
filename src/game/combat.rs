// Combat resolution
//
// Runs once per tick after every entity has advanced: body separation between
// fighters, then melee hits, then projectile hits.

use crate::engine::physics::{overlaps, resolve_pair, separate, SeparationPolicy};
use crate::game::entity::{Arena, Entity, EntityId};
use crate::game::projectiles::{ChargeTier, ProjectileKind};
use glam::Vec2;

/// Match-wide combat settings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatRules {
    /// Forces one separation policy for every fighter pair. When unset the
    /// lighter fighter yields.
    pub separation: Option<SeparationPolicy>,
}

impl CombatRules {
    pub fn separation_for(&self, first: &Entity, second: &Entity) -> SeparationPolicy {
        self.separation.unwrap_or_else(|| {
            let weight = |entity: &Entity| entity.combat.map_or(1.0, |combat| combat.weight);
            SeparationPolicy::from_weights(weight(first), weight(second))
        })
    }
}

/// A hit that changed a fighter's health
#[derive(Debug, Clone, PartialEq)]
pub enum HitEvent {
    Melee {
        attacker: EntityId,
        target: EntityId,
        damage: i32,
        blocked: bool,
    },
    Projectile {
        projectile: EntityId,
        kind: ProjectileKind,
        tier: ChargeTier,
        caster: Option<EntityId>,
        target: EntityId,
        damage: i32,
        blocked: bool,
    },
}

impl HitEvent {
    pub fn target(&self) -> EntityId {
        match self {
            Self::Melee { target, .. } | Self::Projectile { target, .. } => *target,
        }
    }

    pub fn damage(&self) -> i32 {
        match self {
            Self::Melee { damage, .. } | Self::Projectile { damage, .. } => *damage,
        }
    }
}

/// Damage left after the target's block, if it is blocking
pub fn blocked_damage(damage: i32, target: &Entity) -> (i32, bool) {
    match target.combat {
        Some(combat) if target.blocking => {
            let reduced = (damage as f32 * combat.block_multiplier).round() as i32;
            (reduced.max(0), true)
        }
        _ => (damage, false),
    }
}

/// Two distinct mutable borrows out of one slice
fn pair_mut(entities: &mut [Entity], i: usize, j: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = entities.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = entities.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// Apply every collision and hit rule for this tick
pub fn resolve(entities: &mut [Entity], rules: &CombatRules, arena: &Arena) -> Vec<HitEvent> {
    let fighters: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, entity)| entity.kind.is_character())
        .map(|(index, _)| index)
        .collect();

    separate_bodies(entities, &fighters, rules, arena);

    let mut hits = Vec::new();
    resolve_melee(entities, &fighters, &mut hits);
    resolve_projectiles(entities, &fighters, &mut hits);
    hits
}

fn separate_bodies(entities: &mut [Entity], fighters: &[usize], rules: &CombatRules, arena: &Arena) {
    for (n, &i) in fighters.iter().enumerate() {
        for &j in &fighters[n + 1..] {
            let (first, second) = pair_mut(entities, i, j);
            // A swing reaching into the other fighter is a hit, not a shove
            if first.is_swinging() || second.is_swinging() {
                continue;
            }
            if overlaps(&*first, &*second) {
                let policy = rules.separation_for(first, second);
                resolve_pair(first, second, policy);
                first.clamp_to(arena);
                second.clamp_to(arena);

                // A body pinned at a bound hands the rest of the push to the other
                if overlaps(&*first, &*second) {
                    let separated = match policy {
                        SeparationPolicy::FirstYields => push_out(second, first, arena),
                        SeparationPolicy::SecondYields => push_out(first, second, arena),
                        SeparationPolicy::Symmetric => {
                            push_out(second, first, arena) || push_out(first, second, arena)
                        }
                    };
                    if !separated {
                        log::debug!("Fighters {} and {} stay wedged", first.id, second.id);
                    }
                }
            }
        }
    }
}

/// Move `mover` clear of `anchor` without leaving the arena. Returns whether
/// the pair ends up apart.
fn push_out(mover: &mut Entity, anchor: &Entity, arena: &Arena) -> bool {
    separate(mover, anchor);
    mover.clamp_to(arena);
    !overlaps(&*mover, anchor)
}

fn resolve_melee(entities: &mut [Entity], fighters: &[usize], hits: &mut Vec<HitEvent>) {
    for &i in fighters {
        if !entities[i].is_swinging() || entities[i].has_dealt_damage {
            continue;
        }

        for &j in fighters {
            if i == j {
                continue;
            }

            let (attacker, target) = pair_mut(entities, i, j);
            if !overlaps(&*attacker, &*target) {
                continue;
            }

            // One swing lands at most once
            attacker.has_dealt_damage = true;

            let base = attacker.combat.map_or(0, |combat| combat.melee_damage);
            let (damage, blocked) = blocked_damage(base, target);
            if target.take_damage(damage) {
                log::info!(
                    "{} hits {} for {} (health {}){}",
                    attacker.kind.sheet(),
                    target.kind.sheet(),
                    damage,
                    target.health,
                    if blocked { ", blocked" } else { "" }
                );
                hits.push(HitEvent::Melee {
                    attacker: attacker.id,
                    target: target.id,
                    damage,
                    blocked,
                });
            }
            break;
        }
    }
}

fn resolve_projectiles(entities: &mut [Entity], fighters: &[usize], hits: &mut Vec<HitEvent>) {
    for p in 0..entities.len() {
        let Some(kind) = entities[p].kind.projectile() else {
            continue;
        };
        if entities[p].should_remove || entities[p].attached {
            continue;
        }

        for &t in fighters {
            let (projectile, target) = pair_mut(entities, p, t);
            if projectile.caster == Some(target.id) || !overlaps(&*projectile, &*target) {
                continue;
            }

            let behavior = kind.behavior();
            let (damage, blocked) = blocked_damage(kind.damage(projectile.charge_tier), target);
            if target.take_damage(damage) {
                log::info!(
                    "{} hits {} for {} (health {}){}",
                    kind.name(),
                    target.kind.sheet(),
                    damage,
                    target.health,
                    if blocked { ", blocked" } else { "" }
                );
                hits.push(HitEvent::Projectile {
                    projectile: projectile.id,
                    kind,
                    tier: projectile.charge_tier,
                    caster: projectile.caster,
                    target: target.id,
                    damage,
                    blocked,
                });
            }

            if behavior.despawn_on_hit {
                projectile.should_remove = true;
                break;
            }

            // Persistent hazards shove the target away from their center
            let push = (target.center() - projectile.center())
                .try_normalize()
                .or_else(|| projectile.velocity.try_normalize())
                .unwrap_or(Vec2::X);
            target.knockback = push * behavior.knockback;
        }
    }
}
