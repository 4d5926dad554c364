/// Contact resolution: enemy contact, bottle hits, throwing.
///
/// A character/enemy pair that overlaps resolves to exactly one outcome:
/// a stomp (handled on the character's movement tick) or damage to the
/// character (handled on the collision interval). Both sides use
/// `classify_contact`, so neither can claim a pair the other owns.

use tracing::{debug, info};

use crate::domain::character::{self, Character};
use crate::domain::enemy::{Enemy, ProjectileDamage};
use crate::domain::geometry::collides;
use crate::domain::status_bar::{count_percentage, StatusBar};
use crate::domain::throwable::ThrowableObject;

use super::event::GameEvent;
use super::lifecycle::Pausable;
use super::scheduler::{Owner, Scheduler, TaskKind};
use super::world::World;

/// Contact damage the world adds on top of the character's own `hit()` cost.
pub const CONTACT_DAMAGE: i32 = 15;
pub const THROW_COOLDOWN_MS: u64 = 300;
/// The boss must lie dead this long before the level counts as won.
pub const BOSS_DEFEAT_DELAY_MS: u64 = 1000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    None,
    Stomp,
    Damage,
}

pub fn classify_contact(character: &Character, enemy: &Enemy) -> Contact {
    if enemy.is_dead() || !collides(character, enemy) {
        Contact::None
    } else if character.is_stomping(enemy) {
        Contact::Stomp
    } else {
        Contact::Damage
    }
}

/// Emit the kill event for `enemy` and sync the boss bar if it was the boss.
pub(crate) fn announce_kill(enemy: &Enemy, events: &mut Vec<GameEvent>, endboss_bar: &mut StatusBar) {
    match enemy {
        Enemy::Chicken(_) => events.push(GameEvent::ChickenKilled),
        Enemy::Endboss(boss) => {
            endboss_bar.set_percentage(boss.health_percentage());
            info!("endboss killed");
            events.push(GameEvent::EndbossKilled);
        }
    }
}

// ── Collision interval ──

pub fn collision_tick(world: &mut World, scheduler: &mut Scheduler, now: u64) {
    if world.character.is_dead {
        return;
    }
    if enemy_contacts(world, scheduler, now) {
        return;
    }
    bottle_hits(world, scheduler, now);
    sweep_projectiles(world, scheduler);
    check_boss_defeated(world, now);
}

/// Damage from touching live enemies. Returns true if the character died.
fn enemy_contacts(world: &mut World, scheduler: &mut Scheduler, now: u64) -> bool {
    for i in 0..world.level.enemies.len() {
        let contact = classify_contact(&world.character, &world.level.enemies[i]);
        if contact == Contact::Damage && !world.character.is_hurt(now) {
            world.character.hit(character::HIT_DAMAGE + CONTACT_DAMAGE, now);
            let energy = world.character.energy;
            world.health_bar.set_percentage(energy);
            debug!(energy, "character hurt");
            world.emit(GameEvent::CharacterHurt { energy });
        }

        if world.character.energy <= 0 && world.character.die() {
            scheduler.cancel_kind(Owner::World, TaskKind::Collisions);
            info!(x = world.character.sprite.x, "character died");
            world.emit(GameEvent::CharacterDied);
            return true;
        }
    }
    false
}

/// A bottle lands on every live enemy it overlaps, then splashes once.
fn bottle_hits(world: &mut World, scheduler: &mut Scheduler, now: u64) {
    let World { throwables, level, events, endboss_bar, .. } = world;

    for bottle in throwables.iter_mut().filter(|b| !b.hit) {
        let landed = level
            .enemies
            .iter()
            .any(|e| !e.is_dead() && collides(&*bottle, e));
        if !landed {
            continue;
        }

        bottle.mark_hit();
        bottle.refresh_timers(scheduler);
        events.push(GameEvent::BottleSplashed);

        for enemy in level.enemies.iter_mut() {
            if enemy.is_dead() || !collides(&*bottle, &*enemy) {
                continue;
            }
            match enemy.take_projectile(now) {
                ProjectileDamage::Absorbed { health } => {
                    if let Some(boss) = enemy.as_endboss() {
                        endboss_bar.set_percentage(boss.health_percentage());
                    }
                    events.push(GameEvent::EndbossHurt { health });
                }
                ProjectileDamage::Killed => {
                    announce_kill(enemy, events, endboss_bar);
                    enemy.refresh_timers(scheduler);
                }
                ProjectileDamage::Shrugged => {}
            }
        }
    }
}

/// Drop bottles whose splash is over or that fell out of the playfield.
fn sweep_projectiles(world: &mut World, scheduler: &mut Scheduler) {
    world.throwables.retain(|b| {
        let keep = !b.splash_complete && !b.is_out_of_play();
        if !keep {
            scheduler.cancel_owner(b.owner());
        }
        keep
    });
}

fn check_boss_defeated(world: &mut World, now: u64) {
    if world.level_completed {
        return;
    }
    let defeated = world
        .endboss()
        .and_then(|boss| boss.dead_at)
        .is_some_and(|t| now.saturating_sub(t) > BOSS_DEFEAT_DELAY_MS);
    if defeated {
        world.level_completed = true;
        info!("level completed");
        world.emit(GameEvent::LevelCompleted);
    }
}

// ── Throw interval ──

pub fn throw_tick(world: &mut World, scheduler: &mut Scheduler, now: u64) {
    let c = &world.character;
    if c.is_dead || !c.throw_intent || c.is_hurt(now) {
        return;
    }
    let cooled = world
        .last_throw_time
        .map_or(true, |t| now.saturating_sub(t) >= THROW_COOLDOWN_MS);
    if !cooled {
        return;
    }

    if world.collected_bottles == 0 {
        // dry fire still restarts the cooldown
        world.last_throw_time = Some(now);
        return;
    }

    let id = world.next_entity_id();
    let c = &world.character;
    let bottle = ThrowableObject::launch(id, c.sprite.x, c.sprite.y, c.sprite.mirrored);
    bottle.resume(scheduler, now);
    world.throwables.push(bottle);

    world.collected_bottles -= 1;
    world.bottle_bar.set_percentage(count_percentage(world.collected_bottles));
    world.last_throw_time = Some(now);
    world.emit(GameEvent::BottleThrown { remaining: world.collected_bottles });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chicken::{Chicken, ChickenKind};
    use crate::domain::endboss::Endboss;
    use crate::sim::testing::bare_level;
    use proptest::prelude::*;

    fn world_with(enemies: Vec<Enemy>) -> (World, Scheduler) {
        let mut level = bare_level();
        level.enemies = enemies;
        let world = World::new(level, 0);
        let mut s = Scheduler::new();
        world.start(&mut s, 0);
        (world, s)
    }

    /// Chicken standing right on the character's x.
    fn chicken_under_character() -> Enemy {
        Enemy::Chicken(Chicken::new(ChickenKind::Normal, character::START_X, 0.2))
    }

    // ── Contact ──

    #[test]
    fn grounded_overlap_is_damage() {
        let (w, _) = world_with(vec![chicken_under_character()]);
        assert_eq!(classify_contact(&w.character, &w.level.enemies[0]), Contact::Damage);
    }

    #[test]
    fn falling_onto_a_chicken_is_a_stomp() {
        let (mut w, _) = world_with(vec![chicken_under_character()]);
        // feet (y + 339.5) just inside the chicken's top band (340 + 30)
        w.character.sprite.y = 20.0;
        w.character.body.speed_y = -5.0;
        assert_eq!(classify_contact(&w.character, &w.level.enemies[0]), Contact::Stomp);
    }

    #[test]
    fn dead_enemies_do_not_touch() {
        let (mut w, _) = world_with(vec![chicken_under_character()]);
        w.level.enemies[0].die(0);
        assert_eq!(classify_contact(&w.character, &w.level.enemies[0]), Contact::None);
    }

    #[test]
    fn contact_costs_twenty_and_opens_hurt_window() {
        let (mut w, mut s) = world_with(vec![chicken_under_character()]);
        collision_tick(&mut w, &mut s, 200);
        assert_eq!(w.character.energy, 80);
        assert_eq!(w.health_bar.percentage, 80);

        collision_tick(&mut w, &mut s, 400);
        assert_eq!(w.character.energy, 80);
        collision_tick(&mut w, &mut s, 1200);
        assert_eq!(w.character.energy, 60);
        assert_eq!(
            w.drain_events(),
            vec![GameEvent::CharacterHurt { energy: 80 }, GameEvent::CharacterHurt { energy: 60 }]
        );
    }

    #[test]
    fn lethal_contact_kills_once_and_retires_the_check() {
        let (mut w, mut s) = world_with(vec![chicken_under_character()]);
        w.character.energy = 20;
        collision_tick(&mut w, &mut s, 200);
        assert!(w.character.is_dead);
        assert_eq!(w.character.energy, 0);
        assert!(!s.is_scheduled(Owner::World, TaskKind::Collisions));
        assert_eq!(
            w.drain_events(),
            vec![GameEvent::CharacterHurt { energy: 0 }, GameEvent::CharacterDied]
        );
        collision_tick(&mut w, &mut s, 2000);
        assert!(w.drain_events().is_empty());
    }

    // ── Bottles ──

    fn bottle_on(w: &mut World, s: &mut Scheduler, x: f32, y: f32) -> Owner {
        let id = w.next_entity_id();
        let mut b = ThrowableObject::launch(id, 0.0, 0.0, false);
        b.sprite.x = x;
        b.sprite.y = y;
        b.resume(s, 0);
        let owner = b.owner();
        w.throwables.push(b);
        owner
    }

    #[test]
    fn bottle_kills_chicken_and_stops_flying() {
        let (mut w, mut s) = world_with(vec![Enemy::Chicken(Chicken::new(ChickenKind::Small, 1000.0, 0.2))]);
        let chick = Owner::Enemy(w.level.enemies[0].id());
        let owner = bottle_on(&mut w, &mut s, 1000.0, 360.0);

        collision_tick(&mut w, &mut s, 200);
        assert!(w.level.enemies[0].is_dead());
        assert!(w.throwables[0].hit);
        assert_eq!(s.count_for(owner), 1);
        assert_eq!(s.count_for(chick), 0);
        assert_eq!(w.drain_events(), vec![GameEvent::BottleSplashed, GameEvent::ChickenKilled]);
    }

    #[test]
    fn boss_hit_updates_bar() {
        let (mut w, mut s) = world_with(vec![Enemy::Endboss(Endboss::at(1000.0))]);
        bottle_on(&mut w, &mut s, 1100.0, 200.0);
        collision_tick(&mut w, &mut s, 200);
        assert_eq!(w.endboss_bar.percentage, 80);
        assert_eq!(
            w.drain_events(),
            vec![GameEvent::BottleSplashed, GameEvent::EndbossHurt { health: 4 }]
        );
    }

    #[test]
    fn one_bottle_hits_every_enemy_it_touches() {
        let (mut w, mut s) = world_with(vec![
            Enemy::Chicken(Chicken::new(ChickenKind::Small, 1000.0, 0.2)),
            Enemy::Chicken(Chicken::new(ChickenKind::Small, 1010.0, 0.2)),
            Enemy::Chicken(Chicken::new(ChickenKind::Small, 1400.0, 0.2)),
        ]);
        bottle_on(&mut w, &mut s, 1000.0, 360.0);
        collision_tick(&mut w, &mut s, 200);
        let dead: Vec<bool> = w.level.enemies.iter().map(|e| e.is_dead()).collect();
        assert_eq!(dead, vec![true, true, false]);
        assert_eq!(
            w.drain_events(),
            vec![GameEvent::BottleSplashed, GameEvent::ChickenKilled, GameEvent::ChickenKilled]
        );

        // spent bottle does not hit again
        collision_tick(&mut w, &mut s, 400);
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn spent_and_stray_bottles_are_removed() {
        let (mut w, mut s) = world_with(vec![]);
        let stray = bottle_on(&mut w, &mut s, 500.0, 1200.0);
        let spent = bottle_on(&mut w, &mut s, 500.0, 100.0);
        w.throwables[1].splash_complete = true;
        collision_tick(&mut w, &mut s, 200);
        assert!(w.throwables.is_empty());
        assert_eq!(s.count_for(stray), 0);
        assert_eq!(s.count_for(spent), 0);
    }

    #[test]
    fn boss_defeat_completes_level_after_a_second() {
        let (mut w, mut s) = world_with(vec![Enemy::Endboss(Endboss::at(3000.0))]);
        w.level.enemies[0].die(1000);
        collision_tick(&mut w, &mut s, 2000);
        assert!(!w.level_completed);
        collision_tick(&mut w, &mut s, 2200);
        assert!(w.level_completed);
        collision_tick(&mut w, &mut s, 2400);
        assert_eq!(w.drain_events(), vec![GameEvent::LevelCompleted]);
    }

    #[test]
    fn five_spaced_hits_defeat_the_boss_once() {
        let (mut w, mut s) = world_with(vec![Enemy::Endboss(Endboss::at(1000.0))]);
        let hits = [200, 1800, 3400, 5000, 6600];
        for (i, &t) in hits.iter().enumerate() {
            bottle_on(&mut w, &mut s, 1100.0, 200.0);
            // a second bottle inside the cooldown does nothing
            bottle_on(&mut w, &mut s, 1100.0, 200.0);
            collision_tick(&mut w, &mut s, t);
            let boss = w.endboss().unwrap();
            assert_eq!(boss.health, 4 - i as u32);
            assert_eq!(w.endboss_bar.percentage, boss.health_percentage());
        }
        assert_eq!(w.endboss().unwrap().dead_at, Some(6600));
        assert!(!w.level_completed);

        collision_tick(&mut w, &mut s, 7600);
        assert!(!w.level_completed);
        for t in [7800, 8000, 8200] {
            collision_tick(&mut w, &mut s, t);
        }
        assert!(w.level_completed);
        let events = w.drain_events();
        let completions = events.iter().filter(|e| **e == GameEvent::LevelCompleted).count();
        assert_eq!(completions, 1);
        assert!(events.contains(&GameEvent::EndbossKilled));
    }

    // ── Throwing ──

    #[test]
    fn throw_spends_a_bottle_and_honours_cooldown() {
        let (mut w, mut s) = world_with(vec![]);
        w.collected_bottles = 2;
        w.character.throw_intent = true;

        throw_tick(&mut w, &mut s, 50);
        assert_eq!(w.throwables.len(), 1);
        assert_eq!(w.collected_bottles, 1);
        assert_eq!(w.bottle_bar.percentage, 20);
        let owner = w.throwables[0].owner();
        assert_eq!(s.count_for(owner), 3);

        throw_tick(&mut w, &mut s, 300);
        assert_eq!(w.throwables.len(), 1);
        throw_tick(&mut w, &mut s, 350);
        assert_eq!(w.throwables.len(), 2);
        assert_eq!(
            w.drain_events(),
            vec![GameEvent::BottleThrown { remaining: 1 }, GameEvent::BottleThrown { remaining: 0 }]
        );
    }

    #[test]
    fn left_facing_character_throws_left() {
        let (mut w, mut s) = world_with(vec![]);
        w.collected_bottles = 1;
        w.character.throw_intent = true;
        w.character.sprite.mirrored = true;
        throw_tick(&mut w, &mut s, 50);
        let x0 = w.throwables[0].sprite.x;
        w.throwables[0].fly();
        assert!(w.throwables[0].sprite.x < x0);
    }

    #[test]
    fn no_throwing_while_hurt() {
        let (mut w, mut s) = world_with(vec![]);
        w.collected_bottles = 1;
        w.character.throw_intent = true;
        w.character.hit(5, 100);
        throw_tick(&mut w, &mut s, 150);
        assert!(w.throwables.is_empty());
        throw_tick(&mut w, &mut s, 1200);
        assert_eq!(w.throwables.len(), 1);
    }

    #[test]
    fn dry_fire_refreshes_cooldown() {
        let (mut w, mut s) = world_with(vec![]);
        w.character.throw_intent = true;
        throw_tick(&mut w, &mut s, 400);
        assert!(w.throwables.is_empty());
        assert_eq!(w.last_throw_time, Some(400));
        throw_tick(&mut w, &mut s, 500);
        assert_eq!(w.last_throw_time, Some(400));
    }

    // ── Exclusivity ──

    proptest! {
        #[test]
        fn stomp_and_damage_never_both(
            cy in -100.0f32..150.0,
            vy in -30.0f32..30.0,
            ex in 0.0f32..300.0,
        ) {
            let (mut w, _) = world_with(vec![Enemy::Chicken(Chicken::new(ChickenKind::Normal, ex, 0.2))]);
            w.character.sprite.y = cy;
            w.character.body.speed_y = vy;
            let enemy = &w.level.enemies[0];
            let contact = classify_contact(&w.character, enemy);
            let touching = collides(&w.character, enemy);
            prop_assert_eq!(contact != Contact::None, touching);
            if contact == Contact::Stomp {
                prop_assert!(w.character.is_stomping(enemy));
            }
        }
    }
}
