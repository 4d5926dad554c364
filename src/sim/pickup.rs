/// Coin and bottle pickups, checked on the world's 60 Hz interval.

use crate::domain::collectable::CollectableKind;
use crate::domain::geometry::collides;
use crate::domain::status_bar::count_percentage;

use super::event::GameEvent;
use super::world::World;

/// Inventory cap; bottles touched while full stay on the ground.
pub const MAX_BOTTLES: u32 = 5;

pub fn collectables_tick(world: &mut World) {
    if world.character.is_dead {
        return;
    }
    for i in 0..world.level.coins.len() {
        if collides(&world.character, &world.level.coins[i]) {
            collect(world, CollectableKind::Coin, i);
        }
    }
    for i in 0..world.level.bottles.len() {
        if collides(&world.character, &world.level.bottles[i]) {
            collect(world, CollectableKind::Bottle, i);
        }
    }
}

/// Pick up item `index` of `kind`. Counts once no matter how often it is
/// called; a bottle is refused (and stays on the ground) while the
/// inventory is full.
pub fn collect(world: &mut World, kind: CollectableKind, index: usize) -> bool {
    if kind == CollectableKind::Bottle && world.collected_bottles >= MAX_BOTTLES {
        return false;
    }
    let items = match kind {
        CollectableKind::Coin => &mut world.level.coins,
        CollectableKind::Bottle => &mut world.level.bottles,
    };
    let Some(item) = items.get_mut(index) else {
        return false;
    };
    if !item.collect() {
        return false;
    }

    match kind {
        CollectableKind::Coin => {
            world.collected_coins += 1;
            let count = world.collected_coins;
            world.coin_bar.set_percentage(count_percentage(count));
            world.emit(GameEvent::CoinCollected { count });
        }
        CollectableKind::Bottle => {
            world.collected_bottles += 1;
            let count = world.collected_bottles;
            world.bottle_bar.set_percentage(count_percentage(count));
            world.emit(GameEvent::BottleCollected { count });
        }
    }
    true
}
