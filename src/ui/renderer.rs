/// World renderer: walks the world in paint order and issues draw calls
/// to a `Surface`.
///
/// Paint order:
///   1. clear, translate by the camera offset
///   2. parallax backgrounds (each layer repeated across the scroll range)
///   3. clouds, uncollected coins and bottles, enemies, bottles in flight
///   4. the character
///   5. undo the translation, then the HUD bars (boss bar once revealed)
///   6. the win or game-over screen, if one is due
///
/// The renderer holds no state; frame scheduling belongs to the session.

use crate::domain::entity::Sprite;
use crate::domain::geometry::Rect;
use crate::sim::world::{EndScreen, World};

pub const CANVAS_WIDTH: f32 = 720.0;
pub const CANVAS_HEIGHT: f32 = 480.0;

/// Horizontal period of one background repetition (two tiles).
const BACKGROUND_SPAN: f32 = 1440.0;
/// Repetitions drawn, as offsets in spans.
const BACKGROUND_REPEATS: std::ops::Range<i32> = -1..3;

pub const GAME_OVER_IMAGE: &str = "img/9_intro_outro_screens/game_over/game over!.png";
pub const WIN_IMAGE: &str = "img/You won, you lost/You Win A.png";

/// 2D raster target.
pub trait Surface {
    fn clear(&mut self);
    /// Shift every later draw horizontally by `dx` (cumulative).
    fn translate(&mut self, dx: f32);
    fn draw_image(&mut self, img: &'static str, rect: Rect, mirrored: bool);
}

#[derive(Debug, Default)]
pub struct WorldRenderer;

impl WorldRenderer {
    pub fn new() -> Self {
        WorldRenderer
    }

    /// Draw one frame. Returns the end screen drawn on top, if any.
    pub fn draw<S: Surface + ?Sized>(&self, world: &World, surface: &mut S, now: u64) -> Option<EndScreen> {
        surface.clear();
        surface.translate(world.camera_x);

        let level = &world.level;
        for i in BACKGROUND_REPEATS {
            let shift = i as f32 * BACKGROUND_SPAN;
            for layer in level.background.iter().chain(&level.background2) {
                draw_shifted(surface, &layer.sprite, shift);
            }
        }

        for cloud in &level.clouds {
            draw(surface, &cloud.sprite);
        }
        for item in level.coins.iter().chain(&level.bottles).filter(|c| !c.collected) {
            draw(surface, &item.sprite);
        }
        for enemy in level.enemies.iter().filter(|e| e.is_drawn(now)) {
            draw(surface, enemy.sprite());
        }
        for bottle in world.throwables.iter().filter(|b| !b.splash_complete) {
            draw(surface, &bottle.sprite);
        }
        draw(surface, &world.character.sprite);

        surface.translate(-world.camera_x);

        draw(surface, &world.health_bar.sprite);
        draw(surface, &world.coin_bar.sprite);
        draw(surface, &world.bottle_bar.sprite);
        if world.endboss().is_some_and(|b| b.visible) {
            draw(surface, &world.endboss_bar.sprite);
        }

        let screen = world.end_screen()?;
        let img = match screen {
            EndScreen::Won => WIN_IMAGE,
            EndScreen::Lost => GAME_OVER_IMAGE,
        };
        surface.draw_image(img, Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), false);
        Some(screen)
    }
}

fn draw<S: Surface + ?Sized>(surface: &mut S, sprite: &Sprite) {
    surface.draw_image(sprite.img, sprite.rect(), sprite.mirrored);
}

fn draw_shifted<S: Surface + ?Sized>(surface: &mut S, sprite: &Sprite, shift: f32) {
    let mut rect = sprite.rect();
    rect.x += shift;
    surface.draw_image(sprite.img, rect, sprite.mirrored);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chicken::{Chicken, ChickenKind};
    use crate::domain::collectable::Collectable;
    use crate::domain::endboss::Endboss;
    use crate::domain::enemy::Enemy;
    use crate::sim::testing::{bare_level, DrawCall, RecordingSurface};

    fn frame(world: &World, now: u64) -> (RecordingSurface, Option<EndScreen>) {
        let mut surface = RecordingSurface::default();
        let shown = WorldRenderer::new().draw(world, &mut surface, now);
        (surface, shown)
    }

    #[test]
    fn camera_wraps_the_world_layer() {
        let w = World::new(bare_level(), 0);
        let (s, shown) = frame(&w, 0);
        assert_eq!(shown, None);
        assert_eq!(s.calls[0], DrawCall::Clear);
        assert_eq!(s.calls[1], DrawCall::Translate(w.camera_x));

        let undo = s.calls.iter().position(|c| *c == DrawCall::Translate(-w.camera_x));
        let character = s.calls.iter().position(|c| matches!(
            c,
            DrawCall::Image { img, .. } if *img == w.character.sprite.img
        ));
        assert!(character.unwrap() < undo.unwrap());
    }

    #[test]
    fn backgrounds_repeat_four_times() {
        let w = World::new(bare_level(), 0);
        let (s, _) = frame(&w, 0);
        let air: Vec<f32> = s
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { img, rect, .. } if *img == w.level.background[0].sprite.img => Some(rect.x),
                _ => None,
            })
            .collect();
        // air appears in both layers: tiles at 0 and 720 per span
        assert_eq!(air, vec![-1440.0, -720.0, 0.0, 720.0, 1440.0, 2160.0, 2880.0, 3600.0]);
    }

    #[test]
    fn collected_items_and_old_corpses_are_skipped() {
        let mut level = bare_level();
        level.coins.push(Collectable::coin(300.0, 100.0));
        level.coins.push(Collectable::coin(500.0, 100.0));
        level.coins[0].collected = true;
        level.enemies.push(Enemy::Chicken(Chicken::new(ChickenKind::Small, 900.0, 0.2)));
        let mut w = World::new(level, 0);
        w.level.enemies[0].die(100);

        let coins = |s: &RecordingSurface| s.images().iter().filter(|i| i.contains("8_coin")).count();
        let chicks = |s: &RecordingSurface| s.images().iter().filter(|i| i.contains("chicken")).count();

        let (s, _) = frame(&w, 500);
        assert_eq!(coins(&s), 1);
        assert_eq!(chicks(&s), 1);
        let (s, _) = frame(&w, 1100);
        assert_eq!(chicks(&s), 0);
    }

    #[test]
    fn boss_bar_waits_for_the_reveal() {
        let mut level = bare_level();
        level.enemies.push(Enemy::Endboss(Endboss::new()));
        let mut w = World::new(level, 0);
        let bar = w.endboss_bar.sprite.img;

        let (s, _) = frame(&w, 0);
        assert!(!s.images().contains(&bar));

        if let Enemy::Endboss(b) = &mut w.level.enemies[0] {
            b.visible = true;
        }
        let (s, _) = frame(&w, 0);
        assert_eq!(s.images().last(), Some(&bar));
    }

    #[test]
    fn end_screens_cover_the_canvas() {
        let mut w = World::new(bare_level(), 0);
        w.level_completed = true;
        let (s, shown) = frame(&w, 0);
        assert_eq!(shown, Some(EndScreen::Won));
        assert_eq!(s.calls.last(), Some(&DrawCall::Image {
            img: WIN_IMAGE,
            rect: Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
            mirrored: false,
        }));
    }
}
