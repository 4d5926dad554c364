/// HUD bars: health, coins, bottles, and the boss's remaining health.
///
/// A bar shows one of six frames. The mapping from percentage to frame
/// is an exact lookup; a value that is not one of the six buckets shows
/// the empty frame.

use super::entity::{FrameSet, Sprite};

const WIDTH: f32 = 200.0;
const HEIGHT: f32 = 60.0;

const HEALTH_FRAMES: FrameSet = &[
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/0.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/20.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/40.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/60.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/80.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/100.png",
];

const COIN_FRAMES: FrameSet = &[
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/0.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/20.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/40.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/60.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/80.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/100.png",
];

const BOTTLE_FRAMES: FrameSet = &[
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/0.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/20.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/40.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/60.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/80.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/100.png",
];

const ENDBOSS_FRAMES: FrameSet = &[
    "img/7_statusbars/2_statusbar_endboss/orange/orange0.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange20.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange40.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange60.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange80.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange100.png",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusBarKind {
    Health,
    Coin,
    Bottle,
    Endboss,
}

impl StatusBarKind {
    fn frames(self) -> FrameSet {
        match self {
            StatusBarKind::Health => HEALTH_FRAMES,
            StatusBarKind::Coin => COIN_FRAMES,
            StatusBarKind::Bottle => BOTTLE_FRAMES,
            StatusBarKind::Endboss => ENDBOSS_FRAMES,
        }
    }

    /// Fixed screen position and starting percentage.
    fn layout(self) -> (f32, f32, i32) {
        match self {
            StatusBarKind::Health => (20.0, 0.0, 100),
            StatusBarKind::Coin => (20.0, 50.0, 0),
            StatusBarKind::Bottle => (20.0, 100.0, 0),
            StatusBarKind::Endboss => (500.0, 10.0, 100),
        }
    }
}

/// Frame index for a percentage. Exact bucket match, otherwise 0.
pub fn image_index(percentage: i32) -> usize {
    match percentage {
        100 => 5,
        80 => 4,
        60 => 3,
        40 => 2,
        20 => 1,
        _ => 0,
    }
}

/// Percentage shown for `count` items, five items filling the bar.
pub fn count_percentage(count: u32) -> i32 {
    (count.saturating_mul(20)).min(100) as i32
}

#[derive(Clone, Debug)]
pub struct StatusBar {
    pub kind: StatusBarKind,
    pub sprite: Sprite,
    pub percentage: i32,
}

impl StatusBar {
    pub fn new(kind: StatusBarKind) -> Self {
        let (x, y, initial) = kind.layout();
        let mut bar = StatusBar {
            kind,
            sprite: Sprite::new(kind.frames()[0], x, y, WIDTH, HEIGHT),
            percentage: 0,
        };
        bar.set_percentage(initial);
        bar
    }

    pub fn set_percentage(&mut self, percentage: i32) {
        self.percentage = percentage;
        self.sprite.show(self.kind.frames()[image_index(percentage)]);
    }
}
