/// Events emitted while the world ticks.
/// The session forwards them to the sound sink; tests read them directly.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh game (or restart) begins.
    SessionStarted,
    Jumped,
    CharacterHurt { energy: i32 },
    CharacterDied,
    SleepStarted,
    SleepEnded,
    CoinCollected { count: u32 },
    BottleCollected { count: u32 },
    BottleThrown { remaining: u32 },
    BottleSplashed,
    ChickenKilled,
    EndbossRevealed,
    EndbossHurt { health: u32 },
    EndbossKilled,
    LevelCompleted,
    Paused,
    Resumed,
    WinScreenShown,
    GameOverScreenShown,
}
