pub mod audio;
pub mod combat;
pub mod event;
pub mod level;
pub mod lifecycle;
pub mod pickup;
pub mod scheduler;
pub mod session;
pub mod world;

#[cfg(test)]
pub mod testing;
