pub mod background;
pub mod character;
pub mod chicken;
pub mod cloud;
pub mod collectable;
pub mod endboss;
pub mod enemy;
pub mod entity;
pub mod geometry;
pub mod keyboard;
pub mod physics;
pub mod status_bar;
pub mod throwable;
