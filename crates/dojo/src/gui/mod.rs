pub mod app;
pub mod roster;
pub mod theme;
pub mod wheel;
