pub mod macros;
pub mod roster;
pub mod store;
pub mod wheel;
