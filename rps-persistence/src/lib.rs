pub mod connection;
pub mod entities;
pub mod repositories;

pub use connection::{connect_and_migrate, connect_to_memory_database};
pub use repositories::player_repository::{PlayerRepository, wilson_lower_bound};
