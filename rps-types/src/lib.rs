pub mod errors;
pub mod game;
pub mod leaderboard;
pub mod player;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use leaderboard::*;
pub use player::*;
