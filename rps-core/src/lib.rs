pub mod config;
pub mod game_events;
pub mod outcome;
pub mod overlay;
pub mod round;
pub mod rules;
pub mod stats;

// Re-export main components
pub use config::*;
pub use game_events::*;
pub use outcome::*;
pub use overlay::*;
pub use round::*;
pub use rules::*;
pub use stats::*;
