pub mod cache;
pub mod config;
pub mod http;
pub mod lobby;
pub mod session;
pub mod store;

pub use cache::*;
pub use config::*;
pub use http::*;
pub use lobby::*;
pub use session::*;
pub use store::*;
