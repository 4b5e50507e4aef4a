use rps_types::{NewPlayer, Player};
use std::sync::Arc;
use tracing::info;

use crate::cache::PlayerDirectory;
use crate::store::{PlayerStore, StoreError};

/// Player selection and registration.
pub struct Lobby {
    store: Arc<dyn PlayerStore>,
    directory: PlayerDirectory,
}

impl Lobby {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self {
            directory: PlayerDirectory::for_store(Arc::clone(&store)),
            store,
        }
    }

    pub async fn players(&self) -> Result<Vec<Player>, StoreError> {
        self.directory.fetch().await
    }

    /// Register a player; the directory refetches on its next read.
    pub async fn create_player(&self, new_player: NewPlayer) -> Result<Player, StoreError> {
        let player = self.store.create_player(&new_player).await?;
        info!("Created player '{}' ({:?})", player.name, player.id);
        self.directory.mark_stale();
        Ok(player)
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.directory
    }
}
