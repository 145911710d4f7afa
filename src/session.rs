//! Owned state of one map view.
//!
//! Selecting a different dataset or tileset invalidates everything derived
//! from the previous one: the classification and the layer list always, and
//! the load metrics when the dataset changes.

use crate::models::{TileMetadataResponse, VectorLayer};
use crate::monitor::TileLoadMonitor;
use crate::tier::TierStore;
use crate::visibility::LayerVisibilityStore;

/// Currently selected dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSelection {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct MapSession {
    dataset: Option<DatasetSelection>,
    tileset_id: Option<u64>,
    tiers: TierStore,
    layers: LayerVisibilityStore,
    monitor: TileLoadMonitor,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose monitor only times `source_id`.
    pub fn for_source(source_id: impl Into<String>) -> Self {
        Self {
            monitor: TileLoadMonitor::for_source(source_id),
            ..Self::default()
        }
    }

    /// Select a dataset. A change of id drops the tileset selection and all
    /// derived state; reselecting the same id only updates the name.
    pub fn select_dataset(&mut self, id: u64, name: impl Into<String>) {
        let name = name.into();
        if let Some(current) = self.dataset.as_mut()
            && current.id == id
        {
            current.name = name;
            return;
        }
        log::debug!("session: dataset {id} ({name}) selected");
        self.dataset = Some(DatasetSelection { id, name });
        self.tileset_id = None;
        self.reset_derived();
        self.monitor.clear();
    }

    pub fn clear_dataset(&mut self) {
        self.dataset = None;
        self.tileset_id = None;
        self.reset_derived();
        self.monitor.clear();
    }

    /// Select a tileset of the current dataset; `None` deselects.
    pub fn select_tileset(&mut self, tileset_id: Option<u64>) {
        if self.tileset_id == tileset_id {
            return;
        }
        log::debug!("session: tileset {tileset_id:?} selected");
        self.tileset_id = tileset_id;
        self.reset_derived();
    }

    /// Seed layer visibility from freshly loaded tileset metadata.
    pub fn load_metadata(&mut self, metadata: &TileMetadataResponse) {
        self.layers
            .set_layers_from_metadata(&metadata.metadata.vector_layers);
    }

    pub fn load_layers(&mut self, layers: &[VectorLayer]) {
        self.layers.set_layers_from_metadata(layers);
    }

    fn reset_derived(&mut self) {
        self.tiers.clear_tier();
        self.layers.clear_layers();
    }

    pub fn dataset(&self) -> Option<&DatasetSelection> {
        self.dataset.as_ref()
    }

    pub fn tileset_id(&self) -> Option<u64> {
        self.tileset_id
    }

    pub fn tiers(&self) -> &TierStore {
        &self.tiers
    }

    pub fn tiers_mut(&mut self) -> &mut TierStore {
        &mut self.tiers
    }

    pub fn layers(&self) -> &LayerVisibilityStore {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerVisibilityStore {
        &mut self.layers
    }

    pub fn monitor(&self) -> &TileLoadMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut TileLoadMonitor {
        &mut self.monitor
    }
}
