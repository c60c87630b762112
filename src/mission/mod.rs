//! Missions and checkpoint progression.

mod checkpoint;

pub use checkpoint::CheckpointManager;

use crate::map::ElementId;
use serde::{Deserialize, Serialize};

/// Ordered checkpoints the vehicle must visit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    checkpoints: Vec<ElementId>,
}

impl Mission {
    pub fn new(checkpoints: Vec<ElementId>) -> Self {
        Self { checkpoints }
    }

    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.checkpoints.get(index).copied()
    }

    pub fn checkpoints(&self) -> &[ElementId] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

impl FromIterator<ElementId> for Mission {
    fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
