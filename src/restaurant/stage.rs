//! The two stations every customer passes through, in order.

use crate::core::errors::SimError;
use crate::core::resource::ResourcePool;
use crate::core::types::ResourceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Checkout,
    Kitchen,
}

impl Stage {
    /// Stages in the order they are registered with the resource pool
    pub const ALL: [Stage; 2] = [Stage::Checkout, Stage::Kitchen];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Checkout => "checkout",
            Stage::Kitchen => "kitchen",
        }
    }

    /// Pool slot of this stage; matches the registration order of [`Stage::ALL`]
    pub fn resource_id(&self) -> ResourceId {
        match self {
            Stage::Checkout => ResourceId::new(0),
            Stage::Kitchen => ResourceId::new(1),
        }
    }

    /// Build the pool for one run with the given capacities
    pub fn build_pool(checkout_capacity: usize, kitchen_capacity: usize) -> Result<ResourcePool, SimError> {
        let mut pool = ResourcePool::new();
        for stage in Stage::ALL {
            let capacity = match stage {
                Stage::Checkout => checkout_capacity,
                Stage::Kitchen => kitchen_capacity,
            };
            let id = pool.add(stage.name(), capacity)?;
            debug_assert_eq!(id, stage.resource_id());
        }
        Ok(pool)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
