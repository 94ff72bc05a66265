//! World bridge for dropped and looted items
//!
//! The inventory never owns world objects. Dropping asks a [`PickupBridge`]
//! to materialize a pickup; looting reads the payload back and shrinks or
//! destroys the pickup. [`MemoryWorld`] is an in-process bridge for tools
//! and tests.

use crate::instance::ItemInstance;
use crate::item::ItemDefinition;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handle to a pickup living in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupHandle(pub u64);

/// World placement of a pickup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position
    pub location: [f32; 3],
    /// Euler rotation in degrees (pitch, yaw, roll)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Transform {
    /// Transform at `location` with no rotation and unit scale
    pub fn at(location: [f32; 3]) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    /// Set scale
    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        self.location
            .iter()
            .chain(self.rotation.iter())
            .chain(self.scale.iter())
            .all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// Position and facing of the actor that owns an inventory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    /// Actor position
    pub location: [f32; 3],
    /// Unit forward vector
    pub forward: [f32; 3],
    /// Actor rotation, copied onto spawned pickups
    pub rotation: [f32; 3],
}

impl ActorPose {
    /// Pose at `location` facing `forward`
    pub fn new(location: [f32; 3], forward: [f32; 3]) -> Self {
        Self {
            location,
            forward,
            rotation: [0.0; 3],
        }
    }

    /// Point `distance` units in front of the actor
    pub fn point_ahead(&self, distance: f32) -> [f32; 3] {
        [
            self.location[0] + self.forward[0] * distance,
            self.location[1] + self.forward[1] * distance,
            self.location[2] + self.forward[2] * distance,
        ]
    }
}

impl Default for ActorPose {
    fn default() -> Self {
        Self::new([0.0; 3], [1.0, 0.0, 0.0])
    }
}

/// Everything the world needs to materialize a pickup
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    /// Instance carried by the pickup
    pub instance: ItemInstance,
    /// Units carried
    pub quantity: u32,
    /// Where to spawn it
    pub transform: Transform,
}

impl SpawnRequest {
    /// Definition of the carried item
    pub fn item(&self) -> &Arc<ItemDefinition> {
        self.instance.item()
    }
}

/// Interface to whatever owns world objects.
///
/// Calls are synchronous; a refused spawn is final and hands the request back
/// so the caller can restore its own state.
pub trait PickupBridge {
    /// Materialize a pickup
    fn spawn_pickup(&mut self, request: SpawnRequest) -> Result<PickupHandle, SpawnRequest>;

    /// Remove a pickup from the world
    fn destroy_pickup(&mut self, handle: PickupHandle) -> bool;

    /// Instance and remaining quantity carried by a pickup
    fn pickup_payload(&self, handle: PickupHandle) -> Option<(&ItemInstance, u32)>;

    /// Change the remaining quantity carried by a pickup
    fn set_pickup_quantity(&mut self, handle: PickupHandle, quantity: u32) -> bool;
}

/// A pickup stored by [`MemoryWorld`]
#[derive(Debug, Clone)]
pub struct WorldPickup {
    /// Carried instance
    pub instance: ItemInstance,
    /// Remaining units
    pub quantity: u32,
    /// Placement
    pub transform: Transform,
    /// Mesh from the item's pickup spec
    pub mesh: String,
}

impl WorldPickup {
    /// Check if a position is within `radius` of the pickup
    pub fn in_range(&self, position: [f32; 3], radius: f32) -> bool {
        let dx = position[0] - self.transform.location[0];
        let dy = position[1] - self.transform.location[1];
        let dz = position[2] - self.transform.location[2];
        dx * dx + dy * dy + dz * dz <= radius * radius
    }
}

/// In-memory world holding pickups by handle
#[derive(Debug)]
pub struct MemoryWorld {
    pickups: BTreeMap<PickupHandle, WorldPickup>,
    next_handle: u64,
    spawning_enabled: bool,
}

impl MemoryWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            pickups: BTreeMap::new(),
            next_handle: 1,
            spawning_enabled: true,
        }
    }

    /// Refuse every spawn while disabled
    pub fn set_spawning_enabled(&mut self, enabled: bool) {
        self.spawning_enabled = enabled;
    }

    /// Look up a pickup
    pub fn get(&self, handle: PickupHandle) -> Option<&WorldPickup> {
        self.pickups.get(&handle)
    }

    /// Number of pickups in the world
    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    /// Check if the world holds no pickups
    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    /// Iterate over pickups in spawn order
    pub fn iter(&self) -> impl Iterator<Item = (PickupHandle, &WorldPickup)> {
        self.pickups.iter().map(|(handle, pickup)| (*handle, pickup))
    }

    /// Pickups within `radius` of `position`
    pub fn pickups_in_range(&self, position: [f32; 3], radius: f32) -> Vec<PickupHandle> {
        self.iter()
            .filter(|(_, pickup)| pickup.in_range(position, radius))
            .map(|(handle, _)| handle)
            .collect()
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PickupBridge for MemoryWorld {
    fn spawn_pickup(&mut self, request: SpawnRequest) -> Result<PickupHandle, SpawnRequest> {
        if !self.spawning_enabled || request.quantity == 0 || !request.transform.is_finite() {
            return Err(request);
        }

        let handle = PickupHandle(self.next_handle);
        self.next_handle += 1;

        let mesh = request
            .item()
            .pickup
            .as_ref()
            .map(|spec| spec.mesh.clone())
            .unwrap_or_default();

        log::debug!(
            "Spawned pickup {:?} with {} x '{}'",
            handle,
            request.quantity,
            request.item().id
        );

        self.pickups.insert(
            handle,
            WorldPickup {
                instance: request.instance,
                quantity: request.quantity,
                transform: request.transform,
                mesh,
            },
        );
        Ok(handle)
    }

    fn destroy_pickup(&mut self, handle: PickupHandle) -> bool {
        self.pickups.remove(&handle).is_some()
    }

    fn pickup_payload(&self, handle: PickupHandle) -> Option<(&ItemInstance, u32)> {
        self.pickups
            .get(&handle)
            .map(|pickup| (&pickup.instance, pickup.quantity))
    }

    fn set_pickup_quantity(&mut self, handle: PickupHandle, quantity: u32) -> bool {
        match self.pickups.get_mut(&handle) {
            Some(pickup) => {
                pickup.quantity = quantity;
                true
            }
            None => false,
        }
    }
}
