//! In-memory session registry.
//!
//! Owns the map from room id to room. Each room lives behind its own
//! `tokio::sync::Mutex`, which is the room's serialization point: different
//! rooms run fully in parallel, operations on one room apply one at a time.
//! The map itself sits behind a short-lived `std::sync::Mutex`; nothing
//! awaits while holding it.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use tokio::sync::Mutex;

use crate::domain::{Room, RoomId, Timestamp};

/// Shared handle to one room's serialized state.
pub type RoomHandle = Arc<Mutex<Room>>;

pub struct SessionRegistry {
    rooms: StdMutex<HashMap<RoomId, RoomHandle>>,
    grace_millis: i64,
}

impl SessionRegistry {
    /// Default grace period an empty room survives before eviction.
    pub const DEFAULT_GRACE: Duration = Duration::from_secs(60);

    pub fn new(grace: Duration) -> Self {
        Self {
            rooms: StdMutex::new(HashMap::new()),
            grace_millis: i64::try_from(grace.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Look up a room, creating it when absent. Returns the handle and
    /// whether this call created the room.
    ///
    /// `gate` runs inside the registry critical section and only when the
    /// room would be created; concurrent first-joins to the same id
    /// therefore create exactly one room, and a gate denial (quota) creates
    /// none. The gate must not block.
    pub fn resolve_or_create<E>(
        &self,
        room_id: &RoomId,
        now: Timestamp,
        gate: impl FnOnce() -> Result<(), E>,
    ) -> Result<(RoomHandle, bool), E> {
        let mut rooms = self.rooms.lock().expect("registry lock poisoned");
        if let Some(handle) = rooms.get(room_id) {
            return Ok((handle.clone(), false));
        }

        gate()?;
        let handle = Arc::new(Mutex::new(Room::new(room_id.clone(), now)));
        rooms.insert(room_id.clone(), handle.clone());
        tracing::info!("Room '{}' created", room_id);
        Ok((handle, true))
    }

    /// Look up an existing room.
    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms
            .lock()
            .expect("registry lock poisoned")
            .get(room_id)
            .cloned()
    }

    /// Remove empty rooms whose grace period has elapsed.
    ///
    /// A room is only removed when its own lock can be taken without
    /// waiting: a contended lock means someone is operating on the room, so
    /// it is left for the next sweep. The evicted flag is set under the
    /// room lock before the map entry is dropped, so a join that already
    /// cloned the handle observes the flag and re-resolves.
    pub fn sweep_expired(&self, now: Timestamp) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().expect("registry lock poisoned");
        let mut expired = Vec::new();
        for (room_id, handle) in rooms.iter() {
            if let Ok(mut room) = handle.try_lock()
                && room.eviction_due(now, self.grace_millis)
            {
                room.mark_evicted();
                expired.push(room_id.clone());
            }
        }
        for room_id in &expired {
            rooms.remove(room_id);
            tracing::info!("Room '{}' evicted after grace period", room_id);
        }
        expired
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().expect("registry lock poisoned").len()
    }

    /// Snapshot of all live rooms, for the HTTP listing endpoints.
    pub fn snapshot(&self) -> Vec<(RoomId, RoomHandle)> {
        self.rooms
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRACE)
    }
}
