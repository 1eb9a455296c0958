use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::directory::UserDirectory;
use crate::domain::{Availability, TrackedLocation, UserId, UserRecord};
use crate::error::MarketError;
use crate::geo::GeoPoint;

#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
        operation: &'static str,
    ) -> Result<RwLockReadGuard<'_, HashMap<UserId, UserRecord>>, MarketError> {
        self.users
            .read()
            .map_err(|_| MarketError::PersistenceFailure { operation })
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, HashMap<UserId, UserRecord>>, MarketError> {
        self.users
            .write()
            .map_err(|_| MarketError::PersistenceFailure { operation })
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn get(&self, id: &UserId) -> Result<Option<UserRecord>, MarketError> {
        Ok(self.read("user get")?.get(id).cloned())
    }

    fn insert(&self, user: UserRecord) -> Result<(), MarketError> {
        self.write("user insert")?.insert(user.id.clone(), user);
        Ok(())
    }

    fn set_availability(
        &self,
        id: &UserId,
        availability: Availability,
    ) -> Result<(), MarketError> {
        let mut users = self.write("user availability")?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| MarketError::UserNotFound { id: id.to_string() })?;
        user.status = availability;
        Ok(())
    }

    fn update_location(
        &self,
        id: &UserId,
        point: GeoPoint,
        at: DateTime<Utc>,
    ) -> Result<(), MarketError> {
        let mut users = self.write("user location")?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| MarketError::UserNotFound { id: id.to_string() })?;
        user.current_location = Some(TrackedLocation {
            point,
            updated_at: at,
        });
        Ok(())
    }

    fn find<F>(&self, predicate: F) -> Result<Vec<UserRecord>, MarketError>
    where
        F: Fn(&UserRecord) -> bool,
    {
        Ok(self
            .read("user find")?
            .values()
            .filter(|user| predicate(user))
            .cloned()
            .collect())
    }
}
