//! Vehicle types.

use std::fmt;

use super::{PlateNumber, RideId, UserName, VehicleClass};

/// Unique vehicle identifier, derived as `owner_class_plate`.
///
/// # Examples
///
/// ```
/// use rideshare_engine::domain::{PlateNumber, UserName, VehicleClass, VehicleId};
///
/// let id = VehicleId::derive(
///     &UserName::new("Shipra").unwrap(),
///     &VehicleClass::new("Polo").unwrap(),
///     &PlateNumber::new("KA-05-41491").unwrap(),
/// );
/// assert_eq!(id.as_str(), "Shipra_Polo_KA-05-41491");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(String);

impl VehicleId {
    /// Derive the id of the vehicle with this owner, class and plate.
    pub fn derive(owner: &UserName, class: &VehicleClass, plate: &PlateNumber) -> Self {
        VehicleId(format!("{owner}_{class}_{plate}"))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({})", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered vehicle.
///
/// A vehicle carries at most one offered ride at a time. The active ride is
/// claimed when an offer is accepted and released when that ride ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub owner: UserName,
    pub class: VehicleClass,
    pub plate: PlateNumber,
    active_ride: Option<RideId>,
}

impl Vehicle {
    /// Creates an idle vehicle.
    pub fn new(owner: UserName, class: VehicleClass, plate: PlateNumber) -> Self {
        Self {
            id: VehicleId::derive(&owner, &class, &plate),
            owner,
            class,
            plate,
            active_ride: None,
        }
    }

    /// The ride currently offered with this vehicle, if any.
    pub fn active_ride(&self) -> Option<RideId> {
        self.active_ride
    }

    /// Mark `ride` as this vehicle's active ride.
    ///
    /// Returns the already-active ride if the vehicle is busy.
    pub fn claim(&mut self, ride: RideId) -> Result<(), RideId> {
        match self.active_ride {
            Some(active) => Err(active),
            None => {
                self.active_ride = Some(ride);
                Ok(())
            }
        }
    }

    /// Clear the active ride if it is `ride`.
    pub fn release(&mut self, ride: RideId) {
        if self.active_ride == Some(ride) {
            self.active_ride = None;
        }
    }
}
