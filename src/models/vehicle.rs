//! Electric vehicle parameters.

use serde::{Deserialize, Serialize};

use crate::error::EvrpError;

/// Parameters of the homogeneous electric fleet.
///
/// Energy use on a leg is `energy_consumption × distance`. The battery is
/// refilled to `battery_capacity` at the depot and at every charging station.
///
/// # Examples
///
/// ```
/// use evrp_search::models::ElectricVehicle;
///
/// let v = ElectricVehicle::new(100, 50.0, 1.0).unwrap();
/// assert_eq!(v.capacity(), 100);
/// assert!((v.energy_for(10.0) - 10.0).abs() < 1e-10);
/// assert!(v.max_range().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricVehicle {
    capacity: i32,
    battery_capacity: f64,
    energy_consumption: f64,
}

impl ElectricVehicle {
    /// Creates a vehicle.
    ///
    /// Fails if capacity is not positive, battery capacity is not positive and
    /// finite, or consumption is negative or non-finite.
    pub fn new(
        capacity: i32,
        battery_capacity: f64,
        energy_consumption: f64,
    ) -> Result<Self, EvrpError> {
        if capacity <= 0 {
            return Err(EvrpError::InvalidVehicle(format!(
                "capacity must be positive, got {capacity}"
            )));
        }
        if !battery_capacity.is_finite() || battery_capacity <= 0.0 {
            return Err(EvrpError::InvalidVehicle(format!(
                "battery capacity must be positive and finite, got {battery_capacity}"
            )));
        }
        if !energy_consumption.is_finite() || energy_consumption < 0.0 {
            return Err(EvrpError::InvalidVehicle(format!(
                "energy consumption must be non-negative and finite, got {energy_consumption}"
            )));
        }
        Ok(Self {
            capacity,
            battery_capacity,
            energy_consumption,
        })
    }

    /// Maximum load per vehicle tour.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Battery level after recharging.
    pub fn battery_capacity(&self) -> f64 {
        self.battery_capacity
    }

    /// Energy consumed per unit distance.
    pub fn energy_consumption(&self) -> f64 {
        self.energy_consumption
    }

    /// Energy needed to travel `distance`.
    pub fn energy_for(&self, distance: f64) -> f64 {
        self.energy_consumption * distance
    }

    /// Distance coverable on a full battery, `None` if consumption is zero.
    pub fn max_range(&self) -> Option<f64> {
        if self.energy_consumption > 0.0 {
            Some(self.battery_capacity / self.energy_consumption)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = ElectricVehicle::new(6000, 94.0, 1.2).expect("valid");
        assert_eq!(v.capacity(), 6000);
        assert_eq!(v.battery_capacity(), 94.0);
        assert_eq!(v.energy_consumption(), 1.2);
        assert!((v.max_range().expect("finite range") - 94.0 / 1.2).abs() < 1e-10);
    }

    #[test]
    fn test_vehicle_invalid() {
        assert!(ElectricVehicle::new(0, 10.0, 1.0).is_err());
        assert!(ElectricVehicle::new(10, 0.0, 1.0).is_err());
        assert!(ElectricVehicle::new(10, f64::INFINITY, 1.0).is_err());
        assert!(ElectricVehicle::new(10, 10.0, -1.0).is_err());
        assert!(ElectricVehicle::new(10, 10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_consumption_has_unbounded_range() {
        let v = ElectricVehicle::new(10, 10.0, 0.0).expect("valid");
        assert!(v.max_range().is_none());
        assert_eq!(v.energy_for(1e6), 0.0);
    }
}
