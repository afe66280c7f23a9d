//! Display rounding. The engine keeps full precision; front-ends call these
//! just before printing or serializing a response.

use crate::{RaceFuel, StintFuel, TyreWearResult};

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

impl TyreWearResult {
    /// Wear rates to 3 decimals, remaining and total wear to 2.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            base_wear: round_to(self.base_wear, 3),
            compound_wear: round_to(self.compound_wear, 3),
            remaining: round_to(self.remaining, 2),
            total_wear: round_to(self.total_wear, 2),
            ..self.clone()
        }
    }
}

impl RaceFuel {
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            total_distance_km: round_to(self.total_distance_km, 3),
            fuel: round_to(self.fuel, 2),
            fuel_per_lap: round_to(self.fuel_per_lap, 3),
            fuel_per_km: round_to(self.fuel_per_km, 3),
            ..self.clone()
        }
    }
}

impl StintFuel {
    #[must_use]
    pub fn rounded(&self) -> Self {
        let mut rounded = self.clone();
        rounded.base_fuel_per_lap = round_to(self.base_fuel_per_lap, 3);
        rounded.fuel_per_lap = round_to(self.fuel_per_lap, 3);
        rounded.total_fuel = round_to(self.total_fuel, 2);
        rounded.fuel_saving = round_to(self.fuel_saving, 2);
        rounded.lap_time_impact.total_seconds = round_to(self.lap_time_impact.total_seconds, 2);
        rounded
    }
}
