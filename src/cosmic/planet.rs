/*
    EDL-space, planetary entry trajectories
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{AtmosphereLookup, AtmosphereTable};
use std::fmt;
use std::sync::Arc;

/// Gravitational parameter of Mars in m^3/s^2.
pub const MARS_GM_M3_S2: f64 = 4.2828e13;
/// Mean radius of Mars in meters.
pub const MARS_MEAN_RADIUS_M: f64 = 3_396e3;

/// A spherical planet with a central gravity field and a tabulated atmosphere.
///
/// The atmosphere table is reference counted: cloning a planet model is cheap and all of the
/// clones read the same table.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetModel {
    pub name: String,
    /// Gravitational parameter in m^3/s^2
    pub mu_m3_s2: f64,
    /// Mean radius in meters, altitudes are measured from this radius
    pub mean_radius_m: f64,
    pub atmosphere: Arc<AtmosphereTable>,
}

impl PlanetModel {
    pub fn new<S: Into<String>>(
        name: S,
        mu_m3_s2: f64,
        mean_radius_m: f64,
        atmosphere: Arc<AtmosphereTable>,
    ) -> Self {
        Self {
            name: name.into(),
            mu_m3_s2,
            mean_radius_m,
            atmosphere,
        }
    }

    /// Mars with the provided atmosphere table.
    pub fn mars(atmosphere: Arc<AtmosphereTable>) -> Self {
        Self::new("mars", MARS_GM_M3_S2, MARS_MEAN_RADIUS_M, atmosphere)
    }

    /// Altitude above the mean radius, in meters.
    pub fn altitude_m(&self, radius_m: f64) -> f64 {
        radius_m - self.mean_radius_m
    }

    /// Radius of the provided altitude, in meters.
    pub fn radius_at_altitude_m(&self, altitude_m: f64) -> f64 {
        self.mean_radius_m + altitude_m
    }

    /// Atmosphere lookup at the provided radius.
    pub fn density_lookup(&self, radius_m: f64) -> AtmosphereLookup {
        self.atmosphere.lookup(self.altitude_m(radius_m))
    }

    /// Gravitational acceleration magnitude at the provided radius, in m/s^2.
    pub fn gravity_m_s2(&self, radius_m: f64) -> f64 {
        self.mu_m3_s2 / radius_m.powi(2)
    }
}

impl fmt::Display for PlanetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (mu = {:e} m^3/s^2, radius = {} km, {})",
            self.name,
            self.mu_m3_s2,
            self.mean_radius_m * 1e-3,
            self.atmosphere
        )
    }
}

#[test]
fn planet_altitudes() {
    let atm = Arc::new(AtmosphereTable::from_rows(&[(0.0, 2.0e-2), (10_000.0, 8.0e-3)]).unwrap());
    let mars = PlanetModel::mars(atm);
    assert_eq!(mars.altitude_m(MARS_MEAN_RADIUS_M + 6_500.0), 6_500.0);
    assert_eq!(mars.radius_at_altitude_m(-100.0), MARS_MEAN_RADIUS_M - 100.0);
    assert!((mars.density_lookup(MARS_MEAN_RADIUS_M + 5_000.0).density() - 1.4e-2).abs() < 1e-15);
    assert!((mars.gravity_m_s2(MARS_MEAN_RADIUS_M) - 3.7135).abs() < 1e-3);
}
