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

use super::{cartesian_to_spherical, spherical_to_inertial, CartesianState, CoordinateError};
use crate::linalg::{Vector3, Vector6};
use crate::md::StateParameter;
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// The six element entry state, expressed in planet centered spherical coordinates.
///
/// Angles are in radians, distances in meters and speeds in meters per second. The flight path
/// angle is positive above the local horizon and the heading is measured from the local East
/// towards the local North.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryState {
    pub radius_m: f64,
    pub longitude_rad: f64,
    pub latitude_rad: f64,
    pub speed_m_s: f64,
    pub fpa_rad: f64,
    pub heading_rad: f64,
}

impl EntryState {
    pub const fn new(
        radius_m: f64,
        longitude_rad: f64,
        latitude_rad: f64,
        speed_m_s: f64,
        fpa_rad: f64,
        heading_rad: f64,
    ) -> Self {
        Self {
            radius_m,
            longitude_rad,
            latitude_rad,
            speed_m_s,
            fpa_rad,
            heading_rad,
        }
    }

    /// Builds a state from an altitude above the provided mean radius and angles in degrees.
    pub fn from_altitude_deg(
        altitude_m: f64,
        mean_radius_m: f64,
        longitude_deg: f64,
        latitude_deg: f64,
        speed_m_s: f64,
        fpa_deg: f64,
        heading_deg: f64,
    ) -> Self {
        Self::new(
            mean_radius_m + altitude_m,
            longitude_deg.to_radians(),
            latitude_deg.to_radians(),
            speed_m_s,
            fpa_deg.to_radians(),
            heading_deg.to_radians(),
        )
    }

    /// Returns the state as `[r, theta, phi, V, gamma, psi]`.
    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::new(
            self.radius_m,
            self.longitude_rad,
            self.latitude_rad,
            self.speed_m_s,
            self.fpa_rad,
            self.heading_rad,
        )
    }

    /// Builds a state from `[r, theta, phi, V, gamma, psi]`.
    pub fn from_vector(vector: &Vector6<f64>) -> Self {
        Self::new(
            vector[0], vector[1], vector[2], vector[3], vector[4], vector[5],
        )
    }

    /// Returns the value of the requested parameter, in the unit of that parameter.
    pub fn value(&self, param: StateParameter) -> f64 {
        self.to_vector()[param.index()]
    }

    pub fn is_finite(&self) -> bool {
        self.to_vector().iter().all(|x| x.is_finite())
    }

    /// Returns true if the latitude is strictly between the poles.
    pub fn latitude_is_valid(&self) -> bool {
        self.latitude_rad.abs() < FRAC_PI_2
    }

    /// Planet centered position of this state, in meters.
    pub fn position_m(&self) -> Vector3<f64> {
        super::spherical_to_inertial_position(self.radius_m, self.longitude_rad, self.latitude_rad)
    }

    /// Converts this state to its planet centered Cartesian position and velocity.
    pub fn to_cartesian(&self) -> CartesianState {
        spherical_to_inertial(self)
    }

    /// Builds a spherical state from a planet centered Cartesian position and velocity.
    pub fn from_cartesian(cartesian: &CartesianState) -> Result<Self, CoordinateError> {
        cartesian_to_spherical(&cartesian.position_m, &cartesian.velocity_m_s)
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[r = {:.6} km, lon = {:.6} deg, lat = {:.6} deg, V = {:.6} km/s, fpa = {:.6} deg, heading = {:.6} deg]",
            self.radius_m * 1e-3,
            self.longitude_rad.to_degrees(),
            self.latitude_rad.to_degrees(),
            self.speed_m_s * 1e-3,
            self.fpa_rad.to_degrees(),
            self.heading_rad.to_degrees()
        )
    }
}
