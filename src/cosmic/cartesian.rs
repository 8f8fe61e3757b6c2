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

use super::{
    dcm_ecef_to_enu, dcm_enu_to_ecef, CoordinateError, EntryState, NonFiniteCartesianSnafu,
    NonFiniteSphericalSnafu, NonPositiveStepSnafu, TooFewPositionsSnafu,
};
use crate::linalg::Vector3;
use snafu::ensure;
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// A planet centered Cartesian position and velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CartesianState {
    pub position_m: Vector3<f64>,
    pub velocity_m_s: Vector3<f64>,
}

impl CartesianState {
    pub const fn new(position_m: Vector3<f64>, velocity_m_s: Vector3<f64>) -> Self {
        Self {
            position_m,
            velocity_m_s,
        }
    }

    pub fn rmag_m(&self) -> f64 {
        self.position_m.norm()
    }

    pub fn vmag_m_s(&self) -> f64 {
        self.velocity_m_s.norm()
    }
}

impl fmt::Display for CartesianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position = [{:.6}, {:.6}, {:.6}] km\tvelocity = [{:.6}, {:.6}, {:.6}] km/s",
            self.position_m[0] * 1e-3,
            self.position_m[1] * 1e-3,
            self.position_m[2] * 1e-3,
            self.velocity_m_s[0] * 1e-3,
            self.velocity_m_s[1] * 1e-3,
            self.velocity_m_s[2] * 1e-3,
        )
    }
}

/// Planet centered position from the radius, the longitude and the latitude.
///
/// The latitude is converted to a co-latitude `pi/2 - phi` measured from the +Z axis.
pub fn spherical_to_inertial_position(
    radius_m: f64,
    longitude_rad: f64,
    latitude_rad: f64,
) -> Vector3<f64> {
    let colatitude = FRAC_PI_2 - latitude_rad;
    let (s_col, c_col) = colatitude.sin_cos();
    let (s_lon, c_lon) = longitude_rad.sin_cos();
    Vector3::new(
        radius_m * s_col * c_lon,
        radius_m * s_col * s_lon,
        radius_m * c_col,
    )
}

/// Planet centered velocity of a spherical state.
///
/// The velocity is built in the local East-North-Up frame as
/// `V (cos(gamma) cos(psi), cos(gamma) sin(psi), sin(gamma))` and rotated to the planet frame.
pub fn spherical_to_inertial_velocity(state: &EntryState) -> Vector3<f64> {
    let (s_fpa, c_fpa) = state.fpa_rad.sin_cos();
    let (s_hdg, c_hdg) = state.heading_rad.sin_cos();
    let v_enu = state.speed_m_s * Vector3::new(c_fpa * c_hdg, c_fpa * s_hdg, s_fpa);
    dcm_enu_to_ecef(state.longitude_rad, state.latitude_rad) * v_enu
}

/// Planet centered position and velocity of a spherical state.
pub fn spherical_to_inertial(state: &EntryState) -> CartesianState {
    CartesianState::new(
        spherical_to_inertial_position(state.radius_m, state.longitude_rad, state.latitude_rad),
        spherical_to_inertial_velocity(state),
    )
}

/// Estimates the velocities of evenly spaced positions by finite differences.
///
/// Interior points use a central difference, the first and last points use a forward and a
/// backward difference respectively.
pub fn velocity_by_finite_difference(
    positions_m: &[Vector3<f64>],
    step_s: f64,
) -> Result<Vec<Vector3<f64>>, CoordinateError> {
    ensure!(
        positions_m.len() >= 2,
        TooFewPositionsSnafu {
            count: positions_m.len()
        }
    );
    ensure!(
        step_s > 0.0 && step_s.is_finite(),
        NonPositiveStepSnafu { step_s }
    );

    let last = positions_m.len() - 1;
    let velocities = (0..=last)
        .map(|i| {
            if i == 0 {
                (positions_m[1] - positions_m[0]) / step_s
            } else if i == last {
                (positions_m[last] - positions_m[last - 1]) / step_s
            } else {
                (positions_m[i + 1] - positions_m[i - 1]) / (2.0 * step_s)
            }
        })
        .collect();

    Ok(velocities)
}

/// Converts a planet centered position and velocity into a spherical entry state.
///
/// The flight path angle is computed from the radial and horizontal components of the velocity,
/// and the heading from the velocity rotated in the local East-North-Up frame.
pub fn cartesian_to_spherical(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
) -> Result<EntryState, CoordinateError> {
    ensure!(
        position_m.iter().chain(velocity_m_s.iter()).all(|x| x.is_finite()),
        NonFiniteCartesianSnafu {
            position_m: *position_m,
            velocity_m_s: *velocity_m_s
        }
    );

    let radius_m = position_m.norm();
    if radius_m == 0.0 {
        return Err(CoordinateError::ZeroRadius);
    }

    let longitude_rad = position_m[1].atan2(position_m[0]);
    let latitude_rad = FRAC_PI_2 - (position_m[2] / radius_m).clamp(-1.0, 1.0).acos();

    let speed_m_s = velocity_m_s.norm();
    let radial_m_s = position_m.dot(velocity_m_s) / radius_m;
    // Rounding may make the horizontal component slightly negative for vertical flight
    let horizontal_m_s = (speed_m_s.powi(2) - radial_m_s.powi(2)).max(0.0).sqrt();
    let fpa_rad = radial_m_s.atan2(horizontal_m_s);

    let v_enu = dcm_ecef_to_enu(longitude_rad, latitude_rad) * velocity_m_s;
    let heading_rad = v_enu[1].atan2(v_enu[0]);

    let state = EntryState::new(
        radius_m,
        longitude_rad,
        latitude_rad,
        speed_m_s,
        fpa_rad,
        heading_rad,
    );

    ensure!(
        state.is_finite(),
        NonFiniteSphericalSnafu {
            state: state.to_vector()
        }
    );

    Ok(state)
}
