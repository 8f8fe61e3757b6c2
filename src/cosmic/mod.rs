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

use crate::linalg::{Vector3, Vector6};
use snafu::Snafu;

/// Tabulated atmosphere density profile.
mod atmosphere;
pub use self::atmosphere::*;

/// Planet models: gravity, radius and atmosphere.
mod planet;
pub use self::planet::*;

/// The spherical entry state.
mod state;
pub use self::state::*;

/// Cartesian states, spherical to Cartesian conversions and finite difference velocities.
mod cartesian;
pub use self::cartesian::*;

/// Rotations between the local East-North-Up frame and the planet fixed frame.
pub mod rotations;
pub use self::rotations::*;

/// Errors of the atmosphere table construction.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AtmosphereError {
    #[snafu(display("atmosphere table requires at least two rows, got {rows}"))]
    TooFewRows { rows: usize },
    #[snafu(display("atmosphere table has {altitudes} altitudes but {densities} densities"))]
    LengthMismatch { altitudes: usize, densities: usize },
    #[snafu(display(
        "atmosphere altitudes must be strictly ascending: row {row} has {altitude_m} m after {previous_m} m"
    ))]
    NotAscending {
        row: usize,
        altitude_m: f64,
        previous_m: f64,
    },
    #[snafu(display("invalid density {density} kg/m^3 at {altitude_m} m (row {row})"))]
    InvalidDensity {
        row: usize,
        altitude_m: f64,
        density: f64,
    },
}

/// Errors of the frame conversions.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CoordinateError {
    #[snafu(display("position vector has zero norm, the spherical coordinates are undefined"))]
    ZeroRadius,
    #[snafu(display("non finite Cartesian state: position {position_m}, velocity {velocity_m_s}"))]
    NonFiniteCartesian {
        position_m: Vector3<f64>,
        velocity_m_s: Vector3<f64>,
    },
    #[snafu(display("non finite spherical state {state}"))]
    NonFiniteSpherical { state: Vector6<f64> },
    #[snafu(display("finite differences need at least two positions, got {count}"))]
    TooFewPositions { count: usize },
    #[snafu(display("finite difference step must be strictly positive, got {step_s} s"))]
    NonPositiveStep { step_s: f64 },
}
