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

/*! # edl-space

Atmospheric entry trajectories of planetary landers.

Given a planet (gravitational parameter, mean radius, tabulated atmosphere), a vehicle (ballistic
coefficient, lift-to-drag ratio), a bank angle law and an initial spherical state, this crate
integrates Vinh's entry equations with an adaptive Runge Kutta until a terminal event (typically
the parachute deployment altitude), resamples the trajectory on a fixed time grid and converts it
to planet centered Cartesian coordinates.

The single entry point is [`md::propagate_and_resample`].
*/

/// Provides the adaptive Runge Kutta integrators and their options.
pub mod propagators;

/// Provides the entry equations of motion and the bank angle guidance.
pub mod dynamics;

/// Provides the entry state, the planet and atmosphere models, and the frame conversions.
pub mod cosmic;

mod errors;
/// Functions which may fail return an error instead of panicking.
pub use self::errors::EntryError;

/// Configuration files, atmosphere tables, planet and vehicle catalogs, and Parquet export.
pub mod io;

/// Mission design: terminal events, trajectories, resampling and the entry driver.
pub mod md;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{CartesianState, EntryState, PlanetModel};
