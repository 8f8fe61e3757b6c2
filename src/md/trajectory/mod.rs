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

use snafu::prelude::*;

mod hermite;
mod resample;
mod traj;

pub use hermite::hermite_interpolate;
pub use resample::{uniform_grid, GRID_EPSILON_S};
pub use traj::{Traj, TrajNode};

#[derive(Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TrajError {
    #[snafu(display("No interpolation data at {t_s} s"))]
    NoInterpolationData { t_s: f64 },
    #[snafu(display("Requested {t_s} s is outside of the trajectory, which spans {start_s} s to {end_s} s"))]
    OutOfBounds { t_s: f64, start_s: f64, end_s: f64 },
    #[snafu(display("Failed to create trajectory: {msg}"))]
    CreationError { msg: String },
    #[snafu(display("resampling requires a strictly positive step, got {step_s} s"))]
    InvalidResampleStep { step_s: f64 },
    #[snafu(display("resampling yields {count} samples, at least two are required"))]
    TooFewSamples { count: usize },
}
