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

use crate::linalg::Vector6;
use snafu::Snafu;

/// Vinh's equations of motion of a lifting vehicle in a planetary atmosphere.
pub mod entry;
pub use self::entry::*;

/// Bank angle laws.
pub mod guidance;
pub use self::guidance::{BankAngleLaw, BankSchedule, ConstantBank};

/// A trait for models with equations of motion that can be integrated.
///
/// The state vector is the spherical entry state `[r, theta, phi, V, gamma, psi]`.
pub trait Dynamics: Clone + Sync + Send {
    /// Defines the equations of motion.
    ///
    /// - `t_s`: Time in seconds since the start of the propagation.
    /// - `state_vec`: The state vector, which changes at each integration step.
    fn eom(&self, t_s: f64, state_vec: &Vector6<f64>) -> Result<Vector6<f64>, DynamicsError>;
}

/// Errors of the equations of motion.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// The longitude rate is singular at the poles.
    #[snafu(display("latitude of {latitude_rad} rad is at a pole"))]
    PolarSingularity { latitude_rad: f64 },
    /// The heading rate is singular for vertical flight.
    #[snafu(display("flight path angle of {fpa_rad} rad is vertical"))]
    VerticalFlightPath { fpa_rad: f64 },
    #[snafu(display("radius must be strictly positive, got {radius_m} m"))]
    NonPositiveRadius { radius_m: f64 },
    #[snafu(display("speed must be strictly positive, got {speed_m_s} m/s"))]
    NonPositiveSpeed { speed_m_s: f64 },
    /// Caught by the integrator on any derivative evaluation.
    #[snafu(display("non finite state derivative {derivative}"))]
    NonFiniteDerivative { derivative: Vector6<f64> },
}
