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
use std::fmt;

/// Provides different methods for controlling the error computation of the integrator.
pub mod error_ctrl;
pub use self::error_ctrl::*;

// Re-Export
mod instance;
pub use instance::*;
mod propagator;
pub use propagator::*;
mod rk_methods;
pub use rk_methods::*;
mod options;
pub use options::*;

use crate::cosmic::EntryState;
use crate::dynamics::DynamicsError;
use crate::md::events::EventError;
use crate::md::trajectory::TrajError;
use crate::time::Duration;

/// Stores the details of the previous integration step of a given propagator. Access as `my_prop.clone().latest_details()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegrationDetails {
    /// step size used
    pub step: Duration,
    /// normalized error in the previous integration step, at most one unless the step was forced
    pub error: f64,
    /// number of attempts needed by an adaptive step size to be within the tolerance
    pub attempts: u8,
}

impl fmt::Display for IntegrationDetails {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "IntegrationDetails {{step: {}, error: {:.3e}, attempts: {}}}",
            self.step, self.error, self.attempts
        )
    }
}

/// Counters of a whole propagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PropStats {
    /// Number of accepted steps
    pub accepted_steps: usize,
    /// Number of step attempts rejected because of the error control
    pub rejected_steps: usize,
    /// Number of evaluations of the equations of motion
    pub evaluations: usize,
}

impl fmt::Display for PropStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} accepted steps, {} rejected attempts, {} derivative evaluations",
            self.accepted_steps, self.rejected_steps, self.evaluations
        )
    }
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PropagationError {
    #[snafu(display("encountered a dynamics error at t = {t_s} s with {state}: {source}"))]
    Dynamics {
        t_s: f64,
        state: EntryState,
        source: DynamicsError,
    },
    #[snafu(display("{event} not reached within {time_limit}, final state {state}"))]
    EventNotReached {
        event: String,
        time_limit: Duration,
        state: EntryState,
    },
    #[snafu(display("when refining the event: {source}"))]
    EventSearch { source: EventError },
    #[snafu(display("when building the trajectory: {source}"))]
    Trajectory { source: TrajError },
}
