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

use crate::cosmic::{CoordinateError, EntryState};
use crate::dynamics::DynamicsError;
use crate::md::trajectory::TrajError;
use crate::md::StateParameter;
use crate::propagators::PropagationError;
use crate::time::Duration;

/// Errors of an entry trajectory computation.
///
/// Every failure is local to a single run and carries the time and state context when there is one.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EntryError {
    #[snafu(display("termination index {index} is not a state component, expected 0 to 5"))]
    InvalidTerminationIndex { index: usize },
    #[snafu(display("unknown state parameter `{name}`"))]
    UnknownParameter { name: String },
    #[snafu(display(
        "{parameter} starts at {initial} {}, not above the termination threshold of {threshold} {}",
        parameter.unit(), parameter.unit()
    ))]
    StartsBelowThreshold {
        parameter: StateParameter,
        initial: f64,
        threshold: f64,
    },
    #[snafu(display(
        "{parameter} did not fall through {threshold} {} within {time_limit}, final state {state}",
        parameter.unit()
    ))]
    EventNotReached {
        parameter: StateParameter,
        threshold: f64,
        time_limit: Duration,
        state: EntryState,
    },
    #[snafu(display("singular geometry at t = {t_s} s with {state}: {source}"))]
    SingularGeometry {
        t_s: f64,
        state: EntryState,
        source: DynamicsError,
    },
    #[snafu(display("invalid initial state {state}: {reason}"))]
    InvalidState { state: EntryState, reason: String },
    #[snafu(display("output step must be strictly positive, got {step}"))]
    InvalidStep { step: Duration },
    #[snafu(display("resampled trajectory has {count} samples, not enough to build an output"))]
    TooFewSamples { count: usize },
    #[snafu(display("propagation failed: {source}"))]
    Propagation { source: PropagationError },
    #[snafu(display("trajectory error: {source}"))]
    Trajectory { source: TrajError },
    #[snafu(display("frame conversion failed: {source}"))]
    Coordinate { source: CoordinateError },
}

/// Dynamics failures are singular geometries, everything else is reported as is.
impl From<PropagationError> for EntryError {
    fn from(source: PropagationError) -> Self {
        match source {
            PropagationError::Dynamics { t_s, state, source } => Self::SingularGeometry {
                t_s,
                state,
                source,
            },
            source => Self::Propagation { source },
        }
    }
}

impl From<TrajError> for EntryError {
    fn from(source: TrajError) -> Self {
        match source {
            TrajError::TooFewSamples { count } => Self::TooFewSamples { count },
            source => Self::Trajectory { source },
        }
    }
}

impl From<CoordinateError> for EntryError {
    fn from(source: CoordinateError) -> Self {
        Self::Coordinate { source }
    }
}
