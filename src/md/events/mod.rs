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

pub mod details;
pub mod search;
pub use details::{EventDetails, EventEdge};

use super::StateParameter;
use crate::cosmic::EntryState;
use crate::md::trajectory::TrajError;
use crate::time::{Duration, Unit};
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;

/// A trait to specify how a specific event must be evaluated.
pub trait EventEvaluator: fmt::Display + Send + Sync {
    // Evaluation of event crossing, must return whether the condition happened between between both states.
    fn eval_crossing(&self, prev_state: &EntryState, next_state: &EntryState) -> bool {
        self.eval(prev_state) * self.eval(next_state) < 0.0
    }

    /// Evaluation of the event, must return a value corresponding to whether the state is before or after the event
    fn eval(&self, state: &EntryState) -> f64;
    /// Returns a string representation of the event evaluation for the given state
    fn eval_string(&self, state: &EntryState) -> String;
    fn epoch_precision(&self) -> Duration;
    fn value_precision(&self) -> f64;
}

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EventError {
    #[snafu(display("{event} not found between {start_s} s and {end_s} s"))]
    NotFound {
        start_s: f64,
        end_s: f64,
        event: String,
    },
    #[snafu(display("event search failed on the trajectory: {source}"))]
    EventTraj { source: TrajError },
}

/// Defines a state parameter event finder: the event function is the parameter minus the desired value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The state parameter
    pub parameter: StateParameter,
    /// The desired value, must be in the same units as the state parameter
    pub desired_value: f64,
    /// The duration precision after which the solver will report that it cannot find any more precise
    pub epoch_precision: Duration,
    /// The precision on the desired value
    pub value_precision: f64,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parameter)?;
        if self.desired_value.abs() > 1e3 {
            write!(
                f,
                " = {:e} {} (± {:e} {})",
                self.desired_value,
                self.parameter.unit(),
                self.value_precision,
                self.parameter.unit()
            )
        } else {
            write!(
                f,
                " = {} {} (± {} {})",
                self.desired_value,
                self.parameter.unit(),
                self.value_precision,
                self.parameter.unit()
            )
        }
    }
}

impl Event {
    /// Match a specific event for the parameter to hit the specified value.
    /// By default, the time precision is 1 nanosecond and the value precision is the default
    /// precision of that parameter: micrometers for the radius, nanometers per second for the
    /// velocity, and picoradians for the angles.
    pub fn new(parameter: StateParameter, desired_value: f64) -> Self {
        Self::within_tolerance(
            parameter,
            desired_value,
            parameter.default_event_precision(),
        )
    }

    /// Match a specific event for the parameter to hit the specified value with the provided tolerance on the value
    pub fn within_tolerance(
        parameter: StateParameter,
        desired_value: f64,
        value_precision: f64,
    ) -> Self {
        Self::specific(parameter, desired_value, value_precision, Unit::Nanosecond)
    }

    /// Match a specific event for the parameter to hit the specified value with the provided tolerance on the value and time
    pub fn specific(
        parameter: StateParameter,
        desired_value: f64,
        value_precision: f64,
        unit_precision: Unit,
    ) -> Self {
        Self {
            parameter,
            desired_value,
            epoch_precision: 1 * unit_precision,
            value_precision,
        }
    }
}

impl EventEvaluator for Event {
    fn eval(&self, state: &EntryState) -> f64 {
        state.value(self.parameter) - self.desired_value
    }

    fn eval_string(&self, state: &EntryState) -> String {
        format!(
            "{} = {:.9} {} (target {} {})",
            self.parameter,
            state.value(self.parameter),
            self.parameter.unit(),
            self.desired_value,
            self.parameter.unit()
        )
    }

    fn epoch_precision(&self) -> Duration {
        self.epoch_precision
    }

    fn value_precision(&self) -> f64 {
        self.value_precision
    }
}

#[cfg(test)]
mod ut_event {
    use super::*;

    #[test]
    fn radius_event() {
        let event = Event::new(StateParameter::Radius, 3_402_500.0);
        assert_eq!(event.epoch_precision, 1 * Unit::Nanosecond);
        let above = EntryState::new(3_403_000.0, 0.0, 0.0, 500.0, -0.3, 0.0);
        let below = EntryState::new(3_402_000.0, 0.0, 0.0, 500.0, -0.3, 0.0);
        assert_eq!(event.eval(&above), 500.0);
        assert_eq!(event.eval(&below), -500.0);
        assert!(event.eval_crossing(&above, &below));
        assert!(!event.eval_crossing(&above, &above));
        assert_eq!(format!("{event}"), "radius = 3.4025e6 m (± 1e-6 m)");
    }
}
