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

use crate::cosmic::EntryState;
use crate::md::trajectory::Traj;
use crate::md::EventEvaluator;
use crate::time::{Duration, Unit};
use core::fmt;

/// Enumerates the possible edges of an event in a trajectory.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventEdge {
    /// The event function goes from negative to positive values.
    Rising,
    /// The event function goes from positive to negative values, e.g. the radius falling through the deployment altitude.
    Falling,
    /// If the edge cannot be clearly defined, it will be marked as unclear. This happens if the event is at a saddle point and the epoch precision is too large to find the exact slope.
    Unclear,
}

/// Represents the details of an event occurring along a trajectory.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDetails {
    /// Time of the event since the start of the propagation, in seconds
    pub t_s: f64,
    /// The state of the trajectory at the found event.
    pub state: EntryState,
    /// Indicates whether the event is a rising edge, falling edge, or unclear.
    pub edge: EventEdge,
    /// Numerical evaluation of the event condition, near zero
    pub value: f64,
    /// Numerical evaluation of the event condition one epoch precision before the found event (used to compute the rising/falling edge).
    pub prev_value: Option<f64>,
    /// Numerical evaluation of the event condition one epoch precision after the found event (used to compute the rising/falling edge).
    pub next_value: Option<f64>,
    /// Precision of the epoch for this value
    pub pm_duration: Duration,
    // Store the representation of this event as a string because we can't move or clone the event reference
    pub repr: String,
}

impl EventDetails {
    /// Generates detailed information about an event at a specific time in a trajectory.
    ///
    /// The edge of the event is determined by comparing the event's value at the found time with
    /// its value one epoch precision before and after, when the trajectory covers those times.
    pub fn new<E: EventEvaluator>(
        t_s: f64,
        state: EntryState,
        value: f64,
        event: &E,
        traj: &Traj,
    ) -> Self {
        // Use at least a microsecond to probe the slope, the time precision may be below the float resolution
        let probe_s = event
            .epoch_precision()
            .to_seconds()
            .max((1 * Unit::Microsecond).to_seconds());
        let prev_value = traj.at(t_s - probe_s).ok().map(|state| event.eval(&state));
        let next_value = traj.at(t_s + probe_s).ok().map(|state| event.eval(&state));

        let edge = if let Some(prev_value) = prev_value {
            if let Some(next_value) = next_value {
                if prev_value > value && value > next_value {
                    EventEdge::Falling
                } else if prev_value < value && value < next_value {
                    EventEdge::Rising
                } else {
                    warn!("could not determine edge of {event} at {t_s} s");
                    EventEdge::Unclear
                }
            } else if prev_value > value {
                EventEdge::Falling
            } else {
                EventEdge::Rising
            }
        } else if let Some(next_value) = next_value {
            if next_value > value {
                EventEdge::Rising
            } else {
                EventEdge::Falling
            }
        } else {
            warn!("could not determine edge of {event} because the trajectory could not be queried around {t_s} s");
            EventEdge::Unclear
        };

        EventDetails {
            t_s,
            edge,
            state,
            value,
            prev_value,
            next_value,
            pm_duration: event.epoch_precision(),
            repr: event.eval_string(&state),
        }
    }
}

impl fmt::Display for EventDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prev_fmt = match self.prev_value {
            Some(value) => format!("{value:.6}"),
            None => "".to_string(),
        };

        let next_fmt = match self.next_value {
            Some(value) => format!("{value:.6}"),
            None => "".to_string(),
        };

        write!(
            f,
            "{} at t = {:.9} s and is {:?} (roots with {} intervals: {}, {:.6}, {})",
            self.repr, self.t_s, self.edge, self.pm_duration, prev_fmt, self.value, next_fmt
        )
    }
}
