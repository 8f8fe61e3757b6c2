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

use super::{hermite_interpolate, TrajError};
use crate::cosmic::EntryState;
use crate::linalg::Vector6;
use std::fmt;

/// A node of the dense output: an accepted integration step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajNode {
    /// Time since the start of the propagation, in seconds
    pub t_s: f64,
    pub state: Vector6<f64>,
    /// Time derivative of the state
    pub state_dot: Vector6<f64>,
}

impl TrajNode {
    pub fn entry_state(&self) -> EntryState {
        EntryState::from_vector(&self.state)
    }
}

/// Store a trajectory of entry states, with a cubic Hermite dense output between the nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Traj {
    /// Optionally name this trajectory
    pub name: Option<String>,
    /// We use a vector because we know that the nodes are produced in a chronological manner.
    pub nodes: Vec<TrajNode>,
}

impl Traj {
    pub fn new() -> Self {
        Self {
            name: None,
            nodes: Vec::new(),
        }
    }

    /// Appends a node, which must be strictly after the last node.
    pub fn push(
        &mut self,
        t_s: f64,
        state: Vector6<f64>,
        state_dot: Vector6<f64>,
    ) -> Result<(), TrajError> {
        if let Some(last) = self.nodes.last() {
            if t_s <= last.t_s {
                return Err(TrajError::CreationError {
                    msg: format!("node at {t_s} s is not after the last node at {} s", last.t_s),
                });
            }
        }
        self.nodes.push(TrajNode {
            t_s,
            state,
            state_dot,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the first node of this trajectory, if any.
    pub fn first(&self) -> Option<&TrajNode> {
        self.nodes.first()
    }

    /// Returns the last node of this trajectory, if any.
    pub fn last(&self) -> Option<&TrajNode> {
        self.nodes.last()
    }

    /// Iterates over the nodes as entry states, with their time.
    pub fn states(&self) -> impl Iterator<Item = (f64, EntryState)> + '_ {
        self.nodes.iter().map(|node| (node.t_s, node.entry_state()))
    }

    /// Evaluates the dense output at the provided time, which must be within the trajectory.
    pub fn at_vector(&self, t_s: f64) -> Result<Vector6<f64>, TrajError> {
        let (first, last) = match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TrajError::NoInterpolationData { t_s }),
        };

        if t_s.is_nan() || t_s < first.t_s || t_s > last.t_s {
            return Err(TrajError::OutOfBounds {
                t_s,
                start_s: first.t_s,
                end_s: last.t_s,
            });
        }

        // Index of the first node strictly after the requested time
        let idx = self.nodes.partition_point(|node| node.t_s <= t_s);
        if idx == 0 {
            return Err(TrajError::NoInterpolationData { t_s });
        }
        let before = &self.nodes[idx - 1];
        if before.t_s == t_s || idx == self.nodes.len() {
            // Exactly on a node, which includes the last one
            return Ok(before.state);
        }
        let after = &self.nodes[idx];

        Ok(hermite_interpolate(
            t_s,
            before.t_s,
            &before.state,
            &before.state_dot,
            after.t_s,
            &after.state,
            &after.state_dot,
        ))
    }

    /// Evaluates the dense output at the provided time, which must be within the trajectory.
    pub fn at(&self, t_s: f64) -> Result<EntryState, TrajError> {
        Ok(EntryState::from_vector(&self.at_vector(t_s)?))
    }
}

impl fmt::Display for Traj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "Trajectory {}from {} s to {} s ({} nodes)",
                match &self.name {
                    Some(name) => format!("{name} "),
                    None => String::new(),
                },
                first.t_s,
                last.t_s,
                self.len()
            ),
            _ => write!(f, "Empty trajectory"),
        }
    }
}

#[cfg(test)]
mod ut_traj {
    use super::*;

    /// Constant velocity radial descent: r = r0 - 100 t
    fn descent() -> Traj {
        let mut traj = Traj::new();
        for i in 0..5 {
            let t = f64::from(i) * 2.5;
            let state = Vector6::new(3.5e6 - 100.0 * t, 0.1, 0.2, 100.0, -1.0, 0.0);
            let state_dot = Vector6::new(-100.0, 0.0, 0.0, 0.0, 0.0, 0.0);
            traj.push(t, state, state_dot).unwrap();
        }
        traj
    }

    #[test]
    fn dense_output() {
        let traj = descent();
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.at(0.0).unwrap().radius_m, 3.5e6);
        assert_eq!(traj.at(10.0).unwrap().radius_m, 3.5e6 - 1_000.0);
        for t in [0.3, 2.5, 4.1, 7.77, 9.999] {
            let state = traj.at(t).unwrap();
            assert!((state.radius_m - (3.5e6 - 100.0 * t)).abs() < 1e-6);
            assert!((state.latitude_rad - 0.2).abs() < 1e-15);
        }
    }

    #[test]
    fn bounds() {
        let traj = descent();
        assert!(matches!(
            traj.at(-1e-9),
            Err(TrajError::OutOfBounds { .. })
        ));
        assert!(matches!(
            traj.at(10.000001),
            Err(TrajError::OutOfBounds { .. })
        ));
        assert_eq!(
            Traj::new().at(0.0),
            Err(TrajError::NoInterpolationData { t_s: 0.0 })
        );
        let mut traj = descent();
        assert!(traj.push(10.0, Vector6::zeros(), Vector6::zeros()).is_err());
    }
}
