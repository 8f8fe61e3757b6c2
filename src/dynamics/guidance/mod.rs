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
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The `BankAngleLaw` trait returns the bank angle of the vehicle, i.e. the rotation of the lift
/// vector about the relative velocity. Zero bank is full lift up.
pub trait BankAngleLaw: fmt::Display + fmt::Debug + Send + Sync {
    /// Returns the bank angle in radians at the provided time since the start of the propagation.
    fn bank_angle_rad(&self, t_s: f64, state: &EntryState) -> f64;
}

/// A constant bank angle for the whole trajectory.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantBank {
    pub bank_rad: f64,
}

impl ConstantBank {
    pub const fn new(bank_rad: f64) -> Self {
        Self { bank_rad }
    }

    pub fn from_degrees(bank_deg: f64) -> Self {
        Self::new(bank_deg.to_radians())
    }
}

impl Default for ConstantBank {
    /// Thirty degrees, the nominal bank of the Mars Science Laboratory entry.
    fn default() -> Self {
        Self::from_degrees(30.0)
    }
}

impl fmt::Display for ConstantBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constant bank of {} deg", self.bank_rad.to_degrees())
    }
}

impl BankAngleLaw for ConstantBank {
    fn bank_angle_rad(&self, _t_s: f64, _state: &EntryState) -> f64 {
        self.bank_rad
    }
}

/// A piecewise constant bank angle schedule.
///
/// Each node is `(start time [s], bank angle [rad])`, and a node applies from its start time until
/// the start of the next node. Before the first node, the first bank angle is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankSchedule {
    nodes: Vec<(f64, f64)>,
}

impl BankSchedule {
    /// Builds a schedule from its nodes, sorted by start time. Returns None if there are no nodes.
    pub fn new(mut nodes: Vec<(f64, f64)>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(Self { nodes })
    }

    pub fn nodes(&self) -> &[(f64, f64)] {
        &self.nodes
    }
}

impl fmt::Display for BankSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bank schedule of {} nodes:", self.nodes.len())?;
        for (t_s, bank_rad) in &self.nodes {
            write!(f, " {} deg from {} s;", bank_rad.to_degrees(), t_s)?;
        }
        Ok(())
    }
}

impl BankAngleLaw for BankSchedule {
    fn bank_angle_rad(&self, t_s: f64, _state: &EntryState) -> f64 {
        let idx = self.nodes.partition_point(|(start_s, _)| *start_s <= t_s);
        self.nodes[idx.saturating_sub(1)].1
    }
}

#[cfg(test)]
mod ut_guidance {
    use super::*;

    #[test]
    fn constant() {
        let law = ConstantBank::default();
        let state = EntryState::default();
        assert!((law.bank_angle_rad(0.0, &state) - 0.5235987755982988).abs() < 1e-15);
        assert_eq!(law.bank_angle_rad(250.0, &state), law.bank_rad);
    }

    #[test]
    fn schedule() {
        assert!(BankSchedule::new(vec![]).is_none());
        let law = BankSchedule::new(vec![(100.0, 0.5), (0.0, 0.2), (200.0, -0.3)]).unwrap();
        let state = EntryState::default();
        assert_eq!(law.bank_angle_rad(-1.0, &state), 0.2);
        assert_eq!(law.bank_angle_rad(0.0, &state), 0.2);
        assert_eq!(law.bank_angle_rad(99.9, &state), 0.2);
        assert_eq!(law.bank_angle_rad(100.0, &state), 0.5);
        assert_eq!(law.bank_angle_rad(1e4, &state), -0.3);
    }
}
