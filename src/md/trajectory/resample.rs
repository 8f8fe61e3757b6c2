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

use super::{Traj, TrajError};
use crate::cosmic::EntryState;
use crate::time::Duration;

/// Tolerance added to the end of a uniform grid, so that a grid point which falls on the end time
/// up to rounding is kept.
pub const GRID_EPSILON_S: f64 = 1e-12;

/// Returns the times `0, step, 2 step, ...` up to `end_s` included.
///
/// Each time is computed as `k * step_s` and not by accumulation, so there is no drift over long grids.
pub fn uniform_grid(end_s: f64, step_s: f64) -> Result<Vec<f64>, TrajError> {
    if !(step_s > 0.0 && step_s.is_finite()) {
        return Err(TrajError::InvalidResampleStep { step_s });
    }
    if !(end_s >= 0.0 && end_s.is_finite()) {
        return Ok(Vec::new());
    }
    let count = ((end_s + GRID_EPSILON_S) / step_s).ceil() as usize;
    Ok((0..count).map(|k| k as f64 * step_s).collect())
}

impl Traj {
    /// Evaluates the dense output every `step` from the start of the trajectory until `end_s`.
    ///
    /// Grid times which exceed `end_s` by less than [`GRID_EPSILON_S`] are evaluated at `end_s` but
    /// reported at their grid time. At least two samples are required.
    pub fn resample(&self, end_s: f64, step: Duration) -> Result<Vec<(f64, EntryState)>, TrajError> {
        let grid = uniform_grid(end_s, step.to_seconds())?;
        if grid.len() < 2 {
            return Err(TrajError::TooFewSamples { count: grid.len() });
        }

        grid.into_iter()
            .map(|t_s| Ok((t_s, self.at(t_s.min(end_s))?)))
            .collect()
    }
}

#[cfg(test)]
mod ut_resample {
    use super::*;
    use crate::linalg::Vector6;
    use crate::time::Unit;

    #[test]
    fn grid() {
        let grid = uniform_grid(1.0, 0.25).unwrap();
        assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        // Within the epsilon, the end point is kept
        let grid = uniform_grid(1.0 - 5e-13, 0.25).unwrap();
        assert_eq!(grid.len(), 5);
        let grid = uniform_grid(0.99, 0.25).unwrap();
        assert_eq!(grid.len(), 4);
        let grid = uniform_grid(330.555, 0.02).unwrap();
        assert_eq!(grid.len(), 16_528);
        assert_eq!(grid[16_527], 16_527.0 * 0.02);
        assert_eq!(uniform_grid(0.0, 0.02).unwrap(), vec![0.0]);
        assert!(matches!(
            uniform_grid(1.0, 0.0),
            Err(TrajError::InvalidResampleStep { .. })
        ));
    }

    #[test]
    fn resample_descent() {
        let mut traj = Traj::new();
        let state_dot = Vector6::new(-50.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        traj.push(0.0, Vector6::new(3.4e6, 0.0, 0.0, 50.0, -1.0, 0.0), state_dot)
            .unwrap();
        traj.push(3.0, Vector6::new(3.4e6 - 150.0, 0.0, 0.0, 50.0, -1.0, 0.0), state_dot)
            .unwrap();
        let samples = traj.resample(2.9, 0.5 * Unit::Second).unwrap();
        assert_eq!(samples.len(), 6);
        for (k, (t_s, state)) in samples.iter().enumerate() {
            assert_eq!(*t_s, k as f64 * 0.5);
            assert!((state.radius_m - (3.4e6 - 50.0 * t_s)).abs() < 1e-6);
        }
        assert_eq!(
            traj.resample(0.4, 0.5 * Unit::Second),
            Err(TrajError::TooFewSamples { count: 1 })
        );
    }
}
