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
use std::fmt;

/// An error controller turns the local error estimate of a step into a single scalar, normalized
/// by the tolerances: the step is accepted when this scalar is at most one.
///
/// Each component `i` is scaled by `abs_tol + rel_tol * max(|y_i|, |y'_i|)` where `y` is the current
/// state and `y'` the candidate state, so that the radius (in meters) and the angles (in radians)
/// are controlled on an equal footing.
pub trait ErrorCtrl: Copy + Default + Send + Sync + fmt::Debug {
    /// Computes the normalized error of the provided error estimate `error_est`.
    fn estimate(
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
        rel_tol: f64,
        abs_tol: f64,
    ) -> f64;
}

/// Scaled error of each component of the estimate.
fn scaled_errors<'a>(
    error_est: &'a Vector6<f64>,
    candidate: &'a Vector6<f64>,
    cur_state: &'a Vector6<f64>,
    rel_tol: f64,
    abs_tol: f64,
) -> impl Iterator<Item = f64> + 'a {
    error_est
        .iter()
        .zip(candidate.iter().zip(cur_state.iter()))
        .map(move |(err, (cand, cur))| {
            let scale = abs_tol + rel_tol * cand.abs().max(cur.abs());
            err / scale
        })
}

/// Root mean square of the scaled error: when in doubt, use this error controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct RmsScaled;

impl ErrorCtrl for RmsScaled {
    fn estimate(
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
        rel_tol: f64,
        abs_tol: f64,
    ) -> f64 {
        let sum_sq: f64 = scaled_errors(error_est, candidate, cur_state, rel_tol, abs_tol)
            .map(|e| e * e)
            .sum();
        (sum_sq / 6.0).sqrt()
    }
}

/// Largest scaled error of all of the components, more stringent than [`RmsScaled`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LargestScaled;

impl ErrorCtrl for LargestScaled {
    fn estimate(
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
        rel_tol: f64,
        abs_tol: f64,
    ) -> f64 {
        scaled_errors(error_est, candidate, cur_state, rel_tol, abs_tol)
            .map(f64::abs)
            .fold(0.0, f64::max)
    }
}

#[test]
fn test_error_ctrl() {
    let cur = Vector6::new(3.5e6, 0.1, 0.2, 5e3, -0.2, 0.0);
    let cand = Vector6::new(3.49e6, 0.1, 0.2, 4.9e3, -0.21, 0.0);
    let zero = Vector6::zeros();
    assert_eq!(RmsScaled::estimate(&zero, &cand, &cur, 1e-9, 1e-9), 0.0);
    assert_eq!(LargestScaled::estimate(&zero, &cand, &cur, 1e-9, 1e-9), 0.0);

    // An error of exactly the tolerance on the radius only
    let mut err = Vector6::zeros();
    err[0] = 1e-3 + 1e-9 * 3.5e6;
    assert!((LargestScaled::estimate(&err, &cand, &cur, 1e-9, 1e-3) - 1.0).abs() < 1e-12);
    assert!(
        (RmsScaled::estimate(&err, &cand, &cur, 1e-9, 1e-3) - 1.0 / 6.0_f64.sqrt()).abs() < 1e-12
    );
    // Signs do not matter
    assert_eq!(
        LargestScaled::estimate(&-err, &cand, &cur, 1e-9, 1e-3),
        LargestScaled::estimate(&err, &cand, &cur, 1e-9, 1e-3)
    );
}
