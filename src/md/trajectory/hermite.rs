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

/// Cubic Hermite interpolation between two states and their time derivatives.
///
/// The interpolant matches the states `y0`, `y1` and the derivatives `y0_dot`, `y1_dot` at `t0_s`
/// and `t1_s` respectively. It is third order accurate, which is consistent with the local error
/// of the adaptive integrators used to build the nodes.
pub fn hermite_interpolate(
    t_s: f64,
    t0_s: f64,
    y0: &Vector6<f64>,
    y0_dot: &Vector6<f64>,
    t1_s: f64,
    y1: &Vector6<f64>,
    y1_dot: &Vector6<f64>,
) -> Vector6<f64> {
    let h = t1_s - t0_s;
    let s = (t_s - t0_s) / h;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * y0 + (h10 * h) * y0_dot + h01 * y1 + (h11 * h) * y1_dot
}

#[test]
fn hermite_cubic_is_exact() {
    // y = t^3 - 2t on every component, with derivative 3t^2 - 2
    let y = |t: f64| Vector6::from_element(t.powi(3) - 2.0 * t);
    let y_dot = |t: f64| Vector6::from_element(3.0 * t.powi(2) - 2.0);
    let (t0, t1) = (0.5, 2.0);
    for t in [0.5, 0.7, 1.2, 1.999, 2.0] {
        let interp = hermite_interpolate(t, t0, &y(t0), &y_dot(t0), t1, &y(t1), &y_dot(t1));
        assert!((interp - y(t)).norm() < 1e-12, "failed at {t}");
    }
}
