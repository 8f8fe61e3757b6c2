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

use crate::linalg::Matrix3;

/// Direction cosine matrix from the local East-North-Up frame to the planet fixed frame.
///
/// The columns are the East, North and Up unit vectors at the provided longitude `theta_rad` and
/// latitude `phi_rad`, expressed in the planet fixed frame. Its transpose rotates planet fixed
/// vectors into the local frame.
pub fn dcm_enu_to_ecef(theta_rad: f64, phi_rad: f64) -> Matrix3<f64> {
    let (s_theta, c_theta) = theta_rad.sin_cos();
    let (s_phi, c_phi) = phi_rad.sin_cos();
    Matrix3::new(
        -s_theta,
        -c_theta * s_phi,
        c_theta * c_phi,
        c_theta,
        -s_theta * s_phi,
        s_theta * c_phi,
        0.0,
        c_phi,
        s_phi,
    )
}

/// Direction cosine matrix from the planet fixed frame to the local East-North-Up frame.
pub fn dcm_ecef_to_enu(theta_rad: f64, phi_rad: f64) -> Matrix3<f64> {
    dcm_enu_to_ecef(theta_rad, phi_rad).transpose()
}
