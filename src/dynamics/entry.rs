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

use super::{BankAngleLaw, Dynamics, DynamicsError};
use crate::cosmic::{AtmosphereLookup, EntryState, PlanetModel};
use crate::linalg::Vector6;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Below this magnitude, the cosine of the latitude or of the flight path angle is considered zero.
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

/// The aerodynamic parameters of the entry vehicle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// Ballistic coefficient m / (C_D A), in kg/m^2
    #[serde(alias = "beta")]
    pub ballistic_coeff_kg_m2: f64,
    /// Lift to drag ratio
    #[serde(alias = "LD")]
    pub lift_to_drag: f64,
}

impl VehicleParams {
    pub const fn new(ballistic_coeff_kg_m2: f64, lift_to_drag: f64) -> Self {
        Self {
            ballistic_coeff_kg_m2,
            lift_to_drag,
        }
    }

    /// The Mars Science Laboratory aeroshell.
    pub const fn msl() -> Self {
        Self::new(115.0, 0.24)
    }
}

impl fmt::Display for VehicleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "beta = {} kg/m^2, L/D = {}",
            self.ballistic_coeff_kg_m2, self.lift_to_drag
        )
    }
}

/// Entry dynamics of a lifting vehicle over a spherical, non rotating planet.
///
/// These are Vinh's equations with the density of the tabulated atmosphere of the planet and the
/// bank angle of the provided law. The first lookup outside of the atmosphere table is logged.
#[derive(Debug)]
pub struct EntryDynamics {
    pub planet: PlanetModel,
    pub vehicle: VehicleParams,
    pub guidance: Arc<dyn BankAngleLaw>,
    clamp_reported: AtomicBool,
}

impl EntryDynamics {
    pub fn new(
        planet: PlanetModel,
        vehicle: VehicleParams,
        guidance: Arc<dyn BankAngleLaw>,
    ) -> Self {
        Self {
            planet,
            vehicle,
            guidance,
            clamp_reported: AtomicBool::new(false),
        }
    }

    /// Returns an error if the equations of motion are singular or meaningless at this state.
    pub fn check_geometry(state: &EntryState) -> Result<(), DynamicsError> {
        if state.radius_m <= 0.0 {
            Err(DynamicsError::NonPositiveRadius {
                radius_m: state.radius_m,
            })
        } else if state.speed_m_s <= 0.0 {
            Err(DynamicsError::NonPositiveSpeed {
                speed_m_s: state.speed_m_s,
            })
        } else if state.latitude_rad.cos().abs() < SINGULARITY_TOLERANCE {
            Err(DynamicsError::PolarSingularity {
                latitude_rad: state.latitude_rad,
            })
        } else if state.fpa_rad.cos().abs() < SINGULARITY_TOLERANCE {
            Err(DynamicsError::VerticalFlightPath {
                fpa_rad: state.fpa_rad,
            })
        } else {
            Ok(())
        }
    }

    fn density(&self, t_s: f64, radius_m: f64) -> f64 {
        let lookup = self.planet.density_lookup(radius_m);
        if lookup.is_clamped() && !self.clamp_reported.swap(true, Ordering::Relaxed) {
            let side = match lookup {
                AtmosphereLookup::BelowTable(_) => "below",
                _ => "above",
            };
            debug!(
                "altitude of {:.3} m at t = {t_s:.6} s is {side} the atmosphere table of {}: density clamped to {:e} kg/m^3",
                self.planet.altitude_m(radius_m),
                self.planet.name,
                lookup.density()
            );
        }
        lookup.density()
    }
}

impl Clone for EntryDynamics {
    /// The clone reports its own first clamped lookup.
    fn clone(&self) -> Self {
        Self::new(self.planet.clone(), self.vehicle, self.guidance.clone())
    }
}

impl fmt::Display for EntryDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry dynamics at {} with {} and {}",
            self.planet.name, self.vehicle, self.guidance
        )
    }
}

impl Dynamics for EntryDynamics {
    fn eom(&self, t_s: f64, state_vec: &Vector6<f64>) -> Result<Vector6<f64>, DynamicsError> {
        let state = EntryState::from_vector(state_vec);
        Self::check_geometry(&state)?;

        let r = state.radius_m;
        let v = state.speed_m_s;
        let mu = self.planet.mu_m3_s2;
        let beta = self.vehicle.ballistic_coeff_kg_m2;
        let ld = self.vehicle.lift_to_drag;

        let rho = self.density(t_s, r);
        let sigma = self.guidance.bank_angle_rad(t_s, &state);

        let (s_gamma, c_gamma) = state.fpa_rad.sin_cos();
        let (s_psi, c_psi) = state.heading_rad.sin_cos();
        let (s_sigma, c_sigma) = sigma.sin_cos();
        let (s_phi, c_phi) = state.latitude_rad.sin_cos();

        // Dynamic pressure over ballistic coefficient, divided by the speed
        let q_beta = rho * v / (2.0 * beta);

        let r_dot = v * s_gamma;
        let theta_dot = v * c_gamma * c_psi / (r * c_phi);
        let phi_dot = v * c_gamma * s_psi / r;
        let v_dot = -q_beta * v - mu * s_gamma / r.powi(2);
        let gamma_dot = v * c_gamma / r + q_beta * ld * c_sigma - mu * c_gamma / (v * r.powi(2));
        let psi_dot =
            q_beta * ld * s_sigma / c_gamma - v * c_gamma * c_psi * s_phi / (c_phi * r);

        Ok(Vector6::new(
            r_dot, theta_dot, phi_dot, v_dot, gamma_dot, psi_dot,
        ))
    }
}

#[cfg(test)]
mod ut_entry_dynamics {
    use super::*;
    use crate::cosmic::AtmosphereTable;
    use crate::dynamics::ConstantBank;
    use std::f64::consts::FRAC_PI_2;

    fn dynamics(bank_rad: f64) -> EntryDynamics {
        let atm =
            AtmosphereTable::from_rows(&[(0.0, 1.5e-2), (10_000.0, 5.0e-3), (130_000.0, 0.0)])
                .unwrap();
        EntryDynamics::new(
            PlanetModel::mars(Arc::new(atm)),
            VehicleParams::msl(),
            Arc::new(ConstantBank::new(bank_rad)),
        )
    }

    #[test]
    fn vacuum_ballistic() {
        // Above the table the density is zero: only gravity acts.
        let entry = dynamics(0.3);
        let r = 3_396e3 + 200e3;
        let state = EntryState::new(r, 0.1, 0.2, 3_000.0, -0.1, 0.4);
        let deriv = entry.eom(0.0, &state.to_vector()).unwrap();
        let mu = 4.2828e13;
        assert!((deriv[0] - 3_000.0 * (-0.1_f64).sin()).abs() < 1e-9);
        assert!((deriv[3] + mu * (-0.1_f64).sin() / r.powi(2)).abs() < 1e-12);
        let gamma_dot = 3_000.0 * (-0.1_f64).cos() / r - mu * (-0.1_f64).cos() / (3_000.0 * r * r);
        assert!((deriv[4] - gamma_dot).abs() < 1e-15);
    }

    #[test]
    fn drag_and_lift() {
        let entry = dynamics(0.0);
        let r = 3_396e3 + 5_000.0;
        let state = EntryState::new(r, 0.0, 0.0, 1_000.0, 0.0, 0.0);
        let deriv = entry.eom(0.0, &state.to_vector()).unwrap();
        let rho = 1.0e-2;
        let drag = rho * 1_000.0_f64.powi(2) / (2.0 * 115.0);
        assert!((deriv[3] + drag).abs() < 1e-9);
        // Zero bank: all of the lift is in the vertical plane, no heading change at the equator.
        assert_eq!(deriv[5], 0.0);
        assert!(deriv[1] > 0.0);
        assert_eq!(deriv[2], 0.0);
    }

    #[test]
    fn singularities() {
        let entry = dynamics(0.5);
        let pole = EntryState::new(3_500e3, 0.0, FRAC_PI_2, 5e3, -0.2, 0.0);
        assert!(matches!(
            entry.eom(0.0, &pole.to_vector()),
            Err(DynamicsError::PolarSingularity { .. })
        ));
        let vertical = EntryState::new(3_500e3, 0.0, 0.1, 5e3, -FRAC_PI_2, 0.0);
        assert!(matches!(
            entry.eom(0.0, &vertical.to_vector()),
            Err(DynamicsError::VerticalFlightPath { .. })
        ));
        let stopped = EntryState::new(3_500e3, 0.0, 0.1, 0.0, -0.2, 0.0);
        assert!(matches!(
            entry.eom(0.0, &stopped.to_vector()),
            Err(DynamicsError::NonPositiveSpeed { .. })
        ));
        let center = EntryState::new(-1.0, 0.0, 0.1, 1.0, -0.2, 0.0);
        assert!(matches!(
            entry.eom(0.0, &center.to_vector()),
            Err(DynamicsError::NonPositiveRadius { .. })
        ));
    }
}
