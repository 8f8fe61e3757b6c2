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

use super::catalog::{Catalog, CatalogError};
use super::{parameter_from_index_or_name, ConfigRepr};
use crate::cosmic::{cartesian_to_spherical, CoordinateError, EntryState};
use crate::dynamics::{BankAngleLaw, BankSchedule, ConstantBank};
use crate::linalg::Vector3;
use crate::md::{EntryScenario, StateParameter, TerminationSpec};
use crate::time::{Duration, Unit};
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_PLANET: &str = "mars";
pub const DEFAULT_VEHICLE: &str = "default";
/// Entry interface altitude, in meters
pub const DEFAULT_H0_M: f64 = 124_999.0;
pub const DEFAULT_VEL0_M_S: f64 = 6_083.6;
pub const DEFAULT_THETA0_DEG: f64 = -78.8618;
pub const DEFAULT_PHI0_DEG: f64 = 27.1050;
pub const DEFAULT_GAMMA0_DEG: f64 = -15.5;
pub const DEFAULT_PSI0_DEG: f64 = 0.0;
pub const DEFAULT_BANK_DEG: f64 = 30.0;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ScenarioError {
    #[snafu(display("{source}"))]
    ScenarioCatalog { source: CatalogError },
    #[snafu(display("Cartesian initial conditions: {source}"))]
    ScenarioCoordinates { source: CoordinateError },
    #[snafu(display("no default threshold for {parameter}, set `threshold` in the termination"))]
    NoDefaultThreshold { parameter: StateParameter },
    #[snafu(display("{which} must be finite and strictly positive, got {value} s"))]
    InvalidDuration { which: &'static str, value: f64 },
    #[snafu(display("bank schedule must have at least one node with finite values"))]
    InvalidBankSchedule,
}

/// The coordinates of the initial conditions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordType {
    Spherical,
    Cartesian,
}

/// Initial conditions of a scenario, tagged by `coord_type`.
///
/// Angles are in radians, distances in meters and speeds in m/s. Missing spherical components
/// use the nominal MSL entry interface.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "coord_type", rename_all = "snake_case")]
pub enum InitialConditions {
    Spherical {
        /// Altitude above the mean radius
        h0: Option<f64>,
        vel0: Option<f64>,
        theta0: Option<f64>,
        phi0: Option<f64>,
        gamma0: Option<f64>,
        psi0: Option<f64>,
    },
    /// Planet centered position and velocity
    Cartesian {
        x: f64,
        y: f64,
        z: f64,
        vx: f64,
        vy: f64,
        vz: f64,
    },
}

impl InitialConditions {
    pub fn coord_type(&self) -> CoordType {
        match self {
            Self::Spherical { .. } => CoordType::Spherical,
            Self::Cartesian { .. } => CoordType::Cartesian,
        }
    }

    /// Returns the entry state above a planet of the provided mean radius.
    pub fn to_state(&self, mean_radius_m: f64) -> Result<EntryState, CoordinateError> {
        match *self {
            Self::Spherical {
                h0,
                vel0,
                theta0,
                phi0,
                gamma0,
                psi0,
            } => Ok(EntryState::new(
                mean_radius_m + h0.unwrap_or(DEFAULT_H0_M),
                theta0.unwrap_or(DEFAULT_THETA0_DEG.to_radians()),
                phi0.unwrap_or(DEFAULT_PHI0_DEG.to_radians()),
                vel0.unwrap_or(DEFAULT_VEL0_M_S),
                gamma0.unwrap_or(DEFAULT_GAMMA0_DEG.to_radians()),
                psi0.unwrap_or(DEFAULT_PSI0_DEG.to_radians()),
            )),
            Self::Cartesian {
                x,
                y,
                z,
                vx,
                vy,
                vz,
            } => cartesian_to_spherical(&Vector3::new(x, y, z), &Vector3::new(vx, vy, vz)),
        }
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self::Spherical {
            h0: None,
            vel0: None,
            theta0: None,
            phi0: None,
            gamma0: None,
            psi0: None,
        }
    }
}

/// The terminal condition of a scenario, where durations are in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminationSerde {
    /// Monitored component, by name or by index in the state vector (0 is the radius)
    #[serde(
        default,
        alias = "index",
        deserialize_with = "parameter_from_index_or_name"
    )]
    pub parameter: Option<StateParameter>,
    pub threshold: Option<f64>,
    pub time_limit_s: Option<f64>,
    pub step_s: Option<f64>,
    pub trim_endpoints: Option<bool>,
}

/// An entry scenario, as written in a YAML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSerde {
    #[serde(default, alias = "planet_name")]
    pub planet: Option<String>,
    #[serde(default, alias = "vehicle_name")]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub init: Option<InitialConditions>,
    /// Constant bank angle, in radians
    #[serde(default)]
    pub bank_angle: Option<f64>,
    /// `[start time (s), bank angle (rad)]` nodes, overrides the constant bank angle
    #[serde(default)]
    pub bank_schedule: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub termination: Option<TerminationSerde>,
}

impl ConfigRepr for ScenarioSerde {}

impl ScenarioSerde {
    /// Resolves the names from the catalog and fills the missing fields with the nominal MSL entry.
    pub fn to_scenario(&self, catalog: &Catalog) -> Result<EntryScenario, ScenarioError> {
        let planet = catalog
            .planet(self.planet.as_deref().unwrap_or(DEFAULT_PLANET))
            .context(ScenarioCatalogSnafu)?;
        let vehicle = catalog
            .vehicle(self.vehicle.as_deref().unwrap_or(DEFAULT_VEHICLE))
            .context(ScenarioCatalogSnafu)?;

        let init_state = self
            .init
            .unwrap_or_default()
            .to_state(planet.mean_radius_m)
            .context(ScenarioCoordinatesSnafu)?;

        let control: Arc<dyn BankAngleLaw> = match &self.bank_schedule {
            Some(nodes) => {
                ensure!(
                    nodes.iter().all(|(t, b)| t.is_finite() && b.is_finite()),
                    InvalidBankScheduleSnafu
                );
                Arc::new(BankSchedule::new(nodes.clone()).context(InvalidBankScheduleSnafu)?)
            }
            None => Arc::new(match self.bank_angle {
                Some(bank_rad) => ConstantBank::new(bank_rad),
                None => ConstantBank::from_degrees(DEFAULT_BANK_DEG),
            }),
        };

        let term = self.termination.unwrap_or_default();
        let parameter = term.parameter.unwrap_or(StateParameter::Radius);
        let threshold = match term.threshold {
            Some(threshold) => threshold,
            None => TerminationSpec::default_threshold(parameter, &planet)
                .context(NoDefaultThresholdSnafu { parameter })?,
        };

        let termination = TerminationSpec::builder()
            .parameter(parameter)
            .threshold(threshold)
            .time_limit(seconds("time_limit_s", term.time_limit_s, 1000.0)?)
            .step(seconds("step_s", term.step_s, 0.02)?)
            .trim_endpoints(term.trim_endpoints.unwrap_or(true))
            .build();

        Ok(EntryScenario {
            planet,
            init_state,
            vehicle,
            control,
            termination,
        })
    }
}

fn seconds(
    which: &'static str,
    value: Option<f64>,
    default: f64,
) -> Result<Duration, ScenarioError> {
    let value = value.unwrap_or(default);
    ensure!(
        value.is_finite() && value > 0.0,
        InvalidDurationSnafu { which, value }
    );
    Ok(value * Unit::Second)
}

impl fmt::Display for ScenarioSerde {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry of `{}` on `{}`",
            self.vehicle.as_deref().unwrap_or(DEFAULT_VEHICLE),
            self.planet.as_deref().unwrap_or(DEFAULT_PLANET)
        )
    }
}
