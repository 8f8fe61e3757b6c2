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

use super::{load_atmosphere, ConfigError, ConfigRepr, InputOutputError};
use crate::cosmic::{AtmosphereTable, PlanetModel};
use crate::dynamics::VehicleParams;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CatalogError {
    #[snafu(display("planet `{name}` not found, available planets: {available:?}"))]
    UnknownPlanet {
        name: String,
        available: Vec<String>,
    },
    #[snafu(display("vehicle `{name}` not found, available vehicles: {available:?}"))]
    UnknownVehicle {
        name: String,
        available: Vec<String>,
    },
    #[snafu(display("catalog configuration: {source}"))]
    CatalogConfig { source: ConfigError },
    #[snafu(display("atmosphere of `{name}`: {source}"))]
    PlanetAtmosphere {
        name: String,
        source: InputOutputError,
    },
}

/// A planet as written in the catalog file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetSerde {
    /// Gravitational parameter, in m^3/s^2
    #[serde(alias = "mu")]
    pub mu_m3_s2: f64,
    /// Mean radius, in meters
    #[serde(alias = "rp")]
    pub mean_radius_m: f64,
    /// Path to the atmosphere table, relative to the catalog file
    pub atmosphere: PathBuf,
}

/// The catalog file: planets and vehicles by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSerde {
    #[serde(default)]
    pub planets: BTreeMap<String, PlanetSerde>,
    #[serde(default)]
    pub vehicles: BTreeMap<String, VehicleParams>,
}

impl ConfigRepr for CatalogSerde {}

/// A read only registry of the planets and vehicles available to the scenarios.
///
/// Names are case insensitive.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    planets: BTreeMap<String, PlanetModel>,
    vehicles: BTreeMap<String, VehicleParams>,
}

impl Catalog {
    /// The built-in catalog: Mars with the provided atmosphere, and the `default` vehicle (MSL).
    pub fn builtin(mars_atmosphere: Arc<AtmosphereTable>) -> Self {
        Self::default()
            .with_planet(PlanetModel::mars(mars_atmosphere))
            .with_vehicle("default", VehicleParams::msl())
    }

    /// Loads a catalog from a YAML file, and the atmosphere table of each of its planets.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let repr = CatalogSerde::load(path.as_ref()).context(CatalogConfigSnafu)?;
        let root = path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_config(repr, root)
    }

    /// Builds the catalog from its representation, resolving the atmosphere paths from `root`.
    pub fn from_config(repr: CatalogSerde, root: PathBuf) -> Result<Self, CatalogError> {
        let mut me = Self::default();
        for (name, planet) in repr.planets {
            let table = load_atmosphere(root.join(&planet.atmosphere))
                .context(PlanetAtmosphereSnafu { name: name.clone() })?;
            me = me.with_planet(PlanetModel::new(
                name,
                planet.mu_m3_s2,
                planet.mean_radius_m,
                Arc::new(table),
            ));
        }
        for (name, vehicle) in repr.vehicles {
            me = me.with_vehicle(&name, vehicle);
        }
        debug!("{me}");
        Ok(me)
    }

    /// Adds or replaces a planet, registered under its name.
    pub fn with_planet(mut self, planet: PlanetModel) -> Self {
        self.planets.insert(planet.name.to_lowercase(), planet);
        self
    }

    /// Adds or replaces a vehicle.
    pub fn with_vehicle(mut self, name: &str, vehicle: VehicleParams) -> Self {
        self.vehicles.insert(name.to_lowercase(), vehicle);
        self
    }

    pub fn planet(&self, name: &str) -> Result<PlanetModel, CatalogError> {
        self.planets
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| CatalogError::UnknownPlanet {
                name: name.to_string(),
                available: self.planet_names(),
            })
    }

    pub fn vehicle(&self, name: &str) -> Result<VehicleParams, CatalogError> {
        self.vehicles
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| CatalogError::UnknownVehicle {
                name: name.to_string(),
                available: self.vehicle_names(),
            })
    }

    pub fn planet_names(&self) -> Vec<String> {
        self.planets.keys().cloned().collect()
    }

    pub fn vehicle_names(&self) -> Vec<String> {
        self.vehicles.keys().cloned().collect()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "catalog with planets {:?} and vehicles {:?}",
            self.planet_names(),
            self.vehicle_names()
        )
    }
}

#[cfg(test)]
mod ut_catalog {
    use super::*;

    fn catalog() -> Catalog {
        let atm = AtmosphereTable::from_rows(&[(0.0, 0.02), (125e3, 1e-8)]).unwrap();
        Catalog::builtin(Arc::new(atm))
    }

    #[test]
    fn case_insensitive() {
        let cat = catalog();
        assert_eq!(cat.planet("Mars").unwrap().mu_m3_s2, 4.2828e13);
        assert_eq!(cat.planet("MARS").unwrap().mean_radius_m, 3396e3);
        assert_eq!(cat.vehicle("Default").unwrap(), VehicleParams::msl());
    }

    #[test]
    fn unknown_names() {
        let cat = catalog();
        assert_eq!(
            cat.planet("venus"),
            Err(CatalogError::UnknownPlanet {
                name: "venus".to_string(),
                available: vec!["mars".to_string()]
            })
        );
        let err = cat.vehicle("orion").unwrap_err();
        assert_eq!(
            format!("{err}"),
            "vehicle `orion` not found, available vehicles: [\"default\"]"
        );
    }

    #[test]
    fn catalog_yaml() {
        let repr: CatalogSerde = serde_yaml::from_str(
            "
planets:
  mars:
    mu: 4.2828e13
    rp: 3396000.0
    atmosphere: mars-atmosphere-avg.tsv
vehicles:
  default:
    beta: 115.0
    LD: 0.24
  heavy:
    ballistic_coeff_kg_m2: 300.0
    lift_to_drag: 0.3
",
        )
        .unwrap();
        assert_eq!(repr.planets["mars"].mean_radius_m, 3396e3);
        assert_eq!(repr.vehicles["default"], VehicleParams::msl());
        assert_eq!(repr.vehicles["heavy"], VehicleParams::new(300.0, 0.3));
    }
}
