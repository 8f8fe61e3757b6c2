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

use crate::cosmic::AtmosphereError;
use crate::md::StateParameter;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use snafu::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads the tab delimited atmosphere tables.
pub mod atmosphere;
/// Read only registry of planets and vehicles.
pub mod catalog;
/// Parquet export of the entry trajectories.
pub mod export;
/// Entry scenarios, where every field falls back to the nominal Mars Science Laboratory entry.
pub mod scenario;
pub(crate) mod watermark;

pub use atmosphere::{load_atmosphere, parse_atmosphere};
pub use catalog::{Catalog, CatalogError, CatalogSerde, PlanetSerde};
pub use export::ExportCfg;
pub use scenario::{CoordType, InitialConditions, ScenarioError, ScenarioSerde, TerminationSerde};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to read configuration file: {source}"))]
    ReadError { source: std::io::Error },

    #[snafu(display("failed to parse YAML configuration file: {source}"))]
    ParseError { source: serde_yaml::Error },

    #[snafu(display("invalid configuration: {msg}"))]
    InvalidConfig { msg: String },
}

impl PartialEq for ConfigError {
    /// No two configuration errors match
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InputOutputError {
    #[snafu(display("{action} encountered an IO error: {source}"))]
    StdIOError {
        source: std::io::Error,
        action: &'static str,
    },
    #[snafu(display("{action} encountered a CSV error: {source}"))]
    CsvError {
        source: csv::Error,
        action: &'static str,
    },
    #[snafu(display("{action} encountered an Arrow error: {source}"))]
    ArrowError {
        source: ArrowError,
        action: &'static str,
    },
    #[snafu(display("{action} encountered a Parquet error: {source}"))]
    ParquetError {
        source: ParquetError,
        action: &'static str,
    },
    #[snafu(display("could not parse `{data}` in row {row}, column {column} as a number"))]
    ParseNumber {
        data: String,
        row: usize,
        column: usize,
    },
    #[snafu(display("row {row} has {found} columns, the {which} column is missing"))]
    MissingData {
        which: &'static str,
        row: usize,
        found: usize,
    },
    #[snafu(display("invalid atmosphere table: {source}"))]
    Atmosphere { source: AtmosphereError },
    #[snafu(display("nothing to export: {what}"))]
    EmptyData { what: &'static str },
}

impl PartialEq for InputOutputError {
    /// Only the errors without an underlying library error can match
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::ParseNumber { data, row, column },
                Self::ParseNumber {
                    data: data2,
                    row: row2,
                    column: column2,
                },
            ) => data == data2 && row == row2 && column == column2,
            (
                Self::MissingData { which, row, found },
                Self::MissingData {
                    which: which2,
                    row: row2,
                    found: found2,
                },
            ) => which == which2 && row == row2 && found == found2,
            (Self::Atmosphere { source }, Self::Atmosphere { source: source2 }) => {
                source == source2
            }
            (Self::EmptyData { what }, Self::EmptyData { what: what2 }) => what == what2,
            _ => false,
        }
    }
}

pub trait ConfigRepr: Debug + Sized + Serialize + DeserializeOwned {
    /// Builds the configuration representation from the path to a yaml
    fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);

        serde_yaml::from_reader(reader).context(ParseSnafu)
    }

    /// Builds a sequence of "Selves" from the provided path to a yaml
    fn load_many<P>(path: P) -> Result<Vec<Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);

        serde_yaml::from_reader(reader).context(ParseSnafu)
    }

    /// Builds a map of names to "selves" from the provided path to a yaml
    fn load_named<P>(path: P) -> Result<BTreeMap<String, Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);

        serde_yaml::from_reader(reader).context(ParseSnafu)
    }

    /// Builds "Self" from the provided string of a yaml
    fn loads(data: &str) -> Result<Self, ConfigError> {
        debug!("Loading YAML:\n{data}");
        serde_yaml::from_str(data).context(ParseSnafu)
    }

    /// Builds a sequence of "Selves" from the provided string of a yaml
    fn loads_many(data: &str) -> Result<Vec<Self>, ConfigError> {
        debug!("Loading YAML:\n{data}");
        serde_yaml::from_str(data).context(ParseSnafu)
    }
}

/// Deserializes a monitored state component either from its index in the state vector or from its name.
pub(crate) fn parameter_from_index_or_name<'de, D>(
    deserializer: D,
) -> Result<Option<StateParameter>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde_derive::Deserialize)]
    #[serde(untagged)]
    enum IndexOrName {
        Index(usize),
        Name(String),
    }

    match Option::<IndexOrName>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IndexOrName::Index(index)) => StateParameter::from_index(index)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(IndexOrName::Name(name)) => name
            .parse::<StateParameter>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
