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

use crate::EntryError;
use arrow::datatypes::{DataType, Field};
use core::fmt;
use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr};

/// Components of the entry state, in the order of the state vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateParameter {
    /// Radius from the center of the planet (m)
    Radius,
    /// Planet fixed longitude (rad)
    Longitude,
    /// Planet centered latitude (rad)
    Latitude,
    /// Planet relative speed (m/s)
    Velocity,
    /// Flight path angle, positive above the local horizon (rad)
    FlightPathAngle,
    /// Heading, from East towards North (rad)
    Heading,
}

impl StateParameter {
    /// Builds the parameter from its index in the state vector.
    pub fn from_index(index: usize) -> Result<Self, EntryError> {
        match index {
            0 => Ok(Self::Radius),
            1 => Ok(Self::Longitude),
            2 => Ok(Self::Latitude),
            3 => Ok(Self::Velocity),
            4 => Ok(Self::FlightPathAngle),
            5 => Ok(Self::Heading),
            _ => Err(EntryError::InvalidTerminationIndex { index }),
        }
    }

    /// Index of this parameter in the state vector
    pub const fn index(&self) -> usize {
        match self {
            Self::Radius => 0,
            Self::Longitude => 1,
            Self::Latitude => 2,
            Self::Velocity => 3,
            Self::FlightPathAngle => 4,
            Self::Heading => 5,
        }
    }

    /// Returns the default event finding precision in the unit of that parameter
    pub const fn default_event_precision(&self) -> f64 {
        match self {
            Self::Radius => 1e-6,
            Self::Velocity => 1e-9,
            Self::Longitude | Self::Latitude | Self::FlightPathAngle | Self::Heading => 1e-12,
        }
    }

    /// Returns the unit of this parameter
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Radius => "m",
            Self::Velocity => "m/s",
            Self::Longitude | Self::Latitude | Self::FlightPathAngle | Self::Heading => "rad",
        }
    }

    /// Returns the parquet field of this parameter
    pub(crate) fn to_field(self, more_meta: Option<Vec<(String, String)>>) -> Field {
        let mut meta = HashMap::new();
        meta.insert("unit".to_string(), self.unit().to_string());
        if let Some(more_data) = more_meta {
            for (k, v) in more_data {
                meta.insert(k, v);
            }
        }

        Field::new(format!("{self} ({})", self.unit()), DataType::Float64, false)
            .with_metadata(meta)
    }
}

impl FromStr for StateParameter {
    type Err = EntryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s
            .split_whitespace()
            .next()
            .ok_or(EntryError::UnknownParameter {
                name: s.to_string(),
            })?;

        match keyword.to_lowercase().as_str() {
            "r" | "radius" | "rmag" => Ok(Self::Radius),
            "theta" | "longitude" | "lon" => Ok(Self::Longitude),
            "phi" | "latitude" | "lat" => Ok(Self::Latitude),
            "v" | "velocity" | "vmag" | "speed" => Ok(Self::Velocity),
            "gamma" | "fpa" | "flight_path_angle" => Ok(Self::FlightPathAngle),
            "psi" | "heading" => Ok(Self::Heading),
            _ => Err(EntryError::UnknownParameter {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StateParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match *self {
            Self::Radius => "radius",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Velocity => "velocity",
            Self::FlightPathAngle => "fpa",
            Self::Heading => "heading",
        };
        write!(f, "{repr}")
    }
}
