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

use super::{
    AtmosphereError, InvalidDensitySnafu, LengthMismatchSnafu, NotAscendingSnafu, TooFewRowsSnafu,
};
use snafu::ensure;
use std::fmt;

/// Result of a density lookup, tagged with whether the altitude was inside the table.
///
/// Outside of the table the density is clamped to the closest boundary row. Clamping is not an
/// error but callers may want to report it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AtmosphereLookup {
    /// Linearly interpolated between two rows of the table.
    InRange(f64),
    /// Altitude below the first row: density of the first row.
    BelowTable(f64),
    /// Altitude above the last row: density of the last row.
    AboveTable(f64),
}

impl AtmosphereLookup {
    /// Density in kg/m^3, regardless of clamping.
    pub const fn density(&self) -> f64 {
        match *self {
            Self::InRange(rho) | Self::BelowTable(rho) | Self::AboveTable(rho) => rho,
        }
    }

    /// Returns true if the altitude was outside of the table.
    pub const fn is_clamped(&self) -> bool {
        !matches!(self, Self::InRange(_))
    }
}

/// An altitude to density profile, sorted by ascending altitude.
///
/// The table is immutable once built: share it between runs with an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereTable {
    altitudes_m: Vec<f64>,
    densities_kg_m3: Vec<f64>,
}

impl AtmosphereTable {
    /// Builds a table from the altitudes (meters) and the densities (kg/m^3).
    ///
    /// Requires at least two rows, strictly ascending finite altitudes and finite non negative densities.
    pub fn try_new(
        altitudes_m: Vec<f64>,
        densities_kg_m3: Vec<f64>,
    ) -> Result<Self, AtmosphereError> {
        ensure!(
            altitudes_m.len() == densities_kg_m3.len(),
            LengthMismatchSnafu {
                altitudes: altitudes_m.len(),
                densities: densities_kg_m3.len()
            }
        );
        ensure!(
            altitudes_m.len() >= 2,
            TooFewRowsSnafu {
                rows: altitudes_m.len()
            }
        );

        for (row, (altitude_m, density)) in
            altitudes_m.iter().zip(densities_kg_m3.iter()).enumerate()
        {
            ensure!(
                density.is_finite() && *density >= 0.0 && altitude_m.is_finite(),
                InvalidDensitySnafu {
                    row,
                    altitude_m: *altitude_m,
                    density: *density
                }
            );
            if row > 0 {
                let previous_m = altitudes_m[row - 1];
                ensure!(
                    *altitude_m > previous_m,
                    NotAscendingSnafu {
                        row,
                        altitude_m: *altitude_m,
                        previous_m
                    }
                );
            }
        }

        Ok(Self {
            altitudes_m,
            densities_kg_m3,
        })
    }

    /// Builds a table from `(altitude [m], density [kg/m^3])` rows.
    pub fn from_rows(rows: &[(f64, f64)]) -> Result<Self, AtmosphereError> {
        let (altitudes_m, densities_kg_m3) = rows.iter().copied().unzip();
        Self::try_new(altitudes_m, densities_kg_m3)
    }

    /// Tabulates an exponential atmosphere `rho0 * exp(-h / H)` every `step_m` from zero to `max_altitude_m`.
    pub fn exponential(
        surface_density_kg_m3: f64,
        scale_height_m: f64,
        max_altitude_m: f64,
        step_m: f64,
    ) -> Result<Self, AtmosphereError> {
        let rows = if step_m > 0.0 && max_altitude_m > 0.0 {
            (max_altitude_m / step_m).floor() as usize + 1
        } else {
            0
        };
        let altitudes_m: Vec<f64> = (0..rows).map(|i| i as f64 * step_m).collect();
        let densities_kg_m3 = altitudes_m
            .iter()
            .map(|h| surface_density_kg_m3 * (-h / scale_height_m).exp())
            .collect();
        Self::try_new(altitudes_m, densities_kg_m3)
    }

    /// Number of rows in this table.
    pub fn len(&self) -> usize {
        self.altitudes_m.len()
    }

    /// Always false: a table has at least two rows.
    pub fn is_empty(&self) -> bool {
        self.altitudes_m.is_empty()
    }

    /// Lowest tabulated altitude in meters.
    pub fn min_altitude_m(&self) -> f64 {
        self.altitudes_m[0]
    }

    /// Highest tabulated altitude in meters.
    pub fn max_altitude_m(&self) -> f64 {
        self.altitudes_m[self.len() - 1]
    }

    /// Iterates over the `(altitude [m], density [kg/m^3])` rows.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.altitudes_m
            .iter()
            .copied()
            .zip(self.densities_kg_m3.iter().copied())
    }

    /// Density at the provided altitude, clamped to the boundary rows outside of the table.
    pub fn density_at(&self, altitude_m: f64) -> f64 {
        self.lookup(altitude_m).density()
    }

    /// Piecewise linear lookup of the density at the provided altitude.
    pub fn lookup(&self, altitude_m: f64) -> AtmosphereLookup {
        let last = self.len() - 1;
        if altitude_m.is_nan() {
            return AtmosphereLookup::InRange(f64::NAN);
        } else if altitude_m < self.altitudes_m[0] {
            return AtmosphereLookup::BelowTable(self.densities_kg_m3[0]);
        } else if altitude_m > self.altitudes_m[last] {
            return AtmosphereLookup::AboveTable(self.densities_kg_m3[last]);
        } else if altitude_m == self.altitudes_m[last] {
            return AtmosphereLookup::InRange(self.densities_kg_m3[last]);
        }

        // Index of the last row at or below the requested altitude
        let idx = self.altitudes_m.partition_point(|h| *h <= altitude_m) - 1;
        let (h0, h1) = (self.altitudes_m[idx], self.altitudes_m[idx + 1]);
        let (rho0, rho1) = (self.densities_kg_m3[idx], self.densities_kg_m3[idx + 1]);

        AtmosphereLookup::InRange(rho0 + (rho1 - rho0) / (h1 - h0) * (altitude_m - h0))
    }
}

impl fmt::Display for AtmosphereTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "atmosphere table of {} rows from {} m ({:e} kg/m^3) to {} m ({:e} kg/m^3)",
            self.len(),
            self.min_altitude_m(),
            self.densities_kg_m3[0],
            self.max_altitude_m(),
            self.densities_kg_m3[self.len() - 1]
        )
    }
}
