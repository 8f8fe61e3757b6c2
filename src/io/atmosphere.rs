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

use super::{AtmosphereSnafu, CsvSnafu, InputOutputError, MissingDataSnafu, StdIOSnafu};
use crate::cosmic::AtmosphereTable;
use snafu::{ensure, ResultExt};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column of the geometric altitude, in meters.
pub const ALTITUDE_COLUMN: usize = 0;
/// Column of the density, in kg/m^3. The temperature and pressure columns are ignored.
pub const DENSITY_COLUMN: usize = 3;

/// Loads an atmosphere table from a tab delimited file with a header row, with the columns
/// `H[m] T[K] P[N/m2] rho[kg/m3] a[m/s]`.
pub fn load_atmosphere<P: AsRef<Path>>(path: P) -> Result<AtmosphereTable, InputOutputError> {
    let file = File::open(path.as_ref()).context(StdIOSnafu {
        action: "opening atmosphere table",
    })?;
    let table = parse_atmosphere(file)?;
    info!(
        "Loaded {} atmosphere rows from {} m to {} m from {}",
        table.len(),
        table.min_altitude_m(),
        table.max_altitude_m(),
        path.as_ref().display()
    );
    Ok(table)
}

/// Parses an atmosphere table from any tab delimited reader with a header row.
pub fn parse_atmosphere<R: Read>(reader: R) -> Result<AtmosphereTable, InputOutputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut altitudes_m = Vec::new();
    let mut densities_kg_m3 = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.context(CsvSnafu {
            action: "reading atmosphere table",
        })?;
        // Blank lines at the end of the file
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        ensure!(
            record.len() > DENSITY_COLUMN,
            MissingDataSnafu {
                which: "density",
                row,
                found: record.len()
            }
        );
        altitudes_m.push(parse_number(&record, row, ALTITUDE_COLUMN)?);
        densities_kg_m3.push(parse_number(&record, row, DENSITY_COLUMN)?);
    }

    AtmosphereTable::try_new(altitudes_m, densities_kg_m3).context(AtmosphereSnafu)
}

fn parse_number(
    record: &csv::StringRecord,
    row: usize,
    column: usize,
) -> Result<f64, InputOutputError> {
    let data = record.get(column).unwrap_or_default();
    data.parse::<f64>()
        .map_err(|_| InputOutputError::ParseNumber {
            data: data.to_string(),
            row,
            column,
        })
}
