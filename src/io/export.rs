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

use super::watermark::pq_writer;
use super::{ArrowSnafu, EmptyDataSnafu, InputOutputError, ParquetSnafu, StdIOSnafu};
use crate::md::{SimulationResult, StateParameter};
use crate::time::Epoch;
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use enum_iterator::all;
use hifitime::prelude::{Format, Formatter};
use parquet::arrow::ArrowWriter;
use snafu::{ensure, ResultExt};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Configuration for exporting an entry trajectory to parquet.
#[derive(Clone, Debug, Default, TypedBuilder)]
#[builder(doc)]
pub struct ExportCfg {
    /// Additional metadata to store in the Parquet metadata
    #[builder(default, setter(strip_option))]
    pub metadata: Option<HashMap<String, String>>,
    /// Set to true to append the timestamp to the filename
    #[builder(default)]
    pub timestamp: bool,
}

impl ExportCfg {
    /// Initialize a new default configuration but timestamp the filename.
    pub fn timestamped() -> Self {
        Self {
            timestamp: true,
            ..Default::default()
        }
    }

    /// Modifies the provided path to include the timestamp if required.
    pub(crate) fn actual_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let mut path_buf = path.as_ref().to_path_buf();
        if !self.timestamp {
            return path_buf;
        }
        let (Ok(now), Ok(format)) = (Epoch::now(), Format::from_str("%Y-%m-%dT%H-%M-%S")) else {
            warn!("could not timestamp {}", path_buf.display());
            return path_buf;
        };
        if let (Some(stem), Some(ext)) = (
            path_buf.file_stem().and_then(|s| s.to_str()),
            path_buf.extension().and_then(|s| s.to_str()),
        ) {
            let stamp = Formatter::new(now, format);
            let new_file_name = format!("{stem}-{stamp}.{ext}");
            path_buf.set_file_name(new_file_name);
        }
        path_buf
    }
}

fn cartesian_field(name: &str, unit: &str) -> Field {
    let meta = HashMap::from([("unit".to_string(), unit.to_string())]);
    Field::new(format!("{name} ({unit})"), DataType::Float64, false).with_metadata(meta)
}

impl SimulationResult {
    /// Store the resampled trajectory to a parquet file with the default configuration.
    pub fn to_parquet_simple<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, InputOutputError> {
        self.to_parquet(path, ExportCfg::default())
    }

    /// Store the resampled trajectory to a parquet file: the time, the six state components and
    /// the planet centered position and velocity of each sample.
    pub fn to_parquet<P: AsRef<Path>>(
        &self,
        path: P,
        cfg: ExportCfg,
    ) -> Result<PathBuf, InputOutputError> {
        ensure!(
            !self.samples.is_empty(),
            EmptyDataSnafu {
                what: "the trajectory has no samples"
            }
        );

        // Build the schema
        let mut hdrs = vec![cartesian_field("time", "s")];
        for param in all::<StateParameter>() {
            hdrs.push(param.to_field(None));
        }
        for axis in ["x", "y", "z"] {
            hdrs.push(cartesian_field(axis, "m"));
        }
        for axis in ["vx", "vy", "vz"] {
            hdrs.push(cartesian_field(axis, "m/s"));
        }
        let schema = Arc::new(Schema::new(hdrs));

        let mut record: Vec<ArrayRef> = Vec::new();
        record.push(Arc::new(Float64Array::from(self.times_s())));
        for param in all::<StateParameter>() {
            record.push(Arc::new(Float64Array::from(
                self.samples
                    .iter()
                    .map(|s| s.state.value(param))
                    .collect::<Vec<f64>>(),
            )));
        }
        for i in 0..3 {
            record.push(Arc::new(Float64Array::from(
                self.samples
                    .iter()
                    .map(|s| s.position_m[i])
                    .collect::<Vec<f64>>(),
            )));
        }
        for i in 0..3 {
            record.push(Arc::new(Float64Array::from(
                self.samples
                    .iter()
                    .map(|s| s.velocity_m_s[i])
                    .collect::<Vec<f64>>(),
            )));
        }

        let mut metadata = HashMap::new();
        metadata.insert("Purpose".to_string(), "Entry trajectory".to_string());
        metadata.insert(
            "Event time (s)".to_string(),
            format!("{}", self.event_time_s),
        );
        metadata.insert("Event state".to_string(), format!("{}", self.event_state));
        metadata.insert("Integrator".to_string(), format!("{}", self.stats));
        if let Some(add_meta) = cfg.metadata.clone() {
            for (k, v) in add_meta {
                metadata.insert(k, v);
            }
        }

        let props = pq_writer(Some(metadata));
        let path_buf = cfg.actual_path(path);

        let file = File::create(&path_buf).context(StdIOSnafu {
            action: "creating trajectory file",
        })?;
        let mut writer = ArrowWriter::try_new(file, schema.clone(), props).context(ParquetSnafu {
            action: "building trajectory writer",
        })?;

        let batch = RecordBatch::try_new(schema, record).context(ArrowSnafu {
            action: "building trajectory record batch",
        })?;
        writer.write(&batch).context(ParquetSnafu {
            action: "writing trajectory",
        })?;
        writer.close().context(ParquetSnafu {
            action: "closing trajectory file",
        })?;

        info!(
            "Exported {} samples to {}",
            self.samples.len(),
            path_buf.display()
        );

        // Return the path this was written to
        Ok(path_buf)
    }
}
