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

use crate::time::Epoch;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::collections::HashMap;

/// Name and version of this crate.
pub(crate) fn prj_name_ver() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Parquet writer properties: ZSTD compression, and the provenance of the file in its metadata.
pub(crate) fn pq_writer(metadata: Option<HashMap<String, String>>) -> Option<WriterProperties> {
    let bldr = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::try_new(10).unwrap_or_default()));

    let mut file_metadata = vec![
        KeyValue::new("Generated by".to_string(), prj_name_ver()),
        KeyValue::new(
            "Created by".to_string(),
            format!(
                "{} ({}) on {}",
                whoami::realname(),
                whoami::username(),
                whoami::platform()
            ),
        ),
    ];

    if let Ok(now) = Epoch::now() {
        file_metadata.push(KeyValue::new("Created on".to_string(), format!("{now}")));
    }

    if let Some(custom_md) = metadata {
        for (k, v) in custom_md {
            file_metadata.push(KeyValue::new(k, v));
        }
    }

    Some(bldr.set_key_value_metadata(Some(file_metadata)).build())
}
