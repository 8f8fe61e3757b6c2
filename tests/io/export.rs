extern crate edl_space as edl;

use edl::dynamics::{ConstantBank, VehicleParams};
use edl::io::ExportCfg;
use edl::md::{propagate_and_resample, TerminationSpec};
use edl::EntryState;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::sync::Arc;

#[test]
fn export_to_parquet() {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    let mars = crate::test_mars();
    let init = EntryState::from_altitude_deg(
        124_999.0,
        mars.mean_radius_m,
        -78.8618,
        27.105,
        6_083.6,
        -15.5,
        0.0,
    );
    let term = TerminationSpec::builder()
        .parameter(edl::md::StateParameter::Radius)
        .threshold(mars.radius_at_altitude_m(6_500.0))
        .step(edl::time::Unit::Second * 1)
        .build();
    let rslt = propagate_and_resample(
        &mars,
        &init,
        &VehicleParams::msl(),
        Arc::new(ConstantBank::default()),
        &term,
    )
    .unwrap();

    let path = std::env::temp_dir().join("edl-space-export.parquet");
    let cfg = ExportCfg::builder()
        .metadata(HashMap::from([(
            "Scenario".to_string(),
            "MSL nominal".to_string(),
        )]))
        .build();
    let written = rslt.to_parquet(&path, cfg).unwrap();
    assert_eq!(written, path);

    let file = File::open(&written).unwrap();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();

    let key_values: HashMap<String, String> = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .unwrap()
        .iter()
        .map(|kv| (kv.key.clone(), kv.value.clone().unwrap_or_default()))
        .collect();
    assert!(key_values["Generated by"].starts_with("edl-space"));
    assert!(key_values.contains_key("Created by"));
    assert_eq!(key_values["Scenario"], "MSL nominal");
    assert_eq!(key_values["Purpose"], "Entry trajectory");

    let schema = builder.schema().clone();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec![
            "time (s)",
            "radius (m)",
            "longitude (rad)",
            "latitude (rad)",
            "velocity (m/s)",
            "fpa (rad)",
            "heading (rad)",
            "x (m)",
            "y (m)",
            "z (m)",
            "vx (m/s)",
            "vy (m/s)",
            "vz (m/s)",
        ]
    );
    assert_eq!(schema.field(4).metadata()["unit"], "m/s");

    let reader = builder.build().unwrap();
    let rows: usize = reader.map(|batch| batch.unwrap().num_rows()).sum();
    assert_eq!(rows, rslt.len());

    std::fs::remove_file(written).unwrap();
}
