extern crate edl_space as edl;

use edl::dynamics::VehicleParams;
use edl::io::{Catalog, CatalogError, ConfigRepr, CoordType, ScenarioSerde};
use edl::md::{propagate_batch, StateParameter};
use std::path::PathBuf;

fn catalog_path() -> PathBuf {
    crate::test_data_dir().join("catalog.yaml")
}

#[test]
fn load_catalog() {
    let catalog = Catalog::load(catalog_path()).unwrap();
    println!("{catalog}");
    assert_eq!(catalog.planet_names(), vec!["mars".to_string()]);
    let mars = catalog.planet("Mars").unwrap();
    assert_eq!(mars.mu_m3_s2, 4.2828e13);
    assert_eq!(mars.mean_radius_m, 3_396e3);
    assert_eq!(mars.atmosphere.len(), 126);
    assert_eq!(catalog.vehicle("DEFAULT").unwrap(), VehicleParams::msl());

    assert!(matches!(
        catalog.vehicle("apollo"),
        Err(CatalogError::UnknownVehicle { available, .. }) if available == vec!["default".to_string()]
    ));
}

#[test]
fn missing_catalog() {
    assert!(matches!(
        Catalog::load(crate::test_data_dir().join("no-such-catalog.yaml")),
        Err(CatalogError::CatalogConfig { .. })
    ));
}

#[test]
fn scenarios_from_yaml() {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    let catalog = Catalog::load(catalog_path()).unwrap();
    let scenarios_serde =
        ScenarioSerde::load_many(crate::test_data_dir().join("scenarios.yaml")).unwrap();
    assert_eq!(scenarios_serde.len(), 3);
    assert_eq!(
        scenarios_serde[0].init.unwrap().coord_type(),
        CoordType::Spherical
    );

    let scenarios = scenarios_serde
        .iter()
        .map(|s| s.to_scenario(&catalog))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(scenarios[0].init_state.radius_m, 3_396e3 + 124_999.0);
    assert_eq!(scenarios[0].init_state.fpa_rad, -0.2705);
    assert_eq!(scenarios[1].termination.parameter, StateParameter::Velocity);
    assert_eq!(scenarios[1].termination.threshold, 236.38);
    assert_eq!(scenarios[2].termination.parameter, StateParameter::Radius);

    for (i, rslt) in propagate_batch(&scenarios).into_iter().enumerate() {
        let rslt = rslt.unwrap();
        println!("#{i}: {rslt}");
        assert!(rslt.event_time_s < 1000.0);
        assert!(!rslt.is_empty());
    }
}

#[test]
fn cartesian_scenario() {
    let catalog = Catalog::load(catalog_path()).unwrap();
    let scenario = ScenarioSerde::loads(
        "
planet_name: MARS
init:
  coord_type: cartesian
  x: 3521000.0
  y: 0.0
  z: 0.0
  vx: -1600.0
  vy: 5800.0
  vz: 0.0
bank_angle: 0.5236
termination:
  parameter: radius
  threshold: 3402500.0
  trim_endpoints: false
",
    )
    .unwrap();
    assert_eq!(scenario.init.unwrap().coord_type(), CoordType::Cartesian);

    let run = scenario.to_scenario(&catalog).unwrap();
    assert!((run.init_state.radius_m - 3_521e3).abs() < 1e-6);
    assert!(run.init_state.fpa_rad < 0.0);
    assert_eq!(run.init_state.longitude_rad, 0.0);
    assert!(!run.termination.trim_endpoints);

    let rslt = run.run().unwrap();
    assert_eq!(rslt.samples[0].t_s, 0.0);
    // The first sample is the initial position
    assert!((rslt.samples[0].position_m[0] - 3_521e3).abs() < 1e-6);
}
