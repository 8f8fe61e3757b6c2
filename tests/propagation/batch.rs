extern crate edl_space as edl;

use edl::dynamics::{ConstantBank, VehicleParams};
use edl::md::{propagate_batch, EntryScenario, TerminationSpec};
use edl::{EntryError, EntryState, PlanetModel};
use rstest::*;
use std::sync::Arc;

#[fixture]
fn mars() -> PlanetModel {
    use crate::test_mars;
    test_mars()
}

fn scenario(planet: &PlanetModel, fpa_rad: f64, latitude_rad: f64) -> EntryScenario {
    EntryScenario {
        planet: planet.clone(),
        init_state: EntryState::new(
            planet.radius_at_altitude_m(124_999.0),
            -1.376,
            latitude_rad,
            6_083.6,
            fpa_rad,
            0.0,
        ),
        vehicle: VehicleParams::msl(),
        control: Arc::new(ConstantBank::new(0.5236)),
        termination: TerminationSpec::parachute_deploy(planet),
    }
}

#[rstest]
fn batch_is_reproducible(mars: PlanetModel) {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    let scenarios = vec![
        scenario(&mars, -0.2705, 0.473),
        scenario(&mars, -0.25, 0.473),
        scenario(&mars, -0.2705, std::f64::consts::FRAC_PI_2),
        scenario(&mars, -0.30, -0.2),
    ];

    let batch = propagate_batch(&scenarios);
    assert_eq!(batch.len(), scenarios.len());

    // One result per scenario in input order, and a failure does not affect the others
    assert!(batch[0].is_ok());
    assert!(batch[1].is_ok());
    assert!(matches!(
        batch[2],
        Err(EntryError::SingularGeometry { .. })
    ));
    assert!(batch[3].is_ok());

    for (scenario, parallel) in scenarios.iter().zip(batch.iter()) {
        assert_eq!(&scenario.run(), parallel);
    }

    // Shallower entries fly longer
    let t0 = batch[0].as_ref().unwrap().event_time_s;
    let t1 = batch[1].as_ref().unwrap().event_time_s;
    assert!(t1 > t0);

    // And the whole batch is reproducible
    assert_eq!(propagate_batch(&scenarios), batch);
}
