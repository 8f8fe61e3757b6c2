extern crate edl_space as edl;

use edl::dynamics::{BankAngleLaw, BankSchedule, ConstantBank, DynamicsError, VehicleParams};
use edl::md::{
    propagate_and_resample, propagate_and_resample_with, SimulationResult, StateParameter,
    TerminationSpec,
};
use edl::propagators::{Dormand45, PropOpts, RmsScaled, Verner56};
use edl::time::Unit;
use edl::{EntryError, EntryState, PlanetModel};
use rstest::*;
use std::sync::Arc;

#[fixture]
fn mars() -> PlanetModel {
    use crate::test_mars;
    test_mars()
}

/// Mars Science Laboratory entry interface
#[fixture]
fn msl_entry(mars: PlanetModel) -> EntryState {
    EntryState::new(
        mars.radius_at_altitude_m(124_999.0),
        -1.376,
        0.473,
        6_083.6,
        -0.2705,
        0.0,
    )
}

fn bank() -> Arc<dyn BankAngleLaw> {
    Arc::new(ConstantBank::new(0.5236))
}

fn check_shape(rslt: &SimulationResult, step_s: f64) {
    assert!(!rslt.is_empty());
    for pair in rslt.samples.windows(2) {
        assert!(pair[1].t_s > pair[0].t_s);
        assert!((pair[1].t_s - pair[0].t_s - step_s).abs() < 1e-9);
    }
    for sample in &rslt.samples {
        assert!(sample.state.is_finite());
        assert!(sample.position_m.iter().all(|x| x.is_finite()));
        assert!(sample.velocity_m_s.iter().all(|x| x.is_finite()));
        assert!(sample.t_s <= rslt.event_time_s);
    }
}

#[rstest]
fn nominal_mars_entry(mars: PlanetModel, msl_entry: EntryState) {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    let term = TerminationSpec::parachute_deploy(&mars);
    let rslt =
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &term).unwrap();
    println!("{rslt}");

    assert!(rslt.event_time_s < 1000.0);
    assert!(
        (rslt.event_time_s - 330.56).abs() < 1.0,
        "parachute deployment at {} s",
        rslt.event_time_s
    );
    assert!(rslt.event_state.speed_m_s < 0.1 * msl_entry.speed_m_s);
    assert!((rslt.event_state.radius_m - term.threshold).abs() < 1e-3);
    check_shape(&rslt, 0.02);

    // Endpoints are trimmed: the last sample is strictly before the event
    assert!(rslt.samples.last().unwrap().t_s < rslt.event_time_s);
    assert!((rslt.samples[0].t_s - 0.02).abs() < 1e-12);
    // Grid of floor(t_event / dt) + 1 points, minus both ends
    let grid_len = (rslt.event_time_s / 0.02).floor() as usize + 1;
    assert!(rslt.len() == grid_len - 2 || rslt.len() == grid_len - 1);
}

#[rstest]
fn event_is_a_falling_edge(mars: PlanetModel, msl_entry: EntryState) {
    let term = TerminationSpec::parachute_deploy(&mars);
    let rslt =
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &term).unwrap();

    let nodes = &rslt.traj.nodes;
    assert!(nodes.len() > 2);
    let trigger = nodes[nodes.len() - 1];
    let before = nodes[nodes.len() - 2];
    assert!(before.state[0] > term.threshold);
    assert!(trigger.state[0] <= term.threshold);
    assert!(before.t_s < rslt.event_time_s && rslt.event_time_s <= trigger.t_s);
    // Descending at the event
    assert!(rslt.event_state.speed_m_s * rslt.event_state.fpa_rad.sin() < 0.0);
    assert!(trigger.state_dot[0] < 0.0);
    // No earlier crossing
    for node in &nodes[..nodes.len() - 1] {
        assert!(node.state[0] > term.threshold);
    }
}

#[rstest]
fn mach_one_termination(mars: PlanetModel, msl_entry: EntryState) {
    let term = TerminationSpec::mach_one();
    let rslt =
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &term).unwrap();
    assert!((rslt.event_state.speed_m_s - 236.38).abs() < 1e-6);
    assert!(rslt.event_time_s > 330.0 && rslt.event_time_s < 1000.0);
    check_shape(&rslt, 0.02);

    // Same event through the index of the speed in the state vector
    let by_index =
        TerminationSpec::from_index(3, 236.38, 1000.0 * Unit::Second, 0.02 * Unit::Second)
            .unwrap();
    let rslt_idx =
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &by_index)
            .unwrap();
    assert_eq!(rslt, rslt_idx);
}

#[rstest]
fn coarse_output_step(mars: PlanetModel, msl_entry: EntryState) {
    let term = TerminationSpec::builder()
        .parameter(StateParameter::Radius)
        .threshold(mars.radius_at_altitude_m(6_500.0))
        .step(Unit::Second * 1)
        .trim_endpoints(false)
        .build();
    let rslt =
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &term).unwrap();
    check_shape(&rslt, 1.0);
    assert_eq!(rslt.samples[0].t_s, 0.0);
    assert_eq!(rslt.samples[0].state, msl_entry);
    assert_eq!(rslt.len(), rslt.event_time_s.floor() as usize + 1);
}

#[rstest]
fn polar_entry_is_singular(mars: PlanetModel, msl_entry: EntryState) {
    let polar = EntryState {
        latitude_rad: std::f64::consts::FRAC_PI_2,
        ..msl_entry
    };
    let term = TerminationSpec::parachute_deploy(&mars);
    match propagate_and_resample(&mars, &polar, &VehicleParams::msl(), bank(), &term) {
        Err(EntryError::SingularGeometry { t_s, source, .. }) => {
            assert_eq!(t_s, 0.0);
            assert!(matches!(source, DynamicsError::PolarSingularity { .. }));
        }
        other => panic!("expected a singular geometry, got {other:?}"),
    }
}

#[rstest]
fn time_limit_reached(mars: PlanetModel, msl_entry: EntryState) {
    let term = TerminationSpec::builder()
        .parameter(StateParameter::Radius)
        .threshold(mars.radius_at_altitude_m(6_500.0))
        .time_limit(Unit::Second * 60)
        .build();
    let err = propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &term)
        .unwrap_err();
    match err {
        EntryError::EventNotReached {
            parameter,
            threshold,
            time_limit,
            state,
        } => {
            assert_eq!(parameter, StateParameter::Radius);
            assert_eq!(threshold, term.threshold);
            assert_eq!(time_limit, Unit::Second * 60);
            assert!(state.radius_m > threshold);
            assert!(state.radius_m < msl_entry.radius_m);
        }
        other => panic!("expected the event not to be reached, got {other}"),
    }
}

#[rstest]
fn invalid_terminations(mars: PlanetModel, msl_entry: EntryState) {
    assert_eq!(
        TerminationSpec::from_index(6, 0.0, Unit::Second * 1000, Unit::Second * 0.02),
        Err(EntryError::InvalidTerminationIndex { index: 6 })
    );

    // The entry starts below the deployment altitude: no falling edge can happen
    let low = TerminationSpec::builder()
        .parameter(StateParameter::Radius)
        .threshold(mars.radius_at_altitude_m(130_000.0))
        .build();
    assert_eq!(
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &low)
            .unwrap_err(),
        EntryError::StartsBelowThreshold {
            parameter: StateParameter::Radius,
            initial: msl_entry.radius_m,
            threshold: low.threshold
        }
    );
}

#[rstest]
fn above_the_atmosphere_table(mars: PlanetModel, msl_entry: EntryState) {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }
    // The table stops at 125 km: the first seconds use the density of the top row
    let high = EntryState {
        radius_m: mars.radius_at_altitude_m(140_000.0),
        ..msl_entry
    };
    let term = TerminationSpec::parachute_deploy(&mars);
    let rslt = propagate_and_resample(&mars, &high, &VehicleParams::msl(), bank(), &term).unwrap();
    check_shape(&rslt, 0.02);
    assert!(rslt.event_state.speed_m_s < 0.1 * high.speed_m_s);
}

#[rstest]
fn bank_schedule_changes_the_trajectory(mars: PlanetModel, msl_entry: EntryState) {
    let term = TerminationSpec::parachute_deploy(&mars);
    let constant =
        propagate_and_resample(&mars, &msl_entry, &VehicleParams::msl(), bank(), &term).unwrap();

    // Same bank until 100 s, then full lift up
    let schedule = BankSchedule::new(vec![(0.0, 0.5236), (100.0, 0.0)]).unwrap();
    let scheduled = propagate_and_resample(
        &mars,
        &msl_entry,
        &VehicleParams::msl(),
        Arc::new(schedule),
        &term,
    )
    .unwrap();
    assert_eq!(scheduled.state_at(50.0), constant.state_at(50.0));
    // More lift: longer flight
    assert!(scheduled.event_time_s > constant.event_time_s);
}

#[rstest]
fn tolerance_presets_agree(mars: PlanetModel, msl_entry: EntryState) {
    let term = TerminationSpec::parachute_deploy(&mars);
    let vehicle = VehicleParams::msl();

    let science = propagate_and_resample_with::<Dormand45, RmsScaled>(
        &mars,
        &msl_entry,
        &vehicle,
        bank(),
        &term,
        PropOpts::science(),
    )
    .unwrap();
    let interactive = propagate_and_resample_with::<Dormand45, RmsScaled>(
        &mars,
        &msl_entry,
        &vehicle,
        bank(),
        &term,
        PropOpts::interactive(),
    )
    .unwrap();
    let verner = propagate_and_resample_with::<Verner56, RmsScaled>(
        &mars,
        &msl_entry,
        &vehicle,
        bank(),
        &term,
        PropOpts::science(),
    )
    .unwrap();

    println!("science: {}", science.stats);
    println!("interactive: {}", interactive.stats);
    println!("verner: {}", verner.stats);

    assert!(interactive.stats.accepted_steps < science.stats.accepted_steps);
    assert!((science.event_time_s - interactive.event_time_s).abs() < 0.5);
    assert!((science.event_time_s - verner.event_time_s).abs() < 1e-3);
}
