extern crate edl_space as edl;

use edl::dynamics::{Dynamics, DynamicsError};
use edl::linalg::Vector6;
use edl::md::{Event, StateParameter};
use edl::propagators::{
    Dormand45, LargestScaled, PropOpts, PropagationError, Propagator, RmsScaled, Verner56, RK,
};
use edl::time::Unit;
use std::f64::consts::E;

/// `y' = y` on every component.
#[derive(Clone, Debug)]
struct Growth;

impl Dynamics for Growth {
    fn eom(&self, _t_s: f64, state_vec: &Vector6<f64>) -> Result<Vector6<f64>, DynamicsError> {
        Ok(*state_vec)
    }
}

/// Falls at a constant rate on the first component.
#[derive(Clone, Debug)]
struct ConstantFall;

impl Dynamics for ConstantFall {
    fn eom(&self, _t_s: f64, _state_vec: &Vector6<f64>) -> Result<Vector6<f64>, DynamicsError> {
        Ok(Vector6::new(-10.0, 0.0, 0.0, 0.0, 0.0, 0.0))
    }
}

#[derive(Clone, Debug)]
struct Blowup;

impl Dynamics for Blowup {
    fn eom(&self, t_s: f64, state_vec: &Vector6<f64>) -> Result<Vector6<f64>, DynamicsError> {
        if t_s > 2.0 {
            Ok(*state_vec * f64::NAN)
        } else {
            Ok(*state_vec)
        }
    }
}

fn exp_growth<T: RK>() {
    let prop = Propagator::new::<T>(Growth, PropOpts::<RmsScaled>::with_tolerances(1e-12, 1e-12));
    let mut instance = prop.with(Vector6::repeat(1.0));
    let state = instance.for_duration(Unit::Second * 1).unwrap();
    println!("{} {}", instance.stats, instance.latest_details());
    assert_eq!(instance.t_s, 1.0);
    for y in state.iter() {
        assert!((y - E).abs() < 1e-9, "{y} != e");
    }
}

#[test]
fn dormand45_exp() {
    exp_growth::<Dormand45>();
}

#[test]
fn verner56_exp() {
    exp_growth::<Verner56>();
}

#[test]
fn higher_order_takes_fewer_steps() {
    let opts = PropOpts::<LargestScaled>::with_tolerances(1e-12, 1e-12);
    let dp45 = Propagator::dp45(Growth, opts);
    let mut dp45_inst = dp45.with(Vector6::repeat(1.0));
    dp45_inst.for_duration(Unit::Second * 5).unwrap();

    let verner = Propagator::verner56(Growth, opts);
    let mut verner_inst = verner.with(Vector6::repeat(1.0));
    verner_inst.for_duration(Unit::Second * 5).unwrap();

    assert_eq!(dp45.order(), 5);
    assert_eq!(verner.order(), 6);
    assert!(verner_inst.stats.accepted_steps <= dp45_inst.stats.accepted_steps);
}

#[test]
fn linear_event() {
    // Crosses 50 at exactly t = 5 s
    let prop = Propagator::default(ConstantFall);
    let mut instance = prop.with(Vector6::new(100.0, 0.0, 0.0, 1.0, 0.0, 0.0));
    let event = Event::new(StateParameter::Radius, 50.0);
    let (details, traj) = instance.until_event(Unit::Second * 60, &event).unwrap();
    assert!((details.t_s - 5.0).abs() < 1e-8, "{details}");
    assert!((details.state.radius_m - 50.0).abs() < 1e-7);
    assert!(traj.last().unwrap().t_s >= details.t_s);

    // Never reached
    let mut instance = prop.with(Vector6::new(100.0, 0.0, 0.0, 1.0, 0.0, 0.0));
    let never = Event::new(StateParameter::Radius, -1e6);
    assert!(matches!(
        instance.until_event(Unit::Second * 10, &never),
        Err(PropagationError::EventNotReached { .. })
    ));
    assert_eq!(instance.t_s, 10.0);
}

#[test]
fn non_finite_derivative() {
    let prop = Propagator::default(Blowup);
    let mut instance = prop.with(Vector6::repeat(1.0));
    match instance.for_duration(Unit::Second * 10) {
        Err(PropagationError::Dynamics { t_s, source, .. }) => {
            assert!(t_s > 2.0);
            assert!(matches!(source, DynamicsError::NonFiniteDerivative { .. }));
        }
        other => panic!("expected a dynamics error, got {other:?}"),
    }
}
