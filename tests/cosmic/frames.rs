extern crate edl_space as edl;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use edl::cosmic::{
    cartesian_to_spherical, dcm_ecef_to_enu, dcm_enu_to_ecef, spherical_to_inertial,
    spherical_to_inertial_position, velocity_by_finite_difference, CoordinateError,
};
use edl::linalg::{Matrix3, Vector3};
use edl::EntryState;
use rstest::*;

#[rstest]
#[case(EntryState::new(3_520_999.0, -1.376, 0.473, 6_083.6, -0.2705, 0.0))]
#[case(EntryState::new(3_402_500.0, 3.0, -1.4, 375.0, -1.2, -2.9))]
#[case(EntryState::new(3_396_100.0, 0.0, 0.0, 1_000.0, 0.0, 1.5))]
#[case(EntryState::new(3_700_000.0, -3.1, 1.2, 7_200.0, 0.1, 3.1))]
fn spherical_cartesian_round_trip(#[case] state: EntryState) {
    let cart = spherical_to_inertial(&state);
    assert_relative_eq!(cart.rmag_m(), state.radius_m, max_relative = 1e-12);
    assert_relative_eq!(cart.vmag_m_s(), state.speed_m_s, max_relative = 1e-12);

    let back = cartesian_to_spherical(&cart.position_m, &cart.velocity_m_s).unwrap();
    assert_relative_eq!(back.radius_m, state.radius_m, max_relative = 1e-9);
    assert_relative_eq!(back.speed_m_s, state.speed_m_s, max_relative = 1e-9);
    assert_abs_diff_eq!(back.longitude_rad, state.longitude_rad, epsilon = 1e-9);
    assert_abs_diff_eq!(back.latitude_rad, state.latitude_rad, epsilon = 1e-9);
    assert_abs_diff_eq!(back.fpa_rad, state.fpa_rad, epsilon = 1e-9);
    assert_abs_diff_eq!(back.heading_rad, state.heading_rad, epsilon = 1e-9);
}

#[test]
fn enu_rotation_is_orthonormal() {
    for (theta, phi) in [(-1.376, 0.473), (2.0, -1.0), (0.0, 0.0)] {
        let dcm = dcm_enu_to_ecef(theta, phi);
        assert_abs_diff_eq!(dcm * dcm.transpose(), Matrix3::identity(), epsilon = 1e-14);
        assert_abs_diff_eq!(dcm.determinant(), 1.0, epsilon = 1e-14);
        assert_eq!(dcm_ecef_to_enu(theta, phi), dcm.transpose());
        // The up direction is the radial direction
        let up = dcm * Vector3::z();
        assert_abs_diff_eq!(
            up,
            spherical_to_inertial_position(1.0, theta, phi),
            epsilon = 1e-14
        );
    }
}

#[test]
fn circular_motion_velocity() {
    // Equatorial circle at constant rate: the central differences are accurate to O(dt^2)
    let radius_m = 3_500e3;
    let rate_rad_s = 1e-3;
    let step_s = 0.02;
    let positions: Vec<Vector3<f64>> = (0..100)
        .map(|i| {
            let lon = rate_rad_s * i as f64 * step_s;
            spherical_to_inertial_position(radius_m, lon, 0.0)
        })
        .collect();
    let velocities = velocity_by_finite_difference(&positions, step_s).unwrap();
    assert_eq!(velocities.len(), positions.len());
    for (i, vel) in velocities.iter().enumerate().skip(1).take(98) {
        let lon = rate_rad_s * i as f64 * step_s;
        let exact = radius_m * rate_rad_s * Vector3::new(-lon.sin(), lon.cos(), 0.0);
        assert_abs_diff_eq!(*vel, exact, epsilon = 1e-6);
    }

    assert_eq!(
        velocity_by_finite_difference(&positions[..1], step_s),
        Err(CoordinateError::TooFewPositions { count: 1 })
    );
}

#[test]
fn degenerate_cartesian() {
    assert_eq!(
        cartesian_to_spherical(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0)),
        Err(CoordinateError::ZeroRadius)
    );
    assert!(matches!(
        cartesian_to_spherical(
            &Vector3::new(f64::NAN, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0)
        ),
        Err(CoordinateError::NonFiniteCartesian { .. })
    ));
}
