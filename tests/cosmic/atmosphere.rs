extern crate edl_space as edl;

use edl::cosmic::{AtmosphereLookup, AtmosphereTable};
use rstest::*;
use std::sync::Arc;

#[fixture]
fn table() -> Arc<AtmosphereTable> {
    use crate::test_mars_atmosphere;
    test_mars_atmosphere()
}

#[rstest]
fn mars_table_loaded(table: Arc<AtmosphereTable>) {
    assert_eq!(table.len(), 126);
    assert_eq!(table.min_altitude_m(), 0.0);
    assert_eq!(table.max_altitude_m(), 125_000.0);
    assert_eq!(table.density_at(0.0), 1.554536e-02);
    assert_eq!(table.density_at(125_000.0), 6.911406e-09);
    // Density decreases with altitude in this profile
    let rows: Vec<(f64, f64)> = table.rows().collect();
    for pair in rows.windows(2) {
        assert!(pair[1].1 < pair[0].1);
    }
}

#[rstest]
fn boundary_clamping(table: Arc<AtmosphereTable>) {
    if pretty_env_logger::try_init().is_err() {
        println!("could not init env_logger");
    }

    assert_eq!(
        table.lookup(-250.0),
        AtmosphereLookup::BelowTable(1.554536e-02)
    );
    assert_eq!(
        table.lookup(130_000.0),
        AtmosphereLookup::AboveTable(6.911406e-09)
    );
    assert!(table.lookup(130_000.0).is_clamped());
    assert!(!table.lookup(65_432.1).is_clamped());
    assert_eq!(table.density_at(-1e6), table.density_at(0.0));
    assert_eq!(table.density_at(1e9), table.density_at(125_000.0));
}

#[rstest]
fn linear_interpolation(table: Arc<AtmosphereTable>) {
    let lo = table.density_at(1000.0);
    let hi = table.density_at(2000.0);
    let mid = table.density_at(1500.0);
    assert!((mid - 0.5 * (lo + hi)).abs() < 1e-15);
    let quarter = table.density_at(1250.0);
    assert!((quarter - (0.75 * lo + 0.25 * hi)).abs() < 1e-15);
}
