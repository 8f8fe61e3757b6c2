mod cosmic;
mod io;
mod propagation;

use std::path::PathBuf;
use std::sync::Arc;

use edl_space::cosmic::{AtmosphereTable, PlanetModel};
use edl_space::io::load_atmosphere;

pub fn test_data_dir() -> PathBuf {
    PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or(".".to_string())).join("data")
}

pub fn test_mars_atmosphere() -> Arc<AtmosphereTable> {
    Arc::new(load_atmosphere(test_data_dir().join("mars-atmosphere-avg.tsv")).unwrap())
}

pub fn test_mars() -> PlanetModel {
    PlanetModel::mars(test_mars_atmosphere())
}
