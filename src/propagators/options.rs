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

use std::fmt;

use crate::time::{Duration, Unit};

use super::{ErrorCtrl, RmsScaled};
use typed_builder::TypedBuilder;

/// PropOpts stores the integrator options, including the minimum and maximum step sizes, and the
/// relative and absolute tolerances.
///
/// The defaults are science grade: relative and absolute tolerances of 1e-9. Use
/// [`PropOpts::interactive`] for the looser and faster 1e-5 / 1e-3 tolerances.
#[derive(Clone, Copy, Debug, TypedBuilder)]
#[builder(doc)]
pub struct PropOpts<E: ErrorCtrl> {
    #[builder(default_code = "1.0 * Unit::Second")]
    pub init_step: Duration,
    #[builder(default_code = "1.0 * Unit::Microsecond")]
    pub min_step: Duration,
    #[builder(default_code = "10.0 * Unit::Second")]
    pub max_step: Duration,
    #[builder(default = 1e-9)]
    pub rel_tol: f64,
    #[builder(default = 1e-9)]
    pub abs_tol: f64,
    #[builder(default = 50)]
    pub attempts: u8,
    #[builder(default)]
    pub error_ctrl: E,
}

impl<E: ErrorCtrl> PropOpts<E> {
    /// Initializes options with the provided tolerances and the default step bounds.
    pub fn with_tolerances(rel_tol: f64, abs_tol: f64) -> Self {
        Self::builder().rel_tol(rel_tol).abs_tol(abs_tol).build()
    }

    /// Science grade tolerances (1e-9 relative and absolute), same as the default.
    pub fn science() -> Self {
        Self::with_tolerances(1e-9, 1e-9)
    }

    /// Interactive tolerances (1e-5 relative, 1e-3 absolute), for quick looks.
    pub fn interactive() -> Self {
        Self::with_tolerances(1e-5, 1e-3)
    }

    /// Returns a string with the information about these options
    pub fn info(&self) -> String {
        format!("{self}")
    }

    /// Set the maximum step size and sets the initial step to that value if currently greater
    pub fn set_max_step(&mut self, max_step: Duration) {
        if self.init_step > max_step {
            self.init_step = max_step;
        }
        self.max_step = max_step;
    }

    /// Set the minimum step size and sets the initial step to that value if currently smaller
    pub fn set_min_step(&mut self, min_step: Duration) {
        if self.init_step < min_step {
            self.init_step = min_step;
        }
        self.min_step = min_step;
    }
}

impl<E: ErrorCtrl> fmt::Display for PropOpts<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "init_step: {}, min_step: {}, max_step: {}, rel_tol: {:e}, abs_tol: {:e}, attempts: {}, error control: {:?}",
            self.init_step,
            self.min_step,
            self.max_step,
            self.rel_tol,
            self.abs_tol,
            self.attempts,
            self.error_ctrl
        )
    }
}

impl Default for PropOpts<RmsScaled> {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[test]
fn test_options() {
    use super::LargestScaled;

    let opts = PropOpts::<RmsScaled>::default();
    assert_eq!(opts.init_step, 1.0 * Unit::Second);
    assert_eq!(opts.min_step, 1.0 * Unit::Microsecond);
    assert_eq!(opts.max_step, 10.0 * Unit::Second);
    assert!((opts.rel_tol - 1e-9).abs() < f64::EPSILON);
    assert!((opts.abs_tol - 1e-9).abs() < f64::EPSILON);
    assert_eq!(opts.attempts, 50);

    let opts = PropOpts::<LargestScaled>::interactive();
    assert!((opts.rel_tol - 1e-5).abs() < f64::EPSILON);
    assert!((opts.abs_tol - 1e-3).abs() < f64::EPSILON);

    let mut opts = PropOpts::<RmsScaled>::builder()
        .init_step(5.0 * Unit::Second)
        .build();
    opts.set_max_step(2.0 * Unit::Second);
    assert_eq!(opts.init_step, 2.0 * Unit::Second);
    assert_eq!(opts.max_step, 2.0 * Unit::Second);
    opts.set_min_step(3.0 * Unit::Second);
    assert_eq!(opts.init_step, 3.0 * Unit::Second);
}
