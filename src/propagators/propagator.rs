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

use super::error_ctrl::{ErrorCtrl, RmsScaled};
use super::{Dormand45, IntegrationDetails, PropInstance, PropOpts, PropStats, Verner56, RK};
use crate::dynamics::Dynamics;
use crate::linalg::Vector6;
use crate::time::Duration;

/// A Propagator allows propagating a set of dynamics forward in time.
/// It includes the options and the set of coefficients used for the monomorphic instance.
#[derive(Clone, Debug)]
pub struct Propagator<D: Dynamics, E: ErrorCtrl> {
    pub dynamics: D, // Stores the dynamics used. *Must* use this to get the latest values
    pub opts: PropOpts<E>, // Stores the integration options (tolerance, min/max step, init step, etc.)
    pub(crate) order: u8, // Order of the integrator
    pub(crate) stages: usize, // Number of stages, i.e. how many times the derivatives will be called
    pub(crate) a_coeffs: &'static [f64],
    pub(crate) b_coeffs: &'static [f64],
}

impl<D: Dynamics, E: ErrorCtrl> Propagator<D, E> {
    /// Each propagator must be initialized with `new` which stores propagator information.
    pub fn new<T: RK>(dynamics: D, opts: PropOpts<E>) -> Self {
        Self {
            dynamics,
            opts,
            stages: T::STAGES,
            order: T::ORDER,
            a_coeffs: T::A_COEFFS,
            b_coeffs: T::B_COEFFS,
        }
    }

    /// Set the relative and absolute tolerances for the propagator
    pub fn set_tolerances(&mut self, rel_tol: f64, abs_tol: f64) {
        self.opts.rel_tol = rel_tol;
        self.opts.abs_tol = abs_tol;
    }

    /// Set the maximum step size for the propagator and sets the initial step to that value if currently greater
    pub fn set_max_step(&mut self, step: Duration) {
        self.opts.set_max_step(step);
    }

    pub fn set_min_step(&mut self, step: Duration) {
        self.opts.set_min_step(step);
    }

    /// A Dormand Prince 4-5 propagator (the default) with custom propagator options.
    pub fn dp45(dynamics: D, opts: PropOpts<E>) -> Self {
        Self::new::<Dormand45>(dynamics, opts)
    }

    /// A Verner 5-6 propagator with custom propagator options: fewer steps at tight tolerances.
    pub fn verner56(dynamics: D, opts: PropOpts<E>) -> Self {
        Self::new::<Verner56>(dynamics, opts)
    }

    /// Order of the integrator of this propagator.
    pub fn order(&self) -> u8 {
        self.order
    }

    /// Starts a propagation from the provided state at `t = 0`.
    pub fn with(&self, state: Vector6<f64>) -> PropInstance<'_, D, E> {
        // Pre-allocate the k used in the propagator
        let k = vec![Vector6::zeros(); self.stages];
        PropInstance {
            t_s: 0.0,
            state,
            state_dot: None,
            prop: self,
            details: IntegrationDetails {
                step: self.opts.init_step,
                error: 0.0,
                attempts: 1,
            },
            stats: PropStats::default(),
            step_size_s: self.opts.init_step.to_seconds(),
            k,
        }
    }
}

impl<D: Dynamics> Propagator<D, RmsScaled> {
    /// Default propagator is a Dormand Prince 4-5 with the default PropOpts.
    pub fn default(dynamics: D) -> Self {
        Self::new::<Dormand45>(dynamics, PropOpts::default())
    }
}
