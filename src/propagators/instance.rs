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

use super::error_ctrl::ErrorCtrl;
use super::{
    DynamicsSnafu, EventSearchSnafu, IntegrationDetails, PropStats, PropagationError, Propagator,
    TrajectorySnafu,
};
use crate::cosmic::EntryState;
use crate::dynamics::{Dynamics, DynamicsError};
use crate::linalg::Vector6;
use crate::md::events::{EventDetails, EventEvaluator};
use crate::md::trajectory::Traj;
use crate::time::{Duration, Unit};
use snafu::ResultExt;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Largest growth factor of the step size between two consecutive steps.
const MAX_STEP_GROWTH: f64 = 5.0;
/// Largest reduction factor of the step size between two attempts.
const MAX_STEP_SHRINK: f64 = 0.2;

/// A PropInstance is a propagator running from a given state: it includes the current time and state,
/// the integrator details of the previous step, and the counters of the propagation.
#[derive(Debug)]
pub struct PropInstance<'a, D: Dynamics, E: ErrorCtrl> {
    /// Time since the start of the propagation, in seconds
    pub t_s: f64,
    /// The state vector of this propagator instance
    pub state: Vector6<f64>,
    /// The propagator setup (kind, stages, etc.)
    pub prop: &'a Propagator<D, E>,
    /// Stores the details of the previous integration step
    pub details: IntegrationDetails,
    /// Counters of this propagation
    pub stats: PropStats,
    // Derivative at the current state, reused as the first stage of the next step
    pub(crate) state_dot: Option<Vector6<f64>>,
    pub(crate) step_size_s: f64, // Stores the adapted step for the _next_ call
    // Allows us to do pre-allocation of the ki vectors
    pub(crate) k: Vec<Vector6<f64>>,
}

impl<'a, D: Dynamics, E: ErrorCtrl> PropInstance<'a, D, E> {
    /// Allows setting the step size of the propagator
    pub fn set_step(&mut self, step_size: Duration) {
        self.step_size_s = step_size.to_seconds();
    }

    /// Returns the current state as an entry state.
    pub fn entry_state(&self) -> EntryState {
        EntryState::from_vector(&self.state)
    }

    /// Propagates for the provided duration and returns the final state vector.
    pub fn for_duration(&mut self, duration: Duration) -> Result<Vector6<f64>, PropagationError> {
        let stop_s = self.t_s + duration.to_seconds();

        #[cfg(not(target_arch = "wasm32"))]
        let tick = Instant::now();

        while self.t_s < stop_s {
            self.step_until(stop_s)?;
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let tock: Duration = tick.elapsed().into();
            debug!("Propagated for {duration} in {tock} ({})", self.stats);
        }

        Ok(self.state)
    }

    /// Propagates until the first falling edge of the event, i.e. until the event function goes from
    /// positive to zero or negative, or until `max_duration` has elapsed.
    ///
    /// Returns the details of the event, refined with a Brent solver on the dense output, and the
    /// trajectory of all of the accepted steps up to and including the step where the event happened.
    /// If the event does not happen within `max_duration`, an `EventNotReached` error is returned.
    pub fn until_event<F: EventEvaluator>(
        &mut self,
        max_duration: Duration,
        event: &F,
    ) -> Result<(EventDetails, Traj), PropagationError> {
        info!("Searching for {event} within {max_duration}");
        let stop_s = self.t_s + max_duration.to_seconds();

        #[cfg(not(target_arch = "wasm32"))]
        let tick = Instant::now();

        let mut traj = Traj::new();
        let state_dot = self.current_derivative()?;
        traj.push(self.t_s, self.state, state_dot)
            .context(TrajectorySnafu {})?;

        let mut prev_value = event.eval(&self.entry_state());

        while self.t_s < stop_s {
            let prev_t_s = self.t_s;
            self.step_until(stop_s)?;
            let state_dot = self.current_derivative()?;
            traj.push(self.t_s, self.state, state_dot)
                .context(TrajectorySnafu {})?;

            let value = event.eval(&self.entry_state());
            if prev_value > 0.0 && value <= 0.0 {
                debug!(
                    "{event} bracketed between {prev_t_s} s ({prev_value:e}) and {} s ({value:e})",
                    self.t_s
                );
                let details = traj
                    .find_bracketed(prev_t_s, self.t_s, event)
                    .context(EventSearchSnafu {})?;

                #[cfg(not(target_arch = "wasm32"))]
                {
                    let tock: Duration = tick.elapsed().into();
                    info!("Found {details} in {tock} ({})", self.stats);
                }

                return Ok((details, traj));
            }
            prev_value = value;
        }

        Err(PropagationError::EventNotReached {
            event: format!("{event}"),
            time_limit: max_duration,
            state: self.entry_state(),
        })
    }

    /// Take a single propagator step, without going past `stop_s`.
    ///
    /// If the adapted step would go past `stop_s`, the step is shortened so that the propagation ends
    /// exactly at `stop_s`, and the previous step size is restored for any subsequent call.
    pub fn step_until(&mut self, stop_s: f64) -> Result<(), PropagationError> {
        let remaining_s = stop_s - self.t_s;
        let prev_step_s = self.step_size_s;
        let final_step = self.step_size_s >= remaining_s;
        if final_step {
            self.step_size_s = remaining_s;
        }

        let (step_s, next_state) = self.derive()?;

        if final_step && step_s >= remaining_s {
            self.t_s = stop_s;
            self.step_size_s = prev_step_s;
        } else {
            self.t_s += step_s;
        }
        self.state = next_state;
        self.state_dot = None;
        self.stats.accepted_steps += 1;

        Ok(())
    }

    /// Take a single propagator step.
    pub fn single_step(&mut self) -> Result<(), PropagationError> {
        self.step_until(f64::INFINITY)
    }

    /// Returns the derivative at the current state, evaluating it only if needed.
    pub fn current_derivative(&mut self) -> Result<Vector6<f64>, PropagationError> {
        match self.state_dot {
            Some(state_dot) => Ok(state_dot),
            None => {
                let (t_s, state) = (self.t_s, self.state);
                let state_dot = self.eval_eom(t_s, &state)?;
                self.state_dot = Some(state_dot);
                Ok(state_dot)
            }
        }
    }

    /// Evaluates the equations of motion, and rejects non finite derivatives.
    fn eval_eom(
        &mut self,
        t_s: f64,
        state_vec: &Vector6<f64>,
    ) -> Result<Vector6<f64>, PropagationError> {
        self.stats.evaluations += 1;
        let state_dot = self
            .prop
            .dynamics
            .eom(t_s, state_vec)
            .and_then(|state_dot| {
                if state_dot.iter().all(|x| x.is_finite()) {
                    Ok(state_dot)
                } else {
                    Err(DynamicsError::NonFiniteDerivative {
                        derivative: state_dot,
                    })
                }
            })
            .context(DynamicsSnafu {
                t_s,
                state: EntryState::from_vector(state_vec),
            })?;
        Ok(state_dot)
    }

    /// This method integrates the equations of motion of the dynamics. Everything passed to this function is in **seconds**.
    ///
    /// This function returns the step sized used (in seconds) and the new state as y_{n+1} = y_n + \frac{dy_n}{dt}.
    /// To get the integration details, check `self.latest_details`.
    fn derive(&mut self) -> Result<(f64, Vector6<f64>), PropagationError> {
        let state_vec = self.state;
        let t_s = self.t_s;
        let opts = self.prop.opts;
        let min_step_s = opts.min_step.to_seconds();
        let max_step_s = opts.max_step.to_seconds();
        let order = f64::from(self.prop.order);
        // Reset the number of attempts used (we don't reset the error because it's set before it's read)
        self.details.attempts = 1;
        // Convert the step size to seconds -- it's mutable because we may change it below
        let mut step_size = self.step_size_s;
        // The first stage is the derivative at the current state, which does not depend on the step
        self.k[0] = self.current_derivative()?;
        loop {
            let mut a_idx: usize = 0;
            for i in 0..(self.prop.stages - 1) {
                // Let's compute the c_i by summing the relevant items from the list of coefficients.
                // \sum_{j=1}^{i-1} a_ij  ∀ i ∈ [2, s]
                let mut ci: f64 = 0.0;
                // The wi stores the a_{s1} * k_1 + a_{s2} * k_2 + ... + a_{s, s-1} * k_{s-1} +
                let mut wi = Vector6::<f64>::zeros();
                for kj in &self.k[0..i + 1] {
                    let a_ij = self.prop.a_coeffs[a_idx];
                    ci += a_ij;
                    wi += a_ij * kj;
                    a_idx += 1;
                }

                self.k[i + 1] = self.eval_eom(t_s + ci * step_size, &(state_vec + step_size * wi))?;
            }
            // Compute the next state and the error
            let mut next_state = state_vec;
            // State error estimation from https://en.wikipedia.org/wiki/Runge%E2%80%93Kutta_methods#Adaptive_Runge%E2%80%93Kutta_methods
            let mut error_est = Vector6::<f64>::zeros();
            for (i, ki) in self.k.iter().enumerate() {
                let b_i = self.prop.b_coeffs[i];
                let b_i_star = self.prop.b_coeffs[i + self.prop.stages];
                error_est += step_size * (b_i - b_i_star) * ki;
                next_state += step_size * b_i * ki;
            }

            // Compute the error estimate, normalized by the tolerances.
            self.details.error =
                E::estimate(&error_est, &next_state, &state_vec, opts.rel_tol, opts.abs_tol);
            if self.details.error <= 1.0
                || step_size <= min_step_s
                || self.details.attempts >= opts.attempts
            {
                if self.details.error > 1.0 {
                    if self.details.attempts >= opts.attempts {
                        warn!(
                            "Could not further decrease step size: maximum number of attempts reached ({})",
                            self.details.attempts
                        );
                    } else {
                        warn!(
                            "Accepting step of {step_size:e} s at the minimum step size with a normalized error of {:e}",
                            self.details.error
                        );
                    }
                }

                self.details.step = step_size * Unit::Second;
                if self.details.error < 1.0 {
                    // Error is less than tolerance, let's attempt to increase the step for the next iteration.
                    let factor = if self.details.error > 0.0 {
                        (0.9 * (1.0 / self.details.error).powf(1.0 / order)).min(MAX_STEP_GROWTH)
                    } else {
                        MAX_STEP_GROWTH
                    };
                    self.step_size_s = (step_size * factor).min(max_step_s);
                } else {
                    self.step_size_s = step_size;
                }
                return Ok((step_size, next_state));
            } else {
                // Error is too high and we aren't using the smallest step, and we haven't hit the max number of attempts.
                // So let's adapt the step size.
                self.details.attempts += 1;
                self.stats.rejected_steps += 1;
                let factor = if self.details.error.is_finite() {
                    (0.9 * (1.0 / self.details.error).powf(1.0 / (order - 1.0)))
                        .max(MAX_STEP_SHRINK)
                } else {
                    MAX_STEP_SHRINK
                };
                step_size = (step_size * factor).max(min_step_s);
                // Note that we don't set self.step_size_s, that will be updated right before we return
            }
        }
    }

    /// Copy the details of the latest integration step.
    pub fn latest_details(&self) -> IntegrationDetails {
        self.details
    }
}
