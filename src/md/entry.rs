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

use super::trajectory::Traj;
use super::{Event, EventEvaluator, StateParameter};
use crate::cosmic::{velocity_by_finite_difference, EntryState, PlanetModel};
use crate::dynamics::{BankAngleLaw, EntryDynamics, VehicleParams};
use crate::errors::{InvalidStateSnafu, InvalidStepSnafu, StartsBelowThresholdSnafu};
use crate::linalg::Vector3;
use crate::propagators::{
    Dormand45, ErrorCtrl, PropOpts, PropStats, PropagationError, Propagator, RmsScaled, RK,
};
use crate::time::{Duration, Unit};
use crate::EntryError;
use rayon::prelude::*;
use snafu::ensure;
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Altitude of the parachute deployment, above the mean radius, in meters.
pub const PARACHUTE_DEPLOY_ALTITUDE_M: f64 = 6_500.0;
/// Speed of sound used as the supersonic parachute deployment speed, in meters per second.
pub const MACH_ONE_M_S: f64 = 236.38;

/// The terminal condition of an entry and the output sampling.
///
/// The propagation stops at the first time the monitored component falls through the threshold,
/// i.e. goes from strictly above it to at or below it.
#[derive(Copy, Clone, Debug, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct TerminationSpec {
    /// Monitored component of the state
    pub parameter: StateParameter,
    /// Threshold in the unit of the monitored parameter
    pub threshold: f64,
    /// Failure if the threshold is not crossed by then
    #[builder(default_code = "1000.0 * Unit::Second")]
    pub time_limit: Duration,
    /// Output sampling step
    #[builder(default_code = "0.02 * Unit::Second")]
    pub step: Duration,
    /// Drop the first and the last resampled points from the output
    #[builder(default = true)]
    pub trim_endpoints: bool,
}

impl TerminationSpec {
    /// Builds the termination from the index of the monitored component in the state vector and
    /// its threshold.
    pub fn from_index(
        index: usize,
        threshold: f64,
        time_limit: Duration,
        step: Duration,
    ) -> Result<Self, EntryError> {
        Ok(Self::builder()
            .parameter(StateParameter::from_index(index)?)
            .threshold(threshold)
            .time_limit(time_limit)
            .step(step)
            .build())
    }

    /// Default threshold for the provided monitored component, if there is one: the parachute
    /// deployment radius for the radius, and Mach one for the velocity.
    pub fn default_threshold(parameter: StateParameter, planet: &PlanetModel) -> Option<f64> {
        match parameter {
            StateParameter::Radius => {
                Some(planet.radius_at_altitude_m(PARACHUTE_DEPLOY_ALTITUDE_M))
            }
            StateParameter::Velocity => Some(MACH_ONE_M_S),
            _ => None,
        }
    }

    /// Parachute deployment at 6.5 km above the mean radius of the planet.
    pub fn parachute_deploy(planet: &PlanetModel) -> Self {
        Self::builder()
            .parameter(StateParameter::Radius)
            .threshold(planet.radius_at_altitude_m(PARACHUTE_DEPLOY_ALTITUDE_M))
            .build()
    }

    /// Supersonic parachute deployment, when the speed drops to Mach one.
    pub fn mach_one() -> Self {
        Self::builder()
            .parameter(StateParameter::Velocity)
            .threshold(MACH_ONE_M_S)
            .build()
    }

    /// The terminal event of this termination.
    pub fn event(&self) -> Event {
        Event::new(self.parameter, self.threshold)
    }
}

impl fmt::Display for TerminationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} falling through {} {} within {}, sampled every {}{}",
            self.parameter,
            self.threshold,
            self.parameter.unit(),
            self.time_limit,
            self.step,
            if self.trim_endpoints {
                " (trimmed)"
            } else {
                ""
            }
        )
    }
}

/// A resampled point of the entry trajectory.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajectorySample {
    /// Time since the entry interface, in seconds
    pub t_s: f64,
    pub state: EntryState,
    /// Planet centered position, in meters
    pub position_m: Vector3<f64>,
    /// Planet centered velocity estimated by finite differences of the positions, in m/s
    pub velocity_m_s: Vector3<f64>,
}

/// The outcome of an entry propagation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    /// Fixed step samples, strictly increasing in time
    pub samples: Vec<TrajectorySample>,
    /// Time of the terminal event, in seconds since the entry interface
    pub event_time_s: f64,
    /// State at the terminal event
    pub event_state: EntryState,
    /// Integrator counters
    pub stats: PropStats,
    /// Accepted integration steps, with their dense output
    pub traj: Traj,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the sample times, in seconds.
    pub fn times_s(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t_s).collect()
    }

    /// Returns the continuous state at the provided time, between the entry interface and the event.
    pub fn state_at(&self, t_s: f64) -> Result<EntryState, EntryError> {
        if t_s > self.event_time_s {
            return Err(EntryError::Trajectory {
                source: super::trajectory::TrajError::OutOfBounds {
                    t_s,
                    start_s: 0.0,
                    end_s: self.event_time_s,
                },
            });
        }
        Ok(self.traj.at(t_s)?)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples, event at {:.6} s with {} ({})",
            self.samples.len(),
            self.event_time_s,
            self.event_state,
            self.stats
        )
    }
}

/// Validates the inputs of a run that do not depend on the propagation.
fn check_inputs(
    init_state: &EntryState,
    termination: &TerminationSpec,
) -> Result<Event, EntryError> {
    ensure!(
        init_state.is_finite(),
        InvalidStateSnafu {
            state: *init_state,
            reason: "non finite component"
        }
    );
    ensure!(
        init_state.radius_m > 0.0,
        InvalidStateSnafu {
            state: *init_state,
            reason: "radius must be strictly positive"
        }
    );
    ensure!(
        termination.step > Duration::ZERO,
        InvalidStepSnafu {
            step: termination.step
        }
    );

    EntryDynamics::check_geometry(init_state).map_err(|source| EntryError::SingularGeometry {
        t_s: 0.0,
        state: *init_state,
        source,
    })?;

    let event = termination.event();
    let initial = init_state.value(termination.parameter);
    ensure!(
        event.eval(init_state) > 0.0,
        StartsBelowThresholdSnafu {
            parameter: termination.parameter,
            initial,
            threshold: termination.threshold
        }
    );
    Ok(event)
}

/// Propagates the entry until the terminal event, then resamples the trajectory every
/// `termination.step` and converts it to planet centered Cartesian coordinates, with the
/// provided integrator and options.
pub fn propagate_and_resample_with<T: RK, E: ErrorCtrl>(
    planet: &PlanetModel,
    init_state: &EntryState,
    vehicle: &VehicleParams,
    control: Arc<dyn BankAngleLaw>,
    termination: &TerminationSpec,
    opts: PropOpts<E>,
) -> Result<SimulationResult, EntryError> {
    let event = check_inputs(init_state, termination)?;

    let dynamics = EntryDynamics::new(planet.clone(), *vehicle, control);
    info!("Propagating {init_state} with {dynamics} until {termination}");

    let prop = Propagator::new::<T>(dynamics, opts);
    let mut instance = prop.with(init_state.to_vector());
    let (details, traj) = instance
        .until_event(termination.time_limit, &event)
        .map_err(|e| match e {
            PropagationError::EventNotReached {
                time_limit, state, ..
            } => EntryError::EventNotReached {
                parameter: termination.parameter,
                threshold: termination.threshold,
                time_limit,
                state,
            },
            e => EntryError::from(e),
        })?;
    let stats = instance.stats;

    let grid = traj.resample(details.t_s, termination.step)?;
    let positions: Vec<Vector3<f64>> = grid.iter().map(|(_, state)| state.position_m()).collect();
    let velocities = velocity_by_finite_difference(&positions, termination.step.to_seconds())?;

    let mut samples: Vec<TrajectorySample> = grid
        .iter()
        .zip(positions.iter().zip(velocities.iter()))
        .map(|((t_s, state), (position_m, velocity_m_s))| TrajectorySample {
            t_s: *t_s,
            state: *state,
            position_m: *position_m,
            velocity_m_s: *velocity_m_s,
        })
        .collect();

    if termination.trim_endpoints {
        // The one sided differences at both ends are the least accurate velocities
        samples.pop();
        if !samples.is_empty() {
            samples.remove(0);
        }
        if samples.len() < 2 {
            warn!(
                "only {} samples left after trimming the endpoints",
                samples.len()
            );
        }
    }

    if samples.is_empty() {
        return Err(EntryError::TooFewSamples { count: 0 });
    }

    info!(
        "{} at {:.6} s, final speed {:.3} m/s, {} samples every {} ({})",
        termination.event(),
        details.t_s,
        details.state.speed_m_s,
        samples.len(),
        termination.step,
        stats
    );

    Ok(SimulationResult {
        samples,
        event_time_s: details.t_s,
        event_state: details.state,
        stats,
        traj,
    })
}

/// Propagates the entry until the terminal event, then resamples the trajectory every
/// `termination.step` and converts it to planet centered Cartesian coordinates.
///
/// Uses a Dormand Prince 4-5 integrator with science grade tolerances (1e-9 relative and absolute).
pub fn propagate_and_resample(
    planet: &PlanetModel,
    init_state: &EntryState,
    vehicle: &VehicleParams,
    control: Arc<dyn BankAngleLaw>,
    termination: &TerminationSpec,
) -> Result<SimulationResult, EntryError> {
    propagate_and_resample_with::<Dormand45, RmsScaled>(
        planet,
        init_state,
        vehicle,
        control,
        termination,
        PropOpts::default(),
    )
}

/// One independent entry run.
#[derive(Clone, Debug)]
pub struct EntryScenario {
    pub planet: PlanetModel,
    pub init_state: EntryState,
    pub vehicle: VehicleParams,
    pub control: Arc<dyn BankAngleLaw>,
    pub termination: TerminationSpec,
}

impl EntryScenario {
    pub fn run(&self) -> Result<SimulationResult, EntryError> {
        propagate_and_resample(
            &self.planet,
            &self.init_state,
            &self.vehicle,
            self.control.clone(),
            &self.termination,
        )
    }
}

/// Runs all of the scenarios in parallel, and returns their results in the same order.
pub fn propagate_batch(scenarios: &[EntryScenario]) -> Vec<Result<SimulationResult, EntryError>> {
    info!("Propagating {} entry scenarios", scenarios.len());
    scenarios.par_iter().map(|scenario| scenario.run()).collect()
}
