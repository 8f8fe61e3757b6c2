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

use super::details::EventDetails;
use super::{EventError, EventTrajSnafu};
use crate::md::trajectory::Traj;
use crate::md::EventEvaluator;
use snafu::ResultExt;

impl Traj {
    /// Find the exact state where the request event happens. The event function is expected to be monotone in the provided interval because we find the event using a Brent solver.
    ///
    /// The times are in seconds since the start of the trajectory, and the search uses the dense output.
    pub fn find_bracketed<E>(
        &self,
        start_s: f64,
        end_s: f64,
        event: &E,
    ) -> Result<EventDetails, EventError>
    where
        E: EventEvaluator,
    {
        let max_iter = 100;

        // Helper lambdas, for f64s only
        let has_converged =
            |xa: f64, xb: f64| (xa - xb).abs() <= event.epoch_precision().to_seconds();
        let arrange = |a: f64, ya: f64, b: f64, yb: f64| {
            if ya.abs() > yb.abs() {
                (a, ya, b, yb)
            } else {
                (b, yb, a, ya)
            }
        };
        let eval_at = |t_s: f64| -> Result<f64, EventError> {
            let state = self.at(t_s).context(EventTrajSnafu {})?;
            Ok(event.eval(&state))
        };
        let found = |t_s: f64, value: f64| -> Result<EventDetails, EventError> {
            let state = self.at(t_s).context(EventTrajSnafu {})?;
            debug!(
                "{event} -- found with |{value:e}| <= {:e} @ {t_s} s",
                event.value_precision().abs()
            );
            Ok(EventDetails::new(t_s, state, value, event, self))
        };

        let mut xa = start_s;
        let mut xb = end_s;
        // Evaluate the event at both bounds
        let mut ya = eval_at(xa)?;
        let mut yb = eval_at(xb)?;

        // Check if we're already at the root
        if ya.abs() <= event.value_precision().abs() {
            return found(xa, ya);
        } else if yb.abs() <= event.value_precision().abs() {
            return found(xb, yb);
        } else if ya * yb > 0.0 {
            // The event isn't in the bracket
            return Err(EventError::NotFound {
                start_s,
                end_s,
                event: format!("{event}"),
            });
        }

        // The Brent solver, from the roots crate (sadly could not directly integrate it here)
        // Source: https://docs.rs/roots/0.0.5/src/roots/numerical/brent.rs.html#57-131
        (xa, ya, xb, yb) = arrange(xa, ya, xb, yb);
        let (mut xc, mut yc, mut xd) = (xa, ya, xa);
        let mut flag = true;

        for _ in 0..max_iter {
            if ya.abs() < event.value_precision().abs() {
                return found(xa, ya);
            }
            if yb.abs() < event.value_precision().abs() {
                return found(xb, yb);
            }
            if has_converged(xa, xb) {
                // Converged in time, b is the best estimate
                return found(xb, yb);
            }
            let mut s = if (ya - yc).abs() > f64::EPSILON && (yb - yc).abs() > f64::EPSILON {
                xa * yb * yc / ((ya - yb) * (ya - yc))
                    + xb * ya * yc / ((yb - ya) * (yb - yc))
                    + xc * ya * yb / ((yc - ya) * (yc - yb))
            } else {
                xb - yb * (xb - xa) / (yb - ya)
            };
            let cond1 = (s - xb) * (s - (3.0 * xa + xb) / 4.0) > 0.0;
            let cond2 = flag && (s - xb).abs() >= (xb - xc).abs() / 2.0;
            let cond3 = !flag && (s - xb).abs() >= (xc - xd).abs() / 2.0;
            let cond4 = flag && has_converged(xb, xc);
            let cond5 = !flag && has_converged(xc, xd);
            if cond1 || cond2 || cond3 || cond4 || cond5 {
                s = (xa + xb) / 2.0;
                flag = true;
            } else {
                flag = false;
            }
            let ys = eval_at(s)?;
            xd = xc;
            xc = xb;
            yc = yb;
            if ya * ys < 0.0 {
                // Root bracketed between a and s
                (xa, ya, xb, yb) = arrange(xa, ya, s, ys);
            } else {
                // Root bracketed between s and b
                (xa, ya, xb, yb) = arrange(s, ys, xb, yb);
            }
        }
        error!("Brent solver failed after {max_iter} iterations");
        Err(EventError::NotFound {
            start_s,
            end_s,
            event: format!("{event}"),
        })
    }
}
