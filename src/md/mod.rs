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

/// Terminal events, their details, and the Brent search of their exact time.
pub mod events;
pub use events::{Event, EventDetails, EventEdge, EventEvaluator};

/// Trajectories with cubic Hermite dense output, and their resampling on a fixed time grid.
pub mod trajectory;

mod param;
pub use param::StateParameter;

/// The entry driver: propagation to the terminal event, resampling and frame conversion.
mod entry;
pub use entry::*;
