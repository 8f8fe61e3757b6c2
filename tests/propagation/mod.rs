mod batch;
mod entry;
mod integrators;
