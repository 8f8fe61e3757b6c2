mod atmosphere;
mod frames;
