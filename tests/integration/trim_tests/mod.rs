mod determinism;
mod persistence;
