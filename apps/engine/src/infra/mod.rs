//! Infrastructure wiring.

pub mod state;
