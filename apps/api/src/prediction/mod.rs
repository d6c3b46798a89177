// Half-marathon prediction on top of an extracted or hand-filled profile.
// The regression itself is opaque behind the `Predictor` trait.

pub mod handlers;
pub mod model;
pub mod validation;
