//! C entry points for firmware that drives a single, global pitch detector.

#[macro_use]
extern crate lazy_static;

pub mod pitchdetector;
