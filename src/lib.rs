//! Hand pose and facial expression classification.
//!
//! This crate turns the landmarks produced by an external hand/face landmark detector into
//! discrete labels: the [chirality][hand::chirality] of each hand, the set of
//! [extended fingers][hand::fingers] and the [facial expression][face::expression] of each face.
//! The [`frame`] module ties everything together for one video frame.
//!
//! Every classifier is a pure function of its landmark input. Nothing is carried over from one
//! frame to the next.
//!
//! # Coordinates
//!
//! Landmark X and Y coordinates are normalized to the input image, so they lie in range 0.0 to 1.0
//! with Y pointing *down*. Z is the depth reported by the detector, relative to the camera.
//! Computations that need pixel coordinates project landmarks with [`geometry::pixel`].
//!
//! # Environment Variables
//!
//! * `NEXUS_CONFIG`: Path to a JSON file that overrides the default classifier parameters (see
//!   [`config::Config`]). If unset, the defaults are used.
//! * `RUST_LOG`: Overrides the log filter set by [`init_logger!`].

pub mod config;
pub mod face;
pub mod frame;
pub mod geometry;
pub mod hand;
pub mod landmark;
pub mod num;
pub mod resolution;
pub mod timer;


use log::LevelFilter;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library will log at *debug* level, unless overridden by `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
