//! Facial expression classification.
//!
//! Faces arrive as a dense mesh of landmarks ([`landmark::FaceLandmarks`]), of which only a few
//! named regions are used to compute an [`expression::Expression`].

pub mod expression;
pub mod landmark;
