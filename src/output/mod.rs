//! Checks on files written by ffmpeg

pub mod verifier;

pub use verifier::{duration_tolerance, OutputVerifier};
