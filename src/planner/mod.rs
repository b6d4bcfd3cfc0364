//! Join and audio-mix planning module
//!
//! Planners inspect their inputs through a [`MediaInspector`](crate::probe::MediaInspector)
//! and produce immutable plans. They never run the media tool themselves.

pub mod audio_mix;
pub mod concat;

pub use audio_mix::AudioMixPlanner;
pub use concat::ConcatenationPlanner;
