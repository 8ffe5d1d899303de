//! Core of an HLS video-player widget: a scrolling text overlay driven by a
//! frame clock, and the coordinator that keeps the custom controls in step
//! with the media element.

pub mod error;
pub mod overlay;
pub mod player;
pub mod settings;
pub mod sim;
pub mod widget;
