//! Frame input and capture configuration.
//!
//! This module provides abstractions for acquiring frames from a video
//! source and managing session configuration. The camera itself is an
//! external collaborator; the classifier only consumes [`Frame`]s.

mod config;
mod frame;
mod source;

pub use config::{CaptureConfig, ClassifyConfig, ConfigError, FileConfig, SessionConfig};
pub use frame::Frame;
pub use source::{FrameSource, MockCamera, SourceError};
