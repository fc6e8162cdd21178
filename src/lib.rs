//! Chromablock — Online Color-Histogram Block Classifier
//!
//! Labels spatial blocks of a video frame in real time by nearest-prototype
//! matching against incrementally built class exemplars. Classes are grown
//! interactively during a session: the operator captures background tiles,
//! object samples, and new classes from a fixed target region, and toggles
//! a per-block recognition overlay.
//!
//! # Architecture
//!
//! The system follows an explicit per-frame data flow:
//!
//! ```text
//! capture → histogram (region sampling) → classify
//!                                            ↓
//!            classes (prototype store) ──────┘
//!                       ↑
//!            session (operator commands, between frames)
//! ```
//!
//! # Design Principles
//!
//! - **Single-threaded**: one frame-paced tick at a time; operator commands
//!   and classification never interleave within a tick
//! - **Thin seams**: camera, rendering and keyboard input live behind the
//!   [`capture::FrameSource`] and [`session::Presenter`] traits
//! - **Fail-fast preconditions**: sampling an empty region or normalizing an
//!   empty histogram is a programming error, not a recoverable condition
//!
//! # Example
//!
//! ```no_run
//! use chromablock::{
//!     capture::{CaptureConfig, FrameSource, MockCamera},
//!     classes::ClassStore,
//!     classify::classify,
//!     histogram::{ColorHistogram, Region},
//! };
//!
//! // Capture a frame from a (mock) camera
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//! let frame = camera.capture().unwrap();
//!
//! // Learn the central target region as the primary object
//! let mut store = ClassStore::new();
//! let target = Region::centered(frame.width(), frame.height(), 50);
//! store.replace_prototypes(1, ColorHistogram::from_region(&frame, target));
//!
//! // Label every 16x16 block with its nearest class
//! let grid = classify(&frame, 16, &store);
//! println!("{}x{} blocks labeled", grid.cols(), grid.rows());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod classes;
pub mod classify;
pub mod histogram;
pub mod session;

// Re-export commonly used types at crate root
pub use capture::{CaptureConfig, Frame, FrameSource, MockCamera};
pub use classes::{ClassStore, NearestMatch, Rgb};
pub use classify::{classify, classify_grouped, LabelGrid};
pub use histogram::{ColorHistogram, Region};
pub use session::{Command, Presenter, SessionController, TickOutput};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
