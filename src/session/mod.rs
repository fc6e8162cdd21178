//! Interactive session controller.
//!
//! Drives capture, learning and classification in response to discrete
//! operator commands, one per frame-paced tick. The controller owns the
//! class store and the current frame; commands mutate the store strictly
//! between classification passes, so no locking is needed anywhere.

use crate::capture::{ClassifyConfig, Frame, FrameSource, SourceError};
use crate::classes::{ClassStore, BACKGROUND_CLASS, PRIMARY_OBJECT_CLASS};
use crate::classify::{classify, classify_grouped, LabelGrid};
use crate::histogram::{ColorHistogram, Region};
use thiserror::Error;

/// Errors that can end or prevent a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The frame source produced no first frame; fatal at session start.
    #[error("no initial frame from source: {0}")]
    NoInitialFrame(#[source] SourceError),
    /// Frame acquisition failed mid-session.
    #[error("frame acquisition failed: {0}")]
    Source(#[from] SourceError),
}

/// A discrete operator command, at most one consumed per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Quit,
    /// Stop or resume pulling new frames from the source.
    ToggleFreeze,
    /// Report the histogram distance between the frame's left and right
    /// halves (diagnostic).
    ProbeSymmetry,
    /// Re-learn the background: clear class 0 and sample one prototype per
    /// coarse tile of the current frame.
    CaptureBackground,
    /// Overwrite the primary object's prototype with a sample of the
    /// central target region.
    CaptureObject,
    /// Add a new class seeded from the central target region.
    AddClass,
    /// Toggle the classification overlay on or off.
    ToggleRecognition,
    /// Restore the store to its initial two-class state.
    ResetAll,
}

impl Command {
    /// Maps a keyboard character to a command, following the session's
    /// conventional bindings. Returns `None` for unbound keys.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'q' => Some(Self::Quit),
            'f' => Some(Self::ToggleFreeze),
            'v' => Some(Self::ProbeSymmetry),
            'b' => Some(Self::CaptureBackground),
            'a' => Some(Self::CaptureObject),
            'n' => Some(Self::AddClass),
            'r' => Some(Self::ToggleRecognition),
            'c' => Some(Self::ResetAll),
            _ => None,
        }
    }
}

/// What the presentation boundary should draw for one tick.
#[derive(Debug, Clone)]
pub enum TickOutput {
    /// Recognition is off (or nothing is learned yet): draw the frame with
    /// the fixed guide rectangle.
    Guide(Region),
    /// Recognition is on: paint each grid cell with its class color,
    /// alpha-blended over a grayscale rendition of the frame.
    Overlay(LabelGrid),
}

/// Outcome of one tick.
#[derive(Debug)]
pub enum TickStatus {
    /// The session continues; present this output.
    Running(TickOutput),
    /// The operator quit.
    Finished,
}

/// Presentation seam: consumes one frame and its tick output per tick.
///
/// Real rendering (window management, blending, rectangle drawing) is an
/// external collaborator; the core only hands over the data.
pub trait Presenter {
    /// Presents one tick's frame and output.
    fn present(&mut self, frame: &Frame, output: &TickOutput);
}

/// Presenter that summarizes each tick through the log, for headless runs
/// and tests.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &Frame, output: &TickOutput) {
        match output {
            TickOutput::Guide(region) => {
                tracing::debug!(sequence = frame.sequence(), ?region, "guide frame");
            }
            TickOutput::Overlay(grid) => {
                tracing::debug!(
                    sequence = frame.sequence(),
                    cols = grid.cols(),
                    rows = grid.rows(),
                    assigned = grid.assigned_count(),
                    "overlay frame"
                );
            }
        }
    }
}

/// The interactive session state machine.
///
/// `frozen` and `recognizing` are orthogonal flags; every other piece of
/// state lives in the owned [`ClassStore`]. The controller is strictly
/// single-threaded: it consumes at most one command per tick and never
/// mutates the store while a classification pass is in progress.
pub struct SessionController {
    store: ClassStore,
    config: ClassifyConfig,
    /// The tick's working frame, owned by the controller so a frozen frame
    /// can be re-classified and re-rendered across ticks.
    frame: Frame,
    /// Fixed central target rectangle for object capture.
    target: Region,
    frozen: bool,
    recognizing: bool,
    /// Classify at macro-block granularity instead of per block.
    grouped: bool,
    ticks: u64,
}

impl SessionController {
    /// Starts a session by pulling the first frame from the source.
    ///
    /// Failure to obtain that frame is fatal (the caller should exit with a
    /// non-zero status).
    pub fn start(
        source: &mut dyn FrameSource,
        store: ClassStore,
        config: ClassifyConfig,
    ) -> Result<Self, SessionError> {
        let frame = source.capture().map_err(SessionError::NoInitialFrame)?;
        let target = Region::centered(frame.width(), frame.height(), config.target_size);
        tracing::info!(
            width = frame.width(),
            height = frame.height(),
            ?target,
            "session started"
        );
        Ok(Self {
            store,
            config,
            frame,
            target,
            frozen: false,
            recognizing: false,
            grouped: false,
            ticks: 0,
        })
    }

    /// Selects grouped (macro-block) classification for the overlay.
    pub fn set_grouped(&mut self, grouped: bool) {
        self.grouped = grouped;
    }

    /// Returns true while new frames are not being pulled.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns true while the classification overlay is enabled.
    pub fn is_recognizing(&self) -> bool {
        self.recognizing
    }

    /// Returns the learned class store.
    pub fn store(&self) -> &ClassStore {
        &self.store
    }

    /// Returns the tick's working frame.
    pub fn current_frame(&self) -> &Frame {
        &self.frame
    }

    /// Returns the number of ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one tick: pull a frame (unless frozen), apply at most one
    /// command, then produce the tick's output.
    ///
    /// Commands are applied before classification, so a capture command
    /// always sees the frame the operator saw, and the store is never
    /// mutated during a pass.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        command: Option<Command>,
    ) -> Result<TickStatus, SessionError> {
        self.ticks += 1;

        if matches!(command, Some(Command::Quit)) {
            tracing::info!(ticks = self.ticks, "session finished");
            return Ok(TickStatus::Finished);
        }

        if !self.frozen {
            self.frame = source.capture()?;
        }

        if let Some(cmd) = command {
            self.apply(cmd);
        }

        let output = if self.recognizing && self.store.has_prototypes() {
            let grid = if self.grouped {
                classify_grouped(&self.frame, self.config.block_size, &self.store)
            } else {
                classify(&self.frame, self.config.block_size, &self.store)
            };
            TickOutput::Overlay(grid)
        } else {
            TickOutput::Guide(self.target)
        };

        Ok(TickStatus::Running(output))
    }

    /// Applies one operator command to the session state.
    fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => unreachable!("quit is handled before apply"),
            Command::ToggleFreeze => {
                self.frozen = !self.frozen;
                tracing::info!(frozen = self.frozen, "freeze toggled");
            }
            Command::ProbeSymmetry => {
                let distance = self.probe_symmetry();
                tracing::info!(distance, "left/right histogram distance");
            }
            Command::CaptureBackground => {
                let count = self.capture_background();
                tracing::info!(prototypes = count, "background captured");
            }
            Command::CaptureObject => {
                let hist = ColorHistogram::from_region(&self.frame, self.target);
                self.store.replace_prototypes(PRIMARY_OBJECT_CLASS, hist);
                tracing::info!("object prototype captured");
            }
            Command::AddClass => {
                let hist = ColorHistogram::from_region(&self.frame, self.target);
                let index = self.store.add_class(hist);
                tracing::info!(class = index, "class added from target region");
            }
            Command::ToggleRecognition => {
                self.recognizing = !self.recognizing;
                tracing::info!(recognizing = self.recognizing, "recognition toggled");
            }
            Command::ResetAll => {
                self.store.reset();
            }
        }
    }

    /// Distance between the histograms of the frame's left and right halves.
    pub fn probe_symmetry(&self) -> f32 {
        let (w, h) = (self.frame.width(), self.frame.height());
        let left = ColorHistogram::from_region(&self.frame, Region::left_half(w, h));
        let right = ColorHistogram::from_region(&self.frame, Region::right_half(w, h));
        left.distance(&right)
    }

    /// Re-learns the background: clears class 0, then samples one prototype
    /// per full coarse tile of the current frame. Returns the number of
    /// prototypes stored.
    fn capture_background(&mut self) -> usize {
        self.store.clear_prototypes(BACKGROUND_CLASS);

        let tile = self.config.background_block;
        let cols = self.frame.width() / tile;
        let rows = self.frame.height() / tile;
        for row in 0..rows {
            for col in 0..cols {
                let region = Region::new(col * tile, row * tile, tile, tile);
                let hist = ColorHistogram::from_region(&self.frame, region);
                self.store.add_prototype(BACKGROUND_CLASS, hist);
            }
        }
        self.store.class(BACKGROUND_CLASS).prototypes().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureConfig, MockCamera};
    use crate::classes::Palette;

    fn open_camera() -> MockCamera {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::default()).unwrap();
        camera
    }

    fn start_session(camera: &mut MockCamera) -> SessionController {
        let store = ClassStore::with_palette(Palette::from_seed([1u8; 32], 50.0));
        SessionController::start(camera, store, ClassifyConfig::default()).unwrap()
    }

    #[test]
    fn test_start_requires_first_frame() {
        let mut camera = MockCamera::new(); // never opened
        let store = ClassStore::new();
        let result = SessionController::start(&mut camera, store, ClassifyConfig::default());

        assert!(matches!(result, Err(SessionError::NoInitialFrame(_))));
    }

    #[test]
    fn test_quit_finishes_session() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        let status = session.tick(&mut camera, Some(Command::Quit)).unwrap();
        assert!(matches!(status, TickStatus::Finished));
    }

    #[test]
    fn test_guide_until_recognition_enabled() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        let status = session.tick(&mut camera, None).unwrap();
        assert!(matches!(status, TickStatus::Running(TickOutput::Guide(_))));
    }

    #[test]
    fn test_recognition_with_empty_store_shows_guide() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        // Recognition on, but nothing learned: still the guide path
        let status = session
            .tick(&mut camera, Some(Command::ToggleRecognition))
            .unwrap();
        assert!(session.is_recognizing());
        assert!(matches!(status, TickStatus::Running(TickOutput::Guide(_))));
    }

    #[test]
    fn test_capture_background_then_recognize() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        session
            .tick(&mut camera, Some(Command::CaptureBackground))
            .unwrap();
        // 640x480 at 128-px tiles: 5x3 = 15 background prototypes
        assert_eq!(session.store().class(BACKGROUND_CLASS).prototypes().len(), 15);

        let status = session
            .tick(&mut camera, Some(Command::ToggleRecognition))
            .unwrap();
        match status {
            TickStatus::Running(TickOutput::Overlay(grid)) => {
                assert_eq!(grid.cols(), 40);
                assert_eq!(grid.rows(), 30);
                assert_eq!(grid.assigned_count(), 40 * 30);
            }
            other => panic!("expected overlay, got {:?}", other),
        }
    }

    #[test]
    fn test_grouped_mode_coarsens_grid() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);
        session.set_grouped(true);

        session
            .tick(&mut camera, Some(Command::CaptureBackground))
            .unwrap();
        let status = session
            .tick(&mut camera, Some(Command::ToggleRecognition))
            .unwrap();

        match status {
            TickStatus::Running(TickOutput::Overlay(grid)) => {
                assert_eq!(grid.block_size(), 64);
                assert_eq!(grid.cols(), 10);
                assert_eq!(grid.rows(), 7);
            }
            other => panic!("expected overlay, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_object_overwrites_slot() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        session
            .tick(&mut camera, Some(Command::CaptureObject))
            .unwrap();
        session
            .tick(&mut camera, Some(Command::CaptureObject))
            .unwrap();

        // Overwrite, not append: exactly one prototype in the slot
        assert_eq!(
            session.store().class(PRIMARY_OBJECT_CLASS).prototypes().len(),
            1
        );
    }

    #[test]
    fn test_add_class_grows_store() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        session.tick(&mut camera, Some(Command::AddClass)).unwrap();
        session.tick(&mut camera, Some(Command::AddClass)).unwrap();

        assert_eq!(session.store().class_count(), 4);
    }

    #[test]
    fn test_reset_all_restores_two_classes() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        session.tick(&mut camera, Some(Command::AddClass)).unwrap();
        session
            .tick(&mut camera, Some(Command::CaptureBackground))
            .unwrap();
        session.tick(&mut camera, Some(Command::ResetAll)).unwrap();

        assert_eq!(session.store().class_count(), 2);
        assert!(!session.store().has_prototypes());
    }

    #[test]
    fn test_freeze_keeps_frame() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);

        session
            .tick(&mut camera, Some(Command::ToggleFreeze))
            .unwrap();
        assert!(session.is_frozen());

        let seq_before = session.frame.sequence();
        session.tick(&mut camera, None).unwrap();
        assert_eq!(session.frame.sequence(), seq_before);

        session
            .tick(&mut camera, Some(Command::ToggleFreeze))
            .unwrap();
        session.tick(&mut camera, None).unwrap();
        assert!(session.frame.sequence() > seq_before);
    }

    #[test]
    fn test_probe_symmetry_zero_on_uniform_frame() {
        let mut camera = open_camera();
        let mut session = start_session(&mut camera);
        session.frame = Frame::uniform([80, 80, 80], 640, 480);

        assert_eq!(session.probe_symmetry(), 0.0);
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key('q'), Some(Command::Quit));
        assert_eq!(Command::from_key('f'), Some(Command::ToggleFreeze));
        assert_eq!(Command::from_key('v'), Some(Command::ProbeSymmetry));
        assert_eq!(Command::from_key('b'), Some(Command::CaptureBackground));
        assert_eq!(Command::from_key('a'), Some(Command::CaptureObject));
        assert_eq!(Command::from_key('n'), Some(Command::AddClass));
        assert_eq!(Command::from_key('r'), Some(Command::ToggleRecognition));
        assert_eq!(Command::from_key('c'), Some(Command::ResetAll));
        assert_eq!(Command::from_key('x'), None);
    }
}
