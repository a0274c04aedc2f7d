use std::time::{Duration, Instant};

use raymancer_common::{CameraPose, PixelBuffer};
use raymancer_persist::{EncodeError, FrameSink};
use raymancer_render::{OverheadMapRenderer, RenderError, Renderer, Scene};

use crate::timer::FrameTimer;

/// One degree, the default camera turn between frames.
pub const DEFAULT_ANGLE_STEP: f32 = std::f32::consts::TAU / 360.0;

/// How many frames to produce and how far to turn between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceConfig {
    pub frame_count: u32,
    /// Radians added to the camera angle before each frame.
    pub angle_step: f32,
    /// Frames kept in the rolling timing window.
    pub timing_window: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frame_count: 360,
            angle_step: DEFAULT_ANGLE_STEP,
            timing_window: 60,
        }
    }
}

/// Where the sequencer is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    /// Frame `k` (1-based) is the one most recently handed out.
    Rendering(u32),
    Done,
}

/// Errors that abort a sequence.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("render failed at frame {frame}: {source}")]
    Render {
        frame: u32,
        #[source]
        source: RenderError,
    },
    #[error("encode failed at frame {frame}: {source}")]
    Encode {
        frame: u32,
        #[source]
        source: EncodeError,
    },
    #[error("overhead map render failed: {0}")]
    MapRender(#[source] RenderError),
    #[error("overhead map encode failed: {0}")]
    MapEncode(#[source] EncodeError),
    #[error("invalid sequence configuration: {0}")]
    InvalidConfig(String),
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct SequenceStats {
    pub frames_rendered: u32,
    pub total_time: Duration,
    pub average_frame: Duration,
    pub slowest_frame: Duration,
    pub fastest_frame: Duration,
    pub final_angle: f32,
}

/// `Idle -> Rendering(1) -> ... -> Rendering(F) -> Done`.
///
/// The pose is turned by `angle_step` before every frame, so frame `k` is
/// rendered at `initial.angle + k * angle_step`.
#[derive(Debug)]
pub struct FrameSequencer {
    config: SequenceConfig,
    initial: CameraPose,
    camera: CameraPose,
    state: SequenceState,
    timer: FrameTimer,
}

impl FrameSequencer {
    pub fn new(initial: CameraPose, config: SequenceConfig) -> Result<Self, SequenceError> {
        if !config.angle_step.is_finite() {
            return Err(SequenceError::InvalidConfig(format!(
                "angle step must be finite, got {}",
                config.angle_step
            )));
        }
        Ok(Self {
            config,
            initial,
            camera: initial,
            state: SequenceState::Idle,
            timer: FrameTimer::new(config.timing_window),
        })
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Current pose: the pose of the last frame handed out.
    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    /// Pose the sequence started from; the overhead map is drawn with it.
    pub fn initial_pose(&self) -> &CameraPose {
        &self.initial
    }

    /// Step the state machine. Returns the next frame index and its pose
    /// snapshot, or `None` once the sequence is done.
    pub fn advance(&mut self) -> Option<(u32, CameraPose)> {
        let next = match self.state {
            SequenceState::Idle => 1,
            SequenceState::Rendering(k) => k + 1,
            SequenceState::Done => return None,
        };
        if next > self.config.frame_count {
            self.state = SequenceState::Done;
            return None;
        }
        self.camera = self.camera.rotated(self.config.angle_step);
        self.state = SequenceState::Rendering(next);
        Some((next, self.camera))
    }

    /// Render and emit every remaining frame.
    pub fn run<R, S>(
        &mut self,
        renderer: &R,
        scene: &Scene<'_>,
        sink: &mut S,
    ) -> Result<SequenceStats, SequenceError>
    where
        R: Renderer<Output = Result<PixelBuffer, RenderError>>,
        S: FrameSink + ?Sized,
    {
        let _span = tracing::info_span!("sequence", frames = self.config.frame_count).entered();
        let mut rendered = 0;

        while let Some((frame, pose)) = self.advance() {
            let _frame_span = tracing::info_span!("frame", frame).entered();
            let start = Instant::now();

            let image = renderer
                .render(scene, &pose)
                .map_err(|source| SequenceError::Render { frame, source })?;
            sink.emit_frame(frame, pose.angle, &image)
                .map_err(|source| SequenceError::Encode { frame, source })?;

            let dt = start.elapsed();
            self.timer.record(dt);
            rendered += 1;
            tracing::debug!(angle = pose.angle, elapsed = ?dt, "frame emitted");
        }

        let stats = SequenceStats {
            frames_rendered: rendered,
            total_time: self.timer.total(),
            average_frame: self.timer.average(),
            slowest_frame: self.timer.max(),
            fastest_frame: self.timer.min(),
            final_angle: self.camera.angle,
        };
        tracing::info!(
            frames = stats.frames_rendered,
            total = ?stats.total_time,
            average = ?stats.average_frame,
            "sequence complete"
        );
        Ok(stats)
    }

    /// Render the overhead map at the initial pose and emit it.
    ///
    /// Returns the number of wall cells drawn.
    pub fn emit_overhead_map<S>(
        &self,
        renderer: &OverheadMapRenderer,
        scene: &Scene<'_>,
        sink: &mut S,
    ) -> Result<usize, SequenceError>
    where
        S: FrameSink + ?Sized,
    {
        let pose = self.initial;
        let map = renderer
            .render(scene, &pose)
            .map_err(SequenceError::MapRender)?;
        sink.emit_overhead_map(pose.angle, &map.image)
            .map_err(SequenceError::MapEncode)?;
        Ok(map.filled_cells)
    }
}
