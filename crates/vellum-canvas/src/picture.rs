//! Recording draw instructions for later playback.

use tracing::{debug, trace};
use vellum_core::Rect;
use vellum_core::logging::targets;

use crate::error::RenderError;
use crate::renderer::{DrawInstruction, Renderer};

/// A [`Renderer`] that records every instruction it receives.
///
/// Recording never fails. Turn the recording into a [`Picture`] with
/// [`finish_recording`](Self::finish_recording).
#[derive(Debug, Clone, Default)]
pub struct PictureRecorder {
    instructions: Vec<DrawInstruction>,
    cull_rect: Option<Rect>,
}

impl PictureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with a cull rectangle that players may use to skip the
    /// picture entirely.
    pub fn with_cull_rect(cull_rect: Rect) -> Self {
        Self {
            instructions: Vec::new(),
            cull_rect: Some(cull_rect),
        }
    }

    /// Number of instructions recorded so far.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Seal the recording.
    pub fn finish_recording(self) -> Picture {
        let bounds = self
            .instructions
            .iter()
            .map(DrawInstruction::bounds)
            .reduce(|a, b| a.union(&b));
        debug!(
            target: targets::PICTURE,
            instructions = self.instructions.len(),
            ?bounds,
            "finished recording"
        );
        Picture {
            instructions: self.instructions,
            cull_rect: self.cull_rect,
            bounds,
        }
    }
}

impl Renderer for PictureRecorder {
    fn submit(&mut self, instruction: DrawInstruction) -> Result<(), RenderError> {
        self.instructions.push(instruction);
        Ok(())
    }
}

/// An immutable, ordered list of recorded draw instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    instructions: Vec<DrawInstruction>,
    cull_rect: Option<Rect>,
    bounds: Option<Rect>,
}

impl Picture {
    #[inline]
    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The cull rectangle given when recording started.
    #[inline]
    pub fn cull_rect(&self) -> Option<Rect> {
        self.cull_rect
    }

    /// Union of the device bounds of every instruction, `None` when empty.
    #[inline]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Submit every instruction to `renderer` in recording order.
    ///
    /// Stops at the first error and returns it. On success returns the
    /// number of instructions submitted.
    pub fn playback<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<usize, RenderError> {
        for (index, instruction) in self.instructions.iter().enumerate() {
            if let Err(err) = renderer.submit(instruction.clone()) {
                debug!(target: targets::PICTURE, index, error = %err, "playback stopped");
                return Err(err);
            }
        }
        trace!(target: targets::PICTURE, instructions = self.len(), "played back picture");
        Ok(self.len())
    }
}
