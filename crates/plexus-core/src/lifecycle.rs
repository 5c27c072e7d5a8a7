//! Sole owner of a scene's GPU-side resources.
//!
//! Backends allocate on attach, reconfigure on resize, draw on present and
//! free on release. The manager turns every backend failure into a state
//! change instead of an error in the frame loop: a failed attach leaves the
//! scene detached, a lost context stops drawing, and release runs exactly
//! once no matter how often `dispose` is called.

use crate::packed::{AllocationRequest, FrameData};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("GPU allocation failed: {0}")]
    Allocation(String),
    #[error("GPU context lost")]
    ContextLost,
    /// Transient; only the current frame is affected.
    #[error("frame dropped: {0}")]
    FrameDropped(String),
}

/// Drawing surface plus the buffers and pipelines that live on it.
pub trait RenderBackend {
    /// Allocate every buffer/material sized by `request`.
    fn allocate(&mut self, request: &AllocationRequest) -> Result<(), BackendError>;
    /// Reconfigure the surface for a new physical size; scene data is untouched.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError>;
    fn draw(&mut self, frame: &FrameData<'_>) -> Result<(), BackendError>;
    /// Free everything, including the surface. Called at most once.
    fn release(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// No backend, or attach failed; simulation runs without drawing.
    Detached,
    Attached,
    /// Context went away mid-session; a fresh attach may recover.
    Lost,
    Disposed,
}

pub struct ResourceLifecycleManager {
    backend: Option<Box<dyn RenderBackend>>,
    state: LifecycleState,
    physical_size: (u32, u32),
}

impl ResourceLifecycleManager {
    pub fn new() -> Self {
        Self {
            backend: None,
            state: LifecycleState::Detached,
            physical_size: (1, 1),
        }
    }

    /// Allocate `backend`'s resources. Returns false (and keeps the scene
    /// simulating without output) when allocation fails or after dispose.
    pub fn attach(&mut self, mut backend: Box<dyn RenderBackend>, request: &AllocationRequest) -> bool {
        if self.state == LifecycleState::Disposed {
            log::debug!("attach after dispose ignored");
            return false;
        }
        self.release_backend();
        match backend.allocate(request) {
            Ok(()) => {
                self.backend = Some(backend);
                self.state = LifecycleState::Attached;
                self.physical_size = request.physical_size;
                log::info!(
                    "render resources attached: nodes={} link_vertices={} pulses={} size={}x{}",
                    request.node_capacity,
                    request.link_vertex_capacity,
                    request.pulse_capacity,
                    request.physical_size.0,
                    request.physical_size.1
                );
                true
            }
            Err(e) => {
                log::warn!("render attach failed, continuing without output: {e}");
                backend.release();
                self.state = LifecycleState::Detached;
                false
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if self.state != LifecycleState::Attached || size == self.physical_size {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        match backend.resize(size.0, size.1) {
            Ok(()) => self.physical_size = size,
            Err(BackendError::ContextLost) => self.mark_lost(),
            Err(e) => log::warn!("resize to {}x{} failed: {e}", size.0, size.1),
        }
    }

    /// Draw one frame. Returns whether anything was drawn; never fails.
    pub fn present(&mut self, frame: &FrameData<'_>) -> bool {
        if self.state != LifecycleState::Attached {
            return false;
        }
        let Some(backend) = self.backend.as_mut() else {
            return false;
        };
        match backend.draw(frame) {
            Ok(()) => true,
            Err(BackendError::ContextLost) => {
                self.mark_lost();
                false
            }
            Err(BackendError::FrameDropped(reason)) => {
                log::trace!("frame dropped: {reason}");
                false
            }
            Err(e) => {
                log::warn!("draw failed: {e}");
                false
            }
        }
    }

    /// Stop issuing draw calls; resources stay owned until dispose or re-attach.
    pub fn mark_lost(&mut self) {
        if self.state == LifecycleState::Attached {
            log::warn!("GPU context lost, rendering paused while simulation continues");
            self.state = LifecycleState::Lost;
        }
    }

    /// Release everything. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.state = LifecycleState::Disposed;
        self.release_backend();
        log::debug!("render resources disposed");
    }

    fn release_backend(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.release();
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_rendering(&self) -> bool {
        self.state == LifecycleState::Attached
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.physical_size
    }
}

impl Default for ResourceLifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResourceLifecycleManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
