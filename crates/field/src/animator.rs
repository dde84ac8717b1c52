//! Mount/unmount lifecycle around [`AnimationState`].

use hx_config::{ConnectionIndex, FieldConfig};
use rand::Rng;

use crate::paint::{Point, Surface, SurfaceSize};
use crate::scene::{render_frame, FrameStats};
use crate::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use crate::state::{advance, AnimationState};

/// One mounted particle field.
///
/// Created by [`mount`](Animator::mount). While mounted, it accepts pointer
/// and resize input and redraws once per delivered frame, requesting the next
/// one as it finishes. After [`unmount`](Animator::unmount) every input is
/// ignored and no further frame is requested.
///
/// Mounting against a missing surface, or one without a usable 2D context,
/// produces an inert animator: nothing is allocated, nothing is scheduled
/// and no error is reported.
#[derive(Debug)]
pub struct Animator<S: FrameScheduler> {
    scheduler: S,
    state: Option<AnimationState>,
    pointer: Point,
    pending: Option<FrameHandle>,
    listening: bool,
    index: ConnectionIndex,
    time_scaled: bool,
    stats: FrameStats,
}

impl<S: FrameScheduler> Animator<S> {
    pub fn mount<C, R>(config: &FieldConfig, surface: Option<&mut C>, mut scheduler: S, rng: &mut R) -> Self
    where
        C: Surface,
        R: Rng + ?Sized,
    {
        let state = match surface {
            Some(surface) => {
                let drawable = surface.context().is_some();
                drawable.then(|| AnimationState::new(config, surface.size(), rng))
            }
            None => None,
        };
        let listening = state.is_some();
        let pending = listening.then(|| scheduler.request_frame());
        Self {
            scheduler,
            state,
            pointer: Point::default(),
            pending,
            listening,
            index: config.connection_index,
            time_scaled: config.time_scaled,
            stats: FrameStats::default(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.listening
    }

    pub fn state(&self) -> Option<&AnimationState> {
        self.state.as_ref()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// What the most recent frame drew.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Records the latest surface-relative pointer position.
    pub fn on_pointer_move(&mut self, pointer: Point) {
        if self.listening {
            self.pointer = pointer;
        }
    }

    /// Resizes the surface and the wrap bounds. Particle positions are left
    /// alone; anything now outside wraps on the next frame.
    pub fn on_resize<C: Surface>(&mut self, surface: &mut C, size: SurfaceSize) {
        if !self.listening {
            return;
        }
        surface.resize(size);
        if let Some(state) = self.state.as_mut() {
            state.resize(size);
        }
    }

    /// Runs one update and draw for `handle`. Returns `false` without doing
    /// anything when `handle` is not the pending frame.
    ///
    /// `dt` is in 60 Hz reference frames and only honoured when the field is
    /// time scaled; otherwise every frame is a fixed step.
    pub fn on_frame<C: Surface>(&mut self, handle: FrameHandle, surface: &mut C, dt: f32) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        self.scheduler.delivered(handle);
        let Some(state) = self.state.take() else {
            return false;
        };
        let dt = if self.time_scaled { dt } else { 1.0 };
        let next = advance(state, self.pointer, dt);
        if let Some(ctx) = surface.context() {
            self.stats = render_frame(&next, self.pointer, ctx, self.index);
        }
        self.state = Some(next);
        if self.listening {
            self.pending = Some(self.scheduler.request_frame());
        }
        true
    }

    /// Stops input handling, cancels the pending frame and drops the field.
    /// Calling it again does nothing.
    pub fn unmount(&mut self) {
        self.listening = false;
        if let Some(h) = self.pending.take() {
            self.scheduler.cancel(h);
        }
        self.state = None;
    }
}

impl Animator<FrameQueue> {
    /// Delivers the queued frame, if any. Returns whether a frame ran.
    pub fn pump<C: Surface>(&mut self, surface: &mut C, dt: f32) -> bool {
        match self.scheduler.take_due() {
            Some(h) => self.on_frame(h, surface, dt),
            None => false,
        }
    }
}
