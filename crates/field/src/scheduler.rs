//! Cooperative frame scheduling.
//!
//! The animator never owns a clock. It asks a [`FrameScheduler`] for the next
//! frame and is called back with the handle it was given; a stale or
//! cancelled handle is ignored.

/// Opaque token identifying one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait FrameScheduler {
    /// Requests one future frame callback.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancels a pending request. Cancelling an unknown or already delivered
    /// handle does nothing.
    fn cancel(&mut self, handle: FrameHandle);
    /// Marks `handle` as delivered so the next request issues a new one.
    /// Schedulers that forget a handle once it fires need nothing here.
    fn delivered(&mut self, _handle: FrameHandle) {}
}

/// Single-slot scheduler: at most one frame is ever pending. The host drains
/// it once per tick with [`take_due`](FrameQueue::take_due).
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the pending frame, if any, leaving the queue empty.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total requests and cancellations seen, for diagnostics.
    pub fn counters(&self) -> (u64, u64) {
        (self.requested, self.cancelled)
    }
}

impl FrameScheduler for FrameQueue {
    /// Re-requesting while a frame is pending returns the same handle.
    fn request_frame(&mut self) -> FrameHandle {
        if let Some(h) = self.pending {
            return h;
        }
        self.next += 1;
        self.requested += 1;
        let h = FrameHandle(self.next);
        self.pending = Some(h);
        h
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn delivered(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
