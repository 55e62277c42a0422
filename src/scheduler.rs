use std::collections::VecDeque;

use log::trace;

/// Token for one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host facility that calls back once per displayed frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// FIFO of requested frames for hosts that pump their own loop.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: VecDeque<FrameHandle>,
    requested: usize,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next frame due, oldest first.
    pub fn pop(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Frames requested over the queue's lifetime.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);

        self.next += 1;
        self.requested += 1;
        self.pending.push_back(handle);

        trace!("Requested frame {}", handle.0);

        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|pending| *pending != handle);
    }
}
