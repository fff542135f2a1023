//! Coalesces bursts of requests (scroll, resize, mutation) into at most one
//! task run per animation frame.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};

use crate::error::{report, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Pending,
}

/// Idle/Pending gate: the first request in Idle schedules a frame, every
/// further request until that frame starts is absorbed.
#[derive(Debug)]
pub struct FrameGate {
    state: GateState,
    frames_run: u64,
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
            frames_run: 0,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Returns true when the caller must schedule a frame.
    pub fn request(&mut self) -> bool {
        match self.state {
            GateState::Idle => {
                self.state = GateState::Pending;
                true
            }
            GateState::Pending => false,
        }
    }

    /// Called at the start of the frame callback, before the task runs, so a
    /// failing task can never leave the gate stuck in Pending.
    pub fn begin_frame(&mut self) {
        self.state = GateState::Idle;
        self.frames_run += 1;
    }

    /// Drops a pending frame without running it.
    pub fn cancel(&mut self) {
        self.state = GateState::Idle;
    }
}

type Task = Box<dyn Fn(f64) -> Result<()>>;

struct Inner {
    label: &'static str,
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    task: Task,
}

impl Inner {
    fn run(&self, timestamp: f64) {
        self.frame.borrow_mut().take();
        self.gate.borrow_mut().begin_frame();
        log::trace!("{}: frame #{}", self.label, self.gate.borrow().frames_run());
        report(self.label, (self.task)(timestamp));
    }
}

pub struct FrameBatcher {
    inner: Rc<Inner>,
}

impl FrameBatcher {
    pub fn new<F>(label: &'static str, task: F) -> Self
    where
        F: Fn(f64) -> Result<()> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                label,
                gate: RefCell::new(FrameGate::new()),
                frame: RefCell::new(None),
                task: Box::new(task),
            }),
        }
    }

    pub fn request(&self) {
        if !self.inner.gate.borrow_mut().request() {
            return;
        }
        let inner = Rc::clone(&self.inner);
        let handle = request_animation_frame(move |timestamp| inner.run(timestamp));
        *self.inner.frame.borrow_mut() = Some(handle);
    }

    /// Runs the task synchronously, outside of any frame.
    pub fn run_now(&self) {
        report(self.inner.label, (self.inner.task)(0.0));
    }
}

impl Drop for FrameBatcher {
    fn drop(&mut self) {
        // The pending frame closure holds an Rc to `inner`; cancelling it
        // breaks the cycle.
        self.inner.frame.borrow_mut().take();
        self.inner.gate.borrow_mut().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_within_one_frame_schedules_once() {
        let mut gate = FrameGate::new();
        let scheduled = (0..25).filter(|_| gate.request()).count();
        assert_eq!(scheduled, 1);
        assert_eq!(gate.state(), GateState::Pending);
    }

    #[test]
    fn next_frame_reopens_the_gate() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        gate.begin_frame();
        assert_eq!(gate.state(), GateState::Idle);
        assert!(gate.request());
        assert!(!gate.request());
    }

    #[test]
    fn runs_at_most_once_per_frame() {
        // Events per simulated frame; a zero means a quiet frame.
        let bursts = [3, 0, 1, 12, 0, 0, 7];
        let mut gate = FrameGate::new();
        let mut runs = Vec::new();
        for events in bursts {
            let mut scheduled = false;
            for _ in 0..events {
                scheduled |= gate.request();
            }
            if gate.state() == GateState::Pending {
                gate.begin_frame();
                runs.push(scheduled);
            }
        }
        assert_eq!(runs.len(), 4);
        assert_eq!(gate.frames_run(), 4);
        assert!(runs.iter().all(|scheduled| *scheduled));
    }

    #[test]
    fn failed_task_does_not_wedge_the_gate() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        gate.begin_frame();
        let outcome: Result<()> = Err(crate::error::EnhanceError::Detached("#header".into()));
        report("test", outcome);
        assert!(gate.request());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut gate = FrameGate::new();
        gate.request();
        gate.cancel();
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.frames_run(), 0);
    }
}
