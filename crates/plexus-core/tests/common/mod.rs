// Recording render backend shared by the lifecycle and scene tests.

#![allow(dead_code)]

use plexus_core::{AllocationRequest, BackendError, FrameData, RenderBackend};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Calls {
    pub allocs: usize,
    pub resizes: Vec<(u32, u32)>,
    pub draws: usize,
    pub releases: usize,
    pub last_request: Option<AllocationRequest>,
    /// (links, nodes, pulses) of the last drawn frame.
    pub last_counts: (usize, usize, usize),
}

pub struct MockBackend {
    pub calls: Rc<RefCell<Calls>>,
    pub fail_alloc: bool,
    /// Report a lost context on this (1-based) draw and every one after.
    pub lose_on_draw: Option<usize>,
    pub drop_frames: bool,
}

impl MockBackend {
    pub fn new() -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        (
            Self {
                calls: calls.clone(),
                fail_alloc: false,
                lose_on_draw: None,
                drop_frames: false,
            },
            calls,
        )
    }

    pub fn failing() -> (Self, Rc<RefCell<Calls>>) {
        let (mut b, calls) = Self::new();
        b.fail_alloc = true;
        (b, calls)
    }

    pub fn losing_on(draw: usize) -> (Self, Rc<RefCell<Calls>>) {
        let (mut b, calls) = Self::new();
        b.lose_on_draw = Some(draw);
        (b, calls)
    }
}

impl RenderBackend for MockBackend {
    fn allocate(&mut self, request: &AllocationRequest) -> Result<(), BackendError> {
        let mut calls = self.calls.borrow_mut();
        calls.allocs += 1;
        calls.last_request = Some(*request);
        if self.fail_alloc {
            Err(BackendError::Allocation("mock refuses".into()))
        } else {
            Ok(())
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.calls.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn draw(&mut self, frame: &FrameData<'_>) -> Result<(), BackendError> {
        let mut calls = self.calls.borrow_mut();
        calls.draws += 1;
        if self.lose_on_draw.is_some_and(|n| calls.draws >= n) {
            return Err(BackendError::ContextLost);
        }
        if self.drop_frames {
            return Err(BackendError::FrameDropped("mock".into()));
        }
        calls.last_counts = (frame.links.len(), frame.nodes.len(), frame.pulses.len());
        Ok(())
    }

    fn release(&mut self) {
        self.calls.borrow_mut().releases += 1;
    }
}
