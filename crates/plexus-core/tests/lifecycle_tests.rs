// Host-side tests for render resource ownership against a recording backend.

mod common;

use common::MockBackend;
use plexus_core::*;

fn request() -> AllocationRequest {
    AllocationRequest {
        node_capacity: 10,
        link_vertex_capacity: 40,
        pulse_capacity: 4,
        disc_segments: 12,
        physical_size: (800, 600),
    }
}

fn empty_frame() -> FrameData<'static> {
    FrameData {
        uniforms: FrameUniforms::default(),
        clear: Rgb::new(0.0, 0.0, 0.0),
        links: &[],
        nodes: &[],
        pulses: &[],
    }
}

#[test]
fn attach_allocates_once_and_starts_rendering() {
    let (backend, calls) = MockBackend::new();
    let mut mgr = ResourceLifecycleManager::new();
    assert_eq!(mgr.state(), LifecycleState::Detached);
    assert!(mgr.attach(Box::new(backend), &request()));
    assert_eq!(mgr.state(), LifecycleState::Attached);
    assert!(mgr.is_rendering());
    assert_eq!(calls.borrow().allocs, 1);
    assert_eq!(mgr.physical_size(), (800, 600));
    assert!(mgr.present(&empty_frame()));
    assert_eq!(calls.borrow().draws, 1);
}

#[test]
fn failed_allocation_leaves_manager_detached_and_frees_partial_resources() {
    let (backend, calls) = MockBackend::failing();
    let mut mgr = ResourceLifecycleManager::new();
    assert!(!mgr.attach(Box::new(backend), &request()));
    assert_eq!(mgr.state(), LifecycleState::Detached);
    assert_eq!(calls.borrow().releases, 1);
    assert!(!mgr.present(&empty_frame()));
    assert_eq!(calls.borrow().draws, 0);
}

#[test]
fn dispose_twice_releases_exactly_once() {
    let (backend, calls) = MockBackend::new();
    let mut mgr = ResourceLifecycleManager::new();
    mgr.attach(Box::new(backend), &request());
    mgr.dispose();
    mgr.dispose();
    assert_eq!(mgr.state(), LifecycleState::Disposed);
    assert_eq!(calls.borrow().releases, 1);
    drop(mgr);
    assert_eq!(calls.borrow().releases, 1, "drop after dispose must not release again");
}

#[test]
fn drop_without_dispose_releases() {
    let (backend, calls) = MockBackend::new();
    {
        let mut mgr = ResourceLifecycleManager::new();
        mgr.attach(Box::new(backend), &request());
    }
    assert_eq!(calls.borrow().releases, 1);
}

#[test]
fn no_draw_or_attach_after_dispose() {
    let (backend, calls) = MockBackend::new();
    let mut mgr = ResourceLifecycleManager::new();
    mgr.attach(Box::new(backend), &request());
    mgr.dispose();
    assert!(!mgr.present(&empty_frame()));
    assert_eq!(calls.borrow().draws, 0);

    let (late, late_calls) = MockBackend::new();
    assert!(!mgr.attach(Box::new(late), &request()));
    assert_eq!(late_calls.borrow().allocs, 0);
    assert_eq!(mgr.state(), LifecycleState::Disposed);
}

#[test]
fn context_loss_stops_drawing() {
    let (backend, calls) = MockBackend::losing_on(2);
    let mut mgr = ResourceLifecycleManager::new();
    mgr.attach(Box::new(backend), &request());
    assert!(mgr.present(&empty_frame()));
    assert!(!mgr.present(&empty_frame()));
    assert_eq!(mgr.state(), LifecycleState::Lost);
    assert!(!mgr.is_rendering());
    for _ in 0..5 {
        assert!(!mgr.present(&empty_frame()));
    }
    assert_eq!(calls.borrow().draws, 2);
    assert_eq!(calls.borrow().releases, 0, "resources stay owned until dispose");
    mgr.dispose();
    assert_eq!(calls.borrow().releases, 1);
}

#[test]
fn reattach_after_loss_releases_the_old_backend() {
    let (lost, lost_calls) = MockBackend::losing_on(1);
    let mut mgr = ResourceLifecycleManager::new();
    mgr.attach(Box::new(lost), &request());
    mgr.present(&empty_frame());
    assert_eq!(mgr.state(), LifecycleState::Lost);

    let (fresh, fresh_calls) = MockBackend::new();
    assert!(mgr.attach(Box::new(fresh), &request()));
    assert_eq!(lost_calls.borrow().releases, 1);
    assert_eq!(mgr.state(), LifecycleState::Attached);
    assert!(mgr.present(&empty_frame()));
    assert_eq!(fresh_calls.borrow().draws, 1);
}

#[test]
fn dropped_frames_keep_the_manager_attached() {
    let (mut backend, calls) = MockBackend::new();
    backend.drop_frames = true;
    let mut mgr = ResourceLifecycleManager::new();
    mgr.attach(Box::new(backend), &request());
    assert!(!mgr.present(&empty_frame()));
    assert_eq!(mgr.state(), LifecycleState::Attached);
    assert!(!mgr.present(&empty_frame()));
    assert_eq!(calls.borrow().draws, 2);
}

#[test]
fn resize_only_reaches_backend_when_size_changes() {
    let (backend, calls) = MockBackend::new();
    let mut mgr = ResourceLifecycleManager::new();
    mgr.resize(1024, 768);
    mgr.attach(Box::new(backend), &request());
    mgr.resize(800, 600);
    assert!(calls.borrow().resizes.is_empty());
    mgr.resize(1024, 768);
    mgr.resize(0, 0);
    assert_eq!(calls.borrow().resizes, vec![(1024, 768), (1, 1)]);
    assert_eq!(mgr.physical_size(), (1, 1));
}
