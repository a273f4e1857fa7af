use crate::{
    StudioError,
    recorder::{Countdown, CountdownStep, RecIndicator, Recorder, RecordingSession},
    tests::fakes::{CameraLog, ClipLog, FakeCamera, FakeClips},
};

use std::{cell::RefCell, rc::Rc};

struct Devices {
    camera: FakeCamera,
    camera_log: Rc<RefCell<CameraLog>>,
    clips: FakeClips,
    clip_log: Rc<RefCell<ClipLog>>,
}

fn devices() -> Devices {
    let camera_log = Rc::new(RefCell::new(CameraLog::default()));
    let clip_log = Rc::new(RefCell::new(ClipLog::default()));
    Devices {
        camera: FakeCamera(Rc::clone(&camera_log)),
        camera_log,
        clips: FakeClips(Rc::clone(&clip_log)),
        clip_log,
    }
}

/// WHAT: Chunks are concatenated in arrival order and empty ones dropped
/// WHY: The clip is the byte-exact concatenation of the encoder output
#[test]
fn given_chunks_when_finishing_session_then_concatenated_in_order() {
    // Given: A session with three chunks, one empty
    let mut session = RecordingSession::new(0.0);
    session.push_chunk(b"ab".to_vec());
    session.push_chunk(Vec::new());
    session.push_chunk(b"cd".to_vec());

    // When: Finishing
    let clip = session.finish();

    // Then: Two chunks, ordered bytes, webm type
    assert_eq!(clip.bytes(), b"abcd");
    assert_eq!(clip.chunk_count(), 2);
    assert_eq!(clip.mime_type(), "video/webm");
}

/// WHAT: An unsupported device fails without asking for access
/// WHY: Users must not see a permission prompt for something that cannot work
#[test]
fn given_unsupported_camera_when_acquiring_then_capability_missing_without_request() {
    // Given: A camera that cannot record
    let mut d = devices();
    d.camera_log.borrow_mut().supported = false;
    let mut recorder = Recorder::new();

    // When: Acquiring
    let result = recorder.acquire(&mut d.camera);

    // Then: CapabilityMissing, no access request
    assert!(matches!(result, Err(StudioError::CapabilityMissing { .. })));
    assert_eq!(d.camera_log.borrow().access_requests, 0);
    assert!(!recorder.camera_held());
}

/// WHAT: A full record cycle releases the camera exactly once
/// WHY: Leaving the camera open keeps its light on after recording
#[test]
fn given_recording_when_finishing_then_camera_released_once_and_clip_published() {
    // Given: A running recording with one collected chunk
    let mut d = devices();
    let mut recorder = Recorder::new();
    recorder.acquire(&mut d.camera).unwrap();
    recorder.begin(&mut d.camera, &mut d.clips, 0.0).unwrap();
    d.camera_log.borrow_mut().pending.push(b"head".to_vec());
    assert_eq!(recorder.collect(&mut d.camera), 1);

    // When: Finishing, then finishing again
    let url = recorder
        .finish(&mut d.camera, &mut d.clips)
        .unwrap()
        .map(|p| p.url().clone());
    let second = recorder.finish(&mut d.camera, &mut d.clips).unwrap();

    // Then: One release, one published clip with the trailing chunk appended
    assert!(url.is_some());
    assert!(second.is_none());
    assert_eq!(d.camera_log.borrow().releases, 1);
    assert_eq!(d.clip_log.borrow().published.len(), 1);
    assert_eq!(d.clip_log.borrow().published[0].1, b"headtail".len());
    assert_eq!(recorder.clip().unwrap().clip().bytes(), b"headtail");
}

/// WHAT: Starting a new recording revokes the previous clip address
/// WHY: Each clip address holds the whole recording in memory or on disk
#[test]
fn given_existing_clip_when_beginning_new_recording_then_old_url_revoked() {
    // Given: A finished first recording
    let mut d = devices();
    let mut recorder = Recorder::new();
    recorder.acquire(&mut d.camera).unwrap();
    recorder.begin(&mut d.camera, &mut d.clips, 0.0).unwrap();
    let first = recorder
        .finish(&mut d.camera, &mut d.clips)
        .unwrap()
        .map(|p| p.url().clone())
        .unwrap();

    // When: Recording again
    recorder.acquire(&mut d.camera).unwrap();
    recorder.begin(&mut d.camera, &mut d.clips, 5.0).unwrap();

    // Then: The first url was revoked and no clip is held
    assert_eq!(d.clip_log.borrow().revoked, vec![first]);
    assert!(recorder.clip().is_none());
}

/// WHAT: Shutdown aborts capture, releases the camera and revokes the clip
/// WHY: Closing the window must not leak the device or temp files
#[test]
fn given_running_recording_when_shutting_down_then_everything_released() {
    // Given: A recording in progress
    let mut d = devices();
    let mut recorder = Recorder::new();
    recorder.acquire(&mut d.camera).unwrap();
    recorder.begin(&mut d.camera, &mut d.clips, 0.0).unwrap();

    // When: Shutting down
    recorder.shutdown(&mut d.camera, &mut d.clips);

    // Then: Not recording, camera closed once, nothing published
    assert!(!recorder.is_recording());
    assert!(!recorder.camera_held());
    assert_eq!(d.camera_log.borrow().releases, 1);
    assert!(d.clip_log.borrow().published.is_empty());
}

/// WHAT: Countdown shows 3, 2, 1, GO and then finishes
/// WHY: Singers need a lead-in before the backing track starts
#[test]
fn given_countdown_from_three_when_time_passes_then_steps_in_order() {
    // Given: A countdown started at t=10
    let countdown = Countdown::new(3, 10.0);

    // When / Then: Each step at its time
    assert_eq!(countdown.step_at(10.0), Some(CountdownStep::Number(3)));
    assert_eq!(countdown.step_at(11.2), Some(CountdownStep::Number(2)));
    assert_eq!(countdown.step_at(12.9), Some(CountdownStep::Number(1)));
    assert_eq!(countdown.step_at(13.1), Some(CountdownStep::Go));
    assert_eq!(CountdownStep::Go.label(), "GO");
    assert!(!countdown.is_finished(13.4));
    assert!(countdown.is_finished(13.5));
    assert_eq!(countdown.total_seconds(), 3.5);
}

/// WHAT: The recording indicator blinks with a one second half period
/// WHY: A steady dot is easy to miss while singing
#[test]
fn given_rec_indicator_when_seconds_pass_then_visibility_alternates() {
    // Given: Indicator lit at t=0
    let indicator = RecIndicator::new(0.0);

    // When / Then: On, off, on
    assert!(indicator.is_visible(0.5));
    assert!(!indicator.is_visible(1.5));
    assert!(indicator.is_visible(2.2));
}
