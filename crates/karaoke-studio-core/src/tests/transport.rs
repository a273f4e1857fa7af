use crate::{
    tests::fakes::{AudioLog, FakeAudio, square_track},
    transport::{CancelToken, FrameLoop, FrameRequest, Transport, TransportTick},
};

use std::{cell::RefCell, rc::Rc};

fn output() -> (FakeAudio, Rc<RefCell<AudioLog>>) {
    let log = Rc::new(RefCell::new(AudioLog::default()));
    (FakeAudio(Rc::clone(&log)), log)
}

/// WHAT: Play while already playing does nothing
/// WHY: A second source would double the audio
#[test]
fn given_playing_transport_when_playing_again_then_no_second_start() {
    // Given: A playing transport
    let track = square_track(10.0);
    let (mut audio, log) = output();
    let mut transport = Transport::new();
    assert!(transport.play(&track, &mut audio, 0.0).unwrap());

    // When: Playing again
    let started = transport.play(&track, &mut audio, 1.0).unwrap();

    // Then: Ignored, still one start
    assert!(!started);
    assert_eq!(log.borrow().starts.len(), 1);
}

/// WHAT: Seeking while stopped moves the offset used by the next play
/// WHY: Clicking the waveform then pressing play starts from the click
#[test]
fn given_stopped_transport_when_seeking_then_next_play_starts_at_offset() {
    // Given: A stopped transport
    let track = square_track(10.0);
    let (mut audio, log) = output();
    let mut transport = Transport::new();

    // When: Seeking to 4s, then playing
    transport.seek(&track, &mut audio, 4.0, 0.0).unwrap();
    let marker = transport.playhead(0.0);
    transport.play(&track, &mut audio, 0.0).unwrap();

    // Then: Marker shows the offset and output starts there
    assert_eq!(marker, Some(4.0));
    assert_eq!(log.borrow().starts, vec![4.0]);
}

/// WHAT: Seeking while playing restarts the output at the target
/// WHY: Playback continues from the clicked point without a pause
#[test]
fn given_playing_transport_when_seeking_then_output_restarts_at_target() {
    // Given: Playing from zero
    let track = square_track(10.0);
    let (mut audio, log) = output();
    let mut transport = Transport::new();
    transport.play(&track, &mut audio, 0.0).unwrap();

    // When: Seeking to 6s at clock time 2s
    transport.seek(&track, &mut audio, 6.0, 2.0).unwrap();

    // Then: Old output stopped, new one started at 6s, position advances from there
    assert_eq!(log.borrow().stops, 1);
    assert_eq!(log.borrow().starts, vec![0.0, 6.0]);
    assert!(transport.is_playing());
    assert!((transport.position(3.0) - 7.0).abs() < 1e-9);
}

/// WHAT: Seek targets are clamped to the track
/// WHY: Clicks outside the waveform must not produce invalid offsets
#[test]
fn given_out_of_range_seek_when_applied_then_clamped() {
    // Given: A 10s track
    let track = square_track(10.0);
    let (mut audio, _log) = output();
    let mut transport = Transport::new();

    // When / Then: Clamped at both ends
    transport.seek(&track, &mut audio, 42.0, 0.0).unwrap();
    assert_eq!(transport.offset(), 10.0);
    transport.seek(&track, &mut audio, -3.0, 0.0).unwrap();
    assert_eq!(transport.offset(), 0.0);
}

/// WHAT: Stop rewinds to zero and hides the playhead
/// WHY: The next play starts from the top of the track
#[test]
fn given_playing_transport_when_stopping_then_rewound_and_marker_hidden() {
    // Given: Playing from 3s
    let track = square_track(10.0);
    let (mut audio, log) = output();
    let mut transport = Transport::new();
    transport.seek(&track, &mut audio, 3.0, 0.0).unwrap();
    transport.play(&track, &mut audio, 0.0).unwrap();

    // When: Stopping
    transport.stop(&mut audio);

    // Then: Rewound, no marker, output stopped
    assert_eq!(transport.offset(), 0.0);
    assert_eq!(transport.playhead(5.0), None);
    assert!(!log.borrow().playing);
}

/// WHAT: The playhead task reports the end once the track duration passes
/// WHY: The studio stops playback at the natural end of the track
#[test]
fn given_playing_transport_when_duration_elapses_then_tick_reports_ended() {
    // Given: Playing a 10s track
    let track = square_track(10.0);
    let (mut audio, _log) = output();
    let mut transport = Transport::new();
    transport.play(&track, &mut audio, 0.0).unwrap();

    // When / Then: Running before the end, ended after
    assert_eq!(transport.tick(10.0, 5.0), TransportTick::Running(5.0));
    assert_eq!(transport.tick(10.0, 10.5), TransportTick::Ended);
    transport.stop(&mut audio);
    assert_eq!(transport.tick(10.0, 11.0), TransportTick::Idle);
}

/// WHAT: Scheduling a new frame task cancels the previous token
/// WHY: Only one playhead task may ever run
#[test]
fn given_scheduled_frame_task_when_rescheduling_then_old_token_cancelled() {
    // Given: A scheduled task
    let mut frames = FrameLoop::default();
    let first = frames.schedule();

    // When: Scheduling again
    let second = frames.schedule();

    // Then: Only the newest token is live
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(frames.poll(), FrameRequest::Continue);

    frames.cancel();
    assert!(second.is_cancelled());
    assert_eq!(frames.poll(), FrameRequest::Idle);
    assert!(!frames.is_active());
}

/// WHAT: Cancelling one clone of a token cancels all clones
/// WHY: The owner and the frame task share one flag
#[test]
fn given_cloned_token_when_cancelling_then_every_clone_observes_it() {
    // Given: A token and its clone
    let token = CancelToken::new();
    let clone = token.clone();

    // When: Cancelling the clone
    clone.cancel();

    // Then: The original sees it
    assert!(token.is_cancelled());
}
