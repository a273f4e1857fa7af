use crate::{AudioTrack, StudioError};

/// WHAT: Interleaved PCM is split into planar channels
/// WHY: Decoders hand back interleaved frames; the waveform reads channel 0
#[test]
fn given_interleaved_stereo_when_building_track_then_channels_split() {
    // Given: Two stereo frames plus a dangling sample
    let samples = [0.1, -0.1, 0.2, -0.2, 0.3];

    // When: Building the track
    let track = AudioTrack::from_interleaved("stereo", 2, 2, &samples).unwrap();

    // Then: Two frames per channel, trailing partial frame dropped
    assert_eq!(track.channel_count(), 2);
    assert_eq!(track.frames(), 2);
    assert_eq!(track.channel(0).unwrap(), &[0.1, 0.2]);
    assert_eq!(track.channel(1).unwrap(), &[-0.1, -0.2]);
    assert_eq!(track.duration(), 1.0);
}

/// WHAT: Ragged channels and a zero rate are rejected
/// WHY: Playback and drawing assume equal-length channels at a real rate
#[test]
fn given_malformed_pcm_when_building_track_then_invalid_track_error() {
    // Given / When / Then: Each malformed input is rejected
    let ragged = AudioTrack::from_planar("ragged", 8_000, vec![vec![0.0; 4], vec![0.0; 3]]);
    assert!(matches!(ragged, Err(StudioError::InvalidTrack { .. })));

    let no_rate = AudioTrack::from_planar("no-rate", 0, vec![vec![0.0; 4]]);
    assert!(matches!(no_rate, Err(StudioError::InvalidTrack { .. })));

    let empty = AudioTrack::from_planar("empty", 8_000, Vec::new());
    assert!(matches!(empty, Err(StudioError::InvalidTrack { .. })));
}

/// WHAT: Time offsets map to frame indices clamped to the track
/// WHY: Playback and seeking start from the frame under the playhead
#[test]
fn given_track_when_mapping_offsets_then_frames_clamped() {
    // Given: Four frames at 4 Hz
    let track = AudioTrack::from_planar("mono", 4, vec![vec![0.1, 0.2, 0.3, 0.4]]).unwrap();

    // When / Then: Half a second is frame 2; offsets outside the track clamp
    assert_eq!(track.frame_at(0.5), 2);
    assert_eq!(track.frame_at(-1.0), 0);
    assert_eq!(track.frame_at(99.0), 4);
}
