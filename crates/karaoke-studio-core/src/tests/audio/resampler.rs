use crate::audio::Resampler;

// Test constants
const TRACK_SAMPLE_RATE: u32 = 44_100;
const DEVICE_SAMPLE_RATE: u32 = 48_000;
const ONE_SECOND_INPUT_SAMPLES: usize = TRACK_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_SAMPLES: usize = DEVICE_SAMPLE_RATE as usize;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;
const TONE_FREQUENCY_FACTOR: f32 = 0.05;
const MAX_AMPLITUDE: f32 = 1.5;

/// WHAT: A 44.1kHz track is upsampled to the 48kHz device rate
/// WHY: Tracks must play at the right speed on devices with a different rate
#[test]
fn given_44khz_track_when_resampling_to_48khz_then_output_length_matches_device_rate() {
    // Given: Resampler configured for 44.1kHz -> 48kHz
    let mut resampler = Resampler::new(TRACK_SAMPLE_RATE, DEVICE_SAMPLE_RATE).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Resampling one second of audio
    let output = resampler.resample(&input).unwrap();

    // Then: Output is exactly one second at 48kHz and finite
    assert_eq!(output.len(), ONE_SECOND_OUTPUT_SAMPLES);
    assert!(output.iter().all(|&s| s.is_finite()));
}

/// WHAT: Empty samples return empty output
/// WHY: Edge case handling for zero-length tracks
#[test]
fn given_empty_samples_when_resampling_then_empty_output() {
    // Given: Resampler and empty input
    let mut resampler = Resampler::new(TRACK_SAMPLE_RATE, DEVICE_SAMPLE_RATE).unwrap();

    // When: Resampling empty data
    let output = resampler.resample(&[]).unwrap();

    // Then: Output is also empty
    assert!(output.is_empty());
}

/// WHAT: Each channel of a stereo track is resampled to the same length
/// WHY: Planar channels must stay frame-aligned after conversion
#[test]
fn given_stereo_tone_when_resampling_planar_then_channels_stay_aligned_and_bounded() {
    // Given: Two channels of a tone, one inverted
    let mut resampler = Resampler::new(TRACK_SAMPLE_RATE, DEVICE_SAMPLE_RATE).unwrap();
    let left: Vec<f32> = (0..4_410)
        .map(|i| (i as f32 * TONE_FREQUENCY_FACTOR).sin())
        .collect();
    let right: Vec<f32> = left.iter().map(|s| -s).collect();

    // When: Resampling both channels
    let output = resampler.resample_planar(&[left, right]).unwrap();

    // Then: Both outputs have the same expected length and sane amplitude
    assert_eq!(output.len(), 2);
    assert_eq!(output[0].len(), 4_800);
    assert_eq!(output[0].len(), output[1].len());
    assert!(
        output
            .iter()
            .flatten()
            .all(|&s| s.is_finite() && s.abs() <= MAX_AMPLITUDE)
    );
}
