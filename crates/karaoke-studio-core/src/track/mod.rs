mod audio_track;

pub use audio_track::AudioTrack;
