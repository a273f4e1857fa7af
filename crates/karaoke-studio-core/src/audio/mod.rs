mod output;
mod resampler;

pub use {
    output::{CpalOutput, output_device_names},
    resampler::Resampler,
};
