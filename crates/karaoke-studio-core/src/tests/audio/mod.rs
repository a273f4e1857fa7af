mod output;
mod resampler;
