/// One side (input or output) of an effect session. Samples are interleaved f32.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_count: usize,
}

impl AudioConfig {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
    pub const DEFAULT_FRAME_COUNT: usize = 0x100;

    pub fn new(sample_rate: u32, channels: u16, frame_count: usize) -> Self {
        Self {
            sample_rate,
            channels,
            frame_count,
        }
    }

    /// Interleaved samples in one buffer of `frame_count` frames.
    pub fn samples_per_buffer(&self) -> usize {
        self.frame_count * self.channels as usize
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SAMPLE_RATE, 2, Self::DEFAULT_FRAME_COUNT)
    }
}

/// Session parameters handed to [`crate::Effect::open`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenParameters {
    pub session: i32,
    pub io_handle: i32,
    pub input: AudioConfig,
    pub output: AudioConfig,
}

impl OpenParameters {
    pub fn new(sample_rate: u32, input_frames: usize, output_frames: usize) -> Self {
        Self {
            session: 0,
            io_handle: 1,
            input: AudioConfig::new(sample_rate, 2, input_frames),
            output: AudioConfig::new(sample_rate, 2, output_frames),
        }
    }

    /// Sanity checks an implementation performs before accepting a session.
    pub fn validate(&self) -> crate::Result<()> {
        if self.input.sample_rate == 0 || self.output.sample_rate == 0 {
            return Err(crate::Status::illegal_argument("sample rate must be non-zero"));
        }
        if self.input.sample_rate != self.output.sample_rate {
            return Err(crate::Status::illegal_argument(format!(
                "input rate {} != output rate {}",
                self.input.sample_rate, self.output.sample_rate
            )));
        }
        if self.input.channels == 0 || self.input.channels != self.output.channels {
            return Err(crate::Status::illegal_argument("channel layout mismatch"));
        }
        Ok(())
    }
}

impl Default for OpenParameters {
    fn default() -> Self {
        Self::new(
            AudioConfig::DEFAULT_SAMPLE_RATE,
            AudioConfig::DEFAULT_FRAME_COUNT,
            AudioConfig::DEFAULT_FRAME_COUNT,
        )
    }
}
