use crate::dsp::stage::Stage;

/// A serial chain of stages. Owns the stages.
pub struct Chain {
    stages: Vec<Box<dyn Stage>>,
    channels: u16,
    sample_rate: u32,
}

impl Chain {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            stages: Vec::new(),
            channels,
            sample_rate,
        }
    }
    pub fn push(&mut self, mut stage: Box<dyn Stage>) {
        stage.prepare(self.sample_rate, self.channels);
        self.stages.push(stage);
    }
    pub fn len(&self) -> usize {
        self.stages.len()
    }
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
    pub fn channels(&self) -> u16 {
        self.channels
    }
    /// Forward a dB parameter to every stage; stages ignore keys they don't own.
    pub fn set_param_db(&mut self, key: &str, db: f32) {
        for stage in self.stages.iter_mut() {
            stage.set_param_db(key, db);
        }
    }
    pub fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
        }
    }
    /// Process one interleaved block in-place.
    pub fn process(&mut self, block: &mut [f32]) {
        for stage in self.stages.iter_mut() {
            stage.process(block);
        }
    }
}
