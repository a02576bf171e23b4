use super::stage::Stage;
use super::{coeff, db_to_linear, linear_to_db};

const ENV_ATTACK_MS: f32 = 5.0;
const ENV_RELEASE_MS: f32 = 50.0;
const GAIN_ATTACK_MS: f32 = 5.0;
const GAIN_RELEASE_MS: f32 = 50.0;
const WARMUP_MS: f32 = 10.0;
/// How fast the floor estimate may climb.
const FLOOR_RISE_DB_PER_SEC: f32 = 10.0;
/// Signal within this distance of the floor is treated as noise.
const THRESHOLD_ABOVE_FLOOR_DB: f32 = 12.0;
const EXPANSION_RATIO: f32 = 2.0;

/// Per-detector state: envelope, floor estimate and smoothed gain.
#[derive(Clone, Debug)]
struct Detector {
    env: f32,
    floor: Option<f32>,
    gain: f32,
    seen: usize,
}

impl Detector {
    fn new() -> Self {
        Self {
            env: 0.0,
            floor: None,
            gain: 1.0,
            seen: 0,
        }
    }
}

/// Downward expander keyed on a tracked noise floor.
///
/// Signal near the floor is pulled down by up to `max_attenuation_db`;
/// signal well above it passes at unity. With `linked` set every channel
/// shares one detector fed by the channel mean, otherwise each channel
/// runs its own.
pub struct Suppressor {
    pub max_attenuation_db: f32,
    linked: bool,
    channels: usize,
    detectors: Vec<Detector>,
    env_att: f32,
    env_rel: f32,
    gain_att: f32,
    gain_rel: f32,
    floor_rise: f32,
    warmup: usize,
}

impl Suppressor {
    pub fn new(max_attenuation_db: f32, linked: bool) -> Self {
        let mut s = Self {
            max_attenuation_db,
            linked,
            channels: 1,
            detectors: vec![Detector::new()],
            env_att: 0.0,
            env_rel: 0.0,
            gain_att: 0.0,
            gain_rel: 0.0,
            floor_rise: 1.0,
            warmup: 0,
        };
        s.prepare(44_100, 1);
        s
    }

    fn step(&self, det: &mut Detector, level: f32) -> f32 {
        let c = if level > det.env {
            self.env_att
        } else {
            self.env_rel
        };
        det.env = c * det.env + (1.0 - c) * level;
        det.seen = det.seen.saturating_add(1);

        if det.seen >= self.warmup {
            det.floor = Some(match det.floor {
                None => det.env.max(1e-6),
                Some(f) if det.env < f => det.env.max(1e-6),
                Some(f) => (f * self.floor_rise).min(det.env),
            });
        }

        let target = match det.floor {
            None => 1.0,
            Some(floor) => {
                let threshold = linear_to_db(floor) + THRESHOLD_ABOVE_FLOOR_DB;
                let over = linear_to_db(det.env) - threshold;
                if over >= 0.0 {
                    1.0
                } else {
                    let db = (over * (EXPANSION_RATIO - 1.0)).max(-self.max_attenuation_db);
                    db_to_linear(db)
                }
            }
        };

        let c = if target > det.gain {
            self.gain_att
        } else {
            self.gain_rel
        };
        det.gain = c * det.gain + (1.0 - c) * target;
        det.gain
    }
}

impl Stage for Suppressor {
    fn prepare(&mut self, sr: u32, channels: u16) {
        self.channels = (channels as usize).max(1);
        let detectors = if self.linked { 1 } else { self.channels };
        self.detectors = vec![Detector::new(); detectors];
        self.env_att = coeff(ENV_ATTACK_MS, sr);
        self.env_rel = coeff(ENV_RELEASE_MS, sr);
        self.gain_att = coeff(GAIN_ATTACK_MS, sr);
        self.gain_rel = coeff(GAIN_RELEASE_MS, sr);
        self.floor_rise = db_to_linear(FLOOR_RISE_DB_PER_SEC / sr.max(1) as f32);
        self.warmup = (WARMUP_MS * 0.001 * sr as f32) as usize;
    }

    fn set_param_db(&mut self, key: &str, db: f32) {
        if key == "max_attenuation" {
            self.max_attenuation_db = db.max(0.0);
        }
    }

    fn reset(&mut self) {
        for det in self.detectors.iter_mut() {
            *det = Detector::new();
        }
    }

    fn process(&mut self, block: &mut [f32]) {
        let ch = self.channels;
        let mut detectors = std::mem::take(&mut self.detectors);
        for frame in block.chunks_mut(ch) {
            if self.linked {
                let level = frame.iter().map(|s| s.abs()).sum::<f32>() / frame.len() as f32;
                let g = self.step(&mut detectors[0], level);
                for s in frame.iter_mut() {
                    *s *= g;
                }
            } else {
                for (s, det) in frame.iter_mut().zip(detectors.iter_mut()) {
                    let g = self.step(det, s.abs());
                    *s *= g;
                }
            }
        }
        self.detectors = detectors;
    }
}
