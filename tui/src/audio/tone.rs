//! Chime synthesis
//!
//! Short sine tones with a soft attack and exponential release, one pitch
//! per cue so the phases can be followed with eyes closed.

use std::f32::consts::TAU;
use std::time::Duration;

use breathe_engine::{Cue, PhaseLabel};

pub const SAMPLE_RATE: u32 = 44_100;

/// Pitch and length of one chime
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
}

impl Tone {
    const fn new(frequency: f32, millis: u64) -> Self {
        Self {
            frequency,
            duration: Duration::from_millis(millis),
        }
    }

    /// Chime for a cue; phase cues sound the phase being entered
    #[must_use]
    pub fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::Start => Self::new(523.25, 200),
            Cue::Complete => Self::new(659.25, 600),
            Cue::Phase { to, .. } => match to {
                PhaseLabel::Inhale => Self::new(440.0, 250),
                PhaseLabel::HoldFull => Self::new(523.25, 150),
                PhaseLabel::Exhale => Self::new(349.23, 250),
                PhaseLabel::HoldEmpty => Self::new(293.66, 150),
            },
        }
    }
}

/// A finite, mono, enveloped sine wave
pub struct Chime {
    frequency: f32,
    volume: f32,
    sample: u32,
    total_samples: u32,
    attack_samples: u32,
}

impl Chime {
    #[must_use]
    pub fn new(tone: Tone, volume: f32) -> Self {
        let total_samples = (tone.duration.as_secs_f32() * SAMPLE_RATE as f32) as u32;
        Self {
            frequency: tone.frequency,
            volume: volume.clamp(0.0, 1.0),
            sample: 0,
            total_samples,
            attack_samples: (SAMPLE_RATE / 100).min(total_samples / 4).max(1),
        }
    }

    fn envelope(&self) -> f32 {
        if self.sample < self.attack_samples {
            self.sample as f32 / self.attack_samples as f32
        } else {
            let release = (self.sample - self.attack_samples) as f32
                / (self.total_samples - self.attack_samples).max(1) as f32;
            (-5.0 * release).exp() * (1.0 - release)
        }
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sample >= self.total_samples {
            return None;
        }
        let t = self.sample as f32 / SAMPLE_RATE as f32;
        let value = (TAU * self.frequency * t).sin() * self.envelope() * self.volume;
        self.sample += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total_samples - self.sample.min(self.total_samples)) as usize;
        (left, Some(left))
    }
}

#[cfg(feature = "audio")]
impl rodio::Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total_samples - self.sample.min(self.total_samples)) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / SAMPLE_RATE as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_phase_has_its_own_pitch() {
        let pitches: Vec<f32> = [
            PhaseLabel::Inhale,
            PhaseLabel::HoldFull,
            PhaseLabel::Exhale,
            PhaseLabel::HoldEmpty,
        ]
        .into_iter()
        .map(|to| {
            Tone::for_cue(Cue::Phase {
                from: PhaseLabel::Inhale,
                to,
            })
            .frequency
        })
        .collect();
        for (i, a) in pitches.iter().enumerate() {
            for b in &pitches[i + 1..] {
                assert!((a - b).abs() > 1.0);
            }
        }
    }

    #[test]
    fn test_chime_is_finite_and_bounded() {
        let tone = Tone::for_cue(Cue::Complete);
        let chime = Chime::new(tone, 0.5);
        let samples: Vec<f32> = chime.collect();
        assert_eq!(samples.len(), (0.6 * SAMPLE_RATE as f32) as usize);
        assert!(samples.iter().all(|s| s.abs() <= 0.5 + f32::EPSILON));
    }

    #[test]
    fn test_chime_fades_out() {
        let samples: Vec<f32> = Chime::new(Tone::for_cue(Cue::Start), 1.0).collect();
        let tail = &samples[samples.len() - 100..];
        assert!(tail.iter().all(|s| s.abs() < 0.05));
        assert!(samples[0].abs() < 1e-6);
    }
}
