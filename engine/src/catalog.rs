//! Technique Catalog
//!
//! The fixed table of breathing patterns the engine can play. The table is a
//! process-wide `static` built at compile time, so lookups hand out
//! `&'static TechniquePattern` references that sessions and the animation
//! engine share without any ownership questions.
//!
//! # Zero-duration phases
//!
//! A phase may have a duration of zero (the empty holds in `wim` and
//! `resonance`). Such phases are crossed instantly during playback, their
//! boundary cue still fires, and they are still listed in the pattern string.

use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors raised by catalog lookups and pattern validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested technique id is not in the catalog
    #[error("unknown technique '{name}'. Valid techniques: {valid}")]
    NotFound {
        /// The name that was requested
        name: String,
        /// Comma-separated list of valid ids
        valid: String,
    },

    /// A pattern has no phase with a positive duration
    #[error("technique '{0}' has no phase with a positive duration")]
    EmptyPattern(String),
}

/// The semantic label of a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    /// Breathing in, lungs filling
    Inhale,
    /// Holding with full lungs
    HoldFull,
    /// Breathing out, lungs emptying
    Exhale,
    /// Holding with empty lungs
    HoldEmpty,
}

/// Direction the visual amplitude moves in during a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseDirection {
    /// Amplitude eases towards 1
    Rising,
    /// Amplitude stays where the previous phase left it
    Steady,
    /// Amplitude eases towards 0
    Falling,
}

impl PhaseLabel {
    /// Uppercase label shown by the visualizer
    #[must_use]
    pub fn display(self) -> &'static str {
        match self {
            Self::Inhale => "INHALE",
            Self::HoldFull | Self::HoldEmpty => "HOLD",
            Self::Exhale => "EXHALE",
        }
    }

    /// Which way the amplitude moves in this phase
    #[must_use]
    pub fn direction(self) -> PhaseDirection {
        match self {
            Self::Inhale => PhaseDirection::Rising,
            Self::HoldFull | Self::HoldEmpty => PhaseDirection::Steady,
            Self::Exhale => PhaseDirection::Falling,
        }
    }

    /// Whether this is one of the two hold phases
    #[must_use]
    pub fn is_hold(self) -> bool {
        matches!(self, Self::HoldFull | Self::HoldEmpty)
    }
}

/// Broad purpose grouping used by the menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Focus,
    Calm,
    Sleep,
    Energy,
    Recovery,
}

impl Category {
    /// Human readable heading
    #[must_use]
    pub fn display(self) -> &'static str {
        match self {
            Self::Focus => "Focus & Performance",
            Self::Calm => "Stress & Calm",
            Self::Sleep => "Sleep & Relaxation",
            Self::Energy => "Energy & Activation",
            Self::Recovery => "Recovery",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One timed segment of a breathing pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseSpec {
    /// What the user does during this phase
    pub label: PhaseLabel,
    /// How long the phase lasts (zero means crossed instantly)
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
    /// Short instruction shown under the label
    pub instruction: &'static str,
}

impl PhaseSpec {
    const fn new(label: PhaseLabel, millis: u64, instruction: &'static str) -> Self {
        Self {
            label,
            duration: Duration::from_millis(millis),
            instruction,
        }
    }

    /// Whether the phase is crossed without accumulating time
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// A named breathing technique
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TechniquePattern {
    /// Unique short id used on the command line
    pub id: &'static str,
    /// Alternative ids accepted by `lookup`
    pub aliases: &'static [&'static str],
    pub name: &'static str,
    pub tagline: &'static str,
    /// Compact duration summary, e.g. "4-4-4-4"
    pub pattern: &'static str,
    pub description: &'static str,
    pub purpose: &'static str,
    pub use_case: &'static str,
    /// Ordered phases of one cycle
    pub phases: &'static [PhaseSpec],
    /// Cycle count used when the user doesn't pick one
    pub default_cycles: u32,
    pub category: Category,
    pub difficulty: Difficulty,
}

impl TechniquePattern {
    /// Total duration of one cycle
    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }

    /// Check the pattern invariant: at least one phase takes time
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.phases.iter().any(|p| !p.is_instant()) {
            Ok(())
        } else {
            Err(CatalogError::EmptyPattern(self.id.to_string()))
        }
    }

    /// Whether `name` refers to this technique (id or alias, case-insensitive)
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

use Category::{Calm, Energy, Focus, Recovery, Sleep};
use Difficulty::{Advanced, Beginner, Intermediate};
use PhaseLabel::{Exhale, HoldEmpty, HoldFull, Inhale};

static TECHNIQUES: &[TechniquePattern] = &[
    TechniquePattern {
        id: "box",
        aliases: &["square"],
        name: "Box Breathing",
        tagline: "Equal sides, steady mind",
        pattern: "4-4-4-4",
        description: "Four equal counts of inhale, hold, exhale and hold trace the sides of a square. \
                      The even rhythm settles the nervous system while keeping you alert.",
        purpose: "Alert calm and mental clarity",
        use_case: "Before a presentation, during high-pressure work, daily practice",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Breathe in through the nose"),
            PhaseSpec::new(HoldFull, 4000, "Hold gently"),
            PhaseSpec::new(Exhale, 4000, "Breathe out slowly"),
            PhaseSpec::new(HoldEmpty, 4000, "Rest empty"),
        ],
        default_cycles: 5,
        category: Focus,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "gateway",
        aliases: &[],
        name: "Gateway",
        tagline: "Long resonant exhale",
        pattern: "4-4-8",
        description: "A deep inhale and short hold followed by an exhale twice as long. \
                      Hum softly on the exhale to feel the vibration settle attention.",
        purpose: "Deep concentration and expanded awareness",
        use_case: "Before meditation or focused problem solving",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Deep breath in"),
            PhaseSpec::new(HoldFull, 4000, "Hold and soften"),
            PhaseSpec::new(Exhale, 8000, "Resonant exhale"),
        ],
        default_cycles: 7,
        category: Focus,
        difficulty: Intermediate,
    },
    TechniquePattern {
        id: "operative",
        aliases: &[],
        name: "Operative Protocol",
        tagline: "Field agent standard",
        pattern: "3-6-3",
        description: "An easy inhale, an exhale twice as long, then a pause with empty lungs. \
                      The empty pause is where attention is sharpest.",
        purpose: "Tactical calm and concentration under pressure",
        use_case: "High-stakes moments, crisis management",
        phases: &[
            PhaseSpec::new(Inhale, 3000, "Effortless inhale"),
            PhaseSpec::new(Exhale, 6000, "Controlled exhale"),
            PhaseSpec::new(HoldEmpty, 3000, "Focus point"),
        ],
        default_cycles: 8,
        category: Focus,
        difficulty: Intermediate,
    },
    TechniquePattern {
        id: "sere",
        aliases: &[],
        name: "SERE Breathing",
        tagline: "Survival training",
        pattern: "4-7-8-4",
        description: "Long holds on both sides of a full exhale. The mild discomfort is the \
                      point: it trains you to stay composed while your body protests.",
        purpose: "Stress inoculation and psychological resilience",
        use_case: "Preparing for extreme stress, building mental toughness",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Controlled inhale"),
            PhaseSpec::new(HoldFull, 7000, "Stay composed"),
            PhaseSpec::new(Exhale, 8000, "Complete release"),
            PhaseSpec::new(HoldEmpty, 4000, "Rest empty"),
        ],
        default_cycles: 6,
        category: Focus,
        difficulty: Advanced,
    },
    TechniquePattern {
        id: "combat",
        aliases: &["tactical"],
        name: "Combat Breathing",
        tagline: "Rapid calm-down",
        pattern: "4-1-8",
        description: "A brief pause between a normal inhale and a long exhale. \
                      The extended exhale slows the heart within a few breaths.",
        purpose: "Fast heart rate reduction under acute stress",
        use_case: "Panic moments, before a confrontation, after a scare",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Breathe in"),
            PhaseSpec::new(HoldFull, 1000, "Brief pause"),
            PhaseSpec::new(Exhale, 8000, "Slow, complete exhale"),
        ],
        default_cycles: 6,
        category: Calm,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "sigh",
        aliases: &["physiological-sigh"],
        name: "Physiological Sigh",
        tagline: "Double inhale, long release",
        pattern: "2-1-6",
        description: "Two inhales through the nose reinflate the lungs fully, then a long exhale \
                      through the mouth offloads carbon dioxide. One of the quickest ways to reset.",
        purpose: "Immediate stress relief",
        use_case: "Emotional spikes, anxiety, a reset between tasks",
        phases: &[
            PhaseSpec::new(Inhale, 2000, "Inhale through the nose"),
            PhaseSpec::new(Inhale, 1000, "Sip in a little more"),
            PhaseSpec::new(Exhale, 6000, "Long exhale through the mouth"),
        ],
        default_cycles: 3,
        category: Calm,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "coherent",
        aliases: &[],
        name: "Coherent Breathing",
        tagline: "Five breaths a minute",
        pattern: "6-6",
        description: "Slow, even breaths at about five per minute bring heart rate variability \
                      into a smooth, regular wave.",
        purpose: "Heart rate variability and emotional balance",
        use_case: "Daily practice, winding down after work",
        phases: &[
            PhaseSpec::new(Inhale, 6000, "Slow inhale"),
            PhaseSpec::new(Exhale, 6000, "Slow exhale"),
        ],
        default_cycles: 10,
        category: Calm,
        difficulty: Intermediate,
    },
    TechniquePattern {
        id: "resonance",
        aliases: &["resonant"],
        name: "Resonance Breathing",
        tagline: "Smooth turn-arounds",
        pattern: "5-0-5-0",
        description: "Inhale and exhale flow straight into each other with no pause at the top \
                      or bottom. The turn-around is marked but never held.",
        purpose: "Vagal tone and long-term stress resilience",
        use_case: "Daily practice, recovery days",
        phases: &[
            PhaseSpec::new(Inhale, 5000, "Smooth inhale"),
            PhaseSpec::new(HoldFull, 0, "Turn"),
            PhaseSpec::new(Exhale, 5000, "Smooth exhale"),
            PhaseSpec::new(HoldEmpty, 0, "Turn"),
        ],
        default_cycles: 12,
        category: Calm,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "military-sleep",
        aliases: &["military"],
        name: "Military Sleep",
        tagline: "Two-minute sleep routine",
        pattern: "4-7-8",
        description: "A routine taught to pilots for falling asleep anywhere. Relax the face, \
                      drop the shoulders and let each exhale take the rest of the tension.",
        purpose: "Fall asleep quickly",
        use_case: "Insomnia, sleeping in noisy places, jet lag",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Deep breath in"),
            PhaseSpec::new(HoldFull, 7000, "Hold and relax the face"),
            PhaseSpec::new(Exhale, 8000, "Release everything"),
        ],
        default_cycles: 6,
        category: Sleep,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "478",
        aliases: &["4-7-8"],
        name: "4-7-8 Breathing",
        tagline: "Natural tranquilizer",
        pattern: "4-7-8",
        description: "A quiet inhale, a long hold and an even longer exhale. \
                      The long hold and exhale shift the body towards rest.",
        purpose: "Deep relaxation before sleep",
        use_case: "Bedtime, anxiety, winding down",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Quiet inhale"),
            PhaseSpec::new(HoldFull, 7000, "Hold"),
            PhaseSpec::new(Exhale, 8000, "Whoosh it out"),
        ],
        default_cycles: 4,
        category: Sleep,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "sleep",
        aliases: &["sleep-exhale"],
        name: "Sleep Exhale",
        tagline: "Two-to-one exhale",
        pattern: "4-2-8-2",
        description: "An exhale twice as long as the inhale, with soft holds on either side. \
                      The long exhale signals safety and eases the body towards sleep.",
        purpose: "Parasympathetic activation",
        use_case: "Racing thoughts at night, trouble falling asleep",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Gentle inhale"),
            PhaseSpec::new(HoldFull, 2000, "Soft hold"),
            PhaseSpec::new(Exhale, 8000, "Long slow exhale"),
            PhaseSpec::new(HoldEmpty, 2000, "Rest empty"),
        ],
        default_cycles: 8,
        category: Sleep,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "power",
        aliases: &[],
        name: "Power Breathing",
        tagline: "Pre-mission activation",
        pattern: "4-4-4",
        description: "Strong inhales and full holds build energy, and a controlled exhale \
                      channels it. Use it to get sharp before you perform.",
        purpose: "Peak activation and mental intensity",
        use_case: "Before competition, presentations, physical challenges",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Power inhale"),
            PhaseSpec::new(HoldFull, 4000, "Build energy"),
            PhaseSpec::new(Exhale, 4000, "Channel power"),
        ],
        default_cycles: 6,
        category: Energy,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "wim",
        aliases: &["wim-hof", "wh"],
        name: "Wim Hof Rounds",
        tagline: "Power breaths",
        pattern: "2-0-2-0",
        description: "Full, rhythmic power breaths with no pause between them. \
                      Breathe deep into the belly and let go without forcing the exhale.",
        purpose: "Energy, cold tolerance, mental resilience",
        use_case: "Morning practice, before cold exposure",
        phases: &[
            PhaseSpec::new(Inhale, 2000, "Full breath in"),
            PhaseSpec::new(HoldFull, 0, "Top"),
            PhaseSpec::new(Exhale, 2000, "Let go"),
            PhaseSpec::new(HoldEmpty, 0, "Bottom"),
        ],
        default_cycles: 30,
        category: Energy,
        difficulty: Advanced,
    },
    TechniquePattern {
        id: "energize",
        aliases: &[],
        name: "Energizing Breath",
        tagline: "Quick wake-up",
        pattern: "1-1",
        description: "Short, brisk breaths in and out. A natural lift without caffeine. \
                      Stop if you feel light-headed.",
        purpose: "Alertness and energy",
        use_case: "Morning activation, afternoon slump, before a workout",
        phases: &[
            PhaseSpec::new(Inhale, 1000, "Quick inhale"),
            PhaseSpec::new(Exhale, 1000, "Quick exhale"),
        ],
        default_cycles: 30,
        category: Energy,
        difficulty: Intermediate,
    },
    TechniquePattern {
        id: "recovery",
        aliases: &[],
        name: "Recovery Breathing",
        tagline: "Come back down",
        pattern: "4-2-6-4",
        description: "Longer exhales and a long empty hold help the body recover after \
                      intense physical or mental effort.",
        purpose: "Nervous system recovery",
        use_case: "After a workout or a stressful event",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Recovery breath"),
            PhaseSpec::new(HoldFull, 2000, "Brief hold"),
            PhaseSpec::new(Exhale, 6000, "Release tension"),
            PhaseSpec::new(HoldEmpty, 4000, "Deep rest"),
        ],
        default_cycles: 8,
        category: Recovery,
        difficulty: Beginner,
    },
    TechniquePattern {
        id: "nsdr",
        aliases: &[],
        name: "Deep Rest",
        tagline: "Rest without sleep",
        pattern: "4-6-6",
        description: "A slow pattern for non-sleep deep rest. Relax every muscle while staying \
                      aware of the breath.",
        purpose: "Recharge and restore focus",
        use_case: "Afternoon recharge, after a short night",
        phases: &[
            PhaseSpec::new(Inhale, 4000, "Gentle inhale"),
            PhaseSpec::new(HoldFull, 6000, "Restful hold"),
            PhaseSpec::new(Exhale, 6000, "Melting exhale"),
        ],
        default_cycles: 10,
        category: Recovery,
        difficulty: Beginner,
    },
];

/// All techniques in menu order
#[must_use]
pub fn all() -> &'static [TechniquePattern] {
    TECHNIQUES
}

/// Find a technique by id or alias
pub fn lookup(name: &str) -> Result<&'static TechniquePattern, CatalogError> {
    TECHNIQUES
        .iter()
        .find(|t| t.matches(name.trim()))
        .ok_or_else(|| CatalogError::NotFound {
            name: name.to_string(),
            valid: valid_ids(),
        })
}

/// Position of a technique in menu order
#[must_use]
pub fn index_of(technique: &TechniquePattern) -> Option<usize> {
    TECHNIQUES.iter().position(|t| t.id == technique.id)
}

/// Techniques belonging to one category, in menu order
pub fn by_category(category: Category) -> impl Iterator<Item = &'static TechniquePattern> {
    TECHNIQUES.iter().filter(move |t| t.category == category)
}

/// Comma-separated list of every valid id
#[must_use]
pub fn valid_ids() -> String {
    TECHNIQUES.iter().map(|t| t.id).collect::<Vec<_>>().join(", ")
}
