//! Difficulty weighting engine.
//!
//! Turns a base difficulty mix plus learner signals (declared confidence and
//! recent per-band accuracy) into an integer number of questions per band.
//!
//! ## Pipeline
//!
//! ```text
//! template mix -> base weights -> confidence bias -> performance bias -> counts
//! ```
//!
//! Every stage is a pure function over [`DifficultyWeights`]; nothing here
//! fails. Out-of-range inputs are clamped instead of rejected.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed, ordered difficulty bands. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Intro,
    Core,
    Advanced,
}

impl DifficultyBand {
    /// All bands in tie-break order.
    pub const ORDER: [DifficultyBand; 3] = [
        DifficultyBand::Intro,
        DifficultyBand::Core,
        DifficultyBand::Advanced,
    ];

    /// Normalize a free-form difficulty label ("Core", "ADVANCED", "intro", ...).
    ///
    /// Anything not recognised as advanced or intro collapses to `Core`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("advanced") {
            DifficultyBand::Advanced
        } else if label.eq_ignore_ascii_case("intro") {
            DifficultyBand::Intro
        } else {
            DifficultyBand::Core
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyBand::Intro => "intro",
            DifficultyBand::Core => "core",
            DifficultyBand::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse, used where an unknown band is a user error (CLI flags).
impl FromStr for DifficultyBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intro" => Ok(DifficultyBand::Intro),
            "core" => Ok(DifficultyBand::Core),
            "advanced" => Ok(DifficultyBand::Advanced),
            other => Err(format!("unknown difficulty band: {other}")),
        }
    }
}

/// One value per band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandMap<T> {
    pub intro: T,
    pub core: T,
    pub advanced: T,
}

impl<T: Copy> BandMap<T> {
    pub fn get(&self, band: DifficultyBand) -> T {
        match band {
            DifficultyBand::Intro => self.intro,
            DifficultyBand::Core => self.core,
            DifficultyBand::Advanced => self.advanced,
        }
    }

    pub fn get_mut(&mut self, band: DifficultyBand) -> &mut T {
        match band {
            DifficultyBand::Intro => &mut self.intro,
            DifficultyBand::Core => &mut self.core,
            DifficultyBand::Advanced => &mut self.advanced,
        }
    }
}

/// Fractional share per band, summing to 1 once normalized.
pub type DifficultyWeights = BandMap<f64>;

/// Question count per band, summing to the requested batch size.
pub type DifficultyCounts = BandMap<u32>;

/// Partial per-band values (template mix overrides, recent accuracy).
pub type BandOverrides = BTreeMap<DifficultyBand, f64>;

impl DifficultyCounts {
    pub fn total(&self) -> u32 {
        self.intro + self.core + self.advanced
    }
}

impl DifficultyWeights {
    pub fn sum(&self) -> f64 {
        self.intro + self.core + self.advanced
    }
}

pub const DEFAULT_WEIGHTS: DifficultyWeights = BandMap {
    intro: 0.20,
    core: 0.55,
    advanced: 0.25,
};

pub const DEFAULT_CONFIDENCE: f64 = 0.6;

const CONFIDENCE_SCALE: f64 = 0.3;
const PERFORMANCE_SCALE: f64 = 0.1;

/// Clamp to [0, 1]. NaN maps to the neutral midpoint so it produces no bias.
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Inputs for [`scale_difficulty`].
#[derive(Debug, Clone, Default)]
pub struct DifficultyScaling<'a> {
    pub total_questions: i64,
    pub template_mix: Option<&'a BandOverrides>,
    /// 0 (struggling) to 1 (mastery). Defaults to [`DEFAULT_CONFIDENCE`].
    pub learner_confidence: Option<f64>,
    /// Recent accuracy per band, 0 to 1.
    pub recent_performance: Option<&'a BandOverrides>,
}

/// Base weights: the default mix, or the template override normalized by its total.
///
/// Bands missing from a positive-total override get weight 0. Negative or
/// non-finite shares count as 0.
pub fn derive_weights(template_mix: Option<&BandOverrides>) -> DifficultyWeights {
    let Some(mix) = template_mix else {
        return DEFAULT_WEIGHTS;
    };
    let share = |band: DifficultyBand| {
        mix.get(&band)
            .copied()
            .filter(|v| v.is_finite())
            .map_or(0.0, |v| v.max(0.0))
    };
    let total: f64 = DifficultyBand::ORDER.iter().map(|&b| share(b)).sum();
    if total <= 0.0 {
        return DEFAULT_WEIGHTS;
    }

    let mut weights = DifficultyWeights::default();
    for band in DifficultyBand::ORDER {
        *weights.get_mut(band) = share(band) / total;
    }
    weights
}

/// Shift weight between the extremes according to declared confidence.
///
/// Below 0.5, weight moves out of `advanced` (60% to intro, 40% to core).
/// Above 0.5, weight moves out of `intro` (split evenly to core and advanced).
pub fn apply_confidence_bias(
    weights: DifficultyWeights,
    learner_confidence: Option<f64>,
) -> DifficultyWeights {
    let confidence = clamp_unit(learner_confidence.unwrap_or(DEFAULT_CONFIDENCE));
    let bias = (0.5 - confidence) * CONFIDENCE_SCALE;
    let mut adjusted = weights;

    if bias > 0.0 {
        let steal = adjusted.advanced.min(bias);
        adjusted.advanced -= steal;
        adjusted.intro += steal * 0.6;
        adjusted.core += steal * 0.4;
    } else if bias < 0.0 {
        let shift = adjusted.intro.min(bias.abs());
        adjusted.intro -= shift;
        adjusted.core += shift * 0.5;
        adjusted.advanced += shift * 0.5;
    }
    adjusted
}

/// Raise emphasis on bands with weak recent accuracy, lower it on strong ones,
/// then renormalize.
///
/// If every band ends up at zero the input weights are returned unchanged.
pub fn apply_performance_bias(
    weights: DifficultyWeights,
    recent_performance: Option<&BandOverrides>,
) -> DifficultyWeights {
    let Some(performance) = recent_performance else {
        return weights;
    };

    let mut adjusted = weights;
    for band in DifficultyBand::ORDER {
        if let Some(&accuracy) = performance.get(&band) {
            let delta = (0.5 - clamp_unit(accuracy)) * PERFORMANCE_SCALE;
            let slot = adjusted.get_mut(band);
            *slot = clamp_unit(*slot + delta);
        }
    }

    let total = adjusted.sum();
    if total == 0.0 {
        return weights;
    }
    for band in DifficultyBand::ORDER {
        *adjusted.get_mut(band) /= total;
    }
    adjusted
}

/// Allocate `floor(weight * total)` per band, then hand out the remainder one
/// unit at a time starting from `intro` in band order.
pub fn distribute_counts(total: u32, weights: &DifficultyWeights) -> DifficultyCounts {
    let mut counts = DifficultyCounts::default();
    for band in DifficultyBand::ORDER {
        let slice = (clamp_unit(weights.get(band)) * f64::from(total)).floor();
        // Saturating float-to-int cast; slice is already within [0, total].
        *counts.get_mut(band) = slice as u32;
    }

    // Floating point noise in unnormalized weights could overshoot; trim from the end.
    while counts.total() > total {
        if let Some(band) = DifficultyBand::ORDER
            .iter()
            .rev()
            .copied()
            .find(|&b| counts.get(b) > 0)
        {
            *counts.get_mut(band) -= 1;
        }
    }

    let mut remaining = total - counts.total();
    let mut index = 0;
    while remaining > 0 {
        let band = DifficultyBand::ORDER[index % DifficultyBand::ORDER.len()];
        *counts.get_mut(band) += 1;
        remaining -= 1;
        index += 1;
    }
    counts
}

/// Full pipeline. Non-positive totals short-circuit to all-zero counts.
pub fn scale_difficulty(options: &DifficultyScaling<'_>) -> DifficultyCounts {
    if options.total_questions <= 0 {
        return DifficultyCounts::default();
    }
    let total = u32::try_from(options.total_questions).unwrap_or(u32::MAX);

    let base = derive_weights(options.template_mix);
    let confident = apply_confidence_bias(base, options.learner_confidence);
    let weights = apply_performance_bias(confident, options.recent_performance);
    distribute_counts(total, &weights)
}

/// One band label per slot, lazily: intro slots first, then core, then advanced.
pub fn plan_slots(counts: &DifficultyCounts) -> impl Iterator<Item = DifficultyBand> + '_ {
    DifficultyBand::ORDER.iter().flat_map(move |&band| {
        let n = usize::try_from(counts.get(band)).unwrap_or(usize::MAX);
        std::iter::repeat(band).take(n)
    })
}

/// [`plan_slots`] collected. Allocates one entry per planned question.
pub fn flatten_counts(counts: &DifficultyCounts) -> Vec<DifficultyBand> {
    plan_slots(counts).collect()
}
