//! Capability-aware re-ranking.
//!
//! Each model carries a static profile scoring five axes 0-100. When a
//! request names capability hints, candidates are re-ordered by a weighted
//! mean over the hinted axes: hint `i` of `n` carries weight `n - i`, so
//! earlier hints dominate. The sort is stable, so equal scores keep their
//! preference order, and an empty hint list leaves the row untouched.

use crate::candidates::Candidate;
use crate::classify::CapabilityHint;

/// Per-axis scores for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub code: u8,
    pub reasoning: u8,
    pub creativity: u8,
    pub speed: u8,
    pub cost: u8,
}

impl CapabilityProfile {
    pub const fn new(code: u8, reasoning: u8, creativity: u8, speed: u8, cost: u8) -> Self {
        Self {
            code,
            reasoning,
            creativity,
            speed,
            cost,
        }
    }

    pub fn axis(&self, hint: CapabilityHint) -> u8 {
        match hint {
            CapabilityHint::Code => self.code,
            CapabilityHint::Reasoning => self.reasoning,
            CapabilityHint::Creativity => self.creativity,
            CapabilityHint::Speed => self.speed,
            CapabilityHint::Cost => self.cost,
        }
    }
}

/// Neutral profile assumed for models without a curated entry.
pub const DEFAULT_PROFILE: CapabilityProfile = CapabilityProfile::new(50, 50, 50, 50, 50);

/// Curated profile for a model. Higher cost score means cheaper to run.
pub fn profile_for(model: &str) -> CapabilityProfile {
    match model {
        "claude-opus-4" => CapabilityProfile::new(95, 96, 90, 35, 20),
        "claude-sonnet-4" => CapabilityProfile::new(92, 88, 85, 60, 55),
        "claude-3-5-haiku" => CapabilityProfile::new(75, 70, 72, 90, 85),
        "gemini-2.5-pro" => CapabilityProfile::new(85, 90, 82, 55, 50),
        "gemini-2.5-flash" => CapabilityProfile::new(72, 68, 70, 95, 90),
        "gpt-4o" => CapabilityProfile::new(84, 80, 86, 70, 60),
        "gpt-4o-mini" => CapabilityProfile::new(70, 62, 68, 92, 88),
        "o3" => CapabilityProfile::new(90, 97, 75, 30, 25),
        "o3-mini" => CapabilityProfile::new(82, 85, 65, 75, 70),
        _ => DEFAULT_PROFILE,
    }
}

/// Weighted capability score for one model, or `None` without hints.
pub fn score(model: &str, hints: &[CapabilityHint]) -> Option<f64> {
    if hints.is_empty() {
        return None;
    }
    let profile = profile_for(model);
    let n = hints.len();
    let mut weighted = 0.0;
    let mut weights = 0.0;
    for (i, hint) in hints.iter().enumerate() {
        let weight = (n - i) as f64;
        weighted += f64::from(profile.axis(*hint)) * weight;
        weights += weight;
    }
    Some(weighted / weights)
}

/// Re-rank candidates by descending capability score.
pub fn rerank(candidates: Vec<Candidate>, hints: &[CapabilityHint]) -> Vec<Candidate> {
    if hints.is_empty() {
        return candidates;
    }
    let mut scored: Vec<(f64, Candidate)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = score(&candidate.model, hints).unwrap_or(0.0);
            (score, candidate)
        })
        .collect();
    // sort_by is stable: ties keep preference order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}
