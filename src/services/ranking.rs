use std::cmp::Ordering;

use chrono::Timelike;
use serde::Serialize;

use crate::models::Slot;

/// Per-day facts a scorer may weigh. Computed fresh for each query; no
/// history is persisted.
#[derive(Debug, Clone, Copy)]
pub struct DayContext {
    pub days_ahead: i64,
    pub bookings_that_day: usize,
    pub capacity: usize,
}

/// Advisory ranking only. A scorer orders the slots a customer sees first;
/// it never adds or removes availability.
pub trait SlotScorer: Send + Sync {
    fn score(&self, slot: &Slot, ctx: &DayContext) -> f64;
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredSlot {
    #[serde(flatten)]
    pub slot: Slot,
    pub score: f64,
}

/// Fixed weighted-sum heuristic: sooner dates within a window are
/// preferred, moderately busy days beat empty or nearly-full ones, and
/// mid-morning starts outrank very early or late ones.
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    pub lead_weight: f64,
    pub fullness_weight: f64,
    pub time_of_day_weight: f64,
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self {
            lead_weight: 0.4,
            fullness_weight: 0.35,
            time_of_day_weight: 0.25,
            min_days_ahead: 1,
            max_days_ahead: 14,
        }
    }
}

impl WeightedScorer {
    fn lead_score(&self, days_ahead: i64) -> f64 {
        if days_ahead < self.min_days_ahead || days_ahead > self.max_days_ahead {
            return 0.0;
        }
        let span = (self.max_days_ahead - self.min_days_ahead).max(1) as f64;
        1.0 - (days_ahead - self.min_days_ahead) as f64 / span
    }

    fn fullness_score(&self, bookings: usize, capacity: usize) -> f64 {
        if capacity == 0 {
            return 0.0;
        }
        let ratio = (bookings as f64 / capacity as f64).min(1.0);
        // Peaks at a half-full day, falls off toward empty and fully booked.
        1.0 - (ratio - 0.5).abs() * 2.0
    }

    fn time_of_day_score(&self, slot: &Slot) -> f64 {
        match slot.start_time.hour() {
            10 | 11 => 1.0,
            9 | 12 | 13 | 14 => 0.7,
            8 | 15 | 16 => 0.4,
            _ => 0.2,
        }
    }
}

impl SlotScorer for WeightedScorer {
    fn score(&self, slot: &Slot, ctx: &DayContext) -> f64 {
        self.lead_weight * self.lead_score(ctx.days_ahead)
            + self.fullness_weight * self.fullness_score(ctx.bookings_that_day, ctx.capacity)
            + self.time_of_day_weight * self.time_of_day_score(slot)
    }
}

/// Rank slots by score, best first. Ties fall back to soonest date and
/// time so the ordering is stable across calls.
pub fn rank_slots(
    scorer: &dyn SlotScorer,
    slots: Vec<(Slot, DayContext)>,
) -> Vec<ScoredSlot> {
    let mut scored: Vec<ScoredSlot> = slots
        .into_iter()
        .map(|(slot, ctx)| ScoredSlot {
            score: scorer.score(&slot, &ctx),
            slot,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.slot.date.cmp(&b.slot.date))
            .then_with(|| a.slot.start_time.cmp(&b.slot.start_time))
    });

    scored
}
