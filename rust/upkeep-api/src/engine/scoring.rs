//! Vendor scoring and selection.
//!
//! Candidates are ranked by a weighted score over rating, response
//! time, experience, insurance, and preferred status. A vendor pinned
//! on the schedule is a hard override and skips scoring entirely.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Vendor, VendorStatus};
use crate::store::{Store, StoreResult, VendorStore};

use super::LookupPolicy;

/// Weights for the vendor scoring formula, passed in at construction so
/// deployments can tune them without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier on the 0-5 average rating.
    #[serde(default = "default_rating_multiplier")]
    pub rating_multiplier: f64,
    /// Response hours at or beyond which the response score bottoms out.
    #[serde(default = "default_response_ceiling_hours")]
    pub response_ceiling_hours: f64,
    /// Multiplier on the hours under the ceiling.
    #[serde(default = "default_response_multiplier")]
    pub response_multiplier: f64,
    /// Neutral score when a vendor has no recorded response time.
    #[serde(default = "default_response_unknown_score")]
    pub response_unknown_score: f64,
    /// Completed jobs beyond this cap stop counting.
    #[serde(default = "default_experience_cap_jobs")]
    pub experience_cap_jobs: u32,
    /// Multiplier on the capped job count.
    #[serde(default = "default_experience_multiplier")]
    pub experience_multiplier: f64,
    /// Bonus for verified insurance.
    #[serde(default = "default_insurance_bonus")]
    pub insurance_bonus: f64,
    /// Bonus for preferred directory status.
    #[serde(default = "default_preferred_status_bonus")]
    pub preferred_status_bonus: f64,
}

fn default_rating_multiplier() -> f64 {
    8.0
}

fn default_response_ceiling_hours() -> f64 {
    48.0
}

fn default_response_multiplier() -> f64 {
    0.625
}

fn default_response_unknown_score() -> f64 {
    15.0
}

fn default_experience_cap_jobs() -> u32 {
    100
}

fn default_experience_multiplier() -> f64 {
    0.2
}

fn default_insurance_bonus() -> f64 {
    10.0
}

fn default_preferred_status_bonus() -> f64 {
    15.0
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating_multiplier: default_rating_multiplier(),
            response_ceiling_hours: default_response_ceiling_hours(),
            response_multiplier: default_response_multiplier(),
            response_unknown_score: default_response_unknown_score(),
            experience_cap_jobs: default_experience_cap_jobs(),
            experience_multiplier: default_experience_multiplier(),
            insurance_bonus: default_insurance_bonus(),
            preferred_status_bonus: default_preferred_status_bonus(),
        }
    }
}

/// Result of vendor selection for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSelection {
    /// Chosen vendor; `None` flags the task for manual assignment.
    pub vendor_id: Option<Uuid>,
    /// Operator-facing explanation of the choice.
    pub reason: String,
}

/// Scores and selects vendors for generated tasks.
#[derive(Debug, Clone)]
pub struct VendorScorer {
    store: Store,
    weights: ScoringWeights,
    pool_size: usize,
    lookup: LookupPolicy,
}

impl VendorScorer {
    #[must_use]
    pub fn new(store: Store, weights: ScoringWeights, pool_size: usize, lookup: LookupPolicy) -> Self {
        Self {
            store,
            weights,
            pool_size,
            lookup,
        }
    }

    /// Score a single vendor against the configured weights.
    #[must_use]
    pub fn score(&self, vendor: &Vendor) -> f64 {
        let w = &self.weights;

        let rating = vendor.average_rating * w.rating_multiplier;
        let response = match vendor.response_hours {
            None => w.response_unknown_score,
            Some(hours) => {
                (w.response_ceiling_hours - hours.min(w.response_ceiling_hours))
                    * w.response_multiplier
            }
        };
        let experience =
            f64::from(vendor.jobs_completed.min(w.experience_cap_jobs)) * w.experience_multiplier;
        let insurance = if vendor.insurance_verified {
            w.insurance_bonus
        } else {
            0.0
        };
        let preferred = if vendor.status == VendorStatus::Preferred {
            w.preferred_status_bonus
        } else {
            0.0
        };

        rating + response + experience + insurance + preferred
    }

    /// Select a vendor for `category`, honoring a pinned preferred
    /// vendor first. Never fails the task on an empty directory: the
    /// caller persists the task unassigned instead.
    pub async fn select(
        &self,
        category: &str,
        preferred_vendor_id: Option<Uuid>,
    ) -> StoreResult<VendorSelection> {
        // A manually pinned vendor wins outright while it stays assignable.
        if let Some(id) = preferred_vendor_id {
            let pinned = self.lookup.run(|| self.store.get_vendor(id)).await?;
            match pinned {
                Some(vendor) if vendor.status.is_assignable() => {
                    return Ok(VendorSelection {
                        vendor_id: Some(vendor.id),
                        reason: "Preferred vendor".to_string(),
                    });
                }
                Some(vendor) => {
                    tracing::debug!(
                        vendor_id = %vendor.id,
                        status = vendor.status.as_str(),
                        "pinned vendor not assignable, falling back to scoring"
                    );
                }
                None => {
                    tracing::debug!(vendor_id = %id, "pinned vendor not found, falling back to scoring");
                }
            }
        }

        let pool = self
            .lookup
            .run(|| self.store.top_vendors_for_category(category, self.pool_size))
            .await?;

        if pool.is_empty() {
            return Ok(VendorSelection {
                vendor_id: None,
                reason: "No vendors available".to_string(),
            });
        }

        // Ties keep the pool's incoming order (rating then vendor id),
        // so selection is deterministic.
        let mut best = &pool[0];
        let mut best_score = self.score(best);
        for vendor in &pool[1..] {
            let score = self.score(vendor);
            if score > best_score {
                best = vendor;
                best_score = score;
            }
        }

        Ok(VendorSelection {
            vendor_id: Some(best.id),
            reason: format!("Best {category} vendor (score: {best_score:.1})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn scorer(store: Store) -> VendorScorer {
        VendorScorer::new(
            store,
            ScoringWeights::default(),
            5,
            LookupPolicy::new(Duration::from_secs(1), 0),
        )
    }

    fn vendor_a() -> Vendor {
        Vendor::new("Summit Mechanical", VendorStatus::Active)
            .with_specialty("HVAC")
            .with_rating(4.5)
            .with_response_hours(10.0)
            .with_jobs_completed(80)
            .with_insurance(true)
    }

    fn vendor_b() -> Vendor {
        Vendor::new("Rapid Air", VendorStatus::Preferred)
            .with_specialty("HVAC")
            .with_rating(4.0)
            .with_response_hours(2.0)
            .with_jobs_completed(100)
            .with_insurance(true)
    }

    #[test]
    fn worked_example_scores_match_the_formula() {
        let scorer = scorer(Store::in_memory());

        // 36 + 23.75 + 16 + 10 + 0
        assert!((scorer.score(&vendor_a()) - 85.75).abs() < 1e-9);
        // 32 + 28.75 + 20 + 10 + 15
        assert!((scorer.score(&vendor_b()) - 105.75).abs() < 1e-9);
    }

    #[test]
    fn unknown_response_time_scores_neutral() {
        let scorer = scorer(Store::in_memory());
        let vendor = Vendor::new("Mystery Services", VendorStatus::Active).with_rating(0.0);
        assert!((scorer.score(&vendor) - 15.0).abs() < 1e-9);

        // Sluggish responders bottom out at zero rather than going negative.
        let slow = Vendor::new("Glacier Repairs", VendorStatus::Active)
            .with_rating(0.0)
            .with_response_hours(96.0);
        assert!(scorer.score(&slow).abs() < 1e-9);
    }

    #[test]
    fn experience_is_capped() {
        let scorer = scorer(Store::in_memory());
        let veteran = Vendor::new("Old Hands", VendorStatus::Active)
            .with_rating(0.0)
            .with_response_hours(48.0)
            .with_jobs_completed(5000);
        assert!((scorer.score(&veteran) - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn higher_scoring_candidate_wins() {
        let store = Store::in_memory();
        let a = vendor_a();
        let b = vendor_b();
        store.upsert_vendor(&a).await.unwrap();
        store.upsert_vendor(&b).await.unwrap();

        let selection = scorer(store).select("HVAC", None).await.unwrap();
        assert_eq!(selection.vendor_id, Some(b.id));
        assert_eq!(selection.reason, "Best HVAC vendor (score: 105.8)");
    }

    #[tokio::test]
    async fn equal_scores_keep_the_pool_order() {
        let store = Store::in_memory();
        let first = Vendor::new("Twin One", VendorStatus::Active)
            .with_specialty("Plumbing")
            .with_rating(4.0)
            .with_response_hours(24.0)
            .with_jobs_completed(50)
            .with_insurance(true);
        let second = Vendor::new("Twin Two", VendorStatus::Active)
            .with_specialty("Plumbing")
            .with_rating(4.0)
            .with_response_hours(24.0)
            .with_jobs_completed(50)
            .with_insurance(true);
        store.upsert_vendor(&first).await.unwrap();
        store.upsert_vendor(&second).await.unwrap();

        let expected = first.id.min(second.id);
        let selection = scorer(store).select("Plumbing", None).await.unwrap();
        assert_eq!(selection.vendor_id, Some(expected));
    }

    #[tokio::test]
    async fn pinned_vendor_overrides_a_better_score() {
        let store = Store::in_memory();
        let star = vendor_b();
        let pinned = Vendor::new("Family Favorite", VendorStatus::Active)
            .with_specialty("HVAC")
            .with_rating(2.0);
        store.upsert_vendor(&star).await.unwrap();
        store.upsert_vendor(&pinned).await.unwrap();

        let selection = scorer(store).select("HVAC", Some(pinned.id)).await.unwrap();
        assert_eq!(selection.vendor_id, Some(pinned.id));
        assert_eq!(selection.reason, "Preferred vendor");
    }

    #[tokio::test]
    async fn blocked_pinned_vendor_falls_back_to_scoring() {
        let store = Store::in_memory();
        let blocked = Vendor::new("Barred Bros", VendorStatus::Blocked)
            .with_specialty("HVAC")
            .with_rating(5.0);
        let fallback = vendor_a();
        store.upsert_vendor(&blocked).await.unwrap();
        store.upsert_vendor(&fallback).await.unwrap();

        let selection = scorer(store).select("HVAC", Some(blocked.id)).await.unwrap();
        assert_eq!(selection.vendor_id, Some(fallback.id));
        assert!(selection.reason.starts_with("Best HVAC vendor"));
    }

    #[tokio::test]
    async fn empty_directory_flags_manual_assignment() {
        let selection = scorer(Store::in_memory()).select("Roofing", None).await.unwrap();
        assert_eq!(selection.vendor_id, None);
        assert_eq!(selection.reason, "No vendors available");
    }
}
