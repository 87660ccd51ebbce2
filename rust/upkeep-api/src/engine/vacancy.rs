//! Booking conflict probing and vacancy search.
//!
//! Wraps the booking store behind the engine's lookup policy and finds
//! the nearest guest-free date around a preferred one.

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::store::{BookingStore, Store, StoreResult};

use super::LookupPolicy;

/// Finds guest-free dates for properties.
#[derive(Debug, Clone)]
pub struct VacancyFinder {
    store: Store,
    lookup: LookupPolicy,
}

impl VacancyFinder {
    #[must_use]
    pub fn new(store: Store, lookup: LookupPolicy) -> Self {
        Self { store, lookup }
    }

    /// Whether an occupying booking covers `date` at the property.
    pub async fn is_occupied(&self, property_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        self.lookup
            .run(|| self.store.has_conflict(property_id, date))
            .await
    }

    /// Find the nearest vacant date within `window_days` of `preferred`,
    /// probing the whole forward window before looking backward because
    /// forward dates defer the work the least. `None` means every day in
    /// the combined window is occupied; the caller decides the fallback.
    ///
    /// The preferred date itself is not probed; callers only search
    /// after finding it occupied.
    pub async fn find_vacant_date(
        &self,
        property_id: Uuid,
        preferred: NaiveDate,
        window_days: u32,
    ) -> StoreResult<Option<NaiveDate>> {
        for offset in 1..=u64::from(window_days) {
            if let Some(date) = preferred.checked_add_days(Days::new(offset)) {
                if !self.is_occupied(property_id, date).await? {
                    return Ok(Some(date));
                }
            }
        }

        for offset in 1..=u64::from(window_days) {
            if let Some(date) = preferred.checked_sub_days(Days::new(offset)) {
                if !self.is_occupied(property_id, date).await? {
                    return Ok(Some(date));
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Booking, BookingStatus};
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn finder(store: Store) -> VacancyFinder {
        VacancyFinder::new(store, LookupPolicy::new(Duration::from_secs(1), 0))
    }

    async fn occupy(store: &Store, property_id: Uuid, from: NaiveDate, to: NaiveDate) {
        let booking = Booking::new(property_id, from, to, BookingStatus::Confirmed);
        store.insert_booking(&booking).await.unwrap();
    }

    #[tokio::test]
    async fn prefers_forward_dates_over_closer_backward_ones() {
        let store = Store::in_memory();
        let property_id = Uuid::new_v4();
        let due = date(2025, 6, 10);
        // Due date and the next day occupied; the day before is free but
        // forward probing reaches June 12 first.
        occupy(&store, property_id, due, date(2025, 6, 11)).await;

        let found = finder(store)
            .find_vacant_date(property_id, due, 7)
            .await
            .unwrap();
        assert_eq!(found, Some(date(2025, 6, 12)));
    }

    #[tokio::test]
    async fn departure_day_checkout_pushes_work_past_the_stay() {
        let store = Store::in_memory();
        let property_id = Uuid::new_v4();
        let due = date(2025, 6, 10);
        // Guest leaves on June 14; the departure day itself still blocks.
        occupy(&store, property_id, due, date(2025, 6, 14)).await;

        let found = finder(store)
            .find_vacant_date(property_id, due, 7)
            .await
            .unwrap();
        assert_eq!(found, Some(date(2025, 6, 15)));
    }

    #[tokio::test]
    async fn falls_back_to_the_backward_window() {
        let store = Store::in_memory();
        let property_id = Uuid::new_v4();
        let due = date(2025, 6, 10);
        occupy(&store, property_id, due, date(2025, 6, 17)).await;

        let found = finder(store)
            .find_vacant_date(property_id, due, 7)
            .await
            .unwrap();
        assert_eq!(found, Some(date(2025, 6, 9)));
    }

    #[tokio::test]
    async fn reports_none_when_the_whole_window_is_occupied() {
        let store = Store::in_memory();
        let property_id = Uuid::new_v4();
        let due = date(2025, 6, 10);
        occupy(&store, property_id, date(2025, 6, 3), date(2025, 6, 17)).await;

        let found = finder(store)
            .find_vacant_date(property_id, due, 7)
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn other_properties_do_not_block() {
        let store = Store::in_memory();
        let property_id = Uuid::new_v4();
        let due = date(2025, 6, 10);
        occupy(&store, Uuid::new_v4(), due, date(2025, 6, 17)).await;

        let occupied = finder(store).is_occupied(property_id, due).await.unwrap();
        assert!(!occupied);
    }
}
