//! Schedule roll-forward date arithmetic.
//!
//! The next due date is always anchored at the schedule's current due
//! date, never at "today" or at a vacancy-adjusted generation date.
//! Anchoring on the original date keeps recurrences from drifting with
//! batch-run timing.

use chrono::{Datelike, Months, NaiveDate};

/// Add calendar months with day-of-month clamping: Jan 31 + 1 month is
/// Feb 28 (29 in leap years). This is the one documented overflow rule
/// used everywhere in the engine.
#[must_use]
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    // Dates past chrono's representable range saturate.
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Compute the due date following `current` for a schedule with the
/// given frequency.
///
/// When the template restricts work to certain calendar months, the
/// date keeps advancing one month at a time (re-anchored on `current`
/// so the day-of-month survives short months) until it lands in an
/// allowed month. A list naming no real calendar month, like an empty
/// one, allows every month.
#[must_use]
pub fn next_due_date(current: NaiveDate, frequency_months: u32, preferred_months: &[u32]) -> NaiveDate {
    let frequency = frequency_months.max(1);
    let mut offset = frequency;
    let mut next = add_months_clamped(current, offset);

    if preferred_months.iter().any(|m| (1..=12).contains(m)) {
        // Eleven extra steps visit every calendar month once.
        for _ in 0..11 {
            if preferred_months.contains(&next.month()) {
                break;
            }
            offset += 1;
            next = add_months_clamped(current, offset);
        }
    } else if !preferred_months.is_empty() {
        tracing::debug!(?preferred_months, "ignoring preferred months outside 1-12");
    }

    next
}
