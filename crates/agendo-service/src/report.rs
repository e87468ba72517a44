//! Reporting aggregator.
//!
//! Monthly appointment counts for a calendar year, computed with the
//! store's half-open range query so a timestamp on a month boundary
//! lands in exactly one month.

use agendo_core::error::{AgendoError, AgendoResult};
use agendo_core::repository::AppointmentRepository;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Half-open bounds of calendar month `month` of `year`:
/// `[first of month 00:00:00, first of next month 00:00:00)`.
/// December rolls the exclusive end into January of `year + 1`.
pub fn month_bounds(year: i32, month: u32) -> AgendoResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_of = |y: i32, m: u32| {
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| AgendoError::Internal(format!("invalid month: {y}-{m}")))
    };

    let start = start_of(year, month)?;
    let end = if month == 12 {
        start_of(year + 1, 1)?
    } else {
        start_of(year, month + 1)?
    };

    Ok((start, end))
}

/// Count the tenant's appointments per calendar month of `year`.
///
/// Always yields exactly 12 values, index 0 = January; months without
/// appointments contribute an explicit zero.
pub async fn monthly_appointment_counts<A: AppointmentRepository>(
    repo: &A,
    company_id: Uuid,
    year: i32,
) -> AgendoResult<[u64; 12]> {
    let mut counts = [0u64; 12];
    for (index, slot) in counts.iter_mut().enumerate() {
        let (start, end) = month_bounds(year, index as u32 + 1)?;
        *slot = repo.count_in_range(company_id, start, end).await?;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open_month_edges() {
        let (start, end) = month_bounds(2024, 3).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-04-01T00:00:00+00:00");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn february_length_comes_from_the_calendar() {
        // Leap year: the February window spans 29 days.
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!((end - start).num_days(), 29);

        let (start, end) = month_bounds(2023, 2).unwrap();
        assert_eq!((end - start).num_days(), 28);
    }

    #[test]
    fn consecutive_months_share_a_boundary() {
        for month in 1..12 {
            let (_, end) = month_bounds(2024, month).unwrap();
            let (start, _) = month_bounds(2024, month + 1).unwrap();
            assert_eq!(end, start);
        }
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }
}
