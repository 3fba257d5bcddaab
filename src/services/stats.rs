//! Booking statistics for salon dashboards

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    availability::conflicts::day_window,
    error::{AppError, AppResult},
    models::booking::{BookingStats, BookingStatsQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    max_range_days: i64,
}

impl StatsService {
    pub fn new(repository: Repository, max_range_days: i64) -> Self {
        Self {
            repository,
            max_range_days,
        }
    }

    /// Counts per status, completed revenue and booked minutes for bookings
    /// starting between the two local dates (both inclusive)
    pub async fn booking_stats(&self, salon_id: Uuid, query: &BookingStatsQuery) -> AppResult<BookingStats> {
        check_range(query.from, query.to, self.max_range_days)?;

        let salon = self.repository.salons.get_by_id(salon_id).await?;
        let tz = salon.tz()?;
        let (from, _) = day_window(query.from, tz);
        let (_, to) = day_window(query.to, tz);

        let by_status = self.repository.bookings.count_by_status(salon.id, from, to).await?;
        let (completed_revenue, booked_minutes) =
            self.repository.bookings.activity_totals(salon.id, from, to).await?;
        let total = by_status.iter().map(|c| c.count).sum::<i64>();

        Ok(BookingStats {
            salon_id: salon.id,
            from: query.from,
            to: query.to,
            total,
            by_status,
            completed_revenue,
            booked_minutes,
        })
    }
}

fn check_range(from: NaiveDate, to: NaiveDate, max_days: i64) -> AppResult<()> {
    if to < from {
        return Err(AppError::BadRequest("'to' must not be before 'from'".to_string()));
    }
    let days = (to - from).num_days() + 1;
    if days > max_days {
        return Err(AppError::BadRequest(format!(
            "Date range of {} days exceeds the maximum of {}",
            days, max_days
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_range_bounds() {
        assert!(check_range(d("2026-03-01"), d("2026-03-01"), 1).is_ok());
        assert!(check_range(d("2026-03-01"), d("2026-03-31"), 31).is_ok());
        assert!(check_range(d("2026-03-01"), d("2026-04-01"), 31).is_err());
        assert!(check_range(d("2026-03-02"), d("2026-03-01"), 31).is_err());
    }
}
