use chrono::NaiveDate;

use crate::models::TrainingSession;

/// Counts consecutive calendar days trained, ending at or adjacent to
/// `today`. Multiple sessions on one date count as a single day; records
/// without a date are ignored. A most-recent session older than yesterday
/// breaks the streak entirely.
pub fn consecutive_days(sessions: &[TrainingSession], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = sessions
        .iter()
        .filter_map(|session| session.session_date)
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let most_recent = match dates.first() {
        Some(date) => *date,
        None => return 0,
    };

    if (today - most_recent).num_days() > 1 {
        return 0;
    }

    let mut streak = 1u32;
    for pair in dates.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
