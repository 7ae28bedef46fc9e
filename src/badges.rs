use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{BadgeDefinition, BadgeKind, TrainingSession};
use crate::streak;

pub const STREAK_GOAL_DAYS: u32 = 7;

/// Returns the catalog badges the dog newly qualifies for: each at most
/// once, never one already held, never one whose kind tag is unknown. Pure
/// and idempotent; persisting the result is the caller's job.
pub fn evaluate_new_badges(
    catalog: &[BadgeDefinition],
    held: &HashSet<i32>,
    sessions: &[TrainingSession],
    today: NaiveDate,
) -> Vec<BadgeDefinition> {
    if sessions.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<i32> = HashSet::new();
    let mut earned = Vec::new();

    for badge in catalog {
        if held.contains(&badge.id) || !seen.insert(badge.id) {
            continue;
        }
        let kind = match badge.kind {
            Some(kind) => kind,
            None => continue,
        };
        if qualifies(kind, sessions, today) {
            earned.push(badge.clone());
        }
    }

    earned
}

fn qualifies(kind: BadgeKind, sessions: &[TrainingSession], today: NaiveDate) -> bool {
    match kind {
        BadgeKind::FirstSession => !sessions.is_empty(),
        BadgeKind::FirstPerfectSuccess => earliest_session(sessions)
            .and_then(|session| session.success_rate)
            .map(|rate| rate == 100.0)
            .unwrap_or(false),
        BadgeKind::SevenDayStreak => streak::consecutive_days(sessions, today) >= STREAK_GOAL_DAYS,
    }
}

fn earliest_session(sessions: &[TrainingSession]) -> Option<&TrainingSession> {
    sessions.iter().min_by_key(|session| session.recorded_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    fn catalog() -> Vec<BadgeDefinition> {
        vec![
            BadgeDefinition {
                id: 1,
                name: "첫 훈련 파트너".to_string(),
                kind: Some(BadgeKind::FirstSession),
                description: Some("Logged a first training session".to_string()),
            },
            BadgeDefinition {
                id: 2,
                name: "한번 더".to_string(),
                kind: Some(BadgeKind::FirstPerfectSuccess),
                description: Some("Nailed the very first session".to_string()),
            },
            BadgeDefinition {
                id: 3,
                name: "꾸준함의 상징".to_string(),
                kind: Some(BadgeKind::SevenDayStreak),
                description: Some("Trained seven days in a row".to_string()),
            },
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    fn session(days_ago: i64, success_rate: Option<f64>, recorded_at: DateTime<Utc>) -> TrainingSession {
        TrainingSession {
            dog_id: Uuid::new_v4(),
            session_date: Some(today() - Duration::days(days_ago)),
            success_rate,
            training_type: "recall".to_string(),
            duration_minutes: Some(10),
            notes: String::new(),
            recorded_at,
        }
    }

    fn seven_day_history(first_rate: f64) -> Vec<TrainingSession> {
        let base = Utc::now();
        (0..7)
            .map(|days_ago| {
                let rate = if days_ago == 6 { first_rate } else { 75.0 };
                // oldest calendar day carries the oldest recorded_at
                session(days_ago, Some(rate), base - Duration::days(days_ago))
            })
            .collect()
    }

    #[test]
    fn empty_sessions_earn_nothing() {
        let earned = evaluate_new_badges(&catalog(), &HashSet::new(), &[], today());
        assert!(earned.is_empty());
    }

    #[test]
    fn seven_day_perfect_start_earns_all_three() {
        let sessions = seven_day_history(100.0);
        let earned = evaluate_new_badges(&catalog(), &HashSet::new(), &sessions, today());
        let mut ids: Vec<i32> = earned.iter().map(|badge| badge.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn held_badges_are_never_returned() {
        let sessions = vec![session(0, Some(60.0), Utc::now())];
        let held: HashSet<i32> = [1].into_iter().collect();
        let earned = evaluate_new_badges(&catalog(), &held, &sessions, today());
        assert!(earned.is_empty());
    }

    #[test]
    fn first_perfect_checks_the_earliest_record() {
        let base = Utc::now();
        // chronologically first session failed; a later perfect one must not count
        let sessions = vec![
            session(1, Some(60.0), base - Duration::days(1)),
            session(0, Some(100.0), base),
        ];
        let earned = evaluate_new_badges(&catalog(), &HashSet::new(), &sessions, today());
        let ids: Vec<i32> = earned.iter().map(|badge| badge.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let mut badges = catalog();
        badges.push(BadgeDefinition {
            id: 9,
            name: "mystery".to_string(),
            kind: None,
            description: None,
        });
        let sessions = seven_day_history(100.0);
        let earned = evaluate_new_badges(&badges, &HashSet::new(), &sessions, today());
        assert!(earned.iter().all(|badge| badge.id != 9));
    }

    #[test]
    fn duplicate_catalog_rows_award_once() {
        let mut badges = catalog();
        badges.push(badges[0].clone());
        let sessions = vec![session(0, Some(50.0), Utc::now())];
        let earned = evaluate_new_badges(&badges, &HashSet::new(), &sessions, today());
        assert_eq!(earned.iter().filter(|badge| badge.id == 1).count(), 1);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let sessions = seven_day_history(100.0);
        let held = HashSet::new();
        let first = evaluate_new_badges(&catalog(), &held, &sessions, today());
        let second = evaluate_new_badges(&catalog(), &held, &sessions, today());
        let first_ids: Vec<i32> = first.iter().map(|badge| badge.id).collect();
        let second_ids: Vec<i32> = second.iter().map(|badge| badge.id).collect();
        assert_eq!(first_ids, second_ids);
    }
}
