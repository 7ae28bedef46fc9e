use std::collections::HashSet;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::badges;
use crate::models::{AwardedBadge, BadgeDefinition, DogRecord, SessionTypeSummary, TrainingSession};
use crate::streak;

pub fn summarize_by_type(sessions: &[TrainingSession]) -> Vec<SessionTypeSummary> {
    let mut map: std::collections::HashMap<String, (usize, f64, usize)> =
        std::collections::HashMap::new();

    for session in sessions {
        let entry = map
            .entry(session.training_type.clone())
            .or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(rate) = session.success_rate {
            entry.1 += rate;
            entry.2 += 1;
        }
    }

    let mut summaries: Vec<SessionTypeSummary> = map
        .into_iter()
        .map(|(training_type, (count, total_success, rated))| SessionTypeSummary {
            training_type,
            count,
            avg_success: if rated == 0 {
                0.0
            } else {
                total_success / rated as f64
            },
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_report(
    dog: &DogRecord,
    sessions: &[TrainingSession],
    catalog: &[BadgeDefinition],
    earned: &[AwardedBadge],
    today: NaiveDate,
) -> String {
    let streak = streak::consecutive_days(sessions, today);
    let held: HashSet<i32> = earned.iter().map(|badge| badge.badge_id).collect();
    let due = badges::evaluate_new_badges(catalog, &held, sessions, today);
    let summaries = summarize_by_type(sessions);

    let mut output = String::new();

    let _ = writeln!(output, "# Training Progress Report: {}", dog.name);
    let _ = writeln!(
        output,
        "Generated on {} for {} ({})",
        today, dog.owner_email, dog.breed
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Current streak: {streak} consecutive days");
    let _ = writeln!(output, "- Sessions logged: {}", sessions.len());

    let rated: Vec<f64> = sessions.iter().filter_map(|s| s.success_rate).collect();
    if rated.is_empty() {
        let _ = writeln!(output, "- Average success rate: no rated sessions");
    } else {
        let avg = rated.iter().sum::<f64>() / rated.len() as f64;
        let _ = writeln!(output, "- Average success rate: {avg:.1}%");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Session Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No sessions logged yet.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} sessions (avg success {:.1}%)",
                summary.training_type, summary.count, summary.avg_success
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Badges");

    if catalog.is_empty() {
        let _ = writeln!(output, "No badges in the catalog.");
    } else {
        for badge in catalog.iter() {
            let status = match earned.iter().find(|award| award.badge_id == badge.id) {
                Some(award) => format!("earned {}", award.achieved_at.date_naive()),
                None if due.iter().any(|candidate| candidate.id == badge.id) => {
                    "newly due".to_string()
                }
                None => "locked".to_string(),
            };
            let _ = writeln!(output, "- {} [{status}]", badge.name);
        }
    }

    let mut recent: Vec<&TrainingSession> = sessions.iter().collect();
    recent.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Sessions");

    if recent.is_empty() {
        let _ = writeln!(output, "No sessions logged yet.");
    } else {
        for session in recent.iter().take(5) {
            let date = session
                .session_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "undated".to_string());
            let rate = session
                .success_rate
                .map(|r| format!("{r:.0}%"))
                .unwrap_or_else(|| "unrated".to_string());
            let _ = writeln!(
                output,
                "- {} ({}) on {}: {}",
                session.training_type, rate, date, session.notes
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn session(training_type: &str, success_rate: Option<f64>) -> TrainingSession {
        TrainingSession {
            dog_id: Uuid::new_v4(),
            session_date: Some(NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()),
            success_rate,
            training_type: training_type.to_string(),
            duration_minutes: Some(20),
            notes: "good focus".to_string(),
            recorded_at: Utc::now() - Duration::hours(1),
        }
    }

    #[test]
    fn summaries_average_only_rated_sessions() {
        let sessions = vec![
            session("sit", Some(80.0)),
            session("sit", None),
            session("sit", Some(60.0)),
            session("recall", Some(90.0)),
        ];
        let summaries = summarize_by_type(&sessions);
        assert_eq!(summaries[0].training_type, "sit");
        assert_eq!(summaries[0].count, 3);
        assert!((summaries[0].avg_success - 70.0).abs() < 0.001);
    }

    #[test]
    fn report_marks_badge_states() {
        let dog = DogRecord {
            id: Uuid::new_v4(),
            name: "Mongsil".to_string(),
            owner_email: "owner@example.com".to_string(),
            breed: "Maltese".to_string(),
        };
        let catalog = vec![
            BadgeDefinition {
                id: 1,
                name: "첫 훈련 파트너".to_string(),
                kind: Some(crate::models::BadgeKind::FirstSession),
                description: None,
            },
            BadgeDefinition {
                id: 3,
                name: "꾸준함의 상징".to_string(),
                kind: Some(crate::models::BadgeKind::SevenDayStreak),
                description: None,
            },
        ];
        let sessions = vec![session("sit", Some(70.0))];
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        let report = build_report(&dog, &sessions, &catalog, &[], today);
        assert!(report.contains("첫 훈련 파트너 [newly due]"));
        assert!(report.contains("꾸준함의 상징 [locked]"));
        assert!(report.contains("Current streak: 1 consecutive days"));
    }

    #[test]
    fn earned_badges_show_their_date() {
        use chrono::TimeZone;

        let dog = DogRecord {
            id: Uuid::new_v4(),
            name: "Bori".to_string(),
            owner_email: "owner@example.com".to_string(),
            breed: "Welsh Corgi".to_string(),
        };
        let catalog = vec![BadgeDefinition {
            id: 1,
            name: "첫 훈련 파트너".to_string(),
            kind: Some(crate::models::BadgeKind::FirstSession),
            description: None,
        }];
        let earned = vec![AwardedBadge {
            dog_id: dog.id,
            badge_id: 1,
            achieved_at: Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap(),
        }];
        let sessions = vec![session("sit", Some(70.0))];
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        let report = build_report(&dog, &sessions, &catalog, &earned, today);
        assert!(report.contains("첫 훈련 파트너 [earned 2026-08-20]"));
    }
}
