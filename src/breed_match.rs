use crate::models::{BreedMatch, BreedProfile, QuizAnswers};

/// Scores every breed against the owner's quiz answers and returns the list
/// sorted by score descending. Missing trait data or unanswered questions
/// simply contribute nothing.
pub fn score_breeds(breeds: &[BreedProfile], answers: &QuizAnswers) -> Vec<BreedMatch> {
    let mut matches: Vec<BreedMatch> = breeds
        .iter()
        .map(|breed| BreedMatch {
            name_ko: breed.name_ko.clone(),
            name_en: breed.name_en.clone(),
            size_type: breed.size_type.clone(),
            match_score: score_breed(breed, answers),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}

fn score_breed(breed: &BreedProfile, answers: &QuizAnswers) -> f64 {
    let mut score = 0.0;

    if let (Some(answer), Some(level)) = (answers.activity.as_deref(), breed.energy_level) {
        let hit = match answer {
            "calm" => level <= 2,
            "moderate" => (3..=4).contains(&level),
            "active" => level >= 4,
            _ => false,
        };
        if hit {
            score += 2.0;
        }
    }

    if let (Some(answer), Some(level)) = (answers.affection.as_deref(), breed.affection_level) {
        let hit = match answer {
            "low" => level <= 2,
            "medium" => (3..=4).contains(&level),
            "high" => level >= 4,
            _ => false,
        };
        if hit {
            score += 1.5;
        }
    }

    if let (Some(answer), Some(level)) = (
        answers.social.as_deref(),
        breed.friendliness_with_strangers,
    ) {
        let hit = match answer {
            "alone" => level <= 2,
            "socialButterfly" => level >= 4,
            _ => false,
        };
        if hit {
            score += 1.5;
        }
    }

    if let (Some(answer), Some(level)) = (answers.barking.as_deref(), breed.barking_level) {
        let hit = match answer {
            "quiet" => level <= 2,
            "moderate" => (3..=4).contains(&level),
            "vocal" => level >= 4,
            _ => false,
        };
        if hit {
            score += 1.0;
        }
    }

    if let (Some(answer), Some(level)) = (answers.trainability.as_deref(), breed.trainability) {
        let hit = match answer {
            "easy" => level >= 4,
            "moderate" => level >= 3,
            _ => false,
        };
        if hit {
            score += 1.0;
        }
    }

    if let (Some(answer), Some(level)) = (answers.shedding.as_deref(), breed.shedding_level) {
        let hit = match answer {
            "low" => level <= 2,
            "moderate" => (3..=4).contains(&level),
            "high" => level >= 4,
            _ => false,
        };
        if hit {
            score += 1.0;
        }
    }

    if let Some(size) = answers.size.as_deref() {
        if size == breed.size_type {
            score += 2.0;
        }
    }

    score
}
