use std::{sync::Arc, time::Duration};

use serde::Serialize;

use crate::{
    auth::Caller,
    models::domain::{Attempt, Quiz},
    repositories::{AttemptRepository, QuizRepository},
    services::timeout::with_timeout,
};

pub const DISPLAY_SCALE: u64 = 1000;
pub const NO_TIME_PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub attempt_id: String,
    pub student_name: String,
    pub initials: String,
    pub score: u32, // normalized to 0..=1000
    pub raw_score: u32,
    pub total: u32,
    pub time_taken: u32,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardStats {
    pub average_score: u32,
    pub fastest: String,
    pub participants: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub quiz_id: String,
    pub title: Option<String>,
    pub entries: Vec<LeaderboardEntry>,
    pub stats: LeaderboardStats,
    /// `[2nd, 1st, 3rd]`; `None` where there is no such place.
    pub podium: [Option<LeaderboardEntry>; 3],
}

/// `round(score / total * 1000)`, half-up. A zero total scores 0.
pub fn normalize_score(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (score as u64, total as u64);
    ((2 * score * DISPLAY_SCALE + total) / (2 * total)) as u32
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Orders by score descending then time ascending. The sort is stable, so
/// attempts equal on both keep the order they were fetched in.
pub fn rank_attempts(mut attempts: Vec<Attempt>) -> Vec<LeaderboardEntry> {
    attempts.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.time_taken.cmp(&b.time_taken))
    });

    attempts
        .into_iter()
        .enumerate()
        .map(|(idx, attempt)| LeaderboardEntry {
            rank: idx + 1,
            initials: initials(&attempt.student_name),
            score: normalize_score(attempt.score, attempt.total),
            time: format_time(attempt.time_taken),
            attempt_id: attempt.id,
            student_name: attempt.student_name,
            raw_score: attempt.score,
            total: attempt.total,
            time_taken: attempt.time_taken,
        })
        .collect()
}

pub fn summarize(entries: &[LeaderboardEntry]) -> LeaderboardStats {
    let n = entries.len() as u64;
    let average_score = if n == 0 {
        0
    } else {
        let sum: u64 = entries.iter().map(|e| e.score as u64).sum();
        ((2 * sum + n) / (2 * n)) as u32
    };

    LeaderboardStats {
        average_score,
        fastest: entries
            .first()
            .map(|e| e.time.clone())
            .unwrap_or_else(|| NO_TIME_PLACEHOLDER.to_string()),
        participants: entries.len(),
    }
}

/// Display slots left to right. A full podium reads `[2nd, 1st, 3rd]`; with
/// fewer than three entries the winner stays centred and a runner-up, if any,
/// takes the right-hand slot.
pub fn podium(entries: &[LeaderboardEntry]) -> [Option<LeaderboardEntry>; 3] {
    match entries {
        [] => [None, None, None],
        [first] => [None, Some(first.clone()), None],
        [first, second] => [None, Some(first.clone()), Some(second.clone())],
        [first, second, third, ..] => [
            Some(second.clone()),
            Some(first.clone()),
            Some(third.clone()),
        ],
    }
}

impl Leaderboard {
    pub fn build(quiz_id: &str, quiz: Option<&Quiz>, attempts: Vec<Attempt>) -> Self {
        // Nothing to rank without the quiz itself.
        let entries = match quiz {
            Some(_) => rank_attempts(attempts),
            None => Vec::new(),
        };

        Leaderboard {
            quiz_id: quiz_id.to_string(),
            title: quiz.map(|q| q.title.clone()),
            stats: summarize(&entries),
            podium: podium(&entries),
            entries,
        }
    }

    /// Entries whose student name contains `query`, ignoring case. Ranks,
    /// stats and podium are left as computed over the full board.
    pub fn search(mut self, query: &str) -> Self {
        let query = query.trim().to_lowercase();
        if !query.is_empty() {
            self.entries
                .retain(|e| e.student_name.to_lowercase().contains(&query));
        }
        self
    }
}

pub struct LeaderboardService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    remote_timeout: Duration,
}

impl LeaderboardService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            remote_timeout,
        }
    }

    /// Never fails: an unknown quiz or a failed fetch gives an empty board.
    pub async fn project(&self, quiz_id: &str) -> Leaderboard {
        let caller = Caller::anonymous();
        let (quiz, attempts) = futures::join!(
            with_timeout(
                self.remote_timeout,
                "quiz lookup",
                self.quizzes.find_by_id(quiz_id, &caller)
            ),
            with_timeout(self.remote_timeout, "attempts lookup", self.attempts.list_by_quiz(quiz_id)),
        );

        let quiz = quiz.unwrap_or_else(|e| {
            log::error!("Error fetching quiz {}: {}", quiz_id, e);
            None
        });
        let attempts = attempts.unwrap_or_else(|e| {
            log::error!("Error fetching leaderboard for {}: {}", quiz_id, e);
            Vec::new()
        });

        if quiz.is_none() {
            log::info!("No quiz {}; leaderboard is empty", quiz_id);
        }

        Leaderboard::build(quiz_id, quiz.as_ref(), attempts)
    }
}
