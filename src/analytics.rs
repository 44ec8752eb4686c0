use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::Duration;

use chrono::Local;
use directories::ProjectDirs;
use itertools::Itertools;
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::activity::{ActivityCategory, ActivityEvent, HISTORY_LIMIT};
use crate::control::StopReason;
use crate::human::HumanState;

/// Running session counters, updated once per completed activity. The
/// human-likeness score derived here feeds the selector's adaptive layer.
#[derive(Debug)]
pub struct SessionAnalytics {
    pub total_activities: u64,
    breakdown: HashMap<ActivityCategory, u64>,
    pub mistakes: u64,
    pub interruptions: u64,
    pub breaks: u64,
    avg_response_secs: f64,
    last_response_secs: f64,
    recent_events: VecDeque<ActivityEvent>,
}

impl SessionAnalytics {
    pub fn new() -> Self {
        Self {
            total_activities: 0,
            breakdown: HashMap::new(),
            mistakes: 0,
            interruptions: 0,
            breaks: 0,
            avg_response_secs: 0.0,
            last_response_secs: 0.0,
            recent_events: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn record(&mut self, event: ActivityEvent) {
        self.total_activities += 1;
        *self.breakdown.entry(event.category).or_insert(0) += 1;

        let secs = event.duration.as_secs_f64();
        let n = self.total_activities as f64;
        self.avg_response_secs = (self.avg_response_secs * (n - 1.0) + secs) / n;
        self.last_response_secs = secs;

        if self.recent_events.len() == HISTORY_LIMIT {
            self.recent_events.pop_front();
        }
        self.recent_events.push_back(event);
    }

    /// Composite of a timing-consistency score (penalizing the last
    /// activity's distance from the running average) and how close the
    /// mistake rate sits to a plausible 5%. Neutral before any data.
    pub fn human_likeness(&self) -> f64 {
        if self.total_activities == 0 {
            return 0.75;
        }
        let drift = (self.last_response_secs - self.avg_response_secs).abs();
        let timing_score = (1.0 - drift / 2.0).max(0.0);
        let optimal_mistakes = (self.total_activities as f64 * 0.05).max(1.0);
        let mistake_score = (self.mistakes as f64 / optimal_mistakes).min(1.0);
        (timing_score + mistake_score) / 2.0
    }

    /// Per-category counts, busiest first.
    pub fn breakdown(&self) -> Vec<(ActivityCategory, u64)> {
        self.breakdown
            .iter()
            .map(|(c, n)| (*c, *n))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .collect()
    }

    pub fn recent_events(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.recent_events.iter()
    }

    pub fn summary(
        &self,
        requested: Duration,
        elapsed: Duration,
        errors: u32,
        substitutions: u64,
        human: &HumanState,
        stop_reason: StopReason,
    ) -> SessionSummary {
        SessionSummary {
            requested,
            elapsed,
            total_activities: self.total_activities,
            breakdown: self.breakdown(),
            mistakes: self.mistakes,
            interruptions: self.interruptions,
            breaks: self.breaks,
            substitutions,
            errors,
            final_fatigue: human.fatigue,
            final_focus: human.focus,
            stop_reason,
        }
    }
}

impl Default for SessionAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

/// The one report a session produces, at its end.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub requested: Duration,
    pub elapsed: Duration,
    pub total_activities: u64,
    pub breakdown: Vec<(ActivityCategory, u64)>,
    pub mistakes: u64,
    pub interruptions: u64,
    pub breaks: u64,
    pub substitutions: u64,
    pub errors: u32,
    pub final_fatigue: f64,
    pub final_focus: f64,
    pub stop_reason: StopReason,
}

impl SessionSummary {
    pub fn activities_per_minute(&self) -> f64 {
        let minutes = self.elapsed.as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.total_activities as f64 / minutes
        } else {
            0.0
        }
    }

    pub fn humanized_elapsed(&self) -> String {
        HumanTime::from(self.elapsed).to_text_en(Accuracy::Rough, Tense::Present)
    }

    /// Append one CSV row to `log.csv` in the project config dir, writing
    /// the header on first use.
    pub fn append_log(&self) -> io::Result<()> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "jiggl") {
            let config_dir = proj_dirs.config_dir();
            let log_path = config_dir.join("log.csv");

            std::fs::create_dir_all(config_dir)?;

            let needs_header = !log_path.exists();

            let mut log_file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(log_path)?;

            if needs_header {
                writeln!(
                    log_file,
                    "date,requested_secs,elapsed_secs,activities,mistakes,interruptions,errors,stop_reason"
                )?;
            }

            writeln!(
                log_file,
                "{},{:.0},{:.0},{},{},{},{},{}",
                Local::now().format("%c"),
                self.requested.as_secs_f64(),
                self.elapsed.as_secs_f64(),
                self.total_activities,
                self.mistakes,
                self.interruptions,
                self.errors,
                self.stop_reason,
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "session stopped ({}) after {}",
            self.stop_reason,
            self.humanized_elapsed()
        )?;
        writeln!(
            f,
            "  elapsed       {:.0}s of {:.0}s requested",
            self.elapsed.as_secs_f64(),
            self.requested.as_secs_f64()
        )?;
        writeln!(
            f,
            "  activities    {} ({:.1}/min)",
            self.total_activities,
            self.activities_per_minute()
        )?;
        writeln!(
            f,
            "  mistakes {}  interruptions {}  breaks {}  substitutions {}  errors {}",
            self.mistakes, self.interruptions, self.breaks, self.substitutions, self.errors
        )?;
        writeln!(
            f,
            "  final state   fatigue {:.2}, focus {:.2}",
            self.final_fatigue, self.final_focus
        )?;
        let breakdown = self
            .breakdown
            .iter()
            .map(|(c, n)| format!("{c} {n}"))
            .join(", ");
        write!(f, "  breakdown     {}", breakdown)
    }
}
