use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{RoundProgression, RoundResult, StandingEntry, Standings};
use crate::snapshot::Gender;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a completion rate as a whole percentage.
/// Appends an asterisk while judging is still incomplete.
pub fn format_completion(rate: f64) -> String {
    let percent = (rate * 100.0).round() as i64;
    if rate < 1.0 {
        format!("{}%*", percent)
    } else {
        format!("{}%", percent)
    }
}

/// Format a weighted score with two decimals.
pub fn format_points(score: f64) -> String {
    format!("{:.2}", score)
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Male",
        Gender::Female => "Female",
        Gender::Other => "Other",
    }
}

/// One standings row: rank, highlight marker, number, name, score,
/// completion. Rank column fits "99.", score column fits "9999.99".
fn format_entry_line(entry: &StandingEntry, rank: usize, use_colors: bool) -> String {
    let rank_str = format!("{:>2}.", rank);
    let marker = if entry.is_highlighted { "*" } else { " " };
    let number = entry
        .contestant
        .number
        .map(|n| format!("#{}", n))
        .unwrap_or_else(|| "--".to_string());
    let number_padded = format!("{:<4}", number);
    let score_padded = format!("{:>8}", format_points(entry.total_weighted_score));
    let completion = format!("{:>5}", format_completion(entry.completion_rate));

    // Fixed columns leave the rest of the line for the name.
    let fixed_width = 3 + 1 + 1 + 1 + 4 + 2 + 8 + 2 + 5;
    let name = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => {
            truncate_name(&entry.contestant.name, width - fixed_width)
        }
        Some(_) => truncate_name(&entry.contestant.name, 20),
        None => entry.contestant.name.clone(),
    };
    let name_padded = format!("{:<24}", name);

    if use_colors {
        format!(
            "{} {} {} {}  {}  {}",
            rank_str.dimmed(),
            marker.yellow(),
            number_padded.cyan(),
            name_padded,
            score_padded.bold(),
            completion.dimmed()
        )
    } else {
        format!(
            "{} {} {} {}  {}  {}",
            rank_str, marker, number_padded, name_padded, score_padded, completion
        )
    }
}

fn format_section_heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn format_bucket(label: &str, entries: &[StandingEntry], use_colors: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if entries.is_empty() {
        return lines;
    }
    lines.push(format_section_heading(label, use_colors));
    for entry in entries {
        let rank = entry.gender_rank.unwrap_or(entry.overall_rank);
        lines.push(format_entry_line(entry, rank, use_colors));
    }
    lines
}

/// Format one round's standings: judge count, then the capped per-gender
/// lists that are displayed for the round.
pub fn format_round(result: &RoundResult, use_colors: bool) -> String {
    let title = if result.round.name.is_empty() {
        format!("Round {}", result.round.id)
    } else {
        result.round.name.clone()
    };
    let mut lines = vec![format_section_heading(
        &format!("{} ({} judges)", title, result.judge_count),
        use_colors,
    )];

    if result.rankings.is_empty() {
        lines.push("  No scores yet.".to_string());
        return lines.join("\n");
    }

    for gender in [Gender::Male, Gender::Female, Gender::Other] {
        lines.extend(format_bucket(
            gender_label(gender),
            result.by_gender.get(gender),
            use_colors,
        ));
    }
    lines.join("\n")
}

/// Format the complete standings: a summary line, the overall ranking, then
/// every round in order.
pub fn format_standings(standings: &Standings, use_colors: bool) -> String {
    if standings.overall.rankings.is_empty() && standings.rounds.is_empty() {
        return "No scores yet. Waiting for judges to submit.".to_string();
    }

    let mut sections = Vec::new();

    let summary = format!(
        "{} contestants ranked, average completion {}",
        standings.overall.rankings.len(),
        format_completion(standings.average_completion())
    );
    sections.push(summary);

    let mut overall_lines = vec![format_section_heading("Overall", use_colors)];
    if standings.overall.rankings.is_empty() {
        overall_lines.push("  No scores yet.".to_string());
    } else {
        for entry in &standings.overall.rankings {
            overall_lines.push(format_entry_line(entry, entry.overall_rank, use_colors));
        }
    }
    sections.push(overall_lines.join("\n"));

    for result in &standings.rounds {
        sections.push(format_round(result, use_colors));
    }

    sections.join("\n\n")
}

/// Format a single entry with its category breakdown (for verbose mode)
pub fn format_entry_detail(entry: &StandingEntry, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let heading = format!(
        "{}  {}  {}",
        entry.contestant.name,
        format_points(entry.total_weighted_score),
        format_completion(entry.completion_rate)
    );
    if use_colors {
        lines.push(heading.bold().to_string());
    } else {
        lines.push(heading);
    }
    for category in &entry.category_breakdown {
        lines.push(format!(
            "  {} ({}%): {} weighted, {} of {} submissions",
            category.name,
            category.percentage,
            format_points(category.weighted),
            category.submissions,
            category.expected
        ));
    }
    lines.join("\n")
}

/// Format the per-round progression summary.
pub fn format_progression(progression: &[RoundProgression], use_colors: bool) -> String {
    if progression.is_empty() {
        return "No rounds configured.".to_string();
    }

    progression
        .iter()
        .map(|entry| {
            let title = if entry.round_name.is_empty() {
                format!("Round {}", entry.round_id)
            } else {
                entry.round_name.clone()
            };
            let counts = format!("{} male, {} female", entry.male_count, entry.female_count);
            if use_colors {
                format!("{}  {}", format!("{:<24}", title).bold(), counts)
            } else {
                format!("{:<24}  {}", title, counts)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
