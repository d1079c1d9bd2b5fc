//! Terminal rendering of chat messages and history.

use colored::Colorize;
use skinpredict_application::HistoryOverview;
use skinpredict_core::analysis::SkinAnalysisResult;
use skinpredict_core::chat::{ChatMessage, MessageRole};

const BAR_WIDTH: usize = 20;

pub fn message(message: &ChatMessage, analysis: Option<&SkinAnalysisResult>) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            if let Some(analysis) = analysis.filter(|_| message.show_visualization) {
                println!();
                for line in chart(analysis) {
                    println!("{}", line.cyan());
                }
            }
        }
    }
    println!();
}

/// Numbered chips; typing the number sends the chip text.
pub fn suggestions(chips: &[String]) {
    if chips.is_empty() {
        return;
    }
    for (index, chip) in chips.iter().enumerate() {
        println!("  {} {}", format!("[{}]", index + 1).bright_yellow(), chip);
    }
    println!();
}

/// Confidence bars for the skin type and each detected issue.
pub fn chart(analysis: &SkinAnalysisResult) -> Vec<String> {
    let mut rows = vec![(
        format!("Skin type: {}", analysis.skin_type.kind),
        analysis.skin_type.confidence,
    )];
    rows.extend(
        analysis
            .skin_issues
            .iter()
            .map(|issue| (issue.name.clone(), issue.confidence)),
    );

    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    rows.into_iter()
        .map(|(label, confidence)| {
            let filled = ((confidence.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
            format!(
                "{label:<label_width$}  {}{} {confidence:>6.2}%",
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled)
            )
        })
        .collect()
}

pub fn history(overview: &HistoryOverview) {
    if overview.rows.is_empty() {
        println!("{}", "No scans yet. Use /scan <photo> to start one.".bright_black());
        return;
    }
    for row in &overview.rows {
        println!(
            "{}  {}  {} · {} issue(s)",
            row.session_id.bright_magenta(),
            row.created_at.bright_black(),
            row.skin_type,
            row.issue_count
        );
        if let Some(preview) = &row.last_message {
            println!("    {}", preview.bright_black());
        }
    }
    println!("{}", "Open one with /open <scan id>.".bright_black());
}

pub fn stats(overview: &HistoryOverview) {
    println!("{}", "=== Your skin journey ===".bright_magenta().bold());
    println!("Total scans:        {}", overview.total);
    println!(
        "Most common type:   {}",
        overview.most_common_skin_type.as_deref().unwrap_or("-")
    );
    println!("Issues detected:    {}", overview.total_issues);
    println!("Issues per scan:    {:.1}", overview.average_issue_count);
    println!("Latest scan:        {}", overview.latest.as_deref().unwrap_or("-"));
}

pub fn help() {
    let lines = [
        ("/login <email> [name]", "sign in"),
        ("/logout", "sign out"),
        ("/whoami", "show the signed-in user"),
        ("/scan <photo>", "analyze a .png/.jpg photo of your face"),
        ("/new", "start over with a fresh chat"),
        ("/history", "list your past scans"),
        ("/open <scan id>", "reopen a past scan"),
        ("/stats", "summary of your scans"),
        ("<number>", "pick a suggestion"),
        ("/quit", "exit"),
    ];
    for (command, about) in lines {
        println!("  {:<24}{}", command.bright_cyan(), about.bright_black());
    }
}

pub fn info(text: &str) {
    println!("{}", text.bright_black());
}

pub fn error(text: &str) {
    eprintln!("{}", text.red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinpredict_core::analysis::{SkinIssue, SkinTypeAssessment};

    #[test]
    fn test_chart_bars() {
        let analysis = SkinAnalysisResult {
            skin_type: SkinTypeAssessment {
                kind: "Dry".into(),
                confidence: 100.0,
            },
            skin_issues: vec![SkinIssue {
                name: "Redness".into(),
                confidence: 50.0,
            }],
            ai_response: None,
            demographics: None,
            personalized_advice: None,
        };
        let lines = chart(&analysis);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Skin type: Dry"));
        assert_eq!(lines[0].matches('█').count(), 20);
        assert_eq!(lines[1].matches('█').count(), 10);
        assert!(lines[1].ends_with(" 50.00%"));
    }
}
