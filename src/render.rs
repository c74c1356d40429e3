// File: src/render.rs
//! Plain-terminal rendering of reports for the binaries.

use crate::emotion::EmotionScore;
use crate::report::{Report, ReportRows};
use crate::sentiment::WordWeight;
use crossterm::style::{style, Color, Stylize};
use std::io::{self, Write};

const BAR_WIDTH: usize = 40;
const BAR_GLYPH: char = '█';

fn bar(count: u64, max: u64) -> String {
    let len = if max == 0 {
        0
    } else {
        ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    std::iter::repeat(BAR_GLYPH).take(len.max(usize::from(count > 0))).collect()
}

pub fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", style(title).with(Color::Cyan).bold())?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

/// Horizontal bar chart, one labelled bar per entry.
pub fn bar_chart(out: &mut impl Write, title: &str, entries: &[(String, u64)]) -> io::Result<()> {
    heading(out, title)?;
    if entries.is_empty() {
        return writeln!(out, "(no data)");
    }
    let label_width = entries.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let max = entries.iter().map(|&(_, count)| count).max().unwrap_or(0);
    for (label, count) in entries {
        writeln!(
            out,
            "{:<width$} {} {}",
            label,
            style(bar(*count, max)).with(Color::Blue),
            count,
            width = label_width
        )?;
    }
    Ok(())
}

/// Counts as a two-column table.
pub fn table(out: &mut impl Write, title: &str, entries: &[(String, u64)]) -> io::Result<()> {
    heading(out, title)?;
    if entries.is_empty() {
        return writeln!(out, "(no data)");
    }
    let label_width = entries.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    for (label, count) in entries {
        writeln!(out, "{:<width$}  {:>6}", label, count, width = label_width)?;
    }
    Ok(())
}

fn report_entries(report: &Report) -> Vec<(String, u64)> {
    match &report.rows {
        ReportRows::Characters(rows) => {
            rows.iter().map(|row| (row.name.clone(), row.count)).collect()
        }
        ReportRows::Pairs(rows) => rows
            .iter()
            .map(|row| (format!("{} & {}", row.a, row.b), row.count))
            .collect(),
    }
}

pub fn report_chart(out: &mut impl Write, report: &Report) -> io::Result<()> {
    bar_chart(out, &report.kind.to_string(), &report_entries(report))
}

pub fn report_table(out: &mut impl Write, report: &Report) -> io::Result<()> {
    table(out, &report.kind.to_string(), &report_entries(report))
}

pub fn word_cloud(
    out: &mut impl Write,
    title: &str,
    words: &[WordWeight],
    color: Color,
    limit: usize,
) -> io::Result<()> {
    heading(out, title)?;
    if words.is_empty() {
        return writeln!(out, "(no words)");
    }
    for word in words.iter().take(limit) {
        let padded = format!("{:<24}", word.word);
        let styled = if word.weight >= 0.5 {
            style(padded).with(color).bold()
        } else {
            style(padded).with(color)
        };
        writeln!(out, "{} {:>5}  {:.2}", styled, word.count, word.weight)?;
    }
    Ok(())
}

pub fn emotions(out: &mut impl Write, title: &str, scores: &[EmotionScore]) -> io::Result<()> {
    heading(out, title)?;
    if scores.is_empty() {
        return writeln!(out, "(no dialogue to classify)");
    }
    for score in scores {
        writeln!(out, "{:<12} {:.4}", score.label, score.score)?;
    }
    Ok(())
}

pub fn error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", style(message).with(Color::Red))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_maximum() {
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5, 10).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 1000).chars().count(), 1);
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(0, 0), "");
    }

    #[test]
    fn chart_lists_every_entry() {
        let mut out = Vec::new();
        let entries = vec![("Wade".to_string(), 4), ("Vanessa".to_string(), 2)];
        bar_chart(&mut out, "Scenes", &entries).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Wade"));
        assert!(text.contains("Vanessa"));
        assert!(text.contains(" 4\n"));
    }

    #[test]
    fn empty_table_says_so() {
        let mut out = Vec::new();
        table(&mut out, "Scenes", &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("(no data)"));
    }

    #[test]
    fn word_columns_line_up_despite_styling() {
        let words = vec![
            WordWeight { word: "loves".to_string(), count: 4, weight: 1.0 },
            WordWeight { word: "happy".to_string(), count: 1, weight: 0.25 },
        ];
        let mut out = Vec::new();
        word_cloud(&mut out, "Positive Words", &words, Color::Green, 10).unwrap();
        let text = String::from_utf8(out).unwrap();
        let loves = text.lines().find(|l| l.contains("loves")).unwrap();
        let happy = text.lines().find(|l| l.contains("happy")).unwrap();
        assert!(loves.contains(&format!("{:<24}", "loves")));
        assert!(happy.contains(&format!("{:<24}", "happy")));
    }
}
