use chrono::{DateTime, Local, Utc};
use keyrace::{
    leaderboard::{LeaderboardEntry, LeaderboardSummary},
    runtime::Clock,
    store::KeyValueStore,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::App;

pub const HEADER: [&str; 8] = ["#", "WPM", "Acc", "Time", "Result", "AI", "Words", "Date"];

pub fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn summary_line(summary: &LeaderboardSummary) -> String {
    format!(
        "best {} wpm   best {}% acc   avg {} wpm   {} victories",
        summary.best_wpm, summary.best_accuracy, summary.average_wpm, summary.victories
    )
}

/// One leaderboard row as display strings, in `HEADER` order.
pub fn entry_cells(rank: usize, entry: &LeaderboardEntry) -> [String; 8] {
    let result = &entry.result;
    [
        rank.to_string(),
        result.wpm.to_string(),
        format!("{}%", result.accuracy),
        format!("{}s", result.time_spent_secs),
        if result.user_won { "won" } else { "lost" }.to_string(),
        result.difficulty.to_string(),
        result.word_difficulty.to_string(),
        format_date(entry.date),
    ]
}

pub fn render_leaderboard<S: KeyValueStore, C: Clock>(
    app: &App<S, C>,
    area: Rect,
    buf: &mut Buffer,
) {
    let board = app.leaderboard();
    let entries = board.entries();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Min(3),    // table
            Constraint::Length(1), // summary
            Constraint::Length(3), // instructions
        ])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("Leaderboard");
    if entries.is_empty() {
        Paragraph::new("No results yet. Finish a race to get on the board.")
            .block(block)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
    } else {
        let header = Row::new(HEADER).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let rows = entries.iter().enumerate().map(|(idx, entry)| {
            let style = if entry.result.user_won {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(entry_cells(idx + 1, entry).map(Cell::from)).style(style)
        });
        let widths = [
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Min(16),
        ];
        Table::new(rows, widths)
            .header(header)
            .block(block)
            .render(chunks[0], buf);
    }

    if let Some(summary) = board.summary() {
        Paragraph::new(summary_line(&summary))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }

    Paragraph::new("(c)lear all / (b)ack")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}
