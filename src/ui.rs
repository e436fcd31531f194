pub mod leaderboard;
pub mod screen;

use keyrace::{
    passage::MAX_CUSTOM_CHARS,
    runtime::Clock,
    session::{CharState, Phase},
    store::KeyValueStore,
    Difficulty, WordDifficulty,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold_style() -> Style {
    bold_style().add_modifier(Modifier::DIM)
}

fn italic_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn selected_style() -> Style {
    bold_style().fg(Color::Cyan).add_modifier(Modifier::REVERSED)
}

fn progress_ratio(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

pub fn render_race<S: KeyValueStore, C: Clock>(app: &App<S, C>, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let snapshot = session.snapshot();
    let passage = session.passage();

    let green_bold_style = bold_style().fg(Color::Green);
    let red_bold_style = bold_style().fg(Color::Red);
    let underlined_dim_bold_style = dim_bold_style().add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((passage.as_str().width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if passage.as_str().width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // time / wpm / accuracy
            Constraint::Length(3), // user gauge
            Constraint::Length(3), // AI gauge
            Constraint::Length(1),
            Constraint::Min(prompt_occupied_lines),
            Constraint::Length(1), // status
        ])
        .split(area);

    let header = Paragraph::new(Span::styled(
        format!(
            "{}s left   {} wpm   {}% acc",
            snapshot.seconds_remaining, snapshot.wpm, snapshot.accuracy
        ),
        bold_style(),
    ))
    .alignment(Alignment::Center);
    header.render(chunks[0], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("You"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress_ratio(snapshot.user_progress))
        .label(format!("{:.0}%", snapshot.user_progress))
        .render(chunks[1], buf);

    let difficulty = session.config().difficulty;
    Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("AI ({difficulty}, {} wpm)", difficulty.target_wpm())),
        )
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(progress_ratio(snapshot.opponent_progress))
        .label(format!("{:.0}%", snapshot.opponent_progress))
        .render(chunks[2], buf);

    let typed: Vec<char> = session.typed().chars().collect();
    let spans = session
        .char_states()
        .into_iter()
        .zip(passage.chars())
        .enumerate()
        .map(|(idx, (state, expected))| match state {
            CharState::Correct => Span::styled(expected.to_string(), green_bold_style),
            CharState::Incorrect => Span::styled(
                match typed.get(idx) {
                    Some(' ') => "·".to_owned(),
                    Some(c) => c.to_string(),
                    None => expected.to_string(),
                },
                red_bold_style,
            ),
            CharState::Cursor => Span::styled(expected.to_string(), underlined_dim_bold_style),
            CharState::Pending => Span::styled(expected.to_string(), dim_bold_style()),
        })
        .collect::<Vec<Span>>();

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);

    let status = match snapshot.phase {
        Phase::NotStarted => Span::styled(
            "press enter to start",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
        Phase::Running => Span::styled("(esc) back to menu", italic_style()),
        Phase::Finished => Span::styled("finished!", bold_style().fg(Color::Green)),
        Phase::Abandoned => Span::raw(""),
    };
    Paragraph::new(status)
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}

pub fn render_results<S: KeyValueStore, C: Clock>(
    app: &App<S, C>,
    area: Rect,
    buf: &mut Buffer,
) {
    let Some(result) = app.last_result.as_ref() else {
        return;
    };

    let outcome = if result.user_won {
        Span::styled("You beat the AI!", bold_style().fg(Color::Green))
    } else {
        Span::styled("The AI wins this one", bold_style().fg(Color::Red))
    };

    let mut lines = vec![
        Line::from(outcome),
        Line::default(),
        Line::from(Span::styled(
            format!(
                "{} wpm   {}% acc   {}s",
                result.wpm, result.accuracy, result.time_spent_secs
            ),
            bold_style(),
        )),
        Line::from(Span::styled(
            format!(
                "AI: {} ({} wpm)   words: {}",
                result.difficulty,
                result.difficulty.target_wpm(),
                result.word_difficulty
            ),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(rank) = app.last_rank {
        lines.push(Line::from(Span::styled(
            format!("#{rank} on the leaderboard"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(r)ace again / (l)eaderboard / (esc)ape",
        italic_style(),
    )));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Min(1),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn choice<'a>(key: &str, label: String, selected: bool) -> Vec<Span<'a>> {
    let style = if selected {
        selected_style()
    } else {
        Style::default()
    };
    vec![
        Span::styled(format!("({key}) "), dim_bold_style()),
        Span::styled(label, style),
        Span::raw("  "),
    ]
}

pub fn render_menu<S: KeyValueStore, C: Clock>(app: &App<S, C>, area: Rect, buf: &mut Buffer) {
    let mut opponent = vec![Span::styled("AI opponent  ", bold_style())];
    for (idx, difficulty) in Difficulty::ALL.iter().enumerate() {
        opponent.extend(choice(
            &(idx + 1).to_string(),
            format!("{difficulty} {} wpm", difficulty.target_wpm()),
            *difficulty == app.config.difficulty,
        ));
    }

    let mut words = vec![Span::styled("words        ", bold_style())];
    for tier in WordDifficulty::ALL {
        let key = tier.to_string().chars().next().unwrap_or(' ').to_string();
        words.extend(choice(&key, tier.to_string(), tier == app.config.word_difficulty));
    }

    let sound = vec![
        Span::styled("sound        ", bold_style()),
        Span::styled("(s) ", dim_bold_style()),
        Span::raw(if app.sound_enabled { "on" } else { "off" }),
    ];

    let mut lines = vec![
        Line::from(Span::styled(
            "keyrace",
            bold_style().fg(Color::Cyan),
        )),
        Line::default(),
        Line::from(opponent),
        Line::from(words),
        Line::from(sound),
    ];
    if let Some(text) = app.custom_text.as_deref() {
        lines.push(Line::from(Span::styled(
            format!(
                "custom text   {}/{MAX_CUSTOM_CHARS} chars",
                text.trim().chars().count()
            ),
            italic_style(),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(enter) race / (l)eaderboard / (esc)ape",
        italic_style(),
    )));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Min(1),
        ])
        .split(area);

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(chunks[1], buf);
}
