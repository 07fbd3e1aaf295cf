pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use typesprint::{session::Snapshot, Mode, Outcome, Status};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();

        match snapshot.status {
            Status::Idle | Status::Running => render_typing(self, &snapshot, area, buf),
            Status::Finished => render_results(self, &snapshot, area, buf),
        }
    }
}

fn progress_text(snapshot: &Snapshot) -> String {
    match snapshot.mode {
        Mode::Time { .. } => format!("Time: {}s", snapshot.remaining_seconds.unwrap_or(0)),
        Mode::Words { .. } => format!(
            "Progress: {} / {}",
            snapshot.cursor_index, snapshot.text_length
        ),
    }
}

fn render_typing(app: &App, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = bold_style.fg(Color::Green);
    let red_bold_style = bold_style.fg(Color::Red);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let caret_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let text = app.session.reference_text();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let text_lines = if text.width() <= max_chars_per_line as usize {
        1
    } else {
        (text.width() as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };
    let padding = area.height.saturating_sub(text_lines + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(1), // header
            Constraint::Length(1),
            Constraint::Length(text_lines),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    // the clock only stands out once it is actually counting down
    let progress_style = if app.session.tickers().countdown_armed() {
        bold_style.fg(Color::Yellow)
    } else {
        dim_bold_style
    };
    let header = Line::from(vec![
        Span::styled(progress_text(snapshot), progress_style),
        Span::styled(
            format!(
                "   WPM: {}   Acc: {}%",
                snapshot.words_per_minute, snapshot.accuracy_percent
            ),
            dim_bold_style,
        ),
    ]);
    Paragraph::new(header)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let spans = app
        .session
        .reference()
        .iter()
        .enumerate()
        .map(|(idx, &expected)| {
            let outcome = app.session.classify(idx);
            let shown = match (outcome, expected) {
                // a missed space would be invisible otherwise
                (Outcome::Incorrect, ' ') => "·".to_owned(),
                _ => expected.to_string(),
            };
            let style = match outcome {
                Outcome::Correct => green_bold_style,
                Outcome::Incorrect => red_bold_style,
                Outcome::Untyped if idx == snapshot.cursor_index => caret_style,
                Outcome::Untyped => dim_bold_style,
            };
            Span::styled(shown, style)
        })
        .collect::<Vec<Span>>();

    Paragraph::new(Line::from(spans))
        .alignment(if text_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
        .render(chunks[3], buf);

    let legend = match (&app.last_error, snapshot.status) {
        (Some(err), _) => Span::styled(err.clone(), Style::default().fg(Color::Red)),
        (None, Status::Idle) => Span::styled("start typing to begin / (esc)ape", italic_style),
        (None, _) => Span::styled("(ctrl+r)estart / (ctrl+n)ew / (esc)ape", italic_style),
    };
    Paragraph::new(legend)
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}

fn render_results(app: &App, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = match snapshot.mode {
        Mode::Time { .. } => "Time's Up!",
        Mode::Words { .. } => "Story Completed!",
    };
    Paragraph::new(Span::styled(title, bold_style.fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(app.history.points(), snapshot.mode.limit_seconds());
    let tuples = app.history.as_tuples();
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .block(Block::default().borders(Borders::NONE))
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm.max(1.0)])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        )
        .render(chunks[1], buf);

    let stats = Line::from(vec![
        Span::styled(format!("{} wpm", snapshot.words_per_minute), bold_style),
        Span::raw("   "),
        Span::styled(format!("{}% acc", snapshot.accuracy_percent), bold_style),
        Span::raw("   "),
        Span::styled(
            format!("{} errors", snapshot.error_count),
            bold_style.fg(Color::Red),
        ),
        Span::raw("   "),
        Span::styled(format!("{}s", snapshot.elapsed_seconds), bold_style),
    ]);
    Paragraph::new(stats)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let legend = match &app.last_error {
        Some(err) => Span::styled(err.clone(), Style::default().fg(Color::Red)),
        None => Span::styled("(r)play again / (n)ew story / (esc)ape", italic_style),
    };
    Paragraph::new(legend).render(chunks[4], buf);
}
