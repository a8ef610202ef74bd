use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::domain::SessionState;

use super::app::TuiApp;
use super::markdown::render_markdown;
use super::theme::Theme;

/// Spinner animation frames (Braille pattern).
const SPINNER: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];
const MAX_VISIBLE_SUGGESTIONS: usize = 5;

pub fn render(frame: &mut Frame<'_>, app: &TuiApp, state: &SessionState) {
    let theme = Theme::for_mode(state.flags.dark_mode);
    let area = frame.area();

    frame.render_widget(Block::default().style(theme.base()), area);

    let mut constraints = vec![Constraint::Length(1), Constraint::Length(3)];
    if state.error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if state.flags.show_suggestions {
        let rows = state.suggestions.len().clamp(1, MAX_VISIBLE_SUGGESTIONS) as u16;
        constraints.push(Constraint::Length(rows + 2));
    }
    constraints.push(Constraint::Min(5));
    if state.flags.show_history {
        constraints.push(Constraint::Percentage(35));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::vertical(constraints).split(area);
    let mut next = chunks.iter().copied();
    let mut take = || next.next().unwrap_or_default();

    render_title(frame, take(), &theme);
    render_input(frame, take(), app, state, &theme);
    if let Some(error) = &state.error {
        frame.render_widget(
            Paragraph::new(Line::styled(error.clone(), theme.error())),
            take(),
        );
    }
    if state.flags.show_suggestions {
        render_suggestions(frame, take(), app, state, &theme);
    }
    render_answer(frame, take(), app, state, &theme);
    if state.flags.show_history {
        render_history(frame, take(), state, &theme);
    }
    render_footer(frame, take(), app, &theme);
}

fn render_title(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let title = Paragraph::new(Line::styled(
        "✦ Stardust AI ✦",
        theme.title().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &TuiApp,
    state: &SessionState,
    theme: &Theme,
) {
    let title = if state.flags.loading {
        " Ask · Loading... "
    } else {
        " Ask "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .title(title);
    let inner = block.inner(area);

    let width = inner.width.max(1) as usize;
    let cursor = app.cursor().min(state.question.chars().count());
    let offset = cursor.saturating_sub(width - 1);

    let line = if state.question.is_empty() {
        Line::styled("Ask me anything", theme.muted())
    } else {
        let visible: String = state.question.chars().skip(offset).take(width).collect();
        Line::raw(visible)
    };

    frame.render_widget(Paragraph::new(line).style(theme.input()).block(block), area);
    frame.set_cursor_position(Position::new(
        inner.x + (cursor - offset) as u16,
        inner.y,
    ));
}

fn render_suggestions(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &TuiApp,
    state: &SessionState,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted())
        .title(" Suggestions ");

    let lines: Vec<Line<'static>> = if state.suggestions.is_empty() {
        vec![Line::styled("No suggestions available.", theme.muted())]
    } else {
        let selected = app.selected_suggestion();
        let first = selected
            .map(|s| s.saturating_sub(MAX_VISIBLE_SUGGESTIONS - 1))
            .unwrap_or(0);
        state
            .suggestions
            .iter()
            .enumerate()
            .skip(first)
            .take(MAX_VISIBLE_SUGGESTIONS)
            .map(|(i, s)| {
                if Some(i) == selected {
                    Line::styled(format!("› {s}"), theme.selected())
                } else {
                    Line::raw(format!("  {s}"))
                }
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_answer(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &TuiApp,
    state: &SessionState,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .title(" Answer ");

    let text = if state.flags.typing {
        let frame_char = SPINNER[app.spinner_tick() as usize % SPINNER.len()];
        Text::from(Line::from(vec![
            Span::styled(format!("{frame_char} "), theme.border()),
            Span::styled("Thinking...", theme.muted()),
        ]))
    } else if state.answer.is_empty() {
        Text::from(Line::styled(
            "Your answer will appear here...",
            theme.muted(),
        ))
    } else {
        Text::from(render_markdown(&state.answer, theme))
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll(), 0));
    frame.render_widget(paragraph, area);
}

fn render_history(frame: &mut Frame<'_>, area: Rect, state: &SessionState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.muted())
        .title(Span::styled(" Message History ", theme.title()));

    let mut lines: Vec<Line<'static>> = Vec::new();
    if state.history.is_empty() {
        lines.push(Line::styled("No previous messages.", theme.muted()));
    }
    for record in state.history.iter() {
        lines.push(Line::styled(
            format!("Q: {}", record.question()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for (i, answer_line) in record.answer().lines().enumerate() {
            let prefix = if i == 0 { "A: " } else { "   " };
            lines.push(Line::styled(format!("{prefix}{answer_line}"), theme.muted()));
        }
        lines.push(Line::default());
    }

    let visible = area.height.saturating_sub(1) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &TuiApp, theme: &Theme) {
    let line = match app.status() {
        Some(status) => Line::styled(status.to_string(), theme.title()),
        None => Line::from(vec![
            Span::styled(
                "Enter send · Ctrl+X clear · Ctrl+Y copy · Ctrl+R history · Ctrl+T theme · Esc quit",
                theme.muted(),
            ),
            Span::styled(format!("  [{}]", app.model_name()), theme.border()),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}
