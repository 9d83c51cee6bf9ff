use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::conversation::{Message, Role, QUICK_ACTIONS};
use crate::format::CLEAR_ALL_PROMPT;
use crate::store::TaskStore;
use crate::task::count_label;

use super::app::AppState;

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER: Color = Color::Rgb(92, 126, 166);

pub fn render<S: TaskStore>(frame: &mut Frame, app: &AppState<S>) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    render_log(frame, app, chunks[0]);
    render_quick_actions(frame, chunks[1]);
    render_input(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if app.clear_confirm.is_some() {
        render_clear_confirm_modal(frame, area);
    }
}

fn render_log<S: TaskStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in app.conversation.messages() {
        push_message(&mut lines, message);
    }
    if app.is_thinking() {
        lines.push(role_line(Role::Assistant, None));
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default()
                .fg(COLOR_MUTED)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title("Task Assistant");
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let total = wrapped_height(&lines, inner_width);
    let offset = total
        .saturating_sub(inner_height)
        .saturating_sub(app.scroll);

    let widget = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(widget, area);
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &Message) {
    let stamp = message
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    lines.push(role_line(message.role, Some(stamp)));
    for text in message.content.lines() {
        lines.push(Line::from(markdown_spans(text)));
    }
    lines.push(Line::from(""));
}

fn role_line(role: Role, stamp: Option<String>) -> Line<'static> {
    let (label, color) = match role {
        Role::User => ("You", COLOR_SUCCESS),
        Role::Assistant => ("Assistant", COLOR_ACCENT),
    };
    let mut spans = vec![Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(stamp) = stamp {
        spans.push(Span::styled(
            format!("  {stamp}"),
            Style::default().fg(COLOR_MUTED_DARK),
        ));
    }
    Line::from(spans)
}

/// Split `**bold**` and `` `code` `` runs into styled spans.
fn markdown_spans(text: &str) -> Vec<Span<'static>> {
    let plain = Style::default().fg(COLOR_TEXT);
    let bold = plain.add_modifier(Modifier::BOLD);
    let code = Style::default().fg(COLOR_ACCENT);

    let mut spans = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let next_bold = rest.find("**");
        let next_code = rest.find('`');
        let (start, marker, style) = match (next_bold, next_code) {
            (Some(b), Some(c)) if c < b => (c, "`", code),
            (Some(b), _) => (b, "**", bold),
            (None, Some(c)) => (c, "`", code),
            (None, None) => break,
        };
        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else {
            break;
        };
        if start > 0 {
            spans.push(Span::styled(rest[..start].to_string(), plain));
        }
        spans.push(Span::styled(after[..end].to_string(), style));
        rest = &after[end + marker.len()..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), plain));
    }
    spans
}

/// Rows needed to show `lines` word-wrapped at `width` columns, the same
/// way the log paragraph renders them.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let rows = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width.max(1));
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_quick_actions(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (idx, action) in QUICK_ACTIONS.iter().enumerate() {
        spans.push(Span::styled(
            format!(" F{} ", idx + 1),
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}  ", action.label),
            Style::default().fg(COLOR_MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input<S: TaskStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let (title, text) = if app.is_thinking() {
        ("Waiting for reply", String::new())
    } else {
        ("Message", app.input.clone())
    };
    let widget = Paragraph::new(text)
        .style(Style::default().fg(COLOR_TEXT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_BORDER))
                .title(title),
        );
    frame.render_widget(widget, area);

    if !app.is_thinking() && app.clear_confirm.is_none() {
        let max_x = area.x + area.width.saturating_sub(2);
        let typed = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
        let x = (area.x + 1).saturating_add(typed).min(max_x);
        frame.set_cursor(x, area.y + 1);
    }
}

fn render_footer<S: TaskStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", count_label(app.task_count())),
            Style::default().fg(COLOR_SUCCESS).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " enter send  ctrl-l clear chat  ↑/↓ scroll  esc quit",
            Style::default().fg(COLOR_MUTED_DARK),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_clear_confirm_modal(frame: &mut Frame, area: Rect) {
    let content_width = area.width.saturating_sub(8).min(56);
    let modal = centered_rect(content_width, 7, area);
    frame.render_widget(Clear, modal);

    let lines = vec![
        Line::from(Span::styled(
            CLEAR_ALL_PROMPT,
            Style::default().fg(COLOR_ERROR).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(COLOR_TEXT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  n/esc cancel",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Clear All Tasks"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
