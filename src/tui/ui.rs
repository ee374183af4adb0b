use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::banner::{TAGLINE, TITLE, credits};
use crate::clipboard::Clipboard;
use crate::consts::format_number;
use crate::session::Status;
use crate::spinner;

use super::app::App;

const ACCENT: Color = Color::Rgb(167, 139, 250);
const ACCENT_DIM: Color = Color::Rgb(109, 40, 217);
const TEXT: Color = Color::Rgb(229, 231, 235);
const TEXT_DIM: Color = Color::Rgb(156, 163, 175);
const BORDER: Color = Color::Rgb(75, 85, 99);
const DANGER: Color = Color::Rgb(248, 113, 113);
const SUCCESS: Color = Color::Rgb(74, 222, 128);

const INPUT_PLACEHOLDER: &str = "Paste your AI-generated content here... (e.g., YouTube script)";
const OUTPUT_PLACEHOLDER: &str = "Your rewritten content will appear here.";

struct Areas {
    header: Rect,
    input: Rect,
    output: Rect,
    action: Rect,
    footer: Rect,
}

fn split(area: Rect) -> Areas {
    let [header, body, action, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let [input, output] =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(body);

    Areas {
        header,
        input,
        output,
        action,
        footer,
    }
}

/// Text area inside the output panel's border for a frame of size `area`.
pub fn output_view(area: Rect) -> Rect {
    panel("").inner(split(area).output)
}

pub fn draw<C: Clipboard>(f: &mut Frame, app: &App<C>) {
    let Areas {
        header,
        input,
        output,
        action,
        footer,
    } = split(f.area());

    draw_header(f, header);
    draw_input_panel(f, app, input);
    draw_output_panel(f, app, output);
    draw_action_bar(f, app, action);
    draw_footer(f, app, footer);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(TAGLINE, Style::default().fg(TEXT_DIM))),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ))
}

fn draw_input_panel<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let session = &app.session;

    let count_style = if session.is_over_limit() {
        Style::default().fg(DANGER)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let counter = Line::from(vec![
        Span::styled(format_number(session.char_count() as u64), count_style),
        Span::styled(
            format!(" / {} ", format_number(session.max_len() as u64)),
            Style::default().fg(TEXT_DIM),
        ),
    ])
    .right_aligned();

    let block = panel("Original Content").title_bottom(counter);
    let inner = block.inner(area);

    let paragraph = if session.input().is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC),
        ))
    } else {
        let style = if session.can_edit() {
            Style::default().fg(TEXT)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        // Keep the end of the text (where typing happens) in view.
        let lines = wrapped_line_count(session.input(), inner.width);
        let scroll = lines.saturating_sub(inner.height as usize) as u16;
        Paragraph::new(session.input()).style(style).scroll((scroll, 0))
    };

    f.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

fn draw_output_panel<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let session = &app.session;

    let mut block = panel("Rewritten Content");
    if session.can_copy() {
        let copy_hint = if session.copied() {
            Span::styled(" ✓ Copied! ", Style::default().fg(SUCCESS))
        } else {
            Span::styled(" Copy (Ctrl+Y) ", Style::default().fg(ACCENT))
        };
        block = block.title(Line::from(copy_hint).right_aligned());
    }

    let paragraph = match session.status() {
        Status::Idle => Paragraph::new(Span::styled(
            OUTPUT_PLACEHOLDER,
            Style::default().fg(TEXT_DIM),
        ))
        .alignment(Alignment::Center),
        Status::Loading => Paragraph::new(Line::from(vec![
            Span::styled(spinner::frame(app.spinner_tick), Style::default().fg(ACCENT)),
            Span::styled(" Rewriting in progress...", Style::default().fg(TEXT_DIM)),
        ]))
        .alignment(Alignment::Center),
        Status::Error(message) => Paragraph::new(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(DANGER),
        ))
        .alignment(Alignment::Center),
        Status::Success(text) => Paragraph::new(text.as_str())
            .style(Style::default().fg(TEXT))
            .scroll((app.output_scroll, 0)),
    };

    f.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

fn draw_action_bar<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let session = &app.session;
    let enabled = session.can_rewrite();

    let label = if session.is_loading() {
        format!("{} Rewriting...", spinner::frame(app.spinner_tick))
    } else {
        "✎ Rewrite Content (Ctrl+R)".to_string()
    };

    let (border, fg) = if enabled {
        (ACCENT, TEXT)
    } else {
        (BORDER, TEXT_DIM)
    };

    let width = (label.chars().count() as u16 + 8).min(area.width);
    let [button] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let mut style = Style::default().fg(fg);
    if enabled {
        style = style.add_modifier(Modifier::BOLD).bg(ACCENT_DIM);
    }

    f.render_widget(
        Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(block),
        button,
    );
}

fn draw_footer<C: Clipboard>(f: &mut Frame, app: &App<C>, area: Rect) {
    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(notice.as_str(), Style::default().fg(DANGER)))
    } else {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(ACCENT));
        let dim = |t: &'static str| Span::styled(t, Style::default().fg(TEXT_DIM));
        Line::from(vec![
            key("Ctrl+R"),
            dim(" rewrite  "),
            key("Ctrl+Y"),
            dim(" copy  "),
            key("Ctrl+L"),
            dim(" clear  "),
            key("PgUp/PgDn"),
            dim(" scroll  "),
            key("Esc"),
            dim(" quit   "),
            Span::styled(credits(), Style::default().fg(BORDER)),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Rows `text` occupies when wrapped to `width` columns (character-based).
pub(super) fn wrapped_line_count(text: &str, width: u16) -> usize {
    let width = width.max(1) as usize;
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum()
}
