use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap};

use super::app::{BrowserState, source_index};
use crate::cli::NO_RESULTS;
use crate::display::{clean, clean_or};
use gloss_core::entry::{Entry, Glossary};
use gloss_core::filter::ALL_SOURCES;
use gloss_core::pipeline::View;

/// Most intro lines shown before the text is cut off.
const MAX_INTRO_LINES: u16 = 4;

pub fn render_browser(f: &mut Frame, state: &BrowserState, glossary: &Glossary, view: &View) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(intro_height(&state.intro, area.width)),
            Constraint::Min(1),    // body
            Constraint::Length(1), // status bar
        ])
        .split(area);

    let intro = Paragraph::new(Span::styled(
        clean(&state.intro),
        Style::default().fg(Color::DarkGray),
    ))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {} ", clean(&state.title)),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(intro, chunks[0]);

    let sidebar_width = view
        .sources
        .iter()
        .map(|s| s.chars().count())
        .chain(std::iter::once(ALL_SOURCES.len()))
        .max()
        .unwrap_or(0)
        .clamp(16, 32) as u16
        + 6;
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
        .split(chunks[1]);

    render_sources(f, state, view, body[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Length(1), // suggestions
            Constraint::Min(1),    // results
        ])
        .split(body[1]);

    render_input(f, state, main[0]);
    render_suggestions(f, state, view, main[1]);

    if view.results.is_empty() {
        let empty = Paragraph::new(Span::styled(NO_RESULTS, Style::default().fg(Color::Yellow)))
            .block(Block::default().borders(Borders::ALL).title("Results"));
        f.render_widget(empty, main[2]);
    } else if state.view_state.show_table {
        render_table(f, state, glossary, view, main[2]);
    } else {
        render_cards(f, state, glossary, view, main[2]);
    }

    let mut status = vec![
        Span::styled(
            format!(" {}/{} ", view.results.len(), view.scoped),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            " | Esc: quit | Tab: AND/OR | ↑↓: source | ^N/^P/Enter: suggestion | ^T: table | ^R: reload",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(msg) = &state.message {
        status.push(Span::styled(
            format!("  {msg}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(status)), chunks[2]);
}

/// Rows for the bordered intro block: the wrapped text, capped, plus borders.
fn intro_height(intro: &str, width: u16) -> u16 {
    let inner = usize::from(width.saturating_sub(2).max(1));
    let lines = intro.chars().count().div_ceil(inner).max(1);
    u16::try_from(lines).unwrap_or(u16::MAX).min(MAX_INTRO_LINES) + 2
}

fn render_sources(f: &mut Frame, state: &BrowserState, view: &View, area: Rect) {
    let selected = source_index(&state.view_state.source, view);
    let items: Vec<ListItem> = std::iter::once(ALL_SOURCES.to_string())
        .chain(view.sources.iter().map(|s| clean(s)))
        .enumerate()
        .map(|(i, label)| {
            let (marker, style) = if i == selected {
                (
                    "(•) ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("( ) ", Style::default())
            };
            ListItem::new(Span::styled(format!("{marker}{label}"), style))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Classification"),
    );
    f.render_widget(list, area);
}

fn render_input(f: &mut Frame, state: &BrowserState, area: Rect) {
    let query = &state.view_state.query;
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(clean(query)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Search [{}]", state.view_state.operator)),
    );
    f.render_widget(input, area);

    f.set_cursor_position((cursor_column(area, query), area.y.saturating_add(1)));
}

/// Cursor column after the `> ` prompt, kept inside the input border.
fn cursor_column(area: Rect, query: &str) -> u16 {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(3)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}

fn render_suggestions(f: &mut Frame, state: &BrowserState, view: &View, area: Rect) {
    if view.suggestions.is_empty() {
        return;
    }
    let mut spans = vec![Span::styled(
        " Suggestions: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (i, word) in view.suggestions.iter().enumerate() {
        let style = if state.highlighted == Some(i) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(clean(word), style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn card_lines(entry: &Entry) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        clean_or(entry.category.as_deref(), "-").into_owned(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(definition) = &entry.definition {
        lines.push(Line::from(clean(definition)));
    }
    let mut footer = vec![
        Span::styled(
            "Classification System: ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            clean_or(entry.source.as_deref(), "-").into_owned(),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(link) = &entry.link {
        footer.push(Span::styled(" | Learn more: ", Style::default().fg(Color::DarkGray)));
        footer.push(Span::styled(
            clean(link),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        ));
    }
    lines.push(Line::from(footer));
    lines.push(Line::from(""));
    lines
}

fn render_cards(f: &mut Frame, state: &BrowserState, glossary: &Glossary, view: &View, area: Rect) {
    let lines: Vec<Line> = view.entries(glossary).flat_map(card_lines).collect();
    let cards = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(cards, area);
}

fn render_table(f: &mut Frame, state: &BrowserState, glossary: &Glossary, view: &View, area: Rect) {
    let rows: Vec<Row> = view
        .entries(glossary)
        .skip(state.scroll as usize)
        .map(|e| {
            Row::new(vec![
                Cell::from(clean_or(e.source.as_deref(), "-").into_owned()),
                Cell::from(clean_or(e.category.as_deref(), "-").into_owned()),
                Cell::from(clean_or(e.definition.as_deref(), "-").into_owned()),
                Cell::from(clean_or(e.code.as_deref(), "-").into_owned()),
                Cell::from(clean_or(e.link.as_deref(), "-").into_owned()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(12),
            Constraint::Percentage(15),
            Constraint::Percentage(45),
            Constraint::Percentage(8),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Source", "Category", "Definition", "Code", "Link"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(Block::default().borders(Borders::ALL).title("Full table"));
    f.render_widget(table, area);
}
