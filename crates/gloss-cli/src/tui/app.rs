use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::debug;

use super::view;
use gloss_core::cache::DatasetCache;
use gloss_core::config::{Config, DEFAULT_INTRO, DEFAULT_TITLE};
use gloss_core::filter::SourceFilter;
use gloss_core::pipeline::{self, View, ViewState};
use gloss_core::search::SearchEngine;

const PAGE: u16 = 10;

pub struct BrowserState {
    pub view_state: ViewState,
    /// Highlighted suggestion, if any.
    pub highlighted: Option<usize>,
    pub scroll: u16,
    pub message: Option<String>,
    pub title: String,
    pub intro: String,
}

impl BrowserState {
    pub fn new(view_state: ViewState) -> Self {
        Self {
            view_state,
            highlighted: None,
            scroll: 0,
            message: None,
            title: DEFAULT_TITLE.to_string(),
            intro: DEFAULT_INTRO.to_string(),
        }
    }

    pub fn with_heading(mut self, title: impl Into<String>, intro: impl Into<String>) -> Self {
        self.title = title.into();
        self.intro = intro.into();
        self
    }

    /// Update the view state and reset per-result UI state.
    fn update(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        self.view_state = f(std::mem::take(&mut self.view_state));
        self.highlighted = None;
        self.scroll = 0;
        self.message = None;
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing the pipeline depends on changed.
    Continue,
    /// The view must be recomputed.
    Refresh,
    /// The dataset cache must be cleared and reloaded.
    Reload,
    Quit,
}

/// Index of the selected source among "All Sources" followed by `view.sources`.
pub fn source_index(source: &SourceFilter, view: &View) -> usize {
    match source {
        SourceFilter::All => 0,
        SourceFilter::Only(name) => view
            .sources
            .iter()
            .position(|s| s == name)
            .map_or(0, |i| i + 1),
    }
}

fn source_at(index: usize, view: &View) -> SourceFilter {
    match index.checked_sub(1) {
        None => SourceFilter::All,
        Some(i) => SourceFilter::Only(view.sources[i].clone()),
    }
}

pub fn handle_key(state: &mut BrowserState, key: KeyEvent, view: &View) -> Outcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Outcome::Quit,
        KeyCode::Char('c') if ctrl => Outcome::Quit,
        KeyCode::Char('r') if ctrl => Outcome::Reload,
        KeyCode::Char('t') if ctrl => {
            let show = !state.view_state.show_table;
            state.view_state = std::mem::take(&mut state.view_state).with_table(show);
            state.scroll = 0;
            Outcome::Continue
        }
        KeyCode::Char('n') if ctrl => {
            if !view.suggestions.is_empty() {
                let next = state.highlighted.map_or(0, |i| (i + 1) % view.suggestions.len());
                state.highlighted = Some(next);
            }
            Outcome::Continue
        }
        KeyCode::Char('p') if ctrl => {
            if !view.suggestions.is_empty() {
                let len = view.suggestions.len();
                let prev = state.highlighted.map_or(len - 1, |i| (i + len - 1) % len);
                state.highlighted = Some(prev);
            }
            Outcome::Continue
        }
        KeyCode::Enter => {
            match state.highlighted.and_then(|i| view.suggestions.get(i)) {
                Some(word) => {
                    let word = word.clone();
                    state.update(|vs| vs.with_query(word));
                    Outcome::Refresh
                }
                None => Outcome::Continue,
            }
        }
        KeyCode::Tab => {
            state.update(|vs| {
                let operator = vs.operator.toggled();
                vs.with_operator(operator)
            });
            Outcome::Refresh
        }
        KeyCode::Up => {
            let current = source_index(&state.view_state.source, view);
            if current == 0 {
                return Outcome::Continue;
            }
            let source = source_at(current - 1, view);
            state.update(|vs| vs.with_source(source));
            Outcome::Refresh
        }
        KeyCode::Down => {
            let current = source_index(&state.view_state.source, view);
            if current >= view.sources.len() {
                return Outcome::Continue;
            }
            let source = source_at(current + 1, view);
            state.update(|vs| vs.with_source(source));
            Outcome::Refresh
        }
        KeyCode::PageDown => {
            state.scroll = state.scroll.saturating_add(PAGE);
            Outcome::Continue
        }
        KeyCode::PageUp => {
            state.scroll = state.scroll.saturating_sub(PAGE);
            Outcome::Continue
        }
        KeyCode::Backspace => {
            if state.view_state.query.is_empty() {
                return Outcome::Continue;
            }
            state.update(|mut vs| {
                vs.query.pop();
                vs
            });
            Outcome::Refresh
        }
        KeyCode::Char(c) if !ctrl => {
            state.update(|mut vs| {
                vs.query.push(c);
                vs
            });
            Outcome::Refresh
        }
        _ => Outcome::Continue,
    }
}

/// Run the browser TUI on stderr until the user quits.
pub fn run_browser(
    cache: &mut DatasetCache,
    engine: &SearchEngine,
    config: &Config,
    source: SourceFilter,
    query: Option<String>,
) -> color_eyre::Result<()> {
    let mut state = BrowserState::new(ViewState {
        source,
        query: query.unwrap_or_default(),
        operator: config.operator,
        show_table: false,
    })
    .with_heading(config.title.clone(), config.intro.clone());

    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stderr());
    let mut terminal = Terminal::new(backend)?;

    browse(
        &mut terminal,
        cache,
        engine,
        config.max_suggestions,
        &mut state,
    )
}

/// Alternate screen and raw mode, restored on drop.
///
/// Restoring runs on every exit path out of the browser, including setup
/// failures after the alternate screen was entered and early `?` returns.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        execute!(io::stderr(), EnterAlternateScreen, cursor::Hide)?;
        let guard = Self;
        terminal::enable_raw_mode()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            debug!(error = %e, "failed to disable raw mode");
        }
        if let Err(e) = execute!(io::stderr(), LeaveAlternateScreen, cursor::Show) {
            debug!(error = %e, "failed to leave alternate screen");
        }
    }
}

fn browse<B: Backend>(
    terminal: &mut Terminal<B>,
    cache: &mut DatasetCache,
    engine: &SearchEngine,
    max_suggestions: usize,
    state: &mut BrowserState,
) -> color_eyre::Result<()> {
    let mut view = pipeline::render(cache.get()?, &state.view_state, engine, max_suggestions);

    loop {
        let glossary = cache.get()?;
        terminal.draw(|f| view::render_browser(f, state, glossary, &view))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(state, key, &view) {
                Outcome::Continue => {}
                Outcome::Refresh => {
                    view = pipeline::render(cache.get()?, &state.view_state, engine, max_suggestions);
                }
                Outcome::Reload => {
                    cache.invalidate();
                    let glossary = cache.get()?;
                    view = pipeline::render(glossary, &state.view_state, engine, max_suggestions);
                    if let SourceFilter::Only(name) = &state.view_state.source
                        && !view.sources.contains(name)
                    {
                        state.update(|vs| vs.with_source(SourceFilter::All));
                        view =
                            pipeline::render(glossary, &state.view_state, engine, max_suggestions);
                    }
                    debug!(entries = glossary.len(), "browser reloaded dataset");
                    state.message = Some(format!("Reloaded {} entries", glossary.len()));
                }
                Outcome::Quit => return Ok(()),
            }
        }
    }
}
