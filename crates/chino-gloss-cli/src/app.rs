use anyhow::{Context, Result};
use chino_gloss_engine::picker::PICK_PROMPT;
use chino_gloss_engine::{AlternateForms, ParticlePicker, ParticleQuery, Selection, SharedOutline};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{io::Stdout, path::PathBuf};

/// What a key press asks the picker loop to do next.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    Picked(Selection),
}

pub struct PickerApp {
    outline: SharedOutline,
    outline_path: PathBuf,
    forms: AlternateForms,
    query: ParticleQuery,
    options: Vec<(Selection, String)>,
    list_state: ListState,
    status: String,
}

impl PickerApp {
    pub fn new(
        outline: SharedOutline,
        outline_path: PathBuf,
        forms: AlternateForms,
        query: ParticleQuery,
    ) -> Self {
        let mut app = Self {
            outline,
            outline_path,
            forms,
            query,
            options: Vec::new(),
            list_state: ListState::default(),
            status: String::new(),
        };
        app.refresh_options();
        app
    }

    /// Rebuilds the option list from the current outline, keeping the
    /// query's current value highlighted when it is still offered.
    fn refresh_options(&mut self) {
        let picker = ParticlePicker::new(self.outline.snapshot(), self.forms.clone());
        self.options = std::iter::once((Selection::None, PICK_PROMPT.to_string()))
            .chain(
                picker
                    .eligible(&self.query)
                    .into_iter()
                    .map(|e| (Selection::Section(e.section.clone()), ParticlePicker::label(e))),
            )
            .collect();

        let current = self
            .options
            .iter()
            .position(|(selection, _)| *selection == self.query.current)
            .unwrap_or(0);
        self.list_state.select(Some(current));
        self.status = format!("{} options", self.options.len() - 1);
    }

    pub fn next_option(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.options.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_option(&mut self) {
        let i = match self.list_state.selected() {
            Some(0) | None => self.options.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn highlighted(&self) -> Selection {
        self.list_state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(|(selection, _)| selection.clone())
            .unwrap_or_default()
    }

    /// Re-reads the outline file. A broken file leaves the old outline in use.
    pub fn reload(&mut self) {
        let result = std::fs::read_to_string(&self.outline_path)
            .with_context(|| format!("reading {}", self.outline_path.display()))
            .and_then(|text| Ok(self.outline.reload(&text)?));
        match result {
            Ok(_) => {
                self.query.current = self.highlighted();
                self.refresh_options();
                self.status = format!("Reloaded: {}", self.status);
            }
            Err(e) => {
                log::warn!("reload failed: {e:#}");
                self.status = format!("Reload failed, keeping previous outline: {e:#}");
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Outcome {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Outcome::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                self.next_option();
                Outcome::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous_option();
                Outcome::Continue
            }
            KeyCode::Enter => Outcome::Picked(self.highlighted()),
            KeyCode::Char('0') | KeyCode::Backspace => Outcome::Picked(Selection::None),
            KeyCode::Char('r') => {
                self.reload();
                Outcome::Continue
            }
            _ => Outcome::Continue,
        }
    }
}

/// Runs the picker until something is chosen (`Some`) or the user quits.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut PickerApp,
) -> Result<Option<Selection>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.handle_key(key.code) {
                Outcome::Continue => {}
                Outcome::Quit => return Ok(None),
                Outcome::Picked(selection) => return Ok(Some(selection)),
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut PickerApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let query = if app.query.groups.is_empty() {
        format!("Particle: {}", app.query.candidate)
    } else {
        let groups: Vec<String> = app.query.groups.iter().map(u32::to_string).collect();
        format!("Proposed groups: {}", groups.join(", "))
    };
    let header = Paragraph::new(vec![
        Line::from(query),
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = app
        .options
        .iter()
        .map(|(_, label)| ListItem::new(vec![Line::from(vec![Span::raw(label.clone())])]))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Particles"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, chunks[1], &mut app.list_state);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("Enter: Pick | 0/Backspace: Clear | r: Reload"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TAXONOMY: &str = "1 が\n\t1 subject\n2 は\n\t1 topic\n3 の\n";

    fn app(query: ParticleQuery, path: PathBuf) -> PickerApp {
        let outline = SharedOutline::parse(TAXONOMY).unwrap();
        PickerApp::new(outline, path, AlternateForms::default(), query)
    }

    fn labels(app: &PickerApp) -> Vec<&str> {
        app.options.iter().map(|(_, l)| l.as_str()).collect()
    }

    #[test]
    fn prompt_comes_first() {
        let app = app(ParticleQuery::manual("は"), PathBuf::new());
        assert_eq!(labels(&app), vec![PICK_PROMPT, "2. は", "2.1. ✅ topic"]);
        assert_eq!(app.highlighted(), Selection::None);
    }

    #[test]
    fn current_value_is_highlighted() {
        let current = Selection::from_value("2.1").unwrap();
        let app = app(ParticleQuery::manual("が").with_current(current.clone()), PathBuf::new());
        assert_eq!(app.highlighted(), current);
    }

    #[test]
    fn keys_move_and_pick() {
        let mut app = app(ParticleQuery::groups(vec![1]), PathBuf::new());
        assert_eq!(app.handle_key(KeyCode::Up), Outcome::Continue);
        assert_eq!(
            app.handle_key(KeyCode::Enter),
            Outcome::Picked(Selection::from_value("1.1").unwrap())
        );
        app.handle_key(KeyCode::Down);
        assert_eq!(app.highlighted(), Selection::None);
        assert_eq!(
            app.handle_key(KeyCode::Backspace),
            Outcome::Picked(Selection::None)
        );
        assert_eq!(app.handle_key(KeyCode::Char('q')), Outcome::Quit);
    }

    #[test]
    fn reload_picks_up_edits_and_survives_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("particles.md");
        std::fs::write(&path, TAXONOMY).unwrap();
        let mut app = app(ParticleQuery::manual("は"), path.clone());

        std::fs::write(&path, "1 が\n2 は\n\t1 topic\n\t2 contrast\n").unwrap();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(labels(&app).len(), 4);

        std::fs::write(&path, "1 は\n\t\t\t1 broken\n").unwrap();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(labels(&app).len(), 4);
        assert!(app.status.starts_with("Reload failed"));
    }
}
