use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Client;
use crate::ui::components::sidebar::Section;

/// Server-side search by name or contact number
#[derive(Default)]
pub struct SearchState {
    pub query: String,
    results: Vec<Client>,
}

impl SearchState {
    pub fn results(&self) -> &[Client] {
        &self.results
    }

    /// A failed search keeps whatever was shown before
    pub fn apply_results(&mut self, results: Result<Vec<Client>>) {
        match results {
            Ok(clients) => self.results = clients,
            Err(e) => tracing::error!(error = %e, "error searching clients"),
        }
    }
}

pub enum SearchAction {
    Quit,
    Navigate(Section),
    Search(String),
}

pub fn render_search<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &SearchState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(area);

    let input = Paragraph::new(format!("{}|", state.query)).block(
        Block::default()
            .title("Search by name or contact")
            .borders(Borders::ALL),
    );
    frame.render_widget(input, chunks[0]);

    if state.results.is_empty() {
        let empty = Paragraph::new("No clients found.")
            .block(Block::default().title("Search Clients").borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = state
            .results
            .iter()
            .map(|client| ListItem::new(format!("{} {}", client.first_name, client.last_name)))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Search Clients").borders(Borders::ALL));
        frame.render_widget(list, chunks[1]);
    }

    let help = Paragraph::new("<Enter> Search | <Esc> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);
}

pub fn handle_key(state: &mut SearchState, key: KeyEvent) -> Option<SearchAction> {
    if let Some(section) = Section::from_key(key.code) {
        return Some(SearchAction::Navigate(section));
    }

    match key.code {
        KeyCode::Esc => return Some(SearchAction::Quit),
        KeyCode::Enter => return Some(SearchAction::Search(state.query.clone())),
        KeyCode::Backspace => {
            state.query.pop();
        }
        KeyCode::Char(c) => state.query.push(c),
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut SearchState) -> Result<Option<SearchAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key));
    }
    Ok(None)
}
