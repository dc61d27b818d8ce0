use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::Client;
use crate::projection::{
    client_age, project, AgeBucket, ClientFilter, SortDirection, SortField, SortKey,
};
use crate::ui::components::sidebar::Section;

const GENDER_OPTIONS: [&str; 2] = ["Female", "Male"];

const SORT_KEYS: [SortKey; 4] = [SortKey::LastName, SortKey::FirstName, SortKey::Age, SortKey::Id];

// Represents the state of the clients list screen
pub struct ClientsState {
    clients: Vec<Client>,
    visible: Vec<Client>,
    query: String,
    filter: ClientFilter,
    sort_key: SortKey,
    sort_direction: SortDirection,
    today: NaiveDate,
    list_state: ListState,
    pub error: Option<String>,
}

impl ClientsState {
    pub fn new(clients: Vec<Client>, today: NaiveDate) -> Self {
        let mut state = Self {
            clients,
            visible: Vec::new(),
            query: String::new(),
            filter: ClientFilter::default(),
            sort_key: SortKey::LastName,
            sort_direction: SortDirection::Ascending,
            today,
            list_state: ListState::default(),
            error: None,
        };
        state.refresh();
        state
    }

    pub fn failed(message: String, today: NaiveDate) -> Self {
        let mut state = Self::new(Vec::new(), today);
        state.error = Some(message);
        state
    }

    /// The primary sort field followed by name tie-breakers
    pub fn sort_fields(&self) -> Vec<SortField> {
        let primary = SortField {
            key: self.sort_key,
            direction: self.sort_direction,
        };
        let tie_breakers = match self.sort_key {
            SortKey::LastName => vec![SortField::ascending(SortKey::FirstName)],
            SortKey::FirstName => vec![SortField::ascending(SortKey::LastName)],
            SortKey::Age | SortKey::Id => vec![
                SortField::ascending(SortKey::LastName),
                SortField::ascending(SortKey::FirstName),
            ],
        };
        std::iter::once(primary).chain(tie_breakers).collect()
    }

    // Re-run the projection and keep the selection in range
    fn refresh(&mut self) {
        self.visible = project(
            &self.clients,
            &self.filter,
            &self.sort_fields(),
            &self.query,
            self.today,
        );
        if self.visible.is_empty() {
            self.list_state.select(None);
        } else {
            let selected = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(selected.min(self.visible.len() - 1)));
        }
    }

    pub fn visible(&self) -> &[Client] {
        &self.visible
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.refresh();
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.refresh();
    }

    pub fn cycle_gender(&mut self) {
        self.filter.gender = match self.filter.gender.as_deref() {
            None => Some(GENDER_OPTIONS[0].to_string()),
            Some(current) => GENDER_OPTIONS
                .iter()
                .position(|g| *g == current)
                .and_then(|i| GENDER_OPTIONS.get(i + 1))
                .map(|g| g.to_string()),
        };
        self.refresh();
    }

    pub fn cycle_age_bucket(&mut self) {
        self.filter.age_bucket = match self.filter.age_bucket {
            None => Some(AgeBucket::ALL[0]),
            Some(current) => AgeBucket::ALL
                .iter()
                .position(|b| *b == current)
                .and_then(|i| AgeBucket::ALL.get(i + 1))
                .copied(),
        };
        self.refresh();
    }

    pub fn cycle_sort_key(&mut self) {
        let i = SORT_KEYS.iter().position(|k| *k == self.sort_key).unwrap_or(0);
        self.sort_key = SORT_KEYS[(i + 1) % SORT_KEYS.len()];
        self.refresh();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggled();
        self.refresh();
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.list_state.selected().and_then(|i| self.visible.get(i))
    }

    fn filter_summary(&self) -> String {
        let direction = match self.sort_direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        format!(
            "Gender: {} | Age: {} | Sort: {} ({})",
            self.filter.gender.as_deref().unwrap_or("Any"),
            self.filter.age_bucket.map(|b| b.label()).unwrap_or("Any"),
            self.sort_key.label(),
            direction,
        )
    }
}

pub enum ClientAction {
    Quit,
    Navigate(Section),
    ViewClient(i64),
    Reload,
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ClientsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let search = Paragraph::new(format!("{}|", state.query))
        .block(Block::default().title("Search clients...").borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);

    let summary = Paragraph::new(state.filter_summary()).style(Style::default().fg(Color::Gray));
    frame.render_widget(summary, chunks[1]);

    if let Some(error) = &state.error {
        let message = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Clients").borders(Borders::ALL));
        frame.render_widget(message, chunks[2]);
    } else if state.visible.is_empty() {
        let message = Paragraph::new("No clients found")
            .block(Block::default().title("Clients").borders(Borders::ALL));
        frame.render_widget(message, chunks[2]);
    } else {
        let today = state.today;
        let items: Vec<ListItem> = state
            .visible
            .iter()
            .map(|client| {
                let age = client_age(client, today)
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "-".to_string());
                ListItem::new(Spans::from(vec![
                    Span::styled(
                        format!("{} {}", client.first_name, client.last_name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        "  {}  age {}",
                        client.email.as_deref().unwrap_or(""),
                        age
                    )),
                ]))
            })
            .collect();

        let clients_list = List::new(items)
            .block(Block::default().title("Clients").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_stateful_widget(clients_list, chunks[2], &mut state.list_state);
    }

    let buttons = Paragraph::new(
        "Type to filter | ^G Gender | ^A Age | ^S Sort | ^D Direction | ^R Reload | <Enter> Profile | <Esc> Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[3]);
}

pub fn handle_key(state: &mut ClientsState, key: KeyEvent) -> Option<ClientAction> {
    if let Some(section) = Section::from_key(key.code) {
        return Some(ClientAction::Navigate(section));
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('g') => state.cycle_gender(),
            KeyCode::Char('a') => state.cycle_age_bucket(),
            KeyCode::Char('s') => state.cycle_sort_key(),
            KeyCode::Char('d') => state.toggle_sort_direction(),
            KeyCode::Char('r') => return Some(ClientAction::Reload),
            KeyCode::Char('c') => return Some(ClientAction::Quit),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(ClientAction::Quit),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Backspace => state.pop_query(),
        KeyCode::Char(c) => state.push_query(c),
        KeyCode::Enter => {
            if let Some(client) = state.selected_client() {
                return Some(ClientAction::ViewClient(client.id));
            }
        }
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn client(id: i64, first: &str, last: &str, gender: Option<&str>) -> Client {
        Client {
            id,
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: None,
            gender: gender.map(Into::into),
            contact_number: None,
            email: None,
            address: None,
        }
    }

    fn state() -> ClientsState {
        ClientsState::new(
            vec![
                client(1, "Amina", "Otieno", Some("Female")),
                client(2, "Brian", "Kamau", Some("Male")),
                client(3, "Carol", "Achieng", Some("Female")),
            ],
            today(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn visible_ids(state: &ClientsState) -> Vec<i64> {
        state.visible().iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_defaults_to_last_name_order() {
        let state = state();
        assert_eq!(visible_ids(&state), vec![3, 2, 1]);
        assert_eq!(state.selected_client().map(|c| c.id), Some(3));
    }

    #[test]
    fn test_typing_filters_the_list() {
        let mut state = state();
        for c in "ami".chars() {
            handle_key(&mut state, key(KeyCode::Char(c)));
        }
        assert_eq!(visible_ids(&state), vec![1]);

        handle_key(&mut state, key(KeyCode::Backspace));
        handle_key(&mut state, key(KeyCode::Backspace));
        handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(visible_ids(&state), vec![3, 2, 1]);
    }

    #[test]
    fn test_gender_filter_cycles_back_to_any() {
        let mut state = state();
        handle_key(&mut state, ctrl('g'));
        assert_eq!(visible_ids(&state), vec![3, 1]);
        handle_key(&mut state, ctrl('g'));
        assert_eq!(visible_ids(&state), vec![2]);
        handle_key(&mut state, ctrl('g'));
        assert_eq!(visible_ids(&state), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_direction_toggle() {
        let mut state = state();
        handle_key(&mut state, ctrl('d'));
        assert_eq!(visible_ids(&state), vec![1, 2, 3]);
    }

    #[test]
    fn test_enter_opens_selected_profile() {
        let mut state = state();
        handle_key(&mut state, key(KeyCode::Down));
        match handle_key(&mut state, key(KeyCode::Enter)) {
            Some(ClientAction::ViewClient(id)) => assert_eq!(id, 2),
            _ => panic!("expected a profile request"),
        }
    }

    #[test]
    fn test_selection_clamped_after_filtering() {
        let mut state = state();
        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.selected_client().map(|c| c.id), Some(1));

        handle_key(&mut state, key(KeyCode::Char('k')));
        assert_eq!(state.selected_client().map(|c| c.id), Some(2));
    }
}
