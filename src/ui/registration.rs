use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Client, HealthProgram, NewClient};
use crate::ui::api::RegistryApi;
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::sidebar::Section;

pub const ENROLL_FAILED: &str = "Failed to enroll client.";

const GENDERS: [Option<&str>; 3] = [None, Some("Male"), Some("Female")];

pub enum RegistrationAction {
    Quit,
    Navigate(Section),
    Submit(NewClient, Vec<i64>),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum RegistrationField {
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    ContactNumber,
    Email,
    Address,
    Programs,
}

impl RegistrationField {
    const ORDER: [RegistrationField; 8] = [
        RegistrationField::FirstName,
        RegistrationField::LastName,
        RegistrationField::DateOfBirth,
        RegistrationField::Gender,
        RegistrationField::ContactNumber,
        RegistrationField::Email,
        RegistrationField::Address,
        RegistrationField::Programs,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn label(self) -> &'static str {
        match self {
            RegistrationField::FirstName => "First Name",
            RegistrationField::LastName => "Last Name",
            RegistrationField::DateOfBirth => "Date of Birth",
            RegistrationField::Gender => "Gender",
            RegistrationField::ContactNumber => "Contact Number",
            RegistrationField::Email => "Email",
            RegistrationField::Address => "Address",
            RegistrationField::Programs => "Programs",
        }
    }
}

/// Outcome line shown under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

pub struct RegistrationState {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateInputState,
    gender: usize,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    programs: Vec<HealthProgram>,
    selected: Vec<bool>,
    program_cursor: usize,
    pub current_field: RegistrationField,
    pub editing: bool,
    pub submitting: bool,
    pub notice: Option<Notice>,
    today: NaiveDate,
}

impl RegistrationState {
    pub fn new(programs: Vec<HealthProgram>, today: NaiveDate) -> Self {
        let selected = vec![false; programs.len()];
        Self {
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: DateInputState::new(None, today),
            gender: 0,
            contact_number: String::new(),
            email: String::new(),
            address: String::new(),
            programs,
            selected,
            program_cursor: 0,
            current_field: RegistrationField::FirstName,
            editing: false,
            submitting: false,
            notice: None,
            today,
        }
    }

    pub fn gender(&self) -> Option<&'static str> {
        GENDERS[self.gender]
    }

    pub fn cycle_gender(&mut self) {
        self.gender = (self.gender + 1) % GENDERS.len();
    }

    pub fn programs(&self) -> &[HealthProgram] {
        &self.programs
    }

    pub fn toggle_program(&mut self) {
        if let Some(flag) = self.selected.get_mut(self.program_cursor) {
            *flag = !*flag;
        }
    }

    pub fn selected_program_ids(&self) -> Vec<i64> {
        self.programs
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(program, _)| program.id)
            .collect()
    }

    pub fn next_field(&mut self) {
        let next = (self.current_field.position() + 1) % RegistrationField::ORDER.len();
        self.current_field = RegistrationField::ORDER[next];
    }

    pub fn previous_field(&mut self) {
        let len = RegistrationField::ORDER.len();
        let previous = (self.current_field.position() + len - 1) % len;
        self.current_field = RegistrationField::ORDER[previous];
    }

    pub fn toggle_editing(&mut self) {
        match self.current_field {
            RegistrationField::Gender => self.cycle_gender(),
            RegistrationField::Programs => self.toggle_program(),
            RegistrationField::DateOfBirth => {
                self.date_of_birth.toggle_editing();
                self.editing = self.date_of_birth.editing;
            }
            _ => self.editing = !self.editing,
        }
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.current_field {
            RegistrationField::FirstName => Some(&mut self.first_name),
            RegistrationField::LastName => Some(&mut self.last_name),
            RegistrationField::ContactNumber => Some(&mut self.contact_number),
            RegistrationField::Email => Some(&mut self.email),
            RegistrationField::Address => Some(&mut self.address),
            _ => None,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        if self.current_field == RegistrationField::DateOfBirth {
            self.date_of_birth.handle_input(key);
            return;
        }

        if let Some(value) = self.text_field() {
            match key {
                KeyCode::Char(c) => value.push(c),
                KeyCode::Backspace => {
                    value.pop();
                }
                _ => {}
            }
        }
    }

    fn move_program_cursor(&mut self, forward: bool) {
        if self.programs.is_empty() {
            return;
        }
        let len = self.programs.len();
        self.program_cursor = if forward {
            (self.program_cursor + 1) % len
        } else {
            (self.program_cursor + len - 1) % len
        };
    }

    pub fn is_valid(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }

    pub fn submit(&mut self) -> Option<(NewClient, Vec<i64>)> {
        if !self.is_valid() {
            return None;
        }
        self.submitting = true;
        self.notice = None;

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let client = NewClient {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            date_of_birth: self.date_of_birth.value(),
            gender: self.gender().map(str::to_string),
            contact_number: optional(&self.contact_number),
            email: optional(&self.email),
            address: optional(&self.address),
        };
        Some((client, self.selected_program_ids()))
    }

    /// Apply the outcome of [`register_client`]
    pub fn finish(&mut self, outcome: Result<Client>) {
        self.submitting = false;
        match outcome {
            Ok(client) => {
                let programs = std::mem::take(&mut self.programs);
                *self = Self::new(programs, self.today);
                self.notice = Some(Notice::Success(format!(
                    "Client {} enrolled successfully in the selected programs.",
                    client.first_name
                )));
            }
            Err(e) => {
                tracing::error!(error = %e, "error registering client");
                self.notice = Some(Notice::Failure(ENROLL_FAILED.to_string()));
            }
        }
    }
}

/// Create the client, then enroll it in each program in turn
///
/// Stops at the first failed enrollment; earlier ones are not undone.
pub async fn register_client(
    api: &RegistryApi,
    client: &NewClient,
    program_ids: &[i64],
) -> Result<Client> {
    let created = api.create_client(client).await?;
    for program_id in program_ids {
        api.enroll(created.id, *program_id).await?;
    }
    tracing::info!(
        client_id = created.id,
        programs = program_ids.len(),
        "registered client"
    );
    Ok(created)
}

pub fn render_registration<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &RegistrationState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(9),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_form(frame, state, chunks[0]);
    render_program_picker(frame, state, chunks[1]);

    if let Some(notice) = &state.notice {
        let (text, color) = match notice {
            Notice::Success(text) => (text.as_str(), Color::Green),
            Notice::Failure(text) => (text.as_str(), Color::Red),
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)),
            chunks[2],
        );
    }

    let help_text = if state.submitting {
        "Registering..."
    } else if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.is_valid() {
        "Enter - Edit/Toggle | Up/Down - Navigate | S - Register | Esc - Quit"
    } else {
        "Enter - Edit/Toggle | Up/Down - Navigate | First and last name required | Esc - Quit"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &RegistrationState, area: Rect) {
    let items: Vec<ListItem> = RegistrationField::ORDER[..7]
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let value = match field {
                RegistrationField::FirstName => state.first_name.clone(),
                RegistrationField::LastName => state.last_name.clone(),
                RegistrationField::DateOfBirth => state.date_of_birth.get_display_string(),
                RegistrationField::Gender => state.gender().unwrap_or("Not set").to_string(),
                RegistrationField::ContactNumber => state.contact_number.clone(),
                RegistrationField::Email => state.email.clone(),
                RegistrationField::Address => state.address.clone(),
                RegistrationField::Programs => String::new(),
            };

            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = if selected && state.editing && *field != RegistrationField::DateOfBirth {
                Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(value)
            };

            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                value,
            ]))
        })
        .collect();

    let form = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Register New Client"),
    );
    frame.render_widget(form, area);
}

fn render_program_picker<B: Backend>(frame: &mut Frame<B>, state: &RegistrationState, area: Rect) {
    let focused = state.current_field == RegistrationField::Programs;
    let title_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Programs (Space to select)", title_style));

    if state.programs.is_empty() {
        frame.render_widget(Paragraph::new("No programs available.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .programs
        .iter()
        .zip(&state.selected)
        .enumerate()
        .map(|(i, (program, selected))| {
            let marker = if *selected { "[x]" } else { "[ ]" };
            let style = if focused && i == state.program_cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {}", marker, program.name)).style(style)
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

pub fn handle_key(state: &mut RegistrationState, key: KeyEvent) -> Option<RegistrationAction> {
    if let Some(section) = Section::from_key(key.code) {
        return Some(RegistrationAction::Navigate(section));
    }
    if state.submitting {
        return None;
    }

    if state.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.toggle_editing(),
            code => state.edit_current_field(code),
        }
        return None;
    }

    let on_programs = state.current_field == RegistrationField::Programs;
    match key.code {
        KeyCode::Esc => return Some(RegistrationAction::Quit),
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Char(' ') if on_programs => state.toggle_program(),
        KeyCode::Down if on_programs => state.move_program_cursor(true),
        KeyCode::Up if on_programs => state.move_program_cursor(false),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Up | KeyCode::BackTab => state.previous_field(),
        KeyCode::Char('s') => {
            return state
                .submit()
                .map(|(client, programs)| RegistrationAction::Submit(client, programs));
        }
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut RegistrationState) -> Result<Option<RegistrationAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn programs() -> Vec<HealthProgram> {
        vec![
            HealthProgram {
                id: 7,
                name: "HIV".into(),
                description: None,
            },
            HealthProgram {
                id: 3,
                name: "TB".into(),
                description: None,
            },
        ]
    }

    fn press(state: &mut RegistrationState, code: KeyCode) -> Option<RegistrationAction> {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_into(state: &mut RegistrationState, text: &str) {
        press(state, KeyCode::Enter);
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
        press(state, KeyCode::Enter);
    }

    fn client(first: &str) -> Client {
        Client {
            id: 1,
            first_name: first.into(),
            last_name: "Otieno".into(),
            date_of_birth: None,
            gender: None,
            contact_number: None,
            email: None,
            address: None,
        }
    }

    #[test]
    fn test_submit_requires_both_names() {
        let mut state = RegistrationState::new(programs(), today());
        type_into(&mut state, "Amina");
        assert!(press(&mut state, KeyCode::Char('s')).is_none());
        assert!(!state.submitting);
    }

    #[test]
    fn test_full_form_builds_request_with_selected_programs() {
        let mut state = RegistrationState::new(programs(), today());
        type_into(&mut state, "Amina");
        press(&mut state, KeyCode::Down);
        type_into(&mut state, "Otieno");
        press(&mut state, KeyCode::Down);
        type_into(&mut state, "19900110");
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.gender(), Some("Female"));

        state.current_field = RegistrationField::Programs;
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Char(' '));

        match press(&mut state, KeyCode::Char('s')) {
            Some(RegistrationAction::Submit(request, ids)) => {
                assert_eq!(request.first_name.as_deref(), Some("Amina"));
                assert_eq!(request.last_name.as_deref(), Some("Otieno"));
                assert_eq!(request.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 10));
                assert_eq!(request.gender.as_deref(), Some("Female"));
                assert_eq!(request.email, None);
                assert_eq!(ids, vec![3]);
            }
            _ => panic!("expected a submission"),
        }
    }

    #[test]
    fn test_success_resets_form_and_keeps_programs() {
        let mut state = RegistrationState::new(programs(), today());
        state.first_name = "Amina".into();
        state.toggle_program();
        state.submitting = true;

        state.finish(Ok(client("Amina")));

        assert!(state.first_name.is_empty());
        assert!(state.selected_program_ids().is_empty());
        assert_eq!(state.programs().len(), 2);
        assert_eq!(
            state.notice,
            Some(Notice::Success(
                "Client Amina enrolled successfully in the selected programs.".into()
            ))
        );
    }

    #[test]
    fn test_failure_keeps_form_and_shows_static_message() {
        let mut state = RegistrationState::new(programs(), today());
        state.first_name = "Amina".into();
        state.finish(Err(anyhow::anyhow!("Client ID and Program ID are required")));

        assert_eq!(state.first_name, "Amina");
        assert_eq!(state.notice, Some(Notice::Failure(ENROLL_FAILED.into())));
    }
}
