use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{HealthProgram, NewProgram};
use crate::ui::components::sidebar::Section;

pub enum ProgramAction {
    Quit,
    Navigate(Section),
    Create(NewProgram),
}

#[derive(Clone, PartialEq, Copy)]
pub enum ProgramField {
    Name,
    Description,
}

pub struct ProgramsState {
    programs: Vec<HealthProgram>,
    pub name: String,
    pub description: String,
    pub current_field: ProgramField,
    pub editing: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl ProgramsState {
    pub fn new(programs: Vec<HealthProgram>) -> Self {
        Self {
            programs,
            name: String::new(),
            description: String::new(),
            current_field: ProgramField::Name,
            editing: false,
            saving: false,
            error: None,
        }
    }

    pub fn programs(&self) -> &[HealthProgram] {
        &self.programs
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProgramField::Name => ProgramField::Description,
            ProgramField::Description => ProgramField::Name,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = match self.current_field {
            ProgramField::Name => &mut self.name,
            ProgramField::Description => &mut self.description,
        };

        match key {
            KeyCode::Char(c) => field_value.push(c),
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    /// Validate locally and build the request, or record why not
    pub fn submit(&mut self) -> Option<NewProgram> {
        if self.name.trim().is_empty() {
            self.error = Some("Program name is required".to_string());
            return None;
        }
        self.error = None;
        self.saving = true;
        Some(NewProgram {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
        })
    }

    /// New programs go to the top, matching the API's ordering
    pub fn program_created(&mut self, program: HealthProgram) {
        self.programs.insert(0, program);
        self.name.clear();
        self.description.clear();
        self.current_field = ProgramField::Name;
        self.saving = false;
    }

    pub fn program_failed(&mut self, message: String) {
        self.error = Some(if message.is_empty() {
            "Something went wrong".to_string()
        } else {
            message
        });
        self.saving = false;
    }
}

pub fn render_programs<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &ProgramsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_form(frame, state, chunks[0]);

    if let Some(error) = &state.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[1]);
    }

    if state.programs.is_empty() {
        let empty = Paragraph::new("No programs available.")
            .block(Block::default().title("Existing Programs").borders(Borders::ALL));
        frame.render_widget(empty, chunks[2]);
    } else {
        let items: Vec<ListItem> = state
            .programs
            .iter()
            .map(|program| {
                ListItem::new(vec![
                    Spans::from(Span::styled(
                        program.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Spans::from(Span::styled(
                        program.description.clone().unwrap_or_default(),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Existing Programs").borders(Borders::ALL));
        frame.render_widget(list, chunks[2]);
    }

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.saving {
        "Creating..."
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Add program | Esc - Quit"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &ProgramsState, area: Rect) {
    let fields = [
        (ProgramField::Name, "Program Name", &state.name),
        (ProgramField::Description, "Description", &state.description),
    ];

    let items: Vec<ListItem> = fields
        .iter()
        .map(|(field, label, value)| {
            let selected = *field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = if selected && state.editing {
                Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(value.as_str())
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", label), label_style),
                value,
            ]))
        })
        .collect();

    let form = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Health Programs"),
    );
    frame.render_widget(form, area);
}

pub fn handle_key(state: &mut ProgramsState, key: KeyEvent) -> Option<ProgramAction> {
    if let Some(section) = Section::from_key(key.code) {
        return Some(ProgramAction::Navigate(section));
    }

    match key.code {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ProgramAction::Quit);
            }
        }
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up | KeyCode::Down | KeyCode::Tab if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing && !state.saving => {
            return state.submit().map(ProgramAction::Create);
        }
        _ if state.editing => state.edit_current_field(key.code),
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut ProgramsState) -> Result<Option<ProgramAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key));
    }
    Ok(None)
}
