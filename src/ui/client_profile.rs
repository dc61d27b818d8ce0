use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::ClientWithPrograms;
use crate::ui::components::sidebar::Section;

pub struct ClientProfileState {
    /// `None` when the client does not exist or could not be fetched
    profile: Option<ClientWithPrograms>,
}

impl ClientProfileState {
    pub fn new(profile: Option<ClientWithPrograms>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> Option<&ClientWithPrograms> {
        self.profile.as_ref()
    }
}

pub enum ClientProfileAction {
    Back,
    Navigate(Section),
}

fn field<'a>(label: &'a str, value: String) -> Spans<'a> {
    Spans::from(vec![
        Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

pub fn render_client_profile<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &ClientProfileState) {
    let Some(profile) = state.profile() else {
        let message = Paragraph::new("Client not found.")
            .block(Block::default().title("Client Profile").borders(Borders::ALL));
        frame.render_widget(message, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(area);

    let client = &profile.client;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let details = vec![
        field("Name", format!("{} {}", client.first_name, client.last_name)),
        field("Email", text(&client.email)),
        field("Contact", text(&client.contact_number)),
        field("Gender", text(&client.gender)),
        field(
            "DOB",
            client
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
        field("Address", text(&client.address)),
    ];
    let details = Paragraph::new(details)
        .block(Block::default().title("Client Profile").borders(Borders::ALL));
    frame.render_widget(details, chunks[0]);

    let programs: Vec<Spans> = if profile.programs.is_empty() {
        vec![
            Spans::from(Span::styled(
                "No programs enrolled",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from("This client is not enrolled in any programs yet."),
        ]
    } else {
        profile
            .programs
            .iter()
            .map(|program| {
                let mut spans = vec![Span::styled(
                    format!("• {}", program.name),
                    Style::default().add_modifier(Modifier::BOLD),
                )];
                if let Some(description) = &program.description {
                    spans.push(Span::styled(
                        format!(" ({})", description),
                        Style::default().fg(Color::Gray),
                    ));
                }
                Spans::from(spans)
            })
            .collect()
    };
    let programs = Paragraph::new(programs)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Enrolled Programs").borders(Borders::ALL));
    frame.render_widget(programs, chunks[1]);

    let help = Paragraph::new("<Esc> Back to clients")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);
}

pub fn handle_key(key: KeyEvent) -> Option<ClientProfileAction> {
    if let Some(section) = Section::from_key(key.code) {
        return Some(ClientProfileAction::Navigate(section));
    }
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => Some(ClientProfileAction::Back),
        _ => None,
    }
}

pub fn handle_input() -> Result<Option<ClientProfileAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(key));
    }
    Ok(None)
}
