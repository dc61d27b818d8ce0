//! Terminal admin console backed by the registry API.

pub mod api;
pub mod client_profile;
pub mod clients;
pub mod components;
pub mod programs;
pub mod registration;
pub mod search;

use std::io;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use self::api::RegistryApi;
use self::client_profile::{render_client_profile, ClientProfileAction, ClientProfileState};
use self::clients::{render_clients, ClientAction, ClientsState};
use self::components::sidebar::{render_sidebar, Section};
use self::programs::{render_programs, ProgramAction, ProgramsState};
use self::registration::{
    register_client, render_registration, RegistrationAction, RegistrationState,
};
use self::search::{render_search, SearchAction, SearchState};

// Represents the current screen in the console
#[derive(Clone, Copy, PartialEq, Debug)]
enum Screen {
    Clients,
    ClientProfile,
    Programs,
    Registration,
    Search,
}

impl Screen {
    fn for_section(section: Section) -> Self {
        match section {
            Section::Clients => Screen::Clients,
            Section::Programs => Screen::Programs,
            Section::Enrollments => Screen::Registration,
            Section::Search => Screen::Search,
        }
    }

    /// The sidebar entry highlighted while this screen is shown
    fn section(self) -> Section {
        match self {
            Screen::Clients | Screen::ClientProfile => Section::Clients,
            Screen::Programs => Section::Programs,
            Screen::Registration => Section::Enrollments,
            Screen::Search => Section::Search,
        }
    }
}

// Main console state
struct App {
    api: RegistryApi,
    today: NaiveDate,
    screen: Screen,
    clients_state: Option<ClientsState>,
    profile_state: Option<ClientProfileState>,
    programs_state: Option<ProgramsState>,
    registration_state: Option<RegistrationState>,
    search_state: SearchState,
}

impl App {
    fn new(api: RegistryApi) -> Self {
        Self {
            api,
            today: Local::now().date_naive(),
            screen: Screen::Clients,
            clients_state: None,
            profile_state: None,
            programs_state: None,
            registration_state: None,
            search_state: SearchState::default(),
        }
    }

    /// Switch to `section`, fetching whatever it shows
    async fn open(&mut self, section: Section) {
        self.today = Local::now().date_naive();
        self.screen = Screen::for_section(section);

        match section {
            Section::Clients => self.load_clients().await,
            Section::Programs => {
                let state = match self.api.list_programs().await {
                    Ok(programs) => ProgramsState::new(programs),
                    Err(e) => {
                        error!(error = %e, "error fetching programs");
                        let mut state = ProgramsState::new(Vec::new());
                        state.error = Some(e.to_string());
                        state
                    }
                };
                self.programs_state = Some(state);
            }
            Section::Enrollments => {
                let programs = self.api.list_programs().await.unwrap_or_else(|e| {
                    error!(error = %e, "error fetching programs");
                    Vec::new()
                });
                self.registration_state = Some(RegistrationState::new(programs, self.today));
            }
            Section::Search => {}
        }
    }

    async fn load_clients(&mut self) {
        let state = match self.api.list_clients().await {
            Ok(clients) => ClientsState::new(clients, self.today),
            Err(e) => {
                error!(error = %e, "error fetching clients");
                ClientsState::failed(e.to_string(), self.today)
            }
        };
        self.clients_state = Some(state);
    }

    async fn open_profile(&mut self, client_id: i64) {
        let profile = self.api.get_client(client_id).await.unwrap_or_else(|e| {
            error!(error = %e, client_id, "error fetching client");
            None
        });
        self.profile_state = Some(ClientProfileState::new(profile));
        self.screen = Screen::ClientProfile;
    }
}

/// Run the console against the API at `api_url` until the user quits
pub async fn run(api_url: &str) -> Result<()> {
    let api = RegistryApi::new(api_url)?;
    info!(api_url, "starting console");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api);
    app.open(Section::Clients).await;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "console exited with error");
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .margin(1)
                .constraints([Constraint::Length(24), Constraint::Min(40)].as_ref())
                .split(f.size());

            render_sidebar(f, chunks[0], app.screen.section());
            let area = chunks[1];

            match app.screen {
                Screen::Clients => {
                    if let Some(state) = &mut app.clients_state {
                        render_clients(f, area, state);
                    }
                }
                Screen::ClientProfile => {
                    if let Some(state) = &app.profile_state {
                        render_client_profile(f, area, state);
                    }
                }
                Screen::Programs => {
                    if let Some(state) = &app.programs_state {
                        render_programs(f, area, state);
                    }
                }
                Screen::Registration => {
                    if let Some(state) = &app.registration_state {
                        render_registration(f, area, state);
                    }
                }
                Screen::Search => render_search(f, area, &app.search_state),
            }
        })?;

        let should_quit = match app.screen {
            Screen::Clients => handle_clients_screen(app).await?,
            Screen::ClientProfile => handle_profile_screen(app).await?,
            Screen::Programs => handle_programs_screen(app).await?,
            Screen::Registration => handle_registration_screen(app).await?,
            Screen::Search => handle_search_screen(app).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_clients_screen(app: &mut App) -> Result<bool> {
    let Some(state) = &mut app.clients_state else {
        return Ok(false);
    };

    match clients::handle_input(state)? {
        Some(ClientAction::Quit) => return Ok(true),
        Some(ClientAction::Navigate(section)) => app.open(section).await,
        Some(ClientAction::ViewClient(client_id)) => app.open_profile(client_id).await,
        Some(ClientAction::Reload) => app.load_clients().await,
        None => {}
    }
    Ok(false)
}

async fn handle_profile_screen(app: &mut App) -> Result<bool> {
    match client_profile::handle_input()? {
        Some(ClientProfileAction::Back) => {
            app.profile_state = None;
            app.screen = Screen::Clients;
        }
        Some(ClientProfileAction::Navigate(section)) => app.open(section).await,
        None => {}
    }
    Ok(false)
}

async fn handle_programs_screen(app: &mut App) -> Result<bool> {
    let Some(state) = &mut app.programs_state else {
        return Ok(false);
    };

    match programs::handle_input(state)? {
        Some(ProgramAction::Quit) => return Ok(true),
        Some(ProgramAction::Navigate(section)) => app.open(section).await,
        Some(ProgramAction::Create(request)) => match app.api.create_program(&request).await {
            Ok(program) => {
                info!(program_id = program.id, "created program");
                state.program_created(program);
            }
            Err(e) => {
                error!(error = %e, "error creating program");
                state.program_failed(e.to_string());
            }
        },
        None => {}
    }
    Ok(false)
}

async fn handle_registration_screen(app: &mut App) -> Result<bool> {
    let Some(state) = &mut app.registration_state else {
        return Ok(false);
    };

    match registration::handle_input(state)? {
        Some(RegistrationAction::Quit) => return Ok(true),
        Some(RegistrationAction::Navigate(section)) => app.open(section).await,
        Some(RegistrationAction::Submit(client, program_ids)) => {
            let outcome = register_client(&app.api, &client, &program_ids).await;
            state.finish(outcome);
        }
        None => {}
    }
    Ok(false)
}

async fn handle_search_screen(app: &mut App) -> Result<bool> {
    match search::handle_input(&mut app.search_state)? {
        Some(SearchAction::Quit) => return Ok(true),
        Some(SearchAction::Navigate(section)) => app.open(section).await,
        Some(SearchAction::Search(query)) => {
            let results = app.api.search_clients(&query).await;
            app.search_state.apply_results(results);
        }
        None => {}
    }
    Ok(false)
}
