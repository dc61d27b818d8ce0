use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Top-level views reachable from the sidebar
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    Clients,
    Programs,
    Enrollments,
    Search,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Clients,
        Section::Programs,
        Section::Enrollments,
        Section::Search,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Clients => "Clients",
            Section::Programs => "Programs",
            Section::Enrollments => "Enrollments",
            Section::Search => "Search Clients",
        }
    }

    /// F1..F4 jump straight to a section
    pub fn from_key(key: KeyCode) -> Option<Section> {
        match key {
            KeyCode::F(n @ 1..=4) => Section::ALL.get(usize::from(n - 1)).copied(),
            _ => None,
        }
    }
}

pub fn render_sidebar<B: Backend>(frame: &mut Frame<B>, area: Rect, active: Section) {
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let style = if *section == active {
                Style::default()
                    .bg(Color::Magenta)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(vec![Span::styled(
                format!(" F{} {}", i + 1, section.label()),
                style,
            )]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Health Admin")
            .borders(Borders::ALL),
    );
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys_map_to_sections() {
        assert_eq!(Section::from_key(KeyCode::F(1)), Some(Section::Clients));
        assert_eq!(Section::from_key(KeyCode::F(4)), Some(Section::Search));
        assert_eq!(Section::from_key(KeyCode::F(5)), None);
        assert_eq!(Section::from_key(KeyCode::Char('1')), None);
    }
}
