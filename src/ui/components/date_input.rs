use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Optional date typed part by part as `YYYY`, `MM`, `DD`
pub struct DateInputState {
    date: Option<NaiveDate>,
    /// Value being edited; becomes `date` once any part is accepted
    draft: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(initial: Option<NaiveDate>, draft: NaiveDate) -> Self {
        Self {
            date: initial,
            draft: initial.unwrap_or(draft),
            editing: false,
            date_part: DatePart::Year,
            current_date_input: String::new(),
        }
    }

    pub fn value(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn clear(&mut self) {
        self.date = None;
        self.current_date_input.clear();
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.current_date_input.clear();
        if self.editing {
            self.date_part = DatePart::Year;
        }
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                let complete = match self.date_part {
                    DatePart::Year => self.current_date_input.len() == 4,
                    DatePart::Month | DatePart::Day => self.current_date_input.len() == 2,
                };
                if complete {
                    self.apply_current_part();
                    self.current_date_input.clear();
                    // Accepted parts advance so a full date types straight through
                    if self.date_part != DatePart::Day {
                        self.next_date_part();
                    }
                }
            }
            KeyCode::Backspace => {
                if self.current_date_input.pop().is_none() {
                    self.clear();
                }
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    fn apply_current_part(&mut self) {
        let (year, month, day) = (self.draft.year(), self.draft.month(), self.draft.day());

        let updated = match self.date_part {
            DatePart::Year => self
                .current_date_input
                .parse::<i32>()
                .ok()
                .filter(|y| (1900..=2100).contains(y))
                .and_then(|y| NaiveDate::from_ymd_opt(y, month, day.min(days_in_month(y, month)))),
            DatePart::Month => self
                .current_date_input
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .and_then(|m| NaiveDate::from_ymd_opt(year, m, day.min(days_in_month(year, m)))),
            DatePart::Day => self
                .current_date_input
                .parse::<u32>()
                .ok()
                .filter(|d| (1..=days_in_month(year, month)).contains(d))
                .and_then(|d| NaiveDate::from_ymd_opt(year, month, d)),
        };

        if let Some(date) = updated {
            self.draft = date;
            self.date = Some(date);
        }
    }

    pub fn get_display_string(&self) -> String {
        let Some(date) = self.date.or(self.editing.then_some(self.draft)) else {
            return "Not set".to_string();
        };
        let date_str = date.format("%Y-%m-%d").to_string();
        if !self.editing {
            return date_str;
        }

        let (year, month, day) = (&date_str[0..4], &date_str[5..7], &date_str[8..10]);
        let current_input = if !self.current_date_input.is_empty() {
            format!("[{}]", self.current_date_input)
        } else {
            match self.date_part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        };

        match self.date_part {
            DatePart::Year => format!("{}{}-{}-{}", year, current_input, month, day),
            DatePart::Month => format!("{}-{}{}-{}", year, month, current_input, day),
            DatePart::Day => format!("{}-{}-{}{}", year, month, day, current_input),
        }
    }
}

// Helper function to get the number of days in a month
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            // February: handle leap years
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_starts_unset() {
        let state = DateInputState::new(None, draft());
        assert_eq!(state.value(), None);
        assert_eq!(state.get_display_string(), "Not set");
    }

    #[test]
    fn test_full_date_types_straight_through() {
        let mut state = DateInputState::new(None, draft());
        state.toggle_editing();
        type_digits(&mut state, "19840229");

        assert_eq!(state.value(), NaiveDate::from_ymd_opt(1984, 2, 29));
        assert_eq!(state.date_part, DatePart::Day);
    }

    #[test]
    fn test_invalid_day_is_ignored() {
        let mut state = DateInputState::new(None, draft());
        state.toggle_editing();
        type_digits(&mut state, "19830231");

        assert_eq!(state.value(), NaiveDate::from_ymd_opt(1983, 2, 1));
    }

    #[test]
    fn test_year_change_clamps_leap_day() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(1984, 2, 29), draft());
        state.toggle_editing();
        type_digits(&mut state, "1985");

        assert_eq!(state.value(), NaiveDate::from_ymd_opt(1985, 2, 28));
    }

    #[test]
    fn test_backspace_on_empty_input_clears() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2001, 5, 5), draft());
        state.toggle_editing();
        state.handle_input(KeyCode::Backspace);

        assert_eq!(state.value(), None);
    }

    #[test]
    fn test_input_ignored_unless_editing() {
        let mut state = DateInputState::new(None, draft());
        type_digits(&mut state, "2000");
        assert_eq!(state.value(), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
    }
}
