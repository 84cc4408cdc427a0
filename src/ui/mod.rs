use rust_decimal::Decimal;

pub mod dashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Allocation,
    Performance,
    Notes,
    Log,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Allocation => "Allocation",
            Tab::Performance => "Performance",
            Tab::Notes => "Notes",
            Tab::Log => "Log",
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Allocation, Tab::Performance, Tab::Notes, Tab::Log]
    }

    pub fn index(self) -> usize {
        Tab::all().iter().position(|&t| t == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingNote,
}

pub struct UIState {
    pub view: View,
    pub current_tab: Tab,
    pub selected_client: usize,
    pub months: usize,
    pub show_download: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub note_draft: String,
    pub status: Option<String>,
    pub error: Option<String>,
    pub scroll_offset: u16,
}

impl UIState {
    pub fn new(months: usize) -> Self {
        Self {
            view: View::Landing,
            current_tab: Tab::Overview,
            selected_client: 0,
            months,
            show_download: false,
            show_help: false,
            input_mode: InputMode::Normal,
            note_draft: String::new(),
            status: None,
            error: None,
            scroll_offset: 0,
        }
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        self.current_tab = tabs[(self.current_tab.index() + 1) % tabs.len()];
        self.scroll_offset = 0;
    }

    pub fn previous_tab(&mut self) {
        let tabs = Tab::all();
        self.current_tab = tabs[(self.current_tab.index() + tabs.len() - 1) % tabs.len()];
        self.scroll_offset = 0;
    }

    pub fn next_client(&mut self, client_count: usize) {
        if client_count > 0 {
            self.selected_client = (self.selected_client + 1) % client_count;
        }
    }

    pub fn previous_client(&mut self, client_count: usize) {
        if client_count > 0 {
            self.selected_client = (self.selected_client + client_count - 1) % client_count;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

/// `₹ 1,234.50` style: thousands separators and two decimals.
pub fn format_currency(value: Decimal) -> String {
    format!("₹ {}", group_thousands(value))
}

pub fn group_thousands(value: Decimal) -> String {
    let rendered = format!("{:.2}", value.round_dp(2).abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.round_dp(2).is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tabs_wrap_in_both_directions() {
        let mut state = UIState::new(12);
        state.previous_tab();
        assert_eq!(state.current_tab, Tab::Log);
        state.next_tab();
        state.next_tab();
        assert_eq!(state.current_tab, Tab::Allocation);
    }

    #[test]
    fn client_selection_wraps() {
        let mut state = UIState::new(12);
        state.previous_client(3);
        assert_eq!(state.selected_client, 2);
        state.next_client(3);
        assert_eq!(state.selected_client, 0);
        state.next_client(0);
        assert_eq!(state.selected_client, 0);
    }

    #[test]
    fn scroll_never_underflows() {
        let mut state = UIState::new(12);
        state.scroll_up();
        assert_eq!(state.scroll_offset, 0);
        state.scroll_down();
        assert_eq!(state.scroll_offset, 1);
    }

    #[test]
    fn currency_is_grouped_with_two_decimals() {
        assert_eq!(format_currency(dec!(280)), "₹ 280.00");
        assert_eq!(format_currency(dec!(1234.5)), "₹ 1,234.50");
        assert_eq!(format_currency(dec!(1234567.891)), "₹ 1,234,567.89");
        assert_eq!(group_thousands(dec!(-1000)), "-1,000.00");
        assert_eq!(group_thousands(dec!(0)), "0.00");
    }
}
