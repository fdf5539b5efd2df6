use ratatui::widgets::ListState;

use crate::page::Page;

// ============================================================================
// DASHBOARD APP STATE
// ============================================================================

pub struct AppState {
    pub page: Page,
    pub event_list: ListState,
    pub should_quit: bool,
    pub refresh_requested: bool,
    pub seen_generation: u64,
}

impl AppState {
    pub fn new() -> Self {
        let mut state = Self {
            page: Page::new(),
            event_list: ListState::default(),
            should_quit: false,
            refresh_requested: false,
            seen_generation: 0,
        };
        state.event_list.select(Some(0));
        state
    }

    pub fn next_event(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        let i = self
            .event_list
            .selected()
            .map(|i| if i >= max - 1 { 0 } else { i + 1 })
            .unwrap_or(0);
        self.event_list.select(Some(i));
    }

    pub fn previous_event(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        let i = self
            .event_list
            .selected()
            .map(|i| if i == 0 { max - 1 } else { i - 1 })
            .unwrap_or(0);
        self.event_list.select(Some(i));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
