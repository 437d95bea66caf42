//! Which screen is visible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The screens of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Dashboard,
    Chat,
    Knowledge,
    Tracker,
}

impl ViewState {
    pub const ALL: [ViewState; 4] = [
        ViewState::Dashboard,
        ViewState::Chat,
        ViewState::Knowledge,
        ViewState::Tracker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewState::Dashboard => "dashboard",
            ViewState::Chat => "chat",
            ViewState::Knowledge => "knowledge",
            ViewState::Tracker => "tracker",
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ViewState::ALL
            .into_iter()
            .find(|v| v.name() == lower)
            .ok_or_else(|| CoreError::UnknownView(s.to_string()))
    }
}

/// Tracks the visible screen. Navigation is always user-driven.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    current: ViewState,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ViewState {
        self.current
    }

    pub fn navigate(&mut self, view: ViewState) {
        self.current = view;
    }

    /// The dashboard's "Start Chat" action.
    pub fn start_chat(&mut self) {
        self.current = ViewState::Chat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_view_is_dashboard() {
        assert_eq!(ViewController::new().current(), ViewState::Dashboard);
    }

    #[test]
    fn test_navigation() {
        let mut views = ViewController::new();
        views.navigate(ViewState::Tracker);
        assert_eq!(views.current(), ViewState::Tracker);
        views.start_chat();
        assert_eq!(views.current(), ViewState::Chat);
        views.navigate(ViewState::Dashboard);
        assert_eq!(views.current(), ViewState::Dashboard);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Knowledge".parse::<ViewState>(), Ok(ViewState::Knowledge));
        assert!("settings".parse::<ViewState>().is_err());
    }
}
