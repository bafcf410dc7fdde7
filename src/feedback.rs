//! User-visible feedback: toasts and page load state

use std::fmt;

/// An error message raised by a board operation whose local change was
/// undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn error(title: impl Into<String>, description: impl fmt::Display) -> Self {
        Self {
            title: title.into(),
            description: description.to_string(),
        }
    }
}

/// Initial-load status of a page. A failed load keeps its message until the
/// next attempt so it can be shown in a banner with a retry action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
