//! Plain-data description of an error dialog.
//!
//! The host application owns presentation. This module only decides what the
//! dialog says, so every platform shows the same text for the same failure.

use serde::Serialize;

use crate::error::NetworkError;

pub const DEFAULT_TITLE: &str = "Error";
pub const DEFAULT_DONE_BUTTON_TITLE: &str = "OK";

/// A single-button alert for the host to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAlert {
    pub title: String,
    pub message: Option<String>,
    pub done_button_title: String,
}

impl ErrorAlert {
    pub fn new(message: Option<String>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            message,
            done_button_title: DEFAULT_DONE_BUTTON_TITLE.to_string(),
        }
    }

    /// Alert whose message is the error's description.
    pub fn from_error(err: &NetworkError) -> Self {
        Self::new(Some(err.description()))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_done_button_title(mut self, title: impl Into<String>) -> Self {
        self.done_button_title = title.into();
        self
    }
}

impl From<&NetworkError> for ErrorAlert {
    fn from(err: &NetworkError) -> Self {
        Self::from_error(err)
    }
}
