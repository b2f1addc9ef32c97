//! Backend-to-UI events and error modeling for the desktop GUI controller.

use client_core::{CompletedLookup, LookupTicket};

use crate::media::PreviewImage;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    LookupCompleted(CompletedLookup),
    FlagLoaded {
        ticket: LookupTicket,
        image: PreviewImage,
    },
    FlagFailed {
        ticket: LookupTicket,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
    FlagDownload,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("decode")
            || message_lower.contains("format")
            || message_lower.contains("unsupported")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("timed out")
            || message_lower.contains("connect")
            || message_lower.contains("queue")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Decode => "Image",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
