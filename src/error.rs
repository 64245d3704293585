use thiserror::Error;

/// Errors arising from reading fields out of a notification frame.
///
/// These never escape [`Message::decode`](crate::Message::decode), which
/// degrades to `Message::Unknown` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("empty frame")]
    EmptyFrame,

    #[error("frame too short for {field}: need {need} bytes, got {got}")]
    PayloadTooShort {
        field: &'static str,
        need: usize,
        got: usize,
    },
}

impl WireError {
    pub(crate) fn payload_too_short(field: &'static str, need: usize, got: usize) -> Self {
        Self::PayloadTooShort { field, need, got }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
