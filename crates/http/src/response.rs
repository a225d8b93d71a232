//! Uniform JSON envelope for every bookshelf response.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

/// `{status, message?, data?}` body; absent parts are left out of the JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: ResponseStatus) -> Self {
        Self {
            status,
            message: None,
            data: None,
        }
    }

    /// A success envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self::new(ResponseStatus::Success).data(data)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

impl ApiResponse<()> {
    /// A success envelope with only a message.
    pub fn done(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Success).message(message)
    }
}
