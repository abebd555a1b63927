use crate::error::DataFetchError;

/// State of one asynchronously loaded resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// User-facing failure message
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, DataFetchError>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) => Loadable::Failed(e.user_message().to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    /// True when nothing has been requested yet
    pub fn is_idle(&self) -> bool {
        matches!(self, Loadable::Idle)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Identifies the view a fetch was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Monotonic counter advanced on every navigation.
#[derive(Debug, Default)]
pub struct ViewEpoch(u64);

impl ViewEpoch {
    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn ticket(&self) -> FetchTicket {
        FetchTicket(self.0)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.0 == ticket.0
    }
}
