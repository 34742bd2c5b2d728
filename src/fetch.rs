//! Page fetch scopes and the datasets they fill.
//!
//! Entering a page bumps the scope generation. Every request is issued with the ticket of
//! the visit that started it; a result carrying an older ticket belongs to a page the
//! operator already left and is dropped.

use crate::error::ApiResult;
use crate::guard::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub route: Route,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct ViewScope {
    current: Option<FetchTicket>,
    generation: u64,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new visit of `route`, retiring every ticket handed out before.
    pub fn enter(&mut self, route: Route) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        let ticket = FetchTicket { route, generation: self.generation };
        self.current = Some(ticket);
        ticket
    }

    /// Leave the current page without entering another one.
    pub fn retire(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.current = None;
    }

    pub fn current(&self) -> Option<FetchTicket> {
        self.current
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.current == Some(ticket)
    }
}

/// A page dataset. Sample data stands in only for a failed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset<T> {
    Loading,
    Live(T),
    Fallback(T),
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Dataset::Loading
    }
}

impl<T> Dataset<T> {
    pub fn resolve(result: ApiResult<T>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(data) => Dataset::Live(data),
            Err(_) => Dataset::Fallback(fallback()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Dataset::Loading => None,
            Dataset::Live(data) | Dataset::Fallback(data) => Some(data),
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Dataset::Loading => None,
            Dataset::Live(data) | Dataset::Fallback(data) => Some(data),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Dataset::Loading)
    }

    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Dataset::Fallback(_))
    }
}
