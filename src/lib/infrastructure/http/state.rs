//! Application state module

use std::{fmt, sync::Arc};

use crate::domain::contact::ContactService;

/// Global application state
#[derive(Clone)]
pub struct AppState<C: ContactService> {
    /// Contact request service
    pub contacts: Arc<C>,
}

impl<C> AppState<C>
where
    C: ContactService,
{
    /// Create a new application state
    pub fn new(contacts: C) -> Self {
        Self {
            contacts: Arc::new(contacts),
        }
    }
}

impl<C> fmt::Debug for AppState<C>
where
    C: ContactService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("contacts", &"ContactService")
            .finish()
    }
}
