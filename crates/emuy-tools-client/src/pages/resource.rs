use emuy_client_core::ResponseReceiver;
use emuy_shared::errors::RequestError;
use futures::channel::oneshot;
use tracing::{error, warn};

use crate::ui_helpers::{ui_error_label, ui_loading};

#[derive(Debug)]
pub struct AwaitingType<T>(pub ResponseReceiver<T>);

/// One fetch as seen by a page. Dropping it (closing the page) drops the
/// receiver and the response is discarded when it arrives.
#[derive(Debug, Default)]
pub enum Resource<T> {
    #[default]
    NotRequested,
    Loading(AwaitingType<T>),
    Ready(T),
    Failed(RequestError),
}

impl<T> Resource<T> {
    /// Drives the state machine and returns the data once it is ready
    ///
    /// - [`Resource::NotRequested`] calls `fetch_fn` and starts loading
    /// - [`Resource::Loading`] shows a spinner until the response arrives
    /// - [`Resource::Failed`] shows the error with a retry button (no
    ///   automatic retry)
    pub fn ui_get<F>(
        &mut self,
        ui: &mut egui::Ui,
        retry_msg: Option<&str>,
        fetch_fn: F,
    ) -> Option<&mut T>
    where
        F: FnOnce() -> AwaitingType<T>,
    {
        if self.is_not_requested() {
            *self = Self::Loading(fetch_fn());
        }
        self.poll();
        if let Resource::Failed(e) = self {
            ui_error_label(ui, e);
            if ui.button(retry_msg.unwrap_or("Retry Request")).clicked() {
                *self = Self::NotRequested;
            }
            return None;
        }
        match self {
            Resource::Loading(_) => {
                ui.spinner();
                None
            }
            Resource::Ready(data) => Some(data),
            Resource::NotRequested | Resource::Failed(_) => None,
        }
    }

    /// For requests started by the user instead of on display
    pub fn start(&mut self, rx: ResponseReceiver<T>) {
        *self = Self::Loading(AwaitingType(rx));
    }

    /// For user triggered operations (save, delete, ...). Shows progress and
    /// errors. Yields the result once and goes back to
    /// [`Resource::NotRequested`].
    pub fn ui_operation(&mut self, ui: &mut egui::Ui, in_progress_msg: &str) -> Option<T> {
        self.poll();
        match std::mem::replace(self, Self::NotRequested) {
            Resource::NotRequested => None,
            Resource::Loading(rx) => {
                ui_loading(ui, in_progress_msg);
                *self = Self::Loading(rx);
                None
            }
            Resource::Ready(data) => Some(data),
            Resource::Failed(e) => {
                ui_error_label(ui, &e);
                if !ui.button("Clear Error").clicked() {
                    *self = Self::Failed(e);
                }
                None
            }
        }
    }

    /// Checks for a response without blocking. Returns `true` if this call
    /// moved the resource out of [`Resource::Loading`].
    pub fn poll(&mut self) -> bool {
        let Resource::Loading(rx) = self else {
            return false;
        };
        match Self::await_data(rx) {
            Some(new_state) => {
                *self = new_state;
                true
            }
            None => false,
        }
    }

    fn await_data(rx: &mut AwaitingType<T>) -> Option<Self> {
        Some(match rx.0.try_recv() {
            Ok(Some(Ok(data))) => Resource::Ready(data),
            Ok(Some(Err(e))) => {
                warn!(?e, "Error response received instead of the data");
                Resource::Failed(e)
            }
            Ok(None) => return None,
            Err(oneshot::Canceled) => {
                error!("Response channel closed without sending a result");
                Resource::Failed(RequestError::Transport(
                    "request ended without a response".to_string(),
                ))
            }
        })
    }

    pub fn reset(&mut self) {
        *self = Self::NotRequested;
    }

    #[must_use]
    pub fn is_not_requested(&self) -> bool {
        matches!(self, Self::NotRequested)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(..))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        match self {
            Resource::Failed(e) => Some(e),
            _ => None,
        }
    }
}
