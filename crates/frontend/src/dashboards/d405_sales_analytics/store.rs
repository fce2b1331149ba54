use super::state::{DashboardAction, DashboardState};
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Holder of the dashboard state that fetchers write into
#[async_trait(?Send)]
pub trait DashboardStore {
    /// Merge an action into the current state. Dropped silently once the
    /// owning view is gone.
    fn dispatch(&self, action: DashboardAction);

    /// `None` once the owning view is gone
    fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> Option<R>;

    fn is_live(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    /// Resolves after the rendering layer had `slack_ms` to flush
    async fn flushed(&self, slack_ms: u32);
}

/// Store of the mounted Leptos view
#[async_trait(?Send)]
impl DashboardStore for RwSignal<DashboardState> {
    fn dispatch(&self, action: DashboardAction) {
        if self.try_update(|state| state.apply(action)).is_none() {
            log::debug!("Dashboard view is disposed, dropping update");
        }
    }

    fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }

    async fn flushed(&self, slack_ms: u32) {
        TimeoutFuture::new(slack_ms).await;
    }
}

/// Plain in-memory store, usable outside a reactive runtime
#[derive(Clone, Default)]
pub struct LocalStore {
    state: Rc<RefCell<DashboardState>>,
    torn_down: Rc<Cell<bool>>,
}

impl LocalStore {
    pub fn new(state: DashboardState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            torn_down: Rc::new(Cell::new(false)),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Simulates the view being unmounted
    pub fn tear_down(&self) {
        self.torn_down.set(true);
    }
}

#[async_trait(?Send)]
impl DashboardStore for LocalStore {
    fn dispatch(&self, action: DashboardAction) {
        if self.torn_down.get() {
            return;
        }
        self.state.borrow_mut().apply(action);
    }

    fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> Option<R> {
        if self.torn_down.get() {
            return None;
        }
        Some(f(&self.state.borrow()))
    }

    async fn flushed(&self, _slack_ms: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d405_sales_analytics::state::Section;

    #[test]
    fn test_local_store_drops_updates_after_tear_down() {
        let store = LocalStore::new(DashboardState::new(50));
        store.dispatch(DashboardAction::SectionStarted(Section::TopRegions));
        assert_eq!(store.read(|s| s.is_loading()), Some(true));

        store.tear_down();
        store.dispatch(DashboardAction::SectionFailed {
            generation: 0,
            section: Section::TopRegions,
            message: "late".to_string(),
        });

        assert!(!store.is_live());
        assert_eq!(store.snapshot().errors.get(Section::TopRegions), None);
    }
}
