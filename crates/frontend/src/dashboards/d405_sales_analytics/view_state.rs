use super::state::{DashboardData, DashboardState, ErrorState, LoadingState, Section};

/// What the dashboard shows; exactly one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    /// First section error in fixed section order
    Error(String),
    Empty,
    /// Possibly partial: sections that failed or came back empty are skipped
    Populated,
}

/// Loading beats Error beats Empty beats Populated.
pub fn resolve_view(loading: &LoadingState, errors: &ErrorState, data: &DashboardData) -> ViewState {
    if loading.any() {
        return ViewState::Loading;
    }
    if let Some((_, message)) = errors.first() {
        return ViewState::Error(message.to_string());
    }
    if data.is_empty() {
        return ViewState::Empty;
    }
    ViewState::Populated
}

impl DashboardState {
    pub fn view_state(&self) -> ViewState {
        resolve_view(&self.loading, &self.errors, &self.data)
    }

    /// A `load_more` page is in flight outside of a full refresh
    pub fn is_loading_more(&self) -> bool {
        self.loading.country_revenue && !self.refreshing && !self.data.country_revenue.is_empty()
    }

    /// What the page renders: same as [`Self::view_state`], except that a
    /// page being appended keeps the populated layout mounted.
    pub fn page_view(&self) -> ViewState {
        if self.is_loading_more() && !self.loading.any_other_than(Section::CountryRevenue) {
            return ViewState::Populated;
        }
        self.view_state()
    }
}
