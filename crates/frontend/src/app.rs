use crate::dashboards::SalesAnalyticsDashboard;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <SalesAnalyticsDashboard />
    }
}
