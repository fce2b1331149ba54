//! PageFrame — standard root wrapper of a dashboard page.
//!
//! Guarantees two metadata attributes on the root DOM element:
//!   - `id`                  — `"{entity}--dashboard"`, e.g. `"d405_sales_analytics--dashboard"`
//!   - `data-page-category`  — always `dashboard` for now
//!
//! Usage:
//! ```ignore
//! view! {
//!     <PageFrame page_id="d405_sales_analytics--dashboard">
//!         <div class="page__header">...</div>
//!         <div class="page__content">...</div>
//!     </PageFrame>
//! }
//! ```

use leptos::prelude::*;

pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--dashboard`
    page_id: &'static str,
    /// Additional CSS classes appended after the base class.
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    let full_class = if class.is_empty() {
        "page page--dashboard".to_string()
    } else {
        format!("page page--dashboard {class}")
    };

    view! {
        <div
            id=page_id
            class=full_class
            data-page-category=PAGE_CAT_DASHBOARD
        >
            {children()}
        </div>
    }
}
