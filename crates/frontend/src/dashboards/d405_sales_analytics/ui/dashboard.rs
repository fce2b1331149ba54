use super::charts::{MonthlySalesPanel, TopProductsPanel, TopRegionsPanel};
use super::country_table::CountryRevenuePanel;
use crate::dashboards::d405_sales_analytics::api::HttpDashboardApi;
use crate::dashboards::d405_sales_analytics::config::AnalyticsConfig;
use crate::dashboards::d405_sales_analytics::loader::DashboardLoader;
use crate::dashboards::d405_sales_analytics::sections::{
    active_section, measure_offsets, scroll_to, scroll_y, NavSection,
};
use crate::dashboards::d405_sales_analytics::state::{DashboardState, SummarySource};
use crate::dashboards::d405_sales_analytics::view_state::ViewState;
use crate::shared::components::stat_card::{StatCard, ValueFormat};
use crate::shared::date_utils::{format_loading_time, format_timestamp};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;

type Loader = DashboardLoader<HttpDashboardApi, RwSignal<DashboardState>>;

/// Sales analytics dashboard component
#[component]
pub fn SalesAnalyticsDashboard() -> impl IntoView {
    let config = AnalyticsConfig::from_env();
    log::info!("Sales analytics API: {}", config.api_base);

    let state = RwSignal::new(DashboardState::awaiting_first_load(config.page_size));
    let api = HttpDashboardApi::new(config.api_base.clone());
    // Loader is not Send, store locally
    let loader = StoredValue::new_local(Rc::new(Loader::new(api, state, config)));

    let refresh = Callback::new(move |_: ()| {
        if state.with_untracked(|s| s.refreshing) {
            log::debug!("Refresh already in flight");
            return;
        }
        let loader = loader.get_value();
        spawn_local(async move {
            loader.refresh_all().await;
        });
    });

    let load_more = Callback::new(move |_: ()| {
        let loader = loader.get_value();
        spawn_local(async move {
            loader.load_more().await;
        });
    });

    // Initial load on mount
    Effect::new(move |_| refresh.run(()));

    let active = RwSignal::new(NavSection::Overview);
    let scroll_handle = window_event_listener(leptos::ev::scroll, move |_| {
        active.set(active_section(scroll_y(), &measure_offsets()));
    });
    on_cleanup(move || scroll_handle.remove());

    // Rebuild the layout only when the view state itself changes
    let page_view = Memo::new(move |_| state.with(|s| s.page_view()));

    view! {
        <PageFrame page_id="d405_sales_analytics--dashboard">
            {move || match page_view.get() {
                ViewState::Loading => view! { <LoadingView state=state /> }.into_any(),
                ViewState::Error(message) => view! {
                    <ErrorView state=state message=message on_retry=refresh />
                }.into_any(),
                ViewState::Empty => view! { <EmptyView on_refresh=refresh /> }.into_any(),
                ViewState::Populated => view! {
                    <div class="analytics-layout">
                        <Sidebar active=active />
                        <main class="analytics-layout__main">
                            <DashboardHeader state=state on_refresh=refresh />
                            <Overview state=state />
                            <TopProductsPanel state=state />
                            <MonthlySalesPanel state=state />
                            <TopRegionsPanel state=state />
                            <CountryRevenuePanel state=state on_load_more=load_more />
                        </main>
                    </div>
                }.into_any(),
            }}
        </PageFrame>
    }
}

#[component]
fn LoadingView(state: RwSignal<DashboardState>) -> impl IntoView {
    view! {
        <div class="analytics-state analytics-state--loading">
            <Spinner />
            <h2>"Loading Dashboard"</h2>
            <p>"Fetching sales analytics..."</p>
            {move || state.with(|s| s.timings.api_latency_ms).map(|ms| view! {
                <span class="timing-badge">
                    {icon("clock")}
                    {format!("API Response: {}", format_loading_time(ms))}
                </span>
            })}
        </div>
    }
}

#[component]
fn ErrorView(
    state: RwSignal<DashboardState>,
    message: String,
    on_retry: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="analytics-state analytics-state--error">
            {icon("alert")}
            <h2>"Error Loading Dashboard"</h2>
            <p>{message}</p>
            {move || state.with(|s| s.timings.api_latency_ms).map(|ms| view! {
                <span class="timing-badge timing-badge--error">
                    {format!("Failed after: {}", format_loading_time(ms))}
                </span>
            })}
            <Button appearance=ButtonAppearance::Primary on_click=move |_| on_retry.run(())>
                "Try Again"
            </Button>
        </div>
    }
}

#[component]
fn EmptyView(on_refresh: Callback<()>) -> impl IntoView {
    view! {
        <div class="analytics-state analytics-state--empty">
            {icon("empty")}
            <h2>"No Data Available"</h2>
            <p>"The analytics API returned no records."</p>
            <Button appearance=ButtonAppearance::Primary on_click=move |_| on_refresh.run(())>
                "Refresh Data"
            </Button>
        </div>
    }
}

#[component]
fn Sidebar(active: RwSignal<NavSection>) -> impl IntoView {
    view! {
        <nav class="analytics-sidebar">
            {NavSection::ALL.into_iter().map(|section| {
                let class = move || {
                    if active.get() == section {
                        "analytics-sidebar__item analytics-sidebar__item--active"
                    } else {
                        "analytics-sidebar__item"
                    }
                };
                view! {
                    <a
                        class=class
                        href=format!("#{}", section.anchor())
                        on:click=move |ev| {
                            ev.prevent_default();
                            active.set(section);
                            scroll_to(section);
                        }
                    >
                        {section.label()}
                    </a>
                }
            }).collect_view()}
        </nav>
    }
}

#[component]
fn DashboardHeader(state: RwSignal<DashboardState>, on_refresh: Callback<()>) -> impl IntoView {
    let timing = move |label: &'static str, ms: Option<f64>| {
        ms.map(|ms| view! {
            <span class="timing-badge">
                {icon("clock")}
                {format!("{}: {}", label, format_loading_time(ms))}
            </span>
        })
    };

    view! {
        <div class="page__header analytics-header">
            <div>
                <h2 class="page__title">"Sales Analytics"</h2>
                <div class="analytics-header__meta">
                    {move || state.with(|s| s.data.summary.as_ref().and_then(|summary| summary.values.last_updated_at()))
                        .map(|at| view! { <span>{format!("Data updated: {}", format_timestamp(&at))}</span> })}
                    {move || state.with(|s| s.timings.refreshed_at)
                        .map(|at| view! { <span>{format!("Refreshed: {}", format_timestamp(&at))}</span> })}
                </div>
            </div>
            <Flex align=FlexAlign::Center gap=FlexGap::Small>
                {move || timing("API", state.with(|s| s.timings.last_api_latency_ms))}
                {move || timing("Total", state.with(|s| s.timings.last_total_render_ms))}
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || state.with(|s| s.refreshing))
                    on_click=move |_| on_refresh.run(())
                >
                    {icon("refresh")}
                    " Refresh"
                </Button>
            </Flex>
        </div>
    }
}

#[component]
fn Overview(state: RwSignal<DashboardState>) -> impl IntoView {
    let totals = Memo::new(move |_| state.with(|s| s.data.totals()));
    let partial_note = Signal::derive(move || {
        state.with(|s| match s.data.summary.as_ref().map(|summary| summary.source) {
            Some(SummarySource::Server) => None,
            Some(SummarySource::Snapshot) => Some("From dashboard snapshot".to_string()),
            None => Some("Loaded pages only".to_string()),
        })
    });

    view! {
        <section id=NavSection::Overview.anchor() class="analytics-overview">
            <StatCard
                label="Total Revenue"
                icon_name="revenue"
                value=Signal::derive(move || Some(totals.get().total_revenue))
                format=ValueFormat::Money
                subtitle=partial_note
            />
            <StatCard
                label="Total Records"
                icon_name="records"
                value=Signal::derive(move || Some(totals.get().total_records as f64))
                format=ValueFormat::Integer
            />
            <StatCard
                label="Countries"
                icon_name="globe"
                value=Signal::derive(move || Some(totals.get().total_countries as f64))
                format=ValueFormat::Integer
            />
            <StatCard
                label="Products"
                icon_name="products"
                value=Signal::derive(move || Some(totals.get().total_products as f64))
                format=ValueFormat::Integer
            />
            <StatCard
                label="Months"
                icon_name="calendar"
                value=Signal::derive(move || Some(totals.get().months_covered as f64))
                format=ValueFormat::Integer
            />
            {move || state.with(|s| s.summary_error.clone()).map(|err| view! {
                <div class="alert alert--warning">{err}</div>
            })}
        </section>
    }
}
