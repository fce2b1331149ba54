use crate::dashboards::d405_sales_analytics::insights::{
    bar_percent, MonthlyInsights, ProductInsights, RegionInsights,
};
use crate::dashboards::d405_sales_analytics::sections::NavSection;
use crate::dashboards::d405_sales_analytics::state::DashboardState;
use crate::shared::number_format::{format_money, format_number_int};
use leptos::prelude::*;

#[component]
fn PanelStat(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="analytics-panel__stat">
            <div class="analytics-panel__stat-label">{label}</div>
            <div class="analytics-panel__stat-value">{value}</div>
        </div>
    }
}

fn no_data(message: &'static str) -> AnyView {
    view! { <div class="analytics-panel__empty">{message}</div> }.into_any()
}

fn bar_row(label: String, title: String, percent: f64, value: String) -> impl IntoView {
    view! {
        <div class="bar-row">
            <span class="bar-row__label" title=title>{label}</span>
            <div class="bar-row__track">
                <div class="bar-row__fill" style=format!("width: {:.1}%;", percent)></div>
            </div>
            <span class="bar-row__value">{value}</span>
        </div>
    }
}

#[component]
pub fn TopProductsPanel(state: RwSignal<DashboardState>) -> impl IntoView {
    let insights =
        Memo::new(move |_| state.with(|s| ProductInsights::from_rows(&s.data.top_products)));

    view! {
        <section id=NavSection::TopProducts.anchor() class="analytics-panel">
            <h3 class="analytics-panel__title">"Top Products"</h3>
            {move || {
                let i = insights.get();
                if i.bars.is_empty() {
                    return no_data("No product data available");
                }
                let max = i.bars.first().map(|b| b.row.purchase_count as f64).unwrap_or(0.0);
                view! {
                    <div class="analytics-panel__stats">
                        <PanelStat label="Products" value=format_number_int(i.total_products as f64) />
                        <PanelStat label="Top Product" value=i.top_product.clone() />
                        <PanelStat label="Avg Purchases" value=format_number_int(i.avg_purchases as f64) />
                    </div>
                    <div class="analytics-panel__bars">
                        {i.bars.into_iter().map(|bar| {
                            let count = bar.row.purchase_count as f64;
                            bar_row(
                                bar.label,
                                format!("{} (stock: {})", bar.row.product_name, bar.row.stock_quantity),
                                bar_percent(count, max),
                                format_number_int(count),
                            )
                        }).collect_view()}
                    </div>
                }.into_any()
            }}
        </section>
    }
}

#[component]
pub fn MonthlySalesPanel(state: RwSignal<DashboardState>) -> impl IntoView {
    let insights =
        Memo::new(move |_| state.with(|s| MonthlyInsights::from_rows(&s.data.monthly_sales)));

    view! {
        <section id=NavSection::MonthlySales.anchor() class="analytics-panel">
            <h3 class="analytics-panel__title">"Monthly Sales"</h3>
            {move || {
                let i = insights.get();
                if i.points.is_empty() {
                    return no_data("No sales data available");
                }
                let max = i.peak_volume;
                view! {
                    <div class="analytics-panel__stats">
                        <PanelStat label="Peak Month" value=i.peak_month.clone().unwrap_or_else(|| "N/A".to_string()) />
                        <PanelStat label="Peak Sales" value=format_number_int(i.peak_volume) />
                        <PanelStat label="Total Revenue" value=format_money(i.total_revenue) />
                        <PanelStat label="Avg Volume" value=format_number_int(i.avg_volume as f64) />
                    </div>
                    <div class="analytics-panel__bars">
                        {i.points.into_iter().map(|point| {
                            let title = format!("Revenue: {}", format_money(point.row.total_sales));
                            bar_row(
                                point.label,
                                title,
                                bar_percent(point.row.sales_volume, max),
                                format_number_int(point.row.sales_volume),
                            )
                        }).collect_view()}
                    </div>
                    <div class="analytics-panel__highlights">
                        {i.top_months.into_iter().enumerate().map(|(rank, point)| view! {
                            <div class="analytics-panel__highlight">
                                <span class="analytics-panel__rank">{format!("#{}", rank + 1)}</span>
                                <span>{point.label}</span>
                                <strong>{format_number_int(point.row.sales_volume)}</strong>
                            </div>
                        }).collect_view()}
                    </div>
                }.into_any()
            }}
        </section>
    }
}

#[component]
pub fn TopRegionsPanel(state: RwSignal<DashboardState>) -> impl IntoView {
    let insights =
        Memo::new(move |_| state.with(|s| RegionInsights::from_rows(&s.data.top_regions)));

    view! {
        <section id=NavSection::TopRegions.anchor() class="analytics-panel">
            <h3 class="analytics-panel__title">"Top Regions"</h3>
            {move || {
                let i = insights.get();
                if i.bars.is_empty() {
                    return no_data("No regional data available");
                }
                let max = i
                    .bars
                    .iter()
                    .map(|b| b.row.total_revenue)
                    .fold(0.0_f64, f64::max);
                view! {
                    <div class="analytics-panel__stats">
                        <PanelStat label="Total Revenue" value=format_money(i.total_revenue) />
                        <PanelStat label="Items Sold" value=format_number_int(i.total_items as f64) />
                        <PanelStat label="Top Region" value=i.top_region.clone() />
                    </div>
                    <div class="analytics-panel__bars">
                        {i.bars.into_iter().map(|bar| {
                            let title = format!("{}: {} items", bar.row.region, bar.row.items_sold);
                            bar_row(
                                bar.label,
                                title,
                                bar_percent(bar.row.total_revenue, max),
                                format_money(bar.row.total_revenue),
                            )
                        }).collect_view()}
                    </div>
                }.into_any()
            }}
        </section>
    }
}
