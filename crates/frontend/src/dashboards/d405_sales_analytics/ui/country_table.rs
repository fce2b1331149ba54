use crate::dashboards::d405_sales_analytics::sections::NavSection;
use crate::dashboards::d405_sales_analytics::state::DashboardState;
use crate::dashboards::d405_sales_analytics::table::{visible_rows, SortField, TableSort, TableStats};
use crate::shared::list_utils::{get_sort_indicator, highlight_matches};
use crate::shared::number_format::{format_money, format_number_int};
use contracts::dashboards::d405_sales_analytics::CountryRevenueRow;
use leptos::prelude::*;
use thaw::*;

#[component]
fn RowDetails(row: CountryRevenueRow, on_close: Callback<()>) -> impl IntoView {
    view! {
        <div class="country-table__details">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <h4>{row.country.clone()}</h4>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                    "Close"
                </Button>
            </Flex>
            <dl>
                <dt>"Product"</dt>
                <dd>{row.product_name.clone()}</dd>
                <dt>"Revenue"</dt>
                <dd>{format_money(row.total_revenue)}</dd>
                <dt>"Transactions"</dt>
                <dd>{format_number_int(row.transaction_count as f64)}</dd>
            </dl>
        </div>
    }
}

/// Paginated country revenue table with client-side search and sort
#[component]
pub fn CountryRevenuePanel(
    state: RwSignal<DashboardState>,
    /// Requests the next page
    on_load_more: Callback<()>,
) -> impl IntoView {
    let search = RwSignal::new(String::new());
    let sort = RwSignal::new(TableSort::default());
    let selected = RwSignal::new(None::<CountryRevenueRow>);

    let rows = Memo::new(move |_| {
        let query = search.get();
        let sort = sort.get();
        state.with(|s| visible_rows(&s.data.country_revenue, &query, sort))
    });
    let stats = Memo::new(move |_| state.with(|s| TableStats::from_rows(&s.data.country_revenue)));

    let progress = move || {
        state.with(|s| {
            let loaded = s.data.country_revenue.len();
            let total = s.pagination.total.max(loaded as u64);
            match s.pagination.loaded_percent(loaded) {
                Some(pct) => format!(
                    "Showing {} of {} records ({:.1}%)",
                    format_number_int(loaded as f64),
                    format_number_int(total as f64),
                    pct
                ),
                None => format!("Showing {} records", format_number_int(loaded as f64)),
            }
        })
    };

    let header_cell = move |field: SortField| {
        let indicator = move || {
            let current = sort.get();
            get_sort_indicator(current.field.key(), field.key(), current.is_ascending())
        };
        let class = if field.is_numeric() {
            "country-table__th country-table__th--numeric"
        } else {
            "country-table__th"
        };
        view! {
            <th class=class on:click=move |_| sort.update(|s| *s = s.toggle(field))>
                {field.label()}
                <span class="country-table__sort">{indicator}</span>
            </th>
        }
    };

    view! {
        <section id=NavSection::CountryRevenue.anchor() class="analytics-panel country-table">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <h3 class="analytics-panel__title">"Revenue by Country"</h3>
                <Input value=search placeholder="Search country or product..." />
            </Flex>

            <div class="analytics-panel__stats">
                {move || {
                    let s = stats.get();
                    view! {
                        <span>{format!("Revenue: {}", format_money(s.total_revenue))}</span>
                        <span>{format!("Transactions: {}", format_number_int(s.total_transactions as f64))}</span>
                        <span>{format!("Countries: {}", s.unique_countries)}</span>
                        <span>{format!("Products: {}", s.unique_products)}</span>
                    }
                }}
            </div>

            <table class="country-table__table">
                <thead>
                    <tr>
                        <th class="country-table__th">"#"</th>
                        {SortField::ALL.into_iter().map(header_cell).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let query = search.get();
                        let rows = rows.get();
                        if rows.is_empty() {
                            return view! {
                                <tr><td colspan="5" class="country-table__empty">"No matching records"</td></tr>
                            }.into_any();
                        }
                        rows.into_iter().enumerate().map(|(index, row)| {
                            let picked = row.clone();
                            view! {
                                <tr class="country-table__row" on:click=move |_| selected.set(Some(picked.clone()))>
                                    <td>{index + 1}</td>
                                    <td>{highlight_matches(&row.country, &query)}</td>
                                    <td>{highlight_matches(&row.product_name, &query)}</td>
                                    <td class="country-table__numeric">{format_money(row.total_revenue)}</td>
                                    <td class="country-table__numeric">{format_number_int(row.transaction_count as f64)}</td>
                                </tr>
                            }
                        }).collect_view().into_any()
                    }}
                </tbody>
            </table>

            {move || selected.get().map(|row| view! {
                <RowDetails row=row on_close=Callback::new(move |_| selected.set(None)) />
            })}

            <div class="country-table__footer">
                <span class="country-table__progress">{progress}</span>
                <Show when=move || state.with(|s| s.pagination.has_more)>
                    <span class="country-table__next">
                        {move || state.with(|s| {
                            format!("Next page: up to {} records", s.pagination.next_batch_size(s.data.country_revenue.len()))
                        })}
                    </span>
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || state.with(|s| !s.can_load_more()))
                        on_click=move |_| on_load_more.run(())
                    >
                        {move || if state.with(|s| s.is_loading_more()) { "Loading..." } else { "Load More" }}
                    </Button>
                </Show>
            </div>
        </section>
    }
}
