//! Section fetchers, pagination and the aggregate refresh of the dashboard

use super::api::{DashboardApi, FetchError};
use super::config::AnalyticsConfig;
use super::state::{DashboardAction, Section, SummarySource};
use super::store::DashboardStore;
use chrono::{DateTime, Utc};
use contracts::dashboards::d405_sales_analytics::{CountryRevenuePage, CountryRevenueQuery};
use std::future::Future;

/// Result of [`DashboardLoader::load_more`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// Nothing more to load, or a page request is already in flight
    Skipped,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshReport {
    pub api_latency_ms: f64,
    pub total_render_ms: f64,
    pub failed_sections: usize,
}

pub struct DashboardLoader<A, S> {
    api: A,
    store: S,
    config: AnalyticsConfig,
}

fn elapsed_ms(started: DateTime<Utc>) -> f64 {
    let elapsed = Utc::now() - started;
    elapsed
        .num_microseconds()
        .map(|us| us as f64 / 1000.0)
        .unwrap_or_else(|| elapsed.num_milliseconds() as f64)
}

impl<A: DashboardApi, S: DashboardStore> DashboardLoader<A, S> {
    pub fn new(api: A, store: S, config: AnalyticsConfig) -> Self {
        Self { api, store, config }
    }

    /// Refresh generation a fetch starting now belongs to
    fn generation(&self) -> u64 {
        self.store.read(|state| state.generation).unwrap_or_default()
    }

    /// Fetch one page of the country revenue list and replace or append it
    pub async fn fetch_country_revenue(&self, page: u32, limit: u32, append: bool) -> bool {
        let section = Section::CountryRevenue;
        let generation = self.generation();
        self.store.dispatch(DashboardAction::SectionStarted(section));

        let query = self.config.country_query(page, limit);
        match self.request_country_revenue(&query).await {
            Ok(result) => {
                log::debug!(
                    "Loaded country revenue page {} ({} rows, append={})",
                    query.page,
                    result.rows.len(),
                    append
                );
                self.store.dispatch(DashboardAction::CountryRevenueLoaded {
                    generation,
                    page: query.page,
                    limit: query.limit,
                    append,
                    result,
                });
                true
            }
            Err(err) => {
                self.fail(section, generation, &err);
                false
            }
        }
    }

    /// A sorted request that fails is retried once without sort parameters
    async fn request_country_revenue(
        &self,
        query: &CountryRevenueQuery,
    ) -> Result<CountryRevenuePage, FetchError> {
        match self.api.country_revenue(query).await {
            Err(err) if query.is_sorted() => {
                log::warn!(
                    "Sorted country revenue request failed ({}), retrying without sort",
                    err
                );
                self.api.country_revenue(&query.without_sort()).await
            }
            result => result,
        }
    }

    pub async fn fetch_top_products(&self) -> bool {
        self.fetch_list(
            Section::TopProducts,
            self.api.top_products(),
            DashboardAction::TopProductsLoaded,
        )
        .await
    }

    pub async fn fetch_monthly_sales(&self) -> bool {
        self.fetch_list(
            Section::MonthlySales,
            self.api.monthly_sales(),
            DashboardAction::MonthlySalesLoaded,
        )
        .await
    }

    pub async fn fetch_top_regions(&self) -> bool {
        self.fetch_list(
            Section::TopRegions,
            self.api.top_regions(),
            DashboardAction::TopRegionsLoaded,
        )
        .await
    }

    async fn fetch_list<T>(
        &self,
        section: Section,
        request: impl Future<Output = Result<T, FetchError>>,
        loaded: impl FnOnce(T) -> DashboardAction,
    ) -> bool {
        let generation = self.generation();
        self.store.dispatch(DashboardAction::SectionStarted(section));
        match request.await {
            Ok(rows) => {
                self.store.dispatch(loaded(rows));
                true
            }
            Err(err) => {
                self.fail(section, generation, &err);
                false
            }
        }
    }

    fn fail(&self, section: Section, generation: u64, err: &FetchError) {
        log::error!("Failed to load {}: {}", section.key(), err);
        self.store.dispatch(DashboardAction::SectionFailed {
            generation,
            section,
            message: section.failure_message(),
        });
    }

    /// Scalar totals; falls back to the `/dashboard` snapshot when
    /// `/summary` fails
    pub async fn fetch_summary(&self) -> bool {
        let err = match self.api.summary().await {
            Ok(summary) => {
                self.store.dispatch(DashboardAction::SummaryLoaded {
                    summary,
                    source: SummarySource::Server,
                });
                return true;
            }
            Err(err) => err,
        };

        log::warn!("Summary request failed ({}), deriving totals from snapshot", err);
        match self.api.snapshot().await {
            Ok(snapshot) => {
                self.store.dispatch(DashboardAction::SummaryLoaded {
                    summary: snapshot.derive_summary(),
                    source: SummarySource::Snapshot,
                });
                true
            }
            Err(fallback_err) => {
                log::error!("Failed to load summary: {}", fallback_err);
                self.store.dispatch(DashboardAction::SummaryFailed(format!(
                    "Failed to load summary: {}",
                    err
                )));
                false
            }
        }
    }

    /// Reload everything: summary and the four sections run concurrently and
    /// every one of them settles on its own; no failure cuts the others short.
    pub async fn refresh_all(&self) -> RefreshReport {
        let started = Utc::now();
        self.store.dispatch(DashboardAction::RefreshStarted);

        let page_size = self.config.page_size;
        let (_, country_revenue, top_products, monthly_sales, top_regions) = futures::join!(
            self.fetch_summary(),
            self.fetch_country_revenue(1, page_size, false),
            self.fetch_top_products(),
            self.fetch_monthly_sales(),
            self.fetch_top_regions(),
        );

        let api_latency_ms = elapsed_ms(started);
        let failed_sections = [country_revenue, top_products, monthly_sales, top_regions]
            .iter()
            .filter(|ok| !**ok)
            .count();
        self.store.dispatch(DashboardAction::RefreshSettled {
            api_latency_ms,
            finished_at: Utc::now(),
        });

        if self.store.is_live() {
            self.store.flushed(self.config.render_slack_ms).await;
        }
        let total_render_ms = elapsed_ms(started);
        self.store.dispatch(DashboardAction::RenderSettled {
            total_ms: total_render_ms,
        });

        log::info!(
            "Dashboard refreshed: api {:.0}ms, total {:.0}ms, {} section(s) failed",
            api_latency_ms,
            total_render_ms,
            failed_sections
        );

        RefreshReport {
            api_latency_ms,
            total_render_ms,
            failed_sections,
        }
    }

    /// Append the next country revenue page.
    ///
    /// No-op while the section is loading or when the server has nothing
    /// more. A failed page leaves pagination as it was, so calling again
    /// retries the same page.
    pub async fn load_more(&self) -> LoadMoreOutcome {
        let next = self
            .store
            .read(|state| {
                state
                    .can_load_more()
                    .then(|| (state.pagination.next_page(), state.pagination.limit))
            })
            .flatten();

        let Some((page, limit)) = next else {
            log::debug!("load_more skipped");
            return LoadMoreOutcome::Skipped;
        };

        if self.fetch_country_revenue(page, limit, true).await {
            LoadMoreOutcome::Loaded
        } else {
            LoadMoreOutcome::Failed
        }
    }
}
