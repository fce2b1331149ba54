//! State container of the sales analytics dashboard
//!
//! All mutation goes through [`DashboardState::apply`]. Every action touches
//! only the fields of its own section, so completions of concurrent fetches
//! can be applied in any order without clobbering each other.
//!
//! Section results carry the refresh generation they were requested under.
//! Results from before the latest `RefreshStarted` are stale and dropped.

use super::config::DEFAULT_PAGE_SIZE;
use chrono::{DateTime, Utc};
use contracts::dashboards::d405_sales_analytics::{
    CountryRevenuePage, CountryRevenueRow, MonthlySalesRow, PageMeta, SummaryDto, TopProductRow,
    TopRegionRow,
};

/// Independently fetched data section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    CountryRevenue,
    TopProducts,
    MonthlySales,
    TopRegions,
}

impl Section {
    /// Fixed order; also the precedence of error messages
    pub const ALL: [Section; 4] = [
        Section::CountryRevenue,
        Section::TopProducts,
        Section::MonthlySales,
        Section::TopRegions,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::CountryRevenue => "countryRevenue",
            Section::TopProducts => "topProducts",
            Section::MonthlySales => "monthlySales",
            Section::TopRegions => "topRegions",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::CountryRevenue => "country revenue",
            Section::TopProducts => "top products",
            Section::MonthlySales => "monthly sales",
            Section::TopRegions => "top regions",
        }
    }

    pub fn failure_message(self) -> String {
        format!("Failed to load {} data", self.title())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub country_revenue: bool,
    pub top_products: bool,
    pub monthly_sales: bool,
    pub top_regions: bool,
}

impl LoadingState {
    pub fn get(&self, section: Section) -> bool {
        match section {
            Section::CountryRevenue => self.country_revenue,
            Section::TopProducts => self.top_products,
            Section::MonthlySales => self.monthly_sales,
            Section::TopRegions => self.top_regions,
        }
    }

    pub fn set(&mut self, section: Section, loading: bool) {
        let slot = match section {
            Section::CountryRevenue => &mut self.country_revenue,
            Section::TopProducts => &mut self.top_products,
            Section::MonthlySales => &mut self.monthly_sales,
            Section::TopRegions => &mut self.top_regions,
        };
        *slot = loading;
    }

    pub fn any(&self) -> bool {
        Section::ALL.iter().any(|section| self.get(*section))
    }

    pub fn any_other_than(&self, except: Section) -> bool {
        Section::ALL
            .iter()
            .any(|section| *section != except && self.get(*section))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub country_revenue: Option<String>,
    pub top_products: Option<String>,
    pub monthly_sales: Option<String>,
    pub top_regions: Option<String>,
}

impl ErrorState {
    pub fn get(&self, section: Section) -> Option<&str> {
        match section {
            Section::CountryRevenue => self.country_revenue.as_deref(),
            Section::TopProducts => self.top_products.as_deref(),
            Section::MonthlySales => self.monthly_sales.as_deref(),
            Section::TopRegions => self.top_regions.as_deref(),
        }
    }

    pub fn set(&mut self, section: Section, message: Option<String>) {
        let slot = match section {
            Section::CountryRevenue => &mut self.country_revenue,
            Section::TopProducts => &mut self.top_products,
            Section::MonthlySales => &mut self.monthly_sales,
            Section::TopRegions => &mut self.top_regions,
        };
        *slot = message;
    }

    pub fn any(&self) -> bool {
        self.first().is_some()
    }

    /// First error in [`Section::ALL`] order
    pub fn first(&self) -> Option<(Section, &str)> {
        Section::ALL
            .iter()
            .find_map(|section| self.get(*section).map(|message| (*section, message)))
    }
}

/// `page < ceil(total / limit)`
pub fn computed_has_more(page: u32, limit: u32, total: u64) -> bool {
    let limit = u64::from(limit.max(1));
    u64::from(page) < total.div_ceil(limit)
}

/// Pagination of the country revenue list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Last loaded page, 1-based
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_more: bool,
}

impl PaginationState {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            has_more: true,
        }
    }

    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }

    /// Record a fetched page.
    ///
    /// `received` is the size of the page itself, `loaded` the length of the
    /// list after merging. A server-declared `has_more` always wins. Without
    /// any metadata a short page means the list is exhausted.
    pub fn record_page(
        &mut self,
        page: u32,
        limit: u32,
        received: usize,
        loaded: usize,
        meta: &PageMeta,
    ) {
        self.page = page.max(1);
        self.limit = limit.max(1);

        let computed = match (meta.total, meta.total_pages) {
            (Some(total), _) => {
                self.total = total;
                computed_has_more(self.page, self.limit, total)
            }
            (None, Some(total_pages)) => {
                let more = self.page < total_pages;
                // Upper bound until the last page tells the real count
                self.total = if more {
                    (u64::from(total_pages) * u64::from(self.limit)).max(loaded as u64)
                } else {
                    loaded as u64
                };
                more
            }
            (None, None) => {
                self.total = loaded as u64;
                received as u64 >= u64::from(self.limit)
            }
        };
        self.has_more = meta.has_more.unwrap_or(computed);
    }

    /// Share of the list already loaded, in percent
    pub fn loaded_percent(&self, loaded: usize) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some((loaded as f64 / self.total as f64 * 100.0).min(100.0))
    }

    /// Rows the next `load_more` is expected to bring
    pub fn next_batch_size(&self, loaded: usize) -> u64 {
        let limit = u64::from(self.limit);
        if self.total == 0 {
            return limit;
        }
        limit.min(self.total.saturating_sub(loaded as u64))
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Where the displayed summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// `/summary`, authoritative
    Server,
    /// Derived from the `/dashboard` snapshot after `/summary` failed
    Snapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub values: SummaryDto,
    pub source: SummarySource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    /// Append-only across pages, server order (revenue desc)
    pub country_revenue: Vec<CountryRevenueRow>,
    pub top_products: Vec<TopProductRow>,
    pub monthly_sales: Vec<MonthlySalesRow>,
    pub top_regions: Vec<TopRegionRow>,
    pub summary: Option<Summary>,
}

impl DashboardData {
    /// All four sections empty
    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|section| self.section_len(*section) == 0)
    }

    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::CountryRevenue => self.country_revenue.len(),
            Section::TopProducts => self.top_products.len(),
            Section::MonthlySales => self.monthly_sales.len(),
            Section::TopRegions => self.top_regions.len(),
        }
    }

    /// Scalars to display: the summary when one was loaded, otherwise values
    /// derived from whatever section data is present
    pub fn totals(&self) -> SummaryDto {
        match &self.summary {
            Some(summary) => summary.values.clone(),
            None => SummaryDto::from_sections(
                &self.country_revenue,
                &self.top_products,
                &self.monthly_sales,
            ),
        }
    }

    /// Returns false when the summary was rejected: a snapshot-derived
    /// summary never replaces the server one.
    fn apply_summary(&mut self, values: SummaryDto, source: SummarySource) -> bool {
        let has_server_summary = matches!(
            self.summary,
            Some(Summary {
                source: SummarySource::Server,
                ..
            })
        );
        if source == SummarySource::Snapshot && has_server_summary {
            return false;
        }
        self.summary = Some(Summary { values, source });
        true
    }
}

/// Latencies of the last refresh, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timings {
    /// Invocation until all fetches settled, last refresh (failed or not)
    pub api_latency_ms: Option<f64>,
    /// Same, last refresh without section errors
    pub last_api_latency_ms: Option<f64>,
    /// Invocation until the view settled after render
    pub total_render_ms: Option<f64>,
    pub last_total_render_ms: Option<f64>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Full refresh begins: pagination goes back to page 1
    RefreshStarted,
    SectionStarted(Section),
    CountryRevenueLoaded {
        generation: u64,
        page: u32,
        limit: u32,
        append: bool,
        result: CountryRevenuePage,
    },
    TopProductsLoaded(Vec<TopProductRow>),
    MonthlySalesLoaded(Vec<MonthlySalesRow>),
    TopRegionsLoaded(Vec<TopRegionRow>),
    SectionFailed {
        generation: u64,
        section: Section,
        message: String,
    },
    SummaryLoaded {
        summary: SummaryDto,
        source: SummarySource,
    },
    SummaryFailed(String),
    RefreshSettled {
        api_latency_ms: f64,
        finished_at: DateTime<Utc>,
    },
    RenderSettled {
        total_ms: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub data: DashboardData,
    pub loading: LoadingState,
    pub errors: ErrorState,
    pub pagination: PaginationState,
    pub timings: Timings,
    /// A `refresh_all` is in flight
    pub refreshing: bool,
    /// Bumped by every `RefreshStarted`
    pub generation: u64,
    /// Summary and snapshot both failed; not a section error
    pub summary_error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl DashboardState {
    pub fn new(page_size: u32) -> Self {
        Self {
            data: DashboardData::default(),
            loading: LoadingState::default(),
            errors: ErrorState::default(),
            pagination: PaginationState::new(page_size),
            timings: Timings::default(),
            refreshing: false,
            generation: 0,
            summary_error: None,
        }
    }

    /// State before the first refresh has run: renders as loading, not empty
    pub fn awaiting_first_load(page_size: u32) -> Self {
        let mut state = Self::new(page_size);
        for section in Section::ALL {
            state.loading.set(section, true);
        }
        state
    }

    fn is_stale(&self, generation: u64, section: Section) -> bool {
        if generation == self.generation {
            return false;
        }
        log::debug!(
            "Dropping stale {} result (generation {}, current {})",
            section.key(),
            generation,
            self.generation
        );
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading.any()
    }

    /// `load_more` would issue a request
    pub fn can_load_more(&self) -> bool {
        self.pagination.has_more && !self.loading.get(Section::CountryRevenue)
    }

    pub fn apply(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::RefreshStarted => {
                self.refreshing = true;
                self.generation += 1;
                self.pagination = PaginationState::new(self.pagination.limit);
            }
            DashboardAction::SectionStarted(section) => {
                self.loading.set(section, true);
                self.errors.set(section, None);
            }
            DashboardAction::CountryRevenueLoaded {
                generation,
                page,
                limit,
                append,
                result,
            } => {
                if self.is_stale(generation, Section::CountryRevenue) {
                    return;
                }
                let received = result.rows.len();
                if append {
                    self.data.country_revenue.extend(result.rows);
                } else {
                    self.data.country_revenue = result.rows;
                }
                let loaded = self.data.country_revenue.len();
                self.pagination
                    .record_page(page, limit, received, loaded, &result.meta);
                self.loading.set(Section::CountryRevenue, false);
            }
            DashboardAction::TopProductsLoaded(rows) => {
                self.data.top_products = rows;
                self.loading.set(Section::TopProducts, false);
            }
            DashboardAction::MonthlySalesLoaded(rows) => {
                self.data.monthly_sales = rows;
                self.loading.set(Section::MonthlySales, false);
            }
            DashboardAction::TopRegionsLoaded(rows) => {
                self.data.top_regions = rows;
                self.loading.set(Section::TopRegions, false);
            }
            DashboardAction::SectionFailed {
                generation,
                section,
                message,
            } => {
                if self.is_stale(generation, section) {
                    return;
                }
                self.loading.set(section, false);
                self.errors.set(section, Some(message));
            }
            DashboardAction::SummaryLoaded { summary, source } => {
                if self.data.apply_summary(summary, source) {
                    self.summary_error = None;
                } else {
                    log::debug!("Keeping server summary, ignoring {:?} summary", source);
                }
            }
            DashboardAction::SummaryFailed(message) => {
                self.summary_error = Some(message);
            }
            DashboardAction::RefreshSettled {
                api_latency_ms,
                finished_at,
            } => {
                self.refreshing = false;
                self.timings.api_latency_ms = Some(api_latency_ms);
                if !self.errors.any() {
                    self.timings.last_api_latency_ms = Some(api_latency_ms);
                }
                self.timings.refreshed_at = Some(finished_at);
            }
            DashboardAction::RenderSettled { total_ms } => {
                self.timings.total_render_ms = Some(total_ms);
                if !self.errors.any() {
                    self.timings.last_total_render_ms = Some(total_ms);
                }
            }
        }
    }
}
