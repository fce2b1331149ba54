//! Sidebar navigation between dashboard sections

use wasm_bindgen::JsCast;

/// Sticky header height plus margin; a section counts as active once its top
/// passes this line
pub const HEADER_OFFSET: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Overview,
    TopProducts,
    MonthlySales,
    TopRegions,
    CountryRevenue,
}

impl NavSection {
    /// Page order
    pub const ALL: [NavSection; 5] = [
        NavSection::Overview,
        NavSection::TopProducts,
        NavSection::MonthlySales,
        NavSection::TopRegions,
        NavSection::CountryRevenue,
    ];

    pub fn anchor(self) -> &'static str {
        match self {
            NavSection::Overview => "overview",
            NavSection::TopProducts => "top-products",
            NavSection::MonthlySales => "monthly-sales",
            NavSection::TopRegions => "top-regions",
            NavSection::CountryRevenue => "country-revenue",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavSection::Overview => "Overview",
            NavSection::TopProducts => "Top Products",
            NavSection::MonthlySales => "Monthly Sales",
            NavSection::TopRegions => "Top Regions",
            NavSection::CountryRevenue => "Country Revenue",
        }
    }
}

/// Last section whose top offset is at or above `scroll_y + HEADER_OFFSET`.
///
/// `offsets` are in page order; sections not rendered are skipped.
pub fn active_section(scroll_y: f64, offsets: &[(NavSection, f64)]) -> NavSection {
    let line = scroll_y + HEADER_OFFSET;
    offsets
        .iter()
        .filter(|(_, top)| *top <= line)
        .last()
        .map(|(section, _)| *section)
        .unwrap_or(NavSection::Overview)
}

/// Top offsets of the sections currently in the document
pub fn measure_offsets() -> Vec<(NavSection, f64)> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    NavSection::ALL
        .iter()
        .filter_map(|section| {
            let element = document.get_element_by_id(section.anchor())?;
            let element = element.dyn_into::<web_sys::HtmlElement>().ok()?;
            Some((*section, f64::from(element.offset_top())))
        })
        .collect()
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

/// Scroll the page so the section sits below the sticky header
pub fn scroll_to(section: NavSection) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let top = measure_offsets()
        .into_iter()
        .find(|(s, _)| *s == section)
        .map(|(_, top)| top);
    match top {
        Some(top) => window.scroll_to_with_x_and_y(0.0, (top - HEADER_OFFSET + 20.0).max(0.0)),
        None => log::debug!("Section #{} is not rendered", section.anchor()),
    }
}
