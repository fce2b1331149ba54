use crate::shared::icons::icon;
use crate::shared::number_format::{format_money, format_number_int};
use leptos::prelude::*;

/// How a [`StatCard`] renders its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Money,
    Integer,
}

fn format_value(val: f64, fmt: ValueFormat) -> String {
    match fmt {
        ValueFormat::Money => format_money(val),
        ValueFormat::Integer => format_number_int(val),
    }
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    label: &'static str,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// Primary numeric value (None = not loaded)
    #[prop(into)]
    value: Signal<Option<f64>>,
    format: ValueFormat,
    /// Optional subtitle below the value
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let formatted = move || match value.get() {
        Some(v) => format_value(v, format),
        None => "—".to_string(),
    };

    let subtitle_view = move || {
        subtitle.get().map(|s| {
            view! { <div class="stat-card__subtitle">{s}</div> }
        })
    };

    view! {
        <div class="stat-card">
            <div class="stat-card__icon">
                {icon(icon_name)}
            </div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                {subtitle_view}
            </div>
        </div>
    }
}
