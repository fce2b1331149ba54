/// Универсальные утилиты для работы со списками (поиск, сортировка, подсветка)
use leptos::prelude::*;
use std::cmp::Ordering;

/// Trait для типов данных, поддерживающих поиск
pub trait Searchable {
    /// Проверяет, соответствует ли объект поисковому запросу (без учета регистра)
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Пустой или состоящий из пробелов фильтр не фильтрует
pub fn is_filter_active(filter: &str) -> bool {
    !filter.trim().is_empty()
}

/// Подсветка совпадений в тексте (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let filter = filter.trim();
    if filter.is_empty() {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let filter_lower = filter.to_lowercase();
    let text_lower = text.to_lowercase();

    // Смещения в lowercase-строке совпадают с исходной только для ASCII
    if text_lower.len() != text.len() || !text_lower.contains(&filter_lower) {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let mut parts: Vec<AnyView> = Vec::new();
    let mut last_pos = 0;

    while let Some(pos) = text_lower[last_pos..].find(&filter_lower) {
        let actual_pos = last_pos + pos;

        if actual_pos > last_pos {
            parts.push(view! { <span>{text[last_pos..actual_pos].to_string()}</span> }.into_any());
        }

        let match_end = actual_pos + filter_lower.len();
        parts.push(view! {
            <mark class="search-match">{text[actual_pos..match_end].to_string()}</mark>
        }.into_any());

        last_pos = match_end;
    }

    if last_pos < text.len() {
        parts.push(view! { <span>{text[last_pos..].to_string()}</span> }.into_any());
    }

    view! { <>{parts}</> }.into_any()
}

/// Сортирует список по указанному полю (стабильно)
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending { cmp } else { cmp.reverse() }
    });
}

/// Фильтрует список по поисковому запросу
pub fn filter_list<T: Searchable + Clone>(items: &[T], filter: &str) -> Vec<T> {
    if !is_filter_active(filter) {
        return items.to_vec();
    }

    let filter = filter.trim();
    items
        .iter()
        .filter(|item| item.matches_filter(filter))
        .cloned()
        .collect()
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending { " ▲" } else { " ▼" }
    } else {
        " ⇅"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        qty: i32,
    }

    impl Searchable for Item {
        fn matches_filter(&self, filter: &str) -> bool {
            self.name.to_lowercase().contains(&filter.to_lowercase())
        }
    }

    impl Sortable for Item {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "qty" => self.qty.cmp(&other.qty),
                _ => self.name.cmp(other.name),
            }
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { name: "Lamp", qty: 3 },
            Item { name: "Desk", qty: 7 },
            Item { name: "Lampshade", qty: 1 },
        ]
    }

    #[test]
    fn test_filter_list() {
        assert_eq!(filter_list(&items(), "  ").len(), 3);
        let found = filter_list(&items(), " LAMP ");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|i| i.name.starts_with("Lamp")));
    }

    #[test]
    fn test_sort_list() {
        let mut list = items();
        sort_list(&mut list, "qty", false);
        assert_eq!(list.iter().map(|i| i.qty).collect::<Vec<_>>(), vec![7, 3, 1]);

        sort_list(&mut list, "name", true);
        assert_eq!(list[0].name, "Desk");
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("qty", "qty", true), " ▲");
        assert_eq!(get_sort_indicator("qty", "qty", false), " ▼");
        assert_eq!(get_sort_indicator("qty", "name", true), " ⇅");
    }
}
