//! Утилиты форматирования чисел для карточек и таблиц

/// Форматирует число с разделителем тысяч (запятая) и указанным количеством знаков после точки
///
/// # Примеры
///
/// ```
/// use sales_analytics_frontend::shared::number_format::format_number_with_decimals;
///
/// let formatted = format_number_with_decimals(1234.567, 2);
/// assert_eq!(formatted, "1,234.57");
/// ```
pub fn format_number_with_decimals(value: f64, decimals: u8) -> String {
    let formatted = format!("{:.prec$}", value, prec = usize::from(decimals.min(6)));

    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };

    // Вставляем запятые каждые 3 цифры с конца целой части
    let mut result = String::new();
    let chars: Vec<char> = integer_part.chars().rev().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 && *c != '-' {
            result.push(',');
        }
        result.push(*c);
    }

    let formatted_integer = result.chars().rev().collect::<String>();

    match decimal_part {
        Some(d) => format!("{}.{}", formatted_integer, d),
        None => formatted_integer,
    }
}

/// Денежное значение: 2 знака после точки и знак доллара
///
/// # Примеры
///
/// ```
/// use sales_analytics_frontend::shared::number_format::format_money;
///
/// let formatted = format_money(1234567.891);
/// assert_eq!(formatted, "$1,234,567.89");
/// ```
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_number_with_decimals(-value, 2))
    } else {
        format!("${}", format_number_with_decimals(value, 2))
    }
}

/// Целое число с разделителем тысяч
pub fn format_number_int(value: f64) -> String {
    format_number_with_decimals(value, 0)
}
