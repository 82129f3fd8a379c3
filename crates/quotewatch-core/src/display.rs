//! Formatting used by views. Statement metrics stay decimal strings until
//! they reach one of these functions.

/// `$X.XXB` from one billion, `$X.XXM` from one million, otherwise a grouped
/// dollar amount with up to three decimals. Unparseable input reads as zero.
pub fn format_currency(raw: &str) -> String {
    let value = parse_decimal(raw);
    if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format!("${}", group_thousands(value))
    }
}

pub fn format_eps(raw: &str) -> String {
    format!("${:.2}", parse_decimal(raw))
}

pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Implied volatility as a percentage, or `N/A` when unknown.
pub fn format_implied_volatility(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("N/A"), |iv| format_percent(iv * 100.0))
}

pub fn format_volume(value: u64) -> String {
    group_digits(&value.to_string())
}

fn parse_decimal(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn group_thousands(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let millis = (value.abs() * 1_000.0).round() as u64;
    let whole = group_digits(&(millis / 1_000).to_string());
    let fraction = millis % 1_000;

    if fraction == 0 {
        format!("{sign}{whole}")
    } else {
        let digits = format!("{fraction:03}");
        format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
