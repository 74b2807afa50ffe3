//! Number formatting for dashboard cards and invoices.

const SCALES: [(f64, &str); 5] = [(1.0, ""), (1e3, "k"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Short human form of a count: `999` → `"999"`, `1500` → `"1.5k"`,
/// `2_500_000` → `"2.5M"`.
///
/// One decimal at most, trailing `.0` dropped. A value that rounds up to the
/// next unit is promoted (`999_990` → `"1M"`, not `"1000k"`).
#[must_use]
pub fn abbreviate_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let abs = value.abs();
    let mut tier = SCALES.iter().rposition(|(scale, _)| abs >= *scale).unwrap_or(0);

    loop {
        let (scale, suffix) = SCALES[tier];
        let rounded = (abs / scale * 10.0).round() / 10.0;
        if rounded >= 1000.0 && tier + 1 < SCALES.len() {
            tier += 1;
            continue;
        }
        if rounded == 0.0 {
            return "0".to_owned();
        }
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{}{suffix}", trim_decimal(rounded));
    }
}

fn trim_decimal(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.1}") }
}

/// Two-decimal amount with thousands separators: `1234.5` → `"1,234.50"`.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_owned();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}
