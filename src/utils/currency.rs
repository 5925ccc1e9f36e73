//! Belopp: formatering och tolkning av inmatade priser

use crate::models::Currency;

/// Valutasymbol för visning
pub fn currency_symbol(currency: Currency) -> &'static str {
    match currency {
        Currency::Usd => "$",
        Currency::Eur => "€",
        Currency::Huf => "Ft",
    }
}

/// Formatera ett belopp med valutasymbol
///
/// Forint visas utan decimaler, övriga valutor med två.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let decimals = match currency {
        Currency::Huf => 0,
        Currency::Usd | Currency::Eur => 2,
    };
    format!("{}{:.*}", currency_symbol(currency), decimals, amount)
}

/// Tolka det inledande talet i en inmatning, t.ex. "12.5 kr" -> 12.5
///
/// Returnerar `None` om inmatningen inte börjar med ett tal.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Tolka ett belopp, med reservvärde för tom, ogiltig eller noll-inmatning
pub fn amount_or(input: &str, fallback: f64) -> f64 {
    match parse_amount(input) {
        Some(v) if v != 0.0 => v,
        _ => fallback,
    }
}
