use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse en tidpunkt från en sträng (flexibelt format)
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Försök olika format
    let formats = [
        "%Y-%m-%dT%H:%M:%S", // 2024-12-01T09:00:00
        "%Y-%m-%dT%H:%M",    // 2024-12-01T09:00
        "%Y-%m-%d %H:%M:%S", // 2024-12-01 09:00:00
        "%Y-%m-%d %H:%M",    // 2024-12-01 09:00
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    // Endast datum tolkas som midnatt
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Formatera en tidpunkt för visning
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}
