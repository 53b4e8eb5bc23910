use crate::model::Phase;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ratatui::style::Color;

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Signed whole days between `now` and midnight of `date`, rounded up.
/// Today counts as 0 until midnight passes, yesterday as -1.
pub fn days_until(now: NaiveDateTime, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    let seconds = (midnight - now).num_seconds();
    (seconds + 86_399).div_euclid(86_400)
}

pub fn days_until_label(days: i64) -> String {
    if days < 0 {
        format!("{} days ago", -days)
    } else {
        format!("{} days left", days)
    }
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn status_color(status: &str) -> Color {
    match status {
        "Em andamento" | "Concluído" => Color::Green,
        "Planejamento" => Color::Yellow,
        _ => Color::Cyan,
    }
}

pub fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Teaser => Color::Magenta,
        Phase::Countdown => Color::Blue,
        Phase::Event => Color::Yellow,
        Phase::Thanks => Color::Green,
        Phase::Impact => Color::DarkGray,
    }
}

pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::date;

    #[test]
    fn formats_dates_day_first() {
        assert_eq!(format_date(date(2025, 9, 12)), "12/09/2025");
        assert_eq!(format_date(date(2026, 1, 3)), "03/01/2026");
    }

    #[test]
    fn days_until_rounds_up_to_the_next_midnight() {
        let now = date(2025, 9, 10).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(days_until(now, date(2025, 9, 10)), 0);
        assert_eq!(days_until(now, date(2025, 9, 11)), 1);
        assert_eq!(days_until(now, date(2025, 9, 12)), 2);
    }

    #[test]
    fn days_until_is_negative_for_past_dates() {
        let now = date(2025, 9, 10).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(days_until(now, date(2025, 9, 9)), -1);
        assert_eq!(days_until(now, date(2025, 9, 1)), -9);
    }

    #[test]
    fn days_until_at_exact_midnight() {
        let midnight = date(2025, 9, 10).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(days_until(midnight, date(2025, 9, 10)), 0);
        assert_eq!(days_until(midnight, date(2025, 9, 11)), 1);
        let just_before = date(2025, 9, 9).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(days_until(just_before, date(2025, 9, 10)), 1);
    }

    #[test]
    fn labels_past_and_future_day_counts() {
        assert_eq!(days_until_label(-3), "3 days ago");
        assert_eq!(days_until_label(0), "0 days left");
        assert_eq!(days_until_label(12), "12 days left");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(18_250), "18.250");
        assert_eq!(format_count(342_800), "342.800");
        assert_eq!(format_count(1_234_567), "1.234.567");
    }

    #[test]
    fn maps_status_to_style() {
        assert_eq!(status_color("Em andamento"), Color::Green);
        assert_eq!(status_color("Concluído"), Color::Green);
        assert_eq!(status_color("Planejamento"), Color::Yellow);
        assert_eq!(status_color("Pré-produção"), Color::Cyan);
        assert_eq!(status_color("qualquer outra coisa"), Color::Cyan);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#1FB8CD"), Some(Color::Rgb(31, 184, 205)));
        assert_eq!(parse_hex_color("#9B59B6"), Some(Color::Rgb(155, 89, 182)));
        assert_eq!(parse_hex_color("1FB8CD"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }
}
