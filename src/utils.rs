use itertools::Itertools;

/// Olympic bar weight in kg.
pub const BAR_WEIGHT: f64 = 20.0;

/// Plate denominations in kg, largest first.
pub const PLATES: [f64; 7] = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

/// Percentages of the estimated max shown next to it.
pub const ONE_RM_PERCENTAGES: [u32; 3] = [90, 80, 70];

/// Epley estimate without rounding.
pub fn calculate_1rm(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + reps as f64 / 30.0)
}

/// Rounded Epley estimate; 0 unless both weight and reps are positive.
pub fn estimate_one_rm(weight: f64, reps: u32) -> u32 {
    if !(weight > 0.0) || reps == 0 {
        return 0;
    }
    calculate_1rm(weight, reps).round() as u32
}

/// `(percent, kg)` rows for an estimated max, rounded to whole kg.
pub fn one_rm_table(one_rm: u32) -> Vec<(u32, u32)> {
    if one_rm == 0 {
        return Vec::new();
    }
    ONE_RM_PERCENTAGES
        .iter()
        .map(|&pct| (pct, (one_rm as f64 * pct as f64 / 100.0).round() as u32))
        .collect()
}

/// Plates to load on each side of the bar for `total` kg.
///
/// Greedy over [`PLATES`]; whatever remains below the smallest plate is
/// dropped, so the result can undershoot. Empty means "bar only".
pub fn resolve_plates(total: f64) -> Vec<f64> {
    if !(total > BAR_WEIGHT) {
        return Vec::new();
    }

    let mut remaining = (total - BAR_WEIGHT) / 2.0;
    let mut plates = Vec::new();
    for plate in PLATES {
        while remaining >= plate {
            plates.push(plate);
            remaining -= plate;
        }
    }
    plates
}

pub fn format_plates(plates: &[f64]) -> String {
    if plates.is_empty() {
        "bar only".to_string()
    } else {
        plates.iter().map(|p| format!("{p}")).join(", ")
    }
}

/// Lenient weight entry: anything unparsable, negative or non-finite is 0.
pub fn parse_weight(raw: &str) -> f64 {
    match raw.trim().replace(',', ".").parse::<f64>() {
        Ok(w) if w.is_finite() && w > 0.0 => w,
        _ => 0.0,
    }
}

/// Lenient rep entry; fractional input is truncated.
pub fn parse_reps(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(r) = raw.parse::<u32>() {
        return r;
    }
    match raw.parse::<f64>() {
        Ok(r) if r.is_finite() && r > 0.0 => r.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

pub fn format_duration(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    let seconds = duration.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// `M:SS`, or `H:MM:SS` from one hour on.
pub fn format_clock(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epley_estimate_is_rounded() {
        assert_eq!(estimate_one_rm(100.0, 5), 117);
        assert_eq!(estimate_one_rm(60.0, 10), 80);
        assert_eq!(estimate_one_rm(0.0, 5), 0);
        assert_eq!(estimate_one_rm(100.0, 0), 0);
        assert_eq!(estimate_one_rm(-10.0, 5), 0);
    }

    #[test]
    fn percentage_table() {
        assert_eq!(one_rm_table(117), vec![(90, 105), (80, 94), (70, 82)]);
        assert!(one_rm_table(0).is_empty());
    }

    #[test]
    fn plates_for_hundred() {
        assert_eq!(resolve_plates(100.0), vec![25.0, 15.0]);
    }

    #[test]
    fn plates_bar_only() {
        assert!(resolve_plates(20.0).is_empty());
        assert!(resolve_plates(15.0).is_empty());
        assert_eq!(format_plates(&resolve_plates(20.0)), "bar only");
    }

    #[test]
    fn plates_drop_small_remainder() {
        assert!(resolve_plates(21.0).is_empty());
        // 61 -> 20.5 per side -> 20, 0.5 dropped
        assert_eq!(resolve_plates(61.0), vec![20.0]);
    }

    #[test]
    fn plates_use_repeats_and_fractions() {
        // 142.5 -> 61.25 per side
        assert_eq!(resolve_plates(142.5), vec![25.0, 25.0, 10.0, 1.25]);
        assert_eq!(format_plates(&[25.0, 2.5]), "25, 2.5");
    }

    #[test]
    fn lenient_number_parsing() {
        assert_eq!(parse_weight("82.5"), 82.5);
        assert_eq!(parse_weight("82,5"), 82.5);
        assert_eq!(parse_weight("abc"), 0.0);
        assert_eq!(parse_weight("-5"), 0.0);
        assert_eq!(parse_weight("NaN"), 0.0);
        assert_eq!(parse_reps("8"), 8);
        assert_eq!(parse_reps("8.7"), 8);
        assert_eq!(parse_reps(""), 0);
        assert_eq!(parse_reps("-3"), 0);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(95), "1:35");
        assert_eq!(format_clock(3725), "1:02:05");
        assert_eq!(format_duration(chrono::Duration::seconds(3725)), "01:02:05");
    }
}
