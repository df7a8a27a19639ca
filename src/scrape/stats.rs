//! Aggregate statistics over exam rows.

use crate::scrape::types::StatsResult;

/// Zero-based position of the students column.
const STUDENTS_COLUMN: usize = 3;

/// Reduces the students column of `rows` to min, max, count, sum and average.
///
/// A row whose students cell is not numeric makes the sum (and therefore the
/// average) NaN; min and max only consider numeric cells. With no rows every
/// number is zero and the average is `"0.00"`.
pub fn summarize<'a, I>(rows: I) -> StatsResult
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut num_tests = 0usize;
    let mut sum = 0.0f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for row in rows {
        let cell = row.get(STUDENTS_COLUMN).map(String::as_str).unwrap_or("");
        let students = parse_students(cell);
        num_tests += 1;
        sum += students;
        if !students.is_nan() {
            min = min.min(students);
            max = max.max(students);
        }
    }

    if min > max {
        // nothing numeric was seen
        min = 0.0;
        max = 0.0;
    }

    let average_students = if num_tests == 0 {
        to_fixed_2(0.0)
    } else {
        to_fixed_2(sum / num_tests as f64)
    };

    StatsResult {
        min,
        max,
        num_tests,
        num_students: sum,
        average_students,
    }
}

/// Formats `value` with two decimals, rounding exact midpoints away from
/// zero. Non-finite values render as `NaN`, `Infinity` or `-Infinity`.
pub fn to_fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return name.to_string();
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    // the only representable midpoints are odd multiples of 1/8
    let eighths = value.abs() * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let hundredths = (value.abs() * 100.0).ceil().copysign(value);
        return format!("{:.2}", hundredths / 100.0);
    }

    format!("{:.2}", value)
}

/// Parses a students cell the way a browser's `Number()` would: blank text is
/// zero, anything unparseable is NaN.
pub fn parse_students(cell: &str) -> f64 {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some((radix, digits)) = radix_literal(trimmed) {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return u128::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }

    // keeps out the `inf`, `nan` and `infinity` spellings `f64` accepts
    let decimal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn radix_literal(s: &str) -> Option<(u32, &str)> {
    let prefix = s.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &s[2..]))
}
