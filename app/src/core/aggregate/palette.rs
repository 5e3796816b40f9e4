//! Stable line colors for the per-year monthly datasets, keyed by how many years a dataset lies
//! before the reference year. Re-rendering the same window never changes a year's color.

const YEAR_COLORS: [&str; 3] = [
    "rgb(75, 192, 192)",
    "rgb(255, 99, 132)",
    "rgb(54, 162, 235)",
];

pub fn year_color(years_before_reference: i32) -> &'static str {
    let idx = years_before_reference.rem_euclid(YEAR_COLORS.len() as i32) as usize;
    YEAR_COLORS[idx]
}
