//! Derived consumption views computed from a [`RawSeries`].
//!
//! Every function is pure: the input is never modified and no clock is read. Entries with a
//! label that is not a `YYYY-MM[-DD]` date are skipped (and logged) by all views that need the
//! date; missing readings are handled per view:
//!
//! | view              | missing reading                         |
//! |-------------------|-----------------------------------------|
//! | [`yearly`]        | counts as 0                             |
//! | [`monthly_by_year`] | counts as 0                           |
//! | [`avg_monthly`]   | excluded from sum and count             |
//! | [`cumulative`]    | previous total is carried forward       |

pub mod palette;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::timeseries::RawSeries;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];

/// Number of years shown in the monthly comparison, ending with the reference year.
pub const MONTHLY_WINDOW_YEARS: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub labels: [&'static str; 12],
    pub datasets: Vec<MonthlyDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDataset {
    pub year: String,
    pub values: [f64; 12],
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvgMonthlySeries {
    pub labels: [&'static str; 12],
    pub values: [f64; 12],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Total per calendar year, years ascending.
pub fn yearly(raw: &RawSeries) -> YearlySeries {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();

    for (label, value) in raw.dated() {
        *totals.entry(label.year()).or_default() += value.unwrap_or(0.0);
    }

    let (labels, values) = totals
        .into_iter()
        .map(|(year, total)| (format_year(year), total))
        .unzip();

    YearlySeries { labels, values }
}

/// Monthly totals for each year in `[reference_year - 2, reference_year]`, newest year first.
/// Years without any entry get no dataset.
pub fn monthly_by_year(raw: &RawSeries, reference_year: i32) -> MonthlySeries {
    let window = (reference_year - MONTHLY_WINDOW_YEARS + 1)..=reference_year;
    let mut per_year: BTreeMap<i32, [f64; 12]> = BTreeMap::new();

    for (label, value) in raw.dated().filter(|(label, _)| window.contains(&label.year())) {
        per_year.entry(label.year()).or_insert([0.0; 12])[label.month_index()] += value.unwrap_or(0.0);
    }

    let datasets = per_year
        .into_iter()
        .rev()
        .map(|(year, values)| MonthlyDataset {
            year: format_year(year),
            values,
            color: palette::year_color(reference_year - year),
        })
        .collect();

    MonthlySeries {
        labels: MONTH_NAMES,
        datasets,
    }
}

/// Mean reading per calendar month over all years. Months without a reading report 0.
pub fn avg_monthly(raw: &RawSeries) -> AvgMonthlySeries {
    let mut sums = [0.0; 12];
    let mut counts = [0usize; 12];

    for (label, value) in raw.dated() {
        if let Some(value) = value {
            sums[label.month_index()] += value;
            counts[label.month_index()] += 1;
        }
    }

    let values = std::array::from_fn(|i| {
        if counts[i] > 0 {
            sums[i] / counts[i] as f64
        } else {
            0.0
        }
    });

    AvgMonthlySeries {
        labels: MONTH_NAMES,
        values,
    }
}

/// Running total in input order. Labels are passed through as delivered, including ones that
/// are not dates.
pub fn cumulative(raw: &RawSeries) -> CumulativeSeries {
    let values = raw
        .values()
        .iter()
        .scan(0.0, |total, value| {
            if let Some(value) = value {
                *total += value;
            }
            Some(*total)
        })
        .collect();

    CumulativeSeries {
        labels: raw.labels().to_vec(),
        values,
    }
}

fn format_year(year: i32) -> String {
    format!("{:04}", year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(readings: &[(&str, f64)]) -> RawSeries {
        RawSeries::from_readings(readings.iter().copied())
    }

    fn with_missing(readings: &[(&str, Option<f64>)]) -> RawSeries {
        let (labels, values) = readings.iter().map(|(l, v)| (l.to_string(), *v)).unzip();
        RawSeries::new(labels, values).unwrap()
    }

    mod yearly {
        use super::*;

        #[test]
        fn empty_input() {
            let result = yearly(&RawSeries::default());

            assert!(result.labels.is_empty());
            assert!(result.values.is_empty());
        }

        #[test]
        fn sums_per_year() {
            let raw = series(&[("2023-01-01", 10.0), ("2023-06-01", 5.0), ("2024-01-01", 7.0)]);

            let result = yearly(&raw);

            assert_eq!(result.labels, vec!["2023", "2024"]);
            assert_eq!(result.values, vec![15.0, 7.0]);
        }

        #[test]
        fn unsorted_input_gives_ascending_years() {
            let raw = series(&[("2024-03-01", 1.0), ("2021-01-01", 2.0), ("2023-05-01", 3.0), ("2021-12-01", 4.0)]);

            let result = yearly(&raw);

            assert_eq!(result.labels, vec!["2021", "2023", "2024"]);
            assert_eq!(result.values, vec![6.0, 3.0, 1.0]);
        }

        #[test]
        fn missing_values_count_as_zero() {
            let raw = with_missing(&[("2023-01-01", Some(4.0)), ("2023-02-01", None), ("2024-01-01", None)]);

            let result = yearly(&raw);

            assert_eq!(result.labels, vec!["2023", "2024"]);
            assert_eq!(result.values, vec![4.0, 0.0]);
            assert!(result.values.iter().all(|v| v.is_finite()));
        }

        #[test]
        fn total_equals_sum_of_dated_entries() {
            let raw = with_missing(&[
                ("2022-04-01", Some(1.5)),
                ("not-a-date", Some(100.0)),
                ("2023-07-01", None),
                ("2023-08", Some(2.5)),
                ("2024-13-01", Some(50.0)),
                ("2024-02-29", Some(3.0)),
            ]);

            let total: f64 = yearly(&raw).values.iter().sum();

            assert_eq!(total, 7.0);
        }
    }

    mod monthly_by_year {
        use super::*;

        #[test]
        fn window_covers_three_years() {
            let raw = series(&[
                ("2020-01-01", 1.0),
                ("2021-01-01", 1.0),
                ("2022-01-01", 1.0),
                ("2023-01-01", 1.0),
                ("2024-01-01", 1.0),
            ]);

            let result = monthly_by_year(&raw, 2024);

            let years: Vec<&str> = result.datasets.iter().map(|d| d.year.as_str()).collect();
            assert_eq!(years, vec!["2024", "2023", "2022"]);
        }

        #[test]
        fn years_after_reference_are_ignored() {
            let raw = series(&[("2024-05-01", 1.0), ("2025-05-01", 2.0)]);

            let result = monthly_by_year(&raw, 2024);

            assert_eq!(result.datasets.len(), 1);
            assert_eq!(result.datasets[0].year, "2024");
        }

        #[test]
        fn accumulates_into_month_slots() {
            let raw = with_missing(&[
                ("2024-01-05", Some(1.0)),
                ("2024-01-20", Some(2.0)),
                ("2024-12-31", Some(4.0)),
                ("2024-06-01", None),
            ]);

            let result = monthly_by_year(&raw, 2024);

            let values = result.datasets[0].values;
            assert_eq!(values[0], 3.0);
            assert_eq!(values[5], 0.0);
            assert_eq!(values[11], 4.0);
            assert_eq!(values.iter().sum::<f64>(), 7.0);
        }

        #[test]
        fn absent_years_have_no_dataset() {
            let raw = series(&[("2022-03-01", 1.0), ("2024-03-01", 2.0)]);

            let result = monthly_by_year(&raw, 2024);

            let years: Vec<&str> = result.datasets.iter().map(|d| d.year.as_str()).collect();
            assert_eq!(years, vec!["2024", "2022"]);
        }

        #[test]
        fn labels_are_fixed_month_names() {
            let result = monthly_by_year(&RawSeries::default(), 2024);

            assert_eq!(result.labels, MONTH_NAMES);
            assert_eq!(result.labels[0], "Jan");
            assert_eq!(result.labels[2], "Mär");
            assert_eq!(result.labels[11], "Dez");
            assert!(result.datasets.is_empty());
        }

        #[test]
        fn colors_follow_offset_from_reference() {
            let raw = series(&[("2022-03-01", 1.0), ("2023-03-01", 1.0), ("2024-03-01", 2.0)]);

            let result = monthly_by_year(&raw, 2024);

            assert_eq!(result.datasets[0].color, palette::year_color(0));
            assert_eq!(result.datasets[1].color, palette::year_color(1));
            assert_eq!(result.datasets[2].color, palette::year_color(2));
        }

        #[test]
        fn color_follows_offset_when_reference_advances() {
            let raw = series(&[("2023-03-01", 1.0)]);

            let current = monthly_by_year(&raw, 2023);
            let next_year = monthly_by_year(&raw, 2024);

            assert_eq!(current.datasets[0].color, palette::year_color(0));
            assert_eq!(next_year.datasets[0].color, palette::year_color(1));
        }
    }

    mod avg_monthly {
        use super::*;

        #[test]
        fn mean_across_years() {
            let raw = series(&[("2022-01-01", 10.0), ("2023-01-01", 20.0), ("2024-01-15", 30.0), ("2024-02-01", 5.0)]);

            let result = avg_monthly(&raw);

            assert_eq!(result.values[0], 20.0);
            assert_eq!(result.values[1], 5.0);
        }

        #[test]
        fn months_without_readings_report_zero() {
            let raw = series(&[("2024-03-01", 4.0)]);

            let result = avg_monthly(&raw);

            for (i, value) in result.values.iter().enumerate() {
                if i == 2 {
                    assert_eq!(*value, 4.0);
                } else {
                    assert_eq!(*value, 0.0);
                }
            }
        }

        #[test]
        fn missing_values_are_not_counted() {
            let raw = with_missing(&[("2023-05-01", Some(6.0)), ("2024-05-01", None)]);

            let result = avg_monthly(&raw);

            assert_eq!(result.values[4], 6.0);
        }

        #[test]
        fn empty_input_is_all_zero() {
            let result = avg_monthly(&RawSeries::default());

            assert_eq!(result.values, [0.0; 12]);
            assert_eq!(result.labels, MONTH_NAMES);
        }
    }

    mod cumulative {
        use super::*;

        #[test]
        fn running_total_in_input_order() {
            let raw = series(&[("2024-03-01", 1.0), ("2024-01-01", 2.0), ("2024-02-01", 3.0)]);

            let result = cumulative(&raw);

            assert_eq!(result.labels, vec!["2024-03-01", "2024-01-01", "2024-02-01"]);
            assert_eq!(result.values, vec![1.0, 3.0, 6.0]);
        }

        #[test]
        fn missing_values_carry_total_forward() {
            let raw = with_missing(&[("2024-01-01", Some(2.0)), ("2024-02-01", None), ("2024-03-01", Some(1.0))]);

            let result = cumulative(&raw);

            assert_eq!(result.values, vec![2.0, 2.0, 3.0]);
        }

        #[test]
        fn non_negative_input_is_non_decreasing() {
            let raw = with_missing(&[
                ("2024-01-01", Some(0.0)),
                ("2024-02-01", Some(4.5)),
                ("2024-03-01", None),
                ("2024-04-01", Some(0.5)),
                ("2024-05-01", Some(12.0)),
            ]);

            let result = cumulative(&raw);

            assert!(result.values.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(result.values.last(), Some(&17.0));
        }

        #[test]
        fn negative_value_decreases_total() {
            let raw = series(&[("2024-01-01", 5.0), ("2024-02-01", -2.0)]);

            let result = cumulative(&raw);

            assert_eq!(result.values, vec![5.0, 3.0]);
        }

        #[test]
        fn malformed_labels_pass_through() {
            let raw = series(&[("2024-01-01", 1.0), ("not-a-date", 2.0)]);

            let result = cumulative(&raw);

            assert_eq!(result.labels, vec!["2024-01-01", "not-a-date"]);
            assert_eq!(result.values, vec![1.0, 3.0]);
        }

        #[test]
        fn empty_input() {
            let result = cumulative(&RawSeries::default());

            assert!(result.labels.is_empty());
            assert!(result.values.is_empty());
        }
    }

    #[test]
    fn malformed_label_is_skipped_by_dated_views() {
        let raw = series(&[("2024-01-01", 1.0), ("not-a-date", 100.0), ("2024-01-15", 2.0)]);

        assert_eq!(yearly(&raw).values, vec![3.0]);
        assert_eq!(monthly_by_year(&raw, 2024).datasets[0].values[0], 3.0);
        assert_eq!(avg_monthly(&raw).values[0], 1.5);
    }

    #[test]
    fn aggregations_are_idempotent() {
        let raw = with_missing(&[
            ("2024-02-01", Some(1.25)),
            ("2022-07-01", None),
            ("2023-11-30", Some(8.0)),
            ("garbage", Some(3.0)),
            ("2024-02-15", Some(0.75)),
        ]);
        let before = raw.clone();

        assert_eq!(yearly(&raw), yearly(&raw));
        assert_eq!(monthly_by_year(&raw, 2024), monthly_by_year(&raw, 2024));
        assert_eq!(avg_monthly(&raw), avg_monthly(&raw));
        assert_eq!(cumulative(&raw), cumulative(&raw));
        assert_eq!(raw, before);
    }
}
