use std::cmp::Ordering;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::models::{DisplayRow, WorkoutRecord};

/// Parse the date text the API returns. Accepts RFC 3339 (as produced by JSON
/// date serialization), the SQL `YYYY-MM-DD HH:MM:SS` form, a `T`-separated
/// local form with optional fraction, and a bare date.
///
/// Every result is local wall-clock time, the same clock the create dialog
/// uses, so server and entered dates compare as instants.
pub fn parse_workout_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Most recent first. Undated rows go last.
pub fn by_date_desc(a: &DisplayRow, b: &DisplayRow) -> Ordering {
    b.workout_date.sort_key().cmp(&a.workout_date.sort_key())
}

pub fn sort_rows(rows: &mut [DisplayRow]) {
    rows.sort_by(by_date_desc);
}

/// Turn fetched records into display rows. Sequence ids are the record's
/// position in the fetched list, assigned before sorting.
pub fn build_rows(records: &[WorkoutRecord]) -> Vec<DisplayRow> {
    let mut rows: Vec<DisplayRow> = records
        .iter()
        .enumerate()
        .map(|(i, record)| DisplayRow::from_record(i, record))
        .collect();
    sort_rows(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(workout_id: i64, name: &str, date: &str) -> WorkoutRecord {
        WorkoutRecord {
            workout_id,
            usr_id: 1,
            workout_name: name.to_string(),
            workout_date: date.to_string(),
        }
    }

    #[test]
    fn parses_known_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(parse_workout_date("2024-05-01 18:30:00"), Some(expected));
        assert_eq!(
            parse_workout_date("2024-05-01T18:30:00.000Z"),
            Some(expected.and_utc().with_timezone(&Local).naive_local())
        );
        assert_eq!(parse_workout_date("2024-05-01T18:30:00"), Some(expected));
        assert_eq!(
            parse_workout_date("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_workout_date("yesterday"), None);
    }

    #[test]
    fn rows_are_sorted_newest_first() {
        let rows = build_rows(&[
            record(1, "Push", "2024-01-03 10:00:00"),
            record(2, "Pull", "2024-02-10 10:00:00"),
            record(3, "Legs", "2023-12-31 23:59:59"),
            record(4, "Core", "2024-02-05T09:00:00.000Z"),
        ]);
        let ids: Vec<i64> = rows.iter().map(|r| r.workout_id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);

        for pair in rows.windows(2) {
            assert_ne!(by_date_desc(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn sequence_ids_follow_fetch_order_and_are_dense() {
        let rows = build_rows(&[
            record(10, "A", "2024-01-01"),
            record(20, "B", "2024-03-01"),
            record(30, "C", "2024-02-01"),
        ]);
        let by_workout: Vec<(i64, usize)> = rows.iter().map(|r| (r.workout_id, r.id)).collect();
        assert_eq!(by_workout, vec![(20, 1), (30, 2), (10, 0)]);

        let mut seq: Vec<usize> = rows.iter().map(|r| r.id).collect();
        seq.sort_unstable();
        assert_eq!(seq, vec![0, 1, 2]);
    }

    #[test]
    fn equal_dates_keep_fetch_order() {
        let rows = build_rows(&[
            record(1, "First", "2024-01-01 08:00:00"),
            record(2, "Second", "2024-01-01 08:00:00"),
        ]);
        assert_eq!(rows[0].workout_id, 1);
        assert_eq!(rows[1].workout_id, 2);
    }

    #[test]
    fn unparseable_dates_sort_last() {
        let rows = build_rows(&[
            record(1, "Mystery", "sometime"),
            record(2, "Known", "2020-01-01"),
        ]);
        assert_eq!(rows[0].workout_id, 2);
        assert_eq!(rows[1].workout_id, 1);
    }

    #[test]
    fn empty_input_builds_no_rows() {
        assert!(build_rows(&[]).is_empty());
    }
}
