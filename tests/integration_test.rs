/// End-to-end report runs: CSV snapshot sources through the engine to the
/// output artifact.
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use storepulse::error::Error;
use storepulse::report::{self, ReportEngine};
use storepulse::snapshot::{read_business_hours, read_polls, read_timezones, Snapshot};
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;

fn load(polls: &str, hours: Option<&str>, timezones: Option<&str>) -> Snapshot {
    Snapshot {
        polls: read_polls(polls.as_bytes()).expect("polls should load"),
        hours: hours
            .map(|h| read_business_hours(h.as_bytes()).expect("hours should load"))
            .unwrap_or_default(),
        timezones: timezones
            .map(|t| read_timezones(t.as_bytes()).expect("timezones should load"))
            .unwrap_or_default(),
    }
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

const S1_POLLS: &str = "store_id,status,timestamp_utc\n\
    s1,inactive,2023-06-12 08:00:00 UTC\n\
    s1,active,2023-06-12 10:00:00 UTC\n";

const S1_HOURS: &str = "store_id,day_of_week,start_time_local,end_time_local\n\
    s1,0,09:00:00,17:00:00\n";

const S1_TIMEZONES: &str = "store_id,timezone_str\ns1,UTC\n";

#[test]
fn spec_scenario_end_to_end() {
    let snapshot = load(S1_POLLS, Some(S1_HOURS), Some(S1_TIMEZONES));
    let engine = ReportEngine::build(snapshot, chrono_tz::America::Chicago, None)
        .expect("engine should build");

    assert_eq!(engine.anchor(), utc(2023, 6, 12, 10, 0, 0));

    let rows = engine.compute_report();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.store_id, "s1");
    // Anchor is 10:00Z: last hour window [09:00, 10:00] sits inside Monday
    // business hours; 09:00-10:00 is inactive (forward-filled from the
    // 08:00 poll)
    assert_eq!(row.uptime_last_hour, 0.0);
    assert_eq!(row.downtime_last_hour, 60.0);
    // Last day: Monday segment clipped to [09:00, 10:00], all inactive
    assert_eq!(row.uptime_last_day, 0.0);
    assert_eq!(row.downtime_last_day, 1.0);
}

#[test]
fn spec_scenario_with_anchor_override() {
    // Pin the anchor at noon to reproduce the worked scenario exactly
    let snapshot = load(S1_POLLS, Some(S1_HOURS), Some(S1_TIMEZONES));
    let anchor = utc(2023, 6, 12, 12, 0, 0);
    let engine = ReportEngine::build(snapshot, chrono_tz::America::Chicago, Some(anchor))
        .expect("engine should build");
    assert_eq!(engine.anchor(), anchor);

    let row = &engine.compute_report()[0];
    // Last hour [11:00, 12:00]: active throughout
    assert_eq!(row.uptime_last_hour, 60.0);
    assert_eq!(row.downtime_last_hour, 0.0);
    // Last day: Monday segment [09:00, 12:00]; the 10:00 poll splits it
    // into 1h inactive + 2h active
    assert_eq!(row.uptime_last_day, 2.0);
    assert_eq!(row.downtime_last_day, 1.0);
    // Last week adds the previous Monday's [12:00, 17:00], all before any
    // poll and therefore inactive
    assert_eq!(row.uptime_last_week, 2.0);
    assert_eq!(row.downtime_last_week, 6.0);
}

#[test]
fn business_totals_grow_with_period() {
    let snapshot = load(S1_POLLS, Some(S1_HOURS), Some(S1_TIMEZONES));
    let engine = ReportEngine::build(snapshot, chrono_tz::UTC, None).unwrap();
    let row = &engine.compute_report()[0];
    let hour_total = row.uptime_last_hour / 60.0 + row.downtime_last_hour / 60.0;
    let day_total = row.uptime_last_day + row.downtime_last_day;
    let week_total = row.uptime_last_week + row.downtime_last_week;
    assert!(week_total >= day_total);
    assert!(day_total >= hour_total);
}

#[test]
fn default_zone_applies_when_timezone_source_absent() {
    // Chicago is CDT (UTC-5) in June: Monday 09:00-17:00 local is
    // 14:00-22:00 UTC
    let polls = "store_id,status,timestamp_utc\n\
        s1,active,2023-06-12 14:00:00 UTC\n\
        s1,active,2023-06-12 19:00:00 UTC\n";
    let hours = "store_id,day_of_week,start_time_local,end_time_local\n\
        s1,0,09:00:00,17:00:00\n";
    let snapshot = load(polls, Some(hours), None);
    let engine = ReportEngine::build(snapshot, chrono_tz::America::Chicago, None).unwrap();

    let row = &engine.compute_report()[0];
    // Last hour [18:00Z, 19:00Z] is inside business hours, active
    assert_eq!(row.uptime_last_hour, 60.0);
    // Last day: Monday business clipped to [14:00Z, 19:00Z], active from
    // the poll exactly at the segment start
    assert_eq!(row.uptime_last_day, 5.0);
    assert_eq!(row.downtime_last_day, 0.0);
}

#[test]
fn midnight_crossing_window_spans_into_saturday() {
    let polls = "store_id,status,timestamp_utc\n\
        s1,active,2023-06-09 23:00:00 UTC\n\
        s1,inactive,2023-06-10 01:00:00 UTC\n";
    // Friday 22:00-02:00 crosses midnight
    let hours = "store_id,day_of_week,start_time_local,end_time_local\n\
        s1,4,22:00:00,02:00:00\n";
    let tzs = "store_id,timezone_str\ns1,UTC\n";
    let snapshot = load(polls, Some(hours), Some(tzs));
    let engine = ReportEngine::build(snapshot, chrono_tz::America::Chicago, None).unwrap();

    let row = &engine.compute_report()[0];
    // Anchor Sat 01:00Z; last day window [Fri 01:00, Sat 01:00] intersects
    // the Friday window as [22:00, 01:00]: one inactive hour before the
    // 23:00 poll, then two active hours
    assert_eq!(row.uptime_last_day, 2.0);
    assert_eq!(row.downtime_last_day, 1.0);
}

#[test]
fn store_with_only_config_reports_all_downtime() {
    let polls = "store_id,status,timestamp_utc\n\
        other,active,2023-06-12 12:00:00 UTC\n";
    let tzs = "store_id,timezone_str\nghost,America/Denver\n";
    let snapshot = load(polls, None, Some(tzs));
    let engine = ReportEngine::build(snapshot, chrono_tz::America::Chicago, None).unwrap();

    let rows = engine.compute_report();
    let ids: Vec<&str> = rows.iter().map(|r| r.store_id.as_str()).collect();
    assert_eq!(ids, ["ghost", "other"]);

    let ghost = &rows[0];
    assert_eq!(ghost.uptime_last_hour, 0.0);
    assert_eq!(ghost.downtime_last_hour, 60.0);
    assert_eq!(ghost.uptime_last_week, 0.0);
    assert!(ghost.downtime_last_week > 7.0 * 24.0 - 1.0);
}

#[test]
fn always_active_24x7_store_tracks_dst_week() {
    // Week covering the US spring-forward (2023-03-12). The 24x7 fallback
    // plus a New York zone yields one 23-hour day and a missing second per
    // day, so the week total lands just under 168 hours.
    let polls = "store_id,status,timestamp_utc\n\
        s1,active,2023-03-01 00:00:00 UTC\n\
        s1,active,2023-03-15 00:00:00 UTC\n";
    let tzs = "store_id,timezone_str\ns1,America/New_York\n";
    let snapshot = load(polls, None, Some(tzs));
    let engine = ReportEngine::build(snapshot, chrono_tz::America::Chicago, None).unwrap();

    let row = &engine.compute_report()[0];
    assert_eq!(row.downtime_last_week, 0.0);
    assert!(row.uptime_last_week > 160.0);
    assert!(row.uptime_last_week < 168.0);
}

#[test]
fn no_poll_data_is_fatal() {
    let snapshot = load("store_id,status,timestamp_utc\n", Some(S1_HOURS), None);
    assert!(matches!(
        ReportEngine::build(snapshot, chrono_tz::UTC, None),
        Err(Error::NoPollData)
    ));
}

#[test]
fn csv_artifact_has_expected_header_and_rows() {
    let snapshot = load(S1_POLLS, Some(S1_HOURS), Some(S1_TIMEZONES));
    let engine = ReportEngine::build(snapshot, chrono_tz::UTC, None).unwrap();
    let rows = engine.compute_report();

    let path = std::env::temp_dir().join(format!("storepulse_it_{}.csv", std::process::id()));
    report::write_csv(&rows, &path).expect("artifact should write");
    let text = std::fs::read_to_string(&path).expect("artifact should read back");
    std::fs::remove_file(&path).ok();

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(
            "store_id,uptime_last_hour(mins),downtime_last_hour(mins),\
             uptime_last_day(hours),downtime_last_day(hours),\
             uptime_last_week(hours),downtime_last_week(hours)"
        )
    );
    assert_eq!(lines.count(), rows.len());
}

#[test]
fn json_artifact_round_trips() {
    let snapshot = load(S1_POLLS, Some(S1_HOURS), Some(S1_TIMEZONES));
    let engine = ReportEngine::build(snapshot, chrono_tz::UTC, None).unwrap();
    let rows = engine.compute_report();

    let path = std::env::temp_dir().join(format!("storepulse_it_{}.json", std::process::id()));
    report::write_json(&rows, &path).expect("artifact should write");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(value.as_array().map(Vec::len), Some(rows.len()));
    assert_eq!(value[0]["store_id"], "s1");
    assert!(value[0]["uptime_last_hour(mins)"].is_number());
}

#[tokio::test]
async fn parallel_run_matches_sequential() {
    let mut polls = String::from("store_id,status,timestamp_utc\n");
    for i in 0..25 {
        polls.push_str(&format!(
            "store_{:02},{},2023-06-12 {:02}:00:00 UTC\n",
            i,
            if i % 3 == 0 { "inactive" } else { "active" },
            6 + (i % 12)
        ));
    }
    let snapshot = load(&polls, Some(S1_HOURS), None);
    let engine = Arc::new(ReportEngine::build(snapshot, chrono_tz::America::Chicago, None).unwrap());

    let sequential = engine.compute_report();
    let parallel = assert_ok!(
        Arc::clone(&engine)
            .compute_report_parallel(CancellationToken::new())
            .await
    );
    assert_eq!(parallel, sequential);
}

#[tokio::test]
async fn cancelled_run_returns_cancelled_error() {
    let snapshot = load(S1_POLLS, Some(S1_HOURS), None);
    let engine = Arc::new(ReportEngine::build(snapshot, chrono_tz::UTC, None).unwrap());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = engine.compute_report_parallel(cancel).await;
    assert!(matches!(result, Err(Error::Cancelled)));
}
