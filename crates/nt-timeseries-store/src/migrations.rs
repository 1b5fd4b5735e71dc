//! ClickHouse DDL for the time-series store (§3, §6).
//!
//! Every statement is idempotent (`IF NOT EXISTS`), so it is safe to run
//! them on every process start rather than versioning migrations.

pub const MIGRATIONS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS daily_download
    (
        package_id_lower String,
        date             Date,
        download_count   UInt64,
        inserted_at      DateTime64(3) DEFAULT now64(3)
    )
    ENGINE = ReplacingMergeTree(inserted_at)
    PARTITION BY toYear(date)
    ORDER BY (package_id_lower, date)
    ",
    r"
    CREATE TABLE IF NOT EXISTS weekly_download
    (
        package_id_lower  String,
        week              Date,
        download_avg_state AggregateFunction(avg, UInt64)
    )
    ENGINE = AggregatingMergeTree
    ORDER BY (package_id_lower, week)
    ",
    r"
    CREATE MATERIALIZED VIEW IF NOT EXISTS weekly_download_mv
    TO weekly_download
    AS SELECT
        package_id_lower,
        toMonday(date) AS week,
        avgState(download_count) AS download_avg_state
    FROM daily_download
    GROUP BY package_id_lower, week
    ",
    r"
    CREATE TABLE IF NOT EXISTS package_first_seen
    (
        package_id_lower String,
        first_seen_state AggregateFunction(min, Date)
    )
    ENGINE = AggregatingMergeTree
    ORDER BY package_id_lower
    ",
    r"
    CREATE MATERIALIZED VIEW IF NOT EXISTS package_first_seen_mv
    TO package_first_seen
    AS SELECT
        package_id_lower,
        minState(week) AS first_seen_state
    FROM weekly_download
    GROUP BY package_id_lower
    ",
    r"
    CREATE TABLE IF NOT EXISTS trending_snapshot
    (
        week                      Date,
        package_id_lower          String,
        package_id_original       String,
        week_downloads            Int64,
        comparison_week_downloads Int64,
        growth_rate               Float64,
        icon_url                  Nullable(String),
        github_url                Nullable(String),
        computed_at               DateTime64(3)
    )
    ENGINE = ReplacingMergeTree(computed_at)
    ORDER BY (week, package_id_lower)
    ",
    r"
    CREATE TABLE IF NOT EXISTS tfm_adoption_snapshot
    (
        month                     Date,
        tfm                       String,
        family                    String,
        new_package_count         UInt32,
        cumulative_package_count  UInt32,
        computed_at               DateTime64(3)
    )
    ENGINE = ReplacingMergeTree(computed_at)
    ORDER BY (month, tfm)
    ",
];
