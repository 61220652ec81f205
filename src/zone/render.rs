//! Deterministic zone-file text generation.

use std::fmt::Write;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::config::ZoneConfig;
use crate::registry::ServiceRecord;

/// Render the zone text for a registry snapshot at wall-clock time `now`.
///
/// Pure and deterministic: identical inputs produce byte-identical output.
/// Records are emitted sorted by key. Each registrant gets an A record for
/// its observed address plus the legacy fixed `AAAA ::1` placeholder.
pub fn render(records: &[ServiceRecord], now: NaiveDateTime, config: &ZoneConfig) -> String {
    let mut sorted: Vec<&ServiceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    let serial = soa_serial(now);
    let ttl = config.ttl;
    let soa = &config.soa;

    let mut zone = String::new();
    // Infallible: fmt::Write on String never errors.
    let _ = writeln!(zone, "$ORIGIN {}", config.origin);
    let _ = writeln!(zone, "@\t{ttl} IN\tSOA {} {} (", soa.mname, soa.rname);
    let _ = writeln!(zone, "\t\t\t\t{serial} ; serial");
    let _ = writeln!(zone, "\t\t\t\t{:<10} ; refresh", soa.refresh);
    let _ = writeln!(zone, "\t\t\t\t{:<10} ; retry", soa.retry);
    let _ = writeln!(zone, "\t\t\t\t{:<10} ; expire", soa.expire);
    let _ = writeln!(zone, "\t\t\t\t{:<10} ; minimum", soa.minimum);
    let _ = writeln!(zone, "\t\t\t\t)");
    let _ = writeln!(zone);
    for nameserver in &config.nameservers {
        let _ = writeln!(zone, "\t{ttl} IN NS {nameserver}");
    }
    let _ = writeln!(zone);
    let _ = writeln!(zone, "www\tIN A\t127.0.0.1");
    let _ = writeln!(zone, "\tIN AAAA\t::1");

    for record in sorted {
        let _ = writeln!(zone);
        let _ = writeln!(zone, "{}\tIN A\t{}", record.key, record.address);
        let _ = writeln!(zone, "\tIN AAAA\t::1");
    }

    zone
}

/// SOA serial for `now`: two digits of year (mod 100) followed by the
/// zero-padded 8-digit count of seconds elapsed since the start of that
/// year.
///
/// Monotonically non-decreasing within a calendar year, but NOT across a
/// year boundary (`99...` rolls back to `00...`). Known limitation of the
/// scheme, left as-is.
pub fn soa_serial(now: NaiveDateTime) -> String {
    let seconds_into_year =
        u64::from(now.ordinal() - 1) * 86_400 + u64::from(now.num_seconds_from_midnight());
    format!("{:02}{:08}", now.date().year().rem_euclid(100), seconds_into_year)
}
