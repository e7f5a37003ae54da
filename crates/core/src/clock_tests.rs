// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    let ms0 = clock.epoch_ms();

    clock.advance(Duration::from_secs(45));

    assert_eq!(clock.now() - t0, Duration::from_secs(45));
    assert_eq!(clock.epoch_ms() - ms0, 45_000);
}

#[test]
fn epoch_secs_truncates() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(12_345_678);
    assert_eq!(clock.epoch_secs(), 12_345);
}

#[test]
fn utc_iso_is_rfc3339() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(0);
    assert_eq!(clock.utc_iso(), "1970-01-01T00:00:00+00:00");
}

#[test]
fn system_clock_is_monotonic_enough() {
    let clock = SystemClock;
    let a = clock.epoch_ms();
    let b = clock.epoch_ms();
    assert!(b >= a);
}
