/// Integration tests for the visibility query: window synthesis, status
/// reporting and constraint attribution over synthetic ephemerides
mod common;

#[cfg(test)]
mod visibility_tests {
    use super::common::*;
    use chrono::{Duration, TimeZone, Utc};
    use ndarray::Array1;
    use rust_visibility::{
        ConstraintConfig, ConstraintKind, SaaData, Visibility, NO_VISIBILITY_WARNING,
    };

    fn all_enabled() -> ConstraintConfig {
        ConstraintConfig {
            earth_cons: true,
            sun_cons: true,
            moon_cons: true,
            saa_cons: true,
            pole_cons: true,
            ram_cons: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_day_clear_is_one_window() {
        let times = grid(t0(), 1441, 60);
        let ephem = Scene::clear(times).build();
        let saa = SaaData::clear(ephem.times.len());
        let begin = t0();
        let end = t0() + Duration::hours(24);

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, begin, end);
        assert!(vis.get());

        assert_eq!(vis.len(), 1441);
        assert_eq!(vis.entries().len(), 1);
        assert_eq!(vis[0].begin, begin);
        assert_eq!(vis[0].end, end);
        assert_eq!(vis[0].initial, ConstraintKind::Window);
        assert_eq!(vis[0].terminal, ConstraintKind::Window);
        assert_eq!(vis[0].duration(), Duration::hours(24));
        assert!(vis.status.warnings.is_empty());
    }

    #[test]
    fn test_permanent_earth_occultation_warns() {
        let times = grid(t0(), 120, 60);
        let ephem = Scene::clear(times).earth(|_| ON_TARGET).build();
        let saa = SaaData::clear(120);

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, t0(), ephem.times[119]);
        assert!(vis.get());

        assert!(vis.entries().is_empty());
        assert_eq!(vis.status.warnings, vec![NO_VISIBILITY_WARNING.to_string()]);
        assert!(vis.status.is_ok());
        assert!(vis.inconstraint().iter().all(|&b| b));
        assert_eq!(vis.constraint(50), ConstraintKind::Earth);
    }

    #[test]
    fn test_sun_block_splits_windows() {
        let times = grid(t0(), 30, 60);
        let ephem = Scene::clear(times).sun(blocked_between(10, 20)).build();
        let saa = SaaData::clear(30);
        let ts = ephem.times.clone();

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[29]);
        assert!(vis.get());

        let wins = vis.entries();
        assert_eq!(wins.len(), 2);
        assert_eq!((wins[0].begin, wins[0].end), (ts[0], ts[9]));
        assert_eq!((wins[1].begin, wins[1].end), (ts[20], ts[29]));
        assert_eq!(wins[0].terminal, ConstraintKind::Sun);
        assert_eq!(wins[1].initial, ConstraintKind::Sun);

        assert!(vis.visible(&ts[9]));
        assert!(!vis.visible(&ts[10]));
        assert!(!vis.visible(&(ts[9] + Duration::seconds(30))));
        assert!(vis.visible(&ts[20]));
        assert_eq!(vis.constraint(15), ConstraintKind::Sun);
        assert_eq!(vis.constraint(5), ConstraintKind::None);
    }

    #[test]
    fn test_visible_matches_combined_array() {
        let n = 40;
        let ephem = Scene::clear(grid(t0(), n, 60))
            .sun(blocked_between(5, 10))
            .moon(blocked_between(8, 14))
            .earth(blocked_between(20, 22))
            .build();
        let saa = saa_between(n, 25, 27);
        let ts = ephem.times.clone();

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1]);
        assert!(vis.get());

        for (i, t) in vis.timestamp().iter().enumerate() {
            assert_eq!(vis.visible(t), !vis.inconstraint()[i], "sample {i}");
        }
        for w in vis.entries() {
            for (i, t) in vis.timestamp().iter().enumerate() {
                if *t > w.begin && *t < w.end {
                    assert!(!vis.inconstraint()[i]);
                }
            }
        }
        assert_eq!(vis.entries().len(), 4);
    }

    /// Pole vector on the target over `[start, stop)`, perpendicular elsewhere
    fn pole_between(start: usize, stop: usize) -> impl Fn(usize) -> [f64; 3] {
        move |i| {
            if i >= start && i < stop {
                ON_TARGET
            } else {
                [0.0, 0.0, 1.0]
            }
        }
    }

    #[test]
    fn test_combined_is_or_of_enabled() {
        // Earth radius 70 gives an 8 degree pole band
        let n = 40;
        let mut scene = Scene::clear(grid(t0(), n, 60))
            .sun(blocked_between(5, 10))
            .moon(blocked_between(8, 14))
            .earth(blocked_between(20, 22));
        scene.earth_size = 70.0;
        let ephem = scene
            .build()
            .with_velocity(rows(n, blocked_between(34, 37)))
            .unwrap()
            .with_pole(rows(n, pole_between(30, 33)))
            .unwrap();
        let saa = saa_between(n, 25, 27);
        let ts = ephem.times.clone();

        for mask in 0u8..64 {
            let config = ConstraintConfig {
                earth_cons: mask & 1 != 0,
                sun_cons: mask & 2 != 0,
                moon_cons: mask & 4 != 0,
                saa_cons: mask & 8 != 0,
                pole_cons: mask & 16 != 0,
                ram_cons: mask & 32 != 0,
                ram_size: 10.0,
                ..Default::default()
            };
            let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1])
                .with_config(config.clone());
            assert!(vis.get());

            let ev = vis.constraints().unwrap();
            let pole = ev.pole().as_array().unwrap();
            let ram = ev.ram().as_array().unwrap();
            for i in 0..n {
                let expected = (config.earth_cons && ev.earth()[i])
                    || (config.sun_cons && ev.sun()[i])
                    || (config.moon_cons && ev.moon()[i])
                    || (config.saa_cons && ev.saa()[i])
                    || (config.pole_cons && pole[i])
                    || (config.ram_cons && ram[i]);
                assert_eq!(vis.inconstraint()[i], expected, "mask {mask} sample {i}");
            }
        }
    }

    #[test]
    fn test_pole_blocking_splits_windows() {
        let n = 10;
        let mut scene = Scene::clear(grid(t0(), n, 60)).earth(|_| AWAY);
        scene.earth_size = 70.0;
        let ephem = scene
            .build()
            .with_velocity(rows(n, |_| [0.0, 1.0, 0.0]))
            .unwrap()
            .with_pole(rows(n, pole_between(3, 5)))
            .unwrap();
        let saa = SaaData::clear(n);
        let ts = ephem.times.clone();
        let config = ConstraintConfig {
            pole_cons: true,
            ..Default::default()
        };

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1])
            .with_config(config);
        assert!(vis.get());

        let mut expected = vec![false; n];
        expected[3] = true;
        expected[4] = true;
        assert_eq!(vis.inconstraint().to_vec(), expected);

        let wins = vis.entries();
        assert_eq!(wins.len(), 2);
        assert_eq!((wins[0].begin, wins[0].end), (ts[0], ts[2]));
        assert_eq!((wins[1].begin, wins[1].end), (ts[5], ts[9]));
        assert_eq!(wins[0].terminal, ConstraintKind::Unknown);
        assert_eq!(wins[1].initial, ConstraintKind::Unknown);
        assert_eq!(vis.constraint(3), ConstraintKind::Unknown);
        assert_eq!(vis.constraint(4), ConstraintKind::Unknown);
        assert!(!vis.visible(&ts[4]));

        vis.config.pole_cons = false;
        assert!(vis.get());
        assert_eq!(vis.entries().len(), 1);
    }

    #[test]
    fn test_missing_velocity_does_not_change_result() {
        let n = 30;
        let ephem = Scene::clear(grid(t0(), n, 60))
            .sun(blocked_between(3, 7))
            .build();
        let saa = SaaData::clear(n);
        let ts = ephem.times.clone();

        let mut with = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1])
            .with_config(all_enabled());
        let mut without = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1]);
        assert!(with.get());
        assert!(without.get());

        assert_eq!(with.inconstraint(), without.inconstraint());
        assert_eq!(with.entries(), without.entries());
        let ev = with.constraints().unwrap();
        assert!(!ev.ram().is_available());
        assert!(!ev.pole().is_available());
    }

    #[test]
    fn test_ram_blocking_is_unattributed() {
        let n = 12;
        let ephem = Scene::clear(grid(t0(), n, 60))
            .build()
            .with_velocity(rows(n, blocked_between(3, 6)))
            .unwrap();
        let saa = SaaData::clear(n);
        let ts = ephem.times.clone();
        let config = ConstraintConfig {
            ram_cons: true,
            ram_size: 10.0,
            ..Default::default()
        };

        let mut vis =
            Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1]).with_config(config);
        assert!(vis.get());

        assert_eq!(vis.entries().len(), 2);
        assert_eq!(vis.entries()[0].end, ts[2]);
        assert_eq!(vis.entries()[1].begin, ts[6]);
        assert_eq!(vis.constraint(4), ConstraintKind::Unknown);
    }

    #[test]
    fn test_attribution_priority() {
        let n = 10;
        let ephem = Scene::clear(grid(t0(), n, 60))
            .sun(blocked_between(2, 4))
            .moon(blocked_between(2, 6))
            .earth(blocked_between(2, 8))
            .build();
        let saa = saa_between(n, 2, 9);
        let ts = ephem.times.clone();

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1]);
        assert!(vis.get());

        assert_eq!(vis.constraint(3), ConstraintKind::Sun);
        assert_eq!(vis.constraint(5), ConstraintKind::Moon);
        assert_eq!(vis.constraint(7), ConstraintKind::Earth);
        assert_eq!(vis.constraint(8), ConstraintKind::Saa);
        assert_eq!(vis.constraint(9), ConstraintKind::None);
    }

    #[test]
    fn test_sample_before_begin_is_window() {
        // Grid is offset 10 s from whole minutes; begin rounds to 00:02:00
        let start = t0() + Duration::seconds(10);
        let ephem = Scene::clear(grid(start, 20, 60))
            .earth(|_| ON_TARGET)
            .build();
        let saa = SaaData::clear(20);
        let begin = t0() + Duration::seconds(100);

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, begin, ephem.times[15]);
        assert!(vis.get());

        assert_eq!(vis.begin, t0() + Duration::seconds(120));
        assert_eq!(vis.timestamp()[0], ephem.times[1]);
        assert_eq!(vis.len(), 15);
        assert_eq!(vis.constraint(0), ConstraintKind::Window);
        assert_eq!(vis.constraint(1), ConstraintKind::Earth);
    }

    #[test]
    fn test_begin_rounds_half_up() {
        let ephem = Scene::clear(grid(t0(), 30, 60)).build();
        let saa = SaaData::clear(30);
        let begin = t0() + Duration::seconds(90);

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, begin, ephem.times[20]);
        assert!(vis.get());
        assert_eq!(vis.begin, t0() + Duration::seconds(120));
        assert_eq!(vis.entries()[0].begin, vis.begin);
    }

    #[test]
    fn test_saa_windows_and_insaa() {
        let n = 30;
        let ephem = Scene::clear(grid(t0(), n, 60)).build();
        let saa = saa_between(n, 10, 15);
        let ts = ephem.times.clone();

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, ts[0], ts[n - 1]);
        assert!(vis.get());

        let saa_wins = vis.saa_windows();
        assert_eq!(saa_wins.len(), 1);
        assert_eq!((saa_wins[0].begin, saa_wins[0].end), (ts[10], ts[14]));
        assert!(vis.insaa(&ts[12]));
        assert!(!vis.insaa(&ts[5]));
        assert!(!vis.insaa(&ts[15]));
        assert_eq!(vis.constraint(12), ConstraintKind::Saa);
        assert!(!vis.visible(&ts[12]));
    }

    #[test]
    fn test_invalid_requests_fail_without_panicking() {
        let ephem = Scene::clear(grid(t0(), 30, 60)).build();
        let saa = SaaData::clear(30);
        let end = ephem.times[29];

        let mut bad_ra = Visibility::new(&ephem, &saa, 400.0, 0.0, t0(), end);
        assert!(!bad_ra.get());
        assert_eq!(bad_ra.status.errors.len(), 1);
        assert!(bad_ra.entries().is_empty());
        assert!(bad_ra.constraints().is_none());

        let mut bad_dec = Visibility::new(&ephem, &saa, 10.0, -91.0, t0(), end);
        assert!(!bad_dec.get());

        let late = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut outside = Visibility::new(&ephem, &saa, 10.0, 0.0, t0(), late);
        assert!(!outside.get());
        assert!(outside.status.errors[0].contains("outside of the ephemeris"));

        let mut reversed = Visibility::new(&ephem, &saa, 10.0, 0.0, end, t0());
        assert!(!reversed.get());

        let short_saa = SaaData::new(Array1::from_elem(10, false));
        let mut mismatched = Visibility::new(&ephem, &short_saa, 10.0, 0.0, t0(), end);
        assert!(!mismatched.get());
        assert!(mismatched.saa_windows().is_empty());
    }

    #[test]
    fn test_rerun_resets_state() {
        let ephem = Scene::clear(grid(t0(), 20, 60)).earth(|_| ON_TARGET).build();
        let saa = SaaData::clear(20);

        let mut vis = Visibility::new(&ephem, &saa, 0.0, 0.0, t0(), ephem.times[19]);
        assert!(vis.get());
        assert!(vis.get());
        assert_eq!(vis.status.warnings.len(), 1);

        vis.config.earth_cons = false;
        assert!(vis.get());
        assert_eq!(vis.entries().len(), 1);
        assert!(vis.status.warnings.is_empty());
    }
}
