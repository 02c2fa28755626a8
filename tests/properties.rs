use msd_calc::{rate_all, rate_at, CalcConfig, Chart, NoteEvent, Skillset};
use proptest::prelude::*;

/// Rows on up to four columns with at least 5ms between them so that no
/// interval is floored within the rate ladder.
fn chart() -> impl Strategy<Value = Chart> {
    prop::collection::vec((5_u32..400, 1_u32..16), 1..120).prop_map(|rows| {
        let mut time_ms = 0;

        let events: Vec<_> = rows
            .into_iter()
            .map(|(gap, mask)| {
                time_ms += gap;

                NoteEvent::row(f64::from(time_ms) / 1000.0, mask)
            })
            .collect();

        Chart::new(&events).unwrap()
    })
}

fn config() -> CalcConfig {
    CalcConfig::new().parallel(false)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn all_scores_valid(chart in chart()) {
        let msd = rate_all(&chart, &config()).unwrap();

        prop_assert_eq!(msd.msds.len(), 14);
        prop_assert!(msd.is_valid(), "{:?}", msd);
    }

    #[test]
    fn overall_follows_named(chart in chart()) {
        let msd = rate_all(&chart, &config()).unwrap();
        let bound = 7.0_f64.powf(1.0 / 8.0);

        for scores in msd.msds.iter() {
            let named = scores.named();
            let max = named.iter().copied().fold(0.0, f64::max);

            prop_assert_eq!(scores.overall == 0.0, max == 0.0);
            prop_assert!(scores.overall >= max * (1.0 - 1e-12));
            prop_assert!(scores.overall <= max * bound * (1.0 + 1e-12));
        }
    }

    #[test]
    fn faster_is_never_easier(chart in chart()) {
        let msd = rate_all(&chart, &config()).unwrap();

        for pair in msd.msds.windows(2) {
            for skillset in Skillset::ALL {
                let slower = pair[0].get(skillset);
                let faster = pair[1].get(skillset);

                prop_assert!(
                    slower <= faster + 1e-9 * faster.max(1.0),
                    "{} dropped from {} to {}", skillset, slower, faster
                );
            }
        }
    }

    #[test]
    fn deterministic(chart in chart(), rate in 0.5_f64..3.0, goal in 50.0_f64..=100.0) {
        let config = config();

        prop_assert_eq!(
            rate_all(&chart, &config).unwrap(),
            rate_all(&chart, &config.clone().parallel(true)).unwrap()
        );

        let first = rate_at(&chart, rate, goal, &config).unwrap();
        let second = rate_at(&chart, rate, goal, &config).unwrap();

        prop_assert_eq!(first, second);
        prop_assert!(first.skillsets.is_valid());
    }
}
