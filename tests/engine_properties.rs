use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use gaze::engine::{AlertEvaluator, ProcessDirectory, ProcessEntry, Sample, SampleBuffer};

fn at(offset: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(offset as i64)
}

fn listing(tag: u32) -> Vec<ProcessEntry> {
    vec![ProcessEntry::new(tag, Some("worker"), 0.0)]
}

fn completion_orders() -> impl Strategy<Value = Vec<usize>> {
    (1usize..8).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

proptest! {
    #[test]
    fn window_keeps_the_newest_samples_in_order(
        cpus in prop::collection::vec(0.0f64..100.0, 0..80),
        capacity in 1usize..40,
    ) {
        let samples: Vec<Sample> = cpus
            .iter()
            .enumerate()
            .map(|(i, &cpu)| Sample::new(at(i), cpu, 0.0))
            .collect();
        let mut buffer = SampleBuffer::new(capacity);
        for sample in &samples {
            buffer.append(*sample);
            prop_assert!(buffer.len() <= capacity);
        }

        let expected = &samples[samples.len().saturating_sub(capacity)..];
        prop_assert_eq!(buffer.snapshot(), expected.to_vec());
        match samples.last() {
            Some(last) => prop_assert_eq!(buffer.current(), *last),
            None => prop_assert_eq!(buffer.current(), Sample::default()),
        }
    }

    #[test]
    fn alert_fires_only_strictly_above_threshold(
        cpu in -50.0f64..250.0,
        threshold in 0.0f64..100.0,
    ) {
        let state = AlertEvaluator::new(threshold).evaluate(&Sample::new(at(0), cpu, 0.0));
        prop_assert_eq!(state.active, cpu > threshold);
    }

    #[test]
    fn filter_yields_ordered_subset(
        names in prop::collection::vec(prop::option::of("[a-zA-Z]{0,8}"), 0..30),
        term in "[a-zA-Z]{0,3}",
    ) {
        let entries: Vec<ProcessEntry> = names
            .iter()
            .enumerate()
            .map(|(i, name)| ProcessEntry::new(i as u32, name.as_deref(), 0.0))
            .collect();
        let mut directory = ProcessDirectory::new();
        let ticket = directory.begin_refresh();
        directory.complete_refresh(ticket, Ok(entries.clone())).unwrap();
        directory.set_filter(term.clone());

        let needle = term.to_lowercase();
        let expected: Vec<ProcessEntry> = entries
            .into_iter()
            .filter(|e| {
                needle.is_empty()
                    || e.name.as_ref().is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect();
        prop_assert_eq!(directory.visible(), expected);
    }

    #[test]
    fn newest_issued_fetch_wins_regardless_of_completion_order(order in completion_orders()) {
        let mut directory = ProcessDirectory::new();
        let tickets: Vec<_> = order.iter().map(|_| directory.begin_refresh()).collect();
        let newest = tickets.len() - 1;

        for &index in &order {
            let outcome = directory.complete_refresh(tickets[index], Ok(listing(index as u32)));
            if index == newest {
                prop_assert!(outcome.is_ok());
            }
        }
        prop_assert_eq!(directory.visible(), listing(newest as u32));
    }
}
