//! Property tests for the session invariants over random action sequences.

use proptest::prelude::*;
use std::rc::Rc;

use super::*;
use crate::catalog::{Catalog, Track};
use crate::media::MediaEvent;
use crate::media::fake::FakeBackend;

const IDS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Action {
    Select(usize),
    Row(usize),
    Toggle,
    Next,
    Previous,
    Ended,
    Metadata(f64),
    Time(f64),
    Seek(f64),
    Volume(f32),
    Mute,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..IDS.len()).prop_map(Action::Select),
        (0..IDS.len()).prop_map(Action::Row),
        Just(Action::Toggle),
        Just(Action::Next),
        Just(Action::Previous),
        Just(Action::Ended),
        (0.0f64..600.0).prop_map(Action::Metadata),
        (-10.0f64..700.0).prop_map(Action::Time),
        (-2.0f64..3.0).prop_map(Action::Seek),
        (-1.0f32..2.0).prop_map(Action::Volume),
        Just(Action::Mute),
    ]
}

fn catalog() -> Rc<Catalog> {
    let tracks = IDS
        .iter()
        .map(|id| Track {
            id: (*id).into(),
            title: format!("Song {id}"),
            artist: "Artist".into(),
            source: format!("/music/{id}.mp3"),
            cover: None,
            display_duration: None,
        })
        .collect();
    Rc::new(Catalog::new(tracks).unwrap())
}

fn apply(m: &mut SessionManager<FakeBackend>, action: &Action) {
    let tagged = |m: &SessionManager<FakeBackend>, event: MediaEvent| {
        m.active_track_id().map(|id| Notification {
            track_id: id.to_string(),
            generation: m.current_generation(),
            event,
        })
    };

    let _ = match action {
        Action::Select(i) => m.select_track(IDS[*i]),
        Action::Row(i) => m.toggle_row(IDS[*i]),
        Action::Toggle => m.toggle_play_pause(),
        Action::Next => m.next(),
        Action::Previous => m.previous(),
        Action::Ended => match tagged(&*m, MediaEvent::Ended) {
            Some(n) => m.handle_notification(n),
            None => Ok(()),
        },
        Action::Metadata(d) => match tagged(&*m, MediaEvent::LoadedMetadata(*d)) {
            Some(n) => m.handle_notification(n),
            None => Ok(()),
        },
        Action::Time(t) => match tagged(&*m, MediaEvent::TimeUpdate(*t)) {
            Some(n) => m.handle_notification(n),
            None => Ok(()),
        },
        Action::Seek(f) => {
            m.seek(*f);
            Ok(())
        }
        Action::Volume(v) => {
            m.set_volume(*v);
            Ok(())
        }
        Action::Mute => {
            m.toggle_mute();
            Ok(())
        }
    };
}

proptest! {
    /// At most one element is ever audible, whichever layout issued the actions.
    #[test]
    fn at_most_one_source_plays(
        rows in prop::bool::ANY,
        actions in prop::collection::vec(action(), 1..60),
    ) {
        let backend = FakeBackend::default();
        let config = if rows { SessionConfig::rows() } else { SessionConfig::now_playing() };
        let mut m = SessionManager::new(backend.clone(), catalog(), config, LiveOutput::new());

        for action in &actions {
            apply(&mut m, action);
            prop_assert!(backend.playing_sources().len() <= 1, "after {:?}", action);

            let snap = m.snapshot();
            if snap.is_playing {
                prop_assert!(snap.active_track_id.is_some());
            }
            prop_assert!((0.0..=1.0).contains(&snap.volume));
        }
    }

    /// Two managers on one output never play together.
    #[test]
    fn shared_output_is_exclusive(
        actions in prop::collection::vec((prop::bool::ANY, action()), 1..60),
    ) {
        let backend = FakeBackend::default();
        let output = LiveOutput::new();
        let cat = catalog();
        let mut player = SessionManager::new(backend.clone(), Rc::clone(&cat), SessionConfig::now_playing(), output.clone());
        let mut rows = SessionManager::new(backend.clone(), cat, SessionConfig::rows(), output);

        for (first, action) in &actions {
            let target = if *first { &mut player } else { &mut rows };
            apply(target, action);
            prop_assert!(backend.playing_sources().len() <= 1);
            prop_assert!(!(player.is_playing() && rows.is_playing()));
        }
    }

    /// Elapsed stays inside [0, total] once the total is known.
    #[test]
    fn elapsed_stays_within_total(
        total in 1.0f64..600.0,
        actions in prop::collection::vec(action(), 1..40),
    ) {
        let backend = FakeBackend::default();
        let mut m = SessionManager::new(backend, catalog(), SessionConfig::single(), LiveOutput::new());
        m.select_track("a").unwrap();
        let n = Notification {
            track_id: "a".into(),
            generation: m.current_generation(),
            event: MediaEvent::LoadedMetadata(total),
        };
        m.handle_notification(n).unwrap();

        for action in &actions {
            apply(&mut m, action);
            let snap = m.snapshot();
            if let Some(total) = snap.total {
                prop_assert!(snap.elapsed >= 0.0 && snap.elapsed <= total);
            }
            prop_assert!((0.0..=1.0).contains(&snap.progress().ratio()));
        }
    }

    #[test]
    fn seek_target_always_clamps(fraction in -5.0f64..5.0, total in 0.1f64..10_000.0) {
        let target = seek_target(fraction, Some(total)).unwrap();
        prop_assert!(target >= 0.0 && target <= total);
    }

    #[test]
    fn format_time_seconds_are_two_digits(secs in 0.0f64..100_000.0) {
        let formatted = format_time(secs);
        let (mins, rest) = formatted.split_once(':').unwrap();
        prop_assert_eq!(rest.len(), 2);
        prop_assert!(rest.parse::<u64>().unwrap() < 60);
        prop_assert_eq!(mins.parse::<u64>().unwrap(), (secs / 60.0).floor() as u64);
    }
}
