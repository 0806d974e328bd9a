//! Integration tests for a full play-through.

use dreadroom_core::{
    Action, Config, CoreError, DeathCause, Event, Outcome, RecordingSink, Session,
    ValidationError,
};

fn session() -> Session<RecordingSink> {
    Session::new(&Config::default(), RecordingSink::new()).unwrap()
}

fn solve_lock(s: &mut Session<RecordingSink>, now_ms: u64) -> Vec<Event> {
    let mut events = Vec::new();
    for (wheel, digit) in [6usize, 7, 4, 1].into_iter().enumerate() {
        for _ in 0..digit {
            events.extend(s.turn_lock(wheel, now_ms).unwrap());
        }
    }
    events
}

#[test]
fn test_full_escape_workflow() {
    let mut s = session();

    // Ask for hints, open the box, then walk to the door.
    s.request_dialogue(0);
    s.request_dialogue(5_000);
    let events = solve_lock(&mut s, 12_000);
    assert!(events.iter().any(|e| matches!(e, Event::LockSolved { at_ms: 12_000 })));

    for key in "538927".chars() {
        s.press_key(key, 40_000).unwrap();
    }
    assert_eq!(s.snapshot().keypad, "538927");
    let events = s.press_key('E', 41_000).unwrap();

    assert!(events.iter().any(|e| matches!(e, Event::Disarmed { .. })));
    assert!(matches!(
        events.last(),
        Some(Event::Escaped { at_ms: 41_000, .. })
    ));
    assert_eq!(s.outcome(), Outcome::Escaped);

    // Past the deadline nothing happens any more.
    s.advance_to(500_000);
    let snap = s.snapshot();
    assert_eq!(snap.outcome, Outcome::Escaped);
    assert_eq!(snap.tension.degradation_level, 68);
    assert_eq!(s.engine().sink().stops, 1);
    assert!(s.engine().sink().deaths.is_empty());
}

#[test]
fn test_idle_player_dies_at_hidden_deadline_not_countdown() {
    let mut s = session();
    s.interact(0);

    let snap = s.snapshot();
    assert_eq!(snap.countdown, "1:30");

    let events = s.advance_to(60_000);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Died {
            cause: DeathCause::Exhausted,
            at_ms: 60_000,
            ..
        }
    )));
    let snap = s.snapshot();
    assert_eq!(snap.outcome, Outcome::Dead);
    // The visible clock still claims half a minute is left.
    assert_eq!(snap.countdown, "0:30");
}

#[test]
fn test_wrong_code_then_correct_code() {
    let mut s = session();
    for key in "111111E".chars() {
        s.press_key(key, 1_000).unwrap();
    }
    assert_eq!(s.outcome(), Outcome::Playing);

    let events = s.press_key('C', 1_000).unwrap();
    assert!(matches!(
        &events[..],
        [Event::KeypadChanged { display, .. }] if display == "------"
    ));
    for key in "538927E".chars() {
        s.press_key(key, 2_000).unwrap();
    }
    assert_eq!(s.outcome(), Outcome::Escaped);
}

#[test]
fn test_exhausted_dialogue_kills() {
    let mut s = session();
    let lines = Config::default().dialogue.lines.len();
    for i in 0..lines {
        let events = s.request_dialogue(i as u64 * 100);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::DialogueShown { index, .. } if *index == i)));
    }

    // Asked again while the last line is still on screen.
    let events = s.request_dialogue(500);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Died {
            cause: DeathCause::Forced,
            ..
        }
    )));
    assert!(!events.iter().any(|e| matches!(e, Event::DialogueShown { .. })));

    // The last line stays up; no close is scheduled for a dead player.
    assert!(s.snapshot().dialogue.is_some());
    assert!(s
        .advance_to(100_000)
        .iter()
        .all(|e| !matches!(e, Event::DialogueClosed { .. })));
    assert!(s.request_dialogue(100_001).is_empty());
    assert_eq!(s.engine().sink().deaths.len(), 1);
}

#[test]
fn test_new_line_replaces_open_dialogue() {
    let mut s = session();
    s.request_dialogue(0);
    s.request_dialogue(100);
    let snap = s.snapshot();
    let second = &Config::default().dialogue.lines[1];
    assert!(second.starts_with(snap.dialogue.as_deref().unwrap()));
}

#[test]
fn test_invalid_input_is_reported() {
    let mut s = session();
    let err = s.apply(Action::TurnLock { wheel: 4 }, 0).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::OutOfBounds { index: 4, .. })
    ));
    assert!(s.apply(Action::PressKey { key: 'x' }, 0).is_err());
    // Rejected input is not a first interaction.
    assert_eq!(s.outcome(), Outcome::Waiting);
    assert!(s.next_deadline().is_none());
}

#[test]
fn test_custom_config_changes_deadline() {
    let mut cfg = Config::default();
    cfg.tension.max_degradation = 150;
    let mut s = Session::new(&cfg, RecordingSink::new()).unwrap();
    s.interact(0);
    s.advance_to(89_999);
    assert_eq!(s.outcome(), Outcome::Playing);
    s.advance_to(90_000);
    assert_eq!(s.outcome(), Outcome::Dead);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut cfg = Config::default();
    cfg.puzzles.lock_combination = vec![];
    assert!(Session::new(&cfg, RecordingSink::new()).is_err());
}
