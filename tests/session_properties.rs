use assert_matches::assert_matches;

use typesprint::{Key, Modifier, Mode, Session, Snapshot, Status, StatusChange};

const WORDS: Mode = Mode::Words { target_length: 1 };

fn type_str(session: &mut Session, text: &str) -> Snapshot {
    let mut last = session.snapshot();
    for c in text.chars() {
        last = session.apply_key(Key::Char(c));
    }
    last
}

fn assert_invariants(session: &Session) {
    let snap = session.snapshot();
    assert_eq!(session.typed().len(), snap.cursor_index);
    assert!(snap.cursor_index <= snap.text_length);
    assert!(snap.accuracy_percent <= 100);
    if snap.elapsed_seconds == 0 {
        assert_eq!(snap.words_per_minute, 0);
    }
}

#[test]
fn cat_typed_cleanly() {
    let mut session = Session::new("cat", WORDS);
    let snap = type_str(&mut session, "cat");

    assert_eq!(snap.status, Status::Finished);
    assert_eq!(snap.correct_count, 3);
    assert_eq!(snap.error_count, 0);
    assert_eq!(snap.accuracy_percent, 100);
}

#[test]
fn cat_typed_with_one_error() {
    let mut session = Session::new("cat", WORDS);
    let snap = type_str(&mut session, "cxt");

    assert_eq!(snap.status, Status::Finished);
    assert_eq!(snap.correct_count, 2);
    assert_eq!(snap.error_count, 1);
    assert_eq!(snap.accuracy_percent, 67);
}

#[test]
fn counts_cover_every_visited_position_without_backspace() {
    let mut session = Session::new("the quick brown fox", WORDS);

    for c in "thx quack".chars() {
        let snap = session.apply_key(Key::Char(c));
        assert_eq!(snap.correct_count + snap.error_count, snap.cursor_index);
        assert_invariants(&session);
    }
}

#[test]
fn backspace_never_lowers_counts() {
    let mut session = Session::new("hello", WORDS);
    let keys = [
        Key::Char('h'),
        Key::Char('x'),
        Key::Backspace,
        Key::Backspace,
        Key::Backspace,
        Key::Char('h'),
        Key::Char('e'),
    ];

    let mut seen = 0;
    for key in keys {
        let snap = session.apply_key(key);
        let total = snap.correct_count + snap.error_count;
        assert!(total >= seen);
        seen = total;
        assert_invariants(&session);
    }

    let snap = session.snapshot();
    assert_eq!(snap.cursor_index, 2);
    assert_eq!(snap.correct_count, 3);
    assert_eq!(snap.error_count, 1);
}

#[test]
fn accuracy_is_full_before_typing() {
    for text in ["", "a", "some text"] {
        let session = Session::new(text, WORDS);
        assert_eq!(session.accuracy_percent(), 100);
        assert_eq!(session.words_per_minute(), 0);
    }
}

#[test]
fn time_mode_runs_out_after_fifteen_ticks() {
    let mut session = Session::new("plenty of words here", Mode::Time { limit_seconds: 15 });
    // an arrow key starts the clock without typing anything
    session.apply_key(Key::Other);
    assert_eq!(session.status(), Status::Running);

    for _ in 0..14 {
        assert_eq!(session.tick().status, Status::Running);
    }
    let snap = session.tick();

    assert_eq!(snap.status, Status::Finished);
    assert_eq!(snap.remaining_seconds, Some(0));
    assert_eq!(snap.elapsed_seconds, 15);
    assert_eq!(snap.cursor_index, 0);
    assert_eq!(snap.words_per_minute, 0);
}

#[test]
fn reset_after_finish_reuses_text() {
    let mut session = Session::new("cat", WORDS);
    type_str(&mut session, "cxt");
    session.reset(None);

    let snap = session.snapshot();
    assert_eq!(snap.status, Status::Idle);
    assert_eq!(session.reference_text(), "cat");
    assert_eq!(snap.cursor_index, 0);
    assert_eq!(snap.correct_count, 0);
    assert_eq!(snap.error_count, 0);
    assert_eq!(snap.elapsed_seconds, 0);
    assert!(session.typed().is_empty());
}

#[test]
fn reset_with_new_text_notifies_subscribers() {
    let mut session = Session::new("cat", WORDS);
    let rx = session.subscribe();
    type_str(&mut session, "cat");
    session.reset(Some("dog".into()));

    assert_eq!(session.reference_text(), "dog");
    let changes: Vec<StatusChange> = rx.try_iter().collect();
    assert_matches!(
        changes.as_slice(),
        [
            StatusChange { from: Status::Idle, to: Status::Running },
            StatusChange { from: Status::Running, to: Status::Finished },
            StatusChange { from: Status::Finished, to: Status::Idle },
        ]
    );
}

#[test]
fn modifiers_alone_never_start() {
    let mut session = Session::new("abc", Mode::Time { limit_seconds: 5 });
    let rx = session.subscribe();

    for m in [Modifier::Shift, Modifier::Alt, Modifier::Control, Modifier::Meta] {
        let snap = session.apply_key(Key::Modifier(m));
        assert_eq!(snap.status, Status::Idle);
    }

    assert!(!session.tickers().is_armed());
    assert_matches!(rx.try_recv(), Err(_));
}

#[test]
fn empty_text_is_finished_from_the_start() {
    let mut session = Session::new("", WORDS);
    assert_eq!(session.status(), Status::Finished);

    let snap = session.apply_key(Key::Char('a'));
    assert_eq!(snap.status, Status::Finished);
    assert_eq!(snap.cursor_index, 0);
    assert_eq!(snap.accuracy_percent, 100);
    assert_eq!(snap.words_per_minute, 0);
}

#[test]
fn finished_session_ignores_input() {
    let mut session = Session::new("ab", Mode::Time { limit_seconds: 60 });
    type_str(&mut session, "ab");
    let done = session.snapshot();

    assert_eq!(session.apply_key(Key::Char('c')), done);
    assert_eq!(session.apply_key(Key::Backspace), done);
    assert_eq!(session.tick(), done);
}
