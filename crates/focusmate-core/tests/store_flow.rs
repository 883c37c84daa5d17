//! Cross-module flow over an on-disk store: two users work through a day of
//! deadlines, focus sessions, badges, a message, and a photo.

use chrono::NaiveDate;
use focusmate_core::db::{open_store, query};
use focusmate_core::model::DONE_ORDER;
use focusmate_core::{deadline, focus, friend, message, picture, user};

#[test]
fn full_day_flow() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut conn = open_store(&dir.path().join("focusmate.sqlite3")).expect("open store");

    let mei = user::create_user(&mut conn, "mei", None).expect("create mei");
    let kai = user::create_user(&mut conn, "kai", Some("early bird")).expect("create kai");

    // Mei plans her day.
    let read = deadline::add_item(&mut conn, mei, "read chapter 4", None).expect("add");
    let notes = deadline::add_item(&mut conn, mei, "rewrite notes", None).expect("add");
    let quiz = deadline::add_item(
        &mut conn,
        mei,
        "practice quiz",
        NaiveDate::from_ymd_opt(2025, 3, 2),
    )
    .expect("add");

    // She starts studying and knocks out the reading.
    user::set_studying(&conn, mei, true).expect("studying on");
    deadline::set_doing(&conn, mei, read.id, true).expect("doing");

    let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");
    let end = today.and_hms_opt(15, 53, 0).expect("time");
    let outcome = focus::save_session(&mut conn, mei, end, 90 * 60, Some("deep work"))
        .expect("save session");
    assert_eq!(outcome.total_minutes, 90);
    assert!(outcome.badge_earned);

    user::set_studying(&conn, mei, false).expect("studying off");
    deadline::set_done(&conn, mei, read.id, true).expect("done");

    // The list comes back dense with the finished item parked at -1.
    let items = deadline::list(&mut conn, mei).expect("list");
    let view: Vec<(i64, i64, bool)> = items
        .iter()
        .map(|item| (item.id, item.display_order, item.is_done))
        .collect();
    assert_eq!(
        view,
        vec![
            (notes.id, 1, false),
            (quiz.id, 2, false),
            (read.id, DONE_ORDER, true),
        ]
    );

    // Her record shows the split session and the earned badge.
    let status = user::record_status(&conn, mei, today).expect("record status");
    assert_eq!(status.badge_count, 1);
    assert_eq!(status.minutes_today, 90);
    let record = focus::daily_record(&conn, mei, today).expect("daily record");
    assert_eq!(record[14], 37);
    assert_eq!(record[15], 53);

    // She spends the badge nudging kai.
    friend::add_friend(&conn, mei, kai).expect("add friend");
    assert_eq!(friend::list_friends(&conn, mei).expect("friends"), vec![kai]);
    message::send_message(&mut conn, mei, kai, "your turn to study!").expect("send");
    assert_eq!(query::badge_count(&conn, mei).expect("badge"), 0);

    let unread = message::latest_unread(&conn, kai)
        .expect("poll")
        .expect("has unread");
    assert_eq!(unread.sender_name, "mei");
    message::mark_read(&conn, unread.id).expect("read");
    assert!(message::latest_unread(&conn, kai).expect("poll").is_none());

    // A second badge requires a second hour; the empty balance blocks sends.
    let err = message::send_message(&mut conn, mei, kai, "again!").expect_err("no badges left");
    assert!(err.to_string().contains("no badges"));

    // Proof-of-work photo.
    let photo_id = picture::add_picture(&conn, mei, &[0xFF, 0xD8, 0xFF]).expect("store photo");
    assert_eq!(
        picture::get_picture(&conn, photo_id).expect("fetch photo"),
        vec![0xFF, 0xD8, 0xFF]
    );

    // Range totals cover exactly the one day that has buckets.
    let totals = focus::range_totals(
        &conn,
        mei,
        NaiveDate::from_ymd_opt(2025, 2, 24).expect("date"),
        today,
    )
    .expect("range totals");
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].date, today);
    assert_eq!(totals[0].minutes, 90);
}

#[test]
fn reopened_store_sees_prior_state() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("focusmate.sqlite3");

    let mei = {
        let mut conn = open_store(&path).expect("open store");
        let mei = user::create_user(&mut conn, "mei", None).expect("create");
        deadline::add_item(&mut conn, mei, "persists", None).expect("add");
        mei
    };

    let mut conn = open_store(&path).expect("reopen store");
    let items = deadline::list(&mut conn, mei).expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].task, "persists");
}
