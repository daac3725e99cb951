//! Day export tests.
//!
//! Remarks are seeded through the normal handlers, then the export run
//! is invoked directly so its output order and totals are deterministic.

mod common;

use chrono::Utc;
use common::{
    callback_event, photo_event, register, test_state, text_event, texts_to, Sent, OPS_CHAT,
};
use rounds_bot::dispatch::handle_event;
use rounds_bot::report::{ExportSummary, Reporter};
use sqlx::SqlitePool;

const INSPECTOR: i64 = 910_000_003;

#[sqlx::test(migrations = "../db/migrations")]
async fn export_walks_rooms_in_hierarchy_order(pool: SqlitePool) {
    let (state, outbound) = test_state(pool);
    register(&state, &outbound, INSPECTOR).await;

    // Kitchen: a text and a captioned photo.
    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open kitchen");
    handle_event(&state, text_event(INSPECTOR, "dripping tap"))
        .await
        .expect("kitchen text");
    handle_event(&state, photo_event(INSPECTOR, "f1", Some("leak")))
        .await
        .expect("kitchen photo");

    // Lobby: remarked but closed as good, so it must not be forwarded.
    handle_event(&state, callback_event(INSPECTOR, "lobby"))
        .await
        .expect("open lobby");
    handle_event(&state, text_event(INSPECTOR, "smudged glass"))
        .await
        .expect("lobby text");
    handle_event(&state, callback_event(INSPECTOR, "mark_good_lobby"))
        .await
        .expect("mark lobby good");

    // Boiler room: one text.
    handle_event(&state, callback_event(INSPECTOR, "boiler"))
        .await
        .expect("open boiler");
    handle_event(&state, text_event(INSPECTOR, "pressure gauge reads high"))
        .await
        .expect("boiler text");
    outbound.take().await;

    let day = Utc::now().date_naive();
    let summary = Reporter::new(state.clone(), INSPECTOR)
        .export_day(day)
        .await
        .expect("export");
    assert_eq!(
        summary,
        ExportSummary {
            rooms: 2,
            remarks: 3
        }
    );

    let sent = outbound.take().await;
    let ops = texts_to(&sent, OPS_CHAT);
    assert_eq!(ops[0], format!("📤 Exporting remarks for {day}…"));
    assert_eq!(ops[1], "📍 First floor\n➡️ Kitchen (2 remark(s))");
    assert_eq!(ops[2], "👤 dripping tap");
    assert_eq!(ops[3], "📍 Basement\n➡️ Boiler room (1 remark(s))");
    assert_eq!(ops[4], "👤 pressure gauge reads high");
    assert_eq!(
        ops[5],
        format!("📤 Export finished for {day}: 2 room(s), 3 remark(s).")
    );
    assert!(
        ops.iter().all(|text| !text.contains("Lobby")),
        "good rooms must not be forwarded"
    );

    // A lone photo goes out as a plain photo, not a one-item album.
    assert!(sent.contains(&Sent::Photo {
        chat_id: OPS_CHAT,
        file_id: "f1".into(),
        caption: Some("👤 leak".into()),
    }));

    // The requester only sees the bookend summaries.
    let mine = texts_to(&sent, INSPECTOR);
    assert_eq!(mine.len(), 2);
    assert!(mine[0].starts_with("📤 Exporting remarks"));
    assert!(mine[1].starts_with("📤 Export finished"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_with_no_qualifying_rooms_still_sends_summaries(pool: SqlitePool) {
    let (state, outbound) = test_state(pool);
    register(&state, &outbound, INSPECTOR).await;
    outbound.take().await;

    let day = Utc::now().date_naive();
    let summary = Reporter::new(state.clone(), INSPECTOR)
        .export_day(day)
        .await
        .expect("export");
    assert_eq!(summary, ExportSummary::default());

    let sent = outbound.take().await;
    assert_eq!(sent.len(), 4, "start and completion to requester and ops");
    assert_eq!(
        texts_to(&sent, INSPECTOR)[1],
        format!("📤 Export finished for {day}: 0 room(s), 0 remark(s).")
    );
    assert_eq!(texts_to(&sent, OPS_CHAT).len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_export_is_refused(pool: SqlitePool) {
    let (state, outbound) = test_state(pool);
    register(&state, &outbound, INSPECTOR).await;

    assert!(state.try_begin_export(), "slot starts free");
    handle_event(&state, callback_event(INSPECTOR, "send_report"))
        .await
        .expect("press send report");
    assert_eq!(
        texts_to(&outbound.take().await, INSPECTOR),
        vec!["📤 An export is already running.".to_string()]
    );

    state.finish_export();
    assert!(state.try_begin_export(), "slot frees up after the run");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_only_covers_the_requested_day(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open kitchen");
    handle_event(&state, text_event(INSPECTOR, "old finding"))
        .await
        .expect("remark");
    outbound.take().await;

    // Age every remark by one day; today's export must not pick them up.
    sqlx::query("UPDATE remarks SET day = date(day, '-1 day')")
        .execute(&pool)
        .await
        .expect("backdate remarks");

    let summary = Reporter::new(state.clone(), INSPECTOR)
        .export_day(Utc::now().date_naive())
        .await
        .expect("export");
    assert_eq!(summary, ExportSummary::default());
    assert!(texts_to(&outbound.take().await, OPS_CHAT)
        .iter()
        .all(|text| !text.contains("old finding")));
}
