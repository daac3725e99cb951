//! Menu navigation and remark lifecycle tests.
//!
//! Each test walks a registered inspector through callbacks and messages
//! the way Telegram would deliver them, then checks the rendered menus,
//! the replayed history and the rows behind them.

mod common;

use common::{
    callback_event, command_event, last_inline_rows, photo_event, register, test_state,
    text_event, texts_to, Sent,
};
use rounds_bot::dispatch::handle_event;
use rounds_core::types::RoomStatus;
use rounds_db::repositories::{RemarkRepo, UserRepo};
use sqlx::SqlitePool;

const INSPECTOR: i64 = 910_000_002;

async fn current_room(pool: &SqlitePool) -> Option<String> {
    UserRepo::find_by_id(pool, INSPECTOR)
        .await
        .expect("query profile")
        .expect("profile exists")
        .current_room
}

#[sqlx::test(migrations = "../db/migrations")]
async fn department_then_room_selection(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "first_floor"))
        .await
        .expect("open department");
    let sent = outbound.take().await;
    assert_eq!(
        texts_to(&sent, INSPECTOR),
        vec!["📍 First floor\nChoose a room:".to_string()]
    );
    let rows = last_inline_rows(&sent, INSPECTOR);
    assert_eq!(rows[0][0].label, "⬜ Kitchen");
    assert_eq!(rows[1][0].label, "⬜ Lobby");
    assert_eq!(rows[2][0].callback, "back_to_departments");

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open room");
    let sent = outbound.take().await;
    let texts = texts_to(&sent, INSPECTOR);
    assert_eq!(texts.len(), 1, "an empty room has no history to replay");
    assert!(texts[0].contains("it has 0 remark(s)"));
    assert!(texts[0].contains("Check the stoves."));
    assert!(texts[0].contains("➡️ Kitchen"));
    assert_eq!(current_room(&pool).await.as_deref(), Some("kitchen"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn text_remark_lands_in_open_room(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open room");
    outbound.take().await;

    handle_event(&state, text_event(INSPECTOR, "dripping tap"))
        .await
        .expect("send remark");
    let texts = texts_to(&outbound.take().await, INSPECTOR);
    assert!(texts[0].contains("now has 1 remark(s)"));
    assert_eq!(
        RemarkRepo::count_for_room(&pool, "kitchen", None)
            .await
            .expect("count"),
        1
    );

    // Back on the department menu the room shows its count and the open
    // room pointer is gone.
    handle_event(&state, callback_event(INSPECTOR, "back_to_first_floor"))
        .await
        .expect("back to department");
    let rows = last_inline_rows(&outbound.take().await, INSPECTOR);
    assert_eq!(rows[0][0].label, "✍️ Kitchen (1)");
    assert_eq!(current_room(&pool).await, None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mark_good_freezes_room(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open room");
    handle_event(&state, text_event(INSPECTOR, "dripping tap"))
        .await
        .expect("send remark");
    outbound.take().await;

    handle_event(&state, callback_event(INSPECTOR, "mark_good_kitchen"))
        .await
        .expect("mark good");
    let sent = outbound.take().await;
    let texts = texts_to(&sent, INSPECTOR);
    assert_eq!(
        texts[0],
        "🤖 Room marked as good 👍\nIts 1 remark(s) will not be forwarded."
    );
    assert!(texts[1].contains("Choose a room"));
    let rows = last_inline_rows(&sent, INSPECTOR);
    assert_eq!(rows[0][0].label, "👍 Kitchen");

    assert_eq!(
        RemarkRepo::room_status(&pool, "kitchen", None)
            .await
            .expect("status"),
        RoomStatus::Good
    );
    assert_eq!(current_room(&pool).await, None);

    // With no room open a stray text is answered with the menu, not
    // recorded.
    handle_event(&state, text_event(INSPECTOR, "stray thought"))
        .await
        .expect("send stray text");
    let texts = texts_to(&outbound.take().await, INSPECTOR);
    assert!(texts[0].contains("Choose a department"));
    assert_eq!(
        RemarkRepo::count_for_room(&pool, "kitchen", None)
            .await
            .expect("count"),
        1
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reopen_restores_commenting(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open room");
    handle_event(&state, text_event(INSPECTOR, "dripping tap"))
        .await
        .expect("send remark");
    handle_event(&state, callback_event(INSPECTOR, "mark_good_kitchen"))
        .await
        .expect("mark good");
    outbound.take().await;

    // Selecting a closed room shows the summary view without replaying.
    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open closed room");
    let sent = outbound.take().await;
    assert_eq!(
        texts_to(&sent, INSPECTOR),
        vec!["🤖 Marked as good, 1 remark(s) will not be forwarded 👍\n\n📍 First floor\n➡️ Kitchen".to_string()]
    );
    let rows = last_inline_rows(&sent, INSPECTOR);
    assert_eq!(rows[0][0].callback, "open_comments_kitchen");

    handle_event(&state, callback_event(INSPECTOR, "open_comments_kitchen"))
        .await
        .expect("reopen");
    let texts = texts_to(&outbound.take().await, INSPECTOR);
    assert_eq!(texts[0], "🤖 Earlier you wrote:");
    assert_eq!(texts[1], "👤 dripping tap");
    assert_eq!(texts[2], "🤖 Remarks reopened ✍️ You can continue commenting.");

    assert_eq!(
        RemarkRepo::room_status(&pool, "kitchen", None)
            .await
            .expect("status"),
        RoomStatus::Pending
    );
    assert_eq!(current_room(&pool).await.as_deref(), Some("kitchen"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replayed_history_groups_photo_albums(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open room");
    handle_event(&state, photo_event(INSPECTOR, "f1", Some("leak")))
        .await
        .expect("first photo");
    handle_event(&state, photo_event(INSPECTOR, "f2", Some("leak")))
        .await
        .expect("second photo");
    handle_event(&state, text_event(INSPECTOR, "note"))
        .await
        .expect("text remark");
    handle_event(&state, callback_event(INSPECTOR, "back_to_first_floor"))
        .await
        .expect("leave room");
    outbound.take().await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("re-enter room");
    let sent = outbound.take().await;
    let texts = texts_to(&sent, INSPECTOR);
    assert_eq!(texts[0], "🤖 Earlier you wrote:");
    assert!(sent.contains(&Sent::Album {
        chat_id: INSPECTOR,
        file_ids: vec!["f1".into(), "f2".into()],
        caption: Some("👤 leak".into()),
    }));
    assert_eq!(texts[1], "👤 note");
    assert!(texts.last().expect("room view").contains("it has 3 remark(s)"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_callback_reports_room_not_found(pool: SqlitePool) {
    let (state, outbound) = test_state(pool);
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "bogus_target"))
        .await
        .expect("press unknown button");
    assert_eq!(
        texts_to(&outbound.take().await, INSPECTOR),
        vec!["Error: room not found.".to_string()]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_room_pointer_resets_to_departments(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    // A room id that used to exist in an older hierarchy file.
    UserRepo::set_current_room(&pool, INSPECTOR, Some("demolished"))
        .await
        .expect("point at removed room");

    handle_event(&state, text_event(INSPECTOR, "dripping tap"))
        .await
        .expect("send text");
    let texts = texts_to(&outbound.take().await, INSPECTOR);
    assert!(texts[0].contains("Choose a department"));
    assert_eq!(current_room(&pool).await, None);
    assert_eq!(
        RemarkRepo::count_for_room(&pool, "demolished", None)
            .await
            .expect("count"),
        0
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn report_button_appears_once_every_room_is_covered(pool: SqlitePool) {
    let (state, outbound) = test_state(pool.clone());
    register(&state, &outbound, INSPECTOR).await;

    handle_event(&state, callback_event(INSPECTOR, "kitchen"))
        .await
        .expect("open room");
    handle_event(&state, text_event(INSPECTOR, "dripping tap"))
        .await
        .expect("remark");
    handle_event(&state, callback_event(INSPECTOR, "mark_good_lobby"))
        .await
        .expect("mark lobby");
    outbound.take().await;

    // The basement is still untouched.
    handle_event(&state, command_event(INSPECTOR, "start"))
        .await
        .expect("menu");
    let rows = last_inline_rows(&outbound.take().await, INSPECTOR);
    assert!(rows
        .iter()
        .flatten()
        .all(|button| button.callback != "send_report"));
    assert!(rows[0][0].label.starts_with("✅"), "label: {}", rows[0][0].label);

    handle_event(&state, callback_event(INSPECTOR, "mark_good_boiler"))
        .await
        .expect("mark boiler");
    outbound.take().await;

    handle_event(&state, command_event(INSPECTOR, "start"))
        .await
        .expect("menu again");
    let rows = last_inline_rows(&outbound.take().await, INSPECTOR);
    let last_row = rows.last().expect("rows");
    assert_eq!(last_row[0].callback, "send_report");
    assert_eq!(last_row[0].label, "📤 Send today's report");
}
