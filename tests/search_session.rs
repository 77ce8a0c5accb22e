use std::time::Duration;

use merch_quote_api::search::SearchSession;

#[tokio::test(start_paused = true)]
async fn blank_terms_never_fetch() {
    let session = SearchSession::default();
    let result = session
        .search("   ", |_| async { panic!("blank term fetched") })
        .await;
    assert_eq!(result, None::<()>);
}

#[tokio::test(start_paused = true)]
async fn newer_keystroke_wins_over_slow_response() {
    let session = SearchSession::new(Duration::from_millis(300));

    let slow = {
        let session = session.clone();
        tokio::spawn(async move {
            session
                .search("ac", |term| async move {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    term
                })
                .await
        })
    };

    // let the first search clear its debounce and start fetching
    tokio::time::sleep(Duration::from_millis(400)).await;

    let fast = session
        .search("acme", |term| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            term
        })
        .await;
    assert_eq!(fast.as_deref(), Some("acme"));
    assert_eq!(slow.await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn keystrokes_inside_the_quiet_period_are_coalesced() {
    let session = SearchSession::default();
    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.search("a", |t| async move { t }).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = session.search("ab", |t| async move { t }).await;
    assert_eq!(second.as_deref(), Some("ab"));
    assert_eq!(first.await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_search() {
    let session = SearchSession::default();
    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.search("mugs", |t| async move { t }).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    session.cancel();
    assert_eq!(pending.await.unwrap(), None);
}
