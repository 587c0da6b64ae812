use anime_search::{
    load_detail, App, DetailView, Flow, Route, SearchController, SearchEvent, SearchOutcome,
    SharedStore,
};
use catalog::{AnimeDetails, AnimePage, CatalogApi, CatalogError};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, timeout, Instant};

const DEBOUNCE: Duration = Duration::from_millis(250);

/// In-memory catalog that records every search it receives.
#[derive(Default)]
struct FakeCatalog {
    calls: Mutex<Vec<(String, u32)>>,
    rate_limited: AtomicBool,
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeCatalog {
    fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    fn delay(&self, query: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
    }

    fn fail(&self, query: &str) {
        self.failing.lock().unwrap().insert(query.to_string());
    }
}

fn page_for(query: &str, page: u32) -> AnimePage {
    serde_json::from_value(json!({
        "data": [{ "mal_id": 1, "title": format!("{} result", query), "score": 7.5 }],
        "pagination": {
            "current_page": page,
            "last_visible_page": 5,
            "has_next_page": page < 5
        }
    }))
    .unwrap()
}

impl CatalogApi for FakeCatalog {
    async fn search_anime(&self, query: &str, page: u32) -> Result<AnimePage, CatalogError> {
        self.calls.lock().unwrap().push((query.to_string(), page));

        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(CatalogError::RateLimited);
        }
        if self.failing.lock().unwrap().contains(query) {
            return Err(CatalogError::Status { status: 500 });
        }
        Ok(page_for(query, page))
    }

    async fn get_anime(&self, id: u32) -> Result<Option<AnimeDetails>, CatalogError> {
        match id {
            1 => Ok(Some(
                serde_json::from_value(json!({
                    "mal_id": 1,
                    "title": "Cowboy Bebop",
                    "score": 8.75,
                    "synopsis": "Crime is timeless."
                }))
                .unwrap(),
            )),
            429 => Err(CatalogError::RateLimited),
            _ => Ok(None),
        }
    }
}

fn setup() -> (
    Arc<FakeCatalog>,
    SearchController<FakeCatalog>,
    UnboundedReceiver<SearchEvent>,
) {
    let catalog = Arc::new(FakeCatalog::default());
    let (controller, events) =
        SearchController::new(catalog.clone(), SharedStore::new(), DEBOUNCE);
    (catalog, controller, events)
}

/// Receive events until one that ends a search arrives.
async fn next_outcome(events: &mut UnboundedReceiver<SearchEvent>) -> SearchEvent {
    loop {
        match events.recv().await {
            Some(SearchEvent::Loading { .. }) => continue,
            Some(event) => return event,
            None => panic!("event channel closed"),
        }
    }
}

async fn assert_quiet(events: &mut UnboundedReceiver<SearchEvent>) {
    assert!(
        timeout(Duration::from_secs(5), events.recv()).await.is_err(),
        "unexpected search event"
    );
}

#[tokio::test(start_paused = true)]
async fn landing_search_runs_once_with_empty_query() {
    let (catalog, mut controller, mut events) = setup();

    controller.start();
    assert_eq!(
        events.recv().await,
        Some(SearchEvent::Loading {
            query: String::new(),
            page: 1
        })
    );
    assert!(matches!(next_outcome(&mut events).await, SearchEvent::Updated { .. }));

    controller.start();
    assert_quiet(&mut events).await;
    assert_eq!(catalog.calls(), vec![(String::new(), 1)]);
}

#[tokio::test(start_paused = true)]
async fn only_final_keystroke_dispatches() {
    let (catalog, mut controller, mut events) = setup();

    for text in ["n", "na", "nar", "naru", "naruto"] {
        controller.on_query_changed(text);
        assert_eq!(controller.text(), text);
        sleep(Duration::from_millis(100)).await;
    }

    assert!(matches!(next_outcome(&mut events).await, SearchEvent::Updated { .. }));
    assert_quiet(&mut events).await;

    assert_eq!(catalog.calls(), vec![("naruto".to_string(), 1)]);
    assert_eq!(controller.store().snapshot().query, "naruto");
}

#[tokio::test(start_paused = true)]
async fn successful_search_populates_store() {
    let (_catalog, mut controller, mut events) = setup();

    controller.on_query_changed("naruto");
    let outcome = next_outcome(&mut events).await;
    assert_eq!(
        outcome,
        SearchEvent::Updated {
            query: "naruto".to_string(),
            page: 1,
            results: 1
        }
    );

    let state = controller.store().snapshot();
    assert!(!state.loading);
    assert_eq!(state.list.len(), 1);
    assert_eq!(state.list[0].title, "naruto result");
    assert_eq!(state.pagination.as_ref().map(|p| p.last_page), Some(5));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_keeps_previous_results() {
    let (catalog, controller, _events) = setup();

    assert_eq!(
        controller.search("naruto", 1).await,
        Ok(SearchOutcome::Applied { results: 1 })
    );
    let before = controller.store().snapshot();

    catalog.rate_limited.store(true, Ordering::SeqCst);
    let result = controller.search("bleach", 1).await;
    assert_eq!(
        result,
        Err("Too many requests. Please wait a moment.".to_string())
    );

    let after = controller.store().snapshot();
    assert!(!after.loading);
    assert_eq!(after.list, before.list);
    assert_eq!(after.pagination, before.pagination);
}

#[tokio::test(start_paused = true)]
async fn background_failure_is_published() {
    let (catalog, mut controller, mut events) = setup();
    catalog.rate_limited.store(true, Ordering::SeqCst);

    controller.on_query_changed("one piece");
    assert_eq!(
        next_outcome(&mut events).await,
        SearchEvent::Failed {
            query: "one piece".to_string(),
            page: 1,
            message: "Too many requests. Please wait a moment.".to_string()
        }
    );
    assert!(!controller.store().snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn page_change_skips_debounce() {
    let (catalog, mut controller, mut events) = setup();

    controller.on_query_changed("naruto");
    next_outcome(&mut events).await;

    let clicked = Instant::now();
    controller.on_page_changed(2);
    assert!(matches!(
        next_outcome(&mut events).await,
        SearchEvent::Updated { page: 2, .. }
    ));
    assert!(clicked.elapsed() < DEBOUNCE);

    assert_eq!(
        catalog.calls(),
        vec![("naruto".to_string(), 1), ("naruto".to_string(), 2)]
    );
    assert_eq!(
        controller.store().snapshot().pagination.map(|p| p.current_page),
        Some(2)
    );
}

#[tokio::test(start_paused = true)]
async fn repeating_the_same_query_searches_once() {
    let (catalog, mut controller, mut events) = setup();

    controller.on_query_changed("naruto");
    controller.on_query_changed("naruto");
    next_outcome(&mut events).await;

    controller.on_query_changed("naruto");
    assert_quiet(&mut events).await;

    assert_eq!(catalog.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_cancels_pending_commit() {
    let (catalog, mut controller, mut events) = setup();

    controller.on_query_changed("nar");
    sleep(Duration::from_millis(100)).await;
    controller.on_query_changed("   ");

    assert_quiet(&mut events).await;
    assert!(catalog.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_commit() {
    let (catalog, mut controller, mut events) = setup();

    controller.on_query_changed("bleach");
    controller.shutdown();

    assert_quiet(&mut events).await;
    assert!(catalog.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_older_search_cannot_clobber_newer_results() {
    let (catalog, mut controller, mut events) = setup();
    catalog.delay("slow", Duration::from_secs(1));

    controller.on_query_changed("slow");
    sleep(DEBOUNCE + Duration::from_millis(50)).await;
    controller.on_query_changed("fast");

    let mut outcomes = Vec::new();
    while outcomes.len() < 2 {
        outcomes.push(next_outcome(&mut events).await);
    }

    assert!(matches!(
        &outcomes[0],
        SearchEvent::Updated { query, .. } if query == "fast"
    ));
    assert!(matches!(
        &outcomes[1],
        SearchEvent::Superseded { query, .. } if query == "slow"
    ));

    let state = controller.store().snapshot();
    assert!(!state.loading);
    assert_eq!(state.list[0].title, "fast result");
}

#[tokio::test(start_paused = true)]
async fn failed_older_search_is_superseded_not_reported() {
    let (catalog, mut controller, mut events) = setup();
    catalog.delay("slow", Duration::from_secs(1));
    catalog.fail("slow");

    controller.on_query_changed("slow");
    sleep(DEBOUNCE + Duration::from_millis(50)).await;
    controller.on_query_changed("fast");

    let mut outcomes = Vec::new();
    while outcomes.len() < 2 {
        outcomes.push(next_outcome(&mut events).await);
    }

    assert!(matches!(
        &outcomes[0],
        SearchEvent::Updated { query, .. } if query == "fast"
    ));
    assert_eq!(
        outcomes[1],
        SearchEvent::Superseded {
            query: "slow".to_string(),
            page: 1
        }
    );
    assert!(!outcomes
        .iter()
        .any(|event| matches!(event, SearchEvent::Failed { .. })));
    assert_quiet(&mut events).await;

    let state = controller.store().snapshot();
    assert!(!state.loading);
    assert_eq!(state.list[0].title, "fast result");
}

#[tokio::test]
async fn detail_view_states() {
    let catalog = FakeCatalog::default();

    match load_detail(&catalog, 1).await {
        DetailView::Found(details) => assert_eq!(details.title, "Cowboy Bebop"),
        other => panic!("expected details, got {:?}", other),
    }
    assert!(matches!(load_detail(&catalog, 2).await, DetailView::NotFound));
    assert!(matches!(load_detail(&catalog, 429).await, DetailView::NotFound));
}

#[tokio::test(start_paused = true)]
async fn app_routes_between_list_and_detail() {
    let (catalog, controller, mut events) = setup();
    let mut app = App::new(catalog.clone(), controller, 25);

    assert!(matches!(app.handle_line("cowboy").await, Flow::Continue(Some(_))));
    let event = next_outcome(&mut events).await;
    let rendered = app.handle_event(&event).unwrap();
    assert!(rendered.contains("cowboy result"));
    assert!(rendered.contains("Page 1 of 5"));

    let Flow::Continue(Some(loading)) = app.handle_line("/anime/1").await else {
        panic!("expected detail output");
    };
    assert_eq!(app.route(), Route::Detail { id: 1 });
    assert!(loading.contains("Loading..."));
    let detail = app.settle().await.unwrap();
    assert!(detail.contains("Cowboy Bebop"));
    assert!(app.settle().await.is_none());
    assert!(app.handle_event(&event).is_none());

    app.handle_line(":open 2").await;
    let missing = app.settle().await.unwrap();
    assert!(missing.contains("Anime not found."));

    app.handle_line(":back").await;
    app.handle_line(":back").await;
    assert_eq!(app.route(), Route::Search);

    app.handle_line(":next").await;
    assert!(matches!(
        next_outcome(&mut events).await,
        SearchEvent::Updated { page: 2, .. }
    ));
    assert_eq!(catalog.calls().last(), Some(&("cowboy".to_string(), 2)));

    assert_eq!(app.handle_line(":quit").await, Flow::Quit);
}

#[tokio::test(start_paused = true)]
async fn back_shows_the_previous_title() {
    let (catalog, controller, _events) = setup();
    let mut app = App::new(catalog, controller, 25);

    app.handle_line(":open 1").await;
    assert!(app.settle().await.unwrap().contains("Cowboy Bebop"));
    app.handle_line(":open 2").await;
    assert!(app.settle().await.unwrap().contains("Anime not found."));

    let Flow::Continue(Some(back)) = app.handle_line(":back").await else {
        panic!("expected detail output");
    };
    assert_eq!(app.route(), Route::Detail { id: 1 });
    assert!(back.contains("Loading..."));
    assert!(!back.contains("Anime not found."));

    let detail = app.settle().await.unwrap();
    assert!(detail.contains("Cowboy Bebop"));
    assert_eq!(app.render(), detail);
}
