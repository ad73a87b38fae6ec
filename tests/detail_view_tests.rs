//! Integration tests for DetailViewController
//!
//! These tests verify that:
//! - Stale load responses never overwrite newer state
//! - Navigating away turns pending loads into no-ops
//! - Save responses for a dish the view no longer holds are dropped
//! - Save failures follow the configured policy
//! - Submitted comments round-trip through the repository

use async_trait::async_trait;
use dishdetail::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

// =============================================================================
// Test repository
// =============================================================================

/// Wraps the in-memory repository with gates that hold `get_by_id` and `save`
/// responses back until released, and a switch that makes `save` fail.
#[derive(Clone, Default)]
struct ScriptedRepository {
    inner: InMemoryDishRepository,
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<()>>>>,
    save_gate: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
    waiting: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl ScriptedRepository {
    fn with_menu() -> Self {
        Self {
            inner: InMemoryDishRepository::with_dishes([
                Dish::new("0", "Uthappizza"),
                Dish::new("1", "Zucchipakoda"),
                Dish::new("2", "Vadonut"),
                Dish::new("3", "ElaiCheese Cake"),
            ]),
            ..Default::default()
        }
    }

    /// Hold the next `get_by_id(id)` until the returned sender fires
    fn gate(&self, id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    /// Hold the next `save` until the returned sender fires
    fn gate_save(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.save_gate.lock().unwrap() = Some(rx);
        tx
    }

    async fn until_waiting(&self, count: usize) {
        while self.waiting.load(Ordering::SeqCst) < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl DishRepository for ScriptedRepository {
    async fn get_all_ids(&self) -> Result<Vec<String>, RepositoryError> {
        self.inner.get_all_ids().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Dish, RepositoryError> {
        let gate = self.gates.lock().unwrap().remove(id);
        if let Some(gate) = gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            let _ = gate.await;
        }
        self.inner.get_by_id(id).await
    }

    async fn save(&self, dish: Dish) -> Result<Dish, RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let gate = self.save_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            let _ = gate.await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::new("Error 500: Internal Server Error"));
        }
        self.inner.save(dish).await
    }
}

fn view(repo: &ScriptedRepository) -> DetailViewController<ScriptedRepository> {
    DetailViewController::new(repo.clone(), DetailConfig::default_config()).unwrap()
}

fn fill_form(view: &DetailViewController<ScriptedRepository>) {
    view.set_field("author", "Ada Lovelace").unwrap();
    view.set_field("rating", 4u8).unwrap();
    view.set_field("comment", "Surprisingly analytical.").unwrap();
}

// =============================================================================
// Request ordering
// =============================================================================

mod ordering_tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_load_does_not_overwrite_newer_state() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);

        let release = repo.gate("0");
        let slow = tokio::spawn({
            let view = view.clone();
            async move { view.load("0").await }
        });
        repo.until_waiting(1).await;

        let fast = view.load("2").await.unwrap();
        assert_eq!(fast.applied().unwrap().id, "2");

        release.send(()).unwrap();
        let outcome = slow.await.unwrap().unwrap();
        assert_eq!(outcome, Outcome::Discarded);

        assert_eq!(view.dish().unwrap().id, "2");
        let n = view.neighbors().unwrap();
        assert_eq!((n.previous.as_str(), n.next.as_str()), ("1", "3"));
        assert_eq!(view.visibility(), Visibility::Shown);
    }

    #[tokio::test]
    async fn test_navigate_away_makes_pending_load_a_no_op() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);

        let release = repo.gate("1");
        let pending = tokio::spawn({
            let view = view.clone();
            async move { view.load("1").await }
        });
        repo.until_waiting(1).await;

        view.navigate_away();
        release.send(()).unwrap();

        assert_eq!(pending.await.unwrap().unwrap(), Outcome::Discarded);
        assert!(view.dish().is_none());
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn test_stale_failure_is_not_surfaced() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);

        // "9" does not exist, but its failure arrives after a newer load
        let release = repo.gate("9");
        let doomed = tokio::spawn({
            let view = view.clone();
            async move { view.load("9").await }
        });
        repo.until_waiting(1).await;

        view.load("3").await.unwrap();
        release.send(()).unwrap();

        assert_eq!(doomed.await.unwrap().unwrap(), Outcome::Discarded);
        assert!(view.error().is_none());
        assert_eq!(view.dish().unwrap().id, "3");
    }

    #[tokio::test]
    async fn test_late_save_does_not_restore_replaced_dish() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        view.load("0").await.unwrap();
        fill_form(&view);

        let release_load = repo.gate("1");
        let release_save = repo.gate_save();
        let load = tokio::spawn({
            let view = view.clone();
            async move { view.load("1").await }
        });
        repo.until_waiting(1).await;
        let submit = tokio::spawn({
            let view = view.clone();
            async move { view.submit_comment().await }
        });
        repo.until_waiting(2).await;

        release_load.send(()).unwrap();
        assert_eq!(load.await.unwrap().unwrap().applied().unwrap().id, "1");

        release_save.send(()).unwrap();
        assert_eq!(submit.await.unwrap().unwrap(), Outcome::Discarded);

        assert_eq!(view.dish().unwrap().id, "1");
        let n = view.neighbors().unwrap();
        assert_eq!((n.previous.as_str(), n.next.as_str()), ("0", "2"));
        assert!(view.error().is_none());

        // the save itself still reached the repository
        assert_eq!(repo.get_by_id("0").await.unwrap().comments.len(), 1);
    }

    #[tokio::test]
    async fn test_late_save_failure_does_not_clear_replaced_dish() {
        let repo = ScriptedRepository::with_menu();
        repo.fail_saves.store(true, Ordering::SeqCst);
        let view = view(&repo);
        view.load("0").await.unwrap();
        fill_form(&view);

        let release_load = repo.gate("1");
        let release_save = repo.gate_save();
        let load = tokio::spawn({
            let view = view.clone();
            async move { view.load("1").await }
        });
        repo.until_waiting(1).await;
        let submit = tokio::spawn({
            let view = view.clone();
            async move { view.submit_comment().await }
        });
        repo.until_waiting(2).await;

        release_load.send(()).unwrap();
        load.await.unwrap().unwrap();
        release_save.send(()).unwrap();

        assert_eq!(submit.await.unwrap().unwrap(), Outcome::Discarded);
        assert_eq!(view.dish().unwrap().id, "1");
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn test_discarded_go_back_keeps_history() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        view.load("0").await.unwrap();
        view.load_next().await.unwrap();

        let release = repo.gate("0");
        let back = tokio::spawn({
            let view = view.clone();
            async move { view.go_back().await }
        });
        repo.until_waiting(1).await;
        view.navigate_away();
        release.send(()).unwrap();

        assert_eq!(back.await.unwrap().unwrap(), Some(Outcome::Discarded));
        assert_eq!(view.dish().unwrap().id, "1");

        let again = view.go_back().await.unwrap().unwrap();
        assert_eq!(again.applied().unwrap().id, "0");
        assert!(view.go_back().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_visibility_events_frame_a_load() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        let mut events = view.subscribe_events();

        view.load("1").await.unwrap();

        let mut actions = Vec::new();
        while let Ok(envelope) = events.try_recv() {
            actions.push(envelope.event);
        }
        assert_eq!(
            actions,
            vec![
                ViewEvent::VisibilityChanged {
                    visibility: Visibility::Hidden
                },
                ViewEvent::DishLoaded {
                    dish_id: "1".into(),
                    previous: "0".into(),
                    next: "2".into(),
                },
                ViewEvent::VisibilityChanged {
                    visibility: Visibility::Shown
                },
            ]
        );
    }
}

// =============================================================================
// Comment submission
// =============================================================================

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_comment_round_trips_through_repository() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        view.load("3").await.unwrap();
        fill_form(&view);

        let before = Utc::now();
        let saved = view.submit_comment().await.unwrap().applied().unwrap();
        assert_eq!(saved.comments.len(), 1);

        let comment = &saved.comments[0];
        assert_eq!(comment.author, "Ada Lovelace");
        assert_eq!(comment.rating, 4);
        assert_eq!(comment.comment, "Surprisingly analytical.");
        assert!(DateTime::parse_from_rfc3339(&comment.date_iso()).is_ok());
        assert!(comment.date() <= Utc::now());
        assert!(comment.date() >= before - chrono::Duration::milliseconds(1));

        let stored = repo.get_by_id("3").await.unwrap();
        assert_eq!(stored.comments, saved.comments);
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_saved() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        view.load("0").await.unwrap();
        view.set_field("author", "A").unwrap();
        view.set_field("comment", "Fine").unwrap();

        let err = view.submit_comment().await.unwrap_err();
        assert!(matches!(
            err,
            DishDetailError::Validation(ValidationError::InvalidForm { ref fields }) if fields == &["author"]
        ));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 0);
        assert!(view.dish().unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_clears_dish_by_default() {
        let repo = ScriptedRepository::with_menu();
        repo.fail_saves.store(true, Ordering::SeqCst);
        let view = view(&repo);
        view.load("0").await.unwrap();
        fill_form(&view);

        let err = view.submit_comment().await.unwrap_err();
        assert_eq!(err.to_string(), "Error 500: Internal Server Error");
        assert_eq!(
            view.error().as_deref(),
            Some("Error 500: Internal Server Error")
        );
        assert!(view.dish().is_none());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_dish_when_configured() {
        let repo = ScriptedRepository::with_menu();
        repo.fail_saves.store(true, Ordering::SeqCst);
        let config = DetailConfig {
            save_failure: SaveFailurePolicy::Keep,
            ..DetailConfig::default_config()
        };
        let view = DetailViewController::new(repo.clone(), config).unwrap();
        view.load("0").await.unwrap();
        fill_form(&view);

        assert!(view.submit_comment().await.is_err());
        let dish = view.dish().unwrap();
        assert_eq!(dish.id, "0");
        assert!(dish.comments.is_empty());
        assert!(view.error().is_some());
    }

    #[tokio::test]
    async fn test_form_resets_after_submit() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        view.load("0").await.unwrap();
        fill_form(&view);
        view.submit_comment().await.unwrap();

        let snapshot = view.snapshot();
        assert!(!snapshot.form_errors.has_errors());
        assert!(!view.is_form_valid());
        // the rating control goes back to 5
        fill_form_partial(&view);
        let saved = view.submit_comment().await.unwrap().applied().unwrap();
        assert_eq!(saved.comments[1].rating, 5);
    }

    fn fill_form_partial(view: &DetailViewController<ScriptedRepository>) {
        view.set_field("author", "Grace").unwrap();
        view.set_field("comment", "Again!").unwrap();
    }

    #[tokio::test]
    async fn test_form_errors_are_published() {
        let repo = ScriptedRepository::with_menu();
        let view = view(&repo);
        let mut rx = view.subscribe_form_errors();

        view.set_field("author", "").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().get("author"),
            Some("Name is required. Name must be at least 2 characters long. ")
        );
        assert_eq!(rx.borrow().get("comment"), Some(""));
    }
}
