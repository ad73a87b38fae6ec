//! Dish detail view controller
//!
//! Glue between a [`DishRepository`], the neighbor resolver and the comment
//! form. The controller is cheap to clone; clones share one view state.
//!
//! # Request ordering
//!
//! Every [`load`](DetailViewController::load) takes a ticket from a
//! monotonically increasing counter. When a response arrives, it is applied
//! only if its ticket is still the latest one; otherwise it is dropped and
//! the call reports [`Outcome::Discarded`]. [`navigate_away`](DetailViewController::navigate_away)
//! advances the counter too, so responses to requests issued before it are
//! dropped silently. Comment saves carry the ticket of the load they were
//! issued under and follow the same rule; a save response is also dropped
//! when the view no longer holds the dish it was issued for.
//!
//! # Example
//!
//! ```rust,ignore
//! let controller = DetailViewController::new(repository, DetailConfig::default_config());
//! controller.load("0").await?;
//! controller.set_field("author", "Ada")?;
//! controller.set_field("comment", "Lovely")?;
//! controller.submit_comment().await?;
//! ```

pub mod history;

pub use history::History;

use crate::config::{DetailConfig, SaveFailurePolicy, fields};
use crate::core::error::{DishDetailError, Result, ValidationError, ViewError};
use crate::core::events::{EventBus, EventEnvelope, ViewEvent, Visibility};
use crate::core::field::FieldValue;
use crate::core::neighbors::{Neighbors, resolve};
use crate::core::validation::{CommentForm, FormErrors};
use crate::core::{Comment, Dish, DishRepository};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};

/// Result of an asynchronous view operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The response was applied to the view
    Applied(T),
    /// A newer request or a navigation made the response stale; nothing changed
    Discarded,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Discarded => None,
        }
    }
}

/// What a presentation layer needs to render the view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub dish: Option<Dish>,
    pub image_url: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub visibility: Visibility,
    pub error: Option<String>,
    pub form_errors: FormErrors,
}

/// How an applied load moves the navigation history
#[derive(Debug, Clone, Copy)]
enum HistoryStep {
    Visit,
    Back,
}

struct ViewState {
    dish: Option<Dish>,
    dish_ids: Vec<String>,
    neighbors: Option<Neighbors>,
    visibility: Visibility,
    error: Option<String>,
    form: CommentForm,
    history: History,
    ticket: u64,
}

struct Shared<R> {
    repository: R,
    config: DetailConfig,
    events: EventBus,
    state: Mutex<ViewState>,
}

/// Controller of the dish detail view
pub struct DetailViewController<R> {
    inner: Arc<Shared<R>>,
}

impl<R> Clone for DetailViewController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: DishRepository> DetailViewController<R> {
    /// Create a controller over `repository`
    ///
    /// Fails only if the form configuration is invalid.
    pub fn new(repository: R, config: DetailConfig) -> Result<Self> {
        Self::with_events(repository, config, EventBus::default())
    }

    /// Create a controller publishing on an existing event bus
    pub fn with_events(repository: R, config: DetailConfig, events: EventBus) -> Result<Self> {
        let form = config.form.build()?;
        let state = ViewState {
            dish: None,
            dish_ids: Vec::new(),
            neighbors: None,
            visibility: Visibility::Shown,
            error: None,
            form,
            history: History::new(),
            ticket: 0,
        };

        Ok(Self {
            inner: Arc::new(Shared {
                repository,
                config,
                events,
                state: Mutex::new(state),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: ViewEvent) {
        self.inner.events.publish(event);
    }

    fn set_visibility(&self, state: &mut ViewState, visibility: Visibility) {
        if state.visibility != visibility {
            state.visibility = visibility;
            self.publish(ViewEvent::VisibilityChanged { visibility });
        }
    }

    // === Loading ===

    /// Show the dish `id`, resolving its neighbors in the full dish list.
    ///
    /// The view is hidden while the request is in flight. On repository or
    /// resolution failure the message is stored, no dish is shown, and the
    /// error is returned.
    pub async fn load(&self, id: &str) -> Result<Outcome<Dish>> {
        self.fetch(id, HistoryStep::Visit).await
    }

    async fn fetch(&self, id: &str, step: HistoryStep) -> Result<Outcome<Dish>> {
        let ticket = {
            let mut state = self.state();
            state.ticket += 1;
            self.set_visibility(&mut state, Visibility::Hidden);
            state.ticket
        };
        tracing::debug!(dish_id = %id, ticket, "Loading dish");

        let repository = &self.inner.repository;
        let fetched = futures::try_join!(repository.get_all_ids(), repository.get_by_id(id));

        let mut state = self.state();
        if state.ticket != ticket {
            tracing::debug!(dish_id = %id, ticket, latest = state.ticket, "Discarding stale load");
            return Ok(Outcome::Discarded);
        }

        let resolved = fetched.map_err(DishDetailError::from).and_then(|(ids, dish)| {
            let neighbors = resolve(&ids, &dish.id)?;
            Ok((ids, dish, neighbors))
        });

        match resolved {
            Ok((ids, dish, neighbors)) => {
                tracing::info!(
                    dish_id = %dish.id,
                    previous = %neighbors.previous,
                    next = %neighbors.next,
                    "Dish loaded"
                );
                match step {
                    HistoryStep::Visit => state.history.push(&dish.id),
                    HistoryStep::Back => state.history.pop(),
                }
                state.dish_ids = ids;
                state.dish = Some(dish.clone());
                state.error = None;
                self.publish(ViewEvent::DishLoaded {
                    dish_id: dish.id.clone(),
                    previous: neighbors.previous.clone(),
                    next: neighbors.next.clone(),
                });
                state.neighbors = Some(neighbors);
                self.set_visibility(&mut state, Visibility::Shown);
                Ok(Outcome::Applied(dish))
            }
            Err(err) => {
                tracing::warn!(dish_id = %id, error = %err, "Failed to load dish");
                state.dish = None;
                state.neighbors = None;
                self.surface_error(&mut state, err.to_string());
                Err(err)
            }
        }
    }

    /// Load the previous dish in the cyclic ordering
    pub async fn load_previous(&self) -> Result<Outcome<Dish>> {
        let target = self.neighbor(|n| n.previous.clone())?;
        self.load(&target).await
    }

    /// Load the next dish in the cyclic ordering
    pub async fn load_next(&self) -> Result<Outcome<Dish>> {
        let target = self.neighbor(|n| n.next.clone())?;
        self.load(&target).await
    }

    fn neighbor(&self, pick: impl Fn(&Neighbors) -> String) -> Result<String> {
        self.state()
            .neighbors
            .as_ref()
            .map(pick)
            .ok_or_else(|| ViewError::NoDish.into())
    }

    /// Return to the previously shown dish.
    ///
    /// `None` when there is nothing to go back to. History only moves when
    /// the previous dish is actually shown.
    pub async fn go_back(&self) -> Result<Option<Outcome<Dish>>> {
        let target = self.state().history.previous().map(str::to_string);
        match target {
            Some(id) => self.fetch(&id, HistoryStep::Back).await.map(Some),
            None => Ok(None),
        }
    }

    /// Leave the view: responses to requests already in flight are ignored
    pub fn navigate_away(&self) {
        let mut state = self.state();
        state.ticket += 1;
        tracing::debug!(ticket = state.ticket, "Navigated away");
    }

    // === Comment form ===

    /// Edit a form field; all field errors are recomputed
    pub fn set_field(&self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.state().form.set_value(name, value)?;
        Ok(())
    }

    /// Mark a form field as touched; all field errors are recomputed
    pub fn touch_field(&self, name: &str) -> Result<()> {
        self.state().form.mark_dirty(name)?;
        Ok(())
    }

    pub fn form_errors(&self) -> FormErrors {
        self.state().form.errors()
    }

    /// Receive every recomputed error mapping of the comment form
    pub fn subscribe_form_errors(&self) -> watch::Receiver<FormErrors> {
        self.state().form.subscribe()
    }

    pub fn is_form_valid(&self) -> bool {
        self.state().form.is_valid()
    }

    /// Submit the comment form.
    ///
    /// Requires a loaded dish and a valid form. The comment is stamped with the
    /// current time, the form is reset to its defaults, and the dish with the
    /// new comment is saved. On success the view holds the repository's copy.
    /// On failure the message is stored and, under
    /// [`SaveFailurePolicy::Clear`], the held dish is dropped.
    ///
    /// The response is [`Outcome::Discarded`] when the view moved on while
    /// the save was in flight: a newer load started, or a load that was
    /// pending at submit time replaced the dish.
    pub async fn submit_comment(&self) -> Result<Outcome<Dish>> {
        let (ticket, pending) = {
            let mut state = self.state();
            let Some(mut dish) = state.dish.clone() else {
                return Err(ViewError::NoDish.into());
            };

            if !state.form.is_valid() {
                let fields = state.form.invalid_fields();
                for field in &fields {
                    state.form.mark_dirty(field)?;
                }
                return Err(ValidationError::InvalidForm { fields }.into());
            }

            let comment = comment_from_form(&state.form)?;
            tracing::debug!(
                dish_id = %dish.id,
                author = %comment.author,
                rating = comment.rating,
                date = %comment.date_iso(),
                "Submitting comment"
            );
            state.form.reset();
            dish.add_comment(comment);
            (state.ticket, dish)
        };

        let dish_id = pending.id.clone();
        let saved = self.inner.repository.save(pending).await;

        let mut state = self.state();
        // A load that was already in flight at submit time may have replaced the dish.
        let holds_saved_dish = state.dish.as_ref().is_some_and(|d| d.id == dish_id);
        if state.ticket != ticket || !holds_saved_dish {
            tracing::debug!(dish_id = %dish_id, ticket, "Discarding stale save response");
            return Ok(Outcome::Discarded);
        }

        match saved {
            Ok(dish) => {
                tracing::info!(dish_id = %dish.id, comments = dish.comments.len(), "Comment saved");
                self.publish(ViewEvent::CommentSaved {
                    dish_id: dish.id.clone(),
                    comments: dish.comments.len(),
                });
                state.dish = Some(dish.clone());
                Ok(Outcome::Applied(dish))
            }
            Err(err) => {
                tracing::warn!(dish_id = %dish_id, error = %err, "Failed to save comment");
                if self.inner.config.save_failure == SaveFailurePolicy::Clear {
                    state.dish = None;
                }
                self.surface_error(&mut state, err.message().to_string());
                Err(err.into())
            }
        }
    }

    fn surface_error(&self, state: &mut ViewState, message: String) {
        self.publish(ViewEvent::ErrorSurfaced {
            message: message.clone(),
        });
        state.error = Some(message);
    }

    // === Read side ===

    /// The dish currently shown
    pub fn dish(&self) -> Option<Dish> {
        self.state().dish.clone()
    }

    pub fn neighbors(&self) -> Option<Neighbors> {
        self.state().neighbors.clone()
    }

    /// Ids of all dishes as of the last successful load
    pub fn dish_ids(&self) -> Vec<String> {
        self.state().dish_ids.clone()
    }

    pub fn visibility(&self) -> Visibility {
        self.state().visibility
    }

    /// The last repository message surfaced to the user
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Absolute URL of a dish's image
    pub fn image_url(&self, dish: &Dish) -> String {
        self.inner.config.resolve_url(&dish.image)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EventEnvelope> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.state();
        ViewSnapshot {
            image_url: state.dish.as_ref().map(|dish| self.image_url(dish)),
            dish: state.dish.clone(),
            previous: state.neighbors.as_ref().map(|n| n.previous.clone()),
            next: state.neighbors.as_ref().map(|n| n.next.clone()),
            visibility: state.visibility,
            error: state.error.clone(),
            form_errors: state.form.errors(),
        }
    }
}

/// Build a comment from the author, rating and comment fields
fn comment_from_form(form: &CommentForm) -> Result<Comment> {
    let text = |name: &str| form.value(name).map(ToString::to_string).unwrap_or_default();

    let rating = form
        .value(fields::RATING)
        .and_then(FieldValue::as_number)
        .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(n))
        .map(|n| n as u8)
        .ok_or_else(|| ValidationError::FieldError {
            field: fields::RATING.to_string(),
            message: "rating must be a whole number".to_string(),
        })?;

    Ok(Comment::new(
        text(fields::AUTHOR),
        rating,
        text(fields::COMMENT),
    )?)
}
