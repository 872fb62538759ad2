// ABOUTME: Session state machine driving the interactive planning workflow
// ABOUTME: Transitions only after side effects succeed, so failures never corrupt a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Session Workflow
//!
//! [`SessionController`] owns one user's session as an explicit state
//! machine: `Unauthenticated`, `Viewing`, `EditingDraft`, `ConfirmingDelete`.
//! Every operation checks the current state, performs its side effects, and
//! assigns the next state only after those effects succeed. A failed save,
//! delete or generation therefore leaves the session exactly where it was.

pub mod draft;

pub use draft::{DraftDay, DraftExercise, PlanDraft};

use crate::auth::CredentialStore;
use crate::constants::limits;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewProgress, PlanSummary, ProgressEntry, ProgressUpdate, WorkoutPlan};
use crate::planner::{parser, IntentClassification, PlanGenerator};
use tracing::instrument;

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nobody is logged in; only register and login are available.
    Unauthenticated,
    /// Logged in, browsing persisted plans.
    Viewing {
        /// Owner of the session.
        user_email: String,
    },
    /// Logged in, editing an in-memory draft.
    EditingDraft {
        /// Owner of the session.
        user_email: String,
        /// The working copy being edited.
        draft: PlanDraft,
    },
    /// Logged in, asked to confirm a pending plan deletion.
    ConfirmingDelete {
        /// Owner of the session.
        user_email: String,
        /// Plan queued for deletion.
        plan_id: i64,
    },
}

/// Display label for a plan listing row.
#[must_use]
pub fn plan_label(ordinal: usize, summary: &PlanSummary) -> String {
    format!(
        "Plan {ordinal}: {} ({} days/week)",
        summary.goal, summary.days_per_week
    )
}

/// Drives one user session over the credential store, plan storage and
/// generator.
pub struct SessionController {
    database: Database,
    credentials: CredentialStore,
    generator: PlanGenerator,
    state: SessionState,
}

impl SessionController {
    /// Start a fresh, unauthenticated session.
    #[must_use]
    pub const fn new(
        database: Database,
        credentials: CredentialStore,
        generator: PlanGenerator,
    ) -> Self {
        Self {
            database,
            credentials,
            generator,
            state: SessionState::Unauthenticated,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Email of the logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        match &self.state {
            SessionState::Unauthenticated => None,
            SessionState::Viewing { user_email }
            | SessionState::EditingDraft { user_email, .. }
            | SessionState::ConfirmingDelete { user_email, .. } => Some(user_email),
        }
    }

    /// The draft being edited, if the session is in the editing state.
    #[must_use]
    pub fn draft(&self) -> Option<&PlanDraft> {
        match &self.state {
            SessionState::EditingDraft { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Create an account. Registration does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad email or empty password and
    /// `UserExists` when the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> AppResult<()> {
        self.credentials.register(email, password).await
    }

    /// Authenticate and move the session to `Viewing`.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the credentials do not match; the session
    /// state is left unchanged.
    pub async fn login(&mut self, email: &str, password: &str) -> AppResult<()> {
        let user = self.credentials.authenticate(email, password).await?;
        self.state = SessionState::Viewing {
            user_email: user.email,
        };
        Ok(())
    }

    /// Drop any session state and return to `Unauthenticated`.
    pub fn logout(&mut self) {
        self.state = SessionState::Unauthenticated;
    }

    /// The user's plans, newest first, paired with their display labels.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is logged in or a database error
    /// if the listing fails.
    pub async fn list_plans(&self) -> AppResult<Vec<(String, PlanSummary)>> {
        let user_email = self.viewing_user()?;
        let summaries = self.database.list_plans(&user_email).await?;
        Ok(summaries
            .into_iter()
            .enumerate()
            .map(|(index, summary)| (plan_label(index + 1, &summary), summary))
            .collect())
    }

    /// Load one of the user's plans in full.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the plan does not exist or belongs
    /// to someone else.
    pub async fn view_plan(&self, plan_id: i64) -> AppResult<WorkoutPlan> {
        let user_email = self.viewing_user()?;
        self.load_owned_plan(&user_email, plan_id).await
    }

    /// Clone a persisted plan into a draft and move to `EditingDraft`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the plan does not exist or belongs
    /// to someone else; the session stays in `Viewing`.
    pub async fn edit_plan(&mut self, plan_id: i64) -> AppResult<()> {
        let user_email = self.viewing_user()?;
        let plan = self.load_owned_plan(&user_email, plan_id).await?;
        self.state = SessionState::EditingDraft {
            user_email,
            draft: PlanDraft::from_plan(&plan),
        };
        Ok(())
    }

    /// Queue a plan for deletion and move to `ConfirmingDelete`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is logged in.
    pub fn request_delete(&mut self, plan_id: i64) -> AppResult<()> {
        let user_email = self.viewing_user()?;
        self.state = SessionState::ConfirmingDelete {
            user_email,
            plan_id,
        };
        Ok(())
    }

    /// Delete the queued plan and return to `Viewing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no deletion is pending. A failed delete
    /// keeps the session in `ConfirmingDelete` so it can be cancelled.
    pub async fn confirm_delete(&mut self) -> AppResult<()> {
        let SessionState::ConfirmingDelete {
            user_email,
            plan_id,
        } = &self.state
        else {
            return Err(AppError::invalid_input("No deletion is pending"));
        };
        let user_email = user_email.clone();
        let plan_id = *plan_id;

        self.database.delete_plan(plan_id, &user_email).await?;
        self.state = SessionState::Viewing { user_email };
        Ok(())
    }

    /// Abandon the queued deletion and return to `Viewing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no deletion is pending.
    pub fn cancel_delete(&mut self) -> AppResult<()> {
        let SessionState::ConfirmingDelete { user_email, .. } = &self.state else {
            return Err(AppError::invalid_input("No deletion is pending"));
        };
        let user_email = user_email.clone();
        self.state = SessionState::Viewing { user_email };
        Ok(())
    }

    /// Generate a plan from the backend and open it as a draft.
    ///
    /// A generation or parse failure aborts only this attempt; the session
    /// stays in `Viewing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad goal or day count,
    /// `GenerationFailed`/`GenerationTimeout` from the backend and
    /// `MalformedPlan` when the response does not parse.
    #[instrument(skip(self))]
    pub async fn generate_draft(
        &mut self,
        goal: &str,
        days_per_week: i32,
        session_minutes: u32,
    ) -> AppResult<()> {
        let user_email = self.viewing_user()?;
        Self::validate_goal(goal)?;
        Self::validate_days(days_per_week)?;

        let text = self
            .generator
            .generate_plan_text(goal, days_per_week, session_minutes)
            .await?;
        let plan = parser::parse_plan(&text)?;

        self.state = SessionState::EditingDraft {
            user_email,
            draft: PlanDraft::from_plan(&plan),
        };
        Ok(())
    }

    /// Open an empty draft built from user-supplied day labels.
    ///
    /// Each label is a day name plus an optional focus; exercises start
    /// empty and are appended in the editing state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty goal, an unnamed day or a day
    /// count outside the weekly range.
    pub fn start_manual_draft(
        &mut self,
        goal: &str,
        day_labels: Vec<(String, Option<String>)>,
    ) -> AppResult<()> {
        let user_email = self.viewing_user()?;
        Self::validate_goal(goal)?;
        let days_per_week = i32::try_from(day_labels.len())
            .map_err(|_| AppError::invalid_input("Too many days"))?;
        Self::validate_days(days_per_week)?;

        let mut draft = PlanDraft::new(goal.trim(), days_per_week);
        for (day_name, focus) in day_labels {
            if day_name.trim().is_empty() {
                return Err(AppError::invalid_input("Day name must not be empty"));
            }
            draft.push_day(day_name, focus);
        }

        self.state = SessionState::EditingDraft { user_email, draft };
        Ok(())
    }

    /// Append a blank exercise row to a draft day.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no draft is open or the index is out of
    /// range.
    pub fn add_blank_exercise(&mut self, day_index: usize) -> AppResult<usize> {
        self.draft_mut()?.add_blank_exercise(day_index)
    }

    /// Mutable access to one draft exercise for field edits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no draft is open or an index is out of
    /// range.
    pub fn draft_exercise_mut(
        &mut self,
        day_index: usize,
        exercise_index: usize,
    ) -> AppResult<&mut DraftExercise> {
        self.draft_mut()?.exercise_mut(day_index, exercise_index)
    }

    /// Flip the removal flag on one draft exercise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no draft is open or an index is out of
    /// range.
    pub fn toggle_exercise_removed(
        &mut self,
        day_index: usize,
        exercise_index: usize,
    ) -> AppResult<bool> {
        self.draft_mut()?.toggle_removed(day_index, exercise_index)
    }

    /// Throw the draft away and return to `Viewing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no draft is open.
    pub fn discard_draft(&mut self) -> AppResult<()> {
        let SessionState::EditingDraft { user_email, .. } = &self.state else {
            return Err(AppError::invalid_input("No draft is being edited"));
        };
        let user_email = user_email.clone();
        self.state = SessionState::Viewing { user_email };
        Ok(())
    }

    /// Persist the draft and return to `Viewing`.
    ///
    /// A draft that remembers the plan it was cloned from replaces that
    /// plan; otherwise a new plan is inserted. The returned id identifies
    /// the persisted plan either way.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no draft is open or a kept exercise has
    /// no name. A failed save keeps the session in `EditingDraft` with the
    /// draft intact.
    #[instrument(skip(self))]
    pub async fn save_draft(&mut self) -> AppResult<i64> {
        let SessionState::EditingDraft { user_email, draft } = &self.state else {
            return Err(AppError::invalid_input("No draft is being edited"));
        };
        let user_email = user_email.clone();
        let plan = draft.clone().into_plan();

        for day in &plan.workout_days {
            if day
                .exercises
                .iter()
                .any(|exercise| exercise.name.trim().is_empty())
            {
                return Err(AppError::invalid_input(format!(
                    "Unnamed exercise on {}",
                    day.day_name
                )));
            }
        }

        let plan_id = self.database.save_plan(&plan, &user_email).await?;
        self.state = SessionState::Viewing { user_email };
        Ok(plan_id)
    }

    /// Record a completed exercise for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is logged in or `InvalidInput`
    /// for an empty exercise name.
    pub async fn log_progress(&self, progress: &NewProgress) -> AppResult<ProgressEntry> {
        let user_email = self.viewing_user()?;
        if progress.exercise_name.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise name must not be empty"));
        }
        self.database.log_progress(&user_email, progress).await
    }

    /// The user's progress history, newest date first.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is logged in.
    pub async fn list_progress(&self) -> AppResult<Vec<ProgressEntry>> {
        let user_email = self.viewing_user()?;
        self.database.list_progress(&user_email).await
    }

    /// Rewrite the counted fields of one progress entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the entry does not exist for this
    /// user.
    pub async fn update_progress(
        &self,
        progress_id: i64,
        update: &ProgressUpdate,
    ) -> AppResult<()> {
        let user_email = self.viewing_user()?;
        self.database
            .update_progress(progress_id, &user_email, update)
            .await
    }

    /// Delete one progress entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the entry does not exist for this
    /// user.
    pub async fn delete_progress(&self, progress_id: i64) -> AppResult<()> {
        let user_email = self.viewing_user()?;
        self.database
            .delete_progress(progress_id, &user_email)
            .await
    }

    /// Ask the backend which assistant a free-form request wants.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is logged in, plus the generation
    /// and malformed-verdict errors of the classifier.
    pub async fn classify_request(&self, request: &str) -> AppResult<IntentClassification> {
        self.viewing_user()?;
        self.generator.classify_intent(request).await
    }

    fn validate_goal(goal: &str) -> AppResult<()> {
        if goal.trim().is_empty() {
            return Err(AppError::invalid_input("Goal must not be empty"));
        }
        Ok(())
    }

    fn validate_days(days_per_week: i32) -> AppResult<()> {
        if !(limits::MIN_DAYS_PER_WEEK..=limits::MAX_DAYS_PER_WEEK).contains(&days_per_week) {
            return Err(AppError::invalid_input(
                "Training days must be between 1 and 7",
            ));
        }
        Ok(())
    }

    fn viewing_user(&self) -> AppResult<String> {
        match &self.state {
            SessionState::Unauthenticated => {
                Err(AppError::auth_required("Log in first"))
            }
            SessionState::Viewing { user_email } => Ok(user_email.clone()),
            SessionState::EditingDraft { .. } | SessionState::ConfirmingDelete { .. } => Err(
                AppError::invalid_input("Finish the current edit or delete first"),
            ),
        }
    }

    fn draft_mut(&mut self) -> AppResult<&mut PlanDraft> {
        match &mut self.state {
            SessionState::EditingDraft { draft, .. } => Ok(draft),
            _ => Err(AppError::invalid_input("No draft is being edited")),
        }
    }

    async fn load_owned_plan(&self, user_email: &str, plan_id: i64) -> AppResult<WorkoutPlan> {
        self.database
            .get_plan(plan_id)
            .await?
            .filter(|plan| plan.user_email.as_deref() == Some(user_email))
            .ok_or_else(|| AppError::not_found(format!("Plan {plan_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn plan_label_shows_ordinal_goal_and_cadence() {
        let summary = PlanSummary {
            id: 42,
            goal: "lose weight".to_owned(),
            days_per_week: 3,
            created_at: Utc::now(),
        };
        assert_eq!(plan_label(1, &summary), "Plan 1: lose weight (3 days/week)");
    }
}
