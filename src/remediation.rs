//! Moving a flagged ticket through its workflow and telling people why.

use serde_json::Value;

use crate::error::{PatrolError, Result};
use crate::notice::Notice;
use crate::tracker::{FieldUpdates, IssueTracker};
use crate::types::Transition;

pub const REWORK: &str = "Rework";
pub const REOPEN_CAT: &str = "Reopen (CAT)";

/// Hops that reach Rework on workflows (e.g. incidents) without a direct
/// transition to it.
const REWORK_DETOUR: [&str; 3] = ["Ready (for Testing)", "Testing In Progress", REWORK];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionLookup {
    Found(String),
    NotFound,
}

/// Find the transition leading to `target` among those currently offered.
pub fn find_transition(transitions: &[Transition], target: &str) -> TransitionLookup {
    transitions
        .iter()
        .find(|t| t.target_name() == Some(target))
        .map(|t| TransitionLookup::Found(t.id.clone()))
        .unwrap_or(TransitionLookup::NotFound)
}

pub struct Remediator<'a> {
    tracker: &'a dyn IssueTracker,
    reason_field: Option<&'a str>,
}

impl<'a> Remediator<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, reason_field: Option<&'a str>) -> Self {
        Self {
            tracker,
            reason_field,
        }
    }

    /// Transition the ticket to `target`, then post the notice.
    pub async fn remediate(&self, key: &str, target: &str, reason: &str, notice: &Notice) -> Result<()> {
        self.move_to(key, target, reason).await?;
        self.post(key, notice).await
    }

    pub async fn post(&self, key: &str, notice: &Notice) -> Result<()> {
        let me = self.tracker.get_self().await?;
        let body = notice.render(&me.display_name);
        tracing::debug!("[{key}] Comment body:\n{}", body.plain_text());
        self.tracker.add_comment(key, &body).await?;
        tracing::info!("[{key}] Added comment");
        Ok(())
    }

    pub async fn move_to(&self, key: &str, target: &str, reason: &str) -> Result<()> {
        let reason_fields = self.reason_fields(reason);

        if target == REOPEN_CAT {
            return self.reopen(key, reason_fields.as_ref()).await;
        }

        let inline = if target == REWORK {
            reason_fields.as_ref()
        } else {
            None
        };

        match self.step(key, target, inline).await? {
            TransitionLookup::Found(_) => Ok(()),
            TransitionLookup::NotFound if target == REWORK => {
                tracing::info!("[{key}] '{target}' not offered, taking the detour via testing");
                for state in REWORK_DETOUR {
                    let fields = if state == REWORK { inline } else { None };
                    if self.step(key, state, fields).await? == TransitionLookup::NotFound {
                        return Err(not_found(key, state));
                    }
                }
                Ok(())
            }
            TransitionLookup::NotFound => Err(not_found(key, target)),
        }
    }

    /// Reopen (CAT) doesn't take the reason inline. It is patched onto the
    /// ticket once the transition is known to be offered.
    async fn reopen(&self, key: &str, reason_fields: Option<&FieldUpdates>) -> Result<()> {
        let transitions = self.tracker.get_transitions(key).await?;
        let TransitionLookup::Found(id) = find_transition(&transitions, REOPEN_CAT) else {
            return Err(not_found(key, REOPEN_CAT));
        };

        if let Some(fields) = reason_fields {
            self.tracker.patch_fields(key, fields).await?;
            tracing::info!("[{key}] Patched reason before '{REOPEN_CAT}'");
        }

        self.execute(key, &id, None).await?;
        tracing::info!("[{key}] Transited to '{REOPEN_CAT}'");
        Ok(())
    }

    fn reason_fields(&self, reason: &str) -> Option<FieldUpdates> {
        self.reason_field.map(|field| {
            let mut fields = FieldUpdates::new();
            fields.insert(field.to_string(), Value::String(reason.to_string()));
            fields
        })
    }

    /// One hop: re-read the offered transitions and take the one to `state`.
    async fn step(
        &self,
        key: &str,
        state: &str,
        fields: Option<&FieldUpdates>,
    ) -> Result<TransitionLookup> {
        let transitions = self.tracker.get_transitions(key).await?;
        let lookup = find_transition(&transitions, state);

        if let TransitionLookup::Found(id) = &lookup {
            self.execute(key, id, fields).await?;
            tracing::info!("[{key}] Transited to '{state}'");
        }

        Ok(lookup)
    }

    async fn execute(&self, key: &str, id: &str, fields: Option<&FieldUpdates>) -> Result<()> {
        let Some(fields) = fields else {
            return self.tracker.execute_transition(key, id, None).await;
        };

        match self.tracker.execute_transition(key, id, Some(fields)).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("[{key}] Transition rejected the reason field ({e}), retrying without it");
                self.tracker.execute_transition(key, id, None).await
            }
        }
    }
}

fn not_found(key: &str, state: &str) -> PatrolError {
    tracing::error!("[{key}] Target state '{state}' not found");
    PatrolError::TransitionNotFound {
        key: key.to_string(),
        state: state.to_string(),
    }
}
