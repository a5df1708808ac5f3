//! Sequential batch execution of operation items.
//!
//! Each item is a JSON object naming a `resource`, an `operation` and that
//! operation's parameters. Items run one after another against a single
//! [`CachedSession`], so a batch logs in at most once per token window and
//! detects the server edition once.

use crate::auth::{CachedSession, Credential, SessionManager};
use crate::client::Dispatcher;
use crate::error::Result;
use crate::resource::Operation;
use serde::Serialize;
use serde_json::{Value, json};

/// Output for one input item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResult {
    pub json: Value,
    /// Index of the input item this result belongs to.
    #[serde(rename = "pairedItem")]
    pub paired_item: usize,
}

pub struct Runner {
    credential: Credential,
    sessions: SessionManager,
    dispatcher: Dispatcher,
    continue_on_fail: bool,
}

impl Runner {
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self::with_dispatcher(credential, Dispatcher::new())
    }

    /// Share `dispatcher`'s HTTP client for login and edition detection too.
    #[must_use]
    pub fn with_dispatcher(credential: Credential, dispatcher: Dispatcher) -> Self {
        let sessions = SessionManager::with_client(dispatcher.http().clone());
        Self {
            credential,
            sessions,
            dispatcher,
            continue_on_fail: false,
        }
    }

    /// When set, a failing item yields `{"error": <message>}` instead of
    /// aborting the batch.
    #[must_use]
    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Run a batch with a fresh session.
    pub async fn run(&self, items: &[Value]) -> Result<Vec<ItemResult>> {
        let mut session = CachedSession::new();
        self.run_with_session(items, &mut session).await
    }

    /// Run a batch against a caller-owned session.
    ///
    /// Without continue-on-fail the first error aborts the batch and is
    /// returned as is.
    pub async fn run_with_session(
        &self,
        items: &[Value],
        session: &mut CachedSession,
    ) -> Result<Vec<ItemResult>> {
        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match self.execute(item, session).await {
                Ok(json) => results.push(ItemResult {
                    json,
                    paired_item: index,
                }),
                Err(e) if self.continue_on_fail => {
                    tracing::warn!(item = index, "item failed: {e}");
                    results.push(ItemResult {
                        json: json!({ "error": e.to_string() }),
                        paired_item: index,
                    });
                }
                Err(e) => {
                    tracing::debug!(item = index, "aborting batch: {e}");
                    return Err(e);
                }
            }
        }

        Ok(results)
    }

    /// Execute one item: parse, validate, authenticate, gate, dispatch, shape.
    pub async fn execute(&self, item: &Value, session: &mut CachedSession) -> Result<Value> {
        let operation = Operation::from_item(item)?;
        let spec = operation.to_request()?;

        let header = self
            .sessions
            .auth_header(&self.credential, session)
            .await?;
        operation.check_edition(session.edition())?;

        tracing::debug!(
            resource = %operation.resource(),
            operation = operation.name(),
            "executing"
        );
        let body = self
            .dispatcher
            .send(&spec, self.credential.base_url(), &header)
            .await?;
        Ok(operation.shape_response(body))
    }
}
