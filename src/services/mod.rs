//! Entity services: the boundary the hosting surfaces call into.
//!
//! Each service borrows a [`Gateway`](crate::database::Gateway) and the
//! caller's [`SessionContext`]. Reads are open to every role; anything that
//! changes state checks [`SessionContext::can_mutate`] before a statement is
//! sent.

pub mod analytics;
pub mod animal;
pub mod equipment;
pub mod habitat;
pub mod organization;
pub mod ranger;
pub mod routines;
pub mod sighting;
pub mod species;
pub mod tables;
pub mod threat;
pub mod validate;

pub use analytics::AnalyticsService;
pub use animal::AnimalService;
pub use equipment::EquipmentService;
pub use habitat::HabitatService;
pub use organization::OrganizationService;
pub use ranger::RangerService;
pub use routines::RoutineService;
pub use sighting::SightingService;
pub use species::SpeciesService;
pub use tables::{Table, TableBrowser};
pub use threat::ThreatService;

use thiserror::Error;

use crate::access::{Role, SessionContext};
use crate::database::{CommandOutcome, GatewayError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{role} accounts cannot modify records")]
    Forbidden { role: Role },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Gateway(GatewayError::Validation(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::Gateway(GatewayError::NotFound(msg.into()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn ensure_can_mutate(ctx: &SessionContext) -> ServiceResult<()> {
    if ctx.can_mutate() {
        return Ok(());
    }
    tracing::warn!(
        session = %ctx.session_id,
        identity = %ctx.identity,
        role = %ctx.role,
        "mutation refused by access policy"
    );
    Err(ServiceError::Forbidden { role: ctx.role })
}

/// Replaces the gateway's generic not-found reason with the entity's name.
pub(crate) fn named(what: String) -> impl FnOnce(GatewayError) -> GatewayError {
    move |err| match err {
        GatewayError::NotFound(_) => GatewayError::NotFound(format!("{} not found", what)),
        other => other,
    }
}

/// A delete or unlink that touched nothing means the target did not exist.
pub(crate) fn expect_changed(outcome: CommandOutcome, what: String) -> ServiceResult<()> {
    if outcome.changed() {
        Ok(())
    } else {
        Err(ServiceError::not_found(format!("{} not found", what)))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory gateway that records statements and replays canned rows.

    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::database::{CommandOutcome, Gateway, GatewayError, Row, Statement};

    #[derive(Default)]
    pub struct FakeGateway {
        pub sent: Mutex<Vec<Statement>>,
        pub replies: Mutex<VecDeque<Result<Vec<Row>, GatewayError>>>,
    }

    impl FakeGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, rows: Vec<serde_json::Value>) -> Self {
            let rows = rows
                .into_iter()
                .map(|v| v.as_object().cloned().unwrap_or_default())
                .collect();
            self.replies.lock().unwrap().push_back(Ok(rows));
            self
        }

        pub fn fail(self, err: GatewayError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn sent(&self) -> Vec<Statement> {
            self.sent.lock().unwrap().clone()
        }

        fn next(&self, statement: &Statement) -> Option<Result<Vec<Row>, GatewayError>> {
            self.sent.lock().unwrap().push(statement.clone());
            self.replies.lock().unwrap().pop_front()
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn query(&self, statement: &Statement) -> Result<Vec<Row>, GatewayError> {
            self.next(statement).unwrap_or_else(|| Ok(Vec::new()))
        }

        /// Without a queued reply one row counts as affected; a queued reply
        /// affects as many rows as it holds.
        async fn execute(&self, statement: &Statement) -> Result<CommandOutcome, GatewayError> {
            let rows_affected = match self.next(statement) {
                None => 1,
                Some(reply) => reply?.len() as u64,
            };
            Ok(CommandOutcome { rows_affected })
        }

        async fn execute_returning(&self, statement: &Statement) -> Result<Row, GatewayError> {
            self.next(statement)
                .unwrap_or_else(|| Ok(Vec::new()))?
                .into_iter()
                .next()
                .ok_or_else(|| GatewayError::not_found("no row matched the statement"))
        }
    }
}
