use std::sync::Arc;

use crate::{db::OrmConn, messages::MessageTable};

/// Shared per-request state.
///
/// The connection sits behind an `Arc` so the state stays cheaply cloneable
/// even when SeaORM's mock connection (which is not `Clone`) is in use.
#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<OrmConn>,
    pub messages: Arc<MessageTable>,
}

impl AppState {
    pub fn new(orm: OrmConn, messages: MessageTable) -> Self {
        Self {
            orm: Arc::new(orm),
            messages: Arc::new(messages),
        }
    }

    pub fn db(&self) -> &OrmConn {
        &self.orm
    }
}
