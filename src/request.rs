use derive_more::Display;
use serde::Serialize;

use crate::types::CellChange;

/// Correlation token tying an outbound request (or a thinking session) to
/// the answer that settles it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct RequestId(u64);

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Hands out ids that are distinct for the lifetime of one engine.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// A pending question to the host, answered by an action carrying `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request<T = ()> {
    pub id: RequestId,
    pub detail: T,
}

impl<T> Request<T> {
    pub fn new(ids: &mut IdGenerator, detail: T) -> Self {
        Self {
            id: ids.next_id(),
            detail,
        }
    }

    /// Whether `answer` settles this request.
    pub fn matches(&self, answer: RequestId) -> bool {
        self.id == answer
    }
}

/// What the host should draw for a board update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "changes", rename_all = "camelCase")]
pub enum BoardUpdate {
    /// One cell, animated; the next change waits for the acknowledgement.
    WithAnimation(CellChange),
    /// A batch applied at once.
    WithoutAnimation(Vec<CellChange>),
}

/// Clears `slot` when it holds a request with id `answer`. Returns whether it did.
pub fn settle<T>(slot: &mut Option<Request<T>>, answer: RequestId) -> bool {
    match slot {
        Some(request) if request.matches(answer) => {
            *slot = None;
            true
        }
        _ => false,
    }
}
