//! Question ordering within a quiz.
//!
//! A quiz's questions always carry the orders `0..N` exactly once each. The
//! store enforces uniqueness of `(quiz_id, order)`, so every multi-question
//! change is expressed as a sequence of single writes that never collide:
//!
//! - appending takes the next free order;
//! - removing shifts every later question down by one, lowest first;
//! - a bulk reorder first parks every question on a placeholder above any
//!   legal order, then writes the final orders.
//!
//! The functions here only compute those writes; applying them inside a
//! single transaction is the service's job.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::mongodb::Id;

/// Position of a question within its quiz.
pub type Order = u32;

/// Soft cap on questions per quiz. Also the basis for placeholder orders.
pub const MAX_QUESTIONS: Order = 999;

/// A single order write.
pub type OrderUpdate = (Id, Order);

/// Reasons a requested bulk reorder cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Expected an order for each of the {expected} questions, got {got}")]
    CountMismatch { expected: usize, got: usize },
    #[error("Question {0} is not part of this quiz")]
    UnknownQuestion(Id),
    #[error("Question {0} appears more than once")]
    DuplicateQuestion(Id),
    #[error("Orders must be exactly 0 to {max} with no gaps or repeats")]
    NotAPermutation { max: i64 },
}

/// Order for a question appended to a quiz that currently has `count` questions.
pub fn append_order(count: Order) -> Order {
    count
}

/// Writes restoring density after the question at `removed` is deleted.
///
/// `siblings` are the remaining questions of the quiz with their current
/// orders. Only those strictly after `removed` move, each down by one, and
/// the writes are sorted so that each lands on an order just vacated.
pub fn plan_compaction(siblings: &[OrderUpdate], removed: Order) -> Vec<OrderUpdate> {
    let mut updates: Vec<OrderUpdate> = siblings
        .iter()
        .filter(|&&(_, order)| order > removed)
        .map(|&(id, order)| (id, order - 1))
        .collect();
    updates.sort_by_key(|&(_, order)| order);
    updates
}

/// Placeholder order for the question at position `index` of a quiz with
/// `count` questions.
///
/// Placeholders are distinct for distinct indices and strictly greater than
/// any legal order, so parking questions on them can collide neither with
/// each other nor with current or target orders.
pub fn placeholder(index: usize, count: usize) -> Order {
    let offset = 2 * (MAX_QUESTIONS as usize).max(count);
    (offset - index) as Order
}

/// A validated bulk reorder, as two phases of writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// Moves every question to a placeholder.
    pub park: Vec<OrderUpdate>,
    /// Moves every question to its requested order.
    pub settle: Vec<OrderUpdate>,
}

impl ReorderPlan {
    /// All writes, in the order they must be applied.
    pub fn writes(&self) -> impl Iterator<Item = &OrderUpdate> {
        self.park.iter().chain(self.settle.iter())
    }
}

/// Validate a requested ordering against the quiz's current questions and
/// plan the writes applying it.
///
/// `current` lists the quiz's question IDs, `requested` pairs each of them
/// with its new order. Orders arrive as signed integers straight from the
/// request so that negative values are reported as a bad permutation rather
/// than a parse failure.
pub fn plan_reorder(current: &[Id], requested: &[(Id, i64)]) -> Result<ReorderPlan, OrderError> {
    let count = current.len();
    if requested.len() != count {
        return Err(OrderError::CountMismatch {
            expected: count,
            got: requested.len(),
        });
    }

    let known: HashSet<Id> = current.iter().copied().collect();
    let mut targets: HashMap<Id, Order> = HashMap::with_capacity(count);
    let mut taken = vec![false; count];
    for &(id, order) in requested {
        if !known.contains(&id) {
            return Err(OrderError::UnknownQuestion(id));
        }
        let slot = usize::try_from(order)
            .ok()
            .filter(|&slot| slot < count && !taken[slot])
            .ok_or(OrderError::NotAPermutation {
                max: count as i64 - 1,
            })?;
        if targets.insert(id, slot as Order).is_some() {
            return Err(OrderError::DuplicateQuestion(id));
        }
        taken[slot] = true;
    }

    let park = current
        .iter()
        .enumerate()
        .map(|(index, &id)| (id, placeholder(index, count)))
        .collect();
    let settle = requested
        .iter()
        .map(|&(id, _)| (id, targets[&id]))
        .collect();
    Ok(ReorderPlan { park, settle })
}
