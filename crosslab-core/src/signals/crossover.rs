//! CrossoverDetector — bar-by-bar relation tracking.

use super::{Cross, Relation};

/// Compares short and long averages each bar and reports flips.
///
/// # Rules
/// - Relation is `Undefined` while either input is `None`.
/// - Exact equality keeps the last defined relation (or `Undefined` if none).
/// - A transition is reported only between two defined relations, never on the
///   bar where the relation first becomes defined.
#[derive(Debug, Clone, Default)]
pub struct CrossoverDetector {
    previous: Relation,
    current: Relation,
    last_defined: Relation,
}

impl CrossoverDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify this bar's averages and shift the previous observation.
    pub fn observe(&mut self, short: Option<f64>, long: Option<f64>) -> Relation {
        let relation = match (short, long) {
            (Some(s), Some(l)) if s > l => Relation::Above,
            (Some(s), Some(l)) if s < l => Relation::Below,
            (Some(_), Some(_)) => self.last_defined,
            _ => Relation::Undefined,
        };

        self.previous = self.current;
        self.current = relation;
        if relation.is_defined() {
            self.last_defined = relation;
        }
        relation
    }

    /// True if the latest observation flipped into `relation` from its opposite.
    pub fn transitioned_to(&self, relation: Relation) -> bool {
        matches!(
            (self.previous, self.current, relation),
            (Relation::Below, Relation::Above, Relation::Above)
                | (Relation::Above, Relation::Below, Relation::Below)
        )
    }

    /// The flip produced by the latest observation, if any.
    pub fn cross(&self) -> Option<Cross> {
        if self.transitioned_to(Relation::Above) {
            Some(Cross::Up)
        } else if self.transitioned_to(Relation::Below) {
            Some(Cross::Down)
        } else {
            None
        }
    }

    pub fn relation(&self) -> Relation {
        self.current
    }

    pub fn previous(&self) -> Relation {
        self.previous
    }
}
