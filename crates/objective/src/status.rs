//! Status reported by objectives to their owner.

/// Where an objective stands after the most recent check.
///
/// # Step-driven Semantics
///
/// An objective is checked by its owner before it is ticked:
/// - `Active` objectives keep receiving ticks
/// - `Completed` and `Abandoned` objectives are removed from their owner and
///   dropped immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The objective still has work to do.
    Active,

    /// The objective reached its goal.
    Completed,

    /// The objective can no longer be completed (unreachable target, removed
    /// entity, missing controller).
    Abandoned,
}

impl Status {
    /// Returns `true` if this status is `Active`.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Status::Active)
    }

    /// Returns `true` if the objective should be removed from its owner.
    #[inline]
    pub fn is_finished(self) -> bool {
        !self.is_active()
    }

    /// Short label used in log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Completed => "completed",
            Status::Abandoned => "abandoned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_is_unfinished() {
        assert!(Status::Active.is_active());
        assert!(!Status::Active.is_finished());
        assert!(Status::Completed.is_finished());
        assert!(Status::Abandoned.is_finished());
    }
}
