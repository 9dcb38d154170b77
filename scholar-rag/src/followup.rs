//! Follow-up detection.
//!
//! Decides whether a query continues the previous answer. The default check
//! is a plain case-insensitive substring test against the previous context,
//! which misfires on short or very common queries; it lives behind
//! [`FollowUpDetector`] so a similarity-based check can replace it without
//! touching the prompt composer.

use crate::config::FollowUpStrategy;
use crate::error::Result;
use crate::router::IntentRouter;

/// Judges whether `query` follows up on `previous_context`.
pub trait FollowUpDetector: Send + Sync {
    /// Return `true` to use the elaboration prompt.
    fn is_follow_up(&self, query: &str, previous_context: &str) -> bool;
}

/// Follow-up when the lowercase query occurs in the lowercase previous context.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringFollowUp;

impl FollowUpDetector for SubstringFollowUp {
    fn is_follow_up(&self, query: &str, previous_context: &str) -> bool {
        previous_context.to_lowercase().contains(&query.to_lowercase())
    }
}

/// [`SubstringFollowUp`], or any query matching the elaboration patterns.
#[derive(Debug, Clone)]
pub struct ElaborationFollowUp {
    router: IntentRouter,
}

impl ElaborationFollowUp {
    /// Use the elaboration table of `router`.
    pub fn new(router: IntentRouter) -> Self {
        Self { router }
    }
}

impl FollowUpDetector for ElaborationFollowUp {
    fn is_follow_up(&self, query: &str, previous_context: &str) -> bool {
        SubstringFollowUp.is_follow_up(query, previous_context)
            || self.router.is_elaboration_request(query)
    }
}

/// Build the detector selected by a strategy.
pub fn detector_for(strategy: FollowUpStrategy) -> Result<Box<dyn FollowUpDetector>> {
    Ok(match strategy {
        FollowUpStrategy::Substring => Box::new(SubstringFollowUp),
        FollowUpStrategy::Elaboration => Box::new(ElaborationFollowUp::new(IntentRouter::new()?)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_is_case_insensitive() {
        assert!(SubstringFollowUp.is_follow_up("y", "X Y Z"));
        assert!(SubstringFollowUp.is_follow_up("Gradient Descent", "uses gradient descent to"));
        assert!(!SubstringFollowUp.is_follow_up("transformers", "X Y Z"));
    }

    #[test]
    fn elaboration_detector_also_accepts_elaboration_requests() {
        let detector = detector_for(FollowUpStrategy::Elaboration).unwrap();
        assert!(detector.is_follow_up("please expand on that", "X Y Z"));
        assert!(detector.is_follow_up("y", "X Y Z"));
        assert!(!detector.is_follow_up("what dataset was used?", "X Y Z"));
    }

    #[test]
    fn substring_strategy_ignores_elaboration_wording() {
        let detector = detector_for(FollowUpStrategy::Substring).unwrap();
        assert!(!detector.is_follow_up("please expand on that", "X Y Z"));
    }
}
