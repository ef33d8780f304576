use crate::models::{Polarity, ScoreResult};
use serde::{Deserialize, Serialize};

/// Lowest score shown with the strong-match badge
pub const STRONG_MATCH_MIN: u8 = 80;
/// Lowest score shown with the good-match badge
pub const GOOD_MATCH_MIN: u8 = 60;
/// Reasons of each polarity shown in compact views
pub const COMPACT_REASONS_PER_SIDE: usize = 2;

/// Qualitative band for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Strong,
    Good,
    Weak,
}

impl MatchTier {
    pub fn from_score(score: u8) -> Self {
        if score >= STRONG_MATCH_MIN {
            MatchTier::Strong
        } else if score >= GOOD_MATCH_MIN {
            MatchTier::Good
        } else {
            MatchTier::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Strong => "strong match",
            MatchTier::Good => "good match",
            MatchTier::Weak => "weak match",
        }
    }
}

/// Display-ready summary of a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub score: u8,
    pub tier: MatchTier,
    pub badge: String,
    pub highlights: Vec<String>,
    pub concerns: Vec<String>,
}

/// Compact explanation for tooltips and cards
pub fn summarize(result: &ScoreResult) -> Explanation {
    explain(result, COMPACT_REASONS_PER_SIDE)
}

/// Explanation keeping the first `per_side` positive and negative reasons
pub fn explain(result: &ScoreResult, per_side: usize) -> Explanation {
    let pick = |polarity: Polarity| -> Vec<String> {
        result
            .reasons
            .iter()
            .filter(|reason| reason.polarity == polarity)
            .take(per_side)
            .map(|reason| reason.text.clone())
            .collect()
    };

    let tier = MatchTier::from_score(result.score);
    Explanation {
        score: result.score,
        tier,
        badge: tier.label().to_string(),
        highlights: pick(Polarity::Positive),
        concerns: pick(Polarity::Negative),
    }
}

/// Every reason, in rule order, for expanded views
pub fn expanded(result: &ScoreResult) -> Vec<String> {
    result.reasons.iter().map(|reason| reason.text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reason;

    #[test]
    fn test_tier_bands() {
        assert_eq!(MatchTier::from_score(100), MatchTier::Strong);
        assert_eq!(MatchTier::from_score(STRONG_MATCH_MIN), MatchTier::Strong);
        assert_eq!(MatchTier::from_score(79), MatchTier::Good);
        assert_eq!(MatchTier::from_score(GOOD_MATCH_MIN), MatchTier::Good);
        assert_eq!(MatchTier::from_score(59), MatchTier::Weak);
        assert_eq!(MatchTier::from_score(0).label(), "weak match");
    }

    #[test]
    fn test_summarize_takes_first_two_each() {
        let result = ScoreResult::scored(
            65,
            vec![
                Reason::positive("p1"),
                Reason::negative("n1"),
                Reason::positive("p2"),
                Reason::positive("p3"),
                Reason::negative("n2"),
                Reason::negative("n3"),
            ],
        );

        let summary = summarize(&result);

        assert_eq!(summary.badge, "good match");
        assert_eq!(summary.highlights, vec!["p1", "p2"]);
        assert_eq!(summary.concerns, vec!["n1", "n2"]);
        assert_eq!(expanded(&result).len(), 6);
    }

    #[test]
    fn test_explain_single_reason_per_side() {
        let result = ScoreResult::scored(90, vec![Reason::positive("a"), Reason::positive("b")]);

        let summary = explain(&result, 1);

        assert_eq!(summary.tier, MatchTier::Strong);
        assert_eq!(summary.highlights, vec!["a"]);
        assert!(summary.concerns.is_empty());
    }
}
