use crate::core::attributes::AttributeDeriver;
use crate::models::{DogProfile, Reason, ScoreResult};
use serde::{Deserialize, Serialize};

/// Where an evaluator's running total starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBasis {
    /// Start at 100 and subtract for violated soft constraints
    Deductive,
    /// Start from a fixed floor and add bonuses
    Additive(i32),
}

impl ScoreBasis {
    pub fn start(self) -> i32 {
        match self {
            ScoreBasis::Deductive => 100,
            ScoreBasis::Additive(floor) => floor,
        }
    }
}

/// What an unmet age bound does to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgePolicy {
    /// Out of range disqualifies
    Strict,
    /// Out of range costs points and adds a reason
    Advisory,
}

/// Result of a single rule firing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Adjust { delta: i32, reason: Reason },
    Disqualify,
}

impl RuleOutcome {
    pub fn bonus(delta: i32, text: impl Into<String>) -> Self {
        RuleOutcome::Adjust {
            delta,
            reason: Reason::positive(text),
        }
    }

    /// Positive delta, but the reason is a caution
    pub fn qualified_bonus(delta: i32, text: impl Into<String>) -> Self {
        RuleOutcome::Adjust {
            delta,
            reason: Reason::negative(text),
        }
    }

    pub fn penalty(points: i32, text: impl Into<String>) -> Self {
        RuleOutcome::Adjust {
            delta: -points,
            reason: Reason::negative(text),
        }
    }

    /// A satisfied constraint. Explains without moving the score.
    pub fn note(text: impl Into<String>) -> Self {
        RuleOutcome::Adjust {
            delta: 0,
            reason: Reason::positive(text),
        }
    }
}

/// Everything a rule may consult about the subject dog
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub dog: &'a DogProfile,
    pub deriver: &'a AttributeDeriver,
    pub age_policy: AgePolicy,
}

pub type Rule<S> = fn(&ScoringContext<'_>, &S) -> Option<RuleOutcome>;

/// Fold an ordered rule list into a score
///
/// Rules run in order. The first `Disqualify` ends evaluation and discards any
/// reasons gathered so far. The total is clamped once, at the end.
pub fn evaluate<S>(
    basis: ScoreBasis,
    ctx: &ScoringContext<'_>,
    subject: &S,
    rules: &[Rule<S>],
) -> ScoreResult {
    let folded = rules
        .iter()
        .try_fold((basis.start(), Vec::new()), |(total, mut reasons), rule| {
            match rule(ctx, subject) {
                None => Some((total, reasons)),
                Some(RuleOutcome::Disqualify) => None,
                Some(RuleOutcome::Adjust { delta, reason }) => {
                    reasons.push(reason);
                    Some((total + delta, reasons))
                }
            }
        });

    match folded {
        Some((total, reasons)) => ScoreResult::scored(total, reasons),
        None => ScoreResult::disqualified(),
    }
}

/// Case-insensitive substring test. An empty needle never matches.
#[inline]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnergyLevel, PlayStyle};

    fn create_dog() -> DogProfile {
        DogProfile {
            id: "dog".to_string(),
            name: "Rex".to_string(),
            breed: "Beagle".to_string(),
            age: 2.0,
            energy_level: EnergyLevel::High,
            size: None,
            training_level: None,
            is_good_off_leash: false,
            skills: vec![],
            play_style: PlayStyle::Varies,
            likes: vec![],
            preferred_playmate_sizes: vec![],
            behavior_notes: None,
        }
    }

    fn plus_thirty(_: &ScoringContext<'_>, _: &()) -> Option<RuleOutcome> {
        Some(RuleOutcome::bonus(30, "thirty"))
    }

    fn minus_fifty(_: &ScoringContext<'_>, _: &()) -> Option<RuleOutcome> {
        Some(RuleOutcome::penalty(50, "fifty"))
    }

    fn never(_: &ScoringContext<'_>, _: &()) -> Option<RuleOutcome> {
        None
    }

    fn disqualify(_: &ScoringContext<'_>, _: &()) -> Option<RuleOutcome> {
        Some(RuleOutcome::Disqualify)
    }

    #[test]
    fn test_fold_accumulates_in_order() {
        let dog = create_dog();
        let deriver = AttributeDeriver::default();
        let ctx = ScoringContext {
            dog: &dog,
            deriver: &deriver,
            age_policy: AgePolicy::Advisory,
        };

        let rules: [Rule<()>; 3] = [plus_thirty, never, plus_thirty];
        let result = evaluate(ScoreBasis::Additive(0), &ctx, &(), &rules);

        assert_eq!(result.score, 60);
        assert_eq!(result.reason_texts(), vec!["thirty", "thirty"]);
        assert!(!result.disqualified);
    }

    #[test]
    fn test_fold_clamps_both_ends() {
        let dog = create_dog();
        let deriver = AttributeDeriver::default();
        let ctx = ScoringContext {
            dog: &dog,
            deriver: &deriver,
            age_policy: AgePolicy::Advisory,
        };

        let penalty: [Rule<()>; 1] = [minus_fifty];
        let low = evaluate(ScoreBasis::Additive(0), &ctx, &(), &penalty);
        assert_eq!(low.score, 0);
        assert!(!low.disqualified);

        let bonus: [Rule<()>; 1] = [plus_thirty];
        let high = evaluate(ScoreBasis::Deductive, &ctx, &(), &bonus);
        assert_eq!(high.score, 100);
    }

    #[test]
    fn test_disqualify_drops_reasons() {
        let dog = create_dog();
        let deriver = AttributeDeriver::default();
        let ctx = ScoringContext {
            dog: &dog,
            deriver: &deriver,
            age_policy: AgePolicy::Strict,
        };

        let rules: [Rule<()>; 3] = [plus_thirty, disqualify, plus_thirty];
        let result = evaluate(ScoreBasis::Deductive, &ctx, &(), &rules);

        assert_eq!(result, ScoreResult::disqualified());
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Pulls on the LEASH", "leash"));
        assert!(!contains_ignore_case("calm", "  "));
        assert!(!contains_ignore_case("calm", "jumpy"));
    }
}
