use crate::core::attributes::{age_in_months, age_in_years, to_months, AttributeDeriver};
use crate::core::rules::{
    contains_ignore_case, evaluate, AgePolicy, Rule, RuleOutcome, ScoreBasis, ScoringContext,
};
use crate::models::{
    Activity, ActivityCategory, AgeRequirement, AgeUnit, Candidate, DogProfile, DogSize,
    ScoreResult,
};
use serde::{Deserialize, Serialize};

// General compatibility (deductive from 100)
const ENERGY_MISMATCH_PENALTY: i32 = 25;
const SIZE_MISMATCH_PENALTY: i32 = 20;
const AGE_MISMATCH_PENALTY: i32 = 30;
const MISSING_ABILITY_PENALTY: i32 = 25;
const TRAINING_GAP_PENALTY: i32 = 15;

// Training
const TRAINING_LEVEL_MATCH_BONUS: i32 = 40;
const TRAINING_LEVEL_STRETCH_BONUS: i32 = 20;
const BEHAVIOR_TAG_BONUS: i32 = 20;
const ADVISORY_AGE_PENALTY: i32 = 15;

// Playdate
const PLAYDATE_ENERGY_MATCH_BONUS: i32 = 30;
const PLAYDATE_ENERGY_ADJACENT_BONUS: i32 = 15;
const PLAYDATE_SIZE_MATCH_BONUS: i32 = 20;
const PLAYDATE_MEDIUM_GROUP_BONUS: i32 = 10;
const PLAYDATE_AGE_BONUS: i32 = 15;
const PLAYDATE_BREED_BONUS: i32 = 15;

// Dog park
const PARK_PARTICIPATION_BONUS: i32 = 30;
const PARK_ENERGY_TAG_BONUS: i32 = 15;
const PARK_SIZE_TAG_BONUS: i32 = 15;
const PARK_LIKE_BONUS: i32 = 10;
const PARK_LIKES_CAP: i32 = 30;

// Competition
const COMPETITION_ELIGIBILITY_BONUS: i32 = 50;
const COMPETITION_SKILL_BONUS: i32 = 25;

// Dog to dog
const PLAYMATE_BASE: i32 = 50;
const PLAYMATE_SIZE_BONUS: i32 = 15;
const PLAYMATE_ENERGY_MATCH_BONUS: i32 = 15;
const PLAYMATE_ENERGY_ADJACENT_BONUS: i32 = 8;
const PLAYMATE_CLOSE_AGE_YEARS: f64 = 2.0;
const PLAYMATE_CLOSE_AGE_BONUS: i32 = 10;
const PLAYMATE_NEAR_AGE_YEARS: f64 = 4.0;
const PLAYMATE_NEAR_AGE_BONUS: i32 = 5;
const PLAYMATE_STYLE_BONUS: i32 = 10;

const GENERAL_RULES: &[Rule<Activity>] = &[
    breed_deny_list,
    breed_allow_list_gate,
    energy_suitability,
    size_suitability,
    age_suitability,
    required_abilities,
    training_level_suitability,
];

const TRAINING_RULES: &[Rule<Activity>] = &[
    age_by_policy,
    training_level_fit,
    behavior_tag_overlap,
];

const PLAYDATE_RULES: &[Rule<Activity>] = &[
    playdate_energy,
    playdate_size,
    playdate_age_range,
    playdate_breed,
];

const DOG_PARK_RULES: &[Rule<Activity>] = &[
    park_participation,
    park_energy_tag,
    park_size_tag,
    park_likes,
];

const COMPETITION_RULES: &[Rule<Activity>] = &[
    breed_allow_list_gate,
    age_by_policy,
    competition_eligibility,
    competition_skills,
];

const PLAYMATE_RULES: &[Rule<DogProfile>] = &[
    playmate_size,
    playmate_energy,
    playmate_age_gap,
    playmate_style,
];

/// Age policy per category that checks age bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgePolicies {
    pub training: AgePolicy,
    pub competition: AgePolicy,
}

impl Default for AgePolicies {
    fn default() -> Self {
        Self {
            training: AgePolicy::Advisory,
            competition: AgePolicy::Strict,
        }
    }
}

/// Category-specific rule evaluation for a dog against a candidate
///
/// Uncategorized events use the deductive compatibility check, which starts
/// at 100. Categorized activities use additive "why we recommend" rules that
/// start at 0, and other dogs start at the playmate base of 50.
///
/// Only uncategorized events score 100 when they state no requirements. An
/// empty training class or competition entry scores what its bonuses earn,
/// a park meetup with nothing to match scores 30 and a playmate 50.
///
/// Age bounds without a stated unit are read in months for general events
/// and in years for training, playdates and competitions.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    deriver: AttributeDeriver,
    age_policies: AgePolicies,
}

impl CompatibilityScorer {
    pub fn new(deriver: AttributeDeriver, age_policies: AgePolicies) -> Self {
        Self {
            deriver,
            age_policies,
        }
    }

    pub fn deriver(&self) -> &AttributeDeriver {
        &self.deriver
    }

    /// Score a candidate with the evaluator its category selects
    pub fn score(&self, dog: &DogProfile, candidate: &Candidate) -> ScoreResult {
        match candidate {
            Candidate::OtherDog(other) => self.playmate_fit(dog, other),
            Candidate::TrainingClass(activity) => self.training_fit(dog, activity),
            Candidate::DogParkMeetup(activity) => self.dog_park_fit(dog, activity),
            Candidate::Event(activity) => match activity.category {
                Some(ActivityCategory::Training) => self.training_fit(dog, activity),
                Some(ActivityCategory::Playdate) => self.playdate_fit(dog, activity),
                Some(ActivityCategory::DogPark) => self.dog_park_fit(dog, activity),
                Some(ActivityCategory::Competition) => self.competition_fit(dog, activity),
                None => self.compatibility(dog, activity),
            },
        }
    }

    /// General event compatibility: 100 minus every violated constraint
    pub fn compatibility(&self, dog: &DogProfile, activity: &Activity) -> ScoreResult {
        let ctx = self.context(dog, AgePolicy::Advisory);
        evaluate(ScoreBasis::Deductive, &ctx, activity, GENERAL_RULES)
    }

    pub fn training_fit(&self, dog: &DogProfile, activity: &Activity) -> ScoreResult {
        let ctx = self.context(dog, self.age_policies.training);
        evaluate(ScoreBasis::Additive(0), &ctx, activity, TRAINING_RULES)
    }

    pub fn playdate_fit(&self, dog: &DogProfile, activity: &Activity) -> ScoreResult {
        let ctx = self.context(dog, AgePolicy::Advisory);
        evaluate(ScoreBasis::Additive(0), &ctx, activity, PLAYDATE_RULES)
    }

    pub fn dog_park_fit(&self, dog: &DogProfile, activity: &Activity) -> ScoreResult {
        let ctx = self.context(dog, AgePolicy::Advisory);
        evaluate(ScoreBasis::Additive(0), &ctx, activity, DOG_PARK_RULES)
    }

    pub fn competition_fit(&self, dog: &DogProfile, activity: &Activity) -> ScoreResult {
        let ctx = self.context(dog, self.age_policies.competition);
        evaluate(ScoreBasis::Additive(0), &ctx, activity, COMPETITION_RULES)
    }

    /// How well `other` suits `dog` as a playmate
    ///
    /// Only `dog`'s preferred playmate sizes are consulted, so the score is
    /// directional: `playmate_fit(a, b)` may differ from `playmate_fit(b, a)`.
    pub fn playmate_fit(&self, dog: &DogProfile, other: &DogProfile) -> ScoreResult {
        let ctx = self.context(dog, AgePolicy::Advisory);
        evaluate(ScoreBasis::Additive(PLAYMATE_BASE), &ctx, other, PLAYMATE_RULES)
    }

    fn context<'a>(&'a self, dog: &'a DogProfile, age_policy: AgePolicy) -> ScoringContext<'a> {
        ScoringContext {
            dog,
            deriver: &self.deriver,
            age_policy,
        }
    }
}

/// Where the dog's age falls relative to a requirement, both in months
#[derive(Debug, Clone, Copy, PartialEq)]
enum AgeFit {
    Unconstrained,
    Within,
    TooYoung { min_months: f64 },
    TooOld { max_months: f64 },
}

/// `default_unit` applies when the requirement doesn't state its unit
fn age_fit(dog: &DogProfile, requirement: &AgeRequirement, default_unit: AgeUnit) -> AgeFit {
    if !requirement.is_constrained() {
        return AgeFit::Unconstrained;
    }

    let unit = requirement.unit_or(default_unit);
    let months = age_in_months(dog);
    if let Some(min) = requirement.min {
        let min_months = to_months(min, unit);
        if months < min_months {
            return AgeFit::TooYoung { min_months };
        }
    }
    if let Some(max) = requirement.max {
        let max_months = to_months(max, unit);
        if months > max_months {
            return AgeFit::TooOld { max_months };
        }
    }

    AgeFit::Within
}

fn breed_listed(breed: &str, list: &[String]) -> bool {
    list.iter().any(|entry| contains_ignore_case(breed, entry))
}

fn is_off_leash(ability: &str) -> bool {
    let normalized: String = ability
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    normalized == "offleash"
}

fn ability_label(ability: &str) -> String {
    if is_off_leash(ability) {
        "off-leash".to_string()
    } else {
        ability.trim().to_string()
    }
}

fn has_ability(dog: &DogProfile, ability: &str) -> bool {
    if is_off_leash(ability) {
        return dog.is_good_off_leash;
    }
    let wanted = ability.trim();
    dog.skills.iter().any(|skill| skill.trim().eq_ignore_ascii_case(wanted))
}

// ---- general compatibility ----

fn breed_deny_list(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    breed_listed(&ctx.dog.breed, &activity.requirements.breed_deny_list)
        .then_some(RuleOutcome::Disqualify)
}

/// Shared by general events and competitions: an allow-list that skips the breed disqualifies
fn breed_allow_list_gate(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let allow = &activity.requirements.breed_allow_list;
    (!allow.is_empty() && !breed_listed(&ctx.dog.breed, allow)).then_some(RuleOutcome::Disqualify)
}

fn energy_suitability(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let levels = activity.requirements.energy_levels();
    if levels.is_empty() {
        return None;
    }

    let energy = ctx.dog.energy_level;
    Some(if levels.contains(&energy) {
        RuleOutcome::note(format!("Energy level {} matches this event", energy))
    } else {
        RuleOutcome::penalty(
            ENERGY_MISMATCH_PENALTY,
            format!("Energy level {} is outside the suggested range", energy),
        )
    })
}

fn size_suitability(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let sizes = activity.requirements.dog_sizes();
    if sizes.is_empty() {
        return None;
    }

    let size = ctx.deriver.size_of(ctx.dog);
    Some(if sizes.contains(&size) {
        RuleOutcome::note(format!("{} dogs are welcome", size))
    } else {
        RuleOutcome::penalty(
            SIZE_MISMATCH_PENALTY,
            format!("Intended for other sizes than {}", size),
        )
    })
}

fn age_suitability(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    match age_fit(ctx.dog, &activity.requirements.age, AgeUnit::Months) {
        AgeFit::Unconstrained => None,
        AgeFit::Within => Some(RuleOutcome::note(format!(
            "Age of {:.0} months meets the age requirement",
            age_in_months(ctx.dog)
        ))),
        AgeFit::TooYoung { min_months } => Some(RuleOutcome::penalty(
            AGE_MISMATCH_PENALTY,
            format!("Too young: minimum age is {:.0} months", min_months),
        )),
        AgeFit::TooOld { max_months } => Some(RuleOutcome::penalty(
            AGE_MISMATCH_PENALTY,
            format!("Too old: maximum age is {:.0} months", max_months),
        )),
    }
}

fn required_abilities(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let required = &activity.requirements.required_abilities;
    if required.is_empty() {
        return None;
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|ability| !has_ability(ctx.dog, ability))
        .map(|ability| ability_label(ability))
        .collect();

    Some(if missing.is_empty() {
        let labels: Vec<String> = required.iter().map(|a| ability_label(a)).collect();
        RuleOutcome::note(format!("Has the required abilities: {}", labels.join(", ")))
    } else {
        RuleOutcome::penalty(
            MISSING_ABILITY_PENALTY * missing.len() as i32,
            format!("Missing required abilities: {}", missing.join(", ")),
        )
    })
}

fn training_level_suitability(
    ctx: &ScoringContext<'_>,
    activity: &Activity,
) -> Option<RuleOutcome> {
    let required = activity.requirements.training_level?;
    let level = ctx.deriver.training_level_of(ctx.dog);

    Some(if level >= required {
        RuleOutcome::note(format!("Training level {} is sufficient", level))
    } else {
        let gap = (required.rank() - level.rank()) as i32;
        RuleOutcome::penalty(
            TRAINING_GAP_PENALTY * gap,
            format!("Suggested for {} dogs; currently {}", required, level),
        )
    })
}

// ---- training ----

/// Age bounds under the context's policy: disqualify when strict, penalize when advisory
fn age_by_policy(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let text = match age_fit(ctx.dog, &activity.requirements.age, AgeUnit::Years) {
        AgeFit::Unconstrained | AgeFit::Within => return None,
        AgeFit::TooYoung { min_months } => {
            format!("Younger than the recommended minimum age of {:.0} months", min_months)
        }
        AgeFit::TooOld { max_months } => {
            format!("Older than the recommended maximum age of {:.0} months", max_months)
        }
    };

    Some(match ctx.age_policy {
        AgePolicy::Strict => RuleOutcome::Disqualify,
        AgePolicy::Advisory => RuleOutcome::penalty(ADVISORY_AGE_PENALTY, text),
    })
}

fn training_level_fit(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let declared = activity.requirements.training_level?;
    let level = ctx.deriver.training_level_of(ctx.dog);

    if level == declared {
        Some(RuleOutcome::bonus(
            TRAINING_LEVEL_MATCH_BONUS,
            format!("Matches the {} training level", declared),
        ))
    } else if level.rank() + 1 == declared.rank() {
        Some(RuleOutcome::qualified_bonus(
            TRAINING_LEVEL_STRETCH_BONUS,
            format!("{} class is one step ahead of the current {} level", declared, level),
        ))
    } else {
        None
    }
}

fn behavior_tag_overlap(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let notes = ctx.dog.behavior_notes.as_deref()?;
    let matched: Vec<&str> = activity
        .tags
        .iter()
        .filter(|tag| contains_ignore_case(notes, tag))
        .map(|tag| tag.as_str())
        .collect();

    (!matched.is_empty()).then(|| {
        RuleOutcome::bonus(
            BEHAVIOR_TAG_BONUS,
            format!("Works on noted behaviors: {}", matched.join(", ")),
        )
    })
}

// ---- playdate ----

fn playdate_energy(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let levels = activity.requirements.energy_levels();
    let energy = ctx.dog.energy_level;

    if levels.contains(&energy) {
        Some(RuleOutcome::bonus(
            PLAYDATE_ENERGY_MATCH_BONUS,
            format!("Energy level {} is a perfect match", energy),
        ))
    } else if levels.iter().any(|level| level.is_adjacent(energy)) {
        Some(RuleOutcome::bonus(
            PLAYDATE_ENERGY_ADJACENT_BONUS,
            format!("Energy level {} is close to the group's pace", energy),
        ))
    } else {
        None
    }
}

fn playdate_size(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let sizes = activity.requirements.dog_sizes();
    let size = ctx.deriver.size_of(ctx.dog);

    if sizes.contains(&size) {
        Some(RuleOutcome::bonus(
            PLAYDATE_SIZE_MATCH_BONUS,
            format!("{} dogs are the intended size", size),
        ))
    } else if sizes.contains(&DogSize::Medium) {
        Some(RuleOutcome::bonus(
            PLAYDATE_MEDIUM_GROUP_BONUS,
            format!("A medium-size group can suit a {} dog", size.as_str().to_lowercase()),
        ))
    } else {
        None
    }
}

fn playdate_age_range(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let fit = age_fit(ctx.dog, &activity.requirements.age, AgeUnit::Years);
    (fit == AgeFit::Within).then(|| {
        RuleOutcome::bonus(
            PLAYDATE_AGE_BONUS,
            format!("At {} years old, within the age range", age_in_years(ctx.dog)),
        )
    })
}

fn playdate_breed(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    breed_listed(&ctx.dog.breed, &activity.requirements.breed_allow_list).then(|| {
        RuleOutcome::bonus(
            PLAYDATE_BREED_BONUS,
            format!("{} is on the suggested breed list", ctx.dog.breed),
        )
    })
}

// ---- dog park ----

fn park_participation(_: &ScoringContext<'_>, _: &Activity) -> Option<RuleOutcome> {
    Some(RuleOutcome::bonus(
        PARK_PARTICIPATION_BONUS,
        "Dog parks are open to all dogs",
    ))
}

fn park_energy_tag(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let wanted = format!("{} energy", ctx.dog.energy_level);
    activity
        .tags
        .iter()
        .any(|tag| contains_ignore_case(tag, &wanted))
        .then(|| {
            RuleOutcome::bonus(
                PARK_ENERGY_TAG_BONUS,
                format!("Suited to {} dogs", wanted.to_lowercase()),
            )
        })
}

fn park_size_tag(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let wanted = format!("{} dog", ctx.deriver.size_of(ctx.dog));
    activity
        .tags
        .iter()
        .any(|tag| contains_ignore_case(tag, &wanted))
        .then(|| {
            RuleOutcome::bonus(
                PARK_SIZE_TAG_BONUS,
                format!("Has space for {}s", wanted.to_lowercase()),
            )
        })
}

fn park_likes(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let matched: Vec<&str> = ctx
        .dog
        .likes
        .iter()
        .filter(|like| {
            activity
                .tags
                .iter()
                .any(|tag| contains_ignore_case(tag, like) || contains_ignore_case(like, tag))
        })
        .map(|like| like.as_str())
        .collect();

    if matched.is_empty() {
        return None;
    }

    let bonus = (PARK_LIKE_BONUS * matched.len() as i32).min(PARK_LIKES_CAP);
    Some(RuleOutcome::bonus(
        bonus,
        format!("Matches what they like: {}", matched.join(", ")),
    ))
}

// ---- competition ----

fn competition_eligibility(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let text = if activity.requirements.breed_allow_list.is_empty() {
        "Open to all breeds".to_string()
    } else {
        format!("{} is eligible to compete", ctx.dog.breed)
    };
    Some(RuleOutcome::bonus(COMPETITION_ELIGIBILITY_BONUS, text))
}

fn competition_skills(ctx: &ScoringContext<'_>, activity: &Activity) -> Option<RuleOutcome> {
    let matched: Vec<&str> = ctx
        .dog
        .skills
        .iter()
        .filter(|skill| activity.tags.iter().any(|tag| contains_ignore_case(tag, skill)))
        .map(|skill| skill.as_str())
        .collect();

    (!matched.is_empty()).then(|| {
        RuleOutcome::bonus(
            COMPETITION_SKILL_BONUS,
            format!("Skills on show: {}", matched.join(", ")),
        )
    })
}

// ---- dog to dog ----

fn playmate_size(ctx: &ScoringContext<'_>, other: &DogProfile) -> Option<RuleOutcome> {
    let size = ctx.deriver.estimate_size(&other.breed);
    ctx.dog.preferred_playmate_sizes.contains(&size).then(|| {
        RuleOutcome::bonus(
            PLAYMATE_SIZE_BONUS,
            format!("Enjoys playing with {} dogs", size.as_str().to_lowercase()),
        )
    })
}

fn playmate_energy(ctx: &ScoringContext<'_>, other: &DogProfile) -> Option<RuleOutcome> {
    let (mine, theirs) = (ctx.dog.energy_level, other.energy_level);

    if mine == theirs {
        Some(RuleOutcome::bonus(
            PLAYMATE_ENERGY_MATCH_BONUS,
            format!("Both have {} energy", mine.as_str().to_lowercase()),
        ))
    } else if mine.is_adjacent(theirs) {
        Some(RuleOutcome::bonus(
            PLAYMATE_ENERGY_ADJACENT_BONUS,
            "Similar energy levels",
        ))
    } else {
        None
    }
}

fn playmate_age_gap(ctx: &ScoringContext<'_>, other: &DogProfile) -> Option<RuleOutcome> {
    let gap = (age_in_years(ctx.dog) - age_in_years(other)).abs();

    if gap <= PLAYMATE_CLOSE_AGE_YEARS {
        Some(RuleOutcome::bonus(PLAYMATE_CLOSE_AGE_BONUS, "Close in age"))
    } else if gap <= PLAYMATE_NEAR_AGE_YEARS {
        Some(RuleOutcome::bonus(PLAYMATE_NEAR_AGE_BONUS, "Not far apart in age"))
    } else {
        None
    }
}

fn playmate_style(ctx: &ScoringContext<'_>, other: &DogProfile) -> Option<RuleOutcome> {
    (ctx.dog.play_style == other.play_style).then(|| {
        RuleOutcome::bonus(
            PLAYMATE_STYLE_BONUS,
            format!("Same play style ({})", other.play_style),
        )
    })
}
