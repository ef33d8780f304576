use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much exercise and stimulation a dog needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Medium sits next to both ends. Low and High are never adjacent.
    pub fn is_adjacent(self, other: EnergyLevel) -> bool {
        matches!(
            (self, other),
            (EnergyLevel::Medium, EnergyLevel::Low)
                | (EnergyLevel::Medium, EnergyLevel::High)
                | (EnergyLevel::Low, EnergyLevel::Medium)
                | (EnergyLevel::High, EnergyLevel::Medium)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLevel::Low => "Low",
            EnergyLevel::Medium => "Medium",
            EnergyLevel::High => "High",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DogSize {
    Small,
    Medium,
    Large,
}

impl DogSize {
    pub fn as_str(self) -> &'static str {
        match self {
            DogSize::Small => "Small",
            DogSize::Medium => "Medium",
            DogSize::Large => "Large",
        }
    }
}

impl fmt::Display for DogSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered obedience level, Beginner < Intermediate < Advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainingLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TrainingLevel {
    pub fn rank(self) -> u8 {
        match self {
            TrainingLevel::Beginner => 0,
            TrainingLevel::Intermediate => 1,
            TrainingLevel::Advanced => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrainingLevel::Beginner => "Beginner",
            TrainingLevel::Intermediate => "Intermediate",
            TrainingLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for TrainingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayStyle {
    Gentle,
    Moderate,
    Rough,
    #[default]
    Varies,
}

impl PlayStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayStyle::Gentle => "Gentle",
            PlayStyle::Moderate => "Moderate",
            PlayStyle::Rough => "Rough",
            PlayStyle::Varies => "Varies",
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dog profile as stored by the owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub breed: String,
    /// Age in years, fractional allowed
    pub age: f64,
    #[serde(rename = "energyLevel")]
    pub energy_level: EnergyLevel,
    /// Explicit size. Estimated from the breed when absent.
    #[serde(default)]
    pub size: Option<DogSize>,
    /// Explicit training level. Derived from skills when absent.
    #[serde(rename = "trainingLevel", default)]
    pub training_level: Option<TrainingLevel>,
    #[serde(rename = "isGoodOffLeash", default)]
    pub is_good_off_leash: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "playStyle", default)]
    pub play_style: PlayStyle,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(rename = "preferredPlaymateSizes", default)]
    pub preferred_playmate_sizes: Vec<DogSize>,
    #[serde(rename = "behaviorNotes", default)]
    pub behavior_notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    #[default]
    Months,
    Years,
}

/// Age bounds as written on the activity, in the activity's own unit
///
/// A record without `ageUnit` takes the default of its candidate kind when
/// deserialized as a [`Candidate`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AgeRequirement {
    #[serde(rename = "minAge", default)]
    pub min: Option<f64>,
    #[serde(rename = "maxAge", default)]
    pub max: Option<f64>,
    #[serde(rename = "ageUnit", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<AgeUnit>,
}

impl AgeRequirement {
    pub fn months(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            unit: Some(AgeUnit::Months),
        }
    }

    pub fn years(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            unit: Some(AgeUnit::Years),
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// The stated unit, or `default` when the record left it out
    pub fn unit_or(&self, default: AgeUnit) -> AgeUnit {
        self.unit.unwrap_or(default)
    }
}

/// Participation requirements attached to an activity. Every field is optional;
/// an absent field places no constraint on the dog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(flatten)]
    pub age: AgeRequirement,
    #[serde(rename = "energyLevel", default)]
    pub energy_level: Option<EnergyLevel>,
    #[serde(rename = "suitableEnergyLevels", default)]
    pub suitable_energy_levels: Vec<EnergyLevel>,
    #[serde(rename = "dogSize", default)]
    pub dog_size: Option<DogSize>,
    #[serde(rename = "suitableDogSizes", default)]
    pub suitable_dog_sizes: Vec<DogSize>,
    #[serde(rename = "trainingLevel", default)]
    pub training_level: Option<TrainingLevel>,
    #[serde(rename = "requiredAbilities", default)]
    pub required_abilities: Vec<String>,
    #[serde(rename = "breedAllowList", default)]
    pub breed_allow_list: Vec<String>,
    #[serde(rename = "notRecommendedFor", alias = "breedDenyList", default)]
    pub breed_deny_list: Vec<String>,
}

impl Requirements {
    /// Single and list forms merged. Empty means any energy level.
    pub fn energy_levels(&self) -> Vec<EnergyLevel> {
        let mut levels = self.suitable_energy_levels.clone();
        if let Some(level) = self.energy_level {
            if !levels.contains(&level) {
                levels.push(level);
            }
        }
        levels
    }

    /// Single and list forms merged. Empty means any size.
    pub fn dog_sizes(&self) -> Vec<DogSize> {
        let mut sizes = self.suitable_dog_sizes.clone();
        if let Some(size) = self.dog_size {
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }
        sizes
    }
}

/// Category an event declares for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityCategory {
    Training,
    Playdate,
    DogPark,
    Competition,
}

/// Schedulable activity: an event, a training class or a park meetup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<ActivityCategory>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "startsAt", default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Anything a dog can be scored against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", from = "CandidateRecord")]
pub enum Candidate {
    Event(Activity),
    TrainingClass(Activity),
    DogParkMeetup(Activity),
    OtherDog(DogProfile),
}

/// Wire shape of [`Candidate`] before age units are resolved
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum CandidateRecord {
    Event(Activity),
    TrainingClass(Activity),
    DogParkMeetup(Activity),
    OtherDog(DogProfile),
}

impl From<CandidateRecord> for Candidate {
    fn from(record: CandidateRecord) -> Self {
        let mut candidate = match record {
            CandidateRecord::Event(activity) => Candidate::Event(activity),
            CandidateRecord::TrainingClass(activity) => Candidate::TrainingClass(activity),
            CandidateRecord::DogParkMeetup(activity) => Candidate::DogParkMeetup(activity),
            CandidateRecord::OtherDog(dog) => Candidate::OtherDog(dog),
        };

        let unit = candidate.default_age_unit();
        if let Some(activity) = candidate.activity_mut() {
            activity.requirements.age.unit.get_or_insert(unit);
        }
        candidate
    }
}

impl Candidate {
    /// Unit of `minAge`/`maxAge` when the record doesn't state one
    ///
    /// Training classes, playdates and competitions list ages in years.
    /// General events and park meetups list them in months.
    pub fn default_age_unit(&self) -> AgeUnit {
        match self {
            Candidate::TrainingClass(_) => AgeUnit::Years,
            Candidate::Event(activity) => match activity.category {
                Some(ActivityCategory::Training)
                | Some(ActivityCategory::Playdate)
                | Some(ActivityCategory::Competition) => AgeUnit::Years,
                Some(ActivityCategory::DogPark) | None => AgeUnit::Months,
            },
            Candidate::DogParkMeetup(_) | Candidate::OtherDog(_) => AgeUnit::Months,
        }
    }

    fn activity_mut(&mut self) -> Option<&mut Activity> {
        match self {
            Candidate::Event(activity)
            | Candidate::TrainingClass(activity)
            | Candidate::DogParkMeetup(activity) => Some(activity),
            Candidate::OtherDog(_) => None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Candidate::Event(activity)
            | Candidate::TrainingClass(activity)
            | Candidate::DogParkMeetup(activity) => &activity.id,
            Candidate::OtherDog(dog) => &dog.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Candidate::Event(activity)
            | Candidate::TrainingClass(activity)
            | Candidate::DogParkMeetup(activity) => &activity.title,
            Candidate::OtherDog(dog) => &dog.name,
        }
    }

    /// Which evaluator and bucket this candidate belongs to
    pub fn category(&self) -> Category {
        match self {
            Candidate::TrainingClass(_) => Category::Training,
            Candidate::DogParkMeetup(_) => Category::DogPark,
            Candidate::OtherDog(_) => Category::Playmate,
            Candidate::Event(activity) => match activity.category {
                Some(ActivityCategory::Training) => Category::Training,
                Some(ActivityCategory::Playdate) => Category::Playdate,
                Some(ActivityCategory::DogPark) => Category::DogPark,
                Some(ActivityCategory::Competition) => Category::Competition,
                None => Category::General,
            },
        }
    }
}

/// Recommendation bucket key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Training,
    Playdate,
    DogPark,
    Competition,
    Playmate,
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Training,
        Category::Playdate,
        Category::DogPark,
        Category::Competition,
        Category::Playmate,
        Category::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Training => "training",
            Category::Playdate => "playdate",
            Category::DogPark => "dogPark",
            Category::Competition => "competition",
            Category::Playmate => "playmate",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// One rule's human-readable contribution to a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub text: String,
    pub polarity: Polarity,
}

impl Reason {
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            polarity: Polarity::Positive,
        }
    }

    pub fn negative(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            polarity: Polarity::Negative,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }
}

/// Score for one (dog, candidate) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub reasons: Vec<Reason>,
    /// A hard requirement failed. Always paired with score 0 and no reasons.
    #[serde(default)]
    pub disqualified: bool,
}

impl ScoreResult {
    /// Clamps the raw total into 0..=100
    pub fn scored(total: i32, reasons: Vec<Reason>) -> Self {
        Self {
            score: total.clamp(0, 100) as u8,
            reasons,
            disqualified: false,
        }
    }

    pub fn disqualified() -> Self {
        Self {
            score: 0,
            reasons: Vec::new(),
            disqualified: true,
        }
    }

    pub fn reason_texts(&self) -> Vec<&str> {
        self.reasons.iter().map(|reason| reason.text.as_str()).collect()
    }
}

/// A scored candidate, ready for bucketing and display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate: Candidate,
    pub category: Category,
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl Recommendation {
    pub fn score(&self) -> u8 {
        self.result.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_of(json: &str) -> AgeRequirement {
        match serde_json::from_str::<Candidate>(json).unwrap() {
            Candidate::Event(activity)
            | Candidate::TrainingClass(activity)
            | Candidate::DogParkMeetup(activity) => activity.requirements.age,
            Candidate::OtherDog(dog) => panic!("unexpected dog {}", dog.id),
        }
    }

    #[test]
    fn test_age_unit_defaults_by_kind() {
        let class = age_of(
            r#"{"type": "trainingClass", "title": "Basics", "requirements": {"minAge": 1}}"#,
        );
        assert_eq!(class.unit, Some(AgeUnit::Years));

        let playdate = age_of(
            r#"{"type": "event", "title": "Romp", "category": "playdate",
                "requirements": {"minAge": 1, "maxAge": 8}}"#,
        );
        assert_eq!(playdate.unit, Some(AgeUnit::Years));

        let trial = age_of(
            r#"{"type": "event", "title": "Trial", "category": "competition",
                "requirements": {"maxAge": 10}}"#,
        );
        assert_eq!(trial.unit, Some(AgeUnit::Years));

        let hike =
            age_of(r#"{"type": "event", "title": "Hike", "requirements": {"minAge": 12}}"#);
        assert_eq!(hike.unit, Some(AgeUnit::Months));
    }

    #[test]
    fn test_explicit_age_unit_wins() {
        let class = age_of(
            r#"{"type": "trainingClass", "title": "Puppy class",
                "requirements": {"maxAge": 6, "ageUnit": "months"}}"#,
        );
        assert_eq!(class.unit, Some(AgeUnit::Months));
    }

    #[test]
    fn test_play_style_display() {
        assert_eq!(PlayStyle::Rough.to_string(), "Rough");
        assert_eq!(PlayStyle::default().as_str(), "Varies");
    }
}
