// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Buddy profile model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Activities a buddy can train in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Gym,
    Running,
    Basketball,
    Tennis,
    Yoga,
    Cycling,
    Hiking,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Gym,
        ActivityType::Running,
        ActivityType::Basketball,
        ActivityType::Tennis,
        ActivityType::Yoga,
        ActivityType::Cycling,
        ActivityType::Hiking,
    ];

    /// Display name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Gym => "Gym",
            ActivityType::Running => "Running",
            ActivityType::Basketball => "Basketball",
            ActivityType::Tennis => "Tennis",
            ActivityType::Yoga => "Yoga",
            ActivityType::Cycling => "Cycling",
            ActivityType::Hiking => "Hiking",
        }
    }
}

/// What a buddy wants to get out of training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FitnessGoal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    Endurance,
    Flexibility,
    Socialize,
    Competition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(rename = "Non-binary")]
    NonBinary,
}

/// Days of the week offered as availability tags.
pub const DAYS_OF_WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Time windows offered as availability tags.
pub const TIME_WINDOWS: [&str; 7] = [
    "Early Morning (5am-8am)",
    "Morning (8am-12pm)",
    "Lunch Break (12pm-2pm)",
    "Afternoon (2pm-5pm)",
    "Evening (5pm-9pm)",
    "Night Owl (9pm+)",
    "Weekends Only",
];

/// A point on the map (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl Location {
    /// The origin doubles as "location not shared".
    pub fn is_known(&self) -> bool {
        self.lat != 0.0 || self.lng != 0.0
    }
}

/// Buddy profile stored under the users key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    /// Short tagline shown on directory cards
    pub bio: String,
    pub about_me: String,
    pub avatar: String,
    pub activities: Vec<ActivityType>,
    pub goals: Vec<FitnessGoal>,
    pub skill_level: SkillLevel,
    /// Kilometers from the viewer, filled in by the directory
    pub distance: f64,
    pub location: Location,
    /// Ordered availability tags (days and time windows)
    pub availability: Vec<String>,
    pub is_profile_complete: bool,
}

impl User {
    /// Fresh account created at signup, pending onboarding.
    pub fn new_signup(id: String, email: &str, name: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Self {
            avatar: format!("https://picsum.photos/seed/{}/200", id),
            id,
            email: email.to_string(),
            name,
            age: 0,
            gender: Gender::default(),
            bio: String::new(),
            about_me: String::new(),
            activities: Vec::new(),
            goals: Vec::new(),
            skill_level: SkillLevel::default(),
            distance: 0.0,
            location: Location::default(),
            availability: Vec::new(),
            is_profile_complete: false,
        }
    }

    pub fn does(&self, activity: ActivityType) -> bool {
        self.activities.contains(&activity)
    }
}

/// Profile fields collected by the onboarding flow.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    #[validate(length(min = 1, max = 80), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(range(min = 16, max = 100))]
    pub age: u8,
    pub gender: Gender,
    #[validate(length(max = 160))]
    #[serde(default)]
    pub bio: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub about_me: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[validate(length(min = 1), custom(function = "validate_unique_activities"))]
    pub activities: Vec<ActivityType>,
    #[serde(default)]
    pub goals: Vec<FitnessGoal>,
    pub skill_level: SkillLevel,
    #[validate(nested)]
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub availability: Vec<String>,
}

impl OnboardingProfile {
    /// Copy the onboarding answers onto a stored profile.
    pub fn apply_to(self, user: &mut User) {
        user.name = self.name.trim().to_string();
        user.age = self.age;
        user.gender = self.gender;
        user.bio = self.bio;
        user.about_me = self.about_me;
        if let Some(avatar) = self.avatar.filter(|a| !a.is_empty()) {
            user.avatar = avatar;
        }
        user.activities = self.activities;
        user.goals = dedup(self.goals);
        user.skill_level = self.skill_level;
        user.location = self.location;
        user.availability = dedup(self.availability);
    }
}

/// Partial edit from the profile screen. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 80), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(range(min = 16, max = 100))]
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    #[validate(length(max = 160))]
    pub bio: Option<String>,
    #[validate(length(max = 1000))]
    pub about_me: Option<String>,
    pub avatar: Option<String>,
    #[validate(length(min = 1), custom(function = "validate_unique_activities"))]
    pub activities: Option<Vec<ActivityType>>,
    pub goals: Option<Vec<FitnessGoal>>,
    pub skill_level: Option<SkillLevel>,
    #[validate(nested)]
    pub location: Option<Location>,
    pub availability: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(about_me) = self.about_me {
            user.about_me = about_me;
        }
        if let Some(avatar) = self.avatar.filter(|a| !a.is_empty()) {
            user.avatar = avatar;
        }
        if let Some(activities) = self.activities {
            user.activities = activities;
        }
        if let Some(goals) = self.goals {
            user.goals = dedup(goals);
        }
        if let Some(skill_level) = self.skill_level {
            user.skill_level = skill_level;
        }
        if let Some(location) = self.location {
            user.location = location;
        }
        if let Some(availability) = self.availability {
            user.availability = dedup(availability);
        }
    }
}

fn validate_unique_activities(activities: &[ActivityType]) -> Result<(), ValidationError> {
    for (i, activity) in activities.iter().enumerate() {
        if activities[..i].contains(activity) {
            return Err(ValidationError::new("duplicate_activity"));
        }
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Drop repeated entries, keeping first occurrence order.
fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
