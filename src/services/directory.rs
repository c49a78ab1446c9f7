// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Buddy directory: the profiles a user can browse and connect with.

use geo::{Distance, Haversine, Point};
use serde::Deserialize;

use crate::db::LocalStore;
use crate::error::Result;
use crate::models::{ActivityType, FitnessGoal, Gender, Location, SkillLevel, User};

/// Directory query from the home and map screens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryFilter {
    /// Only buddies doing this activity (absent means "All")
    pub activity: Option<ActivityType>,
    pub skill_level: Option<SkillLevel>,
    pub goal: Option<FitnessGoal>,
    pub max_distance_km: Option<f64>,
}

impl DirectoryFilter {
    fn accepts(&self, user: &User) -> bool {
        self.activity.is_none_or(|a| user.does(a))
            && self.skill_level.is_none_or(|s| user.skill_level == s)
            && self.goal.is_none_or(|g| user.goals.contains(&g))
            && self.max_distance_km.is_none_or(|max| user.distance <= max)
    }
}

/// Lists seeded demo profiles alongside onboarded local users.
#[derive(Clone)]
pub struct DirectoryService {
    store: LocalStore,
    seeds: Vec<User>,
}

impl DirectoryService {
    pub fn new(store: LocalStore, include_seeds: bool) -> Self {
        let seeds = if include_seeds {
            seed_profiles()
        } else {
            Vec::new()
        };
        Self { store, seeds }
    }

    pub fn seeds(&self) -> &[User] {
        &self.seeds
    }

    /// Look up a profile by id, local users first.
    ///
    /// Local users stay hidden until they finish onboarding, the same as in
    /// [`browse`](Self::browse).
    pub fn find(&self, id: &str) -> Result<Option<User>> {
        if let Some(user) = self.store.get_user(id)? {
            return Ok(user.is_profile_complete.then_some(user));
        }
        Ok(self.seeds.iter().find(|u| u.id == id).cloned())
    }

    /// Profiles visible to `viewer`, nearest first.
    pub fn browse(&self, viewer: &User, filter: &DirectoryFilter) -> Result<Vec<User>> {
        let local = self.store.list_users()?;
        let mut results = Self::collect(&self.seeds, local, viewer, filter);
        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.name.cmp(&b.name))
        });

        tracing::debug!(
            viewer_id = %viewer.id,
            activity = ?filter.activity,
            count = results.len(),
            "Browsed directory"
        );
        Ok(results)
    }

    fn collect(
        seeds: &[User],
        local: Vec<User>,
        viewer: &User,
        filter: &DirectoryFilter,
    ) -> Vec<User> {
        let seeded: Vec<User> = seeds
            .iter()
            .filter(|s| !local.iter().any(|u| u.id == s.id))
            .cloned()
            .collect();

        local
            .into_iter()
            .filter(|u| u.is_profile_complete)
            .chain(seeded)
            .filter(|u| u.id != viewer.id)
            .map(|mut u| {
                if let Some(km) = distance_km(&viewer.location, &u.location) {
                    u.distance = km;
                }
                u
            })
            .filter(|u| filter.accepts(u))
            .collect()
    }
}

/// Great-circle distance in km, one decimal. `None` if either point is unknown.
pub fn distance_km(from: &Location, to: &Location) -> Option<f64> {
    if !from.is_known() || !to.is_known() {
        return None;
    }
    let meters = Haversine.distance(Point::new(from.lng, from.lat), Point::new(to.lng, to.lat));
    Some((meters / 100.0).round() / 10.0)
}

/// Demo profiles shown before any real buddies exist.
pub fn seed_profiles() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            email: "sarah.chen@example.com".to_string(),
            name: "Sarah Chen".to_string(),
            age: 27,
            gender: Gender::Female,
            bio: "Looking for a morning run partner!".to_string(),
            about_me: "I am a software engineer who loves the outdoors. I started running \
                       during the pandemic and never looked back. I am training for my first \
                       marathon and would love a partner for long runs."
                .to_string(),
            avatar: "https://picsum.photos/seed/sarah/200".to_string(),
            activities: vec![ActivityType::Running, ActivityType::Yoga],
            goals: vec![FitnessGoal::Endurance, FitnessGoal::Competition],
            skill_level: SkillLevel::Intermediate,
            distance: 0.8,
            location: Location {
                lat: 40.785091,
                lng: -73.968285,
            },
            availability: tags(&["Mon", "Wed", "Fri", "Early Morning (5am-8am)"]),
            is_profile_complete: true,
        },
        User {
            id: "2".to_string(),
            email: "marcus.j@example.com".to_string(),
            name: "Marcus Johnson".to_string(),
            age: 31,
            gender: Gender::Male,
            bio: "Heavy lifting enthusiast. Need a spotter!".to_string(),
            about_me: "Gym rat for over 10 years. I focus mostly on powerlifting and \
                       hypertrophy. I am very disciplined with my routine and looking for \
                       someone who takes training seriously."
                .to_string(),
            avatar: "https://picsum.photos/seed/marcus/200".to_string(),
            activities: vec![ActivityType::Gym],
            goals: vec![FitnessGoal::MuscleGain, FitnessGoal::Competition],
            skill_level: SkillLevel::Advanced,
            distance: 1.2,
            location: Location {
                lat: 40.7812,
                lng: -73.9665,
            },
            availability: tags(&["Tue", "Thu", "Sat", "Evening (5pm-9pm)"]),
            is_profile_complete: true,
        },
        User {
            id: "3".to_string(),
            email: "alex.r@example.com".to_string(),
            name: "Alex Rivera".to_string(),
            age: 24,
            gender: Gender::NonBinary,
            bio: "Looking for casual tennis partners!".to_string(),
            about_me: "Recent graduate. I used to play tennis in high school and want to get \
                       back into it. I am also into hiking and exploring local trails on the \
                       weekends."
                .to_string(),
            avatar: "https://picsum.photos/seed/alex/200".to_string(),
            activities: vec![ActivityType::Tennis, ActivityType::Hiking],
            goals: vec![FitnessGoal::Socialize, FitnessGoal::WeightLoss],
            skill_level: SkillLevel::Beginner,
            distance: 2.5,
            location: Location {
                lat: 40.7789,
                lng: -73.9701,
            },
            availability: tags(&["Sat", "Sun", "Weekends Only"]),
            is_profile_complete: true,
        },
    ]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
