use criterion::{criterion_group, criterion_main, Criterion};
use fitbuddy::db::LocalStore;
use fitbuddy::models::{ActivityType, Location, User};
use fitbuddy::services::{DirectoryFilter, DirectoryService};
use std::hint::black_box;

/// Populate a store with `count` onboarded users scattered around Manhattan.
fn populated_store(count: usize) -> LocalStore {
    let store = LocalStore::in_memory();
    for i in 0..count {
        let mut user = User::new_signup(format!("u{}", i), &format!("u{}@example.com", i), None);
        user.activities = vec![ActivityType::ALL[i % ActivityType::ALL.len()]];
        user.location = Location {
            lat: 40.70 + (i % 100) as f64 * 0.001,
            lng: -74.00 + (i / 100) as f64 * 0.001,
        };
        user.is_profile_complete = true;
        store.put_user(&user).expect("Failed to seed user");
    }
    store
}

fn benchmark_browse(c: &mut Criterion) {
    let store = populated_store(500);
    let service = DirectoryService::new(store, true);

    let mut viewer = User::new_signup("viewer".to_string(), "viewer@example.com", None);
    viewer.location = Location {
        lat: 40.7829,
        lng: -73.9654,
    };
    viewer.is_profile_complete = true;

    let mut group = c.benchmark_group("directory_browse");

    group.bench_function("all_activities", |b| {
        b.iter(|| service.browse(black_box(&viewer), black_box(&DirectoryFilter::default())))
    });

    let nearby_runners = DirectoryFilter {
        activity: Some(ActivityType::Running),
        max_distance_km: Some(5.0),
        ..Default::default()
    };
    group.bench_function("nearby_runners", |b| {
        b.iter(|| service.browse(black_box(&viewer), black_box(&nearby_runners)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_browse);
criterion_main!(benches);
