//! Integration tests for the SurrealDB repositories, run against the
//! in-memory engine with the real schema applied.

use std::time::Duration;

use aquamon_core::error::AquamonError;
use aquamon_core::models::measurement::{CustomField, NewReading};
use aquamon_core::models::pole::{CreatePole, UpdatePole};
use aquamon_core::models::profile::{CreateProfile, Role, UpdateProfile};
use aquamon_core::models::region::{CreateRegion, UpdateRegion};
use aquamon_core::models::well::{CreateWell, UpdateWellInfo, WellStatus};
use aquamon_core::repository::{
    PoleRepository, ProfileRepository, RegionRepository, WellRepository,
};
use aquamon_db::repository::{
    SurrealPoleRepository, SurrealProfileRepository, SurrealRegionRepository,
    SurrealWellRepository,
};
use aquamon_db::run_migrations;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("failed to create db");
    db.use_ns("test").use_db("test").await.expect("ns/db");
    run_migrations(&db).await.expect("migrations");
    db
}

fn region_input(name: &str, created_by: &str) -> CreateRegion {
    CreateRegion {
        name: name.into(),
        description: format!("{name} description"),
        created_by: created_by.into(),
    }
}

fn pole_input(name: &str, region_id: Uuid, created_by: &str) -> CreatePole {
    CreatePole {
        name: name.into(),
        description: String::new(),
        region_id,
        location: "Via Roma 1".into(),
        created_by: created_by.into(),
    }
}

fn well_input(name: &str, pole_id: Uuid, created_by: &str) -> CreateWell {
    CreateWell {
        name: name.into(),
        pole_id,
        status: WellStatus::Active,
        created_by: created_by.into(),
    }
}

// Guarantees distinct created_at values for ordering assertions.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

// -----------------------------------------------------------------------
// Regions
// -----------------------------------------------------------------------

#[tokio::test]
async fn region_create_sets_defaults() {
    let repo = SurrealRegionRepository::new(setup().await);

    let region = repo.create(region_input("North Field", "alice")).await.unwrap();

    assert_eq!(region.name, "North Field");
    assert_eq!(region.created_by, "alice");
    assert_eq!(region.updated_by, "alice");
    assert!(!region.is_password_protected);
    assert!(region.protecting_secret.is_none());
    assert!(region.protected_at.is_none());
}

#[tokio::test]
async fn region_create_rejects_blank_name() {
    let repo = SurrealRegionRepository::new(setup().await);

    let result = repo.create(region_input("   ", "alice")).await;
    assert!(matches!(result, Err(AquamonError::Validation { .. })));
}

#[tokio::test]
async fn region_list_is_newest_first() {
    let repo = SurrealRegionRepository::new(setup().await);

    repo.create(region_input("first", "alice")).await.unwrap();
    tick().await;
    repo.create(region_input("second", "alice")).await.unwrap();

    let regions = repo.list().await.unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].name, "second");
    assert_eq!(regions[1].name, "first");
}

#[tokio::test]
async fn region_update_applies_partial_changes() {
    let repo = SurrealRegionRepository::new(setup().await);
    let region = repo.create(region_input("old name", "alice")).await.unwrap();

    tick().await;
    repo.update(
        region.id,
        UpdateRegion {
            name: Some("new name".into()),
            description: None,
            updated_by: "bob".into(),
        },
    )
    .await
    .unwrap();

    let fetched = repo.list().await.unwrap().remove(0);
    assert_eq!(fetched.name, "new name");
    assert_eq!(fetched.description, "old name description");
    assert_eq!(fetched.updated_by, "bob");
    assert_eq!(fetched.created_by, "alice");
    assert!(fetched.updated_at > fetched.created_at);
}

#[tokio::test]
async fn region_update_missing_is_not_found() {
    let repo = SurrealRegionRepository::new(setup().await);

    let result = repo
        .update(
            Uuid::new_v4(),
            UpdateRegion {
                name: Some("x".into()),
                description: None,
                updated_by: "alice".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(AquamonError::NotFound { .. })));
}

#[tokio::test]
async fn region_delete_removes_only_target() {
    let repo = SurrealRegionRepository::new(setup().await);
    let doomed = repo.create(region_input("doomed", "alice")).await.unwrap();
    let kept = repo.create(region_input("kept", "alice")).await.unwrap();

    repo.delete(doomed.id).await.unwrap();

    let regions = repo.list().await.unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].id, kept.id);
}

#[tokio::test]
async fn region_list_by_creator_filters() {
    let repo = SurrealRegionRepository::new(setup().await);
    repo.create(region_input("mine", "alice")).await.unwrap();
    repo.create(region_input("theirs", "bob")).await.unwrap();

    let mine = repo.list_by_creator("alice").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "mine");

    assert!(repo.list_by_creator("nobody").await.unwrap().is_empty());
}

// -----------------------------------------------------------------------
// Poles
// -----------------------------------------------------------------------

#[tokio::test]
async fn pole_listing_is_scoped_to_region() {
    let db = setup().await;
    let regions = SurrealRegionRepository::new(db.clone());
    let poles = SurrealPoleRepository::new(db);

    let region_a = regions.create(region_input("a", "alice")).await.unwrap();
    let region_b = regions.create(region_input("b", "alice")).await.unwrap();

    poles
        .create(pole_input("a1", region_a.id, "alice"))
        .await
        .unwrap();
    tick().await;
    poles
        .create(pole_input("a2", region_a.id, "alice"))
        .await
        .unwrap();
    poles
        .create(pole_input("b1", region_b.id, "alice"))
        .await
        .unwrap();

    let in_a = poles.list_by_region(region_a.id).await.unwrap();
    assert_eq!(in_a.len(), 2);
    assert_eq!(in_a[0].name, "a2");
    assert_eq!(in_a[1].name, "a1");

    let in_b = poles.list_by_region(region_b.id).await.unwrap();
    assert_eq!(in_b.len(), 1);
    assert_eq!(in_b[0].name, "b1");
}

#[tokio::test]
async fn pole_update_and_delete() {
    let db = setup().await;
    let regions = SurrealRegionRepository::new(db.clone());
    let poles = SurrealPoleRepository::new(db);

    let region = regions.create(region_input("r", "alice")).await.unwrap();
    let pole = poles
        .create(pole_input("p", region.id, "alice"))
        .await
        .unwrap();
    assert_eq!(pole.location, "Via Roma 1");

    poles
        .update(
            pole.id,
            UpdatePole {
                name: None,
                description: None,
                location: Some("moved".into()),
                updated_by: "bob".into(),
            },
        )
        .await
        .unwrap();

    let fetched = poles.list_by_region(region.id).await.unwrap().remove(0);
    assert_eq!(fetched.location, "moved");
    assert_eq!(fetched.name, "p");
    assert_eq!(fetched.updated_by, "bob");

    poles.delete(pole.id).await.unwrap();
    assert!(poles.list_by_region(region.id).await.unwrap().is_empty());

    let result = poles
        .update(
            pole.id,
            UpdatePole {
                name: Some("x".into()),
                description: None,
                location: None,
                updated_by: "bob".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(AquamonError::NotFound { .. })));
}

#[tokio::test]
async fn deleting_region_does_not_cascade_to_poles() {
    let db = setup().await;
    let regions = SurrealRegionRepository::new(db.clone());
    let poles = SurrealPoleRepository::new(db);

    let region = regions.create(region_input("r", "alice")).await.unwrap();
    poles
        .create(pole_input("orphan", region.id, "alice"))
        .await
        .unwrap();

    regions.delete(region.id).await.unwrap();

    // The pole survives, still keyed by the deleted region's id.
    let orphans = poles.list_by_region(region.id).await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].name, "orphan");
}

// -----------------------------------------------------------------------
// Wells and measurements
// -----------------------------------------------------------------------

#[tokio::test]
async fn well_create_starts_with_zero_reading() {
    let repo = SurrealWellRepository::new(setup().await);
    let pole_id = Uuid::new_v4();

    let well = repo.create(well_input("w1", pole_id, "alice")).await.unwrap();

    assert_eq!(well.status, WellStatus::Active);
    assert_eq!(well.pole_id, pole_id);
    assert_eq!(well.reading.water_level, 0.0);
    assert_eq!(well.reading.pressure, 0.0);
    assert_eq!(well.reading.flow_rate, 0.0);
    assert!(well.reading.observations.is_empty());
}

#[tokio::test]
async fn well_create_rejects_blank_name() {
    let repo = SurrealWellRepository::new(setup().await);

    let result = repo.create(well_input("", Uuid::new_v4(), "alice")).await;
    assert!(matches!(result, Err(AquamonError::Validation { .. })));
}

#[tokio::test]
async fn well_update_info_returns_updated_row() {
    let repo = SurrealWellRepository::new(setup().await);
    let well = repo
        .create(well_input("w1", Uuid::new_v4(), "alice"))
        .await
        .unwrap();

    let updated = repo
        .update_info(
            well.id,
            UpdateWellInfo {
                name: Some("renamed".into()),
                status: Some(WellStatus::Maintenance),
                updated_by: "bob".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, well.id);
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.status, WellStatus::Maintenance);
    assert_eq!(updated.updated_by, "bob");
}

#[tokio::test]
async fn well_update_status_only_touches_status() {
    let repo = SurrealWellRepository::new(setup().await);
    let well = repo
        .create(well_input("w1", Uuid::new_v4(), "alice"))
        .await
        .unwrap();

    let updated = repo.update_status(well.id, WellStatus::Inactive).await.unwrap();
    assert_eq!(updated.status, WellStatus::Inactive);
    assert_eq!(updated.name, "w1");

    let missing = repo.update_status(Uuid::new_v4(), WellStatus::Active).await;
    assert!(matches!(missing, Err(AquamonError::NotFound { .. })));
}

#[tokio::test]
async fn well_listing_is_scoped_to_pole() {
    let repo = SurrealWellRepository::new(setup().await);
    let pole_a = Uuid::new_v4();
    let pole_b = Uuid::new_v4();

    repo.create(well_input("a1", pole_a, "alice")).await.unwrap();
    tick().await;
    repo.create(well_input("a2", pole_a, "alice")).await.unwrap();
    repo.create(well_input("b1", pole_b, "bob")).await.unwrap();

    let in_a = repo.list_by_pole(pole_a).await.unwrap();
    assert_eq!(in_a.len(), 2);
    assert_eq!(in_a[0].name, "a2");

    let bobs = repo.list_by_creator("bob").await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].name, "b1");
}

#[tokio::test]
async fn recording_updates_the_denormalized_reading() {
    let repo = SurrealWellRepository::new(setup().await);
    let well = repo
        .create(well_input("w1", Uuid::new_v4(), "alice"))
        .await
        .unwrap();

    let measurement = repo
        .record_measurement(
            well.id,
            NewReading {
                water_level: 12.5,
                pressure: 30.0,
                flow_rate: 4.2,
                observations: "clear water".into(),
                measured_by: "alice".into(),
                custom_fields: vec![
                    CustomField {
                        name: "Turbidity".into(),
                        value: json!(1.4),
                        unit: "NTU".into(),
                    },
                    CustomField {
                        name: "pH".into(),
                        value: json!("7.2"),
                        unit: String::new(),
                    },
                ],
            },
        )
        .await
        .unwrap();

    assert_eq!(measurement.well_id, well.id);
    assert_eq!(measurement.water_level, 12.5);
    assert_eq!(measurement.custom_fields.len(), 2);

    let refetched = repo.list_by_pole(well.pole_id).await.unwrap().remove(0);
    assert_eq!(refetched.reading.water_level, 12.5);
    assert_eq!(refetched.reading.pressure, 30.0);
    assert_eq!(refetched.reading.flow_rate, 4.2);
    assert_eq!(refetched.reading.observations, "clear water");
    assert_eq!(refetched.updated_by, "alice");
    // Well and history entry carry the same instant.
    assert_eq!(refetched.reading.last_measurement_at, measurement.timestamp);
}

#[tokio::test]
async fn custom_fields_round_trip_through_history() {
    let repo = SurrealWellRepository::new(setup().await);
    let well = repo
        .create(well_input("w1", Uuid::new_v4(), "alice"))
        .await
        .unwrap();

    repo.record_measurement(
        well.id,
        NewReading {
            water_level: 1.0,
            pressure: 2.0,
            flow_rate: 3.0,
            observations: String::new(),
            measured_by: "alice".into(),
            custom_fields: vec![
                CustomField {
                    name: "Conductivity".into(),
                    value: json!(520),
                    unit: "µS/cm".into(),
                },
                CustomField {
                    name: "Notes".into(),
                    value: json!("sampled at dawn"),
                    unit: String::new(),
                },
            ],
        },
    )
    .await
    .unwrap();

    let history = repo.list_measurements(well.id).await.unwrap();
    assert_eq!(history.len(), 1);

    let fields = &history[0].custom_fields;
    assert_eq!(fields[0].name, "Conductivity");
    assert_eq!(fields[0].value, json!(520));
    assert_eq!(fields[0].unit, "µS/cm");
    assert_eq!(fields[1].value, json!("sampled at dawn"));
}

#[tokio::test]
async fn measurements_list_newest_first() {
    let repo = SurrealWellRepository::new(setup().await);
    let well = repo
        .create(well_input("w1", Uuid::new_v4(), "alice"))
        .await
        .unwrap();

    let reading = |obs: &str| NewReading {
        water_level: 1.0,
        pressure: 1.0,
        flow_rate: 1.0,
        observations: obs.into(),
        measured_by: "alice".into(),
        custom_fields: Vec::new(),
    };

    repo.record_measurement(well.id, reading("first")).await.unwrap();
    tick().await;
    repo.record_measurement(well.id, reading("second")).await.unwrap();

    let history = repo.list_measurements(well.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].observations, "second");
    assert_eq!(history[1].observations, "first");
}

#[tokio::test]
async fn recording_against_missing_well_fails() {
    let repo = SurrealWellRepository::new(setup().await);

    let result = repo
        .record_measurement(
            Uuid::new_v4(),
            NewReading {
                water_level: 1.0,
                pressure: 1.0,
                flow_rate: 1.0,
                observations: String::new(),
                measured_by: "alice".into(),
                custom_fields: Vec::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(AquamonError::NotFound { .. })));
}

// -----------------------------------------------------------------------
// Profiles
// -----------------------------------------------------------------------

#[tokio::test]
async fn profile_create_and_get() {
    let repo = SurrealProfileRepository::new(setup().await);
    let uid = Uuid::new_v4();

    let created = repo
        .create(CreateProfile {
            uid,
            email: "alice@example.com".into(),
            display_name: "Alice".into(),
            phone: "555-0100".into(),
            tax_id: "IT123".into(),
            role: Role::User,
        })
        .await
        .unwrap();
    assert_eq!(created.uid, uid);
    assert_eq!(created.role, Role::User);

    let fetched = repo.get_by_uid(uid).await.unwrap();
    assert_eq!(fetched.email, "alice@example.com");
    assert_eq!(fetched.display_name, "Alice");

    let missing = repo.get_by_uid(Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AquamonError::NotFound { .. })));
}

#[tokio::test]
async fn profile_email_is_unique() {
    let repo = SurrealProfileRepository::new(setup().await);

    let input = |uid| CreateProfile {
        uid,
        email: "taken@example.com".into(),
        display_name: "First".into(),
        phone: String::new(),
        tax_id: String::new(),
        role: Role::User,
    };

    repo.create(input(Uuid::new_v4())).await.unwrap();
    assert!(repo.create(input(Uuid::new_v4())).await.is_err());
}

#[tokio::test]
async fn profile_update_keeps_uid_and_role() {
    let repo = SurrealProfileRepository::new(setup().await);
    let uid = Uuid::new_v4();

    repo.create(CreateProfile {
        uid,
        email: "admin@example.com".into(),
        display_name: "Admin".into(),
        phone: String::new(),
        tax_id: String::new(),
        role: Role::Admin,
    })
    .await
    .unwrap();

    let updated = repo
        .update(
            uid,
            UpdateProfile {
                display_name: Some("Renamed".into()),
                phone: Some("555-0199".into()),
                tax_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.uid, uid);
    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.phone, "555-0199");
    assert_eq!(updated.role, Role::Admin);
}

#[tokio::test]
async fn profile_delete() {
    let repo = SurrealProfileRepository::new(setup().await);
    let uid = Uuid::new_v4();

    repo.create(CreateProfile {
        uid,
        email: "gone@example.com".into(),
        display_name: "Gone".into(),
        phone: String::new(),
        tax_id: String::new(),
        role: Role::User,
    })
    .await
    .unwrap();

    repo.delete(uid).await.unwrap();
    assert!(repo.get_by_uid(uid).await.is_err());
}
