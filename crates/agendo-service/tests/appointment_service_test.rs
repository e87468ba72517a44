//! Integration tests for the appointment service, wired against
//! in-memory SurrealDB repositories.

use agendo_core::error::AgendoError;
use agendo_core::models::appointment_type::CreateAppointmentType;
use agendo_core::models::company::CreateCompany;
use agendo_core::models::user::UserRole;
use agendo_core::repository::{AppointmentTypeRepository, CompanyRepository};
use agendo_core::tenant::{Actor, RequestContext};
use agendo_core::validate::AppointmentDraft;
use agendo_db::repository::{
    SurrealAppointmentRepository, SurrealAppointmentTypeRepository, SurrealCompanyRepository,
};
use agendo_service::{AppointmentChange, AppointmentService};
use chrono::DateTime;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;
type Service = AppointmentService<SurrealAppointmentRepository<Db>, SurrealAppointmentTypeRepository<Db>>;

fn epoch(s: &str) -> i64 {
    DateTime::parse_from_rfc3339(s).unwrap().timestamp()
}

fn actor_for(company_id: Uuid) -> RequestContext {
    RequestContext::for_actor(Actor {
        user_id: Uuid::new_v4(),
        company_id,
        role: UserRole::Regular,
    })
}

fn checkup() -> AppointmentDraft {
    AppointmentDraft {
        name: "Checkup".into(),
        scheduled_at: "2024-03-15 10:00:00".into(),
        appointment_type_id: None,
    }
}

/// Helper: in-memory DB + migrations + two companies + service.
async fn setup() -> (Surreal<Db>, Service, Uuid, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agendo_db::run_migrations(&db).await.unwrap();

    let companies = SurrealCompanyRepository::new(db.clone());
    let a = companies
        .create(CreateCompany { name: "Acme".into() })
        .await
        .unwrap();
    let b = companies
        .create(CreateCompany {
            name: "Globex".into(),
        })
        .await
        .unwrap();

    let service = AppointmentService::new(
        SurrealAppointmentRepository::new(db.clone()),
        SurrealAppointmentTypeRepository::new(db.clone()),
    );

    (db, service, a.id, b.id)
}

#[tokio::test]
async fn created_appointment_is_visible_only_to_its_tenant() {
    let (_db, service, company_a, company_b) = setup().await;

    let created = service.create(&actor_for(company_a), checkup()).await.unwrap();
    assert_eq!(created.company_id, company_a);

    let start = epoch("2024-03-01T00:00:00Z");
    let end = epoch("2024-04-01T00:00:00Z");

    let for_a = service
        .list_for_range(&actor_for(company_a), start, end)
        .await
        .unwrap();
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].appointment.id, created.id);
    assert_eq!(for_a[0].appointment.name, "Checkup");

    let for_b = service
        .list_for_range(&actor_for(company_b), start, end)
        .await
        .unwrap();
    assert!(for_b.is_empty());
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_any_write() {
    let (_db, service, company_a, _) = setup().await;
    let ctx = actor_for(company_a);

    let result = service
        .create(
            &ctx,
            AppointmentDraft {
                name: "".into(),
                scheduled_at: "not a date".into(),
                appointment_type_id: None,
            },
        )
        .await;

    let Err(AgendoError::Validation { violations }) = result else {
        panic!("expected validation error");
    };
    let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
    assert_eq!(fields, ["name", "scheduled_at"]);

    // No partial write happened.
    let listed = service
        .list_for_range(&ctx, epoch("2000-01-01T00:00:00Z"), epoch("2100-01-01T00:00:00Z"))
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn without_tenant_context_nothing_runs() {
    let (_db, service, _, _) = setup().await;

    let result = service.create(&RequestContext::default(), checkup()).await;
    assert!(matches!(result, Err(AgendoError::TenantContext)));
}

#[tokio::test]
async fn admin_creates_on_behalf_of_another_company() {
    let (_db, service, company_a, company_b) = setup().await;

    let admin = RequestContext::on_behalf_of(
        Actor {
            user_id: Uuid::new_v4(),
            company_id: company_a,
            role: UserRole::Admin,
        },
        company_b,
    );

    // The resolved tenant, not the actor's own company, owns the record.
    let created = service.create(&admin, checkup()).await.unwrap();
    assert_eq!(created.company_id, company_b);
}

#[tokio::test]
async fn update_validates_the_merged_record() {
    let (_db, service, company_a, _) = setup().await;
    let ctx = actor_for(company_a);

    let created = service.create(&ctx, checkup()).await.unwrap();

    // Rename only: the stored scheduled_at carries over.
    let renamed = service
        .update(
            &ctx,
            created.id,
            AppointmentChange {
                name: Some("Follow-up".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Follow-up");
    assert_eq!(renamed.scheduled_at, created.scheduled_at);

    // A changeset that would blank the name is rejected.
    let blanked = service
        .update(
            &ctx,
            created.id,
            AppointmentChange {
                name: Some("".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(blanked, Err(AgendoError::Validation { .. })));
}

#[tokio::test]
async fn update_and_delete_are_tenant_scoped() {
    let (_db, service, company_a, company_b) = setup().await;

    let created = service.create(&actor_for(company_a), checkup()).await.unwrap();
    let foreign = actor_for(company_b);

    let update = service
        .update(
            &foreign,
            created.id,
            AppointmentChange {
                name: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(AgendoError::NotFound { .. })));

    let delete = service.delete(&foreign, created.id).await;
    assert!(matches!(delete, Err(AgendoError::NotFound { .. })));

    // Owner can still delete.
    service.delete(&actor_for(company_a), created.id).await.unwrap();
}

#[tokio::test]
async fn appointment_types_maps_id_to_name() {
    let (db, service, company_a, _) = setup().await;
    let types = SurrealAppointmentTypeRepository::new(db);

    let consult = types
        .create(
            company_a,
            CreateAppointmentType {
                name: "Consultation".into(),
            },
        )
        .await
        .unwrap();

    let mapping = service.appointment_types(&actor_for(company_a)).await.unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get(&consult.id).map(String::as_str), Some("Consultation"));
}

#[tokio::test]
async fn monthly_stats_count_one_march_appointment() {
    let (_db, service, company_a, company_b) = setup().await;
    let ctx = actor_for(company_a);

    service.create(&ctx, checkup()).await.unwrap();

    let stats = service.stats(&ctx, 2024).await.unwrap();
    assert_eq!(stats, [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    // The other tenant sees twelve explicit zeros.
    let empty = service.stats(&actor_for(company_b), 2024).await.unwrap();
    assert_eq!(empty, [0; 12]);
}

#[tokio::test]
async fn monthly_stats_sum_matches_full_year_count() {
    let (_db, service, company_a, _) = setup().await;
    let ctx = actor_for(company_a);

    for scheduled_at in [
        "2024-01-01 00:00:00", // year start boundary, included
        "2024-02-29 12:00:00", // leap day
        "2024-06-30 23:59:59",
        "2024-07-01 00:00:00", // month boundary, lands in July only
        "2024-12-31 23:59:59",
    ] {
        service
            .create(
                &ctx,
                AppointmentDraft {
                    name: "Visit".into(),
                    scheduled_at: scheduled_at.into(),
                    appointment_type_id: None,
                },
            )
            .await
            .unwrap();
    }
    // Just outside the year on both sides.
    service
        .create(
            &ctx,
            AppointmentDraft {
                name: "Visit".into(),
                scheduled_at: "2025-01-01 00:00:00".into(),
                appointment_type_id: None,
            },
        )
        .await
        .unwrap();

    let stats = service.stats(&ctx, 2024).await.unwrap();
    assert_eq!(stats.iter().sum::<u64>(), 5);
    assert_eq!(stats[0], 1);
    assert_eq!(stats[1], 1);
    assert_eq!(stats[5], 1);
    assert_eq!(stats[6], 1);
    assert_eq!(stats[11], 1);

    let year = service
        .list_for_range(
            &ctx,
            epoch("2024-01-01T00:00:00Z"),
            epoch("2025-01-01T00:00:00Z"),
        )
        .await
        .unwrap();
    assert_eq!(year.len() as u64, stats.iter().sum::<u64>());
}
