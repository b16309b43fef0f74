//! Tests for move-conflict resolution: preview, confirmation, shortening,
//! displacement, and the audit trail.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use fsa_rust::api::{InstanceId, TaskId, UserId};
use fsa_rust::config::SchedulerConfig;
use fsa_rust::db::repository::{AuditRepository, InstanceRepository};
use fsa_rust::db::LocalRepository;
use fsa_rust::models::instance::{InstanceStatus, ScheduledInstance};
use fsa_rust::models::time::TimeSlot;
use fsa_rust::scheduler::moves::MoveResolution;
use fsa_rust::services::{move_instance, MoveInstanceRequest, MoveOutcome};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
    TimeSlot::new(t(sh, sm), t(eh, em)).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 10, 12, 0, 0).unwrap()
}

fn user() -> UserId {
    UserId::new(1)
}

async fn seed(repo: &LocalRepository, name: &str, s: TimeSlot) -> InstanceId {
    let stored = repo
        .insert_instance(ScheduledInstance {
            id: None,
            task_id: TaskId::new(1),
            user_id: user(),
            task_name: name.to_string(),
            date: date(),
            slot: s,
            status: InstanceStatus::Scheduled,
            reasoning: "seeded".to_string(),
            original_slot: None,
        })
        .await
        .unwrap();
    stored.id.unwrap()
}

fn request(id: InstanceId, new: TimeSlot, confirmed: bool) -> MoveInstanceRequest {
    MoveInstanceRequest {
        instance_id: id,
        new_start: new.start,
        new_end: new.end,
        confirmed,
    }
}

#[tokio::test]
async fn clean_move_applies_and_writes_one_audit_record() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let id = seed(&repo, "Gym", slot(14, 0, 15, 0)).await;

    let outcome = move_instance(&repo, &cfg, request(id, slot(16, 0, 17, 0), false), now())
        .await
        .unwrap();

    let MoveOutcome::Applied {
        instance,
        conflicts_resolved,
    } = outcome
    else {
        panic!("clean move must apply without confirmation");
    };
    assert_eq!(conflicts_resolved, 0);
    assert_eq!(instance.slot, slot(16, 0, 17, 0));
    assert_eq!(instance.original_slot, Some(slot(14, 0, 15, 0)));

    let records = repo.conflict_records_for(user()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resolution, MoveResolution::Clean);
    assert_eq!(records[0].affected_instance_id, None);
    assert!(records[0].accepted);
}

#[tokio::test]
async fn conflicting_move_previews_before_committing() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let moved = seed(&repo, "Gym", slot(14, 0, 15, 0)).await;
    let sibling = seed(&repo, "Reading", slot(15, 0, 15, 30)).await;

    // 14:30-15:30 swallows the sibling entirely (100% overlap).
    let outcome = move_instance(&repo, &cfg, request(moved, slot(14, 30, 15, 30), false), now())
        .await
        .unwrap();

    let MoveOutcome::RequiresConfirmation { conflicts } = outcome else {
        panic!("unconfirmed conflicting move must return a preview");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].sibling_id, sibling);
    assert_eq!(conflicts[0].resolution, MoveResolution::Displaced);

    // Nothing was committed: both instances hold their original times.
    let stored = repo.get_instance(moved).await.unwrap();
    assert_eq!(stored.slot, slot(14, 0, 15, 0));
    assert!(repo.conflict_records_for(user()).await.unwrap().is_empty());
}

#[tokio::test]
async fn confirmed_displacement_flags_sibling_without_changing_its_time() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let moved = seed(&repo, "Gym", slot(14, 0, 15, 0)).await;
    let sibling = seed(&repo, "Reading", slot(15, 0, 15, 30)).await;

    let outcome = move_instance(&repo, &cfg, request(moved, slot(14, 30, 15, 30), true), now())
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        MoveOutcome::Applied {
            conflicts_resolved: 1,
            ..
        }
    ));

    let flagged = repo.get_instance(sibling).await.unwrap();
    assert_eq!(flagged.slot, slot(15, 0, 15, 30), "time unchanged");
    assert_eq!(flagged.status, InstanceStatus::NeedsAttention);

    let records = repo.conflict_records_for(user()).await.unwrap();
    // One record for the sibling, one for the moved instance itself.
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .any(|r| r.resolution == MoveResolution::Displaced
            && r.affected_instance_id == Some(sibling)));
    assert!(records
        .iter()
        .any(|r| r.resolution == MoveResolution::Clean && r.affected_instance_id.is_none()));
}

#[tokio::test]
async fn confirmed_minor_overlap_shortens_sibling_to_moved_start() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let moved = seed(&repo, "Gym", slot(11, 0, 12, 0)).await;
    // Only the last 10 minutes of the 30-minute sibling overlap (33%).
    let sibling = seed(&repo, "Reading", slot(10, 0, 10, 30)).await;

    let outcome = move_instance(&repo, &cfg, request(moved, slot(10, 20, 11, 20), true), now())
        .await
        .unwrap();
    assert!(matches!(outcome, MoveOutcome::Applied { .. }));

    let trimmed = repo.get_instance(sibling).await.unwrap();
    assert_eq!(
        trimmed.slot,
        slot(10, 0, 10, 20),
        "sibling end equals the moved start"
    );
    assert_eq!(trimmed.status, InstanceStatus::Scheduled);

    let records = repo.conflict_records_for(user()).await.unwrap();
    let shortened: Vec<_> = records
        .iter()
        .filter(|r| r.resolution == MoveResolution::Shortened)
        .collect();
    assert_eq!(shortened.len(), 1);
    assert_eq!(shortened[0].original_slot, slot(10, 0, 10, 30));
    assert_eq!(shortened[0].new_slot, slot(10, 0, 10, 20));
}

#[tokio::test]
async fn exact_half_overlap_displaces() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let moved = seed(&repo, "Gym", slot(8, 0, 9, 0)).await;
    // 15 of 30 sibling minutes: the boundary case.
    let sibling = seed(&repo, "Reading", slot(9, 45, 10, 15)).await;

    let outcome = move_instance(&repo, &cfg, request(moved, slot(9, 0, 10, 0), true), now())
        .await
        .unwrap();
    assert!(matches!(outcome, MoveOutcome::Applied { .. }));
    let flagged = repo.get_instance(sibling).await.unwrap();
    assert_eq!(flagged.status, InstanceStatus::NeedsAttention);
}

#[tokio::test]
async fn second_move_keeps_first_provenance() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let id = seed(&repo, "Gym", slot(14, 0, 15, 0)).await;

    move_instance(&repo, &cfg, request(id, slot(16, 0, 17, 0), false), now())
        .await
        .unwrap();
    move_instance(&repo, &cfg, request(id, slot(18, 0, 19, 0), false), now())
        .await
        .unwrap();

    let stored = repo.get_instance(id).await.unwrap();
    assert_eq!(stored.slot, slot(18, 0, 19, 0));
    // Provenance still points at the first scheduled time.
    assert_eq!(stored.original_slot, Some(slot(14, 0, 15, 0)));

    let records = repo.conflict_records_for(user()).await.unwrap();
    assert_eq!(records.len(), 2, "one clean record per move");
}

#[tokio::test]
async fn skipped_sibling_is_not_a_conflict() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let moved = seed(&repo, "Gym", slot(14, 0, 15, 0)).await;
    let skipped = seed(&repo, "Reading", slot(16, 0, 16, 30)).await;
    // Mark the sibling skipped by moving it out of consideration.
    let mut instance = repo.get_instance(skipped).await.unwrap();
    instance.status = InstanceStatus::Skipped;
    repo.commit_move(instance, vec![], vec![], vec![]).await.unwrap();

    let outcome = move_instance(&repo, &cfg, request(moved, slot(16, 0, 17, 0), false), now())
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        MoveOutcome::Applied {
            conflicts_resolved: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn moving_missing_instance_is_not_found() {
    let repo = LocalRepository::new();
    let cfg = SchedulerConfig::default();
    let err = move_instance(
        &repo,
        &cfg,
        request(InstanceId::new(999), slot(10, 0, 11, 0), false),
        now(),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
}
