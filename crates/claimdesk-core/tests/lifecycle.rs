//! End-to-end lifecycle tests for claimdesk-core: a full claim from intake
//! to rating, exercised against an on-disk store, plus persistence across
//! reopen and the administrative timestamp backfill path.

use claimdesk_core::engine::{self, ChangeSet, ClaimDraft};
use claimdesk_core::event::details::EventDetails;
use claimdesk_core::feedback;
use claimdesk_core::store::entities::NewUser;
use claimdesk_core::timeline;
use claimdesk_core::{Action, Error, Priority, Role, Severity, Status, Store, User, Visibility};
use std::path::Path;

fn open_store(dir: &Path) -> Store {
    Store::open(&dir.join("claimdesk.sqlite3")).expect("open store")
}

fn register(store: &Store, email: &str, full_name: &str, role: Role) -> User {
    store
        .create_user(&NewUser {
            email: email.into(),
            full_name: full_name.into(),
            role,
            area_id: None,
            company_name: None,
        })
        .expect("create user")
}

#[test]
fn full_claim_lifecycle_from_intake_to_rating() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open_store(dir.path());

    let client = register(&store, "cora@client.example", "Cora Client", Role::Client);
    let employee = register(&store, "eli@support.example", "Eli Ops", Role::Employee);
    let networks = store
        .create_area("Networks", "Connectivity and routing")
        .expect("create area");
    store
        .insert_sub_area(networks.id, "VPN")
        .expect("add sub-area");
    let project = store
        .create_project("Branch office rollout", "infrastructure", client.id)
        .expect("create project");

    // Intake.
    let claim = engine::create_claim(
        &store,
        &client,
        ClaimDraft {
            project_id: project.id,
            claim_type: "connectivity".into(),
            severity: Some(Severity::S2High),
            description: "VPN drops every few minutes".into(),
            sub_area: None,
            attachment: None,
        },
    )
    .expect("create claim");
    assert_eq!(claim.status, Status::Intake);
    assert_eq!(claim.created_by, client.id);

    // Feedback gate: nothing during intake.
    let err = feedback::submit_feedback(&store, claim.id, client.id, None, Some("any update?"))
        .unwrap_err();
    assert!(matches!(err, Error::FeedbackNotAllowed));

    // Triage: start work, raise priority, route to the area.
    let claim = engine::apply_transition(
        &store,
        &employee,
        claim.id,
        &ChangeSet {
            status: Some(Status::InProgress),
            priority: Some(Priority::High),
            area_id: Some(Some(networks.id)),
            sub_area: Some(Some("VPN".into())),
            ..ChangeSet::default()
        },
    )
    .expect("triage");
    assert_eq!(claim.status, Status::InProgress);
    assert_eq!(claim.area_id, Some(networks.id));
    assert_eq!(claim.sub_area.as_deref(), Some("VPN"));

    // Client follows along while work happens.
    feedback::submit_feedback(&store, claim.id, client.id, None, Some("still dropping"))
        .expect("progress comment");
    engine::add_claim_action(&store, &employee, claim.id, "Replaced the edge router")
        .expect("log action");

    // Resolution.
    let claim = engine::apply_transition(
        &store,
        &employee,
        claim.id,
        &ChangeSet {
            status: Some(Status::Resolved),
            resolution_description: Some("Firmware bug in the edge router; upgraded.".into()),
            ..ChangeSet::default()
        },
    )
    .expect("resolve");
    assert_eq!(claim.status, Status::Resolved);
    assert!(claim.resolved_at_us.is_some());

    // Resolved claims are closed to further lifecycle changes.
    let err = engine::apply_transition(
        &store,
        &employee,
        claim.id,
        &ChangeSet {
            priority: Some(Priority::Low),
            ..ChangeSet::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::ClaimClosed));

    // Final rating, exactly once, copied onto the snapshot.
    let (claim, message) =
        feedback::submit_feedback(&store, claim.id, client.id, Some(5), Some("Fast fix, thanks"))
            .expect("final rating");
    assert_eq!(claim.client_rating, Some(5));
    assert_eq!(message.rating, Some(5));
    let err =
        feedback::submit_feedback(&store, claim.id, client.id, Some(4), None).unwrap_err();
    assert!(matches!(err, Error::AlreadyRated));

    // The internal timeline shows everything, enriched and in order.
    let full = timeline::list_events(&store, claim.id, false).expect("full timeline");
    let actions: Vec<Action> = full.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::Created,
            Action::StatusChanged,
            Action::PriorityChanged,
            Action::AreaChanged,
            Action::SubAreaChanged,
            Action::ActionLogged,
            Action::StatusChanged,
        ]
    );
    assert_eq!(full[0].actor_name.as_deref(), Some("Cora Client"));
    assert_eq!(full[1].actor_name.as_deref(), Some("Eli Ops"));
    let EventDetails::AreaChanged(details) = &full[3].details else {
        panic!("expected area_changed details");
    };
    assert_eq!(details.to_area_name.as_deref(), Some("Networks"));
    assert_eq!(details.employee_name.as_deref(), Some("Eli Ops"));

    // The client-facing timeline is the public action subset only.
    let public = timeline::list_events(&store, claim.id, true).expect("public timeline");
    let actions: Vec<Action> = public.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::Created,
            Action::StatusChanged,
            Action::AreaChanged,
            Action::StatusChanged,
        ]
    );
    assert!(public.iter().all(|e| e.visibility == Visibility::Public));
}

#[test]
fn state_survives_reopening_the_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let claim_id;
    {
        let store = open_store(dir.path());
        let client = register(&store, "c@example.com", "", Role::Client);
        let employee = register(&store, "e@example.com", "", Role::Employee);
        let project = store
            .create_project("Portal", "web", client.id)
            .expect("create project");
        let claim = engine::create_claim(
            &store,
            &client,
            ClaimDraft {
                project_id: project.id,
                claim_type: "bug".into(),
                severity: None,
                description: "Broken".into(),
                sub_area: None,
                attachment: None,
            },
        )
        .expect("create claim");
        claim_id = claim.id;
        engine::apply_transition(
            &store,
            &employee,
            claim_id,
            &ChangeSet {
                status: Some(Status::InProgress),
                ..ChangeSet::default()
            },
        )
        .expect("start work");
    }

    let store = open_store(dir.path());
    let claim = store
        .get_claim(claim_id)
        .expect("get claim")
        .expect("claim exists");
    assert_eq!(claim.status, Status::InProgress);
    let events = store.query_events(claim_id, false).expect("query events");
    assert_eq!(events.len(), 2);
}

#[test]
fn backfill_reorders_imported_history() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open_store(dir.path());
    let client = register(&store, "c@example.com", "", Role::Client);
    let employee = register(&store, "e@example.com", "", Role::Employee);
    let project = store
        .create_project("Portal", "web", client.id)
        .expect("create project");
    let claim = engine::create_claim(
        &store,
        &client,
        ClaimDraft {
            project_id: project.id,
            claim_type: "bug".into(),
            severity: None,
            description: "Broken".into(),
            sub_area: None,
            attachment: None,
        },
    )
    .expect("create claim");
    let comment_id =
        engine::add_claim_comment(&store, &employee, claim.id, "migrated note").expect("comment");

    // Push the comment before the created event, as an import fixup would.
    let created_at = store.query_events(claim.id, false).expect("query")[0].created_at_us;
    store
        .backfill_event_timestamp(comment_id, created_at - 1_000_000)
        .expect("backfill");

    let events = store.query_events(claim.id, false).expect("query");
    assert_eq!(events[0].action, Action::Comment);
    assert_eq!(events[1].action, Action::Created);
}
