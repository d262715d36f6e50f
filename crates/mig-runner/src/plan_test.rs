use super::*;
use mig_core::ScriptMarkers;

fn migration(version: i64, apply: &str) -> Migration {
    Migration::new(version, apply, format!("DROP TABLE t{version};"))
        .derive(&ScriptMarkers::default())
}

fn set(migrations: Vec<Migration>) -> MigrationSet {
    MigrationSet::new(migrations).unwrap()
}

fn applied(migrations: &[Migration]) -> Vec<LedgerRecord> {
    migrations.iter().map(LedgerRecord::from).collect()
}

fn v1() -> Migration {
    migration(1, "CREATE TABLE t1 (id INT);")
}

fn v2() -> Migration {
    migration(2, "CREATE TABLE t2 (id INT);")
}

fn v3() -> Migration {
    migration(3, "CREATE TABLE t3 (id INT);")
}

fn versions_of_records(records: &[LedgerRecord]) -> Vec<i64> {
    records.iter().map(|r| r.version).collect()
}

fn versions_of_migrations(migrations: &[Migration]) -> Vec<i64> {
    migrations.iter().map(|m| m.version).collect()
}

#[test]
fn test_fresh_ledger_applies_everything() {
    let desired = set(vec![v1(), v2()]);
    let plan = compute_plan(&[], &desired).unwrap();

    assert_eq!(plan.boundary, None);
    assert!(plan.rollback.is_empty());
    assert_eq!(versions_of_migrations(&plan.apply), vec![1, 2]);
    assert_eq!(plan.unchanged, 0);
}

#[test]
fn test_fresh_ledger_starts_at_lowest_desired_version() {
    let desired = set(vec![migration(5, "a"), migration(9, "b")]);
    let plan = compute_plan(&[], &desired).unwrap();
    assert_eq!(versions_of_migrations(&plan.apply), vec![5, 9]);
}

#[test]
fn test_matching_ledger_is_noop() {
    let desired = set(vec![v1(), v2()]);
    let plan = compute_plan(&applied(&[v1(), v2()]), &desired).unwrap();

    assert!(plan.is_empty());
    assert_eq!(plan.boundary, None);
    assert_eq!(plan.unchanged, 2);
}

#[test]
fn test_append_applies_only_new_version() {
    let desired = set(vec![v1(), v2(), v3()]);
    let plan = compute_plan(&applied(&[v1(), v2()]), &desired).unwrap();

    assert!(plan.rollback.is_empty());
    assert_eq!(versions_of_migrations(&plan.apply), vec![3]);
}

#[test]
fn test_truncate_rolls_back_removed_tail() {
    let desired = set(vec![v1(), v2()]);
    let plan = compute_plan(&applied(&[v1(), v2(), v3()]), &desired).unwrap();

    assert_eq!(
        plan.boundary,
        Some(RollbackBoundary {
            version: 3,
            reason: BoundaryReason::Removed,
        })
    );
    assert_eq!(versions_of_records(&plan.rollback), vec![3]);
    assert!(plan.apply.is_empty());
    assert_eq!(plan.unchanged, 2);
}

#[test]
fn test_edit_rolls_back_to_changed_version_then_reapplies() {
    let edited = migration(2, "CREATE TABLE t2 (id BIGINT);");
    let desired = set(vec![v1(), edited, v3()]);
    let plan = compute_plan(&applied(&[v1(), v2(), v3()]), &desired).unwrap();

    assert_eq!(
        plan.boundary,
        Some(RollbackBoundary {
            version: 2,
            reason: BoundaryReason::ContentChanged,
        })
    );
    assert_eq!(versions_of_records(&plan.rollback), vec![3, 2]);
    assert_eq!(versions_of_migrations(&plan.apply), vec![2, 3]);
    assert_eq!(plan.apply[0].apply, "CREATE TABLE t2 (id BIGINT);");
    assert_eq!(plan.unchanged, 1);
}

#[test]
fn test_edit_of_first_version_rolls_back_everything() {
    let desired = set(vec![migration(1, "CREATE TABLE t1 (x INT);"), v2()]);
    let plan = compute_plan(&applied(&[v1(), v2()]), &desired).unwrap();

    assert_eq!(versions_of_records(&plan.rollback), vec![2, 1]);
    assert_eq!(versions_of_migrations(&plan.apply), vec![1, 2]);
    assert_eq!(plan.unchanged, 0);
}

#[test]
fn test_edit_and_truncate_together() {
    let desired = set(vec![v1(), migration(2, "CREATE TABLE t2 (x INT);")]);
    let plan = compute_plan(&applied(&[v1(), v2(), v3()]), &desired).unwrap();

    assert_eq!(plan.boundary.map(|b| b.version), Some(2));
    assert_eq!(versions_of_records(&plan.rollback), vec![3, 2]);
    assert_eq!(versions_of_migrations(&plan.apply), vec![2]);
}

#[test]
fn test_unsorted_ledger_is_sorted_before_comparison() {
    let desired = set(vec![v1(), v2(), v3()]);
    let plan = compute_plan(&applied(&[v3(), v1(), v2()]), &desired).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_structural_mismatch_is_an_error() {
    // Ledger has 1 and 3; a new version 2 was inserted in between.
    let desired = set(vec![v1(), v2(), v3()]);
    let err = compute_plan(&applied(&[v1(), v3()]), &desired).unwrap_err();

    match err {
        MigrateError::StructuralMismatch {
            position,
            ledger_version,
            desired_version,
        } => {
            assert_eq!(position, 1);
            assert_eq!(ledger_version, 3);
            assert_eq!(desired_version, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rollback_targets_stop_below_boundary() {
    let ledger = applied(&[v1(), v2(), v3()]);
    let targets: Vec<i64> = rollback_targets(&ledger, 2)
        .into_iter()
        .map(|r| r.version)
        .collect();
    assert_eq!(targets, vec![3, 2]);
    assert!(rollback_targets(&ledger, 4).is_empty());
}

#[test]
fn test_forward_start() {
    let desired = set(vec![v1(), v2(), v3()]);
    assert_eq!(forward_start(&[], &desired), Some(1));
    assert_eq!(forward_start(&applied(&[v1()]), &desired), Some(2));
    assert_eq!(forward_start(&applied(&[v1(), v2(), v3()]), &desired), Some(4));
}

#[test]
fn test_forward_start_at_max_version() {
    let last = migration(i64::MAX, "CREATE TABLE t_last (id INT);");
    let desired = set(vec![v1(), last.clone()]);
    let ledger = applied(&[v1(), last]);

    assert_eq!(forward_start(&ledger, &desired), None);
    let plan = compute_plan(&ledger, &desired).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.unchanged, 2);
}

#[test]
fn test_forward_targets() {
    let desired = set(vec![v1(), v2(), v3()]);
    let targets: Vec<i64> = forward_targets(&desired, 2)
        .into_iter()
        .map(|m| m.version)
        .collect();
    assert_eq!(targets, vec![2, 3]);
}
