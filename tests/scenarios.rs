//! Integration tests for the seed scenarios and boundary cases.

use pretty_assertions::assert_eq;
use ramdb::engine::{Engine, ExecOutcome};
use ramdb::error::EngineError;
use ramdb::parser::parse_statement;
use ramdb::types::Literal;

fn run(engine: &mut Engine, sql: &str) -> Result<ExecOutcome, EngineError> {
    engine.execute(parse_statement(sql).unwrap())
}

fn rows(outcome: ExecOutcome) -> Vec<Vec<Literal>> {
    match outcome {
        ExecOutcome::Rows { rows, .. } => rows,
        _ => panic!("expected a row set"),
    }
}

fn str_literal(s: &str, width: usize) -> Literal {
    let mut bytes = s.as_bytes().to_vec();
    bytes.resize(width, 0);
    Literal::Str(bytes)
}

#[test]
fn scenario_1_create_insert_and_scan_is_head_insert_ordered() {
    let mut engine = Engine::new();
    run(&mut engine, "BEGIN").unwrap();
    run(&mut engine, "CREATE TABLE db.t (a INT, b VARCHAR(8))").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (1, 'hi')").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (2, 'yo')").unwrap();

    let result = rows(run(&mut engine, "SELECT * FROM db.t").unwrap());
    assert_eq!(result.len(), 2);
    assert_eq!(result[0], vec![Literal::Int(2), str_literal("yo", 8)]);
    assert_eq!(result[1], vec![Literal::Int(1), str_literal("hi", 8)]);
}

#[test]
fn scenario_2_filter_equality() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT, b VARCHAR(8))").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (1, 'hi')").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (2, 'yo')").unwrap();

    let result = rows(run(&mut engine, "SELECT b FROM db.t WHERE a = 1").unwrap());
    assert_eq!(result, vec![vec![str_literal("hi", 8)]]);
}

#[test]
fn scenario_3_update_with_rollback() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT, b VARCHAR(8))").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (1, 'hi')").unwrap();

    run(&mut engine, "BEGIN").unwrap();
    run(&mut engine, "UPDATE db.t SET b = 'zz' WHERE a = 1").unwrap();
    let after_update = rows(run(&mut engine, "SELECT b FROM db.t WHERE a = 1").unwrap());
    assert_eq!(after_update, vec![vec![str_literal("zz", 8)]]);

    run(&mut engine, "ROLLBACK").unwrap();
    let after_rollback = rows(run(&mut engine, "SELECT b FROM db.t WHERE a = 1").unwrap());
    assert_eq!(after_rollback, vec![vec![str_literal("hi", 8)]]);
}

#[test]
fn scenario_4_delete_with_commit_frees_the_slot_for_reuse() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT, b VARCHAR(8))").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (1, 'hi')").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (2, 'yo')").unwrap();

    run(&mut engine, "BEGIN").unwrap();
    run(&mut engine, "DELETE FROM db.t WHERE a = 2").unwrap();
    run(&mut engine, "COMMIT").unwrap();

    let result = rows(run(&mut engine, "SELECT * FROM db.t").unwrap());
    assert_eq!(result, vec![vec![Literal::Int(1), str_literal("hi", 8)]]);

    let table = engine.catalog().get_table("db", "t").unwrap();
    assert_eq!(table.borrow().store().free_len(), 99);
    assert_eq!(table.borrow().store().data_len(), 1);
}

#[test]
fn scenario_5_drop_schema_with_rollback() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.a (x INT)").unwrap();
    run(&mut engine, "CREATE TABLE db.b (x INT)").unwrap();

    run(&mut engine, "BEGIN").unwrap();
    run(&mut engine, "DROP SCHEMA db").unwrap();
    match run(&mut engine, "SHOW TABLES").unwrap() {
        ExecOutcome::TableNames(names) => assert!(names.is_empty()),
        _ => panic!("expected table names"),
    }

    run(&mut engine, "ROLLBACK").unwrap();
    match run(&mut engine, "SHOW TABLES").unwrap() {
        ExecOutcome::TableNames(mut names) => {
            names.sort();
            assert_eq!(names, vec!["db.a".to_string(), "db.b".to_string()]);
        }
        _ => panic!("expected table names"),
    }
}

#[test]
fn scenario_6_if_not_exists_softens_duplicate_create() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT)").unwrap();

    let softened = run(&mut engine, "CREATE TABLE IF NOT EXISTS db.t (a INT)");
    assert!(matches!(softened, Ok(ExecOutcome::Message(_))));

    let unsoftened = run(&mut engine, "CREATE TABLE db.t (a INT)");
    assert!(matches!(unsoftened, Err(EngineError::TableAlreadyExists(_))));
}

#[test]
fn boundary_empty_table_scan_emits_no_rows() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT)").unwrap();
    let result = rows(run(&mut engine, "SELECT * FROM db.t").unwrap());
    assert!(result.is_empty());
}

#[test]
fn boundary_type_mismatched_where_literal_matches_nothing() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT)").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (1)").unwrap();
    let result = rows(run(&mut engine, "SELECT * FROM db.t WHERE a = 1.0").unwrap());
    assert!(result.is_empty());
}

#[test]
fn boundary_null_insert_sets_bit_and_leaves_payload_untouched() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT)").unwrap();
    run(&mut engine, "INSERT INTO db.t VALUES (NULL)").unwrap();
    let result = rows(run(&mut engine, "SELECT * FROM db.t").unwrap());
    assert_eq!(result, vec![vec![Literal::Null]]);
}

#[test]
fn boundary_101st_insert_triggers_a_second_tuple_group() {
    let mut engine = Engine::new();
    run(&mut engine, "CREATE TABLE db.t (a INT)").unwrap();
    for i in 0..100 {
        run(&mut engine, &format!("INSERT INTO db.t VALUES ({i})")).unwrap();
    }
    let table = engine.catalog().get_table("db", "t").unwrap();
    assert_eq!(table.borrow().store().group_count(), 1);

    run(&mut engine, "INSERT INTO db.t VALUES (100)").unwrap();
    assert_eq!(table.borrow().store().group_count(), 2);
}
