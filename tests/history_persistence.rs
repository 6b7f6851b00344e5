use std::{fs, path::Path, sync::Arc};

use rusqlite::Connection;
use tempfile::TempDir;

use calclog::{
    core::{Calculation, Evaluation, History},
    operations::{
        Operation, OperationRegistry,
        builtin::{Addition, Division, Modulus, Power},
    },
    persist::{Destination, PersistError},
};

fn history() -> History {
    History::new(OperationRegistry::load().lookup())
}

fn sample_history() -> History {
    let rows: [(Arc<dyn Operation>, f64, f64); 5] = [
        (Arc::new(Addition), 3.0, 5.0),
        (Arc::new(Division), 5.0, 2.0),
        (Arc::new(Power), 10.0, 400.0),
        (Arc::new(Power), -8.0, 0.5),
        (Arc::new(Modulus), -7.0, 3.0),
    ];
    let mut h = history();
    for (op, a, b) in rows {
        let mut calc = Calculation::from_numbers(op, a, b);
        calc.execute().unwrap();
        h.add(calc);
    }
    h.add(Calculation::new(Arc::new(Addition), 1, 2).unwrap());
    h
}

fn rendered(h: &History) -> Vec<String> {
    h.iter().map(ToString::to_string).collect()
}

#[test]
fn json_round_trip_preserves_order_and_values() {
    let tmp = TempDir::new().expect("tmp");
    let dest = Destination::json(tmp.path().join("history.json"));

    let original = sample_history();
    assert_eq!(original.save(&dest).expect("save"), 6);

    let mut restored = history();
    assert_eq!(restored.load(&dest).expect("load"), 6);
    assert_eq!(restored.get_history(), original.get_history());
    assert_eq!(rendered(&restored), rendered(&original));
    assert_eq!(restored.get_history()[5].evaluation(), Evaluation::Unevaluated);
    assert_eq!(restored.get_history()[2].result(), Some(f64::INFINITY));
}

#[test]
fn sqlite_round_trip_preserves_order_and_values() {
    let tmp = TempDir::new().expect("tmp");
    let dest = Destination::sqlite(tmp.path().join("history.db"));

    let original = sample_history();
    original.save(&dest).expect("save");

    let mut restored = history();
    restored.load(&dest).expect("load");
    assert_eq!(restored.get_history(), original.get_history());
    assert!(restored.get_history()[3].result().is_some_and(f64::is_nan));
}

#[test]
fn save_overwrites_destination_wholesale() {
    let tmp = TempDir::new().expect("tmp");
    for dest in [
        Destination::json(tmp.path().join("h.json")),
        Destination::sqlite(tmp.path().join("h.db")),
    ] {
        sample_history().save(&dest).expect("first save");

        let mut short = history();
        let mut calc = Calculation::new(Arc::new(Addition), 1, 1).unwrap();
        calc.execute().unwrap();
        short.add(calc);
        short.save(&dest).expect("second save");

        let mut restored = history();
        assert_eq!(restored.load(&dest).expect("load"), 1);
        assert_eq!(rendered(&restored), ["1 addition 1 = 2"]);
    }
}

#[test]
fn load_replaces_prior_entries() {
    let tmp = TempDir::new().expect("tmp");
    let dest = Destination::json(tmp.path().join("h.json"));
    history().save(&dest).expect("save empty");

    let mut h = sample_history();
    assert_eq!(h.load(&dest).expect("load"), 0);
    assert!(h.is_empty());
}

#[test]
fn missing_file_is_not_found_and_leaves_ledger_untouched() {
    let tmp = TempDir::new().expect("tmp");
    for dest in [
        Destination::json(tmp.path().join("missing.json")),
        Destination::sqlite(tmp.path().join("missing.db")),
    ] {
        let mut h = history();
        let err = h.load(&dest).unwrap_err();
        assert!(matches!(err, PersistError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
        assert_eq!(h.len(), 0);
        assert!(!dest.path.exists());
    }
}

#[test]
fn empty_or_garbage_files_are_corrupt() {
    let tmp = TempDir::new().expect("tmp");
    let cases = [
        ("empty.json", String::new()),
        ("blank.json", "  \n".to_string()),
        ("invalid.json", "{invalid json}".to_string()),
        ("object.json", "{\"operand1\": 1}".to_string()),
        ("empty.db", String::new()),
        ("text.db", "not a database ".repeat(100)),
    ];
    for (name, contents) in cases {
        let path = tmp.path().join(name);
        fs::write(&path, contents).unwrap();

        let mut h = sample_history();
        let err = h.load(&Destination::infer(&path)).unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { .. }), "{name}: {err}");
        assert!(err.to_string().starts_with("Failed to decode history data"));
        assert_eq!(h.len(), 6, "{name}");
    }
}

#[test]
fn unknown_operation_fails_whole_load_without_partial_state() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("h.json");
    fs::write(
        &path,
        r#"[
            {"operand1": 1, "operation": "addition", "operand2": 2, "result": 3},
            {"operand1": 4, "operation": "sqrt", "operand2": 0, "result": 2}
        ]"#,
    )
    .unwrap();

    let mut h = history();
    let err = h.load(&Destination::json(&path)).unwrap_err();
    match err {
        PersistError::UnknownOperation { index, ref name, .. } => {
            assert_eq!(index, 1);
            assert_eq!(name, "sqrt");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(h.is_empty());
}

#[test]
fn non_numeric_field_is_invalid_data() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("h.json");
    fs::write(
        &path,
        r#"[{"operand1": "five", "operation": "Addition", "operand2": 3, "result": 8}]"#,
    )
    .unwrap();

    let err = history().load(&Destination::json(&path)).unwrap_err();
    assert!(
        matches!(err, PersistError::InvalidData { index: 0, field: "operand1", .. }),
        "{err}"
    );
}

#[test]
fn rows_without_result_load_unevaluated() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("h.json");
    fs::write(&path, r#"[{"operand1": 5, "operand2": 3, "operation": "Addition"}]"#).unwrap();

    let mut h = history();
    h.load(&Destination::json(&path)).expect("load");
    assert_eq!(h.get_history()[0].operand1(), 5.0);
    assert_eq!(h.get_history()[0].to_string(), "5 addition 3 = Not calculated");
}

#[test]
fn loaded_results_are_not_recomputed() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("h.json");
    fs::write(
        &path,
        r#"[{"operand1": 2, "operation": "multiply", "operand2": 2, "result": 5}]"#,
    )
    .unwrap();

    let mut h = history();
    h.load(&Destination::json(&path)).expect("load");
    assert_eq!(h.get_history()[0].to_string(), "2 multiplication 2 = 5");
}

fn write_sqlite_rows(path: &Path, rows: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE history (position INTEGER PRIMARY KEY, operand1, operation TEXT NOT NULL, operand2, result);
         INSERT INTO history(position, operand1, operation, operand2, result) VALUES {rows};"
    ))
    .unwrap();
}

#[test]
fn sqlite_non_numeric_operand_is_invalid_data() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("h.db");
    write_sqlite_rows(&path, "(0, 1.0, 'addition', 2.0, 3.0), (1, 'abc', 'addition', 2.0, NULL)");

    let mut h = sample_history();
    let err = h.load(&Destination::sqlite(&path)).unwrap_err();
    assert!(
        matches!(err, PersistError::InvalidData { index: 1, field: "operand1", .. }),
        "{err}"
    );
    assert_eq!(h.len(), 6);
}

#[test]
fn sqlite_unknown_operation_fails_whole_load() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("h.db");
    write_sqlite_rows(&path, "(0, 1.0, 'addition', 2.0, 3.0), (1, 4.0, 'sqrt', 0.0, 2.0)");

    let mut h = history();
    let err = h.load(&Destination::sqlite(&path)).unwrap_err();
    match err {
        PersistError::UnknownOperation { index, ref name, .. } => {
            assert_eq!(index, 1);
            assert_eq!(name, "sqrt");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(h.is_empty());
}
