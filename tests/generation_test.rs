use std::fs;
use std::path::Path;

use dalgen::prelude::*;
use pretty_assertions::assert_eq;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Read and write directives interleaved across files.
fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "users/create.sql",
        "-- !insert CreateUser\n-- !$1: name string\nINSERT INTO users (name) VALUES ($1) RETURNING id\n",
    );
    write(
        dir.path(),
        "users/get.sql",
        "-- !selectOne GetUser\n-- !$1: id int64\nSELECT * FROM users WHERE id = $1\n",
    );
    write(
        dir.path(),
        "users/remove.sql",
        "-- !deleteOne RemoveUser\n-- !$1: id int64\nDELETE FROM users WHERE id = $1\n",
    );
    write(
        dir.path(),
        "accounts/exists.sql",
        "-- !exists AccountExists\n-- !$1: email string\nSELECT COUNT(*) FROM accounts WHERE email = $1\n",
    );
    write(dir.path(), "README.md", "-- !frobnicate Ignored\n");
    dir
}

fn invocations(root: &Path, registry: &Registry) -> Vec<Invocation> {
    collect_invocations(registry, root, &ScanOptions::default()).unwrap()
}

#[test]
fn test_discovery_order_and_keys() {
    let dir = fixture();
    let found = invocations(dir.path(), &Registry::default());
    let summary: Vec<(&str, &str)> = found
        .iter()
        .map(|i| (i.key.as_str(), i.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("accounts/exists.sql", "AccountExists"),
            ("users/create.sql", "CreateUser"),
            ("users/get.sql", "GetUser"),
            ("users/remove.sql", "RemoveUser"),
        ]
    );
}

#[test]
fn test_interface_follows_encounter_order() {
    let dir = fixture();
    let found = invocations(dir.path(), &Registry::default());
    let out = render(
        Mode::Interface,
        "store",
        &RoleTypes::new("Reader", "Writer"),
        &found,
    );
    assert_eq!(
        out,
        "package store\n\n\
         type Reader interface {\n\
         \tAccountExists(email string) (bool, error)\n\
         \tGetUser(instance interface{}, id int64) error\n\
         }\n\n\
         type Writer interface {\n\
         \tCreateUser(name string) (int64, error)\n\
         \tRemoveUser(id int64) error\n\
         }\n\n"
    );
}

#[test]
fn test_code_mode_unit() {
    let dir = fixture();
    let found = invocations(dir.path(), &Registry::default());
    let out = render(
        Mode::Code,
        "store",
        &RoleTypes::new("(r *Reader)", "(w *Writer)"),
        &found,
    );

    assert!(out.starts_with("package store\n\n"));
    assert!(out.contains(
        "func (r *Reader) GetUser(instance interface{}, id int64) error {\n\
         \treturn dal.SelectOne(r, \"users/get.sql\", instance, id)\n}"
    ));
    assert!(out.contains(
        "func (w *Writer) CreateUser(name string) (int64, error) {\n\
         \treturn dal.InsertReturning(w, \"users/create.sql\", name)\n}"
    ));
    // Write-only commands never get a read-role method.
    assert!(!out.contains("func (r *Reader) CreateUser"));
    assert!(!out.contains("func (r *Reader) RemoveUser"));
    assert_eq!(out.matches("func ").count(), 6);
}

#[test]
fn test_mock_mode_mirrors_code_signatures() {
    let dir = fixture();
    let found = invocations(dir.path(), &Registry::default());
    let roles = RoleTypes::new("(r *Reader)", "(w *Writer)");

    let headers = |text: &str| -> Vec<String> {
        text.lines()
            .filter(|l| l.starts_with("func "))
            .map(str::to_string)
            .collect()
    };
    let code = render(Mode::Code, "store", &roles, &found);
    let mock = render(Mode::Mock, "store", &roles, &found);

    assert_eq!(headers(&code), headers(&mock));
    assert!(mock.contains("\treturn w.Int64, w.Error\n"));
}

#[test]
fn test_insert_alteration_only_touches_insert() {
    let dir = fixture();
    let roles = RoleTypes::new("(r *Reader)", "(w *Writer)");

    let returning = Registry::initialize(&RegistryConfig::default()).unwrap();
    let last_id = Registry::initialize(&RegistryConfig {
        returning_insert: false,
        ..Default::default()
    })
    .unwrap();

    let a = render(Mode::Code, "store", &roles, &invocations(dir.path(), &returning));
    let b = render(Mode::Code, "store", &roles, &invocations(dir.path(), &last_id));

    let differing: Vec<(&str, &str)> = a
        .lines()
        .zip(b.lines())
        .filter(|(x, y)| x != y)
        .collect();
    assert_eq!(
        differing,
        vec![(
            "\treturn dal.InsertReturning(w, \"users/create.sql\", name)",
            "\treturn dal.Insert(w, \"users/create.sql\", name)",
        )]
    );
    assert_eq!(a.lines().count(), b.lines().count());
}

#[test]
fn test_structural_error_aborts_with_location() {
    let dir = fixture();
    write(
        dir.path(),
        "users/rename.sql",
        "UPDATE users SET name = $2 WHERE id = $1\n-- !updateOne Rename\n-- !$1: id int64\n-- !$3: name string\n",
    );
    let err = collect_invocations(&Registry::default(), dir.path(), &ScanOptions::default())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("rename.sql:4:"), "{message}");
    assert!(message.contains("'$2:'"), "{message}");
}

#[test]
fn test_unregistered_command_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "x.sql", "-- !frobnicate GetX\nSELECT 1\n");
    let err = collect_invocations(&Registry::default(), dir.path(), &ScanOptions::default())
        .unwrap_err();
    assert!(err.to_string().ends_with("x.sql:1: Command frobnicate is not defined"));
}

#[test]
fn test_run_writes_output_file() {
    let dir = fixture();
    let out_path = dir.path().join("gen").join("queries.go");

    let settings = Settings::resolve(
        FileConfig::default(),
        Overrides {
            package: Some("store".to_string()),
            dir: Some(dir.path().to_path_buf()),
            output: Some(out_path.clone()),
            mode: Some(Mode::Interface),
            read_type: Some("Reader".to_string()),
            write_type: Some("Writer".to_string()),
            formatter: Some(String::new()),
            ..Default::default()
        },
    );
    let report = run(&settings).unwrap();

    assert_eq!(report.invocations, 4);
    assert_eq!(report.output.as_deref(), Some(out_path.as_path()));
    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("package store\n\ntype Reader interface {\n"));
}

#[test]
fn test_run_rejects_incomplete_settings() {
    let settings = Settings::resolve(FileConfig::default(), Overrides::default());
    let err = run(&settings).unwrap_err();
    assert!(matches!(err, GenError::Config(_)));
}
