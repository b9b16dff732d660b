//! Integration tests for the ddlgen CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DEPT: &str = "CREATE TABLE `tb_dept` (
  `id` INT NOT NULL AUTO_INCREMENT COMMENT 'dept id',
  `dept_name` VARCHAR(18) NOT NULL COMMENT 'dept name',
  `create_time` DATETIME DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_name` (`dept_name`)
) ENGINE=InnoDB COMMENT='departments';
";

const USER: &str = "CREATE TABLE tb_user (
  id BIGINT PRIMARY KEY,
  user_name VARCHAR(32)
);
";

/// Get the ddlgen binary
#[allow(deprecated)]
fn ddlgen_cmd() -> Command {
    Command::cargo_bin("ddlgen").unwrap()
}

/// A temp dir holding `schema.sql`.
fn setup_schema(ddl: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("schema.sql"), ddl).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    ddlgen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: ddlgen"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("line"));
}

#[test]
fn test_version_command() {
    ddlgen_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_help() {
    ddlgen_cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--lines"))
        .stdout(predicate::str::contains("--logic"))
        .stdout(predicate::str::contains("--round"));
}

#[test]
fn test_unknown_command() {
    ddlgen_cmd()
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// =============================================================================
// Generate
// =============================================================================

#[test]
fn test_generate_to_stdout() {
    let temp_dir = setup_schema(DEPT);

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql", "--no-banner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> model/model.go <=="))
        .stdout(predicate::str::contains("==> model/model_crud.go <=="))
        .stdout(predicate::str::contains("// TbDept departments\ntype TbDept struct {"))
        .stdout(predicate::str::contains("func CreateTbDept(db DataSource, s *TbDept) (int64, error) {"))
        .stdout(predicate::str::contains("func QueryTbDeptByDeptName("))
        .stdout(predicate::str::contains("Auto Generate").not());
}

#[test]
fn test_generate_single_target_has_no_heading() {
    let temp_dir = setup_schema(DEPT);

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql", "--no-banner", "--no-crud"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("package model\n"))
        .stdout(predicate::str::contains("==>").not());
}

#[test]
fn test_generate_from_stdin_stops_at_eof_line() {
    let input = format!("{DEPT}EOF\n{USER}");

    ddlgen_cmd()
        .args(["generate", "--no-banner", "--no-crud"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("type TbDept struct"))
        .stdout(predicate::str::contains("TbUser").not());
}

#[test]
fn test_generate_line_range() {
    let temp_dir = setup_schema(&format!("{DEPT}{USER}"));
    let first = DEPT.lines().count() + 1;
    let last = first + USER.lines().count() - 1;

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql", "--no-banner", "--no-crud"])
        .args(["--lines", &format!("{first}:{last}")])
        .assert()
        .success()
        .stdout(predicate::str::contains("type TbUser struct"))
        .stdout(predicate::str::contains("TbDept").not());
}

#[test]
fn test_generate_without_tables_fails() {
    ddlgen_cmd()
        .args(["generate"])
        .write_stdin("DROP TABLE tb_dept;\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No table declarations found"));
}

#[test]
fn test_generate_missing_input() {
    ddlgen_cmd()
        .args(["generate", "-i", "does-not-exist.sql"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_generate_invalid_logic_flag() {
    ddlgen_cmd()
        .args(["generate", "--logic", "deleted"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--logic"));
}

#[test]
fn test_generate_writes_all_targets() {
    let temp_dir = setup_schema(DEPT);

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql", "-o", "out", "--no-fmt"])
        .args(["--router", "--service", "--doc", "-m", "github.com/acme/shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 5 files"));

    let out = temp_dir.path().join("out");
    for file in [
        "model/model.go",
        "model/model_crud.go",
        "router/router.go",
        "service/service.go",
        "document.md",
    ] {
        assert!(out.join(file).is_file(), "missing {file}");
    }

    let router = fs::read_to_string(out.join("router/router.go")).unwrap();
    assert!(router.contains("\"github.com/acme/shop/model\""));
    assert!(router.contains("\"POST /api/tb-dept\": r.CreateTbDept,"));

    let model = fs::read_to_string(out.join("model/model.go")).unwrap();
    assert!(model.starts_with("/**\n * Auto Generate by ddlgen "));
}

#[test]
fn test_generate_reads_config_file() {
    let temp_dir = setup_schema(DEPT);
    fs::write(
        temp_dir.path().join("ddlgen.toml"),
        r#"
[generator]
package = "dao"
output = "gen"
banner = false
format = false
style = "orm"
logical_delete = "dept_name=gone"
"#,
    )
    .unwrap();

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql"])
        .assert()
        .success();

    let model = fs::read_to_string(temp_dir.path().join("gen/dao/dao.go")).unwrap();
    assert!(model.starts_with("package dao\n"));
    assert!(model.contains("func (*TbDept) TableName() string {"));
    assert!(temp_dir.path().join("gen/dao/dao_crud.go").is_file());
}

#[test]
fn test_generate_flags_override_config() {
    let temp_dir = setup_schema(DEPT);
    fs::write(
        temp_dir.path().join("custom.toml"),
        "[generator]\npackage = \"dao\"\noutput = \"gen\"\n",
    )
    .unwrap();

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql", "-c", "custom.toml", "-p", "entity", "--no-fmt"])
        .assert()
        .success();

    assert!(temp_dir.path().join("gen/entity/entity.go").is_file());
    assert!(!temp_dir.path().join("gen/dao").exists());
}

#[test]
fn test_generate_bad_config() {
    let temp_dir = setup_schema(DEPT);
    fs::write(temp_dir.path().join("ddlgen.toml"), "[generator]\nround = \"weeks\"\n").unwrap();

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["generate", "-i", "schema.sql"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

// =============================================================================
// Validate
// =============================================================================

#[test]
fn test_validate_valid_ddl() {
    let temp_dir = setup_schema(&format!("{DEPT}{USER}"));

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["validate", "-i", "schema.sql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tb_dept (TbDept)"))
        .stdout(predicate::str::contains("unique: DeptName"))
        .stdout(predicate::str::contains("DDL is valid"));
}

#[test]
fn test_validate_reports_failed_statements() {
    let temp_dir = setup_schema("CREATE TABLE a (id INT);\nCREATE TABLE broken (;\n");

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .args(["validate", "-i", "schema.sql"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("a (A)"))
        .stderr(predicate::str::contains("skipped"))
        .stderr(predicate::str::contains("1 statement(s) failed to parse"));
}

#[test]
fn test_validate_warns_about_unknown_key_columns() {
    ddlgen_cmd()
        .args(["validate"])
        .write_stdin("CREATE TABLE t (id INT, KEY idx_x (missing));\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("DDL is valid with warnings"));
}

// =============================================================================
// Line
// =============================================================================

#[test]
fn test_line_stamps_go_files() {
    let temp_dir = TempDir::new().unwrap();
    let router_dir = temp_dir.path().join("router");
    fs::create_dir_all(&router_dir).unwrap();
    fs::write(
        router_dir.join("router.go"),
        "package router\n\nfunc f() {\n\tlog.Printf(\"__LINE__ oops\")\n}\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "__LINE__\n").unwrap();

    ddlgen_cmd()
        .current_dir(temp_dir.path())
        .arg("line")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stamped 1 of 1 Go files"));

    let router = fs::read_to_string(router_dir.join("router.go")).unwrap();
    assert!(router.contains("log.Printf(\"__LINE:router/router.go:4__ oops\")"));
    assert_eq!(fs::read_to_string(temp_dir.path().join("notes.txt")).unwrap(), "__LINE__\n");
}

#[test]
fn test_line_is_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("main.go"), "\n__LINE__\n").unwrap();

    for _ in 0..2 {
        ddlgen_cmd()
            .current_dir(temp_dir.path())
            .args(["line", "main.go"])
            .assert()
            .success();
    }

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("main.go")).unwrap(),
        "\n__LINE:main.go:2__\n"
    );
}
