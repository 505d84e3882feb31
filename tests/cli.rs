//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SALES: &str = r#"{"sheet_id": 11, "values": [
    ["Sales journal"],
    ["Date", "Client", "Product", "Type", "Category", "Quantity", "Full price", "Discount",
     "Final price", "Cash", "Transfer", "Terminal", "Debt", "Admin", "Coach", "Comment",
     "Admin bonus", "Coach bonus", "Receipt printed", "Entered in CRM"],
    ["15.01.2025", "Ann", "Gym pass", "Gym", "Pass", 1, 1000, 0, 900, 900, null, null, null,
     "Olga", null, null, null, null, true, true]
]}"#;

const TRAININGS: &str = r#"{"sheet_id": 12, "values": [
    ["Date", "Start", "End", "Employee", "Type", "Substitution", "Client", "Status"],
    ["14.01.2025", "10:00", "11:00", "Ivan", "Pool", "No", "Bob", "Confirmed"]
]}"#;

const LEADS: &str = r#"{"values": [
    ["Leads"],
    ["Lead date", "Request", "Admin (lead)"],
    ["16.01.2025", "", "Pavel"]
]}"#;

/// A scratch workbook under the system temp dir, removed on drop.
struct Workbook {
    root: PathBuf,
}

impl Workbook {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("sheetcheck_cli_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("book")).unwrap();
        let book = Self { root };
        book.write("Sales", SALES);
        book.write("Trainings", TRAININGS);
        book.write("Leads", LEADS);
        book
    }

    fn dir(&self) -> PathBuf {
        self.root.join("book")
    }

    fn write(&self, sheet: &str, contents: &str) {
        fs::write(self.dir().join(format!("{sheet}.json")), contents).unwrap();
    }

    fn read(&self, sheet: &str) -> Option<String> {
        fs::read_to_string(self.dir().join(format!("{sheet}.json"))).ok()
    }

    fn run(&self, args: &[&str]) -> Output {
        let book = self.dir();
        let mut all = vec!["--workbook", book.to_str().unwrap()];
        all.extend_from_slice(args);
        run_in(&self.root, &all)
    }
}

impl Drop for Workbook {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn run_in(cwd: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_sheetcheck");
    let mut cmd = Command::new(bin);
    cmd.args(args).current_dir(cwd);
    for (key, _) in std::env::vars() {
        if key.starts_with("SHEETCHECK_") {
            cmd.env_remove(key);
        }
    }
    cmd.output().expect("failed to run sheetcheck binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn id_prints_stable_identifier() {
    let output = run_in(
        &std::env::temp_dir(),
        &["id", "Sales", "2025-01-15#2", "Final price", "price_math"],
    );
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "415fb50e0a7f99dcfe6bd55b20d2bdf4bbbe0146957fa446cd38419891921f15"
    );
}

#[test]
fn help_lists_subcommands() {
    let output = run_in(&std::env::temp_dir(), &["--help"]);
    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("check"));
    assert!(text.contains("tasks"));
    assert!(text.contains("--workbook"));
}

#[test]
fn version_exits_successfully() {
    let output = run_in(&std::env::temp_dir(), &["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_writes_tasks_and_second_run_changes_nothing() {
    let book = Workbook::new("idempotent");

    let first = book.run(&["check"]);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    let text = stdout(&first);
    assert!(text.contains("CREATE"));
    assert!(text.contains("3 task(s), 0 manual"));

    let stored = book.read("Tasks").unwrap();
    assert!(stored.contains("Price mismatch"));
    assert!(stored.contains("Status 'Confirmed' is not allowed for past dates"));
    assert!(stored.contains("Field 'Request' is required to register a lead"));

    let second = book.run(&["check"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("3 task(s) unchanged"));
    assert_eq!(book.read("Tasks").unwrap(), stored);
}

#[test]
fn fixed_rows_drop_tasks_but_manual_rows_stay() {
    let book = Workbook::new("fixed");
    book.write(
        "Tasks",
        r#"{"values": [
            ["ID", "Manual", "Created", "Sheet", "Field", "Admin", "Description", "Link"],
            ["", true, "", "Leads", "Mobile", "Pavel", "Call the client back", ""]
        ]}"#,
    );
    assert!(book.run(&["check"]).status.success());

    book.write("Leads", r#"{"values": [["Leads"], ["Lead date", "Request", "Admin (lead)"]]}"#);
    let output = book.run(&["check"]);
    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("REMOVE"));
    assert!(text.contains("(manual)"));
    assert!(text.contains("3 task(s), 1 manual"));

    let stored = book.read("Tasks").unwrap();
    assert!(stored.contains("Call the client back"));
    assert!(stored.contains("manual-"));
    assert!(!stored.contains("required to register a lead"));
}

#[test]
fn dry_run_leaves_store_untouched() {
    let book = Workbook::new("dry_run");
    let output = book.run(&["check", "--dry-run"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Dry run"));
    assert!(book.read("Tasks").is_none());
}

#[test]
fn tasks_lists_store_contents() {
    let book = Workbook::new("tasks");
    let empty = book.run(&["tasks"]);
    assert!(empty.status.success());
    assert!(stdout(&empty).contains("No tasks in store."));

    assert!(book.run(&["check"]).status.success());
    let listed = book.run(&["tasks"]);
    let text = stdout(&listed);
    assert!(listed.status.success());
    assert!(text.contains("DESCRIPTION"));
    assert!(text.contains("Olga"));
    assert!(text.contains("3 task(s) total."));
}

#[test]
fn missing_source_sheet_fails_without_writing() {
    let book = Workbook::new("missing");
    fs::remove_file(book.dir().join("Trainings.json")).unwrap();

    let output = book.run(&["check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Trainings"));
    assert!(book.read("Tasks").is_none());
}

#[test]
fn config_file_renames_report_sheet() {
    let book = Workbook::new("config");
    let config = book.root.join("custom.yaml");
    fs::write(&config, "report_sheet: Report\n").unwrap();

    let output = book.run(&["check", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(book.read("Report").is_some());
    assert!(book.read("Tasks").is_none());
}

#[test]
fn invalid_config_is_reported() {
    let book = Workbook::new("bad_config");
    fs::write(book.root.join("sheetcheck.yaml"), "report_sheet: Sales\n").unwrap();

    let output = book.run(&["check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}
