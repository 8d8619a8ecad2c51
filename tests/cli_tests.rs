use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
mod test_env;

fn setup_test_env() -> (TempDir, std::sync::MutexGuard<'static, ()>) {
    test_env::scratch_home()
}

fn get_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stacklist").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json_list(temp_dir: &TempDir, args: &[&str]) -> Vec<serde_json::Value> {
    let output = get_cmd(temp_dir).arg("list").args(args).arg("--json").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    serde_json::from_str::<Vec<serde_json::Value>>(&stdout).unwrap()
}

fn item_names(items: &[serde_json::Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item["kind"].as_str().unwrap() {
            "stack" => item["name"].as_str().unwrap().to_string(),
            _ => item["version"]["name"].as_str().unwrap().to_string(),
        })
        .collect()
}

#[test]
fn test_init_is_idempotent() {
    let (temp_dir, _guard) = setup_test_env();

    get_cmd(&temp_dir).arg("init").assert().success()
        .stdout(predicate::str::contains("Initialized stacks root"));
    get_cmd(&temp_dir).arg("init").assert().success();
    assert!(temp_dir.path().join("test.db").exists());
}

#[test]
fn test_list_without_init_is_internal_error() {
    let (temp_dir, _guard) = setup_test_env();

    get_cmd(&temp_dir).args(["list", "--root-only"]).assert().code(2)
        .stderr(predicate::str::contains("Stacks root page not found"));
}

#[test]
fn test_add_and_list() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    get_cmd(&temp_dir).args(["folders", "add", "Marketing"]).assert().success()
        .stdout(predicate::str::contains("Created folder"));
    get_cmd(&temp_dir).args(["stacks", "add", "Header"]).assert().success()
        .stdout(predicate::str::contains("Created stack"));
    get_cmd(&temp_dir).args(["stacks", "add", "Footer", "--global-area"]).assert().success()
        .stdout(predicate::str::contains("Created global area"));

    let items = json_list(&temp_dir, &["--root-only", "--folders-first"]);
    assert_eq!(item_names(&items), vec!["Marketing", "Footer", "Header"]);
    assert_eq!(items[0]["kind"], "page");
    assert_eq!(items[1]["stack_type"], "GlobalArea");

    let items = json_list(&temp_dir, &["--no-global-areas"]);
    assert_eq!(item_names(&items), vec!["Header", "Marketing"]);

    let items = json_list(&temp_dir, &["--global-areas"]);
    assert_eq!(item_names(&items), vec!["Footer"]);
}

#[test]
fn test_folder_scope_and_count() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    // Root is page 1, the folder is page 2
    get_cmd(&temp_dir).args(["folders", "add", "News"]).assert().success()
        .stdout(predicate::str::contains("Created folder 2: News"));
    get_cmd(&temp_dir).args(["stacks", "add", "Ticker", "--in", "2"]).assert().success();
    get_cmd(&temp_dir).args(["stacks", "add", "Banner", "--in", "2"]).assert().success();
    get_cmd(&temp_dir).args(["stacks", "add", "Header"]).assert().success();

    let items = json_list(&temp_dir, &["--folder", "2"]);
    assert_eq!(item_names(&items), vec!["Banner", "Ticker"]);

    get_cmd(&temp_dir).args(["list", "--count"]).assert().success()
        .stdout("4\n");
    get_cmd(&temp_dir).args(["list", "--root-only", "--count"]).assert().success()
        .stdout("2\n");
}

#[test]
fn test_unknown_folder_is_user_error() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    get_cmd(&temp_dir).args(["list", "--folder", "99"]).assert().code(1)
        .stderr(predicate::str::contains("Folder 99 not found"));
}

#[test]
fn test_sections_and_language_filter() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    get_cmd(&temp_dir).args(["sections", "add", "fr_FR"]).assert().success()
        .stdout(predicate::str::contains("Created language section 2: fr_FR"));
    get_cmd(&temp_dir).args(["sections", "add", "french"]).assert().code(1)
        .stderr(predicate::str::contains("Invalid locale"));
    get_cmd(&temp_dir).args(["sections", "list"]).assert().success()
        .stdout(predicate::str::contains("fr_FR"));

    get_cmd(&temp_dir).args(["stacks", "add", "Bonjour", "--section", "2"]).assert().success();
    get_cmd(&temp_dir).args(["stacks", "add", "Hello"]).assert().success();

    assert_eq!(item_names(&json_list(&temp_dir, &[])), vec!["Hello"]);
    assert_eq!(item_names(&json_list(&temp_dir, &["--section", "2"])), vec!["Bonjour"]);
}

#[test]
fn test_drafts_approve_and_trash() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    get_cmd(&temp_dir).args(["stacks", "add", "Draft", "--draft"]).assert().success();
    let items = json_list(&temp_dir, &[]);
    assert_eq!(items.len(), 1);
    assert!(items[0]["page"]["version"].is_null());

    get_cmd(&temp_dir).args(["stacks", "approve", "2"]).assert().success();
    let items = json_list(&temp_dir, &[]);
    assert_eq!(items[0]["page"]["version"]["is_approved"], true);

    get_cmd(&temp_dir).args(["stacks", "trash", "2"]).assert().success();
    assert!(json_list(&temp_dir, &[]).is_empty());
}

#[test]
fn test_table_output_and_abbreviations() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();
    get_cmd(&temp_dir).args(["st", "ad", "Header"]).assert().success();

    get_cmd(&temp_dir).arg("l").assert().success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("Header"))
        .stdout(predicate::str::contains("approved"));

    get_cmd(&temp_dir).arg("s").assert().code(1)
        .stderr(predicate::str::contains("Ambiguous command"));
}

#[test]
fn test_empty_listing_message() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    get_cmd(&temp_dir).args(["list", "--no-folders", "--no-global-areas", "--no-stacks"]).assert().success()
        .stdout("No items found.\n");
}

#[test]
fn test_unknown_sort_column() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();

    get_cmd(&temp_dir).args(["list", "--sort", "color"]).assert().code(1)
        .stderr(predicate::str::contains("Unknown sort column"));
}

#[test]
fn test_stack_parent_must_be_folder() {
    let (temp_dir, _guard) = setup_test_env();
    get_cmd(&temp_dir).arg("init").assert().success();
    get_cmd(&temp_dir).args(["sections", "add", "fr_FR"]).assert().success();

    // Page 2 is the language section, not a folder
    get_cmd(&temp_dir).args(["stacks", "add", "Lost", "--in", "2"]).assert().code(1)
        .stderr(predicate::str::contains("Folder 2 not found"));
    assert!(json_list(&temp_dir, &[]).is_empty());
}
