use assert_cmd::Command;
use camino::Utf8PathBuf;
use cucumber::{World, given, then, when};
use fs_err as fs;
use tempfile::TempDir;

#[derive(Debug, Default, World)]
pub struct ShipwrightWorld {
    temp: Option<TempDir>,
    repo_root: Option<Utf8PathBuf>,
}

fn repo_root(world: &ShipwrightWorld) -> &Utf8PathBuf {
    world.repo_root.as_ref().expect("repo_root set")
}

fn shipwright() -> Command {
    Command::cargo_bin("shipwright").expect("shipwright binary")
}

fn read_plan(world: &ShipwrightWorld) -> serde_json::Value {
    let root = repo_root(world);
    let plan_path = root.join("artifacts").join("shipwright").join("plan.json");
    let plan_str = fs::read_to_string(&plan_path).expect("read plan.json");
    serde_json::from_str(&plan_str).expect("parse plan.json")
}

fn find_goal<'a>(plan: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    plan["goals"]
        .as_array()
        .expect("goals array")
        .iter()
        .find(|g| g["name"] == name)
}

fn write_push(world: &ShipwrightWorld, branch: &str, files: &[&str]) {
    let root = repo_root(world);
    let push = serde_json::json!({
        "repo": { "owner": "shipwright-dev", "name": "some-lib", "default_branch": "main" },
        "branch": branch,
        "sha": "deadbeefcafebabe",
        "files_changed": files,
    });
    fs::write(
        root.join("push.json"),
        serde_json::to_string_pretty(&push).expect("push json"),
    )
    .expect("write push.json");
}

#[given("a node library repo")]
async fn node_library_repo(world: &mut ShipwrightWorld) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();

    fs::write(
        root.join("package.json"),
        r#"{
  "name": "some-lib",
  "version": "1.2.3",
  "dependencies": { "lodash": "^4.17.21" }
}
"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(root.join("lib").join("index.ts"), "let x = 1;\n").unwrap();
    fs::create_dir_all(root.join("artifacts")).unwrap();

    world.temp = Some(td);
    world.repo_root = Some(root);
}

#[given("a branch push event")]
async fn branch_push_event(world: &mut ShipwrightWorld) {
    write_push(world, "feature/x", &["lib/index.ts"]);
}

#[given("a default branch push event")]
async fn default_branch_push_event(world: &mut ShipwrightWorld) {
    write_push(world, "main", &["lib/index.ts"]);
}

#[given("a docs-only push event")]
async fn docs_only_push_event(world: &mut ShipwrightWorld) {
    write_push(world, "main", &["README.md"]);
}

#[when("I run shipwright plan")]
async fn run_plan(world: &mut ShipwrightWorld) {
    let root = repo_root(world).clone();
    shipwright()
        .current_dir(root.as_str())
        .args(["plan", "--push", "push.json"])
        .assert()
        .success();
}

#[when(expr = "I run shipwright plan denying {string}")]
async fn run_plan_denying(world: &mut ShipwrightWorld, pattern: String) {
    let root = repo_root(world).clone();
    shipwright()
        .current_dir(root.as_str())
        .args(["plan", "--push", "push.json", "--deny", &pattern])
        .assert()
        .code(2);
}

#[when("I run shipwright autofix without --apply")]
async fn run_autofix_dry(world: &mut ShipwrightWorld) {
    let root = repo_root(world).clone();
    shipwright()
        .current_dir(root.as_str())
        .arg("autofix")
        .assert()
        .success();
}

#[when("I run shipwright autofix with --apply")]
async fn run_autofix_apply(world: &mut ShipwrightWorld) {
    let root = repo_root(world).clone();
    shipwright()
        .current_dir(root.as_str())
        .args(["autofix", "--apply"])
        .assert()
        .success();
}

#[when(expr = "I approve goal {string} as {string}")]
async fn approve_goal(world: &mut ShipwrightWorld, goal: String, by: String) {
    let root = repo_root(world).clone();
    shipwright()
        .current_dir(root.as_str())
        .args(["approve", "--goal", &goal, "--by", &by])
        .assert()
        .success();
}

#[then(expr = "the plan contains goal {string}")]
async fn plan_contains_goal(world: &mut ShipwrightWorld, name: String) {
    let plan = read_plan(world);
    assert!(
        find_goal(&plan, &name).is_some(),
        "expected goal {name} in plan"
    );
}

#[then(expr = "the plan does not contain goal {string}")]
async fn plan_does_not_contain_goal(world: &mut ShipwrightWorld, name: String) {
    let plan = read_plan(world);
    assert!(
        find_goal(&plan, &name).is_none(),
        "did not expect goal {name} in plan"
    );
}

#[then("the plan contains no goals")]
async fn plan_contains_no_goals(world: &mut ShipwrightWorld) {
    let plan = read_plan(world);
    let goals = plan["goals"].as_array().expect("goals array");
    assert!(goals.is_empty(), "expected empty goal set, got {goals:?}");
}

#[then(expr = "the goal {string} is waiting for approval")]
async fn goal_waiting_for_approval(world: &mut ShipwrightWorld, name: String) {
    let plan = read_plan(world);
    let goal = find_goal(&plan, &name).expect("goal present");
    assert_eq!(goal["state"], "waiting_for_approval");
}

#[then(expr = "the goal {string} is gated")]
async fn goal_is_gated(world: &mut ShipwrightWorld, name: String) {
    let plan = read_plan(world);
    let goal = find_goal(&plan, &name).expect("goal present");
    assert_eq!(goal["gated"], true);
}

#[then(expr = "the goal {string} is approved")]
async fn goal_is_approved(world: &mut ShipwrightWorld, name: String) {
    let plan = read_plan(world);
    let goal = find_goal(&plan, &name).expect("goal present");
    assert_eq!(goal["state"], "approved");
    assert_eq!(goal["approval"]["approved_by"], "alex");
}

#[then("the source file has no license header")]
async fn source_has_no_header(world: &mut ShipwrightWorld) {
    let root = repo_root(world);
    let contents = fs::read_to_string(root.join("lib").join("index.ts")).unwrap();
    assert_eq!(contents, "let x = 1;\n");
}

#[then("the source file starts with the license header")]
async fn source_starts_with_header(world: &mut ShipwrightWorld) {
    let root = repo_root(world);
    let contents = fs::read_to_string(root.join("lib").join("index.ts")).unwrap();
    assert!(
        contents.starts_with("/*"),
        "expected license header, got:\n{contents}"
    );
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    ShipwrightWorld::cucumber().run(features_path).await;
}
