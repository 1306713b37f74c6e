//! Release, ship and hotfix state machines against the in-memory repository.

use promotion_flow::cli::OutputManager;
use promotion_flow::error::{
    CliError, FlowError, GateError, GitError, GuardError, VersionError,
};
use promotion_flow::flow::{self, FlowContext, FlowOutcome};
use promotion_flow::git::InMemoryGit;
use promotion_flow::prompt::StreamPrompter;
use promotion_flow::{FlowConfig, ScriptRunner, VersionBump};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

const DATE: &str = "2024-05-01";

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Script runner that records calls, runs hooks and fails on demand
#[derive(Default)]
struct RecordingScripts<'a> {
    calls: Mutex<Vec<String>>,
    failing: Vec<String>,
    hooks: Vec<(String, Box<dyn Fn() + 'a>)>,
}

impl<'a> RecordingScripts<'a> {
    fn failing_on(mut self, script: &str) -> Self {
        self.failing.push(script.to_string());
        self
    }

    fn on(mut self, script: &str, hook: impl Fn() + 'a) -> Self {
        self.hooks.push((script.to_string(), Box::new(hook)));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ScriptRunner for RecordingScripts<'_> {
    async fn run_script(&self, script: &str) -> promotion_flow::Result<()> {
        self.calls.lock().unwrap().push(script.to_string());
        for (name, hook) in &self.hooks {
            if name == script {
                hook();
            }
        }
        if self.failing.iter().any(|f| f == script) {
            return Err(GateError::QualityGateFailure {
                step: script.to_string(),
                code: Some(1),
            }
            .into());
        }
        Ok(())
    }
}

/// Package directory plus a pipeline where main, staging and production share one root commit
struct Pipeline {
    dir: TempDir,
    git: InMemoryGit,
    config: FlowConfig,
    output: OutputManager,
}

impl Pipeline {
    fn new(version: &str) -> Self {
        let git = InMemoryGit::new("origin", "main");
        for branch in ["staging", "production"] {
            git.branch_from(branch, "main");
            git.publish(branch);
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            format!(
                "{{\n  \"name\": \"acme-tools\",\n  \"version\": \"{version}\",\n  \"private\": true\n}}\n"
            ),
        )
        .unwrap();

        Self {
            dir,
            git,
            config: FlowConfig::default(),
            output: OutputManager::new(true),
        }
    }

    /// Add commits to main and promote them to staging on both sides
    fn stage(&self, subjects: &[&str]) {
        for subject in subjects {
            self.git.commit_on("main", subject);
        }
        self.git.branch_from("staging", "main");
        self.git.publish("main");
        self.git.publish("staging");
    }

    fn context<'a, S: ScriptRunner>(&'a self, scripts: &'a S) -> FlowContext<'a, InMemoryGit, S> {
        FlowContext::new(&self.git, scripts, &self.config, &self.output, self.dir.path())
            .with_date(DATE)
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.path().join("package.json")
    }

    fn manifest(&self) -> String {
        std::fs::read_to_string(self.manifest_path()).unwrap()
    }

    fn changelog(&self) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join("CHANGELOG.md")).ok()
    }

    fn tips(&self) -> Vec<Option<usize>> {
        ["main", "staging", "production"]
            .iter()
            .flat_map(|b| [self.git.tip(b), self.git.remote_tip(b)])
            .collect()
    }
}

fn answer(text: &str) -> StreamPrompter<Cursor<Vec<u8>>, Vec<u8>> {
    StreamPrompter::new(Cursor::new(text.as_bytes().to_vec()), Vec::new())
}

fn write_version(path: &Path, version: &str) {
    let content = std::fs::read_to_string(path).unwrap();
    let mut doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    doc["version"] = serde_json::Value::String(version.to_string());
    std::fs::write(path, serde_json::to_string_pretty(&doc).unwrap() + "\n").unwrap();
}

// ----- release -----

#[test]
fn release_fast_forwards_staging_to_main() {
    let pipeline = Pipeline::new("1.0.0");
    let feature = pipeline.git.commit_on("main", "feat: search");
    pipeline.git.publish("main");
    let scripts = RecordingScripts::default();

    let outcome = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap();

    assert_eq!(outcome, FlowOutcome::Completed);
    assert_eq!(pipeline.git.tip("staging"), Some(feature));
    assert_eq!(pipeline.git.remote_tip("staging"), Some(feature));
    assert_eq!(pipeline.git.head(), "main");
    assert_eq!(scripts.calls(), vec!["build", "typecheck", "test", "fix"]);
    assert_eq!(
        pipeline.git.journal(),
        vec![
            "fetch origin",
            "pull --ff-only origin main",
            "add -A",
            "checkout staging",
            "merge --ff-only main",
            "push origin staging",
            "checkout main",
            "push origin main",
        ]
    );
}

#[test]
fn release_commits_changes_left_by_fix_step() {
    let pipeline = Pipeline::new("1.0.0");
    let scripts = RecordingScripts::default().on("fix", || pipeline.git.set_dirty(true));

    block_on(flow::release::run(&pipeline.context(&scripts), Some("tidy imports"))).unwrap();

    let tip = pipeline.git.tip("main").unwrap();
    assert_eq!(pipeline.git.subject(tip).as_deref(), Some("chore(staging): tidy imports"));
    assert_eq!(pipeline.git.tip("staging"), Some(tip));
    assert_eq!(pipeline.git.remote_tip("main"), Some(tip));
}

#[test]
fn release_fix_commit_uses_default_message() {
    let pipeline = Pipeline::new("1.0.0");
    let scripts = RecordingScripts::default().on("fix", || pipeline.git.set_dirty(true));

    block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap();

    let tip = pipeline.git.tip("main").unwrap();
    assert_eq!(
        pipeline.git.subject(tip).as_deref(),
        Some("chore(staging): auto-fix formatting")
    );
}

#[test]
fn release_twice_is_a_no_op() {
    let pipeline = Pipeline::new("1.0.0");
    pipeline.git.commit_on("main", "feat: search");
    pipeline.git.publish("main");
    let scripts = RecordingScripts::default();

    block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap();
    let after_first = pipeline.tips();
    let outcome = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap();

    assert_eq!(outcome, FlowOutcome::Completed);
    assert_eq!(pipeline.tips(), after_first);
}

#[test]
fn release_tolerates_failing_fix_step() {
    let pipeline = Pipeline::new("1.0.0");
    let scripts = RecordingScripts::default().failing_on("fix");

    let outcome = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap();
    assert_eq!(outcome, FlowOutcome::Completed);
}

#[test]
fn release_refuses_wrong_branch_without_touching_anything() {
    let pipeline = Pipeline::new("1.0.0");
    pipeline.git.set_head("staging");
    let scripts = RecordingScripts::default();

    let err = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap_err();

    assert!(matches!(
        err,
        FlowError::Guard(GuardError::WrongBranch { ref expected, ref actual })
            if expected == "main" && actual == "staging"
    ));
    assert!(pipeline.git.journal().is_empty());
    assert!(scripts.calls().is_empty());
}

#[test]
fn release_refuses_dirty_tree() {
    let pipeline = Pipeline::new("1.0.0");
    pipeline.git.set_dirty(true);
    let scripts = RecordingScripts::default();

    let err = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap_err();

    assert!(matches!(err, FlowError::Guard(GuardError::DirtyWorkingTree)));
    assert!(pipeline.git.journal().is_empty());
}

#[test]
fn release_requires_staging_branch() {
    let git = InMemoryGit::new("origin", "main");
    let pipeline = Pipeline {
        git,
        ..Pipeline::new("1.0.0")
    };
    let scripts = RecordingScripts::default();

    let err = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap_err();

    assert!(matches!(
        err,
        FlowError::Guard(GuardError::MissingBranch { ref name }) if name == "staging"
    ));
    assert!(err.recovery_suggestions()[0].contains("git checkout -b staging"));
    assert!(scripts.calls().is_empty());
}

#[test]
fn release_stops_at_failing_quality_step() {
    let pipeline = Pipeline::new("1.0.0");
    pipeline.git.commit_on("main", "feat: search");
    pipeline.git.publish("main");
    let staging_before = pipeline.git.tip("staging");
    let scripts = RecordingScripts::default().failing_on("typecheck");

    let err = block_on(flow::release::run(&pipeline.context(&scripts), None)).unwrap_err();

    assert!(matches!(
        err,
        FlowError::Gate(GateError::QualityGateFailure { ref step, .. }) if step == "typecheck"
    ));
    assert_eq!(scripts.calls(), vec!["build", "typecheck"]);
    assert_eq!(pipeline.git.tip("staging"), staging_before);
    assert!(!pipeline.git.journal().iter().any(|op| op.starts_with("commit")));
}

// ----- ship -----

#[test]
fn ship_promotes_staging_through_the_pipeline() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one", "feat: two", "fix: three"]);
    let scripts = RecordingScripts::default();
    let mut prompter = answer("y\n");

    let outcome = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut prompter,
    ))
    .unwrap();
    assert_eq!(outcome, FlowOutcome::Completed);

    let release = pipeline.git.tip("production").unwrap();
    assert_eq!(
        pipeline.git.subject(release).as_deref(),
        Some("chore(release): acme-tools@2.2.0")
    );
    assert_eq!(
        pipeline.git.body(release).as_deref(),
        Some("- fix: three\n- feat: two\n- feat: one")
    );
    assert!(pipeline.tips().iter().all(|tip| *tip == Some(release)));
    assert_eq!(pipeline.git.head(), "main");

    assert!(pipeline.manifest().contains("\"version\": \"2.2.0\""));
    let changelog = pipeline.changelog().unwrap();
    assert!(changelog.starts_with("# Changelog\n\n## [2.2.0] - 2024-05-01\n\n"));
    assert!(changelog.contains("- fix: three\n- feat: two\n- feat: one\n"));

    let (_, prompt) = prompter.into_parts();
    let prompt = String::from_utf8(prompt).unwrap();
    assert!(prompt.contains("acme-tools"));
    assert!(prompt.contains("minor"));
    assert!(prompt.ends_with("(y/N) "));
}

#[test]
fn ship_decline_changes_nothing() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one", "feat: two", "fix: three"]);
    let manifest_before = pipeline.manifest();
    let tips_before = pipeline.tips();
    let scripts = RecordingScripts::default();

    let outcome = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut answer("n\n"),
    ))
    .unwrap();

    assert_eq!(outcome, FlowOutcome::Declined);
    assert_eq!(pipeline.manifest(), manifest_before);
    assert_eq!(pipeline.changelog(), None);
    assert_eq!(pipeline.tips(), tips_before);
    assert_eq!(pipeline.git.journal(), vec!["fetch origin"]);
    assert!(scripts.calls().is_empty());
}

#[test]
fn ship_empty_answer_declines() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one"]);
    let scripts = RecordingScripts::default();

    let outcome = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Patch,
        &mut answer(""),
    ))
    .unwrap();
    assert_eq!(outcome, FlowOutcome::Declined);
}

#[test]
fn ship_requires_main() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one"]);
    pipeline.git.set_head("staging");
    let manifest_before = pipeline.manifest();
    let scripts = RecordingScripts::default();

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(err, FlowError::Guard(GuardError::WrongBranch { .. })));
    assert_eq!(pipeline.manifest(), manifest_before);
    assert_eq!(pipeline.changelog(), None);
    assert!(pipeline.git.journal().is_empty());
}

#[test]
fn ship_with_nothing_pending_is_a_guard_failure() {
    let pipeline = Pipeline::new("2.1.0");
    let scripts = RecordingScripts::default();

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Patch,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(err, FlowError::Guard(GuardError::NothingToShip { .. })));
    assert_eq!(pipeline.git.journal(), vec!["fetch origin"]);
}

#[test]
fn ship_requires_production_branch() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one"]);
    let git = InMemoryGit::new("origin", "main");
    git.branch_from("staging", "main");
    git.publish("staging");
    let pipeline = Pipeline { git, ..pipeline };
    let scripts = RecordingScripts::default();

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Patch,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Guard(GuardError::MissingBranch { ref name }) if name == "production"
    ));
}

#[test]
fn ship_quality_failure_returns_to_main() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one"]);
    let manifest_before = pipeline.manifest();
    let scripts = RecordingScripts::default().failing_on("test");

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(err, FlowError::Gate(GateError::QualityGateFailure { .. })));
    assert_eq!(pipeline.git.head(), "main");
    assert_eq!(pipeline.git.journal().last().map(String::as_str), Some("checkout main"));
    assert_eq!(pipeline.manifest(), manifest_before);
    assert_eq!(pipeline.changelog(), None);
}

#[test]
fn ship_rejects_invalid_manifest_version_before_any_checkout() {
    let pipeline = Pipeline::new("2.1");
    pipeline.stage(&["feat: one"]);
    let scripts = RecordingScripts::default();

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Version(VersionError::InvalidVersionFormat { ref version }) if version == "2.1"
    ));
    assert_eq!(pipeline.git.head(), "main");
    assert_eq!(pipeline.git.journal(), vec!["fetch origin"]);
    assert!(scripts.calls().is_empty());
}

#[test]
fn ship_staging_sync_failure_returns_to_main() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one"]);
    pipeline.git.fail_on("pull --ff-only origin staging");
    let manifest_before = pipeline.manifest();
    let scripts = RecordingScripts::default();

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(err, FlowError::Git(GitError::CommandFailed { .. })));
    assert_eq!(pipeline.git.head(), "main");
    assert_eq!(pipeline.git.journal().last().map(String::as_str), Some("checkout main"));
    assert!(scripts.calls().is_empty());
    assert_eq!(pipeline.manifest(), manifest_before);
}

#[test]
fn ship_refuses_diverged_production() {
    let pipeline = Pipeline::new("2.1.0");
    pipeline.stage(&["feat: one"]);
    pipeline.git.commit_on("production", "fix: applied directly to production");
    pipeline.git.publish("production");
    let scripts = RecordingScripts::default();

    let err = block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Patch,
        &mut answer("y\n"),
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Git(GitError::NotFastForward { ref branch, ref into })
            if branch == "staging" && into == "production"
    ));
    assert_eq!(pipeline.git.head(), "main");
}

#[test]
fn ship_truncates_long_subjects() {
    let pipeline = Pipeline::new("0.9.0");
    let long = format!("feat: {}", "x".repeat(120));
    pipeline.stage(&[long.as_str()]);
    let scripts = RecordingScripts::default();

    block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Major,
        &mut answer("Y\n"),
    ))
    .unwrap();

    let changelog = pipeline.changelog().unwrap();
    let bullet = changelog.lines().find(|l| l.starts_with("- feat:")).unwrap();
    assert_eq!(bullet.chars().count(), 2 + 95 + 3);
    assert!(bullet.ends_with("..."));
    assert!(changelog.contains("## [1.0.0] - 2024-05-01"));
}

#[test]
fn ship_with_changesets_lets_the_version_tool_win() {
    let mut pipeline = Pipeline::new("2.1.0");
    pipeline.config.changesets.enabled = true;
    pipeline.stage(&["feat: one"]);
    let manifest_path = pipeline.manifest_path();
    let record_path = pipeline.dir.path().join(".changeset/acme-tools-minor.md");
    let record_seen = Mutex::new(None);
    let scripts = RecordingScripts::default().on("changeset:version", || {
        *record_seen.lock().unwrap() = std::fs::read_to_string(&record_path).ok();
        write_version(&manifest_path, "3.0.0");
    });

    block_on(flow::ship::run(
        &pipeline.context(&scripts),
        VersionBump::Minor,
        &mut answer("y\n"),
    ))
    .unwrap();

    let record = record_seen.lock().unwrap().clone().unwrap();
    assert!(record.starts_with("---\n\"acme-tools\": minor\n---\n\n"));
    assert!(record.contains("- feat: one"));

    let release = pipeline.git.tip("main").unwrap();
    assert_eq!(
        pipeline.git.subject(release).as_deref(),
        Some("chore(release): acme-tools@3.0.0")
    );
    assert!(pipeline.changelog().unwrap().contains("## [3.0.0] - 2024-05-01"));
}

// ----- hotfix -----

#[test]
fn hotfix_start_branches_from_production() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default();

    block_on(flow::hotfix::start(&pipeline.context(&scripts), "auth-bug")).unwrap();

    assert_eq!(pipeline.git.head(), "hotfix/auth-bug");
    assert_eq!(pipeline.git.tip("hotfix/auth-bug"), pipeline.git.tip("production"));
    assert_eq!(
        pipeline.git.journal(),
        vec![
            "fetch origin",
            "checkout production",
            "pull --ff-only origin production",
            "checkout -b hotfix/auth-bug",
        ]
    );
}

#[test]
fn hotfix_start_requires_clean_tree_and_production() {
    let pipeline = Pipeline::new("2.2.0");
    pipeline.git.set_dirty(true);
    let scripts = RecordingScripts::default();
    let err = block_on(flow::hotfix::start(&pipeline.context(&scripts), "auth-bug")).unwrap_err();
    assert!(matches!(err, FlowError::Guard(GuardError::DirtyWorkingTree)));

    let pipeline = Pipeline {
        git: InMemoryGit::new("origin", "main"),
        ..Pipeline::new("2.2.0")
    };
    let err = block_on(flow::hotfix::start(&pipeline.context(&scripts), "auth-bug")).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Guard(GuardError::MissingBranch { ref name }) if name == "production"
    ));
}

#[test]
fn hotfix_start_requires_a_name() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default();
    let err = block_on(flow::hotfix::start(&pipeline.context(&scripts), "  ")).unwrap_err();
    assert!(matches!(err, FlowError::Cli(CliError::MissingArgument { .. })));
    assert!(pipeline.git.journal().is_empty());
}

#[test]
fn hotfix_finish_merges_into_every_pipeline_branch() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default();
    let ctx = pipeline.context(&scripts);

    block_on(flow::hotfix::start(&ctx, "auth-bug")).unwrap();
    let fix = pipeline.git.commit_on("hotfix/auth-bug", "fix: refresh tokens before expiry");
    block_on(flow::hotfix::finish(&ctx, VersionBump::Patch, "Fix token expiry")).unwrap();

    let production = pipeline.git.tip("production").unwrap();
    let staging = pipeline.git.tip("staging").unwrap();
    let main = pipeline.git.tip("main").unwrap();
    assert_eq!(
        pipeline.git.subject(production).as_deref(),
        Some("chore(hotfix): merge hotfix/auth-bug into production")
    );
    assert_eq!(
        pipeline.git.subject(staging).as_deref(),
        Some("chore(hotfix): merge production into staging")
    );
    assert_eq!(
        pipeline.git.subject(main).as_deref(),
        Some("chore(hotfix): merge staging into main")
    );
    for tip in [production, staging, main] {
        assert!(pipeline.git.contains(tip, fix));
    }
    assert_eq!(pipeline.git.remote_tip("main"), Some(main));

    assert_eq!(pipeline.git.tip("hotfix/auth-bug"), None);
    assert_eq!(pipeline.git.head(), "main");
    assert!(pipeline.manifest().contains("\"version\": \"2.2.1\""));

    let changelog = pipeline.changelog().unwrap();
    let newest = changelog.split("\n## ").nth(1).unwrap();
    assert!(newest.starts_with("[2.2.1] - 2024-05-01 (hotfix)"));
    assert!(newest.contains("Fix token expiry"));
}

#[test]
fn hotfix_finish_tolerates_missing_remote_branch() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default();
    let ctx = pipeline.context(&scripts);

    block_on(flow::hotfix::start(&ctx, "auth-bug")).unwrap();
    pipeline.git.commit_on("hotfix/auth-bug", "fix: x");
    let outcome = block_on(flow::hotfix::finish(&ctx, VersionBump::Minor, "Fix x")).unwrap();

    assert_eq!(outcome, FlowOutcome::Completed);
    assert!(
        pipeline
            .git
            .journal()
            .contains(&"push origin --delete hotfix/auth-bug".to_string())
    );
    assert!(pipeline.manifest().contains("\"version\": \"2.3.0\""));
}

#[test]
fn hotfix_finish_requires_hotfix_branch() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default();

    let err = block_on(flow::hotfix::finish(
        &pipeline.context(&scripts),
        VersionBump::Patch,
        "Fix token expiry",
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Guard(GuardError::NotHotfixBranch { ref actual, .. }) if actual == "main"
    ));
    assert!(scripts.calls().is_empty());
    assert!(pipeline.manifest().contains("\"version\": \"2.2.0\""));
}

#[test]
fn hotfix_finish_rejects_major_and_blank_message() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default();
    let ctx = pipeline.context(&scripts);

    let err = block_on(flow::hotfix::finish(&ctx, VersionBump::Major, "breaking")).unwrap_err();
    assert!(matches!(err, FlowError::Cli(CliError::InvalidArguments { .. })));

    let err = block_on(flow::hotfix::finish(&ctx, VersionBump::Patch, " ")).unwrap_err();
    assert!(matches!(err, FlowError::Cli(CliError::MissingArgument { .. })));
    assert!(pipeline.git.journal().is_empty());
}

#[test]
fn hotfix_finish_quality_failure_leaves_version_alone() {
    let pipeline = Pipeline::new("2.2.0");
    let scripts = RecordingScripts::default().failing_on("build");
    let ctx = pipeline.context(&scripts);

    block_on(flow::hotfix::start(&ctx, "auth-bug")).unwrap();
    let err =
        block_on(flow::hotfix::finish(&ctx, VersionBump::Patch, "Fix token expiry")).unwrap_err();

    assert!(matches!(err, FlowError::Gate(_)));
    assert!(pipeline.manifest().contains("\"version\": \"2.2.0\""));
    assert_eq!(pipeline.git.head(), "hotfix/auth-bug");
}
