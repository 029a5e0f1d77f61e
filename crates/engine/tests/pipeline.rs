use codeintel::{Engine, ExecutionMode, IntelConfig, ModelTier, SourceFile, Task, TaskType};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn write(root: &std::path::Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

fn project() -> (TempDir, Vec<SourceFile>) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/db.js", "const { Pool } = require('pg');\nmodule.exports = { query };\nfunction query(sql) { return sql; }\n");
    write(root, "src/users.js", "const db = require('./db');\nexports.find = function (id) { return db.query(id); };\n");
    write(root, "src/orders.js", "const db = require('./db');\nconst users = require('./users');\n");
    write(root, "src/api.js", "import users from './users';\nimport orders from './orders';\nimport db from './db';\n");
    write(root, "tools/report.py", "from tools import fmt\nimport os\n\ndef run(args):\n    if args:\n        return fmt.render(args)\n");
    write(root, "tools/fmt.py", "def render(x):\n    return str(x)\n");

    let files = [
        "src/db.js",
        "src/users.js",
        "src/orders.js",
        "src/api.js",
        "tools/report.py",
        "tools/fmt.py",
    ]
    .into_iter()
    .map(SourceFile::from_path)
    .collect();
    (dir, files)
}

#[test]
fn end_to_end_on_disk() {
    let (dir, files) = project();
    let config_path = dir.path().join("codeintel.toml");
    fs::write(
        &config_path,
        "[graph]\nmax_impact_depth = 4\n\n[classifier]\nsome_importers = 2\n",
    )
    .unwrap();
    let config = IntelConfig::from_file(&config_path).unwrap();
    let engine = Engine::open(dir.path(), config).unwrap();

    let graph = engine.build_graph(&files);
    assert_eq!(graph.stats.total_files_parsed, 6);
    assert_eq!(graph.stats.parse_errors, 0);
    assert_eq!(graph.importers_of("src/db.js"), ["src/users.js", "src/orders.js", "src/api.js"]);

    let impact = engine.impact("src/db.js", None);
    assert_eq!(impact.direct_dependents, vec!["src/users.js", "src/orders.js", "src/api.js"]);
    assert_eq!(impact.fan_in, 3);
    assert_eq!(engine.cycles().cycle_count, 0);
    assert_eq!(engine.top_dependents()[0].file, "src/db.js");

    let task = Task::new("Swap the pool", TaskType::Auto).with_files(["db.js"]);
    let score = engine.classify_task(&task);
    assert_eq!(score.factors, vec!["moderate blast radius (3 importers)"]);

    let map = engine.repo_map(&files, Some(500));
    assert!(map.files_included >= 3);
    assert!(map.summary.contains("## src/db.js (1 exports)"));
    assert!(map.token_estimate <= 600);

    let report = engine.complexity(&files[4]);
    assert_eq!(report.functions[0].name, "<module>");
}

#[test]
fn plans_drive_execution_mode() {
    let (dir, files) = project();
    let engine = Engine::open(dir.path(), IntelConfig::default()).unwrap();
    engine.build_graph(&files);

    let plan = |wave: u32, task_type: &str| {
        format!(
            "---\nwave: {wave}\n---\n<task type=\"{task_type}\">\n<name>Work</name>\n<files>src/db.js</files>\n<action>Edit and run npm test</action>\n</task>\n"
        )
    };
    let a = engine.classify_plan("a.md", &plan(1, "auto"));
    let b = engine.classify_plan("b.md", &plan(1, "auto"));
    assert_eq!(a.tasks[0].complexity.score, 3);

    let decision = engine.execution_mode(&[a.clone(), b]);
    assert_eq!(decision.mode, ExecutionMode::Parallel);

    let gated = engine.classify_plan("c.md", &plan(2, "checkpoint:decision"));
    assert_eq!(gated.plan_complexity, 4);
    assert_eq!(gated.recommended_model, ModelTier::Opus);
    let decision = engine.execution_mode(&[a, gated]);
    assert_eq!(decision.mode, ExecutionMode::Sequential);
    assert!(decision.has_checkpoints);

    let route = engine.route(&engine.classify_task(&Task::new("small", TaskType::Auto)), Some("budget"));
    assert_eq!(route.model, ModelTier::Sonnet);
}
