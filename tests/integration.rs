use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn rpt_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("rpt");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    // Raw symptom export with some noise lines.
    fs::write(
        data_dir.join("symptoms.txt"),
        "EXPORT 2024-05-11\n\
         Arsenicum Album | Anxiety: Restlessness at night #12 | Kent\n\
         Belladonna | Head: Throbbing headache #3 | Kent\n\
         Belladonna | Head: Flushed hot face #4 | Boericke\n\
         Aconitum Napellus | Anxiety: Fear of death #5 | Kent\n\
         this line is not a record\n\
         Pulsatilla | Mood: Weeps easily #9 | Boericke\n",
    )
    .unwrap();

    // Materia medica sources served from local files.
    let texts_dir = root.join("texts");
    fs::create_dir_all(&texts_dir).unwrap();
    fs::write(
        texts_dir.join("boericke.txt"),
        "Aconite\nFear of death.\n\n\nBelladonna\nThrobbing headache.",
    )
    .unwrap();
    fs::write(
        texts_dir.join("kent.txt"),
        "Pulsatilla\nWeeps easily, changeable mood.",
    )
    .unwrap();

    let config_content = format!(
        r#"[build]
source = "{root}/data/symptoms.txt"
artifact = "{root}/data/repertory.json"

[compact]
output = "{root}/data/repertory.min.json"
max_symptoms_per_category = 1
max_remedies_per_symptom = 1

[retrieval]
final_limit = 12

[fetch]
timeout_secs = 5

[[sources]]
id = "boericke"
location = "{root}/texts/boericke.txt"

[[sources]]
id = "kent"
location = "{root}/texts/kent.txt"

[[sources]]
id = "missing"
location = "{root}/texts/missing.txt"
"#,
        root = root.display()
    );

    let config_path = config_dir.join("rpt.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_rpt(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = rpt_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run rpt binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_build_writes_artifact_and_prints_counts() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_rpt(&config_path, &["build"]);
    assert!(success, "build failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("remedies: 4"));
    assert!(stdout.contains("symptoms: 5"));
    assert!(stdout.contains("lines: 7"));
    assert!(stdout.contains("categories: 3"));
    assert!(stdout.contains("ok"));

    let artifact_path = tmp.path().join("data/repertory.json");
    let data = fs::read_to_string(&artifact_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&data).unwrap();

    for key in ["metadata", "remedies", "symptoms", "repertory", "categories"] {
        assert!(json.get(key).is_some(), "artifact missing key {}", key);
    }
    assert_eq!(json["metadata"]["totalRemedies"], 4);
    assert_eq!(json["metadata"]["totalSymptoms"], 5);
    assert_eq!(
        json["remedies"]["Arsenicum Album"]["abbreviation"],
        "AA"
    );
    assert_eq!(
        json["remedies"]["Arsenicum Album"]["totalSymptoms"],
        1
    );
    // Belladonna carries two symptoms, so it sorts first.
    let first_remedy = json["remedies"].as_object().unwrap().keys().next().unwrap();
    assert_eq!(first_remedy, "Belladonna");
    assert_eq!(
        json["categories"],
        serde_json::json!(["Anxiety", "Head", "Mood"])
    );
    let grade = &json["repertory"]["Head"]["Throbbing headache"][0]["grade"];
    let grade = grade.as_u64().unwrap();
    assert!((1..=3).contains(&grade));
}

#[test]
fn test_compact_bounds_and_size_report() {
    let (tmp, config_path) = setup_test_env();

    let (_, _, success) = run_rpt(&config_path, &["build"]);
    assert!(success, "build failed");

    let (stdout, stderr, success) = run_rpt(&config_path, &["compact"]);
    assert!(
        success,
        "compact failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("before:"));
    assert!(stdout.contains("MB"));

    let input_len = fs::metadata(tmp.path().join("data/repertory.json"))
        .unwrap()
        .len();
    let output_path = tmp.path().join("data/repertory.min.json");
    let output_len = fs::metadata(&output_path).unwrap().len();
    assert!(output_len <= input_len);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    // max_symptoms_per_category = 1, max_remedies_per_symptom = 1.
    for (_, symptoms) in json["repertory"].as_object().unwrap() {
        assert_eq!(symptoms.as_object().unwrap().len(), 1);
        for (_, entries) in symptoms.as_object().unwrap() {
            assert_eq!(entries.as_array().unwrap().len(), 1);
        }
    }
    // Metadata and category list are untouched.
    assert_eq!(json["metadata"]["totalSymptoms"], 5);
    assert_eq!(
        json["categories"],
        serde_json::json!(["Anxiety", "Head", "Mood"])
    );
}

#[test]
fn test_compact_fails_on_malformed_artifact() {
    let (tmp, config_path) = setup_test_env();

    fs::write(
        tmp.path().join("data/repertory.json"),
        r#"{"metadata": {}, "remedies": {}}"#,
    )
    .unwrap();

    let (_, stderr, success) = run_rpt(&config_path, &["compact"]);
    assert!(!success);
    assert!(stderr.contains("Malformed repertory artifact"));
}

#[test]
fn test_search_ranks_and_tolerates_missing_source() {
    let (_tmp, config_path) = setup_test_env();

    // The "missing" source fails to load; the other two still serve.
    let (stdout, stderr, success) = run_rpt(&config_path, &["search", "throbbing"]);
    assert!(
        success,
        "search failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("Belladonna"));
    assert!(!stdout.contains("Aconite"));

    let (stdout, _, success) = run_rpt(&config_path, &["search", "weeps"]);
    assert!(success);
    assert!(stdout.contains("Pulsatilla"));
}

#[test]
fn test_search_no_match_prints_no_results() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_rpt(&config_path, &["search", "zzzqqq"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_search_fails_distinctly_when_no_source_loads() {
    let (tmp, config_path) = setup_test_env();

    fs::remove_dir_all(tmp.path().join("texts")).unwrap();
    let (_, stderr, success) = run_rpt(&config_path, &["search", "throbbing"]);
    assert!(!success);
    assert!(stderr.contains("index unavailable"));
}

#[test]
fn test_sources_reports_health() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_rpt(&config_path, &["sources"]);
    assert!(success);
    assert!(stdout.contains("boericke"));
    assert!(stdout.contains("OK"));
    assert!(stdout.contains("missing"));
    assert!(stdout.contains("FAILED"));
}
