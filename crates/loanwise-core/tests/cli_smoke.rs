//! Drives the `loanwise` binary end to end against artifacts written to a
//! scratch directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Approves exactly when credit history is above one half.
const CREDIT_STUMP: &str = r#"{
    "kind": "decision_tree",
    "n_features_in": 11,
    "feature_names": [
        "gender", "married", "dependents", "education", "self_employed",
        "applicant_income", "coapplicant_income", "loan_amount",
        "loan_term_months", "credit_history", "property_area"
    ],
    "description": "credit history stump",
    "nodes": [
        {"node": "split", "feature": 9, "threshold": 0.5, "left": 1, "right": 2},
        {"node": "leaf", "class": 0},
        {"node": "leaf", "class": 1}
    ]
}"#;

/// ONNX logistic graph with margin `10 * credit_history - 5`.
fn credit_logit_onnx() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../loanwise-model/tests/fixtures/credit_logit.onnx")
}

const GOOD_CREDIT_TOML: &str = r#"
gender = "Male"
married = "Yes"
dependents = "None"
education = "Graduate"
self_employed = "Yes"
applicant_income = 5000.0
coapplicant_income = 0.0
loan_amount = 150000.0
loan_term_months = 360
credit_history = 1.0
property_area = "Urban"
"#;

struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("loanwise-cli-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).expect("failed to create scratch dir");
        Self { dir }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, contents).expect("failed to write scratch file");
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn loanwise(scratch: &Scratch, model: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_loanwise"));
    command
        .current_dir(&scratch.dir)
        .env("LOANWISE_MODEL_PATH", model)
        .env_remove("LOANWISE_CONFIG")
        .env("LOANWISE_LOG", "loanwise=debug,loanwise_eligibility=debug");
    command
}

fn text(output: &Output) -> (String, String) {
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn predict_from_toml_application() {
    let scratch = Scratch::new("toml");
    let application = scratch.write("applicant.toml", GOOD_CREDIT_TOML);

    let output = loanwise(&scratch, &credit_logit_onnx())
        .args(["predict", application.to_string_lossy().as_ref(), "--show-features"])
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("You are Eligible for the loan."), "stdout:\n{stdout}");
    assert!(stdout.contains("loan_amount"));
    assert!(stdout.contains("150"));
    assert!(stderr.contains("Model loaded successfully!"), "stderr:\n{stderr}");
}

#[test]
fn predict_from_json_application() {
    let scratch = Scratch::new("json");
    let model = scratch.write("model.json", CREDIT_STUMP);
    let application = scratch.write(
        "applicant.json",
        r#"{
            "gender": "Female", "married": "No", "dependents": "3+",
            "education": "Not Graduate", "self_employed": "No",
            "applicant_income": 2500, "coapplicant_income": 1800,
            "loan_amount": 95000, "loan_term_months": 180,
            "credit_history": 0.0, "property_area": "Rural"
        }"#,
    );

    let output = loanwise(&scratch, &model)
        .args(["predict", application.to_string_lossy().as_ref()])
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("You are Not Eligible for the loan."), "stdout:\n{stdout}");
}

#[test]
fn missing_model_is_reported_without_crashing() {
    let scratch = Scratch::new("missing");
    let application = scratch.write("applicant.toml", GOOD_CREDIT_TOML);
    let model = scratch.dir.join("nowhere.json");

    let output = loanwise(&scratch, &model)
        .args(["predict", application.to_string_lossy().as_ref()])
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("Model is not loaded. Please check for errors."));
    assert!(stderr.contains("model file not found"), "stderr:\n{stderr}");
}

#[test]
fn invalid_application_is_rejected() {
    let scratch = Scratch::new("invalid");
    let model = scratch.write("model.json", CREDIT_STUMP);
    let application = scratch.write(
        "applicant.toml",
        &GOOD_CREDIT_TOML.replace("loan_term_months = 360", "loan_term_months = 0"),
    );

    let output = loanwise(&scratch, &model)
        .args(["predict", application.to_string_lossy().as_ref()])
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, _) = text(&output);

    assert!(!output.status.success());
    assert!(stdout.contains("Invalid input: invalid loan_term_months"), "stdout:\n{stdout}");
}

#[test]
fn model_with_wrong_width_is_a_configuration_error() {
    let scratch = Scratch::new("narrow");
    let model = scratch.write(
        "model.json",
        r#"{"kind": "logistic_regression", "n_features_in": 7,
            "coefficients": [0, 0, 0, 0, 0, 0, 0], "intercept": 0}"#,
    );

    let output = loanwise(&scratch, &model)
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, _) = text(&output);

    assert!(!output.status.success());
    assert!(stdout.contains("status:        unavailable"), "stdout:\n{stdout}");
    assert!(stdout.contains("model expects 7 features but the encoder produces 11"));
}

#[test]
fn info_reports_ready_onnx_model() {
    let scratch = Scratch::new("info-onnx");

    let output = loanwise(&scratch, &credit_logit_onnx())
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("kind:          onnx"));
    assert!(stdout.contains("n_features_in: 11"));
}

#[test]
fn info_reports_ready_json_model() {
    let scratch = Scratch::new("info");
    let model = scratch.write("model.json", CREDIT_STUMP);

    let output = loanwise(&scratch, &model)
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("kind:          decision_tree"));
    assert!(stdout.contains("description:   credit history stump"));
    assert!(stdout.contains("sha256:"));
}

#[test]
fn model_with_non_binary_classes_is_unavailable() {
    let scratch = Scratch::new("classes");
    let model = scratch.write(
        "model.json",
        r#"{"kind": "logistic_regression", "n_features_in": 11, "classes": [0, 2],
            "coefficients": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], "intercept": 5}"#,
    );

    let output = loanwise(&scratch, &model)
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, _) = text(&output);

    assert!(!output.status.success());
    assert!(stdout.contains("status:        unavailable"), "stdout:\n{stdout}");
    assert!(stdout.contains("model predicts classes [0, 2]"), "stdout:\n{stdout}");
}

#[test]
fn config_model_path_is_relative_to_the_config_file() {
    let scratch = Scratch::new("config-dir");
    fs::create_dir_all(scratch.dir.join("etc")).expect("failed to create config dir");
    scratch.write("etc/stump.json", CREDIT_STUMP);
    let config = scratch.write("etc/loanwise.toml", "model_path = \"stump.json\"\n");

    let output = Command::new(env!("CARGO_BIN_EXE_loanwise"))
        .current_dir(&scratch.dir)
        .env_remove("LOANWISE_MODEL_PATH")
        .env_remove("LOANWISE_CONFIG")
        .arg("--config")
        .arg(&config)
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("kind:          decision_tree"), "stdout:\n{stdout}");
}

#[test]
fn rejected_config_file_is_logged() {
    let scratch = Scratch::new("bad-config");
    scratch.write("loanwise.toml", "model = \"typo.onnx\"\n");

    let output = Command::new(env!("CARGO_BIN_EXE_loanwise"))
        .current_dir(&scratch.dir)
        .env_remove("LOANWISE_MODEL_PATH")
        .env_remove("LOANWISE_CONFIG")
        .env_remove("LOANWISE_LOG")
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (_, stderr) = text(&output);

    assert!(!output.status.success());
    assert!(stderr.contains("ERROR"), "stderr:\n{stderr}");
    assert!(stderr.contains("configuration rejected"), "stderr:\n{stderr}");
    assert!(stderr.contains("invalid config file loanwise.toml"), "stderr:\n{stderr}");
}

#[test]
fn config_file_supplies_the_model_path() {
    let scratch = Scratch::new("config");
    scratch.write("stump.json", CREDIT_STUMP);
    scratch.write("loanwise.toml", "model_path = \"stump.json\"\n");

    let output = Command::new(env!("CARGO_BIN_EXE_loanwise"))
        .current_dir(&scratch.dir)
        .env_remove("LOANWISE_MODEL_PATH")
        .env_remove("LOANWISE_CONFIG")
        .arg("info")
        .output()
        .expect("failed to run loanwise binary");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("path:          stump.json"));
}

#[test]
fn interactive_form_over_stdin() {
    let scratch = Scratch::new("form");

    let mut child = loanwise(&scratch, &credit_logit_onnx())
        .arg("form")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn loanwise binary");
    {
        let mut stdin = child.stdin.take().expect("stdin is piped");
        let answers = "\n".repeat(9) + "1\nUrban\nn\n";
        stdin
            .write_all(answers.as_bytes())
            .expect("failed to write answers");
    }
    let output = child.wait_with_output().expect("failed to wait for loanwise");
    let (stdout, stderr) = text(&output);

    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("Model loaded successfully!"));
    assert!(stdout.contains("You are Eligible for the loan."), "stdout:\n{stdout}");
}
