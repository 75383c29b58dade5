use serde_json::json;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// Runs the binary in an empty directory with an isolated home so no user
/// configuration leaks into the test.
async fn run_codebrain(api_url: &str, args: &[&str]) -> Output {
    let sandbox = TempDir::new().expect("Failed to create temp dir");

    Command::new(env!("CARGO_BIN_EXE_codebrain"))
        .args(args)
        .current_dir(sandbox.path())
        .env("HOME", sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join(".config"))
        .env("CODEBRAIN_API_URL", api_url)
        .env("NO_COLOR", "1")
        .env_remove("CODEBRAIN_API_PREFIX")
        .env_remove("CODEBRAIN_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute codebrain command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn task_body(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "description": "Audit login screen",
        "status": status,
        "created_at": "2024-05-01T09:00:00.000001"
    })
}

mod version_command_tests {
    use super::*;

    #[tokio::test]
    async fn test_version_command_basic() {
        let output = run_codebrain(UNREACHABLE_API, &["version"]).await;

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout(&output).contains("codebrain 0.1.0"));
    }

    #[tokio::test]
    async fn test_version_command_json() {
        let output = run_codebrain(UNREACHABLE_API, &["version", "--format", "json"]).await;

        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(value["version"], "0.1.0");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let output = run_codebrain(UNREACHABLE_API, &["--help"]).await;
        let out = stdout(&output);

        assert!(output.status.success());
        for command in ["playbooks", "tasks", "report", "config", "version"] {
            assert!(out.contains(command), "help should mention '{}'", command);
        }
    }
}

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_playbook_rejected_before_network() {
        let output = run_codebrain(
            UNREACHABLE_API,
            &["playbooks", "create", "--name", "  ", "--content", "# Steps"],
        )
        .await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Please fill in all fields"));
        assert!(!stderr(&output).contains("Failed to save playbook"));
    }

    #[tokio::test]
    async fn test_blank_task_rejected_before_network() {
        let output = run_codebrain(UNREACHABLE_API, &["tasks", "create", "   "]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Please describe the task"));
    }

    #[tokio::test]
    async fn test_invalid_api_url() {
        let output = run_codebrain("ftp://example.com", &["playbooks", "list"]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("api.base_url"));
    }

    #[tokio::test]
    async fn test_unreachable_server_message() {
        let output = run_codebrain(UNREACHABLE_API, &["playbooks", "list"]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Failed to load playbooks. Please try again."));
    }
}

mod server_tests {
    use super::*;

    #[tokio::test]
    async fn test_playbooks_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/playbooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "pb-1", "name": "Mobile audit", "content": "# Screens", "created_at": "2024-01-01T00:00:00"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["playbooks", "list"]).await;

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("Mobile audit"));
        assert!(stdout(&output).contains("Total: 1 playbooks"));
    }

    #[tokio::test]
    async fn test_playbooks_list_empty_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/playbooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["playbooks"]).await;

        assert!(output.status.success());
        assert!(stdout(&output).contains("No playbooks found. Create one to get started."));
    }

    #[tokio::test]
    async fn test_delete_failure_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/playbooks/pb-1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/playbooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["playbooks", "delete", "pb-1"]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Failed to delete playbook. Please try again."));
    }

    #[tokio::test]
    async fn test_create_task_then_show() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .and(body_json(json!({"description": "Audit login screen"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "pending")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "pending")))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["tasks", "create", "Audit login screen"]).await;

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let out = stdout(&output);
        assert!(out.contains("Created task t1"));
        assert!(out.contains("Pending"));
    }

    #[tokio::test]
    async fn test_confirm_refused_unless_awaiting_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "planning")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks/t1/confirm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "in_progress")))
            .expect(0)
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["tasks", "confirm", "t1"]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("not awaiting confirmation"));
    }

    #[tokio::test]
    async fn test_confirm_awaiting_task() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(task_body("t1", "awaiting_confirmation")),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks/t1/confirm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "in_progress")))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["tasks", "confirm", "t1"]).await;

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("Plan confirmed"));
        assert!(stdout(&output).contains("In progress"));
    }

    #[tokio::test]
    async fn test_respond_sends_input_as_typed() {
        let server = MockServer::start().await;
        let mut waiting = task_body("t1", "in_progress");
        waiting["messages"] = json!([{"role": "assistant", "content": "Which OS versions?"}]);

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(waiting))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks/t1/interact"))
            .and(body_json(json!({"input": "iOS 16+"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "in_progress")))
            .expect(1)
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["tasks", "respond", "t1", "iOS 16+"]).await;

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("Response sent"));
    }

    #[tokio::test]
    async fn test_show_missing_task() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})))
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["tasks", "show", "nope"]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Task not found"));
    }

    #[tokio::test]
    async fn test_report_renders_analysis() {
        let server = MockServer::start().await;
        let mut completed = task_body("t1", "completed");
        completed["results"] = json!({
            "ui_impacts": {"src/Foo.tsx": ["changed layout"]},
            "compatibility_requirements": {},
            "status": "completed"
        });
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completed))
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["report", "t1"]).await;
        let out = stdout(&output);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(out.contains("UI changes detected - compatibility testing recommended"));
        assert!(out.contains("src/Foo.tsx"));
        assert!(out.contains("changed layout"));
        assert!(out.contains("No specific compatibility testing requirements identified."));
    }

    #[tokio::test]
    async fn test_report_requires_completed_task() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body("t1", "in_progress")))
            .mount(&server)
            .await;

        let output = run_codebrain(&server.uri(), &["report", "t1"]).await;

        assert!(!output.status.success());
        assert!(stderr(&output).contains("no analysis results yet"));
    }
}

mod config_command_tests {
    use super::*;

    #[tokio::test]
    async fn test_config_show_json() {
        let output = run_codebrain(
            "http://codebrain.test:8000",
            &["config", "show", "--format", "json", "--api-prefix", ""],
        )
        .await;

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(value["api"]["base_url"], "http://codebrain.test:8000");
        assert_eq!(value["api"]["path_prefix"], "");
    }

    #[tokio::test]
    async fn test_config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("config.toml");
        let target = target.to_str().unwrap();

        let first = run_codebrain(UNREACHABLE_API, &["config", "init", "--path", target]).await;
        assert!(first.status.success(), "stderr: {}", stderr(&first));
        assert!(std::path::Path::new(target).exists());

        let second = run_codebrain(UNREACHABLE_API, &["config", "init", "--path", target]).await;
        assert!(!second.status.success());
        assert!(stderr(&second).contains("already exists"));
    }
}
