use benchbox::ExecuteError;

use super::test_config;
use benchbox::Executor;

const GO_INFINITE_LOOP: &[u8] = b"package main

import \"fmt\"

func main() {
\tfmt.Println(\"spinning\")
\tfor {
\t}
}
";

#[tokio::test]
#[ignore = "waits out the full deadline"]
async fn infinite_loop_times_out_and_names_the_deadline() {
    let root = tempfile::tempdir().unwrap();
    let mut config = test_config(root.path());
    config.deadline_secs = 30;
    let executor = Executor::with_docker(config);

    let err = executor.execute(GO_INFINITE_LOOP, "go").await.unwrap_err();
    assert!(matches!(err, ExecuteError::Timeout { .. }));
    assert!(err.to_string().contains("timed out after 30s"));

    // Workspace is gone even on timeout
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);

    // And so is the container: nothing tagged by this executor is still
    // running once the call returns
    let stale = tokio::process::Command::new("docker")
        .args(["ps", "-q", "--filter", "name=go-bench-"])
        .output()
        .await
        .unwrap();
    assert!(
        stale.stdout.is_empty(),
        "a container outlived the timed-out call: {}",
        String::from_utf8_lossy(&stale.stdout)
    );
}
