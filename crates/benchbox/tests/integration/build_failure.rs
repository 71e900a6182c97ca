use benchbox::ExecuteError;

use super::test_executor;

const JAVA_BROKEN: &[u8] = b"public class Main {
    public static void main(String[] args) {
        System.out.println(\"Hello\")
    }
}
";

const GO_BROKEN: &[u8] = b"package main

func main() {
\tundefinedFunction()
}
";

#[tokio::test]
async fn java_compile_error_is_build_failure_with_diagnostics() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let err = executor.execute(JAVA_BROKEN, "java").await.unwrap_err();
    assert!(matches!(err, ExecuteError::Build { .. }));
    // The compiler diagnostic must reach the caller
    assert!(err.to_string().contains("error"));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn go_compile_error_is_build_failure_with_diagnostics() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let err = executor.execute(GO_BROKEN, "go").await.unwrap_err();
    assert!(matches!(err, ExecuteError::Build { .. }));
    assert!(err.to_string().contains("undefinedFunction"));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}
