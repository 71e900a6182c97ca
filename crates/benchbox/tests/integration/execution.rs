use benchbox::ExecuteError;

use super::test_executor;

const JAVA_HELLO: &[u8] = b"public class Main {
    public static void main(String[] args) {
        System.out.println(\"Hello\");
    }
}
";

const GO_HELLO: &[u8] = b"package main

import \"fmt\"

func main() {
\tfmt.Println(\"Hello\")
}
";

const GO_CHATTY: &[u8] = b"package main

import \"fmt\"

func main() {
\tfor i := 0; i < 10000; i++ {
\t\tfmt.Print(\"x\")
\t}
}
";

#[tokio::test]
async fn java_hello_prints_constant() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let result = executor.execute(JAVA_HELLO, "java").await.unwrap();
    assert_eq!(result.output, b"Hello\n");
    assert!(!result.truncated);
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn go_hello_prints_constant() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let result = executor.execute(GO_HELLO, "go").await.unwrap();
    assert_eq!(result.output, b"Hello\n");
    assert!(!result.truncated);
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unsupported_language_has_no_side_effects() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let err = executor.execute(b"anything", "python").await.unwrap_err();
    assert_eq!(err.to_string(), "unsupported language: python");
    assert!(matches!(err, ExecuteError::UnsupportedLanguage(_)));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn long_output_is_truncated_to_max() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let result = executor.execute(GO_CHATTY, "go").await.unwrap();
    assert_eq!(result.output.len(), 4096);
    assert!(result.truncated);
    assert!(result.output.iter().all(|&b| b == b'x'));
}

#[tokio::test]
async fn sequential_executions_both_succeed() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());

    let first = executor.execute(GO_HELLO, "go").await.unwrap();
    let second = executor.execute(GO_HELLO, "go").await.unwrap();
    assert_eq!(first.output, b"Hello\n");
    assert_eq!(second.output, b"Hello\n");
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
#[ignore = "pulls every configured base image"]
async fn prefetch_base_images_succeeds() {
    let root = tempfile::tempdir().unwrap();
    let executor = test_executor(root.path());
    executor.prefetch_base_images().await.unwrap();
}
