use std::path::PathBuf;

use courier::handler::{Route, Router};
use courier::http::request::{Request, RequestBuilder};
use courier::http::response::StatusCode;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("courier-router-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn get(target: &str) -> Request {
    RequestBuilder::new().method("GET").target(target).build()
}

fn get_with_agent(target: &str, agent: &str) -> Request {
    RequestBuilder::new()
        .method("GET")
        .target(target)
        .header("User-Agent", agent)
        .build()
}

#[tokio::test]
async fn test_root_is_empty_ok() {
    let (route, response) = Router::default().handle(&get("/")).await;

    assert_eq!(route, Route::Root);
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, None);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_root_wins_over_user_agent() {
    let (route, _) = Router::default().handle(&get_with_agent("/", "curl/8")).await;
    assert_eq!(route, Route::Root);
}

#[tokio::test]
async fn test_echo_returns_rest_of_path() {
    let (route, response) = Router::default().handle(&get("/echo/abc")).await;

    assert_eq!(route, Route::Echo("abc".to_string()));
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, Some("text/plain"));
    assert_eq!(response.body, b"abc".to_vec());
}

#[tokio::test]
async fn test_echo_empty_payload() {
    let (route, response) = Router::default().handle(&get("/echo/")).await;

    assert_eq!(route, Route::Echo(String::new()));
    assert_eq!(response.content_length(), 0);
    assert_eq!(response.content_type, Some("text/plain"));
}

#[tokio::test]
async fn test_echo_wins_over_user_agent() {
    let (_, response) = Router::default()
        .handle(&get_with_agent("/echo/mine", "curl/8"))
        .await;
    assert_eq!(response.body, b"mine".to_vec());
}

#[tokio::test]
async fn test_user_agent_reflected_on_unmatched_path() {
    let (route, response) = Router::default()
        .handle(&get_with_agent("/nope", "curl/8"))
        .await;

    assert_eq!(route, Route::UserAgentEcho("curl/8".to_string()));
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, Some("text/plain"));
    assert_eq!(response.body, b"curl/8".to_vec());
}

#[tokio::test]
async fn test_user_agent_reflected_on_dedicated_path() {
    let (_, response) = Router::default()
        .handle(&get_with_agent("/user-agent", "foobar/1.2.3"))
        .await;
    assert_eq!(response.body, b"foobar/1.2.3".to_vec());
}

#[tokio::test]
async fn test_unmatched_without_user_agent_is_not_found() {
    let (route, response) = Router::default().handle(&get("/nope")).await;

    assert_eq!(route, Route::NotFound);
    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_empty_request_is_not_found() {
    let (route, _) = Router::default().handle(&Request::default()).await;
    assert_eq!(route, Route::NotFound);
}

#[tokio::test]
async fn test_file_served_as_raw_bytes() {
    let dir = scratch_dir("raw");
    let contents = b"line one\r\nline two\nno newline at end\x00\xff".to_vec();
    std::fs::write(dir.join("data.bin"), &contents).unwrap();

    let router = Router::new(Some(dir.clone()));
    let (route, response) = router.handle(&get("/files/data.bin")).await;

    assert_eq!(route, Route::FileGet(dir.join("data.bin")));
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, Some("application/octet-stream"));
    assert_eq!(response.body, contents);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_file_in_subdirectory() {
    let dir = scratch_dir("nested");
    std::fs::create_dir_all(dir.join("docs")).unwrap();
    std::fs::write(dir.join("docs/readme.txt"), b"hello").unwrap();

    let router = Router::new(Some(dir.clone()));
    let (_, response) = router.handle(&get("/files/docs/readme.txt")).await;

    assert_eq!(response.body, b"hello".to_vec());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_empty_file_is_ok_with_zero_length() {
    let dir = scratch_dir("empty");
    std::fs::write(dir.join("empty"), b"").unwrap();

    let router = Router::new(Some(dir.clone()));
    let (_, response) = router.handle(&get("/files/empty")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, Some("application/octet-stream"));
    assert_eq!(response.content_length(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = scratch_dir("missing");

    let router = Router::new(Some(dir.clone()));
    let (route, response) = router.handle(&get("/files/missing.txt")).await;

    assert_eq!(route, Route::NotFound);
    assert_eq!(response.status, StatusCode::NotFound);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_missing_file_falls_back_to_user_agent() {
    let dir = scratch_dir("fallback");

    let router = Router::new(Some(dir.clone()));
    let (route, response) = router
        .handle(&get_with_agent("/files/missing.txt", "curl/8"))
        .await;

    assert_eq!(route, Route::UserAgentEcho("curl/8".to_string()));
    assert_eq!(response.body, b"curl/8".to_vec());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_present_file_wins_over_user_agent() {
    let dir = scratch_dir("precedence");
    std::fs::write(dir.join("a.txt"), b"file body").unwrap();

    let router = Router::new(Some(dir.clone()));
    let (_, response) = router
        .handle(&get_with_agent("/files/a.txt", "curl/8"))
        .await;

    assert_eq!(response.body, b"file body".to_vec());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_files_without_root_is_not_found() {
    let (route, response) = Router::new(None).handle(&get("/files/missing.txt")).await;

    assert_eq!(route, Route::NotFound);
    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_directory_is_not_served() {
    let dir = scratch_dir("directory");
    std::fs::create_dir_all(dir.join("sub")).unwrap();

    let router = Router::new(Some(dir.clone()));
    let (_, response) = router.handle(&get("/files/sub")).await;

    assert_eq!(response.status, StatusCode::NotFound);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_traversal_outside_root_is_not_found() {
    let parent = scratch_dir("traversal");
    let root = parent.join("root");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(parent.join("secret.txt"), b"secret").unwrap();

    let router = Router::new(Some(root));
    let (route, response) = router.handle(&get("/files/../secret.txt")).await;

    assert_eq!(route, Route::NotFound);
    assert_eq!(response.status, StatusCode::NotFound);

    std::fs::remove_dir_all(&parent).unwrap();
}

#[test]
fn test_route_names() {
    assert_eq!(Route::Root.name(), "root");
    assert_eq!(Route::Echo(String::new()).name(), "echo");
    assert_eq!(Route::UserAgentEcho(String::new()).name(), "user-agent");
    assert_eq!(Route::FileGet(PathBuf::new()).name(), "file");
    assert_eq!(Route::NotFound.name(), "not-found");
}
