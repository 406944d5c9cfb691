//! POST and DELETE against a live server.

use std::fs;

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn gzip_upload_is_stored_decoded() {
    let server = common::TestServer::spawn(|_| {}).await;

    let response = common::raw_client()
        .post(server.url("/notes/today.txt"))
        .header("content-encoding", "gzip")
        .body(common::gzip(b"remember the milk"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = fs::read(server.root.path().join("notes/today.txt")).unwrap();
    assert_eq!(stored, b"remember the milk");
    server.stop().await;
}

#[tokio::test]
async fn plain_upload_truncates_existing_file() {
    let server = common::TestServer::spawn(|_| {}).await;
    fs::write(server.root.path().join("a.txt"), "a much longer original body").unwrap();

    let response = common::raw_client()
        .post(server.url("/a.txt"))
        .body("short")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fs::read(server.root.path().join("a.txt")).unwrap(), b"short");
    server.stop().await;
}

#[tokio::test]
async fn deflate_upload_is_accepted() {
    use std::io::Write;

    let server = common::TestServer::spawn(|_| {}).await;
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(b"zlib payload").unwrap();

    common::raw_client()
        .post(server.url("/z.bin"))
        .header("content-encoding", "deflate")
        .body(encoder.finish().unwrap())
        .send()
        .await
        .unwrap();

    assert_eq!(fs::read(server.root.path().join("z.bin")).unwrap(), b"zlib payload");
    server.stop().await;
}

#[tokio::test]
async fn corrupt_gzip_upload_is_an_internal_error() {
    let server = common::TestServer::spawn(|_| {}).await;

    let response = common::raw_client()
        .post(server.url("/broken.txt"))
        .header("content-encoding", "gzip")
        .body("definitely not gzip")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "Internal Error");
    server.stop().await;
}

#[tokio::test]
async fn delete_removes_files_only() {
    let server = common::TestServer::spawn(|_| {}).await;
    fs::write(server.root.path().join("old.log"), "x").unwrap();
    fs::create_dir(server.root.path().join("keep")).unwrap();
    let client = common::raw_client();

    let removed = client.delete(server.url("/old.log")).send().await.unwrap();
    assert_eq!(removed.status(), StatusCode::OK);
    assert!(!server.root.path().join("old.log").exists());

    let again = client.delete(server.url("/old.log")).send().await.unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let dir = client.delete(server.url("/keep")).send().await.unwrap();
    assert_eq!(dir.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        dir.text().await.unwrap(),
        "Not Allowed: Delete directory is forbidden"
    );
    assert!(server.root.path().join("keep").is_dir());
    server.stop().await;
}

#[tokio::test]
async fn every_response_names_the_server() {
    let server = common::TestServer::spawn(|config| config.app_name = "filebox".into()).await;

    let response = common::raw_client()
        .get(server.url("/missing"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["server"], "filebox");
    server.stop().await;
}

#[cfg(unix)]
#[tokio::test]
async fn delete_refuses_sockets() {
    let server = common::TestServer::spawn(|_| {}).await;
    let socket_path = server.root.path().join("app.sock");
    let _socket = std::os::unix::net::UnixListener::bind(&socket_path).unwrap();

    let response = common::raw_client()
        .delete(server.url("/app.sock"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.text().await.unwrap(),
        "Not Allowed: Access to this resource is not allowed"
    );
    assert!(socket_path.exists());
    server.stop().await;
}

#[tokio::test]
async fn upload_onto_directory_fails_at_create() {
    let server = common::TestServer::spawn(|_| {}).await;
    fs::create_dir(server.root.path().join("photos")).unwrap();

    let response = common::raw_client()
        .post(server.url("/photos"))
        .body("not a directory")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "Internal Error");
    assert!(server.root.path().join("photos").is_dir());
    server.stop().await;
}

#[tokio::test]
async fn upload_below_a_file_fails_at_mkdir() {
    let server = common::TestServer::spawn(|_| {}).await;
    fs::write(server.root.path().join("plain.txt"), "x").unwrap();

    let response = common::raw_client()
        .post(server.url("/plain.txt/child.txt"))
        .body("nested")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "Internal Error");
    assert_eq!(fs::read(server.root.path().join("plain.txt")).unwrap(), b"x");
    server.stop().await;
}
