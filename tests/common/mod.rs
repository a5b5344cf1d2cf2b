//! Shared helpers for integration tests
//!
//! Archive builders, wiremock release endpoints and delegate scripts.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use easygit::config::InstallerConfig;
use flate2::Compression;
use flate2::write::GzEncoder;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VERSION: &str = "1.2.3";
pub const FAKE_BINARY: &[u8] = b"#!/bin/sh\necho easygit\n";

/// Config pointing at a mock host and a temp install dir
pub fn test_config(host: &str, install_dir: &Path) -> InstallerConfig {
    InstallerConfig {
        host: host.to_string(),
        version: VERSION.to_string(),
        install_dir: install_dir.to_path_buf(),
        skip_install: false,
        max_redirects: 5,
    }
}

/// `.tar.gz` holding `entries` at its root, all with mode 0644
pub fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Like [`tar_gz`], but names are written byte for byte, `..` included
pub fn tar_gz_raw_names(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.as_mut_bytes()[..name.len()].copy_from_slice(name.as_bytes());
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append(&header, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// `.zip` holding `entries` at its root
pub fn zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Serve `body` at `route` with status 200
pub async fn mock_archive(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Serve `status` with no body at `route`
pub async fn mock_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// `/hop/0 -> /hop/1 -> ... -> /hop/{hops}`, the last one serving `body`
pub async fn mock_redirect_chain(server: &MockServer, hops: usize, body: &[u8]) {
    for i in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{i}")))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/hop/{}", i + 1)),
            )
            .mount(server)
            .await;
    }
    mock_archive(server, &format!("/hop/{hops}"), body.to_vec()).await;
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

/// Write an executable `/bin/sh` script at `path`
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}
