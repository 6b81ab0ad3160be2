//! Shared fixtures for scaffolding tests

#![allow(dead_code)]

use juno_scaffold::{Prompter, ScaffoldConfig};
use std::collections::VecDeque;
use std::io::{self, Cursor, Write};
use std::path::Path;
use walkdir::WalkDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const EXPORT_ID: &str = "abc123";
pub const TEMPLATE_PATH: &str = "/template.zip";
pub const EXPORT_PATH: &str = "/storage/v1/object/public/exports/abc123";

/// Build a zip in memory. Names ending in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }
    buffer
}

pub fn template_zip() -> Vec<u8> {
    zip_bytes(&[
        ("juno-template-main/", ""),
        ("juno-template-main/index.js", "template index"),
        ("juno-template-main/config.json", "template config"),
        ("juno-template-main/src/app.js", "template app"),
    ])
}

pub fn export_zip() -> Vec<u8> {
    zip_bytes(&[("config.json", "export config"), ("src/generated.js", "generated")])
}

pub async fn mount_zip(server: &MockServer, at: &str, body: Vec<u8>, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Config pointed at the mock server
pub fn config_for(server: &MockServer) -> ScaffoldConfig {
    ScaffoldConfig::default()
        .with_storage_url(&server.uri())
        .unwrap()
        .with_template_url(&format!("{}{}", server.uri(), TEMPLATE_PATH))
        .unwrap()
}

/// Replays canned answers and records the questions asked
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl Scripted {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for Scripted {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer"))
    }
}

/// Relative paths of every file under `root`, sorted
pub fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

pub fn no_zips_left(cwd: &Path) -> bool {
    !cwd.join(format!("template-{}.zip", EXPORT_ID)).exists()
        && !cwd.join(format!("{}.zip", EXPORT_ID)).exists()
}
