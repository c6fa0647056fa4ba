//! Testing utilities for the Crop Doctor workspace
//!
//! Image fixtures and a hand-built multipart body for exercising the
//! analysis endpoint without a real HTTP client.

#![allow(missing_docs)]

use crop_core::api::{IMAGE_FIELD, LANGUAGE_FIELD};
use crop_core::Language;
use std::path::{Path, PathBuf};

/// Smallest byte sequence most tools recognise as a JPEG (SOI, JFIF APP0, EOI)
pub fn sample_jpeg() -> Vec<u8> {
    vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
        0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
    ]
}

/// PNG signature followed by an IHDR chunk header
pub fn sample_png() -> Vec<u8> {
    vec![
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ]
}

/// Write `bytes` to `dir/name` and return the path
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Temp dir holding `leaf.jpg`, `leaf.png` and `notes.txt`
pub fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "leaf.jpg", &sample_jpeg());
    write_fixture(dir.path(), "leaf.png", &sample_png());
    write_fixture(dir.path(), "notes.txt", b"not an image");
    dir
}

#[derive(Debug, Clone)]
enum Field {
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    Text {
        name: String,
        value: String,
    },
}

/// `multipart/form-data` body built part by part
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    fields: Vec<Field>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "crop-doctor-test-boundary".to_string(),
            fields: Vec::new(),
        }
    }

    /// `image` part plus the `language` text part, as the client sends them
    pub fn analyze_request(bytes: Vec<u8>, language: Language) -> Self {
        Self::new()
            .file(IMAGE_FIELD, "leaf.jpg", "image/jpeg", bytes)
            .text(LANGUAGE_FIELD, language.code())
    }

    pub fn file(
        mut self,
        name: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(Field::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields.push(Field::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Value for the `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for field in &self.fields {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match field {
                Field::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(bytes);
                }
                Field::Text { name, value } => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}
