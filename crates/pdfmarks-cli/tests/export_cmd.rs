//! Integration tests for the `export` and `dump_data` subcommands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cmd() -> Command {
    Command::cargo_bin("pdfmarks").unwrap()
}

/// Create a two-page PDF with a nested outline:
/// Chapter 1 (page 1, FitH 700) > Section 1.1 (page 2, XYZ 150%), Chapter 2 (page 2, Fit).
/// `with_outline = false` leaves out /Outlines entirely.
fn test_pdf(with_outline: bool) -> Vec<u8> {
    use lopdf::{Object, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_ids: Vec<_> = (0..2)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => 2,
        }),
    );

    let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => pages_id };
    if with_outline {
        let outlines_id = doc.new_object_id();
        let ch1 = doc.new_object_id();
        let sec = doc.new_object_id();
        let ch2 = doc.new_object_id();
        doc.objects.insert(
            ch1,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Chapter 1"),
                "Parent" => outlines_id,
                "Next" => ch2,
                "First" => sec,
                "Last" => sec,
                "Count" => 1,
                "Dest" => vec![page_ids[0].into(), "FitH".into(), 700.into()],
            }),
        );
        doc.objects.insert(
            sec,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Section 1.1"),
                "Parent" => ch1,
                "Dest" => vec![page_ids[1].into(), "XYZ".into(), Object::Null, 500.into(), Object::Real(1.5)],
            }),
        );
        doc.objects.insert(
            ch2,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Chapter 2"),
                "Parent" => outlines_id,
                "Prev" => ch1,
                "A" => dictionary! {
                    "S" => "GoTo",
                    "D" => vec![page_ids[1].into(), "Fit".into()],
                },
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => ch1,
                "Last" => ch2,
                "Count" => 2,
            }),
        );
        catalog.set("Outlines", outlines_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// PDF standard padding bytes.
const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];

/// Simple RC4 for test encryption.
fn rc4_transform(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j: usize = 0;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) & 0xFF;
        s.swap(i, j);
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i: usize = 0;
    j = 0;
    for &byte in data {
        i = (i + 1) & 0xFF;
        j = (j + s[i] as usize) & 0xFF;
        s.swap(i, j);
        out.push(byte ^ s[(s[i] as usize + s[j] as usize) & 0xFF]);
    }
    out
}

fn encrypt_object(key: &[u8], obj: &mut lopdf::Object) {
    use lopdf::Object;

    match obj {
        Object::String(content, _) => *content = rc4_transform(key, content),
        Object::Stream(stream) => {
            let encrypted = rc4_transform(key, &stream.content);
            stream.set_content(encrypted);
        }
        Object::Array(items) => items.iter_mut().for_each(|item| encrypt_object(key, item)),
        Object::Dictionary(dict) => dict.iter_mut().for_each(|(_, value)| encrypt_object(key, value)),
        _ => {}
    }
}

/// The outlined test PDF, protected by `user_password` (40-bit RC4).
fn encrypted_test_pdf(user_password: &[u8]) -> Vec<u8> {
    use lopdf::{Object, StringFormat, dictionary};

    let file_id = b"testfileid123456";
    let permissions: i32 = -4;

    let mut padded_pw = Vec::with_capacity(32);
    let pw_len = user_password.len().min(32);
    padded_pw.extend_from_slice(&user_password[..pw_len]);
    padded_pw.extend_from_slice(&PAD_BYTES[..32 - pw_len]);

    let o_key_digest = md5::compute(&padded_pw);
    let o_value = rc4_transform(&o_key_digest[..5], &padded_pw);

    let mut key_input = Vec::with_capacity(128);
    key_input.extend_from_slice(&padded_pw);
    key_input.extend_from_slice(&o_value);
    key_input.extend_from_slice(&(permissions as u32).to_le_bytes());
    key_input.extend_from_slice(file_id);
    let key_digest = md5::compute(&key_input);
    let enc_key = key_digest[..5].to_vec();
    let u_value = rc4_transform(&enc_key, &PAD_BYTES);

    let mut doc = lopdf::Document::load_mem(&test_pdf(true)).unwrap();
    for (&obj_id, obj) in doc.objects.iter_mut() {
        let mut obj_key_input = Vec::with_capacity(10);
        obj_key_input.extend_from_slice(&enc_key);
        obj_key_input.extend_from_slice(&obj_id.0.to_le_bytes()[..3]);
        obj_key_input.extend_from_slice(&obj_id.1.to_le_bytes()[..2]);
        let obj_key_digest = md5::compute(&obj_key_input);
        encrypt_object(&obj_key_digest[..10], obj);
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1_i64,
        "R" => 2_i64,
        "Length" => 40_i64,
        "O" => Object::String(o_value, StringFormat::Literal),
        "U" => Object::String(u_value, StringFormat::Literal),
        "P" => permissions as i64,
    });
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(file_id.to_vec(), StringFormat::Literal),
            Object::String(file_id.to_vec(), StringFormat::Literal),
        ]),
    );

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

const EXPECTED: &str = "\
BookmarkBegin
BookmarkTitle: Chapter 1
BookmarkLevel: 1
BookmarkPageNumber: 1
BookmarkYOffset: 700
BookmarkZoom: FitWidth
BookmarkBegin
BookmarkTitle: Section 1.1
BookmarkLevel: 2
BookmarkPageNumber: 2
BookmarkYOffset: 500
BookmarkZoom: 150%
BookmarkBegin
BookmarkTitle: Chapter 2
BookmarkLevel: 1
BookmarkPageNumber: 2
BookmarkZoom: FitPage
";

#[test]
fn export_to_stdout() {
    let pdf = write_temp_pdf(&test_pdf(true));
    cmd()
        .arg("export")
        .arg(pdf.path())
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn export_to_output_file() {
    let pdf = write_temp_pdf(&test_pdf(true));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bookmarks.txt");
    cmd()
        .arg("export")
        .arg(pdf.path())
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    assert_eq!(std::fs::read_to_string(&out).unwrap(), EXPECTED);
}

#[test]
fn export_with_bookmarks_flag() {
    let pdf = write_temp_pdf(&test_pdf(true));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("marks.txt");
    cmd()
        .arg("export")
        .arg(pdf.path())
        .arg("--bookmarks")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), EXPECTED);
}

#[test]
fn dump_data_alias() {
    let pdf = write_temp_pdf(&test_pdf(true));
    cmd()
        .arg("dump_data")
        .arg(pdf.path())
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn no_outline_prints_nothing() {
    let pdf = write_temp_pdf(&test_pdf(false));
    cmd()
        .arg("export")
        .arg(pdf.path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn encrypted_export_with_password() {
    let pdf = write_temp_pdf(&encrypted_test_pdf(b"testpass"));
    cmd()
        .arg("export")
        .arg(pdf.path())
        .args(["--password", "testpass"])
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn encrypted_export_without_password_fails() {
    let pdf = write_temp_pdf(&encrypted_test_pdf(b"testpass"));
    cmd()
        .arg("export")
        .arg(pdf.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password"));
}

#[test]
fn encrypted_export_with_wrong_password_fails() {
    let pdf = write_temp_pdf(&encrypted_test_pdf(b"testpass"));
    cmd()
        .arg("export")
        .arg(pdf.path())
        .args(["--password", "wrongpass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password is incorrect"));
}

#[test]
fn max_depth_limits_levels() {
    let pdf = write_temp_pdf(&test_pdf(true));
    cmd()
        .arg("export")
        .arg(pdf.path())
        .args(["--max-depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 2"))
        .stdout(predicate::str::contains("Section 1.1").not())
        .stderr(predicate::str::contains("max_depth"));
}

#[test]
fn missing_file_fails() {
    cmd()
        .args(["export", "/nonexistent/file.pdf"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: file not found"));
}

#[test]
fn invalid_pdf_fails() {
    let file = write_temp_pdf(b"this is not a pdf");
    cmd()
        .arg("export")
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to open PDF"));
}
