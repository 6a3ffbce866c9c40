//! Integration tests for the Neo Notes archive container.

mod common;

use panink::ir::io_neonotes::from_neonotes_archive_slice;
use panink::ir::MetaValue;

#[test]
fn matching_entries_decode_in_entry_order() {
    let page_one = common::sample_page_bytes(609, 15, &[(10.0, 10.0, 0.5, 0)]);
    let page_two = common::sample_page_bytes(609, 79, &[(12.0, 14.0, 0.5, 0)]);
    let archive = common::zip_bytes(&[
        ("notebook/page_one.data", &page_one),
        ("notebook/readme.txt", b"not a page"),
        ("notebook/page_two.data", &page_two),
    ]);

    let pages = from_neonotes_archive_slice(&archive).expect("decode archive");

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].metadata.get("pageNo"), Some(&MetaValue::Int(15)));
    assert_eq!(pages[1].metadata.get("pageNo"), Some(&MetaValue::Int(79)));
}

#[test]
fn a_malformed_entry_does_not_abort_the_archive() {
    let good = common::sample_page_bytes(609, 4, &[(10.0, 10.0, 0.5, 0)]);
    let archive = common::zip_bytes(&[
        ("broken.data", &[0x01, 0x02, 0x03]),
        ("good.data", &good),
    ]);

    let pages = from_neonotes_archive_slice(&archive).expect("decode archive");

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].metadata.get("pageNo"), Some(&MetaValue::Int(4)));
}

#[test]
fn an_archive_without_matching_entries_is_empty() {
    let archive = common::zip_bytes(&[("cover.png", b"\x89PNG"), ("notes.txt", b"hello")]);

    let pages = from_neonotes_archive_slice(&archive).expect("decode archive");
    assert!(pages.is_empty());
}

#[test]
fn garbage_bytes_are_an_archive_error() {
    assert!(from_neonotes_archive_slice(b"definitely not a zip").is_err());
}
