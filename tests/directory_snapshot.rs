use insta::assert_debug_snapshot;

use gaze::engine::ProcessDirectory;
use gaze::remote::wire::decode_processes;

const LISTING: &str = r#"[
    {"pid": 1, "name": "Chrome", "cpu": 12.5, "memory": 4.0},
    {"pid": 2, "name": "systemd", "cpu": 0.1},
    {"pid": 3, "name": "chromium-sandbox", "cpu": 0.0},
    {"pid": 1, "name": "Chrome Helper", "cpu": 3.0},
    {"pid": 4, "cpu": 1.0}
]"#;

fn rows(directory: &ProcessDirectory) -> Vec<(u32, Option<String>)> {
    directory
        .visible()
        .into_iter()
        .map(|e| (e.pid, e.name))
        .collect()
}

#[test]
fn filtered_listing_snapshot() {
    let entries = decode_processes(LISTING.as_bytes()).unwrap();
    let mut directory = ProcessDirectory::new();
    let ticket = directory.begin_refresh();
    directory.complete_refresh(ticket, Ok(entries)).unwrap();
    assert_eq!(directory.len(), 4);

    directory.set_filter("CHR");
    assert_debug_snapshot!("filtered_listing", rows(&directory));
}
