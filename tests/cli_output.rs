//! Tests for CLI output formatting.
//!
//! - JSON output with --json flag
//! - Pretty-print output as default

use openproject::{Attachment, Collection, PrettyPrint, User, WorkPackage};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_round_trips_work_package() {
    let wp = make_test_work_package();
    let json_output = serde_json::to_string_pretty(&wp).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["subject"], "Fix login redirect");
    assert_eq!(parsed["_links"]["status"]["title"], "In progress");
}

#[test]
fn test_json_output_keeps_custom_fields() {
    // Unknown attributes must survive a decode/encode cycle
    let wp = make_test_work_package();
    let parsed = serde_json::to_value(&wp).unwrap();

    assert_eq!(parsed["customField12"], "Sprint 4");
    assert_eq!(parsed["lockVersion"], 3);
}

#[test]
fn test_json_output_for_collection_is_hal() {
    let page = Collection::new(vec![make_test_user(), make_test_user()], 10, 1, 2);
    let parsed = serde_json::to_value(&page).unwrap();

    assert_eq!(parsed["_type"], "Collection");
    assert_eq!(parsed["total"], 10);
    assert_eq!(parsed["pageSize"], 2);
    assert_eq!(parsed["_embedded"]["elements"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let wp = make_test_work_package();
    let pretty_output = wp.pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(parse_result.is_err(), "Default output should NOT be valid JSON");
}

#[test]
fn test_work_package_pretty_print_shows_key_fields() {
    let output = make_test_work_package().pretty_print();

    assert!(output.starts_with("Work package #1528"), "Should show ID: {output}");
    assert!(output.contains("Fix login redirect"), "Should show subject");
    assert!(output.contains("In progress"), "Should show status");
    assert!(output.contains("Demo project"), "Should show project");
    assert!(output.contains("2024-03-01 → 2024-03-15"), "Should show dates");
    assert!(output.contains("40%"), "Should show progress");
}

#[test]
fn test_user_pretty_print_shows_key_fields() {
    let output = make_test_user().pretty_print();

    assert!(output.contains("Ada Lovelace"));
    assert!(output.contains("Login:"));
    assert!(output.contains("ada@example.com"));
    assert!(output.contains("Admin:          no"));
}

#[test]
fn test_attachment_pretty_print_shows_digest() {
    let attachment: Attachment = serde_json::from_value(serde_json::json!({
        "_type": "Attachment",
        "id": 3,
        "fileName": "report.pdf",
        "fileSize": 2048,
        "contentType": "application/pdf",
        "digest": { "algorithm": "md5", "hash": "64c26a8403cd796ea4cf913cda2ee4a9" }
    }))
    .unwrap();

    let output = attachment.pretty_print();

    assert!(output.contains("report.pdf"));
    assert!(output.contains("2048 bytes"));
    assert!(output.contains("md5:64c26a8403cd796ea4cf913cda2ee4a9"));
}

#[test]
fn test_list_pretty_print_is_table() {
    // The table output from `tabled` contains column headers
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct TestRow {
        id: u64,
        subject: String,
    }

    let rows = vec![
        TestRow {
            id: 1,
            subject: "First".to_string(),
        },
        TestRow {
            id: 2,
            subject: "Second".to_string(),
        },
    ];

    let table_output = Table::new(rows).to_string();

    assert!(table_output.contains("id"), "Should have column headers");
    assert!(table_output.contains("subject"), "Should have column headers");
    assert!(table_output.contains("Second"));
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_work_package() -> WorkPackage {
    serde_json::from_value(serde_json::json!({
        "_type": "WorkPackage",
        "id": 1528,
        "subject": "Fix login redirect",
        "startDate": "2024-03-01",
        "dueDate": "2024-03-15",
        "percentageDone": 40,
        "lockVersion": 3,
        "customField12": "Sprint 4",
        "_links": {
            "status": { "href": "/api/v3/statuses/7", "title": "In progress" },
            "project": { "href": "/api/v3/projects/1", "title": "Demo project" }
        }
    }))
    .unwrap()
}

fn make_test_user() -> User {
    serde_json::from_value(serde_json::json!({
        "_type": "User",
        "id": 5,
        "name": "Ada Lovelace",
        "login": "ada",
        "email": "ada@example.com",
        "admin": false,
        "status": "active"
    }))
    .unwrap()
}
