//! Output formatting tests.

use cfops::{Completed, JobHandle, Organization, PrettyPrint, Space, SpaceQuota};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_organization_serializes_to_json() {
    let org = make_test_organization();

    let json_output = serde_json::to_string_pretty(&org).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();

    assert_eq!(parsed["id"], "org-guid-1");
    assert_eq!(parsed["name"], "test-org");
    assert_eq!(parsed["status"], "active");
}

#[test]
fn test_space_json_roundtrips_through_model() {
    let space = make_test_space();

    let json_output = serde_json::to_string(&space).unwrap();
    let parsed: Space = serde_json::from_str(&json_output).unwrap();

    assert_eq!(parsed, space);
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let org = make_test_organization();
    let pretty_output = org.pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(
        parse_result.is_err(),
        "Default output should NOT be valid JSON"
    );
}

#[test]
fn test_organization_pretty_print_shows_key_fields() {
    let output = make_test_organization().pretty_print();

    assert!(output.starts_with("Organization: test-org"));
    assert!(output.contains("org-guid-1"), "Should show GUID");
    assert!(output.contains("active"), "Should show status");
}

#[test]
fn test_space_pretty_print_shows_ssh_state() {
    let output = make_test_space().pretty_print();

    assert!(output.starts_with("Space: dev"));
    assert!(output.contains("Organization:   org-guid-1"));
    assert!(output.contains("SSH:            enabled"));
}

#[test]
fn test_space_quota_pretty_print_shows_limits() {
    let output = make_test_space_quota().pretty_print();

    assert!(output.contains("Total Memory:   1024M"));
    assert!(output.contains("App Instances:  unlimited"));
    assert!(output.contains("Paid Plans:     allowed"));
}

#[test]
fn test_completed_pretty_print_names_job() {
    let immediate: Completed<()> = Completed::Immediate(());
    let job: Completed<()> = Completed::Job(JobHandle::new("job-42"));

    assert_eq!(immediate.pretty_print(), "OK");
    assert_eq!(job.pretty_print(), "OK (job job-42)");
}

#[test]
fn test_list_pretty_print_is_table() {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct TestRow {
        name: String,
        guid: String,
    }

    let rows = vec![
        TestRow {
            name: "dev".to_string(),
            guid: "space-1".to_string(),
        },
        TestRow {
            name: "prod".to_string(),
            guid: "space-2".to_string(),
        },
    ];

    let table_output = Table::new(rows).to_string();

    assert!(table_output.contains("name"), "Should have column headers");
    assert!(table_output.contains("guid"), "Should have column headers");
    assert!(table_output.contains("prod"));
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_organization() -> Organization {
    serde_json::from_value(serde_json::json!({
        "id": "org-guid-1",
        "name": "test-org",
        "status": "active",
        "quota_definition_id": "quota-def-1",
        "created_at": "2024-01-15T10:30:00Z"
    }))
    .unwrap()
}

fn make_test_space() -> Space {
    serde_json::from_value(serde_json::json!({
        "id": "space-guid-1",
        "name": "dev",
        "organization_id": "org-guid-1",
        "allow_ssh": true
    }))
    .unwrap()
}

fn make_test_space_quota() -> SpaceQuota {
    serde_json::from_value(serde_json::json!({
        "id": "quota-guid-1",
        "name": "small",
        "paid_service_plans": true,
        "total_services": 10,
        "total_routes": 20,
        "total_memory_limit": 1024,
        "instance_memory_limit": 512,
        "app_instance_limit": -1
    }))
    .unwrap()
}
