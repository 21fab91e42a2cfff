//! Router-level tests for the school endpoints.
//!
//! Requests go through the full axum stack with `oneshot`; the database is
//! in-memory SQLite and images land in a temp directory.

mod common;

use axum::http::StatusCode;
use common::harness::{body_bytes, json_body, MAX_UPLOAD_BYTES};
use common::{valid_form, MultipartBody, TestHarness};

/// A submission with one field overridden and the single field expected to fail.
struct RejectionCase {
    name: &'static str,
    field: &'static str,
    value: &'static str,
    expected_message: &'static str,
}

const REJECTION_CASES: &[RejectionCase] = &[
    RejectionCase {
        name: "pincode_five_digits",
        field: "pincode",
        value: "12345",
        expected_message: "Pincode must be 6 digits",
    },
    RejectionCase {
        name: "pincode_with_letters",
        field: "pincode",
        value: "41100A",
        expected_message: "Pincode must be 6 digits",
    },
    RejectionCase {
        name: "email_without_tld",
        field: "email",
        value: "office@school",
        expected_message: "Please enter a valid email address",
    },
    RejectionCase {
        name: "phone_too_short",
        field: "phone",
        value: "12345",
        expected_message: "Please enter a valid phone number",
    },
    RejectionCase {
        name: "name_single_char",
        field: "name",
        value: "A",
        expected_message: "School name must be at least 2 characters",
    },
    RejectionCase {
        name: "address_too_short",
        field: "address",
        value: "Main Rd",
        expected_message: "Address must be at least 10 characters",
    },
    RejectionCase {
        name: "city_blank",
        field: "city",
        value: "   ",
        expected_message: "City is required",
    },
];

#[tokio::test]
async fn test_single_field_rejections() {
    for case in REJECTION_CASES {
        let harness = TestHarness::new().await;
        let mut form = valid_form("Greenwood High", "Pune", "MH");
        assert!(form.set(case.field, case.value.to_string()));

        let response = harness.post_multipart(MultipartBody::from_form(&form)).await;
        let (status, body) = json_body(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "case {}", case.name);
        let fields = body["fields"].as_object().expect("fields object");
        assert_eq!(fields.len(), 1, "case {}: {:?}", case.name, fields);
        assert_eq!(
            fields[case.field], case.expected_message,
            "case {}",
            case.name
        );

        let (_, listed) = json_body(harness.get("/api/schools").await).await;
        assert_eq!(listed, serde_json::json!([]), "case {}", case.name);
    }
}

#[tokio::test]
async fn test_missing_parts_are_required() {
    let harness = TestHarness::new().await;
    let body = MultipartBody::new().text("name", "Greenwood High");

    let (status, body) = json_body(harness.post_multipart(body).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let fields = body["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 6);
    assert_eq!(fields["email"], "Email is required");
    assert_eq!(fields["pincode"], "Pincode is required");
    assert!(!fields.contains_key("name"));
}

#[tokio::test]
async fn test_create_then_list() {
    let harness = TestHarness::new().await;
    let form = valid_form("Greenwood High", "Pune", "MH");

    let (status, created) =
        json_body(harness.post_multipart(MultipartBody::from_form(&form)).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "School added successfully");
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = json_body(harness.get("/api/schools").await).await;
    assert_eq!(status, StatusCode::OK);
    let records = listed.as_array().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["id"].as_i64(), Some(id));
    assert_eq!(record["name"], "Greenwood High");
    assert_eq!(record["email"], form.email.as_str());
    assert_eq!(record["phone"], form.phone.as_str());
    assert_eq!(record["address"], form.address.as_str());
    assert_eq!(record["city"], "Pune");
    assert_eq!(record["state"], "MH");
    assert_eq!(record["pincode"], "411001");
    assert!(record["image_path"].is_null());
    assert!(record["created_at"].is_string());
}

#[tokio::test]
async fn test_unknown_parts_are_ignored() {
    let harness = TestHarness::new().await;
    let form = valid_form("Greenwood High", "Pune", "MH");
    let body = MultipartBody::from_form(&form).text("website", "https://example.org");

    let response = harness.post_multipart(body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_image_is_stored_and_served() {
    let harness = TestHarness::new().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let png = b"\x89PNG\r\n\x1a\nfake-image";
    let body = MultipartBody::from_form(&form).file("image", "front gate.png", "image/png", png);

    let response = harness.post_multipart(body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (_, listed) = json_body(harness.get("/api/schools").await).await;
    let image_path = listed[0]["image_path"].as_str().unwrap().to_string();
    assert!(image_path.starts_with("/schoolImages/"));
    assert!(image_path.ends_with("-front_gate.png"));
    assert_eq!(harness.stored_images(), 1);

    let served = harness.get(&image_path).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, png);
}

#[tokio::test]
async fn test_empty_image_part_means_no_image() {
    let harness = TestHarness::new().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let body = MultipartBody::from_form(&form).file("image", "", "application/octet-stream", b"");

    let response = harness.post_multipart(body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (_, listed) = json_body(harness.get("/api/schools").await).await;
    assert!(listed[0]["image_path"].is_null());
    assert_eq!(harness.stored_images(), 0);
}

#[tokio::test]
async fn test_non_image_upload_rejected() {
    let harness = TestHarness::new().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let body =
        MultipartBody::from_form(&form).file("image", "notes.pdf", "application/pdf", b"%PDF-1.4");

    let (status, body) = json_body(harness.post_multipart(body).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["image"], "Only image files are allowed");
    assert_eq!(harness.stored_images(), 0);
}

#[tokio::test]
async fn test_html_declared_as_image_rejected() {
    let harness = TestHarness::new().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let body = MultipartBody::from_form(&form).file(
        "image",
        "evil.html",
        "image/png",
        b"<script>alert(1)</script>",
    );

    let (status, body) = json_body(harness.post_multipart(body).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["image"], "Only image files are allowed");
    assert_eq!(harness.stored_images(), 0);
}

#[tokio::test]
async fn test_traversal_filename_stays_in_image_dir() {
    let harness = TestHarness::new().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let body =
        MultipartBody::from_form(&form).file("image", "../../etc/passwd.png", "image/png", b"img");

    let response = harness.post_multipart(body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (_, listed) = json_body(harness.get("/api/schools").await).await;
    let image_path = listed[0]["image_path"].as_str().unwrap();
    assert!(image_path.ends_with("-passwd.png"));
    assert!(!image_path.contains(".."));
    assert_eq!(harness.stored_images(), 1);
}

#[tokio::test]
async fn test_oversized_body_fails_without_row() {
    let harness = TestHarness::new().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let big = vec![0u8; MAX_UPLOAD_BYTES * 2];
    let body = MultipartBody::from_form(&form).file("image", "big.png", "image/png", &big);

    let response = harness.post_multipart(body).await;

    assert!(!response.status().is_success());
    assert_eq!(harness.stored_images(), 0);

    let (_, listed) = json_body(harness.get("/api/schools").await).await;
    assert_eq!(listed, serde_json::json!([]));
}

#[tokio::test]
async fn test_listing_newest_first_and_stable() {
    let harness = TestHarness::new().await;

    let mut ids = Vec::new();
    for name in ["School A", "School B"] {
        let form = valid_form(name, "Pune", "MH");
        let (_, created) =
            json_body(harness.post_multipart(MultipartBody::from_form(&form)).await).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    let (_, first) = json_body(harness.get("/api/schools").await).await;
    let (_, second) = json_body(harness.get("/api/schools").await).await;
    assert_eq!(first, second);

    let names: Vec<&str> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["School B", "School A"]);
    assert_eq!(first[0]["id"].as_i64(), Some(ids[1]));
}

#[tokio::test]
async fn test_missing_table_is_reported() {
    let harness = TestHarness::without_schema().await;

    let (status, body) = json_body(harness.get("/api/schools").await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch schools");
    assert_eq!(body["code"], "TABLE_MISSING");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_unreachable_store_is_generic_database_error() {
    let harness = TestHarness::new().await;
    harness.db.clone().close().await.unwrap();

    let (status, body) = json_body(harness.get("/api/schools").await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_insert_failure_returns_generic_error() {
    let harness = TestHarness::without_schema().await;
    let form = valid_form("Oak Valley", "Mumbai", "MH");
    let body = MultipartBody::from_form(&form).file("image", "gate.png", "image/png", b"img");

    let (status, body) = json_body(harness.post_multipart(body).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to add school");
    assert!(body.get("details").is_none());
    assert_eq!(harness.stored_images(), 0);
}
