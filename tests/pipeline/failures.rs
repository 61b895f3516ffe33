use serde_json::json;
use vault_cert_init::VaultCertError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use super::support::{issue_payload, request, TestVault};

#[tokio::test]
async fn test_unknown_format_fails_after_issue_and_writes_nothing() {
    let vault = TestVault::start().await;
    vault.expect_login(1).await;
    vault.expect_issue("pki/issue/my-role", issue_payload()).await;
    let out = vault.out_dir();

    let err = vault.run(json!([request("JKS", &out)])).await.unwrap_err();

    match &err {
        VaultCertError::UnknownFormat {
            format,
            common_name,
            vault_path,
        } => {
            assert_eq!(format, "JKS");
            assert_eq!(common_name, "svc.example.com");
            assert_eq!(vault_path, "pki/issue/my-role");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out.exists());
}

#[tokio::test]
async fn test_login_rejection_stops_before_issue() {
    let vault = TestVault::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/kubernetes/prod/login"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"errors": ["permission denied"]})),
        )
        .expect(1)
        .mount(&vault.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/pki/issue/my-role"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&vault.server)
        .await;

    let err = vault.run(json!([request("PEM", &vault.out_dir())])).await.unwrap_err();

    assert!(matches!(err, VaultCertError::Status { status: 403, .. }));
}

#[tokio::test]
async fn test_second_request_failure_keeps_first_output() {
    let vault = TestVault::start().await;
    vault.expect_login(1).await;
    vault.expect_issue("pki/issue/my-role", issue_payload()).await;
    Mock::given(method("POST"))
        .and(path("/v1/pki/issue/missing-role"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["unknown role: missing-role"]
        })))
        .expect(1)
        .mount(&vault.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/pki/issue/never-reached"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&vault.server)
        .await;
    let out = vault.out_dir();

    let follow_up = |role: &str, prefix: &str| {
        json!({
            "VaultPath": format!("pki/issue/{}", role),
            "CommonName": "other.example.com",
            "OutputOptions": {
                "Format": "PEM",
                "FileNamePrefix": prefix,
                "DestinationFolderPath": out.display().to_string()
            }
        })
    };
    let requests = json!([
        request("PEM", &out),
        follow_up("missing-role", "missing"),
        follow_up("never-reached", "never")
    ]);

    let err = vault.run(requests).await.unwrap_err();

    assert!(matches!(err, VaultCertError::Status { status: 400, .. }));
    assert!(out.join("svc-certificate.pem").exists());
    assert!(!out.join("missing-certificate.pem").exists());
    assert!(!out.join("never-certificate.pem").exists());
}

#[tokio::test]
async fn test_request_without_destination_is_rejected_before_login() {
    let vault = TestVault::start().await;
    vault.expect_login(0).await;

    let err = vault
        .run(json!([{
            "VaultPath": "pki/issue/my-role",
            "CommonName": "svc.example.com",
            "OutputOptions": { "Format": "PEM" }
        }]))
        .await
        .unwrap_err();

    assert!(matches!(err, VaultCertError::Validation { .. }));
}

#[tokio::test]
async fn test_malformed_request_file_is_config_error() {
    let vault = TestVault::start().await;
    vault.expect_login(0).await;

    let err = vault.run(json!({"VaultPath": "not-an-array"})).await.unwrap_err();

    assert_eq!(err.kind(), "config");
}
