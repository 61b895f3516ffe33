use serde_json::json;

use super::support::{
    issue_payload, request, TestVault, INTERMEDIATE_CA, LEAF_CERT, LEAF_KEY, ROOT_CA,
};

#[tokio::test]
async fn test_pem_request_writes_four_files() {
    let vault = TestVault::start().await;
    vault.expect_login(1).await;
    vault.expect_issue("pki/issue/my-role", issue_payload()).await;
    let out = vault.out_dir();

    let summary = vault.run(json!([request("PEM", &out)])).await.unwrap();

    assert_eq!(summary.requests_processed, 1);
    assert_eq!(
        summary.files_written,
        vec![
            out.join("svc-certificate.pem"),
            out.join("svc-key.pem"),
            out.join("svc-issuing_ca.pem"),
            out.join("svc-chain.pem"),
        ]
    );

    let read = |name: &str| std::fs::read_to_string(out.join(name)).unwrap();
    assert_eq!(read("svc-certificate.pem"), LEAF_CERT);
    assert_eq!(read("svc-key.pem"), LEAF_KEY);
    assert_eq!(read("svc-issuing_ca.pem"), INTERMEDIATE_CA);
    assert_eq!(read("svc-chain.pem"), format!("{}\n{}", INTERMEDIATE_CA, ROOT_CA));
}

#[tokio::test]
async fn test_multiple_requests_share_one_login() {
    let vault = TestVault::start().await;
    vault.expect_login(1).await;
    vault.expect_issue("pki/issue/my-role", issue_payload()).await;
    vault
        .expect_issue(
            "pki-int/issue/edge",
            json!({"common_name": "edge.example.com", "format": "pem"}),
        )
        .await;
    let out = vault.out_dir();

    let requests = json!([
        request("PEM", &out),
        {
            "VaultPath": "pki-int/issue/edge",
            "CommonName": "edge.example.com",
            "OutputOptions": {
                "Format": "PEM",
                "FileNamePrefix": "edge",
                "DestinationFolderPath": out.display().to_string()
            }
        }
    ]);

    let summary = vault.run(requests).await.unwrap();

    assert_eq!(summary.requests_processed, 2);
    assert_eq!(summary.files_written.len(), 8);
    assert!(out.join("edge-key.pem").exists());
}

#[tokio::test]
async fn test_empty_request_file_does_not_contact_vault() {
    let vault = TestVault::start().await;
    vault.expect_login(0).await;

    let summary = vault.run(json!([])).await.unwrap();

    assert_eq!(summary.requests_processed, 0);
    assert!(summary.files_written.is_empty());
    assert!(vault.server.received_requests().await.unwrap().is_empty());
}
