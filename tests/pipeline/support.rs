use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;
use vault_cert_init::{
    config::load_request_specs, pipeline, AppConfig, Result, RunSummary, SecretString,
    VaultClient,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LEAF_CERT: &str = include_str!("../fixtures/leaf_cert.pem");
pub const LEAF_KEY: &str = include_str!("../fixtures/leaf_key.pem");
pub const INTERMEDIATE_CA: &str = include_str!("../fixtures/intermediate_ca.pem");
pub const ROOT_CA: &str = include_str!("../fixtures/root_ca.pem");

pub const JWT: &str = "eyJhbGciOiJSUzI1NiJ9.service-account.sig";
pub const VAULT_TOKEN: &str = "hvs.CAESIPipelineToken";
pub const ROLE: &str = "my-app";
pub const CLUSTER: &str = "prod";

/// A mock Vault plus a scratch directory holding the token file, the request
/// file and the output folder.
pub struct TestVault {
    pub server: MockServer,
    pub dir: TempDir,
}

impl TestVault {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Expect exactly `times` logins with the test JWT.
    pub async fn expect_login(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/auth/kubernetes/{}/login", CLUSTER)))
            .and(body_json(json!({"role": ROLE, "jwt": JWT})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_id": "login-1",
                "auth": {
                    "client_token": VAULT_TOKEN,
                    "policies": ["default", "pki"],
                    "lease_duration": 600,
                    "renewable": true
                }
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Expect one issue call with `payload` and answer with the fixture chain.
    pub async fn expect_issue(&self, vault_path: &str, payload: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}", vault_path)))
            .and(header("x-vault-token", VAULT_TOKEN))
            .and(body_json(payload))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_response()))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub fn config(&self, request_file: &Path) -> AppConfig {
        let token_path = self.dir.path().join("token");
        std::fs::write(&token_path, format!("{}\n", JWT)).expect("write token file");

        let vault_address = self.server.uri();
        let request_spec_path = request_file.display().to_string();
        let token_path = token_path.display().to_string();

        AppConfig::from_lookup(|key| match key {
            "REQUEST_SPEC_PATH" => Some(request_spec_path.clone()),
            "SERVICE_ACCOUNT_TOKEN_PATH" => Some(token_path.clone()),
            "VAULT_ADDR" => Some(format!("{}/", vault_address)),
            "K8S_AUTH_ROLE_NAME" => Some(ROLE.to_string()),
            "KUBERNETES_CLUSTER_NAME" => Some(CLUSTER.to_string()),
            _ => None,
        })
        .expect("valid test configuration")
    }

    pub fn write_requests(&self, requests: Value) -> PathBuf {
        let path = self.dir.path().join("requests.json");
        std::fs::write(&path, requests.to_string()).expect("write request file");
        path
    }

    /// Run the whole binary flow against the mock.
    pub async fn run(&self, requests: Value) -> Result<RunSummary> {
        let request_file = self.write_requests(requests);
        let config = self.config(&request_file);

        let jwt = SecretString::new(config.read_service_account_token()?);
        let specs = load_request_specs(&config.request_spec_path)?;
        let client = VaultClient::new(&config, jwt)?;

        pipeline::run(&client, &specs, &config.keystore_password).await
    }
}

pub fn issue_response() -> Value {
    json!({
        "request_id": "issue-1",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "certificate": LEAF_CERT,
            "private_key": LEAF_KEY,
            "private_key_type": "rsa",
            "issuing_ca": INTERMEDIATE_CA,
            "ca_chain": [INTERMEDIATE_CA, ROOT_CA],
            "serial_number": "3a:7f:11",
            "expiration": 1_900_000_000_i64
        },
        "warnings": null
    })
}

pub fn request(format: &str, out_dir: &Path) -> Value {
    json!({
        "VaultPath": "pki/issue/my-role",
        "CommonName": "svc.example.com",
        "AltNames": ["a.example.com", "b.example.com"],
        "TTL": "1h",
        "OutputOptions": {
            "Format": format,
            "FileNamePrefix": "svc",
            "DestinationFolderPath": out_dir.display().to_string()
        }
    })
}

pub fn issue_payload() -> Value {
    json!({
        "common_name": "svc.example.com",
        "format": "pem",
        "ttl": "1h",
        "alt_names": "a.example.com,b.example.com"
    })
}
