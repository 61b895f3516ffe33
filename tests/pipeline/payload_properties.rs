use proptest::prelude::*;
use vault_cert_init::config::{OutputFormat, OutputOptions};
use vault_cert_init::vault::IssueRequest;
use vault_cert_init::RequestSpec;

fn spec(alt_names: Vec<String>, ttl: String) -> RequestSpec {
    RequestSpec {
        vault_path: "pki/issue/my-role".to_string(),
        common_name: "svc.example.com".to_string(),
        alt_names,
        ttl,
        output_options: OutputOptions {
            format: OutputFormat::Pem,
            file_name_prefix: "svc".to_string(),
            destination_folder_path: "/out".to_string(),
            kubernetes_secret_resource_name: String::new(),
        },
    }
}

proptest! {
    #[test]
    fn alt_names_are_joined_in_order(names in prop::collection::vec("[a-z]{1,12}\\.example\\.com", 0..6)) {
        let spec = spec(names.clone(), String::new());
        let json = serde_json::to_value(IssueRequest::from_spec(&spec)).unwrap();

        if names.is_empty() {
            prop_assert!(json.get("alt_names").is_none());
        } else {
            prop_assert_eq!(json["alt_names"].as_str().unwrap(), names.join(","));
        }
    }

    #[test]
    fn ttl_is_sent_only_when_set(ttl in "([0-9]{1,4}[smhd])?") {
        let spec = spec(vec![], ttl.clone());
        let json = serde_json::to_value(IssueRequest::from_spec(&spec)).unwrap();

        prop_assert_eq!(json["format"].as_str(), Some("pem"));
        prop_assert_eq!(json["common_name"].as_str(), Some("svc.example.com"));
        if ttl.is_empty() {
            prop_assert!(json.get("ttl").is_none());
        } else {
            prop_assert_eq!(json["ttl"].as_str(), Some(ttl.as_str()));
        }
    }
}
