// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the external zone mirror.
//!
//! The DNS4E API is stubbed with wiremock; these verify the eligibility
//! filtering and the TXT flattening the provider requires.

#[cfg(test)]
mod tests {
    use crate::environment::MirrorConfig;
    use crate::notifier::{flatten_txt, Dns4eMirror, ZoneMirror};
    use crate::records::{RecordType, ResourceRecord};
    use serde_json::json;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mirror_for(server: &MockServer) -> Dns4eMirror {
        Dns4eMirror::new(MirrorConfig {
            endpoint: server.uri(),
            username: "user".to_string(),
            password: "secret".to_string(),
        })
    }

    fn test_records() -> Vec<ResourceRecord> {
        vec![
            ResourceRecord::root(RecordType::Ns, "ns1.mail.example.com."),
            ResourceRecord::root(RecordType::A, "203.0.113.5"),
            ResourceRecord::root(RecordType::Txt, "\"v=spf1 mx -all\""),
            ResourceRecord::sub("www", RecordType::A, "203.0.113.5"),
            ResourceRecord::sub("_dmarc", RecordType::Txt, "\"v=DMARC1; p=quarantine\""),
        ]
    }

    #[test]
    fn test_flatten_txt_strips_parentheses_and_line_breaks() {
        let value = "( \"v=DKIM1; k=rsa; \"\n\t  \"p=MIGfMA0GCSq\" )";
        assert_eq!(flatten_txt(value), "\"v=DKIM1; k=rsa; \" \"p=MIGfMA0GCSq\"");
    }

    #[test]
    fn test_flatten_txt_leaves_plain_values_alone() {
        assert_eq!(flatten_txt("\"v=spf1 mx -all\""), "\"v=spf1 mx -all\"");
    }

    #[tokio::test]
    async fn test_only_eligible_txt_records_are_uploaded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/x%2Ejusttesting%2Eemail/txt"))
            .and(body_string("record=%22v%3Dspf1+mx+-all%22"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/%5Fdmarc%2Ex%2Ejusttesting%2Eemail/txt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        let mirror = mirror_for(&server);
        mirror
            .publish_zone("x.justtesting.email", &test_records())
            .await
            .unwrap();
        // NS, A and www records are never uploaded; the two mock
        // expectations are verified when the server drops.
    }

    #[tokio::test]
    async fn test_other_domains_are_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
            .expect(0)
            .mount(&server)
            .await;

        let mirror = mirror_for(&server);
        mirror
            .publish_zone("example.org", &test_records())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_api_is_reported_as_error() {
        let mirror = Dns4eMirror::new(MirrorConfig {
            // Discard port; the connection is refused immediately.
            endpoint: "http://127.0.0.1:9".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
        });

        let result = mirror
            .publish_zone("x.justtesting.email", &test_records())
            .await;
        assert!(result.is_err());
    }
}
