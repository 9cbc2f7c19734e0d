// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for per-domain record building.
//!
//! These verify the fixed record order, the extra nameserver glue on the
//! public hostname's own zone, and the DKIM gating behavior.

#[cfg(test)]
mod tests {
    use crate::environment::Environment;
    use crate::records::{build_zone, RecordType};
    use std::fs;
    use tempfile::TempDir;

    fn test_env(storage: &TempDir) -> Environment {
        Environment {
            public_hostname: "mail.example.com".to_string(),
            public_ip: "203.0.113.5".to_string(),
            storage_root: storage.path().to_path_buf(),
            zones_dir: storage.path().join("zones"),
            nsd_conf: storage.path().join("nsd.conf"),
            key_table: storage.path().join("KeyTable"),
            signing_table: storage.path().join("SigningTable"),
            mirror: None,
        }
    }

    fn write_dkim_record(storage: &TempDir, content: &str) {
        let dir = storage.path().join("mail/dkim");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mail.txt"), content).unwrap();
    }

    #[test]
    fn test_base_records_for_secondary_domain() {
        let storage = TempDir::new().unwrap();
        let env = test_env(&storage);

        let records = build_zone("example.org", &env);

        assert_eq!(records.len(), 6);
        let summary: Vec<(Option<&str>, RecordType, &str)> = records
            .iter()
            .map(|r| (r.subdomain.as_deref(), r.rtype, r.value.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (None, RecordType::Ns, "ns1.mail.example.com."),
                (None, RecordType::Ns, "ns2.mail.example.com."),
                (None, RecordType::A, "203.0.113.5"),
                (None, RecordType::Mx, "10 mail.example.com."),
                (None, RecordType::Txt, "\"v=spf1 mx -all\""),
                (Some("www"), RecordType::A, "203.0.113.5"),
            ]
        );
    }

    #[test]
    fn test_public_hostname_zone_defines_nameservers() {
        let storage = TempDir::new().unwrap();
        let env = test_env(&storage);

        let records = build_zone("mail.example.com", &env);

        // Base six plus ns1/ns2 glue.
        assert_eq!(records.len(), 8);
        assert_eq!(records[6].subdomain.as_deref(), Some("ns1"));
        assert_eq!(records[6].rtype, RecordType::A);
        assert_eq!(records[6].value, "203.0.113.5");
        assert_eq!(records[7].subdomain.as_deref(), Some("ns2"));
        assert_eq!(records[7].value, "203.0.113.5");
    }

    #[test]
    fn test_record_order_is_deterministic() {
        let storage = TempDir::new().unwrap();
        let env = test_env(&storage);

        let first = build_zone("example.org", &env);
        let second = build_zone("example.org", &env);

        assert_eq!(first, second);
    }

    #[test]
    fn test_dkim_record_appends_policy_records() {
        let storage = TempDir::new().unwrap();
        let env = test_env(&storage);
        write_dkim_record(
            &storage,
            "mail._domainkey IN TXT ( \"v=DKIM1; k=rsa; \"\n\t\"p=MIGfMA0GCSq\" ) ; ----- DKIM key mail\n",
        );

        let records = build_zone("example.org", &env);

        assert_eq!(records.len(), 9);

        let dkim = &records[6];
        assert_eq!(dkim.subdomain.as_deref(), Some("mail._domainkey"));
        assert_eq!(dkim.rtype, RecordType::Txt);
        // Value kept verbatim, parentheses and line break included.
        assert_eq!(dkim.value, "( \"v=DKIM1; k=rsa; \"\n\t\"p=MIGfMA0GCSq\" )");

        let adsp = &records[7];
        assert_eq!(adsp.subdomain.as_deref(), Some("_adsp._domainkey"));
        assert_eq!(adsp.value, "\"dkim=all\"");

        let dmarc = &records[8];
        assert_eq!(dmarc.subdomain.as_deref(), Some("_dmarc"));
        assert_eq!(dmarc.value, "\"v=DMARC1; p=quarantine\"");
    }

    #[test]
    fn test_absent_dkim_file_omits_policy_records() {
        let storage = TempDir::new().unwrap();
        let env = test_env(&storage);

        let records = build_zone("example.org", &env);

        assert!(records
            .iter()
            .all(|r| r.subdomain.as_deref() != Some("_dmarc")));
        assert!(records
            .iter()
            .all(|r| r.subdomain.as_deref() != Some("_adsp._domainkey")));
        assert_eq!(records.len(), 6);
    }

    #[test]
    fn test_malformed_dkim_file_omits_policy_records() {
        let storage = TempDir::new().unwrap();
        let env = test_env(&storage);
        write_dkim_record(&storage, "this is not a DKIM record at all\n");

        let records = build_zone("example.org", &env);

        // Omitted, not guessed; the base records still come through.
        assert_eq!(records.len(), 6);
    }
}
