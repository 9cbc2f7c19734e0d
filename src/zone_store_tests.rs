// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for zone filenames and the filesystem store.

#[cfg(test)]
mod tests {
    use crate::zone_store::{zone_file_name, FsZoneStore, ZoneFileEntry, ZoneStore};
    use tempfile::TempDir;

    #[test]
    fn test_zone_file_name_escapes_every_nonalphanumeric() {
        // Dots must round-trip identically into nsd.conf, so nothing is safe.
        assert_eq!(zone_file_name("example.com"), "example%2Ecom.txt");
        assert_eq!(
            zone_file_name("mail.ex-ample.com"),
            "mail%2Eex%2Dample%2Ecom.txt"
        );
        assert_eq!(zone_file_name("xn--bcher-kva.ch"), "xn%2D%2Dbcher%2Dkva%2Ech.txt");
    }

    #[test]
    fn test_entry_pairs_domain_with_filename() {
        let entry = ZoneFileEntry::new("example.org");
        assert_eq!(entry.domain, "example.org");
        assert_eq!(entry.filename, "example%2Eorg.txt");
    }

    #[test]
    fn test_read_existing_returns_none_for_absent_file() {
        let dir = TempDir::new().unwrap();
        let store = FsZoneStore;

        let result = store.read_existing(&dir.path().join("missing.txt")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FsZoneStore;
        let path = dir.path().join("zone.txt");

        store.write(&path, "zone content\n").unwrap();
        let read_back = store.read_existing(&path).unwrap();

        assert_eq!(read_back.as_deref(), Some("zone content\n"));
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FsZoneStore;
        let nested = dir.path().join("etc/nsd/zones");

        store.ensure_dir(&nested).unwrap();
        store.ensure_dir(&nested).unwrap();

        assert!(nested.is_dir());
    }
}
