//! Integration tests for the VaultKeep vault module: the in-memory store,
//! fuzzy search, and the encrypted file.

use std::fs;

use vaultkeep::crypto::{derive_key, encrypt};
use vaultkeep::errors::VaultKeepError;
use vaultkeep::vault::{Vault, VaultFile};
use tempfile::TempDir;

const PASSWORD: &str = "Correct-Horse1";

/// Helper: a vault file path inside a fresh temp dir.
fn vault_file() -> (TempDir, VaultFile) {
    let dir = TempDir::new().expect("create temp dir");
    let file = VaultFile::new(dir.path().join("vault.dat"));
    (dir, file)
}

fn sample_vault() -> Vault {
    let mut vault = Vault::new();
    vault.add("Gmail", "p1").unwrap();
    vault.add("GitHub", "p2").unwrap();
    vault.add("Gitlab", "p3").unwrap();
    vault
}

// ---------------------------------------------------------------------------
// Store semantics
// ---------------------------------------------------------------------------

#[test]
fn add_overwrites_but_update_requires_existing() {
    let mut vault = Vault::new();
    vault.add("Gmail", "old").unwrap();
    vault.add("Gmail", "new").unwrap();
    assert_eq!(vault.get("Gmail").unwrap(), "new");
    assert_eq!(vault.len(), 1);

    let err = vault.update("Bank", "x").unwrap_err();
    assert!(matches!(err, VaultKeepError::SecretNotFound(ref n) if n == "Bank"));
    assert!(!vault.exists("Bank"));
}

#[test]
fn names_are_case_sensitive() {
    let vault = sample_vault();
    assert!(vault.exists("Gmail"));
    assert!(!vault.exists("gmail"));
    assert!(vault.get("gmail").is_err());
}

#[test]
fn delete_missing_is_not_found() {
    let mut vault = sample_vault();
    assert!(matches!(
        vault.delete("Nope"),
        Err(VaultKeepError::SecretNotFound(_))
    ));
    assert_eq!(vault.len(), 3);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_prefix_ranks_before_fuzzy() {
    let vault = sample_vault();
    assert_eq!(vault.search("git", 10), vec!["GitHub", "Gitlab"]);
}

#[test]
fn search_tolerates_a_typo() {
    let vault = sample_vault();
    assert_eq!(vault.search("gmal", 10), vec!["Gmail"]);
}

#[test]
fn search_short_pattern_needs_substring() {
    let vault = sample_vault();
    assert_eq!(vault.search("gm", 10), vec!["Gmail"]);
    assert!(vault.search("gx", 10).is_empty());
}

#[test]
fn search_full_name_returns_it_first() {
    let vault = sample_vault();
    assert_eq!(vault.search("Gmail", 10)[0], "Gmail");
    assert_eq!(vault.search("Gmail", 10), vec!["Gmail"]);
}

#[test]
fn search_exact_match_comes_first() {
    let mut vault = sample_vault();
    vault.add("Git", "p4").unwrap();
    let hits = vault.search("  GIT ", 10);
    assert_eq!(hits[0], "Git");
    assert_eq!(hits.len(), 3);
}

#[test]
fn search_blank_pattern_and_limit() {
    let vault = sample_vault();
    assert!(vault.search("   ", 10).is_empty());
    assert_eq!(vault.search("git", 1), vec!["GitHub"]);
    assert!(vault.search("git", 0).is_empty());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn save_and_load_roundtrip() {
    let (_dir, file) = vault_file();
    assert!(!file.exists_on_disk());

    let vault = sample_vault();
    file.save(&vault, PASSWORD).unwrap();
    assert!(file.exists_on_disk());

    let loaded = file.load(PASSWORD).unwrap();
    assert_eq!(loaded, vault);
}

#[test]
fn file_does_not_contain_plaintext() {
    let (_dir, file) = vault_file();
    file.save(&sample_vault(), PASSWORD).unwrap();

    let raw = fs::read(file.path()).unwrap();
    let needle = b"Gmail";
    assert!(!raw.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn load_with_wrong_password_fails() {
    let (_dir, file) = vault_file();
    file.save(&sample_vault(), PASSWORD).unwrap();

    assert!(matches!(
        file.load("Wrong-Horse1"),
        Err(VaultKeepError::WrongPasswordOrCorrupt)
    ));
}

#[test]
fn load_missing_file_is_not_found() {
    let (_dir, file) = vault_file();
    assert!(matches!(
        file.load(PASSWORD),
        Err(VaultKeepError::VaultNotFound(_))
    ));
}

#[test]
fn corrupted_file_is_rejected() {
    let (_dir, file) = vault_file();
    file.save(&sample_vault(), PASSWORD).unwrap();

    let mut raw = fs::read(file.path()).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0xFF;
    fs::write(file.path(), &raw).unwrap();

    assert!(matches!(
        file.load(PASSWORD),
        Err(VaultKeepError::WrongPasswordOrCorrupt)
    ));
}

#[test]
fn load_rejects_authentic_non_map_payload() {
    let (_dir, file) = vault_file();
    let key = derive_key(PASSWORD).unwrap();

    let payloads: [&[u8]; 3] = [b"[1,2]", b"{\"Gmail\":42}", b"not json"];
    for payload in payloads {
        fs::write(file.path(), encrypt(&key, payload).unwrap()).unwrap();
        assert!(matches!(
            file.load(PASSWORD),
            Err(VaultKeepError::WrongPasswordOrCorrupt)
        ));
    }
}

#[test]
fn load_rejects_truncated_file() {
    let (_dir, file) = vault_file();
    file.save(&sample_vault(), PASSWORD).unwrap();
    let raw = fs::read(file.path()).unwrap();

    for len in [0, 5, 12, 27, raw.len() / 2, raw.len() - 1] {
        fs::write(file.path(), &raw[..len]).unwrap();
        assert!(
            matches!(
                file.load(PASSWORD),
                Err(VaultKeepError::WrongPasswordOrCorrupt)
            ),
            "truncated to {len} bytes"
        );
    }
}

#[test]
fn save_replaces_previous_contents() {
    let (dir, file) = vault_file();
    file.save(&sample_vault(), PASSWORD).unwrap();

    let mut smaller = Vault::new();
    smaller.add("Bank", "1234").unwrap();
    file.save(&smaller, PASSWORD).unwrap();

    let loaded = file.load(PASSWORD).unwrap();
    assert_eq!(loaded.list_names(), vec!["Bank"]);

    // No temp file left behind.
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn empty_vault_roundtrips() {
    let (_dir, file) = vault_file();
    file.save(&Vault::new(), PASSWORD).unwrap();
    assert!(file.load(PASSWORD).unwrap().is_empty());
}
