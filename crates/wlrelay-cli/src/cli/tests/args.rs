//! Tests for argument parsing of every subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_canonicalize() {
    match parse(&["wlrelay", "canonicalize", "https://www.example.com/x"]) {
        CliCommand::Canonicalize { uri } => assert_eq!(uri, "https://www.example.com/x"),
        _ => panic!("expected Canonicalize"),
    }
}

#[test]
fn cli_parse_encode_with_and_without_timestamp() {
    match parse(&["wlrelay", "encode", "example.com"]) {
        CliCommand::Encode {
            hostname,
            timestamp,
        } => {
            assert_eq!(hostname, "example.com");
            assert!(timestamp.is_none());
        }
        _ => panic!("expected Encode"),
    }
    match parse(&["wlrelay", "encode", "example.com", "--timestamp", "1700000000"]) {
        CliCommand::Encode { timestamp, .. } => assert_eq!(timestamp, Some(1_700_000_000)),
        _ => panic!("expected Encode"),
    }
}

#[test]
fn cli_parse_decode_and_identifier() {
    match parse(&["wlrelay", "decode", "http://localhost/invalidimage-1.png?website=a.com"]) {
        CliCommand::Decode { uri } => assert!(uri.ends_with("website=a.com")),
        _ => panic!("expected Decode"),
    }
    assert!(matches!(
        parse(&["wlrelay", "identifier"]),
        CliCommand::Identifier
    ));
    assert!(matches!(parse(&["wlrelay", "drain"]), CliCommand::Drain));
}

#[test]
fn cli_parse_invoke_defaults_to_confirm() {
    match parse(&["wlrelay", "invoke", "--payload", "page.json"]) {
        CliCommand::Invoke {
            payload,
            cancel,
            dry_run,
        } => {
            assert_eq!(payload, PathBuf::from("page.json"));
            assert!(!cancel);
            assert!(!dry_run);
        }
        _ => panic!("expected Invoke"),
    }
}

#[test]
fn cli_parse_invoke_flags() {
    match parse(&["wlrelay", "invoke", "--payload", "p.json", "--cancel", "--dry-run"]) {
        CliCommand::Invoke {
            cancel, dry_run, ..
        } => {
            assert!(cancel);
            assert!(dry_run);
        }
        _ => panic!("expected Invoke"),
    }
}

#[test]
fn cli_parse_invoke_requires_payload() {
    assert!(Cli::try_parse_from(["wlrelay", "invoke"]).is_err());
}

#[test]
fn cli_parse_encode_rejects_negative_timestamp() {
    assert!(Cli::try_parse_from(["wlrelay", "encode", "a.com", "--timestamp", "-1"]).is_err());
}
