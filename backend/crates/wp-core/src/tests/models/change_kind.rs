use crate::ChangeKind;

use std::str::FromStr;

#[test]
fn test_change_kind_as_str() {
    assert_eq!(ChangeKind::Insert.as_str(), "insert");
    assert_eq!(ChangeKind::Update.as_str(), "update");
    assert_eq!(ChangeKind::Delete.as_str(), "delete");
}

#[test]
fn test_change_kind_from_str() {
    assert_eq!(ChangeKind::from_str("insert").unwrap(), ChangeKind::Insert);
    assert_eq!(ChangeKind::from_str("delete").unwrap(), ChangeKind::Delete);
    assert!(ChangeKind::from_str("upsert").is_err());
}
