use crate::SyncModule;

use std::str::FromStr;

#[test]
fn given_every_module_when_round_tripped_through_str_then_same_module() {
    for module in SyncModule::ALL {
        assert_eq!(SyncModule::from_str(module.as_str()).unwrap(), module);
    }
}

#[test]
fn given_unknown_module_when_parsed_then_error() {
    assert!(SyncModule::from_str("florists").is_err());
    assert!(SyncModule::from_str("Guests").is_err());
}

#[test]
fn given_module_when_serialized_then_snake_case_string() {
    let json = serde_json::to_string(&SyncModule::Guests).unwrap();
    assert_eq!(json, "\"guests\"");
}
