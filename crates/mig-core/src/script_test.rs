use super::*;

const CREATE_USERS: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);";
const DROP_USERS: &str = "DROP TABLE users;";

#[test]
fn test_encode_layout() {
    let raw = encode(CREATE_USERS, DROP_USERS, &ScriptMarkers::default());
    assert_eq!(
        raw,
        "-- up\nCREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);\n-- down\nDROP TABLE users;"
    );
}

#[test]
fn test_decode_up_first() {
    let raw = "-- up\nCREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);\n-- down\nDROP TABLE users;";
    let (apply, revert) = decode(raw, &ScriptMarkers::default()).unwrap();
    assert_eq!(apply, CREATE_USERS);
    assert_eq!(revert, DROP_USERS);
}

#[test]
fn test_decode_down_first() {
    let raw = "-- down\nDROP TABLE users;\n-- up\nCREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);";
    let (apply, revert) = decode(raw, &ScriptMarkers::default()).unwrap();
    assert_eq!(apply, CREATE_USERS);
    assert_eq!(revert, DROP_USERS);
}

#[test]
fn test_decode_with_leading_text_and_indentation() {
    let raw = "
        -- migration: users
        -- up
        CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);

        -- down
        DROP TABLE users;
        ";
    let (apply, revert) = decode(raw, &ScriptMarkers::default()).unwrap();
    assert_eq!(apply, CREATE_USERS);
    assert_eq!(revert, DROP_USERS);
}

#[test]
fn test_decode_recovers_encoded_pair() {
    let markers = ScriptMarkers::new("--- migrate:up", "--- migrate:down");
    let apply = "CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);";
    let revert = "DROP TABLE b;\nDROP TABLE a;";

    let raw = encode(apply, revert, &markers);
    let (got_apply, got_revert) = decode(&raw, &markers).unwrap();
    assert_eq!(got_apply, apply);
    assert_eq!(got_revert, revert);
}

#[test]
fn test_decode_empty_sections() {
    let raw = encode("", "", &ScriptMarkers::default());
    let (apply, revert) = decode(&raw, &ScriptMarkers::default()).unwrap();
    assert!(apply.is_empty());
    assert!(revert.is_empty());
}

#[test]
fn test_decode_missing_down_marker() {
    let raw = "-- up\nCREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);";
    let err = decode(raw, &ScriptMarkers::default()).unwrap_err();
    assert!(
        matches!(err, CoreError::MarkerNotFound { ref marker, .. } if marker == "-- down"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_decode_missing_up_marker() {
    let raw = "-- down\nDROP TABLE users;";
    let err = decode(raw, &ScriptMarkers::default()).unwrap_err();
    assert!(matches!(err, CoreError::MarkerNotFound { ref marker, .. } if marker == "-- up"));
}

#[test]
fn test_markers_validate() {
    assert!(ScriptMarkers::default().validate().is_ok());
    assert!(ScriptMarkers::new("", "-- down").validate().is_err());
    assert!(ScriptMarkers::new("-- up", "-- up").validate().is_err());
    assert!(ScriptMarkers::new("--", "-- down").validate().is_err());
}

#[test]
fn test_markers_from_yaml_defaults() {
    let markers: ScriptMarkers = serde_yaml::from_str("up: '-- +migrate Up'").unwrap();
    assert_eq!(markers.up, "-- +migrate Up");
    assert_eq!(markers.down, DEFAULT_DOWN_MARKER);
}

#[test]
fn test_extract_ordering_key() {
    assert_eq!(extract_ordering_key("0001_create_table_users.sql").unwrap(), 1);
    assert_eq!(
        extract_ordering_key("12345_create_table_users.sql").unwrap(),
        12345
    );
    assert_eq!(extract_ordering_key("2_create_table_users.sql").unwrap(), 2);
    assert_eq!(extract_ordering_key("0002: create_table_users.sql").unwrap(), 2);
    assert_eq!(extract_ordering_key("03 - create_table_users.sql").unwrap(), 3);
    assert_eq!(extract_ordering_key("7").unwrap(), 7);
}

#[test]
fn test_extract_ordering_key_no_number() {
    let err = extract_ordering_key("hello_create_table_users.sql").unwrap_err();
    assert!(matches!(err, CoreError::NoNumberInName { .. }));

    let err = extract_ordering_key("").unwrap_err();
    assert!(matches!(err, CoreError::NoNumberInName { .. }));
}

#[test]
fn test_extract_ordering_key_non_positive() {
    let err = extract_ordering_key("0000_create_table_users.sql").unwrap_err();
    assert!(matches!(
        err,
        CoreError::NonPositiveVersion { version: 0, .. }
    ));
}

#[test]
fn test_extract_ordering_key_overflow() {
    let err = extract_ordering_key("99999999999999999999999_huge.sql").unwrap_err();
    assert!(matches!(err, CoreError::VersionOutOfRange { .. }));
}
