//! Tests for schema classification across the public API.

use lmv_model::{RawRow, Schema, header_mismatch_message};

fn header(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

#[test]
fn canonical_headers_classify() {
    let contacts = header("userId,shouldJoin,joinDate,tierName,tierEntryAt,tierCalcAt,shouldReward");
    let points = header(
        "userId,pointsToSpend,statusPoints,cashback,allocatedAt,expireAt,setPlanExpiration,reason,title,description",
    );
    let vouchers = header("userId,externalId,voucherType,voucherName,iconName,code,expiration");

    assert_eq!(Schema::classify(&contacts), Some(Schema::Contacts));
    assert_eq!(Schema::classify(&points), Some(Schema::Points));
    assert_eq!(Schema::classify(&vouchers), Some(Schema::Vouchers));
}

#[test]
fn whitespace_is_not_forgiven() {
    let vouchers = header("userId, externalId,voucherType,voucherName,iconName,code,expiration");
    assert_eq!(Schema::classify(&vouchers), None);
    assert_eq!(Schema::closest(&vouchers), Some(Schema::Vouchers));
}

#[test]
fn semicolon_header_is_unknown_under_comma_split() {
    let line = header("userId;externalId;voucherType;voucherName;iconName;code;expiration");
    assert_eq!(line.len(), 1);
    assert_eq!(Schema::classify(&line), None);
    let message = header_mismatch_message("v.csv", &line);
    assert!(message.contains("any of the expected formats"));
}

#[test]
fn every_schema_has_a_user_id_first() {
    for schema in Schema::all() {
        assert_eq!(schema.columns()[0], "userId");
        assert_eq!(schema.column_index("userId"), Some(0));
    }
}

#[test]
fn raw_row_uses_file_delimiter() {
    let row = RawRow::with_delimiter(
        4,
        vec!["u1".to_string(), "a;b".to_string(), "c".to_string()],
        ';',
    );
    assert_eq!(row.raw, "u1;\"a;b\";c");
    assert_eq!(row.number, 4);
}
