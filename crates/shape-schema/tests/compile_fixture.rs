//! # Shipment Schema End-to-End
//!
//! Compiles the shipment fixture with a blacklist and an e-mail override on
//! `first_name`, then checks the compiled tree and the violations it reports
//! for a range of documents.

use serde_json::{json, Value};
use shape_core::{BaseType, ScalarValidator, ValidateOptions, Validator, ViolationKind, Violations};
use shape_schema::{compile, compile_strict, compile_value, BuildOptions, SchemaNode};

fn fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/shipment.schema.json")).unwrap()
}

fn email() -> Validator {
    ScalarValidator::string().email().into()
}

fn options() -> BuildOptions {
    BuildOptions::new()
        .with_black_list(["created_at", "updated_at"])
        .with_custom_field("first_name", email())
}

fn shipment() -> Validator {
    compile(&SchemaNode::from_value(fixture()).unwrap(), &options())
}

fn violations(v: &Validator, doc: Value) -> Violations {
    v.validate(&doc).unwrap_err().into_violations()
}

fn valid_document() -> Value {
    json!({
        "code": "FRT",
        "unit_amount": 5,
        "unit_quantity": 2,
        "unit_amount_currency": "USD",
        "first_name": "ops@example.com",
        "created_at": "2024-01-01T00:00:00Z",
        "charge_code": {"id": "1", "code": "FRT", "description": "Freight"},
        "accessorials": [
            {"id": "a1", "is_charge_code": "yes", "price": 12.5, "currency_unit": "USD"}
        ],
        "stops": [
            {"name": "Origin", "address": "1 Dock Rd"},
            {"name": "Destination", "address": "9 Yard Ave"}
        ],
        "company": {"carrier": "ACME", "name": "Acme", "dba_name": "Acme Freight"}
    })
}

#[test]
fn top_level_fields_exclude_blacklist() {
    let v = shipment();
    assert_eq!(
        v.as_object().unwrap().field_names(),
        vec![
            "accessorials",
            "charge_code",
            "code",
            "company",
            "first_name",
            "stops",
            "unit_amount",
            "unit_amount_currency",
            "unit_quantity",
        ]
    );
}

#[test]
fn blacklist_reaches_nested_and_merged_objects() {
    let v = shipment();
    let charge_code = v.field("charge_code").unwrap().as_object().unwrap();
    assert_eq!(charge_code.field_names(), vec!["code", "description", "id"]);
    let company = v.field("company").unwrap().as_object().unwrap();
    assert_eq!(company.field_names(), vec!["carrier", "dba_name", "name"]);
}

#[test]
fn custom_override_is_used_verbatim() {
    assert_eq!(shipment().field("first_name"), Some(&email()));
}

#[test]
fn scalar_fields_carry_registry_types() {
    let v = shipment();
    let code = v.field("code").unwrap().as_scalar().unwrap();
    assert_eq!(code.base(), BaseType::String);
    assert!(code.is_nullable());
    assert!(!code.is_required());

    let amount = v.field("unit_amount").unwrap().as_scalar().unwrap();
    assert_eq!(amount.base(), BaseType::Number);
    assert!(amount.is_required());

    let quantity = v.field("unit_quantity").unwrap().as_scalar().unwrap();
    assert!(quantity.is_integer());
    assert!(quantity.is_required());

    assert!(!v.field("unit_amount_currency").unwrap().is_required());
}

#[test]
fn arrays_wrap_object_items() {
    let v = shipment();
    let accessorials = v.field("accessorials").unwrap();
    assert_eq!(accessorials.type_name(), "array");
    assert!(!accessorials.is_nullable());
    let items = accessorials.as_array().unwrap().element().as_object().unwrap();
    assert_eq!(items.field_names(), vec!["currency_unit", "id", "is_charge_code", "price"]);
    assert!(items.fields().values().all(Validator::is_required));
}

#[test]
fn valid_document_passes() {
    let v = shipment();
    assert!(v.is_valid(&valid_document()), "{}", violations(&v, valid_document()));
}

#[test]
fn empty_document_reports_every_required_path() {
    let v = shipment();
    let mut paths = violations(&v, json!({})).paths();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "company.carrier",
            "company.dba_name",
            "company.name",
            "stops",
            "unit_amount",
            "unit_quantity",
        ]
    );
}

#[test]
fn array_item_required_fields_are_indexed() {
    let v = shipment();
    let found = violations(&v, json!({"accessorials": [{}], "unit_amount": "asb"}));
    for path in [
        "accessorials[0].id",
        "accessorials[0].is_charge_code",
        "accessorials[0].price",
        "accessorials[0].currency_unit",
    ] {
        assert_eq!(found.kind_at(path), Some(ViolationKind::Required), "{path}");
    }
    assert_eq!(found.kind_at("unit_amount"), Some(ViolationKind::TypeError));
    assert_eq!(found.kind_at("stops"), Some(ViolationKind::Required));
}

#[test]
fn stops_length_bounds() {
    let v = shipment();
    let stop = json!({"name": "s", "address": "a"});

    let mut doc = valid_document();
    doc["stops"] = json!([stop]);
    assert_eq!(violations(&v, doc.clone()).kind_at("stops"), Some(ViolationKind::Min));

    doc["stops"] = json!([stop, stop, stop]);
    assert!(v.is_valid(&doc));

    doc["stops"] = json!([stop, stop, stop, stop]);
    assert_eq!(violations(&v, doc).kind_at("stops"), Some(ViolationKind::Max));
}

#[test]
fn numeric_strings_are_bounded_by_value() {
    let v = shipment();
    let kind = |amount: &str| {
        violations(&v, json!({"unit_amount": amount}))
            .kind_at("unit_amount")
    };
    assert_eq!(kind("0"), Some(ViolationKind::Min));
    assert_eq!(kind("11"), Some(ViolationKind::Max));
    for amount in 1..=10 {
        assert_eq!(kind(&amount.to_string()), None, "unit_amount = {amount}");
    }
}

#[test]
fn code_length_bounds() {
    let v = shipment();
    let mut doc = valid_document();
    doc["code"] = json!("");
    assert_eq!(violations(&v, doc.clone()).kind_at("code"), Some(ViolationKind::Min));
    doc["code"] = json!("ABCDEFGHIJ");
    assert!(v.is_valid(&doc));
}

#[test]
fn leaf_constraints_report_their_kind() {
    let v = shipment();
    let mut doc = valid_document();
    doc["code"] = json!("ABCDEFGHIJK");
    doc["unit_amount"] = json!(11);
    doc["unit_quantity"] = json!(1.5);
    doc["unit_amount_currency"] = json!("GBP");
    doc["first_name"] = json!("not-an-email");

    let found = violations(&v, doc);
    assert_eq!(found.len(), 5, "{found}");
    assert_eq!(found.kind_at("code"), Some(ViolationKind::Max));
    assert_eq!(found.kind_at("unit_amount"), Some(ViolationKind::Max));
    assert_eq!(found.kind_at("unit_quantity"), Some(ViolationKind::Integer));
    assert_eq!(found.kind_at("unit_amount_currency"), Some(ViolationKind::OneOf));
    assert_eq!(found.kind_at("first_name"), Some(ViolationKind::Matches));
}

#[test]
fn numeric_strings_and_nulls_are_accepted() {
    let v = shipment();
    let mut doc = valid_document();
    doc["unit_quantity"] = json!("3");
    doc["code"] = Value::Null;
    doc["unit_amount_currency"] = Value::Null;
    assert!(v.is_valid(&doc), "{}", violations(&v, doc.clone()));
}

#[test]
fn abort_early_stops_at_first_violation() {
    let v = shipment();
    let err = v
        .validate_with(&json!({}), ValidateOptions { abort_early: true })
        .unwrap_err();
    assert_eq!(err.violations().len(), 1);
}

#[test]
fn fixture_compiles_cleanly_in_strict_mode() {
    let node = SchemaNode::from_value(fixture()).unwrap();
    let strict = compile_strict(&node, &options()).unwrap();
    assert_eq!(strict, shipment());

    let compilation = compile_value(&fixture(), &options().strict(true)).unwrap();
    assert!(compilation.is_clean());
    assert_eq!(compilation.validator, shipment());
}

#[test]
fn compiled_tree_serializes() {
    let json = serde_json::to_value(shipment()).unwrap();
    assert_eq!(json["type"], "object");
    assert_eq!(json["fields"]["stops"]["type"], "array");
    assert_eq!(json["fields"]["stops"]["minItems"], 2);
    assert_eq!(json["fields"]["stops"]["maxItems"], 3);
    assert_eq!(json["fields"]["company"]["fields"]["dba_name"]["required"], true);
}
