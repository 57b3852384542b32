use roster_core::StudentRecord;

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record = StudentRecord {
        id: "2024-CS-017".to_string(),
        name: "Ada Lovelace".to_string(),
        age: 27,
        course: "Mathematics".to_string(),
        email: "ada@example.org".to_string(),
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], "2024-CS-017");
    assert_eq!(json["name"], "Ada Lovelace");
    assert_eq!(json["age"], 27);
    assert_eq!(json["course"], "Mathematics");
    assert_eq!(json["email"], "ada@example.org");

    let decoded: StudentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}
