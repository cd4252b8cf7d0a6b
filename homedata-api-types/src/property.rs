use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row from one of the city datasets. Column order is the order the
/// backend serialized the keys in.
pub type PropertyRecord = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyLookupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<PropertyData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyData {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub building_id: Option<Value>,
    #[serde(default)]
    pub bbl: Option<Value>,
    #[serde(default)]
    pub hpd_violations: Option<Vec<PropertyRecord>>,
    #[serde(default)]
    pub hpd_violations_total_count: Option<u64>,
    #[serde(default)]
    pub complaints: Option<Vec<PropertyRecord>>,
    #[serde(default)]
    pub complaints_total_count: Option<u64>,
    #[serde(default)]
    pub bedbug_reports: Option<Vec<PropertyRecord>>,
    #[serde(default)]
    pub bedbug_reports_total_count: Option<u64>,
    #[serde(default)]
    pub litigation: Option<Vec<PropertyRecord>>,
    #[serde(default)]
    pub litigation_total_count: Option<u64>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_lookup_payload() {
        let payload = r#"{
            "success": true,
            "data": {
                "address": "123 MAIN ST",
                "zip_code": "10001",
                "building_id": 456,
                "bbl": null,
                "hpd_violations": [{"violationid": "1", "class": "B", "zip": "10001"}],
                "hpd_violations_total_count": 1,
                "complaints": []
            }
        }"#;
        let response: PropertyLookupResponse = serde_json::from_str(payload).unwrap();
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.building_id, Some(Value::from(456)));
        assert_eq!(data.bbl, None);
        let violations = data.hpd_violations.unwrap();
        // key order is the order the server sent them in
        assert_eq!(
            violations[0].keys().collect::<Vec<_>>(),
            vec!["violationid", "class", "zip"]
        );
        assert_eq!(data.complaints, Some(vec![]));
        assert_eq!(data.litigation, None);

        let failure: PropertyLookupResponse =
            serde_json::from_str(r#"{"success": false, "error": "Address not found"}"#).unwrap();
        assert!(!failure.success);
        assert_eq!(failure.error.as_deref(), Some("Address not found"));
    }
}
