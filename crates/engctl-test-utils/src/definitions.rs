//! Canned entity definition documents.

/// A dimension definition with the given id and field.
pub fn dimension(id: &str, field: &str) -> String {
    format!(
        r#"{{"qInfo": {{"qId": "{id}", "qType": "dimension"}}, "qDim": {{"qFieldDefs": ["{field}"], "title": "{field}"}}}}"#
    )
}

/// A measure definition with the given id and expression.
pub fn measure(id: &str, expression: &str) -> String {
    format!(
        r#"{{"qInfo": {{"qId": "{id}", "qType": "measure"}}, "qMeasure": {{"qDef": "{expression}", "title": "{id}"}}}}"#
    )
}

/// A JSON array wrapping several definitions.
pub fn list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}
