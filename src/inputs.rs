//! Caller-supplied flow inputs.

use crate::error::FlowError;
use crate::schema::FlowInput;
use std::collections::BTreeMap;

/// Parse repeated `key=value` arguments into an input map.
///
/// Values may contain `=`; only the first one separates key from value. A
/// later entry for the same key replaces an earlier one.
pub fn parse_inputs<S: AsRef<str>>(raw: &[S]) -> Result<BTreeMap<String, String>, FlowError> {
    let mut inputs = BTreeMap::new();
    for entry in raw {
        let entry = entry.as_ref();
        let (key, value) = entry
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| FlowError::MalformedInput(entry.to_string()))?;
        inputs.insert(key.to_string(), value.to_string());
    }
    Ok(inputs)
}

/// Check that every mandatory input declared by the flow was supplied.
pub fn check_mandatory(
    declared: &[FlowInput],
    supplied: &BTreeMap<String, String>,
) -> Result<(), FlowError> {
    let missing: Vec<String> = declared
        .iter()
        .filter(|input| input.mandatory && !supplied.contains_key(&input.name))
        .map(|input| input.name.clone())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(FlowError::MissingInputs(missing))
}
