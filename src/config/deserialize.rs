// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates lists of Railway service names.

use serde::Deserialize;

/// Deserialize a list of service names, rejecting blank entries.
pub fn deserialize_service_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names: Vec<String> = Vec::deserialize(deserializer)?;
    names
        .into_iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(serde::de::Error::custom("service names cannot be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
