use serde::{Deserialize, Serialize};

use crate::reset_keys::ResetKeyDescriptor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResetKey {
    #[serde(default)]
    pub reset_key: Option<String>,
}

impl ValidateResetKey {
    /// The submitted key, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.reset_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResetKeyResponse<'a> {
    pub success: bool,
    #[serde(flatten)]
    pub descriptor: Option<&'a ResetKeyDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<'a> ValidateResetKeyResponse<'a> {
    pub fn accepted(descriptor: &'a ResetKeyDescriptor) -> Self {
        Self {
            success: true,
            descriptor: Some(descriptor),
            message: None,
        }
    }

    pub fn rejected(message: &'static str) -> Self {
        Self {
            success: false,
            descriptor: None,
            message: Some(message),
        }
    }
}
