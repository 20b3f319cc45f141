use crate::framework::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};

resource_id!(TyreSizeId);

/// A tyre dimension such as 205/55 R16.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreSize {
    #[serde(alias = "_id")]
    pub id: TyreSizeId,
    pub width: u32,
    pub aspect_ratio: u32,
    pub rim_diameter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TyreSize {
    /// The backend label, or the standard `width/ratio Rrim` notation.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => format!("{}/{} R{}", self.width, self.aspect_ratio, self.rim_diameter),
        }
    }
}

impl Resource for TyreSize {
    const KIND: ResourceKind = ResourceKind::TyreSize;

    type Id = TyreSizeId;
    type Create = TyreSizeCreate;
    type Update = TyreSizeUpdate;

    fn id(&self) -> &TyreSizeId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreSizeCreate {
    pub width: u32,
    pub aspect_ratio: u32,
    pub rim_diameter: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TyreSizeCreate {
    pub fn new(width: u32, aspect_ratio: u32, rim_diameter: u32) -> Self {
        Self {
            width,
            aspect_ratio,
            rim_diameter,
            label: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreSizeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rim_diameter: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

json_body!(TyreSizeCreate, TyreSizeUpdate);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_label_fallback() {
        let size: TyreSize = serde_json::from_value(json!({
            "_id": "s_1", "width": 205, "aspectRatio": 55, "rimDiameter": 16
        }))
        .unwrap();
        assert_eq!(size.display_label(), "205/55 R16");
    }

    #[test]
    fn test_update_body_is_sparse() {
        let update = TyreSizeUpdate {
            rim_diameter: Some(17),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({ "rimDiameter": 17 }));
    }
}
