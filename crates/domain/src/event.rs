use remedian_core::{AppError, AppResult, ResourceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used when no event shape yields a resource identifier.
pub const UNKNOWN_RESOURCE: &str = "UNKNOWN_RESOURCE";
/// Sentinel for an absent resource type.
pub const UNKNOWN_RESOURCE_TYPE: &str = "UNKNOWN_RESOURCE_TYPE";
/// Sentinel for an absent account field.
pub const UNKNOWN_ACCOUNT: &str = "UNKNOWN_ACCOUNT";
/// Sentinel for an absent region field.
pub const UNKNOWN_REGION: &str = "UNKNOWN_REGION";
/// Sentinel for an absent event timestamp.
pub const UNKNOWN_TIME: &str = "UNKNOWN_TIME";
/// Sentinel for an absent config rule name.
pub const UNKNOWN_RULE: &str = "UNKNOWN_RULE";

const MISSING_RESOURCE_ID_HELP: &str = "could not find a resource identifier in event; \
     expected one of: detail.resourceId, detail.configurationItem.resourceId, \
     Records[0].s3.bucket.name, or a top-level 'bucket' or 'resourceId' field";

/// Compliance verdict carried by an inbound finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceState {
    /// Resource was evaluated as compliant.
    Compliant,
    /// Resource was evaluated as violating a rule.
    NonCompliant,
    /// No verdict was present in the event.
    Unknown,
}

impl ComplianceState {
    /// Parses the verdict string used by the finding source.
    #[must_use]
    pub fn from_source(value: &str) -> Self {
        match value {
            "COMPLIANT" => Self::Compliant,
            "NON_COMPLIANT" => Self::NonCompliant,
            _ => Self::Unknown,
        }
    }

    /// Returns the stable source-format string for this verdict.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::NonCompliant => "NON_COMPLIANT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Canonical representation of one inbound compliance finding.
///
/// Constructed once per event via [`ComplianceEvent::normalize`] and
/// immutable afterwards. The full raw event is retained for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceEvent {
    resource_id: ResourceId,
    resource_type: String,
    compliance_state: ComplianceState,
    account: String,
    region: String,
    timestamp: String,
    rule_name: String,
    raw: Value,
}

impl ComplianceEvent {
    /// Normalizes a raw inbound event into the canonical shape.
    ///
    /// Tolerates three source shapes, taking the first one that yields a
    /// non-empty identifier:
    /// 1. structured finding: `detail.resourceId` or
    ///    `detail.configurationItem.resourceId`;
    /// 2. storage event: `Records[0].s3.bucket.name`;
    /// 3. manual/test: top-level `bucket` or `resourceId`.
    ///
    /// Missing optional fields resolve to the `UNKNOWN_*` sentinels. A
    /// missing identifier is the one fatal case and yields
    /// [`AppError::MissingResourceId`].
    pub fn normalize(raw: &Value) -> AppResult<Self> {
        let (resource_id, bucket_shape) = extract_resource_id(raw)?;

        let resource_type = string_at(raw, &["detail", "configurationItem", "resourceType"])
            .or_else(|| string_at(raw, &["detail", "resourceType"]))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| {
                if bucket_shape {
                    // The storage-event and manual shapes only ever describe buckets.
                    "AWS::S3::Bucket".to_owned()
                } else {
                    UNKNOWN_RESOURCE_TYPE.to_owned()
                }
            });

        let compliance_state = string_at(raw, &["detail", "newEvaluationResult", "complianceType"])
            .or_else(|| string_at(raw, &["detail", "evaluationResult", "complianceType"]))
            .map(ComplianceState::from_source)
            .unwrap_or_else(|| {
                if bucket_shape {
                    // Bucket-shaped events carry no verdict; their sources
                    // only emit them for violations.
                    ComplianceState::NonCompliant
                } else {
                    ComplianceState::Unknown
                }
            });

        Ok(Self {
            resource_id,
            resource_type,
            compliance_state,
            account: sentinel_string(raw, &["account"], UNKNOWN_ACCOUNT),
            region: sentinel_string(raw, &["region"], UNKNOWN_REGION),
            timestamp: sentinel_string(raw, &["time"], UNKNOWN_TIME),
            rule_name: sentinel_string(raw, &["detail", "configRuleName"], UNKNOWN_RULE),
            raw: raw.clone(),
        })
    }

    /// Returns the remediation target identifier.
    #[must_use]
    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Returns the source resource type string.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.resource_type.as_str()
    }

    /// Returns the compliance verdict.
    #[must_use]
    pub fn compliance_state(&self) -> ComplianceState {
        self.compliance_state
    }

    /// Returns the originating account, or its sentinel.
    #[must_use]
    pub fn account(&self) -> &str {
        self.account.as_str()
    }

    /// Returns the originating region, or its sentinel.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    /// Returns the event timestamp string, or its sentinel.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        self.timestamp.as_str()
    }

    /// Returns the evaluated rule name, or its sentinel.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        self.rule_name.as_str()
    }

    /// Returns the unmodified raw event retained for audit.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Extracts the identifier and whether it came from a bucket-specific shape.
fn extract_resource_id(raw: &Value) -> AppResult<(ResourceId, bool)> {
    let candidates: [(&[&str], bool); 5] = [
        (&["detail", "resourceId"], false),
        (&["detail", "configurationItem", "resourceId"], false),
        (&["Records", "0", "s3", "bucket", "name"], true),
        (&["bucket"], true),
        (&["resourceId"], false),
    ];

    for (path, bucket_shape) in candidates {
        if let Some(value) = string_at(raw, path)
            && !value.trim().is_empty()
        {
            return Ok((ResourceId::new(value)?, bucket_shape));
        }
    }

    Err(AppError::MissingResourceId(
        MISSING_RESOURCE_ID_HELP.to_owned(),
    ))
}

/// Walks a nested lookup path; numeric segments index into arrays.
fn value_at<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = raw;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

fn string_at<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(raw, path).and_then(Value::as_str)
}

fn sentinel_string(raw: &Value, path: &[&str], sentinel: &str) -> String {
    string_at(raw, path)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(sentinel)
        .to_owned()
}
