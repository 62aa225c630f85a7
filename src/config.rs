//! Configuration preprocessing.
//!
//! Two near-pure operations run once per connect attempt, before any
//! receiver activity: request-config normalization and module-config
//! defaulting. Both mutate the caller's value in place; this in-place
//! contract is deliberate and part of the public behavior, since callers
//! may inspect their own configuration after connecting.
//!
//! Any error raised here short-circuits the connect attempt; the receiver
//! is never invoked.

use crate::{Error, RawDataPackage, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied connection parameters.
///
/// Opaque to this layer except for one normalization rule (see
/// [`preprocess_request_config`]): a top-level `channels` sequence is copied
/// into `body.channels` unless the caller already supplied one. All other
/// fields are interpreted solely by the receiver collaborator.
///
/// Must be a JSON object; anything else fails preprocessing with
/// [`Error::InvalidArgument`].
pub type RequestConfig = Value;

/// Extraction result: the `(channel, data)` pair re-emitted on the facade.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedData {
    /// Channel identifier for the facade `Data` event.
    pub channel: String,
    /// Payload for the facade `Data` event.
    pub data: Value,
}

/// Maps a raw data package to the `(channel, data)` pair emitted on the
/// subscription handle.
pub type DataExtractor = Arc<dyn Fn(&RawDataPackage) -> ExtractedData + Send + Sync>;

/// Predicate recognizing acknowledgement packages.
pub type AcknowledgeFilter = fn(&RawDataPackage) -> bool;

/// Default extractor: projects the package's own `channel` and `data`.
fn default_data_extractor(package: &RawDataPackage) -> ExtractedData {
    // ---
    ExtractedData {
        channel: package.channel.clone(),
        data: package.data.clone(),
    }
}

/// Built-in acknowledgement predicate: `name == "acknowledge"`.
fn is_acknowledge(package: &RawDataPackage) -> bool {
    package.name.as_deref() == Some("acknowledge")
}

pub(crate) fn default_extractor() -> DataExtractor {
    Arc::new(default_data_extractor)
}

/// Caller-supplied behavioral hooks.
///
/// Constructed once per adapter instance, filled in by
/// [`preprocess_module_config`] during connect, then handed by reference to
/// the receiver collaborator. After preprocessing both fields are `Some`.
#[derive(Clone, Default)]
pub struct ModuleConfig {
    /// Maps raw data packages to `(channel, data)`. When the caller supplies
    /// none, preprocessing installs the default projection of the package's
    /// `channel` and `data` fields.
    pub data_extractor: Option<DataExtractor>,

    /// Acknowledgement predicate. Always overwritten by preprocessing with
    /// the built-in `name == "acknowledge"` check; a caller-supplied value
    /// is discarded. Installed for the receiver's benefit; the adapter's
    /// forwarding path does not consult it.
    pub is_acknowledge_filter: Option<AcknowledgeFilter>,
}

impl ModuleConfig {
    /// Config with a caller-supplied data extractor.
    pub fn with_data_extractor(
        extractor: impl Fn(&RawDataPackage) -> ExtractedData + Send + Sync + 'static,
    ) -> Self {
        Self {
            data_extractor: Some(Arc::new(extractor)),
            is_acknowledge_filter: None,
        }
    }
}

impl fmt::Debug for ModuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Closures aren't Debug; report presence only.
        f.debug_struct("ModuleConfig")
            .field("data_extractor", &self.data_extractor.is_some())
            .field(
                "is_acknowledge_filter",
                &self.is_acknowledge_filter.is_some(),
            )
            .finish()
    }
}

/// Normalize a request configuration in place.
///
/// Fails with [`Error::InvalidArgument`] if `request` is not a JSON object;
/// this is the only input validation performed. If `channels` is present and
/// non-null: `body` is created as `{}` when missing, and `body.channels` is
/// populated from `channels` when absent or null. An explicitly supplied
/// `body.channels` always wins. A present `body` that is not an object is
/// rejected, since the normalization target doesn't exist.
///
/// Side effect: mutates the caller's value; no defensive copy is taken.
pub fn preprocess_request_config(request: &mut RequestConfig) -> Result<()> {
    // ---
    let Some(fields) = request.as_object_mut() else {
        return Err(Error::InvalidArgument(
            "request config must be an object".into(),
        ));
    };

    let channels = match fields.get("channels") {
        Some(value) if !value.is_null() => value.clone(),
        _ => return Ok(()),
    };

    let body = fields
        .entry("body")
        .or_insert_with(|| Value::Object(Map::new()));

    let Some(body) = body.as_object_mut() else {
        return Err(Error::InvalidArgument(
            "request config body must be an object".into(),
        ));
    };

    match body.get("channels") {
        Some(existing) if !existing.is_null() => {}
        _ => {
            body.insert("channels".into(), channels);
        }
    }

    Ok(())
}

/// Fill in module-config defaults in place.
///
/// Installs the default data extractor when the caller supplied none, and
/// unconditionally overwrites the acknowledge filter with the built-in
/// predicate, discarding any caller-supplied value.
pub fn preprocess_module_config(module: &mut ModuleConfig) {
    // ---
    if module.data_extractor.is_none() {
        module.data_extractor = Some(default_extractor());
    }
    module.is_acknowledge_filter = Some(is_acknowledge);
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn package(channel: &str, data: Value, name: Option<&str>) -> RawDataPackage {
        RawDataPackage {
            channel: channel.into(),
            data,
            name: name.map(String::from),
        }
    }

    #[test]
    fn test_rejects_non_object_request() {
        // ---
        for mut request in [json!(null), json!(42), json!("uri"), json!([1, 2])] {
            let err = preprocess_request_config(&mut request).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
        }
    }

    #[test]
    fn test_channels_populate_missing_body() {
        // ---
        let mut request = json!({ "uri": "sub://host", "channels": ["a", "b"] });

        preprocess_request_config(&mut request).unwrap();

        assert_eq!(request["body"]["channels"], json!(["a", "b"]));
        // Top-level channels are left untouched.
        assert_eq!(request["channels"], json!(["a", "b"]));
    }

    #[test]
    fn test_channels_populate_body_without_channels() {
        // ---
        let mut request = json!({ "channels": ["a"], "body": { "token": "t" } });

        preprocess_request_config(&mut request).unwrap();

        assert_eq!(request["body"]["channels"], json!(["a"]));
        assert_eq!(request["body"]["token"], json!("t"));
    }

    #[test]
    fn test_explicit_body_channels_win() {
        // ---
        let mut request = json!({
            "channels": ["a", "b"],
            "body": { "channels": ["explicit"] }
        });

        preprocess_request_config(&mut request).unwrap();

        assert_eq!(request["body"]["channels"], json!(["explicit"]));
    }

    #[test]
    fn test_no_channels_leaves_request_untouched() {
        // ---
        let mut request = json!({ "uri": "sub://host" });
        let before = request.clone();

        preprocess_request_config(&mut request).unwrap();

        assert_eq!(request, before);
        assert!(request.get("body").is_none());
    }

    #[test]
    fn test_non_object_body_rejected() {
        // ---
        let mut request = json!({ "channels": ["a"], "body": "nope" });

        let err = preprocess_request_config(&mut request).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_default_extractor_installed() {
        // ---
        let mut module = ModuleConfig::default();

        preprocess_module_config(&mut module);

        let extractor = module.data_extractor.expect("extractor installed");
        let extracted = extractor(&package("c", json!("d"), Some("x")));

        assert_eq!(
            extracted,
            ExtractedData {
                channel: "c".into(),
                data: json!("d"),
            }
        );
    }

    #[test]
    fn test_caller_extractor_kept() {
        // ---
        let mut module = ModuleConfig::with_data_extractor(|pkg| ExtractedData {
            channel: format!("custom/{}", pkg.channel),
            data: pkg.data.clone(),
        });

        preprocess_module_config(&mut module);

        let extractor = module.data_extractor.expect("extractor kept");
        let extracted = extractor(&package("c", json!(1), None));
        assert_eq!(extracted.channel, "custom/c");
    }

    #[test]
    fn test_acknowledge_filter_always_overwritten() {
        // ---
        let mut module = ModuleConfig {
            data_extractor: None,
            // Caller tries to recognize everything as an acknowledgement.
            is_acknowledge_filter: Some(|_| true),
        };

        preprocess_module_config(&mut module);

        let filter = module.is_acknowledge_filter.expect("filter installed");
        assert!(filter(&package("c", json!(0), Some("acknowledge"))));
        assert!(!filter(&package("c", json!(0), Some("data"))));
        assert!(!filter(&package("c", json!(0), None)));
    }
}
