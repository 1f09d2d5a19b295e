use crate::models::{NormalizedStore, RawFeature};

/// Display name used when a feature has no `name` tag
pub const UNKNOWN_NAME: &str = "Unknown";

/// Phone placeholder used when no phone tag is present
pub const MISSING_PHONE: &str = "N/A";

/// Tag keys checked for a phone number, in priority order
pub const PHONE_TAGS: [&str; 2] = ["phone", "contact:phone"];

/// Resolve a feature's position from its direct or center coordinates
#[inline]
pub fn feature_position(feature: &RawFeature) -> Option<(f64, f64)> {
    match (feature.lat, feature.lon) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => feature.center.map(|c| (c.lat, c.lon)),
    }
}

/// Map one raw upstream element into the uniform output shape
///
/// Returns `None` when the element has no usable position.
pub fn normalize_feature(feature: &RawFeature) -> Option<NormalizedStore> {
    let (lat, lon) = feature_position(feature)?;

    let name = feature.tag("name").unwrap_or(UNKNOWN_NAME);
    let phone = PHONE_TAGS
        .iter()
        .find_map(|key| feature.tag(key))
        .unwrap_or(MISSING_PHONE);

    Some(NormalizedStore {
        id: feature.id,
        name: name.to_string(),
        phone: phone.to_string(),
        lat,
        lon,
    })
}

/// Normalize a batch of features, dropping the ones that cannot be placed
pub fn normalize_features(features: &[RawFeature]) -> Vec<NormalizedStore> {
    features
        .iter()
        .filter_map(|feature| {
            let store = normalize_feature(feature);
            if store.is_none() {
                tracing::debug!("Dropping feature {} without coordinates", feature.id);
            }
            store
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureCenter;
    use std::collections::HashMap;

    fn feature(id: u64, tags: &[(&str, &str)]) -> RawFeature {
        RawFeature {
            id,
            element_type: Some("node".to_string()),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            lat: Some(1.0),
            lon: Some(2.0),
            center: None,
        }
    }

    #[test]
    fn test_direct_coordinates_and_tags() {
        let store = normalize_feature(&feature(5, &[("name", "Apollo"), ("phone", "123")])).unwrap();

        assert_eq!(
            store,
            NormalizedStore {
                id: 5,
                name: "Apollo".to_string(),
                phone: "123".to_string(),
                lat: 1.0,
                lon: 2.0,
            }
        );
    }

    #[test]
    fn test_center_fallback_and_defaults() {
        let raw = RawFeature {
            id: 9,
            element_type: Some("way".to_string()),
            tags: HashMap::new(),
            lat: None,
            lon: None,
            center: Some(FeatureCenter { lat: 3.0, lon: 4.0 }),
        };

        let store = normalize_feature(&raw).unwrap();
        assert_eq!(store.name, UNKNOWN_NAME);
        assert_eq!(store.phone, MISSING_PHONE);
        assert_eq!((store.lat, store.lon), (3.0, 4.0));
    }

    #[test]
    fn test_contact_phone_fallback() {
        let store = normalize_feature(&feature(1, &[("contact:phone", "+91 80 1234")])).unwrap();
        assert_eq!(store.phone, "+91 80 1234");
    }

    #[test]
    fn test_phone_takes_priority_over_contact_phone() {
        let store =
            normalize_feature(&feature(1, &[("phone", "111"), ("contact:phone", "222")])).unwrap();
        assert_eq!(store.phone, "111");
    }

    #[test]
    fn test_empty_phone_falls_through() {
        let store = normalize_feature(&feature(1, &[("phone", ""), ("contact:phone", "222")])).unwrap();
        assert_eq!(store.phone, "222");
    }

    #[test]
    fn test_feature_without_position_is_dropped() {
        let mut raw = feature(3, &[("name", "Nowhere")]);
        raw.lat = None;
        raw.lon = None;

        assert!(normalize_feature(&raw).is_none());
        assert!(normalize_features(&[raw, feature(4, &[])]).len() == 1);
    }
}
