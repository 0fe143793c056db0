use crate::domain::Coordinate;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Upstream route documents are inconsistent about the coordinate shape:
        // some carry short field names, some long ones, some a GeoJSON-style
        // [lng, lat] pair. All of them normalize to one Coordinate here.
        #[derive(Debug, Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Short { lat: f64, lng: f64 },
            Long { latitude: f64, longitude: f64 },
            Pair([f64; 2]),
        }

        let (lat, lng) = match Shape::deserialize(deserializer)? {
            Shape::Short { lat, lng } => (lat, lng),
            Shape::Long { latitude, longitude } => (latitude, longitude),
            Shape::Pair([lng, lat]) => (lat, lng),
        };

        if !(lat >= -90.0 && lat <= 90.0) {
            return Err(Error::custom(format!("invalid latitude: {}, must be between -90 and 90", lat)));
        }

        if !(lng >= -180.0 && lng <= 180.0) {
            return Err(Error::custom(format!("invalid longitude: {}, must be between -180 and 180", lng)));
        }

        Ok(Coordinate { lat, lng })
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Coordinate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"lat": 51.5074, "lng": -0.1278}"#)]
    #[case(r#"{"latitude": 51.5074, "longitude": -0.1278}"#)]
    #[case(r#"[-0.1278, 51.5074]"#)]
    fn normalizes_every_upstream_shape(#[case] json: &str) {
        let coordinate = serde_json::from_str::<Coordinate>(json).unwrap();

        assert_eq!(coordinate, Coordinate::new(51.5074, -0.1278));
    }

    #[rstest]
    #[case(r#"{"lat": 91.0, "lng": 0.0}"#)]
    #[case(r#"{"lat": 0.0, "lng": -180.5}"#)]
    #[case(r#"{"lat": 51.5074}"#)]
    fn rejects_out_of_range_or_incomplete_coordinates(#[case] json: &str) {
        assert!(serde_json::from_str::<Coordinate>(json).is_err());
    }
}
