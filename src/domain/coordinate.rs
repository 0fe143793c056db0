/// A geographic position in degrees. Alternate upstream shapes are normalized
/// into this one at the ingestion boundary; the engine never sees a union type.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }
}
