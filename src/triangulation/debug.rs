//! GeoJSON debug export.
//!
//! Serialises the active triangles as a GeoJSON `FeatureCollection` so a
//! mesh can be eyeballed in GIS tools or diffed against golden files. The
//! output is pretty-printed with two-space indentation and is stable for a
//! given mesh.

use num_traits::Float;
use serde::Serialize;

use crate::triangulation::delaunay::Delaunay;
use crate::triangulation::mesh::EMPTY;

#[derive(Serialize)]
struct Geometry<F> {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<Vec<[F; 2]>>,
}

#[derive(Serialize)]
struct Properties {
    id: usize,
    neighbours: [i64; 3],
}

#[derive(Serialize)]
struct Feature<F> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Geometry<F>,
    properties: Properties,
}

#[derive(Serialize)]
struct FeatureCollection<F> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<F>>,
}

impl<F: Float + Serialize> Delaunay<F> {
    /// Serialises the active triangles as pretty-printed GeoJSON.
    ///
    /// Each feature is a closed polygon ring with the triangle's id and its
    /// three neighbour indices as properties; boundary slots serialise as
    /// `-1`.
    pub fn debug_json(&self) -> Result<String, serde_json::Error> {
        let mut fc = FeatureCollection {
            kind: "FeatureCollection",
            features: Vec::with_capacity(self.triangles.len()),
        };

        for (i, t) in self.triangles.iter().enumerate() {
            if !t.active {
                continue;
            }

            let p1 = self.points[t.vertices[0]];
            let p2 = self.points[t.vertices[1]];
            let p3 = self.points[t.vertices[2]];

            let ring = vec![
                [p1.x, p1.y],
                [p2.x, p2.y],
                [p3.x, p3.y],
                [p1.x, p1.y],
            ];

            let mut neighbours = [-1i64; 3];
            for (slot, &n) in t.neighbors.iter().enumerate() {
                if n != EMPTY {
                    neighbours[slot] = n as i64;
                }
            }

            fc.features.push(Feature {
                kind: "Feature",
                geometry: Geometry {
                    kind: "Polygon",
                    coordinates: vec![ring],
                },
                properties: Properties { id: i, neighbours },
            });
        }

        serde_json::to_string_pretty(&fc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;
    use serde_json::Value;

    fn triangulated(coords: &[(f64, f64)]) -> Delaunay<f64> {
        let points: Vec<Point2<f64>> =
            coords.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        let mut d = Delaunay::new(&points).unwrap();
        d.triangulate();
        d
    }

    #[test]
    fn test_round_trips_through_serde() {
        let d = triangulated(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let json = d.debug_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), d.triangles().len());

        for feature in features {
            assert_eq!(feature["type"], "Feature");
            assert_eq!(feature["geometry"]["type"], "Polygon");

            let rings = feature["geometry"]["coordinates"].as_array().unwrap();
            assert_eq!(rings.len(), 1);
            let ring = rings[0].as_array().unwrap();
            assert_eq!(ring.len(), 4);
            assert_eq!(ring[0], ring[3], "polygon ring must close");

            let neighbours = feature["properties"]["neighbours"].as_array().unwrap();
            assert_eq!(neighbours.len(), 3);
        }
    }

    #[test]
    fn test_boundary_slots_serialise_as_minus_one() {
        let d = triangulated(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        let json = d.debug_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let neighbours = value["features"][0]["properties"]["neighbours"]
            .as_array()
            .unwrap();
        assert!(neighbours.iter().all(|n| n.as_i64() == Some(-1)));
    }

    #[test]
    fn test_pretty_printed_two_space_indent() {
        let d = triangulated(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        let json = d.debug_json().unwrap();
        assert!(json.starts_with("{\n  \"type\""));
        assert!(!json.starts_with('\u{feff}'), "output must not carry a BOM");
    }
}
