//! Great-circle distance and nearest-first ordering.

use serde::Serialize;

use crate::normalize::ShopCandidate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A relevant shop with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedShop {
    #[serde(flatten)]
    pub shop: ShopCandidate,
    pub distance_meters: u64,
}

/// Haversine distance in meters between two `(lat, lng)` points in degrees.
#[must_use]
pub fn haversine_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lng2) = (to.0.to_radians(), to.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Attach rounded distances from `origin` and sort nearest first.
///
/// The sort is stable: shops at equal distance keep their input order.
#[must_use]
pub fn rank_by_distance(origin: (f64, f64), candidates: Vec<ShopCandidate>) -> Vec<RankedShop> {
    let mut ranked: Vec<RankedShop> = candidates
        .into_iter()
        .map(|shop| {
            let meters = haversine_meters(origin, (shop.lat, shop.lng));
            // Distances are bounded by half the Earth's circumference (~20 000 km).
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let distance_meters = meters.round() as u64;
            RankedShop {
                shop,
                distance_meters,
            }
        })
        .collect();

    ranked.sort_by_key(|r| r.distance_meters);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SourceKind;

    fn candidate(id: &str, lat: f64, lng: f64) -> ShopCandidate {
        ShopCandidate {
            source_kind: SourceKind::Point,
            place_id: id.to_owned(),
            name: format!("Phone {id}"),
            address: String::new(),
            phone: String::new(),
            lat,
            lng,
        }
    }

    #[test]
    fn hundredth_degree_east_of_origin_is_about_1113_m() {
        let d = haversine_meters((0.0, 0.0), (0.0, 0.01));
        assert!((d - 1113.0).abs() <= 2.0, "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        assert!(haversine_meters((12.97, 77.59), (12.97, 77.59)).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = (12.97, 77.59);
        let b = (13.08, 80.27);
        assert!((haversine_meters(a, b) - haversine_meters(b, a)).abs() < 1e-6);
    }

    #[test]
    fn rank_rounds_to_nearest_meter() {
        let ranked = rank_by_distance((0.0, 0.0), vec![candidate("a", 0.0, 0.01)]);
        let expected = haversine_meters((0.0, 0.0), (0.0, 0.01)).round();
        #[allow(clippy::cast_precision_loss)]
        let got = ranked[0].distance_meters as f64;
        assert!((got - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn rank_sorts_ascending() {
        let ranked = rank_by_distance(
            (12.0, 77.0),
            vec![
                candidate("far", 12.05, 77.0),
                candidate("near", 12.001, 77.0),
                candidate("mid", 12.01, 77.0),
            ],
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.shop.place_id.as_str()).collect();
        assert_eq!(ids, ["near", "mid", "far"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].distance_meters <= w[1].distance_meters));
    }

    #[test]
    fn rank_is_stable_for_equal_distances() {
        // Mirror-image points are equidistant from the origin.
        let ranked = rank_by_distance(
            (12.0, 77.0),
            vec![
                candidate("east", 12.0, 77.01),
                candidate("west", 12.0, 76.99),
                candidate("closer", 12.0, 77.001),
            ],
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.shop.place_id.as_str()).collect();
        assert_eq!(ids, ["closer", "east", "west"]);
    }

    #[test]
    fn rank_output_is_permutation_of_input() {
        let input = vec![
            candidate("a", 12.02, 77.0),
            candidate("b", 12.0, 77.03),
            candidate("c", 11.99, 77.0),
            candidate("d", 12.0, 77.0),
        ];
        let ranked = rank_by_distance((12.0, 77.0), input.clone());
        assert_eq!(ranked.len(), input.len());
        for c in &input {
            assert!(ranked.iter().any(|r| &r.shop == c), "missing {}", c.place_id);
        }
    }

    #[test]
    fn ranked_shop_serializes_flat() {
        let ranked = rank_by_distance((0.0, 0.0), vec![candidate("node-1", 0.0, 0.01)]);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["placeId"], "node-1");
        assert_eq!(json["name"], "Phone node-1");
        assert_eq!(json["address"], "");
        assert_eq!(json["phone"], "");
        assert!(json["lat"].is_number());
        assert!(json["lng"].is_number());
        assert!(json["distanceMeters"].is_u64());
        assert!(json.get("shop").is_none());
    }
}
