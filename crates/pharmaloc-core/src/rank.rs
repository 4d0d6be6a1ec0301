//! Distance ranking of search candidates.

use crate::geo::{haversine_km, round_km, Coordinate};
use crate::pharmacy::SearchResult;

/// Populate `distance_km` on every candidate and order them nearest first.
///
/// Distances are rounded to one decimal place *before* sorting, so two
/// candidates whose rounded distances are equal keep their input order even
/// if their unrounded distances differ. The sort is stable.
#[must_use]
pub fn rank(results: Vec<SearchResult>, origin: Coordinate) -> Vec<SearchResult> {
    let mut ranked: Vec<(f64, SearchResult)> = results
        .into_iter()
        .map(|mut result| {
            let km = round_km(haversine_km(origin, result.pharmacy.location));
            result.pharmacy.distance_km = Some(km);
            (km, result)
        })
        .collect();

    ranked.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    ranked.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharmacy::{Pharmacy, PharmacyStatus};

    const ORIGIN: Coordinate = Coordinate::OUAGADOUGOU;

    fn candidate(id: &str, lat: f64, lng: f64) -> SearchResult {
        SearchResult::pharmacy_only(Pharmacy {
            id: id.to_string(),
            name: format!("Pharmacie {id}"),
            location: Coordinate::new(lat, lng).expect("valid coordinate"),
            address: None,
            city: None,
            phone: None,
            status: PharmacyStatus::Open,
            distance_km: None,
        })
    }

    /// A point due north of the origin at roughly `km` kilometres.
    fn north_of_origin(id: &str, km: f64) -> SearchResult {
        let degrees = (km / crate::geo::EARTH_RADIUS_KM).to_degrees();
        candidate(id, ORIGIN.lat + degrees, ORIGIN.lng)
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.pharmacy.id.as_str()).collect()
    }

    fn distances(results: &[SearchResult]) -> Vec<f64> {
        results
            .iter()
            .map(|r| r.pharmacy.distance_km.expect("distance populated"))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rank(Vec::new(), ORIGIN).is_empty());
    }

    #[test]
    fn candidate_at_origin_is_zero_and_first() {
        let ranked = rank(
            vec![
                candidate("far", 12.3714, -1.6197),
                candidate("here", ORIGIN.lat, ORIGIN.lng),
            ],
            ORIGIN,
        );
        assert_eq!(ids(&ranked), ["here", "far"]);
        assert_eq!(ranked[0].pharmacy.distance_km, Some(0.0));
    }

    #[test]
    fn tenth_degree_east_lands_near_eleven_km() {
        let ranked = rank(vec![candidate("east", 12.3714, -1.6197)], ORIGIN);
        let km = ranked[0].pharmacy.distance_km.expect("distance populated");
        assert!((10.5..=11.5).contains(&km), "got {km}");
    }

    #[test]
    fn orders_by_ascending_distance() {
        let ranked = rank(
            vec![
                north_of_origin("five", 5.0),
                north_of_origin("one", 1.0),
                north_of_origin("three", 3.0),
            ],
            ORIGIN,
        );
        assert_eq!(ids(&ranked), ["one", "three", "five"]);
        assert_eq!(distances(&ranked), [1.0, 3.0, 5.0]);
    }

    #[test]
    fn output_is_monotonic() {
        let ranked = rank(
            vec![
                candidate("a", 12.40, -1.50),
                candidate("b", 12.30, -1.55),
                candidate("c", 12.37, -1.52),
                candidate("d", 11.18, -4.30),
                candidate("e", 12.36, -1.49),
            ],
            ORIGIN,
        );
        let d = distances(&ranked);
        assert!(d.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {d:?}");
    }

    #[test]
    fn identical_coordinates_keep_input_order() {
        let ranked = rank(
            vec![
                candidate("second-closest-a", 12.38, -1.52),
                candidate("closest", ORIGIN.lat, ORIGIN.lng),
                candidate("second-closest-b", 12.38, -1.52),
            ],
            ORIGIN,
        );
        assert_eq!(
            ids(&ranked),
            ["closest", "second-closest-a", "second-closest-b"]
        );
    }

    #[test]
    fn equal_rounded_distances_keep_input_order() {
        // 2.54 km and 2.46 km both round to 2.5; input order wins over the
        // unrounded distance.
        let ranked = rank(
            vec![
                north_of_origin("farther", 2.54),
                north_of_origin("nearer", 2.46),
            ],
            ORIGIN,
        );
        assert_eq!(ids(&ranked), ["farther", "nearer"]);
        assert_eq!(distances(&ranked), [2.5, 2.5]);
    }

    #[test]
    fn antipodal_candidate_ranks_last_with_a_real_distance() {
        let origin = Coordinate::new(-87.5, -179.5).expect("valid coordinate");
        let ranked = rank(
            vec![candidate("anti", 87.5, 0.5), candidate("near", -87.49, -179.5)],
            origin,
        );
        assert_eq!(ids(&ranked), ["near", "anti"]);
        let d = distances(&ranked);
        assert!(d.iter().all(|km| km.is_finite()), "got {d:?}");
        assert!(d[1] > 20_000.0, "got {d:?}");
    }
}
