mod common;

use common::{record_north, retriever, FakeStore};
use pharmaloc_core::{Coordinate, PharmacyStatus};
use pharmaloc_search::{
    CandidateSource, GeolocationError, LocationResolver, LocationStatus, ReportedPosition,
    ResolveOptions, SearchRequest, SearchService,
};

fn resolver(position: ReportedPosition) -> LocationResolver<ReportedPosition> {
    LocationResolver::new(position, Coordinate::OUAGADOUGOU)
}

#[tokio::test]
async fn empty_term_ranks_nearest_first() {
    let store = FakeStore::with_pharmacies(vec![
        record_north("five", 5.0),
        record_north("one", 1.0),
        record_north("three", 3.0),
    ]);
    let service = SearchService::new(retriever(store));

    let outcome = service
        .search(
            &resolver(ReportedPosition::Fix(Coordinate::OUAGADOUGOU)),
            &ResolveOptions::default(),
            &SearchRequest::new(""),
        )
        .await;

    assert_eq!(outcome.source, CandidateSource::Store);
    assert_eq!(outcome.location.status, LocationStatus::Granted);
    let ids: Vec<_> = outcome.results.iter().map(|r| r.pharmacy.id.as_str()).collect();
    assert_eq!(ids, ["one", "three", "five"]);
    let distances: Vec<f64> = outcome
        .results
        .iter()
        .map(|r| r.pharmacy.distance_km.expect("ranked"))
        .collect();
    assert_eq!(distances, [1.0, 3.0, 5.0]);
}

#[tokio::test]
async fn denied_location_still_searches_from_default() {
    let service = SearchService::new(retriever(FakeStore::Failing));

    let outcome = service
        .search(
            &resolver(ReportedPosition::Error(GeolocationError::PermissionDenied)),
            &ResolveOptions::default(),
            &SearchRequest::new(""),
        )
        .await;

    assert_eq!(outcome.location.status, LocationStatus::Denied);
    assert_eq!(outcome.location.coordinate, Coordinate::OUAGADOUGOU);
    assert_eq!(outcome.source, CandidateSource::Fallback);
    assert_eq!(outcome.results.len(), common::dataset().pharmacies.len());
    assert!(outcome
        .results
        .windows(2)
        .all(|w| w[0].pharmacy.distance_km <= w[1].pharmacy.distance_km));
    let first = &outcome.results[0].pharmacy;
    assert_eq!(first.distance_km, Some(0.0), "the centre pharmacy sits on the origin");
}

#[tokio::test]
async fn on_duty_lists_only_the_roster() {
    let service = SearchService::new(retriever(FakeStore::empty()));

    let outcome = service
        .on_duty(
            &resolver(ReportedPosition::Missing),
            &ResolveOptions::default(),
        )
        .await;

    assert_eq!(outcome.location.status, LocationStatus::Default);
    assert!(!outcome.results.is_empty());
    assert!(outcome
        .results
        .iter()
        .all(|r| r.pharmacy.status == PharmacyStatus::OnDuty));
}

#[tokio::test]
async fn limit_keeps_the_nearest() {
    let store = FakeStore::with_pharmacies(vec![
        record_north("far", 9.0),
        record_north("near", 0.5),
        record_north("mid", 4.0),
    ]);
    let service = SearchService::new(retriever(store));
    let request = SearchRequest {
        limit: Some(2),
        ..SearchRequest::new("")
    };

    let outcome = service
        .search(
            &resolver(ReportedPosition::Fix(Coordinate::OUAGADOUGOU)),
            &ResolveOptions::default(),
            &request,
        )
        .await;

    let ids: Vec<_> = outcome.results.iter().map(|r| r.pharmacy.id.as_str()).collect();
    assert_eq!(ids, ["near", "mid"]);
}

#[tokio::test]
async fn outcome_serializes_with_status_labels() {
    let service = SearchService::new(retriever(FakeStore::Failing));
    let outcome = service
        .search(
            &resolver(ReportedPosition::Missing),
            &ResolveOptions::default(),
            &SearchRequest::new("doliprane"),
        )
        .await;

    let json = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(json["location"]["status"], "default");
    assert_eq!(json["source"], "fallback");
    let first = &json["results"][0];
    assert!(first["pharmacy"]["location"]["lat"].is_f64());
    assert!(first["pharmacy"]["distance_km"].is_f64());
    assert!(first["product"]["unit_price"].is_string());
}
