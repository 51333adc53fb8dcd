//! Provider location
//!
//! Pipeline for a search: resolve the location text to coordinates, ask the
//! provider directory for candidates, measure the geodesic distance to each,
//! keep the ones with the requested specialization inside the radius, and
//! sort them nearest first.

use crate::TelemedError;
use crate::config::TelemedConfig;
use crate::directory::{self, ProviderDirectory};
use crate::geo::geodesic_distance_km;
use crate::geocoding::{Geocoder, LocationInput, LocationParser, OpenMeteoGeocoder};
use crate::models::{Coordinates, Location, Provider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Finds providers near a free-text location
pub struct ProviderLocator {
    geocoder: Arc<dyn Geocoder>,
    directory: Arc<dyn ProviderDirectory>,
}

impl ProviderLocator {
    pub fn new(geocoder: Arc<dyn Geocoder>, directory: Arc<dyn ProviderDirectory>) -> Self {
        Self {
            geocoder,
            directory,
        }
    }

    /// OpenMeteo geocoding plus the directory selected in configuration
    pub fn from_config(config: &TelemedConfig) -> Result<Self> {
        let geocoder = Arc::new(OpenMeteoGeocoder::new(&config.geocoding)?);
        let directory = directory::from_config(&config.directory)?;
        Ok(Self::new(geocoder, directory))
    }

    /// Providers of `specialization` within `radius_km`, nearest first.
    ///
    /// Never fails: a location that cannot be resolved, a directory outage or
    /// an invalid radius all come back as an empty list, with failures logged.
    pub async fn search_nearby(
        &self,
        location_text: &str,
        specialization: &str,
        radius_km: f64,
    ) -> Vec<Provider> {
        match self
            .try_search_nearby(location_text, specialization, radius_km)
            .await
        {
            Ok(providers) => providers,
            Err(e) => {
                error!("Error searching for doctors: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Same pipeline as [`search_nearby`](Self::search_nearby) but failures
    /// are returned instead of being collapsed into an empty list. A blank or
    /// unknown location is still an empty result, not an error.
    #[instrument(skip(self), fields(directory = self.directory.name()))]
    pub async fn try_search_nearby(
        &self,
        location_text: &str,
        specialization: &str,
        radius_km: f64,
    ) -> Result<Vec<Provider>> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(TelemedError::validation(format!(
                "Search radius must be a non-negative number of kilometers, got: {radius_km}"
            ))
            .into());
        }

        let Some(location) = self.resolve_location(location_text).await? else {
            info!("No location found for '{}'", location_text);
            return Ok(Vec::new());
        };
        let origin = location.coordinates;

        let candidates = self.directory.list_candidates(&origin).await?;
        debug!(
            "Directory '{}' returned {} candidates",
            self.directory.name(),
            candidates.len()
        );

        let providers = filter_and_rank(candidates, &origin, specialization, radius_km);

        info!(
            "Found {} {} providers within {}km of {}",
            providers.len(),
            specialization,
            radius_km,
            location.name
        );
        Ok(providers)
    }

    /// Details for a single provider. Not supported yet by any directory, so
    /// this always answers `None`.
    pub async fn details_for(&self, provider_id: &str) -> Option<Provider> {
        debug!(
            "Provider details for '{}' are not supported yet",
            provider_id
        );
        None
    }

    /// Resolve location text; `None` when blank or not found
    async fn resolve_location(&self, location_text: &str) -> Result<Option<Location>> {
        if location_text.trim().is_empty() {
            return Ok(None);
        }

        match LocationParser::parse(location_text)? {
            LocationInput::Coordinates(coordinates) => {
                debug!("Using literal coordinates {}", coordinates.format());
                Ok(Some(Location::new(coordinates, coordinates.format())))
            }
            LocationInput::Name(name) => self.geocoder.geocode(&name).await,
        }
    }
}

/// Attach distances, keep matching providers inside the radius, nearest first.
/// Candidates without coordinates are dropped since their distance is unknown.
pub fn filter_and_rank(
    candidates: Vec<Provider>,
    origin: &Coordinates,
    specialization: &str,
    radius_km: f64,
) -> Vec<Provider> {
    let mut providers: Vec<Provider> = candidates
        .into_iter()
        .filter_map(|mut provider| {
            let coordinates = provider.coordinates?;
            provider.distance_km = Some(geodesic_distance_km(origin, &coordinates));
            Some(provider)
        })
        .filter(|provider| {
            provider.has_specialization(specialization)
                && provider.distance_km.is_some_and(|d| d <= radius_km)
        })
        .collect();

    providers.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    providers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{FixtureDirectory, ProviderTemplate};
    use crate::geocoding::StaticGeocoder;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rstest::rstest;

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Option<Location>> {
            Err(TelemedError::geocoding("service unavailable").into())
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl ProviderDirectory for FailingDirectory {
        async fn list_candidates(&self, _near: &Coordinates) -> Result<Vec<Provider>> {
            Err(TelemedError::directory("connection refused").into())
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn springfield() -> Coordinates {
        Coordinates::new(39.7817, -89.6501).unwrap()
    }

    fn locator() -> ProviderLocator {
        ProviderLocator::new(
            Arc::new(StaticGeocoder::new().with_place("Springfield", springfield())),
            Arc::new(FixtureDirectory::default()),
        )
    }

    fn template(specialization: &str, lat_offset: f64) -> ProviderTemplate {
        ProviderTemplate {
            name: format!("Dr. {specialization} {lat_offset}"),
            specialization: specialization.to_string(),
            address: "1 Clinic Rd".to_string(),
            phone: "(555) 000-0000".to_string(),
            rating: 4.0,
            lat_offset,
            lon_offset: 0.0,
        }
    }

    #[tokio::test]
    async fn test_empty_location_returns_empty() {
        assert!(locator().search_nearby("", "Cardiology", 10.0).await.is_empty());
        assert!(locator().search_nearby("   ", "Cardiology", 10.0).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_location_returns_empty() {
        let result = locator().try_search_nearby("Atlantis", "Cardiology", 10.0).await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cardiology_within_ten_km() {
        let providers = locator().search_nearby("Springfield", "cardiology", 10.0).await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "Dr. Michael Brown");
        let distance = providers[0].distance_km.unwrap();
        // (+0.02, -0.02) degrees at ~40N is about 2.8 km
        assert!(distance > 2.5 && distance < 3.1, "got {distance}");
    }

    #[tokio::test]
    async fn test_radius_excludes_all_mock_candidates() {
        assert!(locator().search_nearby("Springfield", "Cardiology", 1.0).await.is_empty());
    }

    #[tokio::test]
    async fn test_literal_coordinates_skip_geocoding() {
        let locator = ProviderLocator::new(
            Arc::new(FailingGeocoder),
            Arc::new(FixtureDirectory::default()),
        );
        let providers = locator
            .try_search_nearby("39.7817, -89.6501", "Pediatrics", 5.0)
            .await
            .unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "Dr. Sarah Johnson");
    }

    #[tokio::test]
    async fn test_geocoder_failure_collapses_to_empty() {
        let locator = ProviderLocator::new(
            Arc::new(FailingGeocoder),
            Arc::new(FixtureDirectory::default()),
        );
        assert!(locator.search_nearby("Springfield", "Cardiology", 10.0).await.is_empty());
        assert!(locator.try_search_nearby("Springfield", "Cardiology", 10.0).await.is_err());
    }

    #[tokio::test]
    async fn test_directory_failure_collapses_to_empty() {
        let locator = ProviderLocator::new(
            Arc::new(StaticGeocoder::new().with_place("Springfield", springfield())),
            Arc::new(FailingDirectory),
        );
        assert!(locator.search_nearby("Springfield", "Cardiology", 10.0).await.is_empty());
        let err = locator
            .try_search_nearby("Springfield", "Cardiology", 10.0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[tokio::test]
    async fn test_invalid_radius(#[case] radius: f64) {
        assert!(locator().search_nearby("Springfield", "Cardiology", radius).await.is_empty());
        let err = locator()
            .try_search_nearby("Springfield", "Cardiology", radius)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[tokio::test]
    async fn test_results_sorted_by_distance() {
        let directory = FixtureDirectory::new(vec![
            template("Neurology", 0.03),
            template("Neurology", 0.01),
            template("Dermatology", 0.005),
            template("Neurology", 0.02),
        ]);
        let locator = ProviderLocator::new(
            Arc::new(StaticGeocoder::new().with_place("Springfield", springfield())),
            Arc::new(directory),
        );
        let providers = locator.search_nearby("Springfield", "NEUROLOGY", 50.0).await;
        let offsets: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            offsets,
            vec!["Dr. Neurology 0.01", "Dr. Neurology 0.02", "Dr. Neurology 0.03"]
        );
    }

    #[tokio::test]
    async fn test_details_for_is_not_supported() {
        assert!(locator().details_for("fixture-1").await.is_none());
    }

    #[test]
    fn test_filter_drops_providers_without_coordinates() {
        let provider = Provider {
            id: "x".to_string(),
            name: "Dr. Unknown".to_string(),
            specialization: "Cardiology".to_string(),
            address: String::new(),
            phone: String::new(),
            rating: 3.0,
            distance_km: None,
            coordinates: None,
        };
        assert!(filter_and_rank(vec![provider], &springfield(), "Cardiology", 1000.0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_filtered_providers_respect_radius_and_order(
            offsets in prop::collection::vec((-0.5f64..0.5, -0.5f64..0.5, 0usize..3), 0..20),
            radius in 0.0f64..60.0,
        ) {
            let specializations = ["Cardiology", "cardiology", "Pediatrics"];
            let origin = springfield();
            let candidates: Vec<Provider> = offsets
                .iter()
                .enumerate()
                .map(|(i, (dlat, dlon, spec))| Provider {
                    id: i.to_string(),
                    name: format!("Dr. {i}"),
                    specialization: specializations[*spec].to_string(),
                    address: String::new(),
                    phone: String::new(),
                    rating: 4.0,
                    distance_km: None,
                    coordinates: Some(origin.offset(*dlat, *dlon)),
                })
                .collect();

            let providers = filter_and_rank(candidates, &origin, "CARDIOLOGY", radius);
            for p in &providers {
                prop_assert!(p.distance_km.unwrap() <= radius);
                prop_assert!(p.has_specialization("Cardiology"));
            }
            for pair in providers.windows(2) {
                prop_assert!(pair[0].distance_km.unwrap() <= pair[1].distance_km.unwrap());
            }
        }
    }
}
