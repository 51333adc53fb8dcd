//! Geodesic distance on the WGS-84 ellipsoid
//!
//! Uses Vincenty's inverse formula. For nearly antipodal points the iteration
//! may not converge; those pairs fall back to the haversine distance scaled so
//! that exact antipodes measure half a meridian. Exact antipodes are then
//! exact, and the remaining near-antipodal error stays well under 0.1%.

use crate::models::Coordinates;
use haversine::{Location as HaversineLocation, Units, distance};
use tracing::debug;

/// WGS-84 semi-major axis in meters
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis in meters
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// Half the WGS-84 meridian perimeter in kilometers
const HALF_MERIDIAN_KM: f64 = 20_003.931_458_625;
/// Earth radius the haversine crate uses for kilometers
const HAVERSINE_RADIUS_KM: f64 = 6_371.0;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// Geodesic distance between two points in kilometers
#[must_use]
pub fn geodesic_distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    match vincenty_inverse_m(from, to) {
        Some(meters) => meters / 1000.0,
        None => {
            debug!(
                "Vincenty did not converge for ({}) -> ({}), using scaled haversine",
                from.format(),
                to.format()
            );
            spherical_distance_km(from, to) * HALF_MERIDIAN_KM
                / (std::f64::consts::PI * HAVERSINE_RADIUS_KM)
        }
    }
}

/// Great-circle distance on a sphere in kilometers
#[must_use]
pub fn spherical_distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        HaversineLocation {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        Units::Kilometers,
    )
}

fn vincenty_inverse_m(from: &Coordinates, to: &Coordinates) -> Option<f64> {
    let l = (to.longitude - from.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * from.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * to.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        if sin_sigma == 0.0 {
            // coincident points, or exact antipodes with no defined azimuth
            return (cos_sigma > 0.0).then_some(0.0);
        }
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos_sq_alpha = 0
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - lambda_prev).abs() < CONVERGENCE_THRESHOLD {
            let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
            let a = 1.0
                + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = b
                * sin_sigma
                * (cos_2sigma_m
                    + b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(WGS84_B * a * (sigma - delta_sigma));
        }
    }

    None
}
