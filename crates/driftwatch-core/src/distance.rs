//! Great-circle distance on a spherical Earth.
//!
//! This is the canonical distance metric for the whole system: the alert
//! engine and the latest-position view must both go through
//! [`haversine_m`] so their numbers can never disagree.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two `(latitude, longitude)` points
/// given in decimal degrees.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let phi1 = lat1.to_radians();
  let phi2 = lat2.to_radians();
  let d_phi = (lat2 - lat1).to_radians();
  let d_lambda = (lon2 - lon1).to_radians();

  let a = (d_phi / 2.0).sin().powi(2)
    + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

  2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
