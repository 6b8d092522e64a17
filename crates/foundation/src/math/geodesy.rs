use super::Vec3;

/// Geographic coordinates in degrees.
///
/// No range validation is applied; out-of-range angles simply wrap through
/// the trigonometry in [`project`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoCoordinate {
    pub const fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// Point on a sphere of `radius` centered at the origin.
    pub fn to_vec3(self, radius: f64) -> Vec3 {
        project(self.lat_deg, self.lon_deg, radius)
    }
}

/// Project latitude/longitude (degrees) onto a sphere of `radius`.
///
/// Frame convention (right-handed, +Y up):
/// - polar angle `phi = 90 - lat` measured from +Y,
/// - azimuth `theta = lon + 180` measured so that lon 0 lands on +X and
///   lon 90E lands on -Z.
///
/// This is the same layout used by the UV sphere in `scene::mesh`, so a
/// texture in equirectangular projection lines up with projected markers.
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    let sin_phi = phi.sin();
    let x = -(radius * sin_phi * theta.cos());
    let y = radius * phi.cos();
    let z = radius * sin_phi * theta.sin();

    Vec3::new(x, y, z)
}

/// Inverse of [`project`]: recover the coordinate and the sphere radius.
///
/// Returns `None` for the origin. Longitude is wrapped to `(-180, 180]`.
/// At the poles the longitude is undefined and reported as whatever
/// `atan2` yields for the residual x/z components.
pub fn unproject(p: Vec3) -> Option<(GeoCoordinate, f64)> {
    let radius = p.length();
    if radius <= 0.0 || !radius.is_finite() {
        return None;
    }

    let phi = (p.y / radius).clamp(-1.0, 1.0).acos();
    let theta = p.z.atan2(-p.x);

    let lat_deg = 90.0 - phi.to_degrees();
    let lon_deg = wrap_lon_deg(theta.to_degrees() - 180.0);
    Some((GeoCoordinate::new(lat_deg, lon_deg), radius))
}

/// Wrap a longitude into `(-180, 180]`.
pub fn wrap_lon_deg(lon_deg: f64) -> f64 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::{GeoCoordinate, project, unproject, wrap_lon_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian_is_plus_x() {
        let p = project(0.0, 0.0, 100.0);
        assert_close(p.x, 100.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
    }

    #[test]
    fn equator_90e_is_minus_z() {
        let p = project(0.0, 90.0, 1.0);
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, -1.0, 1e-12);
    }

    #[test]
    fn north_pole_ignores_longitude() {
        let r = 42.0;
        let reference = project(90.0, 0.0, r);
        assert_close(reference.y, r, 1e-12);
        for lon in [-180.0, -97.5, 0.0, 13.0, 139.6917, 180.0] {
            let p = project(90.0, lon, r);
            assert_close(p.x, reference.x, 1e-12);
            assert_close(p.y, reference.y, 1e-12);
            assert_close(p.z, reference.z, 1e-12);
        }
    }

    #[test]
    fn projected_points_lie_on_the_sphere() {
        for r in [0.5, 1.0, 100.0, 6_378_137.0] {
            let mut lat = -90.0;
            while lat <= 90.0 {
                let mut lon = -180.0;
                while lon <= 180.0 {
                    let p = project(lat, lon, r);
                    let rel = (p.length() - r).abs() / r;
                    assert!(rel <= 1e-6, "lat {lat} lon {lon} r {r}: norm {}", p.length());
                    lon += 22.5;
                }
                lat += 15.0;
            }
        }
    }

    #[test]
    fn out_of_range_input_wraps() {
        let a = project(10.0, 200.0, 1.0);
        let b = project(10.0, -160.0, 1.0);
        assert_close(a.x, b.x, 1e-12);
        assert_close(a.y, b.y, 1e-12);
        assert_close(a.z, b.z, 1e-12);
    }

    #[test]
    fn projection_is_deterministic() {
        let tokyo = GeoCoordinate::new(35.6895, 139.6917);
        assert_eq!(tokyo.to_vec3(100.0), tokyo.to_vec3(100.0));
    }

    #[test]
    fn unproject_recovers_coordinate() {
        let tokyo = GeoCoordinate::new(35.6895, 139.6917);
        let (geo, r) = unproject(tokyo.to_vec3(100.0)).expect("non-zero");
        assert_close(geo.lat_deg, tokyo.lat_deg, 1e-9);
        assert_close(geo.lon_deg, tokyo.lon_deg, 1e-9);
        assert_close(r, 100.0, 1e-9);

        let (geo, _) = unproject(project(-33.86, -151.2, 5.0)).expect("non-zero");
        assert_close(geo.lat_deg, -33.86, 1e-9);
        assert_close(geo.lon_deg, -151.2, 1e-9);
    }

    #[test]
    fn unproject_origin_is_none() {
        assert!(unproject(super::Vec3::ZERO).is_none());
    }

    #[test]
    fn wraps_longitude_into_half_open_range() {
        assert_close(wrap_lon_deg(-220.0), 140.0, 1e-12);
        assert_close(wrap_lon_deg(540.0), 180.0, 1e-12);
        assert_close(wrap_lon_deg(-180.0), 180.0, 1e-12);
        assert_close(wrap_lon_deg(45.0), 45.0, 1e-12);
    }
}
