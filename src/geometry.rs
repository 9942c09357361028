// src/geometry.rs
use nalgebra::Vector3;

pub fn distance3d(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a - b).norm()
}

// Degrees. A straight finger is near 180, a degenerate ray gives 0.
pub fn joint_angle(a: &Vector3<f64>, vertex: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let ray_a = a - vertex;
    let ray_b = b - vertex;
    let denom = ray_a.norm() * ray_b.norm();
    if denom <= f64::EPSILON {
        return 0.0;
    }

    (ray_a.dot(&ray_b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_euclidean_in_three_dimensions() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.3, 0.4, 1.2);
        assert_relative_eq!(distance3d(&a, &b), 1.3, epsilon = 1e-12);
        assert_relative_eq!(distance3d(&b, &a), 1.3, epsilon = 1e-12);
    }

    #[test]
    fn distance_of_point_to_itself_is_zero() {
        let p = Vector3::new(0.25, 0.75, -0.1);
        assert_eq!(distance3d(&p, &p), 0.0);
    }

    #[test]
    fn straight_and_right_angles() {
        let vertex = Vector3::new(0.5, 0.5, 0.0);
        let above = Vector3::new(0.5, 0.4, 0.0);
        let below = Vector3::new(0.5, 0.6, 0.0);
        let side = Vector3::new(0.6, 0.5, 0.0);

        assert_relative_eq!(joint_angle(&above, &vertex, &below), 180.0, epsilon = 1e-9);
        assert_relative_eq!(joint_angle(&above, &vertex, &side), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_ray_measures_zero() {
        let vertex = Vector3::new(0.5, 0.5, 0.0);
        let other = Vector3::new(0.1, 0.2, 0.0);
        assert_eq!(joint_angle(&vertex, &vertex, &other), 0.0);
    }
}
