//! Regression from WGS84 coordinates to pixels of the campus map image.
//!
//! Each axis is a fixed second order polynomial in the offset from a
//! reference origin, scaled by 1000. The weights were fitted offline against
//! surveyed points; they are constants, not recomputed at runtime.

use crate::core::geo::{LatLng, PixelPoint};

/// Polynomial for one output axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisModel {
    /// Additive base offset
    pub base: f64,
    /// Weights of `1, x, y, x², x²y, x²y², y², xy², xy`
    pub weights: [f64; 9],
}

impl AxisModel {
    /// Evaluates the polynomial at normalised `(x, y)`.
    ///
    /// Terms are summed left to right in the order of `weights`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let a = &self.weights;
        self.base
            + a[0]
            + a[1] * x
            + a[2] * y
            + a[3] * x * x
            + a[4] * x * x * y
            + a[5] * x * x * y * y
            + a[6] * y * y
            + a[7] * x * y * y
            + a[8] * x * y
    }
}

const CAMPUS_ORIGIN: LatLng = LatLng {
    lat: 19.133691,
    lng: 72.916984,
};

const CAMPUS_X: AxisModel = AxisModel {
    base: 4189.0,
    weights: [
        -7.769917472065843,
        159.26978694839946,
        244.46989575495544,
        -6.003894110679995,
        -0.28864271213341297,
        0.010398324019718075,
        4.215508849724247,
        -0.6078830146963545,
        -7.0400449629241395,
    ],
};

const CAMPUS_Y: AxisModel = AxisModel {
    base: 1655.0,
    weights: [
        14.199431377059842,
        -158.80601990819815,
        68.9630034040724,
        5.796703402034644,
        1.1348242200568706,
        0.11891051684489184,
        -0.2930832938484276,
        0.1448231125788526,
        -5.282895700923075,
    ],
};

/// Converts geographic positions to image pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateModel {
    pub origin: LatLng,
    /// Multiplier applied to the degree offsets before evaluation
    pub scale: f64,
    pub x_axis: AxisModel,
    pub y_axis: AxisModel,
}

impl CoordinateModel {
    /// The model fitted to the campus map image
    pub const fn campus() -> Self {
        Self {
            origin: CAMPUS_ORIGIN,
            scale: 1000.0,
            x_axis: CAMPUS_X,
            y_axis: CAMPUS_Y,
        }
    }

    /// Offset of a position from the origin, in model units
    pub fn normalize(&self, position: LatLng) -> (f64, f64) {
        (
            (position.lat - self.origin.lat) * self.scale,
            (position.lng - self.origin.lng) * self.scale,
        )
    }

    /// Image pixel for a position, y counted from the top edge. No clamping:
    /// positions off the image give pixels off the image.
    pub fn to_pixel(&self, position: LatLng) -> PixelPoint {
        let (x, y) = self.normalize(position);
        PixelPoint::new(
            round_half_up(self.x_axis.evaluate(x, y)),
            round_half_up(self.y_axis.evaluate(x, y)),
        )
    }
}

impl Default for CoordinateModel {
    fn default() -> Self {
        Self::campus()
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_collapses_to_base() {
        let model = CoordinateModel::campus();
        let pixel = model.to_pixel(LatLng::new(19.133691, 72.916984));
        // 4189 - 7.77 and 1655 + 14.20
        assert_eq!(pixel, PixelPoint::new(4181, 1669));
    }

    #[test]
    fn test_known_readings() {
        let model = CoordinateModel::default();
        assert_eq!(
            model.to_pixel(LatLng::new(19.13, 72.915)),
            PixelPoint::new(3009, 2131)
        );
        assert_eq!(
            model.to_pixel(LatLng::new(19.135, 72.91)),
            PixelPoint::new(2908, 1029)
        );
        // north-east of campus, off the image
        assert_eq!(
            model.to_pixel(LatLng::new(19.14, 72.93)),
            PixelPoint::new(7536, 2857)
        );
    }

    #[test]
    fn test_deterministic() {
        let model = CoordinateModel::campus();
        let position = LatLng::new(19.1321, 72.9154);
        let first = model.to_pixel(position);
        for _ in 0..10 {
            assert_eq!(model.to_pixel(position), first);
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(-1.5), -1);
        assert_eq!(round_half_up(1669.4999), 1669);
    }
}
