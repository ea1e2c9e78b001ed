// Map viewport: pan/zoom over an equirectangular projection of the dataset.

use crate::geo::{Bounds, LatLng};

/// Screen mapping: `x = (lng - origin.lng) * cos_lat * zoom + offset_x`,
/// `y = (origin.lat - lat) * zoom + offset_y` (north is up). `zoom` is
/// pixels per degree of latitude.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: LatLng,
    pub cos_lat: f64,
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub panning: bool,
    pub last_x: f64,
    pub last_y: f64,
    pub initialized: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            origin: LatLng::new(0.0, 0.0),
            cos_lat: 1.0,
            zoom: 1_000.0,
            offset_x: 0.0,
            offset_y: 0.0,
            panning: false,
            last_x: 0.0,
            last_y: 0.0,
            initialized: false,
        }
    }
}

impl Camera {
    /// Center the dataset in the canvas with a small margin.
    pub fn fit(&mut self, bounds: Bounds, canvas_w: f64, canvas_h: f64) {
        let center = bounds.center();
        self.origin = center;
        self.cos_lat = center.lat.to_radians().cos().max(0.01);
        let (dlat, dlng) = bounds.span();
        let world_w = (dlng * self.cos_lat).max(1e-6);
        let world_h = dlat.max(1e-6);
        self.zoom = (canvas_w / world_w).min(canvas_h / world_h) * 0.92;
        self.offset_x = canvas_w * 0.5;
        self.offset_y = canvas_h * 0.5;
        self.initialized = true;
    }

    pub fn to_screen(&self, p: LatLng) -> (f64, f64) {
        let x = (p.lng - self.origin.lng) * self.cos_lat * self.zoom + self.offset_x;
        let y = (self.origin.lat - p.lat) * self.zoom + self.offset_y;
        (x, y)
    }

    pub fn to_latlng(&self, x: f64, y: f64) -> LatLng {
        LatLng {
            lat: self.origin.lat - (y - self.offset_y) / self.zoom,
            lng: self.origin.lng + (x - self.offset_x) / (self.zoom * self.cos_lat),
        }
    }

    /// Zoom keeping the point under `(cx, cy)` fixed on screen.
    pub fn zoom_about(&mut self, cx: f64, cy: f64, factor: f64) {
        let anchor = self.to_latlng(cx, cy);
        self.zoom = (self.zoom * factor).clamp(100.0, 2_000_000.0);
        let (ax, ay) = self.to_screen(anchor);
        self.offset_x += cx - ax;
        self.offset_y += cy - ay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Neighborhood, NeighborhoodSet};

    fn bounds() -> Bounds {
        let n = Neighborhood::new(
            "Centro",
            vec![
                LatLng::new(-24.0, -46.4),
                LatLng::new(-24.0, -46.3),
                LatLng::new(-23.9, -46.3),
                LatLng::new(-23.9, -46.4),
            ],
        )
        .unwrap();
        NeighborhoodSet::new(vec![n]).unwrap().bounds()
    }

    #[test]
    fn fit_centers_the_bounds() {
        let mut cam = Camera::default();
        cam.fit(bounds(), 800.0, 600.0);
        assert!(cam.initialized);
        let (x, y) = cam.to_screen(bounds().center());
        assert!((x - 400.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn screen_round_trip() {
        let mut cam = Camera::default();
        cam.fit(bounds(), 800.0, 600.0);
        let p = LatLng::new(-23.95, -46.33);
        let (x, y) = cam.to_screen(p);
        let back = cam.to_latlng(x, y);
        assert!((back.lat - p.lat).abs() < 1e-9);
        assert!((back.lng - p.lng).abs() < 1e-9);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut cam = Camera::default();
        cam.fit(bounds(), 800.0, 600.0);
        let before = cam.to_latlng(200.0, 150.0);
        cam.zoom_about(200.0, 150.0, 1.5);
        let after = cam.to_latlng(200.0, 150.0);
        assert!((before.lat - after.lat).abs() < 1e-9);
        assert!((before.lng - after.lng).abs() < 1e-9);
    }
}
