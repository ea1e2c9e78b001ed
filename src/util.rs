// Shared formatting and logging helpers.

use wasm_bindgen::JsValue;

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub fn cerror(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

/// Countdown clock, tenths resolution ("9.5s").
pub fn format_secs(secs: f64) -> String {
    format!("{:.1}s", secs.max(0.0))
}

/// Distances under a kilometre in metres, above in kilometres.
pub fn format_meters(m: f64) -> String {
    if m < 1000.0 {
        format!("{}m", m.round() as i64)
    } else {
        format!("{:.2}km", m / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seconds_with_tenths() {
        assert_eq!(format_secs(9.54), "9.5s");
        assert_eq!(format_secs(-0.2), "0.0s");
    }

    #[test]
    fn formats_meters_and_kilometers() {
        assert_eq!(format_meters(42.4), "42m");
        assert_eq!(format_meters(1500.0), "1.50km");
    }
}
