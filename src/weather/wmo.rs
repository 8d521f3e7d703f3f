use serde_json::{json, Map, Value};

/// WMO weather interpretation code with its Indonesian description and the
/// day/night icon pair used by the map legend.
pub struct WmoCode {
    pub code: u16,
    pub deskripsi: &'static str,
    pub ikon_siang: &'static str,
    pub ikon_malam: &'static str,
}

// The descriptions and icon class names are a wire contract with the
// deployed frontend; do not edit them without updating it.
pub static WMO_CODES: &[WmoCode] = &[
    WmoCode { code: 0, deskripsi: "Cerah", ikon_siang: "wi-day-sunny", ikon_malam: "wi-night-clear" },
    WmoCode { code: 1, deskripsi: "Sebagian Besar Cerah", ikon_siang: "wi-day-sunny-overcast", ikon_malam: "wi-night-alt-partly-cloudy" },
    WmoCode { code: 2, deskripsi: "Berawan Sebagian", ikon_siang: "wi-day-cloudy", ikon_malam: "wi-night-alt-cloudy" },
    WmoCode { code: 3, deskripsi: "Mendung", ikon_siang: "wi-cloudy", ikon_malam: "wi-cloudy" },
    WmoCode { code: 45, deskripsi: "Kabut", ikon_siang: "wi-fog", ikon_malam: "wi-fog" },
    WmoCode { code: 48, deskripsi: "Kabut Rime", ikon_siang: "wi-fog", ikon_malam: "wi-fog" },
    WmoCode { code: 51, deskripsi: "Gerimis Ringan", ikon_siang: "wi-day-sprinkle", ikon_malam: "wi-night-alt-sprinkle" },
    WmoCode { code: 53, deskripsi: "Gerimis Sedang", ikon_siang: "wi-day-sprinkle", ikon_malam: "wi-night-alt-sprinkle" },
    WmoCode { code: 55, deskripsi: "Gerimis Lebat", ikon_siang: "wi-day-sprinkle", ikon_malam: "wi-night-alt-sprinkle" },
    WmoCode { code: 61, deskripsi: "Hujan Ringan", ikon_siang: "wi-day-rain", ikon_malam: "wi-night-alt-rain" },
    WmoCode { code: 63, deskripsi: "Hujan Sedang", ikon_siang: "wi-day-rain", ikon_malam: "wi-night-alt-rain" },
    WmoCode { code: 65, deskripsi: "Hujan Lebat", ikon_siang: "wi-day-rain", ikon_malam: "wi-night-alt-rain" },
    WmoCode { code: 71, deskripsi: "Salju Ringan", ikon_siang: "wi-day-snow", ikon_malam: "wi-night-alt-snow" },
    WmoCode { code: 73, deskripsi: "Salju Sedang", ikon_siang: "wi-day-snow", ikon_malam: "wi-night-alt-snow" },
    WmoCode { code: 75, deskripsi: "Salju Lebat", ikon_siang: "wi-day-snow", ikon_malam: "wi-night-alt-snow" },
    WmoCode { code: 80, deskripsi: "Hujan Deras Ringan", ikon_siang: "wi-day-showers", ikon_malam: "wi-night-alt-showers" },
    WmoCode { code: 81, deskripsi: "Hujan Deras Sedang", ikon_siang: "wi-day-showers", ikon_malam: "wi-night-alt-showers" },
    WmoCode { code: 82, deskripsi: "Hujan Deras Lebat", ikon_siang: "wi-day-showers", ikon_malam: "wi-night-alt-showers" },
    WmoCode { code: 95, deskripsi: "Badai Petir", ikon_siang: "wi-day-thunderstorm", ikon_malam: "wi-night-alt-thunderstorm" },
    WmoCode { code: 96, deskripsi: "Badai Petir dengan Hujan Es", ikon_siang: "wi-day-hail", ikon_malam: "wi-night-alt-hail" },
    WmoCode { code: 99, deskripsi: "Badai Petir dengan Hujan Es Lebat", ikon_siang: "wi-day-hail", ikon_malam: "wi-night-alt-hail" },
];

/// Map served by the WMO code endpoint: code (as a string key) to
/// `[description, day icon, night icon]`.
pub fn code_map() -> Value {
    let mut map = Map::with_capacity(WMO_CODES.len());
    for entry in WMO_CODES {
        map.insert(
            entry.code.to_string(),
            json!([entry.deskripsi, entry.ikon_siang, entry.ikon_malam]),
        );
    }
    Value::Object(map)
}
