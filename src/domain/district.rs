//! Budapest district codes: labels and approximate centroids.

pub const FIRST_DISTRICT: u32 = 1;
pub const LAST_DISTRICT: u32 = 23;

/// Used for any code outside the table.
pub const FALLBACK_CENTROID: (f64, f64) = (47.5, 19.05);

const CENTROIDS: [(f64, f64); 23] = [
    (47.4979, 19.0402),
    (47.5138, 19.0267),
    (47.5428, 19.0408),
    (47.5615, 19.0892),
    (47.4969, 19.0514),
    (47.5030, 19.0651),
    (47.4969, 19.0651),
    (47.4875, 19.0651),
    (47.4875, 19.0514),
    (47.4781, 19.0651),
    (47.4781, 19.0402),
    (47.5030, 19.0267),
    (47.5138, 19.0651),
    (47.5245, 19.1026),
    (47.4687, 19.1163),
    (47.5138, 19.1026),
    (47.4781, 19.1300),
    (47.4406, 19.1163),
    (47.4312, 19.0892),
    (47.4312, 19.1026),
    (47.4406, 19.1437),
    (47.4125, 19.0267),
    (47.3937, 19.0651),
];

const ROMAN: [&str; 23] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV",
    "XV", "XVI", "XVII", "XVIII", "XIX", "XX", "XXI", "XXII", "XXIII",
];

pub fn is_known(code: u32) -> bool {
    (FIRST_DISTRICT..=LAST_DISTRICT).contains(&code)
}

/// (latitude, longitude) of the district, or [`FALLBACK_CENTROID`].
pub fn centroid(code: u32) -> (f64, f64) {
    if is_known(code) {
        CENTROIDS[(code - FIRST_DISTRICT) as usize]
    } else {
        FALLBACK_CENTROID
    }
}

pub fn roman(code: u32) -> Option<&'static str> {
    is_known(code).then(|| ROMAN[(code - FIRST_DISTRICT) as usize])
}

/// `11` → `"XI. kerület"`.
pub fn label(code: u32) -> Option<String> {
    roman(code).map(|r| format!("{r}. kerület"))
}

pub fn from_roman(numeral: &str) -> Option<u32> {
    let upper = numeral.trim().trim_end_matches('.').to_uppercase();
    ROMAN
        .iter()
        .position(|r| *r == upper)
        .map(|i| i as u32 + FIRST_DISTRICT)
}
