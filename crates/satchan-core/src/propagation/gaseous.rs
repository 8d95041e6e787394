//! Gaseous absorption and cloud attenuation

/// Zenith oxygen plus water-vapour attenuation by band (dB).
///
/// Piecewise constant: below 10 GHz, 10–20, 20–35, 35–50 and above 50 GHz
/// (the last band sits on the 60 GHz oxygen complex).
pub fn zenith_gas_attenuation_db(freq_ghz: f64) -> f64 {
    if freq_ghz < 10.0 {
        0.05
    } else if freq_ghz < 20.0 {
        0.2
    } else if freq_ghz < 35.0 {
        0.3
    } else if freq_ghz < 50.0 {
        0.8
    } else {
        4.0
    }
}

/// Slant gas attenuation (dB) including the calibration offset.
pub fn gas_attenuation_db(freq_ghz: f64, sin_elevation: f64, offset_db: f64) -> f64 {
    zenith_gas_attenuation_db(freq_ghz) / sin_elevation + offset_db
}

/// Liquid water content along the zenith path (mm, kg/m²)
pub const CLOUD_LIQUID_WATER_MM: f64 = 0.5;

/// Cloud specific attenuation coefficient K_l ((dB/km)/(g/m³)).
pub fn cloud_coefficient(freq_ghz: f64) -> f64 {
    0.0002 * freq_ghz.powf(1.95)
}

/// Slant cloud attenuation (dB).
pub fn cloud_attenuation_db(freq_ghz: f64, sin_elevation: f64) -> f64 {
    CLOUD_LIQUID_WATER_MM * cloud_coefficient(freq_ghz) / sin_elevation
}
