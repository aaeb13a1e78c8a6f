//! Schema-validated decode of the upstream forecast payload.
//!
//! The source returns a rolling multi-day forecast as JSON with numeric
//! fields encoded as strings. Decoding happens once at the ingestion
//! boundary and produces the typed samples the rest of the system uses;
//! nothing downstream touches dynamic JSON. A sample that fails numeric
//! parse is excluded with a warning, never propagated.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use windwatch_store::HourlySample;

/// Errors raised while decoding an upstream per-date entry.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unparseable report date {0:?}")]
    Date(String),

    #[error("Unparseable {field} value {value:?}")]
    Field { field: &'static str, value: String },
}

/// Top-level upstream payload. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct UpstreamPayload {
    #[serde(default)]
    pub weather: Vec<UpstreamDay>,
}

/// One per-date entry of the rolling forecast.
#[derive(Debug, Deserialize)]
pub struct UpstreamDay {
    pub date: String,

    #[serde(default)]
    pub hourly: Vec<UpstreamHour>,
}

/// One raw hourly sample; numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
pub struct UpstreamHour {
    pub time: String,

    #[serde(rename = "windspeedMiles")]
    pub windspeed_miles: String,
}

impl UpstreamHour {
    fn decode(&self) -> Result<HourlySample, ParseError> {
        let time = self.time.trim().parse().map_err(|_| ParseError::Field {
            field: "time",
            value: self.time.clone(),
        })?;
        let windspeed_miles = self
            .windspeed_miles
            .trim()
            .parse()
            .map_err(|_| ParseError::Field {
                field: "windspeedMiles",
                value: self.windspeed_miles.clone(),
            })?;
        Ok(HourlySample {
            time,
            windspeed_miles,
        })
    }
}

/// Decode one per-date entry into its report date and typed samples.
///
/// An unparseable report date fails the whole entry (the caller skips it
/// and continues with siblings). An unparseable sample is dropped with a
/// warning and the remaining samples survive.
///
/// # Errors
/// Returns `ParseError::Date` when the entry's date is not `YYYY-MM-DD`.
pub fn decode_day(day: &UpstreamDay) -> Result<(NaiveDate, Vec<HourlySample>), ParseError> {
    let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
        .map_err(|_| ParseError::Date(day.date.clone()))?;

    let mut hourly = Vec::with_capacity(day.hourly.len());
    for hour in &day.hourly {
        match hour.decode() {
            Ok(sample) => hourly.push(sample),
            Err(e) => {
                tracing::warn!(%date, error = %e, "Excluding unparseable hourly sample");
            }
        }
    }

    Ok((date, hourly))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(time: &str, windspeed: &str) -> UpstreamHour {
        UpstreamHour {
            time: time.to_string(),
            windspeed_miles: windspeed.to_string(),
        }
    }

    #[test]
    fn test_decode_day_happy_path() {
        let day = UpstreamDay {
            date: "2026-08-24".to_string(),
            hourly: vec![hour("900", "12"), hour("1200", "18")],
        };

        let (date, hourly) = decode_day(&day).unwrap();
        assert_eq!(date.to_string(), "2026-08-24");
        assert_eq!(
            hourly,
            vec![
                HourlySample {
                    time: 900,
                    windspeed_miles: 12
                },
                HourlySample {
                    time: 1200,
                    windspeed_miles: 18
                },
            ]
        );
    }

    #[test]
    fn test_bad_sample_excluded_not_fatal() {
        let day = UpstreamDay {
            date: "2026-08-24".to_string(),
            hourly: vec![hour("900", "gale"), hour("abc", "10"), hour("1200", "18")],
        };

        let (_, hourly) = decode_day(&day).unwrap();
        assert_eq!(hourly.len(), 1);
        assert_eq!(hourly[0].time, 1200);
    }

    #[test]
    fn test_bad_date_fails_entry() {
        let day = UpstreamDay {
            date: "24/08/2026".to_string(),
            hourly: vec![hour("900", "12")],
        };
        assert!(matches!(decode_day(&day), Err(ParseError::Date(_))));
    }

    #[test]
    fn test_payload_ignores_extra_fields() {
        let raw = r#"{
            "current_condition": [{"temp_C": "21"}],
            "weather": [{
                "date": "2026-08-24",
                "maxtempC": "25",
                "hourly": [
                    {"time": "0", "windspeedMiles": "7", "tempC": "18", "humidity": "60"}
                ]
            }]
        }"#;

        let payload: UpstreamPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.weather.len(), 1);
        let (_, hourly) = decode_day(&payload.weather[0]).unwrap();
        assert_eq!(
            hourly,
            vec![HourlySample {
                time: 0,
                windspeed_miles: 7
            }]
        );
    }

    #[test]
    fn test_missing_weather_array_is_empty() {
        let payload: UpstreamPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.weather.is_empty());
    }
}
