//! OpenWeather client for the daily updater.
//!
//! Only the current-conditions endpoint is used; the temperature is requested
//! in imperial units so it can be appended to the daily files as-is.

use crate::city::City;
use anyhow::Context;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Default OpenWeather current-conditions endpoint.
pub const OPEN_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const MAX_TRIES: u32 = 3;

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

/// Extract `main.temp` (°F) from an OpenWeather JSON body.
pub fn parse_temperature_response(body: &str) -> anyhow::Result<f64> {
    let response: WeatherResponse =
        serde_json::from_str(body).context("Unexpected OpenWeather response")?;
    Ok(response.main.temp)
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: &str, base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(WeatherClient {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        })
    }

    /// Current temperature in °F at the city's coordinates.
    ///
    /// Retries with doubling back-off. A bad status, a transport error and an
    /// undecodable body all count as a failed attempt; `Ok(None)` when every
    /// attempt failed.
    pub async fn fetch_temperature(&self, city: &City) -> anyhow::Result<Option<f64>> {
        let mut sleep_millis: u64 = 1000;
        let lat = city.latitude.to_string();
        let lon = city.longitude.to_string();
        let query = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "imperial"),
        ];

        for attempt in 1..=MAX_TRIES {
            info!("Requesting temperature for {} (attempt {})", city.code, attempt);
            match self.client.get(&self.base_url).query(&query).send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    let temp = match response.text().await {
                        Ok(body) => parse_temperature_response(&body),
                        Err(e) => Err(e.into()),
                    };
                    match temp {
                        Ok(temp) => {
                            info!("Temperature for {} is {}°F", city.code, temp);
                            return Ok(Some(temp));
                        }
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Unreadable response for {}: {:#}",
                                attempt, MAX_TRIES, city.code, e
                            );
                        }
                    }
                }
                Ok(response) => {
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt,
                        MAX_TRIES,
                        city.code,
                        response.status()
                    );
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: Request failed for {}: {}",
                        attempt, MAX_TRIES, city.code, e
                    );
                }
            }

            if attempt < MAX_TRIES {
                tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
                sleep_millis *= 2;
            }
        }

        warn!("All attempts failed for {}", city.code);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = r#"{
        "coord": {"lon": -91.86, "lat": 47.9},
        "weather": [{"id": 600, "main": "Snow", "description": "light snow"}],
        "main": {"temp": 12.34, "feels_like": 1.2, "temp_min": 10.0, "temp_max": 14.0},
        "name": "Ely"
    }"#;

    #[test]
    fn test_parse_temperature_response() {
        let temp = parse_temperature_response(BODY).unwrap();
        assert!((temp - 12.34).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_temperature_response_missing_main() {
        assert!(parse_temperature_response(r#"{"cod": 401, "message": "Invalid API key"}"#).is_err());
    }

    async fn client_for(server: &MockServer) -> WeatherClient {
        WeatherClient::new("key", &format!("{}/data/2.5/weather", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_temperature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("units", "imperial"))
            .and(query_param("appid", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
            .expect(1)
            .mount(&server)
            .await;

        let ely = City::find("ELY").unwrap();
        let temp = client_for(&server).await.fetch_temperature(&ely).await.unwrap();
        assert_eq!(temp, Some(12.34));
    }

    #[tokio::test]
    async fn test_fetch_temperature_garbled_body_is_a_failed_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(MAX_TRIES as u64)
            .mount(&server)
            .await;

        let ely = City::find("ELY").unwrap();
        let temp = client_for(&server).await.fetch_temperature(&ely).await.unwrap();
        assert_eq!(temp, None);
    }
}
